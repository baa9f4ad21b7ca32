//! # grille-tfu
//!
//! Reconstruction d'une grille tarifaire TFU (feuille de calcul avec en-têtes
//! fusionnés et libellés géographiques clairsemés) en un arbre
//! département > commune > arrondissement.
//!
//! ## Features
//!
//! - Lecture xlsx / xls / ods via `calamine`
//! - Détection des catégories de bâtiments depuis les deux lignes d'en-tête,
//!   avec disposition fixe de repli
//! - Report des départements et communes sur les lignes vides
//! - Lecture tolérante des montants (valeur illisible → 0)
//! - Slugs pour l'application consommatrice
//!
//! ## Usage
//!
//! ```rust,ignore
//! use grille_tfu::{parse, ExtractOptions};
//! use std::path::Path;
//!
//! let extraction = parse(Path::new("grille_revisee_2025_light.xlsx"), &ExtractOptions::default())?;
//! println!("Mode: {:?}", extraction.mode);
//!
//! for dept in &extraction.document.departments {
//!     println!("{}: {} communes", dept.name, dept.communes.len());
//! }
//! ```

pub mod assemble;
pub mod error;
pub mod grid;
pub mod parser;
pub mod slug;
pub mod types;

pub use error::GrilleError;
pub use grid::{CellValue, Grid};
pub use slug::{create_slug, SluggedDocument};
pub use types::{
    CategoryDescriptor, Commune, Department, District, Document, Extraction, ExtractionStats,
    HeaderLayout, HeaderMode, Metadata, TariffEntry, Tariffs,
};

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::assemble::TreeAssembler;
use crate::parser::rows::RowClassifier;

/// Options d'extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// Description écrite dans les métadonnées
    pub description: String,

    /// Sous-chaîne identifiant une colonne de catégorie
    pub category_marker: String,

    /// Lignes de titre ignorées avant les deux lignes d'en-tête
    pub header_offset: usize,

    /// Feuille à lire (première feuille si absent)
    pub sheet: Option<String>,

    /// Catégories de repli quand aucun marqueur n'est trouvé
    pub fallback_categories: Vec<String>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            description: types::DEFAULT_DESCRIPTION.to_string(),
            category_marker: parser::header::CATEGORY_MARKER.to_string(),
            header_offset: 1,
            sheet: None,
            fallback_categories: parser::header::default_fallback(),
        }
    }
}

/// Lit un classeur et reconstruit le document.
///
/// # Arguments
///
/// * `path` - Chemin vers le classeur (.xlsx, .xls, .ods)
/// * `options` - Options d'extraction
///
/// # Errors
///
/// Retourne `GrilleError` si le classeur est illisible, si la feuille est
/// absente, ou si la grille n'a pas ses deux lignes d'en-tête. Les problèmes
/// par ligne ou par cellule sont récupérés et comptés dans les statistiques.
pub fn parse(path: &Path, options: &ExtractOptions) -> Result<Extraction, GrilleError> {
    let grid = grid::load(path, options.sheet.as_deref(), options.header_offset)?;
    extract(&grid, &path.display().to_string(), options)
}

/// Reconstruit le document à partir d'une grille déjà chargée.
///
/// Lignes 0 et 1: en-tête. Lignes 2 et suivantes: données.
pub fn extract(
    grid: &Grid,
    source_path: &str,
    options: &ExtractOptions,
) -> Result<Extraction, GrilleError> {
    let rows = grid.rows();
    let [header, sub_header, data @ ..] = rows else {
        return Err(GrilleError::MissingHeader { found: rows.len() });
    };

    // 1. Catégories (figées avant le traitement des lignes)
    let layout = parser::header::analyze(
        header,
        sub_header,
        &options.category_marker,
        &options.fallback_categories,
    );

    // 2. Lignes de données
    let mut classifier = RowClassifier::new();
    let mut tree = TreeAssembler::new();
    let mut stats = ExtractionStats {
        rows_read: data.len(),
        ..Default::default()
    };

    for row in data {
        let Some(labels) = classifier.classify(row) else {
            stats.rows_skipped += 1;
            continue;
        };

        debug!(
            "Row: {} > {} > {}",
            labels.department, labels.commune, labels.district
        );

        let row_tariffs = parser::tariff::extract(row, &layout.categories);
        stats.malformed_pairs += row_tariffs.malformed;
        stats.omitted_tariffs += row_tariffs.omitted;
        stats.rows_processed += 1;

        tree.push(
            &labels.department,
            &labels.commune,
            &labels.district,
            row_tariffs.tariffs,
        );
    }

    let document = Document {
        metadata: Metadata {
            source_path: source_path.to_string(),
            description: options.description.clone(),
            categories: layout.categories,
        },
        departments: tree.finish(),
    };

    info!(
        departements = document.departments.len(),
        communes = document.commune_count(),
        arrondissements = document.district_count(),
        skipped = stats.rows_skipped,
        "Extraction complete"
    );

    Ok(Extraction {
        document,
        mode: layout.mode,
        stats,
    })
}
