//! Types de données pour le crate grille-tfu
//!
//! Les noms de champs sérialisés reprennent le format JSON consommé par
//! l'application (`departements`, `nom`, `tfu_par_m2`, ...).

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// Description par défaut du document produit
pub const DEFAULT_DESCRIPTION: &str = "Grille tarifaire révisée 2025";

/// Catégorie de bâtiment détectée dans l'en-tête
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDescriptor {
    /// Identifiant séquentiel (`Categorie_01`, `Categorie_02`, ...)
    pub id: String,

    /// Libellé de la catégorie (ligne 0)
    pub name: String,

    /// Sous-titre de la catégorie (ligne 1)
    pub description: String,

    /// Colonne du tarif au m²
    #[serde(rename = "tfu_m2_col")]
    pub rate_column: usize,

    /// Colonne du tarif minimum
    #[serde(rename = "tfu_min_col")]
    pub min_column: usize,
}

impl CategoryDescriptor {
    /// Identifiant d'une catégorie à partir de sa position (base 0)
    pub fn id_for(index: usize) -> String {
        format!("Categorie_{:02}", index + 1)
    }
}

/// Tarif d'une catégorie pour un arrondissement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TariffEntry {
    #[serde(rename = "nom_categorie")]
    pub category_name: String,

    pub description: String,

    /// TFU au m²
    #[serde(rename = "tfu_par_m2", deserialize_with = "amount_or_nan")]
    pub rate_per_area: f64,

    /// TFU minimum
    #[serde(rename = "tfu_minimum", deserialize_with = "amount_or_nan")]
    pub minimum_rate: f64,
}

/// Tarifs d'un arrondissement, indexés par identifiant de catégorie, dans
/// l'ordre des colonnes de l'en-tête
pub type Tariffs = IndexMap<String, TariffEntry>;

/// Montant relu depuis JSON: `null` (montant non fini à l'écriture) → NaN
pub(crate) fn amount_or_nan<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

/// Arrondissement (niveau le plus fin)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct District {
    #[serde(rename = "nom")]
    pub name: String,

    #[serde(rename = "tarifs")]
    pub tariffs: Tariffs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commune {
    #[serde(rename = "nom")]
    pub name: String,

    #[serde(rename = "arrondissements")]
    pub districts: Vec<District>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    #[serde(rename = "nom")]
    pub name: String,

    pub communes: Vec<Commune>,
}

/// Métadonnées du document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Chemin du fichier source
    #[serde(rename = "source_file")]
    pub source_path: String,

    pub description: String,

    pub categories: Vec<CategoryDescriptor>,
}

/// Document complet: métadonnées + arbre département > commune > arrondissement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub metadata: Metadata,

    #[serde(rename = "departements")]
    pub departments: Vec<Department>,
}

impl Document {
    /// Nombre total de communes
    pub fn commune_count(&self) -> usize {
        self.departments.iter().map(|d| d.communes.len()).sum()
    }

    /// Nombre total d'arrondissements
    pub fn district_count(&self) -> usize {
        self.departments
            .iter()
            .flat_map(|d| &d.communes)
            .map(|c| c.districts.len())
            .sum()
    }
}

/// Mode de détection des catégories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeaderMode {
    /// Catégories lues depuis l'en-tête
    Detected,
    /// Aucune catégorie détectée: quatre catégories fixes
    Fallback,
}

/// Résultat de l'analyse de l'en-tête
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderLayout {
    pub mode: HeaderMode,
    pub categories: Vec<CategoryDescriptor>,
}

/// Compteurs des récupérations silencieuses pendant l'extraction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionStats {
    /// Lignes de données lues (hors en-tête)
    pub rows_read: usize,
    /// Lignes intégrées à l'arbre
    pub rows_processed: usize,
    /// Lignes sans département ou commune résolus
    pub rows_skipped: usize,
    /// Paires de cellules illisibles remises à zéro
    pub malformed_pairs: usize,
    /// Tarifs omis (colonnes hors de la ligne)
    pub omitted_tariffs: usize,
}

/// Résultat d'une extraction complète
#[derive(Debug, Clone)]
pub struct Extraction {
    pub document: Document,
    pub mode: HeaderMode,
    pub stats: ExtractionStats,
}
