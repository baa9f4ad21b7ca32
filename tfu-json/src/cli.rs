//! Définition et implémentation des commandes CLI
//!
//! - défaut: classeur → document JSON
//! - `slugify`: document → document enrichi de slugs
//! - `export`: document enrichi → vues de sélection
//! - `tarif`: recherche d'un tarif, estimation optionnelle

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use clap::{Args, Subcommand};
use tracing::{debug, error, info, warn};

use grille_tfu::{Document, SluggedDocument};
use tfu_json::config::{Config, DEFAULT_PRESET};
use tfu_json::export::{read_json, views, write_json};
use tfu_json::lookup::{building_tfu, find_rate};
use tfu_json::report::{file_checksum, ConversionReport};

#[derive(Subcommand)]
pub enum Commands {
    /// Add slugs to a converted document
    Slugify {
        /// Document produced by the conversion
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for the slugged document
        #[arg(short, long, default_value = "tfu_with_slugs.json")]
        output: PathBuf,
    },

    /// Export the selection views of a slugged document
    Export {
        /// Slugged document
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory for the views
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Look up a rate by slugs, with an optional building estimate
    Tarif(TarifArgs),
}

/// Arguments de la conversion (commande par défaut)
#[derive(Args, Debug, Default, Clone)]
pub struct ConvertArgs {
    /// Spreadsheet to convert (défaut: classeur de la configuration)
    pub input: Option<PathBuf>,

    /// Output JSON file (défaut: sortie de la configuration)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Config preset name (benin-2025/raw-grid) or path to a JSON config
    #[arg(long)]
    pub config: Option<String>,

    /// Sheet to read (défaut: première feuille)
    #[arg(long)]
    pub sheet: Option<String>,

    /// Title rows skipped before the two header rows
    #[arg(long)]
    pub header_offset: Option<usize>,

    /// Write the conversion report to this JSON file
    #[arg(long)]
    pub report: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct TarifArgs {
    /// Slugged document
    #[arg(short, long)]
    pub input: PathBuf,

    #[arg(long)]
    pub departement: String,

    #[arg(long)]
    pub commune: String,

    #[arg(long)]
    pub arrondissement: String,

    /// Slug of the category description (ex: tole)
    #[arg(long)]
    pub categorie: String,

    /// Building surface in m² for the estimate
    #[arg(long)]
    pub surface: Option<f64>,
}

/// Exécute la conversion.
///
/// Retourne `false` quand aucun résultat n'a été produit: l'erreur est
/// journalisée et rapportée, aucun fichier JSON n'est écrit.
pub fn cmd_convert(args: &ConvertArgs) -> Result<bool> {
    let started = Instant::now();

    let config_spec = args.config.as_deref().unwrap_or(DEFAULT_PRESET);
    let mut config = Config::resolve(config_spec)?;
    if let Some(ref sheet) = args.sheet {
        config.extract.sheet = Some(sheet.clone());
    }
    if let Some(offset) = args.header_offset {
        config.extract.header_offset = offset;
    }

    let input = args
        .input
        .clone()
        .unwrap_or_else(|| config.default_input.clone());
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| config.default_output.clone());

    info!(
        input = %input.display(),
        output = %output.display(),
        config = config_spec,
        "Starting conversion"
    );

    let mut report = ConversionReport::new(&input);
    match file_checksum(&input) {
        Ok(checksum) => report.set_checksum(checksum),
        Err(e) => debug!(error = %e, "Checksum unavailable"),
    }

    let produced = match grille_tfu::parse(&input, &config.extract) {
        Ok(extraction) => {
            report.record_extraction(&extraction);
            match write_json(&extraction.document, &output) {
                Ok(()) => {
                    report.set_output(&output);
                    true
                }
                Err(e) => {
                    error!(output = %output.display(), error = %e, "Failed to write document");
                    report.record_failure(format!("{:#}", e));
                    false
                }
            }
        }
        Err(e) => {
            error!(input = %input.display(), error = %e, "Conversion failed");
            report.record_failure(e.to_string());
            false
        }
    };

    report.set_duration(started.elapsed());
    report.display();

    if let Some(ref report_path) = args.report {
        report.save_to_file(report_path)?;
        info!(path = %report_path.display(), "Report saved");
    }

    info!("{}", report.summary());
    Ok(produced)
}

/// Enrichit un document de slugs
pub fn cmd_slugify(input: &Path, output: &Path) -> Result<bool> {
    let document: Document = read_json(input)?;
    let slugged = SluggedDocument::from_document(&document);
    write_json(&slugged, output)?;

    let stats = slugged.stats();
    println!("Transformation terminée: {}", output.display());
    println!("\nStatistiques:");
    println!("  - Départements: {}", stats.departements);
    println!("  - Communes: {}", stats.communes);
    println!("  - Arrondissements: {}", stats.arrondissements);
    println!("  - Catégories: {}", stats.categories);

    println!("\nExemple de slugs:");
    for (level, name, slug) in slugged.preview(3) {
        println!("  {}: \"{}\" → \"{}\"", level, name, slug);
    }

    Ok(true)
}

/// Exporte les vues de sélection
pub fn cmd_export(input: &Path, output: &Path) -> Result<bool> {
    info!(input = %input.display(), output = %output.display(), "Export des vues");

    let slugged: SluggedDocument = read_json(input)?;
    let written = views::export_all(&slugged, output)?;

    for path in &written {
        println!("Écrit: {}", path.display());
    }
    Ok(true)
}

/// Recherche un tarif et calcule la TFU d'un bâtiment si une surface est donnée
pub fn cmd_tarif(args: &TarifArgs) -> Result<bool> {
    let slugged: SluggedDocument = read_json(&args.input)?;

    let Some(tariff) = find_rate(
        &slugged,
        &args.departement,
        &args.commune,
        &args.arrondissement,
        &args.categorie,
    ) else {
        warn!(
            departement = %args.departement,
            commune = %args.commune,
            arrondissement = %args.arrondissement,
            categorie = %args.categorie,
            "No rate found"
        );
        println!("Aucun tarif trouvé");
        return Ok(false);
    };

    println!("Catégorie: {}", tariff.description);
    println!("TFU par m²: {}", tariff.tfu_par_m2);
    println!("TFU minimum: {}", tariff.tfu_minimum);

    if let Some(surface) = args.surface {
        let building = building_tfu(surface, tariff)?;
        println!("\nSurface: {} m²", building.surface);
        println!("Montant calculé: {}", building.computed);
        println!(
            "Montant retenu: {}{}",
            building.retained,
            if building.minimum_applied {
                " (minimum appliqué)"
            } else {
                ""
            }
        );
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use grille_tfu::{extract, ExtractOptions, Grid};

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("tfu_json_cli_{}", name))
    }

    fn write_document(path: &Path) {
        let grid = Grid::from_text(&[
            &["", "", "", "Bâtiments", "", "Bâtiments"],
            &["", "", "", "Tôle", "", "Dalle R+1"],
            &["ATLANTIQUE", "Abomey-Calavi", "Godomey", "100", "5000", "150", "8000"],
            &["", "", "Togba", "80", "4000", "120", "6000"],
        ]);
        let extraction = extract(&grid, "grille.xlsx", &ExtractOptions::default()).unwrap();
        write_json(&extraction.document, path).unwrap();
    }

    #[test]
    fn test_convert_fixture_workbook() {
        let input = Path::new(env!("CARGO_MANIFEST_DIR")).join("../fixtures/grille.xlsx");
        let output = temp_path("fixture_output.json");
        let report_path = temp_path("fixture_report.json");

        let args = ConvertArgs {
            input: Some(input),
            output: Some(output.clone()),
            report: Some(report_path.clone()),
            ..Default::default()
        };
        assert!(cmd_convert(&args).unwrap());

        let content = std::fs::read_to_string(&output).unwrap();
        assert!(content.contains("\"Bâtiments à toiture tôle\""));
        assert!(content.contains("\"Rez-de-chaussée\""));
        assert!(!content.contains("\\u00"));

        let document: Document = read_json(&output).unwrap();
        assert_eq!(document.departments.len(), 2);
        assert_eq!(document.departments[0].communes[0].districts[1].name, "Founougo");

        let report: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
        assert_eq!(report["status"], "Success");
        assert_eq!(report["arrondissements"], 4);
        assert_eq!(report["checksum"].as_str().map(str::len), Some(64));

        std::fs::remove_file(output).ok();
        std::fs::remove_file(report_path).ok();
    }

    #[test]
    fn test_convert_missing_input_is_no_result() {
        let report_path = temp_path("missing_report.json");
        let output = temp_path("missing_output.json");
        std::fs::remove_file(&output).ok();

        let args = ConvertArgs {
            input: Some(PathBuf::from("nonexistent.xlsx")),
            output: Some(output.clone()),
            report: Some(report_path.clone()),
            ..Default::default()
        };

        assert!(!cmd_convert(&args).unwrap());
        assert!(!output.exists());

        let report: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
        assert_eq!(report["status"], "Failed");
        assert!(report["error"].is_string());

        std::fs::remove_file(report_path).ok();
    }

    #[test]
    fn test_convert_unknown_preset() {
        let args = ConvertArgs {
            config: Some("full".to_string()),
            ..Default::default()
        };
        assert!(cmd_convert(&args).is_err());
    }

    #[test]
    fn test_slugify_export_tarif() {
        let document = temp_path("document.json");
        let slugged = temp_path("slugs.json");
        let views_dir = temp_path("views");
        write_document(&document);

        assert!(cmd_slugify(&document, &slugged).unwrap());
        let content = std::fs::read_to_string(&slugged).unwrap();
        assert!(content.contains("\"abomey_calavi\""));
        assert!(content.contains("\"dalle_r1\""));

        assert!(cmd_export(&slugged, &views_dir).unwrap());
        assert!(views_dir.join("all_slugs_flat.json").exists());

        let mut args = TarifArgs {
            input: slugged.clone(),
            departement: "atlantique".to_string(),
            commune: "abomey_calavi".to_string(),
            arrondissement: "togba".to_string(),
            categorie: "dalle_r1".to_string(),
            surface: Some(10.0),
        };
        assert!(cmd_tarif(&args).unwrap());

        args.arrondissement = "cotonou".to_string();
        assert!(!cmd_tarif(&args).unwrap());

        args.arrondissement = "togba".to_string();
        args.surface = Some(-5.0);
        assert!(cmd_tarif(&args).is_err());

        std::fs::remove_file(document).ok();
        std::fs::remove_file(slugged).ok();
        std::fs::remove_dir_all(views_dir).ok();
    }
}
