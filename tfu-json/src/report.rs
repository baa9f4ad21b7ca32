//! Rapport de conversion
//!
//! Les compteurs décrivent les récupérations silencieuses de l'extraction
//! (lignes ignorées, montants illisibles, colonnes absentes). Le rapport est
//! purement informatif: il ne modifie jamais le document produit.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use serde::Serialize;

use grille_tfu::{Document, Extraction, ExtractionStats, HeaderMode};

/// Statut global de la conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConversionStatus {
    /// Document produit
    Success,
    /// Aucun résultat
    Failed,
}

/// Aperçu du premier département / commune / arrondissement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Preview {
    pub departement: String,
    pub commune: Option<String>,
    pub arrondissement: Option<String>,
    /// Nombre de catégories tarifaires du premier arrondissement
    pub tarifs: Option<usize>,
}

impl Preview {
    pub fn from_document(document: &Document) -> Option<Self> {
        let dept = document.departments.first()?;
        let commune = dept.communes.first();
        let district = commune.and_then(|c| c.districts.first());

        Some(Self {
            departement: dept.name.clone(),
            commune: commune.map(|c| c.name.clone()),
            arrondissement: district.map(|d| d.name.clone()),
            tarifs: district.map(|d| d.tariffs.len()),
        })
    }
}

/// Rapport complet de conversion
#[derive(Debug, Clone, Serialize)]
pub struct ConversionReport {
    /// Classeur source
    pub source: String,
    /// Empreinte blake3 du classeur (hex)
    pub checksum: Option<String>,
    /// Fichier JSON écrit
    pub output: Option<String>,
    pub status: ConversionStatus,
    pub duration_secs: f64,

    pub header_mode: Option<HeaderMode>,
    pub stats: ExtractionStats,

    pub departements: usize,
    pub communes: usize,
    pub arrondissements: usize,
    pub categories: usize,

    pub preview: Option<Preview>,

    /// Cause de l'échec
    pub error: Option<String>,
}

impl ConversionReport {
    /// Crée un rapport vide pour un classeur
    pub fn new(source: &Path) -> Self {
        Self {
            source: source.display().to_string(),
            checksum: None,
            output: None,
            status: ConversionStatus::Failed,
            duration_secs: 0.0,
            header_mode: None,
            stats: ExtractionStats::default(),
            departements: 0,
            communes: 0,
            arrondissements: 0,
            categories: 0,
            preview: None,
            error: None,
        }
    }

    /// Enregistre une extraction réussie
    pub fn record_extraction(&mut self, extraction: &Extraction) {
        let document = &extraction.document;
        self.status = ConversionStatus::Success;
        self.header_mode = Some(extraction.mode);
        self.stats = extraction.stats;
        self.departements = document.departments.len();
        self.communes = document.commune_count();
        self.arrondissements = document.district_count();
        self.categories = document.metadata.categories.len();
        self.preview = Preview::from_document(document);
    }

    /// Enregistre l'échec de la conversion
    pub fn record_failure(&mut self, message: impl Into<String>) {
        self.status = ConversionStatus::Failed;
        self.error = Some(message.into());
    }

    pub fn set_output(&mut self, output: &Path) {
        self.output = Some(output.display().to_string());
    }

    pub fn set_checksum(&mut self, checksum: String) {
        self.checksum = Some(checksum);
    }

    /// Définit la durée de la conversion
    pub fn set_duration(&mut self, duration: Duration) {
        self.duration_secs = duration.as_secs_f64();
    }

    pub fn is_success(&self) -> bool {
        self.status == ConversionStatus::Success
    }

    /// Affiche le rapport sur la console
    pub fn display(&self) {
        println!("\n{}", "=".repeat(60));
        println!("CONVERSION REPORT - {}", self.source);
        println!("{}", "=".repeat(60));

        println!("\nStatus: {:?}", self.status);
        println!("Duration: {:.2}s", self.duration_secs);
        if let Some(ref checksum) = self.checksum {
            println!("Checksum: {}", checksum);
        }

        if let Some(ref error) = self.error {
            println!("\nErreur lors du traitement: {}", error);
            println!("Aucun résultat produit");
            println!("\n{}", "=".repeat(60));
            return;
        }

        println!("\n=== STATISTIQUES ===");
        println!("Départements traités: {}", self.departements);
        println!("Communes traitées: {}", self.communes);
        println!("Arrondissements traités: {}", self.arrondissements);
        println!(
            "Catégories de bâtiments: {} ({:?})",
            self.categories,
            self.header_mode.unwrap_or(HeaderMode::Fallback)
        );
        println!(
            "Lignes: {} lues, {} traitées, {} ignorées",
            self.stats.rows_read, self.stats.rows_processed, self.stats.rows_skipped
        );
        if self.stats.malformed_pairs > 0 || self.stats.omitted_tariffs > 0 {
            println!(
                "Tarifs: {} paires illisibles remises à 0, {} omis (colonnes absentes)",
                self.stats.malformed_pairs, self.stats.omitted_tariffs
            );
        }

        if let Some(ref preview) = self.preview {
            println!("\n=== APERÇU DES DONNÉES ===");
            println!("Premier département: {}", preview.departement);
            if let Some(ref commune) = preview.commune {
                println!("Première commune: {}", commune);
            }
            if let Some(ref arrondissement) = preview.arrondissement {
                println!("Premier arrondissement: {}", arrondissement);
            }
            if let Some(tarifs) = preview.tarifs {
                println!("Nombre de catégories tarifaires: {}", tarifs);
            }
        }

        if let Some(ref output) = self.output {
            println!("\nDonnées sauvegardées dans {}", output);
        }

        println!("\n{}", "=".repeat(60));
    }

    /// Sauvegarde le rapport en JSON
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Affichage compact pour le résumé
    pub fn summary(&self) -> String {
        match self.status {
            ConversionStatus::Success => format!(
                "{}: {} departements, {} communes, {} arrondissements, {} categories",
                self.source, self.departements, self.communes, self.arrondissements, self.categories
            ),
            ConversionStatus::Failed => format!(
                "{}: no result ({})",
                self.source,
                self.error.as_deref().unwrap_or("unknown error")
            ),
        }
    }
}

/// Calcule l'empreinte blake3 d'un fichier
pub fn file_checksum(path: &Path) -> Result<String> {
    use std::fs::File;
    use std::io::Read;

    let mut file = File::open(path)?;
    let mut hasher = blake3::Hasher::new();
    let mut buffer = [0u8; 65536];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize().as_bytes()))
}
