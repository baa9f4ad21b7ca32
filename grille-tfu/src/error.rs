//! Types d'erreurs pour le crate grille-tfu

use thiserror::Error;

/// Erreurs pouvant survenir lors de l'extraction d'une grille tarifaire
#[derive(Debug, Error)]
pub enum GrilleError {
    /// Erreur d'I/O lors de la lecture du classeur
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Classeur illisible ou format non supporté
    #[error("Cannot read workbook {path}: {reason}")]
    Workbook { path: String, reason: String },

    /// Feuille demandée absente du classeur
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// Le classeur ne contient aucune feuille
    #[error("Workbook has no sheet")]
    EmptyWorkbook,

    /// Moins de deux lignes d'en-tête dans la grille
    #[error("Expected two header rows, found {found}")]
    MissingHeader { found: usize },

    /// Cellule numérique illisible (récupérée localement par l'extracteur)
    #[error("Malformed numeric cell: {0:?}")]
    MalformedNumber(String),
}

impl GrilleError {
    /// Crée une erreur de lecture de classeur avec contexte
    pub fn workbook(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Workbook {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
