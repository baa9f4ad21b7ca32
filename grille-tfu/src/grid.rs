//! Lecture d'une feuille de calcul en grille 2D (via calamine)
//!
//! La grille est alignée sur la cellule A1: les colonnes 0 à 2 sont toujours
//! les libellés département / commune / arrondissement, même si la plage
//! utilisée de la feuille commence plus loin.

use std::fmt;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use tracing::debug;

use crate::GrilleError;

/// Marqueur de valeur manquante
pub const MISSING_MARKER: &str = "nan";

/// Valeur d'une cellule
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    /// Forme textuelle de la cellule (chaîne vide pour une cellule vide)
    pub fn text(&self) -> String {
        self.to_string()
    }

    /// Vide ou égale au marqueur de valeur manquante
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty() || s == MISSING_MARKER,
            CellValue::Number(n) => n.is_nan(),
            CellValue::Bool(_) => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Bool(true) => f.write_str("True"),
            CellValue::Bool(false) => f.write_str("False"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s.to_string())
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<&Data> for CellValue {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => CellValue::Empty,
            // Texte de l'erreur (#DIV/0!, #N/A...): illisible comme montant
            Data::Error(e) => CellValue::Text(e.to_string()),
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Float(f) => CellValue::Number(*f),
            Data::Bool(b) => CellValue::Bool(*b),
            Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        }
    }
}

/// Grille de cellules, lignes et colonnes dans l'ordre de la feuille
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    rows: Vec<Vec<CellValue>>,
}

impl Grid {
    pub fn new(rows: Vec<Vec<CellValue>>) -> Self {
        Self { rows }
    }

    /// Construit une grille à partir de libellés texte (cellule "" = vide)
    pub fn from_text(rows: &[&[&str]]) -> Self {
        Self::new(
            rows.iter()
                .map(|row| row.iter().map(|&s| CellValue::from(s)).collect())
                .collect(),
        )
    }

    /// Construit une grille depuis une plage calamine, alignée sur A1
    pub fn from_range(range: &Range<Data>) -> Self {
        let Some((start_row, start_col)) = range.start() else {
            return Self::default();
        };

        let mut rows = vec![Vec::new(); start_row as usize];
        for row in range.rows() {
            let mut cells = vec![CellValue::Empty; start_col as usize];
            cells.extend(row.iter().map(CellValue::from));
            rows.push(cells);
        }

        Self { rows }
    }

    /// Supprime les `count` premières lignes (titre de la feuille)
    pub fn skip_rows(mut self, count: usize) -> Self {
        let count = count.min(self.rows.len());
        self.rows.drain(..count);
        self
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Charge une feuille d'un classeur (xlsx, xls, ods) en grille
///
/// # Arguments
///
/// * `path` - Chemin du classeur
/// * `sheet` - Nom de la feuille (première feuille si absent)
/// * `header_offset` - Nombre de lignes de titre à ignorer avant l'en-tête
///
/// # Errors
///
/// Retourne `GrilleError::Io` si le fichier est inaccessible,
/// `GrilleError` si le classeur est illisible ou si la feuille n'existe pas. Le fichier est fermé à la sortie de la fonction dans tous les cas.
pub fn load(path: &Path, sheet: Option<&str>, header_offset: usize) -> Result<Grid, GrilleError> {
    let source = path.display().to_string();
    std::fs::metadata(path)?;
    let mut workbook =
        open_workbook_auto(path).map_err(|e| GrilleError::workbook(&source, e.to_string()))?;

    let range = match sheet {
        Some(name) => workbook
            .worksheet_range(name)
            .map_err(|_| GrilleError::SheetNotFound(name.to_string()))?,
        None => workbook
            .worksheet_range_at(0)
            .ok_or(GrilleError::EmptyWorkbook)?
            .map_err(|e| GrilleError::workbook(&source, e.to_string()))?,
    };

    let grid = Grid::from_range(&range).skip_rows(header_offset);
    debug!(path = %source, rows = grid.len(), "Grid loaded");

    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::tariff;
    use crate::types::CategoryDescriptor;
    use calamine::CellErrorType;

    #[test]
    fn test_cell_text_forms() {
        assert_eq!(CellValue::Empty.text(), "");
        assert_eq!(CellValue::Number(1500.0).text(), "1500");
        assert_eq!(CellValue::Number(12.5).text(), "12.5");
        assert_eq!(CellValue::Bool(true).text(), "True");
        assert_eq!(CellValue::from("ALIBORI").text(), "ALIBORI");
    }

    #[test]
    fn test_blank_cells() {
        assert!(CellValue::Empty.is_blank());
        assert!(CellValue::from("").is_blank());
        assert!(CellValue::from("nan").is_blank());
        assert!(!CellValue::from(" ").is_blank());
        assert!(!CellValue::from("nana").is_blank());
        assert!(!CellValue::Number(0.0).is_blank());
    }

    #[test]
    fn test_from_range_aligns_on_a1() {
        let mut range = Range::new((1, 2), (2, 3));
        range.set_value((1, 2), Data::String("B".into()));
        range.set_value((2, 3), Data::Float(4.5));

        let grid = Grid::from_range(&range);
        assert_eq!(grid.len(), 3);
        assert!(grid.rows()[0].is_empty());
        assert_eq!(grid.rows()[1][2], CellValue::Text("B".into()));
        assert_eq!(grid.rows()[1][0], CellValue::Empty);
        assert_eq!(grid.rows()[2][3], CellValue::Number(4.5));
    }

    #[test]
    fn test_skip_rows() {
        let grid = Grid::from_text(&[&["titre"], &["a"], &["b"]]).skip_rows(1);
        assert_eq!(grid.len(), 2);
        assert_eq!(grid.rows()[0][0].text(), "a");

        let grid = Grid::from_text(&[&["a"]]).skip_rows(5);
        assert!(grid.is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let result = load(Path::new("nonexistent.xlsx"), None, 1);
        assert!(matches!(result, Err(GrilleError::Io(_))));
    }

    #[test]
    fn test_error_cell_is_malformed() {
        let mut range = Range::new((0, 0), (0, 4));
        range.set_value((0, 0), Data::String("ALIBORI".into()));
        range.set_value((0, 1), Data::String("KANDI".into()));
        range.set_value((0, 3), Data::Error(CellErrorType::Div0));
        range.set_value((0, 4), Data::Float(3000.0));

        let grid = Grid::from_range(&range);
        let row = &grid.rows()[0];
        assert_eq!(row[3], CellValue::Text("#DIV/0!".into()));
        assert!(!row[3].is_blank());

        let category = CategoryDescriptor {
            id: CategoryDescriptor::id_for(0),
            name: "Bâtiments".into(),
            description: "Tôle".into(),
            rate_column: 3,
            min_column: 4,
        };
        let result = tariff::extract(row, &[category]);
        let entry = &result.tariffs["Categorie_01"];
        assert_eq!((entry.rate_per_area, entry.minimum_rate), (0.0, 0.0));
        assert_eq!(result.malformed, 1);
    }
}
