//! Résolution des libellés géographiques avec report des valeurs (forward-fill)

use crate::grid::CellValue;

const DEPARTMENT_COLUMN: usize = 0;
const COMMUNE_COLUMN: usize = 1;
const DISTRICT_COLUMN: usize = 2;

/// Libellés effectifs d'une ligne de données
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowLabels {
    pub department: String,
    pub commune: String,
    /// Vide si la cellule est vide (jamais reporté)
    pub district: String,
}

/// Classificateur de lignes: conserve le dernier département et la dernière
/// commune non vides vus.
#[derive(Debug, Default)]
pub struct RowClassifier {
    last_department: Option<String>,
    last_commune: Option<String>,
}

impl RowClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Résout les libellés d'une ligne
    ///
    /// Retourne `None` si aucun département ou aucune commune n'est connu à ce
    /// stade. L'état est mis à jour avant ce test et n'est jamais réinitialisé.
    pub fn classify(&mut self, row: &[CellValue]) -> Option<RowLabels> {
        if let Some(department) = label_at(row, DEPARTMENT_COLUMN) {
            self.last_department = Some(department);
        }
        if let Some(commune) = label_at(row, COMMUNE_COLUMN) {
            self.last_commune = Some(commune);
        }

        let department = self.last_department.clone()?;
        let commune = self.last_commune.clone()?;
        let district = label_at(row, DISTRICT_COLUMN).unwrap_or_default();

        Some(RowLabels {
            department,
            commune,
            district,
        })
    }

    pub fn last_department(&self) -> Option<&str> {
        self.last_department.as_deref()
    }

    pub fn last_commune(&self) -> Option<&str> {
        self.last_commune.as_deref()
    }
}

fn label_at(row: &[CellValue], column: usize) -> Option<String> {
    row.get(column)
        .filter(|cell| !cell.is_blank())
        .map(CellValue::text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<CellValue> {
        cells.iter().map(|&s| CellValue::from(s)).collect()
    }

    fn labels(d: &str, c: &str, a: &str) -> RowLabels {
        RowLabels {
            department: d.into(),
            commune: c.into(),
            district: a.into(),
        }
    }

    #[test]
    fn test_forward_fill() {
        let mut classifier = RowClassifier::new();
        let resolved: Vec<_> = [
            row(&["A", "X", "1", "10"]),
            row(&["", "", "2", "10"]),
            row(&["B", "Y", "1", "10"]),
        ]
        .iter()
        .map(|r| classifier.classify(r))
        .collect();

        assert_eq!(
            resolved,
            vec![
                Some(labels("A", "X", "1")),
                Some(labels("A", "X", "2")),
                Some(labels("B", "Y", "1")),
            ]
        );
    }

    #[test]
    fn test_district_not_forward_filled() {
        let mut classifier = RowClassifier::new();
        classifier.classify(&row(&["A", "X", "Centre"]));
        let second = classifier.classify(&row(&["", "", ""])).unwrap();
        assert_eq!(second.district, "");
    }

    #[test]
    fn test_nan_marker_is_blank() {
        let mut classifier = RowClassifier::new();
        classifier.classify(&row(&["A", "X", "1"]));
        let resolved = classifier.classify(&row(&["nan", "nan", "nan"])).unwrap();
        assert_eq!(resolved, labels("A", "X", ""));
    }

    #[test]
    fn test_row_without_department_is_skipped() {
        let mut classifier = RowClassifier::new();

        assert_eq!(classifier.classify(&row(&["", "X", "1"])), None);
        assert_eq!(classifier.last_department(), None);
        assert_eq!(classifier.last_commune(), Some("X"));

        let resolved = classifier.classify(&row(&["A", "", "2"])).unwrap();
        assert_eq!(resolved, labels("A", "X", "2"));
    }

    #[test]
    fn test_skip_keeps_state() {
        let mut classifier = RowClassifier::new();
        assert_eq!(classifier.classify(&row(&["A", "", "1"])), None);
        assert_eq!(classifier.last_department(), Some("A"));
        assert_eq!(classifier.last_commune(), None);

        assert_eq!(classifier.classify(&row(&["", "", "2"])), None);
        assert_eq!(classifier.last_department(), Some("A"));

        let resolved = classifier.classify(&row(&["", "Y", "3"])).unwrap();
        assert_eq!(resolved, labels("A", "Y", "3"));
    }

    #[test]
    fn test_short_row() {
        let mut classifier = RowClassifier::new();
        classifier.classify(&row(&["A", "X"]));
        let resolved = classifier.classify(&[]).unwrap();
        assert_eq!(resolved, labels("A", "X", ""));
    }
}
