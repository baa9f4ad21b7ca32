//! Analyse des deux lignes d'en-tête (catégories de bâtiments)

use tracing::{debug, info};

use crate::grid::CellValue;
use crate::types::{CategoryDescriptor, HeaderLayout, HeaderMode};

/// Sous-chaîne identifiant une colonne de catégorie dans la ligne 0
pub const CATEGORY_MARKER: &str = "Bâtiments";

/// Première colonne de données (0 à 2: département, commune, arrondissement)
pub const FIRST_DATA_COLUMN: usize = 3;

/// Catégories utilisées quand l'en-tête ne contient aucun marqueur
pub const FALLBACK_CATEGORIES: [&str; 4] = [
    "Bâtiments à toiture tôle et assimilés - Rez-de-chaussée",
    "Bâtiments à toiture tôle - Rez-de-chaussée et 1 ou 2 niveaux",
    "Bâtiments à toiture tôle - Rez-de-chaussée et 3 ou 4 niveaux",
    "Bâtiments à toiture tôle - Rez-de-chaussée et 5 niveaux ou plus",
];

/// Détecte les catégories à partir des lignes 0 (libellés) et 1 (descriptions)
///
/// Chaque colonne de la ligne 0 contenant `marker` ouvre une catégorie occupant
/// deux colonnes (tarif au m², tarif minimum). Sans aucune détection, les
/// catégories `fallback` sont placées aux colonnes `3 + 2k` / `4 + 2k`.
pub fn analyze(
    header: &[CellValue],
    sub_header: &[CellValue],
    marker: &str,
    fallback: &[String],
) -> HeaderLayout {
    let mut categories = Vec::new();
    let mut i = FIRST_DATA_COLUMN;

    while i < header.len() {
        let label = header[i].text();
        if label.contains(marker) {
            let description = sub_header.get(i).map(CellValue::text).unwrap_or_default();
            debug!(column = i, name = %label, "Category column");
            categories.push(CategoryDescriptor {
                id: CategoryDescriptor::id_for(categories.len()),
                name: label,
                description,
                rate_column: i,
                min_column: i + 1,
            });
            i += 2;
        } else {
            i += 1;
        }
    }

    if !categories.is_empty() {
        info!(count = categories.len(), "Categories detected from header");
        return HeaderLayout {
            mode: HeaderMode::Detected,
            categories,
        };
    }

    info!(
        count = fallback.len(),
        "No category marker in header, using fixed column layout"
    );
    let categories = fallback
        .iter()
        .enumerate()
        .map(|(k, name)| CategoryDescriptor {
            id: CategoryDescriptor::id_for(k),
            name: name.clone(),
            description: format!("Catégorie {}", k + 1),
            rate_column: FIRST_DATA_COLUMN + 2 * k,
            min_column: FIRST_DATA_COLUMN + 1 + 2 * k,
        })
        .collect();

    HeaderLayout {
        mode: HeaderMode::Fallback,
        categories,
    }
}

/// Noms des catégories de repli par défaut
pub fn default_fallback() -> Vec<String> {
    FALLBACK_CATEGORIES.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<CellValue> {
        cells.iter().map(|&s| CellValue::from(s)).collect()
    }

    #[test]
    fn test_detects_marker_columns() {
        let header = row(&[
            "DEPARTEMENTS",
            "COMMUNES",
            "Arrondissements",
            "Bâtiments RDC",
            "x",
            "y",
            "Bâtiments R+1",
            "",
        ]);
        let sub = row(&["", "", "", "Cat A", "", "", "Cat B", ""]);

        let layout = analyze(&header, &sub, CATEGORY_MARKER, &default_fallback());

        assert_eq!(layout.mode, HeaderMode::Detected);
        assert_eq!(layout.categories.len(), 2);
        assert_eq!(layout.categories[0].id, "Categorie_01");
        assert_eq!(layout.categories[1].id, "Categorie_02");
        assert_eq!(
            (layout.categories[0].rate_column, layout.categories[0].min_column),
            (3, 4)
        );
        assert_eq!(
            (layout.categories[1].rate_column, layout.categories[1].min_column),
            (6, 7)
        );
        assert_eq!(layout.categories[0].name, "Bâtiments RDC");
        assert_eq!(layout.categories[1].description, "Cat B");
    }

    #[test]
    fn test_marker_in_label_columns_is_ignored() {
        let header = row(&["Bâtiments", "Bâtiments", "Bâtiments", "", ""]);
        let layout = analyze(&header, &[], CATEGORY_MARKER, &default_fallback());
        assert_eq!(layout.mode, HeaderMode::Fallback);
    }

    #[test]
    fn test_fallback_layout() {
        let header = row(&["DEP", "COM", "ARR", "TFU", "MIN"]);
        let sub = row(&["", "", "", "m2", "min"]);

        let layout = analyze(&header, &sub, CATEGORY_MARKER, &default_fallback());

        assert_eq!(layout.mode, HeaderMode::Fallback);
        let columns: Vec<_> = layout
            .categories
            .iter()
            .map(|c| (c.rate_column, c.min_column))
            .collect();
        assert_eq!(columns, vec![(3, 4), (5, 6), (7, 8), (9, 10)]);
        assert_eq!(layout.categories[3].id, "Categorie_04");
        assert_eq!(layout.categories[2].description, "Catégorie 3");
        assert_eq!(layout.categories[0].name, FALLBACK_CATEGORIES[0]);
    }

    #[test]
    fn test_blank_header_falls_back() {
        let layout = analyze(&[], &[], CATEGORY_MARKER, &default_fallback());
        assert_eq!(layout.mode, HeaderMode::Fallback);
        assert_eq!(layout.categories.len(), 4);
    }

    #[test]
    fn test_missing_description_is_empty() {
        let header = row(&["", "", "", "Bâtiments en dur"]);
        let layout = analyze(&header, &row(&["", ""]), CATEGORY_MARKER, &default_fallback());
        assert_eq!(layout.categories.len(), 1);
        assert_eq!(layout.categories[0].description, "");
        assert_eq!(layout.categories[0].min_column, 4);
    }
}
