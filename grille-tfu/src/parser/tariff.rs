//! Extraction des tarifs (TFU au m², TFU minimum) d'une ligne

use std::borrow::Cow;

use tracing::debug;

use crate::grid::{CellValue, MISSING_MARKER};
use crate::types::{CategoryDescriptor, TariffEntry, Tariffs};
use crate::GrilleError;

/// Tarifs extraits d'une ligne avec les récupérations effectuées
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowTariffs {
    pub tariffs: Tariffs,
    /// Paires remises à zéro (cellule illisible)
    pub malformed: usize,
    /// Catégories omises (colonnes au-delà de la ligne)
    pub omitted: usize,
}

/// Extrait les tarifs de chaque catégorie pour une ligne de données
///
/// Une catégorie dont l'une des deux colonnes dépasse la ligne est omise.
/// Si l'une des deux cellules est illisible, les deux valeurs valent 0.
pub fn extract(row: &[CellValue], categories: &[CategoryDescriptor]) -> RowTariffs {
    let mut result = RowTariffs::default();

    for category in categories {
        let (Some(rate_cell), Some(min_cell)) =
            (row.get(category.rate_column), row.get(category.min_column))
        else {
            result.omitted += 1;
            continue;
        };

        let (rate_per_area, minimum_rate) = match parse_pair(rate_cell, min_cell) {
            Ok(pair) => pair,
            Err(e) => {
                debug!(category = %category.id, error = %e, "Unreadable tariff pair, zeroed");
                result.malformed += 1;
                (0.0, 0.0)
            }
        };

        debug!(
            category = %category.id,
            tfu_m2 = rate_per_area,
            tfu_min = minimum_rate,
            "Tariff"
        );

        result.tariffs.insert(
            category.id.clone(),
            TariffEntry {
                category_name: category.name.clone(),
                description: category.description.clone(),
                rate_per_area,
                minimum_rate,
            },
        );
    }

    result
}

/// Lit une paire (tarif au m², tarif minimum); échoue si l'une des deux échoue
pub fn parse_pair(rate: &CellValue, minimum: &CellValue) -> Result<(f64, f64), GrilleError> {
    Ok((parse_amount(rate)?, parse_amount(minimum)?))
}

/// Lit un montant: marqueur manquant → "0", vide ou "0" → 0, sinon tout nombre
/// flottant lisible (négatif ou infini compris)
pub fn parse_amount(cell: &CellValue) -> Result<f64, GrilleError> {
    let text = cell.text().replace(MISSING_MARKER, "0");
    let text = text.trim();

    if text.is_empty() || text == "0" {
        return Ok(0.0);
    }

    strip_digit_separators(text)
        .and_then(|digits| fast_float::parse::<f64, _>(digits.as_bytes()).ok())
        .ok_or_else(|| GrilleError::MalformedNumber(text.to_string()))
}

/// Retire les `_` placés entre deux chiffres (`1_000`); `None` si un `_` est
/// mal placé
fn strip_digit_separators(text: &str) -> Option<Cow<'_, str>> {
    if !text.contains('_') {
        return Some(Cow::Borrowed(text));
    }

    let bytes = text.as_bytes();
    let mut digits = String::with_capacity(text.len());
    for (i, c) in text.char_indices() {
        if c == '_' {
            let before = i.checked_sub(1).map(|j| bytes[j]);
            let after = bytes.get(i + 1).copied();
            if !matches!((before, after), (Some(b), Some(a)) if b.is_ascii_digit() && a.is_ascii_digit()) {
                return None;
            }
        } else {
            digits.push(c);
        }
    }
    Some(Cow::Owned(digits))
}
