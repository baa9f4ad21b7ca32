//! Slugs (identifiants ASCII) et document enrichi pour l'application
//!
//! Le document enrichi ne garde que ce que l'application consulte: les noms,
//! leurs slugs, et pour chaque tarif la description et son slug.

use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::types::{amount_or_nan, Document};

fn forbidden_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-z0-9\s_]").expect("valid regex"))
}

fn whitespace_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"))
}

fn underscore_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"_+").expect("valid regex"))
}

/// Crée un slug: minuscules, sans accents, `-` et espaces remplacés par `_`
///
/// ```
/// assert_eq!(grille_tfu::slug::create_slug("Abomey-Calavi"), "abomey_calavi");
/// ```
pub fn create_slug(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped: String = lowered
        .nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .map(|c| if c == '-' { '_' } else { c })
        .collect();

    let cleaned = forbidden_chars().replace_all(&stripped, "");
    let spaced = whitespace_runs().replace_all(cleaned.trim(), "_");
    underscore_runs().replace_all(&spaced, "_").into_owned()
}

/// Tarif enrichi (sans nom de catégorie)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SluggedTariff {
    pub description: String,
    pub slug_description: String,
    #[serde(deserialize_with = "amount_or_nan")]
    pub tfu_par_m2: f64,
    #[serde(deserialize_with = "amount_or_nan")]
    pub tfu_minimum: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SluggedDistrict {
    pub nom: String,
    pub slug: String,
    pub tarifs: IndexMap<String, SluggedTariff>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SluggedCommune {
    pub nom: String,
    pub slug: String,
    pub arrondissements: Vec<SluggedDistrict>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SluggedDepartment {
    pub nom: String,
    pub slug: String,
    pub communes: Vec<SluggedCommune>,
}

/// Document enrichi de slugs
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SluggedDocument {
    pub departements: Vec<SluggedDepartment>,
}

/// Statistiques d'un document enrichi
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SlugStats {
    pub departements: usize,
    pub communes: usize,
    pub arrondissements: usize,
    /// Nombre total d'entrées tarifaires
    pub categories: usize,
}

impl SluggedDocument {
    /// Enrichit un document de slugs (ordre et contenu conservés)
    pub fn from_document(document: &Document) -> Self {
        let departements = document
            .departments
            .iter()
            .map(|dept| SluggedDepartment {
                nom: dept.name.clone(),
                slug: create_slug(&dept.name),
                communes: dept
                    .communes
                    .iter()
                    .map(|commune| SluggedCommune {
                        nom: commune.name.clone(),
                        slug: create_slug(&commune.name),
                        arrondissements: commune
                            .districts
                            .iter()
                            .map(|district| SluggedDistrict {
                                nom: district.name.clone(),
                                slug: create_slug(&district.name),
                                tarifs: district
                                    .tariffs
                                    .iter()
                                    .map(|(id, entry)| {
                                        (
                                            id.clone(),
                                            SluggedTariff {
                                                description: entry.description.clone(),
                                                slug_description: create_slug(&entry.description),
                                                tfu_par_m2: entry.rate_per_area,
                                                tfu_minimum: entry.minimum_rate,
                                            },
                                        )
                                    })
                                    .collect(),
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect();

        Self { departements }
    }

    pub fn stats(&self) -> SlugStats {
        let mut stats = SlugStats {
            departements: self.departements.len(),
            ..Default::default()
        };
        for dept in &self.departements {
            stats.communes += dept.communes.len();
            for commune in &dept.communes {
                stats.arrondissements += commune.arrondissements.len();
                stats.categories += commune
                    .arrondissements
                    .iter()
                    .map(|a| a.tarifs.len())
                    .sum::<usize>();
            }
        }
        stats
    }

    /// Lignes d'aperçu `(niveau, nom, slug)` jusqu'à `limit` arrondissements
    pub fn preview(&self, limit: usize) -> Vec<(&'static str, &str, &str)> {
        let mut lines = Vec::new();
        let mut count = 0;

        'outer: for dept in &self.departements {
            if count >= limit {
                break;
            }
            lines.push(("Département", dept.nom.as_str(), dept.slug.as_str()));
            for commune in &dept.communes {
                if count >= limit {
                    break 'outer;
                }
                lines.push(("Commune", commune.nom.as_str(), commune.slug.as_str()));
                for arr in &commune.arrondissements {
                    if count >= limit {
                        break 'outer;
                    }
                    lines.push(("Arrondissement", arr.nom.as_str(), arr.slug.as_str()));
                    count += 1;
                }
            }
        }

        lines
    }
}
