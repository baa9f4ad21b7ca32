//! Vues dérivées du document enrichi (listes de sélection de l'application)

use std::path::{Path, PathBuf};

use anyhow::Result;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::info;

use grille_tfu::SluggedDocument;

use super::json::write_json;

/// Table clé → valeur dans l'ordre de première insertion.
///
/// Une clé déjà présente voit sa valeur remplacée sur place.
pub type OrderedMap<V> = IndexMap<String, V>;

/// Libellé bilingue (le nom source est repris pour les deux langues)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    pub fr: String,
    pub en: String,
}

/// Option de liste de sélection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: Label,
}

impl SelectOption {
    fn new(slug: &str, name: &str) -> Self {
        Self {
            value: slug.to_string(),
            label: Label {
                fr: name.to_string(),
                en: name.to_string(),
            },
        }
    }
}

/// Communes de chaque département, indexées par slug de département
pub fn communes_by_departement(doc: &SluggedDocument) -> OrderedMap<Vec<SelectOption>> {
    let mut result = OrderedMap::default();
    for dept in &doc.departements {
        let options = dept
            .communes
            .iter()
            .map(|c| SelectOption::new(&c.slug, &c.nom))
            .collect();
        result.insert(dept.slug.clone(), options);
    }
    result
}

/// Arrondissements de chaque commune, indexés par slug de commune
pub fn arrondissements_by_commune(doc: &SluggedDocument) -> OrderedMap<Vec<SelectOption>> {
    let mut result = OrderedMap::default();
    for commune in doc.departements.iter().flat_map(|d| &d.communes) {
        let options = commune
            .arrondissements
            .iter()
            .map(|a| SelectOption::new(&a.slug, &a.nom))
            .collect();
        result.insert(commune.slug.clone(), options);
    }
    result
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistrictLocation {
    pub nom: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommuneLocation {
    pub nom: String,
    pub slug: String,
    pub arrondissements: Vec<DistrictLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentLocation {
    pub nom: String,
    pub slug: String,
    pub communes: Vec<CommuneLocation>,
}

/// Arbre des localisations sans les tarifs
pub fn locations(doc: &SluggedDocument) -> Vec<DepartmentLocation> {
    doc.departements
        .iter()
        .map(|dept| DepartmentLocation {
            nom: dept.nom.clone(),
            slug: dept.slug.clone(),
            communes: dept
                .communes
                .iter()
                .map(|commune| CommuneLocation {
                    nom: commune.nom.clone(),
                    slug: commune.slug.clone(),
                    arrondissements: commune
                        .arrondissements
                        .iter()
                        .map(|arr| DistrictLocation {
                            nom: arr.nom.clone(),
                            slug: arr.slug.clone(),
                        })
                        .collect(),
                })
                .collect(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelValue {
    pub label: String,
    pub value: String,
}

/// Listes à plat, dédoublonnées par slug
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlatSlugs {
    pub departements: Vec<LabelValue>,
    pub communes: Vec<LabelValue>,
    pub arrondissements: Vec<LabelValue>,
    /// Catégories issues des descriptions de tarifs
    pub categories: Vec<LabelValue>,
}

pub fn flat_slugs(doc: &SluggedDocument) -> FlatSlugs {
    let mut departements = OrderedMap::default();
    let mut communes = OrderedMap::default();
    let mut arrondissements = OrderedMap::default();
    let mut categories = OrderedMap::default();

    let entry = |label: &str, value: &str| LabelValue {
        label: label.to_string(),
        value: value.to_string(),
    };

    for dept in &doc.departements {
        departements.insert(dept.slug.clone(), entry(&dept.nom, &dept.slug));

        for commune in &dept.communes {
            communes.insert(commune.slug.clone(), entry(&commune.nom, &commune.slug));

            for arr in &commune.arrondissements {
                arrondissements.insert(arr.slug.clone(), entry(&arr.nom, &arr.slug));

                for tariff in arr.tarifs.values() {
                    if tariff.description.is_empty() || tariff.slug_description.is_empty() {
                        continue;
                    }
                    categories.insert(
                        tariff.slug_description.clone(),
                        entry(&tariff.description, &tariff.slug_description),
                    );
                }
            }
        }
    }

    FlatSlugs {
        departements: departements.into_values().collect(),
        communes: communes.into_values().collect(),
        arrondissements: arrondissements.into_values().collect(),
        categories: categories.into_values().collect(),
    }
}

/// Écrit les quatre vues dans `output_dir` et retourne les chemins écrits
pub fn export_all(doc: &SluggedDocument, output_dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)?;

    let communes_path = output_dir.join("communes_by_departement.json");
    write_json(&communes_by_departement(doc), &communes_path)?;

    let arrondissements_path = output_dir.join("arrondissements_by_commune.json");
    write_json(&arrondissements_by_commune(doc), &arrondissements_path)?;

    let locations_path = output_dir.join("locations_with_slugs.json");
    write_json(&locations(doc), &locations_path)?;

    let flat_path = output_dir.join("all_slugs_flat.json");
    write_json(&flat_slugs(doc), &flat_path)?;

    let written = vec![communes_path, arrondissements_path, locations_path, flat_path];
    for path in &written {
        info!(path = %path.display(), "View exported");
    }

    Ok(written)
}
