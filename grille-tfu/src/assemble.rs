//! Construction de l'arbre département > commune > arrondissement
//!
//! Les nœuds sont stockés dans des `Vec` (ordre de première apparition) et
//! retrouvés par nom via des index auxiliaires.

use std::collections::HashMap;

use crate::types::{Commune, Department, District, Tariffs};

/// Nom d'un arrondissement vide à la création de sa commune
pub const MAIN_ZONE: &str = "Zone principale";

/// Assembleur de l'arbre, alimenté ligne par ligne
#[derive(Debug, Default)]
pub struct TreeAssembler {
    departments: Vec<Department>,
    department_index: HashMap<String, usize>,
    /// (index du département, nom de commune) -> index de la commune
    commune_index: HashMap<(usize, String), usize>,
}

impl TreeAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ajoute un arrondissement, en réutilisant département et commune
    /// existants (correspondance exacte du nom).
    pub fn push(&mut self, department: &str, commune: &str, district: &str, tariffs: Tariffs) {
        let dept_idx = match self.department_index.get(department) {
            Some(&idx) => idx,
            None => {
                self.departments.push(Department {
                    name: department.to_string(),
                    communes: Vec::new(),
                });
                let idx = self.departments.len() - 1;
                self.department_index.insert(department.to_string(), idx);
                idx
            }
        };

        let key = (dept_idx, commune.to_string());
        let communes = &mut self.departments[dept_idx].communes;
        let commune_idx = match self.commune_index.get(&key) {
            Some(&idx) => idx,
            None => {
                communes.push(Commune {
                    name: commune.to_string(),
                    districts: Vec::new(),
                });
                let idx = communes.len() - 1;
                self.commune_index.insert(key, idx);
                idx
            }
        };

        let districts = &mut communes[commune_idx].districts;
        let name = if district.is_empty() {
            zone_label(districts.len())
        } else {
            district.to_string()
        };
        districts.push(District { name, tariffs });
    }

    pub fn departments(&self) -> &[Department] {
        &self.departments
    }

    /// Termine l'assemblage et rend les départements dans l'ordre d'insertion
    pub fn finish(self) -> Vec<Department> {
        self.departments
    }
}

/// Libellé synthétique d'un arrondissement sans nom
///
/// `existing` est le nombre d'arrondissements déjà présents dans la commune.
pub fn zone_label(existing: usize) -> String {
    if existing == 0 {
        MAIN_ZONE.to_string()
    } else {
        format!("Zone {}", existing + 1)
    }
}
