//! Recherche d'un tarif par slugs et calcul de la TFU d'un bâtiment / d'une parcelle

use grille_tfu::slug::{SluggedDocument, SluggedTariff};
use serde::Serialize;
use thiserror::Error;

/// Montant forfaitaire par piscine (FCFA)
pub const POOL_AMOUNT: f64 = 30_000.0;

#[derive(Debug, Error, PartialEq)]
pub enum EstimateError {
    #[error("Surface cannot be negative: {0}")]
    NegativeSurface(f64),

    #[error("Pool count cannot be negative: {0}")]
    NegativePools(i64),

    #[error("No building given for the parcel")]
    NoBuilding,
}

/// Trouve le tarif d'une catégorie dans un arrondissement.
///
/// La catégorie est identifiée par le slug de sa description, qui distingue
/// les catégories entre elles.
pub fn find_rate<'a>(
    doc: &'a SluggedDocument,
    departement: &str,
    commune: &str,
    arrondissement: &str,
    categorie: &str,
) -> Option<&'a SluggedTariff> {
    doc.departements
        .iter()
        .find(|d| d.slug == departement)?
        .communes
        .iter()
        .find(|c| c.slug == commune)?
        .arrondissements
        .iter()
        .find(|a| a.slug == arrondissement)?
        .tarifs
        .values()
        .find(|t| t.slug_description == categorie)
}

/// TFU d'un bâtiment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildingTfu {
    pub surface: f64,
    pub tfu_par_m2: f64,
    pub tfu_minimum: f64,
    /// Surface × tarif, arrondi
    pub computed: f64,
    /// Montant retenu: max(surface × tarif, minimum), arrondi
    pub retained: f64,
    pub minimum_applied: bool,
}

pub fn building_tfu(surface: f64, tariff: &SluggedTariff) -> Result<BuildingTfu, EstimateError> {
    if surface < 0.0 {
        return Err(EstimateError::NegativeSurface(surface));
    }

    let raw = surface * tariff.tfu_par_m2;
    let retained = raw.max(tariff.tfu_minimum).round();
    let computed = raw.round();

    Ok(BuildingTfu {
        surface,
        tfu_par_m2: tariff.tfu_par_m2,
        tfu_minimum: tariff.tfu_minimum,
        computed,
        retained,
        minimum_applied: retained > computed,
    })
}

/// TFU d'une parcelle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParcelTfu {
    pub buildings: Vec<BuildingTfu>,
    /// Somme des montants retenus par bâtiment
    pub buildings_sum: f64,
    /// Minimum du plus grand bâtiment, arrondi
    pub largest_minimum: f64,
    /// max(somme, minimum du plus grand bâtiment)
    pub buildings_retained: f64,
    pub pools: u32,
    pub total: f64,
}

/// Calcule la TFU d'une parcelle à partir de ses bâtiments `(surface, tarif)`
pub fn parcel_tfu(
    buildings: &[(f64, &SluggedTariff)],
    pools: i64,
) -> Result<ParcelTfu, EstimateError> {
    if buildings.is_empty() {
        return Err(EstimateError::NoBuilding);
    }
    let pools = u32::try_from(pools).map_err(|_| EstimateError::NegativePools(pools))?;

    let mut details = Vec::with_capacity(buildings.len());
    let mut largest_surface = 0.0;
    let mut largest_minimum = 0.0;

    for &(surface, tariff) in buildings {
        let building = building_tfu(surface, tariff)?;
        if surface >= largest_surface {
            largest_surface = surface;
            largest_minimum = tariff.tfu_minimum;
        }
        details.push(building);
    }

    let buildings_sum: f64 = details.iter().map(|b| b.retained).sum();
    let largest_minimum = f64::round(largest_minimum);
    let buildings_retained = buildings_sum.max(largest_minimum);
    let total = buildings_retained + f64::from(pools) * POOL_AMOUNT;

    Ok(ParcelTfu {
        buildings: details,
        buildings_sum,
        largest_minimum,
        buildings_retained,
        pools,
        total,
    })
}
