//! # tfu-json
//!
//! Conversion d'une grille tarifaire TFU en documents JSON pour le service
//! d'estimation de la taxe foncière unique.
//!
//! ## Features
//!
//! - Conversion classeur → document hiérarchique (presets de configuration)
//! - Document enrichi de slugs
//! - Vues dérivées pour les listes de sélection
//! - Recherche d'un tarif et calcul de la TFU d'un bâtiment ou d'une parcelle
//! - Rapport de conversion
//!
//! ## Usage CLI
//!
//! ```bash
//! # Conversion (commande par défaut)
//! tfu-json grille_revisee_2025_light.xlsx -o grille_tarifaire_2025.json
//!
//! # Slugs, vues, tarif
//! tfu-json slugify -i grille_tarifaire_2025.json -o tfu_with_slugs.json
//! tfu-json export -i tfu_with_slugs.json -o ./views/
//! tfu-json tarif -i tfu_with_slugs.json --departement atlantique \
//!     --commune abomey_calavi --arrondissement godomey --categorie tole --surface 120
//! ```

pub mod config;
pub mod export;
pub mod lookup;
pub mod report;

pub use config::Config;
pub use lookup::{building_tfu, find_rate, parcel_tfu, EstimateError};
pub use report::{ConversionReport, ConversionStatus};
