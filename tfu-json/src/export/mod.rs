//! Modules d'export (document JSON, vues dérivées)

pub mod json;
pub mod views;

pub use json::{read_json, write_json};
