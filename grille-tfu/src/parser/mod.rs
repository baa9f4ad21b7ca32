//! Analyse de la grille: en-tête, libellés de lignes, tarifs

pub mod header;
pub mod rows;
pub mod tariff;
