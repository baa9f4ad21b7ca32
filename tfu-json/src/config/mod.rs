//! Configuration de la conversion

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use grille_tfu::ExtractOptions;

/// Preset utilisé quand aucune configuration n'est fournie
pub const DEFAULT_PRESET: &str = "benin-2025";

/// Configuration principale
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Options passées à l'extraction
    #[serde(flatten)]
    pub extract: ExtractOptions,

    /// Classeur lu quand aucun chemin n'est donné
    #[serde(default = "default_input")]
    pub default_input: PathBuf,

    /// Fichier JSON écrit quand aucune sortie n'est donnée
    #[serde(default = "default_output")]
    pub default_output: PathBuf,
}

fn default_input() -> PathBuf {
    PathBuf::from("grille_revisee_2025_light.xlsx")
}

fn default_output() -> PathBuf {
    PathBuf::from("grille_tarifaire_2025.json")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extract: ExtractOptions::default(),
            default_input: default_input(),
            default_output: default_output(),
        }
    }
}

impl Config {
    /// Charge une configuration depuis un fichier
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// Charge une configuration depuis un preset embarqué
    pub fn from_preset(preset: &str) -> Result<Self> {
        match preset {
            "benin-2025" => Self::load_embedded(include_str!("presets/benin-2025.json")),
            "raw-grid" => Self::load_embedded(include_str!("presets/raw-grid.json")),
            _ => anyhow::bail!("Unknown preset: {}. Use: benin-2025, raw-grid", preset),
        }
    }

    /// Nom de preset ou chemin vers un fichier JSON
    pub fn resolve(spec: &str) -> Result<Self> {
        let path = Path::new(spec);
        if path.extension().map_or(false, |ext| ext == "json") || path.is_file() {
            Self::load(path)
        } else {
            Self::from_preset(spec)
        }
    }

    fn load_embedded(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse embedded config")
    }
}
