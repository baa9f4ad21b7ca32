//! Point d'entrée CLI pour tfu-json

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

// Charger .env au démarrage
fn load_env() {
    // Chercher .env dans le répertoire courant ou parent
    if dotenvy::dotenv().is_err() {
        // Essayer depuis le répertoire du binaire
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                let _ = dotenvy::from_path(dir.join(".env"));
            }
        }
    }
}

mod cli;

use cli::{Commands, ConvertArgs};

/// Convertir une grille tarifaire TFU en JSON
#[derive(Parser)]
#[command(name = "tfu-json")]
#[command(author, version)]
#[command(about = "Convertir une grille tarifaire TFU (xlsx/xls/ods) en document JSON hiérarchique")]
#[command(long_about = "Reconstruit l'arbre département > commune > arrondissement d'une grille TFU.\n\nPar défaut, convertit un classeur. Utilisez 'slugify', 'export' et 'tarif' pour les documents dérivés.")]
struct Cli {
    /// Augmenter la verbosité (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Mode silencieux
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Sous-commande (défaut: conversion)
    #[command(subcommand)]
    command: Option<Commands>,

    /// Arguments de la conversion (commande par défaut)
    #[command(flatten)]
    convert: Option<ConvertArgs>,
}

fn main() -> Result<ExitCode> {
    // Charger .env avant tout
    load_env();

    let cli = Cli::parse();

    // Configurer le logging
    init_logging(cli.verbose, cli.quiet);

    let produced = match cli.command {
        Some(Commands::Slugify { input, output }) => {
            info!(input = %input.display(), output = %output.display(), "Ajout des slugs");
            cli::cmd_slugify(&input, &output)?
        }
        Some(Commands::Export { input, output }) => cli::cmd_export(&input, &output)?,
        Some(Commands::Tarif(args)) => cli::cmd_tarif(&args)?,
        None => {
            // Commande par défaut: conversion
            let args = cli.convert.unwrap_or_default();
            cli::cmd_convert(&args)?
        }
    };

    Ok(if produced {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::WARN,
        (_, 0) => Level::INFO,
        (_, 1) => Level::DEBUG,
        (_, _) => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .init();
}
