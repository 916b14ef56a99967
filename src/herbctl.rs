use colored::Colorize;
use env_logger::Env;
use log::{error, info};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use libayur::db::{self, Herb, NewHerb};

#[derive(Parser, Debug)]
#[command(name = "herbctl")]
#[command(version, about = "Import or export the herb catalogue as JSON", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, default_value = "info")]
    log_level: String,
    #[arg(short, long, value_name = "FILE", env = "AYUR_DB", default_value = "herbs.db")]
    db: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Add herbs from a JSON file, skipping names already stored
    Import { json: PathBuf },
    /// Write every stored herb to a JSON file
    Export { json: PathBuf },
}

#[derive(Serialize, Deserialize, Debug)]
struct HerbsJson<T> {
    herbs: Vec<T>,
}

#[derive(Debug, Error)]
enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("cannot access file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Default, PartialEq)]
struct ImportReport {
    added: usize,
    existing: usize,
    invalid: usize,
}

fn main() -> ExitCode {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level.clone())).init();
    info!("{}", format!("Database at {:?}", args.db).cyan());

    let db = match db::create_or_open(&args.db) {
        Ok(d) => d,
        Err(e) => {
            error!("{}{}", "Unable to open Database: ".red(), e);
            return ExitCode::FAILURE;
        }
    };

    let result = match &args.command {
        Commands::Import { json } => import(&db, json).map(|report| {
            info!(
                "{}",
                format!(
                    "Imported {} herbs ({} already present, {} invalid)",
                    report.added, report.existing, report.invalid
                )
                .blue()
            );
        }),
        Commands::Export { json } => export(&db, json).map(|count| {
            info!("{}", format!("Exported {} herbs to {:?}", count, json).blue());
        }),
    };

    if let Err(e) = db::close_db(db) {
        error!("{}{}", "Unable to close Database: ".red(), e);
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e.to_string().red());
            ExitCode::FAILURE
        }
    }
}

fn import(db: &Connection, path: &Path) -> Result<ImportReport, Error> {
    let json = std::fs::read_to_string(path)?;
    let content: HerbsJson<NewHerb> = serde_json::from_str(&json)?;
    info!(
        "{}",
        format!("Importing data... ({} Herbs)", content.herbs.len()).blue()
    );

    let mut report = ImportReport::default();
    for herb in content.herbs {
        if !validate_herb(&herb) {
            error!(
                "{}",
                format!("├ ✘ Herb: {:?} (Missing `name`)", herb)
                    .red()
                    .strikethrough()
            );
            report.invalid += 1;
            continue;
        }
        if Herb::get_by_name(db, &herb.name)?.is_some() {
            info!("{}", format!("├ Herb: {} (exists)", herb.name).yellow());
            report.existing += 1;
            continue;
        }

        let stored = Herb::add(db, herb)?;
        info!("{}", format!("├ Herb: {} -> {}", stored.name, stored.id).green());
        report.added += 1;
    }

    Ok(report)
}

fn export(db: &Connection, path: &Path) -> Result<usize, Error> {
    let herbs = Herb::get_all(db)?;
    let count = herbs.len();
    std::fs::write(path, serde_json::to_string_pretty(&HerbsJson { herbs })?)?;
    Ok(count)
}

fn validate_herb(herb: &NewHerb) -> bool {
    !herb.name.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HERBS: &str = r#"{"herbs": [
        {"name": "Tulsi", "properties": "Adaptogenic", "usage": "Tea"},
        {"name": "  ", "properties": "None", "usage": "None"},
        {"name": "Neem", "properties": "Bitter", "usage": "Paste"}
    ]}"#;

    #[test]
    fn import_skips_invalid_and_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("herbs.json");
        std::fs::write(&path, HERBS).unwrap();
        let conn = db::open_in_memory().unwrap();

        let first = import(&conn, &path).unwrap();
        assert_eq!(first, ImportReport { added: 2, existing: 0, invalid: 1 });

        let second = import(&conn, &path).unwrap();
        assert_eq!(second, ImportReport { added: 0, existing: 2, invalid: 1 });
        assert_eq!(Herb::get_all(&conn).unwrap().len(), 2);
    }

    #[test]
    fn export_writes_stored_herbs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let conn = db::open_in_memory().unwrap();
        Herb::add(
            &conn,
            NewHerb {
                name: "Brahmi".to_string(),
                properties: "Calming".to_string(),
                usage: "Powder".to_string(),
            },
        )
        .unwrap();

        assert_eq!(export(&conn, &path).unwrap(), 1);
        let written: HerbsJson<Herb> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.herbs[0].id, 1);
        assert_eq!(written.herbs[0].name, "Brahmi");
    }

    #[test]
    fn malformed_json_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{\"herbs\": [").unwrap();
        let conn = db::open_in_memory().unwrap();

        assert!(matches!(import(&conn, &path), Err(Error::Json(_))));
    }
}
