use axum::http::HeaderValue;
use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::error::StartupError;

#[derive(Parser, Debug, Clone)]
#[command(name = "ayurkb")]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(long, env = "AYUR_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,
    #[arg(short, long, env = "AYUR_PORT", default_value = "8000")]
    pub port: u16,
    #[arg(
        long,
        value_name = "FILE",
        env = "AYUR_DATASET",
        default_value = "data/ayurvedic_dataset.csv"
    )]
    pub dataset: PathBuf,
    #[arg(short, long, value_name = "FILE", env = "AYUR_DB", default_value = "herbs.db")]
    pub db: PathBuf,
    /// JSON question bank replacing the built-in quiz
    #[arg(long, value_name = "FILE", env = "AYUR_QUIZ")]
    pub quiz: Option<PathBuf>,
    #[arg(
        long,
        env = "AYUR_ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_value = "http://localhost:5173,http://127.0.0.1:5173"
    )]
    pub allowed_origins: Vec<String>,
    #[arg(short, long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    pub fn address(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn origins(&self) -> Result<Vec<HeaderValue>, StartupError> {
        self.allowed_origins
            .iter()
            .map(|origin| origin.trim())
            .filter(|origin| !origin.is_empty())
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .map_err(|_| StartupError::InvalidOrigin(origin.to_string()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_local_frontend() {
        let args = Args::parse_from(["ayurkb"]);

        assert_eq!(args.address().port(), 8000);
        assert_eq!(args.db, PathBuf::from("herbs.db"));
        assert!(args.quiz.is_none());
        assert_eq!(
            args.origins().unwrap(),
            vec![
                HeaderValue::from_static("http://localhost:5173"),
                HeaderValue::from_static("http://127.0.0.1:5173"),
            ]
        );
    }

    #[test]
    fn origins_are_comma_separated() {
        let args = Args::parse_from([
            "ayurkb",
            "--allowed-origins",
            "https://kb.example, https://www.kb.example",
        ]);

        assert_eq!(args.origins().unwrap().len(), 2);
    }

    #[test]
    fn rejects_origin_with_control_characters() {
        let args = Args::parse_from(["ayurkb", "--allowed-origins", "http://bad\u{7f}host"]);

        assert!(matches!(args.origins(), Err(StartupError::InvalidOrigin(_))));
    }
}
