use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{AppConfig, DEFAULT_ID_COLUMN};
use crate::error::ConfigError;
use crate::stats::DEFAULT_TOP_BRANDS;

#[derive(Parser, Debug)]
#[command(
    name = "niche_matcher",
    version,
    about = "Compare a niche product listing against a product-id checklist",
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Folder holding the raw upload and the comparison workbook (env: UPLOAD_FOLDER)
    #[arg(long = "upload-folder", value_name = "DIR", env = "UPLOAD_FOLDER", global = true)]
    pub upload_folder: Option<String>,
    /// Largest accepted upload in bytes (env: MAX_CONTENT_LENGTH)
    #[arg(
        long = "max-content-length",
        value_name = "BYTES",
        env = "MAX_CONTENT_LENGTH",
        global = true
    )]
    pub max_content_length: Option<u64>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Store a listing workbook (.xlsx/.xls) and compare it against the checklist
    Process(ProcessArgs),
    /// Show counts and brands of the last comparison
    Result(OutputArgs),
    /// Brand frequency of the last comparison's unmatched rows
    Stats(StatsArgs),
    /// Copy the comparison workbook to DEST
    Download {
        #[arg(value_name = "DEST")]
        dest: PathBuf,
    },
    /// Write a commented .env template
    EnvTemplate {
        #[arg(value_name = "PATH", default_value = ".env.template")]
        path: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// Listing workbook to upload
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
    /// Checklist CSV path or http(s) URL (env: CHECKLIST_URL)
    #[arg(long = "checklist-url", value_name = "URL", env = "CHECKLIST_URL")]
    pub checklist_url: Option<String>,
    /// Checklist column holding product ids
    #[arg(long = "id-column", value_name = "COLUMN", default_value = DEFAULT_ID_COLUMN)]
    pub id_column: String,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone, Copy)]
pub struct OutputArgs {
    /// Print the full result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct StatsArgs {
    /// How many brands to list as top brands
    #[arg(long, value_name = "N", default_value_t = DEFAULT_TOP_BRANDS)]
    pub top: usize,
    #[command(flatten)]
    pub output: OutputArgs,
}

impl Cli {
    /// Layer command-line values over `base` (built from .env and defaults) and validate.
    pub fn to_app_config(&self, base: AppConfig) -> Result<AppConfig, ConfigError> {
        let mut cfg = base;
        if let Some(folder) = &self.upload_folder {
            cfg.upload.folder = folder.clone();
        }
        if let Some(max) = self.max_content_length {
            cfg.upload.max_content_length = max;
        }
        if let Command::Process(p) = &self.command {
            if let Some(url) = p.checklist_url.as_ref().filter(|u| !u.trim().is_empty()) {
                cfg.reference.checklist_url = Some(url.clone());
            }
            cfg.reference.id_column = p.id_column.clone();
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn process_flags_override_base_config() {
        let cli = Cli::try_parse_from([
            "niche_matcher",
            "--upload-folder",
            "work",
            "process",
            "listing.xlsx",
            "--checklist-url",
            "https://example.com/c.csv",
            "--id-column",
            "sku",
            "--json",
        ])
        .unwrap();
        let cfg = cli.to_app_config(AppConfig::default()).unwrap();
        assert_eq!(cfg.upload.folder, "work");
        assert_eq!(
            cfg.reference.checklist_url.as_deref(),
            Some("https://example.com/c.csv")
        );
        assert_eq!(cfg.reference.id_column, "sku");
        match cli.command {
            Command::Process(p) => {
                assert!(p.output.json);
                assert_eq!(p.file, PathBuf::from("listing.xlsx"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn stats_defaults_to_top_ten() {
        let cli = Cli::try_parse_from(["niche_matcher", "stats"]).unwrap();
        match cli.command {
            Command::Stats(s) => {
                assert_eq!(s.top, 10);
                assert!(!s.output.json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn invalid_override_fails_validation() {
        let cli = Cli::try_parse_from(["niche_matcher", "--max-content-length", "0", "result"])
            .unwrap();
        assert!(cli.to_app_config(AppConfig::default()).is_err());
    }

    #[test]
    fn download_requires_destination() {
        assert!(Cli::try_parse_from(["niche_matcher", "download"]).is_err());
    }
}
