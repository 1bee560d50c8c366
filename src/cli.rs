use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Translate messages.json catalogs into other locales
    Translate {
        /// Source catalogs (<base>/_locales/<locale>/messages.json)
        #[arg(required = true)]
        sources: Vec<PathBuf>,

        /// Catalogs translated earlier; their messages are reused instead of translated
        #[arg(short, long, num_args = 1..)]
        pre_translated: Vec<PathBuf>,

        /// Target locales (comma-separated); defaults to the config, then to the
        /// pre-translated locales
        #[arg(short, long)]
        targets: Option<String>,

        /// Translation backend (papago, kakao, google, ollama)
        #[arg(short, long)]
        backend: Option<String>,

        /// Assemble catalogs and print them instead of writing files
        #[arg(long)]
        dry_run: bool,
    },

    /// Show how a message splits into text segments and markup tokens
    Tokenize {
        /// Message text
        message: String,
    },

    /// List translation backends and whether they are configured
    Backends,
}

/// Split a comma-separated locale list, dropping blanks
pub fn parse_locale_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_locale_list() {
        assert_eq!(parse_locale_list("ko, ja,,zh_CN "), vec!["ko", "ja", "zh_CN"]);
        assert!(parse_locale_list(" , ").is_empty());
    }

    #[test]
    fn test_translate_arguments() {
        let args = Args::try_parse_from([
            "msgloc",
            "translate",
            "ext/_locales/en/messages.json",
            "-p",
            "old/_locales/ko/messages.json",
            "old/_locales/ja/messages.json",
            "--targets",
            "ko,ja",
        ])
        .unwrap();

        match args.command {
            Commands::Translate { sources, pre_translated, targets, backend, dry_run } => {
                assert_eq!(sources.len(), 1);
                assert_eq!(pre_translated.len(), 2);
                assert_eq!(targets.as_deref(), Some("ko,ja"));
                assert!(backend.is_none());
                assert!(!dry_run);
            }
            _ => panic!("expected translate"),
        }
    }
}
