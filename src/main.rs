//! msgloc - markup-preserving translation of messages.json catalogs
//!
//! Entry point: parses arguments, sets up logging, loads configuration and
//! runs the requested command.

use anyhow::Result;
use clap::Parser;
use tracing::{error, info, warn, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tracing_appender::{non_blocking, rolling};
use tracing_appender::non_blocking::WorkerGuard;

use msgloc::catalog::{same_locale, Catalog, PreTranslatedIndex};
use msgloc::cli::{parse_locale_list, Args, Commands};
use msgloc::config::Config;
use msgloc::error::MsglocError;
use msgloc::markup::{tokenize, Piece};
use msgloc::translate::TranslatorFactory;
use msgloc::workflow::Workflow;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Setup logging to both console and file; the guard flushes the file on exit
    let _guard = setup_logging(args.verbose)?;

    // Load configuration
    let mut config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            if std::path::Path::new("config.toml").exists() {
                info!("Found config.toml in current directory, loading...");
                Config::from_file("config.toml")?
            } else {
                Config::default()
            }
        }
    };
    config.apply_env();

    match args.command {
        Commands::Translate { sources, pre_translated, targets, backend, dry_run } => {
            let index = PreTranslatedIndex::load(&pre_translated)?;
            let (target_locales, explicit) = resolve_targets(targets.as_deref(), &config, &index)?;

            let backend = backend.unwrap_or_else(|| config.translate.backend.clone());
            let translator = TranslatorFactory::create(&backend, &config)?;
            let workflow = Workflow::new(translator, index);

            let mut failed = 0;
            for source_path in &sources {
                let source = match Catalog::load(source_path) {
                    Ok(catalog) => catalog,
                    Err(e) => {
                        error!("Skipping {}: {}", source_path.display(), e);
                        failed += 1;
                        continue;
                    }
                };

                let target_locales = targets_for(source.locale(), &target_locales, explicit);
                if target_locales.is_empty() {
                    warn!("Skipping {}: no target locale besides {}", source_path.display(), source.locale());
                    continue;
                }

                let outcome = if dry_run {
                    preview(&workflow, &source, &target_locales).await
                } else {
                    workflow.translate_catalog(&source, &target_locales).await.map(|reports| {
                        for report in reports {
                            println!("{}", report.output_path.display());
                        }
                    })
                };

                if let Err(e) = outcome {
                    error!("Failed to translate {}: {}", source_path.display(), e);
                    failed += 1;
                    // Configuration problems would fail every remaining catalog the same way
                    if e.is_configuration() {
                        break;
                    }
                }
            }

            if failed > 0 {
                anyhow::bail!("{} of {} catalogs failed", failed, sources.len());
            }
        }
        Commands::Tokenize { message } => {
            let pieces = tokenize(&message);
            println!("Leading: {:?}", pieces.leading);
            println!("{:<8} {}", "Kind", "Text");
            println!("{}", "-".repeat(40));
            for piece in pieces.iter() {
                match piece {
                    Piece::Segment(text) => println!("{:<8} {:?}", "segment", text),
                    Piece::Token(text) => println!("{:<8} {:?}", "token", text),
                }
            }
        }
        Commands::Backends => {
            println!("{:<10} {:<10}", "Backend", "Status");
            println!("{}", "-".repeat(40));
            for name in TranslatorFactory::backend_names() {
                let status = match TranslatorFactory::create(name, &config) {
                    Ok(_) => "ready".to_string(),
                    Err(e) => e.to_string(),
                };
                println!("{:<10} {}", name, status);
            }
        }
    }

    Ok(())
}

/// Print every target catalog instead of writing it
async fn preview(
    workflow: &Workflow,
    source: &Catalog,
    target_locales: &[String],
) -> msgloc::error::Result<()> {
    for target in target_locales {
        let (catalog, _) = workflow.translate_locale(source, target).await?;
        println!("// {}", catalog.path().display());
        print!("{}", catalog.to_json_string()?);
    }
    Ok(())
}

/// Target locales from the command line, else the config, else the pre-translated catalogs.
///
/// The flag is true when the locales were given on the command line.
fn resolve_targets(
    cli_targets: Option<&str>,
    config: &Config,
    index: &PreTranslatedIndex,
) -> std::result::Result<(Vec<String>, bool), MsglocError> {
    let (targets, explicit) = match cli_targets {
        Some(list) => (parse_locale_list(list), true),
        None if !config.translate.targets.is_empty() => (config.translate.targets.clone(), false),
        None => (index.locales(), false),
    };
    if targets.is_empty() {
        return Err(MsglocError::Config(
            "No target locales: pass --targets, set translate.targets or give pre-translated catalogs".to_string(),
        ));
    }
    Ok((targets, explicit))
}

/// Targets for one source catalog. Implicit lists drop the source's own locale;
/// explicit ones are kept so the workflow rejects them.
fn targets_for(source_locale: &str, targets: &[String], explicit: bool) -> Vec<String> {
    targets
        .iter()
        .filter(|target| explicit || !same_locale(source_locale, target))
        .cloned()
        .collect()
}

/// Setup logging to both console and file
fn setup_logging(verbose: bool) -> Result<WorkerGuard> {
    let log_dir = std::env::current_dir()?.join(".msgloc").join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Set up file appender with daily rotation
    let file_appender = rolling::daily(&log_dir, "msgloc.log");
    let (non_blocking_file, guard) = non_blocking(file_appender);

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    // Console output goes to stderr so stdout stays clean for catalog output
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Logging initialized - console: {}, file: {}",
          log_level, log_dir.join("msgloc.log").display());

    Ok(guard)
}
