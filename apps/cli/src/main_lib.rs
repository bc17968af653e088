use std::fs;
use std::path::Path;

use anyhow::Context;
use railens_core::constants::REFERENCE_TOKEN;
use railens_core::context::{apply_oracle_rates, parse_oracle_payload};
use railens_core::{ConversionSession, Preferences, SegmentTree};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

pub fn init_tracing(log_format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    // logs go to stderr so stdout carries only the document
    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

pub fn load_preferences(path: &Path, oracle: Option<&Path>) -> anyhow::Result<Preferences> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read preferences {}", path.display()))?;
    let mut prefs: Preferences = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid preferences in {}", path.display()))?;

    if let Some(oracle) = oracle {
        let body = fs::read_to_string(oracle)
            .with_context(|| format!("Failed to read oracle payload {}", oracle.display()))?;
        let rates = parse_oracle_payload(&body, REFERENCE_TOKEN)?;
        tracing::info!("Loaded {} oracle quotes", rates.len());
        apply_oracle_rates(&mut prefs, rates);
    }
    Ok(prefs)
}

/// Converts one document and returns it serialized.
pub fn convert_document(document: &str, prefs: &Preferences) -> anyhow::Result<String> {
    let mut tree = SegmentTree::from_json(document)?;
    let mut session = ConversionSession::new(prefs)?;

    if !session.context().enabled {
        tracing::warn!("Conversion is disabled in preferences, document left unchanged");
    }
    let update = session.start(&mut tree);
    if let Some(scan) = update.scan {
        tracing::info!(
            "Visited {} segments, converted {}, resolved {} split amounts",
            scan.segments_visited,
            scan.segments_converted,
            scan.markers_resolved
        );
    }

    Ok(serde_json::to_string_pretty(&tree.to_document())?)
}

pub fn run(config: &Config) -> anyhow::Result<()> {
    let prefs = load_preferences(&config.preferences_path, config.oracle_path.as_deref())?;
    let document = fs::read_to_string(&config.document_path)
        .with_context(|| format!("Failed to read document {}", config.document_path.display()))?;

    let converted = convert_document(&document, &prefs)?;

    match &config.output_path {
        Some(path) => {
            fs::write(path, converted)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {}", path.display());
        }
        None => println!("{}", converted),
    }
    Ok(())
}
