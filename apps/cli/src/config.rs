use std::path::PathBuf;

use clap::Parser;

/// Converts fiat amounts in a JSON page document to RAI.
#[derive(Parser, Debug)]
#[command(name = "railens", version)]
pub struct Args {
    /// Page document (JSON)
    #[arg(env = "RAILENS_DOCUMENT")]
    document: PathBuf,

    /// Preferences (JSON)
    #[arg(env = "RAILENS_PREFERENCES")]
    preferences: PathBuf,

    /// Oracle price payload whose quotes replace the configured rates
    #[arg(long, env = "RAILENS_ORACLE")]
    oracle: Option<PathBuf>,

    /// Where to write the converted document; stdout when absent
    #[arg(short, long, env = "RAILENS_OUTPUT")]
    output: Option<PathBuf>,

    /// `text` or `json`
    #[arg(long, env = "RAILENS_LOG_FORMAT", default_value = "text")]
    log_format: String,
}

pub struct Config {
    pub document_path: PathBuf,
    pub preferences_path: PathBuf,
    pub oracle_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub log_format: String,
}

impl Config {
    /// Reads `.env`, the environment and the command line, in rising priority.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from(Args::parse())
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            document_path: args.document,
            preferences_path: args.preferences,
            oracle_path: args.oracle,
            output_path: args.output,
            log_format: args.log_format,
        }
    }
}
