//! Command-line interface definition.

use std::path::PathBuf;

use clap::Parser;

use aqua_indexer_repository::config::DEFAULT_URL;
use aqua_indexer_repository::DEFAULT_INDEX_NAME;

#[derive(Parser, Debug, Clone)]
#[command(name = "aqua-indexer")]
#[command(about = "Load water-quality sensor readings from a CSV file into a search index", long_about = None)]
pub struct Cli {
    /// Input file with a `ph,temperature,turbidity,fish` header
    #[arg(long, env = "CSV_FILE")]
    pub csv: PathBuf,

    /// Search engine URL
    #[arg(long, env = "ES_URL", default_value = DEFAULT_URL)]
    pub es_url: String,

    /// Index name
    #[arg(long, env = "INDEX_NAME", default_value = DEFAULT_INDEX_NAME)]
    pub index: String,

    /// API key (takes precedence over --api-key-file)
    #[arg(long, env = "ES_APIKEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// File holding the API key
    #[arg(long, env = "ES_APIKEY_FILE")]
    pub api_key_file: Option<PathBuf>,

    /// Number of concurrent submissions
    #[arg(long, default_value_t = 8, value_parser = clap::value_parser!(u16).range(1..=1024))]
    pub concurrency: u16,

    /// Stop after this many data rows (default: whole file)
    #[arg(long)]
    pub max_rows: Option<usize>,

    /// Field delimiter
    #[arg(long, default_value_t = ',')]
    pub delimiter: char,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Do not verify the server's TLS certificate (self-signed test clusters only)
    #[arg(long)]
    pub insecure: bool,

    /// Do not create the index before ingesting
    #[arg(long)]
    pub skip_provisioning: bool,

    /// Write rows that failed to this CSV file
    #[arg(long)]
    pub failures_out: Option<PathBuf>,

    /// Disable the progress spinner
    #[arg(long)]
    pub no_progress: bool,
}
