use anyhow::{Context, Result};
use clap::Parser;
use patchboard_core::Language;
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "patchboard", about = "Terminal dashboard for the vulnerability-fix workflow")]
struct Args {
    /// Base URL of the workflow backend.
    #[arg(long, env = "PATCHBOARD_BACKEND_URL", default_value = "http://127.0.0.1:8000")]
    backend_url: String,
    #[arg(long, env = "PATCHBOARD_LANGUAGE", default_value = "python")]
    language: Language,
    #[arg(long, env = "PATCHBOARD_POLL_INTERVAL_MS", default_value_t = 1000)]
    poll_interval_ms: u64,
    /// 0 disables the per-request timeout.
    #[arg(long, env = "PATCHBOARD_REQUEST_TIMEOUT_MS", default_value_t = 10_000)]
    request_timeout_ms: u64,
    #[arg(long, env = "PATCHBOARD_LOG_FILE")]
    log_file: Option<PathBuf>,
    #[arg(long, default_value_t = false)]
    debug: bool,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub backend_url: String,
    pub language: Language,
    pub poll_interval: Duration,
    pub request_timeout: Option<Duration>,
    pub log_file: Option<PathBuf>,
    pub debug: bool,
}

pub fn load_config() -> Config {
    Config::from_args(Args::parse())
}

impl Config {
    fn from_args(args: Args) -> Self {
        let request_timeout =
            (args.request_timeout_ms > 0).then(|| Duration::from_millis(args.request_timeout_ms));
        Self {
            backend_url: args.backend_url.trim().to_string(),
            language: args.language,
            poll_interval: Duration::from_millis(args.poll_interval_ms.max(1)),
            request_timeout,
            log_file: args.log_file.filter(|path| !path.as_os_str().is_empty()),
            debug: args.debug || env_true("PATCHBOARD_DEBUG"),
        }
    }
}

fn env_true(key: &str) -> bool {
    matches!(
        std::env::var(key).ok().as_deref(),
        Some("1") | Some("true") | Some("TRUE") | Some("yes") | Some("YES")
    )
}

/// The terminal belongs to the dashboard, so events only reach a file when
/// one is configured and are dropped otherwise.
pub fn init_logging(config: &Config) -> Result<()> {
    let default_level = if config.debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("open log file {}", path.display()))?;
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::sink)
                .try_init();
        }
    }
    Ok(())
}
