//! feature-worker — runs the custom feature source and prints node labels.
//!
//! Each cycle merges built-in, runtime (worker config file), and directory
//! specs, evaluates them, and writes the discovered features to stdout.
//! Cycles repeat on an interval and run early when the custom config
//! directory changes.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use nodefeat_core::config::{load_dotenv, Config};
use nodefeat_core::{configure_sources, label_name, FeatureSource, Features};
use nodefeat_rules::loader::watch_dir;
use nodefeat_rules::probes::HostContext;
use nodefeat_rules::CustomSource;

/// Quiet period after a directory change before rediscovering.
const CHANGE_DEBOUNCE: Duration = Duration::from_millis(500);

// ── CLI ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// `<namespace>/<source>-<feature>=<value>` per line.
    Labels,
    /// One JSON object per cycle, keyed by label name.
    Json,
}

/// Custom host feature discovery worker.
#[derive(Parser, Debug)]
#[command(name = "feature-worker", version, about)]
struct Cli {
    /// Worker config file with per-source sections (`sources.custom: [...]`).
    #[arg(long, env = "NODEFEAT_CONFIG")]
    config: Option<PathBuf>,

    /// Directory of additional custom feature spec files.
    #[arg(long)]
    custom_config_dir: Option<PathBuf>,

    /// Node name matched by hostname rules (defaults to NODE_NAME, then the OS hostname).
    #[arg(long)]
    node_name: Option<String>,

    /// Seconds between discovery cycles.
    #[arg(long)]
    sleep_interval: Option<u64>,

    /// Run a single discovery cycle and exit.
    #[arg(long)]
    oneshot: bool,

    /// Do not watch the custom config directory for changes.
    #[arg(long)]
    no_watch: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Labels)]
    format: OutputFormat,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(dir) = &self.custom_config_dir {
            config.custom_config_dir = dir.clone();
        }
        if let Some(name) = &self.node_name {
            config.node_name = Some(name.clone());
        }
        if let Some(secs) = self.sleep_interval {
            config.worker.sleep_interval = Duration::from_secs(secs);
        }
        if let Some(path) = &self.config {
            config.worker.config_file = Some(path.clone());
        }
    }
}

// ── Output ──────────────────────────────────────────────────────────

fn render(namespace: &str, source: &str, features: &Features, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Labels => Ok(features
            .iter()
            .map(|(name, value)| format!("{}={}\n", label_name(namespace, source, name), value))
            .collect()),
        OutputFormat::Json => {
            let mut labeled = serde_json::Map::new();
            for (name, value) in features {
                labeled.insert(label_name(namespace, source, name), serde_json::to_value(value)?);
            }
            Ok(format!("{}\n", serde_json::to_string(&labeled)?))
        }
    }
}

fn run_cycle(sources: &[Box<dyn FeatureSource>], namespace: &str, format: OutputFormat) {
    for source in sources {
        let features = match source.discover() {
            Ok(features) => features,
            Err(e) => {
                error!(source = source.name(), error = %e, "feature discovery failed");
                continue;
            }
        };
        match render(namespace, source.name(), &features, format) {
            Ok(out) => print!("{out}"),
            Err(e) => error!(source = source.name(), error = %e, "failed to render features"),
        }
    }
}

// ── main ────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    load_dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env();
    cli.apply(&mut config);
    config.log_summary();

    let custom = CustomSource::new(
        HostContext::from_config(&config),
        config.custom_config_dir.clone(),
    );
    info!(node = %custom.host().node_name, "resolved node name");
    let watch_path = custom.loader().config_dir().to_path_buf();

    let mut sources: Vec<Box<dyn FeatureSource>> = vec![Box::new(custom)];

    if let Some(path) = &config.worker.config_file {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read worker config {}", path.display()))?;
        configure_sources(&mut sources, &yaml)
            .with_context(|| format!("failed to apply worker config {}", path.display()))?;
        info!(path = %path.display(), "loaded worker config");
    }

    let namespace = config.worker.label_namespace.clone();

    if cli.oneshot {
        run_cycle(&sources, &namespace, cli.format);
        return Ok(());
    }

    let (tx, mut changes) = mpsc::unbounded_channel();
    let _watcher = if cli.no_watch {
        None
    } else {
        match watch_dir(&watch_path, tx) {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                warn!(
                    path = %watch_path.display(),
                    error = %e,
                    "cannot watch custom config directory, relying on interval only"
                );
                None
            }
        }
    };

    info!(interval_secs = config.worker.sleep_interval.as_secs(), "feature-worker starting");
    loop {
        run_cycle(&sources, &namespace, cli.format);

        tokio::select! {
            _ = tokio::time::sleep(config.worker.sleep_interval) => {}
            Some(()) = changes.recv() => {
                tokio::time::sleep(CHANGE_DEBOUNCE).await;
                while changes.try_recv().is_ok() {}
                debug!("custom config directory changed, rediscovering");
            }
            _ = tokio::signal::ctrl_c() => {
                info!("feature-worker shutting down");
                break;
            }
        }
    }

    info!("feature-worker exited cleanly");
    Ok(())
}
