use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vmat_manifest::{ManifestBuilder, PipelineConfig, RunSummary, StatusBus, StatusEvent};

#[derive(Parser, Debug)]
#[command(
  name = "vmat-manifest",
  version,
  about = "List material descriptors whose colour textures exist"
)]
struct Cli {
  /// Content directory to scan; manifests are written here
  root: PathBuf,

  /// JSON configuration overriding the naming conventions
  #[arg(long, value_name = "PATH")]
  config: Option<PathBuf>,

  /// Threads used for texture existence checks (0 = automatic)
  #[arg(long, value_name = "N")]
  workers: Option<usize>,

  /// Print the final summary as JSON
  #[arg(long)]
  json: bool,

  /// Suppress per-stage progress lines
  #[arg(long, short)]
  quiet: bool,
}

fn main() -> Result<()> {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "vmat_manifest=info".into()),
    )
    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
    .init();

  let cli = Cli::parse();

  if !cli.root.is_dir() {
    bail!("{} is not an existing directory", cli.root.display());
  }
  let root = cli
    .root
    .canonicalize()
    .with_context(|| format!("failed to resolve {}", cli.root.display()))?;

  let mut config = match &cli.config {
    Some(path) => PipelineConfig::load_from_path(path)?,
    None => PipelineConfig::discover(&root),
  };
  if let Some(workers) = cli.workers {
    config.existence_workers = workers;
  }

  let bus = StatusBus::new();
  let events = bus.subscribe();
  let handle = ManifestBuilder::new(&root, config)
    .spawn(bus)
    .context("failed to start pipeline thread")?;

  for event in events {
    match event {
      StatusEvent::Progress {
        percent, message, ..
      } => {
        if !cli.quiet {
          eprintln!("[{percent:>3}%] {message}");
        }
      }
      StatusEvent::Completed(_) | StatusEvent::Failed { .. } => break,
    }
  }

  let summary = handle
    .join()
    .with_context(|| format!("processing {} failed", root.display()))?;

  if cli.json {
    println!("{}", serde_json::to_string_pretty(&summary)?);
  } else {
    print_summary(&summary);
  }
  Ok(())
}

fn print_summary(summary: &RunSummary) {
  println!("VMAT files: {}", summary.descriptors);
  println!("Valid PNG files: {}", summary.valid_companions);
  println!("Final materials: {}", summary.identifiers);
  match &summary.manifests {
    Some(paths) => {
      for path in [&paths.companions, &paths.alternates, &paths.identifiers] {
        println!("Saved: {}", path.display());
      }
    }
    None => println!("No VMAT files found, manifests left untouched"),
  }
}
