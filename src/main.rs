use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{Map, Value};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use clusterwatch::{
    ArtifactSet, ArtifactSource, Derivation, DerivedView, FileSource, HealthCounters, Registry,
    Settings,
};

#[derive(Parser, Debug)]
#[command(name = "clusterwatch")]
#[command(about = "Derive health summaries from storage cluster state snapshots")]
struct Args {
    /// Path to a settings file (TOML, YAML or JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(short, long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Derive views from a bundle once and print them
    Derive {
        /// Path to the artifact bundle
        bundle: PathBuf,
    },

    /// Derive views from a bundle and write them to a file
    Export {
        /// Path to the artifact bundle
        bundle: PathBuf,

        /// File to write the derived views to
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Re-derive whenever the bundle file changes
    Watch {
        /// Path to the artifact bundle
        bundle: PathBuf,

        /// Refresh interval in seconds
        #[arg(short, long)]
        refresh: Option<u64>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref())?;
    if args.pretty {
        settings.output.pretty = true;
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log.filter))
        .context("invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let registry = Registry::standard().retain_units(settings.pipeline.units.as_slice())?;

    match args.command {
        Command::Derive { bundle } => {
            let views = derive_once(&registry, &bundle)?;
            println!("{}", render(&views, settings.output.pretty)?);
            Ok(())
        }
        Command::Export { bundle, output } => export_to_file(&registry, &bundle, &output, &settings),
        Command::Watch { bundle, refresh } => {
            if let Some(secs) = refresh {
                settings.watch.refresh_secs = secs;
            }
            run_watch(&registry, &bundle, settings.watch.refresh(), settings.output.pretty)
        }
    }
}

/// Run every unit over the bundle and fail if any unit failed.
fn derive_once(registry: &Registry, bundle: &Path) -> Result<Map<String, Value>> {
    let artifacts = ArtifactSet::load(bundle)?;
    let derivations = registry.run(&artifacts);

    for error in derivations.errors() {
        warn!(unit = error.unit(), "{}", error);
    }
    if !derivations.is_complete() {
        bail!(
            "{} of {} derivations failed",
            derivations.errors().count(),
            derivations.outcomes().len()
        );
    }

    Ok(derivations.merged()?)
}

fn render(views: &Map<String, Value>, pretty: bool) -> Result<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(views)?
    } else {
        serde_json::to_string(views)?
    };
    Ok(rendered)
}

/// Export derived views to a JSON file
fn export_to_file(
    registry: &Registry,
    bundle: &Path,
    export_path: &Path,
    settings: &Settings,
) -> Result<()> {
    let views = derive_once(registry, bundle)?;
    std::fs::write(export_path, render(&views, settings.output.pretty)?)
        .with_context(|| format!("writing {}", export_path.display()))?;

    println!("Exported derived views to: {}", export_path.display());
    Ok(())
}

/// Poll the bundle file and print one JSON document per change.
///
/// Units that cannot run on a given bundle are logged and skipped; the
/// views of the remaining units are still printed.
fn run_watch(registry: &Registry, bundle: &Path, refresh: Duration, pretty: bool) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;

    rt.block_on(async {
        let mut source = FileSource::new(bundle);
        let mut last_error: Option<String> = None;
        let mut ticker = tokio::time::interval(refresh);
        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        info!(source = source.description(), ?refresh, "watching");

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("shutting down");
                    return Ok::<(), anyhow::Error>(());
                }
                _ = ticker.tick() => {}
            }

            if let Some(derivations) = registry.poll_and_run(&mut source) {
                for error in derivations.errors() {
                    warn!(unit = error.unit(), "{}", error);
                }
                if let Some(Ok(DerivedView::HealthCounters(view))) =
                    derivations.get(HealthCounters.name())
                {
                    let counters = &view.counters;
                    info!(
                        osd = ?counters.osd.worst(),
                        mon = ?counters.mon.worst(),
                        pg = ?counters.pg.worst(),
                        "cluster health"
                    );
                }
                println!("{}", render(&derivations.merged()?, pretty)?);
            }

            let error = source.error().map(str::to_owned);
            if error != last_error {
                if let Some(message) = &error {
                    warn!(source = source.description(), "{}", message);
                }
                last_error = error;
            }
        }
    })
}
