use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, bail};
use clap::Parser;
use sapper_core::{Coord, Round, SessionSettings};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use app::{App, Flow};
use command::Command;

mod app;
mod command;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// JSON file with session settings, the flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    width: Option<Coord>,

    #[arg(long)]
    height: Option<Coord>,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Round to start from
    #[arg(short, long)]
    round: Option<Round>,
}

impl Args {
    fn settings(&self) -> Result<SessionSettings> {
        let mut settings = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Could not read {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("Could not parse {}", path.display()))?
            }
            None => SessionSettings {
                seed: clock_seed(),
                ..Default::default()
            },
        };

        if let Some(width) = self.width {
            settings.size.0 = width;
        }
        if let Some(height) = self.height {
            settings.size.1 = height;
        }
        if let Some(seed) = self.seed {
            settings.seed = seed;
        }
        if let Some(round) = self.round {
            settings.first_round = round;
        }

        if settings.size.0 == 0 || settings.size.1 == 0 {
            bail!("Board must be at least 1x1, got {:?}", settings.size);
        }
        Ok(settings)
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}

/// `RUST_LOG` directives on top of the level picked with `-v`/`-q`.
fn log_filter(level: LevelFilter, directives: &str) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(level.into())
        .parse_lossy(directives)
}

fn prompt(out: &mut impl Write) -> Result<()> {
    write!(out, "> ")?;
    out.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(args.verbose.tracing_level_filter(), &directives))
        .with_writer(io::stderr)
        .init();

    let settings = args.settings()?;
    log::info!("Starting with {settings:?}");

    let mut app = App::new(settings);
    log::debug!("Dealing from seed {}", app.session().settings().seed);
    let mut out = io::stdout().lock();
    app.write_view(&mut out)?;
    prompt(&mut out)?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        if !line.trim().is_empty() {
            match line.parse::<Command>() {
                Ok(command) => match app.execute(command, &mut out) {
                    Ok(Flow::Quit) => break,
                    Ok(Flow::Continue) => {}
                    Err(err) => writeln!(out, "error: {err:#}")?,
                },
                Err(err) => writeln!(out, "error: {err}")?,
            }
        }
        prompt(&mut out)?;
    }

    Ok(())
}
