//! seedrand CLI - replay the engine's seeded RNG from the command line.
//!
//! - `seedrand draw` - bounded draws, `Math.rand` style (defaults replay
//!   `Math.seedRandomString("pasword")` followed by 9000 `Math.rand(1, 100)`)
//! - `seedrand words` - raw tempered generator words
//! - `seedrand hash` - the seed hash of a string

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

use seedrand_core::{seed_hash_str, RangeSampler, SamplerConfig, SamplerSnapshot};

#[derive(Parser)]
#[command(name = "seedrand")]
#[command(about = "Bit-exact replay of a scripting engine's seeded Math.rand", version)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SeedArgs {
    /// Seed string, hashed like Math.seedRandomString
    #[arg(long, default_value = "pasword", conflicts_with = "seed")]
    seed_string: String,

    /// Raw 64-bit seed
    #[arg(long)]
    seed: Option<u64>,
}

impl SeedArgs {
    fn resolve(&self) -> u64 {
        match self.seed {
            Some(seed) => seed,
            None => seed_hash_str(&self.seed_string),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print bounded draws, one per line
    Draw {
        #[command(flatten)]
        seed: SeedArgs,

        /// Lowest value (inclusive)
        #[arg(long, default_value_t = 1)]
        low: u32,

        /// Highest value (inclusive)
        #[arg(long, default_value_t = 100)]
        high: u32,

        /// Number of draws
        #[arg(short = 'n', long, default_value_t = 9000)]
        count: u64,

        /// JSON sampler config; missing fields use reference values
        #[arg(long)]
        config: Option<PathBuf>,

        /// Continue from a saved snapshot instead of seeding
        #[arg(long, conflicts_with_all = ["seed", "seed_string", "config"])]
        resume: Option<PathBuf>,

        /// Write a snapshot after the last draw
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Print raw tempered generator words
    Words {
        #[command(flatten)]
        seed: SeedArgs,

        /// Number of words
        #[arg(short = 'n', long, default_value_t = 16)]
        count: u64,

        /// Print as zero-padded hex
        #[arg(long)]
        hex: bool,
    },

    /// Print the seed hash of a string
    Hash {
        /// String to hash
        value: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stdout carries only results
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Commands::Draw {
            seed,
            low,
            high,
            count,
            config,
            resume,
            save,
        } => run_draw(&seed, low, high, count, config.as_deref(), resume.as_deref(), save.as_deref()),
        Commands::Words { seed, count, hex } => run_words(&seed, count, hex),
        Commands::Hash { value } => {
            let hash = seed_hash_str(&value);
            println!("{} {:#018x}", hash, hash);
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<SamplerConfig> {
    let Some(path) = path else {
        return Ok(SamplerConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config: SamplerConfig = serde_json::from_str(&text)
        .with_context(|| format!("Invalid config {}", path.display()))?;
    config.validate()?;
    debug!(?config, "loaded sampler config");
    Ok(config)
}

fn run_draw(
    seed: &SeedArgs,
    low: u32,
    high: u32,
    count: u64,
    config: Option<&Path>,
    resume: Option<&Path>,
    save: Option<&Path>,
) -> Result<()> {
    if high < low {
        bail!("--high {} is below --low {}", high, low);
    }

    let mut sampler = match resume {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
            let sampler = RangeSampler::restore(SamplerSnapshot::from_json(&json)?)?;
            info!(path = %path.display(), index = sampler.state().index(), "resumed from snapshot");
            sampler
        }
        None => {
            let seed = seed.resolve();
            info!(seed, "seeded generator");
            RangeSampler::new(seed, load_config(config)?)
        }
    };

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for value in sampler.draws(low, high).take(usize::try_from(count)?) {
        writeln!(out, "{}", value?)?;
    }
    out.flush()?;

    if let Some(path) = save {
        fs::write(path, sampler.snapshot().to_json()?)
            .with_context(|| format!("Failed to write snapshot {}", path.display()))?;
        info!(path = %path.display(), index = sampler.state().index(), "saved snapshot");
    }

    Ok(())
}

fn run_words(seed: &SeedArgs, count: u64, hex: bool) -> Result<()> {
    let seed = seed.resolve();
    info!(seed, "seeded generator");
    let mut sampler = RangeSampler::new(seed, SamplerConfig::default());

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for _ in 0..count {
        let word = sampler.next_word();
        if hex {
            writeln!(out, "{:016x}", word)?;
        } else {
            writeln!(out, "{}", word)?;
        }
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_draw_defaults_replay_demonstration() {
        let cli = Cli::try_parse_from(["seedrand", "draw"]).unwrap();
        match cli.command {
            Commands::Draw {
                seed, low, high, count, resume, ..
            } => {
                assert_eq!(seed.resolve(), seed_hash_str("pasword"));
                assert_eq!((low, high, count), (1, 100, 9000));
                assert!(resume.is_none());
            }
            _ => panic!("expected draw subcommand"),
        }
    }

    #[test]
    fn test_resume_conflicts_with_seeding_flags() {
        for flag in [
            ["--seed", "42"],
            ["--seed-string", "abc"],
            ["--config", "config.json"],
        ] {
            let args = ["seedrand", "draw", "--resume", "snap.json", flag[0], flag[1]];
            assert!(Cli::try_parse_from(args).is_err(), "{} accepted with --resume", flag[0]);
        }
    }

    #[test]
    fn test_resume_alone_is_accepted() {
        assert!(Cli::try_parse_from(["seedrand", "draw", "--resume", "snap.json"]).is_ok());
    }
}
