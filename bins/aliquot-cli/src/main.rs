//! Aliquot sequence explorer binary.
//!
//! Classifies every seed in `1..=n_max`, traces single sequences, and
//! factors individual integers, reusing the persisted sieve and
//! factorization cache between runs.

use std::path::PathBuf;

use aliquot_engine::sigma;
use aliquot_runtime::{Explorer, ExplorerConfig};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;

/// Aliquot sequence explorer.
#[derive(Parser, Debug)]
#[command(name = "aliquot", version, about = "Explore aliquot sequences n -> s(n)")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// Directory for the persisted mask and factor cache.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Config file (TOML, YAML, or JSON) layered under the CLI flags.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Step budget K.
    #[arg(short = 'k', long, global = true)]
    max_steps: Option<u32>,

    /// Growth bound I.
    #[arg(short = 'i', long, global = true)]
    growth_bound: Option<u64>,

    /// Persist factorizations of n up to this value.
    #[arg(long, global = true)]
    cache_ceiling: Option<u64>,

    /// Evict session-only factorizations once this many accumulate.
    #[arg(long, global = true)]
    session_cache_limit: Option<usize>,

    /// Neither read nor write state files.
    #[arg(long, global = true)]
    no_persist: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log output format ("text" or "json")
    #[arg(long, global = true, default_value = "text")]
    log_format: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify every seed in 1..=n_max and report counts per status.
    Survey {
        /// Upper end of the seed range.
        #[arg(short = 'n', long)]
        n_max: Option<u64>,

        /// Print the counts as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Trace one aliquot sequence.
    Trace {
        seed: u64,

        /// Print the sequence as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Factor n and show sigma(n) and s(n).
    Factor { n: u64 },
}

impl GlobalArgs {
    /// Layer file/env configuration, then these flags.
    fn into_config(self) -> Result<(ExplorerConfig, String)> {
        let mut config =
            ExplorerConfig::load(self.config.as_deref()).context("failed to load configuration")?;

        if let Some(dir) = self.data_dir {
            config.data_dir = dir;
        }
        if let Some(k) = self.max_steps {
            config.max_steps = k;
        }
        if let Some(bound) = self.growth_bound {
            config.growth_bound = bound;
        }
        if let Some(ceiling) = self.cache_ceiling {
            config.cache_ceiling = ceiling;
        }
        if self.session_cache_limit.is_some() {
            config.session_cache_limit = self.session_cache_limit;
        }
        if self.no_persist {
            config.persist = false;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        config.validate().context("invalid configuration")?;

        Ok((config, self.log_format))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let (mut config, log_format) = cli.global.into_config()?;

    init_logging(&config.log_level, &log_format);

    info!("aliquot v{}", env!("CARGO_PKG_VERSION"));
    info!("data_dir: {:?}", config.data_dir);
    info!(
        "max_steps: {} growth_bound: {} persist: {}",
        config.max_steps, config.growth_bound, config.persist
    );

    if let Commands::Survey { n_max: Some(n), .. } = cli.command {
        config.n_max = n;
    }

    let mut explorer = Explorer::open(&config).context("failed to open explorer state")?;

    match cli.command {
        Commands::Survey { json, .. } => {
            let census = explorer.survey(config.n_max);
            if json {
                println!("{}", serde_json::to_string_pretty(&census)?);
            } else {
                println!("seeds 1..={}", config.n_max);
                println!("{census}");
            }
        }
        Commands::Trace { seed, json } => {
            let seq = explorer
                .trace(seed)
                .with_context(|| format!("failed to trace seed {seed}"))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&seq)?);
            } else {
                let terms: Vec<String> = seq.terms.iter().map(u128::to_string).collect();
                println!("{}", terms.join(" -> "));
                println!("status: {} after {} steps", seq.status, seq.steps());
            }
        }
        Commands::Factor { n } => {
            let factors = explorer
                .factorize(n)
                .with_context(|| format!("failed to factor {n}"))?;
            let sigma_n = sigma(&factors).with_context(|| format!("sigma({n}) failed"))?;
            let s_n = explorer
                .aliquot_sum(n)
                .with_context(|| format!("s({n}) failed"))?;
            println!("{n} = {factors}");
            println!("sigma({n}) = {sigma_n}");
            println!("s({n}) = {s_n}");
        }
    }

    explorer.close().context("failed to save factor cache")?;
    Ok(())
}

/// Initialize tracing subscriber with the given log level and output format.
///
/// Logs go to stderr so command output on stdout stays clean. Pass
/// `format = "json"` for structured JSON output; anything else is text.
fn init_logging(level_str: &str, format: &str) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_str));

    if format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_survey_flags() {
        let cli = Cli::parse_from(["aliquot", "survey", "-n", "500", "--json", "-k", "30"]);
        assert_eq!(cli.global.max_steps, Some(30));
        match cli.command {
            Commands::Survey { n_max, json } => {
                assert_eq!(n_max, Some(500));
                assert!(json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parses_trace_seed() {
        let cli = Cli::parse_from(["aliquot", "--no-persist", "trace", "276"]);
        assert!(cli.global.no_persist);
        assert!(matches!(cli.command, Commands::Trace { seed: 276, json: false }));
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from([
            "aliquot",
            "--data-dir",
            "/tmp/aliquot-cli-test",
            "--growth-bound",
            "1000000",
            "--no-persist",
            "factor",
            "12",
        ]);
        let (config, format) = cli.global.into_config().unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/aliquot-cli-test"));
        assert_eq!(config.growth_bound, 1_000_000);
        assert!(!config.persist);
        assert_eq!(format, "text");
    }

    #[test]
    fn zero_steps_rejected() {
        let cli = Cli::parse_from(["aliquot", "-k", "0", "factor", "12"]);
        assert!(cli.global.into_config().is_err());
    }
}
