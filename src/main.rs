use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;

use chaotic_heart::{PlotConfig, SequenceGenerator, Sequences, checked_bound, render, save_image, show_window};

#[derive(Parser, Debug)]
#[command(
    name = "chaotic-heart",
    version,
    about = "Plot a(n) - Q(n) for the Hofstadter chaotic heart sequences"
)]
struct Cli {
    /// Number of terms to generate (at least 3)
    #[arg(short, long, env = "CHAOTIC_HEART_BOUND", allow_negative_numbers = true)]
    bound: Option<i64>,

    /// JSON plot configuration
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write the plot to an image file (png, bmp, ...)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Do not open the interactive window
    #[arg(long)]
    no_window: bool,

    /// Print the first K terms of Q, a and a - Q
    #[arg(long, value_name = "K")]
    print: Option<usize>,

    /// Write the effective configuration as JSON and exit
    #[arg(long, value_name = "PATH")]
    dump_config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

fn effective_config(cli: &Cli) -> Result<PlotConfig> {
    let mut config = match &cli.config {
        Some(path) => PlotConfig::load_json(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => PlotConfig::default(),
    };
    if let Some(raw) = cli.bound {
        config.bound = checked_bound(raw)?;
    }
    config.validate()?;
    Ok(config)
}

fn print_terms(sequences: &Sequences, count: usize) {
    println!("{:>8} {:>8} {:>8} {:>8}", "n", "Q(n)", "a(n)", "a-Q");
    for (n, diff) in sequences.difference().take(count) {
        let q = sequences.q(n).unwrap_or_default();
        let a = sequences.a(n).unwrap_or_default();
        println!("{n:>8} {q:>8} {a:>8} {diff:>8}");
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = effective_config(&cli)?;

    if let Some(path) = &cli.dump_config {
        config.save_json(path)?;
        tracing::info!(path = %path.display(), "config written");
        return Ok(());
    }

    let generator = SequenceGenerator::new(config.bound)?;
    println!("Generating sequences up to N={}. This may take a few seconds...", generator.bound());

    let started = Instant::now();
    let sequences = generator.generate();
    tracing::info!(
        bound = sequences.len(),
        fallbacks = sequences.fallback_hits(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "sequences ready"
    );

    if let Some(count) = cli.print {
        print_terms(&sequences, count);
    }

    if cli.output.is_none() && cli.no_window {
        return Ok(());
    }

    let canvas = render(&sequences, &config);

    if let Some(path) = &cli.output {
        save_image(&canvas, path).with_context(|| format!("writing {}", path.display()))?;
    }
    if !cli.no_window {
        show_window(&canvas, &config.title)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from(["chaotic-heart", "--bound", "1000", "--no-window", "-vv"]).unwrap();
        assert_eq!(cli.bound, Some(1000));
        assert!(cli.no_window);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_non_integer_bound_rejected_by_parser() {
        assert!(Cli::try_parse_from(["chaotic-heart", "--bound", "3.5"]).is_err());
        assert!(Cli::try_parse_from(["chaotic-heart", "--bound", "many"]).is_err());
    }

    #[test]
    fn test_small_bounds_rejected() {
        for raw in ["0", "-1", "2"] {
            let cli = Cli::try_parse_from(["chaotic-heart", "--bound", raw]).unwrap();
            assert!(effective_config(&cli).is_err(), "bound {raw} should be rejected");
        }
    }

    #[test]
    fn test_bound_overrides_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("heart.json");
        PlotConfig::default().with_bound(500).save_json(&path).unwrap();

        let path_arg = path.to_str().unwrap();
        let cli = Cli::try_parse_from(["chaotic-heart", "-c", path_arg]).unwrap();
        assert_eq!(effective_config(&cli).unwrap().bound, 500);

        let cli = Cli::try_parse_from(["chaotic-heart", "-c", path_arg, "-b", "42"]).unwrap();
        assert_eq!(effective_config(&cli).unwrap().bound, 42);
    }
}
