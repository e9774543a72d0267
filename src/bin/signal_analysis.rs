//! Analyze a CSV price series from the command line.
//!
//! ```text
//! signal-analysis data/prices.csv --window 30 --spectrum-out spectrum.csv
//! ```
//!
//! Set `RUST_LOG=debug` for estimator details.

use anyhow::{Context, Result};
use clap::Parser;
use fractal_signals::{
    load_csv, write_rolling_variance_csv, write_spectrum_csv, AnalysisConfig, SignalAnalyzer,
    DEFAULT_MAX_LAG, DEFAULT_ROLLING_WINDOW,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about = "Spectral, volatility and Hurst analysis of a price series")]
struct Args {
    /// CSV file with Date and Price columns
    file: PathBuf,

    /// Rolling variance window
    #[arg(long, default_value_t = DEFAULT_ROLLING_WINDOW as i64)]
    window: i64,

    /// Exclusive upper bound on Hurst lags
    #[arg(long, default_value_t = DEFAULT_MAX_LAG)]
    max_lag: usize,

    /// Write the amplitude spectrum to this CSV file
    #[arg(long)]
    spectrum_out: Option<PathBuf>,

    /// Write the rolling variance to this CSV file
    #[arg(long)]
    variance_out: Option<PathBuf>,
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    Ok(BufWriter::new(file))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let series = load_csv(&args.file)
        .with_context(|| format!("loading {}", args.file.display()))?;

    let config = AnalysisConfig::default()
        .with_rolling_window(args.window)
        .with_max_hurst_lag(args.max_lag);
    let report = SignalAnalyzer::new(config).analyze(&series);

    println!("{}", report);

    if let Some(path) = &args.spectrum_out {
        match &report.spectrum {
            Some(Ok(spectrum)) => {
                write_spectrum_csv(spectrum, create(path)?)
                    .with_context(|| format!("writing {}", path.display()))?;
                log::info!("spectrum written to {}", path.display());
            }
            _ => log::warn!("no spectrum to write to {}", path.display()),
        }
    }

    if let Some(path) = &args.variance_out {
        match &report.rolling_variance {
            Some(Ok(rolling)) => {
                write_rolling_variance_csv(rolling, create(path)?)
                    .with_context(|| format!("writing {}", path.display()))?;
                log::info!("rolling variance written to {}", path.display());
            }
            _ => log::warn!("no rolling variance to write to {}", path.display()),
        }
    }

    Ok(())
}
