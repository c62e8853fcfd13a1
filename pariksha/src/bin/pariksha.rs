//! Pariksha command line front-end.
//!
//! # Usage
//!
//! ```bash
//! # Full evaluation, results written to ./results
//! pariksha evaluate -r groundtruth.txt -e estimate.txt -o results
//!
//! # Inspect the alignment regions of an estimate
//! pariksha regions -e estimate.txt
//!
//! # Search the estimate clock offset in [-1, 1] s
//! pariksha offset -r groundtruth.txt -e estimate.txt --lower -1 --upper 1
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use pariksha::config::ParikshaConfig;
use pariksha::evaluation::{PoseRelation, find_time_offset};
use pariksha::io::{export_report, load_tum};
use pariksha::{PoseErrorEvaluator, RegionDetector, Result};

#[derive(Parser, Debug)]
#[command(author, version, about = "Segment-aware SLAM trajectory evaluation", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Align the estimate region by region and compute APE / RPE
    Evaluate {
        /// Reference trajectory (TUM format)
        #[arg(short, long)]
        reference: PathBuf,

        /// Estimated trajectory (TUM format)
        #[arg(short, long)]
        estimate: PathBuf,

        /// YAML config (defaults to configs/pariksha.yaml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory for aligned_estimate.txt, errors.csv and summary.json
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Offset added to estimate timestamps (seconds), overrides the config
        #[arg(long, allow_hyphen_values = true)]
        offset: Option<f64>,

        /// Pose relation for APE, overrides the config
        #[arg(long, value_enum)]
        ape_relation: Option<PoseRelation>,

        /// Pose relation for RPE, overrides the config
        #[arg(long, value_enum)]
        rpe_relation: Option<PoseRelation>,
    },

    /// Print the alignment regions detected on an estimate
    Regions {
        /// Estimated trajectory (TUM format)
        #[arg(short, long)]
        estimate: PathBuf,

        /// YAML config (defaults to configs/pariksha.yaml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Search the estimate clock offset minimizing mean RPE
    Offset {
        /// Reference trajectory (TUM format)
        #[arg(short, long)]
        reference: PathBuf,

        /// Estimated trajectory (TUM format)
        #[arg(short, long)]
        estimate: PathBuf,

        /// YAML config (defaults to configs/pariksha.yaml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Lower end of the search bracket (seconds)
        #[arg(long, allow_hyphen_values = true)]
        lower: Option<f64>,

        /// Upper end of the search bracket (seconds)
        #[arg(long, allow_hyphen_values = true)]
        upper: Option<f64>,

        /// Number of search iterations
        #[arg(long)]
        iterations: Option<usize>,
    },
}

fn load_config(path: Option<&Path>) -> Result<ParikshaConfig> {
    let config = match path {
        Some(path) => {
            log::info!("Loading config from {}", path.display());
            ParikshaConfig::load(path)?
        }
        None => ParikshaConfig::load_default()?,
    };
    Ok(config)
}

/// Command line overrides of the evaluate subcommand.
struct EvaluateOverrides {
    offset: Option<f64>,
    ape_relation: Option<PoseRelation>,
    rpe_relation: Option<PoseRelation>,
}

fn run_evaluate(
    reference: &Path,
    estimate: &Path,
    config: Option<&Path>,
    output_dir: Option<&Path>,
    overrides: EvaluateOverrides,
) -> Result<()> {
    let mut config = load_config(config)?;
    if let Some(offset) = overrides.offset {
        config.association.offset = offset;
    }
    if let Some(relation) = overrides.ape_relation {
        config.metrics.ape_relation = relation;
    }
    if let Some(relation) = overrides.rpe_relation {
        config.metrics.rpe.relation = relation;
    }

    let reference = load_tum(reference)?;
    let estimate = load_tum(estimate)?;

    let evaluator = PoseErrorEvaluator::new(config.to_evaluator_config()?);
    let report = evaluator.evaluate(&reference, &estimate)?;
    report.print();

    if let Some(dir) = output_dir {
        let files = export_report(&report, dir)?;
        println!();
        println!("Aligned estimate: {}", files.aligned_estimate.display());
        println!("Error table:      {}", files.error_table.display());
        println!("Summary:          {}", files.summary.display());
    }
    Ok(())
}

fn run_regions(estimate: &Path, config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let estimate = load_tum(estimate)?;

    let detection = RegionDetector::new(config.region_detector_config()).detect(&estimate)?;

    println!("=== Alignment Regions ===");
    println!("Poses: {}", estimate.len());
    for (i, region) in detection.regions.iter().enumerate() {
        println!(
            "  [{}] poses {}..{} ({} poses, t = {:.3} .. {:.3} s)",
            i,
            region.start,
            region.end,
            region.len(),
            estimate.timestamps()[region.start],
            estimate.timestamps()[region.end.min(estimate.len() - 1)],
        );
    }
    println!("Lost regions:");
    for lost in &detection.lost_regions {
        println!("  poses {}..={}", lost.start, lost.end);
    }
    println!("Shift checkpoints: {:?}", detection.shift_checkpoints);
    println!("Aux checkpoints:   {:?}", detection.aux_checkpoints);
    Ok(())
}

fn run_offset(
    reference: &Path,
    estimate: &Path,
    config: Option<&Path>,
    lower: Option<f64>,
    upper: Option<f64>,
    iterations: Option<usize>,
) -> Result<()> {
    let config = load_config(config)?;
    let mut search = config.offset_search_config();
    if let Some(lower) = lower {
        search.lower = lower;
    }
    if let Some(upper) = upper {
        search.upper = upper;
    }
    if let Some(iterations) = iterations {
        search.iterations = iterations;
    }

    let evaluator = PoseErrorEvaluator::new(config.to_evaluator_config()?);
    let (reference, _) = evaluator.prepare_reference(&load_tum(reference)?)?;
    let (estimate, _) = evaluator.prepare_estimate(&load_tum(estimate)?)?;

    let result = find_time_offset(&reference, &estimate, &search)?;
    println!("=== Time Offset ===");
    println!("Bracket: [{}, {}] s, iterations: {}", search.lower, search.upper, search.iterations);
    println!("Best offset: {:.5} s", result.offset);
    println!(
        "Mean RPE ({}): {:.5} {}",
        search.rpe.relation,
        result.error,
        search.rpe.relation.unit()
    );
    println!("Evaluations: {}", result.evaluations);
    Ok(())
}

fn run(args: Args) -> Result<()> {
    match args.command {
        Command::Evaluate {
            reference,
            estimate,
            config,
            output_dir,
            offset,
            ape_relation,
            rpe_relation,
        } => run_evaluate(
            &reference,
            &estimate,
            config.as_deref(),
            output_dir.as_deref(),
            EvaluateOverrides {
                offset,
                ape_relation,
                rpe_relation,
            },
        ),
        Command::Regions { estimate, config } => run_regions(&estimate, config.as_deref()),
        Command::Offset {
            reference,
            estimate,
            config,
            lower,
            upper,
            iterations,
        } => run_offset(
            &reference,
            &estimate,
            config.as_deref(),
            lower,
            upper,
            iterations,
        ),
    }
}

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {} - {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
