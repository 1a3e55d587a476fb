use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use log::{error, info};
use serde::Serialize;
use std::fs;
use std::io::{self, Read, Write};
use std::time::Instant;
use uuid::Uuid;

use persona_lib::clustering::PersonaInput;
use persona_lib::error::ClusteringError;
use persona_lib::models::{ClusteringResult, QualityReport, RawRecord};
use persona_lib::pipeline::run_persona_analysis;
use persona_lib::quality::interpret_separation;
use persona_lib::utils::clustering_config::ClusteringOptions;
use persona_lib::utils::env::load_env;
use persona_lib::utils::progress_bars::logging::{log_pipeline_completion, log_pipeline_start};
use persona_lib::utils::progress_bars::progress_config::ProgressConfig;

const PIPELINE_STAGES: u64 = 3;

#[derive(Parser)]
#[command(author, version, about = "Cluster labeled SNS posts into persona segments", long_about = None)]
struct Args {
    /// JSON array of posts; "-" reads stdin
    #[arg(long, default_value = "-")]
    input: String,

    /// Write the report here instead of stdout
    #[arg(long)]
    output: Option<String>,

    /// Fixed cluster count (0 picks k from the data size)
    #[arg(long)]
    k: Option<usize>,

    /// Minimum known attributes for a post to be clustered
    #[arg(long)]
    min_known_fields: Option<usize>,

    #[arg(long)]
    max_iterations: Option<usize>,

    /// Representative posts kept per cluster
    #[arg(long)]
    samples: Option<usize>,

    /// Seed for k-means++ and projection jitter
    #[arg(long)]
    seed: Option<u64>,

    /// Disable position jitter
    #[arg(long)]
    no_jitter: bool,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,
}

#[derive(Serialize)]
struct AnalysisReport {
    run_id: String,
    generated_at: DateTime<Utc>,
    clustering: ClusteringResult,
    quality: QualityReport,
    personas: Vec<PersonaInput>,
}

fn build_options(args: &Args) -> ClusteringOptions {
    let mut options = ClusteringOptions::from_env();
    if let Some(k) = args.k {
        options = options.with_k(k);
    }
    if let Some(min_known_fields) = args.min_known_fields {
        options.min_known_fields = min_known_fields;
    }
    if let Some(max_iterations) = args.max_iterations {
        options.max_iterations = max_iterations;
    }
    if let Some(samples) = args.samples {
        options.sample_post_count = samples;
    }
    if let Some(seed) = args.seed {
        options = options.with_seed(seed);
    }
    if args.no_jitter {
        options.projection = options.projection.without_jitter();
    }
    options
}

fn read_posts(input: &str) -> Result<Vec<RawRecord>> {
    let raw = if input == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read posts from stdin")?;
        buf
    } else {
        fs::read_to_string(input).with_context(|| format!("Failed to read input file {}", input))?
    };
    serde_json::from_str(&raw).context("Failed to parse posts JSON")
}

fn write_report(report: &AnalysisReport, output: Option<&str>, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(report)
    } else {
        serde_json::to_string(report)
    }
    .context("Failed to serialize report")?;

    match output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("Failed to write report to {}", path))?;
            info!("Report written to {}", path);
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", json).context("Failed to write report to stdout")?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    // Initialize logging and environment
    env_logger::init();
    info!("Starting persona clustering");
    load_env();

    let args = Args::parse();
    let options = build_options(&args);
    options.log_config();

    let progress_config = ProgressConfig::from_env();
    info!(
        "Progress tracking: enabled={}, detailed={}",
        progress_config.enabled, progress_config.detailed
    );
    let multi_progress = progress_config.create_multi_progress();
    let main_pb = multi_progress
        .as_ref()
        .map(|mp| progress_config.stage_bar(mp, PIPELINE_STAGES));

    let start_time = Instant::now();
    let run_id = Uuid::new_v4().to_string();

    if let Some(pb) = &main_pb {
        pb.set_message("Loading posts...");
    }
    let posts = read_posts(&args.input)?;
    log_pipeline_start(&run_id, posts.len());
    if let Some(pb) = &main_pb {
        pb.inc(1);
        pb.set_message("Clustering...");
    }

    let spinner = multi_progress
        .as_ref()
        .and_then(|mp| progress_config.detail_spinner(mp));
    if let Some(sp) = &spinner {
        sp.set_message(format!("Encoding and clustering {} posts", posts.len()));
    }
    let outcome = run_persona_analysis(&posts, &options);
    if let Some(sp) = spinner {
        sp.finish_and_clear();
    }
    let analysis = match outcome {
        Ok(analysis) => analysis,
        Err(e @ ClusteringError::InsufficientData { clusterable, required }) => {
            if let Some(pb) = &main_pb {
                pb.abandon_with_message("Insufficient data");
            }
            error!(
                "❌ Only {} of {} posts are clusterable; at least {} are required. \
                 Try a lower --min-known-fields or PERSONA_MIN_K.",
                clusterable,
                posts.len(),
                required
            );
            return Err(e).context("Persona analysis failed");
        }
    };
    info!(
        "Cluster separation: {}",
        interpret_separation(analysis.quality.silhouette_score)
    );
    if let Some(pb) = &main_pb {
        pb.inc(1);
        pb.set_message("Writing report...");
    }

    let report = AnalysisReport {
        run_id: run_id.clone(),
        generated_at: Utc::now(),
        clustering: analysis.clustering,
        quality: analysis.quality,
        personas: analysis.personas,
    };
    write_report(&report, args.output.as_deref(), args.pretty)?;

    if let Some(pb) = &main_pb {
        pb.inc(1);
        pb.finish_with_message("Done");
    }
    log_pipeline_completion(&run_id, start_time.elapsed(), &report.quality);
    Ok(())
}
