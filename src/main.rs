use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use wavsplit::config::AppConfig;
use wavsplit::pipeline::split_file;
use wavsplit::types::{
    RuntimeParams, SegmentParams, DEFAULT_MIN_SILENCE_RUN, DEFAULT_SILENCE_THRESHOLD,
};

/// wavsplit - split a recording into clips at silent gaps
///
/// Reads a mono 16-bit PCM file and writes every non-silent stretch that is
/// followed by a long enough silence as `<name>_<index>.wav`.
#[derive(Parser, Debug)]
#[command(name = "wavsplit")]
#[command(version)]
#[command(about = "Split a mono 16-bit recording into clips at silent gaps", long_about = None)]
struct Args {
    /// Input audio file (mono, 16-bit PCM)
    #[arg(short = 's', long = "source", value_name = "PATH")]
    source: Option<PathBuf>,

    /// Directory to store clips in [default: `clips` next to the executable]
    #[arg(short = 'd', long = "dest", value_name = "DIR")]
    dest: Option<PathBuf>,

    /// Consecutive silent samples that end a clip
    #[arg(long, value_name = "SAMPLES", conflicts_with_all = ["params_json", "params_file"])]
    min_silence_run: Option<usize>,

    /// Largest absolute amplitude treated as silence
    #[arg(long, value_name = "AMPLITUDE", conflicts_with_all = ["params_json", "params_file"])]
    threshold: Option<u16>,

    /// Also write the final clip when the recording ends before its silence does
    #[arg(long, conflicts_with_all = ["params_json", "params_file"])]
    keep_trailing: bool,

    /// Segmentation parameters as an inline JSON object
    #[arg(long, value_name = "JSON", conflicts_with = "params_file")]
    params_json: Option<String>,

    /// Path to a JSON file with segmentation parameters
    #[arg(long, value_name = "PATH", conflicts_with = "params_json")]
    params_file: Option<PathBuf>,
}

impl Args {
    fn segment_params(&self) -> Result<SegmentParams> {
        if self.params_file.is_some() || self.params_json.is_some() {
            let runtime =
                load_params_from_sources(self.params_file.as_deref(), self.params_json.as_deref())?;
            return runtime
                .to_params()
                .context("Segmentation parameter validation failed");
        }

        Ok(SegmentParams::new(
            self.min_silence_run.unwrap_or(DEFAULT_MIN_SILENCE_RUN),
            self.threshold.unwrap_or(DEFAULT_SILENCE_THRESHOLD),
        )
        .with_flush_trailing(self.keep_trailing))
    }
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let params = args
        .segment_params()
        .context("Failed to load segmentation parameters")?;
    let config = AppConfig::from_override(args.dest.clone())
        .context("Failed to resolve output directory")?;

    if let Some(source) = &args.source {
        println!("Input:  {:?}", source);
    }
    println!("Output dir: {:?}", config.output_dir);
    println!(
        "Minimum silence run: {} samples, threshold: {}{}",
        params.min_silence_run,
        params.silence_threshold,
        if params.flush_trailing {
            ", keeping trailing clip"
        } else {
            ""
        }
    );

    let report = split_file(args.source.as_deref(), &config, &params)
        .context("Failed to split recording")?;

    let rate = report.format.frame_rate;
    for clip in &report.clips {
        println!(
            "   Wrote clip {} to {:?} ({:.3}s → {:.3}s)",
            clip.index,
            clip.path,
            clip.range.start_secs(rate),
            clip.range.end_secs(rate)
        );
    }
    println!(
        "Completed writing {} clip files under {:?}",
        report.clips.len(),
        config.output_dir
    );

    Ok(())
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wavsplit=info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn load_params_from_sources(path: Option<&Path>, json: Option<&str>) -> Result<RuntimeParams> {
    if let Some(p) = path {
        let data = fs::read_to_string(p)
            .with_context(|| format!("Failed to read parameter file {:?}", p))?;
        return parse_runtime_params(&data);
    }

    if let Some(raw) = json {
        return parse_runtime_params(raw);
    }

    bail!("No parameter source provided");
}

fn parse_runtime_params(raw: &str) -> Result<RuntimeParams> {
    let params: RuntimeParams =
        serde_json::from_str(raw).context("Failed to parse segmentation parameter JSON")?;
    Ok(params)
}
