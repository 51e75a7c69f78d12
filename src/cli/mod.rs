//! # CLI Module
//!
//! Command-line interface for the perceptual hasher.
//!
//! ## Usage
//! ```bash
//! # Hash files and directories
//! phash hash ~/Photos/cat.jpg ~/Photos/dogs
//!
//! # Different resampler and hash size
//! phash hash ~/Photos --resizer fast --filter catmull-rom --hash-size 16
//!
//! # Compare two images (or two saved hashes)
//! phash distance cat.jpg cat-small.jpg --threshold 5
//!
//! # JSON output
//! phash hash ~/Photos --output json
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use console::{style, Term};
use dct_phash::core::batch::{hash_files_with_progress, BatchResult};
use dct_phash::core::comparator::{compare, ComparisonStrategy, ThresholdStrategy};
use dct_phash::core::hasher::decode::ImageFormat;
use dct_phash::core::hasher::{
    DctMethod, FastScaler, FilterScaler, HasherConfig, PerceptualHash, PerceptualHasher,
    SampleChannel, ScaleFunction, GRID_SIZE, REDUCED_SIZE,
};
use dct_phash::error::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// phash - DCT perceptual hashes for images
#[derive(Parser, Debug)]
#[command(name = "phash")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Hash image files (directories are searched recursively)
    Hash {
        /// Files or directories to hash
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        #[command(flatten)]
        hasher: HasherArgs,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,

        /// Include hidden files
        #[arg(long)]
        include_hidden: bool,
    },

    /// Hamming distance between two images or two '0'/'1' hash strings
    Distance {
        /// First image path or hash string
        first: String,

        /// Second image path or hash string
        second: String,

        #[command(flatten)]
        hasher: HasherArgs,

        /// Near-duplicate threshold for 64-bit hashes (scaled for other lengths)
        #[arg(short, long, default_value = "8")]
        threshold: u32,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,
    },
}

#[derive(Args, Debug)]
struct HasherArgs {
    /// Sample grid size N (images are scaled to N x N)
    #[arg(long, default_value_t = GRID_SIZE)]
    grid_size: u32,

    /// Reduced size M (hash length is M * M bits)
    #[arg(long, default_value_t = REDUCED_SIZE)]
    hash_size: u32,

    /// DCT evaluation strategy
    #[arg(long, default_value = "direct")]
    dct: Dct,

    /// Channel used for colour images
    #[arg(long, default_value = "luma")]
    channel: Channel,

    /// Resizer implementation
    #[arg(long, default_value = "image")]
    resizer: Resizer,

    /// Resampling filter (hash values depend on it)
    #[arg(long, default_value = "lanczos3")]
    filter: Filter,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Dct {
    /// Reference O(N^4) summation
    Direct,
    /// Row/column O(N^3) evaluation
    Separable,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Channel {
    /// Luminance
    Luma,
    /// Blue channel only
    Blue,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Resizer {
    /// image crate resampling
    Image,
    /// SIMD resampling via fast_image_resize
    Fast,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Filter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
    /// Minimal output (hash and path)
    Minimal,
}

impl From<Dct> for DctMethod {
    fn from(dct: Dct) -> Self {
        match dct {
            Dct::Direct => DctMethod::Direct,
            Dct::Separable => DctMethod::Separable,
        }
    }
}

impl From<Channel> for SampleChannel {
    fn from(channel: Channel) -> Self {
        match channel {
            Channel::Luma => SampleChannel::Luma,
            Channel::Blue => SampleChannel::Blue,
        }
    }
}

impl HasherArgs {
    fn hasher(&self) -> Result<PerceptualHasher> {
        let hasher = HasherConfig::new()
            .grid_size(self.grid_size)
            .hash_size(self.hash_size)
            .dct(self.dct.into())
            .channel(self.channel.into())
            .build()?;
        Ok(hasher)
    }

    fn scaler(&self) -> Box<dyn ScaleFunction> {
        use fast_image_resize::FilterType as Fast;
        use image::imageops::FilterType as Img;

        match self.resizer {
            Resizer::Image => Box::new(FilterScaler::new(match self.filter {
                Filter::Nearest => Img::Nearest,
                Filter::Triangle => Img::Triangle,
                Filter::CatmullRom => Img::CatmullRom,
                Filter::Gaussian => Img::Gaussian,
                Filter::Lanczos3 => Img::Lanczos3,
            })),
            Resizer::Fast => Box::new(FastScaler::new(match self.filter {
                Filter::Nearest => Fast::Box,
                Filter::Triangle => Fast::Bilinear,
                Filter::CatmullRom => Fast::CatmullRom,
                Filter::Gaussian => Fast::Gaussian,
                Filter::Lanczos3 => Fast::Lanczos3,
            })),
        }
    }
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Hash {
            paths,
            hasher,
            output,
            include_hidden,
        } => run_hash(paths, &hasher, output, include_hidden),
        Commands::Distance {
            first,
            second,
            hasher,
            threshold,
            output,
        } => run_distance(&first, &second, &hasher, threshold, output),
    }
}

fn collect_images(paths: &[PathBuf], include_hidden: bool) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for root in paths {
        if root.is_file() {
            files.push(root.clone());
            continue;
        }

        let walker = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| include_hidden || entry.depth() == 0 || !is_hidden(entry.path()));

        for entry in walker {
            match entry {
                Ok(entry) if entry.file_type().is_file() && ImageFormat::is_image(entry.path()) => {
                    files.push(entry.into_path());
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "skipping unreadable entry"),
            }
        }
    }

    files.sort();
    files.dedup();
    files
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn run_hash(
    paths: Vec<PathBuf>,
    args: &HasherArgs,
    output: OutputFormat,
    include_hidden: bool,
) -> Result<()> {
    let term = Term::stderr();
    let hasher = args.hasher()?;
    let scaler = args.scaler();
    let files = collect_images(&paths, include_hidden);

    if matches!(output, OutputFormat::Pretty) {
        term.write_line(&format!(
            "{} {}",
            style("phash").bold().cyan(),
            style(format!("v{}", env!("CARGO_PKG_VERSION"))).dim()
        ))
        .ok();
        term.write_line(&format!(
            "  {}x{} grid, {}-bit hash, {} DCT, {} channel",
            hasher.grid_size(),
            hasher.grid_size(),
            hasher.hash_bits(),
            hasher.config().dct_method(),
            hasher.config().sample_channel(),
        ))
        .ok();
        term.write_line("").ok();
    }

    let progress = if matches!(output, OutputFormat::Pretty) {
        let pb = ProgressBar::new(files.len() as u64);
        if let Ok(bar_style) =
            ProgressStyle::default_bar().template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(bar_style.progress_chars("█▓░"));
        }
        Some(pb)
    } else {
        None
    };

    let result = hash_files_with_progress(&files, &hasher, scaler.as_ref(), |done, _| {
        if let Some(ref pb) = progress {
            pb.set_position(done as u64);
        }
    });

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    match output {
        OutputFormat::Pretty => print_pretty_hashes(&term, &result),
        OutputFormat::Json => print_json_hashes(&result),
        OutputFormat::Minimal => print_minimal_hashes(&result),
    }

    Ok(())
}

fn print_pretty_hashes(term: &Term, result: &BatchResult) {
    for item in &result.items {
        let line = match &item.result {
            Ok(hash) => format!("  {} {}", style(hash).green(), item.path.display()),
            Err(e) => format!(
                "  {} {}: {}",
                style("✗").red().bold(),
                item.path.display(),
                style(e).red()
            ),
        };
        term.write_line(&line).ok();
    }

    term.write_line("").ok();
    term.write_line(&format!(
        "  {} images hashed, {} failed in {:.1}s",
        style(result.hashed().count()).cyan(),
        style(result.error_count()).yellow(),
        result.duration_ms as f64 / 1000.0
    ))
    .ok();
}

fn print_json_hashes(result: &BatchResult) {
    let output = serde_json::json!({
        "duration_ms": result.duration_ms,
        "errors": result.error_count(),
        "items": result.items.iter().map(|item| match &item.result {
            Ok(hash) => serde_json::json!({
                "path": item.path,
                "hash": hash,
                "hex": hash.to_hex(),
            }),
            Err(e) => serde_json::json!({
                "path": item.path,
                "error": e.to_string(),
            }),
        }).collect::<Vec<_>>()
    });

    print_json(&output);
}

fn print_minimal_hashes(result: &BatchResult) {
    for (path, hash) in result.hashed() {
        println!("{}  {}", hash, path.display());
    }
}

/// A command-line operand: a saved hash string, or an image to hash
fn resolve_operand(operand: &str, hasher: &PerceptualHasher, scaler: &dyn ScaleFunction) -> Result<PerceptualHash> {
    let path = Path::new(operand);
    if !path.exists() {
        if let Ok(hash) = operand.parse::<PerceptualHash>() {
            return Ok(hash);
        }
    }

    Ok(hasher.hash_file(path, scaler)?)
}

fn run_distance(
    first: &str,
    second: &str,
    args: &HasherArgs,
    threshold: u32,
    output: OutputFormat,
) -> Result<()> {
    let hasher = args.hasher()?;
    let scaler = args.scaler();

    let a = resolve_operand(first, &hasher, scaler.as_ref())?;
    let b = resolve_operand(second, &hasher, scaler.as_ref())?;

    let strategy = ThresholdStrategy::new(threshold).for_bits(a.len());
    let result = compare(&a, &b, &strategy)?;
    let near_duplicate = strategy.is_duplicate(result.distance);

    match output {
        OutputFormat::Pretty => {
            let term = Term::stdout();
            term.write_line(&format!("  {} {}", style(&a).dim(), first)).ok();
            term.write_line(&format!("  {} {}", style(&b).dim(), second)).ok();
            term.write_line("").ok();
            term.write_line(&format!(
                "  distance {} of {} bits ({:.1}% similar)",
                style(result.distance).cyan().bold(),
                result.bits,
                result.similarity_percent
            ))
            .ok();
            let verdict = if near_duplicate {
                style(format!("{}", result.match_type)).green()
            } else {
                style(format!("{}", result.match_type)).yellow()
            };
            term.write_line(&format!("  {} ({})", verdict, strategy.description())).ok();
        }
        OutputFormat::Json => print_json(&serde_json::json!({
            "first": { "input": first, "hash": a },
            "second": { "input": second, "hash": b },
            "result": result,
            "near_duplicate": near_duplicate,
        })),
        OutputFormat::Minimal => println!("{}", result.distance),
    }

    Ok(())
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => tracing::error!(error = %e, "failed to render JSON output"),
    }
}
