//! CLI binary for edgequake-img2pdf.
//!
//! A thin shim over the library crate: command-line arguments become the
//! file selection, a progress bar stands in for the progress indicator, and
//! "download" writes into the output directory.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_img2pdf::{
    ConversionConfig, ConversionProgressCallback, DecodeMode, DirectoryTarget, FileError,
    NoopFileInput, Notifier, PageSize, Preview, PreviewSink, Progress, ProgressCallback,
    SelectedFile, Session,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar, one log line per finished file.
struct CliProgressCallback {
    bar: ProgressBar,
    started: Instant,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:30.green/238}] {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Converting");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            started: Instant::now(),
        })
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_files: usize) {
        self.bar.set_length(total_files as u64);
        self.bar
            .set_message(Progress::new(0, total_files).fraction_text());
    }

    fn on_file_complete(&self, file_name: &str, progress: Progress) {
        self.bar.println(format!(
            "  {} {:<32}  {}",
            green("✓"),
            file_name,
            dim(&format!(
                "{:.1}s",
                self.started.elapsed().as_millis() as f64 / 1000.0
            )),
        ));
        self.bar.set_position(progress.completed as u64);
        self.bar.set_message(progress.fraction_text());
    }

    fn on_file_error(&self, file_name: &str, error: &FileError) {
        self.bar.println(format!(
            "  {} {:<32}  {}",
            red("✗"),
            file_name,
            red(&error.to_string())
        ));
    }

    fn on_batch_complete(&self, _total: usize, _success: bool) {
        self.bar.finish_and_clear();
    }
}

// ── Injected UI collaborators ────────────────────────────────────────────────

/// Lists the selection the way the browser shows thumbnails.
struct TerminalPreviews {
    quiet: bool,
}

impl PreviewSink for TerminalPreviews {
    fn show(&mut self, preview: &Preview) {
        if self.quiet {
            return;
        }
        let thumb = match &preview.thumbnail {
            Some(t) => dim(&format!("preview {}x{}", t.width, t.height)),
            None => red("no preview"),
        };
        eprintln!(
            "  {} [{}] {}  {}  {}",
            cyan("◇"),
            preview.index + 1,
            bold(&preview.file_name),
            dim(&preview.mime_type),
            thumb
        );
    }

    fn remove(&mut self, _index: usize) {}

    fn clear(&mut self) {}
}

/// Alerts go to stderr.
struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn alert(&self, message: &str) {
        eprintln!("{} {}", red("✘"), message);
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert two images into ./holiday.pdf and ./map.pdf
  img2pdf holiday.jpg map.png

  # Write into another directory, US Letter pages
  img2pdf --page-size letter -o out/ scan1.bmp scan2.bmp

  # Reproduce the legacy decoder behaviour for GIF/BMP/WEBP
  img2pdf --decode png-fallback logo.gif

  # JSON summary of the produced files
  img2pdf --json photo.webp

LAYOUT:
  Every image goes on its own page at its native size (1 px = 1 pt),
  50 pt from the left and top edges by default. Images larger than the
  page overflow it; nothing is scaled.

LIMITS:
  At most 3 files per run. Supported: PNG, JPG, JPEG, GIF, BMP, WEBP.
"#;

/// Convert up to three images into single-page PDF documents.
#[derive(Parser, Debug)]
#[command(
    name = "img2pdf",
    version,
    about = "Convert up to three images into single-page PDF documents",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Image files to convert (1–3).
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Directory the PDFs are written to.
    #[arg(short, long, env = "IMG2PDF_OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Page format.
    #[arg(long, env = "IMG2PDF_PAGE_SIZE", value_enum, default_value = "a4")]
    page_size: PageSizeArg,

    /// Distance from the left and top page edges, in points.
    #[arg(long, env = "IMG2PDF_MARGIN", default_value_t = 50.0)]
    margin: f32,

    /// Decoder for GIF/BMP/WEBP inputs.
    #[arg(long, env = "IMG2PDF_DECODE", value_enum, default_value = "native")]
    decode: DecodeArg,

    /// Maximum preview width in pixels.
    #[arg(long, env = "IMG2PDF_THUMBNAIL_WIDTH", default_value_t = 100)]
    thumbnail_width: u32,

    /// Print a JSON summary instead of the human-readable one.
    #[arg(long, env = "IMG2PDF_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "IMG2PDF_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "IMG2PDF_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "IMG2PDF_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum PageSizeArg {
    A4,
    Letter,
    Legal,
}

impl From<PageSizeArg> for PageSize {
    fn from(v: PageSizeArg) -> Self {
        match v {
            PageSizeArg::A4 => PageSize::A4,
            PageSizeArg::Letter => PageSize::Letter,
            PageSizeArg::Legal => PageSize::Legal,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum DecodeArg {
    Native,
    PngFallback,
}

impl From<DecodeArg> for DecodeMode {
    fn from(v: DecodeArg) -> Self {
        match v {
            DecodeArg::Native => DecodeMode::Native,
            DecodeArg::PngFallback => DecodeMode::PngFallback,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar provides all the feedback that matters; keep library
    // logs to errors while it is drawn.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn ConversionProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;

    // ── Select ───────────────────────────────────────────────────────────
    let mut session = Session::new(
        config,
        Box::new(NoopFileInput),
        Box::new(TerminalPreviews {
            quiet: cli.quiet || cli.json,
        }),
        Arc::new(StderrNotifier),
    );

    let picks: Vec<SelectedFile> = cli.files.iter().map(SelectedFile::from_path).collect();
    session
        .select_files(picks)
        .await
        .context("Invalid selection")?;

    // ── Convert ──────────────────────────────────────────────────────────
    let started = Instant::now();
    session.convert().await.context("Conversion failed")?;
    let elapsed_ms = started.elapsed().as_millis();

    // ── Download ─────────────────────────────────────────────────────────
    let target = DirectoryTarget::new(&cli.output_dir);
    let saved = session
        .download(&target)
        .with_context(|| format!("Failed to save PDFs into {}", cli.output_dir.display()))?;

    if cli.json {
        let files: Vec<serde_json::Value> = session
            .results()
            .iter()
            .zip(&saved)
            .map(|(r, path)| {
                serde_json::json!({
                    "source": r.source_name,
                    "output": path,
                    "bytes": r.pdf_len(),
                    "placement": r.placement,
                })
            })
            .collect();
        let summary = serde_json::json!({
            "files": files,
            "duration_ms": elapsed_ms,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Failed to serialise summary")?
        );
    } else if !cli.quiet {
        for (result, path) in session.results().iter().zip(&saved) {
            eprintln!(
                "  {} {}  →  {}  {}",
                green("✓"),
                result.source_name,
                bold(&path.display().to_string()),
                dim(&format!("{} bytes", result.pdf_len())),
            );
        }
        eprintln!(
            "{} {} PDF(s) in {}ms",
            green("✔"),
            bold(&saved.len().to_string()),
            elapsed_ms
        );
    }

    Ok(())
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder()
        .page_size(cli.page_size.into())
        .margin(cli.margin)
        .decode_mode(cli.decode.into())
        .thumbnail_width(cli.thumbnail_width);

    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
