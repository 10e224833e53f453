//! CLI binary for folder2pdf.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and prints results.

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use folder2pdf::{
    convert_folder, parse_records, plan_folder, run_batch, BatchReport, ConversionConfig,
    ConversionProgressCallback, ConversionRequest, ConversionStats, DecodePolicy, PageSize,
    ProgressCallback, SortOrder,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
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

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback. In direct mode the bar counts images; in
/// batch mode it counts CSV lines and per-image events only update the
/// message.
struct CliProgressCallback {
    bar: ProgressBar,
    batch: bool,
}

impl CliProgressCallback {
    fn new(batch: bool) -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set once the total is known

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message(if batch { "Reading CSV…" } else { "Scanning folder…" });
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar, batch })
    }

    /// Switch to the full progress-bar style once we know `total`.
    fn activate_bar(&self, total: usize, unit: &str) {
        let template = format!(
            "{{spinner:.cyan}} {{prefix:.bold}}  \
             [{{bar:42.green/238}}] {{pos:>3}}/{{len}} {unit}  \
             ⏱ {{elapsed_precise}}  {{msg}}"
        );
        let progress_style = ProgressStyle::with_template(&template)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  ")
            .tick_strings(TICKS);

        self.bar.set_length(total as u64);
        self.bar.set_position(0);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Converting");
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_conversion_start(&self, folder: &Path, total_images: usize) {
        if self.batch {
            self.bar.set_message(folder.display().to_string());
            return;
        }
        self.activate_bar(total_images, "images");
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!(
                "Converting {total_images} images from {}…",
                folder.display()
            ))
        ));
    }

    fn on_image_complete(&self, _index: usize, _total: usize, file: &Path) {
        if !self.batch {
            self.bar.set_message(file_label(file));
            self.bar.inc(1);
        }
    }

    fn on_image_error(&self, index: usize, total: usize, _file: &Path, error: &str) {
        self.bar.println(format!(
            "  {} Image {:>3}/{:<3}  {}",
            red("✗"),
            index,
            total,
            red(error),
        ));
        if !self.batch {
            self.bar.inc(1);
        }
    }

    fn on_conversion_complete(&self, output: &Path, page_count: usize, skipped: usize) {
        if self.batch {
            return;
        }
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} pages  →  {}{}",
            if skipped == 0 { green("✔") } else { cyan("⚠") },
            bold(&page_count.to_string()),
            bold(&output.display().to_string()),
            if skipped == 0 {
                String::new()
            } else {
                red(&format!("  ({skipped} skipped)"))
            }
        );
    }

    fn on_conversion_error(&self, _folder: &Path, _error: &str) {
        // Batch failures are reported per line; main prints the error.
        if !self.batch {
            self.bar.finish_and_clear();
        }
    }

    fn on_batch_start(&self, total_lines: usize) {
        self.activate_bar(total_lines, "lines");
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Processing {total_lines} CSV lines…"))
        ));
    }

    fn on_line_complete(&self, line_number: usize, error: Option<&str>) {
        let line = match error {
            None => format!("  {} Line {:>3}", green("✓"), line_number),
            // Multi-line error messages keep only their first line here.
            Some(e) => format!("  {} {}", red("✗"), red(e.lines().next().unwrap_or(e))),
        };
        self.bar.println(line);
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, succeeded: usize, failed: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} lines converted{}",
            if failed == 0 { green("✔") } else { cyan("⚠") },
            bold(&succeeded.to_string()),
            if failed == 0 {
                String::new()
            } else {
                format!("  ({} failed)", red(&failed.to_string()))
            }
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # One folder → one PDF (".pdf" is appended when missing)
  folder2pdf --folder_path scans/january --pdf_name reports/january

  # Batch: one "folder_path;pdf_name" pair per line
  folder2pdf --csv_file jobs.csv

  # Put every image on A4 paper with a half-inch margin
  folder2pdf --folder_path imgs --pdf_name book.pdf --page-size a4 --margin 36

  # pag_2.jpg before pag_10.jpg
  folder2pdf --folder_path capture --pdf_name capture --sort natural

  # Show the page order without writing anything
  folder2pdf --folder_path imgs --pdf_name out --dry-run

CSV FORMAT:
  scans/2024-01;reports/january
  scans/2024-02;reports/february.pdf

  No header, no quoting. Fields are trimmed, blank lines ignored.
  Malformed lines are reported and skipped; the batch keeps going.

PAGE ORDER:
  lexicographic  byte-wise by file name, case-sensitive (default)
  natural        digit runs compared as numbers

EXIT STATUS:
  0  conversion written, or batch finished (failed lines are reported)
  1  fatal error: missing folder or CSV, no images, unwritable output
  2  invalid command line
"#;

/// Assemble folders of PNG/JPEG images into PDF documents.
#[derive(Parser, Debug)]
#[command(
    name = "folder2pdf",
    version,
    about = "Assemble folders of PNG/JPEG images into PDF documents, one image per page",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP,
    group(
        ArgGroup::new("mode")
            .required(true)
            .args(["folder_path", "csv_file"])
    )
)]
struct Cli {
    /// Folder whose PNG/JPG/JPEG files become the pages (direct mode).
    #[arg(
        long = "folder_path",
        visible_alias = "folder-path",
        value_name = "PATH",
        requires = "pdf_name",
        conflicts_with = "csv_file"
    )]
    folder_path: Option<PathBuf>,

    /// Output PDF; ".pdf" is appended when missing (direct mode).
    #[arg(
        long = "pdf_name",
        visible_alias = "pdf-name",
        value_name = "NAME",
        requires = "folder_path",
        conflicts_with = "csv_file"
    )]
    pdf_name: Option<PathBuf>,

    /// CSV of "folder_path;pdf_name" lines (batch mode).
    #[arg(long = "csv_file", visible_alias = "csv-file", value_name = "PATH")]
    csv_file: Option<PathBuf>,

    /// Page size: fit (page = image), a4, letter.
    #[arg(long, env = "FOLDER2PDF_PAGE_SIZE", value_enum, default_value = "fit")]
    page_size: PageSizeArg,

    /// Pixels per inch when the page follows the image size (72–600).
    #[arg(long, env = "FOLDER2PDF_DPI", default_value_t = 150,
          value_parser = clap::value_parser!(u32).range(72..=600))]
    dpi: u32,

    /// Margin in points around images on a4/letter pages.
    #[arg(long, env = "FOLDER2PDF_MARGIN", default_value_t = 0.0)]
    margin: f32,

    /// Page order rule.
    #[arg(long, env = "FOLDER2PDF_SORT", value_enum, default_value = "lexicographic")]
    sort: SortArg,

    /// Abort when an image fails to decode instead of skipping it.
    #[arg(long, env = "FOLDER2PDF_STRICT")]
    strict: bool,

    /// Document title (defaults to the output file name; direct mode only).
    #[arg(long, conflicts_with = "csv_file")]
    title: Option<String>,

    /// CSV lines converted at the same time in batch mode.
    #[arg(short, long, env = "FOLDER2PDF_JOBS", default_value_t = 1)]
    jobs: usize,

    /// List the page order without decoding or writing anything.
    #[arg(long)]
    dry_run: bool,

    /// Print the result (stats or batch report) as JSON on stdout.
    #[arg(long, env = "FOLDER2PDF_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "FOLDER2PDF_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "FOLDER2PDF_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "FOLDER2PDF_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum PageSizeArg {
    Fit,
    A4,
    Letter,
}

impl From<PageSizeArg> for PageSize {
    fn from(v: PageSizeArg) -> Self {
        match v {
            PageSizeArg::Fit => PageSize::FitImage,
            PageSizeArg::A4 => PageSize::A4,
            PageSizeArg::Letter => PageSize::Letter,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum SortArg {
    Lexicographic,
    Natural,
}

impl From<SortArg> for SortOrder {
    fn from(v: SortArg) -> Self {
        match v {
            SortArg::Lexicographic => SortOrder::Lexicographic,
            SortArg::Natural => SortOrder::Natural,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.dry_run;
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

    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new(cli.csv_file.is_some());
        Some(cb as Arc<dyn ConversionProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;

    // ── Batch mode ───────────────────────────────────────────────────────
    if let Some(ref csv_path) = cli.csv_file {
        if cli.dry_run {
            return plan_batch(csv_path, &config);
        }
        let report = run_batch(csv_path, &config)
            .await
            .context("Batch conversion failed")?;
        print_report(&cli, &report, show_progress)?;
        return Ok(());
    }

    // ── Direct mode ──────────────────────────────────────────────────────
    let (Some(folder), Some(pdf_name)) = (&cli.folder_path, &cli.pdf_name) else {
        anyhow::bail!("--folder_path and --pdf_name must be given together");
    };
    let request = ConversionRequest::new(folder, pdf_name);

    if cli.dry_run {
        let plan = plan_folder(&request, &config).context("Failed to scan folder")?;
        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&plan).context("Failed to serialise plan")?
            );
        } else {
            println!("Output: {}", plan.output.display());
            for (i, image) in plan.images.iter().enumerate() {
                println!("{:>4}  {}", i + 1, image.path.display());
            }
        }
        return Ok(());
    }

    let stats = convert_folder(&request, &config)
        .await
        .with_context(|| format!("Conversion of '{}' failed", folder.display()))?;
    print_stats(&cli, &stats, show_progress)?;

    Ok(())
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder()
        .page_size(cli.page_size.into())
        .dpi(cli.dpi)
        .margin_pt(cli.margin)
        .sort_order(cli.sort.into())
        .decode_policy(if cli.strict {
            DecodePolicy::Abort
        } else {
            DecodePolicy::Skip
        })
        .batch_concurrency(cli.jobs);

    if let Some(ref title) = cli.title {
        builder = builder.title(title);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

fn print_stats(cli: &Cli, stats: &ConversionStats, show_progress: bool) -> Result<()> {
    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(stats).context("Failed to serialise stats")?
        );
        return Ok(());
    }
    if cli.quiet {
        return Ok(());
    }
    // The progress callback already printed the summary line.
    if !show_progress {
        eprintln!(
            "Converted {}/{} images in {}ms → {}",
            stats.page_count(),
            stats.candidate_images,
            stats.total_duration_ms,
            stats.output.display()
        );
    }
    for skipped in &stats.skipped {
        eprintln!("  {} skipped {}", cyan("⚠"), dim(&skipped.to_string()));
    }
    Ok(())
}

fn print_report(cli: &Cli, report: &BatchReport, show_progress: bool) -> Result<()> {
    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(report).context("Failed to serialise report")?
        );
        return Ok(());
    }
    if cli.quiet {
        return Ok(());
    }
    if !show_progress {
        eprintln!(
            "Batch {}: {} succeeded, {} failed in {}ms",
            report.csv_path.display(),
            report.succeeded(),
            report.failed(),
            report.total_duration_ms
        );
    }
    for entry in report.failures() {
        if let Some(err) = entry.error() {
            eprintln!("  {} {}", red("✗"), err);
        }
    }
    Ok(())
}

/// Dry run for a CSV: parse every line and list each folder's page order.
fn plan_batch(csv_path: &Path, config: &ConversionConfig) -> Result<()> {
    let content = std::fs::read(csv_path)
        .with_context(|| format!("CSV file '{}' could not be read", csv_path.display()))?;

    for record in parse_records(&content) {
        let request = match record.parsed {
            Ok(request) => request,
            Err(e) => {
                println!("{} {}", red("✗"), e);
                continue;
            }
        };
        match plan_folder(&request, config) {
            Ok(plan) => {
                println!(
                    "line {}: {} images → {}",
                    record.line_number,
                    plan.images.len(),
                    plan.output.display()
                );
                for (i, image) in plan.images.iter().enumerate() {
                    println!("{:>6}  {}", i + 1, image.path.display());
                }
            }
            Err(e) => println!("{} line {}: {}", red("✗"), record.line_number, e),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("folder2pdf").chain(args.iter().copied()))
    }

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn direct_mode_with_underscore_flags() {
        let cli = parse(&["--folder_path", "imgs", "--pdf_name", "out"]).unwrap();
        assert_eq!(cli.folder_path, Some(PathBuf::from("imgs")));
        assert_eq!(cli.pdf_name, Some(PathBuf::from("out")));
        assert!(cli.csv_file.is_none());
    }

    #[test]
    fn kebab_aliases_are_accepted() {
        let cli = parse(&["--folder-path", "imgs", "--pdf-name", "out"]).unwrap();
        assert_eq!(cli.folder_path, Some(PathBuf::from("imgs")));
        let cli = parse(&["--csv-file", "jobs.csv"]).unwrap();
        assert_eq!(cli.csv_file, Some(PathBuf::from("jobs.csv")));
    }

    #[test]
    fn folder_requires_pdf_name_and_vice_versa() {
        let err = parse(&["--folder_path", "imgs"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
        let err = parse(&["--pdf_name", "out"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn csv_conflicts_with_direct_mode() {
        let err = parse(&[
            "--folder_path",
            "imgs",
            "--pdf_name",
            "out",
            "--csv_file",
            "jobs.csv",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn a_mode_is_required() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["--page-size", "a4"]).is_err());
    }

    #[test]
    fn options_map_onto_config() {
        let cli = parse(&[
            "--csv_file",
            "jobs.csv",
            "--page-size",
            "letter",
            "--margin",
            "18",
            "--sort",
            "natural",
            "--strict",
            "--jobs",
            "4",
        ])
        .unwrap();
        let config = build_config(&cli, None).unwrap();
        assert_eq!(config.page_size, PageSize::Letter);
        assert_eq!(config.margin_pt, 18.0);
        assert_eq!(config.sort_order, SortOrder::Natural);
        assert_eq!(config.decode_policy, DecodePolicy::Abort);
        assert_eq!(config.batch_concurrency, 4);
        assert_eq!(config.title, None);

        let cli = parse(&["--folder_path", "imgs", "--pdf_name", "out", "--title", "Scans"])
            .unwrap();
        let config = build_config(&cli, None).unwrap();
        assert_eq!(config.title.as_deref(), Some("Scans"));
    }

    #[test]
    fn title_is_rejected_in_batch_mode() {
        let err = parse(&["--csv_file", "jobs.csv", "--title", "Scans"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn dpi_out_of_range_is_rejected() {
        assert!(parse(&["--csv_file", "x", "--dpi", "20"]).is_err());
    }
}
