//! CLI binary for texclip.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `RenderConfig` and wires the clipboard, exporter, and monitor together.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::time::Duration;
use texclip::pipeline::compose::paginate;
use texclip::{
    latex_toolchain_available, monitor, process_text_with, FragmentSink, Preferences,
    RenderBackend, RenderConfig, SystemClipboard, DEFAULT_PREFS_PATH, SAMPLE_TEXT,
};
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

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert a snippet and copy the result to the clipboard
  texclip 'Euler: \(e^{i\pi} + 1 = 0\)'

  # Read the text from a file / from stdin
  texclip @answer.txt
  cat answer.txt | texclip -

  # Real typeset output via the external TeX toolchain
  texclip --backend latex --color black 'inline \(x^2\)'

  # Export to a Word document instead of the clipboard
  texclip @answer.txt --export answer.docx --no-copy

  # Watch the clipboard and convert everything that lands on it
  texclip --watch

  # Run on the built-in sample text
  texclip --sample --dpi 150

  # Persist the current flags as defaults for future runs
  texclip --color '#00ff88' --font-size 14 --save-defaults

ENVIRONMENT VARIABLES:
  TEXCLIP_BACKEND    Override backend (canvas, latex)
  TEXCLIP_COLOR      Override equation colour
  TEXCLIP_DPI        Override rendering DPI
  TEXCLIP_FONT       Font file for the canvas backend (skips discovery)

BACKENDS:
  canvas   draws the delimited equation with a system serif font; no
           external tools needed (default)
  latex    compiles each equation with `latex` and converts the DVI with
           `dvipng`; requires a TeX distribution on PATH
"#;

/// Convert LaTeX equations in text to inline images on the clipboard.
#[derive(Parser, Debug)]
#[command(
    name = "texclip",
    version,
    about = "Convert LaTeX equations in text to inline images on the clipboard",
    long_about = "Scan text for LaTeX equations (\\[..\\], \\(..\\), $$..$$, $..$, equation \
environments), render each one to a transparent PNG, and install the re-assembled rich-text \
fragment on the clipboard or export it as a Word document.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Text to convert, @path to read a file, or '-' to read stdin.
    #[arg(required_unless_present_any = ["sample", "watch", "save_defaults"])]
    input: Option<String>,

    /// Run on the built-in sample text instead of INPUT.
    #[arg(long, conflicts_with = "input")]
    sample: bool,

    /// Watch the clipboard and convert any new text that appears.
    #[arg(short, long, conflicts_with_all = ["input", "sample"])]
    watch: bool,

    /// Rendering backend: canvas, latex.
    #[arg(long, env = "TEXCLIP_BACKEND")]
    backend: Option<RenderBackend>,

    /// Equation colour: white, black, red, blue, green, or #rrggbb.
    #[arg(long, env = "TEXCLIP_COLOR")]
    color: Option<String>,

    /// Base font size in points (10-50).
    #[arg(long, env = "TEXCLIP_FONT_SIZE",
          value_parser = clap::value_parser!(u32).range(10..=50))]
    font_size: Option<u32>,

    /// Rendering DPI (100-600).
    #[arg(long, env = "TEXCLIP_DPI",
          value_parser = clap::value_parser!(u32).range(100..=600))]
    dpi: Option<u32>,

    /// Emit only the rendered images, dropping the surrounding text.
    #[arg(long)]
    only_images: bool,

    /// Write the HTML fragment to this file as well.
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Export the composed content as a .docx document.
    #[arg(long, value_name = "PATH")]
    export: Option<PathBuf>,

    /// Skip installing the fragment on the clipboard.
    #[arg(long)]
    no_copy: bool,

    /// Preferences file location.
    #[arg(long, default_value = DEFAULT_PREFS_PATH)]
    config: PathBuf,

    /// Persist the effective settings to the preferences file and exit
    /// (unless INPUT is also given).
    #[arg(long)]
    save_defaults: bool,

    /// Output run statistics as JSON on stdout.
    #[arg(long)]
    json: bool,

    /// Disable the progress bar.
    #[arg(long)]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Progress bar and log lines fight over the terminal; prefer the bar
    // unless the user asked for verbosity.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.watch;
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

    // ── Build config: saved preferences, overridden by flags ────────────
    let mut prefs = Preferences::load(&cli.config);
    if let Some(backend) = cli.backend {
        prefs.mode = backend;
    }
    if let Some(ref color) = cli.color {
        prefs.text_color = color.clone();
    }
    if let Some(font_size) = cli.font_size {
        prefs.font_size = font_size;
    }
    if let Some(dpi) = cli.dpi {
        prefs.dpi = dpi;
    }
    if cli.only_images {
        prefs.only_images = true;
    }
    let config = prefs.to_render_config().context("Invalid configuration")?;

    if cli.save_defaults {
        prefs
            .save(&cli.config)
            .context("Failed to save preferences")?;
        if !cli.quiet {
            eprintln!(
                "{} defaults saved to {}",
                green("✔"),
                bold(&cli.config.display().to_string())
            );
        }
        if cli.input.is_none() && !cli.sample && !cli.watch {
            return Ok(());
        }
    }

    if config.backend == RenderBackend::Latex && !latex_toolchain_available() {
        eprintln!(
            "{} latex/dvipng not found on PATH; renders will fail (try --backend canvas)",
            cyan("⚠")
        );
    }

    // ── Watch mode ───────────────────────────────────────────────────────
    if cli.watch {
        return run_watch(config, cli.quiet);
    }

    // ── One-shot mode ────────────────────────────────────────────────────
    let text = resolve_input(cli.input.as_deref(), cli.sample)?;

    let bar = if show_progress {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>2}/{len} equations",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  "),
        );
        bar.set_prefix("Rendering");
        bar.enable_steady_tick(Duration::from_millis(80));
        Some(bar)
    } else {
        None
    };

    let output = process_text_with(&text, &config, |done, total| {
        if let Some(ref bar) = bar {
            if bar.length() != Some(total as u64) {
                bar.set_length(total as u64);
            }
            bar.set_position(done as u64);
        }
    })
    .context("Conversion failed")?;
    if let Some(bar) = bar {
        bar.finish_and_clear();
    }

    // ── Deliver the output ───────────────────────────────────────────────
    if let Some(ref path) = cli.out {
        std::fs::write(path, &output.html)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        if !cli.quiet {
            eprintln!("{} fragment written to {}", green("✔"), bold(&path.display().to_string()));
        }
    }

    if let Some(ref path) = cli.export {
        let blocks = paginate(&output.items, config.font_size)?;
        texclip::write_docx(&blocks, path).context("Export failed")?;
        if !cli.quiet {
            eprintln!("{} document written to {}", green("✔"), bold(&path.display().to_string()));
        }
    }

    if !cli.no_copy {
        let mut clipboard = SystemClipboard::new().context("Cannot open clipboard")?;
        clipboard
            .write_html(&output.html)
            .context("Cannot install fragment on clipboard")?;
        if !cli.quiet {
            eprintln!("{} rich-text fragment copied to clipboard", green("✔"));
        }
    } else if cli.out.is_none() && cli.export.is_none() && !cli.json {
        // Nowhere else to put it; print the fragment.
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(output.html.as_bytes())
            .context("Failed to write to stdout")?;
        handle.write_all(b"\n").ok();
    }

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&output.stats).context("Failed to serialise stats")?
        );
    } else if !cli.quiet {
        let stats = &output.stats;
        eprintln!(
            "{}  {}/{} equations  {}ms",
            if stats.failed == 0 { green("✔") } else { cyan("⚠") },
            stats.rendered,
            stats.equations_found,
            stats.total_duration_ms,
        );
        if stats.failed > 0 {
            eprintln!("   {} {} failed (see log)", red("✗"), stats.failed);
        }
    }

    Ok(())
}

/// Resolve the input text: literal, @file, stdin, or the built-in sample.
fn resolve_input(input: Option<&str>, sample: bool) -> Result<String> {
    if sample {
        return Ok(SAMPLE_TEXT.to_string());
    }
    let input = input.context("No input text given")?;
    if input == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        return Ok(text);
    }
    if let Some(path) = input.strip_prefix('@') {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {path}"));
    }
    Ok(input.to_string())
}

/// Watch the clipboard until the user presses Enter.
fn run_watch(config: RenderConfig, quiet: bool) -> Result<()> {
    // The source clipboard handle is separate from the sink handle; some
    // platforms do not allow interleaved reads and writes on one handle.
    let source = SystemClipboard::new().context("Cannot open clipboard")?;
    let sink = SystemClipboard::new().context("Cannot open clipboard")?;

    let handle =
        monitor::spawn(source, sink, config).context("Cannot start clipboard monitor")?;

    if !quiet {
        eprintln!(
            "{} watching the clipboard every {}s — press Enter to stop",
            cyan("◆"),
            monitor::POLL_INTERVAL.as_secs()
        );
    }
    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("Failed to read stdin")?;

    if handle.stop() {
        if !quiet {
            eprintln!("{} monitor stopped", green("✔"));
        }
    } else {
        eprintln!("{} monitor is mid-render; it will exit shortly", dim("…"));
    }
    Ok(())
}
