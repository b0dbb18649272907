//! # Hanzi Sheet CLI
//!
//! Command-line interface for stroke-order practice worksheets.
//!
//! ## Usage
//!
//! ```bash
//! # Write a worksheet to an HTML file (open it and print to PDF)
//! hanzi-sheet render "学而时习之" --out sheet.html
//!
//! # Tian-zi-ge grid, six blank cells, font-rendered reference
//! hanzi-sheet render "你好" --grid tian --count 6 --use-font
//!
//! # Use a local copy of hanzi-writer-data
//! hanzi-sheet render "永" --strokes-dir ./hanzi-writer-data/data
//!
//! # One decomposition cell as SVG
//! hanzi-sheet cell 永 --mode step --step 3 > step3.svg
//!
//! # Start the web UI
//! hanzi-sheet serve --listen 0.0.0.0:8080
//! ```
//!
//! Set `GEMINI_API_KEY` to fill in pinyin and meanings; without it they
//! are shown as placeholders. Log verbosity follows `RUST_LOG`.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use hanzi_sheet::{
    SheetError,
    components::GridCell,
    config::{FONT_PRESETS, GridStyle, WorksheetConfig, parse_cell_size},
    provider::{
        AnnotationSource, CdnStrokes, DirectoryStrokes, GeminiAnnotations, PlaceholderAnnotations,
        StrokeSource, http_client,
    },
    server::{self, ServerConfig},
    stroke::{RevealMode, present},
    worksheet::{DEFAULT_MAX_CONCURRENT_FETCHES, Generator, render_html},
};

/// Hanzi Sheet - stroke-order practice worksheet generator
#[derive(Parser, Debug)]
#[command(name = "hanzi-sheet")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a worksheet as a printable HTML page
    Render {
        /// Characters to practise (other characters are ignored)
        text: String,

        /// Output file (stdout when omitted)
        #[arg(long, short, value_name = "FILE")]
        out: Option<PathBuf>,

        #[command(flatten)]
        sheet: SheetArgs,

        #[command(flatten)]
        source: SourceArgs,

        /// Skip the annotation lookup and use placeholders
        #[arg(long)]
        offline_annotations: bool,
    },

    /// Render one stroke cell as SVG
    Cell {
        /// The character
        character: char,

        /// Reveal mode: step, full or trace
        #[arg(long, default_value = "full")]
        mode: RevealMode,

        /// Number of strokes revealed (defaults to all)
        #[arg(long)]
        step: Option<usize>,

        #[arg(long, default_value = "mi")]
        grid: GridStyle,

        /// Cell side in pixels
        #[arg(long, default_value = "128")]
        size: String,

        #[arg(long, default_value = "#F87171")]
        color: String,

        /// Output file (stdout when omitted)
        #[arg(long, short, value_name = "FILE")]
        out: Option<PathBuf>,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// Run the web interface
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:8080")]
        listen: String,

        #[command(flatten)]
        sheet: SheetArgs,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// List reference font presets
    Fonts,
}

/// Worksheet appearance.
#[derive(Args, Debug)]
struct SheetArgs {
    /// Grid style: tian, mi or none
    #[arg(long, default_value = "mi")]
    grid: GridStyle,

    /// Blank practice cells per row (0-10)
    #[arg(long, default_value_t = 4)]
    count: u32,

    /// Cell size in pixels (invalid values fall back to 32)
    #[arg(long, default_value = "56")]
    size: String,

    /// Grid accent color
    #[arg(long, default_value = "#F87171")]
    color: String,

    /// Worksheet title
    #[arg(long)]
    title: Option<String>,

    /// CSS font family for font-rendered glyphs
    #[arg(long)]
    font: Option<String>,

    /// Draw the reference and trace cells from the font
    #[arg(long)]
    use_font: bool,

    #[arg(long)]
    no_pinyin: bool,

    #[arg(long)]
    no_meaning: bool,

    /// Leave out the tracing cell
    #[arg(long)]
    no_tracing: bool,

    /// Leave out the stroke decomposition cells
    #[arg(long)]
    no_stroke_order: bool,
}

impl SheetArgs {
    fn to_config(&self) -> WorksheetConfig {
        let defaults = WorksheetConfig::default();
        WorksheetConfig {
            grid_style: self.grid,
            show_pinyin: !self.no_pinyin,
            show_meaning: !self.no_meaning,
            show_tracing: !self.no_tracing,
            show_stroke_order: !self.no_stroke_order,
            grid_count: self.count,
            grid_color: self.color.clone(),
            cell_size: parse_cell_size(&self.size),
            title: self.title.clone().unwrap_or(defaults.title),
            font_family: self.font.clone().unwrap_or(defaults.font_family),
            use_font_for_reference: self.use_font,
        }
        .sanitized()
    }
}

/// Where stroke data comes from.
#[derive(Args, Debug)]
struct SourceArgs {
    /// Directory of hanzi-writer-data `<char>.json` files
    #[arg(long, value_name = "DIR")]
    strokes_dir: Option<PathBuf>,

    /// Base URL of a hanzi-writer-data mirror
    #[arg(long, value_name = "URL")]
    strokes_url: Option<String>,

    /// Seconds before a stroke lookup is abandoned
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,

    /// Stroke lookups in flight at once
    #[arg(long, default_value_t = DEFAULT_MAX_CONCURRENT_FETCHES)]
    max_fetches: usize,
}

impl SourceArgs {
    fn strokes(&self) -> Result<Arc<dyn StrokeSource>, SheetError> {
        Ok(match (&self.strokes_dir, &self.strokes_url) {
            (Some(dir), _) => Arc::new(DirectoryStrokes::new(dir)),
            (None, Some(url)) => Arc::new(CdnStrokes::with_base_url(http_client()?, url)?),
            (None, None) => Arc::new(CdnStrokes::new(http_client()?)?),
        })
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), SheetError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            text,
            out,
            sheet,
            source,
            offline_annotations,
        } => {
            let annotations: Arc<dyn AnnotationSource> = if offline_annotations {
                Arc::new(PlaceholderAnnotations)
            } else {
                match GeminiAnnotations::from_env(http_client()?) {
                    Some(gemini) => Arc::new(gemini),
                    None => {
                        tracing::warn!("GEMINI_API_KEY not set, using placeholder annotations");
                        Arc::new(PlaceholderAnnotations)
                    }
                }
            };

            let generator = Generator::new(source.strokes()?, annotations)
                .fetch_timeout(source.timeout())
                .max_concurrent_fetches(source.max_fetches);

            let worksheet = generator.generate(&text).await;
            if worksheet.is_empty() {
                tracing::warn!("no practisable characters in input");
            }

            let html = render_html(&worksheet, &sheet.to_config());
            write_output(out.as_ref(), &html)?;
        }

        Commands::Cell {
            character,
            mode,
            step,
            grid,
            size,
            color,
            out,
            source,
        } => {
            let strokes = source.strokes()?;
            let set = tokio::time::timeout(source.timeout(), strokes.lookup(character))
                .await
                .unwrap_or(Err(SheetError::StrokeTimeout(character)))?;

            let overlay = present(&set.strokes, step.unwrap_or(set.len()), mode)
                .ok_or(SheetError::StrokeNotFound(character))?;

            let config = WorksheetConfig {
                grid_style: grid,
                grid_color: color,
                cell_size: parse_cell_size(&size),
                ..Default::default()
            }
            .sanitized();

            let svg = GridCell::new(config.grid_style, &config.grid_color, config.cell_size)
                .overlay(&overlay)
                .to_svg_string();
            write_output(out.as_ref(), &svg)?;
        }

        Commands::Serve {
            listen,
            sheet,
            source,
        } => {
            let config = ServerConfig {
                listen_addr: listen,
                strokes_dir: source.strokes_dir.clone(),
                strokes_url: source.strokes_url.clone(),
                fetch_timeout: source.timeout(),
                max_concurrent_fetches: source.max_fetches,
                defaults: sheet.to_config(),
            };
            server::serve(config).await?;
        }

        Commands::Fonts => {
            for preset in FONT_PRESETS {
                println!("{:<28} {}", preset.label, preset.family);
            }
        }
    }

    Ok(())
}

/// Write to `path`, or stdout when there is none.
fn write_output(path: Option<&PathBuf>, contents: &str) -> Result<(), SheetError> {
    match path {
        Some(path) => {
            std::fs::write(path, contents)?;
            tracing::info!(path = %path.display(), "wrote output");
        }
        None => print!("{}", contents),
    }
    Ok(())
}
