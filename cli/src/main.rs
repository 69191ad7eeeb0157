//! tenderseg CLI - tender PDF segmentation tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use tenderseg::{
    render, JsonFormat, PageSource, PdfParser, RenderOptions, SegmentOptions, SegmentationResult,
    Segmenter, Strategy,
};

#[derive(Parser)]
#[command(name = "tenderseg")]
#[command(version)]
#[command(about = "Split tender PDFs into categorized sections", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Segment a PDF into categorized sections
    Segment {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Include YAML frontmatter (markdown only)
        #[arg(long)]
        frontmatter: bool,

        /// Only keep sections routed to requirement extraction
        #[arg(long)]
        extractable_only: bool,

        #[command(flatten)]
        engine: EngineArgs,
    },

    /// Segment several PDFs, writing one JSON file per input
    Batch {
        /// Input PDF files
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Process documents one at a time
        #[arg(long)]
        sequential: bool,

        #[command(flatten)]
        engine: EngineArgs,
    },

    /// Print the document outline and the strategy it leads to
    Outline {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show document information
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Categorize a title and optional body text
    Categorize {
        /// Section title
        #[arg(value_name = "TITLE")]
        title: String,

        /// Section body
        #[arg(value_name = "TEXT", default_value = "")]
        text: String,
    },

    /// Show version information
    Version,
}

/// Engine settings shared by `segment` and `batch`.
#[derive(clap::Args)]
struct EngineArgs {
    /// Abort on the first page that cannot be read
    #[arg(long)]
    strict: bool,

    /// Title of the section before the first detected heading
    #[arg(long, env = "TENDERSEG_SENTINEL", value_name = "TITLE")]
    sentinel: Option<String>,

    /// Disable table detection
    #[arg(long)]
    no_tables: bool,

    /// Use the outline only when it has more entries than this
    #[arg(long, env = "TENDERSEG_MIN_OUTLINE", value_name = "N")]
    min_outline_entries: Option<usize>,

    /// Password for encrypted documents
    #[arg(long, env = "TENDERSEG_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

impl EngineArgs {
    fn options(&self) -> SegmentOptions {
        let mut options = SegmentOptions::new().with_tables(!self.no_tables);
        if self.strict {
            options = options.strict();
        }
        if let Some(ref sentinel) = self.sentinel {
            options = options.with_sentinel_title(sentinel.clone());
        }
        if let Some(entries) = self.min_outline_entries {
            options = options.with_min_outline_entries(entries);
        }
        if let Some(ref password) = self.password {
            options = options.with_password(password.clone());
        }
        options
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// JSON with sections, strategy and metadata
    Json,
    /// One Markdown heading per section
    Markdown,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Segment {
            input,
            output,
            format,
            compact,
            frontmatter,
            extractable_only,
            engine,
        } => {
            let render_options = RenderOptions::new().with_frontmatter(frontmatter);
            let render_options = if extractable_only {
                render_options.extractable_only()
            } else {
                render_options
            };
            cmd_segment(
                &input,
                output.as_deref(),
                format,
                compact,
                &render_options,
                engine.options(),
            )
        }
        Commands::Batch {
            inputs,
            output,
            sequential,
            engine,
        } => cmd_batch(
            &inputs,
            output.as_deref(),
            engine.options().with_parallel(!sequential),
        ),
        Commands::Outline { input } => cmd_outline(&input),
        Commands::Info { input } => cmd_info(&input),
        Commands::Categorize { title, text } => cmd_categorize(&title, &text),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_segment(
    input: &Path,
    output: Option<&Path>,
    format: OutputFormat,
    compact: bool,
    render_options: &RenderOptions,
    options: SegmentOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = Segmenter::new(options)?.segment_file(input)?;

    let rendered = match format {
        OutputFormat::Json => {
            let format = if compact {
                JsonFormat::Compact
            } else {
                JsonFormat::Pretty
            };
            render::to_json(&result, format)?
        }
        OutputFormat::Markdown => render::to_markdown(&result, render_options),
    };

    if let Some(path) = output {
        fs::write(path, &rendered)?;
        println!("{} {}", "Saved to".green(), path.display());
        print_summary(&result);
    } else {
        println!("{}", rendered);
    }

    Ok(())
}

fn cmd_batch(
    inputs: &[PathBuf],
    output: Option<&Path>,
    options: SegmentOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&output_dir)?;

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );
    pb.set_message("Segmenting...");
    pb.enable_steady_tick(std::time::Duration::from_millis(120));

    let results = tenderseg::segment_files(inputs, options)?;

    let mut failed = 0;
    for (input, result) in inputs.iter().zip(results) {
        pb.set_message(input.display().to_string());
        match result {
            Ok(result) => {
                let path = output_dir.join(output_name(input));
                fs::write(&path, render::to_json(&result, JsonFormat::Pretty)?)?;
                log::debug!(
                    "{}: {} sections ({}) -> {}",
                    input.display(),
                    result.len(),
                    result.strategy,
                    path.display()
                );
            }
            Err(e) => {
                failed += 1;
                pb.println(format!("{} {}: {}", "Failed".red(), input.display(), e));
            }
        }
        pb.inc(1);
    }
    pb.finish_with_message("Done!");

    println!(
        "\n{} {} of {} documents segmented into {}",
        "Done!".green().bold(),
        inputs.len() - failed,
        inputs.len(),
        output_dir.display()
    );

    if failed > 0 {
        return Err(format!("{} documents failed", failed).into());
    }
    Ok(())
}

fn cmd_outline(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let parser = PdfParser::open(input)?;
    let outline = parser.outline();
    let defaults = SegmentOptions::default();

    println!("{}", "Outline".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    if outline.is_empty() {
        println!("{}", "(no outline)".dimmed());
    }
    for entry in &outline.entries {
        let indent = "  ".repeat(entry.level.saturating_sub(1) as usize);
        println!(
            "{}{} {}",
            indent,
            entry.title,
            format!("p.{}", entry.page).dimmed()
        );
    }

    let strategy = Strategy::select(outline, defaults.min_outline_entries);
    println!();
    println!("{}: {}", "Strategy".bold(), strategy.kind());

    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let parser = PdfParser::open(input)?;
    let metadata = parser.metadata();
    let outline = parser.outline();

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: PDF {}", "Format".bold(), metadata.pdf_version);
    println!("{}: {}", "Pages".bold(), metadata.page_count);
    println!(
        "{}: {}",
        "Encrypted".bold(),
        if metadata.encrypted { "Yes" } else { "No" }
    );

    if let Some(ref title) = metadata.title {
        println!("{}: {}", "Title".bold(), title);
    }
    if let Some(ref author) = metadata.author {
        println!("{}: {}", "Author".bold(), author);
    }
    if let Some(ref creator) = metadata.creator {
        println!("{}: {}", "Creator".bold(), creator);
    }
    if let Some(ref producer) = metadata.producer {
        println!("{}: {}", "Producer".bold(), producer);
    }
    if let Some(ref created) = metadata.created {
        println!("{}: {}", "Created".bold(), created);
    }
    if let Some(ref modified) = metadata.modified {
        println!("{}: {}", "Modified".bold(), modified);
    }

    println!("{}: {}", "Bookmarks".bold(), outline.len());

    Ok(())
}

fn cmd_categorize(title: &str, text: &str) -> Result<(), Box<dyn std::error::Error>> {
    let segmenter = Segmenter::new(SegmentOptions::default())?;
    let category = segmenter.categorize(title, text);

    let label = if category.is_extractable() {
        category.as_str().green().bold()
    } else {
        category.as_str().dimmed()
    };
    println!("{}", label);

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "tenderseg".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Tender PDF segmentation and categorization tool");
    println!();
    println!("License: MIT");
}

fn print_summary(result: &SegmentationResult) {
    println!(
        "{} {} sections from {} pages ({})",
        "Extracted".green(),
        result.sections.len(),
        result.page_count,
        result.strategy
    );
    for (category, count) in result.count_by_category() {
        println!("  {} {}: {}", "├─".dimmed(), category, count);
    }
    if !result.degraded_pages.is_empty() {
        println!(
            "{} skipped pages {:?}",
            "Warning:".yellow(),
            result.degraded_pages
        );
    }
}

/// `dir/pliego.pdf` becomes `pliego.json`.
fn output_name(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "document".to_string());
    PathBuf::from(format!("{}.json", stem))
}
