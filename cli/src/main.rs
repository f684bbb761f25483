//! solsplit CLI - split solution regions out of DOCX files

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use solsplit::parser::extract_media;
use solsplit::report::to_json;
use solsplit::{
    clean, collect_docx_files, scan, DocxParser, JsonFormat, MediaValidation, ParseOptions,
    RegionBlock, Solsplit, SplitReport,
};

/// Output root used when none is given.
const DEFAULT_OUTPUT: &str = "output";

#[derive(Parser)]
#[command(name = "solsplit")]
#[command(version)]
#[command(about = "Split marker-delimited solution regions out of DOCX files", long_about = None)]
struct Cli {
    /// Input DOCX file or directory of DOCX files
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Output root directory
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write one DOCX per region
    Split {
        /// Input DOCX file or directory of DOCX files
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output root directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        #[command(flatten)]
        split: SplitArgs,
    },

    /// List the regions of a document without writing anything
    Scan {
        /// Input DOCX file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print regions as JSON
        #[arg(long)]
        json: bool,
    },

    /// Extract the valid media of a document
    Media {
        /// Input DOCX file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Media validation mode
        #[arg(long, value_enum, default_value = "decode")]
        validation: Validation,
    },

    /// Strip markers from text (reads stdin when no text is given)
    Clean {
        /// Text to clean
        #[arg(value_name = "TEXT")]
        text: Option<String>,
    },

    /// Show document information
    Info {
        /// Input DOCX file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(Args, Default)]
struct SplitArgs {
    /// Keep what was read before malformed body XML
    #[arg(long)]
    lenient: bool,

    /// Omit the "Image: name" caption before each image
    #[arg(long)]
    no_captions: bool,

    /// Do not write the images/ directory
    #[arg(long)]
    no_images: bool,

    /// Image display width in inches
    #[arg(long, value_name = "INCHES")]
    image_width: Option<f64>,

    /// Media validation mode
    #[arg(long, value_enum, default_value = "decode")]
    validation: Validation,

    /// Write the split report as JSON to this file
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Write compact JSON
    #[arg(long)]
    compact: bool,
}

#[derive(Copy, Clone, Default, PartialEq, Eq, ValueEnum)]
enum Validation {
    /// Fully decode each image
    #[default]
    Decode,
    /// Check the header only
    Sniff,
}

impl From<Validation> for MediaValidation {
    fn from(v: Validation) -> Self {
        match v {
            Validation::Decode => MediaValidation::Decode,
            Validation::Sniff => MediaValidation::Sniff,
        }
    }
}

impl SplitArgs {
    fn builder(&self) -> Solsplit {
        let mut builder = Solsplit::new()
            .with_captions(!self.no_captions)
            .with_saved_images(!self.no_images)
            .with_media_validation(self.validation.into());
        if self.lenient {
            builder = builder.lenient();
        }
        if let Some(width) = self.image_width {
            builder = builder.with_image_width(width);
        }
        builder
    }
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Split {
            input,
            output,
            split,
        }) => cmd_split(&input, output.as_deref(), &split),
        Some(Commands::Scan { input, json }) => cmd_scan(&input, json),
        Some(Commands::Media {
            input,
            output,
            validation,
        }) => cmd_media(&input, output.as_deref(), validation),
        Some(Commands::Clean { text }) => cmd_clean(text),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            if let Some(input) = cli.input {
                cmd_split(&input, cli.output.as_deref(), &SplitArgs::default())
            } else {
                println!("{}", "Usage: solsplit <INPUT> [OUTPUT]".yellow());
                println!("       solsplit --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_split(input: &Path, output: Option<&Path>, args: &SplitArgs) -> CliResult {
    let output_root = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
    let builder = args.builder();
    log::debug!("splitting {} into {}", input.display(), output_root.display());

    let reports = if input.is_dir() {
        let files = collect_docx_files(input)?;
        if files.is_empty() {
            println!("{} no .docx files in {}", "Note:".yellow(), input.display());
            return Ok(());
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(format!("Splitting {} documents...", files.len()));

        let mut reports = Vec::new();
        let mut failures = 0;
        for (path, result) in builder.split_many(&files, &output_root) {
            match result {
                Ok(report) => reports.push(report),
                Err(e) => {
                    failures += 1;
                    pb.println(format!("{} {}: {}", "Failed".red(), path.display(), e));
                }
            }
        }
        pb.finish_and_clear();

        if failures > 0 {
            println!("{} {} documents failed", "Warning:".yellow(), failures);
        }
        reports
    } else {
        vec![builder.split_file(input, &output_root)?]
    };

    for report in &reports {
        print_report(report);
    }

    if let Some(path) = &args.report {
        let format = if args.compact {
            JsonFormat::Compact
        } else {
            JsonFormat::Pretty
        };
        fs::write(path, to_json(&reports, format)?)?;
        println!("{} {}", "Report saved to".green(), path.display());
    }

    Ok(())
}

fn print_report(report: &SplitReport) {
    println!(
        "\n{} {}",
        "Document".cyan().bold(),
        report.source.to_string().bold()
    );

    let count = report.regions.len();
    for (i, region) in report.regions.iter().enumerate() {
        let branch = if i + 1 == count { "└─" } else { "├─" };
        let file_name = region
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut line = format!(
            "  {} {} ({} blocks, {} images)",
            branch.dimmed(),
            file_name,
            region.block_count,
            region.image_count
        );
        if !region.terminated {
            line.push_str(&format!(" {}", "unterminated".yellow()));
        }
        println!("{}", line);
    }

    for warning in &report.warnings {
        println!("  {} {}", "warning:".yellow(), warning);
    }

    println!(
        "{} {} regions written to {}",
        "Done!".green().bold(),
        report.regions_written(),
        report.output_dir.display()
    );
}

fn cmd_scan(input: &Path, json: bool) -> CliResult {
    let doc = DocxParser::open_with_options(input, ParseOptions::new().lenient())?.parse()?;
    let (regions, warnings) = scan(&doc);

    if json {
        println!("{}", serde_json::to_string_pretty(&regions)?);
        return Ok(());
    }

    for region in &regions {
        println!(
            "{} {}{}",
            "Region".cyan().bold(),
            region.id.bold(),
            if region.terminated {
                String::new()
            } else {
                format!(" {}", "(unterminated)".yellow())
            }
        );
        for block in &region.blocks {
            match block {
                RegionBlock::Paragraph { text } => println!("  {}", text),
                RegionBlock::Table(table) => println!(
                    "  {}",
                    format!("[table {}x{}]", table.row_count(), table.column_count()).dimmed()
                ),
                RegionBlock::Image(asset) => {
                    println!("  {}", format!("[image {}]", asset.file_name()).dimmed())
                }
                RegionBlock::MissingImage { anchor } => {
                    println!("  {}", format!("[missing image #{}]", anchor).red())
                }
            }
        }
    }

    for warning in &warnings {
        eprintln!("{} {}", "warning:".yellow(), warning);
    }
    println!("\n{} regions", regions.len());
    Ok(())
}

fn cmd_media(input: &Path, output: Option<&Path>, validation: Validation) -> CliResult {
    let data = fs::read(input)?;
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(data))?;
    let options = ParseOptions::new().with_media_validation(validation.into());
    let extraction = extract_media(&mut archive, &options)?;

    let output_dir = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    for path in extraction.persist_to(&output_dir)? {
        println!("{} {}", "Extracted".green(), path.display());
    }
    for rejected in &extraction.rejected {
        println!("{} {}: {}", "Skipped".yellow(), rejected.name, rejected.reason);
    }

    println!(
        "\n{} {} images extracted",
        "Done!".green().bold(),
        extraction.assets.len()
    );
    Ok(())
}

fn cmd_clean(text: Option<String>) -> CliResult {
    let text = match text {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    println!("{}", clean(&text));
    Ok(())
}

fn cmd_info(input: &Path) -> CliResult {
    let parser = DocxParser::open_with_options(input, ParseOptions::new().lenient())?;
    let doc = parser.parse()?;
    let (regions, warnings) = scan(&doc);

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Main part".bold(), parser.main_part());
    println!("{}: {}", "Blocks".bold(), doc.block_count());
    println!(
        "{}: {}",
        "Tables".bold(),
        doc.blocks().filter(|b| b.is_table()).count()
    );

    println!();
    println!("{}", "Media".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Anchors".bold(), doc.anchor_count());
    println!("{}: {}", "Valid assets".bold(), doc.media.len());
    println!("{}: {}", "Rejected".bold(), parser.media().rejected.len());

    println!();
    println!("{}", "Regions".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let ids: Vec<&str> = regions.iter().map(|r| r.id.as_str()).collect();
    println!("{}: {}", "Count".bold(), regions.len());
    if !ids.is_empty() {
        println!("{}: {}", "Ids".bold(), ids.join(", "));
    }
    println!("{}: {}", "Warnings".bold(), warnings.len());

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "solsplit".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("DOCX solution region splitter");
    println!();
    println!("License: MIT");
}
