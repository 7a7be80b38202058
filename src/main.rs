//! CLI for citedoc - Render @Reference citation annotations in API documentation.

use std::fmt;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use citedoc::{
    builtin_format, builtin_format_names, extract_blocks, format::builtin_format_descriptions,
    group_id, html_to_text, process_blocks, render_records, replace_blocks, Bibliography,
    OutputFormat, ProcessOutcome, RenderedBlock,
};

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

/// Render @Reference citation annotations found in API documentation
#[derive(Parser)]
#[command(name = "citedoc")]
#[command(version)]
#[command(after_help = "\
Examples:
  citedoc process Foo.html
  citedoc process Foo.java -f bibtex -o foo.bib
  cat Foo.java | citedoc process - -f text --inline
  citedoc formats")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a document containing @Reference annotations
    #[command(after_help = "\
Examples:
  citedoc process Foo.html --group master
  citedoc process Foo.java -f json --strict
  citedoc process Foo.java -f annotation --inline -o Foo.java

Annotation syntax: @Reference(type=Article, author={\"Smith, J.\"}, title=\"...\", year=\"2020\")
                   @References(references={@Reference(...), @Reference(...)})")]
    Process {
        /// Input document (use '-' for stdin)
        input: PathBuf,

        /// Output format (see 'formats' command)
        #[arg(short, long, default_value = "html")]
        format: String,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Bibliography group for the html format
        #[arg(long, default_value = citedoc::MASTER_GROUP)]
        group: String,

        /// Treat the input as HTML (implied by a .html or .htm extension)
        #[arg(long)]
        html_input: bool,

        /// Write the document with each annotation replaced by its rendering
        #[arg(long)]
        inline: bool,

        /// Fail if any annotation block cannot be parsed
        #[arg(long)]
        strict: bool,
    },

    /// List available output formats
    Formats,
}

// ---------------------------------------------------------------------------
// AppError: semantic exit codes
// ---------------------------------------------------------------------------

enum AppError {
    /// Exit 10: input file not found / unreadable
    InputFile(String),
    /// Exit 12: unknown output format or unsupported flag combination
    Format(String),
    /// Exit 13: malformed annotation block in strict mode
    MalformedBlock(String),
    /// Exit 14: records could not be serialized
    Serialization(String),
    /// Exit 15: cannot write output file
    OutputFile(String),
}

impl AppError {
    fn exit_code(&self) -> i32 {
        match self {
            AppError::InputFile(_) => 10,
            AppError::Format(_) => 12,
            AppError::MalformedBlock(_) => 13,
            AppError::Serialization(_) => 14,
            AppError::OutputFile(_) => 15,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InputFile(msg) => {
                write!(f, "{}\n  hint: verify the file path is correct", msg)
            }
            AppError::Format(msg) => {
                let names = builtin_format_names().join(", ");
                write!(
                    f,
                    "{}\n  available formats: {}\n  hint: --inline works with text, bibtex and annotation",
                    msg, names
                )
            }
            AppError::MalformedBlock(msg) => {
                write!(
                    f,
                    "{}\n  hint: run without --strict to skip malformed blocks, or set RUST_LOG=citedoc=debug",
                    msg
                )
            }
            AppError::Serialization(msg) => {
                write!(f, "{}", msg)
            }
            AppError::OutputFile(msg) => {
                write!(
                    f,
                    "{}\n  hint: check that the output directory exists and is writable",
                    msg
                )
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "citedoc=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(e.exit_code());
    }
}

fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            input,
            format,
            output,
            group,
            html_input,
            inline,
            strict,
        } => {
            let options = ProcessOptions {
                format: &format,
                group: &group,
                html_input,
                inline,
                strict,
            };
            process_command(&input, output.as_deref(), &options)?;
        }
        Commands::Formats => {
            formats_command();
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

struct ProcessOptions<'a> {
    format: &'a str,
    group: &'a str,
    html_input: bool,
    inline: bool,
    strict: bool,
}

fn is_html_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"))
        .unwrap_or(false)
}

/// Process a document containing annotation blocks.
fn process_command(
    input: &Path,
    output: Option<&Path>,
    options: &ProcessOptions,
) -> Result<(), AppError> {
    // 1. Resolve the output format before touching the input
    let format = builtin_format(options.format)
        .ok_or_else(|| AppError::Format(format!("unknown format '{}'", options.format)))?;
    if options.inline && !format.supports_inline() {
        return Err(AppError::Format(format!(
            "--inline cannot be used with the '{}' format",
            format.name()
        )));
    }

    // 2. Read the document (support '-' for stdin)
    let mut document = if input == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| AppError::InputFile(format!("failed to read from stdin: {}", e)))?;
        buf
    } else {
        fs::read_to_string(input)
            .map_err(|e| AppError::InputFile(format!("'{}': {}", input.display(), e)))?
    };

    // 3. Reduce HTML pages to their text
    if options.html_input || is_html_path(input) {
        document = html_to_text(&document);
    }

    // 4. Extract and parse annotation blocks
    let blocks = extract_blocks(&document);
    let outcome = process_blocks(&blocks);
    tracing::debug!(
        found = blocks.len(),
        skipped = outcome.skipped.len(),
        "processed document"
    );

    if options.strict {
        if let Some(first) = outcome.skipped.first() {
            return Err(AppError::MalformedBlock(format!(
                "{} malformed annotation block(s); first at byte {}: {}",
                outcome.skipped.len(),
                first.span.0,
                first.error
            )));
        }
    }

    // 5. Render
    let result = if options.inline {
        render_inline(&document, &outcome, format)?
    } else {
        render_document(&outcome, format, options.group)?
    };

    // 6. Write to file or stdout
    if let Some(output_path) = output {
        fs::write(output_path, &result)
            .map_err(|e| AppError::OutputFile(format!("'{}': {}", output_path.display(), e)))?;
        eprintln!(
            "processed {} block(s), skipped {}, wrote {}",
            outcome.processed.len(),
            outcome.skipped.len(),
            output_path.display()
        );
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        write!(handle, "{}", result)
            .map_err(|e| AppError::OutputFile(format!("stdout: {}", e)))?;
    }

    Ok(())
}

/// Renders every parsed record, or the bibliography container for html.
fn render_document(
    outcome: &ProcessOutcome,
    format: OutputFormat,
    group: &str,
) -> Result<String, AppError> {
    if format == OutputFormat::Html {
        let id = group_id(group);
        let mut bibliography = Bibliography::new();
        for block in &outcome.processed {
            bibliography.add_block(&id, block);
        }
        if bibliography.is_empty() {
            return Ok(String::new());
        }
        return Ok(format!("{}\n", bibliography.to_html()));
    }

    let records: Vec<_> = outcome.records().cloned().collect();
    render_records(&records, format).map_err(|e| AppError::Serialization(e.to_string()))
}

/// Rewrites the document with each parsed block replaced by its rendering.
/// Skipped blocks are left as they are.
fn render_inline(
    document: &str,
    outcome: &ProcessOutcome,
    format: OutputFormat,
) -> Result<String, AppError> {
    let mut rendered = Vec::with_capacity(outcome.processed.len());
    for block in &outcome.processed {
        let formatted = render_records(&block.records, format)
            .map_err(|e| AppError::Serialization(e.to_string()))?;
        rendered.push(RenderedBlock {
            original_span: block.span,
            formatted: formatted.trim_end().to_string(),
        });
    }
    Ok(replace_blocks(document, &rendered))
}

/// List available output formats.
fn formats_command() {
    for (name, description) in builtin_format_descriptions() {
        println!("{:<12}{}", name, description);
    }
}
