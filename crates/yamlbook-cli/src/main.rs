//! yamlbook CLI - YAML documents to workbooks and back

mod settings;
mod store;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use yamlbook::{yaml, OutputMode};
use yamlbook_csv::{CsvWriteOptions, CsvWriter};

use crate::settings::Settings;
use crate::store::{load_workbook, save_workbook};

#[derive(Parser)]
#[command(name = "yamlbook")]
#[command(
    author,
    version,
    about = "Convert comment-annotated YAML documents to and from workbooks"
)]
struct Cli {
    /// More diagnostics on stderr (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write YAML files into a workbook
    Encode {
        /// Input YAML files, read in order
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output workbook file
        #[arg(short, long)]
        output: PathBuf,

        /// Use indent markers in column A instead of column offsets
        #[arg(long)]
        prefix: bool,

        /// Apply the comment policy for a human-readable layout
        #[arg(long)]
        display: bool,

        /// JSON settings file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Read a workbook back into YAML
    Decode {
        /// Input workbook file
        input: PathBuf,

        /// Output YAML file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// The workbook was written with --prefix
        #[arg(long)]
        prefix: bool,

        /// The workbook was written with --display
        #[arg(long)]
        display: bool,

        /// JSON settings file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Build a data-entry workbook from a JSON Schema
    Collect {
        /// JSON Schema file
        schema: PathBuf,

        /// Output workbook file
        #[arg(short, long)]
        output: PathBuf,

        /// Put long option lists on hidden sheets instead of truncating them
        #[arg(long)]
        hidden_sheets: bool,

        /// Ignore allOf branches
        #[arg(long)]
        skip_all_of: bool,

        /// JSON settings file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// List all sheets in a workbook
    Sheets {
        /// Input workbook file
        input: PathBuf,
    },

    /// Print a sheet as CSV
    #[command(alias = "csv")]
    Preview {
        /// Input workbook file
        input: PathBuf,

        /// Sheet index (0-based)
        #[arg(short, long, default_value = "0")]
        sheet: usize,

        /// Output CSV file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Field delimiter
        #[arg(short, long, default_value = ",")]
        delimiter: char,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Encode {
            inputs,
            output,
            prefix,
            display,
            config,
        } => encode(&inputs, &output, prefix, display, config.as_deref()),
        Commands::Decode {
            input,
            output,
            prefix,
            display,
            config,
        } => decode(&input, output.as_deref(), prefix, display, config.as_deref()),
        Commands::Collect {
            schema,
            output,
            hidden_sheets,
            skip_all_of,
            config,
        } => collect(&schema, &output, hidden_sheets, skip_all_of, config.as_deref()),
        Commands::Sheets { input } => list_sheets(&input),
        Commands::Preview {
            input,
            sheet,
            output,
            delimiter,
        } => preview(&input, sheet, output.as_deref(), delimiter),
    }
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn mode_for(display: bool) -> OutputMode {
    if display {
        OutputMode::Display
    } else {
        OutputMode::YamlOriented
    }
}

fn encode(
    inputs: &[PathBuf],
    output: &Path,
    prefix: bool,
    display: bool,
    config: Option<&Path>,
) -> Result<()> {
    let settings = Settings::load(config)?.with_prefix(prefix);
    let writer = settings.writer(mode_for(display))?;

    let mut documents = Vec::new();
    for input in inputs {
        let file =
            File::open(input).with_context(|| format!("Failed to open '{}'", input.display()))?;
        let parsed = yaml::parse_reader(file)
            .with_context(|| format!("Failed to parse '{}'", input.display()))?;
        debug!(file = %input.display(), documents = parsed.len(), "parsed input");
        documents.extend(parsed);
    }

    let count = documents.len();
    let workbook = writer
        .to_workbook(documents)
        .context("Failed to build the workbook")?;
    save_workbook(&workbook, output)?;
    eprintln!(
        "Wrote {} documents to '{}' ({} sheets)",
        count,
        output.display(),
        workbook.sheet_count()
    );
    Ok(())
}

fn decode(
    input: &Path,
    output: Option<&Path>,
    prefix: bool,
    display: bool,
    config: Option<&Path>,
) -> Result<()> {
    let settings = Settings::load(config)?.with_prefix(prefix);
    let reader = settings.reader(mode_for(display))?;
    let workbook = load_workbook(input)?;

    let documents = reader
        .from_workbook(&workbook)
        .with_context(|| format!("Failed to read documents from '{}'", input.display()))?;
    let text = yaml::emit_documents(&documents);

    if let Some(output_path) = output {
        std::fs::write(output_path, &text)
            .with_context(|| format!("Failed to write '{}'", output_path.display()))?;
        eprintln!(
            "Wrote {} documents to '{}'",
            documents.len(),
            output_path.display()
        );
    } else {
        io::stdout()
            .write_all(text.as_bytes())
            .context("Failed to write to stdout")?;
    }
    Ok(())
}

fn collect(
    schema: &Path,
    output: &Path,
    hidden_sheets: bool,
    skip_all_of: bool,
    config: Option<&Path>,
) -> Result<()> {
    let mut settings = Settings::load(config)?;
    if hidden_sheets {
        settings.collect.use_hidden_sheets_for_long_enums = true;
    }
    if skip_all_of {
        settings.collect.skip_all_of = true;
    }

    let text = std::fs::read_to_string(schema)
        .with_context(|| format!("Failed to read '{}'", schema.display()))?;
    let workbook = settings
        .writer(OutputMode::DataCollect)?
        .with_schema(text)
        .schema_to_workbook()
        .with_context(|| format!("Failed to build a form from '{}'", schema.display()))?;
    save_workbook(&workbook, output)?;
    eprintln!(
        "Wrote form to '{}' ({} sheets)",
        output.display(),
        workbook.sheet_count()
    );
    Ok(())
}

fn list_sheets(input: &Path) -> Result<()> {
    let workbook = load_workbook(input)?;

    for (i, sheet) in workbook.worksheets().enumerate() {
        let visibility = if sheet.is_visible() { "visible" } else { "hidden" };
        println!("{}\t{}\t{}", i, sheet.name(), visibility);
    }

    Ok(())
}

fn preview(input: &Path, sheet: usize, output: Option<&Path>, delimiter: char) -> Result<()> {
    if !delimiter.is_ascii() {
        bail!("Delimiter must be a single ASCII character, got '{}'", delimiter);
    }
    let workbook = load_workbook(input)?;
    let options = CsvWriteOptions::default().with_delimiter(delimiter as u8);

    match output {
        Some(output_path) => {
            let file = File::create(output_path)
                .with_context(|| format!("Failed to create '{}'", output_path.display()))?;
            CsvWriter::write_sheet(&workbook, sheet, file, &options)
                .with_context(|| format!("Failed to write '{}'", output_path.display()))?;
        }
        None => {
            CsvWriter::write_sheet(&workbook, sheet, io::stdout().lock(), &options)
                .context("Failed to write to stdout")?;
        }
    }
    Ok(())
}
