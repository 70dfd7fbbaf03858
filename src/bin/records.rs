//! Records CLI - Command-line interface for baby-records
//!
//! Commands:
//! - types: Print the record taxonomy
//! - info: Print metadata for one record type
//! - format: Summarize a record's attributes
//! - timeline: Group exported record rows into titled day sections
//! - validate: Validate exported record rows
//! - draft: Seed a new record draft

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use baby_records::schema::{parse_date, RecordRow, RecordRowAdapter, RowValidation};
use baby_records::taxonomy::{group_of, info_of, pickable_types, RECORD_TYPE_GROUPS};
use baby_records::timeline::{timeline_from_rows, RecordFilter, TimelineReport};
use baby_records::types::RecordType;
use baby_records::{format_raw_attributes, RecordDraft, TaxonomyError, RECORDS_VERSION};

/// Records - taxonomy and timeline tooling for baby-tracking records
#[derive(Parser)]
#[command(name = "records")]
#[command(version = RECORDS_VERSION)]
#[command(about = "Resolve, format and group baby-tracking records", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the record taxonomy (groups, types, titles)
    Types {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print metadata for one record type
    Info {
        /// Record type (e.g. "weight", "sleepNight")
        record_type: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Summarize a record's attributes
    Format {
        /// Record type
        #[arg(short = 't', long = "type")]
        record_type: String,

        /// Attribute JSON
        #[arg(short, long, default_value = "{}")]
        attributes: String,

        /// Record start date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// Record start time (HH:MM:SS)
        #[arg(long)]
        time: Option<String>,
    },

    /// Group record rows into titled day sections
    Timeline {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Output format
        #[arg(long, default_value = "json-pretty")]
        output_format: OutputFormat,

        /// Only records of this baby profile
        #[arg(long)]
        profile: Option<i64>,

        /// Only these record types (repeatable)
        #[arg(short = 't', long = "type")]
        record_types: Vec<String>,

        /// Reference date for "Today"/"Yesterday" titles (defaults to the local date)
        #[arg(long)]
        today: Option<String>,
    },

    /// Validate record rows
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Seed a draft for a new record
    Draft {
        /// Record type
        #[arg(short = 't', long = "type")]
        record_type: String,

        /// Baby profile id
        #[arg(long)]
        profile: i64,

        /// Start as YYYY-MM-DDTHH:MM:SS (defaults to the local time)
        #[arg(long)]
        now: Option<String>,
    },
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// Newline-delimited JSON (one row per line)
    Ndjson,
    /// JSON array of rows
    Json,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Newline-delimited JSON (one section per line, rejected rows on stderr)
    Ndjson,
    /// JSON object `{sections, rejected}`
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), RecordsCliError> {
    match cli.command {
        Commands::Types { json } => cmd_types(json),

        Commands::Info { record_type, json } => cmd_info(&record_type, json),

        Commands::Format {
            record_type,
            attributes,
            date,
            time,
        } => cmd_format(&record_type, &attributes, date.as_deref(), time.as_deref()),

        Commands::Timeline {
            input,
            input_format,
            output_format,
            profile,
            record_types,
            today,
        } => cmd_timeline(
            &input,
            input_format,
            output_format,
            profile,
            &record_types,
            today.as_deref(),
        ),

        Commands::Validate {
            input,
            input_format,
            json,
        } => cmd_validate(&input, input_format, json),

        Commands::Draft {
            record_type,
            profile,
            now,
        } => cmd_draft(&record_type, profile, now.as_deref()),
    }
}

fn cmd_types(json: bool) -> Result<(), RecordsCliError> {
    if json {
        let groups: Vec<serde_json::Value> = RECORD_TYPE_GROUPS
            .iter()
            .map(|(group, types)| {
                serde_json::json!({
                    "group": group,
                    "types": types.iter().map(|t| info_of(*t)).collect::<Vec<_>>(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&groups)?);
        return Ok(());
    }

    println!("Record Taxonomy");
    println!("===============");
    for (group, types) in RECORD_TYPE_GROUPS {
        let pickable = pickable_types(*group);
        println!("\n{}:", group);
        for t in *types {
            let info = info_of(*t);
            let marker = if pickable.contains(t) { " " } else { "*" };
            println!("  {} {:<20} {}", marker, t.as_str(), info.title);
        }
    }
    println!("\n* not offered in the type picker");

    Ok(())
}

fn cmd_info(record_type: &str, json: bool) -> Result<(), RecordsCliError> {
    let record_type: RecordType = record_type.parse()?;
    let info = info_of(record_type);

    if !json {
        println!("Type:       {}", info.record_type);
        println!("Group:      {}", group_of(record_type));
        println!("Title:      {}", info.title);
        println!("Color:      {}", info.color.as_str());
        println!("Icon:       {}", info.icon.asset_path());
        println!("Attributes: {}", info.attributes.to_json());
        println!("Pickable:   {}", info.pickable);
        return Ok(());
    }

    let report = serde_json::json!({
        "type": info.record_type,
        "group": group_of(record_type),
        "title": info.title,
        "color": info.color,
        "icon": info.icon,
        "attributes": info.attributes,
        "pickable": info.pickable,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

fn cmd_format(
    record_type: &str,
    attributes: &str,
    date: Option<&str>,
    time: Option<&str>,
) -> Result<(), RecordsCliError> {
    let attributes: serde_json::Value = serde_json::from_str(attributes)?;
    let summary = format_raw_attributes(record_type, &attributes, date, time)?;
    println!("{}", summary);
    Ok(())
}

fn cmd_timeline(
    input: &Path,
    input_format: InputFormat,
    output_format: OutputFormat,
    profile: Option<i64>,
    record_types: &[String],
    today: Option<&str>,
) -> Result<(), RecordsCliError> {
    let rows = read_rows(input, input_format)?;
    if rows.is_empty() {
        return Err(RecordsCliError::NoRecords);
    }

    let record_types = record_types
        .iter()
        .map(|t| t.parse::<RecordType>())
        .collect::<Result<Vec<_>, _>>()?;

    let filter = RecordFilter {
        baby_profile_id: profile,
        record_types,
    };

    let today = match today {
        Some(s) => parse_date(s)?,
        None => chrono::Local::now().date_naive(),
    };

    let report = timeline_from_rows(rows, &filter, today)?;

    print!("{}", format_output(&report, &output_format)?);
    if matches!(output_format, OutputFormat::Ndjson) && !report.rejected.is_empty() {
        eprintln!(
            "{}",
            serde_json::to_string(&serde_json::json!({ "rejected": report.rejected }))?
        );
    }

    Ok(())
}

fn cmd_validate(input: &Path, input_format: InputFormat, json: bool) -> Result<(), RecordsCliError> {
    let rows = read_rows(input, input_format)?;
    let failures = RecordRowAdapter::validate_rows(&rows);

    let report = ValidationReport {
        total_rows: rows.len(),
        valid_rows: rows.len() - failures.len(),
        invalid_rows: failures.len(),
        errors: failures,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total rows:   {}", report.total_rows);
        println!("Valid rows:   {}", report.valid_rows);
        println!("Invalid rows: {}", report.invalid_rows);

        if !report.errors.is_empty() {
            println!("\nErrors:");
            for err in &report.errors {
                println!("  - Record {} (index {}): {}", err.id, err.index, err.error);
            }
        }
    }

    if report.invalid_rows > 0 {
        Err(RecordsCliError::ValidationFailed(report.invalid_rows))
    } else {
        Ok(())
    }
}

fn cmd_draft(record_type: &str, profile: i64, now: Option<&str>) -> Result<(), RecordsCliError> {
    let record_type: RecordType = record_type.parse()?;
    let now = match now {
        Some(s) => chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").map_err(|e| {
            TaxonomyError::DateParse(format!("invalid timestamp '{}': {}", s, e))
        })?,
        None => chrono::Local::now().naive_local(),
    };

    let draft = RecordDraft::new(record_type, profile, now);
    println!("{}", serde_json::to_string_pretty(&draft)?);
    Ok(())
}

// Helper functions

fn read_rows(input: &Path, input_format: InputFormat) -> Result<Vec<RecordRow>, RecordsCliError> {
    let input_data = if input.to_string_lossy() == "-" {
        if atty::is(atty::Stream::Stdin) {
            eprintln!("Reading record rows from stdin (end with Ctrl-D)...");
        }
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(input)?
    };

    let rows = match input_format {
        InputFormat::Ndjson => RecordRowAdapter::parse_ndjson(&input_data)?,
        InputFormat::Json => RecordRowAdapter::parse_array(&input_data)?,
    };
    Ok(rows)
}

fn format_output(report: &TimelineReport, format: &OutputFormat) -> Result<String, RecordsCliError> {
    match format {
        OutputFormat::Ndjson => {
            let mut lines: Vec<String> = Vec::new();
            for section in &report.sections {
                lines.push(serde_json::to_string(section)?);
            }
            Ok(lines.join("\n") + "\n")
        }
        OutputFormat::Json => Ok(serde_json::to_string(report)? + "\n"),
        OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(report)? + "\n"),
    }
}

// Error types

#[derive(Debug)]
enum RecordsCliError {
    Io(io::Error),
    Taxonomy(TaxonomyError),
    Json(serde_json::Error),
    NoRecords,
    ValidationFailed(usize),
}

impl From<io::Error> for RecordsCliError {
    fn from(e: io::Error) -> Self {
        RecordsCliError::Io(e)
    }
}

impl From<TaxonomyError> for RecordsCliError {
    fn from(e: TaxonomyError) -> Self {
        RecordsCliError::Taxonomy(e)
    }
}

impl From<serde_json::Error> for RecordsCliError {
    fn from(e: serde_json::Error) -> Self {
        RecordsCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<RecordsCliError> for CliError {
    fn from(e: RecordsCliError) -> Self {
        match e {
            RecordsCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            RecordsCliError::Taxonomy(e) => {
                let hint = match &e {
                    TaxonomyError::UnknownRecordType(_) => "Run 'records types' to list record types",
                    TaxonomyError::AttributeShape { .. } => {
                        "Check the attributes against the record type's group"
                    }
                    TaxonomyError::DateParse(_) => "Dates are YYYY-MM-DD, times HH:MM:SS",
                    _ => "Check input format",
                };
                CliError {
                    code: e.code().to_string(),
                    message: e.to_string(),
                    hint: Some(hint.to_string()),
                }
            }
            RecordsCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            RecordsCliError::NoRecords => CliError {
                code: "NO_RECORDS".to_string(),
                message: "No record rows found in input".to_string(),
                hint: Some("Ensure input file is not empty".to_string()),
            },
            RecordsCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} rows failed validation", count),
                hint: Some("Fix validation errors and retry".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    total_rows: usize,
    valid_rows: usize,
    invalid_rows: usize,
    errors: Vec<RowValidation>,
}
