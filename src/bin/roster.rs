//! Roster CLI - Command-line interface for Roster Pulse
//!
//! Commands:
//! - transform: Enrich raw roster rows into a dashboard payload (batch mode)
//! - validate: Shape-check raw rows before ingestion
//! - doctor: Diagnose pipeline health and configuration
//! - schema: Print input/output schema information

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{Local, NaiveDateTime};
use roster_pulse::encoder::PAYLOAD_VERSION;
use roster_pulse::mapper::columns;
use roster_pulse::state::{AppState, STATE_SCHEMA_VERSION};
use roster_pulse::{
    EnrichedRecord, FieldMapper, InferenceConfig, PipelineError, RosterProcessor, ENGINE_VERSION,
    PRODUCER_NAME,
};

/// Roster - compute engine for shift-coverage roster records
#[derive(Parser)]
#[command(name = "roster")]
#[command(author = "Roster Pulse Team")]
#[command(version = ENGINE_VERSION)]
#[command(about = "Transform staffing rows into shift-coverage signals", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enrich raw roster rows into a dashboard payload (batch mode)
    Transform {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long)]
        output: PathBuf,

        /// Input format
        #[arg(long, default_value = "json")]
        input_format: InputFormat,

        /// Output format
        #[arg(long, default_value = "json-pretty")]
        output_format: OutputFormat,

        /// Inference configuration file (JSON; missing fields keep defaults)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Evaluate "active now" against this instant instead of the local
        /// clock (e.g. "2026-08-06T10:30")
        #[arg(long)]
        now: Option<String>,

        /// Save the application-state snapshot to file after processing
        #[arg(long)]
        save_state: Option<PathBuf>,
    },

    /// Shape-check raw rows before ingestion
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "json")]
        input_format: InputFormat,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Diagnose pipeline health and configuration
    Doctor {
        /// Check an application-state file
        #[arg(long)]
        state: Option<PathBuf>,

        /// Check an inference configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print schema information
    Schema {
        /// Schema to print (input or output)
        #[arg(value_enum)]
        schema_type: SchemaType,

        /// Output as JSON schema
        #[arg(long)]
        json_schema: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// JSON array of raw rows
    Json,
    /// Newline-delimited JSON (one raw row per line)
    Ndjson,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Newline-delimited JSON (one enriched record per line)
    Ndjson,
    /// Full dashboard payload as compact JSON
    Json,
    /// Full dashboard payload, pretty-printed
    JsonPretty,
}

#[derive(Clone, ValueEnum)]
enum SchemaType {
    /// Input schema (raw spreadsheet rows)
    Input,
    /// Output schema (dashboard payload)
    Output,
}

fn main() -> ExitCode {
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

fn run(cli: Cli) -> Result<(), RosterCliError> {
    match cli.command {
        Commands::Transform {
            input,
            output,
            input_format,
            output_format,
            config,
            now,
            save_state,
        } => cmd_transform(
            &input,
            &output,
            input_format,
            output_format,
            config.as_deref(),
            now.as_deref(),
            save_state.as_deref(),
        ),

        Commands::Validate {
            input,
            input_format,
            json,
        } => cmd_validate(&input, input_format, json),

        Commands::Doctor {
            state,
            config,
            json,
        } => cmd_doctor(state.as_deref(), config.as_deref(), json),

        Commands::Schema {
            schema_type,
            json_schema,
        } => cmd_schema(schema_type, json_schema),
    }
}

fn cmd_transform(
    input: &PathBuf,
    output: &PathBuf,
    input_format: InputFormat,
    output_format: OutputFormat,
    config: Option<&std::path::Path>,
    now: Option<&str>,
    save_state: Option<&std::path::Path>,
) -> Result<(), RosterCliError> {
    let input_data = read_input(input)?;

    let rows = match input_format {
        InputFormat::Json => FieldMapper::parse_rows_json(&input_data)?,
        InputFormat::Ndjson => FieldMapper::parse_rows_ndjson(&input_data)?,
    };

    let config = match config {
        Some(path) => InferenceConfig::from_json(&fs::read_to_string(path)?)?,
        None => InferenceConfig::default(),
    };

    let now = match now {
        Some(text) => parse_instant(text)?,
        None => Local::now().naive_local(),
    };

    let processor = RosterProcessor::with_config(&config);
    let records = processor.enrich_at(&rows, now);

    if let Some(state_path) = save_state {
        let state_json = AppState::new(records.clone()).to_json()?;
        fs::write(state_path, state_json)?;
    }

    let output_data = format_output(&processor, &records, &output_format)?;

    if output.to_string_lossy() == "-" {
        print!("{}", output_data);
    } else {
        fs::write(output, output_data)?;
    }

    Ok(())
}

fn cmd_validate(
    input: &PathBuf,
    input_format: InputFormat,
    json: bool,
) -> Result<(), RosterCliError> {
    let input_data = read_input(input)?;

    let rows = match input_format {
        InputFormat::Json => FieldMapper::parse_rows_json(&input_data)?,
        InputFormat::Ndjson => FieldMapper::parse_rows_ndjson(&input_data)?,
    };

    let Some(rows) = rows.as_array() else {
        return Err(RosterCliError::Pipeline(PipelineError::Parse(
            "input is not a JSON array of rows".to_string(),
        )));
    };

    let mut errors: Vec<RowErrorDetail> = Vec::new();
    let mut unknown_columns: Vec<String> = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        match row.as_object() {
            Some(cells) => {
                for key in cells.keys() {
                    if !columns::ALL.contains(&key.as_str()) && !unknown_columns.contains(key) {
                        unknown_columns.push(key.clone());
                    }
                }
            }
            None => errors.push(RowErrorDetail {
                index,
                error: "row is not a JSON object".to_string(),
            }),
        }
    }

    unknown_columns.sort();

    let report = ValidationReport {
        total_rows: rows.len(),
        valid_rows: rows.len() - errors.len(),
        invalid_rows: errors.len(),
        unknown_columns,
        errors,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total rows:   {}", report.total_rows);
        println!("Valid rows:   {}", report.valid_rows);
        println!("Invalid rows: {}", report.invalid_rows);

        if !report.unknown_columns.is_empty() {
            println!("\nUnknown columns (will be dropped):");
            for column in &report.unknown_columns {
                println!("  - {}", column);
            }
        }

        if !report.errors.is_empty() {
            println!("\nErrors:");
            for err in &report.errors {
                println!("  - Row {}: {}", err.index, err.error);
            }
        }
    }

    if report.invalid_rows > 0 {
        Err(RosterCliError::ValidationFailed(report.invalid_rows))
    } else {
        Ok(())
    }
}

fn cmd_doctor(
    state: Option<&std::path::Path>,
    config: Option<&std::path::Path>,
    json: bool,
) -> Result<(), RosterCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "engine_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("Roster Pulse version {}", ENGINE_VERSION),
    });

    checks.push(DoctorCheck {
        name: "payload_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("Dashboard payload version {}", PAYLOAD_VERSION),
    });

    if let Some(config_path) = config {
        checks.push(check_config_file(config_path));
    }

    if let Some(state_path) = state {
        checks.push(check_state_file(state_path));
    }

    let stdin_check = if atty::is(atty::Stream::Stdin) {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a TTY (interactive mode)".to_string(),
        }
    } else {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a pipe (batch mode ready)".to_string(),
        }
    };
    checks.push(stdin_check);

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: ENGINE_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Roster Doctor Report");
        println!("====================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("\nChecks:");

        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report
        .checks
        .iter()
        .any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(RosterCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

fn check_config_file(path: &std::path::Path) -> DoctorCheck {
    if !path.exists() {
        return DoctorCheck {
            name: "config".to_string(),
            status: CheckStatus::Warning,
            message: "Config file does not exist".to_string(),
        };
    }

    match fs::read_to_string(path) {
        Ok(content) => match InferenceConfig::from_json(&content) {
            Ok(config) => DoctorCheck {
                name: "config".to_string(),
                status: CheckStatus::Ok,
                message: format!(
                    "Config valid ({} absence markers, {} active weekdays)",
                    config.absence_markers.len(),
                    config.active_weekdays.len()
                ),
            },
            Err(e) => DoctorCheck {
                name: "config".to_string(),
                status: CheckStatus::Error,
                message: format!("Invalid config JSON: {}", e),
            },
        },
        Err(e) => DoctorCheck {
            name: "config".to_string(),
            status: CheckStatus::Error,
            message: format!("Cannot read config file: {}", e),
        },
    }
}

fn check_state_file(path: &std::path::Path) -> DoctorCheck {
    if !path.exists() {
        return DoctorCheck {
            name: "state".to_string(),
            status: CheckStatus::Warning,
            message: "State file does not exist".to_string(),
        };
    }

    match fs::read_to_string(path) {
        Ok(content) => match AppState::from_json(&content) {
            Ok(state) if state.schema_version == STATE_SCHEMA_VERSION => DoctorCheck {
                name: "state".to_string(),
                status: CheckStatus::Ok,
                message: format!(
                    "State valid ({} records, saved {})",
                    state.records.len(),
                    state.saved_at_utc
                ),
            },
            Ok(state) => DoctorCheck {
                name: "state".to_string(),
                status: CheckStatus::Warning,
                message: format!(
                    "State schema is {} (expected {})",
                    state.schema_version, STATE_SCHEMA_VERSION
                ),
            },
            Err(e) => DoctorCheck {
                name: "state".to_string(),
                status: CheckStatus::Error,
                message: format!("Invalid state JSON: {}", e),
            },
        },
        Err(e) => DoctorCheck {
            name: "state".to_string(),
            status: CheckStatus::Error,
            message: format!("Cannot read state file: {}", e),
        },
    }
}

fn cmd_schema(schema_type: SchemaType, json_schema: bool) -> Result<(), RosterCliError> {
    match schema_type {
        SchemaType::Input => {
            if json_schema {
                println!("{}", get_input_json_schema());
            } else {
                println!("Input Schema: raw roster rows");
                println!();
                println!("A JSON array of objects, one per spreadsheet row. Recognized");
                println!("columns (all optional, unknown columns are dropped):");
                println!();
                for column in columns::ALL {
                    println!("  - {}", column);
                }
                println!();
                println!("Empty cells fall back to defaults:");
                println!("  - STATUS   -> PENDING");
                println!("  - STATUS1  -> NONE");
                println!("  - SCHEDULE -> NOT DEFINED");
                println!("  - MANAGER  -> UNASSIGNED");
            }
        }
        SchemaType::Output => {
            if json_schema {
                println!("{}", get_output_json_schema());
            } else {
                println!("Output Schema: dashboard payload v{}", PAYLOAD_VERSION);
                println!();
                println!("- payload_version: Schema version");
                println!("- producer: {{ name, version, instance_id }}");
                println!("- computed_at_utc: RFC 3339 timestamp of the run");
                println!("- summary: {{ total, uncovered, on_leave, active_now }}");
                println!("- records: Array of enriched records containing:");
                println!("  - the mapped semantic fields (id_project, worker_name, ...)");
                println!("  - is_uncovered, is_on_leave: derived coverage flags");
                println!("  - detected_shift: MORNING | AFTERNOON | NIGHT | VARIABLE/NOT DEFINED");
                println!("  - computed_schedule: {{ start, end, category, matched_text }} or null");
                println!("  - active_now: ephemeral, valid only for the run instant");
            }
        }
    }

    Ok(())
}

// Helper functions

fn read_input(input: &PathBuf) -> Result<String, RosterCliError> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn parse_instant(text: &str) -> Result<NaiveDateTime, RosterCliError> {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M"))
        .map_err(|_| RosterCliError::BadTimestamp(text.to_string()))
}

fn format_output(
    processor: &RosterProcessor,
    records: &[EnrichedRecord],
    format: &OutputFormat,
) -> Result<String, RosterCliError> {
    match format {
        OutputFormat::Ndjson => {
            let mut lines: Vec<String> = Vec::new();
            for record in records {
                lines.push(serde_json::to_string(record)?);
            }
            Ok(lines.join("\n") + "\n")
        }
        OutputFormat::Json => Ok(serde_json::to_string(&processor.encode_payload(records))?),
        OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(
            &processor.encode_payload(records),
        )?),
    }
}

fn get_input_json_schema() -> String {
    serde_json::json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "roster.raw_rows.v1",
        "description": "Raw spreadsheet-derived staffing rows",
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "PROJECT": { "type": ["string", "number", "null"] },
                "SERVICE": { "type": ["string", "null"] },
                "TYPE_S": { "type": ["string", "null"] },
                "HOLDER": { "type": ["string", "null"] },
                "STATUS": { "type": ["string", "null"] },
                "STATUS1": { "type": ["string", "null"] },
                "SCHEDULE": { "type": ["string", "null"] },
                "NOTES": { "type": ["string", "null"] },
                "SUBSTITUTE": { "type": ["string", "null"] },
                "BILLING": { "type": ["string", "null"] },
                "VACATION_26": { "type": ["string", "null"] },
                "MANAGER": { "type": ["string", "null"] }
            },
            "additionalProperties": true
        }
    })
    .to_string()
}

fn get_output_json_schema() -> String {
    serde_json::json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "roster.dashboard_payload.v1",
        "description": "Roster Pulse dashboard payload",
        "type": "object",
        "required": ["payload_version", "producer", "computed_at_utc", "summary", "records"],
        "properties": {
            "payload_version": { "type": "string" },
            "producer": {
                "type": "object",
                "properties": {
                    "name": { "type": "string" },
                    "version": { "type": "string" },
                    "instance_id": { "type": "string" }
                }
            },
            "computed_at_utc": { "type": "string", "format": "date-time" },
            "summary": {
                "type": "object",
                "properties": {
                    "total": { "type": "integer" },
                    "uncovered": { "type": "integer" },
                    "on_leave": { "type": "integer" },
                    "active_now": { "type": "integer" }
                }
            },
            "records": {
                "type": "array",
                "items": { "type": "object" }
            }
        }
    })
    .to_string()
}

// Error types

#[derive(Debug)]
enum RosterCliError {
    Io(io::Error),
    Pipeline(PipelineError),
    Json(serde_json::Error),
    BadTimestamp(String),
    ValidationFailed(usize),
    DoctorFailed,
}

impl From<io::Error> for RosterCliError {
    fn from(e: io::Error) -> Self {
        RosterCliError::Io(e)
    }
}

impl From<PipelineError> for RosterCliError {
    fn from(e: PipelineError) -> Self {
        RosterCliError::Pipeline(e)
    }
}

impl From<serde_json::Error> for RosterCliError {
    fn from(e: serde_json::Error) -> Self {
        RosterCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<RosterCliError> for CliError {
    fn from(e: RosterCliError) -> Self {
        match e {
            RosterCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            RosterCliError::Pipeline(e) => CliError {
                code: "PIPELINE_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Run 'roster validate' for details".to_string()),
            },
            RosterCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            RosterCliError::BadTimestamp(text) => CliError {
                code: "BAD_TIMESTAMP".to_string(),
                message: format!("Cannot parse instant: {}", text),
                hint: Some("Use the form 2026-08-06T10:30".to_string()),
            },
            RosterCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} rows failed validation", count),
                hint: Some("Fix validation errors and retry".to_string()),
            },
            RosterCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
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
    unknown_columns: Vec<String>,
    errors: Vec<RowErrorDetail>,
}

#[derive(serde::Serialize)]
struct RowErrorDetail {
    index: usize,
    error: String,
}

#[derive(serde::Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(serde::Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(serde::Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}
