use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use gcf_inventory::config::{Config, OutputFormat};
use gcf_inventory::connector::GcpConnectorLocator;
use gcf_inventory::gcp::http::format_gcp_error;
use gcf_inventory::model::{cloud_service_types, ErrorResourceResponse, FunctionResponse};
use gcf_inventory::{CollectParams, CollectedRegions, FunctionManager};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Collect Google Cloud Functions into inventory resources
#[derive(Parser, Debug)]
#[command(name = "gcf-inventory", version, about, long_about = None)]
struct Cli {
    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List functions and print the collected resources (default)
    Collect(CollectArgs),
    /// Print the cloud-service type metadata
    Types {
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },
}

#[derive(Args, Debug, Default)]
struct CollectArgs {
    /// GCP project to collect
    #[arg(short, long)]
    project: Option<String>,

    /// Full collection parameters as JSON (options, secret_data, filter, zones)
    #[arg(long)]
    params_file: Option<PathBuf>,

    /// Service account key or other secret data as JSON
    #[arg(long)]
    secret_file: Option<PathBuf>,

    /// Access token to use instead of the secret data or ADC
    #[arg(long)]
    access_token: Option<String>,

    /// Only list functions in the regions of these zones (repeatable)
    #[arg(short, long = "zone")]
    zones: Vec<String>,

    /// Filter expression forwarded to the list call
    #[arg(long)]
    filter: Option<String>,

    /// Hours added to UTC deployment times for display
    #[arg(long, allow_hyphen_values = true)]
    display_offset_hours: Option<i32>,

    /// Cloud Functions API endpoint override
    #[arg(long)]
    endpoint: Option<String>,

    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Remember the project in the config file
    #[arg(long)]
    remember: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

#[derive(Serialize)]
struct CollectOutput {
    cloud_services: Vec<FunctionResponse>,
    errors: Vec<ErrorResourceResponse>,
    regions: Vec<String>,
}

fn setup_logging(
    level: LogLevel,
    log_file: Option<&Path>,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let (non_blocking, guard) = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {:?}", path))?;
            tracing_appender::non_blocking(file)
        }
        None => tracing_appender::non_blocking(std::io::stderr()),
    };

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("gcf-inventory started with log level: {:?}", level);

    Ok(Some(guard))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = setup_logging(cli.log_level, cli.log_file.as_deref())?;

    match cli.command.unwrap_or_else(|| Command::Collect(CollectArgs::default())) {
        Command::Collect(args) => collect(args).await,
        Command::Types { format } => {
            let format = Config::load().effective_output_format(format);
            print_output(&cloud_service_types(), format)
        }
    }
}

async fn collect(args: CollectArgs) -> Result<()> {
    let mut config = Config::load();
    let params = build_params(&args, &config)?;
    let project_id = params.project_id()?.to_string();

    tracing::info!("Using project: {}, zones: {:?}", project_id, params.zones);

    if args.remember {
        config.set_project(&project_id)?;
    }

    let locator = GcpConnectorLocator::new()
        .with_access_token(args.access_token.clone())
        .with_endpoint(args.endpoint.clone());
    let manager = FunctionManager::new(Arc::new(locator))
        .with_display_offset(config.effective_display_offset(args.display_offset_hours)?);

    let mut regions = CollectedRegions::new();
    let (cloud_services, errors) = match manager.collect_cloud_service(&params, &mut regions).await
    {
        Ok(collected) => collected,
        Err(e) => {
            tracing::error!("Collection failed: {:#}", e);
            anyhow::bail!(format_gcp_error(&e));
        }
    };

    for error in &errors {
        eprintln!(
            "warning: function {:?} not collected: {}",
            error.resource_id(),
            error.resource.message
        );
    }

    let output = CollectOutput {
        cloud_services,
        errors,
        regions: regions.codes(),
    };
    print_output(&output, config.effective_output_format(args.format))
}

/// Merge the params file, secret file and flags into collection parameters
fn build_params(args: &CollectArgs, config: &Config) -> Result<CollectParams> {
    let mut params = match &args.params_file {
        Some(path) => serde_json::from_str(&read_file(path)?)
            .with_context(|| format!("Invalid collection parameters in {:?}", path))?,
        None => CollectParams::default(),
    };

    if let Some(path) = &args.secret_file {
        let secret_data: Map<String, Value> = serde_json::from_str(&read_file(path)?)
            .with_context(|| format!("Invalid secret data in {:?}", path))?;
        params.secret_data.extend(secret_data);
    }

    let project = args
        .project
        .clone()
        .or_else(|| params.project_id().ok().map(|p| p.to_string()))
        .or_else(|| config.effective_project())
        .context(
            "No GCP project configured. Set GOOGLE_CLOUD_PROJECT or use --project flag",
        )?;
    params
        .secret_data
        .insert("project_id".to_string(), Value::String(project));

    if !args.zones.is_empty() {
        params.zones = args.zones.clone();
    }
    if let Some(filter) = &args.filter {
        params.filter = Value::String(filter.clone());
    }

    Ok(params)
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))
}

fn print_output<T: Serialize>(value: &T, format: OutputFormat) -> Result<()> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
    };
    println!("{}", rendered);
    Ok(())
}
