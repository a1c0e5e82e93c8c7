//! Flowsketch - diagram-to-n8n workflow generator
//!
//! Main entry point for the flowsketch CLI and server.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use flowsketch_api::{AppState, InterfaceConfig, InterfaceServer};
use flowsketch_config::{Config, ConfigLoader};
use flowsketch_generator::{
    DiagramImage, PromptOptions, Session, WorkflowCategory, WorkflowGenerator,
};
use flowsketch_provider_anthropic::AnthropicClient;

/// Flowsketch CLI.
#[derive(Parser)]
#[command(name = "flowsketch")]
#[command(about = "Generate importable n8n workflows from diagram images")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (relay + generation API)
    Serve {
        /// Server host
        #[arg(long)]
        host: Option<String>,

        /// Server port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Generate a workflow from a local diagram image
    Generate {
        /// Path to the diagram image (JPEG, PNG, GIF or WebP, max 2 MiB)
        image: PathBuf,

        /// Project name folded into the prompt and the export file name
        #[arg(long)]
        project_name: Option<String>,

        /// Workflow category: general, customer, inventory, training, reporting
        #[arg(long, default_value = "general")]
        category: String,

        /// Free-text description of the workflow
        #[arg(long)]
        description: Option<String>,

        /// File with video-transcript text to fold into the prompt
        #[arg(long)]
        transcript_file: Option<PathBuf>,

        /// Output file (defaults to a name derived from the project name)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the known node types
    Nodes {
        /// Output format (table, json)
        #[arg(long, default_value = "table")]
        format: String,
    },
}

/// Initialize console tracing. Diagnostics stay ephemeral; nothing is
/// logged durably.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let cli = Cli::parse();
    let config = ConfigLoader::load_or_default(&cli.config)?;

    match cli.command {
        None => run_server(config, None, None).await,
        Some(Commands::Serve { host, port }) => run_server(config, host, port).await,
        Some(Commands::Generate {
            image,
            project_name,
            category,
            description,
            transcript_file,
            output,
        }) => {
            run_generate(
                config,
                image,
                project_name,
                &category,
                description,
                transcript_file,
                output,
            )
            .await
        }
        Some(Commands::Nodes { format }) => list_nodes(&format),
    }
}

/// Run the HTTP server in the foreground.
async fn run_server(
    mut config: Config,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    info!("Starting flowsketch v{}", env!("CARGO_PKG_VERSION"));
    if config.anthropic.api_key.is_none() {
        warn!("No Anthropic API key configured; relay and generation will answer 500");
        warn!("Set ANTHROPIC_API_KEY or [anthropic].api_key in the config file");
    }

    let interface = InterfaceConfig::new(config.server.host.clone(), config.server.port);
    let state = Arc::new(AppState::from_config(config));
    let server = InterfaceServer::new(interface, state);

    info!("Flowsketch ready:");
    info!("  POST /v1/messages            - Messages API relay");
    info!("  POST /v1/workflows/generate  - diagram-to-workflow generation");
    info!("  GET  /health                 - health check");

    server.run().await
}

/// Run one generation for a local image file.
async fn run_generate(
    config: Config,
    image: PathBuf,
    project_name: Option<String>,
    category: &str,
    description: Option<String>,
    transcript_file: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(api_key) = config.anthropic.api_key.clone() else {
        return Err("No Anthropic API key configured. Set ANTHROPIC_API_KEY.".into());
    };

    let category = WorkflowCategory::from_name(category)
        .ok_or_else(|| format!("Unknown category: {category}"))?;

    let transcript = match transcript_file {
        Some(path) => Some(std::fs::read_to_string(path)?),
        None => None,
    };

    let image = DiagramImage::from_path(&image)?;
    info!(
        bytes = image.len(),
        media_type = image.media_type().as_mime(),
        "diagram image accepted"
    );

    let client = AnthropicClient::new(api_key, Duration::from_secs(config.anthropic.timeout_seconds))
        .with_base_url(config.anthropic.base_url.clone());
    let generator = WorkflowGenerator::new(client, config.anthropic.model.clone(), config.anthropic.max_tokens);

    let options = PromptOptions {
        project_name: project_name.unwrap_or_else(|| config.generator.default_project_name.clone()),
        category,
        description,
        transcript,
    };

    let generated = generator.generate(&image, &options).await?;

    println!("Workflow generated: {} node(s)", generated.node_count());
    if !generated.report.errors.is_empty() {
        println!("\nValidation errors:");
        for error in &generated.report.errors {
            println!("  - {error}");
        }
    }
    if !generated.report.warnings.is_empty() {
        println!("\nValidation warnings:");
        for warning in &generated.report.warnings {
            println!("  - {warning}");
        }
    }

    println!("\nPreview lanes:");
    for placement in &generated.placements {
        println!(
            "  {:<10} {:<24} at ({}, {})",
            placement.lane.label(),
            placement.id,
            placement.position[0],
            placement.position[1]
        );
    }

    let mut session = Session::new();
    session.complete(generated);

    let path = match output {
        Some(path) => path,
        None => PathBuf::from(session.export_file_name()?),
    };
    session.write_to(&path)?;
    println!("\nWorkflow JSON written to {}", path.display());

    Ok(())
}

/// Print the node catalog.
fn list_nodes(format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = flowsketch_core::NodeCatalog::new();

    match format {
        "json" => {
            let entries: Vec<serde_json::Value> = catalog
                .entries()
                .iter()
                .map(|spec| {
                    serde_json::json!({
                        "type": &spec.kind,
                        "name": &spec.name,
                        "category": format!("{:?}", spec.category).to_lowercase(),
                        "description": &spec.description,
                        "aliases": &spec.aliases,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        _ => {
            println!("{:<36} {:<20} {:<12} ALIASES", "TYPE", "NAME", "CATEGORY");
            println!("{}", "-".repeat(100));
            for spec in catalog.entries() {
                println!(
                    "{:<36} {:<20} {:<12} {}",
                    spec.kind,
                    spec.name,
                    format!("{:?}", spec.category).to_lowercase(),
                    spec.aliases.join(", ")
                );
            }
        }
    }

    Ok(())
}
