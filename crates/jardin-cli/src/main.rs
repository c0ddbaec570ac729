use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use jardin_base::InteractionSettings;
use jardin_design::{
    BackendConfig, DesignSubmission, DesignUploader, SaveOutcome, UploadRequest,
    inventory_from_scene, submit_design,
};
use std::path::{Path, PathBuf};
use tracing::info;

mod session;

use session::Session;

#[derive(Parser)]
#[command(name = "jardin")]
#[command(about = "Garden design placement core: session replay and settings")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay a recorded touch session against an in-memory scene.
    Replay(ReplayArgs),
    /// Print the default interaction settings as JSON.
    Defaults,
}

#[derive(Args)]
struct ReplayArgs {
    #[arg(long)]
    session: PathBuf,
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Design name used when the session did not confirm one.
    #[arg(long)]
    name: Option<String>,
    /// Write the design payload JSON here.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Backend base URL. With --token, prints the upload request it would send.
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long)]
    token: Option<String>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Replay(args) => replay(args),
        Command::Defaults => print_defaults(),
    }
}

fn replay(args: ReplayArgs) -> Result<()> {
    let settings = load_settings(args.settings.as_deref())?;
    let text = std::fs::read_to_string(&args.session)
        .with_context(|| format!("failed to read {}", args.session.display()))?;
    let session = Session::from_json_str(&text)?;

    let outcome = session.replay(settings)?;
    info!(
        frames = session.frames.len(),
        events = outcome.events.len(),
        objects = outcome.scene.object_count(),
        "replay complete"
    );

    let items = inventory_from_scene(&outcome.scene);
    for item in &items {
        println!("{:>4}  {}", item.quantity, item.item_name);
    }

    let name = outcome
        .saved_name
        .or(args.name)
        .unwrap_or_else(|| "Garden".to_string());

    if let Some(out) = &args.out {
        let submission =
            DesignSubmission::new(&name, items, None).context("invalid design name")?;
        let json = submission.data.to_json_pretty()?;
        std::fs::write(out, json).with_context(|| format!("failed to write {}", out.display()))?;
        info!(path = %out.display(), "design payload written");
    }

    match (args.api_url, args.token) {
        (Some(url), Some(token)) => {
            let config = BackendConfig::new(url, token);
            let outcome = submit_design(&mut DryRunUploader, &config, &name, &outcome.scene, None)
                .context("failed to prepare design upload")?;
            if let SaveOutcome::Failed { reason } = outcome {
                bail!("design upload failed: {reason}");
            }
        }
        (None, None) => {}
        _ => bail!("--api-url and --token must be given together"),
    }
    Ok(())
}

fn print_defaults() -> Result<()> {
    let json = InteractionSettings::default()
        .to_json_string()
        .context("failed to serialize settings")?;
    println!("{json}");
    Ok(())
}

fn load_settings(path: Option<&Path>) -> Result<InteractionSettings> {
    let Some(path) = path else {
        return Ok(InteractionSettings::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    InteractionSettings::from_json_str(&text)
        .with_context(|| format!("invalid settings in {}", path.display()))
}

/// Prints the request instead of sending it.
struct DryRunUploader;

impl DesignUploader for DryRunUploader {
    fn save_design(&mut self, request: UploadRequest) -> SaveOutcome {
        println!("POST {}", request.url);
        for (key, _) in &request.headers {
            println!("{key}: <redacted>");
        }
        for part in &request.parts {
            println!(
                "part {} ({}, {} bytes)",
                part.name,
                part.content_type,
                part.body.len()
            );
        }
        SaveOutcome::Saved {
            status: 0,
            body: String::new(),
        }
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
