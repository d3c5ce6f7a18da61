//! Themblr command-line front end
//!
//! Validates, inspects, composes and generates Tumblr themes from the starter
//! template. Generation replays recorded collaborator payloads from disk.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use themblr_core::ThemblrConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "themblr")]
#[command(version, about = "Generate and validate Tumblr themes from a locked starter template")]
struct Args {
    /// Starter template to use instead of STARTER_THEME_PATH and the default locations
    #[arg(long, global = true)]
    template: Option<PathBuf>,

    /// Log pipeline stages at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run every contract check against a theme file
    Validate {
        /// Theme HTML to check
        file: PathBuf,
    },

    /// Print the starter template's contract metadata
    Metadata,

    /// Apply an override payload to the starter template
    Compose {
        /// JSON override payload (editableZones, metaDefaults)
        #[arg(long)]
        overrides: PathBuf,

        /// Write the composed theme here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Run the full generation pipeline with recorded collaborator payloads
    Generate {
        /// JSON generate request
        #[arg(long)]
        request: PathBuf,

        /// Payload served for the first collaborator call
        #[arg(long)]
        payload: PathBuf,

        /// Payload served if the pipeline asks for a retry
        #[arg(long)]
        retry_payload: Option<PathBuf>,

        /// Collaborator time budget in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Directory for the generated theme file; the JSON response goes to stdout
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // stdout carries command output, so logs go to stderr
    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = ThemblrConfig::from_env();
    if let Some(template) = args.template {
        config.starter_theme_path = Some(template);
    }

    match args.command {
        Command::Validate { file } => {
            let result = commands::validate(&config, &file)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
            if !result.passed {
                std::process::exit(1);
            }
        }
        Command::Metadata => {
            let metadata = commands::metadata(&config)?;
            println!("{}", serde_json::to_string_pretty(&metadata)?);
        }
        Command::Compose { overrides, out } => {
            let html = commands::compose(&config, &overrides)?;
            match out {
                Some(path) => {
                    std::fs::write(&path, html)?;
                    tracing::info!("Wrote {}", path.display());
                }
                None => println!("{html}"),
            }
        }
        Command::Generate {
            request,
            payload,
            retry_payload,
            timeout_ms,
            out_dir,
        } => {
            if let Some(timeout_ms) = timeout_ms.filter(|ms| *ms > 0) {
                config.generation_timeout_ms = timeout_ms;
            }
            let response =
                commands::generate(&config, &request, &payload, retry_payload.as_deref()).await?;

            if let Some(dir) = out_dir {
                let path = dir.join(&response.file_name);
                std::fs::write(&path, &response.theme_html)?;
                tracing::info!("Wrote {}", path.display());
            }
            println!("{}", serde_json::to_string_pretty(&response)?);
            if !response.validation.passed {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
