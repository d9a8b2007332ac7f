//! odrl-explain CLI: explain ODRL usage policies in plain language.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use odrl_explain::config::ExplainConfig;
use odrl_explain::explain::Explainer;
use odrl_explain::graph::DocumentFormat;

#[derive(Parser)]
#[command(name = "odrl-explain", version, about = "Explain ODRL usage policies in plain language")]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Never fetch labels or vocabularies over the network.
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate every policy in a document into sentences (JSON).
    Translate {
        #[command(flatten)]
        input: Input,

        /// Target language, e.g. "fr" or "french". Defaults to the source language.
        #[arg(long)]
        language: Option<String>,
    },

    /// Print the typed policy model (JSON).
    Model {
        #[command(flatten)]
        input: Input,
    },

    /// List the policies found in a document.
    Policies {
        #[command(flatten)]
        input: Input,
    },
}

#[derive(Args)]
struct Input {
    /// Policy document.
    #[arg(long)]
    file: PathBuf,

    /// Document format; guessed from the file extension when omitted.
    #[arg(long)]
    format: Option<DocumentFormat>,

    /// Base IRI for relative references.
    #[arg(long)]
    base: Option<String>,
}

impl Input {
    fn read(&self) -> Result<(String, DocumentFormat)> {
        let content = std::fs::read_to_string(&self.file).into_diagnostic()?;
        let format = match self.format {
            Some(format) => format,
            None => guess_format(&self.file)?,
        };
        Ok((content, format))
    }
}

fn guess_format(path: &Path) -> Result<DocumentFormat> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(DocumentFormat::from_extension)
        .ok_or_else(|| {
            miette::miette!(
                help = "pass --format turtle|ntriples|rdfxml|jsonld",
                "cannot tell the format of {}",
                path.display()
            )
        })
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value).into_diagnostic()?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ExplainConfig::load(path)?,
        None => ExplainConfig::default(),
    };
    if cli.offline {
        config.fetch.enabled = false;
    }
    let explainer = Explainer::new(config)?;

    match cli.command {
        Commands::Translate { input, language } => {
            let (content, format) = input.read()?;
            let translations = explainer
                .translate(&content, format, input.base.as_deref(), language.as_deref())
                .await?;
            print_json(&translations)?;
        }

        Commands::Model { input } => {
            let (content, format) = input.read()?;
            let graph = explainer
                .load_graph(&content, format, input.base.as_deref())
                .await?;
            print_json(&explainer.models(&graph)?)?;
        }

        Commands::Policies { input } => {
            let (content, format) = input.read()?;
            let graph = explainer
                .load_graph(&content, format, input.base.as_deref())
                .await?;
            let policies = explainer.policies(&graph);
            if policies.is_empty() {
                eprintln!("No policies found in {}", input.file.display());
            }
            for found in policies {
                println!("{}\t{}", found.node, found.kind);
            }
        }
    }

    Ok(())
}
