use clap::{Parser, Subcommand, ValueEnum};
use hardmark::config::{self, HardmarkConfig};
use hardmark::harden::prefix;
use hardmark::processor::Processor;
use std::io::Read;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hardmark")]
#[command(about = "Render untrusted markdown with origin-aware link and image hardening")]
#[command(version)]
struct Cli {
    /// Config file (defaults to $HARDMARK_CONFIG or ~/.hardmark/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Commands,
}

/// Flags layered over the config file.
#[derive(clap::Args)]
struct Overrides {
    /// Origin used to resolve relative links and images
    #[arg(long, global = true)]
    default_origin: Option<String>,

    /// Allowed link prefix, or "*" (repeatable)
    #[arg(long = "allow-link", global = true)]
    allow_link: Vec<String>,

    /// Allowed image prefix, or "*" (repeatable)
    #[arg(long = "allow-image", global = true)]
    allow_image: Vec<String>,

    /// Drop raw HTML instead of showing it as text
    #[arg(long, global = true)]
    skip_html: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a markdown file (or stdin) to hardened output
    Render {
        /// Markdown file; reads stdin when omitted
        path: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Html)]
        format: Format,
    },

    /// Check whether a single URL would be allowed
    Check {
        /// Check against the image allow-list instead of the link allow-list
        #[arg(long)]
        image: bool,

        url: String,
    },

    /// Print the effective configuration
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Html,
    Json,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = effective_config(cli.config.as_deref(), cli.overrides)?;

    match cli.command {
        Commands::Render { path, format } => {
            let content = match path {
                Some(path) => std::fs::read_to_string(&path)
                    .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .map_err(|e| anyhow::anyhow!("failed to read stdin: {e}"))?;
                    buf
                }
            };

            let processor = Processor::from_config(&config)?;
            match format {
                Format::Html => println!("{}", processor.render(&content)),
                Format::Json => {
                    let tree = processor.process(&content);
                    println!("{}", serde_json::to_string_pretty(&tree)?);
                }
            }
            Ok(())
        }
        Commands::Check { image, url } => {
            let processor = Processor::from_config(&config)?;
            let outcome = if image {
                processor.harden().authorize_image(&url)
            } else {
                processor.harden().authorize_link(&url)
            };
            match outcome {
                Some(value) => println!("allowed: {value}"),
                None => println!("blocked"),
            }
            Ok(())
        }
        Commands::Config => {
            print!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

fn effective_config(
    path: Option<&std::path::Path>,
    overrides: Overrides,
) -> anyhow::Result<HardmarkConfig> {
    let mut config = config::load_from_path(path)?;

    if let Some(origin) = overrides.default_origin {
        config.harden.default_origin = origin;
    }
    if !overrides.allow_link.is_empty() {
        config.harden.allowed_link_prefixes = prefix::parse_all(&overrides.allow_link);
    }
    if !overrides.allow_image.is_empty() {
        config.harden.allowed_image_prefixes = prefix::parse_all(&overrides.allow_image);
    }
    if overrides.skip_html {
        config.markdown.post.skip_html = true;
    }

    config::validate(&config)?;
    Ok(config)
}
