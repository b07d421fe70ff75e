//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use llmsdoc_core::DocRetrievalService;
use llmsdoc_mcp::DocsServer;
use llmsdoc_shared::{ConfigInputs, ServerConfig, load_config};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// llmsdoc: serve llms.txt documentation sources to AI tools.
#[derive(Parser)]
#[command(
    name = "llmsdoc",
    version,
    about = "Serve llms.txt documentation sources over MCP with domain and file allow-listing.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// YAML file with a list of doc sources.
    #[arg(long, global = true)]
    pub yaml: Option<PathBuf>,

    /// JSON file with a list of doc sources.
    #[arg(long, global = true)]
    pub json: Option<PathBuf>,

    /// TOML file with settings and `[[sources]]` tables.
    #[arg(long, global = true)]
    pub toml: Option<PathBuf>,

    /// Doc source as `url_or_path` or `name:url_or_path` (repeatable).
    #[arg(long, action = clap::ArgAction::Append, global = true)]
    pub urls: Vec<String>,

    /// Follow HTTP redirects and HTML meta-refresh tags.
    #[arg(long, env = "LLMSDOC_FOLLOW_REDIRECTS", global = true)]
    pub follow_redirects: bool,

    /// Fetch timeout in seconds [default: 10].
    #[arg(long, env = "LLMSDOC_TIMEOUT", global = true)]
    pub timeout: Option<f64>,

    /// Extra allowed domains (comma-separated), or `*` to allow all.
    #[arg(
        long,
        env = "LLMSDOC_ALLOWED_DOMAINS",
        value_delimiter = ',',
        action = clap::ArgAction::Append,
        global = true
    )]
    pub allowed_domains: Vec<String>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Run the MCP server on stdio.
    Serve,

    /// Print the configured documentation sources.
    List,

    /// Fetch one URL or local file through the allow-list and converter.
    Fetch {
        /// URL, local path, or file:// URL.
        url: String,
    },

    /// Print the resolved configuration as TOML.
    Config,
}

impl Cli {
    fn config_inputs(&self) -> ConfigInputs {
        ConfigInputs {
            yaml: self.yaml.clone(),
            json: self.json.clone(),
            toml: self.toml.clone(),
            urls: self.urls.clone(),
            follow_redirects: self.follow_redirects,
            timeout_secs: self.timeout,
            allowed_domains: self.allowed_domains.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
///
/// Logs go to stderr; stdout carries the MCP protocol when serving.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "llmsdoc=info",
        1 => "llmsdoc=debug",
        _ => "llmsdoc=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli.config_inputs())?;

    match cli.command {
        Command::Serve => cmd_serve(&config).await,
        Command::List => cmd_list(&config),
        Command::Fetch { url } => cmd_fetch(&config, &url).await,
        Command::Config => cmd_config(&config),
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_serve(config: &ServerConfig) -> Result<()> {
    let service = DocRetrievalService::new(config)?;
    DocsServer::new(service).serve_stdio().await?;
    Ok(())
}

fn cmd_list(config: &ServerConfig) -> Result<()> {
    let service = DocRetrievalService::new(config)?;
    print!("{}", service.list_sources().text);
    Ok(())
}

async fn cmd_fetch(config: &ServerConfig, url: &str) -> Result<()> {
    let service = DocRetrievalService::new(config)?;
    let outcome = service.fetch_docs(Some(url)).await?;

    if outcome.is_error {
        return Err(eyre!("{}", outcome.text));
    }

    info!(bytes = outcome.text.len(), "fetched");
    print!("{}", outcome.text);
    Ok(())
}

fn cmd_config(config: &ServerConfig) -> Result<()> {
    let toml_str = toml::to_string_pretty(config)?;
    println!("{toml_str}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sources_and_settings() {
        let cli = Cli::try_parse_from([
            "llmsdoc",
            "--urls",
            "LangChain:https://langchain.dev/llms.txt",
            "--urls",
            "./docs/llms.txt",
            "--allowed-domains",
            "https://docs.rs/,https://crates.io/",
            "--timeout",
            "2.5",
            "--follow-redirects",
            "list",
        ])
        .unwrap();

        let inputs = cli.config_inputs();
        assert_eq!(inputs.urls.len(), 2);
        assert_eq!(
            inputs.allowed_domains,
            ["https://docs.rs/", "https://crates.io/"]
        );
        assert_eq!(inputs.timeout_secs, Some(2.5));
        assert!(inputs.follow_redirects);
        assert!(matches!(cli.command, Command::List));
    }

    #[test]
    fn source_flags_do_not_consume_the_subcommand() {
        let cli = Cli::try_parse_from(["llmsdoc", "--urls", "https://a.dev/llms.txt", "serve"])
            .unwrap();
        assert_eq!(cli.urls, ["https://a.dev/llms.txt"]);
        assert!(matches!(cli.command, Command::Serve));

        let cli = Cli::try_parse_from([
            "llmsdoc",
            "--urls",
            "https://a.dev/llms.txt",
            "--allowed-domains",
            "*",
            "list",
        ])
        .unwrap();
        assert_eq!(cli.allowed_domains, ["*"]);
        assert!(matches!(cli.command, Command::List));
    }

    #[test]
    fn fetch_takes_a_positional_url() {
        let cli = Cli::try_parse_from([
            "llmsdoc",
            "fetch",
            "https://langchain.dev/llms.txt",
            "--urls",
            "https://langchain.dev/llms.txt",
        ])
        .unwrap();

        match cli.command {
            Command::Fetch { url } => assert_eq!(url, "https://langchain.dev/llms.txt"),
            _ => panic!("expected fetch"),
        }
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["llmsdoc", "--urls", "https://a.com/llms.txt"]).is_err());
    }

    #[test]
    fn resolved_config_renders_as_toml() {
        let cli = Cli::try_parse_from([
            "llmsdoc",
            "--urls",
            "Rust:https://rust.dev/llms.txt",
            "--timeout",
            "3",
            "config",
        ])
        .unwrap();
        let config = load_config(&cli.config_inputs()).unwrap();

        let rendered = toml::to_string_pretty(&config).unwrap();
        assert!(rendered.contains("timeout_secs = 3.0"));
        assert!(rendered.contains("[[sources]]"));
        assert!(rendered.contains("llms_txt = \"https://rust.dev/llms.txt\""));
    }
}
