//! # Context Sources CLI (`ctxs`)
//!
//! Lists, inspects and invokes the data-source operations, or serves them
//! over HTTP.
//!
//! ## Usage
//!
//! ```bash
//! ctxs --config ./config/ctxs.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `ctxs sources [--json]` | Show configured sources, whether their files exist and their modification time |
//! | `ctxs list` | List operations with descriptions and parameters |
//! | `ctxs call <operation>` | Invoke an operation and print its result |
//! | `ctxs serve` | Start the HTTP operation server |
//! | `ctxs completions <shell>` | Print shell completions |
//!
//! Operation results go to stdout; logs go to stderr (filter with
//! `RUST_LOG`, default `info`).

use anyhow::{bail, Context};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use context_sources::config;
use context_sources::server;
use context_sources::sources;
use context_sources::traits::OperationRegistry;

/// Context Sources CLI: local text, PDF and SQLite data exposed as callable
/// operations.
#[derive(Parser)]
#[command(
    name = "ctxs",
    about = "Context Sources: local text, PDF and SQLite connectors as callable operations",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/ctxs.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List configured sources, whether their backing files exist and
    /// when they were last modified.
    Sources {
        /// Print the listing as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List registered operations with descriptions and parameter schemas.
    List {
        /// Print the listing as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Invoke an operation and print its result to stdout.
    ///
    /// The operation may be named as `Plugin.Operation` or by its bare
    /// name when that is unambiguous.
    Call {
        /// Operation name, e.g. `Sqlite.ReadUserLedgerRecords`.
        operation: String,

        /// Parameters as `key=value` pairs (string values).
        #[arg(long = "param", value_parser = parse_key_val)]
        params: Vec<(String, String)>,

        /// Parameters as a JSON object; merged under `--param` values.
        #[arg(long)]
        params_json: Option<String>,
    },

    /// Start the HTTP operation server on `[server].bind`.
    Serve,

    /// Print shell completions.
    Completions {
        shell: Shell,
    },
}

/// Parse a `key=value` pair for `--param` arguments.
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let pos = s
        .find('=')
        .ok_or_else(|| format!("invalid KEY=VALUE: no '=' found in '{}'", s))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

fn build_params(
    params: Vec<(String, String)>,
    params_json: Option<String>,
) -> anyhow::Result<serde_json::Value> {
    let mut map = match params_json {
        Some(raw) => {
            let value: serde_json::Value =
                serde_json::from_str(&raw).context("--params-json is not valid JSON")?;
            match value {
                serde_json::Value::Object(map) => map,
                _ => bail!("--params-json must be a JSON object"),
            }
        }
        None => serde_json::Map::new(),
    };
    for (k, v) in params {
        map.insert(k, serde_json::Value::String(v));
    }
    Ok(serde_json::Value::Object(map))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Commands::Completions { shell } = &cli.command {
        clap_complete::generate(*shell, &mut Cli::command(), "ctxs", &mut std::io::stdout());
        return Ok(());
    }

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Sources { json } => {
            sources::list_sources(&cfg, json)?;
        }
        Commands::List { json } => {
            let registry = OperationRegistry::from_config(&cfg)?;
            let ops = registry.list();
            if json {
                println!("{}", serde_json::to_string_pretty(&ops)?);
            } else {
                for op in ops {
                    println!("{}", op.name);
                    println!("    {}", op.description);
                    if let Some(props) = op.parameters["properties"].as_object() {
                        for (name, prop) in props {
                            println!(
                                "    --param {}=<{}>  {}",
                                name,
                                prop["type"].as_str().unwrap_or("any"),
                                prop["description"].as_str().unwrap_or("")
                            );
                        }
                    }
                }
            }
        }
        Commands::Call {
            operation,
            params,
            params_json,
        } => {
            let registry = OperationRegistry::from_config(&cfg)?;
            let params = build_params(params, params_json)?;
            let result = registry.invoke(&operation, params).await?;
            println!("{}", result);
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::Completions { .. } => {
            // Handled above (before config loading)
            unreachable!()
        }
    }

    Ok(())
}
