mod check;
mod predict;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use exoclass_ai::default_search_paths;
use exoclass_server::ServerConfig;
use tracing_subscriber::EnvFilter;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;

#[derive(Parser)]
#[command(
    name = "exoclass",
    author,
    version,
    about = "Exoplanet candidate classifier",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Clone)]
struct ModelArgs {
    /// Model bundle to load. Repeat or comma-separate to search several in
    /// order; replaces the default search list.
    #[arg(long = "model-path", env = "EXOCLASS_MODEL_PATH", value_delimiter = ',')]
    model_paths: Vec<PathBuf>,
}

impl ModelArgs {
    fn search_paths(&self) -> Vec<PathBuf> {
        if self.model_paths.is_empty() {
            default_search_paths()
        } else {
            self.model_paths.clone()
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API
    Serve {
        /// Socket address to bind
        #[arg(long, env = "EXOCLASS_LISTEN")]
        listen: Option<String>,
        /// Bind host; overrides the host part of --listen
        #[arg(long)]
        host: Option<String>,
        /// Bind port; overrides the port part of --listen
        #[arg(long)]
        port: Option<u16>,
        #[command(flatten)]
        model: ModelArgs,
    },
    /// Locate and load the model, then run a sample prediction
    CheckModel {
        #[command(flatten)]
        model: ModelArgs,
    },
    /// Classify candidates from a JSON file without starting the server
    Predict {
        /// A single candidate object or {"candidates": [...]}
        #[arg(long, short)]
        input: PathBuf,
        #[command(flatten)]
        model: ModelArgs,
    },
}

/// Resolve the bind address. `--host`/`--port` take precedence over the
/// matching half of `--listen`.
fn listen_addr(listen: Option<String>, host: Option<String>, port: Option<u16>) -> String {
    if host.is_none() && port.is_none() {
        return listen.unwrap_or_else(|| format!("{DEFAULT_HOST}:{DEFAULT_PORT}"));
    }

    let (listen_host, listen_port) = listen
        .as_deref()
        .and_then(|l| l.rsplit_once(':'))
        .map(|(h, p)| (Some(h.to_string()), p.parse::<u16>().ok()))
        .unwrap_or((None, None));

    let host = host
        .or(listen_host)
        .unwrap_or_else(|| DEFAULT_HOST.to_string());
    let port = port.or(listen_port).unwrap_or(DEFAULT_PORT);
    format!("{host}:{port}")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve {
            listen,
            host,
            port,
            model,
        } => {
            let config = ServerConfig {
                listen_addr: listen_addr(listen, host, port),
                model_paths: model.search_paths(),
            };
            tracing::info!("exoclass v{}", env!("CARGO_PKG_VERSION"));
            exoclass_server::serve(config)
                .await
                .context("HTTP server failed")?;
        }
        Command::CheckModel { model } => {
            check::run(&model.search_paths())?;
        }
        Command::Predict { input, model } => {
            let output = predict::run(&input, &model.search_paths())?;
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listen_defaults() {
        assert_eq!(listen_addr(None, None, None), "0.0.0.0:8000");
        assert_eq!(
            listen_addr(Some("127.0.0.1:9000".into()), None, None),
            "127.0.0.1:9000"
        );
    }

    #[test]
    fn host_and_port_override_listen() {
        assert_eq!(
            listen_addr(None, Some("127.0.0.1".into()), None),
            "127.0.0.1:8000"
        );
        assert_eq!(listen_addr(None, None, Some(9001)), "0.0.0.0:9001");
        assert_eq!(
            listen_addr(Some("10.0.0.1:9000".into()), None, Some(9100)),
            "10.0.0.1:9100"
        );
    }

    #[test]
    fn model_paths_are_comma_separated_and_repeatable() {
        let cli = Cli::try_parse_from([
            "exoclass",
            "check-model",
            "--model-path",
            "a.json,b.json",
            "--model-path",
            "c.json",
        ])
        .unwrap();
        let Command::CheckModel { model } = cli.command else {
            panic!("expected check-model");
        };
        assert_eq!(
            model.search_paths(),
            vec![
                PathBuf::from("a.json"),
                PathBuf::from("b.json"),
                PathBuf::from("c.json")
            ]
        );
    }

    #[test]
    fn no_model_path_uses_default_search_list() {
        let args = ModelArgs {
            model_paths: vec![],
        };
        assert_eq!(args.search_paths(), default_search_paths());
    }

    #[test]
    fn predict_requires_input() {
        assert!(Cli::try_parse_from(["exoclass", "predict"]).is_err());
    }
}
