//! vaultclient - administer a Vault identity server from the command line.
//!
//! With arguments, runs one command and exits with its status. Without,
//! starts an interactive shell.
//!
//! # Usage
//!
//! ```text
//! VAULT_HOST=vault.local vaultclient create-access-key --account-name acme
//! vaultclient
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `VAULT_HOST` | `localhost` | Server host |
//! | `VAULT_PORT` | `8500` | Server port |
//! | `VAULT_USE_HTTPS` | `false` | Talk TLS to the server |
//! | `VAULT_ACCESS_KEY` / `AWS_ACCESS_KEY_ID` | *(unset)* | Signing access key |
//! | `VAULT_SECRET_KEY` / `AWS_SECRET_ACCESS_KEY` | *(unset)* | Signing secret key |
//! | `VAULT_SESSION_TOKEN` | *(unset)* | Session token sent with SigV4 |
//! | `VAULT_BEARER_TOKEN` | *(unset)* | Token for the `bearer` scheme |
//! | `VAULT_AUTH_SCHEME` | `sigv4` | `sigv4`, `sigv4-presigned`, `sigv2` or `bearer` |
//! | `VAULT_PATH_PREFIX` | *(unset)* | Prefix prepended to every route |
//! | `VAULT_REGION` | `us-east-1` | Signing region |
//! | `VAULT_ADMIN_AUTH` | `false` | Sign account and user administration routes |
//! | `VAULT_REQUEST_TIMEOUT_MS` | *(unset)* | Per-request timeout |
//! | `VAULT_IGNORE_CA` | `false` | Accept any server certificate |
//! | `VAULT_TLS_KEY_FILE` | *(unset)* | PEM client key |
//! | `VAULT_TLS_CERT_FILE` | *(unset)* | PEM client certificate |
//! | `VAULT_TLS_CA_FILE` | *(unset)* | PEM CA bundle |
//! | `VAULT_LOG_LEVEL` | `warn` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `VAULT_LOG_LEVEL`) |

mod command;
mod shell;

use std::io;
use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;
use vaultclient_core::{ClientConfig, VaultClient};

use crate::shell::Shell;

/// Initialize the tracing subscriber. Logs go to stderr so command output
/// stays parseable.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    Ok(())
}

/// Build the client configuration from `lookup`, reading PEM material from
/// the files it names.
fn load_config(lookup: impl Fn(&str) -> Option<String>) -> Result<ClientConfig> {
    let mut config =
        ClientConfig::from_lookup(&lookup).context("invalid client configuration")?;

    let read_pem = |var: &str| -> Result<Option<String>> {
        lookup(var)
            .filter(|path| !path.is_empty())
            .map(|path| {
                std::fs::read_to_string(&path)
                    .with_context(|| format!("cannot read {var} file {path}"))
            })
            .transpose()
    };
    if let Some(key) = read_pem("VAULT_TLS_KEY_FILE")? {
        config.tls.key_pem = Some(key);
    }
    if let Some(cert) = read_pem("VAULT_TLS_CERT_FILE")? {
        config.tls.cert_pem = Some(cert);
    }
    if let Some(ca) = read_pem("VAULT_TLS_CA_FILE")? {
        config.tls.ca_pem = Some(ca);
    }

    config.validate().context("invalid TLS configuration")?;
    Ok(config)
}

async fn run() -> Result<u8> {
    let log_level = std::env::var("VAULT_LOG_LEVEL").unwrap_or_else(|_| "warn".to_owned());
    init_tracing(&log_level)?;

    let config = load_config(|var| std::env::var(var).ok())?;
    tracing::debug!(host = %config.host, port = config.port, "vault client configured");
    let client = VaultClient::new(config).context("cannot create vault client")?;
    let shell = Shell::new(client);

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        return shell.interactive().await.context("shell i/o failed");
    }

    let step = shell
        .run_words(args, &mut io::stdout(), &mut io::stderr())
        .await
        .context("cannot write command output")?;
    Ok(step.code())
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
