//! One-shot and interactive front ends over [`Command`].

use std::io::{self, Write};

use clap::Parser;
use clap::error::ErrorKind;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;
use vaultclient_core::VaultClient;

use crate::command::{Cli, Step, print_help};

const PROMPT: &str = "vaultclient> ";

/// Runs command lines against one client.
#[derive(Debug, Clone)]
pub struct Shell {
    client: VaultClient,
}

impl Shell {
    pub fn new(client: VaultClient) -> Self {
        Self { client }
    }

    /// Parse and run one command given as separate words.
    pub async fn run_words<I, T>(
        &self,
        words: I,
        out: &mut impl Write,
        err: &mut impl Write,
    ) -> io::Result<Step>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let words: Vec<String> = words.into_iter().map(Into::into).collect();
        if words.is_empty() {
            return Ok(Step::Continue(0));
        }

        let argv = std::iter::once("vaultclient".to_owned()).chain(words.iter().cloned());
        let cli = match Cli::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(parse_error) => return report_parse_error(&words, &parse_error, out, err),
        };
        debug!(command = cli.command.name(), "running shell command");
        cli.command.execute(&self.client, out, err).await
    }

    /// Parse and run one line typed at the prompt.
    pub async fn run_line(
        &self,
        line: &str,
        out: &mut impl Write,
        err: &mut impl Write,
    ) -> io::Result<Step> {
        self.run_words(line.split_whitespace(), out, err).await
    }

    /// Read commands from stdin until `exit` or end of input.
    pub async fn interactive(&self) -> io::Result<u8> {
        let mut stdout = io::stdout();
        let mut stderr = io::stderr();
        writeln!(stdout, "Connected to : {}", self.client.config().host)?;

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            write!(stdout, "{PROMPT}")?;
            stdout.flush()?;
            let Some(line) = lines.next_line().await? else {
                break;
            };
            if self.run_line(&line, &mut stdout, &mut stderr).await? == Step::Exit {
                break;
            }
        }

        writeln!(stdout, "Have a great day")?;
        Ok(0)
    }
}

fn report_parse_error(
    words: &[String],
    parse_error: &clap::Error,
    out: &mut impl Write,
    err: &mut impl Write,
) -> io::Result<Step> {
    match parse_error.kind() {
        ErrorKind::InvalidSubcommand | ErrorKind::MissingSubcommand => {
            writeln!(err, "Command not found : {}", words.join(" "))?;
            print_help(err)?;
            Ok(Step::Continue(1))
        }
        _ if parse_error.use_stderr() => {
            write!(err, "{}", parse_error.render())?;
            Ok(Step::Continue(1))
        }
        _ => {
            write!(out, "{}", parse_error.render())?;
            Ok(Step::Continue(0))
        }
    }
}

#[cfg(test)]
mod tests {
    use vaultclient_core::ClientConfig;

    use super::*;

    fn shell() -> Shell {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let config = ClientConfig::builder().host("127.0.0.1").port(port).build();
        Shell::new(VaultClient::new(config).unwrap())
    }

    async fn run(line: &str) -> (Step, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let step = shell().run_line(line, &mut out, &mut err).await.unwrap();
        (
            step,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_should_report_unknown_command() {
        let (step, out, err) = run("rename-account --account-name acme").await;
        assert_eq!(step, Step::Continue(1));
        assert!(out.is_empty());
        assert!(err.starts_with("Command not found : rename-account --account-name acme\n"));
        assert!(err.contains("help: Available commands are:"));
    }

    #[tokio::test]
    async fn test_should_succeed_on_help_and_exit() {
        let (step, _, err) = run("help").await;
        assert_eq!(step, Step::Continue(0));
        assert!(err.contains("create-access-key"));

        let (step, out, err) = run("exit").await;
        assert_eq!(step, Step::Exit);
        assert_eq!(step.code(), 0);
        assert!(out.is_empty() && err.is_empty());
    }

    #[tokio::test]
    async fn test_should_fail_on_missing_argument() {
        let (step, out, err) = run("create-account --account-name acme").await;
        assert_eq!(step, Step::Continue(1));
        assert!(out.is_empty());
        assert!(err.contains("--account-email"), "{err}");
    }

    #[tokio::test]
    async fn test_should_ignore_blank_lines() {
        let (step, out, err) = run("   ").await;
        assert_eq!(step, Step::Continue(0));
        assert!(out.is_empty() && err.is_empty());
    }

    #[tokio::test]
    async fn test_should_print_error_line_when_server_is_unreachable() {
        let (step, out, err) = run("delete-access-key --access-key-id AKIAEXAMPLE").await;
        assert_eq!(step, Step::Continue(1));
        assert!(out.is_empty());
        assert!(err.starts_with("Error: delete-access-key, InternalError, "), "{err}");
    }

    #[tokio::test]
    async fn test_should_fail_when_option_value_is_missing() {
        let (step, _, err) = run("delete-account --account-name").await;
        assert_eq!(step, Step::Continue(1));
        assert!(!err.is_empty());
    }
}
