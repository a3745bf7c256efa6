//! Shell commands and their execution against a [`VaultClient`].

use std::io::{self, Write};

use clap::{Args, Parser, Subcommand};
use vaultclient_core::{VaultClient, VaultClientError, VaultResponse, VaultResult};
use vaultclient_model::input::{
    CreateAccessKeyInput, CreateAccountInput, CreateUserInput, DeleteAccessKeyInput,
    DeleteAccountInput, DeleteUserInput, GenerateAccountPasswordInput, RequestOptions,
};

/// One shell line.
#[derive(Debug, Parser)]
#[command(
    name = "vaultclient",
    version,
    about = "Administer accounts, users and access keys on a Vault server",
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create an account and set its password
    CreateAccount(CreateAccountArgs),
    /// Delete an account
    DeleteAccount(DeleteAccountArgs),
    /// Create a user in an account
    CreateUser(CreateUserArgs),
    /// Delete a user from an account
    DeleteUser(DeleteUserArgs),
    /// Create an access key for an account or one of its users
    CreateAccessKey(CreateAccessKeyArgs),
    /// Delete an access key
    DeleteAccessKey(DeleteAccessKeyArgs),
    /// List available commands
    Help,
    /// Leave the shell
    Exit,
}

#[derive(Debug, Args)]
pub struct CreateAccountArgs {
    #[arg(long)]
    pub account_name: String,
    #[arg(long)]
    pub account_email: String,
    #[arg(long)]
    pub account_password: String,
}

#[derive(Debug, Args)]
pub struct DeleteAccountArgs {
    #[arg(long)]
    pub account_name: String,
}

#[derive(Debug, Args)]
pub struct CreateUserArgs {
    #[arg(long)]
    pub account_name: String,
    #[arg(long)]
    pub user_name: String,
    #[arg(long)]
    pub user_email: String,
    #[arg(long)]
    pub user_password: String,
}

#[derive(Debug, Args)]
pub struct DeleteUserArgs {
    #[arg(long)]
    pub account_name: String,
    #[arg(long)]
    pub user_name: String,
}

#[derive(Debug, Args)]
pub struct CreateAccessKeyArgs {
    #[arg(long)]
    pub account_name: String,
    /// Omit, or pass `0`, for an account-level key
    #[arg(long)]
    pub user_name: Option<String>,
}

#[derive(Debug, Args)]
pub struct DeleteAccessKeyArgs {
    #[arg(long)]
    pub access_key_id: String,
}

/// What the shell does after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Keep going; the value is the exit code of the command.
    Continue(u8),
    /// Leave the shell.
    Exit,
}

impl Step {
    /// Process exit code for this step.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Continue(code) => code,
            Self::Exit => 0,
        }
    }
}

impl Command {
    /// Name the command is invoked with.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateAccount(_) => "create-account",
            Self::DeleteAccount(_) => "delete-account",
            Self::CreateUser(_) => "create-user",
            Self::DeleteUser(_) => "delete-user",
            Self::CreateAccessKey(_) => "create-access-key",
            Self::DeleteAccessKey(_) => "delete-access-key",
            Self::Help => "help",
            Self::Exit => "exit",
        }
    }

    /// Run the command, writing results to `out` and failures to `err`.
    pub async fn execute(
        self,
        client: &VaultClient,
        out: &mut impl Write,
        err: &mut impl Write,
    ) -> io::Result<Step> {
        let name = self.name();
        let options = RequestOptions::default();
        let result = match self {
            Self::Help => {
                print_help(err)?;
                return Ok(Step::Continue(0));
            }
            Self::Exit => return Ok(Step::Exit),
            Self::CreateAccount(args) => create_account(client, args, &options).await,
            Self::DeleteAccount(args) => {
                client
                    .delete_account(
                        &DeleteAccountInput {
                            account_name: args.account_name,
                        },
                        &options,
                    )
                    .await
            }
            Self::CreateUser(args) => {
                client
                    .create_user(
                        &CreateUserInput {
                            account_name: args.account_name,
                            name: args.user_name,
                            email_address: args.user_email,
                            password: Some(args.user_password),
                        },
                        &options,
                    )
                    .await
            }
            Self::DeleteUser(args) => {
                client
                    .delete_user(
                        &DeleteUserInput {
                            account_name: args.account_name,
                            user_name: args.user_name,
                        },
                        &options,
                    )
                    .await
            }
            Self::CreateAccessKey(args) => {
                client
                    .create_access_key(
                        &CreateAccessKeyInput {
                            account_name: args.account_name,
                            user_name: args.user_name.filter(|name| name != "0"),
                        },
                        &options,
                    )
                    .await
            }
            Self::DeleteAccessKey(args) => {
                client
                    .delete_access_key(
                        &DeleteAccessKeyInput {
                            access_key_id: args.access_key_id,
                        },
                        &options,
                    )
                    .await
            }
        };

        match result {
            Ok(response) => {
                print_response(out, name, &response)?;
                Ok(Step::Continue(0))
            }
            Err(error) => {
                print_error(err, name, &error)?;
                Ok(Step::Continue(1))
            }
        }
    }
}

async fn create_account(
    client: &VaultClient,
    args: CreateAccountArgs,
    options: &RequestOptions,
) -> VaultResult<VaultResponse> {
    let created = client
        .create_account(
            &CreateAccountInput {
                name: args.account_name.clone(),
                email_address: args.account_email,
                ..Default::default()
            },
            options,
        )
        .await?;
    client
        .generate_account_password(
            &GenerateAccountPasswordInput {
                name: args.account_name,
                password: args.account_password,
            },
            options,
        )
        .await?;
    Ok(created)
}

/// Write the list of commands.
pub fn print_help(err: &mut impl Write) -> io::Result<()> {
    use clap::CommandFactory;

    writeln!(err, "help: Available commands are:")?;
    for sub in Cli::command().get_subcommands() {
        writeln!(err, "{}", sub.get_name())?;
    }
    Ok(())
}

fn print_response(out: &mut impl Write, name: &str, response: &VaultResponse) -> io::Result<()> {
    let body = match &response.body {
        serde_json::Value::Null => String::new(),
        serde_json::Value::Object(map) if map.is_empty() => String::new(),
        body => body.to_string(),
    };
    writeln!(
        out,
        "Info: {name}, {}, {}, {body}",
        response.status.as_u16(),
        response.status_message
    )
}

fn print_error(err: &mut impl Write, name: &str, error: &VaultClientError) -> io::Result<()> {
    let (code, message) = match error {
        VaultClientError::Domain(domain) => (domain.code.as_str().to_owned(), domain.message.clone()),
        VaultClientError::InvalidArgument(message) => ("InvalidArgument".to_owned(), message.clone()),
        VaultClientError::Config(message) => ("InvalidConfiguration".to_owned(), message.clone()),
        VaultClientError::Decode { status, message, .. } => (status.as_u16().to_string(), message.clone()),
    };
    writeln!(err, "Error: {name}, {code}, {message}")
}
