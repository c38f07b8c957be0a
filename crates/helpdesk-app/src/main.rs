use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use helpdesk_api::{ApiError, ApiGateway, GatewayConfig};
use helpdesk_session::SessionStore;

use helpdesk_app::commands::{self, Command};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = parse_cli(std::env::args().skip(1))?;
    let defaults = GatewayConfig::from_env()?;
    let config = GatewayConfig::from_settings(
        cli.api_url.unwrap_or(defaults.api_url),
        cli.token_path
            .map(PathBuf::from)
            .unwrap_or(defaults.token_path),
    )?;

    let gateway = Arc::new(ApiGateway::new(config)?);
    let session = SessionStore::new(gateway);
    let output = commands::execute(&session, cli.command).await?;
    println!("{output}");
    Ok(())
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliArgs {
    api_url: Option<String>,
    token_path: Option<String>,
    command: Command,
}

fn parse_cli(mut args: impl Iterator<Item = String>) -> Result<CliArgs, ApiError> {
    let mut api_url = None;
    let mut token_path = None;
    let mut subcommand = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--api-url" => api_url = Some(read_cli_value(&arg, args.next())?),
            "--token-path" => token_path = Some(read_cli_value(&arg, args.next())?),
            "--help" | "-h" => {
                print_cli_help();
                std::process::exit(0);
            }
            value if value.starts_with("--") => {
                return Err(ApiError::Configuration(format!(
                    "Unknown flag '{value}'. Run with --help for valid flags."
                )));
            }
            name => {
                subcommand = Some(name.to_owned());
                break;
            }
        }
    }

    let name = subcommand.ok_or_else(|| {
        ApiError::Configuration(
            "Missing subcommand. Run with --help for available commands.".to_owned(),
        )
    })?;
    let command = parse_command(&name, &mut args)?;
    Ok(CliArgs {
        api_url,
        token_path,
        command,
    })
}

fn parse_command(
    name: &str,
    args: &mut impl Iterator<Item = String>,
) -> Result<Command, ApiError> {
    match name {
        "signup" => {
            let mut email = None;
            let mut password = None;
            let mut display_name = None;
            let mut sector = None;
            let mut technician = false;
            while let Some(arg) = args.next() {
                match arg.as_str() {
                    "--email" => email = Some(read_cli_value(&arg, args.next())?),
                    "--password" => password = Some(read_cli_value(&arg, args.next())?),
                    "--name" => display_name = Some(read_cli_value(&arg, args.next())?),
                    "--sector" => sector = Some(read_cli_value(&arg, args.next())?),
                    "--technician" => technician = true,
                    other => return Err(unexpected_argument(name, other)),
                }
            }
            Ok(Command::SignUp {
                email: required_flag(email, "--email", name)?,
                password: required_flag(password, "--password", name)?,
                name: required_flag(display_name, "--name", name)?,
                technician,
                sector,
            })
        }
        "login" => {
            let mut email = None;
            let mut password = None;
            let mut technician = false;
            while let Some(arg) = args.next() {
                match arg.as_str() {
                    "--email" => email = Some(read_cli_value(&arg, args.next())?),
                    "--password" => password = Some(read_cli_value(&arg, args.next())?),
                    "--technician" => technician = true,
                    other => return Err(unexpected_argument(name, other)),
                }
            }
            Ok(Command::Login {
                email: required_flag(email, "--email", name)?,
                password: required_flag(password, "--password", name)?,
                technician,
            })
        }
        "logout" => {
            reject_extra_arguments(name, args)?;
            Ok(Command::Logout)
        }
        "whoami" => {
            reject_extra_arguments(name, args)?;
            Ok(Command::WhoAmI)
        }
        "account" => {
            let mut display_name = None;
            let mut sector = None;
            while let Some(arg) = args.next() {
                match arg.as_str() {
                    "--name" => display_name = Some(read_cli_value(&arg, args.next())?),
                    "--sector" => sector = Some(read_cli_value(&arg, args.next())?),
                    other => return Err(unexpected_argument(name, other)),
                }
            }
            Ok(Command::Account {
                name: display_name,
                sector,
            })
        }
        "list" => {
            let mut include_finished = false;
            while let Some(arg) = args.next() {
                match arg.as_str() {
                    "--all" => include_finished = true,
                    other => return Err(unexpected_argument(name, other)),
                }
            }
            Ok(Command::List { include_finished })
        }
        "create" => {
            let mut description = None;
            let mut title = None;
            let mut category = None;
            let mut priority = None;
            let mut location = None;
            while let Some(arg) = args.next() {
                match arg.as_str() {
                    "--description" => description = Some(read_cli_value(&arg, args.next())?),
                    "--title" => title = Some(read_cli_value(&arg, args.next())?),
                    "--category" => category = Some(read_cli_value(&arg, args.next())?),
                    "--priority" => {
                        let raw = read_cli_value(&arg, args.next())?;
                        priority = Some(commands::parse_priority(&raw)?);
                    }
                    "--location" => location = Some(read_cli_value(&arg, args.next())?),
                    other => return Err(unexpected_argument(name, other)),
                }
            }
            Ok(Command::Create {
                description: required_flag(description, "--description", name)?,
                title,
                category,
                priority,
                location,
            })
        }
        "start" => Ok(Command::Start {
            ticket_id: ticket_id_argument(name, args)?,
        }),
        "finish" => Ok(Command::Finish {
            ticket_id: ticket_id_argument(name, args)?,
        }),
        other => Err(ApiError::Configuration(format!(
            "Unknown command '{other}'. Run with --help for available commands."
        ))),
    }
}

fn ticket_id_argument(
    name: &str,
    args: &mut impl Iterator<Item = String>,
) -> Result<String, ApiError> {
    let ticket_id = args.next().ok_or_else(|| {
        ApiError::Configuration(format!("Usage: helpdesk-app {name} <ticket-id>."))
    })?;
    reject_extra_arguments(name, args)?;
    Ok(ticket_id)
}

fn reject_extra_arguments(
    name: &str,
    args: &mut impl Iterator<Item = String>,
) -> Result<(), ApiError> {
    if let Some(extra) = args.next() {
        return Err(unexpected_argument(name, &extra));
    }
    Ok(())
}

fn unexpected_argument(command: &str, argument: &str) -> ApiError {
    ApiError::Configuration(format!(
        "Unexpected argument '{argument}' for '{command}'. Run with --help for valid flags."
    ))
}

fn required_flag(value: Option<String>, flag: &str, command: &str) -> Result<String, ApiError> {
    value.ok_or_else(|| {
        ApiError::Configuration(format!("Missing required flag {flag} for '{command}'."))
    })
}

fn read_cli_value(flag: &str, value: Option<String>) -> Result<String, ApiError> {
    let value = value
        .ok_or_else(|| {
            ApiError::Configuration(format!("Missing value after {flag}."))
        })?
        .trim()
        .to_owned();
    if value.is_empty() {
        return Err(ApiError::Configuration(format!(
            "Flag '{flag}' requires a non-empty value."
        )));
    }
    Ok(value)
}

fn print_cli_help() {
    println!("Usage: helpdesk-app [--api-url <url>] [--token-path <path>] <command> [flags]");
    println!();
    println!("Commands:");
    println!("  signup --email <email> --password <pw> --name <name> [--sector <sector>] [--technician]");
    println!("                 Create an account and sign in");
    println!("  login --email <email> --password <pw> [--technician]");
    println!("                 Sign in and persist the session token");
    println!("  logout         Discard the persisted session token");
    println!("  whoami         Show the current session identity");
    println!("  account [--name <name>] [--sector <sector>]");
    println!("                 Show or update the profile");
    println!("  list [--all]   List open tickets; --all also shows finished ones, grouped");
    println!("  create --description <text> [--title <t>] [--category <c>] [--priority <p>] [--location <l>]");
    println!("                 Open a new ticket");
    println!("  start <id>     Move a ticket to Em Andamento (technicians)");
    println!("  finish <id>    Resolve a ticket (technicians)");
    println!();
    println!("  --api-url <url>      Helpdesk API base URL (default http://localhost:8080)");
    println!("  --token-path <path>  Session token file (default ./auth_token)");
    println!("  --help               Show this help message");
}
