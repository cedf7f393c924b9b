//! Lunchmore - a command line client for lunchmore organizations.
//!
//! Builds the one session for this process, recovers any previous session
//! with a startup refresh, then runs a single command against it.

use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use lunchmore_core::config::API_URL_ENV;
use lunchmore_core::{AuthError, Config, JoinForm, SessionHandle, SessionProvider, SignupForm};

#[derive(Parser)]
#[command(name = "lunchmore", version, about = "Sign in and manage your lunchmore organization")]
struct Cli {
    /// API server base URL
    #[arg(long, global = true, env = API_URL_ENV)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show who is signed in
    Status,
    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: Option<String>,
    },
    /// Create an organization and sign in as its first member
    Signup {
        #[arg(long = "org")]
        org_name: String,
        #[arg(long = "first")]
        first_name: String,
        #[arg(long = "last")]
        last_name: String,
        #[arg(long)]
        email: Option<String>,
    },
    /// Join an organization with an invite code
    Join {
        code: String,
        #[arg(long = "first")]
        first_name: String,
        #[arg(long = "last")]
        last_name: String,
    },
    /// Sign out
    Logout,
    /// List the members of your organization
    Members,
    /// Invite someone to your organization by email
    Invite { email: String },
}

/// Initialize the tracing subscriber for logging.
///
/// Logs go to stderr and, when the cache directory is usable, to a daily file.
fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match log_dir.map(file_appender) {
        Some(Ok(appender)) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_writer(writer).with_ansi(false)), Some(guard))
        }
        Some(Err(e)) => {
            eprintln!("Warning: file logging disabled: {e:#}");
            (None, None)
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

fn file_appender(dir: &Path) -> Result<RollingFileAppender> {
    std::fs::create_dir_all(dir)?;
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("lunchmore")
        .filename_suffix("log")
        .build(dir)
        .context("Failed to create log file")
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load config, using defaults: {e:#}");
            Config::default()
        }
    };
    if let Some(url) = cli.api_url {
        config = config.with_api_url(url);
    }

    let _log_guard = init_tracing(config.cache_dir().ok().as_deref());
    info!(api_url = %config.api_url, "Lunchmore starting");

    let session = SessionProvider::global(&config)?.start().await;

    match run(cli.command, &session, &mut config).await? {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("Error: {}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Run one command. The outer error is a local failure (terminal, config
/// file); the inner one is the session operation's own result.
async fn run(
    command: Command,
    session: &SessionHandle,
    config: &mut Config,
) -> Result<Result<(), AuthError>> {
    let outcome = match command {
        Command::Status => {
            print_status(session);
            Ok(())
        }
        Command::Login { email } => {
            let email = match email {
                Some(e) => e,
                None => prompt_email(config.last_email.as_deref())?,
            };
            let password = prompt_password()?;
            let result = session.login(&email, &password).await;
            if result.is_ok() {
                remember_email(config, &email);
                print_status(session);
            }
            result
        }
        Command::Signup {
            org_name,
            first_name,
            last_name,
            email,
        } => {
            let email = match email {
                Some(e) => e,
                None => prompt_email(None)?,
            };
            let form = SignupForm {
                org_name,
                first_name,
                last_name,
                email: email.clone(),
                password: prompt_password()?,
            };
            let result = session.signup(&form).await;
            if result.is_ok() {
                remember_email(config, &email);
                print_status(session);
            }
            result
        }
        Command::Join {
            code,
            first_name,
            last_name,
        } => {
            match session.members().invite_info(&code).await {
                Ok(info) if !info.org_name.is_empty() => println!("Joining {}", info.org_name),
                Ok(_) => {}
                Err(e) => warn!(error = %e, "Could not look up invite"),
            }
            let form = JoinForm {
                first_name,
                last_name,
                password: prompt_password()?,
            };
            let result = session.join(&code, &form).await;
            if result.is_ok() {
                let email = session.session().email.clone();
                if !email.is_empty() {
                    remember_email(config, &email);
                }
                print_status(session);
            }
            result
        }
        Command::Logout => {
            let result = session.logout().await;
            if result.is_ok() {
                println!("Signed out.");
            }
            result
        }
        Command::Members => session.members().list().await.map(|members| {
            println!("Members ({})", members.len());
            for member in &members {
                println!("  {:<30} {}", member.display_name(), member.email);
            }
        }),
        Command::Invite { email } => {
            let result = session.members().invite(&email).await;
            if result.is_ok() {
                println!("Invitation sent to {}.", email);
            }
            result
        }
    };
    Ok(outcome)
}

fn print_status(session: &SessionHandle) {
    let current = session.session();
    if current.is_authenticated() {
        println!(
            "Signed in as {} <{}> (organization {})",
            current.full_name(),
            current.email,
            current.organization_id
        );
    } else {
        println!("Not signed in.");
    }
}

fn remember_email(config: &mut Config, email: &str) {
    if let Err(e) = config.remember_email(email) {
        warn!(error = %e, "Failed to save config");
    }
}

fn prompt_email(default: Option<&str>) -> Result<String> {
    match default {
        Some(last) => print!("Email [{}]: ", last),
        None => print!("Email: "),
    }
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();

    Ok(match default {
        Some(last) if input.is_empty() => last.to_string(),
        _ => input.to_string(),
    })
}

fn prompt_password() -> Result<String> {
    let password = rpassword::prompt_password("Password: ")?;
    Ok(password)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_signup() {
        let cli = Cli::try_parse_from([
            "lunchmore", "signup", "--org", "Lunch Club", "--first", "Ada", "--last", "Byron",
            "--email", "ada@example.com",
        ])
        .expect("valid args");

        match cli.command {
            Command::Signup {
                org_name, email, ..
            } => {
                assert_eq!(org_name, "Lunch Club");
                assert_eq!(email.as_deref(), Some("ada@example.com"));
            }
            _ => panic!("Expected signup command"),
        }
    }

    #[test]
    fn test_parse_join_with_global_url() {
        let cli = Cli::try_parse_from([
            "lunchmore", "join", "SU5WSVRFMQ==", "--first", "A", "--last", "B", "--api-url",
            "http://example.test",
        ])
        .expect("valid args");

        assert_eq!(cli.api_url.as_deref(), Some("http://example.test"));
        assert!(matches!(cli.command, Command::Join { ref code, .. } if code == "SU5WSVRFMQ=="));
    }
}
