//! Auth command handlers.

use librarian_core::Librarian;
use owo_colors::OwoColorize;
use secrecy::SecretString;
use serde::Serialize;

use crate::cli::{AuthArgs, AuthCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Debug, Serialize)]
struct AuthStatus {
    server: String,
    authenticated: bool,
}

fn server_label(librarian: &Librarian) -> String {
    let config = librarian.config();
    config
        .base_host
        .clone()
        .or_else(|| config.origin.as_ref().map(ToString::to_string))
        .unwrap_or_default()
}

fn read_token(token: Option<String>) -> Result<SecretString, CliError> {
    let token = match token {
        Some(token) => token,
        None => dialoguer::Password::new()
            .with_prompt("Access token")
            .interact()
            .map_err(util::prompt_err)?,
    };

    let token = token.trim().to_owned();
    if token.is_empty() {
        return Err(CliError::Validation {
            field: "token".into(),
            reason: "token cannot be empty".into(),
        });
    }
    Ok(SecretString::from(token))
}

pub async fn handle(
    librarian: &Librarian,
    args: AuthArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        AuthCommand::Login { token } => {
            let token = read_token(token)?;

            let bar = util::spinner(global, "Logging in".into());
            let result = librarian.login(token).await;
            bar.finish_and_clear();
            result?;

            if !global.quiet {
                eprintln!("✓ Logged in to {}", server_label(librarian));
            }
            Ok(())
        }

        AuthCommand::Status => {
            let bar = util::spinner(global, "Validating session".into());
            let result = librarian.validate().await;
            bar.finish_and_clear();
            result?;

            let status = AuthStatus {
                server: server_label(librarian),
                authenticated: librarian.is_authenticated(),
            };
            let color = output::should_color(&global.color);

            let out = output::render_single(
                &global.output,
                &status,
                |s| {
                    let state = match (s.authenticated, color) {
                        (true, true) => "authenticated".green().to_string(),
                        (true, false) => "authenticated".into(),
                        (false, true) => "anonymous".yellow().to_string(),
                        (false, false) => "anonymous".into(),
                    };
                    format!("Server:  {}\nSession: {state}", s.server)
                },
                |s| s.authenticated.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AuthCommand::Logout => {
            librarian.logout();
            if !global.quiet {
                eprintln!("✓ Logged out");
            }
            Ok(())
        }
    }
}
