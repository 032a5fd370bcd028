//! Invite command handlers.

use chrono::Utc;
use librarian_core::{InviteConfig, InviteOption, InviteToken, Librarian, Library, SharedLibraries};
use tabled::Tabled;

use crate::cli::{GlobalOpts, InviteArgs, InviteCommand};
use crate::error::CliError;
use crate::output;

use super::util;

const SECS_PER_DAY: u64 = 86_400;

#[derive(Tabled)]
struct LibraryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Available")]
    available: String,
}

impl From<&Library> for LibraryRow {
    fn from(lib: &Library) -> Self {
        Self {
            id: lib.id.clone(),
            name: lib.name.clone(),
            available: if lib.unavailable { "no" } else { "yes" }.into(),
        }
    }
}

fn non_empty(values: Vec<String>) -> Option<Vec<String>> {
    if values.is_empty() { None } else { Some(values) }
}

fn join_or(values: Option<&Vec<String>>, fallback: &str) -> String {
    values
        .filter(|v| !v.is_empty())
        .map_or_else(|| fallback.to_owned(), |v| v.join(", "))
}

fn config_detail(config: &InviteConfig) -> String {
    let rows: Vec<LibraryRow> = config.libraries.iter().map(LibraryRow::from).collect();
    format!(
        "{}\nLabels: {}",
        output::render_table(&rows),
        join_or(Some(&config.labels), "(none)")
    )
}

fn invite_detail(invite: &InviteToken) -> String {
    let option = &invite.option;
    let libraries = match &option.shared_libraries {
        Some(shared) if shared.all => "all".to_owned(),
        Some(shared) => join_or(Some(&shared.library_ids), "none"),
        None => "server default".to_owned(),
    };
    let expires = match option.expires_at() {
        Some(at) if option.is_expired(Utc::now()) => format!("{} (expired)", at.to_rfc3339()),
        Some(at) => at.to_rfc3339(),
        None => "never".to_owned(),
    };

    format!(
        "Token:          {}\n\
         Libraries:      {libraries}\n\
         Allowed labels: {}\n\
         Hidden labels:  {}\n\
         Expires:        {expires}",
        invite.token,
        join_or(option.labels_allow.as_ref(), "any"),
        join_or(option.labels_exclude.as_ref(), "none"),
    )
}

pub async fn handle(
    librarian: &Librarian,
    args: InviteArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        InviteCommand::Config => {
            let bar = util::spinner(global, "Fetching invite options".into());
            let result = librarian.invite_config().await;
            bar.finish_and_clear();
            let config = result?;

            let out = output::render_single(&global.output, &*config, config_detail, |c| {
                c.libraries
                    .iter()
                    .map(|lib| lib.id.clone())
                    .collect::<Vec<_>>()
                    .join("\n")
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        InviteCommand::Create {
            all_libraries,
            library,
            allow_label,
            exclude_label,
            expires_in,
            role,
        } => {
            let shared_libraries = if all_libraries {
                Some(SharedLibraries {
                    all: true,
                    library_ids: Vec::new(),
                })
            } else {
                non_empty(library).map(|library_ids| SharedLibraries {
                    all: false,
                    library_ids,
                })
            };

            let now = u64::try_from(Utc::now().timestamp()).unwrap_or_default();
            let option = InviteOption {
                labels_allow: non_empty(allow_label),
                labels_exclude: non_empty(exclude_label),
                shared_libraries,
                expire_at: expires_in.map(|days| now + u64::from(days) * SECS_PER_DAY),
                roles: non_empty(role),
            };

            let invite = librarian.create_invite(&option).await?;
            let out = output::render_single(&global.output, &invite, invite_detail, |i| {
                i.token.clone()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        InviteCommand::Show { token } => {
            let invite = librarian.invite(&token).await?;
            let out = output::render_single(&global.output, &invite, invite_detail, |i| {
                i.token.clone()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
