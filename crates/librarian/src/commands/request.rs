//! Raw `get` / `post` against `/api` endpoints.

use librarian_core::{Librarian, RequestOptions, ResourceConfig};
use serde_json::{Value, json};

use crate::cli::{GetArgs, GlobalOpts, PostArgs};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn get(librarian: &Librarian, args: GetArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let options = util::with_query(RequestOptions::get(), args.query);
    let resource = librarian.resource::<Value>(&args.path, options, ResourceConfig::lazy());

    let bar = util::spinner(global, format!("GET {}", resource.path()));
    let result = resource.fetch().await;
    bar.finish_and_clear();

    let data = result?;
    let out = output::render_value(&global.output, &data)?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn post(
    librarian: &Librarian,
    args: PostArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let body = match (args.data, args.from_file) {
        (Some(raw), _) => serde_json::from_str(&raw)?,
        (None, Some(path)) => util::read_json_file(&path)?,
        (None, None) => json!({}),
    };
    let options = util::with_query(RequestOptions::post(body), args.query);

    let bar = util::spinner(global, format!("POST {}", args.path));
    let result = librarian.request::<Value>(&args.path, &options).await;
    bar.finish_and_clear();

    let out = output::render_value(&global.output, &result?)?;
    output::print_output(&out, global.quiet);
    Ok(())
}
