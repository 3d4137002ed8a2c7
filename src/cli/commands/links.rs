use anyhow::Result;
use chrono::Utc;
use clap::Args;
use comfy_table::{presets::UTF8_FULL, Table};

use crate::cli::AppContext;

#[derive(Args)]
pub struct LinksArgs {
    /// Movie identifier from a search result token
    pub movie_id: String,
}

pub async fn execute(
    ctx: &AppContext,
    args: &LinksArgs,
    requester: &str,
    json: bool,
) -> Result<()> {
    execute_for_id(ctx, &args.movie_id, requester, json).await
}

/// Shared with `open`, which reaches links through a callback token.
pub async fn execute_for_id(
    ctx: &AppContext,
    movie_id: &str,
    requester: &str,
    json: bool,
) -> Result<()> {
    let links = ctx.lookup.resolve_links(movie_id, requester, Utc::now()).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&links)?);
        return Ok(());
    }

    if links.is_empty() {
        println!("No watch links found for movie {movie_id}.");
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Source", "Title", "Link"]);
    for link in &links {
        table.add_row(vec![&link.source, &link.title, &link.link]);
    }
    println!("{table}");
    Ok(())
}
