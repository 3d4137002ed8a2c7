use anyhow::Result;
use chrono::Utc;
use clap::Args;
use comfy_table::{presets::UTF8_FULL, Table};

use crate::cli::AppContext;
use crate::domain::models::CallbackAction;

#[derive(Args)]
pub struct SearchArgs {
    /// Free-text movie query
    pub query: String,
}

pub async fn execute(
    ctx: &AppContext,
    args: &SearchArgs,
    requester: &str,
    json: bool,
) -> Result<()> {
    let query = args.query.trim();
    let summaries = ctx.lookup.resolve_search(query, requester, Utc::now()).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    if summaries.is_empty() {
        println!("Nothing found for '{query}'.");
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Result", "Details", "Links"]);
    for summary in &summaries {
        table.add_row(vec![
            summary.label(),
            CallbackAction::Movie(summary.movie_id.clone()).token(),
            CallbackAction::Links(summary.movie_id.clone()).token(),
        ]);
    }
    println!("{table}");
    println!("Open a result with `reelcache open <token>`.");
    Ok(())
}
