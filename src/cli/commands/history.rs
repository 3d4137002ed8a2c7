use anyhow::Result;
use clap::Args;
use comfy_table::{presets::UTF8_FULL, Table};

use crate::cli::AppContext;

#[derive(Args)]
pub struct HistoryArgs {
    /// Maximum number of queries to show
    #[arg(long, default_value_t = 10)]
    pub limit: u32,
}

pub async fn execute(
    ctx: &AppContext,
    args: &HistoryArgs,
    requester: &str,
    json: bool,
) -> Result<()> {
    let entries = ctx.stats.history(requester, args.limit).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No search history yet.");
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Query", "Last searched"]);
    for entry in &entries {
        table.add_row(vec![
            entry.query.clone(),
            entry.last_seen.format("%Y-%m-%d %H:%M UTC").to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}
