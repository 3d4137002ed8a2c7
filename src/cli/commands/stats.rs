use anyhow::Result;
use clap::Args;
use comfy_table::{presets::UTF8_FULL, Table};

use crate::cli::AppContext;

#[derive(Args)]
pub struct StatsArgs {
    /// How many top queries to include
    #[arg(long, default_value_t = 10)]
    pub top: u32,
}

pub async fn execute(
    ctx: &AppContext,
    args: &StatsArgs,
    requester: &str,
    json: bool,
) -> Result<()> {
    let stats = ctx.stats.stats(requester, args.top).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("Distinct searches:     {}", stats.distinct_searches);
    println!("Distinct link lookups: {}", stats.distinct_link_lookups);

    if stats.top_queries.is_empty() {
        println!("\nNo queries recorded yet.");
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Query", "Times asked"]);
    for entry in &stats.top_queries {
        table.add_row(vec![entry.query.clone(), entry.count.to_string()]);
    }
    println!("\n{table}");
    Ok(())
}
