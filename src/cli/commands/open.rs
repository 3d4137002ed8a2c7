use anyhow::Result;
use clap::Args;
use tracing::warn;

use crate::cli::AppContext;
use crate::domain::models::CallbackAction;

use super::{links, movie};

#[derive(Args)]
pub struct OpenArgs {
    /// Callback token, e.g. `movie_301` or `links_301`
    pub token: String,
}

/// Dispatch a `{kind}_{id}` callback token. Malformed or unknown tokens
/// are ignored with a log line, matching how interactive transports are
/// expected to treat them.
pub async fn execute(
    ctx: &AppContext,
    args: &OpenArgs,
    requester: &str,
    json: bool,
) -> Result<()> {
    match CallbackAction::parse(&args.token) {
        Some(CallbackAction::Movie(id)) => movie::execute_for_id(ctx, &id, requester, json).await,
        Some(CallbackAction::Links(id)) => links::execute_for_id(ctx, &id, requester, json).await,
        None => {
            warn!(token = args.token.as_str(), "ignoring unrecognized callback token");
            if !json {
                println!("Nothing to do for '{}'.", args.token);
            }
            Ok(())
        }
    }
}
