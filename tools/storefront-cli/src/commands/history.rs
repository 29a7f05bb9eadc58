//! Recent searches.

use anyhow::Result;

use super::{HistoryArgs, HistoryCommand};
use crate::context::Context;

/// Run the history command.
pub async fn run(args: HistoryArgs, ctx: &Context) -> Result<()> {
    let mut history = ctx.history()?;

    match args.command.unwrap_or(HistoryCommand::Show) {
        HistoryCommand::Show => {
            if ctx.output.is_json() {
                ctx.output.json(&history.entries());
                return Ok(());
            }
            if history.entries().is_empty() {
                ctx.output.info("No recent searches.");
                return Ok(());
            }
            ctx.output.header("Recent searches");
            for term in history.entries() {
                ctx.output.list_item(term);
            }
        }
        HistoryCommand::Clear => {
            history.clear()?;
            ctx.output.success("Search history cleared");
        }
    }
    Ok(())
}
