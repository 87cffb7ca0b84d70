use super::context::Context;
use crate::{
    libs::messages::Message,
    msg_bail_anyhow, msg_info, msg_success,
};
use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Confirm};
use std::env;

/// Opt-in switch for deleting every owner's entries.
pub const RETEST_TOOLS_ENV: &str = "ENABLE_RETEST_TOOLS";

#[derive(Debug, Args)]
pub struct ClearArgs {
    /// Delete the entries of every owner (requires ENABLE_RETEST_TOOLS=1)
    #[arg(long)]
    all: bool,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,
}

pub fn retest_tools_enabled() -> bool {
    env::var(RETEST_TOOLS_ENV).map(|v| v.trim() == "1").unwrap_or(false)
}

pub fn cmd(owner: Option<&str>, args: ClearArgs) -> Result<()> {
    if args.all && !retest_tools_enabled() {
        msg_bail_anyhow!(Message::ClearAllRequiresRetestTools);
    }

    let ctx = Context::load(owner)?;
    let prompt = if args.all {
        Message::ConfirmClearAll
    } else {
        Message::ConfirmClearOwner(ctx.owner.clone())
    };

    let confirmed = args.yes
        || Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt.to_string())
            .default(false)
            .interact()?;
    if !confirmed {
        msg_info!(Message::OperationCancelled);
        return Ok(());
    }

    let lock = ctx.backend.lock()?;
    let deleted = if args.all {
        ctx.store().delete_all_log_entries()?
    } else {
        ctx.store().delete_log_entries(&ctx.owner)?
    };
    lock.commit()?;
    msg_success!(Message::EntriesDeleted(deleted));
    Ok(())
}
