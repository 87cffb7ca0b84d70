use super::context::Context;
use crate::{libs::messages::Message, msg_info, msg_success};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct StartArgs {
    /// Start directly in this area (ordinal, name or `idle`)
    #[arg(short, long)]
    area: Option<String>,
}

pub fn cmd(owner: Option<&str>, args: StartArgs) -> Result<()> {
    let ctx = Context::load(owner)?;

    let update = ctx.update(|tracker| {
        if tracker.state().is_active() && args.area.is_none() {
            return Ok(false);
        }
        match &args.area {
            Some(area) => tracker.start_in(area)?,
            None => tracker.start()?,
        };
        Ok(true)
    })?;

    let (previous, state) = (&update.before, &update.after);
    if !update.value {
        msg_info!(Message::LoggingAlreadyActive(state.current_area().to_string()));
    } else if previous.is_active() {
        super::switch::report_switch(previous, state);
    } else {
        msg_success!(Message::LoggingStarted(state.current_area().to_string()));
    }
    Ok(())
}
