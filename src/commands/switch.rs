use super::context::Context;
use crate::{
    libs::{formatter::format_duration, messages::Message, timer::SessionTimerState},
    msg_info, msg_success, msg_warning,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct SwitchArgs {
    /// Area ordinal, name (case-insensitive) or `idle`
    area: String,
}

pub fn cmd(owner: Option<&str>, args: SwitchArgs) -> Result<()> {
    switch_to(owner, &args.area)
}

pub fn switch_to(owner: Option<&str>, area: &str) -> Result<()> {
    let ctx = Context::load(owner)?;

    let update = ctx.update(|tracker| {
        if !tracker.state().is_active() {
            // Still validate the name so typos are reported.
            tracker.areas().resolve(area)?;
            return Ok(false);
        }
        tracker.switch_area(area)?;
        Ok(true)
    })?;

    if update.value {
        report_switch(&update.before, &update.after);
    } else {
        msg_warning!(Message::NotLogging);
    }
    Ok(())
}

/// Prints the outcome of a switch between two active states.
pub fn report_switch(previous: &SessionTimerState, state: &SessionTimerState) {
    if previous.current_area() == state.current_area() {
        msg_info!(Message::AlreadyInArea(state.current_area().to_string()));
        return;
    }

    msg_success!(Message::AreaSwitched {
        from: previous.current_area().to_string(),
        to: state.current_area().to_string(),
    });
    if let (Some(from), Some(to)) = (previous.interval_started_at(), state.interval_started_at()) {
        msg_info!(Message::IntervalRecorded {
            area: previous.current_area().to_string(),
            duration: format_duration(&(to - from)),
        });
    }
}
