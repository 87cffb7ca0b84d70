use super::context::Context;
use crate::{
    libs::{
        formatter::{format_date_time, format_duration},
        messages::Message,
    },
    msg_print,
};
use anyhow::Result;

pub fn cmd(owner: Option<&str>) -> Result<()> {
    let ctx = Context::load(owner)?;
    let tracker = ctx.tracker()?;
    let state = tracker.state();

    match state.interval_started_at() {
        Some(since) => msg_print!(Message::StatusActive {
            area: state.current_area().to_string(),
            since: format_date_time(&since),
            elapsed: format_duration(&tracker.elapsed()),
        }),
        None => msg_print!(Message::StatusInactive(state.current_area().to_string())),
    }
    Ok(())
}
