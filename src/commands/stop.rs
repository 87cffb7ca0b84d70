use super::context::Context;
use crate::{
    libs::{formatter::format_duration, messages::Message},
    msg_info, msg_success, msg_warning,
};
use anyhow::Result;

pub fn cmd(owner: Option<&str>) -> Result<()> {
    let ctx = Context::load(owner)?;

    let update = ctx.update(|tracker| {
        if !tracker.state().is_active() {
            return Ok(None);
        }
        let elapsed = tracker.elapsed();
        let recorded = tracker.stop()?;
        Ok(Some((elapsed, recorded)))
    })?;

    let Some((elapsed, recorded)) = update.value else {
        msg_warning!(Message::NotLogging);
        return Ok(());
    };

    let area = update.after.current_area().to_string();
    match recorded {
        Some(_) => msg_info!(Message::IntervalRecorded {
            area: area.clone(),
            duration: format_duration(&elapsed),
        }),
        None => msg_info!(Message::IntervalDropped(area.clone())),
    }
    msg_success!(Message::LoggingStopped(area));
    Ok(())
}
