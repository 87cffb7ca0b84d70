use super::context::Context;
use crate::{
    libs::{
        aggregate::{self, DateRange},
        messages::Message,
        view::View,
    },
    msg_print, msg_warning,
};
use anyhow::Result;
use chrono::Local;

pub fn cmd(owner: Option<&str>) -> Result<()> {
    let ctx = Context::load(owner)?;
    let today = Local::now().date_naive();
    let result = aggregate::entries(&ctx.owner, &DateRange::day(today), ctx.store())?;

    if result.skipped > 0 {
        msg_warning!(Message::MalformedRowsSkipped(result.skipped));
    }
    if result.value.is_empty() {
        msg_print!(Message::NoEntriesFound {
            from: today.to_string(),
            to: today.to_string(),
        });
        return Ok(());
    }

    msg_print!(Message::TodayHeader(today.format("%B %-d, %Y").to_string()), true);
    View::entries(&result.value);
    Ok(())
}
