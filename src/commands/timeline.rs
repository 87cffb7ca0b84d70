use super::{context::Context, range::RangeArgs};
use crate::{
    libs::{aggregate, messages::Message, view::View},
    msg_print, msg_warning,
};
use anyhow::Result;

pub fn cmd(owner: Option<&str>, args: RangeArgs) -> Result<()> {
    let ctx = Context::load(owner)?;
    let range = args.range()?;
    let result = aggregate::timeline_rows(&ctx.owner, &range, args.group_by, ctx.store())?;

    if result.skipped > 0 {
        msg_warning!(Message::MalformedRowsSkipped(result.skipped));
    }
    if result.value.is_empty() {
        msg_print!(Message::NoEntriesFound {
            from: range.from().to_string(),
            to: range.to().to_string(),
        });
        return Ok(());
    }

    msg_print!(
        Message::TimelineHeader {
            from: range.from().to_string(),
            to: range.to().to_string(),
        },
        true
    );
    View::timeline(&result.value, args.group_by);
    Ok(())
}
