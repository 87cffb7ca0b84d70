use super::{context::Context, range::RangeArgs};
use crate::{
    libs::{aggregate, messages::Message, view::View},
    msg_print, msg_warning,
};
use anyhow::Result;

pub fn cmd(owner: Option<&str>, args: RangeArgs) -> Result<()> {
    let ctx = Context::load(owner)?;
    let range = args.range()?;
    let result = aggregate::totals_by_group(&ctx.owner, &range, args.group_by, ctx.store())?;

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
        Message::TotalsHeader {
            from: range.from().to_string(),
            to: range.to().to_string(),
            group_by: args.group_by.to_string(),
        },
        true
    );
    View::totals(&result.value, args.group_by);
    Ok(())
}
