use super::context::Context;
use crate::{
    libs::{messages::Message, view::View},
    msg_print,
};
use anyhow::Result;

pub fn cmd(owner: Option<&str>) -> Result<()> {
    let ctx = Context::load(owner)?;

    msg_print!(Message::AreasHeader, true);
    View::areas(&ctx.areas);
    msg_print!(Message::IdleAreaLabel(ctx.areas.idle_label().to_string()));
    Ok(())
}
