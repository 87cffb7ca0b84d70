use super::{context::Context, range::RangeArgs};
use crate::libs::export::{ExportData, ExportFormat, Exporter};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[arg(value_enum, default_value = "entries")]
    data: ExportData,

    #[arg(short, long, value_enum, default_value = "csv")]
    format: ExportFormat,

    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    range: RangeArgs,
}

pub fn cmd(owner: Option<&str>, args: ExportArgs) -> Result<()> {
    let ctx = Context::load(owner)?;
    let range = args.range.range()?;

    let exporter = Exporter::new(args.format, args.output);
    exporter.export(args.data, &ctx.owner, &range, args.range.group_by, ctx.store())?;
    Ok(())
}
