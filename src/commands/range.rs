use crate::libs::aggregate::{DateRange, GroupBy};
use crate::libs::messages::Message;
use crate::msg_error_anyhow;
use anyhow::Result;
use chrono::{Days, Local, NaiveDate};
use clap::Args;

/// Date range and grouping shared by the reporting commands.
#[derive(Debug, Args)]
pub struct RangeArgs {
    /// First day: today, yesterday or YYYY-MM-DD
    #[arg(long, default_value = "today")]
    pub from: String,

    /// Last day; defaults to --from
    #[arg(long)]
    pub to: Option<String>,

    #[arg(short, long, value_enum, default_value_t = GroupBy::Area)]
    pub group_by: GroupBy,
}

impl RangeArgs {
    pub fn range(&self) -> Result<DateRange> {
        let today = Local::now().date_naive();
        let from = parse_date(&self.from, today)?;
        let to = match &self.to {
            Some(to) => parse_date(to, today)?,
            None => from,
        };
        Ok(DateRange::new(from, to)?)
    }
}

/// Parses `today`, `yesterday` or an ISO date relative to `today`.
pub fn parse_date(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    let input = input.trim();
    match input.to_lowercase().as_str() {
        "today" => Ok(today),
        "yesterday" => today
            .checked_sub_days(Days::new(1))
            .ok_or_else(|| msg_error_anyhow!(Message::InvalidDate(input.to_string()))),
        _ => NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| msg_error_anyhow!(Message::InvalidDate(input.to_string()))),
    }
}
