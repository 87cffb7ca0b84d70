//! Command-line interface.
//!
//! One subcommand per module, each exposing `cmd(...) -> anyhow::Result<()>`.
//! Tracking commands load the owner's saved timer state, apply one
//! transition and save the state again.

pub mod areas;
pub mod clear;
pub mod context;
pub mod daily;
pub mod export;
pub mod idle;
pub mod init;
pub mod range;
pub mod start;
pub mod status;
pub mod stop;
pub mod switch;
pub mod timeline;
pub mod today;
pub mod totals;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "List the work areas")]
    Areas,
    #[command(about = "Start logging time")]
    Start(start::StartArgs),
    #[command(about = "Switch to another area", arg_required_else_help = true)]
    Switch(switch::SwitchArgs),
    #[command(about = "Switch to the idle pseudo-area")]
    Idle,
    #[command(about = "Stop logging time")]
    Stop,
    #[command(about = "Show the current area and elapsed time")]
    Status,
    #[command(about = "Show today's log entries")]
    Today,
    #[command(about = "Show hours per area or department")]
    Totals(range::RangeArgs),
    #[command(about = "Show hours per day")]
    Daily(range::RangeArgs),
    #[command(about = "Show entry/exit rows for a date range")]
    Timeline(range::RangeArgs),
    #[command(about = "Export entries and totals to CSV, JSON or Excel")]
    Export(export::ExportArgs),
    #[command(about = "Delete logged entries")]
    Clear(clear::ClearArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    /// Owner id to log for; defaults to the configured owner or the OS user
    #[arg(long, global = true)]
    owner: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn menu() -> Result<()> {
        let cli = Self::parse();
        let owner = cli.owner.as_deref();

        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::Areas => areas::cmd(owner),
            Commands::Start(args) => start::cmd(owner, args),
            Commands::Switch(args) => switch::cmd(owner, args),
            Commands::Idle => idle::cmd(owner),
            Commands::Stop => stop::cmd(owner),
            Commands::Status => status::cmd(owner),
            Commands::Today => today::cmd(owner),
            Commands::Totals(args) => totals::cmd(owner, args),
            Commands::Daily(args) => daily::cmd(owner, args),
            Commands::Timeline(args) => timeline::cmd(owner, args),
            Commands::Export(args) => export::cmd(owner, args),
            Commands::Clear(args) => clear::cmd(owner, args),
        }
    }
}
