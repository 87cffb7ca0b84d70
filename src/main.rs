use arealog::commands::Cli;
use arealog::libs::logging::enable_logging;
use dotenv::dotenv;

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    enable_logging();

    Cli::menu()
}
