use campusdash_core::{Config, RecordSource};
use clap::Args;

use super::{print_json, AtArgs, SourceArgs};

#[derive(Args)]
pub struct DashboardArgs {
    #[command(flatten)]
    source: SourceArgs,
    #[command(flatten)]
    at: AtArgs,
}

pub fn run(args: DashboardArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let aggregator = config.aggregator()?;
    let snapshot = args
        .source
        .source(&config)
        .student_dashboard(&aggregator, args.at.now())?;
    print_json(&snapshot)
}
