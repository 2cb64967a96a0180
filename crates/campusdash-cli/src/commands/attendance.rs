use campusdash_core::{AttendanceProjector, Config, DashboardAggregator, RecordSource, Threshold};
use clap::Subcommand;
use serde_json::json;

use super::{print_json, SourceArgs};

#[derive(Subcommand)]
pub enum AttendanceAction {
    /// Project one attended/total pair against the threshold
    Project {
        #[arg(long)]
        attended: u32,
        #[arg(long)]
        total: u32,
        /// Override the configured threshold (fraction, e.g. 0.75)
        #[arg(long)]
        threshold: Option<f64>,
    },
    /// Overall attendance, per-subject breakdown and shortfall
    Summary {
        #[command(flatten)]
        source: SourceArgs,
        /// Override the configured threshold (fraction, e.g. 0.75)
        #[arg(long)]
        threshold: Option<f64>,
    },
}

fn projector(
    config: &Config,
    threshold: Option<f64>,
) -> Result<AttendanceProjector, Box<dyn std::error::Error>> {
    match threshold {
        Some(value) => Ok(AttendanceProjector::new(Threshold::new(value)?)),
        None => Ok(config.projector()?),
    }
}

pub fn run(action: AttendanceAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();

    match action {
        AttendanceAction::Project {
            attended,
            total,
            threshold,
        } => {
            let projection = projector(&config, threshold)?.project(attended, total)?;
            print_json(&projection)?;
        }
        AttendanceAction::Summary { source, threshold } => {
            let records = source.source(&config).attendance_records()?;
            let aggregator = DashboardAggregator::new(
                projector(&config, threshold)?,
                config.matcher(),
            );
            let subjects = aggregator.subject_breakdown(&records);
            let shortfall = aggregator.shortfall(&subjects);
            print_json(&json!({
                "overall": aggregator.overall_attendance(&records),
                "subjects": subjects,
                "shortfall": shortfall,
            }))?;
        }
    }
    Ok(())
}
