use anyhow::Result;
use hdbmap::{
    geom::{merge_planning_areas_to_towns, merge_subzones, MergeReport},
    io::{read_merged, read_subzones, write_json_file},
    MergeLevel, TownTable,
};
use tracing::info;

use crate::cli::Level;

fn report(output: &std::path::Path, merged: &MergeReport, force: bool) -> Result<()> {
    if !merged.skipped.is_empty() {
        info!(skipped = merged.skipped.len(), "some members were left out of the merge");
    }
    info!(features = merged.areas.len(), output = %output.display(), "writing merged areas");
    write_json_file(output, &merged.areas.to_geojson(), force)
}

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::MergeArgs) -> Result<()> {
    let towns = match &args.towns {
        Some(path) => TownTable::read_json_file(path)?,
        None => TownTable::singapore(),
    };
    let level = match args.level {
        Level::PlanningArea => MergeLevel::PlanningArea,
        Level::Town => MergeLevel::Town,
    };

    let features = read_subzones(&args.subzones)?;
    info!(features = features.len(), level = level.to_str(), "merging subzones");

    report(&args.output, &merge_subzones(&features, &towns, level), args.force)
}

pub fn run_towns(_cli: &crate::cli::Cli, args: &crate::cli::MergeTownsArgs) -> Result<()> {
    let areas = read_merged(&args.areas)?;
    info!(areas = areas.len(), "merging planning areas into towns");

    report(&args.output, &merge_planning_areas_to_towns(&areas), args.force)
}
