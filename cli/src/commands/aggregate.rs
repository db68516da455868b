use anyhow::{Context, Result};
use hdbmap::{
    io::{read_json_file, read_merged, read_records, write_json_file},
    price_layer, FilterSpec, FloorAreaBucket,
};
use tracing::info;

use crate::cli::FilterArgs;

fn filter_spec(args: &FilterArgs) -> Result<FilterSpec> {
    if let Some(path) = &args.filters {
        let value = read_json_file(path)?;
        return serde_json::from_value(value)
            .with_context(|| format!("[aggregate] {} is not a filter object", path.display()));
    }

    Ok(FilterSpec {
        flat_type: args.flat_type.to_ascii_uppercase(),
        min_lease_years: args.min_lease,
        max_lease_years: args.max_lease,
        floor_area_range: FloorAreaBucket::from(args.floor_area.clone()),
        min_storey: args.min_storey,
        max_storey: args.max_storey,
    })
}

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::AggregateArgs) -> Result<()> {
    let filters = filter_spec(&args.filter)?;
    let areas = read_merged(&args.areas)?;
    let records = read_records(&args.records)?;
    info!(areas = areas.len(), records = records.len(), ?filters, "aggregating resale prices");

    let layer = price_layer(&areas, &records, &filters);
    write_json_file(&args.output, &layer, args.force)
}
