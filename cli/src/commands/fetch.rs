use anyhow::Result;
use hdbmap::io::{fetch::fetch_records, write_json_file};
use tracing::info;

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::FetchArgs) -> Result<()> {
    info!(resource_id = %args.resource_id, "downloading resale records");
    let records = fetch_records(&args.resource_id)?;

    info!(records = records.len(), output = %args.output.display(), "writing records");
    write_json_file(&args.output, &records, args.force)
}
