use anyhow::{Context, Result};
use hdbmap::{io::read_records, summarize};

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::SummaryArgs) -> Result<()> {
    let records = read_records(&args.records)?;
    let summary = summarize(&records);

    let text = serde_json::to_string_pretty(&summary).context("[summary] Failed to serialize summary")?;
    println!("{text}");

    Ok(())
}
