use std::path::PathBuf;

/// HDB resale map CLI (argument schema only)
#[derive(clap::Parser, Debug)]
#[command(name = "hdbmap", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Merge raw subzone polygons into planning areas or towns (forbids stdout)
    Merge(MergeArgs),

    /// Merge a planning-area collection into towns (forbids stdout)
    MergeTowns(MergeTownsArgs),

    /// Aggregate resale records onto merged areas (forbids stdout)
    Aggregate(AggregateArgs),

    /// Print an unfiltered summary of a record set as JSON
    Summary(SummaryArgs),

    /// Download all resale records from data.gov.sg (forbids stdout)
    #[cfg(feature = "download")]
    Fetch(FetchArgs),
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, clap::ValueEnum)]
pub enum Level { PlanningArea, Town }

#[derive(clap::Args, Debug)]
pub struct MergeArgs {
    /// Raw subzone GeoJSON (features carry an HTML `Description`)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub subzones: PathBuf,

    /// Output GeoJSON file
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: PathBuf,

    /// Merge granularity
    #[arg(short, long, value_enum, default_value_t = Level::Town)]
    pub level: Level,

    /// JSON object replacing the built-in planning area -> town table
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub towns: Option<PathBuf>,

    /// Overwrite if the file exists
    #[arg(long)]
    pub force: bool,
}

#[derive(clap::Args, Debug)]
pub struct MergeTownsArgs {
    /// Planning-area GeoJSON written by `hdbmap merge --level planning-area`
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub areas: PathBuf,

    /// Output GeoJSON file
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: PathBuf,

    /// Overwrite if the file exists
    #[arg(long)]
    pub force: bool,
}

#[derive(clap::Args, Debug)]
pub struct FilterArgs {
    /// JSON filter file ({"flatType": .., "minLeaseYears": .., ...}); overrides the flags below
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub filters: Option<PathBuf>,

    /// Flat type, or ALL
    #[arg(long, default_value = "ALL")]
    pub flat_type: String,

    /// Minimum remaining lease in whole years
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u32).range(0..=99))]
    pub min_lease: u32,

    /// Maximum remaining lease in whole years
    #[arg(long, default_value_t = 99, value_parser = clap::value_parser!(u32).range(0..=99))]
    pub max_lease: u32,

    /// Floor area bucket: ANY, BELOW_60, 60_79, 80_99, 100_119, 120_PLUS
    #[arg(long, default_value = "ANY")]
    pub floor_area: String,

    /// Lowest storey of interest
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=50))]
    pub min_storey: u32,

    /// Highest storey of interest
    #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u32).range(1..=50))]
    pub max_storey: u32,
}

#[derive(clap::Args, Debug)]
pub struct AggregateArgs {
    /// Merged area GeoJSON written by `hdbmap merge`
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub areas: PathBuf,

    /// Resale records (.csv, or JSON array / datastore_search response)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub records: PathBuf,

    /// Output GeoJSON file
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: PathBuf,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Overwrite if the file exists
    #[arg(long)]
    pub force: bool,
}

#[derive(clap::Args, Debug)]
pub struct SummaryArgs {
    /// Resale records (.csv, or JSON array / datastore_search response)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub records: PathBuf,
}

#[cfg(feature = "download")]
#[derive(clap::Args, Debug)]
pub struct FetchArgs {
    /// Output JSON file
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: PathBuf,

    /// data.gov.sg dataset resource id
    #[arg(long, default_value = hdbmap::io::fetch::DEFAULT_RESOURCE_ID)]
    pub resource_id: String,

    /// Overwrite if the file exists
    #[arg(long)]
    pub force: bool,
}
