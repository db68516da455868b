mod aggregate;
mod filters;
mod parse;
mod record;
mod summary;

pub use aggregate::{aggregate, parse_floor_area, parse_price, record_matches, rounded_mean, TownAggregate};
pub use filters::{FilterSpec, FloorAreaBucket, ALL_FLAT_TYPES, FLAT_TYPES};
pub use parse::{matches_floor_area_bucket, parse_lease_years, parse_storey_range, StoreyRange, FULL_STOREY_RANGE};
pub use record::TransactionRecord;
pub use summary::{summarize, DatasetSummary};
