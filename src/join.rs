use std::collections::BTreeMap;

use serde_json::{json, Value};

use crate::geom::MergedCollection;
use crate::listing::{aggregate, FilterSpec, TownAggregate, TransactionRecord};

/// Build the render-ready FeatureCollection: every merged feature with
/// `averagePrice` (only when known) and `listingsCount` (always, possibly 0)
/// added to its properties. Inputs are left untouched.
pub fn join_aggregates(areas: &MergedCollection, towns: &BTreeMap<String, TownAggregate>) -> Value {
    let features: Vec<Value> = areas.iter().map(|area| {
        let mut properties = area.properties();

        let stats = towns.get(area.join_key());
        let listings_count = stats.map_or(0, |s| s.listing_count);
        let average_price = stats.filter(|s| s.listing_count > 0).and_then(|s| s.average_price);

        if let Some(price) = average_price {
            properties.insert("averagePrice".into(), json!(price));
        }
        properties.insert("listingsCount".into(), json!(listings_count));

        area.to_feature(properties)
    }).collect();

    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

/// Aggregate `records` under `filters` and join the result onto `areas`.
pub fn price_layer(areas: &MergedCollection, records: &[TransactionRecord], filters: &FilterSpec) -> Value {
    join_aggregates(areas, &aggregate(records, filters))
}
