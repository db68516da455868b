mod extract;
mod town;

pub use extract::{
    extract_field, extract_planning_area, extract_subzone, PLANNING_AREA_KEY, SUBZONE_KEY,
};
pub use town::TownTable;
