//! Field extraction from the HTML attribute table embedded in subzone `Description`s.

use std::sync::OnceLock;

use regex::Regex;

/// Key of the planning-area name in a subzone descriptor.
pub const PLANNING_AREA_KEY: &str = "PLN_AREA_N";

/// Key of the subzone name in a subzone descriptor.
pub const SUBZONE_KEY: &str = "SUBZONE_N";

fn planning_area_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| field_pattern(PLANNING_AREA_KEY))
}

fn subzone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| field_pattern(SUBZONE_KEY))
}

/// Build the `<th>KEY</th> <td>VALUE</td>` matcher for one key.
fn field_pattern(key: &str) -> Regex {
    Regex::new(&format!(r"(?s)<th>\s*{}\s*</th>\s*<td>(.*?)</td>", regex::escape(key)))
        .unwrap_or_else(|e| unreachable!("escaped key always yields a valid pattern: {e}"))
}

fn capture(pattern: &Regex, descriptor: &str) -> Option<String> {
    let value = pattern.captures(descriptor)?.get(1)?.as_str().trim();
    (!value.is_empty()).then(|| value.to_uppercase())
}

/// Extract the upper-cased value stored under `key`, or `None` if the key is
/// absent or its cell is empty.
pub fn extract_field(descriptor: &str, key: &str) -> Option<String> {
    match key {
        PLANNING_AREA_KEY => capture(planning_area_pattern(), descriptor),
        SUBZONE_KEY => capture(subzone_pattern(), descriptor),
        _ => capture(&field_pattern(key), descriptor),
    }
}

/// Planning-area name of a subzone descriptor.
#[inline]
pub fn extract_planning_area(descriptor: &str) -> Option<String> {
    capture(planning_area_pattern(), descriptor)
}

/// Subzone name of a subzone descriptor.
#[inline]
pub fn extract_subzone(descriptor: &str) -> Option<String> {
    capture(subzone_pattern(), descriptor)
}
