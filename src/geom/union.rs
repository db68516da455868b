use std::panic::{catch_unwind, AssertUnwindSafe};

use geo::{Area, BooleanOps, MultiPolygon};
use thiserror::Error;

/// Why a single pairwise union was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnionError {
    #[error("non-finite coordinate in operand")]
    NonFinite,
    #[error("degenerate operand: {0}")]
    Degenerate(&'static str),
    #[error("union produced an empty geometry")]
    Empty,
    #[error("union panicked: {0}")]
    Panicked(String),
}

/// Pairwise polygon union used by the merger.
pub trait PolygonUnion {
    fn union(&self, a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> Result<MultiPolygon<f64>, UnionError>;

    /// Whether `operand` can take part in a union at all. The merger runs
    /// this on every member before picking the seed of a fold.
    fn check(&self, _operand: &MultiPolygon<f64>) -> Result<(), UnionError> { Ok(()) }
}

/// Union through `geo::BooleanOps`, with operands checked up front and any
/// panic from the overlay engine turned into an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanUnion;

impl PolygonUnion for BooleanUnion {
    fn union(&self, a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> Result<MultiPolygon<f64>, UnionError> {
        check_operand(a)?;
        check_operand(b)?;

        let merged = catch_unwind(AssertUnwindSafe(|| a.union(b)))
            .map_err(|payload| UnionError::Panicked(panic_message(payload.as_ref())))?;

        if merged.0.is_empty() { return Err(UnionError::Empty) }
        Ok(merged)
    }

    fn check(&self, operand: &MultiPolygon<f64>) -> Result<(), UnionError> { check_operand(operand) }
}

/// Reject operands the overlay cannot meaningfully combine.
fn check_operand(mp: &MultiPolygon<f64>) -> Result<(), UnionError> {
    if mp.0.is_empty() { return Err(UnionError::Degenerate("no polygons")) }

    for polygon in &mp.0 {
        let rings = std::iter::once(polygon.exterior()).chain(polygon.interiors());
        for ring in rings {
            if ring.coords().any(|c| !c.x.is_finite() || !c.y.is_finite()) {
                return Err(UnionError::NonFinite);
            }
        }
        if polygon.exterior().0.len() < 4 {
            return Err(UnionError::Degenerate("exterior ring has fewer than four positions"));
        }
    }

    if mp.unsigned_area() == 0.0 { return Err(UnionError::Degenerate("zero area")) }
    Ok(())
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload.downcast_ref::<&str>().map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string())
}

#[cfg(test)]
mod tests {
    use geo::{polygon, Area, MultiPolygon};

    use super::*;

    fn unit_square(x: f64, y: f64) -> MultiPolygon<f64> {
        MultiPolygon(vec![polygon![
            (x: x, y: y), (x: x + 1.0, y: y), (x: x + 1.0, y: y + 1.0), (x: x, y: y + 1.0), (x: x, y: y),
        ]])
    }

    #[test]
    fn adjacent_squares_merge_into_one_polygon() {
        let merged = BooleanUnion.union(&unit_square(0.0, 0.0), &unit_square(1.0, 0.0)).unwrap();
        assert_eq!(merged.0.len(), 1);
        assert!((merged.unsigned_area() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn disjoint_squares_stay_separate() {
        let merged = BooleanUnion.union(&unit_square(0.0, 0.0), &unit_square(5.0, 5.0)).unwrap();
        assert_eq!(merged.0.len(), 2);
    }

    #[test]
    fn rejects_non_finite_operand() {
        let bad = MultiPolygon(vec![polygon![
            (x: 0.0, y: 0.0), (x: f64::NAN, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 0.0),
        ]]);
        assert_eq!(BooleanUnion.union(&unit_square(0.0, 0.0), &bad), Err(UnionError::NonFinite));
    }

    #[test]
    fn rejects_zero_area_operand() {
        let flat = MultiPolygon(vec![polygon![
            (x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 2.0, y: 0.0), (x: 0.0, y: 0.0),
        ]]);
        assert!(matches!(BooleanUnion.union(&flat, &unit_square(0.0, 0.0)), Err(UnionError::Degenerate(_))));
        assert!(matches!(
            BooleanUnion.union(&MultiPolygon(vec![]), &unit_square(0.0, 0.0)),
            Err(UnionError::Degenerate(_)),
        ));
    }
}
