//! First-fit container selection over the catalog.
//!
//! The catalog is scanned in declaration order and the first entry whose volume
//! and weight capacities both dominate the totals wins. This is not a
//! smallest-fit search: reordering the catalog changes the result.

use std::fmt;

use crate::aggregate::AggregateTotals;
use crate::model::ContainerType;

/// Outcome of the container selection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SelectionResult {
    /// A single container holds the load.
    Selected {
        container: &'static ContainerType,
        /// Unused volume in m³, never negative
        remaining_volume: f64,
        /// Unused payload in kg, never negative
        remaining_weight: f64,
    },
    /// No catalog entry satisfies both limits; the load must be split.
    Overflow,
}

impl SelectionResult {
    pub fn container(&self) -> Option<&'static ContainerType> {
        match self {
            SelectionResult::Selected { container, .. } => Some(container),
            SelectionResult::Overflow => None,
        }
    }

    /// Remaining volume in m³; zero on overflow.
    pub fn remaining_volume(&self) -> f64 {
        match self {
            SelectionResult::Selected {
                remaining_volume, ..
            } => *remaining_volume,
            SelectionResult::Overflow => 0.0,
        }
    }

    /// Remaining weight in kg; zero on overflow.
    pub fn remaining_weight(&self) -> f64 {
        match self {
            SelectionResult::Selected {
                remaining_weight, ..
            } => *remaining_weight,
            SelectionResult::Overflow => 0.0,
        }
    }

    pub fn is_overflow(&self) -> bool {
        matches!(self, SelectionResult::Overflow)
    }
}

impl fmt::Display for SelectionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionResult::Selected {
                container,
                remaining_volume,
                remaining_weight,
            } => write!(
                f,
                "{} ({:.2} m³ and {:.1} kg remaining)",
                container.name, remaining_volume, remaining_weight
            ),
            SelectionResult::Overflow => write!(
                f,
                "Exceeds standard container limits, split into multiple containers"
            ),
        }
    }
}

/// Picks the first catalog entry that can hold the totals.
///
/// Both comparisons are inclusive: a load exactly at capacity fits.
///
/// # Parameters
/// * `totals` - Aggregated volume and weight
/// * `catalog` - Container types in their declared order
pub fn select_container(
    totals: &AggregateTotals,
    catalog: &'static [ContainerType],
) -> SelectionResult {
    catalog
        .iter()
        .find(|entry| entry.can_hold(totals.total_volume_m3, totals.total_weight_kg))
        .map(|container| SelectionResult::Selected {
            container,
            remaining_volume: container.volume_capacity - totals.total_volume_m3,
            remaining_weight: container.weight_capacity - totals.total_weight_kg,
        })
        .unwrap_or(SelectionResult::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ContainerKind, catalog};
    use crate::types::EPSILON_GENERAL;

    fn select(volume: f64, weight: f64) -> SelectionResult {
        select_container(&AggregateTotals::new(volume, weight), catalog())
    }

    fn selected_kind(volume: f64, weight: f64) -> Option<ContainerKind> {
        select(volume, weight).container().map(|c| c.kind)
    }

    #[test]
    fn small_load_selects_twenty_foot() {
        let result = select(0.12, 40.0);
        assert_eq!(
            result.container().map(|c| c.kind),
            Some(ContainerKind::TwentyFootStandard)
        );
        assert!((result.remaining_volume() - 27.88).abs() < EPSILON_GENERAL);
        assert!((result.remaining_weight() - 27_960.0).abs() < EPSILON_GENERAL);
    }

    #[test]
    fn capacity_boundaries_are_inclusive() {
        let at_volume = select(28.0, 100.0);
        assert_eq!(
            at_volume.container().map(|c| c.kind),
            Some(ContainerKind::TwentyFootStandard)
        );
        assert_eq!(at_volume.remaining_volume(), 0.0);

        let at_weight = select(1.0, 28_000.0);
        assert_eq!(
            at_weight.container().map(|c| c.kind),
            Some(ContainerKind::TwentyFootStandard)
        );
        assert_eq!(at_weight.remaining_weight(), 0.0);

        assert_eq!(
            selected_kind(76.0, 29_000.0),
            Some(ContainerKind::FortyFiveFootHighCube)
        );
    }

    #[test]
    fn heavy_load_skips_forty_foot_by_weight() {
        // 40ft has more volume but less payload than the 20ft entry
        assert_eq!(
            selected_kind(30.0, 27_000.0),
            Some(ContainerKind::FortyFiveFootHighCube)
        );
        assert_eq!(
            selected_kind(30.0, 26_500.0),
            Some(ContainerKind::FortyFootHighCube)
        );
    }

    #[test]
    fn overflow_reports_no_container_and_zero_remaining() {
        let result = select(80.0, 1_000.0);
        assert!(result.is_overflow());
        assert!(result.container().is_none());
        assert_eq!(result.remaining_volume(), 0.0);
        assert_eq!(result.remaining_weight(), 0.0);

        assert!(select(10.0, 29_000.5).is_overflow());
    }

    #[test]
    fn selection_is_monotonic() {
        let volumes = [0.0, 5.0, 27.9, 28.0, 40.0, 58.0, 60.0, 76.0, 80.0];
        let weights = [0.0, 1_000.0, 26_500.0, 27_000.0, 28_000.0, 29_000.0, 30_000.0];

        for &v2 in &volumes {
            for &w2 in &weights {
                let Some(larger_fit) = select(v2, w2).container() else {
                    continue;
                };
                for &v1 in volumes.iter().filter(|&&v| v <= v2) {
                    for &w1 in weights.iter().filter(|&&w| w <= w2) {
                        assert!(
                            larger_fit.can_hold(v1, w1),
                            "({}, {}) fits {} but ({}, {}) does not",
                            v2,
                            w2,
                            larger_fit.name,
                            v1,
                            w1
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn zero_load_selects_first_entry() {
        assert_eq!(
            selected_kind(0.0, 0.0),
            Some(ContainerKind::TwentyFootStandard)
        );
    }

    #[test]
    fn overflow_message_asks_for_split() {
        assert!(SelectionResult::Overflow.to_string().contains("split"));
    }
}
