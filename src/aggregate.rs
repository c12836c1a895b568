//! Volume and weight totals over normalized items.

use std::fmt;

use serde::Serialize;
use utoipa::ToSchema;

use crate::model::Item;
use crate::types::CM3_PER_M3;

/// Summed load of all valid items.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, ToSchema)]
pub struct AggregateTotals {
    /// Total volume in m³
    pub total_volume_m3: f64,
    /// Total weight in kg
    pub total_weight_kg: f64,
}

impl AggregateTotals {
    pub const fn new(total_volume_m3: f64, total_weight_kg: f64) -> Self {
        Self {
            total_volume_m3,
            total_weight_kg,
        }
    }
}

impl fmt::Display for AggregateTotals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.3} m³ / {:.1} kg",
            self.total_volume_m3, self.total_weight_kg
        )
    }
}

/// Sums volume and weight over all units of all items.
///
/// The volume is accumulated in cm³ and converted once, so it equals the
/// summed unit volumes of the placement divided by 1,000,000.
pub fn aggregate(items: &[Item]) -> AggregateTotals {
    let (volume_cm3, weight_kg) = items.iter().fold((0.0, 0.0), |(volume, weight), item| {
        (volume + item.total_volume_cm3(), weight + item.total_weight_kg())
    });
    AggregateTotals::new(volume_cm3 / CM3_PER_M3, weight_kg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EPSILON_GENERAL;

    #[test]
    fn empty_list_yields_zero_totals() {
        assert_eq!(aggregate(&[]), AggregateTotals::default());
    }

    #[test]
    fn sums_over_quantities() {
        let items = vec![
            Item::new("a", (50.0, 40.0, 30.0), 20.0, 2),
            Item::new("b", (100.0, 100.0, 100.0), 150.0, 3),
        ];
        let totals = aggregate(&items);
        assert!((totals.total_volume_m3 - 3.12).abs() < EPSILON_GENERAL);
        assert!((totals.total_weight_kg - 490.0).abs() < EPSILON_GENERAL);
    }

    #[test]
    fn display_uses_form_precision() {
        let totals = AggregateTotals::new(0.12, 40.0);
        assert_eq!(totals.to_string(), "0.120 m³ / 40.0 kg");
    }
}
