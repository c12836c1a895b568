//! End-to-end load planning over raw form records.
//!
//! Two independent branches share the normalized items: the selector suggests
//! the first catalog container that can hold the totals, while placement lays
//! the units out in the container the user picked manually. The two containers
//! are never compared; placing into a container that is too small is allowed.

use crate::aggregate::{AggregateTotals, aggregate};
use crate::catalog::{catalog, resolve_manual_choice};
use crate::model::{ContainerType, Item, RawItem};
use crate::normalizer::{NormalizedItems, normalize_items};
use crate::placement::{PlacementConfig, PlacementPlan, place_items_with_config};
use crate::pricing::{PricingRequest, Route};
use crate::selector::{SelectionResult, select_container};

/// Everything computed for one set of raw records.
#[derive(Clone, Debug)]
pub struct LoadPlan {
    /// Valid items in input order
    pub items: Vec<Item>,
    /// Records dropped by the normalizer
    pub dropped_items: usize,
    pub totals: AggregateTotals,
    /// Suggested container
    pub selection: SelectionResult,
    /// Manual choice as given, if any
    pub manual_selection: Option<String>,
    /// Container whose envelope was used for placement
    pub placement_container: &'static ContainerType,
    pub placement: PlacementPlan,
}

impl LoadPlan {
    /// True when the manual choice differs from the suggestion.
    ///
    /// Purely informational; nothing in the plan depends on it.
    pub fn placement_differs_from_suggestion(&self) -> bool {
        self.selection
            .container()
            .is_none_or(|suggested| suggested.kind != self.placement_container.kind)
    }

    /// Payload for the pricing service.
    pub fn pricing_request(&self, route: &Route) -> PricingRequest {
        PricingRequest::new(
            &self.items,
            self.totals.total_weight_kg,
            route,
            self.manual_selection.as_deref().unwrap_or_default(),
        )
    }
}

/// Runs normalization, aggregation, selection and placement.
///
/// # Parameters
/// * `raw_items` - Records as entered
/// * `manual_selection` - Container identifier picked for placement
/// * `config` - Shelf spacing
pub fn plan_load(
    raw_items: &[RawItem],
    manual_selection: Option<&str>,
    config: PlacementConfig,
) -> LoadPlan {
    plan_normalized(normalize_items(raw_items), manual_selection, config)
}

/// Same as [`plan_load`] for records that were already normalized.
pub fn plan_normalized(
    normalized: NormalizedItems,
    manual_selection: Option<&str>,
    config: PlacementConfig,
) -> LoadPlan {
    let totals = aggregate(&normalized.items);
    let selection = select_container(&totals, catalog());

    let placement_container = resolve_manual_choice(manual_selection);
    let placement =
        place_items_with_config(&normalized.items, placement_container.envelope, config);

    LoadPlan {
        items: normalized.items,
        dropped_items: normalized.dropped,
        totals,
        selection,
        manual_selection: manual_selection.map(str::to_string),
        placement_container,
        placement,
    }
}
