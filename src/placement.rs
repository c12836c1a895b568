//! Shelf placement of item instances inside a container envelope.
//!
//! Units are laid out greedily along the container length, wrapping to the
//! next row across the width and then to the next layer upwards. There is no
//! rotation, no backtracking and no height check: layers keep stacking above
//! the roof and are only counted in the [`PlacementSummary`].
//!
//! Coordinates are centered on the container footprint (`x`, `z`) with `y`
//! measured from the floor. Every unit is reported by its center point.

use serde::Serialize;
use utoipa::ToSchema;

use crate::model::{Envelope, Item};
use crate::types::{BoundingBox, Dimensional, EPSILON_GENERAL, Vec3};

/// Spacing parameters for the shelf layout.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlacementConfig {
    /// Distance of the first row and column from the container walls (cm)
    pub margin: f64,
    /// Gap between neighbouring units on every axis (cm)
    pub gap: f64,
}

impl PlacementConfig {
    pub const DEFAULT_MARGIN: f64 = 10.0;
    pub const DEFAULT_GAP: f64 = 5.0;

    pub fn builder() -> PlacementConfigBuilder {
        PlacementConfigBuilder::default()
    }
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            margin: Self::DEFAULT_MARGIN,
            gap: Self::DEFAULT_GAP,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct PlacementConfigBuilder {
    config: PlacementConfig,
}

impl PlacementConfigBuilder {
    pub fn margin(mut self, margin: f64) -> Self {
        self.config.margin = margin;
        self
    }

    pub fn gap(mut self, gap: f64) -> Self {
        self.config.gap = gap;
        self
    }

    pub fn build(self) -> PlacementConfig {
        self.config
    }
}

/// One physical instance of an item.
///
/// # Fields
/// * `item_index` - Position of the source item in the normalized list
/// * `instance` - 0-based index within the item's quantity
/// * `center` - Center point in the container frame
/// * `extent` - Size along (x, y, z): length, height, width of the item
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
pub struct PlacementUnit {
    pub item_index: usize,
    pub instance: u32,
    pub center: Vec3,
    pub extent: Vec3,
}

impl PlacementUnit {
    #[inline]
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_center_and_extent(self.center, self.extent)
    }

    /// Checks whether the top face lies above the envelope height.
    pub fn exceeds_height(&self, envelope: &Envelope) -> bool {
        self.bounding_box().top() > envelope.height + EPSILON_GENERAL
    }
}

impl Dimensional for PlacementUnit {
    fn extent(&self) -> Vec3 {
        self.extent
    }
}

/// Aggregate figures about a placement run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, ToSchema)]
pub struct PlacementSummary {
    pub unit_count: usize,
    /// Sum of unit volumes in cm³
    pub placed_volume_cm3: f64,
    /// Number of layers holding at least one unit
    pub layer_count: usize,
    /// Units whose top face is above the envelope height
    pub units_above_roof: usize,
}

/// Result of a placement run.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
pub struct PlacementPlan {
    pub envelope: Envelope,
    pub units: Vec<PlacementUnit>,
    pub summary: PlacementSummary,
}

impl PlacementPlan {
    /// True if every unit stays below the envelope height.
    pub fn fits_height(&self) -> bool {
        self.summary.units_above_roof == 0
    }
}

/// Events emitted while placing, for live visualization.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type")]
pub enum PlacementEvent {
    /// The first unit of a new layer is about to be placed.
    LayerStarted { layer: usize, floor_y: f64 },
    /// A unit was placed.
    UnitPlaced {
        item_index: usize,
        instance: u32,
        center: Vec3,
        extent: Vec3,
    },
    /// Placement finished.
    Finished {
        units: usize,
        layers: usize,
        units_above_roof: usize,
    },
}

/// Places all units with the default margin and gap.
///
/// # Examples
/// ```
/// use container_load_planner::model::{Envelope, Item};
/// use container_load_planner::placement::place_items;
///
/// let items = vec![Item::new("Crate", (50.0, 40.0, 30.0), 20.0, 2)];
/// let plan = place_items(&items, Envelope::new(589.0, 235.0, 239.0));
/// assert_eq!(plan.units.len(), 2);
/// assert_eq!(plan.units[1].center.x - plan.units[0].center.x, 55.0);
/// ```
pub fn place_items(items: &[Item], envelope: Envelope) -> PlacementPlan {
    place_items_with_config(items, envelope, PlacementConfig::default())
}

/// Like `place_items`, with custom spacing.
pub fn place_items_with_config(
    items: &[Item],
    envelope: Envelope,
    config: PlacementConfig,
) -> PlacementPlan {
    place_items_with_progress(items, envelope, config, |_| {})
}

/// Cursor over the shelf layout.
struct ShelfCursor {
    x: f64,
    y: f64,
    z: f64,
    row_start_x: f64,
    row_start_z: f64,
    half_length: f64,
    half_width: f64,
    gap: f64,
}

impl ShelfCursor {
    fn new(envelope: &Envelope, config: &PlacementConfig) -> Self {
        let half_length = envelope.length / 2.0;
        let half_width = envelope.width / 2.0;
        let row_start_x = -half_length + config.margin;
        let row_start_z = -half_width + config.margin;
        Self {
            x: row_start_x,
            y: 0.0,
            z: row_start_z,
            row_start_x,
            row_start_z,
            half_length,
            half_width,
            gap: config.gap,
        }
    }

    fn center_for(&self, extent: Vec3) -> Vec3 {
        Vec3::new(
            self.x + extent.x / 2.0,
            self.y + extent.y / 2.0,
            self.z + extent.z / 2.0,
        )
    }

    /// Moves past a unit of the given extent.
    ///
    /// The wrap tests use the extent of the unit just placed, not the next one.
    fn advance(&mut self, extent: Vec3) {
        self.x += extent.x + self.gap;
        if self.x + extent.x > self.half_length {
            self.x = self.row_start_x;
            self.z += extent.z + self.gap;
            if self.z + extent.z > self.half_width {
                self.z = self.row_start_z;
                self.y += extent.y + self.gap;
            }
        }
    }
}

/// Places all units and reports each step to `on_event`.
///
/// Units follow item order, then instance order. The output is a pure
/// function of the inputs.
pub fn place_items_with_progress(
    items: &[Item],
    envelope: Envelope,
    config: PlacementConfig,
    mut on_event: impl FnMut(&PlacementEvent),
) -> PlacementPlan {
    let total_units: usize = items.iter().map(|item| item.quantity as usize).sum();
    let mut units = Vec::with_capacity(total_units);
    let mut summary = PlacementSummary::default();
    let mut cursor = ShelfCursor::new(&envelope, &config);
    let mut current_floor: Option<f64> = None;

    for (item_index, item) in items.iter().enumerate() {
        let extent = item.extent();
        for instance in 0..item.quantity {
            if current_floor != Some(cursor.y) {
                current_floor = Some(cursor.y);
                summary.layer_count += 1;
                on_event(&PlacementEvent::LayerStarted {
                    layer: summary.layer_count,
                    floor_y: cursor.y,
                });
            }

            let unit = PlacementUnit {
                item_index,
                instance,
                center: cursor.center_for(extent),
                extent,
            };
            summary.unit_count += 1;
            summary.placed_volume_cm3 += extent.volume();
            if unit.exceeds_height(&envelope) {
                summary.units_above_roof += 1;
            }
            on_event(&PlacementEvent::UnitPlaced {
                item_index,
                instance,
                center: unit.center,
                extent,
            });
            units.push(unit);

            cursor.advance(extent);
        }
    }

    if summary.units_above_roof > 0 {
        log::debug!(
            "{} of {} units stacked above the {} cm roof",
            summary.units_above_roof,
            summary.unit_count,
            envelope.height
        );
    }

    on_event(&PlacementEvent::Finished {
        units: summary.unit_count,
        layers: summary.layer_count,
        units_above_roof: summary.units_above_roof,
    });

    PlacementPlan {
        envelope,
        units,
        summary,
    }
}
