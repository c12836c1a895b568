//! Data models for the container load planner.
//!
//! This module defines the records flowing through the planning pipeline:
//! - `RawItem`: a cargo line as it arrives from the form layer (free-form fields)
//! - `Item`: a normalized cargo line with strict numeric fields
//! - `ContainerType`: a catalog entry with capacity and interior envelope
//! - `Envelope`: the interior dimensions used by the placement engine

use serde::{Deserialize, Serialize};
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToSchema;

use crate::catalog::ContainerKind;
use crate::types::{Dimensional, Vec3, Weighted};

/// A numeric field as typed into the form: either a JSON number or free text.
///
/// Anything else (`null` from a failed client-side parse, booleans, nested
/// values) lands in `Other` so the record can be dropped on its own instead of
/// failing the whole request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum RawField {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl Default for RawField {
    fn default() -> Self {
        RawField::Text(String::new())
    }
}

impl From<&str> for RawField {
    fn from(value: &str) -> Self {
        RawField::Text(value.to_string())
    }
}

impl From<f64> for RawField {
    fn from(value: f64) -> Self {
        RawField::Number(value)
    }
}

fn default_quantity() -> RawField {
    RawField::Number(1.0)
}

/// One cargo line before normalization.
///
/// Only `name` and the flags are taken verbatim; every numeric field is parsed
/// by the normalizer and the whole record is dropped if any of them fails.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "name": "Crate",
    "length": "50",
    "width": "40",
    "height": "30",
    "weight": "20",
    "quantity": 2,
    "stackable": true,
    "fragile": false
}))]
pub struct RawItem {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub length: RawField,
    #[serde(default)]
    pub width: RawField,
    #[serde(default)]
    pub height: RawField,
    #[serde(default)]
    pub weight: RawField,
    #[serde(default = "default_quantity")]
    pub quantity: RawField,
    #[serde(default)]
    pub stackable: bool,
    #[serde(default)]
    pub fragile: bool,
}

/// Same values a deserialized `{}` gets.
impl Default for RawItem {
    fn default() -> Self {
        Self {
            name: String::new(),
            length: RawField::default(),
            width: RawField::default(),
            height: RawField::default(),
            weight: RawField::default(),
            quantity: default_quantity(),
            stackable: false,
            fragile: false,
        }
    }
}

impl RawItem {
    /// Creates a raw record from text fields, the way the form delivers them.
    pub fn from_text(
        name: &str,
        dims: (&str, &str, &str),
        weight: &str,
        quantity: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            length: dims.0.into(),
            width: dims.1.into(),
            height: dims.2.into(),
            weight: weight.into(),
            quantity: quantity.into(),
            stackable: false,
            fragile: false,
        }
    }
}

/// A normalized cargo line.
///
/// Dimensions are centimeters, weight is kilograms. `stackable` and `fragile`
/// are carried through but not enforced by selection or placement.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
pub struct Item {
    pub name: String,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub weight: f64,
    pub quantity: u32,
    pub stackable: bool,
    pub fragile: bool,
}

impl Item {
    /// Creates an item with both flags cleared.
    ///
    /// # Examples
    /// ```
    /// use container_load_planner::model::Item;
    ///
    /// let item = Item::new("Crate", (50.0, 40.0, 30.0), 20.0, 2);
    /// assert_eq!(item.total_weight_kg(), 40.0);
    /// assert_eq!(item.total_volume_cm3(), 120_000.0);
    /// ```
    pub fn new(name: &str, dims: (f64, f64, f64), weight: f64, quantity: u32) -> Self {
        Self {
            name: name.to_string(),
            length: dims.0,
            width: dims.1,
            height: dims.2,
            weight,
            quantity,
            stackable: false,
            fragile: false,
        }
    }

    /// Sets the advisory handling flags.
    pub fn with_flags(mut self, stackable: bool, fragile: bool) -> Self {
        self.stackable = stackable;
        self.fragile = fragile;
        self
    }

    /// Volume of a single unit in cubic centimeters.
    pub fn unit_volume_cm3(&self) -> f64 {
        self.length * self.width * self.height
    }

    /// Volume of all units in cubic centimeters.
    pub fn total_volume_cm3(&self) -> f64 {
        self.unit_volume_cm3() * f64::from(self.quantity)
    }

    /// Weight of all units in kilograms.
    pub fn total_weight_kg(&self) -> f64 {
        self.weight_kg() * f64::from(self.quantity)
    }
}

/// Height is the vertical axis; length and width span the floor.
impl Dimensional for Item {
    fn extent(&self) -> Vec3 {
        Vec3::new(self.length, self.height, self.width)
    }
}

impl Weighted for Item {
    fn weight_kg(&self) -> f64 {
        self.weight
    }
}

/// Interior dimensions of a container in centimeters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, ToSchema)]
pub struct Envelope {
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

impl Envelope {
    pub const fn new(length: f64, width: f64, height: f64) -> Self {
        Self {
            length,
            width,
            height,
        }
    }
}

/// A container catalog entry.
///
/// # Fields
/// * `kind` - Identifier of the entry
/// * `name` - Display name
/// * `volume_capacity` - Loadable volume in m³
/// * `weight_capacity` - Maximum payload in kg
/// * `envelope` - Interior dimensions in cm
#[derive(Clone, Copy, Debug, PartialEq, Serialize, ToSchema)]
pub struct ContainerType {
    pub kind: ContainerKind,
    #[schema(value_type = String)]
    pub name: &'static str,
    pub volume_capacity: f64,
    pub weight_capacity: f64,
    pub envelope: Envelope,
}

impl ContainerType {
    /// Checks both capacity limits, inclusive.
    pub fn can_hold(&self, volume_m3: f64, weight_kg: f64) -> bool {
        volume_m3 <= self.volume_capacity && weight_kg <= self.weight_capacity
    }
}
