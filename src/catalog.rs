//! Fixed catalog of standard shipping containers.
//!
//! The order of [`CONTAINER_CATALOG`] is ascending capacity and defines the
//! selection semantics: the selector takes the first entry that fits.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::model::{ContainerType, Envelope};

/// Identifier of a catalog entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ContainerKind {
    #[serde(rename = "20ft Standard")]
    TwentyFootStandard,
    #[serde(rename = "40ft High Cube")]
    FortyFootHighCube,
    #[serde(rename = "45ft High Cube")]
    FortyFiveFootHighCube,
}

impl ContainerKind {
    pub const ALL: [ContainerKind; 3] = [
        ContainerKind::TwentyFootStandard,
        ContainerKind::FortyFootHighCube,
        ContainerKind::FortyFiveFootHighCube,
    ];

    /// Short display name, also the wire identifier.
    pub const fn name(&self) -> &'static str {
        match self {
            ContainerKind::TwentyFootStandard => "20ft Standard",
            ContainerKind::FortyFootHighCube => "40ft High Cube",
            ContainerKind::FortyFiveFootHighCube => "45ft High Cube",
        }
    }

    /// The catalog entry for this identifier.
    pub fn container_type(&self) -> &'static ContainerType {
        match self {
            ContainerKind::TwentyFootStandard => &CONTAINER_CATALOG[0],
            ContainerKind::FortyFootHighCube => &CONTAINER_CATALOG[1],
            ContainerKind::FortyFiveFootHighCube => &CONTAINER_CATALOG[2],
        }
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown container type '{0}'")]
pub struct UnknownContainerKind(pub String);

/// Accepts the short name or the long form with a trailing "Container",
/// case-insensitive and whitespace-tolerant.
impl FromStr for ContainerKind {
    type Err = UnknownContainerKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let normalized = normalized
            .strip_suffix("container")
            .map(str::trim_end)
            .unwrap_or(&normalized);

        ContainerKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(normalized))
            .ok_or_else(|| UnknownContainerKind(s.to_string()))
    }
}

/// Standard containers in ascending capacity.
pub static CONTAINER_CATALOG: [ContainerType; 3] = [
    ContainerType {
        kind: ContainerKind::TwentyFootStandard,
        name: ContainerKind::TwentyFootStandard.name(),
        volume_capacity: 28.0,
        weight_capacity: 28_000.0,
        envelope: Envelope::new(589.0, 235.0, 239.0),
    },
    ContainerType {
        kind: ContainerKind::FortyFootHighCube,
        name: ContainerKind::FortyFootHighCube.name(),
        volume_capacity: 58.0,
        weight_capacity: 26_500.0,
        envelope: Envelope::new(1203.0, 235.0, 269.0),
    },
    ContainerType {
        kind: ContainerKind::FortyFiveFootHighCube,
        name: ContainerKind::FortyFiveFootHighCube.name(),
        volume_capacity: 76.0,
        weight_capacity: 29_000.0,
        envelope: Envelope::new(1355.0, 235.0, 269.0),
    },
];

/// Returns the catalog in declaration order.
pub fn catalog() -> &'static [ContainerType] {
    &CONTAINER_CATALOG
}

/// Resolves a manual container choice for the placement engine.
///
/// A missing or unrecognized identifier falls back to the first catalog entry.
pub fn resolve_manual_choice(selection: Option<&str>) -> &'static ContainerType {
    match selection.map(str::trim).filter(|s| !s.is_empty()) {
        None => &CONTAINER_CATALOG[0],
        Some(raw) => match raw.parse::<ContainerKind>() {
            Ok(kind) => kind.container_type(),
            Err(err) => {
                log::warn!(
                    "{}; placing into {} instead",
                    err,
                    CONTAINER_CATALOG[0].name
                );
                &CONTAINER_CATALOG[0]
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_ordered_by_volume_capacity() {
        let volumes: Vec<f64> = catalog().iter().map(|c| c.volume_capacity).collect();
        assert_eq!(volumes, vec![28.0, 58.0, 76.0]);
    }

    #[test]
    fn catalog_entries_match_their_kind() {
        for kind in ContainerKind::ALL {
            assert_eq!(kind.container_type().kind, kind);
            assert_eq!(kind.container_type().name, kind.name());
        }
    }

    #[test]
    fn parses_short_and_long_identifiers() {
        assert_eq!(
            "20ft Standard".parse::<ContainerKind>(),
            Ok(ContainerKind::TwentyFootStandard)
        );
        assert_eq!(
            "40ft High Cube Container".parse::<ContainerKind>(),
            Ok(ContainerKind::FortyFootHighCube)
        );
        assert_eq!(
            "  45FT HIGH CUBE  ".parse::<ContainerKind>(),
            Ok(ContainerKind::FortyFiveFootHighCube)
        );
        assert!("53ft Reefer".parse::<ContainerKind>().is_err());
    }

    #[test]
    fn manual_choice_falls_back_to_first_entry() {
        assert_eq!(resolve_manual_choice(None).kind, ContainerKind::TwentyFootStandard);
        assert_eq!(
            resolve_manual_choice(Some("")).kind,
            ContainerKind::TwentyFootStandard
        );
        assert_eq!(
            resolve_manual_choice(Some("unknown")).kind,
            ContainerKind::TwentyFootStandard
        );
        assert_eq!(
            resolve_manual_choice(Some("45ft High Cube Container")).envelope,
            Envelope::new(1355.0, 235.0, 269.0)
        );
    }

    #[test]
    fn kind_serializes_as_display_name() {
        let json = serde_json::to_string(&ContainerKind::FortyFootHighCube).unwrap();
        assert_eq!(json, "\"40ft High Cube\"");
    }
}
