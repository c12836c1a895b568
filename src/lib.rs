//! Container load planning: volume and weight totals, first-fit container
//! selection and a deterministic shelf placement for 3D visualization.

pub mod aggregate;
pub mod api;
pub mod catalog;
pub mod config;
pub mod model;
pub mod normalizer;
pub mod placement;
pub mod planner;
pub mod pricing;
pub mod selector;
pub mod types;
