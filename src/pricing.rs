//! Request payload and HTTP client for the remote freight pricing service.
//!
//! The service consumes the planner's aggregate output and answers with a cost
//! breakdown. The breakdown is passed through untouched.

use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::config::PricingConfig;
use crate::model::Item;

/// Origin and destination ports of a shipment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Route {
    pub origin: String,
    pub destination: String,
}

impl Route {
    pub const DEFAULT_ORIGIN: &'static str = "Nhava Sheva (JNPT)";
    pub const DEFAULT_DESTINATION: &'static str = "Los Angeles";
}

impl Default for Route {
    fn default() -> Self {
        Self {
            origin: Self::DEFAULT_ORIGIN.to_string(),
            destination: Self::DEFAULT_DESTINATION.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
pub struct PricingDimensions {
    #[serde(rename = "L")]
    pub length: f64,
    pub w: f64,
    pub h: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
pub struct PricingItem {
    #[serde(rename = "productName")]
    pub product_name: String,
    pub dimensions: PricingDimensions,
    pub weight: f64,
    pub quantity: u32,
    pub properties: String,
}

impl PricingItem {
    pub fn from_item(item: &Item) -> Self {
        Self {
            product_name: item.name.clone(),
            dimensions: PricingDimensions {
                length: item.length,
                w: item.width,
                h: item.height,
            },
            weight: item.weight,
            quantity: item.quantity,
            properties: handling_properties(item.stackable, item.fragile).to_string(),
        }
    }
}

/// Summarizes the handling flags as the pricing service expects them.
///
/// The service matches on these exact literals, including `fragila`.
pub fn handling_properties(stackable: bool, fragile: bool) -> &'static str {
    match (stackable, fragile) {
        (true, true) => "stackable, fragila",
        (true, false) => "stackable",
        (false, true) => "fragila",
        (false, false) => "",
    }
}

/// Wire payload sent to the pricing service.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
pub struct PricingRequest {
    #[serde(rename = "Items")]
    pub items: Vec<PricingItem>,
    /// Total cargo weight in kg, one decimal
    #[serde(rename = "containerweight")]
    pub container_weight: String,
    #[serde(rename = "originport")]
    pub origin_port: String,
    #[serde(rename = "destinationport")]
    pub destination_port: String,
    /// The manually chosen container type, verbatim
    #[serde(rename = "containertype")]
    pub container_type: String,
}

impl PricingRequest {
    /// Builds the payload from normalized items and the computed total weight.
    pub fn new(items: &[Item], total_weight_kg: f64, route: &Route, container_type: &str) -> Self {
        Self {
            items: items.iter().map(PricingItem::from_item).collect(),
            container_weight: format!("{:.1}", total_weight_kg),
            origin_port: route.origin.clone(),
            destination_port: route.destination.clone(),
            container_type: container_type.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum PricingError {
    #[error("pricing request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("pricing service answered {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("pricing response has no 'data' member")]
    MissingData,
}

fn user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("container-load-planner/{version}")
}

/// Client for the pricing endpoint.
#[derive(Clone, Debug)]
pub struct PricingClient {
    http: reqwest::Client,
    endpoint: String,
}

impl PricingClient {
    /// Creates a client for `endpoint` with the given request timeout.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, PricingError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent())
            .build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    /// Creates a client if pricing is enabled in the configuration.
    pub fn from_config(config: &PricingConfig) -> Result<Option<Self>, PricingError> {
        config
            .endpoint()
            .map(|endpoint| Self::new(endpoint, config.timeout()))
            .transpose()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends the payload and returns the service's `data` member.
    pub async fn quote(&self, request: &PricingRequest) -> Result<serde_json::Value, PricingError> {
        let response = self.http.post(&self.endpoint).json(request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("unreadable body"));
            return Err(PricingError::Status { status, body });
        }

        let body: serde_json::Value = response.json().await?;
        extract_data(body)
    }
}

fn extract_data(mut body: serde_json::Value) -> Result<serde_json::Value, PricingError> {
    match body.get_mut("data").map(serde_json::Value::take) {
        Some(serde_json::Value::Null) | None => Err(PricingError::MissingData),
        Some(data) => Ok(data),
    }
}
