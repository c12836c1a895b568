//! REST API for the load planner.
//!
//! Provides HTTP endpoints for the calculator form and the 3D viewer.
//! Uses Axum as the web framework and supports CORS.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::{
    Router,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
#[allow(unused_imports)]
use serde_json::json;
use std::sync::OnceLock;
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::ReceiverStream;
use tower_http::cors::{Any, CorsLayer};
use utoipa::{OpenApi, ToSchema};

use crate::aggregate::AggregateTotals;
use crate::catalog::{ContainerKind, catalog, resolve_manual_choice};
use crate::config::{ApiConfig, PlacementSettings, PricingConfig};
use crate::model::{ContainerType, Envelope, Item, RawField, RawItem};
use crate::normalizer::{NormalizedItems, normalize_items};
use crate::placement::{
    PlacementConfig, PlacementPlan, PlacementSummary, PlacementUnit, place_items_with_progress,
};
use crate::planner::{LoadPlan, plan_normalized};
use crate::pricing::{PricingClient, Route};
use crate::selector::SelectionResult;
use crate::types::Vec3;

/// Upper bound on placement units per request.
const MAX_PLACEMENT_UNITS: u64 = 100_000;

#[derive(Clone)]
struct ApiState {
    placement: PlacementConfig,
    pricing: Option<PricingClient>,
    default_route: Route,
}

static OPENAPI_DOC: OnceLock<utoipa::openapi::OpenApi> = OnceLock::new();

const SWAGGER_UI_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
    <head>
        <meta charset="utf-8" />
        <title>container-load-planner API Docs</title>
        <link
            rel="stylesheet"
            href="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui.css"
            integrity="sha384-wxLW6kwyHktdDGr6Pv1zgm/VGJh99lfUbzSn6HNHBENZlCN7W602k9VkGdxuFvPn"
            crossorigin="anonymous"
        />
    </head>
    <body>
        <div id="swagger-ui"></div>
        <script
            src="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui-bundle.js"
            integrity="sha384-wmyclcVGX/WhUkdkATwhaK1X1JtiNrr2EoYJ+diV3vj4v6OC5yCeSu+yW13SYJep"
            crossorigin="anonymous"
        ></script>
        <script>
            window.onload = function () {
                window.ui = SwaggerUIBundle({
                    url: "/docs/openapi.json",
                    dom_id: "#swagger-ui",
                });
            };
        </script>
    </body>
    </html>"##;

fn openapi_doc() -> &'static utoipa::openapi::OpenApi {
    OPENAPI_DOC.get_or_init(ApiDoc::openapi)
}

/// Request structure shared by the calculation and streaming endpoints.
///
/// `container_type` is the manual choice used for placement; it does not
/// influence the suggested container.
#[derive(Deserialize, ToSchema)]
#[schema(
    example = json!({
        "items": [
            {
                "name": "Crate",
                "length": "50",
                "width": "40",
                "height": "30",
                "weight": "20",
                "quantity": 2,
                "stackable": true,
                "fragile": false
            }
        ],
        "container_type": "20ft Standard",
        "route": { "origin": "Nhava Sheva (JNPT)", "destination": "Los Angeles" }
    })
)]
pub struct CalculateRequest {
    pub items: Vec<RawItem>,
    #[serde(default)]
    #[schema(nullable = true)]
    pub container_type: Option<String>,
    #[serde(default)]
    #[schema(nullable = true)]
    pub route: Option<Route>,
}

#[derive(Debug)]
enum CalculateRequestValidationError {
    TooManyUnits(u64),
}

/// Request with its records already normalized.
struct ValidatedCalculateRequest {
    items: NormalizedItems,
    container_type: Option<String>,
    route: Option<Route>,
}

impl CalculateRequest {
    /// Normalizes the records and rejects requests whose valid items would
    /// expand into too many units.
    fn into_validated(self) -> Result<ValidatedCalculateRequest, CalculateRequestValidationError> {
        let items = normalize_items(&self.items);
        let units: u64 = items
            .items
            .iter()
            .map(|item| u64::from(item.quantity))
            .sum();
        if units > MAX_PLACEMENT_UNITS {
            return Err(CalculateRequestValidationError::TooManyUnits(units));
        }
        Ok(ValidatedCalculateRequest {
            items,
            container_type: self.container_type,
            route: self.route,
        })
    }
}

/// Suggested container in the response.
#[derive(Serialize, ToSchema)]
pub struct SelectionResponse {
    /// `selected` or `overflow`
    pub status: String,
    #[schema(nullable = true)]
    pub container: Option<ContainerType>,
    /// Remaining volume in m³ (0 on overflow)
    pub remaining_volume: f64,
    /// Remaining weight in kg (0 on overflow)
    pub remaining_weight: f64,
    pub message: String,
}

impl SelectionResponse {
    fn from_selection(selection: &SelectionResult) -> Self {
        let status = if selection.is_overflow() {
            "overflow"
        } else {
            "selected"
        };
        Self {
            status: status.to_string(),
            container: selection.container().copied(),
            remaining_volume: selection.remaining_volume(),
            remaining_weight: selection.remaining_weight(),
            message: selection.to_string(),
        }
    }
}

/// Response of the calculation endpoint.
#[derive(Serialize, ToSchema)]
pub struct CalculateResponse {
    pub totals: AggregateTotals,
    pub selection: SelectionResponse,
    /// Container whose envelope was used for placement
    pub placement_container: ContainerKind,
    pub placement: PlacementPlan,
    /// Records skipped because a numeric field could not be parsed
    pub dropped_items: usize,
    /// Opaque cost breakdown from the pricing service, if available
    #[schema(value_type = Option<Object>, nullable = true)]
    pub pricing: Option<serde_json::Value>,
}

impl CalculateResponse {
    pub fn from_plan(plan: LoadPlan, pricing: Option<serde_json::Value>) -> Self {
        let LoadPlan {
            dropped_items,
            totals,
            selection,
            placement_container,
            placement,
            ..
        } = plan;

        Self {
            totals,
            selection: SelectionResponse::from_selection(&selection),
            placement_container: placement_container.kind,
            placement,
            dropped_items,
            pricing,
        }
    }
}

#[derive(Serialize, ToSchema)]
struct ErrorResponse {
    error: String,
    details: String,
}

impl ErrorResponse {
    fn new(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: details.into(),
        }
    }
}

fn error_response(
    status: StatusCode,
    error: impl Into<String>,
    details: impl Into<String>,
) -> Response {
    (status, Json(ErrorResponse::new(error, details))).into_response()
}

fn json_deserialize_error(err: JsonRejection) -> Response {
    error_response(
        StatusCode::UNPROCESSABLE_ENTITY,
        "Invalid JSON data",
        err.to_string(),
    )
}

fn validation_error(details: impl Into<String>) -> Response {
    error_response(
        StatusCode::UNPROCESSABLE_ENTITY,
        "Invalid input data",
        details,
    )
}

fn parse_calculate_request(
    payload: Result<Json<CalculateRequest>, JsonRejection>,
) -> Result<ValidatedCalculateRequest, Response> {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(err) => return Err(json_deserialize_error(err)),
    };

    match payload.into_validated() {
        Ok(request) => Ok(request),
        Err(CalculateRequestValidationError::TooManyUnits(units)) => Err(validation_error(
            format!(
                "{} units requested, at most {} can be placed per request",
                units, MAX_PLACEMENT_UNITS
            ),
        )),
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(handle_catalog, handle_calculate, handle_placement_stream),
    components(
        schemas(
            CalculateRequest,
            CalculateResponse,
            SelectionResponse,
            ErrorResponse,
            RawItem,
            RawField,
            Route,
            ContainerType,
            ContainerKind,
            Envelope,
            AggregateTotals,
            PlacementPlan,
            PlacementUnit,
            PlacementSummary,
            Vec3
        )
    ),
    tags((name = "planning", description = "Endpoints for container load planning"))
)]
struct ApiDoc;

/// Starts the API server.
///
/// Configures CORS for cross-origin requests from the frontend.
/// Blocks until the server is terminated.
pub async fn start_api_server(
    config: ApiConfig,
    placement: PlacementSettings,
    pricing_config: PricingConfig,
) {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let pricing = match PricingClient::from_config(&pricing_config) {
        Ok(Some(client)) => {
            log::info!("Pricing service enabled at {}", client.endpoint());
            Some(client)
        }
        Ok(None) => {
            log::info!("Pricing service disabled (LOAD_PLANNER_PRICING_URL not set)");
            None
        }
        Err(err) => {
            log::error!("Could not create pricing client, pricing disabled: {err}");
            None
        }
    };

    let state = ApiState {
        placement: placement.placement_config(),
        pricing,
        default_route: pricing_config.default_route().clone(),
    };

    let app = router(state).layer(cors);

    let addr = config.socket_addr();
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            log::error!("Could not bind API server to {}: {}", addr, err);
            return;
        }
    };

    log::info!(
        "Server running on http://{}:{}",
        config.display_host(),
        config.port()
    );
    if config.binds_to_all_interfaces() {
        log::info!("Local access: http://localhost:{}", config.port());
    }
    log::info!("Endpoints: GET /catalog, POST /calculate, POST /placement_stream, GET /docs");

    if let Err(err) = axum::serve(listener, app).await {
        log::error!("API server terminated with an error: {err}");
    }
}

fn router(state: ApiState) -> Router {
    Router::new()
        .route("/catalog", get(handle_catalog))
        .route("/calculate", post(handle_calculate))
        .route("/placement_stream", post(handle_placement_stream))
        .route("/docs/openapi.json", get(serve_openapi_json))
        .route("/docs", get(serve_openapi_ui))
        .with_state(state)
}

/// Handler for GET /catalog.
///
/// Lists the container types in selection order.
#[utoipa::path(
    get,
    path = "/catalog",
    responses(
        (status = 200, description = "Container catalog in selection order", body = [ContainerType])
    ),
    tag = "planning"
)]
async fn handle_catalog() -> Json<Vec<ContainerType>> {
    Json(catalog().to_vec())
}

/// Handler for POST /calculate.
///
/// Computes totals, the suggested container and the placement in the manually
/// chosen container, then asks the pricing service for a quote if one is configured.
#[utoipa::path(
    post,
    path = "/calculate",
    request_body = CalculateRequest,
    responses(
        (status = 200, description = "Load plan computed", body = CalculateResponse),
        (
            status = UNPROCESSABLE_ENTITY,
            description = "Invalid request",
            body = ErrorResponse
        )
    ),
    tag = "planning"
)]
async fn handle_calculate(
    State(state): State<ApiState>,
    payload: Result<Json<CalculateRequest>, JsonRejection>,
) -> Response {
    let request = match parse_calculate_request(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    log::info!(
        "New calculation: {} valid items ({} dropped), container choice {:?}",
        request.items.items.len(),
        request.items.dropped,
        request.container_type
    );
    let plan = plan_normalized(
        request.items,
        request.container_type.as_deref(),
        state.placement,
    );
    log::info!(
        "Result: {} in {} units, suggested {}",
        plan.totals,
        plan.placement.summary.unit_count,
        plan.selection
    );

    let pricing = match &state.pricing {
        Some(client) => {
            let route = request.route.unwrap_or_else(|| state.default_route.clone());
            match client.quote(&plan.pricing_request(&route)).await {
                Ok(quote) => Some(quote),
                Err(err) => {
                    log::error!("Pricing failed: {err}");
                    None
                }
            }
        }
        None => None,
    };

    let response = CalculateResponse::from_plan(plan, pricing);
    (StatusCode::OK, Json(response)).into_response()
}

/// Handler for POST /placement_stream (SSE).
///
/// Streams placement events for the manually chosen container as Server-Sent
/// Events, so the viewer can draw units while they are placed.
#[utoipa::path(
    post,
    path = "/placement_stream",
    request_body = CalculateRequest,
    responses(
        (
            status = 200,
            description = "Streams placement events in real-time",
            content_type = "text/event-stream",
            body = String
        ),
        (
            status = UNPROCESSABLE_ENTITY,
            description = "Invalid request",
            body = ErrorResponse
        )
    ),
    tag = "planning"
)]
async fn handle_placement_stream(
    State(state): State<ApiState>,
    payload: Result<Json<CalculateRequest>, JsonRejection>,
) -> Response {
    let request = match parse_calculate_request(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let (tx, rx) = mpsc::channel::<String>(32);
    let placement_config = state.placement;

    tokio::task::spawn_blocking(move || {
        let envelope = resolve_manual_choice(request.container_type.as_deref()).envelope;
        let forwarded =
            forward_placement_events(&request.items.items, envelope, placement_config, &tx);
        log::debug!("Placement stream forwarded {} events", forwarded);
    });

    let stream = ReceiverStream::new(rx)
        .map(|msg| Ok::<_, std::convert::Infallible>(Event::default().data(msg)));
    Sse::new(stream)
        .keep_alive(
            KeepAlive::new()
                .interval(std::time::Duration::from_secs(10))
                .text("keep-alive"),
        )
        .into_response()
}

/// Runs the placement and sends every event as JSON; returns how many were sent.
///
/// Must run outside the async runtime. Once the receiver is gone the
/// placement still completes but the remaining events are discarded.
fn forward_placement_events(
    items: &[Item],
    envelope: Envelope,
    config: PlacementConfig,
    tx: &mpsc::Sender<String>,
) -> usize {
    let mut forwarded = 0;
    let mut receiver_open = true;
    place_items_with_progress(items, envelope, config, |evt| {
        if !receiver_open {
            return;
        }
        if let Ok(json) = serde_json::to_string(evt) {
            receiver_open = tx.blocking_send(json).is_ok();
            if receiver_open {
                forwarded += 1;
            }
        }
    });
    forwarded
}

async fn serve_openapi_json() -> impl IntoResponse {
    Json(openapi_doc())
}

async fn serve_openapi_ui() -> impl IntoResponse {
    Html(SWAGGER_UI_HTML)
}
