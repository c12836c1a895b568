use std::env;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;

use crate::placement::PlacementConfig;
use crate::pricing::Route;

/// Complete application configuration, loaded from environment variables or default values.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub placement: PlacementSettings,
    pub pricing: PricingConfig,
}

impl AppConfig {
    /// Creates a configuration from the currently available environment variables.
    pub fn from_env() -> Self {
        Self {
            api: ApiConfig::from_env(),
            placement: PlacementSettings::from_env(),
            pricing: PricingConfig::from_env(),
        }
    }
}

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    bind_ip: IpAddr,
    display_host: String,
    port: u16,
}

impl ApiConfig {
    const DEFAULT_HOST: &'static str = "0.0.0.0";
    const DEFAULT_PORT: u16 = 8080;
    const HOST_VAR: &'static str = "LOAD_PLANNER_API_HOST";
    const PORT_VAR: &'static str = "LOAD_PLANNER_API_PORT";

    fn from_env() -> Self {
        Self::from_values(env_string(Self::HOST_VAR), env_string(Self::PORT_VAR))
    }

    fn from_values(host: Option<String>, port: Option<String>) -> Self {
        let default_ip = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
        let host_value = host.unwrap_or_else(|| Self::DEFAULT_HOST.to_string());
        let (bind_ip, display_host) = match host_value.parse::<IpAddr>() {
            Ok(ip) => (ip, host_value),
            Err(err) => {
                log::warn!(
                    "Could not parse {} ('{}'): {}. Using {}.",
                    Self::HOST_VAR,
                    host_value,
                    err,
                    Self::DEFAULT_HOST
                );
                (default_ip, Self::DEFAULT_HOST.to_string())
            }
        };

        let port = match port {
            Some(raw) => match raw.parse::<u16>() {
                Ok(value) if value != 0 => value,
                Ok(_) => {
                    log::warn!(
                        "{} must not be 0. Using {}.",
                        Self::PORT_VAR,
                        Self::DEFAULT_PORT
                    );
                    Self::DEFAULT_PORT
                }
                Err(err) => {
                    log::warn!(
                        "Could not parse {} ('{}'): {}. Using {}.",
                        Self::PORT_VAR,
                        raw,
                        err,
                        Self::DEFAULT_PORT
                    );
                    Self::DEFAULT_PORT
                }
            },
            None => Self::DEFAULT_PORT,
        };

        Self {
            bind_ip,
            display_host,
            port,
        }
    }

    /// Socket address to bind the server to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_ip, self.port)
    }

    /// Visible hostname for logging and hints.
    pub fn display_host(&self) -> &str {
        &self.display_host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Indicates whether binding to all interfaces.
    pub fn binds_to_all_interfaces(&self) -> bool {
        match self.bind_ip {
            IpAddr::V4(addr) => addr == Ipv4Addr::UNSPECIFIED,
            IpAddr::V6(addr) => addr == Ipv6Addr::UNSPECIFIED,
        }
    }
}

/// Spacing of the shelf layout.
#[derive(Clone, Debug)]
pub struct PlacementSettings {
    placement: PlacementConfig,
}

impl PlacementSettings {
    const MARGIN_VAR: &'static str = "LOAD_PLANNER_PLACEMENT_MARGIN";
    const GAP_VAR: &'static str = "LOAD_PLANNER_PLACEMENT_GAP";

    fn from_env() -> Self {
        let margin = parse_f64_setting(
            Self::MARGIN_VAR,
            env_string(Self::MARGIN_VAR),
            PlacementConfig::DEFAULT_MARGIN,
            |value| value >= 0.0,
            "must not be negative",
        );
        let gap = parse_f64_setting(
            Self::GAP_VAR,
            env_string(Self::GAP_VAR),
            PlacementConfig::DEFAULT_GAP,
            |value| value >= 0.0,
            "must not be negative",
        );

        Self {
            placement: PlacementConfig::builder().margin(margin).gap(gap).build(),
        }
    }

    /// Returns the configured PlacementConfig.
    pub fn placement_config(&self) -> PlacementConfig {
        self.placement
    }
}

/// Configuration for the remote pricing service.
#[derive(Clone, Debug)]
pub struct PricingConfig {
    endpoint: Option<String>,
    timeout: Duration,
    default_route: Route,
}

impl PricingConfig {
    const DEFAULT_TIMEOUT_SECS: u64 = 15;
    const URL_VAR: &'static str = "LOAD_PLANNER_PRICING_URL";
    const TIMEOUT_VAR: &'static str = "LOAD_PLANNER_PRICING_TIMEOUT_SECS";
    const ORIGIN_VAR: &'static str = "LOAD_PLANNER_ORIGIN_PORT";
    const DESTINATION_VAR: &'static str = "LOAD_PLANNER_DESTINATION_PORT";

    fn from_env() -> Self {
        let timeout_secs = parse_u64_setting(
            Self::TIMEOUT_VAR,
            env_string(Self::TIMEOUT_VAR),
            Self::DEFAULT_TIMEOUT_SECS,
        );
        let default_route = Route {
            origin: env_string(Self::ORIGIN_VAR)
                .unwrap_or_else(|| Route::DEFAULT_ORIGIN.to_string()),
            destination: env_string(Self::DESTINATION_VAR)
                .unwrap_or_else(|| Route::DEFAULT_DESTINATION.to_string()),
        };

        Self {
            endpoint: env_string(Self::URL_VAR),
            timeout: Duration::from_secs(timeout_secs),
            default_route,
        }
    }

    /// Pricing disabled, default route.
    pub fn disabled() -> Self {
        Self {
            endpoint: None,
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            default_route: Route::default(),
        }
    }

    /// Endpoint URL; `None` disables pricing.
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Route used when a request does not name one.
    pub fn default_route(&self) -> &Route {
        &self.default_route
    }
}

fn env_string(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(value) => non_empty(&value),
        Err(env::VarError::NotPresent) => None,
        Err(err) => {
            log::warn!("Access to {} failed: {}. Using default value.", name, err);
            None
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

fn parse_f64_setting(
    var_name: &str,
    raw: Option<String>,
    default: f64,
    validator: impl Fn(f64) -> bool,
    invalid_hint: &str,
) -> f64 {
    match raw {
        Some(raw) => match raw.parse::<f64>() {
            Ok(value) if value.is_finite() && validator(value) => {
                if value != default {
                    log::info!("{} = {} overrides the default of {}.", var_name, value, default);
                }
                value
            }
            Ok(_) => {
                log::warn!(
                    "{} contains invalid value '{}': {}. Using {}.",
                    var_name,
                    raw,
                    invalid_hint,
                    default
                );
                default
            }
            Err(err) => {
                log::warn!(
                    "Could not parse {} ('{}') as number: {}. Using {}.",
                    var_name,
                    raw,
                    err,
                    default
                );
                default
            }
        },
        None => default,
    }
}

fn parse_u64_setting(var_name: &str, raw: Option<String>, default: u64) -> u64 {
    match raw {
        Some(raw) => match raw.parse::<u64>() {
            Ok(0) => {
                log::warn!("{} must be greater than 0. Using {}.", var_name, default);
                default
            }
            Ok(value) => value,
            Err(err) => {
                log::warn!(
                    "Could not parse {} ('{}'): {}. Using {}.",
                    var_name,
                    raw,
                    err,
                    default
                );
                default
            }
        },
        None => default,
    }
}
