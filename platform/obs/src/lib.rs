//! Tracing setup for the roster service: env-filtered fmt output plus an
//! optional OTLP span exporter.

use anyhow::{Context, Result, anyhow};
use once_cell::sync::OnceCell;
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::{Protocol, SpanExporter, WithExportConfig};
use opentelemetry_sdk::{self as sdk, Resource};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: OnceCell<()> = OnceCell::new();

const DEFAULT_FILTER: &str = "info,tower_http=warn";

/// Configuration for tracing initialization.
#[derive(Clone, Debug)]
pub struct ObsConfig {
    pub service_name: &'static str,
    pub env_filter: Option<String>,
    pub otlp_endpoint: Option<String>,
}

impl Default for ObsConfig {
    fn default() -> Self {
        Self {
            service_name: "roster-server",
            env_filter: None,
            otlp_endpoint: None,
        }
    }
}

impl ObsConfig {
    /// Explicit filter, then `RUST_LOG`, then the built-in default.
    fn resolve_filter(&self) -> String {
        self.env_filter
            .clone()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .unwrap_or_else(|| DEFAULT_FILTER.to_string())
    }

    fn resolve_otlp_endpoint(&self) -> Option<String> {
        self.otlp_endpoint
            .clone()
            .or_else(|| std::env::var("OTLP_ENDPOINT").ok())
            .filter(|endpoint| !endpoint.trim().is_empty())
    }
}

/// Install tracing subscribers with optional OTLP exporter. Calling it again
/// after a successful install is a no-op.
pub fn init_tracing(config: ObsConfig) -> Result<()> {
    if INIT.get().is_some() {
        return Ok(());
    }

    let otlp = config
        .resolve_otlp_endpoint()
        .map(|endpoint| otlp_tracer(config.service_name, &endpoint))
        .transpose()?;
    let registry = tracing_subscriber::registry()
        .with(EnvFilter::try_new(config.resolve_filter())?)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(otlp.map(|tracer| tracing_opentelemetry::layer().with_tracer(tracer)));
    registry.try_init()?;

    INIT.set(())
        .map_err(|_| anyhow!("tracing already initialized"))?;
    Ok(())
}

/// Batch span exporter over OTLP/HTTP, tagged with `service_name`.
fn otlp_tracer(service_name: &'static str, endpoint: &str) -> Result<sdk::trace::SdkTracer> {
    let exporter = SpanExporter::builder()
        .with_http()
        .with_protocol(Protocol::HttpBinary)
        .with_endpoint(endpoint)
        .build()
        .with_context(|| format!("invalid OTLP endpoint {endpoint}"))?;
    let resource = Resource::builder().with_service_name(service_name).build();
    let provider = sdk::trace::SdkTracerProvider::builder()
        .with_resource(resource)
        .with_batch_exporter(exporter)
        .build();
    Ok(provider.tracer(service_name))
}
