//! Tracing subscriber setup.

use crate::ServerConfig;
use reelwright_error::{ReelError, ReelErrorKind, ReelResult};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber: `RUST_LOG` (or the configured level), text
/// or JSON lines, plus an OpenTelemetry stdout exporter with the
/// `observability` feature.
///
/// # Errors
///
/// Returns a configuration error for an unparsable filter or if a subscriber
/// is already installed.
pub fn init_logging(config: &ServerConfig) -> ReelResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| ReelError::new(ReelErrorKind::Config(format!("Invalid log filter: {e}"))))?;

    let fmt_layer = if config.json_logs {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_level(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_level(true)
            .boxed()
    };

    let registry = tracing_subscriber::registry().with(env_filter).with(fmt_layer);

    #[cfg(feature = "observability")]
    let registry = registry.with(otel::layer());

    registry
        .try_init()
        .map_err(|e| ReelError::new(ReelErrorKind::Config(format!("Logging already initialized: {e}"))))
}

#[cfg(feature = "observability")]
mod otel {
    use opentelemetry::{KeyValue, global, trace::TracerProvider};
    use opentelemetry_sdk::{Resource, trace::SdkTracerProvider};
    use opentelemetry_stdout::SpanExporter;

    const SERVICE_NAME: &str = env!("CARGO_PKG_NAME");

    /// Stdout span exporter bridged into `tracing`.
    pub(super) fn layer<S>() -> impl tracing_subscriber::Layer<S>
    where
        S: tracing::Subscriber + for<'span> tracing_subscriber::registry::LookupSpan<'span>,
    {
        let resource = Resource::builder()
            .with_service_name(SERVICE_NAME)
            .with_attributes(vec![KeyValue::new(
                "service.version",
                env!("CARGO_PKG_VERSION"),
            )])
            .build();
        let provider = SdkTracerProvider::builder()
            .with_simple_exporter(SpanExporter::default())
            .with_resource(resource)
            .build();
        global::set_tracer_provider(provider.clone());
        tracing_opentelemetry::layer().with_tracer(provider.tracer(SERVICE_NAME))
    }
}
