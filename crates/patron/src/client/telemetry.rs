//! # Telemetry
//!
//! Console logging is always on: a `tracing_subscriber` registry with an
//! `EnvFilter` (default `info`, overridden by `RUST_LOG`) and a `fmt` layer in
//! the format chosen on the command line.
//!
//! ## Feature matrix
//!
//! - `otel`: Additionally exports the dispatcher's spans through an
//!   OpenTelemetry tracer provider to stdout.
//!
//! ## Span behavior
//!
//! - Every order runs inside a span named after its RPC (`staff_order`,
//!   `eastern_host_order`, `western_host_order`, `dim_sum_order`).
//! - Events inside those spans become span events when `otel` is enabled.
//!
//! ```bash
//! cargo run --features otel -- dimsum
//! ```

use clap::ValueEnum;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(feature = "otel")]
use opentelemetry::{InstrumentationScope, KeyValue, trace::TracerProvider};
#[cfg(feature = "otel")]
use opentelemetry_sdk::{Resource, propagation::TraceContextPropagator, trace as sdktrace};
#[cfg(feature = "otel")]
use opentelemetry_semantic_conventions as semvcns;

/// How console output is laid out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Multi-line, with source locations.
    Pretty,
    /// One line per event.
    #[default]
    Compact,
    /// Newline-delimited JSON.
    Json,
}

pub struct TelemetryProviders {
    #[cfg(feature = "otel")]
    pub tracer_provider: sdktrace::SdkTracerProvider,
}

impl TelemetryProviders {
    /// Flushes pending spans and shuts the exporters down.
    pub fn shutdown(self) {
        #[cfg(feature = "otel")]
        {
            if let Err(err) = self.tracer_provider.force_flush() {
                eprintln!("Error flushing traces: {:#?}", err);
            }
            if let Err(err) = self.tracer_provider.shutdown() {
                eprintln!("Error shutting down tracer: {:#?}", err);
            }
        }
    }
}

pub fn init_telemetry(format: LogFormat) -> anyhow::Result<TelemetryProviders> {
    #[cfg(feature = "otel")]
    opentelemetry::global::set_text_map_propagator(TraceContextPropagator::new());

    #[cfg(feature = "otel")]
    let tracer_provider = init_tracer();

    let timer = || tracing_subscriber::fmt::time::ChronoLocal::rfc_3339();

    // Exactly one of the format layers is `Some`.
    let registry = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with((format == LogFormat::Pretty).then(|| {
            tracing_subscriber::fmt::layer()
                .with_thread_ids(true)
                .with_line_number(true)
                .with_target(false)
                .with_timer(timer())
                .with_file(true)
                .pretty()
        }))
        .with((format == LogFormat::Compact).then(|| {
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_timer(timer())
                .compact()
        }))
        .with((format == LogFormat::Json).then(|| {
            tracing_subscriber::fmt::layer()
                .with_timer(timer())
                .json()
                .with_current_span(true)
        }));

    #[cfg(feature = "otel")]
    let registry = {
        let scope = InstrumentationScope::builder("patron")
            .with_version(env!("CARGO_PKG_VERSION"))
            .with_schema_url(semvcns::SCHEMA_URL)
            .build();

        opentelemetry::global::set_tracer_provider(tracer_provider.clone());
        registry.with(
            tracing_opentelemetry::layer()
                .with_tracer(tracer_provider.tracer_with_scope(scope))
                .with_error_records_to_exceptions(true),
        )
    };

    registry.try_init()?;

    Ok(TelemetryProviders {
        #[cfg(feature = "otel")]
        tracer_provider,
    })
}

#[cfg(feature = "otel")]
fn resource() -> Resource {
    Resource::builder()
        .with_service_name("patron")
        .with_schema_url(
            [KeyValue::new(
                semvcns::resource::SERVICE_VERSION,
                env!("CARGO_PKG_VERSION"),
            )],
            semvcns::SCHEMA_URL,
        )
        .build()
}

#[cfg(feature = "otel")]
fn init_tracer() -> sdktrace::SdkTracerProvider {
    let exporter = opentelemetry_stdout::SpanExporter::default();
    let batch = sdktrace::BatchSpanProcessor::builder(exporter)
        .with_batch_config(
            sdktrace::BatchConfigBuilder::default()
                .with_scheduled_delay(std::time::Duration::from_secs(5))
                .with_max_queue_size(2048)
                .build(),
        )
        .build();

    sdktrace::SdkTracerProvider::builder()
        .with_resource(resource())
        .with_span_processor(batch)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_is_the_default_format() {
        assert_eq!(LogFormat::default(), LogFormat::Compact);
        assert_eq!(
            LogFormat::from_str("json", true).unwrap(),
            LogFormat::Json
        );
    }

    #[test]
    fn telemetry_initializes_once() {
        let providers = init_telemetry(LogFormat::Compact).unwrap();
        assert!(init_telemetry(LogFormat::Json).is_err());
        providers.shutdown();
    }
}
