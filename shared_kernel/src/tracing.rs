use anyhow::Context;
use opentelemetry::global;
use opentelemetry::sdk::trace::{self, Tracer};
use opentelemetry::sdk::Resource;
use opentelemetry::KeyValue;
use opentelemetry_otlp::WithExportConfig;
use tracing::Subscriber;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Registry;

/// Flushes and shuts down the global tracer provider when dropped.
#[must_use = "dropping the guard shuts telemetry down"]
pub struct TelemetryGuard {
    _private: (),
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        global::shutdown_tracer_provider();
    }
}

/// Installs the global `tracing` subscriber: JSON logs filtered through
/// `RUST_LOG`, plus an OTLP span exporter unless `SKIP_OTLP_EXPORTER` is set.
pub fn config_telemetry(service_name: &'static str) -> anyhow::Result<TelemetryGuard> {
    // Needed to forward ordinary log statements (sqlx) to our tracing subscriber.
    tracing_log::LogTracer::init().context("Failed to initialize log tracer")?;

    let otel_layer = match std::env::var("SKIP_OTLP_EXPORTER") {
        Ok(_) => None,
        Err(_) => Some(otlp_layer(service_name)?),
    };

    let subscriber = Registry::default()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_thread_names(true),
        )
        .with(otel_layer);

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install `tracing` subscriber")?;

    Ok(TelemetryGuard { _private: () })
}

fn otlp_layer<S>(service_name: &'static str) -> anyhow::Result<OpenTelemetryLayer<S, Tracer>>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    let tracer = opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(opentelemetry_otlp::new_exporter().tonic().with_env())
        .with_trace_config(trace::config().with_resource(Resource::new(vec![KeyValue::new(
            "service.name",
            service_name,
        )])))
        .install_batch(opentelemetry::runtime::TokioCurrentThread)
        .context("Failed to initialize otlp tracer")?;

    Ok(tracing_opentelemetry::layer().with_tracer(tracer))
}
