//! OpenTelemetry initialization and configuration.
//!
//! Sets up tracing-subscriber with OTel layers. If an OTLP endpoint
//! is configured, exports traces, metrics, and logs there. Human-readable
//! output always goes to stderr: stdout carries protocol traffic.
//!
//! A broken exporter configuration never stops the process: startup still
//! has to report missing settings, so export is dropped with a warning.

pub mod metrics;
pub mod session;

use crate::error::{Error, Result};

/// Configuration for telemetry initialization.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Optional OTLP endpoint (e.g. "http://localhost:4317").
    /// When `None`, only the stderr fmt layer is installed.
    pub endpoint: Option<String>,
    /// The service name reported in telemetry signals.
    pub service_name: String,
}

impl TelemetryConfig {
    /// Read `OTEL_ENDPOINT` from a snapshot.
    ///
    /// Telemetry starts before the required variables are validated, so
    /// this cannot go through [`crate::config::Config`].
    pub fn from_environment(env: &crate::config::Environment, service_name: &str) -> Self {
        Self {
            endpoint: env.get("OTEL_ENDPOINT").map(str::to_string),
            service_name: service_name.to_string(),
        }
    }
}

/// OTLP providers, one per signal.
struct OtlpProviders {
    tracer: opentelemetry_sdk::trace::SdkTracerProvider,
    meter: opentelemetry_sdk::metrics::SdkMeterProvider,
    logger: opentelemetry_sdk::logs::SdkLoggerProvider,
}

impl OtlpProviders {
    fn build(endpoint: &str, service_name: String) -> Result<Self> {
        use opentelemetry_otlp::WithExportConfig as _;

        let resource = opentelemetry_sdk::Resource::builder()
            .with_service_name(service_name)
            .build();

        let span_exporter = opentelemetry_otlp::SpanExporter::builder()
            .with_tonic()
            .with_endpoint(endpoint)
            .build()
            .map_err(|e| exporter_error("span", e))?;
        let tracer = opentelemetry_sdk::trace::SdkTracerProvider::builder()
            .with_batch_exporter(span_exporter)
            .with_resource(resource.clone())
            .build();

        let metric_exporter = opentelemetry_otlp::MetricExporter::builder()
            .with_tonic()
            .with_endpoint(endpoint)
            .build()
            .map_err(|e| exporter_error("metric", e))?;
        let meter = opentelemetry_sdk::metrics::SdkMeterProvider::builder()
            .with_periodic_exporter(metric_exporter)
            .with_resource(resource.clone())
            .build();

        let log_exporter = opentelemetry_otlp::LogExporter::builder()
            .with_tonic()
            .with_endpoint(endpoint)
            .build()
            .map_err(|e| exporter_error("log", e))?;
        let logger = opentelemetry_sdk::logs::SdkLoggerProvider::builder()
            .with_batch_exporter(log_exporter)
            .with_resource(resource)
            .build();

        Ok(Self {
            tracer,
            meter,
            logger,
        })
    }
}

fn exporter_error(signal: &str, e: impl std::fmt::Display) -> Error {
    Error::Other(format!("failed to create OTLP {signal} exporter: {e}"))
}

/// Guard that flushes and shuts down OTel providers on drop.
///
/// Hold it for the lifetime of the process. Without an OTLP endpoint it
/// holds nothing.
pub struct TelemetryGuard {
    providers: Option<OtlpProviders>,
}

impl TelemetryGuard {
    /// Whether signals are being exported over OTLP.
    pub fn is_exporting(&self) -> bool {
        self.providers.is_some()
    }

    /// Force-flush all telemetry pipelines.
    pub fn force_flush(&self) {
        if let Some(ref providers) = self.providers {
            let _ = providers.tracer.force_flush();
            let _ = providers.meter.force_flush();
            let _ = providers.logger.force_flush();
        }
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(providers) = self.providers.take() {
            let _ = providers.logger.shutdown();
            let _ = providers.meter.shutdown();
            let _ = providers.tracer.shutdown();
        }
    }
}

/// Initialize telemetry: a stderr fmt layer, plus OTLP traces, metrics and
/// logs when an endpoint is configured.
///
/// `RUST_LOG` filters events, defaulting to `info`.
///
/// If the OTLP exporters cannot be built, telemetry falls back to the
/// stderr layer alone and logs a warning.
///
/// # Errors
///
/// Returns an error if the tracing subscriber cannot be initialized
/// (e.g. if one was already set).
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard> {
    use opentelemetry::trace::TracerProvider as _;
    use std::io::IsTerminal as _;
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::layer::SubscriberExt as _;
    use tracing_subscriber::util::SubscriberInitExt as _;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (providers, export_error) = match config.endpoint.as_deref() {
        Some(endpoint) => match OtlpProviders::build(endpoint, config.service_name.clone()) {
            Ok(providers) => (Some(providers), None),
            Err(e) => (None, Some(e)),
        },
        None => (None, None),
    };

    if let Some(ref providers) = providers {
        opentelemetry::global::set_meter_provider(providers.meter.clone());
    }

    let otel_trace_layer = providers.as_ref().map(|p| {
        tracing_opentelemetry::layer().with_tracer(p.tracer.tracer("liveblocks-mcp"))
    });
    let otel_log_layer = providers.as_ref().map(|p| {
        opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge::new(&p.logger)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(std::io::stderr().is_terminal())
                .with_writer(std::io::stderr),
        )
        .with(otel_trace_layer)
        .with(otel_log_layer)
        .try_init()
        .map_err(|e| Error::Other(format!("failed to init tracing subscriber: {e}")))?;

    if let Some(e) = export_error {
        tracing::warn!(error = %e, "OTLP export disabled, logging to stderr only");
    } else if let Some(ref endpoint) = config.endpoint {
        tracing::debug!(endpoint = %endpoint, service = %config.service_name, "exporting telemetry over OTLP");
    }

    Ok(TelemetryGuard { providers })
}
