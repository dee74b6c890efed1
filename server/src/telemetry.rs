//! Console logging plus optional OTLP export of traces and logs.

use opentelemetry::trace::TracerProvider;
use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::logs::SdkLoggerProvider;
use opentelemetry_sdk::trace::{SdkTracer, SdkTracerProvider};
use std::env;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_SERVICE_NAME: &str = "cookbook-server";
const REACHABILITY_TIMEOUT: Duration = Duration::from_millis(100);

struct OtlpExport {
    tracer: SdkTracer,
    logger_provider: SdkLoggerProvider,
}

/// Where the OTLP export ended up, reported once the subscriber is live.
enum ExportStatus {
    Disabled,
    Unreachable(String),
    Failed(String, String),
    Enabled(String, String),
}

fn host_port(endpoint: &str) -> &str {
    let rest = endpoint
        .trim_start_matches("http://")
        .trim_start_matches("https://");
    rest.split('/').next().unwrap_or(rest)
}

/// Quick TCP check so a missing collector does not stall every export.
fn collector_reachable(endpoint: &str) -> bool {
    host_port(endpoint)
        .to_socket_addrs()
        .ok()
        .and_then(|mut addrs| addrs.next())
        .map(|addr| TcpStream::connect_timeout(&addr, REACHABILITY_TIMEOUT).is_ok())
        .unwrap_or(false)
}

fn build_export(
    endpoint: &str,
    service_name: &str,
) -> Result<OtlpExport, Box<dyn std::error::Error + Send + Sync>> {
    let resource = opentelemetry_sdk::Resource::builder()
        .with_service_name(service_name.to_string())
        .build();

    let span_exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()?;
    let tracer_provider = SdkTracerProvider::builder()
        .with_batch_exporter(span_exporter)
        .with_resource(resource.clone())
        .build();
    let tracer = tracer_provider.tracer(DEFAULT_SERVICE_NAME);
    opentelemetry::global::set_tracer_provider(tracer_provider);

    let log_exporter = opentelemetry_otlp::LogExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()?;
    let logger_provider = SdkLoggerProvider::builder()
        .with_batch_exporter(log_exporter)
        .with_resource(resource)
        .build();

    Ok(OtlpExport {
        tracer,
        logger_provider,
    })
}

fn export_from_env() -> (Option<OtlpExport>, ExportStatus) {
    let Ok(endpoint) = env::var("OTEL_EXPORTER_OTLP_ENDPOINT") else {
        return (None, ExportStatus::Disabled);
    };
    if !collector_reachable(&endpoint) {
        return (None, ExportStatus::Unreachable(endpoint));
    }

    let service_name =
        env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| DEFAULT_SERVICE_NAME.to_string());
    match build_export(&endpoint, &service_name) {
        Ok(export) => (Some(export), ExportStatus::Enabled(endpoint, service_name)),
        Err(e) => (None, ExportStatus::Failed(endpoint, e.to_string())),
    }
}

/// Install the global subscriber: `RUST_LOG` filtering, console output, and
/// OTLP export when `OTEL_EXPORTER_OTLP_ENDPOINT` points at a live collector.
pub fn init() {
    let (export, status) = export_from_env();

    let (trace_layer, log_layer) = match &export {
        Some(export) => (
            Some(tracing_opentelemetry::layer().with_tracer(export.tracer.clone())),
            Some(OpenTelemetryTracingBridge::new(&export.logger_provider)),
        ),
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(trace_layer)
        .with(log_layer)
        .init();

    match status {
        ExportStatus::Disabled => {
            tracing::debug!("OTEL_EXPORTER_OTLP_ENDPOINT not set, using console logging only")
        }
        ExportStatus::Unreachable(endpoint) => tracing::info!(
            "OpenTelemetry endpoint {} not reachable, using console logging only",
            endpoint
        ),
        ExportStatus::Failed(endpoint, error) => tracing::warn!(
            "Could not set up OpenTelemetry export to {}: {}",
            endpoint,
            error
        ),
        ExportStatus::Enabled(endpoint, service_name) => tracing::info!(
            "OpenTelemetry enabled, exporting traces and logs to {} as {}",
            endpoint,
            service_name
        ),
    }
}
