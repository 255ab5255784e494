/// Middleware module
///
/// Cross-cutting request handling that is not tied to a single route.

mod metrics_middleware;

pub use metrics_middleware::MetricsMiddleware;
