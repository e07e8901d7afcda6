use actix_web::dev::ServiceRequest;
use tracing::{info_span, Span};

/// Span every request runs in. Wrapped around the service future with
/// `tracing_futures::Instrument`, so it is entered on every poll and events
/// from handlers and queries carry the method and path.
pub fn request_span(req: &ServiceRequest) -> Span {
    info_span!(
        "request",
        method = %req.method(),
        path = %req.path(),
    )
}

