//! Verdict to HTTP response mapping.
//!
//! # Design Decisions
//! - Plain-text body is the contract; callers parse "WORKING" out of it
//! - Healthy verdicts are always 200; the unhealthy code is configurable
//!   and defaults to 200 as well

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::health::Verdict;

pub fn verdict_response(verdict: &Verdict, unhealthy_status: StatusCode) -> Response {
    let status = if verdict.is_healthy() {
        StatusCode::OK
    } else {
        unhealthy_status
    };
    (
        status,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        verdict.body(),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::{CheckMode, Status};
    use std::time::Duration;

    #[test]
    fn test_status_codes() {
        let healthy = Verdict::new(CheckMode::Serial, Ok(()), Duration::from_millis(3));
        let unhealthy = Verdict::new(
            CheckMode::Serial,
            Err(Status::unhealthy("KeyValue - refused")),
            Duration::from_millis(3),
        );

        assert_eq!(verdict_response(&healthy, StatusCode::SERVICE_UNAVAILABLE).status(), StatusCode::OK);
        assert_eq!(verdict_response(&unhealthy, StatusCode::OK).status(), StatusCode::OK);
        assert_eq!(
            verdict_response(&unhealthy, StatusCode::SERVICE_UNAVAILABLE).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
