use crate::common;
use httpmock::Method::GET;
use serde_json::json;
use yfinance_fundamentals::{AcquisitionFailure, ErrorPayload, YfError};

#[test]
fn acquisition_failures_carry_a_reason_tag() {
    let cases = [
        (AcquisitionFailure::NoCookie, "no-cookie", None),
        (
            AcquisitionFailure::CrumbRejected { status: 403 },
            "crumb-rejected",
            Some(403),
        ),
        (AcquisitionFailure::CrumbMalformed, "crumb-malformed", None),
        (
            AcquisitionFailure::HeadersTooLarge {
                limit: 1024,
                required: 65536,
            },
            "headers-too-large",
            None,
        ),
    ];

    for (failure, tag, status) in cases {
        let err = YfError::from(failure);
        let payload = ErrorPayload::from(&err);
        assert_eq!(payload.code, "session_acquisition_failed");
        assert_eq!(payload.reason, Some(tag));
        assert_eq!(payload.status, status);
    }
}

#[test]
fn payload_serializes_without_empty_reason() {
    let err = YfError::Status {
        status: 503,
        url: "https://query2.finance.yahoo.com/v10/finance/quoteSummary/EQNR.OL".into(),
    };
    let v = serde_json::to_value(ErrorPayload::from(&err)).unwrap();
    assert_eq!(v["code"], json!("upstream_error"));
    assert_eq!(v["status"], json!(503));
    assert!(v.get("reason").is_none());

    let v = serde_json::to_value(ErrorPayload::from(&YfError::AuthExpired)).unwrap();
    assert_eq!(v["code"], json!("auth_expired"));
    assert_eq!(v["status"], json!(401));

    let v = serde_json::to_value(ErrorPayload::from(&YfError::InvalidTicker)).unwrap();
    assert_eq!(v["code"], json!("invalid_ticker"));
    assert_eq!(v["status"], json!(null));
}

#[tokio::test]
async fn payload_message_never_contains_credentials() {
    let server = common::setup_server();
    let (_cookie, _crumb) = common::mock_cookie_crumb(&server);
    let _api = server.mock(|when, then| {
        when.method(GET).path("/v10/finance/quoteSummary/EQNR.OL");
        then.status(429).body("Too Many Requests");
    });

    let client = common::client_for(&server);
    let err = client.get_fundamentals("EQNR.OL").await.unwrap_err();
    let payload = ErrorPayload::from(&err);

    assert_eq!(payload.code, "upstream_error");
    assert_eq!(payload.status, Some(429));
    assert!(!payload.message.contains("xY9.crumb"), "{}", payload.message);
    assert!(!payload.message.contains("abc123"), "{}", payload.message);
    assert!(payload.message.contains("crumb=***"), "{}", payload.message);
}
