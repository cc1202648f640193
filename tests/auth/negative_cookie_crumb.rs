use crate::common;
use httpmock::Method::GET;
use yfinance_fundamentals::{AcquisitionFailure, YfError};

fn acquisition(err: YfError) -> AcquisitionFailure {
    match err {
        YfError::Acquisition(f) => f,
        other => panic!("expected Acquisition error, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_set_cookie_header_is_an_error() {
    let server = common::setup_server();

    // Cookie endpoint returns 200 but no Set-Cookie header.
    let cookie = server.mock(|when, then| {
        when.method(GET).path("/consent");
        then.status(200);
    });
    let crumb = common::mock_crumb(&server, "A3=abc123", "xY9.crumb");
    let api = common::mock_summary(&server, "EQNR.OL", "xY9.crumb", 200, "{}");

    let client = common::client_for(&server);
    let err = client.get_fundamentals("EQNR.OL").await.unwrap_err();

    cookie.assert();
    assert_eq!(acquisition(err), AcquisitionFailure::NoCookie);
    crumb.assert_calls(0);
    api.assert_calls(0);
    assert!(!client.has_session().await);
}

#[tokio::test]
async fn crumb_endpoint_non_200_is_rejected() {
    let server = common::setup_server();
    let _cookie = common::mock_cookie(&server, "A3=abc123");
    let crumb = server.mock(|when, then| {
        when.method(GET).path("/v1/test/getcrumb");
        then.status(403).body("xY9.crumb");
    });
    let api = common::mock_summary(&server, "EQNR.OL", "xY9.crumb", 200, "{}");

    let client = common::client_for(&server);
    let err = client.get_fundamentals("EQNR.OL").await.unwrap_err();

    crumb.assert();
    assert_eq!(err.upstream_status(), Some(403));
    assert_eq!(
        acquisition(err),
        AcquisitionFailure::CrumbRejected { status: 403 }
    );
    api.assert_calls(0);
}

#[tokio::test]
async fn malformed_crumb_bodies_are_rejected() {
    for body in ["", "   \n", "Unauthorized", "<html><title>Oops</title></html>"] {
        let server = common::setup_server();
        let _cookie = common::mock_cookie(&server, "A3=abc123");
        let _crumb = server.mock(|when, then| {
            when.method(GET).path("/v1/test/getcrumb");
            then.status(200).body(body);
        });
        let api = common::mock_summary(&server, "EQNR.OL", "xY9.crumb", 200, "{}");

        let client = common::client_for(&server);
        let err = client.get_fundamentals("EQNR.OL").await.unwrap_err();

        assert_eq!(acquisition(err), AcquisitionFailure::CrumbMalformed, "body {body:?}");
        api.assert_calls(0);
        assert!(!client.has_session().await);
    }
}

#[tokio::test]
async fn crumb_is_trimmed() {
    let server = common::setup_server();
    let _cookie = common::mock_cookie(&server, "A3=abc123");
    let _crumb = common::mock_crumb(&server, "A3=abc123", "  xY9.crumb\n");
    let api = common::mock_summary(&server, "EQNR.OL", "xY9.crumb", 200, "{}");

    let client = common::client_for(&server);
    client.get_fundamentals("EQNR.OL").await.unwrap();
    api.assert();
}

#[tokio::test]
async fn acquisition_errors_never_echo_the_crumb_body() {
    let server = common::setup_server();
    let _cookie = common::mock_cookie(&server, "A3=abc123");
    let _crumb = server.mock(|when, then| {
        when.method(GET).path("/v1/test/getcrumb");
        then.status(200).body("<secret-token-page>");
    });

    let client = common::client_for(&server);
    let err = client.get_fundamentals("EQNR.OL").await.unwrap_err();
    assert!(!err.to_string().contains("secret-token"));
    assert!(!err.to_string().contains("abc123"));
}
