use crate::common;
use chrono::{Duration, TimeZone, Utc};
use std::sync::Arc;
use yfinance_fundamentals::{ManualClock, SESSION_TTL, SessionCache};

fn start() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
}

#[tokio::test]
async fn session_is_reused_until_ttl_then_reacquired() {
    let server = common::setup_server();
    let (cookie, crumb) = common::mock_cookie_crumb(&server);
    let api = common::mock_summary(&server, "EQNR.OL", "xY9.crumb", 200, "{}");

    let clock = Arc::new(ManualClock::new(start()));
    let client = common::builder_for(&server)
        .clock(clock.clone())
        .build()
        .unwrap();

    client.get_fundamentals("EQNR.OL").await.unwrap();
    cookie.assert_calls(1);

    clock.advance(Duration::minutes(4) + Duration::seconds(59));
    client.get_fundamentals("EQNR.OL").await.unwrap();
    cookie.assert_calls(1);
    crumb.assert_calls(1);

    clock.set(start() + SESSION_TTL + Duration::seconds(1));
    assert!(!client.has_session().await);
    client.get_fundamentals("EQNR.OL").await.unwrap();
    cookie.assert_calls(2);
    crumb.assert_calls(2);
    api.assert_calls(3);
}

#[tokio::test]
async fn custom_session_ttl_is_honoured() {
    let server = common::setup_server();
    let (cookie, _crumb) = common::mock_cookie_crumb(&server);
    let _api = common::mock_summary(&server, "EQNR.OL", "xY9.crumb", 200, "{}");

    let clock = Arc::new(ManualClock::new(start()));
    let client = common::builder_for(&server)
        .clock(clock.clone())
        .session_ttl(Duration::seconds(30))
        .build()
        .unwrap();

    client.get_fundamentals("EQNR.OL").await.unwrap();
    clock.advance(Duration::seconds(31));
    client.get_fundamentals("EQNR.OL").await.unwrap();
    cookie.assert_calls(2);
}

#[tokio::test]
async fn clear_session_forces_a_new_handshake() {
    let server = common::setup_server();
    let (cookie, _crumb) = common::mock_cookie_crumb(&server);
    let _api = common::mock_summary(&server, "EQNR.OL", "xY9.crumb", 200, "{}");

    let client = common::client_for(&server);
    client.get_fundamentals("EQNR.OL").await.unwrap();
    assert!(client.has_session().await);

    client.clear_session().await;
    client.clear_session().await;
    assert!(!client.has_session().await);

    client.get_fundamentals("EQNR.OL").await.unwrap();
    cookie.assert_calls(2);
}

#[tokio::test]
async fn cache_get_put_invalidate() {
    let clock = Arc::new(ManualClock::new(start()));
    let cache = SessionCache::new(clock.clone());
    assert!(cache.get().await.is_none());

    let stored = cache
        .put("A3=abc".into(), "crumb".into(), SESSION_TTL)
        .await;
    assert_eq!(stored.expires_at(), start() + SESSION_TTL);

    let got = cache.get().await.expect("fresh session");
    assert_eq!(got.cookie(), "A3=abc");
    assert_eq!(got.crumb(), "crumb");

    // Expiry is exclusive: a session is gone at exactly its deadline.
    clock.set(start() + SESSION_TTL);
    assert!(cache.get().await.is_none());

    clock.set(start());
    cache.put("A3=new".into(), "c2".into(), SESSION_TTL).await;
    cache.invalidate().await;
    cache.invalidate().await;
    assert!(cache.get().await.is_none());
}

#[tokio::test]
async fn session_debug_redacts_credentials() {
    let cache = SessionCache::new(Arc::new(ManualClock::new(start())));
    let session = cache
        .put("A3=secret".into(), "crumbsecret".into(), SESSION_TTL)
        .await;
    let dbg = format!("{session:?}");
    assert!(!dbg.contains("secret"));
}
