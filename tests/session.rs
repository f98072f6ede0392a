//! Session subsystem behavior through full dispatches.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use gantry::config::AppConfig;
use gantry::{App, AppBuilder, Handler, MemoryStorage, Scope, SessionManager};
use http::{header, Method, Request, Response, StatusCode};

#[derive(Default)]
struct Login;
impl Handler for Login {
    fn get(&mut self, scope: &mut Scope) {
        let Scope {
            context, session, ..
        } = scope;
        session.set(context, "user", "alice");
        scope.write_string("logged in");
    }
}

#[derive(Default)]
struct WhoAmI;
impl Handler for WhoAmI {
    fn get(&mut self, scope: &mut Scope) {
        let Scope {
            context, session, ..
        } = scope;
        let user = session.get(context, "user").unwrap_or_else(|| "anon".to_string());
        scope.write_string(&user);
    }
}

fn get(path: &str) -> Request<Bytes> {
    Request::builder()
        .method(Method::GET)
        .uri(path)
        .body(Bytes::new())
        .unwrap()
}

fn get_with_cookie(path: &str, cookie: &str) -> Request<Bytes> {
    Request::builder()
        .method(Method::GET)
        .uri(path)
        .header(header::COOKIE, cookie)
        .body(Bytes::new())
        .unwrap()
}

/// The `name=value` pair from the first Set-Cookie header, attributes
/// stripped.
fn session_cookie(response: &Response<Bytes>) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .expect("response carries a session cookie")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

fn session_app(ttl_secs: u64) -> Arc<App> {
    let mut config = AppConfig::default();
    config.session.ttl_secs = ttl_secs;
    AppBuilder::from_config(config)
        .route::<Login>("/login")
        .unwrap()
        .route::<WhoAmI>("/whoami")
        .unwrap()
        .build()
}

#[tokio::test]
async fn session_state_survives_across_requests() {
    let app = session_app(60);

    let login = app.dispatch(get("/login")).await;
    assert_eq!(login.status(), StatusCode::OK);
    let cookie = session_cookie(&login);

    let whoami = app.dispatch(get_with_cookie("/whoami", &cookie)).await;
    assert_eq!(&whoami.body()[..], b"alice");
}

#[tokio::test]
async fn requests_without_a_cookie_get_fresh_sessions() {
    let app = session_app(60);

    let first = app.dispatch(get("/whoami")).await;
    assert_eq!(&first.body()[..], b"anon");
    // A fresh signed cookie is minted even on a read-only access.
    let cookie = session_cookie(&first);
    assert!(cookie.starts_with("SESSID="));

    let second = app.dispatch(get("/whoami")).await;
    let other = session_cookie(&second);
    assert_ne!(cookie, other);
}

#[tokio::test(flavor = "multi_thread")]
async fn idle_sessions_expire_after_the_ttl_sweep() {
    let app = session_app(1);

    let login = app.dispatch(get("/login")).await;
    let cookie = session_cookie(&login);

    // Past the TTL and at least one sweep interval.
    tokio::time::sleep(Duration::from_millis(2200)).await;

    let whoami = app.dispatch(get_with_cookie("/whoami", &cookie)).await;
    assert_eq!(&whoami.body()[..], b"anon");
}

#[tokio::test]
async fn forged_session_cookie_reads_as_absent() {
    let app = session_app(60);

    let login = app.dispatch(get("/login")).await;
    let cookie = session_cookie(&login);

    // Flip one character of the signed payload.
    let mut forged: Vec<char> = cookie.chars().collect();
    let last = forged.len() - 1;
    forged[last] = if forged[last] == 'x' { 'y' } else { 'x' };
    let forged: String = forged.into_iter().collect();

    let whoami = app.dispatch(get_with_cookie("/whoami", &forged)).await;
    assert_eq!(&whoami.body()[..], b"anon");
    // A replacement cookie is minted since the forged one was discarded.
    assert!(whoami.headers().contains_key(header::SET_COOKIE));
}

#[tokio::test]
async fn manager_returns_empty_map_for_unknown_ids() {
    let manager = SessionManager::new(Arc::new(MemoryStorage::new()), 60);
    assert!(manager.get("nonexistent-id").is_empty());
}
