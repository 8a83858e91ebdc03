use actix_web::{
    cookie::{time::Duration, Cookie},
    dev::ServiceResponse,
    http::{header, StatusCode},
    test, web, App,
};

use host_panel::{
    auth::AuthGate,
    server::{configure_routes, ServerConfig},
    session::{Identity, SessionCodec, SESSION_COOKIE},
};

const SECRET: [u8; 64] = [3u8; 64];

fn config() -> ServerConfig {
    ServerConfig::new(concat!(env!("CARGO_MANIFEST_DIR"), "/www"))
}

fn gate() -> AuthGate {
    AuthGate::with_fixed_credentials(SessionCodec::from_secret(&SECRET).unwrap())
}

macro_rules! app {
    () => {{
        let config = config();
        test::init_service(
            App::new()
                .app_data(web::Data::new(config.clone()))
                .app_data(web::Data::new(gate()))
                .configure(|cfg| configure_routes(cfg, &config)),
        )
        .await
    }};
}

fn location<B>(response: &ServiceResponse<B>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

fn session_cookie<B>(response: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(|cookie| cookie.into_owned())
}

#[actix_web::test]
async fn login_page_is_public() {
    let app = app!();

    let request = test::TestRequest::get().uri("/").to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = test::read_body(response).await;
    let body = String::from_utf8_lossy(&body);
    assert!(body.contains("action=\"/login\""));
}

#[actix_web::test]
async fn panel_requires_a_session() {
    let app = app!();

    let request = test::TestRequest::get().uri("/panel").to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/");

    let request = test::TestRequest::get()
        .uri("/panel")
        .cookie(Cookie::new(SESSION_COOKIE, "not-a-token"))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/");
}

#[actix_web::test]
async fn login_then_panel() {
    let app = app!();

    let request = test::TestRequest::post()
        .uri("/login")
        .set_form([("name", "admin"), ("password", "admin")])
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/panel");

    let cookie = session_cookie(&response).expect("session cookie");
    assert_eq!(cookie.path(), Some("/"));
    let codec = SessionCodec::from_secret(&SECRET).unwrap();
    assert_eq!(codec.decode(cookie.value()).unwrap(), Identity::new("admin"));

    let request = test::TestRequest::get()
        .uri("/panel")
        .cookie(cookie)
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = test::read_body(response).await;
    assert!(String::from_utf8_lossy(&body).contains("/static/panel.js"));
}

#[actix_web::test]
async fn failed_logins_redirect_home_without_cookie() {
    let app = app!();

    let forms: [&[(&str, &str)]; 4] = [
        &[("name", "admin"), ("password", "wrong")],
        &[("name", "ADMIN"), ("password", "admin")],
        &[("name", ""), ("password", "")],
        &[("name", "admin")],
    ];

    for form in forms {
        let request = test::TestRequest::post()
            .uri("/login")
            .set_form(form)
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::FOUND, "{form:?}");
        assert_eq!(location(&response), "/", "{form:?}");
        assert!(session_cookie(&response).is_none(), "{form:?}");
    }
}

#[actix_web::test]
async fn unparsable_login_body_redirects_home() {
    let app = app!();

    let request = test::TestRequest::post()
        .uri("/login")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload(r#"{"name":"admin","password":"admin"}"#)
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/");
}

#[actix_web::test]
async fn login_credentials_from_query_string() {
    let app = app!();

    let request = test::TestRequest::post()
        .uri("/login?name=admin&password=admin")
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/panel");
    assert!(session_cookie(&response).is_some());

    // The body is read first, a wrong password there is not rescued by the query
    let request = test::TestRequest::post()
        .uri("/login?password=admin")
        .set_form([("name", "admin"), ("password", "wrong")])
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(location(&response), "/");
    assert!(session_cookie(&response).is_none());
}

#[actix_web::test]
async fn login_and_logout_only_accept_post() {
    let app = app!();

    for uri in ["/login", "/logout"] {
        let request = test::TestRequest::get().uri(uri).to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "{uri}");
    }
}

#[actix_web::test]
async fn logout_expires_the_session_cookie() {
    let app = app!();

    let request = test::TestRequest::post().uri("/logout").to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/");

    let cookie = session_cookie(&response).expect("removal cookie");
    assert_eq!(cookie.value(), "");
    assert_eq!(cookie.path(), Some("/"));
    assert_eq!(cookie.max_age(), Some(Duration::ZERO));
}

#[actix_web::test]
async fn static_assets_are_served() {
    let app = app!();

    let request = test::TestRequest::get()
        .uri("/static/panel.js")
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let request = test::TestRequest::get()
        .uri("/static/missing.js")
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn streams_need_a_websocket_handshake() {
    let app = app!();

    for uri in ["/websocket", "/websocket1"] {
        let request = test::TestRequest::get().uri(uri).to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
    }
}

// Streams are open to anyone, with or without a session
#[actix_web::test]
async fn streams_upgrade_without_a_session() {
    let app = app!();

    for uri in ["/websocket", "/websocket1"] {
        let request = test::TestRequest::get()
            .uri(uri)
            .insert_header((header::UPGRADE, "websocket"))
            .insert_header((header::CONNECTION, "upgrade"))
            .insert_header((header::SEC_WEBSOCKET_VERSION, "13"))
            .insert_header((header::SEC_WEBSOCKET_KEY, "dGhlIHNhbXBsZSBub25jZQ=="))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::SWITCHING_PROTOCOLS, "{uri}");
    }
}
