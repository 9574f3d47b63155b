//! Server construction and middleware wiring.

mod config;
mod settings;
mod state_builders;

pub use config::ServerConfig;
pub use settings::AppSettings;
pub(crate) use state_builders::build_http_state;

use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use minipedia::Trace;
#[cfg(debug_assertions)]
use minipedia::doc::ApiDoc;
use minipedia::inbound::http::configure;
use minipedia::inbound::http::health::{HealthState, live, ready};
use minipedia::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    session: SessionMiddleware<CookieSessionStore>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let api = web::scope("/api/v1").wrap(session).configure(configure);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server and mark it ready once bound.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let ServerConfig {
        session,
        bind_addr,
        http_state,
    } = config;
    let http_state = web::Data::new(http_state);
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        build_app(
            server_health_state.clone(),
            http_state.clone(),
            session.middleware(),
        )
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    //! Full application wiring over the in-memory store.

    use actix_web::http::StatusCode;
    use actix_web::test;
    use mockable::MockEnv;
    use rstest::rstest;
    use serde_json::json;

    use minipedia::inbound::http::session_config::{BuildMode, SessionSettings};
    use minipedia::outbound::memory::InMemoryStore;
    use std::sync::Arc;

    use super::state_builders::{WiringOptions, wire_services};
    use super::*;

    /// Debug-mode session over plain HTTP.
    fn debug_session() -> SessionMiddleware<CookieSessionStore> {
        let mut env = MockEnv::new();
        env.expect_string()
            .returning(|name| (name == "SESSION_COOKIE_SECURE").then(|| "0".to_owned()));
        SessionSettings::from_env(&env, BuildMode::Debug)
            .expect("debug settings")
            .middleware()
    }

    async fn memory_state() -> web::Data<HttpState> {
        let store = Arc::new(InMemoryStore::new());
        let state = wire_services(store.clone(), store.clone(), store, WiringOptions::default())
            .await
            .expect("wired");
        web::Data::new(state)
    }

    #[rstest]
    #[actix_web::test]
    async fn probes_reflect_readiness() {
        let health = web::Data::new(HealthState::new());
        let app = test::init_service(build_app(
            health.clone(),
            memory_state().await,
            debug_session(),
        ))
        .await;

        let before =
            test::call_service(&app, test::TestRequest::get().uri("/health/ready").to_request())
                .await;
        assert_eq!(before.status(), StatusCode::SERVICE_UNAVAILABLE);

        health.mark_ready();
        let after =
            test::call_service(&app, test::TestRequest::get().uri("/health/ready").to_request())
                .await;
        assert_eq!(after.status(), StatusCode::OK);
        assert!(after.headers().contains_key("trace-id"));
    }

    #[rstest]
    #[actix_web::test]
    async fn api_routes_are_mounted_under_v1() {
        let app = test::init_service(build_app(
            web::Data::new(HealthState::new()),
            memory_state().await,
            debug_session(),
        ))
        .await;

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/register")
                .set_json(json!({"username": "ana", "email": "ana@example.com", "password": "pw"}))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let anonymous = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/v1/collection").to_request(),
        )
        .await;
        assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);
    }
}
