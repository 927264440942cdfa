//! Server construction and wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use serde_json::json;

use wicket::RequestLog;
use wicket::domain::{AuthService, Error, TokenService};
use wicket::inbound::http::auth::{login, me, register};
use wicket::inbound::http::health::{HealthState, live, ready};
use wicket::inbound::http::state::HttpState;
use wicket::outbound::InMemoryUserRepository;

fn json_config() -> web::JsonConfig {
    // Keep malformed-body failures on the same envelope as validation
    // failures instead of Actix's default plain-text 400.
    web::JsonConfig::default().error_handler(|err, _req| {
        Error::invalid_request("Request body is not valid JSON")
            .with_details(json!({ "reason": err.to_string() }))
            .into()
    })
}

fn build_app(
    http_state: web::Data<HttpState>,
    health_state: web::Data<HealthState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let api = web::scope("/api/v1")
        .app_data(json_config())
        .service(register)
        .service(login)
        .service(me);

    App::new()
        .app_data(http_state)
        .app_data(health_state)
        .wrap(RequestLog)
        .service(api)
        .service(ready)
        .service(live)
}

/// Build the application state and serve until shutdown.
pub async fn run(config: ServerConfig) -> std::io::Result<()> {
    let ServerConfig { bind_addr, secret } = config;

    let tokens = TokenService::new(&secret);
    let repository = Arc::new(InMemoryUserRepository::default());
    let auth = AuthService::new(repository, tokens)
        .map_err(|err| std::io::Error::other(format!("auth service startup failed: {err}")))?;

    let http_state = web::Data::new(HttpState::new(Arc::new(auth)));
    let health_state = web::Data::new(HealthState::new());

    let app_http_state = http_state.clone();
    let app_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        build_app(app_http_state.clone(), app_health_state.clone())
    })
    .bind(bind_addr)?;

    health_state.mark_ready();
    server.run().await
}
