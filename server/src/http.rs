use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::{self, HeaderName, HeaderValue, Method},
    response::{IntoResponse, Response},
    routing::get,
};
use platform_api::{ApiError, ApiResult};
use products_roster::{Employee, Roster, RosterError};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{error, info, instrument};

use crate::config::AppConfig;

pub const ROOT_MESSAGE: &str = "✅ Employee API is running";

#[derive(Clone)]
pub struct AppState {
    pub roster: Arc<Roster>,
    pub config: Arc<AppConfig>,
}

#[derive(Clone, Debug)]
pub struct ServeConfig {
    addr: SocketAddr,
}

impl ServeConfig {
    pub fn new(host: IpAddr, port: u16) -> Self {
        Self {
            addr: SocketAddr::from((host, port)),
        }
    }
}

pub async fn serve(config: ServeConfig, state: AppState) -> anyhow::Result<()> {
    let employees = state.roster.len();
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

    info!(%config.addr, employees, "roster server listening");
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;
    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();
    let allow_origin = if allowed.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(allowed)
    };
    CorsLayer::new()
        .allow_headers([http::header::CONTENT_TYPE])
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_origin(allow_origin)
}

pub fn build_router(state: AppState) -> Router {
    let request_id = MakeRequestUuid;
    let header_name = HeaderName::from_static("x-request-id");
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/api/employees", get(list_employees_handler))
        .route("/api/employees/email/{email}", get(employee_by_email_handler))
        .route("/api/employees/{id}", get(employee_by_id_handler))
        .route(
            "/api/employees/{id}/reservations",
            get(reservations_handler),
        )
        .route("/api/managers", get(managers_handler))
        .route("/api/manager/{email}/employees", get(team_handler))
        .route("/api/seats", get(seats_handler))
        .fallback(fallback_handler)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(header_name.clone(), request_id))
                .layer(PropagateRequestIdLayer::new(header_name))
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config.cors_allowed_origins)),
        )
        .with_state(state)
}

async fn root_handler() -> &'static str {
    ROOT_MESSAGE
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    version: &'static str,
    total_employees: usize,
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        version: env!("CARGO_PKG_VERSION"),
        total_employees: state.roster.len(),
    })
}

#[derive(Serialize)]
struct EmployeesResponse<'a> {
    total_employees: usize,
    employees: &'a [Employee],
}

#[instrument(name = "http.employees", skip_all)]
async fn list_employees_handler(State(state): State<AppState>) -> Response {
    let employees = state.roster.employees();
    Json(EmployeesResponse {
        total_employees: employees.len(),
        employees,
    })
    .into_response()
}

#[instrument(name = "http.employee_by_email", skip(state))]
async fn employee_by_email_handler(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> ApiResult<Response> {
    let employee = state.roster.find_by_email(&email).map_err(roster_error)?;
    Ok(Json(employee).into_response())
}

#[instrument(name = "http.employee_by_id", skip(state))]
async fn employee_by_id_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let employee = state.roster.find_by_id(&id).map_err(roster_error)?;
    Ok(Json(employee).into_response())
}

#[instrument(name = "http.reservations", skip(state))]
async fn reservations_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let view = state.roster.reservations_for(&id).map_err(roster_error)?;
    Ok(Json(view).into_response())
}

#[derive(Serialize)]
struct ManagersResponse<'a> {
    total_managers: usize,
    managers: Vec<&'a Employee>,
}

#[instrument(name = "http.managers", skip_all)]
async fn managers_handler(State(state): State<AppState>) -> Response {
    let managers = state.roster.managers();
    Json(ManagersResponse {
        total_managers: managers.len(),
        managers,
    })
    .into_response()
}

#[derive(Serialize)]
struct TeamResponse<'a> {
    manager_email: &'a str,
    team_size: usize,
    employees: Vec<&'a Employee>,
}

#[instrument(name = "http.team", skip(state))]
async fn team_handler(State(state): State<AppState>, Path(email): Path<String>) -> Response {
    let employees = state.roster.team_of(&email);
    Json(TeamResponse {
        manager_email: &email,
        team_size: employees.len(),
        employees,
    })
    .into_response()
}

#[instrument(name = "http.seats", skip_all)]
async fn seats_handler(State(state): State<AppState>) -> Response {
    Json(state.roster.seat_occupancy()).into_response()
}

async fn fallback_handler() -> ApiError {
    ApiError::not_found("route not found")
}

fn roster_error(err: RosterError) -> ApiError {
    if err.is_not_found() {
        ApiError::not_found(err.to_string())
    } else {
        ApiError::internal(err.into())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "failed to install CTRL+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    ctrl_c.await;

    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    };

    info!("shutdown signal received");
}
