use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json,
    Router,
};
use core_sim::{ConfigError, SimConfig};
use runtime::TickSnapshot;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    state::{AppState, LaunchError},
    ws,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/runs", post(start_run))
        .route("/snapshot", get(latest_snapshot))
        .route("/ws/events", get(ws::events_socket))
        .with_state(state)
}

/// Launch inputs from the dashboard sidebar. Omitted fields take the
/// sidebar defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LaunchRequest {
    pub initial_balance: Option<f64>,
    pub trade_size: Option<u32>,
    pub ma_window: Option<usize>,
}

impl LaunchRequest {
    pub fn into_config(self) -> Result<SimConfig, ConfigError> {
        let defaults = SimConfig::default();
        SimConfig::new(
            self.initial_balance.unwrap_or(defaults.initial_balance),
            self.trade_size.unwrap_or(defaults.trade_size),
            self.ma_window.unwrap_or(defaults.ma_window),
        )
    }
}

#[derive(Debug, Serialize)]
struct StartRunResponse {
    run_id: u64,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct SnapshotResponse {
    running: bool,
    run_id: Option<u64>,
    snapshot: Option<TickSnapshot>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

async fn start_run(
    State(state): State<AppState>,
    Json(request): Json<LaunchRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let config = request
        .into_config()
        .map_err(|err| api_error(StatusCode::UNPROCESSABLE_ENTITY, err.to_string()))?;

    let run_id = state.launch(config).map_err(|err| match err {
        LaunchError::AlreadyRunning => api_error(StatusCode::CONFLICT, "a run is already in progress"),
        LaunchError::RunIdOverflow => {
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "run ids exhausted")
        }
    })?;
    info!(
        run_id,
        initial_balance = config.initial_balance,
        trade_size = config.trade_size,
        ma_window = config.ma_window,
        "launch accepted"
    );
    let location = format!("/runs/{run_id}");

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(StartRunResponse { run_id }),
    ))
}

async fn latest_snapshot(State(state): State<AppState>) -> Json<SnapshotResponse> {
    Json(SnapshotResponse {
        running: state.is_running(),
        run_id: state.active_run_id(),
        snapshot: state.latest_snapshot(),
    })
}
