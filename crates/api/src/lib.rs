pub mod routes;
pub mod state;
pub mod ws;

use axum::Router;

pub use routes::LaunchRequest;
pub use state::{AppState, LaunchError, RuntimeEvent};

pub fn app(state: AppState) -> Router {
    routes::router(state)
}
