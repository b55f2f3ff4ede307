use axum::{
    http::header,
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use core_sim::PriceGenerator;
use runtime::{Pacer, SimEngine};

use crate::config::Config;

pub fn build_state(config: &Config) -> api::AppState {
    let generator = match config.price_seed {
        Some(seed) => PriceGenerator::seeded(seed),
        None => PriceGenerator::from_entropy(),
    };
    let engine = SimEngine::new(generator, config.relaunch_policy)
        .with_ticks_per_run(config.ticks_per_run);

    api::AppState::new(engine, Pacer::new(config.tick_interval))
}

pub fn build_app(state: api::AppState) -> Router {
    api::app(state)
        .route("/health", get(healthcheck))
        .route("/", get(index))
        .route("/static/styles.css", get(styles))
        .route("/static/app.js", get(script))
}

async fn healthcheck() -> &'static str {
    "ok"
}

async fn index() -> Html<&'static str> {
    Html(ui::index_html())
}

async fn styles() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], ui::styles_css())
}

async fn script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        ui::app_js(),
    )
}
