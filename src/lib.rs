pub mod config;
pub mod irt;
pub mod logging;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;
pub mod workers;

use std::sync::Arc;

use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::QuizConfig;
use crate::services::item_generator::ItemGenerator;
use crate::services::syllabus::StaticSyllabus;
use crate::state::AppState;

pub fn create_app(state: AppState) -> axum::Router {
    routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Router over a fresh process state with default quiz settings.
pub fn create_app_with(generator: Arc<dyn ItemGenerator>) -> axum::Router {
    let config = QuizConfig::default();
    let syllabus = Arc::new(StaticSyllabus::new(
        config.board.clone(),
        config.class_name.clone(),
    ));
    create_app(AppState::build(&config, syllabus, generator))
}
