use std::collections::HashMap;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::irt::DifficultyLevel;
use crate::services::quiz::HistoryEntry;
use crate::services::quiz_history::PerformanceSummary;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AbilityResponse {
    ability: f64,
    level: DifficultyLevel,
}

pub async fn ability(State(state): State<AppState>) -> Json<AbilityResponse> {
    let snapshot = state.lifecycle().estimator().snapshot();
    Json(AbilityResponse {
        ability: snapshot.ability,
        level: snapshot.level,
    })
}

pub async fn history(State(state): State<AppState>) -> Json<HashMap<String, HistoryEntry>> {
    Json(state.lifecycle().history_entries())
}

pub async fn performance(State(state): State<AppState>) -> Json<PerformanceSummary> {
    Json(state.lifecycle().performance_summary())
}
