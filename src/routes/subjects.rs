use std::collections::BTreeMap;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SubjectsResponse {
    board: String,
    #[serde(rename = "class")]
    class_name: String,
    subjects: Vec<&'static str>,
    topics: BTreeMap<&'static str, Vec<&'static str>>,
}

pub async fn list_subjects(State(state): State<AppState>) -> Json<SubjectsResponse> {
    let syllabus = state.syllabus();
    let subjects = syllabus.subjects();
    let topics = subjects
        .iter()
        .map(|subject| (*subject, syllabus.topics(subject)))
        .collect();

    Json(SubjectsResponse {
        board: syllabus.board().to_string(),
        class_name: syllabus.class_name().to_string(),
        subjects,
        topics,
    })
}
