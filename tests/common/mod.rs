#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use adaptive_quiz_backend::create_app_with;
use adaptive_quiz_backend::services::item_generator::{
    GenerationError, ItemGenerator, ItemRequest,
};
use adaptive_quiz_backend::services::quiz::RawItem;

/// Hands back the same three questions for every request.
pub struct ScriptedGenerator;

pub fn scripted_items() -> Vec<RawItem> {
    vec![
        raw_item("What is 2 + 2?", "MCQ", &["3", "4", "5"], "4", "basic", 1.0),
        raw_item("Water boils at 100 C at sea level.", "true_false", &[], "True", "intermediate", 2.0),
        raw_item("Name the powerhouse of the cell.", "short", &[], "Mitochondria", "advanced", 3.0),
    ]
}

fn raw_item(
    text: &str,
    item_type: &str,
    options: &[&str],
    answer: &str,
    difficulty: &str,
    marks: f64,
) -> RawItem {
    RawItem {
        text: text.to_string(),
        item_type: item_type.to_string(),
        options: options.iter().map(|o| o.to_string()).collect(),
        answer: answer.to_string(),
        difficulty: difficulty.to_string(),
        marks,
        solution: String::new(),
    }
}

#[async_trait]
impl ItemGenerator for ScriptedGenerator {
    async fn generate(&self, _request: &ItemRequest) -> Result<Vec<RawItem>, GenerationError> {
        Ok(scripted_items())
    }
}

pub fn create_test_app() -> Router {
    create_app_with(Arc::new(ScriptedGenerator))
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => request
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

/// Polls `uri` until the task stops answering 202.
pub async fn poll(app: &Router, uri: &str) -> (StatusCode, Value) {
    for _ in 0..200 {
        let (status, body) = send(app, Method::GET, uri, None).await;
        if status != StatusCode::ACCEPTED {
            return (status, body);
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("task at {uri} never finished");
}
