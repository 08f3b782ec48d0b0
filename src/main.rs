use std::sync::Arc;

use adaptive_quiz_backend::config::{Config, QuizConfig};
use adaptive_quiz_backend::create_app;
use adaptive_quiz_backend::logging::init_tracing;
use adaptive_quiz_backend::services::item_generator::LlmItemGenerator;
use adaptive_quiz_backend::services::llm_provider::LLMProvider;
use adaptive_quiz_backend::services::syllabus::StaticSyllabus;
use adaptive_quiz_backend::state::AppState;
use adaptive_quiz_backend::workers::WorkerManager;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();
    let _log_guard = init_tracing(&config.log_level);

    let quiz_config = QuizConfig::from_env();
    let syllabus = Arc::new(StaticSyllabus::new(
        quiz_config.board.clone(),
        quiz_config.class_name.clone(),
    ));

    let llm = LLMProvider::from_env();
    if !llm.is_available() {
        tracing::warn!("LLM_API_KEY not set, quiz generation requests will fail");
    }
    let generator = Arc::new(LlmItemGenerator::new(llm, Arc::clone(&syllabus)));
    let state = AppState::build(&quiz_config, syllabus, generator);

    let worker_manager = match WorkerManager::new(state.tasks(), quiz_config.task_ttl).await {
        Ok(manager) => {
            if let Err(e) = manager.start().await {
                tracing::error!(error = %e, "failed to start workers");
            }
            Some(manager)
        }
        Err(e) => {
            tracing::warn!(error = %e, "worker manager not initialized");
            None
        }
    };

    let app = create_app(state);

    let addr = config.bind_addr();
    tracing::info!(%addr, "adaptive quiz backend listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("bind listener failed");

    let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

    if let Err(e) = server.await {
        tracing::error!(error = %e, "server error");
    }

    tracing::info!("HTTP server stopped, shutting down workers");

    if let Some(ref manager) = worker_manager {
        manager.stop().await;
    }

    tracing::info!("Graceful shutdown complete");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
