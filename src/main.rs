//! Flowbot server binary.
//!
//! Boot order: configuration, logging, script load (all-or-nothing),
//! classifier selection, then the HTTP server with a background task that
//! evicts idle sessions.

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use axum::Router;
use chrono::Utc;
use secrecy::ExposeSecret;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flowbot::adapters::ai::{KeywordClassifier, LlmClassifier, LlmClassifierConfig, MockClassifier};
use flowbot::adapters::http::{conversation_routes, ConversationHandlers};
use flowbot::adapters::FileScriptSource;
use flowbot::application::{ConversationService, SessionStore};
use flowbot::config::{AppConfig, ClassifierConfig, ClassifierProvider};
use flowbot::domain::conversation::ConversationEngine;
use flowbot::domain::script::ScriptRegistry;
use flowbot::ports::{IntentClassifier, ScriptSource};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.server.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(environment = ?config.server.environment, "starting flowbot");

    // All-or-nothing: any script error aborts startup.
    let source = FileScriptSource::new(&config.script.path);
    let loaded = ScriptRegistry::load(&source.read()?)?;
    for warning in &loaded.warnings {
        tracing::warn!(step = %warning.name, line = warning.line, "duplicate step definition, later one wins");
    }
    tracing::info!(
        steps = loaded.registry.len(),
        path = %source.location(),
        "script loaded"
    );

    let classifier = build_classifier(&config.classifier)?;
    let engine = ConversationEngine::new(
        Arc::new(loaded.registry),
        classifier,
        config.engine.to_settings(),
    );

    let store = Arc::new(SessionStore::new());
    spawn_eviction_task(
        Arc::clone(&store),
        config.engine.session_idle_ttl_secs,
    );

    let service = Arc::new(ConversationService::new(engine, store));
    let handlers = ConversationHandlers::new(service);

    let app = Router::new().nest("/api", conversation_routes(handlers)).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.server.request_timeout_secs,
            )))
            .layer(cors_layer(&config)),
    );

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_classifier(
    config: &ClassifierConfig,
) -> Result<Arc<dyn IntentClassifier>, Box<dyn std::error::Error>> {
    match config.provider {
        ClassifierProvider::Keyword => {
            tracing::info!("using the offline keyword classifier");
            Ok(Arc::new(KeywordClassifier::new()))
        }
        ClassifierProvider::Mock => {
            tracing::info!("using the mock classifier, every utterance is a no-match");
            Ok(Arc::new(MockClassifier::new()))
        }
        ClassifierProvider::Llm => {
            // validate() already requires the key for this provider.
            let api_key = config
                .api_key
                .as_ref()
                .ok_or("classifier API key missing")?;
            let llm_config = LlmClassifierConfig::new(api_key.expose_secret().clone())
                .with_model(&config.model)
                .with_base_url(&config.base_url)
                .with_timeout(config.timeout());
            tracing::info!(model = %config.model, base_url = %config.base_url, "using the LLM classifier");
            Ok(Arc::new(LlmClassifier::new(llm_config)?))
        }
    }
}

fn spawn_eviction_task(store: Arc<SessionStore>, idle_ttl_secs: u64) {
    let ttl = chrono::Duration::seconds(idle_ttl_secs as i64);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            let evicted = store.evict_idle(Utc::now(), ttl).await;
            if evicted > 0 {
                tracing::info!(evicted, "idle session sweep");
            }
        }
    });
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(tower_http::cors::AllowOrigin::list(origins))
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any)
    }
}
