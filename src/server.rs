// ABOUTME: HTTP server assembly: shared resources, router, middleware, and serve loop
// ABOUTME: Wires the store, advisory provider, version manager, and recalculation trigger from ServerConfig
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::Router;
use http::{header::HeaderName, HeaderValue, Method};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::auth::USER_ID_HEADER;
use crate::config::ServerConfig;
use crate::database::{Database, NutritionRepository};
use crate::llm::{GeminiProvider, LlmProvider};
use crate::nutrition::{
    AdvisoryClient, RecalculationTrigger, TargetCalculator, TargetCommitMode, TargetVersionManager,
};
use crate::routes::{HealthRoutes, UserRoutes};

/// Slack added to the advisory timeout for read requests and save-side waits
const REQUEST_TIMEOUT_MARGIN_SECS: u64 = 15;

/// Shared state handed to every route
pub struct ServerResources {
    /// `SQLite` handle when the repository is database-backed
    pub database: Option<Database>,
    /// Store used by handlers and the nutrition core
    pub repository: Arc<dyn NutritionRepository>,
    /// Target calculator (advisory plus fallback)
    pub calculator: Arc<TargetCalculator>,
    /// Active-row version manager
    pub versions: Arc<TargetVersionManager>,
    /// Post-save recalculation
    pub recalculation: RecalculationTrigger,
}

impl ServerResources {
    /// Assemble resources over any repository
    #[must_use]
    pub fn new(
        repository: Arc<dyn NutritionRepository>,
        calculator: TargetCalculator,
        commit_mode: TargetCommitMode,
    ) -> Self {
        let calculator = Arc::new(calculator);
        let versions = Arc::new(TargetVersionManager::new(
            Arc::clone(&repository),
            commit_mode,
        ));
        let recalculation = RecalculationTrigger::new(
            Arc::clone(&repository),
            Arc::clone(&calculator),
            Arc::clone(&versions),
        );

        Self {
            database: None,
            repository,
            calculator,
            versions,
            recalculation,
        }
    }

    /// Bound how long a save waits for its follow-up recalculation
    #[must_use]
    pub fn with_recalculation_wait(mut self, wait: Duration) -> Self {
        self.recalculation = self.recalculation.with_wait(wait);
        self
    }

    /// Assemble resources over an `SQLite` database
    #[must_use]
    pub fn with_database(
        database: Database,
        calculator: TargetCalculator,
        commit_mode: TargetCommitMode,
    ) -> Self {
        let repository: Arc<dyn NutritionRepository> = Arc::new(database.clone());
        Self {
            database: Some(database),
            ..Self::new(repository, calculator, commit_mode)
        }
    }

    /// Build everything the configuration describes
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or the advisory
    /// client cannot be built
    pub async fn from_config(config: &ServerConfig) -> Result<Self> {
        let database = Database::new(&config.database_url).await?;

        let calculator = match GeminiProvider::from_config(&config.advisory)? {
            Some(provider) => {
                let provider: Arc<dyn LlmProvider> = Arc::new(provider);
                TargetCalculator::new(AdvisoryClient::new(provider, config.advisory.timeout()))
            }
            None => {
                warn!("Advisory service disabled; targets will be formula-based");
                TargetCalculator::formula_only()
            }
        };

        Ok(Self::with_database(database, calculator, config.commit_mode)
            .with_recalculation_wait(request_timeout(config)))
    }
}

/// Configure CORS from the allowed origin list (`*` allows any)
#[must_use]
pub fn setup_cors(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() || origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|o| HeaderValue::from_str(o).ok())
            .collect();
        if parsed.is_empty() {
            AllowOrigin::any()
        } else {
            AllowOrigin::list(parsed)
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_headers([
            HeaderName::from_static("content-type"),
            HeaderName::from_static("accept"),
            HeaderName::from_static("origin"),
            HeaderName::from_static(USER_ID_HEADER),
        ])
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
}

fn request_timeout(config: &ServerConfig) -> Duration {
    Duration::from_secs(config.advisory.timeout_secs + REQUEST_TIMEOUT_MARGIN_SECS)
}

/// Router with every route and the standard middleware stack
///
/// Only reads carry a request timeout. A save answers with its own result
/// once stored, and the recalculation wait bounds the rest.
#[must_use]
pub fn build_router(resources: Arc<ServerResources>, config: &ServerConfig) -> Router {
    let read_timeout = request_timeout(config);

    Router::new()
        .merge(
            HealthRoutes::routes(Arc::clone(&resources)).layer(TimeoutLayer::new(read_timeout)),
        )
        .merge(UserRoutes::routes(resources, read_timeout))
        .layer(setup_cors(&config.cors_origins))
        .layer(TraceLayer::new_for_http())
}

/// Serve until Ctrl-C
///
/// # Errors
///
/// Returns an error if the listener cannot bind or the server fails
pub async fn run(config: ServerConfig) -> Result<()> {
    let resources = Arc::new(ServerResources::from_config(&config).await?);
    let app = build_router(resources, &config);

    let listener = TcpListener::bind(("0.0.0.0", config.http_port)).await?;
    info!(port = config.http_port, "Macro tracker server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}
