//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and
//! REST API. Services are generic over repository/provider traits, but
//! AppState pins them to the concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;

use colloquy_core::chat::service::ChatService;
use colloquy_core::turn::TurnService;
use colloquy_infra::config::{load_global_config, resolve_data_dir};
use colloquy_infra::llm::gemini::GeminiProvider;
use colloquy_infra::sqlite::chat::SqliteChatRepository;
use colloquy_infra::sqlite::pool::DatabasePool;

/// Concrete type aliases for the service generics pinned to infra
/// implementations.
pub type ConcreteTurnService = TurnService<SqliteChatRepository, GeminiProvider>;

pub type ConcreteChatService = ChatService<SqliteChatRepository>;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub turn_service: Arc<ConcreteTurnService>,
    pub chat_service: Arc<ConcreteChatService>,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: connect to DB, wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();

        // Ensure data directory exists
        tokio::fs::create_dir_all(&data_dir).await?;

        // Initialize database
        let db_url = format!(
            "sqlite://{}?mode=rwc",
            data_dir.join("colloquy.db").display()
        );
        let db_pool = DatabasePool::new(&db_url).await?;

        let config = load_global_config(&data_dir).await;

        let mut provider = GeminiProvider::from_env(config.provider.model.clone())?;
        if let Some(base_url) = config.provider.base_url.clone() {
            provider = provider.with_base_url(base_url);
        }

        // Each service gets its own repository handle onto the shared pool.
        let turn_service = TurnService::new(
            SqliteChatRepository::new(db_pool.clone()),
            provider,
            config.history,
        );
        let chat_service = ChatService::new(SqliteChatRepository::new(db_pool.clone()));

        Ok(Self {
            turn_service: Arc::new(turn_service),
            chat_service: Arc::new(chat_service),
            data_dir,
            db_pool,
        })
    }
}
