//! Shared server state.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use utoipa::ToSchema;

use gwydion_content::WikiClient;
use gwydion_llm::SharedBackend;
use gwydion_oauth::OAuthConfig;

use crate::config::ServerConfig;
use crate::session::SessionStore;

/// A configured bot profile.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Bot {
    /// Registry-assigned identifier.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Base bot this profile derives from.
    pub base_bot: String,
    /// System prompt driving the bot.
    pub prompt: String,
    /// Whether the bot is visible to other users.
    pub public_access: bool,
    /// Whether related bots are suggested alongside this one.
    pub related_bots: bool,
    /// Whether the prompt is shown to users.
    pub show_prompt: bool,
}

/// Fields supplied when creating a bot.
#[derive(Debug)]
pub struct NewBot {
    pub name: String,
    pub base_bot: String,
    pub prompt: String,
    pub public_access: bool,
    pub related_bots: bool,
    pub show_prompt: bool,
}

/// In-memory bot registry.
///
/// Cloning shares the underlying list. The registry starts seeded with two
/// sample profiles so the listing endpoint has content before any bot is
/// created.
#[derive(Debug, Clone)]
pub struct BotRegistry {
    inner: Arc<RwLock<Vec<Bot>>>,
}

impl BotRegistry {
    /// Create a registry pre-populated with the sample bots.
    pub fn seeded() -> Self {
        let bots = vec![
            Bot {
                id: 1,
                name: "Sample Bot 1".to_string(),
                base_bot: "Base Bot 1".to_string(),
                prompt: "Prompt 1".to_string(),
                public_access: true,
                related_bots: false,
                show_prompt: true,
            },
            Bot {
                id: 2,
                name: "Sample Bot 2".to_string(),
                base_bot: "Base Bot 2".to_string(),
                prompt: "Prompt 2".to_string(),
                public_access: false,
                related_bots: true,
                show_prompt: false,
            },
        ];
        Self {
            inner: Arc::new(RwLock::new(bots)),
        }
    }

    /// Snapshot of every bot, in insertion order.
    pub async fn list(&self) -> Vec<Bot> {
        self.inner.read().await.clone()
    }

    /// Append a bot, assigning the next free id.
    pub async fn add(&self, new: NewBot) -> Bot {
        let mut bots = self.inner.write().await;
        let id = bots.iter().map(|bot| bot.id).max().unwrap_or(0) + 1;
        let bot = Bot {
            id,
            name: new.name,
            base_bot: new.base_bot,
            prompt: new.prompt,
            public_access: new.public_access,
            related_bots: new.related_bots,
            show_prompt: new.show_prompt,
        };
        bots.push(bot.clone());
        bot
    }
}

/// Shared application state.
///
/// Cloning is cheap; every field is a handle.
#[derive(Clone)]
pub struct AppState {
    /// Provider endpoints and client credentials for the authorization flow.
    pub oauth: Arc<OAuthConfig>,

    /// Per-browser session state.
    pub sessions: SessionStore,

    /// Text completion backend.
    pub backend: SharedBackend,

    /// Wikipedia content source.
    pub wiki: WikiClient,

    /// Bot registry.
    pub bots: BotRegistry,

    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Assemble the state from its parts.
    pub fn new(
        oauth: OAuthConfig,
        backend: SharedBackend,
        wiki: WikiClient,
        config: ServerConfig,
    ) -> Self {
        Self {
            oauth: Arc::new(oauth),
            sessions: SessionStore::new(),
            backend,
            wiki,
            bots: BotRegistry::seeded(),
            config: Arc::new(config),
        }
    }
}
