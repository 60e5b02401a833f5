pub mod chat_repository;
pub mod ledger_repository;
pub mod memory_store;
pub mod notification_repository;
pub mod refresh_token_repository;
pub mod session_repository;
pub mod user_repository;

use mongodb::{Client, Database};
use std::sync::Arc;

use self::{
    chat_repository::{ChatRepository, MongoChatRepository},
    ledger_repository::{LedgerRepository, MongoLedgerRepository},
    memory_store::MemoryStore,
    notification_repository::{MongoNotificationRepository, NotificationRepository},
    refresh_token_repository::{MongoRefreshTokenRepository, RefreshTokenRepository},
    session_repository::{MongoSessionRepository, SessionRepository},
    user_repository::{MongoUserRepository, UserRepository},
};

/// Every repository port the services depend on.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub sessions: Arc<dyn SessionRepository>,
    pub ledger: Arc<dyn LedgerRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
    pub chats: Arc<dyn ChatRepository>,
    pub refresh_tokens: Arc<dyn RefreshTokenRepository>,
}

impl Repositories {
    pub fn mongo(client: &Client, database: &Database) -> Self {
        Self {
            users: Arc::new(MongoUserRepository::new(database)),
            sessions: Arc::new(MongoSessionRepository::new(database)),
            ledger: Arc::new(MongoLedgerRepository::new(client, database)),
            notifications: Arc::new(MongoNotificationRepository::new(database)),
            chats: Arc::new(MongoChatRepository::new(database)),
            refresh_tokens: Arc::new(MongoRefreshTokenRepository::new(database)),
        }
    }

    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            users: store.clone(),
            sessions: store.clone(),
            ledger: store.clone(),
            notifications: store.clone(),
            chats: store.clone(),
            refresh_tokens: store,
        }
    }
}
