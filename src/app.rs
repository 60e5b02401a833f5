use actix_web::web;
use std::sync::Arc;

use crate::{
    config::app_config::AppConfig,
    realtime::RealtimeHub,
    repositories::Repositories,
    services::{
        admin_service::AdminService, auth_service::AuthService, chat_service::ChatService,
        ledger_service::LedgerService, mentor_service::MentorService,
        notification_service::NotificationService, session_service::SessionService,
        user_service::UserService,
    },
};

/// Every service wired against one set of repositories and one realtime hub.
#[derive(Clone)]
pub struct AppServices {
    pub hub: Arc<RealtimeHub>,
    pub auth: Arc<AuthService>,
    pub users: Arc<UserService>,
    pub mentors: Arc<MentorService>,
    pub sessions: Arc<SessionService>,
    pub ledger: Arc<LedgerService>,
    pub notifications: Arc<NotificationService>,
    pub chats: Arc<ChatService>,
    pub admin: Arc<AdminService>,
}

impl AppServices {
    pub fn new(config: &AppConfig, repositories: Repositories) -> Self {
        let hub = Arc::new(RealtimeHub::new());

        let notifications = Arc::new(NotificationService::new(
            repositories.notifications.clone(),
            hub.clone(),
        ));
        let ledger = Arc::new(LedgerService::new(
            repositories.ledger.clone(),
            repositories.users.clone(),
            notifications.clone(),
            config.payout_threshold,
        ));

        Self {
            auth: Arc::new(AuthService::new(
                repositories.users.clone(),
                repositories.refresh_tokens.clone(),
                config,
            )),
            users: Arc::new(UserService::new(repositories.users.clone())),
            mentors: Arc::new(MentorService::new(
                repositories.users.clone(),
                repositories.sessions.clone(),
            )),
            sessions: Arc::new(SessionService::new(
                repositories.sessions.clone(),
                repositories.users.clone(),
                ledger.clone(),
                notifications.clone(),
            )),
            chats: Arc::new(ChatService::new(
                repositories.chats.clone(),
                repositories.users.clone(),
                notifications.clone(),
            )),
            admin: Arc::new(AdminService::new(
                repositories.users.clone(),
                repositories.refresh_tokens.clone(),
                notifications.clone(),
            )),
            ledger,
            notifications,
            hub,
        }
    }

    pub fn auth_data(&self) -> web::Data<Arc<AuthService>> {
        web::Data::new(self.auth.clone())
    }
}
