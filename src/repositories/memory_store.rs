//! In-process implementation of every repository port, used by tests and
//! local runs without MongoDB. Each call takes one lock, so every operation
//! is atomic in the same way the MongoDB adapters are.

use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::{NaiveDate, Utc};
use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use crate::{
    errors::StoreError,
    models::{
        chat_model::{Chat, ChatMessage},
        notification_model::Notification,
        refresh_token_model::RefreshToken,
        session_model::{Session, SessionFeedback},
        transaction_model::{LedgerEntry, Transaction},
        user_model::{MentorProfile, User},
    },
    repositories::{
        chat_repository::ChatRepository,
        ledger_repository::LedgerRepository,
        notification_repository::NotificationRepository,
        refresh_token_repository::RefreshTokenRepository,
        session_repository::SessionRepository,
        user_repository::{MentorQuery, UserRepository},
    },
    types::{
        models::{
            ledger::{TransactionKind, TransactionStatus},
            schedule::DayAvailability,
            session::{SessionKind, SessionStatus},
            user::{mentor_status::MentorStatus, role::Role, user_status::UserStatus},
        },
        requests::query::{
            filters::{ParticipantRole, SessionFilter, UserFilter},
            pagination::PageWindow,
        },
    },
    utils::schedule_utils::upsert_day,
};

#[derive(Default)]
struct MemoryState {
    users: HashMap<ObjectId, User>,
    sessions: HashMap<ObjectId, Session>,
    transactions: Vec<Transaction>,
    notifications: Vec<Notification>,
    chats: HashMap<ObjectId, Chat>,
    refresh_tokens: HashMap<String, RefreshToken>,
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, MemoryState>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::backend("memory store lock poisoned"))
    }
}

fn page_of<T: Clone>(items: &[T], page: &PageWindow) -> Vec<T> {
    let skip = usize::try_from(page.skip()).unwrap_or(usize::MAX);
    let limit = usize::try_from(page.limit).unwrap_or(usize::MAX);
    items.iter().skip(skip).take(limit).cloned().collect()
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn matches_mentor_query(user: &User, query: &MentorQuery) -> bool {
    let Some(profile) = user.approved_mentor_profile() else {
        return false;
    };
    if !user.is_active() {
        return false;
    }

    if let Some(expertise) = query.expertise.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
        if !profile.has_expertise(expertise) {
            return false;
        }
    }

    if let Some(text) = query.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        let hit = contains_ignore_case(&user.name, text)
            || contains_ignore_case(&profile.headline, text)
            || profile
                .expertise
                .iter()
                .any(|entry| contains_ignore_case(entry, text));
        if !hit {
            return false;
        }
    }

    query
        .max_rate
        .is_none_or(|max_rate| profile.hourly_rate <= max_rate)
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create_user(&self, user: &User) -> Result<User, StoreError> {
        let mut state = self.state()?;
        if state.users.values().any(|existing| existing.email == user.email) {
            return Err(StoreError::Conflict("duplicate key".to_string()));
        }
        state.users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<User>, StoreError> {
        Ok(self.state()?.users.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .state()?
            .users
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn list_users(&self, filter: &UserFilter) -> Result<Vec<User>, StoreError> {
        let state = self.state()?;
        let mut users: Vec<User> = state
            .users
            .values()
            .filter(|user| filter.status.is_none_or(|status| user.status == status))
            .filter(|user| filter.role.is_none_or(|role| user.has_role(role)))
            .filter(|user| {
                filter.mentor_status.is_none_or(|status| {
                    user.mentor_profile
                        .as_ref()
                        .is_some_and(|profile| profile.status == status)
                })
            })
            .cloned()
            .collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn update_name(&self, id: &ObjectId, name: &str) -> Result<Option<User>, StoreError> {
        let mut state = self.state()?;
        Ok(state.users.get_mut(id).map(|user| {
            user.name = name.to_string();
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn set_status(
        &self,
        id: &ObjectId,
        status: UserStatus,
    ) -> Result<Option<User>, StoreError> {
        let mut state = self.state()?;
        Ok(state.users.get_mut(id).map(|user| {
            user.status = status;
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn save_mentor_profile(
        &self,
        id: &ObjectId,
        profile: &MentorProfile,
    ) -> Result<Option<User>, StoreError> {
        let mut state = self.state()?;
        Ok(state.users.get_mut(id).map(|user| {
            user.mentor_profile = Some(profile.clone());
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn review_mentor(
        &self,
        id: &ObjectId,
        from: MentorStatus,
        to: MentorStatus,
    ) -> Result<Option<User>, StoreError> {
        let mut state = self.state()?;
        let Some(user) = state.users.get_mut(id) else {
            return Ok(None);
        };
        let Some(profile) = user.mentor_profile.as_mut().filter(|p| p.status == from) else {
            return Ok(None);
        };

        let now = Utc::now();
        profile.status = to;
        profile.reviewed_at = Some(now);
        if to == MentorStatus::Approved {
            user.roles.insert(Role::Mentor);
        } else {
            user.roles.remove(&Role::Mentor);
        }
        user.updated_at = now;
        Ok(Some(user.clone()))
    }

    async fn replace_day(
        &self,
        id: &ObjectId,
        day: &DayAvailability,
        today: NaiveDate,
    ) -> Result<Option<User>, StoreError> {
        let mut state = self.state()?;
        let Some(user) = state.users.get_mut(id) else {
            return Ok(None);
        };
        let Some(profile) = user.mentor_profile.as_mut() else {
            return Ok(None);
        };
        profile.availability.retain(|existing| existing.date >= today);
        upsert_day(&mut profile.availability, day.clone());
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn search_mentors(&self, query: &MentorQuery) -> Result<(Vec<User>, u64), StoreError> {
        let state = self.state()?;
        let mut mentors: Vec<User> = state
            .users
            .values()
            .filter(|user| matches_mentor_query(user, query))
            .cloned()
            .collect();
        mentors.sort_by(|a, b| {
            let rate = |user: &User| {
                user.mentor_profile
                    .as_ref()
                    .map(|profile| profile.hourly_rate)
                    .unwrap_or_default()
            };
            rate(a).cmp(&rate(b)).then_with(|| a.name.cmp(&b.name))
        });
        let total = mentors.len() as u64;
        Ok((page_of(&mentors, &query.page), total))
    }
}

#[async_trait]
impl SessionRepository for MemoryStore {
    async fn create_session(&self, session: &Session) -> Result<(), StoreError> {
        let mut state = self.state()?;
        if state.sessions.contains_key(&session.id) {
            return Err(StoreError::Conflict("duplicate key".to_string()));
        }
        state.sessions.insert(session.id, session.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Session>, StoreError> {
        Ok(self.state()?.sessions.get(id).cloned())
    }

    async fn list_for_user(
        &self,
        user: &ObjectId,
        filter: &SessionFilter,
    ) -> Result<Vec<Session>, StoreError> {
        let state = self.state()?;
        let mut sessions: Vec<Session> = state
            .sessions
            .values()
            .filter(|session| match filter.role {
                Some(ParticipantRole::Mentor) => session.is_mentor(user),
                Some(ParticipantRole::Mentee) => session.is_mentee(user),
                None => session.involves(user),
            })
            .filter(|session| filter.status.is_none_or(|status| session.status == status))
            .cloned()
            .collect();
        sessions.sort_by(|a, b| b.starts_at.cmp(&a.starts_at));
        Ok(sessions)
    }

    async fn list_active_for_mentor_on(
        &self,
        mentor: &ObjectId,
        date: NaiveDate,
    ) -> Result<Vec<Session>, StoreError> {
        let state = self.state()?;
        Ok(state
            .sessions
            .values()
            .filter(|session| {
                session.is_mentor(mentor)
                    && session.scheduled_date == date
                    && session.status.is_active()
            })
            .cloned()
            .collect())
    }

    async fn transition(
        &self,
        id: &ObjectId,
        from: &[SessionStatus],
        to: SessionStatus,
        cancel_reason: Option<&str>,
    ) -> Result<Option<Session>, StoreError> {
        let mut state = self.state()?;
        let Some(session) = state.sessions.get_mut(id) else {
            return Ok(None);
        };
        if !from.contains(&session.status) {
            return Ok(None);
        }
        session.status = to;
        if let Some(reason) = cancel_reason {
            session.cancel_reason = Some(reason.to_string());
        }
        session.updated_at = Utc::now();
        Ok(Some(session.clone()))
    }

    async fn add_mentee(
        &self,
        id: &ObjectId,
        mentee: &ObjectId,
    ) -> Result<Option<Session>, StoreError> {
        let mut state = self.state()?;
        let Some(session) = state.sessions.get_mut(id) else {
            return Ok(None);
        };
        if session.kind != SessionKind::Group
            || !session.status.is_active()
            || session.is_mentee(mentee)
            || session.has_departed(mentee)
            || !session.has_free_seat()
        {
            return Ok(None);
        }
        session.mentees.push(*mentee);
        session.updated_at = Utc::now();
        Ok(Some(session.clone()))
    }

    async fn remove_mentee(
        &self,
        id: &ObjectId,
        mentee: &ObjectId,
        record_departure: bool,
    ) -> Result<Option<Session>, StoreError> {
        let mut state = self.state()?;
        let Some(session) = state.sessions.get_mut(id) else {
            return Ok(None);
        };
        if session.kind != SessionKind::Group
            || (record_departure && !session.status.is_active())
            || !session.is_mentee(mentee)
        {
            return Ok(None);
        }
        session.mentees.retain(|existing| existing != mentee);
        if record_departure && !session.has_departed(mentee) {
            session.departed.push(*mentee);
        }
        session.updated_at = Utc::now();
        Ok(Some(session.clone()))
    }

    async fn add_feedback(
        &self,
        id: &ObjectId,
        feedback: &SessionFeedback,
    ) -> Result<Option<Session>, StoreError> {
        let mut state = self.state()?;
        let Some(session) = state.sessions.get_mut(id) else {
            return Ok(None);
        };
        if session.status != SessionStatus::Completed
            || !session.is_mentee(&feedback.mentee)
            || session.has_feedback_from(&feedback.mentee)
        {
            return Ok(None);
        }
        session.feedback.push(feedback.clone());
        session.updated_at = Utc::now();
        Ok(Some(session.clone()))
    }
}

#[async_trait]
impl LedgerRepository for MemoryStore {
    async fn apply(&self, entry: LedgerEntry) -> Result<Transaction, StoreError> {
        let mut state = self.state()?;

        if let Some(key) = entry.idempotency_key.as_deref() {
            if let Some(existing) = state
                .transactions
                .iter()
                .find(|transaction| transaction.idempotency_key.as_deref() == Some(key))
            {
                return Ok(existing.clone());
            }
        }

        let now = Utc::now();
        let user = state.users.get_mut(&entry.user).ok_or(StoreError::NotFound)?;
        let balance_after = user
            .balance
            .checked_add(entry.amount)
            .ok_or_else(|| StoreError::backend("balance overflow"))?;
        if balance_after < 0 {
            return Err(StoreError::InsufficientFunds {
                balance: user.balance,
                required: entry.amount.saturating_neg(),
            });
        }
        user.balance = balance_after;
        user.updated_at = now;

        let transaction = entry.into_transaction(balance_after, now);
        state.transactions.push(transaction.clone());
        Ok(transaction)
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Transaction>, StoreError> {
        Ok(self
            .state()?
            .transactions
            .iter()
            .find(|transaction| transaction.id == *id)
            .cloned())
    }

    async fn find_by_idempotency_key(
        &self,
        key: &str,
    ) -> Result<Option<Transaction>, StoreError> {
        Ok(self
            .state()?
            .transactions
            .iter()
            .find(|transaction| transaction.idempotency_key.as_deref() == Some(key))
            .cloned())
    }

    async fn list_for_user(
        &self,
        user: &ObjectId,
        page: &PageWindow,
    ) -> Result<(Vec<Transaction>, u64), StoreError> {
        let state = self.state()?;
        let owned: Vec<Transaction> = state
            .transactions
            .iter()
            .rev()
            .filter(|transaction| transaction.user == *user)
            .cloned()
            .collect();
        let total = owned.len() as u64;
        Ok((page_of(&owned, page), total))
    }

    async fn sum_for_user(&self, user: &ObjectId) -> Result<i64, StoreError> {
        Ok(self
            .state()?
            .transactions
            .iter()
            .filter(|transaction| transaction.user == *user)
            .map(|transaction| transaction.amount)
            .sum())
    }

    async fn settle(
        &self,
        id: &ObjectId,
        status: TransactionStatus,
    ) -> Result<Option<Transaction>, StoreError> {
        let mut state = self.state()?;
        Ok(state
            .transactions
            .iter_mut()
            .find(|transaction| {
                transaction.id == *id && transaction.status == TransactionStatus::Pending
            })
            .map(|transaction| {
                transaction.status = status;
                transaction.updated_at = Utc::now();
                transaction.clone()
            }))
    }

    async fn list_pending(&self, kind: TransactionKind) -> Result<Vec<Transaction>, StoreError> {
        Ok(self
            .state()?
            .transactions
            .iter()
            .filter(|transaction| {
                transaction.kind == kind && transaction.status == TransactionStatus::Pending
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl NotificationRepository for MemoryStore {
    async fn create_notification(&self, notification: &Notification) -> Result<(), StoreError> {
        self.state()?.notifications.push(notification.clone());
        Ok(())
    }

    async fn list_for_user(
        &self,
        user: &ObjectId,
        unread_only: bool,
        page: &PageWindow,
    ) -> Result<(Vec<Notification>, u64), StoreError> {
        let state = self.state()?;
        let owned: Vec<Notification> = state
            .notifications
            .iter()
            .rev()
            .filter(|notification| notification.user == *user)
            .filter(|notification| !unread_only || !notification.is_read)
            .cloned()
            .collect();
        let total = owned.len() as u64;
        Ok((page_of(&owned, page), total))
    }

    async fn unread_count(&self, user: &ObjectId) -> Result<u64, StoreError> {
        Ok(self
            .state()?
            .notifications
            .iter()
            .filter(|notification| notification.user == *user && !notification.is_read)
            .count() as u64)
    }

    async fn mark_read(
        &self,
        id: &ObjectId,
        user: &ObjectId,
    ) -> Result<Option<Notification>, StoreError> {
        let mut state = self.state()?;
        Ok(state
            .notifications
            .iter_mut()
            .find(|notification| notification.id == *id && notification.user == *user)
            .map(|notification| {
                notification.is_read = true;
                notification.clone()
            }))
    }

    async fn mark_all_read(&self, user: &ObjectId) -> Result<u64, StoreError> {
        let mut state = self.state()?;
        let mut modified = 0;
        for notification in state
            .notifications
            .iter_mut()
            .filter(|notification| notification.user == *user && !notification.is_read)
        {
            notification.is_read = true;
            modified += 1;
        }
        Ok(modified)
    }

    async fn delete_notification(
        &self,
        id: &ObjectId,
        user: &ObjectId,
    ) -> Result<bool, StoreError> {
        let mut state = self.state()?;
        let before = state.notifications.len();
        state
            .notifications
            .retain(|notification| !(notification.id == *id && notification.user == *user));
        Ok(state.notifications.len() < before)
    }
}

#[async_trait]
impl ChatRepository for MemoryStore {
    async fn create_chat(&self, chat: &Chat) -> Result<(), StoreError> {
        let mut state = self.state()?;
        if state.chats.values().any(|existing| existing.pair_key == chat.pair_key) {
            return Err(StoreError::Conflict("duplicate key".to_string()));
        }
        state.chats.insert(chat.id, chat.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Chat>, StoreError> {
        Ok(self.state()?.chats.get(id).cloned())
    }

    async fn find_by_pair(&self, pair_key: &str) -> Result<Option<Chat>, StoreError> {
        Ok(self
            .state()?
            .chats
            .values()
            .find(|chat| chat.pair_key == pair_key)
            .cloned())
    }

    async fn list_for_user(&self, user: &ObjectId) -> Result<Vec<Chat>, StoreError> {
        let state = self.state()?;
        let mut chats: Vec<Chat> = state
            .chats
            .values()
            .filter(|chat| chat.is_participant(user))
            .cloned()
            .collect();
        chats.sort_by(|a, b| b.last_message_at.cmp(&a.last_message_at));
        Ok(chats)
    }

    async fn push_message(
        &self,
        id: &ObjectId,
        message: &ChatMessage,
        recipients: &[ObjectId],
    ) -> Result<Option<Chat>, StoreError> {
        let mut state = self.state()?;
        let Some(chat) = state
            .chats
            .get_mut(id)
            .filter(|chat| chat.is_participant(&message.sender))
        else {
            return Ok(None);
        };
        chat.messages.push(message.clone());
        chat.last_message_at = message.sent_at;
        for recipient in recipients {
            *chat.unread.entry(recipient.to_hex()).or_insert(0) += 1;
        }
        Ok(Some(chat.clone()))
    }

    async fn mark_read(
        &self,
        id: &ObjectId,
        user: &ObjectId,
    ) -> Result<Option<Chat>, StoreError> {
        let mut state = self.state()?;
        let Some(chat) = state
            .chats
            .get_mut(id)
            .filter(|chat| chat.is_participant(user))
        else {
            return Ok(None);
        };
        chat.unread.insert(user.to_hex(), 0);
        Ok(Some(chat.clone()))
    }
}

#[async_trait]
impl RefreshTokenRepository for MemoryStore {
    async fn save_token(&self, token: &RefreshToken) -> Result<(), StoreError> {
        self.state()?
            .refresh_tokens
            .insert(token.jti.clone(), token.clone());
        Ok(())
    }

    async fn revoke(&self, jti: &str) -> Result<Option<RefreshToken>, StoreError> {
        let mut state = self.state()?;
        Ok(state
            .refresh_tokens
            .get_mut(jti)
            .filter(|token| !token.revoked)
            .map(|token| {
                let before = token.clone();
                token.revoked = true;
                before
            }))
    }

    async fn revoke_all_for_user(&self, user: &ObjectId) -> Result<u64, StoreError> {
        let mut state = self.state()?;
        let mut revoked = 0;
        for token in state
            .refresh_tokens
            .values_mut()
            .filter(|token| token.user == *user && !token.revoked)
        {
            token.revoked = true;
            revoked += 1;
        }
        Ok(revoked)
    }
}
