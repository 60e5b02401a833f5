#![allow(dead_code)]

use bson::oid::ObjectId;
use chrono::{Duration, NaiveDate, Utc};
use std::collections::HashSet;

use mentorhub_backend::{
    app::AppServices,
    config::app_config::AppConfig,
    models::{transaction_model::LedgerEntry, user_model::User},
    repositories::Repositories,
    types::{
        models::{
            ledger::TransactionKind,
            schedule::DayAvailability,
            user::{mentor_status::MentorStatus, role::Role, user_status::UserStatus},
        },
        requests::{
            auth::{login_request::LoginRequest, register_request::RegisterRequest},
            user::{
                availability_request::{AvailabilityRequest, SlotRequest},
                mentor_profile_request::MentorProfileRequest,
            },
        },
    },
    utils::{
        auth_utils::hash_password,
        locale_utils::{Lang, Messages},
        validation_utils::validate_availability_data,
    },
};

pub const PASSWORD: &str = "Str0ng!pass";

/// A signed-in account: its id and a bearer access token.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: ObjectId,
    pub token: String,
    pub refresh_token: String,
}

impl Account {
    pub fn bearer(&self) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", self.token))
    }
}

pub struct TestContext {
    pub services: AppServices,
    pub repositories: Repositories,
    pub messages: std::sync::Arc<Messages>,
}

impl TestContext {
    pub fn new() -> Self {
        let repositories = Repositories::in_memory();
        Self {
            services: AppServices::new(&AppConfig::for_tests(), repositories.clone()),
            repositories,
            messages: Messages::new(Lang::En),
        }
    }

    pub async fn login(&self, email: &str) -> Account {
        let session = self
            .services
            .auth
            .login(
                &LoginRequest {
                    email: email.to_string(),
                    password: PASSWORD.to_string(),
                },
                &self.messages,
            )
            .await
            .expect("login");
        Account {
            id: ObjectId::parse_str(&session.user.id).expect("user id"),
            token: session.tokens.access_token,
            refresh_token: session.tokens.refresh_token,
        }
    }

    pub async fn mentee(&self, name: &str, email: &str) -> Account {
        self.services
            .auth
            .register(
                RegisterRequest {
                    name: name.to_string(),
                    email: email.to_string(),
                    password: PASSWORD.to_string(),
                },
                &self.messages,
            )
            .await
            .expect("register");
        self.login(email).await
    }

    pub async fn admin(&self, email: &str) -> Account {
        let now = Utc::now();
        self.repositories
            .users
            .create_user(&User {
                id: ObjectId::new(),
                name: "Admin".to_string(),
                email: email.to_string(),
                password: hash_password(PASSWORD).expect("hash"),
                roles: HashSet::from([Role::Mentee, Role::Admin]),
                status: UserStatus::Active,
                balance: 0,
                mentor_profile: None,
                created_at: now,
                updated_at: now,
            })
            .await
            .expect("create admin");
        self.login(email).await
    }

    /// An approved mentor teaching `expertise` at `hourly_rate`, available
    /// 09:00-17:00 on `date`.
    pub async fn mentor(
        &self,
        name: &str,
        email: &str,
        expertise: &[&str],
        hourly_rate: i64,
        date: NaiveDate,
    ) -> Account {
        let account = self.mentee(name, email).await;
        self.services
            .mentors
            .apply(
                &account.id,
                &MentorProfileRequest {
                    headline: format!("{} mentor", expertise.join(" & ")),
                    bio: String::new(),
                    expertise: expertise.iter().map(|e| e.to_string()).collect(),
                    hourly_rate,
                },
                &self.messages,
            )
            .await
            .expect("apply");
        self.services
            .admin
            .review_mentor(&account.id, MentorStatus::Approved, &self.messages)
            .await
            .expect("approve");
        self.open_day(&account.id, date, &[("09:00", "17:00")]).await;
        account
    }

    pub async fn open_day(
        &self,
        mentor: &ObjectId,
        date: NaiveDate,
        slots: &[(&str, &str)],
    ) -> Vec<DayAvailability> {
        let request = AvailabilityRequest {
            date,
            slots: slots
                .iter()
                .map(|(start, end)| SlotRequest {
                    start_time: start.to_string(),
                    end_time: end.to_string(),
                })
                .collect(),
        };
        let day = validate_availability_data(&request, Utc::now().date_naive(), &self.messages)
            .expect("valid availability");
        self.services
            .mentors
            .set_availability(mentor, day, &self.messages)
            .await
            .expect("set availability")
    }

    pub async fn fund(&self, user: &ObjectId, amount: i64) {
        self.services
            .ledger
            .apply(LedgerEntry::new(
                *user,
                TransactionKind::AddFunds,
                amount,
                "Test top-up",
            ))
            .await
            .expect("fund");
    }

    pub async fn balance(&self, user: &ObjectId) -> i64 {
        self.services
            .ledger
            .balance(user, &self.messages)
            .await
            .expect("balance")
    }
}

pub fn next_week() -> NaiveDate {
    Utc::now().date_naive() + Duration::days(7)
}

/// Hex id of a serialized model (`{"_id": {"$oid": ...}}`).
pub fn oid(value: &serde_json::Value) -> String {
    value["_id"]["$oid"]
        .as_str()
        .expect("object id")
        .to_string()
}
