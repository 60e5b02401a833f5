use bson::oid::ObjectId;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    constants::MAX_ADD_FUNDS_AMOUNT,
    errors::AppError,
    models::{
        transaction_model::{LedgerEntry, Transaction},
        user_model::User,
    },
    repositories::{ledger_repository::LedgerRepository, user_repository::UserRepository},
    services::notification_service::{NewNotification, NotificationService},
    types::{
        models::{
            ledger::{TransactionKind, TransactionStatus},
            notification::{NotificationKind, ReferenceType},
            user::role::Role,
        },
        requests::{
            ledger::{
                funds_request::{AddFundsRequest, AdminAdjustmentRequest, PurchaseCreditsRequest},
                payout_request::PayoutRequest,
            },
            query::{filters::UserFilter, pagination::Pagination},
        },
        responses::api_response::Paginated,
    },
    utils::{
        locale_utils::Messages,
        retry_utils::{RetryPolicy, with_retry},
        validation_utils::parse_object_id,
    },
};

const MAX_CREDITS_PER_PURCHASE: i64 = 10_000;

/// Cached balance against the sum of the user's ledger rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub user_id: String,
    pub balance: i64,
    pub ledger_sum: i64,
    pub drift: i64,
}

impl ReconcileReport {
    pub fn is_consistent(&self) -> bool {
        self.drift == 0
    }
}

pub struct LedgerService {
    pub ledger_repository: Arc<dyn LedgerRepository>,
    pub user_repository: Arc<dyn UserRepository>,
    pub notifications: Arc<NotificationService>,
    pub retry_policy: RetryPolicy,
    pub payout_threshold: i64,
}

impl LedgerService {
    pub fn new(
        ledger_repository: Arc<dyn LedgerRepository>,
        user_repository: Arc<dyn UserRepository>,
        notifications: Arc<NotificationService>,
        payout_threshold: i64,
    ) -> Self {
        Self {
            ledger_repository,
            user_repository,
            notifications,
            retry_policy: RetryPolicy::default(),
            payout_threshold,
        }
    }

    /// The only path that moves a balance.
    pub async fn apply(&self, entry: LedgerEntry) -> Result<Transaction, AppError> {
        if !entry.kind.accepts_amount(entry.amount) {
            return Err(AppError::invalid(format!(
                "Amount {} is not valid for a {} entry",
                entry.amount, entry.kind
            )));
        }

        let mut entry = entry;
        // Every attempt carries the same key, so a retry after a commit that
        // did land returns the stored row instead of applying it again.
        if entry.idempotency_key.is_none() {
            entry.idempotency_key = Some(format!("ledger:{}", Uuid::new_v4()));
        }

        let user = entry.user;
        let kind = entry.kind;
        let transaction = with_retry(self.retry_policy, "ledger.apply", || {
            self.ledger_repository.apply(entry.clone())
        })
        .await
        .map_err(|err| AppError::from_store(err, "User"))?;

        log::info!(
            "Ledger {} of {} for user {} (balance now {})",
            kind,
            transaction.amount,
            user,
            transaction.balance_after
        );
        Ok(transaction)
    }

    pub async fn find_by_key(&self, key: &str) -> Result<Option<Transaction>, AppError> {
        Ok(self.ledger_repository.find_by_idempotency_key(key).await?)
    }

    pub async fn balance(&self, user_id: &ObjectId, messages: &Messages) -> Result<i64, AppError> {
        let user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(messages.get_user_message("fetch.not_found", "User not found"))
            })?;
        Ok(user.balance)
    }

    pub async fn list(
        &self,
        user_id: &ObjectId,
        pagination: &Pagination,
    ) -> Result<Paginated<Transaction>, AppError> {
        let window = pagination.window();
        let (items, total) = self
            .ledger_repository
            .list_for_user(user_id, &window)
            .await?;
        Ok(Paginated {
            items,
            total,
            page: window.page,
            limit: window.limit,
        })
    }

    pub async fn get(
        &self,
        id: &ObjectId,
        user_id: &ObjectId,
        messages: &Messages,
    ) -> Result<Transaction, AppError> {
        self.ledger_repository
            .find_by_id(id)
            .await?
            .filter(|transaction| transaction.user == *user_id)
            .ok_or_else(|| {
                AppError::not_found(
                    messages.get_ledger_message("transaction.not_found", "Transaction not found"),
                )
            })
    }

    pub async fn add_funds(
        &self,
        user_id: &ObjectId,
        request: &AddFundsRequest,
        messages: &Messages,
    ) -> Result<Transaction, AppError> {
        if !(1..=MAX_ADD_FUNDS_AMOUNT).contains(&request.amount) {
            return Err(AppError::invalid(messages.get_ledger_message(
                "add_funds.out_of_range",
                &format!("Amount must be between 1 and {}", MAX_ADD_FUNDS_AMOUNT),
            )));
        }

        let mut entry = LedgerEntry::new(
            *user_id,
            TransactionKind::AddFunds,
            request.amount,
            "Funds added",
        );
        if let Some(key) = non_empty(request.idempotency_key.as_deref()) {
            entry = entry.with_idempotency_key(format!("add_funds:{}:{}", user_id, key));
        }
        self.apply(entry).await
    }

    pub async fn purchase_credits(
        &self,
        user_id: &ObjectId,
        request: &PurchaseCreditsRequest,
        messages: &Messages,
    ) -> Result<Transaction, AppError> {
        if !(1..=MAX_CREDITS_PER_PURCHASE).contains(&request.credits) || request.unit_price <= 0 {
            return Err(AppError::invalid(messages.get_ledger_message(
                "purchase.invalid",
                "Credit package is not valid",
            )));
        }
        let amount = request
            .credits
            .checked_mul(request.unit_price)
            .filter(|amount| *amount <= MAX_ADD_FUNDS_AMOUNT)
            .ok_or_else(|| {
                AppError::invalid(messages.get_ledger_message(
                    "purchase.too_large",
                    "Credit package is too large",
                ))
            })?;

        let mut entry = LedgerEntry::new(
            *user_id,
            TransactionKind::Purchase,
            amount,
            format!("Purchased {} credits", request.credits),
        )
        .with_credits(request.credits);
        if let Some(key) = non_empty(request.idempotency_key.as_deref()) {
            entry = entry.with_idempotency_key(format!("purchase:{}:{}", user_id, key));
        }
        self.apply(entry).await
    }

    /// Debits the amount immediately as a pending payout; settlement either
    /// completes it or refunds it.
    pub async fn request_payout(
        &self,
        user: &User,
        request: &PayoutRequest,
        messages: &Messages,
    ) -> Result<Transaction, AppError> {
        if !user.has_role(Role::Mentor) {
            return Err(AppError::forbidden(messages.get_ledger_message(
                "payout.mentor_only",
                "Only mentors can request payouts",
            )));
        }
        if request.amount < self.payout_threshold {
            return Err(AppError::invalid(messages.get_ledger_message(
                "payout.below_threshold",
                &format!("Payouts start at {}", self.payout_threshold),
            )));
        }

        let mut entry = LedgerEntry::new(
            user.id,
            TransactionKind::Payout,
            -request.amount,
            "Payout requested",
        )
        .with_status(TransactionStatus::Pending);
        if let Some(key) = non_empty(request.idempotency_key.as_deref()) {
            entry = entry.with_idempotency_key(format!("payout:{}:{}", user.id, key));
        }
        self.apply(entry).await
    }

    pub async fn pending_payouts(&self) -> Result<Vec<Transaction>, AppError> {
        Ok(self
            .ledger_repository
            .list_pending(TransactionKind::Payout)
            .await?)
    }

    pub async fn settle_payout(
        &self,
        id: &ObjectId,
        status: TransactionStatus,
        messages: &Messages,
    ) -> Result<Transaction, AppError> {
        if status == TransactionStatus::Pending {
            return Err(AppError::invalid(messages.get_ledger_message(
                "payout.invalid_status",
                "Payouts settle as completed or failed",
            )));
        }

        let not_found = || {
            AppError::not_found(
                messages.get_ledger_message("payout.not_found", "Payout not found"),
            )
        };
        let payout = self
            .ledger_repository
            .find_by_id(id)
            .await?
            .filter(|transaction| transaction.kind == TransactionKind::Payout)
            .ok_or_else(not_found)?;

        let settled = self
            .ledger_repository
            .settle(&payout.id, status)
            .await?
            .ok_or_else(|| {
                AppError::conflict(messages.get_ledger_message(
                    "payout.already_settled",
                    "Payout was already settled",
                ))
            })?;

        if status == TransactionStatus::Failed {
            let refund = LedgerEntry::new(
                payout.user,
                TransactionKind::Refund,
                payout.amount.saturating_neg(),
                "Payout failed, amount returned",
            )
            .with_reference(payout.id)
            .with_idempotency_key(format!("payout_refund:{}", payout.id));
            self.apply(refund).await?;
        }

        self.notifications
            .notify_quietly(
                NewNotification::new(
                    payout.user,
                    NotificationKind::PayoutUpdated,
                    "Payout updated",
                    format!("Your payout of {} is {}", -payout.amount, status),
                )
                .about(payout.id, ReferenceType::Transaction),
            )
            .await;

        Ok(settled)
    }

    pub async fn admin_adjust(
        &self,
        request: &AdminAdjustmentRequest,
        messages: &Messages,
    ) -> Result<Transaction, AppError> {
        let user_id = parse_object_id(&request.user_id, messages)?;
        if request.reason.trim().is_empty() {
            return Err(AppError::invalid(messages.get_ledger_message(
                "adjustment.reason_required",
                "A reason is required",
            )));
        }
        if request.amount == 0 || request.amount.abs() > MAX_ADD_FUNDS_AMOUNT {
            return Err(AppError::invalid(messages.get_ledger_message(
                "adjustment.out_of_range",
                "Adjustment amount is out of range",
            )));
        }

        self.apply(LedgerEntry::new(
            user_id,
            TransactionKind::Credit,
            request.amount,
            format!("Adjustment: {}", request.reason.trim()),
        ))
        .await
    }

    pub async fn reconcile_user(
        &self,
        user_id: &ObjectId,
        messages: &Messages,
    ) -> Result<ReconcileReport, AppError> {
        let user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(messages.get_user_message("fetch.not_found", "User not found"))
            })?;
        self.reconcile(&user).await
    }

    /// Reports for every user whose balance drifted from the ledger.
    pub async fn reconcile_all(&self) -> Result<Vec<ReconcileReport>, AppError> {
        let users = self.user_repository.list_users(&UserFilter::default()).await?;
        let mut drifted = Vec::new();
        for user in &users {
            let report = self.reconcile(user).await?;
            if !report.is_consistent() {
                log::warn!(
                    "Balance drift of {} for user {}",
                    report.drift,
                    report.user_id
                );
                drifted.push(report);
            }
        }
        Ok(drifted)
    }

    async fn reconcile(&self, user: &User) -> Result<ReconcileReport, AppError> {
        let ledger_sum = self.ledger_repository.sum_for_user(&user.id).await?;
        Ok(ReconcileReport {
            user_id: user.id.to_hex(),
            balance: user.balance,
            ledger_sum,
            drift: user.balance - ledger_sum,
        })
    }
}

fn non_empty(key: Option<&str>) -> Option<&str> {
    key.map(str::trim).filter(|key| !key.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        errors::StoreError,
        realtime::RealtimeHub,
        repositories::Repositories,
        types::{
            models::user::{defaults::default_roles, user_status::UserStatus},
            requests::query::pagination::PageWindow,
        },
        utils::locale_utils::Lang,
    };
    use async_trait::async_trait;
    use chrono::Utc;
    use std::{
        sync::atomic::{AtomicBool, Ordering},
        time::Duration,
    };

    /// Commits the first write and then reports it as failed, the way a lost
    /// commit acknowledgement looks to the caller.
    struct LostAckLedger {
        inner: Arc<dyn LedgerRepository>,
        acked_once: AtomicBool,
    }

    #[async_trait]
    impl LedgerRepository for LostAckLedger {
        async fn apply(&self, entry: LedgerEntry) -> Result<Transaction, StoreError> {
            let transaction = self.inner.apply(entry).await?;
            if !self.acked_once.swap(true, Ordering::SeqCst) {
                return Err(StoreError::transient("commit result unknown"));
            }
            Ok(transaction)
        }

        async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Transaction>, StoreError> {
            self.inner.find_by_id(id).await
        }

        async fn find_by_idempotency_key(
            &self,
            key: &str,
        ) -> Result<Option<Transaction>, StoreError> {
            self.inner.find_by_idempotency_key(key).await
        }

        async fn list_for_user(
            &self,
            user: &ObjectId,
            page: &PageWindow,
        ) -> Result<(Vec<Transaction>, u64), StoreError> {
            self.inner.list_for_user(user, page).await
        }

        async fn sum_for_user(&self, user: &ObjectId) -> Result<i64, StoreError> {
            self.inner.sum_for_user(user).await
        }

        async fn settle(
            &self,
            id: &ObjectId,
            status: TransactionStatus,
        ) -> Result<Option<Transaction>, StoreError> {
            self.inner.settle(id, status).await
        }

        async fn list_pending(
            &self,
            kind: TransactionKind,
        ) -> Result<Vec<Transaction>, StoreError> {
            self.inner.list_pending(kind).await
        }
    }

    async fn setup() -> (LedgerService, User) {
        let repositories = Repositories::in_memory();
        let notifications = Arc::new(NotificationService::new(
            repositories.notifications.clone(),
            Arc::new(RealtimeHub::new()),
        ));
        let service = LedgerService::new(
            repositories.ledger.clone(),
            repositories.users.clone(),
            notifications,
            5_000,
        );
        let now = Utc::now();
        let user = User {
            id: ObjectId::new(),
            name: "Grace Hopper".to_string(),
            email: "grace@example.com".to_string(),
            password: String::new(),
            roles: default_roles(),
            status: UserStatus::Active,
            balance: 0,
            mentor_profile: None,
            created_at: now,
            updated_at: now,
        };
        repositories.users.create_user(&user).await.unwrap();
        (service, user)
    }

    #[tokio::test]
    async fn idempotent_add_funds_applies_once() {
        let (service, user) = setup().await;
        let messages = Messages::new(Lang::En);
        let request = AddFundsRequest {
            amount: 700,
            idempotency_key: Some("topup-1".to_string()),
        };

        let first = service.add_funds(&user.id, &request, &messages).await.unwrap();
        let second = service.add_funds(&user.id, &request, &messages).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(service.balance(&user.id, &messages).await.unwrap(), 700);
    }

    #[tokio::test]
    async fn retried_unkeyed_entry_applies_once() {
        let (mut service, user) = setup().await;
        let messages = Messages::new(Lang::En);
        service.ledger_repository = Arc::new(LostAckLedger {
            inner: service.ledger_repository.clone(),
            acked_once: AtomicBool::new(false),
        });
        service.retry_policy = RetryPolicy {
            attempts: 3,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
        };

        let adjustment = service
            .admin_adjust(
                &AdminAdjustmentRequest {
                    user_id: user.id.to_hex(),
                    amount: 1_500,
                    reason: "Goodwill".to_string(),
                },
                &messages,
            )
            .await
            .unwrap();

        assert_eq!(adjustment.balance_after, 1_500);
        assert_eq!(service.balance(&user.id, &messages).await.unwrap(), 1_500);
        let report = service.reconcile_user(&user.id, &messages).await.unwrap();
        assert_eq!(report.ledger_sum, 1_500);
        assert!(report.is_consistent());
    }

    #[tokio::test]
    async fn debit_below_zero_is_refused() {
        let (service, user) = setup().await;
        let err = service
            .apply(LedgerEntry::new(
                user.id,
                TransactionKind::SessionPayment,
                -1,
                "test",
            ))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::InsufficientFunds {
                balance: 0,
                required: 1
            }
        ));
    }

    #[tokio::test]
    async fn wrong_sign_is_invalid() {
        let (service, user) = setup().await;
        let err = service
            .apply(LedgerEntry::new(user.id, TransactionKind::Refund, -5, "test"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidData { .. }));
    }

    #[tokio::test]
    async fn failed_payout_is_refunded_and_ledger_reconciles() {
        let (service, mut user) = setup().await;
        let messages = Messages::new(Lang::En);
        user.roles.insert(Role::Mentor);
        service
            .add_funds(
                &user.id,
                &AddFundsRequest {
                    amount: 8_000,
                    idempotency_key: None,
                },
                &messages,
            )
            .await
            .unwrap();

        let below = service
            .request_payout(
                &user,
                &PayoutRequest {
                    amount: 4_999,
                    idempotency_key: None,
                },
                &messages,
            )
            .await;
        assert!(matches!(below, Err(AppError::InvalidData { .. })));

        let payout = service
            .request_payout(
                &user,
                &PayoutRequest {
                    amount: 6_000,
                    idempotency_key: None,
                },
                &messages,
            )
            .await
            .unwrap();
        assert_eq!(payout.status, TransactionStatus::Pending);
        assert_eq!(service.balance(&user.id, &messages).await.unwrap(), 2_000);

        service
            .settle_payout(&payout.id, TransactionStatus::Failed, &messages)
            .await
            .unwrap();
        let again = service
            .settle_payout(&payout.id, TransactionStatus::Completed, &messages)
            .await;
        assert!(matches!(again, Err(AppError::Conflict(_))));

        assert_eq!(service.balance(&user.id, &messages).await.unwrap(), 8_000);
        let report = service.reconcile_user(&user.id, &messages).await.unwrap();
        assert!(report.is_consistent());
        assert!(service.reconcile_all().await.unwrap().is_empty());
    }
}
