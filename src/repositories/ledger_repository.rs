use async_trait::async_trait;
use bson::{Bson, Document, oid::ObjectId};
use chrono::Utc;
use futures_util::stream::TryStreamExt;
use mongodb::{
    Client, ClientSession, Collection, Database, bson::doc,
    error::UNKNOWN_TRANSACTION_COMMIT_RESULT, options::ReturnDocument,
};

use crate::{
    config::database::get_collection,
    constants::{TRANSACTION_COL_NAME, USER_COL_NAME},
    errors::StoreError,
    models::{
        transaction_model::{LedgerEntry, Transaction},
        user_model::User,
    },
    types::{
        models::ledger::{TransactionKind, TransactionStatus},
        requests::query::pagination::PageWindow,
    },
};

/// The single writer of `User::balance`.
///
/// `apply` moves the balance and appends the matching row as one atomic unit.
/// A negative amount never takes the balance below zero. An entry carrying an
/// idempotency key that was already applied returns the stored row untouched.
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    async fn apply(&self, entry: LedgerEntry) -> Result<Transaction, StoreError>;

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Transaction>, StoreError>;

    async fn find_by_idempotency_key(&self, key: &str)
    -> Result<Option<Transaction>, StoreError>;

    /// Newest first, with the total count for the user.
    async fn list_for_user(
        &self,
        user: &ObjectId,
        page: &PageWindow,
    ) -> Result<(Vec<Transaction>, u64), StoreError>;

    async fn sum_for_user(&self, user: &ObjectId) -> Result<i64, StoreError>;

    /// Moves a pending row to a final status. `None` if it was not pending.
    async fn settle(
        &self,
        id: &ObjectId,
        status: TransactionStatus,
    ) -> Result<Option<Transaction>, StoreError>;

    async fn list_pending(&self, kind: TransactionKind) -> Result<Vec<Transaction>, StoreError>;
}

pub struct MongoLedgerRepository {
    client: Client,
    users: Collection<User>,
    transactions: Collection<Transaction>,
}

struct Applied {
    transaction: Transaction,
    fresh: bool,
}

impl MongoLedgerRepository {
    pub fn new(client: &Client, database: &Database) -> Self {
        Self {
            client: client.clone(),
            users: get_collection(database, USER_COL_NAME),
            transactions: get_collection(database, TRANSACTION_COL_NAME),
        }
    }

    async fn apply_in_session(
        &self,
        session: &mut ClientSession,
        entry: LedgerEntry,
    ) -> Result<Applied, StoreError> {
        if let Some(key) = entry.idempotency_key.as_deref() {
            let existing = self
                .transactions
                .find_one(doc! { "idempotency_key": key })
                .session(&mut *session)
                .await?;
            if let Some(transaction) = existing {
                return Ok(Applied {
                    transaction,
                    fresh: false,
                });
            }
        }

        let now = Utc::now();
        let mut filter = doc! { "_id": entry.user };
        if entry.amount < 0 {
            filter.insert("balance", doc! { "$gte": entry.amount.saturating_neg() });
        }

        let updated = self
            .users
            .find_one_and_update(
                filter,
                doc! {
                    "$inc": { "balance": entry.amount },
                    "$set": { "updated_at": bson::DateTime::from_chrono(now) },
                },
            )
            .return_document(ReturnDocument::After)
            .session(&mut *session)
            .await?;

        let Some(user) = updated else {
            let current = self
                .users
                .find_one(doc! { "_id": entry.user })
                .session(&mut *session)
                .await?;
            return Err(match current {
                None => StoreError::NotFound,
                Some(user) => StoreError::InsufficientFunds {
                    balance: user.balance,
                    required: entry.amount.saturating_neg(),
                },
            });
        };

        let transaction = entry.into_transaction(user.balance, now);
        self.transactions
            .insert_one(&transaction)
            .session(&mut *session)
            .await?;

        Ok(Applied {
            transaction,
            fresh: true,
        })
    }
}

const COMMIT_ATTEMPTS: u32 = 3;

/// Re-sends only the commit while its outcome is unknown; the transaction
/// body never runs twice.
async fn commit(session: &mut ClientSession) -> Result<(), StoreError> {
    let mut attempt = 1;
    loop {
        match session.commit_transaction().await {
            Err(err)
                if err.contains_label(UNKNOWN_TRANSACTION_COMMIT_RESULT)
                    && attempt < COMMIT_ATTEMPTS =>
            {
                log::warn!(
                    "Ledger commit outcome unknown (attempt {}/{}): {}",
                    attempt,
                    COMMIT_ATTEMPTS,
                    err
                );
                attempt += 1;
            }
            result => return result.map_err(StoreError::from),
        }
    }
}

#[async_trait]
impl LedgerRepository for MongoLedgerRepository {
    async fn apply(&self, entry: LedgerEntry) -> Result<Transaction, StoreError> {
        let mut session = self.client.start_session().await?;
        session.start_transaction().await?;

        match self.apply_in_session(&mut session, entry).await {
            Ok(applied) if applied.fresh => {
                commit(&mut session).await?;
                Ok(applied.transaction)
            }
            Ok(applied) => {
                session.abort_transaction().await?;
                Ok(applied.transaction)
            }
            Err(err) => {
                if let Err(abort_err) = session.abort_transaction().await {
                    log::warn!("Failed to abort ledger transaction: {}", abort_err);
                }
                Err(err)
            }
        }
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Transaction>, StoreError> {
        Ok(self.transactions.find_one(doc! { "_id": id }).await?)
    }

    async fn find_by_idempotency_key(
        &self,
        key: &str,
    ) -> Result<Option<Transaction>, StoreError> {
        Ok(self
            .transactions
            .find_one(doc! { "idempotency_key": key })
            .await?)
    }

    async fn list_for_user(
        &self,
        user: &ObjectId,
        page: &PageWindow,
    ) -> Result<(Vec<Transaction>, u64), StoreError> {
        let filter = doc! { "user": user };
        let total = self.transactions.count_documents(filter.clone()).await?;

        let limit = i64::try_from(page.limit).unwrap_or(i64::MAX);
        let cursor = self
            .transactions
            .find(filter)
            .sort(doc! { "created_at": -1, "_id": -1 })
            .skip(page.skip())
            .limit(limit)
            .await?;
        Ok((cursor.try_collect().await?, total))
    }

    async fn sum_for_user(&self, user: &ObjectId) -> Result<i64, StoreError> {
        let pipeline: Vec<Document> = vec![
            doc! { "$match": { "user": user } },
            doc! { "$group": { "_id": null, "total": { "$sum": "$amount" } } },
        ];
        let mut cursor = self.transactions.aggregate(pipeline).await?;

        let total = match cursor.try_next().await? {
            Some(group) => match group.get("total") {
                Some(Bson::Int64(total)) => *total,
                Some(Bson::Int32(total)) => i64::from(*total),
                Some(other) => {
                    return Err(StoreError::backend(format!(
                        "unexpected ledger sum type: {}",
                        other
                    )));
                }
                None => 0,
            },
            None => 0,
        };
        Ok(total)
    }

    async fn settle(
        &self,
        id: &ObjectId,
        status: TransactionStatus,
    ) -> Result<Option<Transaction>, StoreError> {
        let transaction = self
            .transactions
            .find_one_and_update(
                doc! { "_id": id, "status": TransactionStatus::Pending.to_string() },
                doc! {
                    "$set": {
                        "status": status.to_string(),
                        "updated_at": bson::DateTime::from_chrono(Utc::now()),
                    }
                },
            )
            .return_document(ReturnDocument::After)
            .await?;
        Ok(transaction)
    }

    async fn list_pending(&self, kind: TransactionKind) -> Result<Vec<Transaction>, StoreError> {
        let cursor = self
            .transactions
            .find(doc! {
                "kind": kind.to_string(),
                "status": TransactionStatus::Pending.to_string(),
            })
            .sort(doc! { "created_at": 1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }
}
