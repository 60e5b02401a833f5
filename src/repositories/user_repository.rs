use async_trait::async_trait;
use bson::{Bson, Document, oid::ObjectId, to_bson};
use chrono::{NaiveDate, Utc};
use futures_util::stream::TryStreamExt;
use mongodb::{
    Collection, Database,
    bson::doc,
    options::ReturnDocument,
};

use crate::{
    config::database::get_collection,
    constants::USER_COL_NAME,
    errors::StoreError,
    models::user_model::{MentorProfile, User},
    types::{
        models::{
            schedule::DayAvailability,
            user::{mentor_status::MentorStatus, role::Role, user_status::UserStatus},
        },
        requests::query::{filters::UserFilter, pagination::PageWindow},
    },
};

/// Approved, active mentors matching every provided criterion.
#[derive(Debug, Clone, Default)]
pub struct MentorQuery {
    pub expertise: Option<String>,
    pub text: Option<String>,
    pub max_rate: Option<i64>,
    pub page: PageWindow,
}

/// User persistence. Balances are deliberately absent: only the ledger
/// repository moves them.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, user: &User) -> Result<User, StoreError>;

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<User>, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn list_users(&self, filter: &UserFilter) -> Result<Vec<User>, StoreError>;

    async fn update_name(&self, id: &ObjectId, name: &str) -> Result<Option<User>, StoreError>;

    async fn set_status(
        &self,
        id: &ObjectId,
        status: UserStatus,
    ) -> Result<Option<User>, StoreError>;

    async fn save_mentor_profile(
        &self,
        id: &ObjectId,
        profile: &MentorProfile,
    ) -> Result<Option<User>, StoreError>;

    /// Moves a mentor application from `from` to `to`, granting or revoking
    /// the mentor role. `None` when the application is not in `from`.
    async fn review_mentor(
        &self,
        id: &ObjectId,
        from: MentorStatus,
        to: MentorStatus,
    ) -> Result<Option<User>, StoreError>;

    /// Replaces one day of a mentor's calendar in a single write and drops
    /// days before `today`. An empty day clears that date. Other days are
    /// left as stored, so concurrent edits of different dates both land.
    async fn replace_day(
        &self,
        id: &ObjectId,
        day: &DayAvailability,
        today: NaiveDate,
    ) -> Result<Option<User>, StoreError>;

    async fn search_mentors(&self, query: &MentorQuery) -> Result<(Vec<User>, u64), StoreError>;
}

pub struct MongoUserRepository {
    pub collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: get_collection(database, USER_COL_NAME),
        }
    }

    async fn update_returning(
        &self,
        filter: Document,
        update: Document,
    ) -> Result<Option<User>, StoreError> {
        let user = self
            .collection
            .find_one_and_update(filter, update)
            .return_document(ReturnDocument::After)
            .await?;
        Ok(user)
    }
}

fn now_bson() -> Bson {
    Bson::DateTime(bson::DateTime::from_chrono(Utc::now()))
}

fn case_insensitive(pattern: String) -> Document {
    doc! { "$regex": pattern, "$options": "i" }
}

fn mentor_search_filter(query: &MentorQuery) -> Document {
    let mut filter = doc! {
        "status": UserStatus::Active.to_string(),
        "mentor_profile.status": MentorStatus::Approved.to_string(),
    };

    if let Some(expertise) = query.expertise.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
        filter.insert(
            "mentor_profile.expertise",
            case_insensitive(format!("^{}$", regex::escape(expertise))),
        );
    }

    if let Some(text) = query.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        let pattern = regex::escape(text);
        filter.insert(
            "$or",
            vec![
                doc! { "name": case_insensitive(pattern.clone()) },
                doc! { "mentor_profile.headline": case_insensitive(pattern.clone()) },
                doc! { "mentor_profile.expertise": case_insensitive(pattern) },
            ],
        );
    }

    if let Some(max_rate) = query.max_rate {
        filter.insert("mentor_profile.hourly_rate", doc! { "$lte": max_rate });
    }

    filter
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn create_user(&self, user: &User) -> Result<User, StoreError> {
        self.collection.insert_one(user).await?;
        Ok(user.clone())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<User>, StoreError> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.collection.find_one(doc! { "email": email }).await?)
    }

    async fn list_users(&self, filter: &UserFilter) -> Result<Vec<User>, StoreError> {
        let mut query = Document::new();
        if let Some(status) = filter.status {
            query.insert("status", status.to_string());
        }
        if let Some(role) = filter.role {
            query.insert("roles", role.to_string());
        }
        if let Some(mentor_status) = filter.mentor_status {
            query.insert("mentor_profile.status", mentor_status.to_string());
        }

        let cursor = self
            .collection
            .find(query)
            .sort(doc! { "created_at": -1 })
            .await?;
        let users: Vec<User> = cursor.try_collect().await?;
        Ok(users)
    }

    async fn update_name(&self, id: &ObjectId, name: &str) -> Result<Option<User>, StoreError> {
        self.update_returning(
            doc! { "_id": id },
            doc! { "$set": { "name": name, "updated_at": now_bson() } },
        )
        .await
    }

    async fn set_status(
        &self,
        id: &ObjectId,
        status: UserStatus,
    ) -> Result<Option<User>, StoreError> {
        self.update_returning(
            doc! { "_id": id },
            doc! { "$set": { "status": status.to_string(), "updated_at": now_bson() } },
        )
        .await
    }

    async fn save_mentor_profile(
        &self,
        id: &ObjectId,
        profile: &MentorProfile,
    ) -> Result<Option<User>, StoreError> {
        let profile_doc = to_bson(profile)?;
        self.update_returning(
            doc! { "_id": id },
            doc! { "$set": { "mentor_profile": profile_doc, "updated_at": now_bson() } },
        )
        .await
    }

    async fn review_mentor(
        &self,
        id: &ObjectId,
        from: MentorStatus,
        to: MentorStatus,
    ) -> Result<Option<User>, StoreError> {
        let reviewed_at = to_bson(&Utc::now())?;
        let mut update = doc! {
            "$set": {
                "mentor_profile.status": to.to_string(),
                "mentor_profile.reviewed_at": reviewed_at,
                "updated_at": now_bson(),
            }
        };
        if to == MentorStatus::Approved {
            update.insert("$addToSet", doc! { "roles": Role::Mentor.to_string() });
        } else {
            update.insert("$pull", doc! { "roles": Role::Mentor.to_string() });
        }

        self.update_returning(
            doc! { "_id": id, "mentor_profile.status": from.to_string() },
            update,
        )
        .await
    }

    async fn replace_day(
        &self,
        id: &ObjectId,
        day: &DayAvailability,
        today: NaiveDate,
    ) -> Result<Option<User>, StoreError> {
        let kept = doc! {
            "$filter": {
                "input": { "$ifNull": ["$mentor_profile.availability", []] },
                "as": "day",
                "cond": { "$and": [
                    { "$ne": ["$$day.date", day.date.to_string()] },
                    { "$gte": ["$$day.date", today.to_string()] },
                ] },
            }
        };
        let days = if day.slots.is_empty() {
            Bson::Document(kept)
        } else {
            let day_bson = to_bson(day)?;
            Bson::Document(doc! { "$concatArrays": [kept, { "$literal": [day_bson] }] })
        };
        let pipeline = vec![doc! {
            "$set": {
                "mentor_profile.availability": {
                    "$sortArray": { "input": days, "sortBy": { "date": 1 } }
                },
                "updated_at": now_bson(),
            }
        }];

        let user = self
            .collection
            .find_one_and_update(
                doc! { "_id": id, "mentor_profile": { "$exists": true } },
                pipeline,
            )
            .return_document(ReturnDocument::After)
            .await?;
        Ok(user)
    }

    async fn search_mentors(&self, query: &MentorQuery) -> Result<(Vec<User>, u64), StoreError> {
        let filter = mentor_search_filter(query);
        let total = self.collection.count_documents(filter.clone()).await?;

        let limit = i64::try_from(query.page.limit).unwrap_or(i64::MAX);
        let cursor = self
            .collection
            .find(filter)
            .sort(doc! { "mentor_profile.hourly_rate": 1, "name": 1 })
            .skip(query.page.skip())
            .limit(limit)
            .await?;
        let users: Vec<User> = cursor.try_collect().await?;
        Ok((users, total))
    }
}
