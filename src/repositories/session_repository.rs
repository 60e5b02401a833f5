use async_trait::async_trait;
use bson::{Bson, Document, oid::ObjectId, to_bson};
use chrono::{NaiveDate, Utc};
use futures_util::stream::TryStreamExt;
use mongodb::{Collection, Database, bson::doc, options::ReturnDocument};

use crate::{
    config::database::get_collection,
    constants::SESSION_COL_NAME,
    errors::StoreError,
    models::session_model::{Session, SessionFeedback},
    types::{
        models::session::{SessionKind, SessionStatus},
        requests::query::filters::{ParticipantRole, SessionFilter},
    },
};

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create_session(&self, session: &Session) -> Result<(), StoreError>;

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Session>, StoreError>;

    /// Newest first.
    async fn list_for_user(
        &self,
        user: &ObjectId,
        filter: &SessionFilter,
    ) -> Result<Vec<Session>, StoreError>;

    /// Pending or confirmed sessions of `mentor` on `date`.
    async fn list_active_for_mentor_on(
        &self,
        mentor: &ObjectId,
        date: NaiveDate,
    ) -> Result<Vec<Session>, StoreError>;

    /// Compare-and-set on status. `None` when the session is not currently in
    /// one of `from`.
    async fn transition(
        &self,
        id: &ObjectId,
        from: &[SessionStatus],
        to: SessionStatus,
        cancel_reason: Option<&str>,
    ) -> Result<Option<Session>, StoreError>;

    /// Reserves a seat in an active group session. `None` when full, inactive,
    /// already joined or previously left.
    async fn add_mentee(
        &self,
        id: &ObjectId,
        mentee: &ObjectId,
    ) -> Result<Option<Session>, StoreError>;

    /// Frees a seat. `record_departure` bars the mentee from joining again and
    /// only applies to active sessions; releasing a seat after a failed
    /// payment leaves it unset and works in any status.
    async fn remove_mentee(
        &self,
        id: &ObjectId,
        mentee: &ObjectId,
        record_departure: bool,
    ) -> Result<Option<Session>, StoreError>;

    /// Appends feedback to a completed session once per mentee.
    async fn add_feedback(
        &self,
        id: &ObjectId,
        feedback: &SessionFeedback,
    ) -> Result<Option<Session>, StoreError>;
}

pub struct MongoSessionRepository {
    pub collection: Collection<Session>,
}

impl MongoSessionRepository {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: get_collection(database, SESSION_COL_NAME),
        }
    }

    async fn update_returning(
        &self,
        filter: Document,
        update: Document,
    ) -> Result<Option<Session>, StoreError> {
        let session = self
            .collection
            .find_one_and_update(filter, update)
            .return_document(ReturnDocument::After)
            .await?;
        Ok(session)
    }
}

fn status_list(statuses: &[SessionStatus]) -> Vec<String> {
    statuses.iter().map(ToString::to_string).collect()
}

fn now_bson() -> Bson {
    Bson::DateTime(bson::DateTime::from_chrono(Utc::now()))
}

fn user_filter(user: &ObjectId, filter: &SessionFilter) -> Document {
    let mut query = match filter.role {
        Some(ParticipantRole::Mentor) => doc! { "mentor": user },
        Some(ParticipantRole::Mentee) => doc! { "mentees": user },
        None => doc! { "$or": [ { "mentor": user }, { "mentees": user } ] },
    };
    if let Some(status) = filter.status {
        query.insert("status", status.to_string());
    }
    query
}

#[async_trait]
impl SessionRepository for MongoSessionRepository {
    async fn create_session(&self, session: &Session) -> Result<(), StoreError> {
        self.collection.insert_one(session).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Session>, StoreError> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    async fn list_for_user(
        &self,
        user: &ObjectId,
        filter: &SessionFilter,
    ) -> Result<Vec<Session>, StoreError> {
        let cursor = self
            .collection
            .find(user_filter(user, filter))
            .sort(doc! { "starts_at": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn list_active_for_mentor_on(
        &self,
        mentor: &ObjectId,
        date: NaiveDate,
    ) -> Result<Vec<Session>, StoreError> {
        let cursor = self
            .collection
            .find(doc! {
                "mentor": mentor,
                "scheduled_date": to_bson(&date)?,
                "status": { "$in": status_list(&SessionStatus::ACTIVE) },
            })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn transition(
        &self,
        id: &ObjectId,
        from: &[SessionStatus],
        to: SessionStatus,
        cancel_reason: Option<&str>,
    ) -> Result<Option<Session>, StoreError> {
        let mut set = doc! { "status": to.to_string(), "updated_at": now_bson() };
        if let Some(reason) = cancel_reason {
            set.insert("cancel_reason", reason);
        }

        self.update_returning(
            doc! { "_id": id, "status": { "$in": status_list(from) } },
            doc! { "$set": set },
        )
        .await
    }

    async fn add_mentee(
        &self,
        id: &ObjectId,
        mentee: &ObjectId,
    ) -> Result<Option<Session>, StoreError> {
        self.update_returning(
            doc! {
                "_id": id,
                "kind": SessionKind::Group.to_string(),
                "status": { "$in": status_list(&SessionStatus::ACTIVE) },
                "mentees": { "$ne": mentee },
                "departed": { "$ne": mentee },
                "$expr": { "$lt": [ { "$size": "$mentees" }, "$capacity" ] },
            },
            doc! {
                "$push": { "mentees": mentee },
                "$set": { "updated_at": now_bson() },
            },
        )
        .await
    }

    async fn remove_mentee(
        &self,
        id: &ObjectId,
        mentee: &ObjectId,
        record_departure: bool,
    ) -> Result<Option<Session>, StoreError> {
        let mut filter = doc! {
            "_id": id,
            "kind": SessionKind::Group.to_string(),
            "mentees": mentee,
        };
        let mut update = doc! {
            "$pull": { "mentees": mentee },
            "$set": { "updated_at": now_bson() },
        };
        if record_departure {
            filter.insert("status", doc! { "$in": status_list(&SessionStatus::ACTIVE) });
            update.insert("$addToSet", doc! { "departed": mentee });
        }

        self.update_returning(filter, update).await
    }

    async fn add_feedback(
        &self,
        id: &ObjectId,
        feedback: &SessionFeedback,
    ) -> Result<Option<Session>, StoreError> {
        let entry = to_bson(feedback)?;
        self.update_returning(
            doc! {
                "_id": id,
                "status": SessionStatus::Completed.to_string(),
                "mentees": feedback.mentee,
                "feedback.mentee": { "$ne": feedback.mentee },
            },
            doc! {
                "$push": { "feedback": entry },
                "$set": { "updated_at": now_bson() },
            },
        )
        .await
    }
}
