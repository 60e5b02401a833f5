use bson::oid::ObjectId;
use chrono::{NaiveDate, Utc};
use std::sync::Arc;

use crate::{
    errors::AppError,
    models::{
        session_model::{Session, SessionFeedback},
        transaction_model::LedgerEntry,
        user_model::User,
    },
    repositories::{session_repository::SessionRepository, user_repository::UserRepository},
    services::{
        ledger_service::LedgerService,
        notification_service::{NewNotification, NotificationService},
    },
    types::{
        models::{
            ledger::TransactionKind,
            notification::{NotificationKind, ReferenceType},
            schedule::TimeSlot,
            session::{SessionKind, SessionStatus},
        },
        requests::{
            query::filters::SessionFilter,
            session::{
                book_session_request::BookSessionRequest, feedback_request::FeedbackRequest,
                group_session_request::GroupSessionRequest,
            },
        },
    },
    utils::{
        locale_utils::Messages,
        pricing_utils::session_price,
        schedule_utils::{first_conflict, fits_availability},
        validation_utils::parse_object_id,
    },
};

fn payment_key(session: &ObjectId, mentee: &ObjectId) -> String {
    format!("session_payment:{}:{}", session, mentee)
}

fn refund_key(session: &ObjectId, mentee: &ObjectId) -> String {
    format!("refund:{}:{}", session, mentee)
}

fn earning_key(session: &ObjectId, mentee: &ObjectId) -> String {
    format!("session_earning:{}:{}", session, mentee)
}

pub struct SessionService {
    pub session_repository: Arc<dyn SessionRepository>,
    pub user_repository: Arc<dyn UserRepository>,
    pub ledger: Arc<LedgerService>,
    pub notifications: Arc<NotificationService>,
}

impl SessionService {
    pub fn new(
        session_repository: Arc<dyn SessionRepository>,
        user_repository: Arc<dyn UserRepository>,
        ledger: Arc<LedgerService>,
        notifications: Arc<NotificationService>,
    ) -> Self {
        Self {
            session_repository,
            user_repository,
            ledger,
            notifications,
        }
    }

    fn session_not_found(messages: &Messages) -> AppError {
        AppError::not_found(messages.get_session_message("not_found", "Session not found"))
    }

    async fn load_session(&self, id: &ObjectId, messages: &Messages) -> Result<Session, AppError> {
        self.session_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| Self::session_not_found(messages))
    }

    async fn load_mentor(&self, id: &ObjectId, messages: &Messages) -> Result<User, AppError> {
        self.user_repository
            .find_by_id(id)
            .await?
            .filter(|user| user.is_active() && user.approved_mentor_profile().is_some())
            .ok_or_else(|| {
                AppError::not_found(
                    messages.get_user_message("mentor.not_found", "Mentor not found"),
                )
            })
    }

    /// Checks topic, price and the requested window against the mentor's
    /// profile and calendar. Returns the per-mentee price.
    async fn check_offer(
        &self,
        mentor: &User,
        topic: &str,
        date: NaiveDate,
        window: &TimeSlot,
        messages: &Messages,
    ) -> Result<i64, AppError> {
        let Some(profile) = mentor.approved_mentor_profile() else {
            return Err(AppError::not_found(
                messages.get_user_message("mentor.not_found", "Mentor not found"),
            ));
        };

        if !profile.has_expertise(topic) {
            return Err(AppError::invalid(messages.get_session_message(
                "topic_not_offered",
                "The mentor does not offer this topic",
            )));
        }

        let price = session_price(profile.hourly_rate, window.duration_minutes())
            .filter(|price| *price > 0)
            .ok_or_else(|| {
                AppError::invalid(
                    messages.get_session_message("invalid_price", "Session price is not valid"),
                )
            })?;

        let inside = profile
            .availability_on(date)
            .is_some_and(|day| fits_availability(&day.slots, window));
        if !inside {
            return Err(AppError::conflict(messages.get_session_message(
                "outside_availability",
                "The requested time is outside the mentor's availability",
            )));
        }

        let booked: Vec<TimeSlot> = self
            .session_repository
            .list_active_for_mentor_on(&mentor.id, date)
            .await?
            .iter()
            .filter_map(Session::window)
            .collect();
        if let Some(taken) = first_conflict(&booked, window) {
            log::debug!("Window {} collides with booked {}", window, taken);
            return Err(AppError::conflict(messages.get_session_message(
                "slot_taken",
                "The requested time overlaps another session",
            )));
        }

        Ok(price)
    }

    fn new_session(
        mentor: ObjectId,
        kind: SessionKind,
        topic: &str,
        description: Option<&str>,
        date: NaiveDate,
        window: &TimeSlot,
        price: i64,
    ) -> Session {
        let now = Utc::now();
        Session {
            id: ObjectId::new(),
            mentor,
            mentees: Vec::new(),
            departed: Vec::new(),
            kind,
            capacity: 1,
            topic: topic.trim().to_string(),
            description: description
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .map(str::to_string),
            scheduled_date: date,
            start_time: window.start_time,
            duration: window.duration_minutes(),
            status: SessionStatus::Pending,
            price,
            feedback: Vec::new(),
            cancel_reason: None,
            starts_at: date.and_time(window.start_time.as_naive_time()).and_utc(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Books a one-on-one session: the mentee pays first, and a failed insert
    /// is compensated with a refund.
    pub async fn book(
        &self,
        mentee: &ObjectId,
        request: &BookSessionRequest,
        window: TimeSlot,
        messages: &Messages,
    ) -> Result<Session, AppError> {
        let mentor_id = parse_object_id(&request.mentor_id, messages)?;
        if mentor_id == *mentee {
            return Err(AppError::invalid(messages.get_session_message(
                "self_booking",
                "You cannot book a session with yourself",
            )));
        }

        let mentor = self.load_mentor(&mentor_id, messages).await?;
        let price = self
            .check_offer(
                &mentor,
                &request.topic,
                request.scheduled_date,
                &window,
                messages,
            )
            .await?;

        let mut session = Self::new_session(
            mentor_id,
            SessionKind::OneOnOne,
            &request.topic,
            request.description.as_deref(),
            request.scheduled_date,
            &window,
            price,
        );
        session.mentees.push(*mentee);

        self.ledger
            .apply(
                LedgerEntry::new(
                    *mentee,
                    TransactionKind::SessionPayment,
                    -price,
                    format!("Session: {}", session.topic),
                )
                .with_reference(session.id)
                .with_idempotency_key(payment_key(&session.id, mentee)),
            )
            .await?;

        if let Err(err) = self.session_repository.create_session(&session).await {
            log::error!(
                "Persisting session {} failed after payment, refunding: {}",
                session.id,
                err
            );
            self.refund(&session, mentee, "Booking failed, payment returned")
                .await?;
            return Err(err.into());
        }

        log::info!(
            "Session {} booked by {} with mentor {}",
            session.id,
            mentee,
            mentor_id
        );
        self.notifications
            .notify_quietly(
                NewNotification::new(
                    mentor_id,
                    NotificationKind::SessionBooked,
                    "New session request",
                    format!(
                        "{} on {} at {}",
                        session.topic, session.scheduled_date, session.start_time
                    ),
                )
                .about(session.id, ReferenceType::Session),
            )
            .await;

        Ok(session)
    }

    /// Group sessions are free to create and start confirmed; each mentee
    /// pays on joining.
    pub async fn create_group(
        &self,
        mentor_id: &ObjectId,
        request: &GroupSessionRequest,
        window: TimeSlot,
        messages: &Messages,
    ) -> Result<Session, AppError> {
        let mentor = self.load_mentor(mentor_id, messages).await.map_err(|_| {
            AppError::forbidden(messages.get_session_message(
                "mentor_only",
                "Only approved mentors can do this",
            ))
        })?;
        let price = self
            .check_offer(
                &mentor,
                &request.topic,
                request.scheduled_date,
                &window,
                messages,
            )
            .await?;

        let mut session = Self::new_session(
            *mentor_id,
            SessionKind::Group,
            &request.topic,
            request.description.as_deref(),
            request.scheduled_date,
            &window,
            price,
        );
        session.capacity = request.capacity;
        session.status = SessionStatus::Confirmed;

        self.session_repository.create_session(&session).await?;
        log::info!("Group session {} created by {}", session.id, mentor_id);
        Ok(session)
    }

    pub async fn join(
        &self,
        session_id: &ObjectId,
        mentee: &ObjectId,
        messages: &Messages,
    ) -> Result<Session, AppError> {
        let session = self.load_session(session_id, messages).await?;
        if session.kind != SessionKind::Group {
            return Err(AppError::invalid(messages.get_session_message(
                "not_group",
                "Only group sessions can be joined",
            )));
        }
        if session.is_mentor(mentee) {
            return Err(AppError::invalid(messages.get_session_message(
                "self_booking",
                "You cannot book a session with yourself",
            )));
        }

        let reserved = self
            .session_repository
            .add_mentee(session_id, mentee)
            .await?
            .ok_or_else(|| {
                AppError::conflict(messages.get_session_message(
                    "join_refused",
                    "The session is full, closed or already joined",
                ))
            })?;

        let payment = LedgerEntry::new(
            *mentee,
            TransactionKind::SessionPayment,
            -reserved.price,
            format!("Group session: {}", reserved.topic),
        )
        .with_reference(reserved.id)
        .with_idempotency_key(payment_key(&reserved.id, mentee));

        if let Err(err) = self.ledger.apply(payment).await {
            if let Err(release_err) = self
                .session_repository
                .remove_mentee(session_id, mentee, false)
                .await
            {
                log::error!(
                    "Could not release seat of {} in {}: {}",
                    mentee,
                    session_id,
                    release_err
                );
            }
            return Err(err);
        }

        // A cancel or completion that landed between the seat and the payment
        // settled the session without this mentee.
        let current = self.load_session(session_id, messages).await?;
        match current.status {
            SessionStatus::Cancelled => {
                self.refund(&current, mentee, "Session cancelled, payment returned")
                    .await?;
                return Err(AppError::conflict(messages.get_session_message(
                    "join_refused",
                    "The session is full, closed or already joined",
                )));
            }
            SessionStatus::Completed => self.pay_mentor_for(&current, mentee).await?,
            _ => {}
        }

        self.notifications
            .notify_quietly(
                NewNotification::new(
                    current.mentor,
                    NotificationKind::SessionJoined,
                    "A mentee joined your session",
                    current.topic.clone(),
                )
                .about(current.id, ReferenceType::Session),
            )
            .await;

        Ok(current)
    }

    pub async fn leave(
        &self,
        session_id: &ObjectId,
        mentee: &ObjectId,
        messages: &Messages,
    ) -> Result<Session, AppError> {
        let session = self.load_session(session_id, messages).await?;
        if session.kind != SessionKind::Group || !session.is_mentee(mentee) {
            return Err(AppError::forbidden(messages.get_session_message(
                "not_participant",
                "You are not part of this session",
            )));
        }

        let refused = || {
            AppError::conflict(messages.get_session_message(
                "leave_refused",
                "The session can no longer be left",
            ))
        };
        if session.status.is_terminal() {
            return Err(refused());
        }

        let updated = self
            .session_repository
            .remove_mentee(session_id, mentee, true)
            .await?
            .ok_or_else(refused)?;

        self.refund(&updated, mentee, "Left session, payment returned")
            .await?;
        self.notifications
            .notify_quietly(
                NewNotification::new(
                    updated.mentor,
                    NotificationKind::SessionLeft,
                    "A mentee left your session",
                    updated.topic.clone(),
                )
                .about(updated.id, ReferenceType::Session),
            )
            .await;

        Ok(updated)
    }

    /// Applies a status change requested by `actor`.
    ///
    /// The mentor may confirm, complete or cancel. A mentee may only cancel a
    /// pending one-on-one booking. The write is conditional on the status the
    /// decision was based on, so concurrent requests cannot both win.
    pub async fn update_status(
        &self,
        session_id: &ObjectId,
        actor: &ObjectId,
        next: SessionStatus,
        reason: Option<&str>,
        messages: &Messages,
    ) -> Result<Session, AppError> {
        let session = self.load_session(session_id, messages).await?;
        if !session.involves(actor) {
            return Err(AppError::forbidden(messages.get_session_message(
                "not_participant",
                "You are not part of this session",
            )));
        }

        let allowed_from: Vec<SessionStatus> = match next {
            SessionStatus::Pending => {
                return Err(AppError::invalid(messages.get_session_message(
                    "invalid_status",
                    "Sessions cannot be moved back to pending",
                )));
            }
            _ if session.is_mentor(actor) => SessionStatus::predecessors(next),
            SessionStatus::Cancelled
                if session.kind == SessionKind::OneOnOne
                    && session.status == SessionStatus::Pending =>
            {
                vec![SessionStatus::Pending]
            }
            _ => {
                return Err(AppError::forbidden(messages.get_session_message(
                    "mentor_only_transition",
                    "Only the mentor can change this session's status",
                )));
            }
        };

        if !allowed_from.contains(&session.status) {
            return Err(AppError::conflict(messages.get_session_message(
                "invalid_transition",
                &format!("Cannot move a {} session to {}", session.status, next),
            )));
        }

        let cancel_reason = reason.map(str::trim).filter(|text| !text.is_empty());
        let updated = self
            .session_repository
            .transition(
                session_id,
                &allowed_from,
                next,
                if next == SessionStatus::Cancelled {
                    cancel_reason
                } else {
                    None
                },
            )
            .await?
            .ok_or_else(|| {
                AppError::conflict(messages.get_session_message(
                    "status_changed",
                    "The session changed in the meantime, reload and retry",
                ))
            })?;

        match next {
            SessionStatus::Cancelled => self.refund_all(&updated).await?,
            SessionStatus::Completed => self.pay_mentor(&updated).await?,
            _ => {}
        }

        self.notify_status_change(&updated, actor).await;
        log::info!(
            "Session {} moved to {} by {}",
            updated.id,
            updated.status,
            actor
        );
        Ok(updated)
    }

    async fn refund(
        &self,
        session: &Session,
        mentee: &ObjectId,
        reason: &str,
    ) -> Result<(), AppError> {
        self.ledger
            .apply(
                LedgerEntry::new(*mentee, TransactionKind::Refund, session.price, reason)
                    .with_reference(session.id)
                    .with_idempotency_key(refund_key(&session.id, mentee)),
            )
            .await?;
        Ok(())
    }

    /// Refunds every mentee whose payment went through.
    async fn refund_all(&self, session: &Session) -> Result<(), AppError> {
        for mentee in &session.mentees {
            if !self.has_paid(&session.id, mentee).await? {
                continue;
            }
            self.refund(session, mentee, "Session cancelled, payment returned")
                .await?;
        }
        Ok(())
    }

    async fn has_paid(&self, session: &ObjectId, mentee: &ObjectId) -> Result<bool, AppError> {
        Ok(self
            .ledger
            .find_by_key(&payment_key(session, mentee))
            .await?
            .is_some())
    }

    /// Credits the mentor once per mentee whose payment went through. A
    /// reserved seat whose payment is still in flight earns nothing here;
    /// `join` settles it after its payment lands.
    async fn pay_mentor(&self, session: &Session) -> Result<(), AppError> {
        for mentee in &session.mentees {
            if self.has_paid(&session.id, mentee).await? {
                self.pay_mentor_for(session, mentee).await?;
            }
        }
        Ok(())
    }

    async fn pay_mentor_for(&self, session: &Session, mentee: &ObjectId) -> Result<(), AppError> {
        if session.price <= 0 {
            return Ok(());
        }
        self.ledger
            .apply(
                LedgerEntry::new(
                    session.mentor,
                    TransactionKind::SessionEarning,
                    session.price,
                    format!("Earning: {}", session.topic),
                )
                .with_reference(session.id)
                .with_idempotency_key(earning_key(&session.id, mentee)),
            )
            .await?;
        Ok(())
    }

    async fn notify_status_change(&self, session: &Session, actor: &ObjectId) {
        let kind = match session.status {
            SessionStatus::Confirmed => NotificationKind::SessionConfirmed,
            SessionStatus::Completed => NotificationKind::SessionCompleted,
            SessionStatus::Cancelled => NotificationKind::SessionCancelled,
            SessionStatus::Pending => return,
        };
        let recipients: Vec<ObjectId> = std::iter::once(session.mentor)
            .chain(session.mentees.iter().copied())
            .filter(|user| user != actor)
            .collect();

        for recipient in recipients {
            self.notifications
                .notify_quietly(
                    NewNotification::new(
                        recipient,
                        kind,
                        format!("Session {}", session.status),
                        format!(
                            "{} on {} at {}",
                            session.topic, session.scheduled_date, session.start_time
                        ),
                    )
                    .about(session.id, ReferenceType::Session),
                )
                .await;
        }
    }

    pub async fn add_feedback(
        &self,
        session_id: &ObjectId,
        mentee: &ObjectId,
        request: &FeedbackRequest,
        messages: &Messages,
    ) -> Result<Session, AppError> {
        let session = self.load_session(session_id, messages).await?;
        if !session.is_mentee(mentee) || !self.has_paid(&session.id, mentee).await? {
            return Err(AppError::forbidden(messages.get_session_message(
                "not_participant",
                "You are not part of this session",
            )));
        }
        if session.status != SessionStatus::Completed {
            return Err(AppError::conflict(messages.get_session_message(
                "feedback_not_completed",
                "Feedback is accepted once the session is completed",
            )));
        }

        let feedback = SessionFeedback {
            mentee: *mentee,
            rating: request.rating,
            comment: request.comment.trim().to_string(),
            created_at: Utc::now(),
        };
        let updated = self
            .session_repository
            .add_feedback(session_id, &feedback)
            .await?
            .ok_or_else(|| {
                AppError::conflict(messages.get_session_message(
                    "feedback_exists",
                    "Feedback was already submitted",
                ))
            })?;

        self.notifications
            .notify_quietly(
                NewNotification::new(
                    updated.mentor,
                    NotificationKind::FeedbackReceived,
                    "New feedback",
                    format!("{} rated {} out of 5", updated.topic, request.rating),
                )
                .about(updated.id, ReferenceType::Session),
            )
            .await;

        Ok(updated)
    }

    pub async fn list(
        &self,
        user: &ObjectId,
        filter: &SessionFilter,
    ) -> Result<Vec<Session>, AppError> {
        Ok(self.session_repository.list_for_user(user, filter).await?)
    }

    /// Participants see their sessions; group sessions are visible to anyone
    /// who could join them.
    pub async fn get(
        &self,
        session_id: &ObjectId,
        user: &ObjectId,
        messages: &Messages,
    ) -> Result<Session, AppError> {
        let session = self.load_session(session_id, messages).await?;
        if session.involves(user) || session.kind == SessionKind::Group {
            Ok(session)
        } else {
            Err(Self::session_not_found(messages))
        }
    }
}
