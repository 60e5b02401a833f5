use bson::oid::ObjectId;
use chrono::{NaiveDate, Utc};
use std::sync::Arc;

use crate::{
    errors::AppError,
    models::user_model::{MentorProfile, User},
    repositories::{
        session_repository::SessionRepository,
        user_repository::{MentorQuery, UserRepository},
    },
    types::{
        models::{
            schedule::{DayAvailability, TimeSlot},
            user::mentor_status::MentorStatus,
        },
        requests::{
            query::{filters::MentorSearchQuery, pagination::Pagination},
            user::mentor_profile_request::MentorProfileRequest,
        },
        responses::{
            api_response::Paginated,
            user_response::{MentorSummary, UserResponse},
        },
    },
    utils::{
        locale_utils::Messages,
        schedule_utils::{days_in_range, free_windows},
    },
};

const MAX_AVAILABILITY_RANGE_DAYS: i64 = 92;

fn clean_expertise(expertise: &[String]) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::with_capacity(expertise.len());
    for entry in expertise.iter().map(|entry| entry.trim()) {
        if !entry.is_empty() && !cleaned.iter().any(|kept| kept.eq_ignore_ascii_case(entry)) {
            cleaned.push(entry.to_string());
        }
    }
    cleaned
}

pub struct MentorService {
    pub user_repository: Arc<dyn UserRepository>,
    pub session_repository: Arc<dyn SessionRepository>,
}

impl MentorService {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        session_repository: Arc<dyn SessionRepository>,
    ) -> Self {
        Self {
            user_repository,
            session_repository,
        }
    }

    async fn load_user(&self, id: &ObjectId, messages: &Messages) -> Result<User, AppError> {
        self.user_repository.find_by_id(id).await?.ok_or_else(|| {
            AppError::not_found(messages.get_user_message("fetch.not_found", "User not found"))
        })
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

    /// Opens a pending application. A rejected applicant may apply again.
    pub async fn apply(
        &self,
        user_id: &ObjectId,
        request: &MentorProfileRequest,
        messages: &Messages,
    ) -> Result<UserResponse, AppError> {
        let user = self.load_user(user_id, messages).await?;
        if let Some(existing) = &user.mentor_profile {
            if existing.status != MentorStatus::Rejected {
                return Err(AppError::conflict(messages.get_user_message(
                    "mentor.already_applied",
                    "A mentor application already exists",
                )));
            }
        }

        let profile = MentorProfile {
            status: MentorStatus::Pending,
            headline: request.headline.trim().to_string(),
            bio: request.bio.trim().to_string(),
            expertise: clean_expertise(&request.expertise),
            hourly_rate: request.hourly_rate,
            availability: user
                .mentor_profile
                .map(|previous| previous.availability)
                .unwrap_or_default(),
            applied_at: Utc::now(),
            reviewed_at: None,
        };

        let updated = self
            .user_repository
            .save_mentor_profile(user_id, &profile)
            .await?
            .ok_or_else(|| {
                AppError::not_found(messages.get_user_message("fetch.not_found", "User not found"))
            })?;
        log::info!("User {} applied to become a mentor", user_id);
        Ok(UserResponse::from(updated))
    }

    /// Edits the profile without touching its review status or availability.
    pub async fn update_profile(
        &self,
        user_id: &ObjectId,
        request: &MentorProfileRequest,
        messages: &Messages,
    ) -> Result<UserResponse, AppError> {
        let user = self.load_user(user_id, messages).await?;
        let Some(mut profile) = user.mentor_profile else {
            return Err(AppError::not_found(messages.get_user_message(
                "mentor.no_profile",
                "No mentor profile exists",
            )));
        };

        profile.headline = request.headline.trim().to_string();
        profile.bio = request.bio.trim().to_string();
        profile.expertise = clean_expertise(&request.expertise);
        profile.hourly_rate = request.hourly_rate;

        let updated = self
            .user_repository
            .save_mentor_profile(user_id, &profile)
            .await?
            .ok_or_else(|| {
                AppError::not_found(messages.get_user_message("fetch.not_found", "User not found"))
            })?;
        Ok(UserResponse::from(updated))
    }

    pub async fn get_mentor(
        &self,
        id: &ObjectId,
        messages: &Messages,
    ) -> Result<MentorSummary, AppError> {
        let mentor = self.load_mentor(id, messages).await?;
        MentorSummary::from_user(&mentor).ok_or_else(|| {
            AppError::not_found(messages.get_user_message("mentor.not_found", "Mentor not found"))
        })
    }

    pub async fn search(
        &self,
        query: &MentorSearchQuery,
    ) -> Result<Paginated<MentorSummary>, AppError> {
        let window = Pagination {
            page: query.page,
            limit: query.limit,
        }
        .window();
        let mentor_query = MentorQuery {
            expertise: query
                .expertise
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string),
            text: query
                .text
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string),
            max_rate: query.max_rate,
            page: window,
        };

        let (users, total) = self.user_repository.search_mentors(&mentor_query).await?;
        Ok(Paginated {
            items: users.iter().filter_map(MentorSummary::from_user).collect(),
            total,
            page: window.page,
            limit: window.limit,
        })
    }

    /// Replaces one day of the caller's availability; an empty day is removed.
    pub async fn set_availability(
        &self,
        user_id: &ObjectId,
        day: DayAvailability,
        messages: &Messages,
    ) -> Result<Vec<DayAvailability>, AppError> {
        let user = self.load_user(user_id, messages).await?;
        if user.mentor_profile.is_none() {
            return Err(AppError::forbidden(messages.get_user_message(
                "mentor.no_profile",
                "No mentor profile exists",
            )));
        }

        let updated = self
            .user_repository
            .replace_day(user_id, &day, Utc::now().date_naive())
            .await?
            .ok_or_else(|| {
                AppError::not_found(messages.get_user_message("fetch.not_found", "User not found"))
            })?;
        Ok(updated
            .mentor_profile
            .map(|profile| profile.availability)
            .unwrap_or_default())
    }

    pub async fn availability(
        &self,
        mentor_id: &ObjectId,
        from: NaiveDate,
        to: NaiveDate,
        messages: &Messages,
    ) -> Result<Vec<DayAvailability>, AppError> {
        if to < from || (to - from).num_days() > MAX_AVAILABILITY_RANGE_DAYS {
            return Err(AppError::invalid(messages.get_validation_message(
                "date.range",
                &format!(
                    "Date range must be ordered and span at most {} days",
                    MAX_AVAILABILITY_RANGE_DAYS
                ),
            )));
        }

        let mentor = self.load_user(mentor_id, messages).await?;
        Ok(mentor
            .mentor_profile
            .map(|profile| days_in_range(&profile.availability, from, to))
            .unwrap_or_default())
    }

    /// Published slots of `date` minus the mentor's active sessions.
    pub async fn free_windows(
        &self,
        mentor_id: &ObjectId,
        date: NaiveDate,
        messages: &Messages,
    ) -> Result<Vec<TimeSlot>, AppError> {
        let mentor = self.load_mentor(mentor_id, messages).await?;
        let Some(day) = mentor
            .approved_mentor_profile()
            .and_then(|profile| profile.availability_on(date))
        else {
            return Ok(Vec::new());
        };

        let booked: Vec<TimeSlot> = self
            .session_repository
            .list_active_for_mentor_on(mentor_id, date)
            .await?
            .iter()
            .filter_map(|session| session.window())
            .collect();
        Ok(free_windows(&day.slots, &booked))
    }
}
