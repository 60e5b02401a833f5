use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header::AUTHORIZATION, web};
use bson::oid::ObjectId;
use futures::future::LocalBoxFuture;
use std::{collections::HashSet, sync::Arc};

use crate::{
    errors::AppError,
    services::auth_service::AuthService,
    types::models::user::role::Role,
    utils::{auth_utils::bearer_token, locale_utils::messages_for},
};

/// The caller behind a valid `Authorization: Bearer` access token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: ObjectId,
    pub roles: HashSet<Role>,
}

impl AuthUser {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

async fn authenticate_request(req: HttpRequest) -> Result<AuthUser, AppError> {
    let messages = messages_for(&req);
    let service = req
        .app_data::<web::Data<Arc<AuthService>>>()
        .cloned()
        .ok_or_else(|| AppError::internal("auth service is not registered"))?;

    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token)
        .ok_or_else(|| {
            AppError::unauthorized(
                messages.get_auth_message("token.missing", "Missing or invalid access token"),
            )
        })?;

    service.authenticate(token, &messages).await
}

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        Box::pin(authenticate_request(req.clone()))
    }
}

/// An authenticated caller holding the admin role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

impl FromRequest for AdminUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            let user = authenticate_request(req.clone()).await?;
            if !user.has_role(Role::Admin) {
                let messages = messages_for(&req);
                return Err(AppError::forbidden(
                    messages.get_auth_message("role.admin_required", "Admin access required"),
                ));
            }
            Ok(AdminUser(user))
        })
    }
}
