use actix_web::{HttpRequest, HttpResponse, http::header::AUTHORIZATION, rt, web};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    errors::AppError,
    realtime::{RealtimeHub, ws_session::WsSession},
    services::auth_service::AuthService,
    utils::{auth_utils::bearer_token, locale_utils::messages_for},
};

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    #[serde(default)]
    pub token: Option<String>,
}

/// Browsers cannot set headers on a socket upgrade, so the access token may
/// also travel as `?token=`.
fn access_token(req: &HttpRequest, query: &WsQuery) -> Option<String> {
    query.token.clone().filter(|token| !token.is_empty()).or_else(|| {
        req.headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token)
            .map(str::to_string)
    })
}

pub async fn ws_handler(
    req: HttpRequest,
    body: web::Payload,
    query: web::Query<WsQuery>,
    auth_service: web::Data<Arc<AuthService>>,
    hub: web::Data<Arc<RealtimeHub>>,
) -> Result<HttpResponse, AppError> {
    let messages = messages_for(&req);

    let token = access_token(&req, &query).ok_or_else(|| {
        AppError::unauthorized(
            messages.get_auth_message("token.missing", "Missing or invalid access token"),
        )
    })?;
    let user = auth_service.authenticate(&token, &messages).await?;

    let (response, session, stream) =
        actix_ws::handle(&req, body).map_err(|err| AppError::invalid(err.to_string()))?;

    let user_id = user.id.to_hex();
    let (connection, events) = hub.join(&user_id);
    log::info!("Socket opened for user {}", user_id);

    let ws_session = WsSession::new(hub.get_ref().clone(), user_id, connection);
    rt::spawn(ws_session.run(session, stream, events));

    Ok(response)
}
