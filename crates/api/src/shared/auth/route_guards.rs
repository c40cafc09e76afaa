use super::Policy;
use crate::error::HuddleError;
use actix_web::HttpRequest;
use huddle_api_structs::WEBHOOK_SECRET_HEADER;
use huddle_infra::HuddleContext;
use tracing::warn;

/// Only requests carrying the secret token registered with the chat platform
/// are accepted on the webhook
pub fn protect_webhook_route(
    http_req: &HttpRequest,
    ctx: &HuddleContext,
) -> Result<(), HuddleError> {
    let token = http_req
        .headers()
        .get(WEBHOOK_SECRET_HEADER)
        .and_then(|value| value.to_str().ok());

    match token {
        Some(token) if token == ctx.config.webhook_secret => Ok(()),
        Some(_) => {
            warn!("Webhook request with invalid secret token rejected");
            Err(HuddleError::Unauthorized(
                "Invalid secret token provided".into(),
            ))
        }
        None => Err(HuddleError::Unauthorized(format!(
            "Missing `{}` header",
            WEBHOOK_SECRET_HEADER
        ))),
    }
}

pub fn policy_for_user(user_id: i64, ctx: &HuddleContext) -> Policy {
    if ctx.config.is_admin(user_id) {
        Policy::admin()
    } else {
        Policy::default()
    }
}
