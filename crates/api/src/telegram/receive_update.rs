use super::commands::handle_message;
use crate::error::HuddleError;
use crate::rsvp::respond_to_event::{RespondToEventUseCase, UseCaseError};
use crate::shared::{auth::protect_webhook_route, usecase::execute};
use actix_web::{web, HttpRequest, HttpResponse};
use huddle_api_structs::dtos::CallbackQueryDTO;
use huddle_api_structs::receive_update::*;
use huddle_domain::RsvpCallback;
use huddle_infra::HuddleContext;
use tracing::{info, warn};

/// Receives the updates pushed by the Telegram Bot API. Once the secret token
/// is verified the update is always acknowledged, otherwise Telegram would
/// keep redelivering it.
pub async fn receive_update_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<HuddleContext>,
) -> Result<HttpResponse, HuddleError> {
    protect_webhook_route(&http_req, &ctx)?;

    let update = body.0;
    let handled = if let Some(query) = update.callback_query {
        handle_callback_query(query, &ctx).await
    } else if let Some(message) = update.message {
        handle_message(message, &ctx).await
    } else {
        false
    };
    if !handled {
        info!("Ignored update {}", update.update_id);
    }

    Ok(HttpResponse::Ok().json(APIResponse { handled }))
}

async fn handle_callback_query(query: CallbackQueryDTO, ctx: &HuddleContext) -> bool {
    let data = match query.data.as_deref() {
        Some(data) if RsvpCallback::matches(data) => data,
        _ => return false,
    };

    let (text, show_alert) = match data.parse::<RsvpCallback>() {
        Ok(callback) => {
            let usecase = RespondToEventUseCase {
                event_id: callback.event_id,
                user_id: query.from.id,
                username: query.from.username.clone(),
                fullname: query.from.full_name(),
                status: callback.status,
            };
            match execute(usecase, ctx).await {
                Ok(_) => ("✅ Your answer has been saved!", false),
                Err(UseCaseError::NotFound(_)) => ("This event is no longer available", true),
                Err(UseCaseError::StorageError) => {
                    ("Something went wrong, please try again later", true)
                }
            }
        }
        Err(e) => {
            warn!("Invalid response callback: {:?}. Err: {}", data, e);
            ("Unknown action", true)
        }
    };

    if let Err(e) = ctx.chat.answer_callback(&query.id, text, show_alert).await {
        warn!("Unable to answer callback query {}. Err: {:?}", query.id, e);
    }
    true
}
