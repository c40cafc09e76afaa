use crate::dtos::UpdateDTO;
use serde::{Deserialize, Serialize};

/// Header carrying the secret token registered with `setWebhook`
pub const WEBHOOK_SECRET_HEADER: &str = "X-Telegram-Bot-Api-Secret-Token";

pub mod receive_update {
    use super::*;

    pub type RequestBody = UpdateDTO;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub handled: bool,
    }
}
