use super::IChatClient;
use anyhow::anyhow;
use huddle_domain::{AnnouncementRef, ResponseKeyboard};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::error;

#[derive(Debug, Serialize)]
struct InlineKeyboardButton {
    text: String,
    callback_data: String,
}

/// One button per row, in the order of the `ResponseKeyboard`
#[derive(Debug, Serialize)]
struct InlineKeyboardMarkup {
    inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

impl From<&ResponseKeyboard> for InlineKeyboardMarkup {
    fn from(keyboard: &ResponseKeyboard) -> Self {
        Self {
            inline_keyboard: keyboard
                .buttons
                .iter()
                .map(|button| {
                    vec![InlineKeyboardButton {
                        text: button.label.clone(),
                        callback_data: button.callback_data.clone(),
                    }]
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<InlineKeyboardMarkup>,
}

#[derive(Debug, Serialize)]
struct EditMessageReplyMarkupRequest {
    chat_id: i64,
    message_id: i64,
    reply_markup: InlineKeyboardMarkup,
}

#[derive(Debug, Serialize)]
struct AnswerCallbackQueryRequest<'a> {
    callback_query_id: &'a str,
    text: &'a str,
    show_alert: bool,
}

#[derive(Debug, Deserialize)]
struct ChatResult {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct MessageResult {
    message_id: i64,
    chat: ChatResult,
}

/// Envelope of every Bot API response
#[derive(Debug, Deserialize)]
struct BotApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

pub struct TelegramClient {
    client: Client,
    base_url: String,
}

impl TelegramClient {
    pub fn new(api_url: &str, bot_token: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: format!("{}/bot{}", api_url.trim_end_matches('/'), bot_token),
        }
    }

    async fn call<T: for<'de> Deserialize<'de>>(
        &self,
        method: &str,
        body: &impl Serialize,
    ) -> anyhow::Result<T> {
        let res = match self
            .client
            .post(&format!("{}/{}", self.base_url, method))
            .json(body)
            .send()
            .await
        {
            Ok(res) => res,
            Err(e) => {
                // The request url contains the bot token
                let e = e.without_url();
                error!(
                    "[Network Error] Telegram Bot API {} error. Error message: {:?}",
                    method, e
                );
                return Err(anyhow::Error::new(e));
            }
        };

        let res = res.json::<BotApiResponse<T>>().await.map_err(|e| {
            let e = e.without_url();
            error!(
                "[Unexpected Response] Telegram Bot API {} error. Error message: {:?}",
                method, e
            );
            anyhow::Error::new(e)
        })?;

        match (res.ok, res.result) {
            (true, Some(result)) => Ok(result),
            _ => {
                let description = res.description.unwrap_or_default();
                error!(
                    "[Unexpected Response] Telegram Bot API {} was rejected: {}",
                    method, description
                );
                Err(anyhow!("Telegram Bot API {} failed: {}", method, description))
            }
        }
    }
}

#[async_trait::async_trait]
impl IChatClient for TelegramClient {
    async fn send_message(&self, chat_id: i64, text: &str) -> anyhow::Result<()> {
        let body = SendMessageRequest {
            chat_id,
            text,
            reply_markup: None,
        };
        self.call::<MessageResult>("sendMessage", &body)
            .await
            .map(|_| ())
    }

    async fn send_announcement(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: &ResponseKeyboard,
    ) -> anyhow::Result<AnnouncementRef> {
        let body = SendMessageRequest {
            chat_id,
            text,
            reply_markup: Some(keyboard.into()),
        };
        let message = self.call::<MessageResult>("sendMessage", &body).await?;
        Ok(AnnouncementRef {
            chat_id: message.chat.id,
            message_id: message.message_id,
        })
    }

    async fn edit_keyboard(
        &self,
        announcement: &AnnouncementRef,
        keyboard: &ResponseKeyboard,
    ) -> anyhow::Result<()> {
        let body = EditMessageReplyMarkupRequest {
            chat_id: announcement.chat_id,
            message_id: announcement.message_id,
            reply_markup: keyboard.into(),
        };
        // The result is either the edited message or `true`
        self.call::<serde_json::Value>("editMessageReplyMarkup", &body)
            .await
            .map(|_| ())
    }

    async fn answer_callback(
        &self,
        callback_query_id: &str,
        text: &str,
        show_alert: bool,
    ) -> anyhow::Result<()> {
        let body = AnswerCallbackQueryRequest {
            callback_query_id,
            text,
            show_alert,
        };
        self.call::<bool>("answerCallbackQuery", &body)
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use huddle_domain::{RsvpTally, ID};
    use serde_json::json;

    #[test]
    fn serializes_response_keyboard_as_inline_keyboard() {
        let tally = RsvpTally {
            going: 2,
            maybe: 0,
            not_going: 1,
        };
        let keyboard = ResponseKeyboard::new(ID::new(3), &tally);
        let body = SendMessageRequest {
            chat_id: -100,
            text: "Picnic",
            reply_markup: Some((&keyboard).into()),
        };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "chat_id": -100,
                "text": "Picnic",
                "reply_markup": {
                    "inline_keyboard": [
                        [{ "text": "👍 Going (2)", "callback_data": "event:3:going" }],
                        [{ "text": "🤔 Maybe (0)", "callback_data": "event:3:maybe" }],
                        [{ "text": "👎 Not going (1)", "callback_data": "event:3:not_going" }],
                    ]
                }
            })
        );
    }

    #[test]
    fn plain_message_has_no_reply_markup() {
        let body = SendMessageRequest {
            chat_id: 1,
            text: "hi",
            reply_markup: None,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({ "chat_id": 1, "text": "hi" })
        );
    }

    #[test]
    fn rejected_response_is_parsed() {
        let res: BotApiResponse<MessageResult> = serde_json::from_value(json!({
            "ok": false,
            "error_code": 403,
            "description": "Forbidden: bot was blocked by the user"
        }))
        .unwrap();
        assert!(!res.ok);
        assert!(res.result.is_none());
    }
}
