use serde::{Deserialize, Serialize};

/// The subset of the Telegram Bot API `Update` object that the bot reacts to.
/// Unknown fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateDTO {
    pub update_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<MessageDTO>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_query: Option<CallbackQueryDTO>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDTO {
    pub message_id: i64,
    pub chat: ChatDTO,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<UserDTO>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatDTO {
    pub id: i64,
    /// One of `private`, `group`, `supergroup` or `channel`
    #[serde(rename = "type")]
    pub chat_type: String,
}

impl ChatDTO {
    pub fn is_private(&self) -> bool {
        self.chat_type == "private"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDTO {
    pub id: i64,
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl UserDTO {
    pub fn full_name(&self) -> String {
        match &self.last_name {
            Some(last_name) if !last_name.is_empty() => {
                format!("{} {}", self.first_name, last_name)
            }
            _ => self.first_name.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallbackQueryDTO {
    pub id: String,
    pub from: UserDTO,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_callback_query_update() {
        let update: UpdateDTO = serde_json::from_str(
            r#"{
                "update_id": 10,
                "callback_query": {
                    "id": "4382",
                    "chat_instance": "-81",
                    "from": { "id": 7, "is_bot": false, "first_name": "Ada", "last_name": "Lovelace" },
                    "message": { "message_id": 3, "chat": { "id": -100, "type": "supergroup" } },
                    "data": "event:1:going"
                }
            }"#,
        )
        .unwrap();

        let query = update.callback_query.unwrap();
        assert!(update.message.is_none());
        assert_eq!(query.data.as_deref(), Some("event:1:going"));
        assert_eq!(query.from.full_name(), "Ada Lovelace");
        assert_eq!(query.from.username, None);
    }

    #[test]
    fn parses_private_text_message() {
        let update: UpdateDTO = serde_json::from_str(
            r#"{
                "update_id": 11,
                "message": {
                    "message_id": 5,
                    "date": 1790000000,
                    "chat": { "id": 7, "type": "private", "first_name": "Ada" },
                    "from": { "id": 7, "is_bot": false, "first_name": "Ada", "username": "ada" },
                    "text": "/event"
                }
            }"#,
        )
        .unwrap();

        let message = update.message.unwrap();
        assert!(message.chat.is_private());
        assert_eq!(message.text.as_deref(), Some("/event"));
        assert_eq!(message.from.unwrap().full_name(), "Ada");
    }
}
