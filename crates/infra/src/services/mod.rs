mod inmemory;
mod telegram;

use huddle_domain::{AnnouncementRef, ResponseKeyboard};
pub use inmemory::{InMemoryChatClient, SentMessage};
pub use telegram::TelegramClient;

/// Outbound side of the chat platform
#[async_trait::async_trait]
pub trait IChatClient: Send + Sync {
    async fn send_message(&self, chat_id: i64, text: &str) -> anyhow::Result<()>;
    /// Posts the announcement of an event together with its response keyboard
    async fn send_announcement(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: &ResponseKeyboard,
    ) -> anyhow::Result<AnnouncementRef>;
    /// Replaces the response keyboard below an already posted announcement
    async fn edit_keyboard(
        &self,
        announcement: &AnnouncementRef,
        keyboard: &ResponseKeyboard,
    ) -> anyhow::Result<()>;
    async fn answer_callback(
        &self,
        callback_query_id: &str,
        text: &str,
        show_alert: bool,
    ) -> anyhow::Result<()>;
}
