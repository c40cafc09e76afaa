use super::IChatClient;
use anyhow::anyhow;
use huddle_domain::{AnnouncementRef, ResponseKeyboard};
use std::collections::HashSet;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Outbound message recorded by the `InMemoryChatClient`
#[derive(Debug, Clone, PartialEq)]
pub enum SentMessage {
    Text {
        chat_id: i64,
        text: String,
    },
    Announcement {
        announcement: AnnouncementRef,
        text: String,
        keyboard: ResponseKeyboard,
    },
    KeyboardEdit {
        announcement: AnnouncementRef,
        keyboard: ResponseKeyboard,
    },
    CallbackAnswer {
        callback_query_id: String,
        text: String,
        show_alert: bool,
    },
}

/// Chat client that records the messages instead of delivering them.
/// Deliveries to the chats registered with `fail_for` are rejected.
#[derive(Default)]
pub struct InMemoryChatClient {
    sent: Mutex<Vec<SentMessage>>,
    attempts: Mutex<Vec<i64>>,
    failing_chats: Mutex<HashSet<i64>>,
    last_message_id: AtomicI64,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl InMemoryChatClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_for(&self, chat_id: i64) {
        lock(&self.failing_chats).insert(chat_id);
    }

    /// The chats that a delivery was attempted to, in order, failed ones included
    pub fn delivery_attempts(&self) -> Vec<i64> {
        lock(&self.attempts).clone()
    }

    /// The successfully delivered messages, in order
    pub fn sent(&self) -> Vec<SentMessage> {
        lock(&self.sent).clone()
    }

    pub fn texts_to(&self, chat_id: i64) -> Vec<String> {
        lock(&self.sent)
            .iter()
            .filter_map(|message| match message {
                SentMessage::Text { chat_id: to, text } if *to == chat_id => Some(text.clone()),
                SentMessage::Announcement {
                    announcement, text, ..
                } if announcement.chat_id == chat_id => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    fn attempt(&self, chat_id: i64) -> anyhow::Result<()> {
        lock(&self.attempts).push(chat_id);
        if lock(&self.failing_chats).contains(&chat_id) {
            return Err(anyhow!("Forbidden: bot can't initiate conversation with {}", chat_id));
        }
        Ok(())
    }

    fn record(&self, message: SentMessage) {
        lock(&self.sent).push(message);
    }
}

#[async_trait::async_trait]
impl IChatClient for InMemoryChatClient {
    async fn send_message(&self, chat_id: i64, text: &str) -> anyhow::Result<()> {
        self.attempt(chat_id)?;
        self.record(SentMessage::Text {
            chat_id,
            text: text.into(),
        });
        Ok(())
    }

    async fn send_announcement(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: &ResponseKeyboard,
    ) -> anyhow::Result<AnnouncementRef> {
        self.attempt(chat_id)?;
        let announcement = AnnouncementRef {
            chat_id,
            message_id: self.last_message_id.fetch_add(1, Ordering::SeqCst) + 1,
        };
        self.record(SentMessage::Announcement {
            announcement,
            text: text.into(),
            keyboard: keyboard.clone(),
        });
        Ok(announcement)
    }

    async fn edit_keyboard(
        &self,
        announcement: &AnnouncementRef,
        keyboard: &ResponseKeyboard,
    ) -> anyhow::Result<()> {
        self.attempt(announcement.chat_id)?;
        self.record(SentMessage::KeyboardEdit {
            announcement: *announcement,
            keyboard: keyboard.clone(),
        });
        Ok(())
    }

    async fn answer_callback(
        &self,
        callback_query_id: &str,
        text: &str,
        show_alert: bool,
    ) -> anyhow::Result<()> {
        self.record(SentMessage::CallbackAnswer {
            callback_query_id: callback_query_id.into(),
            text: text.into(),
            show_alert,
        });
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn records_deliveries_and_rejects_failing_chats() {
        let client = InMemoryChatClient::new();
        client.fail_for(2);

        assert!(client.send_message(1, "hello").await.is_ok());
        assert!(client.send_message(2, "hello").await.is_err());
        assert!(client.send_message(3, "hello").await.is_ok());

        assert_eq!(client.delivery_attempts(), vec![1, 2, 3]);
        assert_eq!(client.texts_to(1), vec!["hello".to_string()]);
        assert!(client.texts_to(2).is_empty());
        assert_eq!(client.sent().len(), 2);
    }
}
