use crate::date::{format_date_time, format_time};
use crate::shared::entity::{Entity, ID};
use chrono_tz::Tz;

/// Reference to the announcement message that was posted for an `Event`
/// in the community chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnouncementRef {
    pub chat_id: i64,
    pub message_id: i64,
}

/// The fields collected for an `Event` before the store has assigned it an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub title: String,
    pub start_ts: i64,
    pub end_ts: Option<i64>,
    pub address: String,
    pub description: String,
}

/// A community `Event` that is announced in the community chat and that
/// `Participant`s can respond to.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: ID,
    pub title: String,
    /// UTC timestamp in millis. Reminders are derived from this value once,
    /// changing it does not move already registered reminders.
    pub start_ts: i64,
    pub end_ts: Option<i64>,
    pub address: String,
    pub description: String,
    /// Set right after the announcement has been posted
    pub announcement: Option<AnnouncementRef>,
    pub created: i64,
}

impl Event {
    pub fn new(id: ID, new_event: NewEvent, created: i64) -> Self {
        Self {
            id,
            title: new_event.title,
            start_ts: new_event.start_ts,
            end_ts: new_event.end_ts,
            address: new_event.address,
            description: new_event.description,
            announcement: None,
            created,
        }
    }

    pub fn is_upcoming(&self, now: i64) -> bool {
        self.start_ts > now
    }

    pub fn announcement_text(&self, tz: &Tz) -> String {
        let when = match self.end_ts {
            Some(end_ts) => format!(
                "{}–{}",
                format_date_time(self.start_ts, tz),
                format_time(end_ts, tz)
            ),
            None => format_date_time(self.start_ts, tz),
        };
        format!(
            "{}\n\n📅 {}\n📍 {}\n\n{}",
            self.title, when, self.address, self.description
        )
    }
}

impl Entity<ID> for Event {
    fn id(&self) -> ID {
        self.id
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::UTC;

    fn new_event(end_ts: Option<i64>) -> Event {
        let start_ts = UTC
            .with_ymd_and_hms(2026, 12, 15, 18, 0, 0)
            .unwrap()
            .timestamp_millis();
        Event::new(
            ID::new(1),
            NewEvent {
                title: "Board games night".into(),
                start_ts,
                end_ts: end_ts.map(|delta| start_ts + delta),
                address: "Main street 1".into(),
                description: "Bring your favourite game".into(),
            },
            0,
        )
    }

    #[test]
    fn upcoming_is_strictly_after_now() {
        let event = new_event(None);
        assert!(event.is_upcoming(event.start_ts - 1));
        assert!(!event.is_upcoming(event.start_ts));
        assert!(!event.is_upcoming(event.start_ts + 1));
    }

    #[test]
    fn renders_announcement() {
        let event = new_event(None);
        assert_eq!(
            event.announcement_text(&UTC),
            "Board games night\n\n📅 15.12.2026 18:00\n📍 Main street 1\n\nBring your favourite game"
        );

        let event = new_event(Some(1000 * 60 * 60 * 3));
        assert!(event
            .announcement_text(&UTC)
            .contains("📅 15.12.2026 18:00–21:00"));
    }
}
