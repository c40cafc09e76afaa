use crate::date::format_time;
use crate::event::Event;
use crate::shared::entity::ID;
use chrono_tz::Tz;
use std::fmt::Display;

const HOUR_MILLIS: i64 = 1000 * 60 * 60;

/// The fixed offsets before the start of an `Event` at which its
/// `Participant`s are reminded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReminderKind {
    DayBefore,
    ThreeHoursBefore,
}

impl ReminderKind {
    pub const ALL: [ReminderKind; 2] = [Self::DayBefore, Self::ThreeHoursBefore];

    pub fn offset_millis(&self) -> i64 {
        match self {
            Self::DayBefore => 24 * HOUR_MILLIS,
            Self::ThreeHoursBefore => 3 * HOUR_MILLIS,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DayBefore => "24h",
            Self::ThreeHoursBefore => "3h",
        }
    }

    /// How long before the start the reminder is sent
    pub fn lead_time(&self) -> &'static str {
        match self {
            Self::DayBefore => "24 hours",
            Self::ThreeHoursBefore => "3 hours",
        }
    }

    pub fn remind_at(&self, start_ts: i64) -> i64 {
        start_ts - self.offset_millis()
    }

    /// Renders the reminder from the current state of the `Event`
    pub fn render(&self, event: &Event, tz: &Tz) -> String {
        match self {
            Self::DayBefore => format!(
                "Reminder: \"{}\" takes place tomorrow at {}. See you there!",
                event.title,
                format_time(event.start_ts, tz)
            ),
            Self::ThreeHoursBefore => format!(
                "Heads up: \"{}\" starts in 3 hours at {}. See you soon!",
                event.title, event.address
            ),
        }
    }
}

/// `24 hours and 3 hours`, `None` when no reminder is pending
pub fn describe_reminders(kinds: &[ReminderKind]) -> Option<String> {
    if kinds.is_empty() {
        return None;
    }
    Some(
        kinds
            .iter()
            .map(|kind| kind.lead_time())
            .collect::<Vec<_>>()
            .join(" and "),
    )
}

impl Display for ReminderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Identifies a scheduled reminder, there is at most one live job per key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReminderJobKey {
    pub event_id: ID,
    pub kind: ReminderKind,
}

impl Display for ReminderJobKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "reminder_{}_{}", self.kind, self.event_id)
    }
}

/// A `ReminderJob` represents the point in time at which the `Participant`s
/// of an `Event` should receive a reminder of the given kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderJob {
    pub key: ReminderJobKey,
    /// Timestamp in millis at which the reminder fires
    pub remind_at: i64,
}

impl ReminderJob {
    /// The jobs for an `Event` starting at `start_ts` whose fire time is
    /// strictly after `now`. Past-due reminders are skipped, never sent late.
    pub fn for_event(event_id: ID, start_ts: i64, now: i64) -> Vec<ReminderJob> {
        ReminderKind::ALL
            .iter()
            .map(|kind| ReminderJob {
                key: ReminderJobKey {
                    event_id,
                    kind: *kind,
                },
                remind_at: kind.remind_at(start_ts),
            })
            .filter(|job| job.remind_at > now)
            .collect()
    }
}
