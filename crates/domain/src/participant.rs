use crate::reminder::{describe_reminders, ReminderKind};
use crate::shared::entity::ID;
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

/// The answer a `Participant` gave to an `Event`.
///
/// A user without a `Participant` record has not answered yet. Any later
/// answer replaces the previous one, there is no terminal status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RsvpStatus {
    Going,
    Maybe,
    NotGoing,
}

impl RsvpStatus {
    pub const ALL: [RsvpStatus; 3] = [Self::Going, Self::Maybe, Self::NotGoing];

    /// The statuses that receive reminders
    pub fn notified() -> [RsvpStatus; 2] {
        [Self::Going, Self::Maybe]
    }

    pub fn is_notified(&self) -> bool {
        Self::notified().contains(self)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Going => "going",
            Self::Maybe => "maybe",
            Self::NotGoing => "not_going",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Going => "👍 Going",
            Self::Maybe => "🤔 Maybe",
            Self::NotGoing => "👎 Not going",
        }
    }

    /// Direct message sent to a user after they answered. `pending` are the
    /// reminders of the event that have not fired yet.
    pub fn confirmation(&self, event_title: &str, pending: &[ReminderKind]) -> String {
        let answer = format!("✅ Your answer for \"{}\": {}.", event_title, self.label());
        if !self.is_notified() {
            return format!("{} Changed your mind? Just pick another answer.", answer);
        }
        match describe_reminders(pending) {
            Some(lead_times) => format!(
                "{} I will remind you {} before the start.",
                answer, lead_times
            ),
            None => format!("{} The event starts soon, so there will be no reminder.", answer),
        }
    }
}

impl Display for RsvpStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum InvalidStatusError {
    #[error("Status: {0} is not a recognized answer")]
    Unknown(String),
}

impl FromStr for RsvpStatus {
    type Err = InvalidStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|status| status.as_str() == s)
            .copied()
            .ok_or_else(|| InvalidStatusError::Unknown(s.to_string()))
    }
}

/// A user's answer to an `Event`. There is at most one per (event, user).
#[derive(Debug, Clone, PartialEq)]
pub struct Participant {
    pub event_id: ID,
    pub user_id: i64,
    pub username: Option<String>,
    pub fullname: String,
    pub status: RsvpStatus,
    /// Timestamp in millis of the latest answer
    pub updated: i64,
}

impl Participant {
    /// `@username` when the user has one, otherwise the full name
    pub fn display_name(&self) -> String {
        match &self.username {
            Some(username) if !username.is_empty() => format!("@{}", username),
            _ => self.fullname.clone(),
        }
    }
}

/// Number of `Participant`s per `RsvpStatus` for an `Event`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RsvpTally {
    pub going: usize,
    pub maybe: usize,
    pub not_going: usize,
}

impl RsvpTally {
    pub fn from_participants(participants: &[Participant]) -> Self {
        participants
            .iter()
            .fold(Self::default(), |mut tally, participant| {
                match participant.status {
                    RsvpStatus::Going => tally.going += 1,
                    RsvpStatus::Maybe => tally.maybe += 1,
                    RsvpStatus::NotGoing => tally.not_going += 1,
                }
                tally
            })
    }

    pub fn count(&self, status: RsvpStatus) -> usize {
        match status {
            RsvpStatus::Going => self.going,
            RsvpStatus::Maybe => self.maybe,
            RsvpStatus::NotGoing => self.not_going,
        }
    }

    pub fn total(&self) -> usize {
        self.going + self.maybe + self.not_going
    }
}
