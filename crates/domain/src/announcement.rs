use crate::participant::{InvalidStatusError, RsvpStatus, RsvpTally};
use crate::shared::entity::{InvalidIDError, ID};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

const CALLBACK_PREFIX: &str = "event";

/// Payload attached to a response control of an announcement: `event:<id>:<status>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RsvpCallback {
    pub event_id: ID,
    pub status: RsvpStatus,
}

impl RsvpCallback {
    pub fn new(event_id: ID, status: RsvpStatus) -> Self {
        Self { event_id, status }
    }

    pub fn matches(data: &str) -> bool {
        data.starts_with(CALLBACK_PREFIX) && data[CALLBACK_PREFIX.len()..].starts_with(':')
    }
}

impl Display for RsvpCallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", CALLBACK_PREFIX, self.event_id, self.status)
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum InvalidCallbackError {
    #[error("Callback payload: `{0}` is malformed")]
    Malformed(String),
    #[error(transparent)]
    MalformedEventId(#[from] InvalidIDError),
    #[error(transparent)]
    UnknownAction(#[from] InvalidStatusError),
}

impl FromStr for RsvpCallback {
    type Err = InvalidCallbackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s.split(':').collect::<Vec<_>>();
        if parts.len() != 3 || parts[0] != CALLBACK_PREFIX {
            return Err(InvalidCallbackError::Malformed(s.to_string()));
        }
        let event_id = parts[1].parse::<ID>()?;
        let status = parts[2].parse::<RsvpStatus>()?;
        Ok(Self { event_id, status })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseButton {
    pub label: String,
    pub callback_data: String,
}

/// The response controls rendered below an announcement, one row per `RsvpStatus`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseKeyboard {
    pub buttons: Vec<ResponseButton>,
}

impl ResponseKeyboard {
    pub fn new(event_id: ID, tally: &RsvpTally) -> Self {
        let buttons = RsvpStatus::ALL
            .iter()
            .map(|status| ResponseButton {
                label: format!("{} ({})", status.label(), tally.count(*status)),
                callback_data: RsvpCallback::new(event_id, *status).to_string(),
            })
            .collect();
        Self { buttons }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_callback_payload() {
        assert_eq!(
            "event:12:not_going".parse::<RsvpCallback>(),
            Ok(RsvpCallback::new(ID::new(12), RsvpStatus::NotGoing))
        );
        let callback = RsvpCallback::new(ID::new(3), RsvpStatus::Maybe);
        assert_eq!(callback.to_string(), "event:3:maybe");
    }

    #[test]
    fn rejects_malformed_payload() {
        for data in ["event", "event:1", "event:1:going:x", "poll:1:going", ""] {
            assert_eq!(
                data.parse::<RsvpCallback>(),
                Err(InvalidCallbackError::Malformed(data.to_string()))
            );
        }
        assert!(matches!(
            "event:abc:going".parse::<RsvpCallback>(),
            Err(InvalidCallbackError::MalformedEventId(_))
        ));
    }

    #[test]
    fn rejects_unknown_action() {
        assert!(matches!(
            "event:1:remind".parse::<RsvpCallback>(),
            Err(InvalidCallbackError::UnknownAction(_))
        ));
    }

    #[test]
    fn matches_only_event_payloads() {
        assert!(RsvpCallback::matches("event:1:going"));
        assert!(RsvpCallback::matches("event:whatever"));
        assert!(!RsvpCallback::matches("events:1:going"));
        assert!(!RsvpCallback::matches("poll:1"));
    }

    #[test]
    fn keyboard_has_a_control_per_status_with_counts() {
        let tally = RsvpTally {
            going: 4,
            maybe: 1,
            not_going: 0,
        };
        let keyboard = ResponseKeyboard::new(ID::new(7), &tally);
        assert_eq!(
            keyboard.buttons,
            vec![
                ResponseButton {
                    label: "👍 Going (4)".into(),
                    callback_data: "event:7:going".into()
                },
                ResponseButton {
                    label: "🤔 Maybe (1)".into(),
                    callback_data: "event:7:maybe".into()
                },
                ResponseButton {
                    label: "👎 Not going (0)".into(),
                    callback_data: "event:7:not_going".into()
                },
            ]
        );
    }
}
