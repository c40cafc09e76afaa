mod announcement;
mod date;
mod dialogue;
mod event;
mod participant;
mod reminder;
mod shared;

pub use announcement::{InvalidCallbackError, ResponseButton, ResponseKeyboard, RsvpCallback};
pub use date::{format_date_time, format_time, to_local};
pub use dialogue::{DraftInputError, DraftProgress, DraftStep, EventDraft};
pub use event::{AnnouncementRef, Event, NewEvent};
pub use participant::{InvalidStatusError, Participant, RsvpStatus, RsvpTally};
pub use reminder::{describe_reminders, ReminderJob, ReminderJobKey, ReminderKind};
pub use shared::entity::{Entity, InvalidIDError, ID};

pub use chrono_tz::Tz;
