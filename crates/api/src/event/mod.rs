pub mod delete_past_events;
pub mod list_upcoming_events;
pub mod publish_event;
pub mod send_event_reminders;
mod subscribers;
pub mod sync_event_reminders;
