use crate::event::{
    delete_past_events::DeletePastEventsUseCase,
    list_upcoming_events::{ListUpcomingEventsUseCase, UpcomingEvent},
    publish_event::{self, PublishEventUseCase},
};
use crate::shared::{
    auth::{policy_for_user, Permission},
    usecase::{execute_with_policy, UseCaseErrorContainer},
};
use huddle_api_structs::dtos::{MessageDTO, UserDTO};
use huddle_domain::{
    describe_reminders, format_date_time, DraftProgress, DraftStep, Event, EventDraft, Participant,
    Tz,
};
use huddle_infra::HuddleContext;
use tracing::{error, warn};

#[derive(Debug, PartialEq)]
enum Command {
    Event,
    Cancel,
    List,
    ClearEvents,
}

impl Command {
    /// Parses `/command` and `/command@bot_name`, arguments are ignored
    fn parse(text: &str) -> Option<Self> {
        let command = text.trim().strip_prefix('/')?;
        let command = command.split_whitespace().next()?;
        let command = command.split('@').next()?;
        match command {
            "event" => Some(Self::Event),
            "cancel" => Some(Self::Cancel),
            "list" => Some(Self::List),
            "clear_events" => Some(Self::ClearEvents),
            _ => None,
        }
    }
}

async fn reply(ctx: &HuddleContext, chat_id: i64, text: &str) {
    if let Err(e) = ctx.chat.send_message(chat_id, text).await {
        warn!("Unable to reply in chat {}. Err: {:?}", chat_id, e);
    }
}

/// Handles a text message, returns `false` when the message is not meant
/// for the bot
pub async fn handle_message(message: MessageDTO, ctx: &HuddleContext) -> bool {
    let (user, text) = match (&message.from, &message.text) {
        (Some(user), Some(text)) => (user, text.as_str()),
        _ => return false,
    };
    let chat_id = message.chat.id;

    match Command::parse(text) {
        Some(Command::Event) => start_draft(user, &message, ctx).await,
        Some(Command::Cancel) => cancel_draft(user, chat_id, ctx).await,
        Some(Command::List) => list_upcoming_events(user, chat_id, ctx).await,
        Some(Command::ClearEvents) => clear_past_events(user, chat_id, ctx).await,
        None if message.chat.is_private() && !text.starts_with('/') => {
            return continue_draft(user, chat_id, text, ctx).await;
        }
        None => return false,
    }
    true
}

async fn start_draft(user: &UserDTO, message: &MessageDTO, ctx: &HuddleContext) {
    if !message.chat.is_private() {
        reply(
            ctx,
            message.chat.id,
            "⚠️ Events can only be created in a private chat with the bot.",
        )
        .await;
        return;
    }
    if !policy_for_user(user.id, ctx).authorize(&[Permission::CreateEvent]) {
        reply(ctx, message.chat.id, "You are not allowed to create events.").await;
        return;
    }

    let draft = EventDraft::new(user.id);
    if let Err(e) = ctx.repos.drafts.save(&draft).await {
        error!("Unable to store the draft of user {}. Err: {:?}", user.id, e);
        return;
    }
    reply(ctx, message.chat.id, DraftStep::Title.prompt()).await;
}

async fn cancel_draft(user: &UserDTO, chat_id: i64, ctx: &HuddleContext) {
    let text = match ctx.repos.drafts.delete(user.id).await {
        Ok(Some(_)) => "Event creation cancelled.",
        _ => "There is nothing to cancel.",
    };
    reply(ctx, chat_id, text).await;
}

/// Feeds the text to the event draft of the user, if there is one
async fn continue_draft(user: &UserDTO, chat_id: i64, text: &str, ctx: &HuddleContext) -> bool {
    let mut draft = match ctx.repos.drafts.find(user.id).await {
        Ok(Some(draft)) => draft,
        _ => return false,
    };

    let now = ctx.sys.get_timestamp_millis();
    match draft.advance(text, now, &ctx.config.timezone) {
        Err(e) => reply(ctx, chat_id, &e.to_string()).await,
        Ok(DraftProgress::Continue(step)) => {
            if let Err(e) = ctx.repos.drafts.save(&draft).await {
                error!("Unable to store the draft of user {}. Err: {:?}", user.id, e);
                return true;
            }
            reply(ctx, chat_id, step.prompt()).await;
        }
        Ok(DraftProgress::Complete(event)) => {
            let _ = ctx.repos.drafts.delete(user.id).await;
            let usecase = PublishEventUseCase { event };
            let policy = policy_for_user(user.id, ctx);
            let text = match execute_with_policy(usecase, &policy, ctx).await {
                Ok(event) => published_reply(&event, ctx),
                Err(UseCaseErrorContainer::Unauthorized(_)) => {
                    "You are not allowed to create events.".into()
                }
                Err(UseCaseErrorContainer::UseCase(publish_event::UseCaseError::PublishFailed)) => {
                    "❌ The announcement could not be published. Please try again with /event."
                        .into()
                }
                Err(UseCaseErrorContainer::UseCase(publish_event::UseCaseError::StorageError)) => {
                    "❌ The event could not be saved. Please try again with /event.".into()
                }
            };
            reply(ctx, chat_id, &text).await;
        }
    }
    true
}

fn published_reply(event: &Event, ctx: &HuddleContext) -> String {
    let pending = ctx
        .reminder_jobs
        .jobs_for_event(&event.id)
        .iter()
        .map(|job| job.key.kind)
        .collect::<Vec<_>>();
    let reminders = match describe_reminders(&pending) {
        Some(lead_times) => format!("🔔 Reminders are scheduled {} before the start", lead_times),
        None => "🔕 The event starts too soon for reminders".to_string(),
    };
    format!(
        "✅ The event has been created!\n\n\
         📢 The announcement is published in the community chat\n\
         {}",
        reminders
    )
}

async fn list_upcoming_events(user: &UserDTO, chat_id: i64, ctx: &HuddleContext) {
    let policy = policy_for_user(user.id, ctx);
    match execute_with_policy(ListUpcomingEventsUseCase, &policy, ctx).await {
        Ok(events) if events.is_empty() => {
            reply(ctx, chat_id, "There are no upcoming events.").await
        }
        Ok(events) => {
            for upcoming in &events {
                reply(ctx, chat_id, &format_upcoming_event(upcoming, &ctx.config.timezone)).await;
            }
        }
        Err(UseCaseErrorContainer::Unauthorized(_)) => {
            reply(ctx, chat_id, "You are not allowed to view participants.").await
        }
        Err(UseCaseErrorContainer::UseCase(_)) => {
            reply(ctx, chat_id, "Something went wrong, please try again later.").await
        }
    }
}

async fn clear_past_events(user: &UserDTO, chat_id: i64, ctx: &HuddleContext) {
    let policy = policy_for_user(user.id, ctx);
    let text = match execute_with_policy(DeletePastEventsUseCase, &policy, ctx).await {
        Ok(deleted) => format!("✅ Deleted {} past events.", deleted),
        Err(UseCaseErrorContainer::Unauthorized(_)) => {
            "You are not allowed to delete events.".into()
        }
        Err(UseCaseErrorContainer::UseCase(_)) => {
            "Something went wrong, please try again later.".into()
        }
    };
    reply(ctx, chat_id, &text).await;
}

fn format_names(participants: &[Participant]) -> String {
    if participants.is_empty() {
        return "Nobody yet".into();
    }
    participants
        .iter()
        .map(|p| p.display_name())
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_upcoming_event(upcoming: &UpcomingEvent, tz: &Tz) -> String {
    format!(
        "📊 Event: {}\n📅 {}\n\n👍 Going ({}):\n{}\n\n🤔 Maybe ({}):\n{}",
        upcoming.event.title,
        format_date_time(upcoming.event.start_ts, tz),
        upcoming.going.len(),
        format_names(&upcoming.going),
        upcoming.maybe.len(),
        format_names(&upcoming.maybe),
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use huddle_api_structs::dtos::ChatDTO;
    use huddle_domain::{Event, NewEvent, RsvpStatus, ID};
    use huddle_infra::{FixedSys, InMemoryChatClient};
    use std::sync::Arc;

    const ADMIN_ID: i64 = 1;
    // 2026-09-21 22:13:20 UTC
    const NOW: i64 = 1_790_028_800_000;

    fn setup() -> (HuddleContext, Arc<InMemoryChatClient>) {
        let chat = Arc::new(InMemoryChatClient::new());
        let mut ctx = HuddleContext::create_inmemory_with_chat(chat.clone());
        ctx.sys = Arc::new(FixedSys(NOW));
        ctx.config.admin_ids.insert(ADMIN_ID);
        (ctx, chat)
    }

    fn message(user_id: i64, chat_type: &str, text: &str) -> MessageDTO {
        MessageDTO {
            message_id: 1,
            chat: ChatDTO {
                id: user_id,
                chat_type: chat_type.into(),
            },
            from: Some(UserDTO {
                id: user_id,
                first_name: "Grace".into(),
                last_name: None,
                username: None,
            }),
            text: Some(text.into()),
        }
    }

    fn participant(event_id: ID, user_id: i64, username: Option<&str>) -> Participant {
        Participant {
            event_id,
            user_id,
            username: username.map(String::from),
            fullname: format!("User {}", user_id),
            status: RsvpStatus::Going,
            updated: 0,
        }
    }

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse("/event"), Some(Command::Event));
        assert_eq!(Command::parse("/list@huddle_bot"), Some(Command::List));
        assert_eq!(Command::parse(" /clear_events now"), Some(Command::ClearEvents));
        assert_eq!(Command::parse("/cancel"), Some(Command::Cancel));
        assert_eq!(Command::parse("/start"), None);
        assert_eq!(Command::parse("event"), None);
    }

    #[test]
    fn formats_upcoming_event() {
        let event = Event::new(
            ID::new(1),
            NewEvent {
                title: "Picnic".into(),
                start_ts: 1_797_346_800_000,
                end_ts: None,
                address: "Park".into(),
                description: "".into(),
            },
            0,
        );
        let upcoming = UpcomingEvent {
            going: vec![
                participant(event.id, 1, Some("ada")),
                participant(event.id, 2, None),
            ],
            maybe: vec![],
            event,
        };
        assert_eq!(
            format_upcoming_event(&upcoming, &Tz::UTC),
            "📊 Event: Picnic\n📅 15.12.2026 15:00\n\n👍 Going (2):\n@ada, User 2\n\n🤔 Maybe (0):\nNobody yet"
        );
    }

    #[actix_web::main]
    #[test]
    async fn organizer_creates_event_through_dialogue() {
        let (ctx, chat) = setup();
        for text in ["/event", "Picnic", "15.12 18:00-20:00", "Central park", "Bring food"] {
            assert!(handle_message(message(ADMIN_ID, "private", text), &ctx).await);
        }

        let events = ctx.repos.events.find_upcoming(NOW).await.unwrap();
        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.title, "Picnic");
        assert_eq!(event.start_ts, 1_797_357_600_000);
        assert_eq!(event.end_ts, Some(1_797_364_800_000));
        assert_eq!(event.address, "Central park");
        assert_eq!(event.description, "Bring food");
        assert!(event.announcement.is_some());
        assert_eq!(ctx.reminder_jobs.jobs_for_event(&event.id).len(), 2);

        let replies = chat.texts_to(ADMIN_ID);
        assert_eq!(replies[0], DraftStep::Title.prompt());
        assert_eq!(replies[1], DraftStep::StartTime.prompt());
        assert!(replies[4].starts_with("✅ The event has been created!"));
        assert!(replies[4].contains("scheduled 24 hours and 3 hours before"));
        assert!(ctx.repos.drafts.find(ADMIN_ID).await.unwrap().is_none());
    }

    #[actix_web::main]
    #[test]
    async fn event_starting_soon_is_created_without_reminders() {
        let (ctx, chat) = setup();
        // Less than 2 hours after NOW
        for text in ["/event", "Late walk", "22.09 00:00", "River", "Quick one"] {
            assert!(handle_message(message(ADMIN_ID, "private", text), &ctx).await);
        }

        let events = ctx.repos.events.find_upcoming(NOW).await.unwrap();
        assert_eq!(events.len(), 1);
        assert!(ctx.reminder_jobs.jobs_for_event(&events[0].id).is_empty());

        let replies = chat.texts_to(ADMIN_ID);
        assert!(replies[4].starts_with("✅ The event has been created!"));
        assert!(!replies[4].contains("Reminders are scheduled"));
        assert!(replies[4].contains("too soon for reminders"));
    }

    #[actix_web::main]
    #[test]
    async fn invalid_date_keeps_the_dialogue_step() {
        let (ctx, chat) = setup();
        for text in ["/event", "Picnic", "tomorrow"] {
            handle_message(message(ADMIN_ID, "private", text), &ctx).await;
        }

        let draft = ctx.repos.drafts.find(ADMIN_ID).await.unwrap().unwrap();
        assert_eq!(draft.step(), DraftStep::StartTime);
        assert!(chat.texts_to(ADMIN_ID)[2].starts_with("Invalid date"));

        handle_message(message(ADMIN_ID, "private", "/cancel"), &ctx).await;
        assert!(ctx.repos.drafts.find(ADMIN_ID).await.unwrap().is_none());
    }

    #[actix_web::main]
    #[test]
    async fn only_admins_in_private_chats_create_events() {
        let (ctx, chat) = setup();

        handle_message(message(2, "private", "/event"), &ctx).await;
        assert_eq!(chat.texts_to(2), vec!["You are not allowed to create events."]);
        assert!(ctx.repos.drafts.find(2).await.unwrap().is_none());

        let mut group_message = message(ADMIN_ID, "supergroup", "/event");
        group_message.chat.id = -100;
        handle_message(group_message, &ctx).await;
        assert!(chat.texts_to(-100)[0].starts_with("⚠️"));
        assert!(ctx.repos.drafts.find(ADMIN_ID).await.unwrap().is_none());
    }

    #[actix_web::main]
    #[test]
    async fn admin_commands_require_permission() {
        let (ctx, chat) = setup();
        handle_message(message(2, "private", "/list"), &ctx).await;
        handle_message(message(2, "private", "/clear_events"), &ctx).await;
        assert_eq!(
            chat.texts_to(2),
            vec![
                "You are not allowed to view participants.",
                "You are not allowed to delete events."
            ]
        );

        handle_message(message(ADMIN_ID, "private", "/list"), &ctx).await;
        assert_eq!(chat.texts_to(ADMIN_ID), vec!["There are no upcoming events."]);
    }

    #[actix_web::main]
    #[test]
    async fn plain_text_without_draft_is_ignored() {
        let (ctx, chat) = setup();
        assert!(!handle_message(message(ADMIN_ID, "private", "hello"), &ctx).await);
        assert!(!handle_message(message(ADMIN_ID, "private", "/start"), &ctx).await);
        assert!(chat.sent().is_empty());
    }
}
