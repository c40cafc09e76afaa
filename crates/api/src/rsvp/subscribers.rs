use super::respond_to_event::{RespondToEventUseCase, UseCaseResponse};
use crate::shared::usecase::Subscriber;
use huddle_domain::{ResponseKeyboard, RsvpTally};
use huddle_infra::HuddleContext;
use tracing::warn;

/// Updates the counts shown on the response keyboard of the announcement
pub struct RefreshKeyboardOnResponse;

#[async_trait::async_trait(?Send)]
impl Subscriber<RespondToEventUseCase> for RefreshKeyboardOnResponse {
    async fn notify(&self, res: &UseCaseResponse, ctx: &HuddleContext) {
        let announcement = match &res.event.announcement {
            Some(announcement) => announcement,
            None => return,
        };

        // Counts are read while holding the lock, so the last edit of the
        // announcement always shows the latest answers
        let _guard = ctx.announcement_locks.lock(&res.event.id).await;
        let participants = match ctx.repos.participants.find_by_event(&res.event.id).await {
            Ok(participants) => participants,
            Err(e) => {
                warn!(
                    "Unable to count the answers of event {}. Err: {:?}",
                    res.event.id, e
                );
                return;
            }
        };
        let tally = RsvpTally::from_participants(&participants);
        let keyboard = ResponseKeyboard::new(res.event.id, &tally);
        if let Err(e) = ctx.chat.edit_keyboard(announcement, &keyboard).await {
            warn!(
                "Unable to refresh the keyboard of event {}. Err: {:?}",
                res.event.id, e
            );
        }
    }
}

/// Sends the responding user a direct message with their answer
pub struct SendConfirmationOnResponse;

#[async_trait::async_trait(?Send)]
impl Subscriber<RespondToEventUseCase> for SendConfirmationOnResponse {
    async fn notify(&self, res: &UseCaseResponse, ctx: &HuddleContext) {
        let pending = ctx
            .reminder_jobs
            .jobs_for_event(&res.event.id)
            .iter()
            .map(|job| job.key.kind)
            .collect::<Vec<_>>();
        let text = res
            .participant
            .status
            .confirmation(&res.event.title, &pending);
        // Users that never started a conversation with the bot can not be messaged
        if let Err(e) = ctx.chat.send_message(res.participant.user_id, &text).await {
            warn!(
                "Unable to confirm the answer of user {}. Err: {:?}",
                res.participant.user_id, e
            );
        }
    }
}
