use super::subscribers::{RefreshKeyboardOnResponse, SendConfirmationOnResponse};
use crate::shared::usecase::{Subscriber, UseCase};
use huddle_domain::{Event, Participant, RsvpStatus, RsvpTally, ID};
use huddle_infra::HuddleContext;
use tracing::error;

/// Records the answer of a chat user to an `Event`. A later answer of the
/// same user replaces the earlier one.
#[derive(Debug)]
pub struct RespondToEventUseCase {
    pub event_id: ID,
    pub user_id: i64,
    pub username: Option<String>,
    pub fullname: String,
    pub status: RsvpStatus,
}

#[derive(Debug)]
pub struct UseCaseResponse {
    pub event: Event,
    pub participant: Participant,
    /// Answers of every participant of the event, this one included
    pub tally: RsvpTally,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for RespondToEventUseCase {
    type Response = UseCaseResponse;

    type Error = UseCaseError;

    const NAME: &'static str = "RespondToEvent";

    async fn execute(&mut self, ctx: &HuddleContext) -> Result<Self::Response, Self::Error> {
        let event = match ctx.repos.events.find(&self.event_id).await {
            Ok(Some(event)) => event,
            Ok(None) => return Err(UseCaseError::NotFound(self.event_id)),
            Err(_) => return Err(UseCaseError::StorageError),
        };

        let participant = Participant {
            event_id: event.id,
            user_id: self.user_id,
            username: self.username.clone(),
            fullname: self.fullname.clone(),
            status: self.status,
            updated: ctx.sys.get_timestamp_millis(),
        };
        let participant = ctx
            .repos
            .participants
            .upsert(&participant)
            .await
            .map_err(|e| {
                error!(
                    "Unable to store the answer of user {} to event {}. Err: {:?}",
                    self.user_id, event.id, e
                );
                UseCaseError::StorageError
            })?;

        let participants = ctx
            .repos
            .participants
            .find_by_event(&event.id)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(UseCaseResponse {
            tally: RsvpTally::from_participants(&participants),
            event,
            participant,
        })
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![
            Box::new(RefreshKeyboardOnResponse),
            Box::new(SendConfirmationOnResponse),
        ]
    }
}
