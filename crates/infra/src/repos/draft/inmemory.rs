use super::IDraftRepo;
use huddle_domain::EventDraft;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

pub struct InMemoryDraftRepo {
    drafts: Mutex<HashMap<i64, EventDraft>>,
}

impl InMemoryDraftRepo {
    pub fn new() -> Self {
        Self {
            drafts: Mutex::new(HashMap::new()),
        }
    }

    fn drafts(&self) -> MutexGuard<'_, HashMap<i64, EventDraft>> {
        self.drafts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait::async_trait]
impl IDraftRepo for InMemoryDraftRepo {
    async fn save(&self, draft: &EventDraft) -> anyhow::Result<()> {
        self.drafts().insert(draft.user_id, draft.clone());
        Ok(())
    }

    async fn find(&self, user_id: i64) -> anyhow::Result<Option<EventDraft>> {
        Ok(self.drafts().get(&user_id).cloned())
    }

    async fn delete(&self, user_id: i64) -> anyhow::Result<Option<EventDraft>> {
        Ok(self.drafts().remove(&user_id))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono_tz::UTC;

    #[tokio::test]
    async fn keeps_one_draft_per_user() {
        let repo = InMemoryDraftRepo::new();
        let mut draft = EventDraft::new(7);
        repo.save(&draft).await.unwrap();
        draft.advance("Quiz night", 0, &UTC).unwrap();
        repo.save(&draft).await.unwrap();

        assert_eq!(repo.find(7).await.unwrap(), Some(draft.clone()));
        assert_eq!(repo.find(8).await.unwrap(), None);
        assert_eq!(repo.delete(7).await.unwrap(), Some(draft));
        assert_eq!(repo.find(7).await.unwrap(), None);
    }
}
