use huddle_domain::{ReminderJob, ReminderJobKey, ID};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::AbortHandle;
use tracing::{debug, info};

#[derive(Error, Debug, PartialEq)]
pub enum ReminderJobsError {
    #[error("The reminder job table is already running")]
    AlreadyRunning,
}

struct ScheduledJob {
    remind_at: i64,
    generation: u64,
    timer: Option<AbortHandle>,
}

struct Runtime {
    handle: Handle,
    fired: UnboundedSender<ReminderJobKey>,
}

#[derive(Default)]
struct State {
    jobs: HashMap<ReminderJobKey, ScheduledJob>,
    runtime: Option<Runtime>,
    next_generation: u64,
}

/// Table of the pending reminder jobs, keyed by `ReminderJobKey`.
///
/// Jobs can be registered before the table is started, they are armed by
/// `start`. Every armed job owns a timer task that hands the key of the job
/// to the `FiredReminders` receiver when the fire time is reached. Sending
/// the reminder itself is up to the receiver.
#[derive(Clone, Default)]
pub struct ReminderJobTable {
    state: Arc<Mutex<State>>,
}

/// Receives the keys of the reminder jobs whose fire time has been reached.
/// Yields `None` once the table has been stopped.
pub struct FiredReminders {
    receiver: UnboundedReceiver<ReminderJobKey>,
}

impl FiredReminders {
    pub async fn recv(&mut self) -> Option<ReminderJobKey> {
        self.receiver.recv().await
    }
}

impl ReminderJobTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers the job, replacing any job with the same key. Returns `false`
    /// and leaves the table untouched when the fire time is not after `now`.
    pub fn schedule(&self, job: ReminderJob, now: i64) -> bool {
        if job.remind_at <= now {
            debug!("Skipping past due reminder job: {}", job.key);
            return false;
        }

        let mut state = self.lock();
        state.next_generation += 1;
        let generation = state.next_generation;
        if let Some(replaced) = state.jobs.remove(&job.key) {
            if let Some(timer) = replaced.timer {
                timer.abort();
            }
            debug!("Replacing reminder job: {}", job.key);
        }
        let timer = state.runtime.as_ref().map(|runtime| {
            self.arm(&runtime.handle, job.key, generation, job.remind_at - now)
        });
        state.jobs.insert(
            job.key,
            ScheduledJob {
                remind_at: job.remind_at,
                generation,
                timer,
            },
        );
        true
    }

    fn arm(
        &self,
        handle: &Handle,
        key: ReminderJobKey,
        generation: u64,
        delay: i64,
    ) -> AbortHandle {
        let delay = Duration::from_millis(delay.max(0) as u64);
        let state = Arc::clone(&self.state);
        handle
            .spawn(async move {
                tokio::time::sleep(delay).await;
                let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
                let is_current = matches!(
                    state.jobs.get(&key),
                    Some(job) if job.generation == generation
                );
                if !is_current {
                    return;
                }
                state.jobs.remove(&key);
                if let Some(runtime) = &state.runtime {
                    // The receiver is gone only after stop, which clears the runtime
                    let _ = runtime.fired.send(key);
                }
            })
            .abort_handle()
    }

    /// Arms every registered job on the given runtime. Jobs whose fire time
    /// is no longer after `now` are dropped.
    pub fn start(&self, handle: Handle, now: i64) -> Result<FiredReminders, ReminderJobsError> {
        let mut state = self.lock();
        if state.runtime.is_some() {
            return Err(ReminderJobsError::AlreadyRunning);
        }

        let (sender, receiver) = unbounded_channel();
        let before = state.jobs.len();
        state.jobs.retain(|_, job| job.remind_at > now);
        let dropped = before - state.jobs.len();

        let pending = state
            .jobs
            .iter()
            .map(|(key, job)| (*key, job.generation, job.remind_at))
            .collect::<Vec<_>>();
        for (key, generation, remind_at) in pending {
            let timer = self.arm(&handle, key, generation, remind_at - now);
            if let Some(job) = state.jobs.get_mut(&key) {
                job.timer = Some(timer);
            }
        }

        info!(
            "Reminder job table started with {} pending jobs ({} past due dropped)",
            state.jobs.len(),
            dropped
        );
        state.runtime = Some(Runtime {
            handle,
            fired: sender,
        });

        Ok(FiredReminders { receiver })
    }

    /// Cancels every pending job and closes the `FiredReminders` receiver.
    /// Returns the number of cancelled jobs. Stopping a table that is not
    /// running only clears the registered jobs.
    pub fn stop(&self) -> usize {
        let mut state = self.lock();
        state.runtime = None;
        let cancelled = state.jobs.len();
        for (_, job) in state.jobs.drain() {
            if let Some(timer) = job.timer {
                timer.abort();
            }
        }
        info!("Reminder job table stopped, {} pending jobs cancelled", cancelled);
        cancelled
    }

    pub fn is_running(&self) -> bool {
        self.lock().runtime.is_some()
    }

    pub fn find(&self, key: &ReminderJobKey) -> Option<ReminderJob> {
        self.lock().jobs.get(key).map(|job| ReminderJob {
            key: *key,
            remind_at: job.remind_at,
        })
    }

    pub fn jobs_for_event(&self, event_id: &ID) -> Vec<ReminderJob> {
        let mut jobs = self
            .jobs()
            .into_iter()
            .filter(|job| job.key.event_id == *event_id)
            .collect::<Vec<_>>();
        jobs.sort_by_key(|job| job.remind_at);
        jobs
    }

    /// All pending jobs ordered by fire time
    pub fn jobs(&self) -> Vec<ReminderJob> {
        let mut jobs = self
            .lock()
            .jobs
            .iter()
            .map(|(key, job)| ReminderJob {
                key: *key,
                remind_at: job.remind_at,
            })
            .collect::<Vec<_>>();
        jobs.sort_by_key(|job| job.remind_at);
        jobs
    }

    pub fn len(&self) -> usize {
        self.lock().jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
