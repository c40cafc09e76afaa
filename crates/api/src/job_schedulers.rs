use crate::{
    event::{
        delete_past_events::DeletePastEventsUseCase,
        send_event_reminders::SendEventRemindersUseCase,
    },
    shared::usecase::execute,
};
use actix_web::rt::task::JoinHandle;
use actix_web::rt::time::interval;
use huddle_infra::{FiredReminders, HuddleContext};
use std::time::Duration;
use tracing::info;

/// Sends the reminders of the fired jobs, one job at a time. The loop ends
/// when the reminder job table is stopped.
pub fn start_reminder_dispatcher(ctx: HuddleContext, mut fired: FiredReminders) -> JoinHandle<()> {
    actix_web::rt::spawn(async move {
        while let Some(job) = fired.recv().await {
            let usecase = SendEventRemindersUseCase { job };
            let _ = execute(usecase, &ctx).await;
        }
        info!("Reminder dispatcher stopped");
    })
}

pub fn start_past_events_cleanup_job(ctx: HuddleContext, period: Duration) -> JoinHandle<()> {
    actix_web::rt::spawn(async move {
        let mut interval = interval(period);
        loop {
            interval.tick().await;
            let _ = execute(DeletePastEventsUseCase, &ctx).await;
        }
    })
}
