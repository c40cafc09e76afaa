mod error;
mod event;
mod job_schedulers;
mod rsvp;
mod shared;
mod status;
mod telegram;

use actix_web::{dev::Server, rt::task::JoinHandle, web, App, HttpServer};
use error::HuddleError;
use event::sync_event_reminders::{SyncEventRemindersTrigger, SyncEventRemindersUseCase};
use huddle_infra::HuddleContext;
use job_schedulers::{start_past_events_cleanup_job, start_reminder_dispatcher};
use shared::usecase::execute;
use std::net::TcpListener;
use tracing::{error, info, warn};
use tracing_actix_web::TracingLogger;

pub fn configure_server_api(cfg: &mut web::ServiceConfig) {
    status::configure_routes(cfg);
    telegram::configure_routes(cfg);
}

pub struct Application {
    server: Server,
    port: u16,
    context: HuddleContext,
    dispatcher: JoinHandle<()>,
    cleanup_job: Option<JoinHandle<()>>,
}

impl Application {
    pub async fn new(context: HuddleContext) -> Result<Self, std::io::Error> {
        let (server, port) = Application::configure_server(context.clone()).await?;
        let (dispatcher, cleanup_job) = Application::start_job_schedulers(context.clone()).await?;

        Ok(Self {
            server,
            port,
            context,
            dispatcher,
            cleanup_job,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Starts the reminder job table, registers the reminders of every
    /// upcoming event and spawns the background jobs
    async fn start_job_schedulers(
        context: HuddleContext,
    ) -> Result<(JoinHandle<()>, Option<JoinHandle<()>>), std::io::Error> {
        let now = context.sys.get_timestamp_millis();
        let fired = context
            .reminder_jobs
            .start(tokio::runtime::Handle::current(), now)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

        let reconcile = SyncEventRemindersUseCase {
            request: SyncEventRemindersTrigger::Startup,
        };
        if execute(reconcile, &context).await.is_err() {
            error!("Unable to schedule the reminders of the upcoming events");
        }

        let cleanup_job = context
            .config
            .cleanup_interval
            .map(|period| start_past_events_cleanup_job(context.clone(), period));
        let dispatcher = start_reminder_dispatcher(context, fired);

        Ok((dispatcher, cleanup_job))
    }

    async fn configure_server(context: HuddleContext) -> Result<(Server, u16), std::io::Error> {
        let port = context.config.port;
        let address = format!("0.0.0.0:{}", port);
        let listener = TcpListener::bind(&address)?;
        let port = listener.local_addr()?.port();

        let server = HttpServer::new(move || {
            let ctx = context.clone();

            App::new()
                .wrap(TracingLogger::default())
                .app_data(web::Data::new(ctx))
                .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                    HuddleError::BadClientData(err.to_string()).into()
                }))
                .service(web::scope("/api/v1").configure(configure_server_api))
        })
        .listen(listener)?
        .workers(4)
        .run();

        Ok((server, port))
    }

    /// Serves requests until the server is stopped, then shuts down the
    /// background jobs
    pub async fn start(self) -> Result<(), std::io::Error> {
        let Self {
            server,
            context,
            dispatcher,
            cleanup_job,
            ..
        } = self;
        let res = server.await;
        shutdown(&context, dispatcher, cleanup_job).await;
        res
    }
}

/// Cancels the pending reminders and waits for the reminder that is being
/// sent, for at most the configured grace period
async fn shutdown(
    context: &HuddleContext,
    dispatcher: JoinHandle<()>,
    cleanup_job: Option<JoinHandle<()>>,
) {
    if let Some(cleanup_job) = cleanup_job {
        cleanup_job.abort();
    }
    let cancelled = context.reminder_jobs.stop();
    info!("Shutting down, {} pending reminders cancelled", cancelled);

    let grace_period = context.config.shutdown_grace_period;
    let abort_handle = dispatcher.abort_handle();
    if actix_web::rt::time::timeout(grace_period, dispatcher)
        .await
        .is_err()
    {
        warn!(
            "Reminder dispatcher did not finish within {:?}, aborting it",
            grace_period
        );
        abort_handle.abort();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use futures::future::pending;
    use std::time::{Duration, Instant};

    #[actix_web::main]
    #[test]
    async fn shutdown_is_bounded_by_grace_period() {
        let mut context = HuddleContext::create_inmemory();
        context.config.shutdown_grace_period = Duration::from_millis(100);
        let _fired = context
            .reminder_jobs
            .start(tokio::runtime::Handle::current(), 0)
            .unwrap();
        // A dispatcher that is stuck sending a reminder
        let dispatcher = actix_web::rt::spawn(pending::<()>());

        let started = Instant::now();
        shutdown(&context, dispatcher, None).await;

        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(!context.reminder_jobs.is_running());
    }
}
