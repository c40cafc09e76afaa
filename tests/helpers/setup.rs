use huddle_api::Application;
use huddle_infra::{HuddleContext, InMemoryChatClient};
use std::sync::Arc;

pub const ADMIN_ID: i64 = 1;

pub struct TestApp {
    pub address: String,
    /// Shares the stores and the reminder job table with the running application
    pub ctx: HuddleContext,
    pub chat: Arc<InMemoryChatClient>,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn post_update(&self, update: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(&format!("{}/api/v1/telegram/webhook", self.address))
            .header(
                huddle_api_structs::WEBHOOK_SECRET_HEADER,
                &self.ctx.config.webhook_secret,
            )
            .json(update)
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

// Launch the application as a background task
pub async fn spawn_app() -> TestApp {
    let chat = Arc::new(InMemoryChatClient::new());
    let mut ctx = HuddleContext::create_inmemory_with_chat(chat.clone());
    ctx.config.port = 0; // Random port
    ctx.config.admin_ids.insert(ADMIN_ID);

    let application = Application::new(ctx.clone())
        .await
        .expect("Failed to build application.");

    let address = format!("http://localhost:{}", application.port());
    let _ = actix_web::rt::spawn(async move {
        application
            .start()
            .await
            .expect("Expected application to start");
    });

    TestApp {
        address,
        ctx,
        chat,
        client: reqwest::Client::new(),
    }
}
