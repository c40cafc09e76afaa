mod helpers;

use helpers::setup::{spawn_app, ADMIN_ID};
use huddle_api_structs::get_service_health;
use huddle_domain::{NewEvent, RsvpStatus};
use huddle_infra::SentMessage;
use serde_json::{json, Value};

fn private_message(update_id: i64, user_id: i64, text: &str) -> Value {
    json!({
        "update_id": update_id,
        "message": {
            "message_id": update_id,
            "date": 1790000000,
            "chat": { "id": user_id, "type": "private" },
            "from": { "id": user_id, "is_bot": false, "first_name": "Grace" },
            "text": text
        }
    })
}

#[actix_web::main]
#[test]
async fn test_status_ok() {
    let app = spawn_app().await;
    let res = app
        .client
        .get(&format!("{}/api/v1/", app.address))
        .send()
        .await
        .unwrap();

    assert!(res.status().is_success());
    let body = res.json::<get_service_health::APIResponse>().await.unwrap();
    assert!(body.message.starts_with("Yo!"));
    assert!(!body.version.is_empty());
}

#[actix_web::main]
#[test]
async fn test_webhook_requires_secret_token() {
    let app = spawn_app().await;
    let update = private_message(1, ADMIN_ID, "/event");

    let res = app
        .client
        .post(&format!("{}/api/v1/telegram/webhook", app.address))
        .json(&update)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 401);

    let res = app
        .client
        .post(&format!("{}/api/v1/telegram/webhook", app.address))
        .header(huddle_api_structs::WEBHOOK_SECRET_HEADER, "wrong")
        .json(&update)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 401);
    assert!(app.chat.sent().is_empty());
}

#[actix_web::main]
#[test]
async fn test_malformed_update_is_rejected() {
    let app = spawn_app().await;
    let res = app.post_update(&json!({ "message": "nope" })).await;
    assert_eq!(res.status().as_u16(), 400);
}

#[actix_web::main]
#[test]
async fn test_unknown_updates_are_acknowledged() {
    let app = spawn_app().await;
    let res = app.post_update(&json!({ "update_id": 3 })).await;

    assert!(res.status().is_success());
    let body = res.json::<Value>().await.unwrap();
    assert_eq!(body["handled"], json!(false));
}

#[actix_web::main]
#[test]
async fn test_organizer_publishes_event() {
    let app = spawn_app().await;
    let texts = [
        "/event",
        "Board games",
        "15.12 18:00",
        "Main street 1",
        "Bring your favourite game",
    ];
    for (i, text) in texts.iter().enumerate() {
        let res = app
            .post_update(&private_message(i as i64, ADMIN_ID, text))
            .await;
        assert!(res.status().is_success());
    }

    let now = app.ctx.sys.get_timestamp_millis();
    let events = app.ctx.repos.events.find_upcoming(now).await.unwrap();
    assert_eq!(events.len(), 1);
    let event = &events[0];
    assert_eq!(event.title, "Board games");
    assert_eq!(
        event.announcement.map(|a| a.chat_id),
        Some(app.ctx.config.community_chat_id)
    );

    let announcements = app
        .chat
        .sent()
        .into_iter()
        .filter(|message| matches!(message, SentMessage::Announcement { .. }))
        .count();
    assert_eq!(announcements, 1);
    // Depending on the day the suite runs the 24h reminder may already be due
    let hour = 60 * 60 * 1000;
    let expected_jobs = [24, 3]
        .iter()
        .filter(|hours| event.start_ts - *hours * hour > now)
        .count();
    assert_eq!(
        app.ctx.reminder_jobs.jobs_for_event(&event.id).len(),
        expected_jobs
    );
}

#[actix_web::main]
#[test]
async fn test_member_responds_to_event() {
    let app = spawn_app().await;
    let now = app.ctx.sys.get_timestamp_millis();
    let new_event = NewEvent {
        title: "Picnic".into(),
        start_ts: now + 48 * 60 * 60 * 1000,
        end_ts: None,
        address: "Park".into(),
        description: "".into(),
    };
    let event = app.ctx.repos.events.insert(&new_event, now).await.unwrap();

    for (update_id, status) in [(1, "going"), (2, "maybe")] {
        let update = json!({
            "update_id": update_id,
            "callback_query": {
                "id": format!("cb-{}", update_id),
                "chat_instance": "1",
                "from": { "id": 42, "is_bot": false, "first_name": "Ada", "username": "ada" },
                "data": format!("event:{}:{}", event.id, status)
            }
        });
        let res = app.post_update(&update).await;
        assert!(res.status().is_success());
        let body = res.json::<Value>().await.unwrap();
        assert_eq!(body["handled"], json!(true));
    }

    let participants = app.ctx.repos.participants.find_by_event(&event.id).await.unwrap();
    assert_eq!(participants.len(), 1);
    assert_eq!(participants[0].status, RsvpStatus::Maybe);
    assert_eq!(participants[0].display_name(), "@ada");
    assert_eq!(app.chat.texts_to(42).len(), 2);
}
