use actix_web::web::{Data, Json, Path};
use actix_web::{get, post, HttpResponse, Result};
use serde::Deserialize;
use serde_json::Value;

use crate::services::database::DatabaseService;
use crate::services::expo::ExpoPushService;

#[derive(Debug, Deserialize)]
pub struct SendNotificationRequest {
    pub expo_push_token: Option<String>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub screen: Option<String>,
    pub data: Option<Value>,
}

#[get("/user/{user_id}")]
pub async fn get_notifications(
    db: Data<DatabaseService>,
    path: Path<String>,
) -> Result<HttpResponse> {
    let user_id = path.into_inner();

    match db.get_notifications_for_user(&user_id).await {
        Ok(notifications) => Ok(HttpResponse::Ok().json(notifications)),
        Err(e) => Ok(HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Error fetching notifications: {}", e)
        }))),
    }
}

#[post("/{notification_id}/acknowledge")]
pub async fn mark_notification_read(
    db: Data<DatabaseService>,
    path: Path<String>,
) -> Result<HttpResponse> {
    let notification_id = path.into_inner();

    match db.mark_notification_read(&notification_id).await {
        Ok(Some(_)) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "message": "Notification marked as read"
        }))),
        Ok(None) => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "error": "Notification not found"
        }))),
        Err(e) => Ok(HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Error updating notification: {}", e)
        }))),
    }
}

/// Direct push dispatch for callers that already hold a device token. Does
/// not write a notification record.
#[post("/send")]
pub async fn send_notification(
    expo: Data<ExpoPushService>,
    payload: Json<SendNotificationRequest>,
) -> Result<HttpResponse> {
    let payload = payload.into_inner();

    let Some(token) = payload.expo_push_token.filter(|token| !token.is_empty()) else {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "error": "expo_push_token is required"
        })));
    };

    let data = payload.data.unwrap_or(Value::Null);
    let sent = expo
        .send_push(
            &token,
            payload.title.as_deref().unwrap_or_default(),
            payload.body.as_deref().unwrap_or_default(),
            payload.screen.as_deref().unwrap_or_default(),
            &data,
        )
        .await;

    match sent {
        Ok(()) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "message": "Notification dispatched"
        }))),
        Err(e) => Ok(HttpResponse::BadGateway().json(serde_json::json!({
            "error": format!("Failed to send notification: {}", e)
        }))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use actix_web::http::StatusCode;
    use actix_web::{test, web, App};

    use crate::models::notification::CreateNotificationDto;
    use crate::utils::config::DatabaseConfig;

    async fn test_db() -> DatabaseService {
        let config = DatabaseConfig {
            url: "mem://".to_string(),
            username: "root".to_string(),
            password: "root".to_string(),
            namespace: "test".to_string(),
            database: "test".to_string(),
        };
        DatabaseService::new(&config).await.unwrap()
    }

    fn record(user_id: &str, title: &str) -> CreateNotificationDto {
        CreateNotificationDto {
            user_id: user_id.to_string(),
            title: title.to_string(),
            body: "body".to_string(),
            screen: "/(root)/ride-status".to_string(),
        }
    }

    #[actix_web::test]
    async fn lists_only_the_requested_users_notifications() {
        let db = test_db().await;
        db.create_user_notification(record("user_1", "First")).await.unwrap();
        db.create_user_notification(record("user_1", "Second")).await.unwrap();
        db.create_user_notification(record("user_2", "Other")).await.unwrap();

        let app = test::init_service(
            App::new()
                .app_data(Data::new(db))
                .service(web::scope("/notifications").service(get_notifications)),
        )
        .await;

        let response = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/notifications/user/user_1")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body.as_array().unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn acknowledging_flips_is_read_and_unknown_ids_get_404() {
        let db = test_db().await;
        let created = db.create_user_notification(record("user_1", "First")).await.unwrap();
        assert!(!created.is_read);

        let app = test::init_service(
            App::new().app_data(Data::new(db.clone())).service(
                web::scope("/notifications")
                    .service(get_notifications)
                    .service(mark_notification_read),
            ),
        )
        .await;

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/notifications/{}/acknowledge", created.notification_id))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let records = db.get_notifications_for_user("user_1").await.unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].is_read);

        let missing = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/notifications/no-such-id/acknowledge")
                .to_request(),
        )
        .await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn direct_send_without_a_token_is_rejected() {
        let expo = ExpoPushService::new("http://127.0.0.1:9/push/send".to_string());

        let app = test::init_service(
            App::new()
                .app_data(Data::new(expo))
                .service(web::scope("/notifications").service(send_notification)),
        )
        .await;

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/notifications/send")
                .set_json(serde_json::json!({ "title": "Hello" }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
