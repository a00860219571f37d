use actix_web::web::Data;
use actix_web::{HttpResponse, Result};

use crate::tasks::scheduler::{CheckScheduler, RunStatus};

/// POST-only trigger for an immediate status check, spaced to the scheduler's
/// interval. Registered with an explicit method route so other verbs get 405.
pub async fn run_status_checks(scheduler: Data<CheckScheduler>) -> Result<HttpResponse> {
    match scheduler.run_on_demand().await {
        Ok(RunStatus::Completed { next_check }) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "message": "Status checks completed successfully",
            "nextCheck": next_check.to_rfc3339(),
        }))),
        Ok(RunStatus::OnSchedule { next_check }) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "message": "Cron job is running on schedule",
            "nextCheck": next_check.to_rfc3339(),
        }))),
        Err(e) => Ok(HttpResponse::InternalServerError().json(serde_json::json!({
            "message": "Internal server error",
            "error": e.to_string(),
        }))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use actix_web::http::StatusCode;
    use actix_web::{test, web, App};
    use std::time::Duration;

    use crate::services::database::DatabaseService;
    use crate::services::expo::ExpoPushService;
    use crate::services::notify::NotificationService;
    use crate::utils::config::DatabaseConfig;

    async fn test_scheduler() -> CheckScheduler {
        let config = DatabaseConfig {
            url: "mem://".to_string(),
            username: "root".to_string(),
            password: "root".to_string(),
            namespace: "test".to_string(),
            database: "test".to_string(),
        };
        let db = DatabaseService::new(&config).await.unwrap();
        let expo = ExpoPushService::new("http://127.0.0.1:9/push/send".to_string());
        let notifier = NotificationService::new(db.clone(), expo);
        CheckScheduler::new(db, notifier, Duration::from_secs(60))
    }

    #[actix_web::test]
    async fn second_trigger_inside_the_window_reports_next_check() {
        let scheduler = test_scheduler().await;
        let app = test::init_service(
            App::new().app_data(Data::new(scheduler)).service(
                web::scope("/api/v1").service(
                    web::scope("/notify").route("/run", web::post().to(run_status_checks)),
                ),
            ),
        )
        .await;

        let first = test::call_service(
            &app,
            test::TestRequest::post().uri("/api/v1/notify/run").to_request(),
        )
        .await;
        assert_eq!(first.status(), StatusCode::OK);
        let first_body: serde_json::Value = test::read_body_json(first).await;
        assert_eq!(first_body["message"], "Status checks completed successfully");
        assert!(first_body["nextCheck"].is_string());

        let second = test::call_service(
            &app,
            test::TestRequest::post().uri("/api/v1/notify/run").to_request(),
        )
        .await;
        assert_eq!(second.status(), StatusCode::OK);
        let second_body: serde_json::Value = test::read_body_json(second).await;
        assert_eq!(second_body["message"], "Cron job is running on schedule");
        assert!(second_body["nextCheck"].is_string());
    }

    #[actix_web::test]
    async fn non_post_methods_are_rejected() {
        let scheduler = test_scheduler().await;
        let app = test::init_service(
            App::new().app_data(Data::new(scheduler)).service(
                web::scope("/api/v1").service(
                    web::scope("/notify").route("/run", web::post().to(run_status_checks)),
                ),
            ),
        )
        .await;

        let response = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/v1/notify/run").to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
