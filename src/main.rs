mod handlers;
mod models;
mod services;
mod tasks;
mod utils;

use actix_web::web::Data;
use actix_web::{middleware::Logger, web, App, HttpServer};
use actix_cors::Cors;
use dotenv::dotenv;
use std::env;
use std::time::Duration;

use services::database::DatabaseService;
use services::expo::ExpoPushService;
use services::notify::NotificationService;
use tasks::scheduler::CheckScheduler;
use utils::config::AppConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file
    // This must be called early to ensure env vars are available
    dotenv().ok();

    // Initialize logger
    env_logger::init();

    let config = AppConfig::from_env();

    // Initialize services
    let database_service = DatabaseService::new(&config.database)
        .await
        .expect("Failed to initialize database");

    let expo_service = ExpoPushService::new(config.expo.push_url.clone());
    let notification_service =
        NotificationService::new(database_service.clone(), expo_service.clone());

    // The scheduler is constructed once here and started once per process.
    let scheduler = CheckScheduler::new(
        database_service.clone(),
        notification_service.clone(),
        Duration::from_secs(config.check_interval_secs),
    );
    scheduler.start();

    let port = env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let bind_address = format!("0.0.0.0:{}", port);

    println!("🚀 Starting notification server at http://{}", bind_address);
    println!("API Documentation:");
    println!("  POST /api/v1/notify/run - Trigger an immediate status check");
    println!("  GET  /api/v1/notifications/user/{{user_id}} - List a user's notifications");
    println!("  POST /api/v1/notifications/{{notification_id}}/acknowledge - Mark as read");
    println!("  POST /api/v1/notifications/send - Send a push notification directly");
    println!("  GET  /api/v1/health - Health check");

    let server = HttpServer::new({
        let scheduler = scheduler.clone();
        move || {
            App::new()
                .wrap(Logger::default())
                .wrap(
                    Cors::default()
                        .allow_any_origin()
                        .allow_any_method()
                        .allow_any_header(),
                )
                .app_data(Data::new(database_service.clone()))
                .app_data(Data::new(expo_service.clone()))
                .app_data(Data::new(notification_service.clone()))
                .app_data(Data::new(scheduler.clone()))
                .service(
                    web::scope("/api/v1")
                        .service(
                            web::scope("/notify")
                                .route("/run", web::post().to(handlers::cron::run_status_checks)),
                        )
                        .service(
                            web::scope("/notifications")
                                .service(handlers::notification::send_notification)
                                .service(handlers::notification::get_notifications)
                                .service(handlers::notification::mark_notification_read),
                        )
                        .route("/health", web::get().to(handlers::health::health_check)),
                )
        }
    })
    .bind(&bind_address)?
    .run();

    let result = server.await;
    scheduler.stop();
    result
}
