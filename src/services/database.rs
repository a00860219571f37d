use surrealdb::engine::any::{self, Any};
use surrealdb::opt::auth::Root;
use surrealdb::Surreal;
use anyhow::{anyhow, Result};
use chrono::Utc;
use uuid::Uuid;

use crate::models::{
    delivery::DeliveryRequest,
    notification::{CreateNotificationDto, UserNotification},
    ride::Ride,
    user::User,
};
use crate::utils::config::DatabaseConfig;

#[derive(Clone)]
pub struct DatabaseService {
    db: Surreal<Any>,
}

impl DatabaseService {
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let db = any::connect(config.url.as_str()).await?;

        // The embedded engine has no authentication; remote endpoints do.
        if !config.url.starts_with("mem://") {
            db.signin(Root {
                username: &config.username,
                password: &config.password,
            })
            .await?;
        }

        db.use_ns(config.namespace.clone())
            .use_db(config.database.clone())
            .await?;

        let service = Self { db };
        service.initialize_schema().await?;

        Ok(service)
    }

    async fn initialize_schema(&self) -> Result<()> {
        self.db
            .query(
                "
                DEFINE TABLE IF NOT EXISTS users SCHEMALESS;
                DEFINE INDEX IF NOT EXISTS unique_clerk_id ON users COLUMNS clerk_id UNIQUE;

                DEFINE TABLE IF NOT EXISTS delivery_requests SCHEMALESS;
                DEFINE INDEX IF NOT EXISTS unique_request_id ON delivery_requests COLUMNS request_id UNIQUE;

                DEFINE TABLE IF NOT EXISTS rides SCHEMALESS;
                DEFINE INDEX IF NOT EXISTS unique_ride_id ON rides COLUMNS ride_id UNIQUE;

                DEFINE TABLE IF NOT EXISTS user_notifications SCHEMALESS;
            ",
            )
            .await?
            .check()?;

        log::info!("Database schema initialized successfully");
        Ok(())
    }

    // User operations
    pub async fn create_user(&self, user: User) -> Result<User> {
        let created: Option<User> = self.db.create("users").content(user).await?;
        created.ok_or_else(|| anyhow!("User record was not persisted"))
    }

    pub async fn get_user_by_clerk_id(&self, clerk_id: &str) -> Result<Option<User>> {
        let mut response = self
            .db
            .query("SELECT * FROM users WHERE clerk_id = $clerk_id LIMIT 1")
            .bind(("clerk_id", clerk_id.to_string()))
            .await?;

        let user: Option<User> = response.take(0)?;
        Ok(user)
    }

    // Delivery request operations
    pub async fn create_delivery_request(&self, request: DeliveryRequest) -> Result<DeliveryRequest> {
        let created: Option<DeliveryRequest> = self
            .db
            .create("delivery_requests")
            .content(request)
            .await?;
        created.ok_or_else(|| anyhow!("Delivery request was not persisted"))
    }

    /// Rows the expiry scan considers: not yet expired, not yet delivered.
    pub async fn get_active_delivery_requests(&self) -> Result<Vec<DeliveryRequest>> {
        let mut response = self
            .db
            .query("SELECT * FROM delivery_requests WHERE is_expired = false AND is_delivered = false")
            .await?;

        let requests: Vec<DeliveryRequest> = response.take(0)?;
        Ok(requests)
    }

    pub async fn mark_delivery_expired(&self, request_id: &str) -> Result<()> {
        self.db
            .query("UPDATE delivery_requests SET is_expired = true WHERE request_id = $request_id")
            .bind(("request_id", request_id.to_string()))
            .await?
            .check()?;

        Ok(())
    }

    // Ride operations
    pub async fn create_ride(&self, ride: Ride) -> Result<Ride> {
        let created: Option<Ride> = self.db.create("rides").content(ride).await?;
        created.ok_or_else(|| anyhow!("Ride record was not persisted"))
    }

    /// Rows the completion scan considers. `payment_status` is stored as a
    /// string by the payment flow and matched against the literal 'true'.
    pub async fn get_unnotified_completed_rides(&self) -> Result<Vec<Ride>> {
        let mut response = self
            .db
            .query(
                "SELECT * FROM rides \
                 WHERE is_completed = true AND payment_status = 'true' AND is_notification_sent = false",
            )
            .await?;

        let rides: Vec<Ride> = response.take(0)?;
        Ok(rides)
    }

    pub async fn mark_ride_notification_sent(&self, ride_id: &str) -> Result<()> {
        self.db
            .query("UPDATE rides SET is_notification_sent = true WHERE ride_id = $ride_id")
            .bind(("ride_id", ride_id.to_string()))
            .await?
            .check()?;

        Ok(())
    }

    // Notification record operations
    pub async fn create_user_notification(&self, dto: CreateNotificationDto) -> Result<UserNotification> {
        let notification = UserNotification {
            notification_id: Uuid::new_v4().to_string(),
            user_id: dto.user_id,
            title: dto.title,
            body: dto.body,
            is_read: false,
            screen: dto.screen,
            created_at: Utc::now(),
        };

        let created: Option<UserNotification> = self
            .db
            .create("user_notifications")
            .content(notification)
            .await?;
        created.ok_or_else(|| anyhow!("Notification record was not persisted"))
    }

    pub async fn get_notifications_for_user(&self, user_id: &str) -> Result<Vec<UserNotification>> {
        let mut response = self
            .db
            .query(
                "SELECT * FROM user_notifications WHERE user_id = $user_id ORDER BY created_at DESC",
            )
            .bind(("user_id", user_id.to_string()))
            .await?;

        let notifications: Vec<UserNotification> = response.take(0)?;
        Ok(notifications)
    }

    pub async fn mark_notification_read(&self, notification_id: &str) -> Result<Option<UserNotification>> {
        let mut response = self
            .db
            .query("UPDATE user_notifications SET is_read = true WHERE notification_id = $notification_id")
            .bind(("notification_id", notification_id.to_string()))
            .await?;

        let updated: Vec<UserNotification> = response.take(0)?;
        Ok(updated.into_iter().next())
    }
}
