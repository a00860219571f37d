use anyhow::Result;
use serde_json::Value;

use crate::models::notification::CreateNotificationDto;
use crate::services::database::DatabaseService;
use crate::services::expo::ExpoPushService;

/// What became of one notification attempt. Transport problems are tagged
/// outcomes so scans keep going; storage problems come back as `Err` and
/// abort the scan that hit them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// Push delivered and notification record stored.
    Sent,
    /// Push failed; notification record stored anyway.
    PushFailed,
    /// No user id, unknown user, or no registered device token.
    Skipped,
}

#[derive(Clone)]
pub struct NotificationService {
    db: DatabaseService,
    expo: ExpoPushService,
}

impl NotificationService {
    pub fn new(db: DatabaseService, expo: ExpoPushService) -> Self {
        Self { db, expo }
    }

    /// Push a message to a user's device and store the matching notification
    /// record. A missing user or token is a silent skip, not an error.
    pub async fn notify_user(
        &self,
        user_id: Option<&str>,
        title: &str,
        body: &str,
        screen: &str,
        data: &Value,
    ) -> Result<NotifyOutcome> {
        let Some(user_id) = user_id else {
            return Ok(NotifyOutcome::Skipped);
        };

        let user = match self.db.get_user_by_clerk_id(user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                log::debug!("No user record for {}, skipping notification", user_id);
                return Ok(NotifyOutcome::Skipped);
            }
            Err(e) => {
                log::debug!("Push token lookup failed for {}: {:#}", user_id, e);
                return Ok(NotifyOutcome::Skipped);
            }
        };

        let Some(token) = user.expo_push_token.filter(|token| !token.is_empty()) else {
            log::debug!("User {} has no push token, skipping notification", user_id);
            return Ok(NotifyOutcome::Skipped);
        };

        let delivered = match self.expo.send_push(&token, title, body, screen, data).await {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Push delivery to {} failed: {:#}", user_id, e);
                false
            }
        };

        // The record is written whether or not the push went through; only a
        // storage failure propagates.
        self.db
            .create_user_notification(CreateNotificationDto {
                user_id: user_id.to_string(),
                title: title.to_string(),
                body: body.to_string(),
                screen: screen.to_string(),
            })
            .await?;

        Ok(if delivered {
            NotifyOutcome::Sent
        } else {
            NotifyOutcome::PushFailed
        })
    }
}
