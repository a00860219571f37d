use anyhow::Result;
use chrono::Local;
use serde_json::json;

use crate::services::database::DatabaseService;
use crate::services::notify::NotificationService;
use crate::utils::timeframe::parse_timeframe;

const DELIVERY_STATUS_SCREEN: &str = "/(root)/delivery-status";
const RIDE_STATUS_SCREEN: &str = "/(root)/ride-status";

/// Scan pending delivery requests for elapsed time windows, notify the
/// requester and any assigned driver, and flip `is_expired` last, so a crash
/// mid-row re-notifies on the next pass rather than losing the expiry.
pub async fn check_delivery_status(
    db: &DatabaseService,
    notifier: &NotificationService,
) -> Result<usize> {
    log::info!("Starting delivery status check");

    let deliveries = db.get_active_delivery_requests().await?;
    log::info!("Found {} active deliveries to check", deliveries.len());

    let now = Local::now();
    let mut expired = 0;

    for delivery in deliveries {
        let Some(time_frame) = delivery.time_frame.as_deref() else {
            log::info!(
                "Skipping delivery {} - no timeframe specified",
                delivery.request_id
            );
            continue;
        };

        let Some(expires_at) = parse_timeframe(time_frame, now) else {
            log::warn!(
                "Skipping delivery {} - unparseable timeframe '{}'",
                delivery.request_id,
                time_frame
            );
            continue;
        };

        if now <= expires_at {
            log::debug!("Delivery {} is still active", delivery.request_id);
            continue;
        }

        log::info!(
            "Delivery {} has expired, sending notifications",
            delivery.request_id
        );

        let data = json!({
            "fare_price": delivery.price.unwrap_or(0.0),
            "distance_traveled": 0,
            "distance": delivery.distance.unwrap_or(0.0),
            "vehicle": delivery.vehicle_type.clone().unwrap_or_default(),
        });

        notifier
            .notify_user(
                Some(delivery.user_id.as_str()),
                "Delivery Time Expired",
                "The timeframe for your delivery request has passed. You can check the details in your deliveries.",
                DELIVERY_STATUS_SCREEN,
                &data,
            )
            .await?;

        if let Some(driver_id) = delivery.driver_clerk_id.as_deref() {
            notifier
                .notify_user(
                    Some(driver_id),
                    "Delivery Time Expired",
                    "The timeframe for the delivery request has passed. You can check the details in your deliveries.",
                    DELIVERY_STATUS_SCREEN,
                    &data,
                )
                .await?;
        }

        db.mark_delivery_expired(&delivery.request_id).await?;
        expired += 1;

        log::info!("Successfully processed expired delivery {}", delivery.request_id);
    }

    log::info!("Delivery status check completed, {} expired", expired);
    Ok(expired)
}

/// Scan completed, paid rides that have not been announced yet, notify the
/// rider and any assigned driver, then flip `is_notification_sent`.
pub async fn check_ride_status(
    db: &DatabaseService,
    notifier: &NotificationService,
) -> Result<usize> {
    log::info!("Starting ride status check");

    let rides = db.get_unnotified_completed_rides().await?;
    log::info!("Found {} completed rides with payment to notify", rides.len());

    let mut notified = 0;

    for ride in rides {
        log::info!("Processing ride {}", ride.ride_id);

        let data = json!({
            "ride_id": ride.ride_id,
            "fare_price": ride.fare_price.unwrap_or(0.0),
            "distance": ride.distance.unwrap_or(0.0),
            "origin": ride.origin_address.clone().unwrap_or_default(),
            "destination": ride.destination_address.clone().unwrap_or_default(),
        });

        notifier
            .notify_user(
                Some(ride.user_id.as_str()),
                "Ride Completed",
                "Your ride has been completed and payment has been processed. Thank you for using our service!",
                RIDE_STATUS_SCREEN,
                &data,
            )
            .await?;

        if let Some(driver_id) = ride.driver_clerk_id.as_deref() {
            notifier
                .notify_user(
                    Some(driver_id),
                    "Ride Completed",
                    "The ride has been completed and payment has been processed. Thank you for your service!",
                    RIDE_STATUS_SCREEN,
                    &data,
                )
                .await?;
        }

        db.mark_ride_notification_sent(&ride.ride_id).await?;
        notified += 1;

        log::info!("Successfully processed completed ride {}", ride.ride_id);
    }

    log::info!("Ride status check completed, {} notified", notified);
    Ok(notified)
}
