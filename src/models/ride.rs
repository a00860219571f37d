use serde::{Deserialize, Serialize};

/// Completed-ride record. The payment flow stores `payment_status` as a
/// string; the scan matches the literal "true" and nothing else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ride {
    pub ride_id: String,
    pub user_id: String,
    pub driver_clerk_id: Option<String>,
    pub is_completed: bool,
    pub payment_status: String,
    pub is_notification_sent: bool,
    pub fare_price: Option<f64>,
    pub distance: Option<f64>,
    pub origin_address: Option<String>,
    pub destination_address: Option<String>,
}
