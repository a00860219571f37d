use serde::{Deserialize, Serialize};

/// A delivery request as the poller sees it. `is_expired` is flipped exactly
/// once, by the expiry scan; rows with `is_delivered = true` are never touched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryRequest {
    pub request_id: String,
    pub user_id: String,
    pub driver_clerk_id: Option<String>,
    pub time_frame: Option<String>,
    pub is_expired: bool,
    pub is_delivered: bool,
    pub price: Option<f64>,
    pub distance: Option<f64>,
    pub vehicle_type: Option<String>,
}
