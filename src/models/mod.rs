pub mod delivery;
pub mod notification;
pub mod ride;
pub mod user;
