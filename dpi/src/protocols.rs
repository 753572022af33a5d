pub mod ethernet;
pub mod wlan;
