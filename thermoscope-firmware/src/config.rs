//! Compile-time device configuration
//!
//! Network credentials and broker settings bake into the binary; override
//! them with `THERMOSCOPE_*` environment variables at build time. This
//! replaces the secrets header the old firmware kept out of version control.

/// WiFi network to join
pub const WIFI_SSID: &str = match option_env!("THERMOSCOPE_WIFI_SSID") {
    Some(ssid) => ssid,
    None => "poolhouse",
};

/// WiFi passphrase (WPA2)
pub const WIFI_PASSWORD: &str = match option_env!("THERMOSCOPE_WIFI_PASSWORD") {
    Some(password) => password,
    None => "changeme",
};

/// MQTT broker IPv4 address
pub const BROKER_ADDR: &str = match option_env!("THERMOSCOPE_BROKER_ADDR") {
    Some(addr) => addr,
    None => "192.168.1.10",
};

/// MQTT broker port
pub const BROKER_PORT: u16 = 1883;

/// Client identifier announced to the broker; the broker account uses the
/// same value for username and password, as the pump bridge always has
pub const CLIENT_ID: &str = "thermoscope_poolheater_bridge";

/// TCP port the firmware-update listener accepts sessions on
pub const UPDATE_PORT: u16 = 4242;
