//! Embassy async tasks
//!
//! One task per periodic duty of the old single control loop: sniffing the
//! pump bus, the broker session, the firmware-update listener and the
//! coordinator. The single-threaded executor interleaves them so none
//! starves.

pub mod controller;
pub mod mqtt;
pub mod sniff;
pub mod update;

pub use controller::controller_task;
pub use mqtt::mqtt_task;
pub use sniff::sniff_task;
pub use update::update_task;
