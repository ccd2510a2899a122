//! Controller task
//!
//! Coordinates the other tasks around firmware updates: suspends the
//! sniffer while an image is streaming into flash (UART servicing and
//! flash writes fight over the bus otherwise), logs progress, and restarts
//! the MCU once an image is staged.

use defmt::*;
use embassy_time::Timer;
use portable_atomic::Ordering;

use thermoscope_core::events::UpdateEvent;

use crate::channels::{SNIFF_ENABLED, UPDATE_EVENTS};

/// Controller task - consumes update events and coordinates the others
#[embassy_executor::task]
pub async fn controller_task() {
    info!("Controller task started");

    loop {
        match UPDATE_EVENTS.receive().await {
            UpdateEvent::Started => {
                info!("Firmware update starting, suspending sniffer");
                SNIFF_ENABLED.store(false, Ordering::Relaxed);
            }
            event @ UpdateEvent::Progress { .. } => {
                if let Some(percent) = event.percent() {
                    info!("Update progress: {}%", percent);
                }
            }
            UpdateEvent::Completed => {
                info!("Update staged, restarting");
                // Give the log transport a moment to drain
                Timer::after_millis(100).await;
                cortex_m::peripheral::SCB::sys_reset();
            }
            UpdateEvent::Failed(e) => {
                error!("Update failed: {}", e.as_str());
                SNIFF_ENABLED.store(true, Ordering::Relaxed);
            }
        }
    }
}
