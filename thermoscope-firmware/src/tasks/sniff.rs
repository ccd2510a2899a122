//! Pump bus sniffing task
//!
//! Drains read bursts from the pump UART, classifies them against the
//! telemetry length window and signals decoded readings to the publisher.
//!
//! The protocol has no delimiters; a burst ends when the line stays quiet
//! for the read timeout. After a non-empty burst the task sleeps the
//! quiescence interval, which is tuned to the pump's frame cadence at
//! 9600 baud - shortening it splits frames, lengthening it merges them.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embassy_time::{with_timeout, Duration, Timer};
use embedded_io_async::Read;
use portable_atomic::Ordering;

use thermoscope_core::accumulator::FrameAccumulator;
use thermoscope_core::config::SnifferConfig;
use thermoscope_protocol::{classify, hex_dump, FrameClass, TelemetryReading};

use crate::channels::{FRAME_TIMEOUT_MS, READING, SNIFF_ENABLED};

/// Read chunk size per UART wait
const CHUNK_SIZE: usize = 64;

/// Sniff task - accumulates, decodes and forwards pump telemetry
#[embassy_executor::task]
pub async fn sniff_task(mut rx: BufferedUartRx) {
    info!("Sniff task started");

    let config = SnifferConfig::default();
    let mut accumulator = FrameAccumulator::new();
    let mut chunk = [0u8; CHUNK_SIZE];

    loop {
        if !SNIFF_ENABLED.load(Ordering::Relaxed) {
            // Firmware update in progress - leave the line alone
            Timer::after_millis(config.quiescence_ms as u64).await;
            continue;
        }

        // Drain one burst: back-to-back reads, no delay in between.
        // The timeout is re-read every wait so control-channel updates
        // take effect immediately.
        accumulator.clear();
        loop {
            let timeout =
                Duration::from_millis(FRAME_TIMEOUT_MS.load(Ordering::Relaxed) as u64);
            match with_timeout(timeout, rx.read(&mut chunk)).await {
                Ok(Ok(n)) if n > 0 => {
                    let accepted = accumulator.extend(&chunk[..n]);
                    if accepted < n {
                        warn!("burst overflow, dropped {} bytes", n - accepted);
                    }
                    if accumulator.is_full() {
                        break;
                    }
                }
                Ok(Ok(_)) => break, // 0 bytes: gap in the burst
                Ok(Err(e)) => {
                    warn!("UART read error: {:?}", e);
                    break;
                }
                Err(_) => break, // timeout: the burst is over
            }
        }

        let frame = accumulator.frame();
        if frame.is_empty() {
            // Quiet line; the read timeout already paced the loop
            continue;
        }

        trace!("burst: {} bytes", frame.len());
        trace!("{}", hex_dump(frame).as_str());

        match classify(frame) {
            FrameClass::NotTelemetry => {
                debug!("dropping {}-byte burst outside telemetry window", frame.len());
            }
            FrameClass::Telemetry => match TelemetryReading::decode(frame) {
                Ok(reading) => {
                    info!(
                        "telemetry: water_in={} water_out={} coil={} gas={} air={} active={}",
                        reading.water_in_temp,
                        reading.water_out_temp,
                        reading.coil_temp,
                        reading.gas_exhaust_temp,
                        reading.air_ambient_temp,
                        reading.active
                    );
                    READING.signal(reading);
                }
                // classify() accepted this frame; decode refusing it means
                // the window contract broke somewhere
                Err(e) => error!("decode rejected classified frame: {:?}", e),
            },
        }

        // Inter-frame quiescence, synchronized to frame size and rx speed
        Timer::after_millis(config.quiescence_ms as u64).await;
    }
}
