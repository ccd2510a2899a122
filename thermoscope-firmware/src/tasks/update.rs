//! Firmware-update listener task
//!
//! Accepts one TCP session at a time, streams a length-prefixed image into
//! the staging flash partition and reports progress as events. Swapping the
//! staged image into the boot slot is the bootloader's job; this task only
//! gets the bytes safely into flash and asks for a restart.

use defmt::*;
use embassy_net::tcp::TcpSocket;
use embassy_net::Stack;
use embassy_rp::flash::{Async, Flash, ERASE_SIZE};
use embassy_rp::peripherals::{DMA_CH1, FLASH};
use embassy_time::Duration;

use thermoscope_core::events::{UpdateError, UpdateEvent};

use crate::channels::UPDATE_EVENTS;
use crate::config::UPDATE_PORT;

/// Total flash size (Pico W)
pub const FLASH_SIZE: usize = 2 * 1024 * 1024;

/// Staging partition for received images: the upper half of flash
pub const STAGING_START: u32 = (FLASH_SIZE / 2) as u32;
pub const STAGING_SIZE: u32 = (FLASH_SIZE / 2) as u32;

/// Flash program page size
const PAGE_SIZE: usize = 256;

/// Idle timeout on an update session
const SESSION_TIMEOUT_SECS: u64 = 30;

/// Update task - listens for firmware images and stages them in flash
#[embassy_executor::task]
pub async fn update_task(stack: Stack<'static>, flash: FLASH, dma: DMA_CH1) {
    info!("Update listener started on port {}", UPDATE_PORT);

    let mut flash = Flash::<_, Async, FLASH_SIZE>::new(flash, dma);
    let mut rx_buffer = [0u8; 2048];
    let mut tx_buffer = [0u8; 256];

    loop {
        let mut socket = TcpSocket::new(stack, &mut rx_buffer, &mut tx_buffer);
        socket.set_timeout(Some(Duration::from_secs(SESSION_TIMEOUT_SECS)));

        if let Err(e) = socket.accept(UPDATE_PORT).await {
            warn!("update accept failed: {:?}", e);
            continue;
        }
        info!("Update session opened");
        UPDATE_EVENTS.send(UpdateEvent::Started).await;

        match receive_image(&mut socket, &mut flash).await {
            Ok(total) => {
                info!("Update image staged: {} bytes", total);
                UPDATE_EVENTS.send(UpdateEvent::Completed).await;
            }
            Err(e) => {
                warn!("Update session aborted: {}", e.as_str());
                UPDATE_EVENTS.send(UpdateEvent::Failed(e)).await;
            }
        }

        socket.close();
    }
}

/// Receive one length-prefixed image into the staging partition
async fn receive_image(
    socket: &mut TcpSocket<'_>,
    flash: &mut Flash<'_, FLASH, Async, FLASH_SIZE>,
) -> Result<u32, UpdateError> {
    // 4-byte big-endian image length header
    let mut header = [0u8; 4];
    read_exact(socket, &mut header)
        .await
        .map_err(|_| UpdateError::Connect)?;
    let total = u32::from_be_bytes(header);
    if total == 0 || total > STAGING_SIZE {
        return Err(UpdateError::Begin);
    }

    // Erase whole sectors covering the image
    let sectors = total.div_ceil(ERASE_SIZE as u32);
    flash
        .erase(STAGING_START, STAGING_START + sectors * ERASE_SIZE as u32)
        .await
        .map_err(|_| UpdateError::Begin)?;

    let mut page = [0xFFu8; PAGE_SIZE];
    let mut page_len = 0usize;
    let mut offset = STAGING_START;
    let mut received = 0u32;
    let mut last_percent = 0;
    let mut chunk = [0u8; 512];

    while received < total {
        let n = socket
            .read(&mut chunk)
            .await
            .map_err(|_| UpdateError::Receive)?;
        if n == 0 {
            // Peer hung up before sending the announced length
            return Err(UpdateError::End);
        }

        // Ignore anything past the announced image length
        let take = (n as u32).min(total - received) as usize;
        let mut data = &chunk[..take];
        received += take as u32;

        while !data.is_empty() {
            let fill = (PAGE_SIZE - page_len).min(data.len());
            page[page_len..page_len + fill].copy_from_slice(&data[..fill]);
            page_len += fill;
            data = &data[fill..];

            if page_len == PAGE_SIZE {
                flash
                    .write(offset, &page)
                    .await
                    .map_err(|_| UpdateError::Receive)?;
                offset += PAGE_SIZE as u32;
                page_len = 0;
                page = [0xFF; PAGE_SIZE];
            }
        }

        let event = UpdateEvent::Progress { received, total };
        if let Some(percent) = event.percent() {
            if percent != last_percent {
                last_percent = percent;
                UPDATE_EVENTS.send(event).await;
            }
        }
    }

    // Flush the final partial page, padded with erased-flash bytes
    if page_len > 0 {
        flash
            .write(offset, &page)
            .await
            .map_err(|_| UpdateError::End)?;
    }

    Ok(total)
}

/// Read exactly `buf.len()` bytes or fail
async fn read_exact(socket: &mut TcpSocket<'_>, buf: &mut [u8]) -> Result<(), ()> {
    let mut pos = 0;
    while pos < buf.len() {
        match socket.read(&mut buf[pos..]).await {
            Ok(0) => return Err(()),
            Ok(n) => pos += n,
            Err(_) => return Err(()),
        }
    }
    Ok(())
}
