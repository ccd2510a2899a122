//! Broker session task
//!
//! Owns the TCP socket and MQTT session: publishes decoded readings and the
//! retained liveness flag, subscribes to the frame-timeout command topic and
//! keeps the session alive. Any session error tears the socket down and the
//! outer loop reconnects; nothing here can stall the sniffer.

use core::fmt::Write as _;
use core::net::Ipv4Addr;

use defmt::*;
use embassy_futures::select::{select3, Either3};
use embassy_net::tcp::TcpSocket;
use embassy_net::Stack;
use embassy_time::{Duration, Ticker, Timer};
use embedded_io_async::{Read, Write};
use portable_atomic::Ordering;
use rust_mqtt::client::client::MqttClient;
use rust_mqtt::client::client_config::{ClientConfig, MqttVersion};
use rust_mqtt::packet::v5::publish_packet::QualityOfService;
use rust_mqtt::packet::v5::reason_codes::ReasonCode;
use rust_mqtt::utils::rng_generator::CountingRng;

use thermoscope_core::control::parse_frame_timeout;
use thermoscope_protocol::{TelemetryReading, STATUS_ONLINE, TOPIC_FRAME_TIMEOUT, TOPIC_STATUS};

use crate::channels::{FRAME_TIMEOUT_MS, READING};
use crate::config;

/// Delay before a reconnect attempt
const RECONNECT_DELAY_SECS: u64 = 2;

/// Keep-alive ping interval (half the session keep-alive window)
const PING_INTERVAL_SECS: u64 = 30;

/// Packet buffer size, matching the broker-side limit the bridge has
/// always announced
const PACKET_BUF_SIZE: usize = 512;

/// MQTT task - owns the broker session and the control subscription
#[embassy_executor::task]
pub async fn mqtt_task(stack: Stack<'static>) {
    info!("MQTT task started");

    let broker: Ipv4Addr = match config::BROKER_ADDR.parse() {
        Ok(addr) => addr,
        Err(_) => {
            error!("invalid broker address: {}", config::BROKER_ADDR);
            return;
        }
    };

    let mut rx_buffer = [0u8; 1024];
    let mut tx_buffer = [0u8; 1024];
    let mut mqtt_rx = [0u8; PACKET_BUF_SIZE];
    let mut mqtt_tx = [0u8; PACKET_BUF_SIZE];

    loop {
        let mut socket = TcpSocket::new(stack, &mut rx_buffer, &mut tx_buffer);
        if let Err(e) = socket.connect((broker, config::BROKER_PORT)).await {
            warn!("broker TCP connect failed: {:?}", e);
            Timer::after_secs(RECONNECT_DELAY_SECS).await;
            continue;
        }

        let mut mqtt_config = ClientConfig::new(MqttVersion::MQTTv5, CountingRng(20000));
        mqtt_config.add_client_id(config::CLIENT_ID);
        mqtt_config.add_username(config::CLIENT_ID);
        mqtt_config.add_password(config::CLIENT_ID);
        mqtt_config.max_packet_size = PACKET_BUF_SIZE as u32;

        let mut client = MqttClient::<_, 5, _>::new(
            socket,
            &mut mqtt_tx,
            PACKET_BUF_SIZE,
            &mut mqtt_rx,
            PACKET_BUF_SIZE,
            mqtt_config,
        );

        if let Err(code) = client.connect_to_broker().await {
            warn!("broker refused session: {:?}", Debug2Format(&code));
            Timer::after_secs(RECONNECT_DELAY_SECS).await;
            continue;
        }
        info!("Connected to MQTT broker as {}", config::CLIENT_ID);

        // Retained liveness flag, then the one command subscription
        if let Err(code) = client
            .send_message(
                TOPIC_STATUS,
                STATUS_ONLINE.as_bytes(),
                QualityOfService::QoS0,
                true,
            )
            .await
        {
            warn!("status publish failed: {:?}", Debug2Format(&code));
            Timer::after_secs(RECONNECT_DELAY_SECS).await;
            continue;
        }
        if let Err(code) = client.subscribe_to_topic(TOPIC_FRAME_TIMEOUT).await {
            warn!("command subscribe failed: {:?}", Debug2Format(&code));
            Timer::after_secs(RECONNECT_DELAY_SECS).await;
            continue;
        }

        let mut keepalive = Ticker::every(Duration::from_secs(PING_INTERVAL_SECS));

        loop {
            match select3(READING.wait(), client.receive_message(), keepalive.next()).await {
                Either3::First(reading) => {
                    if let Err(code) = publish_reading(&mut client, &reading).await {
                        // Reading is dropped, never queued for retry
                        error!(
                            "publish failed, dropping reading: {:?}",
                            Debug2Format(&code)
                        );
                        break;
                    }
                }
                Either3::Second(Ok((topic, payload))) => {
                    if topic == TOPIC_FRAME_TIMEOUT {
                        let timeout_ms = parse_frame_timeout(payload);
                        info!("new frame timeout: {} ms", timeout_ms);
                        FRAME_TIMEOUT_MS.store(timeout_ms, Ordering::Relaxed);
                    } else {
                        debug!("publish on unexpected topic: {}", topic);
                    }
                }
                Either3::Second(Err(code)) => {
                    warn!("bus session error: {:?}", Debug2Format(&code));
                    break;
                }
                Either3::Third(_) => {
                    if let Err(code) = client.send_ping().await {
                        warn!("keep-alive failed: {:?}", Debug2Format(&code));
                        break;
                    }
                }
            }
        }

        warn!("broker session lost, reconnecting");
        Timer::after_secs(RECONNECT_DELAY_SECS).await;
    }
}

/// Publish the six value topics for one reading, plain-text integers
async fn publish_reading<T: Read + Write>(
    client: &mut MqttClient<'_, T, 5, CountingRng>,
    reading: &TelemetryReading,
) -> Result<(), ReasonCode> {
    for (channel, value) in reading.values() {
        let mut text: heapless::String<4> = heapless::String::new();
        // A u8 always fits in 4 characters
        let _ = write!(text, "{}", value);
        client
            .send_message(
                channel.topic(),
                text.as_bytes(),
                QualityOfService::QoS0,
                false,
            )
            .await?;
    }
    Ok(())
}
