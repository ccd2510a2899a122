//! Thermoscope - Pool Heater Telemetry Sniffer
//!
//! Firmware binary for the Raspberry Pi Pico W. Listens passively on the
//! heat-pump controller's service bus, decodes the telemetry frames it
//! overhears and republishes the sensor values over MQTT.
//!
//! From the Greek "thermoscope" - an instrument that observes heat
//! without acting on it.

#![no_std]
#![no_main]

use cyw43::JoinOptions;
use cyw43_pio::{PioSpi, DEFAULT_CLOCK_DIVIDER};
use defmt::*;
use embassy_executor::Spawner;
use embassy_net::StackResources;
use embassy_rp::bind_interrupts;
use embassy_rp::clocks::RoscRng;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::{DMA_CH0, PIO0, UART1};
use embassy_rp::pio::{InterruptHandler as PioInterruptHandler, Pio};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::Timer;
use rand_core::RngCore;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use thermoscope_core::config::{DataBits, LinkConfig, Parity, StopBits};

mod channels;
mod config;
mod tasks;

bind_interrupts!(struct Irqs {
    PIO0_IRQ_0 => PioInterruptHandler<PIO0>;
    UART1_IRQ => BufferedInterruptHandler<UART1>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

// Static cells for the radio and network stack
static CYW43_STATE: StaticCell<cyw43::State> = StaticCell::new();
static NET_RESOURCES: StaticCell<StackResources<8>> = StaticCell::new();

#[embassy_executor::task]
async fn cyw43_task(
    runner: cyw43::Runner<'static, Output<'static>, PioSpi<'static, PIO0, 0, DMA_CH0>>,
) -> ! {
    runner.run().await
}

#[embassy_executor::task]
async fn net_task(mut runner: embassy_net::Runner<'static, cyw43::NetDriver<'static>>) -> ! {
    runner.run().await
}

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Thermoscope firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // CYW43439 radio. The chip firmware is flashed separately, once:
    //   probe-rs download 43439A0.bin --binary-format bin --chip RP2040 --base-address 0x10100000
    //   probe-rs download 43439A0_clm.bin --binary-format bin --chip RP2040 --base-address 0x10140000
    #[allow(unsafe_code)]
    let (fw, clm) = unsafe {
        (
            core::slice::from_raw_parts(0x1010_0000 as *const u8, 230321),
            core::slice::from_raw_parts(0x1014_0000 as *const u8, 4752),
        )
    };

    let pwr = Output::new(p.PIN_23, Level::Low);
    let cs = Output::new(p.PIN_25, Level::High);
    let mut pio = Pio::new(p.PIO0, Irqs);
    let spi = PioSpi::new(
        &mut pio.common,
        pio.sm0,
        DEFAULT_CLOCK_DIVIDER,
        pio.irq0,
        cs,
        p.PIN_24,
        p.PIN_29,
        p.DMA_CH0,
    );

    let state = CYW43_STATE.init(cyw43::State::new());
    let (net_device, mut control, runner) = cyw43::new(state, pwr, spi, fw).await;
    spawner.spawn(cyw43_task(runner)).unwrap();

    control.init(clm).await;
    control
        .set_power_management(cyw43::PowerManagementMode::PowerSave)
        .await;
    info!("Radio initialized");

    // DHCP network stack
    let seed = RoscRng.next_u64();
    let net_config = embassy_net::Config::dhcpv4(Default::default());
    let (stack, runner) = embassy_net::new(
        net_device,
        net_config,
        NET_RESOURCES.init(StackResources::new()),
        seed,
    );
    spawner.spawn(net_task(runner)).unwrap();

    join_wifi(&mut control).await;

    info!("Waiting for DHCP...");
    stack.wait_config_up().await;
    if let Some(net) = stack.config_v4() {
        info!("IP address: {}", net.address);
    }

    // Pump bus UART: parameters are fixed by the pump controller.
    // The RTS line is a plain GPIO held low so the transceiver stays in
    // receive for the whole session (half-duplex bus, we only listen).
    let link = LinkConfig::default();
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = link.baudrate;
    uart_config.data_bits = match link.data_bits {
        DataBits::Seven => embassy_rp::uart::DataBits::DataBits7,
        DataBits::Eight => embassy_rp::uart::DataBits::DataBits8,
    };
    uart_config.parity = match link.parity {
        Parity::None => embassy_rp::uart::Parity::ParityNone,
        Parity::Even => embassy_rp::uart::Parity::ParityEven,
        Parity::Odd => embassy_rp::uart::Parity::ParityOdd,
    };
    uart_config.stop_bits = match link.stop_bits {
        StopBits::One => embassy_rp::uart::StopBits::STOP1,
        StopBits::Two => embassy_rp::uart::StopBits::STOP2,
    };

    let _rts = link
        .rts_low_while_listening
        .then(|| Output::new(p.PIN_2, Level::Low));

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART1, p.PIN_8, p.PIN_9, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    // Receive-only bus: the TX half is never driven
    let (_tx, rx) = uart.split();

    info!("UART initialized, listening on the pump bus");

    // Spawn tasks
    spawner.spawn(tasks::sniff_task(rx)).unwrap();
    spawner.spawn(tasks::mqtt_task(stack)).unwrap();
    spawner
        .spawn(tasks::update_task(stack, p.FLASH, p.DMA_CH1))
        .unwrap();
    spawner.spawn(tasks::controller_task()).unwrap();

    info!("All tasks spawned, sniffer running");

    // Main task watches the WiFi link. The old firmware rebooted the chip
    // on link loss; rejoining keeps a staged update session alive.
    loop {
        Timer::after_secs(5).await;
        if !stack.is_link_up() {
            warn!("WiFi link lost, rejoining");
            join_wifi(&mut control).await;
        }
    }
}

/// Join the configured WiFi network, retrying until it succeeds
async fn join_wifi(control: &mut cyw43::Control<'static>) {
    loop {
        match control
            .join(
                config::WIFI_SSID,
                JoinOptions::new(config::WIFI_PASSWORD.as_bytes()),
            )
            .await
        {
            Ok(()) => {
                info!("Joined WiFi network {}", config::WIFI_SSID);
                break;
            }
            Err(e) => {
                warn!("WiFi join failed with status {}", e.status);
                Timer::after_secs(1).await;
            }
        }
    }
}
