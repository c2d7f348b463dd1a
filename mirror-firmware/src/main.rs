//! Mirror - Smart Mirror Endpoint Firmware
//!
//! Main firmware binary for an RP2040 wall display. A phone or desktop
//! host pushes the day's events over an HM-10 BLE serial module; the
//! panel shows the time, the date and the next event.

#![no_std]
#![no_main]

extern crate alloc;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::{bind_interrupts, Peri};
use embassy_rp::flash::{Blocking as FlashBlocking, Flash};
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::{FLASH, UART0};
use embassy_rp::rtc::Rtc;
use embassy_rp::spi::{self, Spi};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::Delay;
use embedded_alloc::LlffHeap as Heap;
use embedded_hal_bus::spi::ExclusiveDevice;
use mipidsi::interface::SpiInterface;
use mipidsi::models::ST7789;
use mipidsi::options::ColorInversion;
use mipidsi::Builder;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use mirror_core::config::{parse_config, MirrorConfig};
use mirror_core::device::{device_name, DeviceName};
use mirror_core::link::hm10;
use mirror_core::render::RenderScheduler;
use mirror_core::sync::SyncEngine;
use mirror_display::GraphicsDisplay;

use crate::channels::{Outbound, OUTBOUND};
use crate::clock::RtcClock;
use crate::controller::Controller;
use crate::panel::Backlight;

mod channels;
mod clock;
mod controller;
mod panel;
mod tasks;

// Heap allocator for JSON decoding
#[global_allocator]
static HEAP: Heap = Heap::empty();

// Heap size: 24KB (one 2KB line decodes into at most 16 events)
const HEAP_SIZE: usize = 24 * 1024;

/// On-board flash size, needed to address the unique id command
const FLASH_SIZE: usize = 2 * 1024 * 1024;

/// Embedded configuration (compiled into firmware)
/// Edit mirror.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../mirror.toml");

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 512]> = StaticCell::new();

// Scratch buffer for mipidsi pixel batches
static PANEL_BUF: StaticCell<[u8; 512]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Mirror firmware starting...");

    // Initialize heap allocator
    init_heap();

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();
    let name = read_device_name(p.FLASH, &config);
    info!("Device name: {}", name.as_str());

    // Setup UART for the HM-10 module (factory default 9600 baud)
    // Pin assignments are board-specific (GPIO0 TX, GPIO1 RX, GPIO2 STATE)
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = 9600;

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 512]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();
    let state_pin = Input::new(p.PIN_2, Pull::Down);

    info!("UART initialized for BLE module");

    // Setup SPI0 for the ST7789 panel
    // Pin assignments are board-specific (CLK=GPIO18, MOSI=GPIO19, CS=GPIO17,
    // DC=GPIO16, RST=GPIO20, BL=GPIO21)
    let mut spi_config = spi::Config::default();
    spi_config.frequency = 32_000_000;
    let spi = Spi::new_blocking_txonly(p.SPI0, p.PIN_18, p.PIN_19, spi_config);
    let cs = Output::new(p.PIN_17, Level::High);
    let dc = Output::new(p.PIN_16, Level::Low);
    let rst = Output::new(p.PIN_20, Level::Low);
    let backlight = Output::new(p.PIN_21, Level::High);

    let spi_device = match ExclusiveDevice::new_no_delay(spi, cs) {
        Ok(device) => device,
        Err(e) => match e {},
    };
    let interface = SpiInterface::new(spi_device, dc, PANEL_BUF.init([0u8; 512]));

    let panel = match Builder::new(ST7789, interface)
        .display_size(config.render.width, config.render.height)
        .invert_colors(ColorInversion::Inverted)
        .reset_pin(rst)
        .init(&mut Delay)
    {
        Ok(panel) => panel,
        Err(e) => defmt::panic!("Panel init failed: {:?}", Debug2Format(&e)),
    };
    let display = GraphicsDisplay::new(panel, Backlight::new(backlight));

    info!("Panel initialized");

    // Button to ground with pull-up (GPIO15)
    let button = Input::new(p.PIN_15, Pull::Up);

    let clock = RtcClock::new(Rtc::new(p.RTC));

    // Module setup goes out before the controller asks it to advertise
    for command in hm10::setup_commands(&name) {
        OUTBOUND.send(Outbound::At(command)).await;
    }

    let engine = SyncEngine::new(&config.link);
    let scheduler = RenderScheduler::new(&config.render);
    let controller = Controller::new(
        engine,
        scheduler,
        display,
        clock,
        config.render.tick_interval_ms,
    );

    // Spawn tasks
    spawner.spawn(tasks::link_rx_task(rx)).unwrap();
    spawner
        .spawn(tasks::link_tx_task(tx, config.link.fragment_size))
        .unwrap();
    spawner.spawn(tasks::link_status_task(state_pin)).unwrap();
    spawner
        .spawn(tasks::button_task(button, config.input.debounce_ms))
        .unwrap();

    info!("All tasks spawned, firmware running");

    // The main task runs the controller
    controller.run().await
}

/// Initialize the heap allocator
fn init_heap() {
    use core::mem::MaybeUninit;
    static mut HEAP_MEM: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
    #[allow(static_mut_refs)]
    unsafe {
        HEAP.init(HEAP_MEM.as_ptr() as usize, HEAP_SIZE)
    }
}

/// Parse the embedded mirror.toml
///
/// build.rs already validated it, so a failure here means the two parsers
/// disagree. Fall back to built-in defaults rather than refuse to boot.
fn load_config() -> MirrorConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Parsed embedded configuration successfully");
            config
        }
        Err(e) => {
            error!("Failed to parse embedded config: {}", e);
            error!("Using built-in defaults");
            MirrorConfig::new()
        }
    }
}

/// Build the advertised name from the flash chip's unique id
fn read_device_name(flash: Peri<'static, FLASH>, config: &MirrorConfig) -> DeviceName {
    let mut flash = Flash::<_, FlashBlocking, FLASH_SIZE>::new_blocking(flash);
    let mut uid = [0u8; 8];

    if let Err(e) = flash.blocking_unique_id(&mut uid) {
        warn!("Unique id unavailable: {:?}", e);
    }

    let name = device_name(&config.link.name_prefix, &uid);
    if name.len() > hm10::MAX_MODULE_NAME {
        warn!(
            "Name longer than {} characters, module will truncate it",
            hm10::MAX_MODULE_NAME
        );
    }
    name
}
