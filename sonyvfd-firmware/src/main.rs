//! SonyVFD - PT6315 Front Panel Firmware
//!
//! Drives a Sony 1-869-725-12 VFD panel from an RP2040 over a bit-banged
//! 3-wire bus. At boot the operator can open the interactive mapping tool
//! on the UART console; otherwise the panel runs a short demonstration.

#![no_std]
#![no_main]

extern crate alloc;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::{Delay, Timer};
use embedded_alloc::LlffHeap as Heap;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use sonyvfd_core::config::PanelConfig;
use sonyvfd_core::editor::Editor;
use sonyvfd_core::mapping::MappingData;
use sonyvfd_core::traits::PanelDriver;
use sonyvfd_drivers::{Pt6315, VfdDisplay};
use sonyvfd_hal_rp2040::console::{Console, UartConsole};
use sonyvfd_hal_rp2040::flash::{FlashError, FlashStorage};
use sonyvfd_hal_rp2040::pins::PinBank;

use crate::config::{Persistence, StoreError};

mod config;
mod demo;
mod session;

// Heap allocator for mapping documents and console text
#[global_allocator]
static HEAP: Heap = Heap::empty();

// Heap size: 48KB
const HEAP_SIZE: usize = 48 * 1024;

/// Embedded default mapping document (compiled into firmware)
/// Edit mappings.json and rebuild to customize
const EMBEDDED_MAPPINGS: &str = include_str!("../mappings.json");

/// Console baud rate
const CONSOLE_BAUD: u32 = 115_200;

/// How long the boot prompt waits for a key
const BOOT_PROMPT_MS: u64 = 3_000;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 1024]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

type Panel = Pt6315<Output<'static>, Output<'static>, Output<'static>, Delay>;

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("SonyVFD firmware starting...");

    // Initialize heap allocator
    init_heap();

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    let (mut pins, board) = PinBank::split(p);
    info!("Peripherals initialized");

    let mut store = Persistence::new(FlashStorage::new(board.flash, board.dma_ch0));
    let config = load_config(&mut store).await;

    // Operator console on UART0 (GPIO0 TX, GPIO1 RX)
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = CONSOLE_BAUD;
    let tx_buf = TX_BUF.init([0u8; 1024]);
    let rx_buf = RX_BUF.init([0u8; 256]);
    let uart = Uart::new_blocking(board.uart0, board.console_tx, board.console_rx, uart_config);
    let mut console = UartConsole::new(uart.into_buffered(Irqs, tx_buf, rx_buf));
    info!("UART initialized for operator console");

    let _ = console
        .write_line("Initializing Sony VFD Driver (PT6315)...")
        .await;

    // Claim the bus pins before anything is driven
    let (clk, din, stb) = match (
        pins.take(config.clock_pin),
        pins.take(config.data_pin),
        pins.take(config.strobe_pin),
    ) {
        (Ok(clk), Ok(din), Ok(stb)) => (clk, din, stb),
        (clk, din, stb) => {
            let err = [clk.err(), din.err(), stb.err()].into_iter().flatten().next();
            error!(
                "Bus pins clk={} din={} stb={} unavailable: {}",
                config.clock_pin, config.data_pin, config.strobe_pin, err
            );
            let _ = console.write_line("Display Init Failed: bus pins unavailable").await;
            halt().await;
        }
    };

    let mut panel: Panel = Pt6315::new(
        Output::new(clk, Level::High),
        Output::new(din, Level::Low),
        Output::new(stb, Level::High),
        Delay,
        &config,
    );

    if let Err(e) = panel.init() {
        error!("Display init failed: {}", e);
        let _ = console.write_line("Display Init Failed").await;
        halt().await;
    }
    if let Err(e) = panel.set_brightness(config.brightness) {
        warn!("Setting brightness failed: {}", e);
    }
    info!("Display initialized");
    let _ = console.write_line("Display Initialized.").await;

    let mapping = load_mappings(&mut store, config.positions as usize).await;
    if mapping.is_empty() {
        let _ = console
            .write_line("No segment mappings yet; run the mapping tool to create them.")
            .await;
    }

    let _ = console
        .write_str("Press any key within 3 s for the mapping tool...\r\n")
        .await;
    let wants_editor = matches!(console.read_byte_timeout(BOOT_PROMPT_MS).await, Ok(Some(_)));

    if wants_editor {
        let mut editor = Editor::new(mapping, panel.geometry());
        if let Err(e) = session::run(&mut editor, &mut panel, &mut console, &mut store).await {
            match e {
                session::SessionError::Panel(e) => error!("Mapping session bus error: {}", e),
                session::SessionError::Console(e) => error!("Mapping session console error: {}", e),
            }
        }
    } else {
        let _ = console.write_line("Running demo.").await;
        let mut display = VfdDisplay::new(panel, mapping);
        match demo::run(&mut display).await {
            Ok(()) => {
                let _ = console.write_line("Done.").await;
            }
            Err(e) => error!("Demo bus error: {}", e),
        }
    }

    loop {
        Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
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

/// Park after a fatal hardware error
async fn halt() -> ! {
    loop {
        Timer::after_secs(60).await;
    }
}

/// Load the panel config from flash
///
/// Falls back to the built-in defaults if nothing valid is stored. An
/// empty slot is seeded with the defaults.
async fn load_config(store: &mut Persistence<'_>) -> PanelConfig {
    match store.load_config().await {
        Ok(config) => config,
        Err(StoreError::Flash(FlashError::NotFound)) => {
            info!("No panel config in flash, storing defaults");
            let config = PanelConfig::default();
            if let Err(e) = store.save_config(&config).await {
                warn!("Storing default panel config failed: {}", e);
            }
            config
        }
        Err(e) => {
            warn!("Stored panel config unusable ({}), using defaults", e);
            PanelConfig::default()
        }
    }
}

/// Load the mapping document
///
/// Flash wins over the embedded document. Malformed data falls back to an
/// empty mapping with `positions` character positions.
async fn load_mappings(store: &mut Persistence<'_>, positions: usize) -> MappingData {
    match store.load_mappings(positions).await {
        Ok(mapping) => {
            info!("Mappings loaded from flash");
            return mapping;
        }
        Err(StoreError::Flash(FlashError::NotFound)) => {
            info!("No mappings in flash, using embedded document");
        }
        Err(e) => {
            warn!("Stored mappings unusable ({}), starting empty", e);
            return MappingData::with_positions(positions);
        }
    }

    match MappingData::from_json(EMBEDDED_MAPPINGS.as_bytes(), positions) {
        Ok(mapping) => {
            config::loader::log_mapping_summary(&mapping);
            mapping
        }
        Err(e) => {
            warn!("Embedded mappings unusable ({}), starting empty", e);
            MappingData::with_positions(positions)
        }
    }
}
