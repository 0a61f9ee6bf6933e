//! Actuator Controller Main Application
//!
//! Entry point for the keypad-driven actuator controller. Brings up the
//! keypad, join button, OLED and transceiver, then runs one task per
//! subsystem. Tasks only share the statics declared below.

#![no_std]
#![no_main]

use defmt::unwrap;
use embassy_executor::Spawner;
use embassy_stm32::exti::ExtiInput;
use embassy_stm32::gpio::{Input, Level, Output, Pull, Speed};
use embassy_stm32::i2c::I2c;
use embassy_stm32::mode::Blocking;
use embassy_stm32::spi::{self, Spi};
use embassy_stm32::time::Hertz;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::{with_timeout, Delay, Duration, Instant, Timer};
use {defmt_rtt as _, panic_probe as _};

use asc_firmware::controller::fsm::{Controller, ControllerAction};
use asc_firmware::drivers::display::OledDisplay;
use asc_firmware::drivers::nrf24::Nrf24;
use asc_firmware::input::button::JoinButton;
use asc_firmware::input::keypad::Keypad;
use asc_firmware::prelude::*;
use asc_firmware::radio::link::{LinkAction, LinkInput, RadioLink};
use asc_firmware::sync::{JoinSignal, KeyMailbox, OutboundQueue};
use asc_firmware::ui::DisplaySink;
use asc_firmware::{log_info, log_warn};

type Radio = Nrf24<Spi<'static, Blocking>, Output<'static>, Output<'static>, Delay>;
type Oled = OledDisplay<I2c<'static, Blocking>>;

/// Keypad → controller
static KEYS: KeyMailbox = KeyMailbox::new();

/// Push-button → link
static JOIN: JoinSignal = JoinSignal::new();

/// Controller → link
static FRAMES: OutboundQueue = OutboundQueue::new();

/// Controller → display
static DISPLAY: Channel<CriticalSectionRawMutex, DisplayCommand, DISPLAY_QUEUE_DEPTH> = Channel::new();

const QUEUE_WAIT: Duration = Duration::from_millis(QUEUE_WAIT_MS);

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    log_info!("Actuator controller v{}", env!("CARGO_PKG_VERSION"));

    let p = embassy_stm32::init(embassy_stm32::Config::default());

    // Keypad: columns driven high one at a time, rows pulled down
    let cols = [
        Output::new(p.PE9, Level::Low, Speed::Low),
        Output::new(p.PE11, Level::Low, Speed::Low),
        Output::new(p.PE13, Level::Low, Speed::Low),
        Output::new(p.PE14, Level::Low, Speed::Low),
    ];
    let rows = [
        Input::new(p.PE8, Pull::Down),
        Input::new(p.PE10, Pull::Down),
        Input::new(p.PE12, Pull::Down),
        Input::new(p.PE15, Pull::Down),
    ];

    let button = ExtiInput::new(p.PC13, p.EXTI13, Pull::None);
    let led = Output::new(p.PB0, Level::Low, Speed::Low);

    let i2c = I2c::new_blocking(p.I2C1, p.PB8, p.PB9, Hertz(I2C_FREQUENCY_HZ), Default::default());

    let mut spi_config = spi::Config::default();
    spi_config.frequency = Hertz(RADIO_SPI_FREQUENCY_HZ);
    let spi = Spi::new_blocking(p.SPI1, p.PA5, p.PA7, p.PA6, spi_config);
    let cs = Output::new(p.PD14, Level::High, Speed::VeryHigh);
    let ce = Output::new(p.PD15, Level::Low, Speed::VeryHigh);
    let mut radio = Nrf24::new(spi, cs, ce, Delay);

    // Register setup must not be interleaved with anything else
    let init = critical_section::with(|_| radio.init(&RADIO_TX_ADDRESS, RADIO_CHANNEL));
    if let Err(e) = init {
        log_warn!("Transceiver init failed: {}", e);
    } else {
        log_info!("Transceiver on channel {}", RADIO_CHANNEL);
    }

    match OledDisplay::new(i2c) {
        Ok(display) => unwrap!(spawner.spawn(display_task(display))),
        Err(e) => log_warn!("Display init failed: {}", e),
    }

    unwrap!(spawner.spawn(keypad_task(cols, rows)));
    unwrap!(spawner.spawn(button_task(button)));
    unwrap!(spawner.spawn(controller_task(led)));
    unwrap!(spawner.spawn(link_task(radio)));

    log_info!("Tasks spawned");
}

/// Keypad task - one column per period
#[embassy_executor::task]
async fn keypad_task(mut cols: [Output<'static>; 4], rows: [Input<'static>; 4]) {
    let mut keypad = Keypad::new(KEYPAD_DEBOUNCE_CYCLES);

    loop {
        let active = keypad.active_column().map(|c| c.index());
        for (i, col) in cols.iter_mut().enumerate() {
            col.set_level(if active == Some(i) { Level::High } else { Level::Low });
        }
        Timer::after_micros(KEYPAD_SETTLE_US).await;

        let sample = rows
            .iter()
            .enumerate()
            .fold(0u8, |acc, (i, row)| if row.is_high() { acc | (1 << i) } else { acc });

        if let Some(key) = keypad.poll(sample) {
            log_info!("Key {}", key);
            KEYS.post(key);
        }

        Timer::after_millis(KEYPAD_PERIOD_MS).await;
    }
}

/// Join push-button task
#[embassy_executor::task]
async fn button_task(mut pin: ExtiInput<'static>) {
    let mut button = JoinButton::new(BUTTON_GUARD_MS);

    loop {
        pin.wait_for_rising_edge().await;
        if button.on_edge(Instant::now().as_millis()) {
            log_info!("Join requested");
            JOIN.raise();
        }
    }
}

/// Controller task - one state machine transition per period
#[embassy_executor::task]
async fn controller_task(mut led: Output<'static>) {
    let mut controller = Controller::new(SENDER_ADDRESS);

    loop {
        let key = if controller.is_idle() { KEYS.take() } else { None };

        match controller.step(key) {
            ControllerAction::None => {}
            ControllerAction::Display(cmd) => {
                if with_timeout(QUEUE_WAIT, DISPLAY.send(cmd)).await.is_err() {
                    log_warn!("Display busy, update dropped");
                }
            }
            ControllerAction::Enqueue(frame) => {
                led.toggle();
                if FRAMES.push(frame).is_err() {
                    log_warn!("Outbound queue full, {} frames dropped", FRAMES.dropped());
                }
            }
        }

        Timer::after_millis(CONTROLLER_PERIOD_MS).await;
    }
}

/// Radio link task - one state machine transition per period
#[embassy_executor::task]
async fn link_task(mut radio: Radio) {
    let mut link = RadioLink::new(SENDER_ADDRESS);

    loop {
        let input = if link.is_idle() {
            let join = JOIN.take();
            let frame = if join {
                None
            } else {
                with_timeout(QUEUE_WAIT, FRAMES.next()).await.ok()
            };
            LinkInput::select(join, || frame)
        } else {
            LinkInput::Nothing
        };

        if link.step(input, &mut radio) == LinkAction::Sent {
            let stats = link.stats();
            log_info!("Sent (frames={}, joins={})", stats.frames_sent, stats.joins_sent);
        }

        Timer::after_millis(RADIO_PERIOD_MS).await;
    }
}

/// Display task - renders every command it receives
#[embassy_executor::task]
async fn display_task(mut display: Oled) {
    loop {
        let cmd = DISPLAY.receive().await;
        if let Err(e) = display.render(&cmd) {
            log_warn!("Display update failed: {}", e);
        }
    }
}
