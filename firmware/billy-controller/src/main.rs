mod body;
mod link;
mod motor;
mod storage;

use billy_motor::{
    mailbox, ActuatorMailbox, BoostTables, Command, MotorDriver, PinAssignment, Route,
};
use body::BodyDriver;
use link::{CommandLink, LINK_BAUD};
use motor::{FreeRtosDelay, LedcMotor};
use storage::BoostStore;

use esp_idf_hal::gpio::{AnyIOPin, OutputPin, Pin};
use esp_idf_hal::ledc::{LedcChannel, LedcDriver, LedcTimer, LedcTimerDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::uart::{config::Config as UartConfig, UartDriver};
use esp_idf_hal::units::Hertz;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use log::{error, info, warn};
use std::sync::OnceLock;
use std::thread::{self, sleep};
use std::time::Duration;

/// Pending mouth requests before the link task blocks.
const MOUTH_QUEUE_DEPTH: usize = 8;
const MOUTH_TASK_STACK: usize = 6 * 1024;

/// Loaded once at startup, shared read-only by every transition.
static BOOST_TABLES: OnceLock<BoostTables> = OnceLock::new();

fn main() {
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init().expect("Failed to init logger");

    info!("Billy controller v{}", env!("CARGO_PKG_VERSION"));

    let peripherals = Peripherals::take().expect("Failed to take peripherals");
    let nvs_partition = EspDefaultNvsPartition::take().expect("Failed to init NVS");

    let mut store = BoostStore::new(nvs_partition).expect("Failed to open NVS namespace");
    let tables: &'static BoostTables = BOOST_TABLES.get_or_init(|| store.load_or_default());

    // Body wiggle lines: 21 enable, 22/23 direction
    let mut body = BodyDriver::new(
        peripherals.pins.gpio21.downgrade_output(),
        peripherals.pins.gpio22.downgrade_output(),
        peripherals.pins.gpio23.downgrade_output(),
    )
    .expect("Failed to init body lines");

    // Mouth enable line via LEDC PWM, direction on 18/19. The assignment is
    // read back from the peripherals that are actually wired.
    let (ledc_timer, ledc_channel) = (peripherals.ledc.timer1, peripherals.ledc.channel1);
    let enable_pin = peripherals.pins.gpio5;
    let dir_a = peripherals.pins.gpio18.downgrade_output();
    let dir_b = peripherals.pins.gpio19.downgrade_output();
    let mouth_pins = PinAssignment {
        enable: enable_pin.pin() as u8,
        dir_a: dir_a.pin() as u8,
        dir_b: dir_b.pin() as u8,
        channel: ledc_channel_index(&ledc_channel),
        timer: ledc_timer_index(&ledc_timer),
    };

    let timer = LedcTimerDriver::new(ledc_timer, &motor::timer_config())
        .expect("Failed to init LEDC timer");
    let enable = LedcDriver::new(ledc_channel, timer, enable_pin)
        .expect("Failed to init LEDC channel");
    let output = LedcMotor::new(enable, dir_a, dir_b).expect("Failed to init mouth lines");

    // The mouth task is the only writer of the mouth actuator.
    let (mouth, inbox) = mailbox("mouth", MOUTH_QUEUE_DEPTH);
    thread::Builder::new()
        .name("mouth".into())
        .stack_size(MOUTH_TASK_STACK)
        .spawn(move || {
            let mut driver = MotorDriver::init(mouth_pins, output, tables, FreeRtosDelay)
                .expect("Failed to init mouth motor");
            if let Err(e) = inbox.serve(&mut driver) {
                panic!("Mouth driver fault at duty {}: {:?}", driver.duty(), e);
            }
        })
        .expect("Failed to spawn mouth task");

    // Command link: UART2, RX 16 / TX 17
    let uart = UartDriver::new(
        peripherals.uart2,
        peripherals.pins.gpio17,
        peripherals.pins.gpio16,
        Option::<AnyIOPin>::None,
        Option::<AnyIOPin>::None,
        &UartConfig::new().baudrate(Hertz(LINK_BAUD)),
    )
    .expect("Failed to init command UART");
    let mut link = CommandLink::new(uart);

    info!("Billy running. Waiting for commands...");

    loop {
        match link.next_command() {
            Ok(Some(command)) => dispatch(command, &mouth, &mut body),
            Ok(None) => {}
            Err(e) => {
                error!("Link read failed: {:?}", e);
                sleep(Duration::from_millis(100));
            }
        }
    }
}

fn ledc_channel_index<C: LedcChannel>(_: &C) -> u8 {
    C::channel() as u8
}

fn ledc_timer_index<T: LedcTimer>(_: &T) -> u8 {
    T::timer() as u8
}

fn dispatch(command: Command, mouth: &ActuatorMailbox, body: &mut BodyDriver<'_>) {
    match command.route() {
        Route::Mouth(duty) => {
            if let Err(e) = mouth.set_duty(i32::from(duty)) {
                // The mouth task panics on hardware faults; nothing to recover.
                error!("{}: {}", mouth.name(), e);
            }
        }
        Route::Body(motion) => {
            if let Err(e) = body.apply(motion) {
                warn!("Body command {:?} failed: {:?}", motion, e);
            }
        }
    }
}
