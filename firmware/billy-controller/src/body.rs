use billy_motor::{BodyMotion, Direction};
use esp_idf_hal::gpio::{AnyOutputPin, Level, Output, PinDriver};
use esp_idf_sys::EspError;
use log::info;

/// Body wiggle motor: plain on/off H-bridge, no PWM.
pub struct BodyDriver<'d> {
    enable: PinDriver<'d, AnyOutputPin, Output>,
    dir_a: PinDriver<'d, AnyOutputPin, Output>,
    dir_b: PinDriver<'d, AnyOutputPin, Output>,
}

impl<'d> BodyDriver<'d> {
    /// Configure the three lines as outputs with the motor off.
    pub fn new(
        enable: AnyOutputPin,
        dir_a: AnyOutputPin,
        dir_b: AnyOutputPin,
    ) -> Result<Self, EspError> {
        let mut enable = PinDriver::output(enable)?;
        enable.set_low()?;
        Ok(Self {
            enable,
            dir_a: PinDriver::output(dir_a)?,
            dir_b: PinDriver::output(dir_b)?,
        })
    }

    pub fn apply(&mut self, motion: BodyMotion) -> Result<(), EspError> {
        info!("body: {:?}", motion);
        match motion {
            BodyMotion::Head => self.run(Direction::Forward),
            BodyMotion::Tail => self.run(Direction::Reverse),
            BodyMotion::Stop => self.enable.set_low(),
        }
    }

    fn run(&mut self, direction: Direction) -> Result<(), EspError> {
        let (a, b) = direction.levels();
        self.dir_a.set_level(Level::from(a))?;
        self.dir_b.set_level(Level::from(b))?;
        self.enable.set_high()
    }
}
