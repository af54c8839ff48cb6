use billy_motor::{Direction, MotorOutput, TickDelay, TickRate, PWM_FREQUENCY_HZ};
use esp_idf_hal::gpio::{AnyOutputPin, Level, Output, PinDriver};
use esp_idf_hal::ledc::config::TimerConfig;
use esp_idf_hal::ledc::{LedcDriver, Resolution};
use esp_idf_hal::units::Hertz;
use esp_idf_sys::EspError;

/// LEDC timer settings for the motor enable line: 32 kHz, 10-bit duty.
pub fn timer_config() -> TimerConfig {
    TimerConfig::default()
        .frequency(Hertz(PWM_FREQUENCY_HZ))
        .resolution(Resolution::Bits10)
}

/// H-bridge channel driven by an LEDC PWM enable line and two GPIO
/// direction lines.
pub struct LedcMotor<'d> {
    enable: LedcDriver<'d>,
    dir_a: PinDriver<'d, AnyOutputPin, Output>,
    dir_b: PinDriver<'d, AnyOutputPin, Output>,
    max_duty: u32,
}

impl<'d> LedcMotor<'d> {
    /// Take a configured LEDC channel and the two direction pins.
    pub fn new(
        enable: LedcDriver<'d>,
        dir_a: AnyOutputPin,
        dir_b: AnyOutputPin,
    ) -> Result<Self, EspError> {
        let max_duty = enable.get_max_duty();
        Ok(Self {
            enable,
            dir_a: PinDriver::output(dir_a)?,
            dir_b: PinDriver::output(dir_b)?,
            max_duty,
        })
    }
}

impl MotorOutput for LedcMotor<'_> {
    type Error = EspError;

    fn set_direction(&mut self, direction: Direction) -> Result<(), EspError> {
        let (a, b) = direction.levels();
        // Release before asserting so both lines are never high together.
        if a {
            self.dir_b.set_level(Level::from(b))?;
            self.dir_a.set_level(Level::from(a))?;
        } else {
            self.dir_a.set_level(Level::from(a))?;
            self.dir_b.set_level(Level::from(b))?;
        }
        Ok(())
    }

    fn set_magnitude(&mut self, magnitude: u16) -> Result<(), EspError> {
        self.enable.set_duty(u32::from(magnitude).min(self.max_duty))
    }
}

/// FreeRTOS `vTaskDelay`; yields the core to other tasks while holding.
#[derive(Debug, Clone, Copy, Default)]
pub struct FreeRtosDelay;

impl TickDelay for FreeRtosDelay {
    fn tick_rate(&self) -> TickRate {
        TickRate::new(esp_idf_sys::configTICK_RATE_HZ)
    }

    fn delay_ticks(&mut self, ticks: u32) {
        unsafe { esp_idf_sys::vTaskDelay(ticks) }
    }
}
