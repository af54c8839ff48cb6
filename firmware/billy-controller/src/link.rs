use billy_motor::Command;
use esp_idf_hal::delay::BLOCK;
use esp_idf_hal::uart::UartDriver;
use esp_idf_sys::EspError;
use log::{info, warn};

/// Baud rate of the serial Bluetooth bridge.
pub const LINK_BAUD: u32 = 9600;

/// Byte-oriented command link over UART.
pub struct CommandLink<'d> {
    uart: UartDriver<'d>,
}

impl<'d> CommandLink<'d> {
    pub fn new(uart: UartDriver<'d>) -> Self {
        Self { uart }
    }

    /// Block until a byte arrives and decode it.
    ///
    /// Unknown tokens are logged and yield `Ok(None)`.
    pub fn next_command(&mut self) -> Result<Option<Command>, EspError> {
        let mut buf = [0u8; 1];
        if self.uart.read(&mut buf, BLOCK)? == 0 {
            return Ok(None);
        }
        match Command::from_byte(buf[0]) {
            Ok(command) => {
                info!("Link: 0x{:02x} -> {:?}", buf[0], command);
                Ok(Some(command))
            }
            Err(e) => {
                warn!("Link: {}", e);
                Ok(None)
            }
        }
    }
}
