//! GT911 capacitive touch controller
//!
//! Polled over I²C with 16-bit big-endian register addresses. One poll:
//!
//! 1. read the status byte at `0x814E`
//! 2. if the buffer-ready bit is clear, nothing new was latched; report the
//!    previous sample again
//! 3. otherwise read the first point record at `0x814F` (when a contact is
//!    present) and write `0x00` back to the status register so the
//!    controller latches the next frame
//!
//! Interrupt, reset and configuration-upload lines are board bring-up and are
//! not driven here.

use embedded_hal_async::i2c::I2c;
use platform::{RawTouchSample, TouchError, TouchSensor};

/// Default 7-bit address (INT low during reset)
pub const ADDRESS: u8 = 0x5D;

/// Alternate 7-bit address (INT high during reset)
pub const ADDRESS_ALT: u8 = 0x14;

/// Touch status register
const REG_STATUS: u16 = 0x814E;

/// First point record
const REG_POINT1: u16 = 0x814F;

/// Buffer-ready flag in the status register
const STATUS_READY: u8 = 0x80;

/// Contact count field in the status register
const STATUS_COUNT_MASK: u8 = 0x0F;

/// Most contacts the controller tracks
pub const MAX_CONTACTS: u8 = 5;

/// GT911 touch sensor.
pub struct Gt911<I2C> {
    i2c: I2C,
    address: u8,
    last: RawTouchSample,
}

impl<I2C: I2c> Gt911<I2C> {
    /// Sensor at the default address.
    pub fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, ADDRESS)
    }

    /// Sensor at `address`.
    pub fn with_address(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            last: RawTouchSample::released(),
        }
    }

    /// Most recent sample returned.
    pub fn last(&self) -> RawTouchSample {
        self.last
    }

    /// Release the bus.
    pub fn release(self) -> I2C {
        self.i2c
    }

    async fn read_reg<const N: usize>(&mut self, reg: u16) -> Result<[u8; N], TouchError> {
        let mut buf = [0u8; N];
        self.i2c
            .write_read(self.address, &reg.to_be_bytes(), &mut buf)
            .await
            .map_err(|_| TouchError::Bus)?;
        Ok(buf)
    }

    async fn clear_status(&mut self) -> Result<(), TouchError> {
        let [hi, lo] = REG_STATUS.to_be_bytes();
        self.i2c
            .write(self.address, &[hi, lo, 0x00])
            .await
            .map_err(|_| TouchError::Bus)
    }
}

impl<I2C: I2c> TouchSensor for Gt911<I2C> {
    async fn read(&mut self) -> Result<RawTouchSample, TouchError> {
        let [status] = self.read_reg::<1>(REG_STATUS).await?;
        if status & STATUS_READY == 0 {
            return Ok(self.last);
        }

        let count = status & STATUS_COUNT_MASK;
        if count > MAX_CONTACTS {
            self.clear_status().await?;
            return Err(TouchError::InvalidData);
        }

        let sample = if count == 0 {
            RawTouchSample::released()
        } else {
            // track id, x lo/hi, y lo/hi, size lo/hi, reserved
            let [_, xl, xh, yl, yh, ..] = self.read_reg::<8>(REG_POINT1).await?;
            RawTouchSample {
                x: u16::from_le_bytes([xl, xh]),
                y: u16::from_le_bytes([yl, yh]),
                contact_count: count,
            }
        };

        self.clear_status().await?;
        self.last = sample;
        Ok(sample)
    }
}
