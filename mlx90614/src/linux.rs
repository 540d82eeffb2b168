/*! Linux `i2c-dev` bus handle.

Wraps an [`i2cdev`] device file. The kernel keeps a current slave address per open file
(`I2C_SLAVE`); register reads go through `I2C_RDWR`, which sends the command write and the data
read as one transfer with a repeated start in between. */

use std::error::Error as StdError;
use std::fmt;
use std::path::Path;
use std::vec::Vec;

use embedded_hal::i2c::{self, ErrorKind, ErrorType, I2c, Operation};
use i2cdev::core::{I2CMessage, I2CTransfer};
use i2cdev::linux::{LinuxI2CDevice, LinuxI2CError, LinuxI2CMessage};

use crate::Bus;

/// An open `/dev/i2c-N` character device, exclusively owned. Dropping it closes the device.
pub struct LinuxBus {
    dev: LinuxI2CDevice,
    bound: Option<u8>,
}

#[derive(Debug)]
pub struct LinuxBusError(LinuxI2CError);

impl LinuxBus {
    /** Open the bus device at `path` read-write (close-on-exec) with `address` selected.

    `O_SYNC` is not set: [`LinuxI2CDevice`] opens the file itself and cannot adopt a descriptor.
    `i2c-dev` transfers are synchronous ioctls either way. */
    pub fn open<P: AsRef<Path>>(path: P, address: u8) -> Result<Self, LinuxBusError> {
        let dev = LinuxI2CDevice::new(path, u16::from(address)).map_err(LinuxBusError)?;

        Ok(LinuxBus {
            dev,
            bound: Some(address),
        })
    }
}

/// Adopt an already open device. Its slave address is re-selected on the first transfer.
impl From<LinuxI2CDevice> for LinuxBus {
    fn from(dev: LinuxI2CDevice) -> Self {
        LinuxBus { dev, bound: None }
    }
}

impl From<LinuxBus> for LinuxI2CDevice {
    fn from(bus: LinuxBus) -> Self {
        bus.dev
    }
}

impl Bus for LinuxBus {
    fn bind(&mut self, address: u8) -> Result<(), LinuxBusError> {
        match self.dev.set_slave_address(u16::from(address)) {
            Ok(_) => {
                self.bound = Some(address);
                Ok(())
            }
            Err(e) => {
                self.bound = None;
                Err(LinuxBusError(e))
            }
        }
    }
}

impl ErrorType for LinuxBus {
    type Error = LinuxBusError;
}

impl I2c for LinuxBus {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if self.bound != Some(address) {
            self.bind(address)?;
        }

        let mut messages: Vec<_> = operations
            .iter_mut()
            .map(|op| match op {
                Operation::Write(w) => LinuxI2CMessage::write(w),
                Operation::Read(r) => LinuxI2CMessage::read(r),
            })
            .map(|m| m.with_address(u16::from(address)))
            .collect();

        self.dev
            .transfer(&mut messages)
            .map(drop)
            .map_err(LinuxBusError)
    }
}

impl fmt::Display for LinuxBusError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl StdError for LinuxBusError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&self.0)
    }
}

impl i2c::Error for LinuxBusError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

impl From<LinuxI2CError> for LinuxBusError {
    fn from(e: LinuxI2CError) -> Self {
        LinuxBusError(e)
    }
}
