#![allow(dead_code)]

use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, Operation};
use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};
use mlx90614::{crc, Bus};

pub const ADDR: u8 = 0x5A;

/// Mock bus that also records address binding.
pub struct MockBus {
    pub i2c: I2cMock,
    pub bound: Option<u8>,
    pub bind_error: Option<ErrorKind>,
}

impl MockBus {
    /// Share `i2c`'s expectations, so they can be checked after the bus is consumed.
    pub fn new(i2c: &I2cMock) -> Self {
        MockBus {
            i2c: i2c.clone(),
            bound: None,
            bind_error: None,
        }
    }
}

impl ErrorType for MockBus {
    type Error = ErrorKind;
}

impl I2c for MockBus {
    fn transaction(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), Self::Error> {
        self.i2c.transaction(address, operations)
    }

    fn write_read(&mut self, address: u8, write: &[u8], read: &mut [u8]) -> Result<(), Self::Error> {
        assert_eq!(self.bound, Some(address), "transfer before bind");
        self.i2c.write_read(address, write, read)
    }
}

impl Bus for MockBus {
    fn bind(&mut self, address: u8) -> Result<(), Self::Error> {
        match self.bind_error {
            Some(e) => Err(e),
            None => {
                self.bound = Some(address);
                Ok(())
            }
        }
    }
}

/// A register read answered with `value` and a correct PEC.
pub fn reply(address: u8, cmd: u8, value: u16) -> I2cTransaction {
    let [lo, hi] = value.to_le_bytes();
    let pec = crc::pec(address, cmd, [lo, hi]).unwrap();
    I2cTransaction::write_read(address, vec![cmd], vec![lo, hi, pec])
}

/// A register read answered with `value` and a PEC that is off by `flip`.
pub fn corrupt_reply(address: u8, cmd: u8, value: u16, flip: u8) -> I2cTransaction {
    let [lo, hi] = value.to_le_bytes();
    let pec = crc::pec(address, cmd, [lo, hi]).unwrap();
    I2cTransaction::write_read(address, vec![cmd], vec![lo, hi, pec ^ flip])
}

/// Everything read while a session verifies the sensor at `address`.
pub fn probe(address: u8) -> Vec<I2cTransaction> {
    vec![
        reply(address, 0x2E, 0xBE00 | u16::from(address)),
        reply(address, 0x3C, 0x0123),
        reply(address, 0x3D, 0x4567),
        reply(address, 0x3E, 0x89AB),
        reply(address, 0x3F, 0xCDEF),
        reply(address, 0x24, 0xFFFF),
        reply(address, 0x25, 0x9FB4),
    ]
}

pub fn with_probe(address: u8, rest: &[I2cTransaction]) -> Vec<I2cTransaction> {
    let mut all = probe(address);
    all.extend_from_slice(rest);
    all
}

cfg_if::cfg_if! {
    if #[cfg(all(feature = "hw-tests", any(target_os = "linux", target_os = "android")))] {
        use mlx90614::LinuxBus;
        pub type HalImpl = LinuxBus;
    } else {
        pub type HalImpl = UnimplementedHal;
    }
}

pub struct UnimplementedHal;

impl ErrorType for UnimplementedHal {
    type Error = ErrorKind;
}

impl I2c for UnimplementedHal {
    fn transaction(&mut self, _address: u8, _operations: &mut [Operation<'_>]) -> Result<(), Self::Error> {
        Err(ErrorKind::Other)
    }
}

impl Bus for UnimplementedHal {}

pub fn setup() -> HalImpl {
    cfg_if::cfg_if! {
        if #[cfg(all(feature = "hw-tests", any(target_os = "linux", target_os = "android")))] {
            LinuxBus::open("/dev/i2c-1", ADDR).unwrap()
        } else {
            UnimplementedHal {}
        }
    }
}
