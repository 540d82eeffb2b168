/*! `mlx90614` is an [`embedded_hal`](https://github.com/rust-embedded/embedded-hal) crate for
reading [Melexis MLX90614](https://www.melexis.com/en/product/MLX90614/) infrared thermometers
over an I2C (SMBus) bus.

The MLX90614 exposes two banks of 32 16-bit registers: volatile RAM, which holds the linearized
ambient and object temperatures, and EEPROM, which holds calibration, configuration and the
sensor's own slave address. Every read is a write of one command byte followed, after a repeated
start, by a read of two data bytes and a Packet Error Check (PEC) byte. Reads whose PEC does not
match are rejected.

Creating a [Mlx90614] checks that the device answering at the given address reports that same
address in its EEPROM, and logs the chip ID, emissivity and configuration register at `info`
level via the [`log`](https://docs.rs/log) facade.

```no_run
# #[cfg(feature = "linux")]
# fn main() -> Result<(), mlx90614::Error<mlx90614::LinuxBusError>> {
let mut mlx = mlx90614::Mlx90614::open("/dev/i2c-1", mlx90614::DEFAULT_ADDRESS)?;
let readings = mlx.refresh()?;
println!("object temperature: {} C", readings.object1);
# Ok(())
# }
# #[cfg(not(feature = "linux"))]
# fn main() {}
```

EEPROM writes and the flag register are not supported: [Mlx90614::write_eeprom] and
[Mlx90614::read_flags] always return [Error::NotImplemented]. */
#![cfg_attr(not(any(test, feature = "linux")), no_std)]

use core::fmt;
use core::result::Result;

use embedded_hal::i2c::I2c;
use log::{debug, info};

mod command;
mod config;
pub mod crc;
#[cfg(feature = "linux")]
mod linux;
mod temp;

pub use command::*;
pub use config::*;
#[cfg(feature = "linux")]
pub use linux::*;
pub use temp::*;

/// Factory default SMBus address.
pub const DEFAULT_ADDRESS: u8 = 0x5A;

/// RAM register addresses.
pub mod ram {
    pub const TA: u8 = 0x06;
    pub const TOBJ1: u8 = 0x07;
    pub const TOBJ2: u8 = 0x08;
}

/// EEPROM register addresses.
pub mod eeprom {
    pub const EMISSIVITY: u8 = 0x04;
    pub const CONFIG: u8 = 0x05;
    pub const SMBUS_ADDRESS: u8 = 0x0E;
    /// First of four chip ID words.
    pub const ID: u8 = 0x1C;
}

/** An I2C bus an MLX90614 can be attached to.

Buses that address every transfer individually (as `embedded_hal` buses do) have nothing to
bind, and can rely on the default implementation. Buses that keep a current slave address,
like the Linux `i2c-dev` interface, must select `address` for subsequent transfers. */
pub trait Bus: I2c {
    fn bind(&mut self, address: u8) -> Result<(), Self::Error> {
        let _ = address;
        Ok(())
    }
}

/** A struct for reading an MLX90614 via an [`embedded_hal`] implementation.

Construction verifies the device, so a live [Mlx90614] always talks to a sensor that agreed on
its address. The last temperatures read are kept, and are NaN until the first successful
[Mlx90614::refresh]. */
pub struct Mlx90614<T>
where
    T: Bus,
{
    ctx: T,
    address: u8,
    readings: Readings,
}

#[derive(Debug, PartialEq)]
/// Enum for describing possible error conditions when talking to an MLX90614.
pub enum Error<E> {
    /// A register address was not below 32, or a slave address did not fit in 7 bits.
    InvalidAddress,
    /** The bus transfer (or opening/configuring the bus) failed. Contains the error propagated
    from the [`embedded_hal`] implementation. */
    Io(E),
    /// The PEC byte sent by the device did not match the transaction.
    CrcMismatch { expected: u8, received: u8 },
    /// The device at the configured address stores a different address in its EEPROM.
    AddressMismatch { configured: u8, reported: u8 },
    /// Flag register reads and EEPROM writes are not supported.
    NotImplemented,
}

impl<E> From<crc::InvalidAddress> for Error<E> {
    fn from(_: crc::InvalidAddress) -> Self {
        Error::InvalidAddress
    }
}

impl<E> From<CommandError> for Error<E> {
    fn from(_: CommandError) -> Self {
        Error::InvalidAddress
    }
}

impl<E> fmt::Display for Error<E>
where
    E: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidAddress => write!(f, "register or slave address out of range"),
            Error::Io(e) => write!(f, "i2c bus error: {}", e),
            Error::CrcMismatch { expected, received } => write!(
                f,
                "CRC mismatch (expected {:02x}, received {:02x})",
                expected, received
            ),
            Error::AddressMismatch { configured, reported } => write!(
                f,
                "i2c address mismatch between host ({:#04x}) and device ({:#04x})",
                configured, reported
            ),
            Error::NotImplemented => write!(f, "not implemented"),
        }
    }
}

impl<E> core::error::Error for Error<E> where E: fmt::Debug + fmt::Display {}

fn check_address<E>(address: u8) -> Result<(), Error<E>> {
    if address >= 0x80 {
        Err(Error::InvalidAddress)
    } else {
        Ok(())
    }
}

#[cfg(feature = "linux")]
impl Mlx90614<LinuxBus> {
    /// Open the I2C character device at `path` (e.g. `/dev/i2c-1`) and verify the sensor.
    pub fn open<P>(path: P, address: u8) -> Result<Self, Error<LinuxBusError>>
    where
        P: AsRef<std::path::Path>,
    {
        check_address(address)?;
        let bus = LinuxBus::open(path, address).map_err(Error::Io)?;

        Mlx90614::new(bus, address)
    }
}

impl<T> Mlx90614<T>
where
    T: Bus,
{
    /// Take ownership of an already open bus and verify the sensor at `address`.
    pub fn new(ctx: T, address: u8) -> Result<Self, Error<T::Error>> {
        check_address(address)?;

        let mut mlx = Mlx90614 {
            ctx,
            address,
            readings: Readings::default(),
        };
        mlx.reset()?;

        Ok(mlx)
    }

    /// Bind the address to the bus, check it against the device and log chip information.
    pub fn reset(&mut self) -> Result<(), Error<T::Error>> {
        self.ctx.bind(self.address).map_err(Error::Io)?;

        let reported = self.read_eeprom(eeprom::SMBUS_ADDRESS)?.to_le_bytes()[0];
        if reported != self.address {
            return Err(Error::AddressMismatch {
                configured: self.address,
                reported,
            });
        }

        // Read everything before logging; `log` skips its arguments below the enabled level.
        let id = self.read_chip_id()?;
        let emissivity = self.read_emissivity()?;
        let config = u16::from(self.read_config()?);

        info!(
            "detected MLX90614 sensor @ {:#04x} with chip-ID: {:04x}.{:04x}.{:04x}.{:04x}",
            self.address, id[0], id[1], id[2], id[3]
        );
        info!("emissivity = x{}", emissivity);
        info!("config register = {:04x}", config);

        Ok(())
    }

    /** Read ambient and both object temperatures.

    Either all three stored temperatures are replaced, or, if any read fails, none are. */
    pub fn refresh(&mut self) -> Result<Readings, Error<T::Error>> {
        let ambient = self.read_ram(ram::TA)?.into();
        let object1 = self.read_ram(ram::TOBJ1)?.into();
        let object2 = self.read_ram(ram::TOBJ2)?.into();

        self.readings = Readings {
            ambient,
            object1,
            object2,
        };

        Ok(self.readings)
    }

    pub fn readings(&self) -> Readings {
        self.readings
    }

    pub fn ambient(&self) -> Temperature {
        self.readings.ambient
    }

    pub fn object1(&self) -> Temperature {
        self.readings.object1
    }

    pub fn object2(&self) -> Temperature {
        self.readings.object2
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Read one register and check its PEC.
    pub fn read(&mut self, opcode: Opcode, address: u8) -> Result<u16, Error<T::Error>> {
        let cmd = u8::from(Command::try_from((opcode, address))?);
        debug!(
            "sending command = {:02x} (opcode = {:02x}, address = {:02x})",
            cmd, opcode as u8, address
        );

        // Data LSB, data MSB, PEC.
        let mut rx = [0u8; 3];
        self.ctx
            .write_read(self.address, &[cmd], &mut rx)
            .map_err(Error::Io)?;
        debug!("rx-buffer: {:02x} {:02x} {:02x}", rx[0], rx[1], rx[2]);

        let expected = crc::pec(self.address, cmd, [rx[0], rx[1]])?;
        if expected != rx[2] {
            debug!("expected CRC: {:02x}, received CRC: {:02x}", expected, rx[2]);
            return Err(Error::CrcMismatch {
                expected,
                received: rx[2],
            });
        }

        Ok(u16::from_le_bytes([rx[0], rx[1]]))
    }

    pub fn read_ram(&mut self, address: u8) -> Result<u16, Error<T::Error>> {
        self.read(Opcode::Ram, address)
    }

    pub fn read_eeprom(&mut self, address: u8) -> Result<u16, Error<T::Error>> {
        self.read(Opcode::Eeprom, address)
    }

    pub fn read_config(&mut self) -> Result<ConfigReg, Error<T::Error>> {
        self.read_eeprom(eeprom::CONFIG).map(ConfigReg::from)
    }

    /// Emissivity as a fraction of 1.0.
    pub fn read_emissivity(&mut self) -> Result<f64, Error<T::Error>> {
        self.read_eeprom(eeprom::EMISSIVITY)
            .map(|raw| f64::from(raw) / f64::from(u16::MAX))
    }

    pub fn read_chip_id(&mut self) -> Result<[u16; 4], Error<T::Error>> {
        let mut id = [0u16; 4];

        for (word, addr) in id.iter_mut().zip(eeprom::ID..) {
            *word = self.read_eeprom(addr)?;
        }

        Ok(id)
    }

    /// Not implemented; always returns [Error::NotImplemented].
    pub fn read_flags(&mut self) -> Result<FlagReg, Error<T::Error>> {
        Err(Error::NotImplemented)
    }

    /// Not implemented; always returns [Error::NotImplemented].
    pub fn write_eeprom(&mut self, _address: u8, _data: u16) -> Result<(), Error<T::Error>> {
        Err(Error::NotImplemented)
    }

    pub fn free(self) -> T {
        self.ctx
    }
}
