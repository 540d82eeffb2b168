/*! Packet Error Check (PEC) for the MLX90614 SMBus-compatible interface.

Every read from the sensor ends with a CRC-8 over the whole transaction, addressing bytes
included. The polynomial is x^8 + x^2 + x^1 + x^0, shifted MSB first, starting from zero. */

/// Low 8 bits of x^8 + x^2 + x^1 + x^0. The x^8 term falls off the top of a `u8` shift.
pub const POLY: u8 = 0x07;

/// The slave address given to [Crc8::put_slave_address] did not fit in 7 bits.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct InvalidAddress;

/// Running CRC-8 accumulator.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct Crc8 {
    crc: u8,
}

impl Crc8 {
    pub const fn new() -> Self {
        Crc8 { crc: 0 }
    }

    pub fn put_data_byte(&mut self, byte: u8) {
        self.crc ^= byte;

        for _ in 0..8 {
            if self.crc & 0x80 != 0 {
                self.crc = (self.crc << 1) ^ POLY;
            } else {
                self.crc <<= 1;
            }
        }
    }

    /** Feed the address byte that goes on the wire for a 7-bit `address`, with the R/W bit set
    when `read_mode` is true. */
    pub fn put_slave_address(&mut self, address: u8, read_mode: bool) -> Result<(), InvalidAddress> {
        if address >= 0x80 {
            return Err(InvalidAddress);
        }

        self.put_data_byte((address << 1) | u8::from(read_mode));
        Ok(())
    }

    pub fn value(&self) -> u8 {
        self.crc
    }

    pub fn reset(&mut self) {
        self.crc = 0;
    }
}

/** Expected PEC of a register read: the sensor at `address` was sent `command` and answered
with `data` (LSB first).

The checksum covers, in order: address + write bit, the command, address + read bit (the
repeated start), then both data bytes. */
pub fn pec(address: u8, command: u8, data: [u8; 2]) -> Result<u8, InvalidAddress> {
    let mut crc = Crc8::new();

    crc.put_slave_address(address, false)?;
    crc.put_data_byte(command);
    crc.put_slave_address(address, true)?;
    crc.put_data_byte(data[0]);
    crc.put_data_byte(data[1]);

    Ok(crc.value())
}
