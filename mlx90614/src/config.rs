use modular_bitfield::prelude::*;

/* Both registers are 16 bits wide and arrive LSB first. Fields are declared LSB first with
explicit widths, so the decode does not depend on how a compiler packs bit-fields. */

/// Single or dual thermopile sensor, bit 6 of [ConfigReg].
#[derive(BitfieldSpecifier, Debug, PartialEq, Eq, Clone, Copy)]
#[bits = 1]
pub enum SensorMode {
    Single = 0,
    Dual = 1,
}

/** EEPROM register `0x05`.

| Bits  | Field          |
|-------|----------------|
| 2:0   | IIR filter     |
| 3     | repeat test    |
| 5:4   | reserved       |
| 6     | single/dual    |
| 7     | KS sign        |
| 10:8  | FIR filter     |
| 13:11 | amplifier gain |
| 14    | KT2 sign       |
| 15    | test enabled   | */
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigReg {
    pub iir: B3,
    pub repeat_test: bool,
    #[skip]
    __: B2,
    pub sensor_mode: SensorMode,
    pub ks_negative: bool,
    pub fir: B3,
    pub gain: B3,
    pub kt2_negative: bool,
    pub test_enabled: bool,
}

/** RAM flag register (SMBus command `0xF0`).

| Bits | Field                             |
|------|-----------------------------------|
| 3:0  | reserved                          |
| 4    | POR initialization, active low    |
| 5    | EEPROM double error, active high  |
| 6    | reserved                          |
| 7    | EEPROM busy, active high          |
| 15:8 | reserved                          |

Decoding is provided for completeness; [crate::Mlx90614::read_flags] is not implemented. */
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagReg {
    #[skip]
    __: B4,
    pub init_n: bool,
    pub ee_dead: bool,
    #[skip]
    __: B1,
    pub ee_busy: bool,
    #[skip]
    __: B8,
}

impl FlagReg {
    /// The power-on initialization routine is still running.
    pub fn initializing(&self) -> bool {
        !self.init_n()
    }
}

impl From<u16> for ConfigReg {
    fn from(raw: u16) -> Self {
        ConfigReg::from_bytes(raw.to_le_bytes())
    }
}

impl From<ConfigReg> for u16 {
    fn from(reg: ConfigReg) -> u16 {
        u16::from_le_bytes(reg.into_bytes())
    }
}

impl From<u16> for FlagReg {
    fn from(raw: u16) -> Self {
        FlagReg::from_bytes(raw.to_le_bytes())
    }
}

impl From<FlagReg> for u16 {
    fn from(reg: FlagReg) -> u16 {
        u16::from_le_bytes(reg.into_bytes())
    }
}
