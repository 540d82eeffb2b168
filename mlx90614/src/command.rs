/// Address space selected by the top bits of a command byte.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[repr(u8)]
pub enum Opcode {
    Ram = 0b000_00000,
    Eeprom = 0b001_00000,
}

/// A command byte for a register read: an [Opcode] OR'd with a 5-bit register address.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Command(u8);

#[derive(Debug, PartialEq, Eq)]
pub enum CommandError {
    AddressOutOfRange,
}

impl TryFrom<(Opcode, u8)> for Command {
    type Error = CommandError;

    fn try_from(val: (Opcode, u8)) -> Result<Self, Self::Error> {
        if val.1 >= 32 {
            Err(CommandError::AddressOutOfRange)
        } else {
            Ok(Command(val.0 as u8 | (val.1 & 0b0001_1111)))
        }
    }
}

impl From<Command> for u8 {
    fn from(cmd: Command) -> u8 {
        cmd.0
    }
}
