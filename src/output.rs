use std::fmt::Display;
use std::io::{self, Write};
use std::os::unix::io::AsRawFd;

use nix::fcntl::{flock, FlockArg};

/** Write `line` and a newline to `out` under an exclusive `flock(2)`, flushing before the lock
is released.

Several samplers may share one stdout (e.g. a pipe into a collector); holding the lock keeps
their lines from interleaving. */
pub fn write_locked<W, L>(out: &mut W, line: &L) -> io::Result<()>
where
    W: Write + AsRawFd,
    L: Display + ?Sized,
{
    let fd = out.as_raw_fd();

    flock(fd, FlockArg::LockExclusive)?;
    let written = writeln!(out, "{}", line).and_then(|_| out.flush());
    flock(fd, FlockArg::Unlock)?;

    written
}
