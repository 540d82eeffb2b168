use std::io;
use std::os::unix::io::RawFd;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, SystemTime};

use argh::FromArgs;
use eyre::Result;
use log::{info, LevelFilter};
use nix::errno::Errno;
use nix::libc::STDIN_FILENO;
use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};
use nix::unistd::close;

use mlx90614::{Mlx90614, DEFAULT_ADDRESS};

mod output;
mod sample;

use output::write_locked;
use sample::Sample;

const SAMPLE_PERIOD: Duration = Duration::from_secs(1);

static RUNNING: AtomicBool = AtomicBool::new(true);

#[derive(FromArgs)]
#[argh(description = "stream mlx90614 object temperature as CSV lines on stdout")]
struct InputArgs {
    #[argh(positional, description = "i2c bus device, e.g. /dev/i2c-1")]
    bus: String,
    #[argh(positional, description = "location written into every line")]
    location: String,
    #[argh(option, short = 'a', default = "DEFAULT_ADDRESS", from_str_fn(from_base_16), description = "sensor address in hex (default 5a)")]
    addr: u8,
}

fn from_base_16(val: &str) -> Result<u8, String> {
    let no_prefix = val.trim_start_matches("0x");

    match u8::from_str_radix(no_prefix, 16) {
        Ok(v) if v < 0x80 => Ok(v),
        Ok(_) => Err("Address must fit in 7 bits".into()),
        Err(_) => Err("Unable to convert address from base 16".into()),
    }
}

extern "C" fn on_signal(_: nix::libc::c_int) {
    RUNNING.store(false, Ordering::SeqCst);
}

/* The stop flag is only checked between samples; SA_RESTART keeps a signal from cutting a bus
transfer short. */
fn install_handlers() -> nix::Result<()> {
    let action = SigAction::new(
        SigHandler::Handler(on_signal),
        SaFlags::SA_RESTART,
        SigSet::empty(),
    );

    for sig in [Signal::SIGINT, Signal::SIGTERM, Signal::SIGHUP, Signal::SIGQUIT] {
        // SAFETY: the handler only stores to an atomic.
        unsafe { sigaction(sig, &action) }?;
    }

    Ok(())
}

/// Close an input the sampler never reads. An already closed descriptor is fine.
fn close_input(fd: RawFd) -> nix::Result<()> {
    match close(fd) {
        Err(Errno::EBADF) => Ok(()),
        res => res,
    }
}

fn sample_loop(mlx: &mut Mlx90614<mlx90614::LinuxBus>, location: &str) -> Result<()> {
    let stdout = io::stdout();

    while RUNNING.load(Ordering::SeqCst) {
        let readings = mlx.refresh()?;
        let sample = Sample::new(SystemTime::now(), location, readings.object1.into())?;

        write_locked(&mut stdout.lock(), &sample)?;
        thread::sleep(SAMPLE_PERIOD);
    }

    Ok(())
}

fn main() -> Result<()> {
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let args: InputArgs = argh::from_env();
    close_input(STDIN_FILENO)?;
    install_handlers()?;

    let mut mlx = Mlx90614::open(&args.bus, args.addr)?;
    sample_loop(&mut mlx, &args.location)?;

    info!("bye!");
    Ok(())
}
