use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(any(target_os = "linux", target_os = "android"))] {
        use mlx90614::*;
        use argh::FromArgs;
        use eyre::Result;

        #[derive(FromArgs)]
        #[argh(description = "dump mlx90614 identification and configuration")]
        struct InputArgs {
            #[argh(positional)]
            bus: String,
            #[argh(positional, from_str_fn(from_base_16), default = "DEFAULT_ADDRESS")]
            addr: u8,
        }

        fn from_base_16(val: &str) -> Result<u8, String> {
            let no_prefix = val.trim_start_matches("0x");

            match u8::from_str_radix(no_prefix, 16) {
                Ok(v) => Ok(v),
                Err(_) => {
                    Err("Unable to convert address from base 16".into())
                }
            }
        }
    }
}

#[cfg(any(target_os = "linux", target_os = "android"))]
fn main() -> Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args: InputArgs = argh::from_env();

    let mut mlx = Mlx90614::open(&args.bus, args.addr)?;

    let id = mlx.read_chip_id()?;
    println!(
        "chip ID:    {:04x}.{:04x}.{:04x}.{:04x}",
        id[0], id[1], id[2], id[3]
    );
    println!("emissivity: {:.4}", mlx.read_emissivity()?);

    let cfg = mlx.read_config()?;
    println!("config:     {:04x}", u16::from(cfg));
    println!("  IIR:          {:03b}", cfg.iir());
    println!("  repeat test:  {}", cfg.repeat_test());
    println!("  sensor mode:  {:?}", cfg.sensor_mode());
    println!("  KS negative:  {}", cfg.ks_negative());
    println!("  FIR:          {:03b}", cfg.fir());
    println!("  gain:         {:03b}", cfg.gain());
    println!("  KT2 negative: {}", cfg.kt2_negative());
    println!("  test enabled: {}", cfg.test_enabled());

    let readings = mlx.refresh()?;
    println!(
        "ambient {:.2} C, object 1 {:.2} C, object 2 {:.2} C",
        f64::from(readings.ambient),
        f64::from(readings.object1),
        f64::from(readings.object2)
    );

    let _i2c_old = mlx.free();

    Ok(())
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
fn main() {}
