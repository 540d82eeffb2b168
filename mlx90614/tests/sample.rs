use mlx90614::*;

mod common;

#[test]
fn test_sample() {
    let hal = common::setup();

    #[cfg(all(feature = "hw-tests", any(target_os = "linux", target_os = "android")))]
    sample(hal);
    #[cfg(not(all(feature = "hw-tests", any(target_os = "linux", target_os = "android"))))]
    unimplemented(hal);
}

#[cfg(all(feature = "hw-tests", any(target_os = "linux", target_os = "android")))]
fn sample<T>(hal: T) where T: Bus {
    let mut mlx = Mlx90614::new(hal, common::ADDR).unwrap();
    let readings = mlx.refresh().unwrap();

    // This test only works if the sensor sits somewhere between freezing and boiling!
    assert!(f64::from(readings.ambient) > 0.0 && f64::from(readings.ambient) < 100.0);
    assert!(readings.object1.is_known());
}

#[cfg(not(all(feature = "hw-tests", any(target_os = "linux", target_os = "android"))))]
fn unimplemented<T>(hal: T) where T: Bus {
    assert!(matches!(Mlx90614::new(hal, common::ADDR), Err(Error::Io(_))));
}
