//! Runs in its own test binary so that the periodic table is first loaded here.
use chemic::Molecule;
use chemic::settings::with_config;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

#[test]
fn test_first_table_use_inside_config_closure() {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        let mass = with_config(|_| Molecule::from_formula_string("H2O").map(|m| m.mass()));
        let _ = sender.send(mass);
    });
    let mass = receiver
        .recv_timeout(Duration::from_secs(5))
        .expect("loading the periodic table inside with_config did not return")
        .unwrap();
    assert!((mass - 18.015).abs() < 1e-2);
}
