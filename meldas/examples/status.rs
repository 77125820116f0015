//! Status query example against the simulated controller

use meldas::{Axis, Hub, ProgramType};
use meldas_driver::SimController;

fn main() -> meldas::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let addr = std::env::var("CNC_ADDR").unwrap_or_else(|_| "192.168.1.20:683".to_string());

    // Swap the simulated controller for the vendor driver on real hardware
    let sim = SimController::new();
    sim.set_positions(120.5, -42.0, 88.25);
    sim.set_run_status(1);
    sim.set_spindle(8000, 35);
    sim.set_program_numbers("4711", "0");

    let hub = Hub::new(move |_| Box::new(sim.driver()));
    let session = hub.session(&addr)?;

    println!("Probing {addr}...");
    if !session.probe_open() {
        println!("✗ Controller unreachable");
        return Ok(());
    }
    println!("✓ Connected");

    println!("version:    {}", session.version()?);
    println!("drives:     {}", session.drive_information()?);
    println!("run status: {:?}", session.run_status()?);
    println!("program:    {}", session.program_number(ProgramType::Main)?);
    println!("spindle:    {} rpm, {} %", session.spindle_speed()?, session.spindle_load()?);
    for axis in [Axis::X, Axis::Y, Axis::Z] {
        println!("{axis:?}:          {:.3}", session.current_position(axis)?);
    }

    session.close();
    println!("✓ Closed");

    Ok(())
}
