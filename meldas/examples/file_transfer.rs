//! NC program transfer example against the simulated controller

use meldas::Hub;
use meldas_driver::SimController;

fn main() -> meldas::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let addr = std::env::var("CNC_ADDR").unwrap_or_else(|_| "192.168.1.20:683".to_string());

    let sim = SimController::new();
    sim.add_folder("M01:\\PRG\\USER\\", "FIXTURES", 4096);
    sim.add_dir_file("M01:\\PRG\\USER\\", "100", 19, Some("FACE MILL"));

    let hub = Hub::new(move |_| Box::new(sim.driver()));
    let session = hub.session(&addr)?;

    let path = "M01:\\PRG\\USER\\200";
    let program = b"%\nO200 (DRILL PLATE)\nG90 G54\nM30\n%\n";

    println!("Writing {path}...");
    session.write_file(path, program)?;

    let read_back = session.read_file(path)?;
    assert_eq!(&read_back[..], program);
    println!("✓ Round-tripped {} bytes", read_back.len());

    println!("Listing M01:\\PRG\\USER\\ ...");
    for entry in session.list_dir("M01:\\PRG\\USER\\")? {
        let comment = entry.comment.as_deref().unwrap_or("-");
        println!("  {:?} {} {} {}", entry.kind, entry.name, entry.size, comment);
    }

    session.delete_file(path)?;
    println!("✓ Deleted {path}");

    Ok(())
}
