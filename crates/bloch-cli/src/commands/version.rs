//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - exact quantum circuit simulation with noise",
        style("Bloch").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  bloch-ir   Circuit description and linearization");
    println!("  bloch-sim  Statevector and density-matrix engine");
    println!("  bloch-cli  Command-line interface");
    println!();
    println!("License:    {}", style(env!("CARGO_PKG_LICENSE")).dim());
}
