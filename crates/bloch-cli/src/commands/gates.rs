//! Gates command implementation.

use console::style;

use bloch_ir::GateId;

/// Execute the gates command.
pub fn execute() {
    println!("{} Supported gates:", style("→").cyan().bold());
    println!();
    for gate in GateId::ALL {
        let params = gate.angle_param().unwrap_or("");
        let arity = match gate.num_qubits() {
            1 => "1 qubit",
            _ => "2 qubits",
        };
        println!(
            "  {:<8} {:<9} {}",
            style(gate.name()).cyan(),
            arity,
            style(params).dim()
        );
    }
    println!();
    println!("Angles: numbers in radians, or pi multiples such as pi/2, -pi/4, 3*pi/4");
}
