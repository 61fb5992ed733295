//! Simple netlist example: render a board request file, or a built-in LED
//! circuit when no path is given.

use boardnet::prelude::*;
use std::path::Path;

fn led_board() -> BoardRequest {
    let mut request = BoardRequest::new();
    request.add_component(
        Component::new(ComponentKind::Source)
            .with_terminals(["U+0", "U-0"])
            .with_value("DC 5"),
    );
    request.add_component(
        Component::new(ComponentKind::Resistor)
            .with_terminals(["A10", "A14"])
            .with_value("330"),
    );
    request.add_component(
        Component::new(ComponentKind::Led)
            .with_terminals(["F14", "F18"])
            .with_value("red"),
    );
    request.add_wire(Wire::new("U+10", "E10").with_name("Wire 1").with_color("red"));
    request.add_wire(Wire::new("D14", "G14").with_name("Wire 2"));
    request.add_wire(Wire::new("J18", "U-18").with_name("Wire 3").with_color("black"));
    request.add_ground("U-0");
    request
}

fn main() -> Result<(), BoardnetError> {
    let options = NetlistOptions::default();

    let result = match std::env::args().nth(1) {
        Some(path) => {
            let path = Path::new(&path);
            if !path.exists() {
                eprintln!("File not found: {}", path.display());
                eprintln!("Usage: cargo run --example simple_netlist [path/to/board.json]");
                std::process::exit(1);
            }
            BoardnetCore::generate_file(path, options)?
        }
        None => BoardnetCore::generate(&led_board(), options)?,
    };

    print!("{}", result.text());
    println!();
    println!("Nodes:       {}", result.stats.nodes);
    println!("Unconnected: {}", result.stats.unconnected_pins);
    for warning in &result.warnings {
        println!("warning: {}", warning);
    }

    Ok(())
}
