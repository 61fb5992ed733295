//! Boardnet CLI - breadboard netlist generation from the command line.

use clap::{Parser, Subcommand, ValueEnum};
use boardnet::{BoardnetCore, Circuit, ComponentKind, NetlistOptions, NetlistResult};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "boardnet")]
#[command(about = "Breadboard to SPICE netlist generator", long_about = None)]
#[command(version)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the netlist for a board request file
    Netlist {
        /// Path to a JSON board request
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "spice")]
        format: NetlistFormat,

        /// Write the netlist text to this file instead of stdout
        #[arg(short, long, value_name = "OUT")]
        output: Option<PathBuf>,

        /// Treat label, kind and designator warnings as errors
        #[arg(long)]
        strict: bool,
    },

    /// List the nets of a board and the component pins on each
    Nets {
        /// Path to a JSON board request
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: ReportFormat,
    },

    /// Generate netlists for every request file in a directory
    Project {
        /// Path to project directory
        #[arg(value_name = "DIR", default_value = ".")]
        dir: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: ReportFormat,

        /// Treat label, kind and designator warnings as errors
        #[arg(long)]
        strict: bool,
    },

    /// List component type tags and their netlist prefixes
    Kinds {
        /// Show terminal counts
        #[arg(short, long)]
        arity: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum NetlistFormat {
    /// Netlist text exactly as the simulator reads it
    Spice,
    /// JSON document with netlist, stats and warnings
    Json,
}

#[derive(Clone, ValueEnum)]
enum ReportFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match cli.command {
        Commands::Netlist {
            file,
            format,
            output,
            strict,
        } => handle_netlist(&file, format, output.as_deref(), strict),
        Commands::Nets { file, format } => handle_nets(&file, format),
        Commands::Project {
            dir,
            format,
            strict,
        } => handle_project(&dir, format, strict),
        Commands::Kinds { arity } => {
            handle_kinds(arity);
            0
        }
    };

    process::exit(exit_code);
}

fn to_json_string(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

fn handle_netlist(
    file: &Path,
    format: NetlistFormat,
    output: Option<&Path>,
    strict: bool,
) -> i32 {
    let result = match BoardnetCore::generate_file(file, NetlistOptions { strict }) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let rendered = match format {
        NetlistFormat::Spice => result.text().to_string(),
        NetlistFormat::Json => {
            let mut json = to_json_string(&result_json(&result));
            json.push('\n');
            json
        }
    };

    match output {
        Some(path) => {
            if let Err(e) = std::fs::write(path, rendered) {
                eprintln!("Error: {}: {}", path.display(), e);
                return 1;
            }
        }
        None => print!("{}", rendered),
    }
    0
}

fn result_json(result: &NetlistResult) -> serde_json::Value {
    serde_json::json!({
        "file": result.file.as_ref().map(|f| f.display().to_string()),
        "netlist": result.text(),
        "lines": result.netlist.lines.iter().map(|line| {
            serde_json::json!({
                "designator": line.designator,
                "type": line.kind.tag(),
                "nodes": line.nodes.iter().map(|n| n.to_string()).collect::<Vec<_>>(),
                "spec": line.spec,
            })
        }).collect::<Vec<_>>(),
        "stats": result.stats,
        "warnings": result.warnings,
    })
}

fn handle_nets(file: &Path, format: ReportFormat) -> i32 {
    let result = match BoardnetCore::generate_file(file, NetlistOptions::default()) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let circuit = Circuit::from_netlist(&result.netlist);

    match format {
        ReportFormat::Human => output_nets_human(&circuit),
        ReportFormat::Json => output_nets_json(&circuit),
    }
    0
}

fn output_nets_human(circuit: &Circuit) {
    for net in circuit.nets() {
        println!("{}", net);
        for pin in circuit.components_on_net(net) {
            println!("    {} pin {}", pin.designator, pin.pin + 1);
        }
    }

    let unconnected = circuit.unconnected_pins();
    if !unconnected.is_empty() {
        println!("NC");
        for pin in unconnected {
            println!("    {} pin {}", pin.designator, pin.pin + 1);
        }
    }

    let stats = circuit.stats();
    println!();
    println!("Summary:");
    println!("    Components:  {}", stats.component_count);
    println!("    Nets:        {}", stats.net_count);
    println!("    Connections: {}", stats.connection_count);
    println!("    Unconnected: {}", stats.unconnected_count);
}

fn output_nets_json(circuit: &Circuit) {
    let output = serde_json::json!({
        "nets": circuit.nets().into_iter().map(|net| {
            serde_json::json!({
                "net": net.to_string(),
                "pins": circuit.components_on_net(net),
            })
        }).collect::<Vec<_>>(),
        "unconnected": circuit.unconnected_pins(),
        "stats": circuit.stats(),
    });
    println!("{}", to_json_string(&output));
}

fn handle_project(dir: &Path, format: ReportFormat, strict: bool) -> i32 {
    match BoardnetCore::generate_project(dir, NetlistOptions { strict }) {
        Ok(results) => {
            match format {
                ReportFormat::Human => output_project_human(&results),
                ReportFormat::Json => output_project_json(&results),
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn output_project_human(results: &[NetlistResult]) {
    if results.is_empty() {
        println!("No board request files found");
        return;
    }
    for result in results {
        if let Some(file) = &result.file {
            println!("\nFile: {}", file.display());
        }
        println!("{}", "─".repeat(60));
        print!("{}", result.text());

        if result.has_warnings() {
            println!("\n  Warnings:");
            for warning in &result.warnings {
                println!("    - {}", warning);
            }
        }

        println!("\n  Summary:");
        println!("    Components:  {}", result.stats.components);
        println!("    Wires:       {}", result.stats.wires);
        println!("    Nodes:       {}", result.stats.nodes);
        println!("    Unconnected: {}", result.stats.unconnected_pins);
    }
}

fn output_project_json(results: &[NetlistResult]) {
    let output = serde_json::json!({
        "results": results.iter().map(result_json).collect::<Vec<_>>(),
        "summary": {
            "total_files": results.len(),
            "total_warnings": results.iter().map(|r| r.warnings.len()).sum::<usize>(),
        }
    });
    println!("{}", to_json_string(&output));
}

fn handle_kinds(show_arity: bool) {
    println!("Component types:\n");

    let mut kinds: Vec<ComponentKind> = ComponentKind::KNOWN.to_vec();
    kinds.push(ComponentKind::Other(8));

    for kind in kinds {
        let tag = if kind.is_known() {
            kind.tag().to_string()
        } else {
            "other".to_string()
        };
        let name = if kind.is_known() {
            kind.to_string()
        } else {
            "Unknown".to_string()
        };
        println!("  {:>5}  {:<5} {}", tag, kind.prefix(), name);
        if show_arity {
            println!("         terminals: {}", kind.arity());
        }
    }
}
