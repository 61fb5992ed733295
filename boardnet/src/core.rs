//! Core netlist generation shared by the library API and the CLI.
//! Every call builds its own state; nothing is cached between calls.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::board::HoleLabel;
use crate::circuit::{BoardRequest, Circuit};
use crate::netlist::{render, SpiceNetlist};

#[derive(Debug, thiserror::Error)]
pub enum BoardnetError {
    #[error("Invalid request: {0}")]
    Request(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Strict mode: {0}")]
    Strict(String),
    #[error("{0}")]
    Other(String),
}

/// Options for netlist runs (library or CLI).
#[derive(Clone, Debug, Default)]
pub struct NetlistOptions {
    /// Turn the first diagnostic into an error
    pub strict: bool,
}

/// Per-request result with the rendered netlist and its diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct NetlistResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    pub netlist: SpiceNetlist,
    pub stats: NetlistStats,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetlistStats {
    pub components: usize,
    pub wires: usize,
    pub grounds: usize,
    /// Distinct `N####` nodes in the output
    pub nodes: usize,
    pub unconnected_pins: usize,
}

impl NetlistResult {
    pub fn text(&self) -> &str {
        self.netlist.text()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Diagnostics that do not stop rendering: odd hole labels and unknown kinds.
fn request_warnings(request: &BoardRequest) -> Vec<String> {
    let mut warnings = Vec::new();

    let mut seen = HashSet::new();
    for hole in request.holes() {
        if !seen.insert(hole) {
            continue;
        }
        if let Err(e) = HoleLabel::parse(hole) {
            warnings.push(format!("hole '{}': {}", hole, e));
        }
    }

    for (index, component) in request.components.iter().enumerate() {
        if !component.kind.is_known() {
            warnings.push(format!(
                "component #{} has unknown type tag {}, rendered with prefix '{}'",
                index + 1,
                component.kind.tag(),
                component.kind.prefix()
            ));
        }
    }

    warnings
}

fn circuit_warnings(circuit: &Circuit) -> Vec<String> {
    circuit
        .duplicate_designators()
        .into_iter()
        .map(|(designator, count)| {
            format!("designator '{}' is used by {} components", designator, count)
        })
        .collect()
}

/// Recursively discover board request files (`*.json`) in a directory.
pub fn discover_request_files(dir: &Path) -> Result<Vec<PathBuf>, BoardnetError> {
    let mut files = Vec::new();
    walk_dir(dir, &mut files, 0)?;
    files.sort();
    Ok(files)
}

fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>, depth: usize) -> Result<(), BoardnetError> {
    if depth > 20 {
        return Ok(());
    }
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            if name.starts_with('.') || name == "target" {
                continue;
            }
            walk_dir(&path, files, depth + 1)?;
        } else if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("json") {
            files.push(path);
        }
    }
    Ok(())
}

/// Netlist API used by both the library and the CLI.
pub struct BoardnetCore;

impl BoardnetCore {
    /// Render one board request.
    pub fn generate(
        request: &BoardRequest,
        options: NetlistOptions,
    ) -> Result<NetlistResult, BoardnetError> {
        request.check_structure()?;

        let netlist = render(&request.components, &request.wires, &request.grounds);
        let circuit = Circuit::from_netlist(&netlist);

        let mut warnings = request_warnings(request);
        warnings.extend(circuit_warnings(&circuit));

        for warning in &warnings {
            tracing::warn!("{}", warning);
        }
        if options.strict {
            if let Some(first) = warnings.first() {
                return Err(BoardnetError::Strict(first.clone()));
            }
        }

        let stats = NetlistStats {
            components: request.components.len(),
            wires: request.wires.len(),
            grounds: request.grounds.len(),
            nodes: netlist.node_count as usize,
            unconnected_pins: netlist.unconnected_pins(),
        };

        Ok(NetlistResult {
            file: None,
            netlist,
            stats,
            warnings,
        })
    }

    /// Read a JSON board request and render it.
    pub fn generate_file(
        path: &Path,
        options: NetlistOptions,
    ) -> Result<NetlistResult, BoardnetError> {
        let request = crate::load_request(path)?;
        let mut result = Self::generate(&request, options)?;
        result.file = Some(path.to_path_buf());
        Ok(result)
    }

    /// Render every request file in a directory, in path order.
    pub fn generate_project(
        dir: &Path,
        options: NetlistOptions,
    ) -> Result<Vec<NetlistResult>, BoardnetError> {
        let files = discover_request_files(dir)?;
        let mut results = Vec::with_capacity(files.len());
        for path in files {
            let result = Self::generate_file(&path, options.clone())?;
            tracing::info!(
                "{}: {} component(s), {} node(s)",
                path.display(),
                result.stats.components,
                result.stats.nodes
            );
            results.push(result);
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{Component, ComponentKind, Wire};

    fn divider() -> BoardRequest {
        let mut request = BoardRequest::new();
        request.add_component(
            Component::new(ComponentKind::Source)
                .with_terminals(["U+0", "U-0"])
                .with_value("DC 5"),
        );
        request.add_component(
            Component::new(ComponentKind::Resistor)
                .with_terminals(["A3", "A8"])
                .with_value("10k"),
        );
        request.add_component(
            Component::new(ComponentKind::Resistor)
                .with_terminals(["C8", "C14"])
                .with_value("10k"),
        );
        request.add_wire(Wire::new("U+3", "E3"));
        request.add_wire(Wire::new("E8", "J8"));
        request.add_wire(Wire::new("E14", "U-14"));
        request.add_ground("U-1");
        request
    }

    #[test]
    fn test_generate_divider() {
        let result = BoardnetCore::generate(&divider(), NetlistOptions::default()).unwrap();
        assert_eq!(
            result.text(),
            "V1 N0001 0 DC 5\nR1 N0001 N0002 10k\nR2 N0002 0 10k\n.backanno\n.end\n"
        );
        assert_eq!(result.stats.components, 3);
        assert_eq!(result.stats.wires, 3);
        assert_eq!(result.stats.grounds, 1);
        assert_eq!(result.stats.nodes, 2);
        assert_eq!(result.stats.unconnected_pins, 0);
        assert!(!result.has_warnings());
        assert!(result.file.is_none());
    }

    #[test]
    fn test_structure_error() {
        let mut request = divider();
        request.add_component(Component::new(ComponentKind::Resistor).with_terminals(["A1"]));
        let err = BoardnetCore::generate(&request, NetlistOptions::default()).unwrap_err();
        assert!(matches!(err, BoardnetError::Request(_)));
    }

    #[test]
    fn test_bad_labels_warn() {
        let mut request = BoardRequest::new();
        request.add_component(
            Component::new(ComponentKind::Resistor)
                .with_terminals(["", "Z9"])
                .with_value("1k"),
        );
        let result = BoardnetCore::generate(&request, NetlistOptions::default()).unwrap();
        assert_eq!(result.warnings.len(), 2);
        assert!(result.warnings[0].contains("empty hole label"));
        assert!(result.warnings[1].contains("Z9"));
        assert_eq!(result.text(), "R1 NC NC 1k\n.backanno\n.end\n");
    }

    #[test]
    fn test_repeated_label_warns_once() {
        let mut request = BoardRequest::new();
        request.add_component(
            Component::new(ComponentKind::Resistor).with_terminals(["A99", "A99"]),
        );
        request.add_ground("A99");
        let result = BoardnetCore::generate(&request, NetlistOptions::default()).unwrap();
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_unknown_kind_and_duplicate_source_warn() {
        let mut request = divider();
        request.add_component(
            Component::new(ComponentKind::Source).with_terminals(["L+0", "L-0"]),
        );
        request.add_component(Component::new(ComponentKind::Other(11)).with_terminals(["F1", "F2"]));
        let result = BoardnetCore::generate(&request, NetlistOptions::default()).unwrap();
        assert!(result.warnings.iter().any(|w| w.contains("unknown type tag 11")));
        assert!(result.warnings.iter().any(|w| w.contains("'V1' is used by 2")));
    }

    #[test]
    fn test_strict_mode_rejects_warnings() {
        let mut request = divider();
        request.add_ground("K1");
        let err = BoardnetCore::generate(&request, NetlistOptions { strict: true }).unwrap_err();
        assert!(matches!(err, BoardnetError::Strict(_)));

        assert!(BoardnetCore::generate(&divider(), NetlistOptions { strict: true }).is_ok());
    }

    #[test]
    fn test_generate_file_and_project() {
        let dir = tempfile::tempdir().unwrap();
        let json = serde_json::to_string(&divider()).unwrap();
        std::fs::write(dir.path().join("b.json"), &json).unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested").join("a.json"), &json).unwrap();
        std::fs::create_dir(dir.path().join(".hidden")).unwrap();
        std::fs::write(dir.path().join(".hidden").join("c.json"), &json).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not a request").unwrap();

        let files = discover_request_files(dir.path()).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("b.json"));
        assert!(files[1].ends_with("nested/a.json"));

        let result =
            BoardnetCore::generate_file(&files[0], NetlistOptions::default()).unwrap();
        assert_eq!(result.file.as_deref(), Some(files[0].as_path()));

        let results = BoardnetCore::generate_project(dir.path(), NetlistOptions::default()).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].text(), results[1].text());
    }

    #[test]
    fn test_generate_file_errors() {
        let err = BoardnetCore::generate_file(Path::new("missing.json"), NetlistOptions::default())
            .unwrap_err();
        assert!(matches!(err, BoardnetError::Io(_)));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = BoardnetCore::generate_file(&path, NetlistOptions::default()).unwrap_err();
        assert!(matches!(err, BoardnetError::Json(_)));
    }
}
