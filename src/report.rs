//! Output formatting for gap checks.
//!
//! Supports two output formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: structured output for programmatic consumption

use std::path::Path;

use colored::*;
use serde::{Deserialize, Serialize};

use crate::compare::source_missing_interface_members;
use crate::config::CheckConfig;
use crate::model::{LoadError, Model, SourceGraph};
use crate::syntax::{format_member, FormatOptions};

/// Result of checking every loaded source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckReport {
    pub version: String,
    pub passed: bool,
    pub sources_checked: usize,
    pub missing_count: usize,
    pub load_error_count: usize,
    pub sources: Vec<SourceReport>,
}

/// Gaps and load errors of one source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceReport {
    pub name: String,
    /// Manifest file the source was loaded from.
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
    pub containers: Vec<ContainerReport>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub load_errors: Vec<LoadErrorEntry>,
}

/// Interface members one class or structure leaves unimplemented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerReport {
    pub container: String,
    pub kind: String,
    pub missing: Vec<MissingMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingMember {
    pub path: String,
    /// Interface that declares the member.
    pub interface: String,
    pub kind: String,
    pub declaration: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadErrorEntry {
    pub kind: String,
    pub path: String,
    pub message: String,
}

impl From<&LoadError> for LoadErrorEntry {
    fn from(error: &LoadError) -> Self {
        Self {
            kind: error.kind.as_str().to_string(),
            path: error.path.to_string(),
            message: error.message.clone(),
        }
    }
}

impl SourceReport {
    /// Run the gap scan over a graph.
    pub fn from_graph(path: &Path, graph: &SourceGraph) -> Self {
        let source = graph.source();
        let gaps = source_missing_interface_members(graph.store(), source);
        let options = FormatOptions::signature_only();
        let containers = gaps
            .iter()
            .map(|entry| ContainerReport {
                container: entry.container.lookup_path().to_string(),
                kind: entry.container.kind().keyword().to_string(),
                missing: entry
                    .missing
                    .iter()
                    .map(|member| MissingMember {
                        path: member.lookup_path().to_string(),
                        interface: member
                            .parent_path()
                            .map(ToString::to_string)
                            .unwrap_or_default(),
                        kind: member.kind().as_str().to_string(),
                        declaration: format_member(member, &options),
                    })
                    .collect(),
            })
            .collect();

        Self {
            name: source.name().to_string(),
            path: path.display().to_string(),
            document: source.source_document().map(|d| d.display().to_string()),
            containers,
            load_errors: graph.load_errors().into_iter().map(LoadErrorEntry::from).collect(),
        }
    }

    pub fn missing_count(&self) -> usize {
        self.containers.iter().map(|c| c.missing.len()).sum()
    }
}

impl CheckReport {
    pub fn new(sources: Vec<SourceReport>, check: &CheckConfig) -> Self {
        let missing_count: usize = sources.iter().map(SourceReport::missing_count).sum();
        let load_error_count: usize = sources.iter().map(|s| s.load_errors.len()).sum();
        let passed = !(check.fail_on_missing && missing_count > 0)
            && !(check.fail_on_load_errors && load_error_count > 0);
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            passed,
            sources_checked: sources.len(),
            missing_count,
            load_error_count,
            sources,
        }
    }
}

/// Write results in JSON format.
pub fn write_json(report: &CheckReport) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{}", json);
    Ok(())
}

/// Write results in pretty format with colors.
pub fn write_pretty(report: &CheckReport) {
    // Header
    println!();
    print!("  ");
    print!("{}", "codemodel".cyan().bold());
    println!(" v{}", report.version);
    println!();

    for source in &report.sources {
        write_source(source);
    }

    write_final_status(report);
    println!();
}

fn write_source(source: &SourceReport) {
    print!("  {}", "Source: ".dimmed());
    print!("{}", source.name.bold());
    println!("  {}", source.path.dimmed());
    if let Some(document) = &source.document {
        print!("  {}", "Document: ".dimmed());
        println!("{}", document);
    }
    println!();

    if source.containers.is_empty() {
        println!("    {}", "No interface gaps".green());
        println!();
    }
    for container in &source.containers {
        println!(
            "    {} {} ({} missing):",
            container.kind.dimmed(),
            container.container.blue(),
            container.missing.len()
        );
        for member in &container.missing {
            print!("      {} ", "MISSING".red());
            print!("{:<10}", member.kind.dimmed());
            println!("{}", member.declaration);
            println!("{}", format!("                 from {}", member.interface).dimmed());
        }
        println!();
    }

    if !source.load_errors.is_empty() {
        println!("    {} ({}):", "Load errors".bold(), source.load_errors.len());
        for error in &source.load_errors {
            print!("      {} ", "WARN ".yellow());
            print!("{:<22}", error.kind.dimmed());
            println!("{}", error.path.blue());
            println!("            {}", error.message);
        }
        println!();
    }
}

fn write_final_status(report: &CheckReport) {
    let summary = format!(
        "{} source(s), {} missing member(s), {} load error(s)",
        report.sources_checked, report.missing_count, report.load_error_count
    );
    if report.passed {
        println!("  {}  {}", "✓ PASS".green(), summary);
    } else {
        println!("  {}  {}", "✗ FAIL".red(), summary);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{build_source, SourceManifest};

    fn graph() -> SourceGraph {
        let yaml = r#"
name: shapes
namespace: Geometry
document: src/Shapes.cs
interfaces:
  - name: IShape
    members:
      - { kind: method, name: Area, returns: double }
      - { kind: method, name: Perimeter, returns: double }
classes:
  - name: Square
    interfaces: [IShape, IMissing]
    members:
      - { kind: method, name: Perimeter, returns: double, security: public }
"#;
        build_source(&SourceManifest::from_yaml_str(yaml).unwrap())
    }

    #[test]
    fn test_source_report() {
        let report = SourceReport::from_graph(Path::new("testdata/shapes.yaml"), &graph());
        assert_eq!(report.name, "shapes");
        assert_eq!(report.document.as_deref(), Some("src/Shapes.cs"));
        assert_eq!(report.containers.len(), 1);

        let square = &report.containers[0];
        assert_eq!(square.container, "Geometry.Square");
        assert_eq!(square.kind, "class");
        assert_eq!(square.missing.len(), 1);
        assert_eq!(square.missing[0].path, "Geometry.IShape.Area()");
        assert_eq!(square.missing[0].interface, "Geometry.IShape");
        assert_eq!(square.missing[0].kind, "method");
        assert_eq!(square.missing[0].declaration, "double Area()");

        assert_eq!(report.load_errors.len(), 1);
        assert_eq!(report.load_errors[0].kind, "unresolved_reference");
        assert_eq!(report.load_errors[0].path, "Geometry.Square");
    }

    #[test]
    fn test_pass_depends_on_config() {
        let sources = vec![SourceReport::from_graph(Path::new("shapes.yaml"), &graph())];

        let report = CheckReport::new(sources.clone(), &CheckConfig::default());
        assert!(!report.passed);
        assert_eq!(report.missing_count, 1);
        assert_eq!(report.load_error_count, 1);

        let lenient = CheckConfig {
            fail_on_missing: false,
            fail_on_load_errors: false,
        };
        assert!(CheckReport::new(sources.clone(), &lenient).passed);

        let strict_errors = CheckConfig {
            fail_on_missing: false,
            fail_on_load_errors: true,
        };
        assert!(!CheckReport::new(sources, &strict_errors).passed);
    }

    #[test]
    fn test_attribute_errors_fail_the_check() {
        let yaml = r#"
name: marked
classes:
  - name: Widget
    attributes:
      - name: Marker
        arguments: [{ value: { enum: "NoDot" } }]
"#;
        let graph = build_source(&SourceManifest::from_yaml_str(yaml).unwrap());
        let sources = vec![SourceReport::from_graph(Path::new("marked.yaml"), &graph)];
        let strict_errors = CheckConfig {
            fail_on_missing: true,
            fail_on_load_errors: true,
        };
        let report = CheckReport::new(sources, &strict_errors);

        assert_eq!(report.missing_count, 0);
        assert_eq!(report.load_error_count, 1);
        assert_eq!(report.sources[0].load_errors[0].kind, "invalid_value");
        assert!(!report.passed);
    }

    #[test]
    fn test_json_shape() {
        let sources = vec![SourceReport::from_graph(Path::new("shapes.yaml"), &graph())];
        let report = CheckReport::new(sources, &CheckConfig::default());
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["passed"], false);
        assert_eq!(
            value["sources"][0]["containers"][0]["missing"][0]["interface"],
            "Geometry.IShape"
        );

        let json = serde_json::to_string(&report).unwrap();
        let parsed: CheckReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, report);
    }
}
