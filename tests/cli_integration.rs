//! Tests for manifest collection, check reports and declaration rendering.

use std::path::PathBuf;

use codemodel::cli::{check_report, collect_manifests, show_output, CheckArgs, ShowArgs};
use codemodel::config::Config;
use pretty_assertions::assert_eq;

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

fn config_path() -> PathBuf {
    testdata_path().join("codemodel.yaml")
}

fn show_args(model: Option<&str>) -> ShowArgs {
    ShowArgs {
        path: testdata_path().join("shapes.yaml"),
        model: model.map(str::to_string),
        config: Some(config_path()),
        no_security: false,
        no_attributes: false,
        no_keywords: false,
    }
}

#[test]
fn test_collect_manifests_respects_exclusions() {
    let config = Config::parse_file(config_path()).unwrap();
    let files = collect_manifests(&[testdata_path()], &config).unwrap();
    let names: Vec<String> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec!["broken.yaml", "inheritance.yaml", "library.json", "shapes.yaml"]
    );
}

#[test]
fn test_explicit_files_are_kept() {
    let file = testdata_path().join("excluded").join("invalid.yaml");
    let config = Config::parse_file(config_path()).unwrap();
    let files = collect_manifests(&[file.clone()], &config).unwrap();
    assert_eq!(files, vec![file]);

    assert!(collect_manifests(&[testdata_path().join("missing")], &config).is_err());
}

#[test]
fn test_check_report_over_testdata() {
    let args = CheckArgs {
        paths: vec![testdata_path()],
        config: Some(config_path()),
        format: "json".into(),
    };
    let report = check_report(&args).unwrap();

    assert_eq!(report.sources_checked, 4);
    assert_eq!(report.missing_count, 3);
    assert_eq!(report.load_error_count, 3);
    assert!(!report.passed);

    let names: Vec<&str> = report.sources.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["broken", "inheritance", "library", "shapes"]);

    let shapes = &report.sources[3];
    assert_eq!(shapes.containers.len(), 1);
    assert_eq!(shapes.containers[0].container, "Geometry.Circle");
    assert_eq!(shapes.containers[0].missing[0].interface, "Geometry.IShape");
}

#[test]
fn test_check_fails_on_invalid_manifest() {
    let args = CheckArgs {
        paths: vec![testdata_path().join("excluded")],
        config: Some(config_path()),
        format: "pretty".into(),
    };
    // Explicit directories are still walked; the exclusion applies to the files inside.
    let report = check_report(&args).unwrap();
    assert_eq!(report.sources_checked, 0);

    let args = CheckArgs {
        paths: vec![testdata_path().join("excluded").join("invalid.yaml")],
        config: Some(config_path()),
        format: "pretty".into(),
    };
    assert!(check_report(&args).is_err());
}

#[test]
fn test_show_single_model() {
    let (text, has_errors) = show_output(&show_args(Some("Geometry.Circle"))).unwrap();
    assert!(!has_errors);
    assert_eq!(text, "[Serializable]\npublic sealed class Circle : IShape");

    let mut args = show_args(Some("Geometry.Circle"));
    args.no_attributes = true;
    args.no_keywords = true;
    let (text, _) = show_output(&args).unwrap();
    assert_eq!(text, "public class Circle : IShape");

    let mut args = show_args(Some("Geometry.Circle.Circle(double)"));
    args.no_security = true;
    let (text, _) = show_output(&args).unwrap();
    assert_eq!(text, "Circle(double radius)");
}

#[test]
fn test_show_whole_source() {
    let (text, _) = show_output(&show_args(None)).unwrap();
    assert!(text.contains("namespace Geometry"));
    assert!(text.contains("/// A closed two-dimensional figure."));
    assert!(text.contains("public interface IShape"));
    assert!(text.contains("public struct Square : IShape"));

    assert!(show_output(&show_args(Some("Geometry.Nowhere"))).is_err());
}
