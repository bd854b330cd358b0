use gridcalc_core::Document;
use gridcalc_core::storage::{markdown_content, parse_grd_content, write_grd_content};
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[test]
fn markdown_export_matches_expected_budget() {
    let mut doc = Document::load_grd(&fixture("budget.grd")).unwrap();
    let result = doc.evaluate();
    assert!(!result.success);
    assert_eq!(result.errors.len(), 2);

    let expected = std::fs::read_to_string(fixture("budget.expected.md")).unwrap();
    let normalize = |text: String| text.replace("\r\n", "\n");
    assert_eq!(normalize(markdown_content(&doc)), normalize(expected));
}

#[test]
fn grd_rewrite_is_stable() {
    let doc = Document::load_grd(&fixture("budget.grd")).unwrap();
    let written = write_grd_content(&doc);
    let reparsed = parse_grd_content(&written).unwrap();
    assert_eq!(write_grd_content(&reparsed), written);
    assert_eq!(reparsed.snapshot(), doc.snapshot());
}
