use gridcalc_core::{CellValue, Document, GridError, GridService};
use proptest::prelude::*;

fn doc_with(rows: usize, cols: usize, inputs: &[(&str, &str)]) -> Document {
    let mut doc = Document::new(rows, cols).unwrap();
    for (id, input) in inputs {
        doc.set_cell_input(id, input).unwrap();
    }
    doc
}

fn number(doc: &Document, id: &str) -> Option<f64> {
    doc.cell(id)?.value()?.as_number()
}

#[test]
fn dependency_ordering() {
    let mut doc = doc_with(3, 1, &[("A1", "2"), ("A2", "=A1*3"), ("A3", "=A2+1")]);
    let result = doc.evaluate();
    assert!(result.success);
    assert!(result.errors.is_empty());
    assert_eq!(number(&doc, "A1"), Some(2.0));
    assert_eq!(number(&doc, "A2"), Some(6.0));
    assert_eq!(number(&doc, "A3"), Some(7.0));
}

#[test]
fn propagated_failure() {
    let mut doc = doc_with(2, 1, &[("A1", "hello"), ("A2", "=A1+1")]);
    let result = doc.evaluate();
    assert!(!result.success);
    assert_eq!(
        doc.cell("A1").unwrap().value(),
        Some(&CellValue::Text("hello".to_string()))
    );
    let a2 = doc.cell("A2").unwrap();
    assert!(a2.value().is_none());
    assert!(a2.error().unwrap().contains("non-numeric"));
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].cell_id, "A2");
}

#[test]
fn cycle_symmetry() {
    let mut doc = doc_with(1, 2, &[("A1", "=B1+1"), ("B1", "=A1+1")]);
    let result = doc.evaluate();
    assert!(!result.success);
    for id in ["A1", "B1"] {
        let cell = doc.cell(id).unwrap();
        assert!(cell.value().is_none());
        assert_eq!(cell.error(), Some("Circular reference detected"));
    }
    assert_eq!(
        result.circular_references,
        Some(vec!["A1".to_string(), "B1".to_string()])
    );
}

#[test]
fn row_deletion_with_shift() {
    let mut doc = doc_with(3, 1, &[("A1", "1"), ("A2", "2"), ("A3", "=A1+A2")]);
    doc.evaluate();
    doc.delete_row(0).unwrap();

    assert_eq!(doc.rows(), 2);
    assert_eq!(doc.cell("A1").unwrap().input, "2");
    let moved = doc.cell("A2").unwrap();
    assert!(moved.is_formula());
    assert!(moved.error().unwrap().starts_with("Reference to deleted cell"));

    doc.evaluate();
    assert_eq!(number(&doc, "A1"), Some(2.0));
    assert!(doc.cell("A2").unwrap().error().is_some());
}

#[test]
fn bounds_rejection_leaves_grid_unchanged() {
    let mut doc = doc_with(1, 2, &[("A1", "5")]);
    let before = doc.snapshot();
    let err = doc.delete_row(0).unwrap_err();
    assert!(matches!(err, GridError::LastRow));
    assert_eq!(err.to_string(), "Cannot delete the last row");
    assert_eq!(doc.snapshot(), before);

    assert!(doc.delete_column(2).is_err());
    assert_eq!(doc.snapshot(), before);
}

#[test]
fn twenty_sixth_column_is_the_last() {
    let mut doc = Document::new(1, 25).unwrap();
    doc.add_column(None).unwrap();
    assert_eq!(doc.column_headers().last().map(String::as_str), Some("Z"));
    assert!(matches!(doc.add_column(None), Err(GridError::TooManyColumns)));
    assert_eq!(doc.cols(), 26);
}

#[test]
fn idempotent_re_evaluation() {
    let mut doc = doc_with(
        3,
        3,
        &[
            ("A1", "4"),
            ("B1", "=A1/2"),
            ("C1", "=B1+Z9"),
            ("A2", "text"),
            ("B2", "=B3"),
            ("B3", "=B2"),
            ("C3", "=(A1+B1)*2"),
        ],
    );
    let first = doc.evaluate();
    let second = doc.evaluate();
    assert_eq!(first, second);
}

#[test]
fn validation_is_pure() {
    let mut service = GridService::default();
    service.update_cell("A1", "=B1*2");
    service.evaluate_grid();
    let before = service.get_grid();

    for formula in ["=A1+1", "A1", "=", "=(A1", "=a1", "=A1)("] {
        service.validate_formula(formula);
    }
    assert_eq!(service.get_grid(), before);
}

#[test]
fn edits_after_evaluation_are_picked_up() {
    let mut doc = doc_with(2, 1, &[("A1", "1"), ("A2", "=A1*10")]);
    doc.evaluate();
    doc.set_cell_input("A1", "3").unwrap();
    doc.evaluate();
    assert_eq!(number(&doc, "A2"), Some(30.0));
}

proptest! {
    #[test]
    fn chains_sum_in_any_layout(values in prop::collection::vec(-1000i32..1000, 1..20)) {
        // One column of literals followed by a running-total column.
        let rows = values.len();
        let mut doc = Document::new(rows, 2).unwrap();
        for (row, v) in values.iter().enumerate() {
            let id = format!("A{}", row + 1);
            doc.set_cell_input(&id, &v.to_string()).unwrap();
            let formula = if row == 0 {
                "=A1".to_string()
            } else {
                format!("=B{}+A{}", row, row + 1)
            };
            doc.set_cell_input(&format!("B{}", row + 1), &formula).unwrap();
        }

        let result = doc.evaluate();
        prop_assert!(result.success);
        let total: i32 = values.iter().sum();
        prop_assert_eq!(number(&doc, &format!("B{}", rows)), Some(total as f64));
    }

    #[test]
    fn edges_stay_symmetric(
        formulas in prop::collection::vec((0usize..3, 0usize..3, 0usize..3, 0usize..3), 0..12),
        delete in 0usize..3,
    ) {
        let mut doc = Document::new(3, 3).unwrap();
        for (r, c, rr, rc) in formulas {
            let id = format!("{}{}", (b'A' + c as u8) as char, r + 1);
            let target = format!("{}{}", (b'A' + rc as u8) as char, rr + 1);
            doc.set_cell_input(&id, &format!("={}+1", target)).unwrap();
        }
        doc.evaluate();
        doc.delete_row(delete).unwrap();

        for cell in doc.cells() {
            for dep in &cell.dependencies {
                prop_assert!(doc.cell_at(*dep).unwrap().dependents.contains(&cell.coord));
            }
            for dep in &cell.dependents {
                prop_assert!(doc.cell_at(*dep).unwrap().dependencies.contains(&cell.coord));
            }
        }
    }
}
