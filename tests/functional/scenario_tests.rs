//! End-to-end reconciliation scenarios on in-memory datasets

use crate::common::{dataset, people};
use tabrecon::{compare, DiffStatus, KeySpec, ReconcileOptions, Value};

fn by_id() -> KeySpec {
    KeySpec::columns(["id"]).unwrap()
}

#[test]
fn test_added_deleted_unchanged() {
    let left = people("left", &[(1, Some("A")), (2, Some("B"))]);
    let right = people("right", &[(2, Some("B")), (3, Some("C"))]);

    let result = compare(&left, &right, &by_id(), &ReconcileOptions::default()).unwrap();
    let summary = result.summary();

    assert_eq!(summary.added, 1);
    assert_eq!(summary.deleted, 1);
    assert_eq!(summary.unchanged, 1);
    assert_eq!(summary.modified, 0);

    assert_eq!(
        result.rows_with_status(DiffStatus::Added),
        vec![&[Value::from(3), Value::from("C"), Value::from("Added")][..]]
    );
    assert_eq!(
        result.rows_with_status(DiffStatus::Deleted),
        vec![&[Value::from(1), Value::from("A"), Value::from("Deleted")][..]]
    );
    assert_eq!(
        result.rows_with_status(DiffStatus::Unchanged),
        vec![&[Value::from(2), Value::from("B"), Value::from("Unchanged")][..]]
    );
}

#[test]
fn test_modified_row_carries_right_values() {
    let left = people("left", &[(1, Some("A")), (2, Some("B"))]);
    let right = people("right", &[(2, Some("Bee")), (3, Some("C"))]);

    let result = compare(&left, &right, &by_id(), &ReconcileOptions::default()).unwrap();

    assert_eq!(result.summary().modified, 1);
    assert_eq!(result.summary().added, 1);
    assert_eq!(result.summary().deleted, 1);
    assert_eq!(
        result.rows_with_status(DiffStatus::Modified),
        vec![&[Value::from(2), Value::from("Bee"), Value::from("Modified")][..]]
    );

    let change = &result.changes()[0];
    assert_eq!(change.key, "(2)");
    assert_eq!(change.cells.len(), 1);
    assert_eq!(change.cells[0].column, "name");
    assert_eq!(change.cells[0].before, Value::from("B"));
    assert_eq!(change.cells[0].after, Value::from("Bee"));
}

#[test]
fn test_missing_values_on_both_sides_are_unchanged() {
    let left = people("left", &[(1, None)]);
    let right = people("right", &[(1, None)]);

    let result = compare(&left, &right, &by_id(), &ReconcileOptions::default()).unwrap();

    assert_eq!(result.summary().unchanged, 1);
    assert_eq!(result.summary().modified, 0);
}

#[test]
fn test_positional_extra_left_row_is_deleted() {
    let left = people("left", &[(1, Some("A")), (2, Some("B")), (3, Some("C"))]);
    let right = people("right", &[(1, Some("A")), (2, Some("B"))]);

    let result = compare(&left, &right, &KeySpec::Positional, &ReconcileOptions::default()).unwrap();

    assert_eq!(result.summary().unchanged, 2);
    assert_eq!(result.summary().deleted, 1);
    assert_eq!(result.summary().added, 0);
    assert_eq!(result.statuses()[2], DiffStatus::Deleted);
    assert!(result.key_columns().is_empty());
}

#[test]
fn test_output_order_is_left_then_added() {
    let left = people("left", &[(5, Some("e")), (1, Some("a")), (3, Some("c"))]);
    let right = people("right", &[(9, Some("i")), (3, Some("C")), (7, Some("g")), (5, Some("e"))]);

    let result = compare(&left, &right, &by_id(), &ReconcileOptions::default()).unwrap();

    let ids: Vec<&Value> = result.dataset().rows().iter().map(|r| &r[0]).collect();
    assert_eq!(
        ids,
        vec![
            &Value::from(5),
            &Value::from(1),
            &Value::from(3),
            &Value::from(9),
            &Value::from(7)
        ]
    );
    assert_eq!(
        result.statuses(),
        &[
            DiffStatus::Unchanged,
            DiffStatus::Deleted,
            DiffStatus::Modified,
            DiffStatus::Added,
            DiffStatus::Added
        ]
    );
}

#[test]
fn test_exclude_unchanged_still_counts() {
    let left = people("left", &[(1, Some("A")), (2, Some("B"))]);
    let right = people("right", &[(1, Some("A")), (2, Some("X"))]);
    let options = ReconcileOptions {
        include_unchanged: false,
        ..Default::default()
    };

    let result = compare(&left, &right, &by_id(), &options).unwrap();

    assert_eq!(result.summary().unchanged, 1);
    assert_eq!(result.row_count(), 1);
    assert_eq!(result.statuses(), &[DiffStatus::Modified]);
}

#[test]
fn test_composite_key() {
    let columns = ["region", "id", "amount"];
    let left = dataset(
        "left",
        &columns,
        vec![
            vec!["eu".into(), 1.into(), 10.into()],
            vec!["us".into(), 1.into(), 20.into()],
        ],
    );
    let right = dataset(
        "right",
        &columns,
        vec![
            vec!["us".into(), 1.into(), 25.into()],
            vec!["eu".into(), 1.into(), 10.into()],
        ],
    );
    let key = KeySpec::columns(["region", "id"]).unwrap();

    let result = compare(&left, &right, &key, &ReconcileOptions::default()).unwrap();

    assert_eq!(result.summary().unchanged, 1);
    assert_eq!(result.summary().modified, 1);
    assert_eq!(result.changes()[0].key, "(us, 1)");
    let names: Vec<&str> = result.dataset().column_names().collect();
    assert_eq!(names, vec!["region", "id", "amount", "status"]);
}

#[test]
fn test_numeric_cross_type_equality() {
    let left = dataset("left", &["id", "v"], vec![vec![1.into(), 3.into()]]);
    let right = dataset("right", &["id", "v"], vec![vec![1.into(), 3.0.into()]]);

    let strict = compare(&left, &right, &by_id(), &ReconcileOptions::default()).unwrap();
    assert_eq!(strict.summary().modified, 1);

    let options = ReconcileOptions {
        numeric_cross_type: true,
        ..Default::default()
    };
    let relaxed = compare(&left, &right, &by_id(), &options).unwrap();
    assert_eq!(relaxed.summary().unchanged, 1);
}
