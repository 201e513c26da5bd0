use recipary_core::rows::{flatten, normalize, remove_row, sanitize_for_save, update_row};
use recipary_core::{IngredientRow, RawIngredientRow, RowPatch, RowValidationError, Unit};
use uuid::Uuid;

fn row(name: &str, quantity: f64, unit: Unit) -> IngredientRow {
    let mut row = IngredientRow::new();
    row.name = name.to_string();
    row.quantity = quantity;
    row.unit = unit;
    row
}

#[test]
fn new_rows_never_share_an_id() {
    let first = IngredientRow::new();
    let second = IngredientRow::new();
    assert_ne!(first.id, second.id);
}

#[test]
fn update_row_merges_patch_and_keeps_order() {
    let rows = vec![
        row("flour", 2.0, Unit::Cup),
        row("salt", 1.0, Unit::Tsp),
        row("milk", 250.0, Unit::Ml),
    ];
    let target = rows[1].id;

    let patched = update_row(
        &rows,
        target,
        &RowPatch {
            quantity: Some(0.5),
            ..RowPatch::default()
        },
    );

    assert_eq!(patched.len(), 3);
    assert_eq!(patched[1].id, target);
    assert_eq!(patched[1].quantity, 0.5);
    // untouched patch fields keep their values
    assert_eq!(patched[1].name, "salt");
    assert_eq!(patched[1].unit, Unit::Tsp);
    // siblings and order are untouched
    assert_eq!(patched[0], rows[0]);
    assert_eq!(patched[2], rows[2]);
    // input list is unchanged
    assert_eq!(rows[1].quantity, 1.0);
}

#[test]
fn update_row_with_unmatched_id_is_a_no_op() {
    let rows = vec![row("flour", 2.0, Unit::Cup)];
    let result = update_row(
        &rows,
        Uuid::new_v4(),
        &RowPatch {
            name: Some("sugar".to_string()),
            ..RowPatch::default()
        },
    );
    assert_eq!(result, rows);
}

#[test]
fn update_row_on_empty_list_is_a_no_op() {
    let result = update_row(&[], Uuid::new_v4(), &RowPatch::default());
    assert!(result.is_empty());
}

#[test]
fn remove_row_drops_only_the_target() {
    let rows = vec![
        row("flour", 2.0, Unit::Cup),
        row("salt", 1.0, Unit::Tsp),
        row("milk", 250.0, Unit::Ml),
    ];

    let remaining = remove_row(&rows, rows[1].id);
    assert_eq!(remaining.len(), 2);
    assert_eq!(remaining[0], rows[0]);
    assert_eq!(remaining[1], rows[2]);
}

#[test]
fn remove_row_with_unmatched_id_is_a_no_op() {
    let rows = vec![row("flour", 2.0, Unit::Cup)];
    assert_eq!(remove_row(&rows, Uuid::new_v4()), rows);
    assert!(remove_row(&[], Uuid::new_v4()).is_empty());
}

#[test]
fn normalize_fills_defaults_for_missing_fields() {
    let raw = RawIngredientRow::default();
    let rows = normalize(&[raw]);

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "");
    assert_eq!(rows[0].quantity, 1.0);
    assert_eq!(rows[0].unit, Unit::Pcs);
}

#[test]
fn normalize_preserves_existing_ids() {
    let id = Uuid::new_v4();
    let raw = RawIngredientRow {
        id: Some(id.to_string()),
        name: Some("flour".to_string()),
        quantity: Some(serde_json::json!(2)),
        unit: Some("cup".to_string()),
    };
    let rows = normalize(&[raw]);

    assert_eq!(rows[0].id, id);
    assert_eq!(rows[0].name, "flour");
    assert_eq!(rows[0].quantity, 2.0);
    assert_eq!(rows[0].unit, Unit::Cup);
}

#[test]
fn normalize_is_idempotent_on_its_own_output() {
    let raw = RawIngredientRow {
        id: None,
        name: Some("flour".to_string()),
        quantity: Some(serde_json::json!("2.5")),
        unit: None,
    };
    let first = normalize(&[raw]);

    let first_as_raw = RawIngredientRow {
        id: Some(first[0].id.to_string()),
        name: Some(first[0].name.clone()),
        quantity: Some(serde_json::json!(first[0].quantity)),
        unit: Some(first[0].unit.as_str().to_string()),
    };
    let second = normalize(&[first_as_raw]);

    assert_eq!(second, first);
}

#[test]
fn normalize_accepts_legacy_json_shapes() {
    let encoded = r#"[
        {"name": "flour", "quantity": "2", "unit": "cup"},
        {"quantity": 3},
        {"name": "butter", "unit": "handful"}
    ]"#;
    let raw: Vec<RawIngredientRow> = serde_json::from_str(encoded).unwrap();
    let rows = normalize(&raw);

    assert_eq!(rows[0].quantity, 2.0);
    assert_eq!(rows[0].unit, Unit::Cup);
    assert_eq!(rows[1].name, "");
    assert_eq!(rows[1].quantity, 3.0);
    // unknown unit token falls back to the default
    assert_eq!(rows[2].unit, Unit::Pcs);
}

#[test]
fn sanitize_trims_names_and_drops_incomplete_rows() {
    let rows = vec![
        row("  flour  ", 2.0, Unit::Cup),
        row("   ", 1.0, Unit::Tsp),
        row("milk", 1.3, Unit::Cup),
    ];

    let cleaned = sanitize_for_save(&rows).unwrap();
    assert_eq!(cleaned.len(), 2);
    assert_eq!(cleaned[0].name, "flour");
    assert_eq!(cleaned[0].id, rows[0].id);
    // quantities are not snapped to the quarter grid on save
    assert_eq!(cleaned[1].quantity, 1.3);
}

#[test]
fn sanitize_signals_when_nothing_survives() {
    let rows = vec![row("  ", 1.0, Unit::Pcs)];
    assert_eq!(
        sanitize_for_save(&rows),
        Err(RowValidationError::NoIngredients)
    );
    assert_eq!(
        sanitize_for_save(&[]),
        Err(RowValidationError::NoIngredients)
    );
}

#[test]
fn flatten_renders_one_line_per_row() {
    let rows = vec![row("Flour", 2.0, Unit::Cup), row("Salt", 1.5, Unit::Tsp)];
    assert_eq!(flatten(&rows), "2 cup Flour\n1.5 tsp Salt");
    assert_eq!(flatten(&[]), "");
}
