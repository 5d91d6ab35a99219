//! Merging CSV rows into the built-in template.

use disburse_model::{CsvDocument, MappingBinding, MappingTable, Path, RowValues};
use disburse_template::{default_template, default_template_fields};
use disburse_transform::{TransformEngine, render_compact, render_pretty, transform_all, transform_row};
use proptest::prelude::*;
use serde_json::{Value, json};

const AMOUNT: &str = "disbursements[0].payees[0].amount";

fn path(text: &str) -> Path {
    Path::parse(text).unwrap()
}

fn row(pairs: &[(&str, &str)]) -> RowValues {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

fn amount_of(document: &Value) -> &Value {
    path(AMOUNT).get(document).unwrap()
}

fn sample_csv() -> CsvDocument {
    CsvDocument {
        headers: vec!["Amt".into(), "First".into(), "Sms".into()],
        rows: vec![
            vec!["58.80".into(), "AUBREE".into(), "TRUE".into()],
            vec!["abc".into(), "BO".into(), "no".into()],
            vec!["12".into(), "CY".into(), "true".into()],
        ],
    }
}

fn sample_table() -> MappingTable {
    MappingTable::new(vec![
        MappingBinding::column("Amt", path(AMOUNT)),
        MappingBinding::column("First", path("disbursements[0].payees[0].first_name")),
        MappingBinding::column("Sms", path("disbursements[0].payees[0].delivery_options.sms")),
        MappingBinding::fixed(path("server"), "foo"),
        MappingBinding::unbound("Ignored"),
    ])
}

#[test]
fn numeric_target_is_coerced() {
    let template = default_template();
    let fields = default_template_fields();
    let table = MappingTable::new(vec![MappingBinding::column("Amt", path(AMOUNT))]);

    let doc = transform_row(&template, &fields, &table, &row(&[("Amt", "58.80")]));
    assert_eq!(amount_of(&doc), &json!(58.8));

    let doc = transform_row(&template, &fields, &table, &row(&[("Amt", "abc")]));
    assert_eq!(amount_of(&doc), &json!(0));
}

#[test]
fn static_binding_applies_to_every_document() {
    let template = default_template();
    let fields = default_template_fields();
    let table = sample_table();
    let documents = transform_all(&template, &fields, &table, &sample_csv());
    assert_eq!(documents.len(), 3);
    assert!(documents.iter().all(|doc| doc["server"] == json!("foo")));
}

#[test]
fn rows_are_independent() {
    let template = default_template();
    let fields = default_template_fields();
    let table = sample_table();
    let csv = sample_csv();

    let documents = transform_all(&template, &fields, &table, &csv);
    for (index, document) in documents.iter().enumerate() {
        let alone = transform_row(&template, &fields, &table, &csv.row_values(index).unwrap());
        assert_eq!(document, &alone);
    }
    assert_eq!(amount_of(&documents[0]), &json!(58.8));
    assert_eq!(amount_of(&documents[1]), &json!(0));
    assert_eq!(amount_of(&documents[2]), &json!(12));

    let sms = path("disbursements[0].payees[0].delivery_options.sms");
    assert_eq!(sms.get(&documents[0]), Some(&json!(true)));
    assert_eq!(sms.get(&documents[1]), Some(&json!(false)));
}

#[test]
fn preview_matches_first_document_byte_for_byte() {
    let template = default_template();
    let fields = default_template_fields();
    let table = sample_table();
    let csv = sample_csv();

    let engine = TransformEngine::new(&template, &fields, &table);
    let preview = engine.preview(&csv).unwrap();
    let all = engine.transform_all(&csv);
    assert_eq!(render_pretty(&preview), render_pretty(&all[0]));

    let empty = CsvDocument {
        headers: csv.headers.clone(),
        rows: Vec::new(),
    };
    assert!(engine.preview(&empty).is_none());
    assert!(engine.transform_all(&empty).is_empty());
}

#[test]
fn template_is_not_mutated() {
    let template = default_template();
    let fields = default_template_fields();
    let table = sample_table();
    let _ = transform_all(&template, &fields, &table, &sample_csv());
    assert_eq!(template, default_template());
}

#[test]
fn payment_method_ids_reset_unless_array() {
    let template = default_template();
    let fields = default_template_fields();
    let ids = path("disbursements[0].payees[0].allowed_payment_method_ids");
    let table = MappingTable::new(vec![MappingBinding::column("Methods", ids.clone())]);

    let doc = transform_row(&template, &fields, &table, &row(&[("Methods", "[3]")]));
    assert_eq!(ids.get(&doc), Some(&json!([3])));

    let doc = transform_row(&template, &fields, &table, &row(&[("Methods", "check")]));
    assert_eq!(ids.get(&doc), Some(&json!([1, 2, 3, 4, 5, 6, 7])));
}

#[test]
fn second_field_value_slot_is_written() {
    let template = default_template();
    let fields = default_template_fields();
    let table = MappingTable::new(vec![
        MappingBinding::column("Policy", path("disbursements[0].payees[0].field_values[0].value")),
        MappingBinding::column("Check", path("disbursements[0].payees[0].field_values[1].value")),
    ]);
    let doc = transform_row(
        &template,
        &fields,
        &table,
        &row(&[("Policy", "IN0012454C"), ("Check", "9102274")]),
    );
    let values = path("disbursements[0].payees[0].field_values").get(&doc).unwrap();
    insta::assert_snapshot!(render_compact(values), @r#"[{"name":"PolicyNumber","value":"IN0012454C"},{"name":"CheckNumber","value":"9102274"}]"#);
}

#[test]
fn pretty_output_keeps_template_order() {
    let template = json!({"zeta": 1, "alpha": {"b": "", "a": true}});
    let fields = disburse_template::extract(&template);
    let table = MappingTable::new(vec![MappingBinding::column("B", path("alpha.b"))]);
    let doc = transform_row(&template, &fields, &table, &row(&[("B", "x")]));
    insta::assert_snapshot!(render_pretty(&doc), @r#"
    {
      "zeta": 1,
      "alpha": {
        "b": "x",
        "a": true
      }
    }
    "#);
}

proptest! {
    #[test]
    fn numeric_cells_never_fail(cell in ".{0,12}") {
        let template = default_template();
        let fields = default_template_fields();
        let table = MappingTable::new(vec![MappingBinding::column("Amt", path(AMOUNT))]);
        let doc = transform_row(&template, &fields, &table, &row(&[("Amt", cell.as_str())]));
        prop_assert!(amount_of(&doc).is_number());
    }
}
