//! Pipeline steps behind the CLI commands.

use std::fs;

use disburse_cli::pipeline::{
    deliver, load_csv, load_template, preview_row, resolve_mapping, resolve_target,
    suggest_mapping, transform_rows,
};
use disburse_map::{JsonFileStore, MappingStore, MemoryStore, SavedMapping};
use disburse_model::{MappingBinding, MappingTable, Path};
use disburse_output::{DirectorySink, OutputLayout, UploadTarget, plan_outputs};
use serde_json::json;
use tempfile::TempDir;

const AMOUNT: &str = "disbursements[0].payees[0].amount";
const FIRST_NAME: &str = "disbursements[0].payees[0].first_name";

fn path(text: &str) -> Path {
    Path::parse(text).unwrap()
}

fn amount_table() -> MappingTable {
    MappingTable::new(vec![
        MappingBinding::column("Amount", path(AMOUNT)),
        MappingBinding::column("First Name", path(FIRST_NAME)),
    ])
}

fn write_csv(dir: &TempDir, text: &str) -> std::path::PathBuf {
    let file = dir.path().join("payees.csv");
    fs::write(&file, text).unwrap();
    file
}

#[test]
fn builtin_template_when_no_path_given() {
    let template = load_template(None).unwrap();
    assert!(template.source.is_none());
    assert_eq!(template.document["server"], "live");
    assert!(template.additional_fields().is_empty());
    assert!(template.fields.iter().any(|f| f.path == path(AMOUNT)));
}

#[test]
fn uploaded_template_reports_additional_fields() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("template.json");
    fs::write(&file, r#"{"server": "live", "memo": "note"}"#).unwrap();

    let template = load_template(Some(file.as_path())).unwrap();
    assert_eq!(template.fields.len(), 2);
    let additional: Vec<String> = template
        .additional_fields()
        .iter()
        .map(|f| f.path.to_string())
        .collect();
    assert_eq!(additional, ["memo"]);
}

#[test]
fn invalid_template_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("broken.json");
    fs::write(&file, "{").unwrap();
    let err = load_template(Some(file.as_path())).unwrap_err();
    assert!(format!("{err:#}").contains("not valid JSON"));
}

#[test]
fn mapping_resolves_from_file_id_and_name() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path().join("mappings")).unwrap();
    let saved = SavedMapping::new("monthly", amount_table());
    store.save(&saved).unwrap();

    let file = dir.path().join("table.json");
    fs::write(&file, serde_json::to_string(&amount_table()).unwrap()).unwrap();

    let from_file = resolve_mapping(&store, file.to_str().unwrap()).unwrap();
    let from_id = resolve_mapping(&store, &saved.id).unwrap();
    let from_name = resolve_mapping(&store, "monthly").unwrap();
    assert_eq!(from_file, amount_table());
    assert_eq!(from_id, amount_table());
    assert_eq!(from_name, amount_table());
}

#[test]
fn saved_mapping_file_is_accepted_as_mapping_file() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("saved.json");
    let saved = SavedMapping::new("monthly", amount_table());
    fs::write(&file, serde_json::to_string(&saved).unwrap()).unwrap();

    let table = resolve_mapping(&MemoryStore::new(), file.to_str().unwrap()).unwrap();
    assert_eq!(table, amount_table());
}

#[test]
fn unknown_mapping_reference_is_an_error() {
    let err = resolve_mapping(&MemoryStore::new(), "nope").unwrap_err();
    assert!(err.to_string().contains("'nope'"));
}

#[test]
fn suggestion_binds_exact_headers_and_ranks_the_rest() {
    let dir = TempDir::new().unwrap();
    let csv = write_csv(&dir, "Amount,First Name,Nickname\n12,Ann,Annie\n");
    let report = load_csv(&csv).unwrap();
    let template = load_template(None).unwrap();

    let outcome = suggest_mapping(&report.document, &template.fields, 2);
    assert_eq!(outcome.applied, 2);
    assert_eq!(outcome.table.len(), 3);
    assert_eq!(
        outcome.table.bindings()[0].target_path.as_ref(),
        Some(&path(AMOUNT))
    );
    assert_eq!(outcome.unbound.len(), 1);
    assert_eq!(outcome.unbound[0].header, "Nickname");
    assert!(outcome.unbound[0].candidates.len() <= 2);
}

#[test]
fn rows_merge_into_independent_documents() {
    let dir = TempDir::new().unwrap();
    let csv = write_csv(&dir, "Amount,First Name\n58.80,AUBREE\n0,BO\nbroken\n");
    let report = load_csv(&csv).unwrap();
    assert_eq!(report.dropped_lines, [4]);

    let template = load_template(None).unwrap();
    let documents = transform_rows(&template, &amount_table(), &report.document);
    assert_eq!(documents.len(), 2);
    assert_eq!(path(AMOUNT).get(&documents[0]), Some(&json!(58.8)));
    assert_eq!(path(FIRST_NAME).get(&documents[0]), Some(&json!("AUBREE")));
    assert_eq!(path(AMOUNT).get(&documents[1]), Some(&json!(0)));

    let preview = preview_row(&template, &amount_table(), &report.document).unwrap();
    assert_eq!(preview, documents[0]);
}

#[test]
fn delivery_mirrors_remote_paths_under_the_root() {
    let dir = TempDir::new().unwrap();
    let documents = vec![json!({"n": 1}), json!({"n": 2})];
    let files = plan_outputs(&documents, OutputLayout::PerRow, Some("payees.csv"));
    let target = resolve_target(None, Some("/uploads"));
    let sink = DirectorySink::new(dir.path());

    let mut seen = Vec::new();
    let remote = deliver(&sink, &target, &files, |file| seen.push(file.name.clone())).unwrap();
    assert_eq!(
        remote,
        ["/uploads/payees_transformed_1.json", "/uploads/payees_transformed_2.json"]
    );
    assert_eq!(seen.len(), 2);
    let written = fs::read_to_string(dir.path().join("uploads/payees_transformed_2.json")).unwrap();
    assert_eq!(serde_json::from_str::<serde_json::Value>(&written).unwrap(), json!({"n": 2}));
}

#[test]
fn target_override_keeps_configured_host() {
    let configured = UploadTarget::new("sftp.example.com", "ops", "/inbox").with_port(2222);
    let target = resolve_target(Some(&configured), Some("/outbox"));
    assert_eq!(target.host, "sftp.example.com");
    assert_eq!(target.port, 2222);
    assert_eq!(target.remote_path, "/outbox");

    let unchanged = resolve_target(Some(&configured), None);
    assert_eq!(unchanged, configured);

    let local = resolve_target(None, None);
    assert_eq!(local.remote_path_for("a.json"), "/a.json");
}
