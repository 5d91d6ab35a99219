use std::path::Path;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use disburse_cli::pipeline::SuggestOutcome;
use disburse_map::SavedMapping;
use disburse_model::{MappingTable, TemplateField, ValidationResult};

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

pub fn print_fields(fields: &[TemplateField]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Path"),
        header_cell("Type"),
        header_cell("Required"),
        header_cell("Example"),
        header_cell("Description"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Center);
    for field in fields {
        table.add_row(vec![
            Cell::new(&field.path),
            dim_cell(field.value_type),
            if field.required {
                Cell::new("yes").fg(Color::Yellow)
            } else {
                dim_cell("-")
            },
            Cell::new(&field.example),
            dim_cell(field.description.as_deref().unwrap_or("")),
        ]);
    }
    println!("{table}");
    println!("{} fields", fields.len());
}

pub fn print_suggestions(outcome: &SuggestOutcome) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("CSV column"), header_cell("Target")]);
    apply_table_style(&mut table);
    for binding in outcome.table.bindings() {
        let source = binding.source().unwrap_or("");
        let target = match &binding.target_path {
            Some(path) => Cell::new(path).fg(Color::Green),
            None => dim_cell("(unbound)"),
        };
        table.add_row(vec![Cell::new(source), target]);
    }
    println!("{table}");
    println!(
        "{} of {} columns bound",
        outcome.applied,
        outcome.table.len()
    );

    if outcome.unbound.is_empty() {
        return;
    }
    let mut near = Table::new();
    near.set_header(vec![
        header_cell("Unbound column"),
        header_cell("Closest fields"),
    ]);
    apply_table_style(&mut near);
    for unbound in &outcome.unbound {
        let candidates = unbound
            .candidates
            .iter()
            .map(|c| format!("{} ({:.0}%)", c.path, c.score * 100.0))
            .collect::<Vec<_>>()
            .join("\n");
        near.add_row(vec![Cell::new(&unbound.header), dim_cell(candidates)]);
    }
    println!("{near}");
}

pub fn print_validation(result: &ValidationResult, table: &MappingTable) {
    println!(
        "{} bindings, {} complete",
        table.len(),
        table.complete().count()
    );
    if result.valid {
        println!("All required fields are bound.");
        return;
    }
    let mut missing = Table::new();
    missing.set_header(vec![header_cell("Missing required field")]);
    apply_table_style(&mut missing);
    for path in &result.missing_required_paths {
        missing.add_row(vec![Cell::new(path).fg(Color::Red)]);
    }
    println!("{missing}");
}

pub fn print_mappings(mappings: &[SavedMapping]) {
    if mappings.is_empty() {
        println!("No saved mappings.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Id"),
        header_cell("Name"),
        header_cell("Bindings"),
        header_cell("Template"),
        header_cell("Modified"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Center);
    for mapping in mappings {
        table.add_row(vec![
            dim_cell(&mapping.id),
            Cell::new(&mapping.name).add_attribute(Attribute::Bold),
            Cell::new(mapping.bindings.len()),
            if mapping.template.is_some() {
                Cell::new("yes")
            } else {
                dim_cell("-")
            },
            dim_cell(mapping.last_modified.format("%Y-%m-%d %H:%M UTC")),
        ]);
    }
    println!("{table}");
}

pub fn print_outputs(root: &Path, remote_paths: &[String], documents: usize, dropped: &[usize]) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Remote path")]);
    apply_table_style(&mut table);
    for remote in remote_paths {
        table.add_row(vec![Cell::new(remote)]);
    }
    println!("{table}");
    println!(
        "{documents} documents written under {}",
        root.display()
    );
    if !dropped.is_empty() {
        let lines = dropped
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        println!("Dropped CSV lines with the wrong number of cells: {lines}");
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
