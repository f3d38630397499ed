use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use scandemo_cli::types::RunSummary;
use scandemo_model::DemographicRecord;
use scandemo_resolve::Resolution;

pub fn print_summary(summary: &RunSummary) {
    print_record(&summary.record, &summary.resolution);
    println!("Output: {}", summary.output_dir.display());

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Output"),
        header_cell("File"),
        header_cell("Columns"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for output in &summary.outputs {
        let (file_cell, columns_cell) = match &output.path {
            Some(path) => (
                Cell::new(
                    path.file_name()
                        .map(|name| name.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                )
                .fg(Color::Green),
                Cell::new(output.columns),
            ),
            None => (dim_cell("skipped"), dim_cell("-")),
        };
        table.add_row(vec![Cell::new(output.kind), file_cell, columns_cell]);
    }
    println!("{table}");
}

pub fn print_record(record: &DemographicRecord, resolution: &Resolution) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Field"), header_cell("Value")]);
    apply_table_style(&mut table);
    table.add_row(vec![Cell::new("Subject"), Cell::new(&record.subject_label)]);
    table.add_row(vec![Cell::new("Session"), Cell::new(&record.session_label)]);
    table.add_row(vec![Cell::new("Age"), Cell::new(record.age)]);
    table.add_row(vec![Cell::new("Age source"), Cell::new(resolution.age_source)]);
    let sex_cell = if record.sex.is_available() {
        Cell::new(&record.sex)
    } else {
        Cell::new(&record.sex).fg(Color::Yellow)
    };
    table.add_row(vec![Cell::new("Sex"), sex_cell]);
    table.add_row(vec![
        Cell::new("Acquisition"),
        Cell::new(&record.acquisition_id),
    ]);
    if let Some(candidate) = &resolution.candidate {
        table.add_row(vec![Cell::new("Header file"), dim_cell(candidate)]);
    }
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
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
