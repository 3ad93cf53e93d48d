use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use cmr_artifacts::{ArtifactReport, LoadSummary};
use cmr_model::{ClassLabel, Condition, PredictionResult};

pub fn print_verify_summary(summary: &LoadSummary, report: &ArtifactReport) {
    println!("Artifacts: {}", summary.artifacts_dir.display());
    println!("Feature order: {}", summary.feature_order.join(", "));
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Role"),
        header_cell("File"),
        header_cell("Kind"),
        header_cell("Features"),
        header_cell("SHA-256"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    for artifact in &summary.artifacts {
        table.add_row(vec![
            Cell::new(&artifact.role).fg(Color::Cyan),
            Cell::new(&artifact.path),
            Cell::new(&artifact.kind),
            Cell::new(artifact.n_features),
            dim_cell(short_digest(&artifact.sha256)),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!(
            "{} files, {} classifiers",
            report.counts.files, report.counts.classifiers
        ))
        .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(report.counts.features).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    println!("{table}");
}

pub fn print_predictions(predictions: &PredictionResult) {
    let mut table = Table::new();
    let mut header = vec![header_cell("Model")];
    header.extend(Condition::ALL.map(|condition| header_cell(condition.display_name())));
    table.set_header(header);
    apply_table_style(&mut table);
    for column in 1..=Condition::ALL.len() {
        align_column(&mut table, column, CellAlignment::Center);
    }
    for entry in predictions.iter() {
        let mut row = vec![Cell::new(entry.model.display_name()).add_attribute(Attribute::Bold)];
        row.extend(Condition::ALL.map(|condition| answer_cell(entry.labels.get(condition))));
        table.add_row(row);
    }
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
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

fn answer_cell(label: ClassLabel) -> Cell {
    if label.is_positive() {
        Cell::new(label.answer()).fg(Color::Red)
    } else {
        Cell::new(label.answer()).fg(Color::Green)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value.to_string()).fg(Color::DarkGrey)
}

fn short_digest(digest: &str) -> &str {
    digest.get(..12).unwrap_or(digest)
}
