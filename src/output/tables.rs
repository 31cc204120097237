use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Color as TableColor, ContentArrangement, Table};

/// Table with full borders and a separator between every row, columns
/// sized to their content.
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Disabled);
    table
}

/// Build a table from a header and rows of the same arity.
pub fn build_table<R, C>(header: &[&str], rows: R) -> Table
where
    R: IntoIterator<Item = Vec<C>>,
    C: Into<Cell>,
{
    let mut table = create_table();
    table.set_header(header.iter().map(|title| Cell::new(title)));

    for row in rows {
        table.add_row(
            row.into_iter()
                .map(|cell| Into::<Cell>::into(cell).set_alignment(CellAlignment::Left)),
        );
    }

    table
}

pub fn color_coded_status_cell(status: &str) -> Cell {
    let cell = Cell::new(status);
    match status {
        "success" | "fixed" => cell.fg(TableColor::Green),
        "failed" | "timedout" | "infrastructure_fail" => cell.fg(TableColor::Red),
        _ => cell.fg(TableColor::Yellow),
    }
}
