use console::style;

/// One rendered line: 1-based ordinal, display name and status label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub index: usize,
    pub name: String,
    pub status: String,
}

impl DisplayRow {
    pub fn new(index: usize, name: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
            status: status.into(),
        }
    }
}

/// Widths of the ordinal and name columns for a set of rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnWidths {
    pub index: usize,
    pub name: usize,
}

impl ColumnWidths {
    pub fn of(rows: &[DisplayRow]) -> Self {
        Self {
            index: rows.len().to_string().len(),
            name: rows
                .iter()
                .map(|row| row.name.chars().count())
                .max()
                .unwrap_or(0),
        }
    }
}

/// Renders `rows` as aligned lines, each terminated by a newline.
pub fn render_rows(rows: &[DisplayRow], color: bool) -> String {
    let widths = ColumnWidths::of(rows);
    rows.iter()
        .map(|row| format!("{}\n", render_line(row, widths, color)))
        .collect()
}

pub fn render_line(row: &DisplayRow, widths: ColumnWidths, color: bool) -> String {
    // Pad before styling so escape codes never count towards the width
    let name = format!("{:<width$}", row.name, width = widths.name);
    format!(
        "{:>width$}. {}  {}",
        row.index,
        name,
        status_label(&row.status, color),
        width = widths.index
    )
}

fn status_label(status: &str, color: bool) -> String {
    if !color {
        return status.to_string();
    }
    let styled = match status {
        "ON" | "Heating" => style(status).green(),
        "OFF" | "Off" => style(status).red(),
        _ => style(status).yellow(),
    };
    styled.force_styling(true).to_string()
}
