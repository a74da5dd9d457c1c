//! Output formatting for CLI

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use motortest_common::{LeafField, ProtocolField};
use serde::Serialize;

/// Output format
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
    /// Plain text format
    Plain,
}

/// Trait for items that can be displayed in a table
pub trait TableDisplay {
    fn headers() -> Vec<&'static str>;
    fn row(&self) -> Vec<String>;
}

fn new_table<T: TableDisplay>() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(T::headers());
    table
}

fn print_plain<T: TableDisplay>(item: &T) {
    for (header, value) in T::headers().iter().zip(item.row()) {
        println!("{}: {}", header, value);
    }
}

/// Print a single item
pub fn print_item<T: Serialize + TableDisplay>(item: &T, format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            let mut table = new_table::<T>();
            table.add_row(item.row());
            println!("{table}");
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(item).unwrap_or_default());
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yaml::to_string(item).unwrap_or_default());
        }
        OutputFormat::Plain => print_plain(item),
    }
}

/// Print a list of items
pub fn print_list<T: Serialize + TableDisplay>(items: &[T], format: OutputFormat) {
    if items.is_empty() {
        print_message("No items found.", format);
        return;
    }

    match format {
        OutputFormat::Table => {
            let mut table = new_table::<T>();
            for item in items {
                table.add_row(item.row());
            }
            println!("{table}");
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(items).unwrap_or_default());
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yaml::to_string(items).unwrap_or_default());
        }
        OutputFormat::Plain => {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    println!("---");
                }
                print_plain(item);
            }
        }
    }
}

/// Print a simple message
pub fn print_message(message: &str, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::json!({ "message": message }));
        }
        _ => {
            println!("{}", message);
        }
    }
}

/// Print success message
pub fn print_success(message: &str) {
    println!("✅ {}", message);
}

/// Print error message
pub fn print_error(message: &str) {
    eprintln!("❌ {}", message);
}

/// Print warning message
pub fn print_warning(message: &str) {
    println!("⚠️  {}", message);
}

/// Print info message
pub fn print_info(message: &str) {
    println!("ℹ️  {}", message);
}

/// One row of the flattened protocol field table.
///
/// Group members are listed under their group as `Group[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldRow {
    pub field: String,
    pub name: String,
    pub kind: String,
    pub value: String,
}

impl FieldRow {
    fn from_leaf(field: String, leaf: &LeafField) -> Self {
        Self {
            field,
            name: leaf.name.clone(),
            kind: leaf.kind.clone().unwrap_or_default(),
            value: leaf.value.clone(),
        }
    }
}

impl TableDisplay for FieldRow {
    fn headers() -> Vec<&'static str> {
        vec!["Field", "Name", "Type", "Value"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.field.clone(),
            self.name.clone(),
            self.kind.clone(),
            self.value.clone(),
        ]
    }
}

/// Flatten a field tree into display rows
pub fn field_rows(fields: &[ProtocolField]) -> Vec<FieldRow> {
    let mut rows = Vec::new();
    for field in fields {
        match field {
            ProtocolField::Leaf(leaf) => rows.push(FieldRow::from_leaf(leaf.name.clone(), leaf)),
            ProtocolField::Group(group) => {
                for (i, sub) in group.fields.iter().enumerate() {
                    rows.push(FieldRow::from_leaf(format!("{}[{}]", group.name, i), sub));
                }
            }
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_rows_flatten_groups() {
        let fields = vec![
            ProtocolField::leaf("Visual Inspection", "ok"),
            ProtocolField::group(
                "Winding Resistance",
                vec![LeafField::new("U-V", "1.2"), LeafField::new("V-W", "")],
            ),
        ];

        let rows = field_rows(&fields);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].field, "Visual Inspection");
        assert_eq!(rows[0].value, "ok");
        assert_eq!(rows[2].field, "Winding Resistance[1]");
        assert_eq!(rows[2].name, "V-W");
    }

    #[test]
    fn test_field_row_kind_defaults_blank() {
        let leaf = LeafField::new("Slip", "").with_kind("number");
        let rows = field_rows(&[ProtocolField::Leaf(leaf)]);
        assert_eq!(rows[0].row(), vec!["Slip", "Slip", "number", ""]);
    }
}
