//! Output formatters for registry contents.

use clap::ValueEnum;
use comfy_table::{Cell, Table};
use ormeta_core::{Attribute, Meta, Metadata, SchemaDocument};

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// ASCII table format
    Table,
    /// JSON format
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Trait for formatting output.
pub trait Formatter: Send + Sync {
    /// Format every registered entity.
    fn format_registry(&self, metadata: &Metadata) -> ormeta_core::Result<String>;

    /// Format one entity and its attributes.
    fn format_entity(&self, meta: &Meta) -> ormeta_core::Result<String>;
}

/// Create a formatter for the given output format.
pub fn create_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Table => Box::new(TableFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}

/// Table formatter using comfy-table.
pub struct TableFormatter;

impl Formatter for TableFormatter {
    fn format_registry(&self, metadata: &Metadata) -> ormeta_core::Result<String> {
        if metadata.is_empty() {
            return Ok("No entities".to_string());
        }

        let mut table = Table::new();
        table.set_header(vec!["Entity", "Table", "Singular", "Attributes", "Relations"]);

        for meta in metadata {
            let model = meta.to_model();
            table.add_row(vec![
                Cell::new(&meta.uid),
                Cell::new(&meta.table_name),
                Cell::new(&model.singular_name),
                Cell::new(meta.attributes().len()),
                Cell::new(meta.relations().count()),
            ]);
        }

        Ok(format!("{}\n{} entit{}", table, metadata.len(), plural(metadata.len())))
    }

    fn format_entity(&self, meta: &Meta) -> ormeta_core::Result<String> {
        let mut table = Table::new();
        table.set_header(vec!["Attribute", "Type", "Column", "Target", "Join Table"]);

        for (name, attribute) in meta.attributes() {
            table.add_row(vec![
                Cell::new(name),
                Cell::new(describe_type(attribute)),
                Cell::new(meta.column_name_of(name).unwrap_or_default()),
                Cell::new(attribute.target().unwrap_or_default()),
                Cell::new(attribute.join_table_name().unwrap_or_default()),
            ]);
        }

        Ok(format!("{} ({})\n{}", meta.uid, meta.table_name, table))
    }
}

/// JSON formatter.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_registry(&self, metadata: &Metadata) -> ormeta_core::Result<String> {
        SchemaDocument::from_metadata(metadata).to_json_pretty()
    }

    fn format_entity(&self, meta: &Meta) -> ormeta_core::Result<String> {
        Ok(serde_json::to_string_pretty(meta)?)
    }
}

/// `type` for scalars, `relation:<kind>` for relations.
fn describe_type(attribute: &Attribute) -> String {
    match attribute.relation_kind() {
        Some(kind) => format!("{}:{}", attribute.type_name(), kind),
        None => attribute.type_name().to_string(),
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        "y"
    } else {
        "ies"
    }
}
