//! Table rendering for list commands
//!
//! List commands build `TableRow`s and hand them to a `TableFormatter`; the
//! formatter owns every tabular output format so the commands stay small.
//! The short-ID column is always first since that is what users type back.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::cli::helpers::{format_short_id_str, truncate_str};
use crate::cli::OutputFormat;
use crate::core::shortid::ShortIdIndex;
use crate::metrics::format_currency;

/// One column in a table layout
pub struct ColumnDef {
    pub key: &'static str,
    pub header: &'static str,
    /// Truncation width for table output; TSV ignores it
    pub width: usize,
}

impl ColumnDef {
    pub const fn new(key: &'static str, header: &'static str, width: usize) -> Self {
        Self { key, header, width }
    }
}

/// A single cell value, rendered per output format
pub enum CellValue {
    /// Full entity ID; table output truncates it
    Id(String),
    Text(String),
    Money(f64),
    Count(usize),
    Date(DateTime<Utc>),
}

impl CellValue {
    /// Human rendering used in tables
    fn render(&self) -> String {
        match self {
            CellValue::Id(id) => format_short_id_str(id),
            CellValue::Text(t) => t.clone(),
            CellValue::Money(v) => format_currency(*v),
            CellValue::Count(n) => n.to_string(),
            CellValue::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }

    /// Untruncated rendering for machine formats
    fn render_raw(&self) -> String {
        match self {
            CellValue::Id(id) => id.clone(),
            other => other.render(),
        }
    }
}

/// One entity's worth of cells, keyed by column key
pub struct TableRow {
    id: String,
    short_id: Option<String>,
    cells: HashMap<&'static str, CellValue>,
}

impl TableRow {
    pub fn new(id: String, short_ids: &ShortIdIndex) -> Self {
        let short_id = short_ids.alias_of(&id).map(String::from);
        Self {
            id,
            short_id,
            cells: HashMap::new(),
        }
    }

    pub fn cell(mut self, key: &'static str, value: CellValue) -> Self {
        self.cells.insert(key, value);
        self
    }

    fn short_display(&self) -> String {
        self.short_id
            .clone()
            .unwrap_or_else(|| format_short_id_str(&self.id))
    }
}

/// Formats rows of one entity type into the requested output
pub struct TableFormatter<'a> {
    columns: &'a [ColumnDef],
}

impl<'a> TableFormatter<'a> {
    pub fn new(columns: &'a [ColumnDef]) -> Self {
        Self { columns }
    }

    /// Print `rows` in `format`, restricted to the `visible` columns
    ///
    /// `visible` order wins, so `--columns title,stage` lists title first.
    /// YAML/JSON/Path never reach here; commands serialize those themselves.
    pub fn output(&self, rows: &[TableRow], format: OutputFormat, visible: &[&str]) {
        match format {
            OutputFormat::Id => {
                for row in rows {
                    println!("{}", row.id);
                }
            }
            OutputFormat::ShortId => {
                for row in rows {
                    println!("{}", row.short_display());
                }
            }
            OutputFormat::Tsv => {
                print!("{}", self.render_tsv(rows, visible));
            }
            _ => {
                println!("{}", self.render_table(rows, visible));
            }
        }
    }

    /// Columns selected by `visible`, in `visible` order
    fn selected(&self, visible: &[&str]) -> Vec<&ColumnDef> {
        visible
            .iter()
            .filter_map(|key| self.columns.iter().find(|c| c.key == *key))
            .collect()
    }

    fn render_table(&self, rows: &[TableRow], visible: &[&str]) -> String {
        let cols = self.selected(visible);

        let mut builder = Builder::default();
        let mut header: Vec<String> = vec!["SHORT".to_string()];
        header.extend(cols.iter().map(|c| c.header.to_string()));
        builder.push_record(header);

        for row in rows {
            let mut record = vec![row.short_display()];
            for col in &cols {
                let text = row
                    .cells
                    .get(col.key)
                    .map(|v| v.render())
                    .unwrap_or_else(|| "-".to_string());
                record.push(truncate_str(&text, col.width));
            }
            builder.push_record(record);
        }

        let mut table = builder.build();
        table.with(Style::psql());
        table.to_string()
    }

    fn render_tsv(&self, rows: &[TableRow], visible: &[&str]) -> String {
        let cols = self.selected(visible);
        let mut out = String::new();

        out.push_str("SHORT");
        for col in &cols {
            out.push('\t');
            out.push_str(col.header);
        }
        out.push('\n');

        for row in rows {
            out.push_str(&row.short_display());
            for col in &cols {
                let text = row
                    .cells
                    .get(col.key)
                    .map(|v| v.render_raw())
                    .unwrap_or_else(|| "-".to_string());
                out.push('\t');
                // Embedded separators would break the format
                out.push_str(&text.replace(['\t', '\n'], " "));
            }
            out.push('\n');
        }

        out
    }
}
