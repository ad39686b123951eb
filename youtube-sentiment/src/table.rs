//! Fixed-schema tables that flattened records are folded into.
//!
//! A fetch builds one [`Table`] per batch with [`Table::from_records`] and appends each of
//! them, in arrival order, onto an accumulator created with [`Table::empty`]. Every scalar
//! column is text, counts included, so values the API sends sometimes as numbers and sometimes
//! as strings all end up looking the same.

use crate::error::TableError;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Text,
    TextList,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub ty: ColumnType,
}

impl Column {
    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            ty: ColumnType::Text,
        }
    }

    pub const fn text_list(name: &'static str) -> Self {
        Self {
            name,
            ty: ColumnType::TextList,
        }
    }
}

/// Ordered column list shared by every row of a table.
pub type Schema = &'static [Column];

/// One value in a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Text(String),
    TextList(Vec<String>),
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<Vec<String>> for Cell {
    fn from(value: Vec<String>) -> Self {
        Cell::TextList(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map_or(Cell::Null, Into::into)
    }
}

/// A flat record that knows its own column layout.
pub trait Record {
    const SCHEMA: Schema;

    /// Cells in [`Self::SCHEMA`] order.
    fn into_row(self) -> Vec<Cell>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    schema: Schema,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// A table with columns but no rows.
    pub fn empty(schema: Schema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    pub fn from_records<R: Record>(records: impl IntoIterator<Item = R>) -> Self {
        Self {
            schema: R::SCHEMA,
            rows: records.into_iter().map(Record::into_row).collect(),
        }
    }

    pub fn schema(&self) -> Schema {
        self.schema
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of the named column, top to bottom.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Cell>> {
        let index = self.schema.iter().position(|c| c.name == name)?;
        Some(self.rows.iter().map(move |row| &row[index]))
    }

    /// Appends the rows of `other` after our own.
    ///
    /// Column names, types and order must match exactly.
    pub fn concat(&mut self, other: Table) -> Result<(), TableError> {
        if self.schema != other.schema {
            return Err(TableError::SchemaMismatch {
                expected: column_names(self.schema),
                actual: column_names(other.schema),
            });
        }
        self.rows.extend(other.rows);
        Ok(())
    }
}

fn column_names(schema: Schema) -> String {
    schema
        .iter()
        .map(|c| c.name)
        .collect::<Vec<_>>()
        .join(", ")
}
