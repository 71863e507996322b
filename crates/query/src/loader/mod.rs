//! Schema-driven CSV table loading.
//!
//! Every table declares its columns and their semantic types up front. The
//! loader checks the header row against that schema, coerces each cell into a
//! [`Value`], and only then hands the typed row to [`Record::from_row`]. A
//! cell that cannot be coerced aborts the whole load with the table, row and
//! column that failed.

mod dataset;
mod records;

use std::io::Read;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use thiserror::Error;

pub use dataset::{Dataset, Table};

/// Timestamp layouts accepted for timestamp columns, tried in order.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Date layout accepted for date columns.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors that can occur while loading a table.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be opened or read.
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The delimited text is malformed.
    #[error("CSV error in table {table}: {source}")]
    Csv {
        table: &'static str,
        #[source]
        source: csv::Error,
    },

    /// A declared column is absent from the header row.
    #[error("table {table} is missing column {column:?}")]
    MissingColumn {
        table: &'static str,
        column: &'static str,
    },

    /// A cell could not be coerced to its declared type.
    #[error(
        "table {table}, row {row}, column {column}: \
         cannot read {value:?} as {expected} ({reason})"
    )]
    Coerce {
        table: &'static str,
        row: usize,
        column: &'static str,
        value: String,
        expected: &'static str,
        reason: String,
    },

    /// A row's cells parse but contradict each other.
    #[error("table {table}, row {row}: {reason}")]
    Inconsistent {
        table: &'static str,
        row: usize,
        reason: &'static str,
    },

    /// A record asked for a column it never declared, or with the wrong type.
    #[error("table {table} reads column {column:?} outside its schema")]
    Undeclared {
        table: &'static str,
        column: &'static str,
    },
}

/// Semantic type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Text,
    Integer,
    Decimal,
    Date,
    Timestamp,
}

impl ColumnType {
    const fn label(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::Date => "date",
            Self::Timestamp => "timestamp",
        }
    }
}

/// A declared column: name, type and whether empty cells are allowed.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub name: &'static str,
    pub ty: ColumnType,
    pub nullable: bool,
}

impl Column {
    /// A column that must always hold a value.
    #[must_use]
    pub const fn required(name: &'static str, ty: ColumnType) -> Self {
        Self {
            name,
            ty,
            nullable: false,
        }
    }

    /// A column whose cells may be empty.
    #[must_use]
    pub const fn optional(name: &'static str, ty: ColumnType) -> Self {
        Self {
            name,
            ty,
            nullable: true,
        }
    }

    fn coerce(&self, raw: &str) -> Result<Value, String> {
        if raw.is_empty() {
            return if self.nullable {
                Ok(Value::Null)
            } else {
                Err("value is required".to_owned())
            };
        }

        match self.ty {
            ColumnType::Text => Ok(Value::Text(raw.to_owned())),
            ColumnType::Integer => raw
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|e| e.to_string()),
            ColumnType::Decimal => Decimal::from_str(raw)
                .map(Value::Decimal)
                .map_err(|e| e.to_string()),
            ColumnType::Date => NaiveDate::parse_from_str(raw, DATE_FORMAT)
                .map(Value::Date)
                .map_err(|e| e.to_string()),
            ColumnType::Timestamp => parse_timestamp(raw).map(Value::Timestamp),
        }
    }
}

fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, String> {
    let mut last_err = String::new();
    for format in TIMESTAMP_FORMATS {
        match NaiveDateTime::parse_from_str(raw, format) {
            Ok(ts) => return Ok(ts),
            Err(e) => last_err = e.to_string(),
        }
    }
    Err(last_err)
}

/// A coerced cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Text(String),
    Integer(i64),
    Decimal(Decimal),
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
}

/// A row whose cells have all been coerced to their declared types.
pub struct Row<'a> {
    table: &'static str,
    number: usize,
    schema: &'static [Column],
    values: &'a [Value],
}

impl Row<'_> {
    /// 1-based data row number (header excluded).
    #[must_use]
    pub const fn number(&self) -> usize {
        self.number
    }

    /// An error for a row whose cells contradict each other.
    #[must_use]
    pub const fn inconsistent(&self, reason: &'static str) -> LoadError {
        LoadError::Inconsistent {
            table: self.table,
            row: self.number,
            reason,
        }
    }

    fn value(&self, column: &'static str) -> Result<&Value, LoadError> {
        self.schema
            .iter()
            .position(|c| c.name == column)
            .and_then(|i| self.values.get(i))
            .ok_or(LoadError::Undeclared {
                table: self.table,
                column,
            })
    }

    const fn undeclared(&self, column: &'static str) -> LoadError {
        LoadError::Undeclared {
            table: self.table,
            column,
        }
    }

    /// Text cell.
    ///
    /// # Errors
    ///
    /// Returns an error if the column is not a declared text column.
    pub fn text(&self, column: &'static str) -> Result<&str, LoadError> {
        match self.value(column)? {
            Value::Text(s) => Ok(s),
            _ => Err(self.undeclared(column)),
        }
    }

    /// Text cell parsed into a domain type.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Coerce`] if `T` rejects the text.
    pub fn parse<T>(&self, column: &'static str) -> Result<T, LoadError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let raw = self.text(column)?;
        raw.parse::<T>().map_err(|e| LoadError::Coerce {
            table: self.table,
            row: self.number,
            column,
            value: raw.to_owned(),
            expected: std::any::type_name::<T>()
                .rsplit("::")
                .next()
                .unwrap_or("value"),
            reason: e.to_string(),
        })
    }

    /// Integer cell narrowed to `T`.
    ///
    /// # Errors
    ///
    /// Returns an error if the column is not an integer column or the value
    /// does not fit in `T`.
    pub fn integer<T: TryFrom<i64>>(&self, column: &'static str) -> Result<T, LoadError> {
        self.opt_integer(column)?
            .ok_or_else(|| self.undeclared(column))
    }

    /// Nullable integer cell narrowed to `T`.
    ///
    /// # Errors
    ///
    /// Returns an error if the column is not an integer column or the value
    /// does not fit in `T`.
    pub fn opt_integer<T: TryFrom<i64>>(
        &self,
        column: &'static str,
    ) -> Result<Option<T>, LoadError> {
        match self.value(column)? {
            Value::Null => Ok(None),
            Value::Integer(n) => T::try_from(*n).map(Some).map_err(|_| LoadError::Coerce {
                table: self.table,
                row: self.number,
                column,
                value: n.to_string(),
                expected: ColumnType::Integer.label(),
                reason: "value out of range".to_owned(),
            }),
            _ => Err(self.undeclared(column)),
        }
    }

    /// Decimal cell.
    ///
    /// # Errors
    ///
    /// Returns an error if the column is not a required decimal column.
    pub fn decimal(&self, column: &'static str) -> Result<Decimal, LoadError> {
        self.opt_decimal(column)?
            .ok_or_else(|| self.undeclared(column))
    }

    /// Nullable decimal cell.
    ///
    /// # Errors
    ///
    /// Returns an error if the column is not a decimal column.
    pub fn opt_decimal(&self, column: &'static str) -> Result<Option<Decimal>, LoadError> {
        match self.value(column)? {
            Value::Null => Ok(None),
            Value::Decimal(d) => Ok(Some(*d)),
            _ => Err(self.undeclared(column)),
        }
    }

    /// Date cell.
    ///
    /// # Errors
    ///
    /// Returns an error if the column is not a required date column.
    pub fn date(&self, column: &'static str) -> Result<NaiveDate, LoadError> {
        match self.value(column)? {
            Value::Date(d) => Ok(*d),
            _ => Err(self.undeclared(column)),
        }
    }

    /// Timestamp cell.
    ///
    /// # Errors
    ///
    /// Returns an error if the column is not a required timestamp column.
    pub fn timestamp(&self, column: &'static str) -> Result<NaiveDateTime, LoadError> {
        self.opt_timestamp(column)?
            .ok_or_else(|| self.undeclared(column))
    }

    /// Nullable timestamp cell.
    ///
    /// # Errors
    ///
    /// Returns an error if the column is not a timestamp column.
    pub fn opt_timestamp(&self, column: &'static str) -> Result<Option<NaiveDateTime>, LoadError> {
        match self.value(column)? {
            Value::Null => Ok(None),
            Value::Timestamp(ts) => Ok(Some(*ts)),
            _ => Err(self.undeclared(column)),
        }
    }
}

/// A row type that can be loaded from a delimited table.
pub trait Record: Sized {
    /// Table name used in error messages and logs.
    const TABLE: &'static str;
    /// File name inside a data directory.
    const FILE_NAME: &'static str;
    /// Declared columns.
    const SCHEMA: &'static [Column];

    /// Build a record from a coerced row.
    ///
    /// # Errors
    ///
    /// Returns an error if a cell violates a domain rule (a malformed phone
    /// number, say) or the record reads outside its schema.
    fn from_row(row: &Row<'_>) -> Result<Self, LoadError>;
}

/// Load every row of `R` from a reader of delimited text.
///
/// The header row is validated against `R::SCHEMA`; extra columns are
/// ignored. Rows are returned in file order.
///
/// # Errors
///
/// Returns [`LoadError`] if the text is not valid CSV, a declared column is
/// missing, or any cell fails coercion.
pub fn read_table<R: Record>(reader: impl Read) -> Result<Vec<R>, LoadError> {
    let csv_err = |source| LoadError::Csv {
        table: R::TABLE,
        source,
    };

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers().map_err(csv_err)?.clone();
    let positions = R::SCHEMA
        .iter()
        .map(|col| {
            headers
                .iter()
                .position(|h| h == col.name)
                .ok_or(LoadError::MissingColumn {
                    table: R::TABLE,
                    column: col.name,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut rows = Vec::new();
    let mut values = Vec::with_capacity(R::SCHEMA.len());

    for (idx, record) in rdr.records().enumerate() {
        let record = record.map_err(csv_err)?;
        let number = idx + 1;

        values.clear();
        for (col, &pos) in R::SCHEMA.iter().zip(&positions) {
            let raw = record.get(pos).unwrap_or_default();
            let value = col.coerce(raw).map_err(|reason| LoadError::Coerce {
                table: R::TABLE,
                row: number,
                column: col.name,
                value: raw.to_owned(),
                expected: col.ty.label(),
                reason,
            })?;
            values.push(value);
        }

        let row = Row {
            table: R::TABLE,
            number,
            schema: R::SCHEMA,
            values: &values,
        };
        rows.push(R::from_row(&row)?);
    }

    tracing::debug!(table = R::TABLE, rows = rows.len(), "Loaded table");
    Ok(rows)
}
