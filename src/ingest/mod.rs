// src/ingest/mod.rs
use anyhow::{Context, Result};
use std::{collections::HashMap, fs, path::Path};
use thiserror::Error;
use tracing::{debug, info, instrument};

pub mod split;

use split::split_line;

/// Ingestion policy violations, raised only under [`Tolerance::Strict`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IngestError {
    #[error("line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("duplicate column {name:?} in header")]
    DuplicateColumn { name: String },
}

/// What to do with rows and headers that don't fit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tolerance {
    /// Drop rows with the wrong field count; a repeated header name keeps its last position.
    #[default]
    Lenient,
    /// Fail on the first wrong-width row or repeated header name.
    Strict,
}

/// Treatment of empty cells at load time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmptyCells {
    #[default]
    Keep,
    /// Replace empty cells with the literal `"0"`.
    ZeroFill,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestOptions {
    pub tolerance: Tolerance,
    pub empty_cells: EmptyCells,
}

/// Parsed CSV: header columns plus every accepted row, in file order.
#[derive(Debug, Default)]
pub struct Dataset {
    columns: Vec<String>,
    /// column name → position in each row
    index: HashMap<String, usize>,
    rows: Vec<Vec<String>>,
    rejected_rows: usize,
}

/// One row of a [`Dataset`], addressed by column name.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    index: &'a HashMap<String, usize>,
    values: &'a [String],
}

impl<'a> Record<'a> {
    /// Cell value for `column`, or `None` if the header has no such column.
    pub fn get(&self, column: &str) -> Option<&'a str> {
        self.index
            .get(column)
            .and_then(|&i| self.values.get(i))
            .map(String::as_str)
    }
}

impl Dataset {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Names from `wanted` that the header does not carry, in the order given.
    pub fn missing_columns<'n>(&self, wanted: &[&'n str]) -> Vec<&'n str> {
        wanted.iter().copied().filter(|name| !self.has_column(name)).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Data lines dropped for having the wrong number of fields.
    pub fn rejected_rows(&self) -> usize {
        self.rejected_rows
    }

    pub fn record(&self, i: usize) -> Option<Record<'_>> {
        self.rows.get(i).map(|values| Record {
            index: &self.index,
            values,
        })
    }

    pub fn records(&self) -> impl Iterator<Item = Record<'_>> + '_ {
        self.rows.iter().map(move |values| Record {
            index: &self.index,
            values,
        })
    }
}

/// Read and parse the CSV at `path`.
///
/// Bytes are decoded as Latin-1 (ISO-8859-1): each byte becomes the code point of
/// the same value, so decoding cannot fail. Only opening/reading the file can.
#[instrument(level = "info", skip(path, options), fields(path = %path.as_ref().display()))]
pub fn read_dataset<P: AsRef<Path>>(path: P, options: &IngestOptions) -> Result<Dataset> {
    let path = path.as_ref();
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let text = encoding_rs::mem::decode_latin1(&bytes);

    let dataset =
        parse_dataset(&text, options).with_context(|| format!("parsing {}", path.display()))?;

    info!(
        rows = dataset.len(),
        columns = dataset.columns.len(),
        rejected = dataset.rejected_rows,
        "loaded dataset"
    );
    Ok(dataset)
}

/// Parse already-decoded CSV text. The first line is the header.
pub fn parse_dataset(text: &str, options: &IngestOptions) -> Result<Dataset, IngestError> {
    let mut lines = text.lines();
    let Some(header_line) = lines.next() else {
        return Ok(Dataset::default());
    };

    let columns = split_line(header_line);
    let mut index = HashMap::with_capacity(columns.len());
    for (i, name) in columns.iter().enumerate() {
        if index.insert(name.clone(), i).is_some() && options.tolerance == Tolerance::Strict {
            return Err(IngestError::DuplicateColumn { name: name.clone() });
        }
    }

    let mut rows = Vec::new();
    let mut rejected_rows = 0;

    // physical line numbers are 1-based and count the header
    for (line_no, line) in (2..).zip(lines) {
        if line.trim().is_empty() {
            continue;
        }

        let mut fields = split_line(line);
        if fields.len() != columns.len() {
            match options.tolerance {
                Tolerance::Strict => {
                    return Err(IngestError::FieldCount {
                        line: line_no,
                        expected: columns.len(),
                        found: fields.len(),
                    })
                }
                Tolerance::Lenient => {
                    debug!(
                        line = line_no,
                        expected = columns.len(),
                        found = fields.len(),
                        "dropping row"
                    );
                    rejected_rows += 1;
                    continue;
                }
            }
        }

        if options.empty_cells == EmptyCells::ZeroFill {
            for f in fields.iter_mut().filter(|f| f.is_empty()) {
                f.push('0');
            }
        }
        rows.push(fields);
    }

    Ok(Dataset {
        columns,
        index,
        rows,
        rejected_rows,
    })
}
