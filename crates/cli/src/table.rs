// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Column-aligned table output.

use std::io::Write;

use crate::color;

/// Column text alignment.
pub enum Align {
    Left,
    Right,
}

pub struct Column {
    pub name: &'static str,
    pub align: Align,
}

impl Column {
    pub fn left(name: &'static str) -> Self {
        Self {
            name,
            align: Align::Left,
        }
    }

    pub fn right(name: &'static str) -> Self {
        Self {
            name,
            align: Align::Right,
        }
    }
}

/// A tabular renderer that auto-computes column widths from data.
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<String>>,
    colorize: bool,
}

/// Column separator: double space.
const SEP: &str = "  ";

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            colorize: color::should_colorize(),
        }
    }

    /// Create a table that never emits color codes.
    #[cfg(test)]
    pub fn plain(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            colorize: false,
        }
    }

    pub fn row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    /// Render header and rows. The last left-aligned column is not padded.
    pub fn render(&self, out: &mut impl Write) {
        if self.rows.is_empty() {
            return;
        }
        let widths = self.widths();

        let header: Vec<String> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                let cell = self.pad(i, col.name, widths[i]);
                if self.colorize {
                    color::apply_header(&cell)
                } else {
                    cell
                }
            })
            .collect();
        let _ = writeln!(out, "{}", header.join(SEP).trim_end());

        for row in &self.rows {
            let cells: Vec<String> = (0..self.columns.len())
                .map(|i| {
                    let raw = row.get(i).map(String::as_str).unwrap_or("");
                    self.pad(i, raw, widths[i])
                })
                .collect();
            let _ = writeln!(out, "{}", cells.join(SEP).trim_end());
        }
    }

    fn pad(&self, i: usize, text: &str, width: usize) -> String {
        let is_last = i + 1 == self.columns.len();
        match self.columns[i].align {
            Align::Left if is_last => text.to_string(),
            Align::Left => format!("{text:<width$}"),
            Align::Right => format!("{text:>width$}"),
        }
    }

    fn widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                self.rows
                    .iter()
                    .map(|row| row.get(i).map_or(0, |s| s.chars().count()))
                    .max()
                    .unwrap_or(0)
                    .max(col.name.len())
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
