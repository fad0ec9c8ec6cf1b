// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::borrow::Cow;
use std::fmt;

use unicode_width::UnicodeWidthStr;

/// A column of a [`Table`] over rows of type `T`.
pub trait TableColumn<T> {
    /// Column header, also used as the JSON key.
    fn name(&self) -> Cow<'_, str>;

    /// Cell text for one row.
    fn format<'a>(&self, data: &'a T) -> Cow<'a, str>;

    fn padding_direction(&self) -> PaddingDirection {
        PaddingDirection::Left
    }
}

/// Alignment of the cell text within a padded column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddingDirection {
    Left,
    Right,
}

/// How a [`Table`] is rendered.
pub trait TableStyle {
    fn fmt_table(
        &self,
        f: &mut fmt::Formatter<'_>,
        names: &[Cow<'_, str>],
        directions: &[PaddingDirection],
        rows: &[Vec<Cow<'_, str>>],
    ) -> fmt::Result;
}

#[derive(Debug)]
pub struct Table<'a, S, C, T> {
    style: S,
    columns: &'a [C],
    data: &'a [T],
}

impl<'a, S, C, T> Table<'a, S, C, T>
where
    S: TableStyle,
    C: TableColumn<T>,
{
    pub fn new(style: S, columns: &'a [C], data: &'a [T]) -> Self {
        Self {
            style,
            columns,
            data,
        }
    }
}

impl<S, C, T> fmt::Display for Table<'_, S, C, T>
where
    S: TableStyle,
    C: TableColumn<T>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<_> = self.columns.iter().map(TableColumn::name).collect();
        let directions: Vec<_> = self
            .columns
            .iter()
            .map(TableColumn::padding_direction)
            .collect();
        let rows: Vec<Vec<_>> = self
            .data
            .iter()
            .map(|row| self.columns.iter().map(|col| col.format(row)).collect())
            .collect();

        self.style.fmt_table(f, &names, &directions, &rows)
    }
}

/// Plain aligned columns separated by a space, no header.
#[derive(Debug, Clone)]
pub struct TableStyleBasic {
    separator: &'static str,
}

impl TableStyleBasic {
    pub fn new() -> Self {
        Self { separator: " " }
    }
}

impl TableStyle for TableStyleBasic {
    fn fmt_table(
        &self,
        f: &mut fmt::Formatter<'_>,
        _names: &[Cow<'_, str>],
        directions: &[PaddingDirection],
        rows: &[Vec<Cow<'_, str>>],
    ) -> fmt::Result {
        let mut widths = vec![0; directions.len()];
        for row in rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.width());
            }
        }

        for row in rows {
            let last = row.len().saturating_sub(1);
            for (i, cell) in row.iter().enumerate() {
                let pad = widths[i].saturating_sub(cell.width());
                match directions[i] {
                    // Last column does not need padding if it's left-aligned
                    PaddingDirection::Left if i == last => write!(f, "{cell}")?,
                    PaddingDirection::Left => write!(f, "{cell}{:pad$}", "")?,
                    PaddingDirection::Right => write!(f, "{:pad$}{cell}", "")?,
                }
                if i < last {
                    f.write_str(self.separator)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// A JSON array of objects keyed by column name.
#[derive(Debug, Clone)]
pub struct TableStyleJson;

impl TableStyleJson {
    pub fn new() -> Self {
        Self
    }
}

impl TableStyle for TableStyleJson {
    fn fmt_table(
        &self,
        f: &mut fmt::Formatter<'_>,
        names: &[Cow<'_, str>],
        _directions: &[PaddingDirection],
        rows: &[Vec<Cow<'_, str>>],
    ) -> fmt::Result {
        let quote = |s: &str| serde_json::to_string(s).map_err(|_| fmt::Error);

        f.write_str("[")?;
        for (i, row) in rows.iter().enumerate() {
            f.write_str(if i == 0 { "\n  {" } else { ",\n  {" })?;
            for (j, (name, cell)) in names.iter().zip(row).enumerate() {
                if j > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}: {}", quote(name)?, quote(cell)?)?;
            }
            f.write_str("}")?;
        }
        if !rows.is_empty() {
            f.write_str("\n")?;
        }
        f.write_str("]")
    }
}
