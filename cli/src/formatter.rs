// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::borrow::Cow;
use std::fmt;

use shortlist_core::{ItemSet, Product, ProductId};

use crate::table::{PaddingDirection, Table, TableColumn, TableStyleBasic, TableStyleJson};
use crate::util::{ArgOutputFormat, format_price};

/// Renders the shortlisted product ids.
#[derive(Debug)]
pub struct ItemFormatter {
    columns: Vec<ItemColumn>,
    format: ArgOutputFormat,
}

impl ItemFormatter {
    pub fn new() -> Self {
        Self {
            columns: vec![ItemColumn::Index, ItemColumn::Id],
            format: ArgOutputFormat::Table,
        }
    }

    pub fn with_output_format(mut self, format: ArgOutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn format(&self, items: &ItemSet) -> String {
        let rows: Vec<_> = items.iter().enumerate().map(|(i, id)| (i + 1, id)).collect();
        render(self.format, &self.columns, &rows)
    }
}

#[derive(Debug, Clone, Copy)]
enum ItemColumn {
    Index,
    Id,
}

impl<'p> TableColumn<(usize, &'p ProductId)> for ItemColumn {
    fn name(&self) -> Cow<'_, str> {
        match self {
            Self::Index => "#",
            Self::Id => "Product",
        }
        .into()
    }

    fn format<'a>(&self, data: &'a (usize, &'p ProductId)) -> Cow<'a, str> {
        match self {
            Self::Index => data.0.to_string().into(),
            Self::Id => data.1.as_str().into(),
        }
    }

    fn padding_direction(&self) -> PaddingDirection {
        match self {
            Self::Index => PaddingDirection::Right,
            Self::Id => PaddingDirection::Left,
        }
    }
}

/// A catalog product together with whether it is on the shortlist.
#[derive(Debug)]
pub struct ProductRow<'a> {
    pub product: &'a Product,
    pub shortlisted: bool,
}

/// Renders a page of the catalog.
#[derive(Debug)]
pub struct ProductFormatter {
    columns: Vec<ProductColumn>,
    format: ArgOutputFormat,
}

impl ProductFormatter {
    pub fn new() -> Self {
        Self {
            columns: vec![
                ProductColumn::Mark,
                ProductColumn::Id,
                ProductColumn::Price,
                ProductColumn::Stock,
                ProductColumn::Title,
            ],
            format: ArgOutputFormat::Table,
        }
    }

    pub fn with_output_format(mut self, format: ArgOutputFormat) -> Self {
        self.format = format;
        if format == ArgOutputFormat::Json {
            self.columns.push(ProductColumn::Category);
        }
        self
    }

    pub fn format(&self, rows: &[ProductRow<'_>]) -> String {
        render(self.format, &self.columns, rows)
    }
}

#[derive(Debug, Clone, Copy)]
enum ProductColumn {
    Mark,
    Id,
    Price,
    Stock,
    Title,
    Category,
}

impl<'r> TableColumn<ProductRow<'r>> for ProductColumn {
    fn name(&self) -> Cow<'_, str> {
        match self {
            Self::Mark => "Shortlisted",
            Self::Id => "ID",
            Self::Price => "Price",
            Self::Stock => "Stock",
            Self::Title => "Title",
            Self::Category => "Category",
        }
        .into()
    }

    fn format<'a>(&self, row: &'a ProductRow<'r>) -> Cow<'a, str> {
        match self {
            Self::Mark => (if row.shortlisted { "♥" } else { " " }).into(),
            Self::Id => row.product.id.as_str().into(),
            Self::Price => format_price(row.product.price).into(),
            Self::Stock => match (row.product.available, row.product.qty) {
                (false, _) | (_, 0) => "sold out".into(),
                (true, qty) => qty.to_string().into(),
            },
            Self::Title => row.product.title.as_str().into(),
            Self::Category => row.product.category.as_str().into(),
        }
    }

    fn padding_direction(&self) -> PaddingDirection {
        match self {
            Self::Price | Self::Stock => PaddingDirection::Right,
            _ => PaddingDirection::Left,
        }
    }
}

fn render<T, C: TableColumn<T>>(format: ArgOutputFormat, columns: &[C], rows: &[T]) -> String {
    match format {
        ArgOutputFormat::Json => Table::new(TableStyleJson::new(), columns, rows).to_string(),
        ArgOutputFormat::Table => Table::new(TableStyleBasic::new(), columns, rows).to_string(),
    }
}

/// Wraps a list of image URLs for display.
#[derive(Debug)]
pub struct ImageList<'a>(pub &'a [String]);

impl fmt::Display for ImageList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, url) in self.0.iter().enumerate() {
            if i == 0 {
                writeln!(f, "{:>2}. {url} (cover)", i + 1)?;
            } else {
                writeln!(f, "{:>2}. {url}", i + 1)?;
            }
        }
        Ok(())
    }
}
