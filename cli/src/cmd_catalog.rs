// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use clap::{ArgMatches, Command, arg, value_parser};
use colored::Colorize;
use shortlist_core::{ProductId, ProductQuery, Shortlist};

use crate::formatter::{ImageList, ProductFormatter, ProductRow};
use crate::util::ArgOutputFormat;

#[derive(Debug, Clone)]
pub struct CmdProductList {
    pub query: ProductQuery,
    pub prefetch: bool,
    pub output_format: ArgOutputFormat,
}

impl CmdProductList {
    pub const NAME: &str = "list";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("ls")
            .about("Browse the catalog")
            .arg(arg!(-q --query <QUERY> "Search text"))
            .arg(arg!(--category <CATEGORY> "Category, e.g. Rings"))
            .arg(
                arg!(-n --limit <LIMIT> "Number of products to show")
                    .value_parser(value_parser!(u32).range(1..=100))
                    .default_value("20"),
            )
            .arg(
                arg!(--offset <OFFSET> "Number of products to skip")
                    .value_parser(value_parser!(u32)),
            )
            .arg(arg!(--prefetch "Fetch the full galleries of the listed products"))
            .arg(ArgOutputFormat::arg())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            query: ProductQuery {
                limit: matches.get_one::<u32>("limit").copied(),
                offset: matches.get_one::<u32>("offset").copied(),
                q: matches.get_one::<String>("query").cloned(),
                category: matches.get_one::<String>("category").cloned(),
            },
            prefetch: matches.get_flag("prefetch"),
            output_format: ArgOutputFormat::from(matches),
        }
    }

    pub async fn run(self, shortlist: &Shortlist) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "listing products...");

        let page = shortlist.list_products(&self.query).await?;
        let items = shortlist.items().await;

        let rows: Vec<_> = page
            .items
            .iter()
            .map(|product| ProductRow {
                product,
                shortlisted: items.contains(&ProductId::from(product.id.as_str())),
            })
            .collect();
        let formatter = ProductFormatter::new().with_output_format(self.output_format);
        print!("{}", formatter.format(&rows));

        if self.output_format == ArgOutputFormat::Table {
            let shown = self.query.offset.unwrap_or(0) as usize + page.items.len();
            println!("{}", format!("{shown} of {} products", page.total).dimmed());
            if let Some(next) = page.next_offset {
                println!("{}", format!("More: --offset {next}").dimmed());
            }
        }

        if self.prefetch {
            let fetched = shortlist.prefetch_images(&page.items).await;
            tracing::info!(fetched, "prefetched galleries");
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CmdProductImages {
    pub id: ProductId,
}

impl CmdProductImages {
    pub const NAME: &str = "images";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Show the image gallery of a product")
            .arg(arg!(<ID> "Product ID"))
    }

    pub fn from(matches: &ArgMatches) -> Self {
        let id = match matches.get_one::<String>("ID") {
            Some(id) => ProductId::from(id.as_str()),
            None => unreachable!("ID is required"),
        };
        Self { id }
    }

    pub async fn run(self, shortlist: &Shortlist) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "fetching product images...");

        let images = shortlist.ensure_images(&self.id, &[]).await;
        if images.is_empty() {
            println!("No images for {}.", self.id.as_str().bold());
        } else {
            print!("{}", ImageList(&images));
        }
        Ok(())
    }
}
