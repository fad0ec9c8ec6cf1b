// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use clap::{ArgMatches, Command, arg};
use colored::Colorize;
use shortlist_core::{Error as CoreError, OrderBanner, Shortlist};

use crate::prompt::prompt_phone;
use crate::util::{arg_phone, get_phone};

#[derive(Debug, Clone)]
pub struct CmdOrder {
    pub phone: Option<String>,
}

impl CmdOrder {
    pub const NAME: &str = "order";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Send your shortlist to the store as an order request")
            .arg(arg_phone())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            phone: get_phone(matches),
        }
    }

    pub async fn run(self, shortlist: &Shortlist) -> Result<(), Box<dyn Error>> {
        tracing::debug!("placing order...");

        let order = match shortlist.place_order().await {
            Err(CoreError::MissingPhone) => {
                let raw = match self.phone {
                    Some(phone) => phone,
                    None => match prompt_phone(None)? {
                        Some(phone) => phone.as_str().to_string(),
                        None => return Err(CoreError::MissingPhone.into()),
                    },
                };
                shortlist.submit_phone(&raw).await?;
                shortlist.place_order().await?
            }
            result => result?,
        };

        println!(
            "✅ {} Order {} with {} item(s) is waiting for the store to confirm.",
            "Order placed!".green().bold(),
            order.id.bold(),
            order.items.len()
        );
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CmdBanner {
    pub dismiss: Option<String>,
}

impl CmdBanner {
    pub const NAME: &str = "banner";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Check whether the store confirmed one of your orders")
            .arg(arg!(--dismiss <ORDER_ID> "Never show the banner for this order again"))
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            dismiss: matches.get_one::<String>("dismiss").cloned(),
        }
    }

    pub async fn run(self, shortlist: &Shortlist) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "checking order banner...");

        if let Some(id) = self.dismiss {
            let banner = OrderBanner { id, when: None };
            shortlist.dismiss_banner(&banner).await?;
            println!("Banner for order {} dismissed.", banner.id.bold());
            return Ok(());
        }

        match shortlist.order_banner().await {
            Some(banner) => println!(
                "🎉 {} Order {} was confirmed {}.",
                "We received your order!".green().bold(),
                banner.id.bold(),
                banner.when.as_deref().unwrap_or("recently")
            ),
            None => match shortlist.last_order_id().await {
                Some(id) => println!("No news yet about your order {}.", id.bold()),
                None => println!("No confirmed orders."),
            },
        }
        Ok(())
    }
}
