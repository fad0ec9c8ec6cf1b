// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use clap::{ArgMatches, Command};
use colored::Colorize;
use shortlist_core::{RefreshOutcome, Shortlist};

use crate::formatter::ItemFormatter;

#[derive(Debug, Default, Clone, Copy)]
pub struct CmdDashboard;

impl CmdDashboard {
    pub const NAME: &str = "dashboard";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Show the dashboard, which includes order updates and your shortlist")
    }

    pub fn from(_matches: &ArgMatches) -> Self {
        Self
    }

    /// Show the dashboard with the order banner and the shortlist.
    pub async fn run(self, shortlist: &Shortlist) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "generating dashboard...");

        if let Some(banner) = shortlist.order_banner().await {
            let when = banner.when.as_deref().unwrap_or("recently");
            println!(
                "🎉 {} Order {} was confirmed {}.",
                "We received your order!".green().bold(),
                banner.id.bold(),
                when
            );
            println!(
                "   {}",
                format!("Run `shortlist banner --dismiss {}` to hide this.", banner.id).dimmed()
            );
            println!();
        }

        if let RefreshOutcome::Failed(err) = shortlist.refresh().await {
            println!("{} could not refresh shortlist: {err}", "Warning:".yellow());
        }

        let snapshot = shortlist.snapshot().await;
        println!("💍 {}", "Shortlist".bold());
        if snapshot.items.is_empty() {
            println!("{}", "Nothing shortlisted yet.".italic());
        } else {
            print!("{}", ItemFormatter::new().format(&snapshot.items));
        }
        println!();

        match snapshot.customer_phone {
            Some(phone) => println!("📱 {phone} ({})", snapshot.session_id.as_str().dimmed()),
            None => println!(
                "📱 {} ({})",
                "No phone number on file".italic(),
                snapshot.session_id.as_str().dimmed()
            ),
        }
        Ok(())
    }
}
