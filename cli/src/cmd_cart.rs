// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use clap::{Arg, ArgAction, ArgMatches, Command, arg};
use colored::Colorize;
use shortlist_core::{ProductId, RefreshOutcome, Shortlist, SyncOutcome, ToggleResult};

use crate::formatter::ItemFormatter;
use crate::prompt::prompt_phone;
use crate::util::{ArgOutputFormat, arg_phone, get_phone};

#[derive(Debug, Clone)]
pub struct CmdToggle {
    pub ids: Vec<ProductId>,
    pub phone: Option<String>,
    pub output_format: ArgOutputFormat,
}

impl CmdToggle {
    pub const NAME: &str = "toggle";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("heart")
            .about("Add products to or remove them from your shortlist")
            .arg(arg_ids())
            .arg(arg_phone())
            .arg(ArgOutputFormat::arg())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            ids: get_ids(matches),
            phone: get_phone(matches),
            output_format: ArgOutputFormat::from(matches),
        }
    }

    pub async fn run(self, shortlist: &Shortlist) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "toggling products...");

        for id in self.ids {
            match shortlist.toggle(id.clone()).await {
                ToggleResult::Applied { added, sync, .. } => {
                    if !report_sync(sync.await?) {
                        continue;
                    }
                    if added {
                        println!("{} {id} added to your shortlist", "♥".red());
                    } else {
                        println!("{} {id} removed from your shortlist", "♡".dimmed());
                    }
                }

                ToggleResult::NeedsPhone(_) => {
                    let phone = match &self.phone {
                        Some(phone) => Some(phone.clone()),
                        None => prompt_phone(Some(&id))?.map(|p| p.as_str().to_string()),
                    };
                    let Some(raw) = phone else {
                        shortlist.cancel_pending().await;
                        println!("{} {id} was not shortlisted", "Skipped:".yellow());
                        continue;
                    };

                    let submitted = shortlist.submit_phone(&raw).await?;
                    let kept = match submitted.sync {
                        Some(sync) => report_sync(sync.await?),
                        None => true,
                    };
                    if let (true, Some(id)) = (kept, submitted.added) {
                        println!("{} {id} added to your shortlist", "♥".red());
                    }
                }
            }
        }

        let items = shortlist.items().await;
        let formatter = ItemFormatter::new().with_output_format(self.output_format);
        print!("{}", formatter.format(&items));
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CmdList {
    pub refresh: bool,
    pub output_format: ArgOutputFormat,
}

impl CmdList {
    pub const NAME: &str = "list";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("ls")
            .about("List your shortlist")
            .arg(arg!(-r --refresh "Fetch the shortlist kept by the store first"))
            .arg(ArgOutputFormat::arg())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            refresh: matches.get_flag("refresh"),
            output_format: ArgOutputFormat::from(matches),
        }
    }

    pub async fn run(self, shortlist: &Shortlist) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "listing shortlist...");

        if self.refresh {
            match shortlist.refresh().await {
                RefreshOutcome::Replaced(items) => {
                    tracing::info!(items = items.len(), "adopted the store's shortlist");
                }
                RefreshOutcome::Failed(err) => {
                    println!("{} could not refresh shortlist: {err}", "Warning:".yellow());
                }
                RefreshOutcome::Skipped => {
                    tracing::debug!("no phone on file, showing local shortlist");
                }
                RefreshOutcome::Unchanged | RefreshOutcome::Stale => {}
            }
        }

        let items = shortlist.items().await;
        let formatter = ItemFormatter::new().with_output_format(self.output_format);
        print!("{}", formatter.format(&items));
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CmdSync;

impl CmdSync {
    pub const NAME: &str = "sync";

    pub fn command() -> Command {
        Command::new(Self::NAME).about("Send your shortlist to the store")
    }

    pub fn from(_matches: &ArgMatches) -> Self {
        Self
    }

    pub async fn run(self, shortlist: &Shortlist) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "syncing shortlist...");

        match shortlist.push().await {
            SyncOutcome::Skipped => {
                println!("No phone number on file, your shortlist stays on this device.");
            }
            SyncOutcome::InSync => println!("Your shortlist is up to date."),
            outcome => {
                report_sync(outcome);
            }
        }
        Ok(())
    }
}

/// Tells the shopper about what reconciliation did to their shortlist.
///
/// Returns `false` if the change was rolled back.
fn report_sync(outcome: SyncOutcome) -> bool {
    match outcome {
        SyncOutcome::Corrected(items) => println!(
            "{} the store kept {} item(s) on your shortlist",
            "Updated:".cyan(),
            items.len()
        ),
        SyncOutcome::RolledBack { warning, .. } => {
            println!("{} {warning}", "Warning:".yellow());
            return false;
        }
        SyncOutcome::Stale => tracing::debug!("sync superseded by a newer one"),
        SyncOutcome::Skipped | SyncOutcome::InSync => {}
    }
    true
}

fn arg_ids() -> Arg {
    arg!(<ID> "Product IDs, e.g. RING-001")
        .num_args(1..)
        .action(ArgAction::Append)
}

fn get_ids(matches: &ArgMatches) -> Vec<ProductId> {
    matches
        .get_many::<String>("ID")
        .map(|ids| ids.map(|id| ProductId::from(id.as_str())).collect())
        .unwrap_or_default()
}
