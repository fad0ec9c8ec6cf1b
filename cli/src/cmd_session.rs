// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use clap::{ArgMatches, Command, arg};
use colored::Colorize;
use shortlist_core::{Shortlist, SyncOutcome};

use crate::prompt::prompt_phone;

#[derive(Debug, Clone)]
pub struct CmdPhone {
    pub phone: Option<String>,
    pub forget: bool,
}

impl CmdPhone {
    pub const NAME: &str = "phone";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Set or forget the phone number your shortlist is kept under")
            .arg(arg!([PHONE] "Phone number, asked for if omitted"))
            .arg(arg!(--forget "Forget the phone number on this device").conflicts_with("PHONE"))
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            phone: matches.get_one::<String>("PHONE").cloned(),
            forget: matches.get_flag("forget"),
        }
    }

    pub async fn run(self, shortlist: &Shortlist) -> Result<(), Box<dyn Error>> {
        tracing::debug!(forget = self.forget, "updating phone number...");

        if self.forget {
            shortlist.forget_phone().await?;
            println!("Phone number forgotten, your shortlist stays on this device.");
            return Ok(());
        }

        let raw = match self.phone {
            Some(phone) => phone,
            None => match prompt_phone(shortlist.pending().await.as_ref())? {
                Some(phone) => phone.as_str().to_string(),
                None => return Ok(()),
            },
        };

        let submitted = shortlist.submit_phone(&raw).await?;
        println!("📱 Your shortlist is kept under {}", submitted.phone.to_string().bold());

        if let Some(sync) = submitted.sync {
            match sync.await? {
                SyncOutcome::RolledBack { warning, .. } => {
                    println!("{} {warning}", "Warning:".yellow());
                }
                _ => {
                    if let Some(id) = submitted.added {
                        println!("{} {id} added to your shortlist", "♥".red());
                    }
                }
            }
        }
        Ok(())
    }
}
