// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, ffi::OsString, path::PathBuf};

use clap::{ArgMatches, Command, ValueHint, arg, builder::styling, crate_version, value_parser};
use colored::Colorize;
use futures::{FutureExt, future::BoxFuture};
use shortlist_core::{APP_NAME, Shortlist};
use tracing_subscriber::EnvFilter;

use crate::cmd_cart::{CmdList, CmdSync, CmdToggle};
use crate::cmd_catalog::{CmdProductImages, CmdProductList};
use crate::cmd_dashboard::CmdDashboard;
use crate::cmd_generate_completion::CmdGenerateCompletion;
use crate::cmd_order::{CmdBanner, CmdOrder};
use crate::cmd_session::CmdPhone;
use crate::config::parse_config;

/// Run the shortlist command-line interface.
pub async fn run() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse() {
        Ok(cli) => {
            if let Err(e) = cli.run().await {
                println!("{} {}", "Error:".red(), e);
            }
        }
        Err(e) => println!("{} {}", "Error:".red(), e),
    };
    Ok(())
}

/// Command-line interface
#[derive(Debug)]
pub struct Cli {
    /// Path to the configuration file
    pub config: Option<PathBuf>,

    /// The command to execute
    pub command: Commands,
}

impl Cli {
    /// Create the command-line interface
    pub fn command() -> Command {
        const STYLES: styling::Styles = styling::Styles::styled()
            .header(styling::AnsiColor::Green.on_default().bold())
            .usage(styling::AnsiColor::Green.on_default().bold())
            .literal(styling::AnsiColor::Blue.on_default().bold())
            .placeholder(styling::AnsiColor::Cyan.on_default());

        Command::new(APP_NAME)
            .about("Shortlist jewelry you love and send it to the store.")
            .author("Zexin Yuan <aim@yzx9.xyz>")
            .version(crate_version!())
            .styles(STYLES)
            .subcommand_required(false) // allow default to dashboard
            .arg_required_else_help(false)
            .arg(
                arg!(-c --config [CONFIG] "Path to the configuration file")
                    .long_help(
                        "\
Path to the configuration file. Defaults to $XDG_CONFIG_HOME/shortlist/config.toml on Linux and \
MacOS, %LOCALAPPDATA%/shortlist/config.toml on Windows.",
                    )
                    .value_parser(value_parser!(PathBuf))
                    .value_hint(ValueHint::FilePath),
            )
            .subcommand(CmdDashboard::command())
            .subcommand(CmdToggle::command())
            .subcommand(CmdList::command())
            .subcommand(CmdSync::command())
            .subcommand(CmdPhone::command())
            .subcommand(CmdOrder::command())
            .subcommand(CmdBanner::command())
            .subcommand(
                Command::new("product")
                    .alias("p")
                    .about("Browse the catalog")
                    .arg_required_else_help(true)
                    .subcommand_required(true)
                    .subcommand(CmdProductList::command())
                    .subcommand(CmdProductImages::command()),
            )
            .subcommand(CmdGenerateCompletion::command())
    }

    /// Parse the command-line arguments
    pub fn parse() -> Result<Self, Box<dyn Error>> {
        let commands = Self::command();
        let matches = commands.get_matches();
        Self::from(matches)
    }

    /// Parse the specified arguments
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, Box<dyn Error>>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let commands = Self::command();
        let matches = commands.try_get_matches_from(args)?;
        Self::from(matches)
    }

    /// Create a CLI instance from the `ArgMatches`
    pub fn from(matches: ArgMatches) -> Result<Self, Box<dyn Error>> {
        use Commands::*;
        let command = match matches.subcommand() {
            Some((CmdDashboard::NAME, matches)) => Dashboard(CmdDashboard::from(matches)),
            Some((CmdToggle::NAME, matches)) => Toggle(CmdToggle::from(matches)),
            Some((CmdList::NAME, matches)) => List(CmdList::from(matches)),
            Some((CmdSync::NAME, matches)) => Sync(CmdSync::from(matches)),
            Some((CmdPhone::NAME, matches)) => Phone(CmdPhone::from(matches)),
            Some((CmdOrder::NAME, matches)) => Order(CmdOrder::from(matches)),
            Some((CmdBanner::NAME, matches)) => Banner(CmdBanner::from(matches)),
            Some(("product", matches)) => match matches.subcommand() {
                Some((CmdProductList::NAME, matches)) => {
                    ProductList(CmdProductList::from(matches))
                }
                Some((CmdProductImages::NAME, matches)) => {
                    ProductImages(CmdProductImages::from(matches))
                }
                _ => unreachable!(),
            },
            Some((CmdGenerateCompletion::NAME, matches)) => {
                GenerateCompletion(CmdGenerateCompletion::from(matches))
            }
            None => Dashboard(CmdDashboard),
            _ => unreachable!(),
        };

        let config = matches.get_one("config").cloned();
        Ok(Cli { config, command })
    }

    /// Run the command
    pub async fn run(self) -> Result<(), Box<dyn Error>> {
        self.command.run(self.config).await
    }
}

/// The commands available in the CLI
#[derive(Debug, Clone)]
pub enum Commands {
    /// Show the dashboard
    Dashboard(CmdDashboard),

    /// Add or remove products
    Toggle(CmdToggle),

    /// List the shortlist
    List(CmdList),

    /// Send the shortlist to the store
    Sync(CmdSync),

    /// Set or forget the phone number
    Phone(CmdPhone),

    /// Place an order
    Order(CmdOrder),

    /// Show or dismiss the order banner
    Banner(CmdBanner),

    /// Browse the catalog
    ProductList(CmdProductList),

    /// Show a product gallery
    ProductImages(CmdProductImages),

    /// Generate shell completion
    GenerateCompletion(CmdGenerateCompletion),
}

impl Commands {
    /// Run the command with the given configuration
    #[rustfmt::skip]
    pub async fn run(self, config: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
        use Commands::*;
        match self {
            Dashboard(a)     => Self::run_with(config, |x| a.run(x).boxed()).await,
            Toggle(a)        => Self::run_with(config, |x| a.run(x).boxed()).await,
            List(a)          => Self::run_with(config, |x| a.run(x).boxed()).await,
            Sync(a)          => Self::run_with(config, |x| a.run(x).boxed()).await,
            Phone(a)         => Self::run_with(config, |x| a.run(x).boxed()).await,
            Order(a)         => Self::run_with(config, |x| a.run(x).boxed()).await,
            Banner(a)        => Self::run_with(config, |x| a.run(x).boxed()).await,
            ProductList(a)   => Self::run_with(config, |x| a.run(x).boxed()).await,
            ProductImages(a) => Self::run_with(config, |x| a.run(x).boxed()).await,
            GenerateCompletion(a) => a.run(),
        }
    }

    async fn run_with<F>(config: Option<PathBuf>, f: F) -> Result<(), Box<dyn Error>>
    where
        F: for<'a> FnOnce(&'a Shortlist) -> BoxFuture<'a, Result<(), Box<dyn Error>>>,
    {
        tracing::debug!("parsing configuration...");
        let core_config = parse_config(config).await?;
        let shortlist = Shortlist::new(core_config).await?;

        f(&shortlist).await
    }
}
