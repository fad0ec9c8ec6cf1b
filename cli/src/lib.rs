// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Command-line front end for the shortlist client.

mod cli;
mod cmd_cart;
mod cmd_catalog;
mod cmd_dashboard;
mod cmd_generate_completion;
mod cmd_order;
mod cmd_session;
mod config;
mod formatter;
mod prompt;
mod table;
mod util;

pub use crate::cli::{Cli, Commands, run};
