// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use clap::{Arg, ArgMatches, arg, value_parser};
use num_format::{Locale, ToFormattedString};

/// The output format for commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ArgOutputFormat {
    Json,
    Table,
}

impl ArgOutputFormat {
    pub fn arg() -> Arg {
        arg!(--"output-format" <FORMAT> "Output format")
            .value_parser(value_parser!(ArgOutputFormat))
            .default_value("table")
    }

    pub fn from(matches: &ArgMatches) -> Self {
        matches
            .get_one("output-format")
            .copied()
            .unwrap_or(ArgOutputFormat::Table)
    }
}

pub fn arg_phone() -> Arg {
    arg!(-p --phone <PHONE> "Customer phone number, asked for when needed if omitted")
}

pub fn get_phone(matches: &ArgMatches) -> Option<String> {
    matches.get_one::<String>("phone").cloned()
}

/// Formats a price in whole rupees with Indian digit grouping, e.g. `₹1,23,456`.
pub fn format_price(price: f64) -> String {
    // non-finite and out-of-range prices show as zero
    let rupees: i64 = format!("{:.0}", price.round()).parse().unwrap_or(0);
    format!("₹{}", rupees.to_formatted_string(&Locale::en_IN))
}
