// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use cliclack::{input, intro, note, outro, outro_cancel};
use shortlist_core::{CustomerPhone, ProductId};

const PHONE_NOTE: &str = "\
Your phone number lets the store keep your shortlist
and contact you about the pieces you pick.";

/// Asks for the customer phone. Returns `None` if the shopper skips or cancels.
pub fn prompt_phone(product: Option<&ProductId>) -> Result<Option<CustomerPhone>, Box<dyn Error>> {
    intro("Phone number")?;
    match product {
        Some(id) => note(format!("Shortlisting {id}"), PHONE_NOTE)?,
        None => note("Why we ask", PHONE_NOTE)?,
    }

    let raw: String = match input("Enter your phone number (or empty to skip):")
        .placeholder("e.g., 9876543210")
        .required(false)
        .interact()
    {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {
            outro_cancel("Cancelled")?;
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    match CustomerPhone::parse(&raw) {
        Some(phone) => {
            outro("Phone number saved")?;
            Ok(Some(phone))
        }
        None => {
            outro("No phone number provided, skipping.")?;
            Ok(None)
        }
    }
}
