// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Session and customer identity.

use std::fmt;
use std::str::FromStr;

use jiff::Timestamp;
use shortlist_api::SessionId;
use uuid::Uuid;

use crate::error::Error;
use crate::storage::{Storage, keys, load_string};

const SESSION_PREFIX: &str = "sess";
const RANDOM_LEN: usize = 6;
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Customer contact phone, trimmed and never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CustomerPhone(String);

impl CustomerPhone {
    /// Parses user input, returning `None` for blank input.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_string()))
    }

    /// Returns the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for CustomerPhone {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or(Error::EmptyPhone)
    }
}

impl fmt::Display for CustomerPhone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Who the shopper is, as far as the remote cart is concerned.
///
/// The session id always exists. The phone moves from absent to present once and is never
/// dropped automatically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    session_id: SessionId,
    phone: Option<CustomerPhone>,
}

impl Identity {
    /// Creates an identity from known parts.
    #[must_use]
    pub const fn new(session_id: SessionId, phone: Option<CustomerPhone>) -> Self {
        Self { session_id, phone }
    }

    /// Loads the identity, generating and persisting a session id on first use.
    #[tracing::instrument(skip(storage))]
    pub async fn resolve(storage: &dyn Storage) -> Self {
        let session_id = match load_string(storage, keys::SESSION_ID).await {
            Some(id) => SessionId::from(id.trim()),
            None => {
                let id = generate_session_id();
                tracing::info!(session_id = %id, "starting a new shopper session");
                if let Err(err) = storage.set(keys::SESSION_ID, id.as_str()).await {
                    tracing::warn!(%err, "failed to persist session id");
                }
                id
            }
        };

        let phone = load_string(storage, keys::PHONE)
            .await
            .and_then(|raw| CustomerPhone::parse(&raw));

        Self { session_id, phone }
    }

    /// The session id.
    #[must_use]
    pub const fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// The customer phone, if one has been collected.
    #[must_use]
    pub const fn phone(&self) -> Option<&CustomerPhone> {
        self.phone.as_ref()
    }

    /// Whether remote sync is allowed, i.e. both session id and phone are present.
    #[must_use]
    pub fn can_sync(&self) -> bool {
        !self.session_id.trim().is_empty() && self.phone.is_some()
    }

    /// Session id and phone to address the remote cart with, if sync is allowed.
    #[must_use]
    pub fn sync_target(&self) -> Option<(SessionId, CustomerPhone)> {
        if !self.can_sync() {
            return None;
        }
        self.phone
            .clone()
            .map(|phone| (self.session_id.clone(), phone))
    }

    /// Records the customer phone and persists it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyPhone`] if `raw` is blank.
    pub async fn set_phone(
        &mut self,
        storage: &dyn Storage,
        raw: &str,
    ) -> Result<CustomerPhone, Error> {
        let phone: CustomerPhone = raw.parse()?;
        if let Err(err) = storage.set(keys::PHONE, phone.as_str()).await {
            tracing::warn!(%err, "failed to persist customer phone");
        }
        self.phone = Some(phone.clone());
        Ok(phone)
    }

    /// Drops the stored phone, an explicit user reset.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored phone cannot be removed.
    pub async fn forget_phone(&mut self, storage: &dyn Storage) -> Result<(), Error> {
        storage.remove(keys::PHONE).await?;
        self.phone = None;
        Ok(())
    }
}

/// Generates a session id such as `sess-k3f9q1-m5x2a7b1`.
///
/// Six random base-36 characters followed by the base-36 Unix time in milliseconds.
#[must_use]
pub fn generate_session_id() -> SessionId {
    let random = Uuid::new_v4().as_u128() % 36u128.pow(RANDOM_LEN as u32);
    let millis = u128::try_from(Timestamp::now().as_millisecond()).unwrap_or_default();

    let random = format!("{:0>width$}", to_base36(random), width = RANDOM_LEN);
    SessionId::new(format!("{SESSION_PREFIX}-{random}-{}", to_base36(millis)))
}

fn to_base36(mut n: u128) -> String {
    if n == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while n > 0 {
        let d = usize::try_from(n % 36).unwrap_or_default();
        digits.push(BASE36.get(d).copied().unwrap_or(b'0'));
        n /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}
