//! Parameter structs for engine operations.
//!
//! These types group the validated payloads the API layer hands to the
//! engine, keeping call sites readable and avoiding long argument lists.

use chrono::{DateTime, Datelike, Utc};

use crate::{Amount, EngineError, ResultEngine};

/// Register a new account.
///
/// The password arrives opaque (already hashed by the caller); the engine
/// stores it untouched.
#[derive(Clone, Debug)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub email: String,
}

impl NewUser {
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            email: email.into(),
        }
    }
}

/// Record a transaction against a cash counter.
#[derive(Clone, Debug)]
pub struct NewTransaction {
    pub counter_id: i32,
    pub amount: Amount,
    pub created_at: Option<DateTime<Utc>>,
    pub bank_alias_id: Option<i32>,
}

impl NewTransaction {
    #[must_use]
    pub fn new(counter_id: i32, amount: Amount) -> Self {
        Self {
            counter_id,
            amount,
            created_at: None,
            bank_alias_id: None,
        }
    }

    #[must_use]
    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    #[must_use]
    pub fn bank_alias_id(mut self, bank_alias_id: i32) -> Self {
        self.bank_alias_id = Some(bank_alias_id);
        self
    }
}

/// Attach a receipt image.
#[derive(Clone, Debug)]
pub struct NewReceipt {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub created_at: Option<DateTime<Utc>>,
    pub bank_alias_id: Option<i32>,
}

impl NewReceipt {
    #[must_use]
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
            created_at: None,
            bank_alias_id: None,
        }
    }

    #[must_use]
    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    #[must_use]
    pub fn bank_alias_id(mut self, bank_alias_id: i32) -> Self {
        self.bank_alias_id = Some(bank_alias_id);
        self
    }
}

/// Time window for listing queries.
///
/// Missing endpoints fall back to the current month: `from_date` defaults to
/// the first instant of the month, `to_date` to now. When both endpoints are
/// given explicitly, `from_date` must not be after `to_date`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TimeFrame {
    pub from_date: Option<DateTime<Utc>>,
    pub to_date: Option<DateTime<Utc>>,
}

impl TimeFrame {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_date(mut self, from_date: DateTime<Utc>) -> Self {
        self.from_date = Some(from_date);
        self
    }

    #[must_use]
    pub fn to_date(mut self, to_date: DateTime<Utc>) -> Self {
        self.to_date = Some(to_date);
        self
    }

    /// Resolves the window against `now`, applying the defaults above.
    pub(crate) fn resolve(self, now: DateTime<Utc>) -> ResultEngine<(DateTime<Utc>, DateTime<Utc>)> {
        if let (Some(from_date), Some(to_date)) = (self.from_date, self.to_date)
            && from_date > to_date
        {
            return Err(EngineError::InvalidTimeFrame(
                "from_date cannot be after to_date".to_string(),
            ));
        }

        let from_date = self.from_date.unwrap_or_else(|| month_start(now));
        let to_date = self.to_date.unwrap_or(now);
        Ok((from_date, to_date))
    }
}

/// First instant of the month `now` falls in.
fn month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive()
        .with_day(1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
        .unwrap_or(now)
}
