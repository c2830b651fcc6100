use chrono::NaiveDate;

use crate::foundation::error::{CardError, CardResult};

/// OpticalId used whenever the birthday is missing or unparsable.
pub const DEFAULT_OPTICAL_ID: &str = "20240101";

/// Suffix appended to every exported card filename.
pub const FILENAME_SUFFIX: &str = "_student_id.png";

/// Identity values typed in by the user.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct IdentityFields {
    /// Name printed on the card, verbatim.
    pub name: String,
    /// Birthday as `YYYY-MM-DD`. Empty when not provided.
    #[serde(default, rename = "birthday")]
    pub birthday_iso: String,
}

impl IdentityFields {
    /// Build fields from a name and an ISO birthday.
    pub fn new(name: impl Into<String>, birthday_iso: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            birthday_iso: birthday_iso.into(),
        }
    }

    /// Reject fields that cannot be rendered.
    pub fn validate(&self) -> CardResult<()> {
        if self.name.trim().is_empty() {
            return Err(CardError::validation("name must be non-empty"));
        }
        Ok(())
    }

    /// OpticalId derived from the birthday.
    pub fn optical_id(&self) -> OpticalId {
        OpticalId::from_birthday(&self.birthday_iso)
    }

    /// Suggested download filename.
    pub fn card_filename(&self) -> String {
        card_filename(&self.name)
    }
}

/// Eight-digit identifier derived from a birthday (`YYYYMMDD`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct OpticalId(String);

impl OpticalId {
    /// Derive the id, falling back to [`DEFAULT_OPTICAL_ID`] for empty or invalid input.
    pub fn from_birthday(birthday_iso: &str) -> Self {
        let trimmed = birthday_iso.trim();
        if trimmed.is_empty() {
            return Self::fallback();
        }

        let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") else {
            return Self::fallback();
        };

        let digits = date.format("%Y%m%d").to_string();
        if digits.len() != 8 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Self::fallback();
        }
        Self(digits)
    }

    /// The literal default id.
    pub fn fallback() -> Self {
        Self(DEFAULT_OPTICAL_ID.to_string())
    }

    /// Borrow the digits.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OpticalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// `<name>_student_id.png` where every run of whitespace becomes a single `_`.
///
/// Leading and trailing runs are substituted too. Path separators (`/`, `\`) become `_` so the
/// result is always a plain file name; nothing else in the name is touched.
pub fn card_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + FILENAME_SUFFIX.len());
    let mut in_run = false;
    for c in name.chars() {
        if c.is_whitespace() {
            if !in_run {
                out.push('_');
                in_run = true;
            }
        } else {
            out.push(if matches!(c, '/' | '\\') { '_' } else { c });
            in_run = false;
        }
    }
    out.push_str(FILENAME_SUFFIX);
    out
}

#[cfg(test)]
#[path = "../../tests/unit/identity/fields.rs"]
mod tests;
