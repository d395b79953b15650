use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));
static CURRENCY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{3}$").expect("valid currency regex"));

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    Empty(&'static str),
    #[error("{0} must not be negative")]
    Negative(&'static str),
    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),
    #[error("`{value}` is not a valid {field}")]
    Invalid { field: &'static str, value: String },
    #[error("{end} is before {start}")]
    DateOrder {
        start: &'static str,
        end: &'static str,
    },
    #[error("{0} cannot be in the future")]
    InFuture(&'static str),
    #[error("{0} refers to a record that does not exist")]
    UnknownReference(String),
}

pub fn non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Empty(field))
    } else {
        Ok(())
    }
}

pub fn non_negative(field: &'static str, value: i64) -> Result<(), ValidationError> {
    if value < 0 {
        Err(ValidationError::Negative(field))
    } else {
        Ok(())
    }
}

pub fn positive(field: &'static str, value: i64) -> Result<(), ValidationError> {
    if value <= 0 {
        Err(ValidationError::NotPositive(field))
    } else {
        Ok(())
    }
}

pub fn date_order(
    start_field: &'static str,
    start: Option<NaiveDate>,
    end_field: &'static str,
    end: Option<NaiveDate>,
) -> Result<(), ValidationError> {
    match (start, end) {
        (Some(s), Some(e)) if e < s => Err(ValidationError::DateOrder {
            start: start_field,
            end: end_field,
        }),
        _ => Ok(()),
    }
}

pub fn not_future(
    field: &'static str,
    value: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<(), ValidationError> {
    match value {
        Some(d) if d > today => Err(ValidationError::InFuture(field)),
        _ => Ok(()),
    }
}

pub fn optional_email(field: &'static str, value: Option<&str>) -> Result<(), ValidationError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) if !EMAIL_RE.is_match(v) => Err(ValidationError::Invalid {
            field,
            value: v.to_string(),
        }),
        _ => Ok(()),
    }
}

pub fn currency(value: &str) -> Result<(), ValidationError> {
    if CURRENCY_RE.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::Invalid {
            field: "currency",
            value: value.to_string(),
        })
    }
}

pub fn normalize_currency(value: &str) -> String {
    value.trim().to_ascii_uppercase()
}

/// Trims and drops empty optional text.
pub fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn vocabulary<T>(
    field: &'static str,
    raw: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T, ValidationError> {
    parse(raw).ok_or_else(|| ValidationError::Invalid {
        field,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_and_currency_checks() {
        assert!(optional_email("email", Some("a@b.org")).is_ok());
        assert!(optional_email("email", Some("  ")).is_ok());
        assert!(optional_email("email", None).is_ok());
        assert!(optional_email("email", Some("nope")).is_err());
        assert_eq!(normalize_currency(" kes "), "KES");
        assert!(currency("KES").is_ok());
        assert!(currency("KE").is_err());
    }

    #[test]
    fn date_order_allows_open_ranges() {
        let d = |s| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
        assert!(date_order("start", Some(d("2026-01-01")), "end", None).is_ok());
        assert!(date_order("start", Some(d("2026-01-02")), "end", Some(d("2026-01-02"))).is_ok());
        assert_eq!(
            date_order("start", Some(d("2026-01-02")), "end", Some(d("2026-01-01"))),
            Err(ValidationError::DateOrder {
                start: "start",
                end: "end"
            })
        );
    }
}
