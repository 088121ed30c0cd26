//! Date-spec normalisation.
//!
//! Users type dates loosely (`today`, `6/8/2021 1800`, `2021-8-6 9:05`).
//! Everything is normalised to a minute-precision [`NaiveDateTime`] whose
//! canonical text form is `YYYY-MM-DDThh:mm`.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::DateError;

/// Canonical `chrono` format used in the task file.
pub const CANONICAL_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Format used when showing a date to the user.
pub const HUMAN_FORMAT: &str = "%b %d %Y, %H:%M";

const DEFAULT_HOUR: u32 = 23;
const DEFAULT_MINUTE: u32 = 59;

/// Normalise a date-spec of the form `date [time]`.
///
/// `today` resolves relative shortcuts. A missing time defaults to `23:59`.
pub fn normalize(spec: &str, today: NaiveDate) -> Result<NaiveDateTime, DateError> {
    let parts: Vec<&str> = spec.split_whitespace().collect();
    let (date_token, time_token) = match parts.as_slice() {
        [date] => (*date, None),
        [date, time] => (*date, Some(*time)),
        _ => return Err(DateError::InvalidDate),
    };

    let (year, month, day) = match date_token {
        "today" => split_date(today),
        "tomorrow" => split_date(today + Duration::days(1)),
        other => parse_numeric_date(other)?,
    };

    let (hour, minute) = match time_token {
        Some(token) => parse_time(token)?,
        None => (DEFAULT_HOUR, DEFAULT_MINUTE),
    };

    // Range checks happen only here, when the calendar value is built.
    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or(DateError::InvalidDate)?;
    let time = NaiveTime::from_hms_opt(hour, minute, 0).ok_or(DateError::InvalidDate)?;
    Ok(date.and_time(time))
}

/// Render in the canonical `YYYY-MM-DDThh:mm` form.
pub fn format_canonical(value: &NaiveDateTime) -> String {
    value.format(CANONICAL_FORMAT).to_string()
}

/// Parse the canonical form back; `None` on anything else.
pub fn parse_canonical(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, CANONICAL_FORMAT).ok()
}

/// Render for display, e.g. `Aug 06 2021, 18:00`.
pub fn format_human(value: &NaiveDateTime) -> String {
    value.format(HUMAN_FORMAT).to_string()
}

fn split_date(date: NaiveDate) -> (i32, u32, u32) {
    (date.year(), date.month(), date.day())
}

/// `[YYYY, M, D]` or `[D, M, YYYY]`, told apart purely by field width.
fn parse_numeric_date(token: &str) -> Result<(i32, u32, u32), DateError> {
    let dashed: Vec<&str> = token.split('-').collect();
    let fields = if dashed.len() == 3 {
        dashed
    } else {
        token.split('/').collect()
    };
    let [first, second, third] = fields.as_slice() else {
        return Err(DateError::InvalidDate);
    };
    if !fields.iter().all(|field| is_digits(field)) {
        return Err(DateError::InvalidDate);
    }

    let (year, month, day) = if first.len() == 4 && short(second) && short(third) {
        (*first, *second, *third)
    } else if short(first) && short(second) && third.len() == 4 {
        (*third, *second, *first)
    } else {
        return Err(DateError::InvalidDate);
    };

    Ok((
        number(year, DateError::InvalidDate)?,
        number(month, DateError::InvalidDate)?,
        number(day, DateError::InvalidDate)?,
    ))
}

/// `H:MM`, `HH:MM`, `HMM` or `HHMM`.
fn parse_time(token: &str) -> Result<(u32, u32), DateError> {
    let fields: Vec<&str> = token.split(':').collect();
    if !fields.iter().all(|field| is_digits(field)) {
        return Err(DateError::InvalidTime);
    }
    let (hour, minute) = match fields.as_slice() {
        [hour, minute] if short(hour) && minute.len() == 2 => (*hour, *minute),
        [packed] if matches!(packed.len(), 3 | 4) => packed.split_at(packed.len() - 2),
        _ => return Err(DateError::InvalidTime),
    };
    Ok((
        number(hour, DateError::InvalidTime)?,
        number(minute, DateError::InvalidTime)?,
    ))
}

fn short(field: &str) -> bool {
    matches!(field.len(), 1 | 2)
}

fn is_digits(field: &str) -> bool {
    !field.is_empty() && field.bytes().all(|b| b.is_ascii_digit())
}

fn number<T: std::str::FromStr>(field: &str, err: DateError) -> Result<T, DateError> {
    field.parse().map_err(|_| err)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn canonical(spec: &str) -> Result<String, DateError> {
        normalize(spec, day(2021, 8, 20)).map(|dt| format_canonical(&dt))
    }

    #[test]
    fn relative_shortcuts_default_to_end_of_day() {
        assert_eq!(canonical("today").unwrap(), "2021-08-20T23:59");
        assert_eq!(canonical("tomorrow").unwrap(), "2021-08-21T23:59");
        assert_eq!(canonical("tomorrow 0930").unwrap(), "2021-08-21T09:30");
    }

    #[test]
    fn tomorrow_rolls_over_month_and_year() {
        let dt = normalize("tomorrow", day(2021, 12, 31)).unwrap();
        assert_eq!(format_canonical(&dt), "2022-01-01T23:59");
    }

    #[test]
    fn numeric_dates_are_zero_padded() {
        assert_eq!(canonical("2021-8-6").unwrap(), "2021-08-06T23:59");
        assert_eq!(canonical("2021/08/06").unwrap(), "2021-08-06T23:59");
        assert_eq!(canonical("6-8-2021").unwrap(), "2021-08-06T23:59");
        assert_eq!(canonical("6/8/2021 1800").unwrap(), "2021-08-06T18:00");
    }

    #[test]
    fn time_shapes() {
        assert_eq!(canonical("2021-08-21 9:05").unwrap(), "2021-08-21T09:05");
        assert_eq!(canonical("2021-08-21 18:00").unwrap(), "2021-08-21T18:00");
        assert_eq!(canonical("2021-08-21 905").unwrap(), "2021-08-21T09:05");
        assert_eq!(canonical("2021-08-21 0000").unwrap(), "2021-08-21T00:00");
    }

    #[test]
    fn minute_must_have_two_digits() {
        assert_eq!(canonical("2021-08-21 9:5"), Err(DateError::InvalidTime));
        assert_eq!(canonical("2021-08-21 18"), Err(DateError::InvalidTime));
        assert_eq!(canonical("2021-08-21 18:00:00"), Err(DateError::InvalidTime));
        assert_eq!(canonical("2021-08-21 6pm"), Err(DateError::InvalidTime));
        assert_eq!(canonical("2021-08-21 18:"), Err(DateError::InvalidTime));
    }

    #[test]
    fn field_width_decides_order() {
        // Two-digit years are never guessed.
        assert_eq!(canonical("21-08-06"), Err(DateError::InvalidDate));
        assert_eq!(canonical("2021-008-06"), Err(DateError::InvalidDate));
        assert_eq!(canonical("06-2021-08"), Err(DateError::InvalidDate));
    }

    #[test]
    fn malformed_dates() {
        assert_eq!(canonical(""), Err(DateError::InvalidDate));
        assert_eq!(canonical("2021-08"), Err(DateError::InvalidDate));
        assert_eq!(canonical("2021-aa-06"), Err(DateError::InvalidDate));
        assert_eq!(canonical("yesterday"), Err(DateError::InvalidDate));
        assert_eq!(canonical("2021-08-06 18:00 extra"), Err(DateError::InvalidDate));
    }

    #[test]
    fn calendar_validation_reports_invalid_date() {
        assert_eq!(canonical("2021-08-32"), Err(DateError::InvalidDate));
        assert_eq!(canonical("2021-13-01"), Err(DateError::InvalidDate));
        assert_eq!(canonical("29/2/2021"), Err(DateError::InvalidDate));
        assert_eq!(canonical("29/2/2020").unwrap(), "2020-02-29T23:59");
        assert_eq!(canonical("2021-08-06 25:00"), Err(DateError::InvalidDate));
        assert_eq!(canonical("2021-08-06 1260"), Err(DateError::InvalidDate));
    }

    #[test]
    fn canonical_form_round_trips() {
        let dt = normalize("6/8/2021 1800", day(2021, 1, 1)).unwrap();
        assert_eq!(parse_canonical(&format_canonical(&dt)), Some(dt));
        assert_eq!(parse_canonical("2021-08-06 18:00"), None);
        assert_eq!(format_human(&dt), "Aug 06 2021, 18:00");
    }
}
