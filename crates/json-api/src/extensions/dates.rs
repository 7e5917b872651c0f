//! Clock and civil-date parsing helpers.
//!
//! Handlers resolve "today" once and pass it down, so tests can pin the
//! clock with a query parameter instead of mocking time.

use jiff::{Zoned, civil::Date};
use salvo::{oapi::extract::QueryParam, prelude::StatusError};

use super::result::ResultExt as _;

pub(crate) trait ClockExt {
    fn into_today(self) -> Result<Date, StatusError>;
}

impl ClockExt for QueryParam<String, false> {
    fn into_today(self) -> Result<Date, StatusError> {
        self.into_inner()
            .map(|value| value.parse::<Date>())
            .transpose()
            .or_400("could not parse \"today\" query parameter")
            .map(|today| today.unwrap_or_else(|| Zoned::now().date()))
    }
}

/// Parse an ISO `YYYY-MM-DD` request field.
pub(crate) fn parse_civil_date(
    value: Option<String>,
    field: &str,
) -> Result<Option<Date>, StatusError> {
    value
        .map(|value| value.parse::<Date>())
        .transpose()
        .or_400(field)
}
