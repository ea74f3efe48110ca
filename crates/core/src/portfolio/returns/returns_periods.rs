//! Period-date resolution (§4.4.1): maps a period name and "today" to a
//! `[start, end]` date range, given `end = yesterday` is the latest date
//! with closed-book valuation data.

use chrono::{Datelike, Duration, NaiveDate};

use crate::errors::{Error, Result, ReturnsError};

/// Subtracts whole months from `date`, clamping the day to the target
/// month's last day (Mar 31 − 1M → Feb 28/29) rather than overflowing into
/// the following month, per the resolved Open Question.
pub fn subtract_months_clamped(date: NaiveDate, months: u32) -> NaiveDate {
    let total_months = date.year() * 12 + date.month0() as i32 - months as i32;
    let target_year = total_months.div_euclid(12);
    let target_month0 = total_months.rem_euclid(12) as u32;
    let target_month = target_month0 + 1;
    let last_day = last_day_of_month(target_year, target_month);
    NaiveDate::from_ymd_opt(target_year, target_month, date.day().min(last_day))
        .expect("clamped day is always valid for its month")
}

fn last_day_of_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .expect("valid first-of-month")
        .pred_opt()
        .expect("first-of-month always has a predecessor")
        .day()
}

/// Resolves `period` against `yesterday` (the end of the latest
/// closed-book valuation day). Unknown period strings are rejected.
pub fn resolve_period(period: &str, yesterday: NaiveDate) -> Result<(NaiveDate, NaiveDate)> {
    let this_year = yesterday.year();
    let last_year = this_year - 1;

    match period {
        "1D" => Ok((yesterday - Duration::days(1), yesterday)),
        "1M" => Ok((subtract_months_clamped(yesterday, 1), yesterday)),
        "3M" => Ok((subtract_months_clamped(yesterday, 3), yesterday)),
        "QTD" => Ok((last_day_of_previous_quarter(yesterday), yesterday)),
        "YTD" => Ok((NaiveDate::from_ymd_opt(last_year, 12, 31).unwrap(), yesterday)),
        "1Y" => Ok((subtract_months_clamped(yesterday, 12), yesterday)),
        "3Y" => Ok((subtract_months_clamped(yesterday, 36), yesterday)),
        "LQ" => {
            let end = last_day_of_previous_quarter(yesterday);
            Ok((first_day_of_quarter(end), end))
        }
        "LY" => Ok((
            NaiveDate::from_ymd_opt(last_year, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(last_year, 12, 31).unwrap(),
        )),
        other => Err(Error::Returns(ReturnsError::UnknownPeriod(other.to_string()))),
    }
}

fn first_day_of_quarter(date: NaiveDate) -> NaiveDate {
    let quarter_start_month = ((date.month() - 1) / 3) * 3 + 1;
    NaiveDate::from_ymd_opt(date.year(), quarter_start_month, 1).unwrap()
}

fn last_day_of_previous_quarter(date: NaiveDate) -> NaiveDate {
    first_day_of_quarter(date) - Duration::days(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_month_subtraction_at_shorter_month() {
        let mar31 = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        assert_eq!(subtract_months_clamped(mar31, 1), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn rejects_unknown_period() {
        let yesterday = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert!(resolve_period("2D", yesterday).is_err());
    }

    #[test]
    fn qtd_anchors_to_previous_quarter_end() {
        let yesterday = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
        let (start, end) = resolve_period("QTD", yesterday).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());
        assert_eq!(end, yesterday);
    }

    #[test]
    fn ly_spans_the_full_prior_calendar_year() {
        let yesterday = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
        let (start, end) = resolve_period("LY", yesterday).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
    }
}
