//! Date arithmetic that crosses the UTC/local-date boundary exactly once
//! (§9): convert a stored UTC instant to the local calendar date, then
//! operate on plain dates everywhere else.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Utc};

/// Converts a naive-UTC instant to the local calendar date, mirroring the
/// "attach UTC, convert to system local zone, take the date" rule rather
/// than a fixed-offset or per-exchange market-close calculation.
pub fn utc_to_local_date(utc: NaiveDateTime) -> NaiveDate {
    let utc_dt: DateTime<Utc> = DateTime::from_naive_utc_and_offset(utc, Utc);
    utc_dt.with_timezone(&Local).date_naive()
}

pub fn yesterday_local() -> NaiveDate {
    Local::now().date_naive() - chrono::Duration::days(1)
}

pub fn get_days_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    if start > end {
        return Vec::new();
    }
    let mut days = Vec::new();
    let mut current = start;
    while current <= end {
        days.push(current);
        match current.succ_opt() {
            Some(next) => current = next,
            None => break,
        }
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_utc_instant_to_local_date() {
        let utc = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let local = utc_to_local_date(utc);
        let diff = (local - NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()).num_days();
        assert!((-1..=1).contains(&diff));
    }

    #[test]
    fn enumerates_inclusive_day_range() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        assert_eq!(get_days_between(start, end).len(), 3);
        assert_eq!(get_days_between(end, start).len(), 0);
    }
}
