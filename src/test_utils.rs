//! Helpers for tests that depend on today's date.

use std::collections::BTreeMap;

use crate::{timezone::get_local_date, transaction::date_prefix};

/// Today's `YYYYMMDD` prefix in `timezone`.
pub(crate) fn today_prefix(timezone: &str) -> String {
    date_prefix(get_local_date(timezone).expect("Invalid test timezone"))
}

/// Assert that `got` is the `sequence`-th ID on the day `day_before`.
///
/// `day_before` must be read before the request is made. If the date in
/// `timezone` changed while the request ran, `got` must instead be the first
/// ID of the new day.
#[track_caller]
pub(crate) fn assert_today_id(got: &str, day_before: &str, sequence: u32, timezone: &str) {
    if got.starts_with(&format!("{day_before}-")) {
        assert_eq!(got, format!("{day_before}-{sequence:03}"));
    } else {
        assert_eq!(got, format!("{}-001", today_prefix(timezone)));
    }
}

/// Assert that `ids` are dense sequences starting at `001` for each day.
///
/// Every ID must fall on `day_before` or on the current day in `timezone`.
#[track_caller]
pub(crate) fn assert_dense_daily_ids(ids: &[String], day_before: &str, timezone: &str) {
    let day_after = today_prefix(timezone);
    let mut by_day: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for id in ids {
        let (day, sequence) = id
            .split_once('-')
            .unwrap_or_else(|| panic!("{id} is not a transaction ID"));
        assert!(
            day == day_before || day == day_after,
            "{id} is not dated {day_before} or {day_after}"
        );
        by_day.entry(day).or_default().push(sequence);
    }

    for (day, mut sequences) in by_day {
        sequences.sort();
        let want: Vec<String> = (1..=sequences.len()).map(|n| format!("{n:03}")).collect();
        assert_eq!(sequences, want, "IDs on {day} are not dense");
    }
}
