//! ISO-8601 week calendar
//!
//! Week 1 of a year is the week containing January 4th, so its Monday may
//! fall in the previous December. A year has 52 or 53 such weeks.

use chrono::{Datelike, Duration, NaiveDate};

use crate::models::Week;

/// Monday of ISO week 1 of `year`
pub fn iso_week1_monday(year: i32) -> Option<NaiveDate> {
    let jan4 = NaiveDate::from_ymd_opt(year, 1, 4)?;
    Some(jan4 - Duration::days(i64::from(jan4.weekday().num_days_from_monday())))
}

/// Number of ISO weeks in `year` (52 or 53; 0 if the year is out of range)
pub fn iso_weeks_count(year: i32) -> u32 {
    match (iso_week1_monday(year), iso_week1_monday(year + 1)) {
        (Some(start), Some(next)) => ((next - start).num_days() / 7) as u32,
        _ => 0,
    }
}

/// Display label of a week (`S01`..`S53`)
pub fn week_label(index: u32) -> String {
    format!("S{:02}", index)
}

/// Display range of a week starting on `monday` (`DD/MM – DD/MM`)
pub fn week_date_range(monday: NaiveDate) -> String {
    let sunday = monday + Duration::days(6);
    format!("{} – {}", monday.format("%d/%m"), sunday.format("%d/%m"))
}

/// Build the weeks of `year`
///
/// Week `i` inherits occupant, weight and revised price from `previous[i]`
/// when present; otherwise it starts unused with `default_weight`.
/// Carry-over is positional, not by date.
pub fn build_weeks_for_year(year: i32, previous: Option<&[Week]>, default_weight: f64) -> Vec<Week> {
    let Some(start) = iso_week1_monday(year) else {
        return Vec::new();
    };
    let count = iso_weeks_count(year);

    (0..count)
        .map(|i| {
            let monday = start + Duration::weeks(i64::from(i));
            let index = i + 1;
            let carried = previous.and_then(|weeks| weeks.get(i as usize));

            Week {
                index,
                label: week_label(index),
                date_range: week_date_range(monday),
                occupant_name: carried.map(|w| w.occupant_name.clone()).unwrap_or_default(),
                weight: carried.map_or(default_weight, |w| w.weight),
                revised_price: carried.and_then(|w| w.revised_price),
            }
        })
        .collect()
}
