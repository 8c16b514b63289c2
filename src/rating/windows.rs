use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDateTime};

use crate::domain::GameRecord;

/// ISO year and week number. Tuple order is chronological, including
/// across year boundaries (late-December days belong to the ISO year of
/// their week).
pub type WeekKey = (i32, u32);

pub fn week_key(timestamp: NaiveDateTime) -> WeekKey {
    let week = timestamp.date().iso_week();
    (week.year(), week.week())
}

/// Splits the full history into non-overlapping calendar weeks, oldest
/// week first. Records within a week keep their feed order.
pub fn partition_by_week(records: Vec<GameRecord>) -> Vec<(WeekKey, Vec<GameRecord>)> {
    let mut weeks: BTreeMap<WeekKey, Vec<GameRecord>> = BTreeMap::new();

    for record in records {
        weeks
            .entry(week_key(record.timestamp))
            .or_default()
            .push(record);
    }

    weeks.into_iter().collect()
}
