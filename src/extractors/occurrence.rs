use crate::parse::RawEvent;
use chrono::{Datelike, NaiveDate};

/// Works out the next date on or after `today` on which the given event falls. Recurring events
/// are moved onto this year's anniversary, or next year's if this year's has already passed.
/// Non-recurring events only get this year's, and are gone once it's passed.
///
/// Returns `None` if the event's date can't be parsed, or if a non-recurring event is over.
pub fn next_occurrence(event: &RawEvent, today: NaiveDate) -> Option<NaiveDate> {
    let anchor = event.date.to_naive_date()?;
    let this_year = anniversary_in(anchor, today.year())?;
    if this_year >= today {
        Some(this_year)
    } else if event.recurring {
        anniversary_in(anchor, today.year() + 1)
    } else {
        None
    }
}

/// Moves the given anchor date into the given year. A 29th of February falls on the 1st of March
/// in years without one.
///
/// This only returns `None` if the year is outside what `chrono` can represent.
pub fn anniversary_in(anchor: NaiveDate, year: i32) -> Option<NaiveDate> {
    anchor.with_year(year).or_else(|| {
        (anchor.month() == 2 && anchor.day() == 29)
            .then(|| NaiveDate::from_ymd_opt(year, 3, 1))
            .flatten()
    })
}
