mod occurrence;
mod reminder;
mod sort;

pub use reminder::Reminder;

use sort::sort_reminders;

use crate::{
    parse::Contact,
    views::{Window, WindowFilter},
};
use chrono::NaiveDate;

/// Finds every date across the given contacts that next falls within the given window of `today`,
/// in date order. This is a pure function of its inputs: it never looks at the clock, and the same
/// contacts, day and window will always produce the same list.
pub fn upcoming(contacts: &[Contact], today: NaiveDate, window: Window) -> Vec<Reminder> {
    let filter = WindowFilter::new(today, window);
    let mut reminders = contacts
        .iter()
        .flat_map(|contact| Reminder::from_contact(contact, &filter))
        .collect::<Vec<_>>();
    sort_reminders(&mut reminders);

    tracing::info!(
        %today,
        %window,
        until = ?filter.until(),
        contacts = contacts.len(),
        reminders = reminders.len(),
        "computed upcoming dates"
    );
    reminders
}
