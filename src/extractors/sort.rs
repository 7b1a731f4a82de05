use super::Reminder;
use chrono::NaiveDate;

impl Reminder {
    pub fn sort_key(&self) -> NaiveDate {
        self.date
    }
}

/// Puts the given reminders in date order. The sort is stable, so reminders on the same day stay in
/// the order they were extracted (contact order, then event order within each contact).
pub fn sort_reminders(reminders: &mut [Reminder]) {
    reminders.sort_by_key(Reminder::sort_key);
}
