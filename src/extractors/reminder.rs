use super::occurrence::next_occurrence;
use crate::{
    parse::{normalize_contact, Contact, RawEvent},
    views::WindowFilter,
};
use chrono::NaiveDate;
use serde::Serialize;

/// An upcoming date associated with a contact (e.g. a birthday or anniversary).
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Reminder {
    /// The display name of the contact this date belongs to.
    pub name: String,
    /// A human-readable label for the kind of date this is (e.g. *Birthday*).
    #[serde(rename = "type")]
    pub kind: String,
    /// The next day on which this date falls.
    pub date: NaiveDate,
}
impl Reminder {
    /// Produces a reminder for every event on the given contact that next falls inside the given
    /// window. Events with unusable dates are skipped.
    pub fn from_contact<'a>(
        contact: &'a Contact,
        filter: &'a WindowFilter,
    ) -> impl Iterator<Item = Self> + 'a {
        normalize_contact(contact).filter_map(move |event| {
            let Some(date) = next_occurrence(&event, filter.today()) else {
                tracing::debug!(
                    id = ?contact.id,
                    date = ?event.date,
                    recurring = event.recurring,
                    "skipping event with no upcoming occurrence"
                );
                return None;
            };
            filter.matches(date).then(|| Self {
                name: display_name(contact),
                kind: friendly_type(&event),
                date,
            })
        })
    }

    /// Renders this reminder as a single line for a terminal, relative to the given day.
    pub fn describe(&self, today: NaiveDate) -> String {
        let relative = match (self.date - today).num_days() {
            0 => "today".to_string(),
            1 => "tomorrow".to_string(),
            n => format!("in {n} days"),
        };
        format!("{}  {}  {} ({relative})", self.date, self.kind, self.name)
    }
}

/// Works out the label to show for an event. The well-known kinds are recognised loosely, since
/// legacy records used all sorts of spellings; anything else shows its own label, or failing that
/// its type.
pub fn friendly_type(event: &RawEvent) -> String {
    let label = event.label.filter(|l| !l.is_empty());
    let Some(kind) = event.kind.filter(|k| !k.is_empty()) else {
        return label.unwrap_or("Event").to_string();
    };

    let lower = kind.to_lowercase();
    if lower.contains("birth") {
        "Birthday".to_string()
    } else if lower.contains("wedding") || lower.contains("marriage") {
        "Marriage Anniversary".to_string()
    } else if lower.contains("death") || lower.contains("deceased") {
        "Death Anniversary".to_string()
    } else if let Some(label) = label {
        label.to_string()
    } else {
        capitalize(kind)
    }
}

/// Works out the name to show for a contact: their full name if one was recorded, otherwise their
/// first and last names together.
pub fn display_name(contact: &Contact) -> String {
    if let Some(name) = contact.name.as_deref().filter(|n| !n.is_empty()) {
        return name.to_string();
    }

    let first = contact.first_name.as_deref().unwrap_or("");
    let name = match contact.last_name.as_deref().filter(|l| !l.is_empty()) {
        Some(last) => format!("{first} {last}"),
        None => first.to_string(),
    };
    let name = name.trim();
    if name.is_empty() {
        "Unknown".to_string()
    } else {
        name.to_string()
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
