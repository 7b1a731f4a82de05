use super::contact::{Contact, ContactEvent, RawDate};

/// A single dated event pulled out of a contact, regardless of which representation it came from.
/// Nothing about the date has been checked yet beyond it being present.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawEvent<'a> {
    /// The raw event type (e.g. `birthday`, or `Birthday` for legacy fields).
    pub kind: Option<&'a str>,
    /// The display label for the event, if it has one.
    pub label: Option<&'a str>,
    /// The anchor date.
    pub date: &'a RawDate,
    /// Whether or not the event repeats annually.
    pub recurring: bool,
}

/// The flat date fields contacts carried before the structured event list existed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyField {
    Birthday,
    MarriageAnniversary,
    DeathAnniversary,
}
impl LegacyField {
    /// Every legacy field, in the order they're emitted.
    pub const ALL: [Self; 3] = [
        Self::Birthday,
        Self::MarriageAnniversary,
        Self::DeathAnniversary,
    ];

    /// The fixed type and label events from this field are given.
    pub fn label(self) -> &'static str {
        match self {
            Self::Birthday => "Birthday",
            Self::MarriageAnniversary => "Marriage Anniversary",
            Self::DeathAnniversary => "Death Anniversary",
        }
    }

    fn value(self, contact: &Contact) -> Option<&RawDate> {
        match self {
            Self::Birthday => contact.birthday.as_ref(),
            Self::MarriageAnniversary => contact.marriage_anniversary.as_ref(),
            Self::DeathAnniversary => contact.death_anniversary.as_ref(),
        }
    }
}

/// Where an event was found on a contact. Both shapes are mapped onto [`RawEvent`] here so nothing
/// downstream needs to care which one it was.
#[derive(Debug, Clone, Copy)]
pub enum EventSource<'a> {
    Structured(&'a ContactEvent),
    Legacy(LegacyField, &'a RawDate),
}
impl<'a> EventSource<'a> {
    /// Converts this source into a raw event, if it has a date at all.
    pub fn into_raw(self) -> Option<RawEvent<'a>> {
        match self {
            Self::Structured(event) => {
                let date = event.date.as_ref().filter(|d| d.is_present())?;
                Some(RawEvent {
                    kind: event.kind.as_deref(),
                    label: event.label.as_deref(),
                    date,
                    recurring: event.recurring.unwrap_or(true),
                })
            }
            Self::Legacy(field, date) => date.is_present().then_some(RawEvent {
                kind: Some(field.label()),
                label: Some(field.label()),
                date,
                recurring: true,
            }),
        }
    }
}

/// Produces every raw event on the given contact: first the structured events in list order, then
/// any populated legacy fields. The two are deliberately *not* deduplicated against each other, so
/// a contact with both a `birthday` event and a legacy `birthday` field yields two events.
pub fn normalize_contact(contact: &Contact) -> impl Iterator<Item = RawEvent<'_>> + '_ {
    let structured = contact
        .events
        .iter()
        .flatten()
        .flatten()
        .map(EventSource::Structured);
    let legacy = LegacyField::ALL
        .into_iter()
        .filter_map(move |field| field.value(contact).map(|date| EventSource::Legacy(field, date)));

    structured.chain(legacy).filter_map(EventSource::into_raw)
}
