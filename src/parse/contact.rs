//! These definitions mirror the contact documents held by the contacts store. The store has gone
//! through a schema change (flat date fields were replaced by an `events` list), and records of
//! both ages are still out there, so everything here is deliberately permissive: a malformed
//! field should make a single event disappear, never the whole load.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;

/// A single contact record, as returned by the contacts store.
#[derive(Deserialize, Debug, PartialEq, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    /// The contact's unique identifier, used only for diagnostics.
    #[serde(alias = "_id", default, deserialize_with = "lenient")]
    pub id: Option<RecordId>,
    /// The account that owns this contact.
    #[serde(default, deserialize_with = "lenient")]
    pub owner_id: Option<RecordId>,
    /// The legacy owner reference, from before `ownerId` was introduced.
    #[serde(default, deserialize_with = "lenient")]
    pub user: Option<RecordId>,

    /// A combined display name. Newer records only carry first/last names.
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub last_name: Option<String>,

    /// The structured event list. Entries that aren't objects (including `null`s in older
    /// exports) are kept as `None`.
    #[serde(default, deserialize_with = "lenient_events")]
    pub events: Option<Vec<Option<ContactEvent>>>,

    // --- Legacy flat fields ---
    #[serde(default)]
    pub birthday: Option<RawDate>,
    #[serde(default)]
    pub marriage_anniversary: Option<RawDate>,
    #[serde(default)]
    pub death_anniversary: Option<RawDate>,
}

/// A single entry in a contact's structured event list.
#[derive(Deserialize, Debug, PartialEq, Clone, Default)]
pub struct ContactEvent {
    /// The kind of event. The store restricts this to `birthday`, `death`, `wedding`, `marriage`
    /// and `custom`, but older records were written without that check, so it's kept as a raw
    /// string and interpreted when labelling. Non-string kinds are treated as missing.
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub kind: Option<String>,
    /// A free-text label, shown in place of the kind for custom events.
    #[serde(default, deserialize_with = "lenient")]
    pub label: Option<String>,
    /// The anchor date of the event.
    #[serde(default)]
    pub date: Option<RawDate>,
    /// Whether or not the event repeats every year. Absent means it does.
    #[serde(default, deserialize_with = "lenient_recurring")]
    pub recurring: Option<bool>,
}

/// Deserializes a field as `T`, treating a value of the wrong shape as if it were missing.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Deserializes an event list entry by entry, so one broken entry only loses itself.
fn lenient_events<'de, D>(deserializer: D) -> Result<Option<Vec<Option<ContactEvent>>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Array(entries) = Value::deserialize(deserializer)? else {
        return Ok(None);
    };
    let events = entries
        .into_iter()
        .map(|entry| match entry {
            Value::Object(_) => serde_json::from_value(entry).ok(),
            Value::Null => None,
            other => {
                tracing::debug!(entry = %other, "skipping malformed event entry");
                None
            }
        })
        .collect();
    Ok(Some(events))
}

/// Reads the `recurring` flag the way the store casts booleans: real booleans, the strings
/// `true`/`false`/`yes`/`no`/`1`/`0`, and numbers (zero is false). Anything else is treated as
/// absent, which makes the event recurring.
fn lenient_recurring<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => Some(b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        },
        Value::Number(n) => n.as_f64().map(|n| n != 0.0),
        _ => None,
    })
}

/// An identifier as written by the store: either a plain string or an extended-JSON object id.
#[derive(Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(untagged)]
pub enum RecordId {
    Plain(String),
    ObjectId {
        #[serde(rename = "$oid")]
        oid: String,
    },
}
impl RecordId {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Plain(id) => id,
            Self::ObjectId { oid } => oid,
        }
    }
}

/// A date value as it appears in a contact record. The store has emitted dates in a few different
/// ways over time, and anything we can't make sense of is kept in [`RawDate::Other`] so that it
/// can be skipped later rather than failing deserialization.
#[derive(Deserialize, Debug, PartialEq, Clone)]
#[serde(untagged)]
pub enum RawDate {
    /// An ISO 8601 date or date-time string.
    Text(String),
    /// Milliseconds since the Unix epoch.
    Millis(i64),
    /// MongoDB extended JSON (`{"$date": ...}`), which wraps one of the other forms.
    Extended {
        #[serde(rename = "$date")]
        date: Box<RawDate>,
    },
    /// Epoch milliseconds as an extended-JSON 64-bit integer. Relaxed extended JSON writes dates
    /// before 1970 this way (`{"$date": {"$numberLong": "-315619200000"}}`).
    NumberLong {
        #[serde(rename = "$numberLong")]
        millis: String,
    },
    Other(Value),
}
impl RawDate {
    /// Returns whether or not this value holds anything at all. Empty strings are how some
    /// clients cleared a date, so they count as missing rather than unparseable.
    pub fn is_present(&self) -> bool {
        match self {
            Self::Text(s) => !s.trim().is_empty(),
            Self::NumberLong { millis } => !millis.trim().is_empty(),
            Self::Extended { date } => date.is_present(),
            Self::Other(v) => !v.is_null(),
            Self::Millis(_) => true,
        }
    }

    /// Interprets this value as a calendar date. Date-times keep the calendar date they were
    /// written with (their offset is not converted to local time). Returns `None` for anything
    /// unparseable.
    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Text(s) => {
                let s = s.trim();
                NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .ok()
                    .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
                    .or_else(|| {
                        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                            .ok()
                            .map(|dt| dt.date())
                    })
            }
            Self::Millis(ms) => millis_to_date(*ms),
            Self::NumberLong { millis } => millis.trim().parse().ok().and_then(millis_to_date),
            Self::Extended { date } => date.to_naive_date(),
            Self::Other(_) => None,
        }
    }
}

fn millis_to_date(ms: i64) -> Option<NaiveDate> {
    DateTime::<Utc>::from_timestamp_millis(ms).map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(v: serde_json::Value) -> RawDate {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn parses_every_stored_date_shape() {
        let expected = NaiveDate::from_ymd_opt(1990, 3, 15);
        assert_eq!(date(json!("1990-03-15")).to_naive_date(), expected);
        assert_eq!(date(json!("1990-03-15T00:00:00.000Z")).to_naive_date(), expected);
        assert_eq!(date(json!("1990-03-15T23:30:00+05:30")).to_naive_date(), expected);
        assert_eq!(date(json!("1990-03-15T08:00:00")).to_naive_date(), expected);
        assert_eq!(
            date(json!({ "$date": "1990-03-15T00:00:00Z" })).to_naive_date(),
            expected
        );
        // 1990-03-15T00:00:00Z
        assert_eq!(date(json!(637459200000i64)).to_naive_date(), expected);
        assert_eq!(
            date(json!({ "$date": 637459200000i64 })).to_naive_date(),
            expected
        );
    }

    #[test]
    fn garbage_dates_are_kept_but_unparseable() {
        let garbage = date(json!("not a date"));
        assert!(garbage.is_present());
        assert_eq!(garbage.to_naive_date(), None);

        let boolean = date(json!(true));
        assert!(matches!(boolean, RawDate::Other(_)));
        assert_eq!(boolean.to_naive_date(), None);

        assert_eq!(date(json!("1990-02-30")).to_naive_date(), None);
    }

    #[test]
    fn empty_dates_are_not_present() {
        assert!(!date(json!("")).is_present());
        assert!(!date(json!("   ")).is_present());
        assert!(!date(json!({ "$date": "" })).is_present());
    }

    #[test]
    fn deserializes_mixed_contact() {
        let contact: Contact = serde_json::from_value(json!({
            "_id": { "$oid": "65f0c0ffee" },
            "ownerId": "owner-1",
            "firstName": "Ada",
            "lastName": "Lovelace",
            "phone": "555-0100",
            "tags": ["family"],
            "events": [
                { "type": "birthday", "date": "1815-12-10" },
                null,
                { "type": "custom", "label": "Graduation", "date": null, "recurring": false }
            ],
            "birthday": "1815-12-10T00:00:00.000Z"
        }))
        .unwrap();

        assert_eq!(contact.id.as_ref().map(RecordId::as_str), Some("65f0c0ffee"));
        assert_eq!(contact.owner_id, Some(RecordId::Plain("owner-1".to_string())));
        let events = contact.events.unwrap();
        assert_eq!(events.len(), 3);
        assert!(events[1].is_none());
        assert_eq!(events[2].as_ref().unwrap().date, None);
        assert_eq!(events[2].as_ref().unwrap().recurring, Some(false));
        assert!(contact.birthday.is_some());
        assert!(contact.marriage_anniversary.is_none());
    }

    #[test]
    fn pre_epoch_number_long_dates() {
        // 1960-01-01T00:00:00Z
        let expected = NaiveDate::from_ymd_opt(1960, 1, 1);
        assert_eq!(
            date(json!({ "$date": { "$numberLong": "-315619200000" } })).to_naive_date(),
            expected
        );
        assert_eq!(
            date(json!({ "$numberLong": "-315619200000" })).to_naive_date(),
            expected
        );
        assert_eq!(
            date(json!({ "$date": { "$numberLong": "soon" } })).to_naive_date(),
            None
        );
    }

    #[test]
    fn malformed_events_only_lose_themselves() {
        let contact: Contact = serde_json::from_value(json!({
            "ownerId": "o",
            "firstName": "Ada",
            "birthday": "1990-03-15",
            "events": [
                "garbage",
                { "type": 7, "date": "2001-05-05" },
                { "type": "custom", "label": ["x"], "date": "2020-01-01", "recurring": "false" },
                ["birthday", "1990-03-15"],
                { "type": "wedding", "date": "2011-09-17", "recurring": { "nope": true } }
            ]
        }))
        .unwrap();

        assert_eq!(contact.first_name.as_deref(), Some("Ada"));
        assert!(contact.birthday.is_some());
        let events = contact.events.unwrap();
        assert_eq!(events.len(), 5);
        assert!(events[0].is_none());
        assert_eq!(events[1].as_ref().unwrap().kind, None);
        let custom = events[2].as_ref().unwrap();
        assert_eq!(custom.label, None);
        assert_eq!(custom.recurring, Some(false));
        assert!(events[3].is_none());
        assert_eq!(events[4].as_ref().unwrap().recurring, None);
    }

    #[test]
    fn recurring_flags_are_cast_like_the_store() {
        let recurring = |v: Value| {
            serde_json::from_value::<ContactEvent>(json!({ "recurring": v }))
                .unwrap()
                .recurring
        };
        assert_eq!(recurring(json!(true)), Some(true));
        assert_eq!(recurring(json!("False")), Some(false));
        assert_eq!(recurring(json!("yes")), Some(true));
        assert_eq!(recurring(json!(0)), Some(false));
        assert_eq!(recurring(json!(1)), Some(true));
        assert_eq!(recurring(json!(null)), None);
        assert_eq!(recurring(json!("sometimes")), None);
    }

    #[test]
    fn wrongly_typed_contact_fields_are_dropped() {
        let contact: Contact = serde_json::from_value(json!({
            "_id": 12,
            "ownerId": "o",
            "firstName": 42,
            "lastName": "Lovelace",
            "events": "none"
        }))
        .unwrap();
        assert_eq!(contact.id, None);
        assert_eq!(contact.first_name, None);
        assert_eq!(contact.last_name.as_deref(), Some("Lovelace"));
        assert_eq!(contact.events, None);
    }
}
