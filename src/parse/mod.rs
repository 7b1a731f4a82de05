mod contact;
mod fetch;
mod normalize;

use anyhow::{bail, Result};

pub use contact::*;
pub use fetch::{get_raw_contacts, ContactSource};
pub use normalize::*;

/// The account whose contacts are being examined. Every run needs one, since without it there's no
/// way to know which contacts are meant to be looked at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerId(String);
impl OwnerId {
    /// Creates an owner ID from what the caller supplied, failing if there's nothing there.
    pub fn new(raw: Option<&str>) -> Result<Self> {
        match raw.map(str::trim) {
            Some(id) if !id.is_empty() => Ok(Self(id.to_string())),
            _ => bail!("no owner was provided, pass `--owner` or set `MILESTONES_OWNER`"),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether or not the given contact belongs to this owner, through either its current owner
    /// reference or the legacy `user` one.
    pub fn owns(&self, contact: &Contact) -> bool {
        [&contact.owner_id, &contact.user]
            .into_iter()
            .flatten()
            .any(|id| id.as_str() == self.0)
    }
}

/// Filters the given contacts down to those belonging to the given owner. Contacts with no owner
/// reference at all can't belong to anyone, and are dropped.
pub fn scope_to_owner(contacts: Vec<Contact>, owner: &OwnerId) -> Vec<Contact> {
    contacts
        .into_iter()
        .filter(|contact| {
            if contact.owner_id.is_none() && contact.user.is_none() {
                tracing::debug!(id = ?contact.id, "skipping contact with no owner");
                false
            } else {
                owner.owns(contact)
            }
        })
        .collect()
}
