use super::{contact::Contact, OwnerId};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::{io::Read, path::PathBuf};

/// Where contact records should be loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactSource {
    /// A JSON file on disk.
    File(PathBuf),
    /// JSON piped in on stdin.
    Stdin,
    /// The address of a contacts service, which will be asked for the owner's contacts.
    Endpoint(String),
}

/// The shapes a contacts dump can take: a bare list, or a list wrapped in an object (which is what
/// the contacts service returns).
#[derive(Deserialize)]
#[serde(untagged)]
enum ContactsPayload {
    Bare(Vec<Contact>),
    Wrapped { contacts: Vec<Contact> },
}
impl From<ContactsPayload> for Vec<Contact> {
    fn from(payload: ContactsPayload) -> Self {
        match payload {
            ContactsPayload::Bare(contacts) => contacts,
            ContactsPayload::Wrapped { contacts } => contacts,
        }
    }
}

/// Gets the raw contact records from the given source. Endpoints are asked only for the given
/// owner's contacts, but nothing here trusts that, and the caller should still scope the results
/// with [`super::scope_to_owner`].
pub fn get_raw_contacts(source: &ContactSource, owner: &OwnerId) -> Result<Vec<Contact>> {
    let payload: ContactsPayload = match source {
        ContactSource::File(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read contacts file {}", path.display()))?;
            serde_json::from_str(&json)
                .with_context(|| format!("failed to parse contacts file {}", path.display()))?
        }
        ContactSource::Stdin => {
            let mut json = String::new();
            std::io::stdin()
                .read_to_string(&mut json)
                .with_context(|| "failed to read contacts from stdin")?;
            serde_json::from_str(&json).with_context(|| "failed to parse contacts from stdin")?
        }
        ContactSource::Endpoint(addr) => {
            let mut res = ureq::get(&format!("http://{}/contacts", addr))
                .config()
                .http_status_as_error(false)
                .build()
                .query("owner", owner.as_str())
                .call()
                .with_context(|| format!("failed to reach contacts service at {addr}"))?;
            if res.status() != 200 {
                bail!(
                    "failed to fetch contacts from {addr}, received status {}",
                    res.status()
                );
            }

            res.body_mut()
                .read_json()
                .with_context(|| "failed to deserialize contacts from contacts service")?
        }
    };

    let contacts: Vec<Contact> = payload.into();
    tracing::debug!(count = contacts.len(), ?source, "loaded contacts");
    Ok(contacts)
}
