//! Display-friendly contact shapes returned by the tools.
//!
//! Every optional People API field is resolved to a concrete value here so callers
//! never see a missing key: names default to `""` (display name to `"Unknown"`),
//! joined email/phone strings to `"No email"`/`"No phone"`, sequences to `[]`.

use serde::Serialize;

use crate::connectors::google_people::types::{Name, Person};

const UNKNOWN_NAME: &str = "Unknown";
const NO_EMAIL: &str = "No email";
const NO_PHONE: &str = "No phone";

struct NameParts {
    display_name: String,
    given_name: String,
    family_name: String,
}

fn name_parts(name: Option<&Name>) -> NameParts {
    let non_empty = |v: Option<&String>| v.filter(|s| !s.is_empty()).cloned();
    NameParts {
        display_name: non_empty(name.and_then(|n| n.display_name.as_ref()))
            .unwrap_or_else(|| UNKNOWN_NAME.to_string()),
        given_name: non_empty(name.and_then(|n| n.given_name.as_ref())).unwrap_or_default(),
        family_name: non_empty(name.and_then(|n| n.family_name.as_ref())).unwrap_or_default(),
    }
}

fn joined_or(values: Vec<String>, fallback: &str) -> String {
    let joined = values.join(", ");
    if joined.is_empty() {
        fallback.to_string()
    } else {
        joined
    }
}

/// List and search view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSummary {
    pub resource_name: String,
    pub display_name: String,
    pub given_name: String,
    pub family_name: String,
    pub email: String,
    pub phone: String,
    pub organization: String,
}

impl From<&Person> for ContactSummary {
    fn from(person: &Person) -> Self {
        let names = name_parts(person.primary_name());
        let organization = person
            .organizations
            .as_ref()
            .and_then(|os| os.first())
            .and_then(|o| o.name.clone())
            .unwrap_or_default();
        Self {
            resource_name: person.resource_name.clone().unwrap_or_default(),
            display_name: names.display_name,
            given_name: names.given_name,
            family_name: names.family_name,
            email: joined_or(person.email_values(), NO_EMAIL),
            phone: joined_or(person.phone_values(), NO_PHONE),
            organization,
        }
    }
}

/// Single-contact view returned by `get_contact`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetail {
    pub resource_name: String,
    pub display_name: String,
    pub given_name: String,
    pub family_name: String,
    pub emails: Vec<String>,
    pub phones: Vec<String>,
    pub addresses: Vec<String>,
    pub organizations: Vec<String>,
    pub biography: String,
}

impl From<&Person> for ContactDetail {
    fn from(person: &Person) -> Self {
        let names = name_parts(person.primary_name());
        Self {
            resource_name: person.resource_name.clone().unwrap_or_default(),
            display_name: names.display_name,
            given_name: names.given_name,
            family_name: names.family_name,
            emails: person.email_values(),
            phones: person.phone_values(),
            addresses: person
                .addresses
                .iter()
                .flatten()
                .filter_map(|a| a.formatted_value.clone())
                .collect(),
            organizations: person
                .organizations
                .iter()
                .flatten()
                .filter_map(|o| o.name.clone())
                .collect(),
            biography: person
                .biographies
                .as_ref()
                .and_then(|bs| bs.first())
                .and_then(|b| b.value.clone())
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrganizationEntry {
    pub name: String,
    pub title: String,
}

/// View of a freshly created contact; organizations keep their job titles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedContact {
    pub resource_name: String,
    pub display_name: String,
    pub given_name: String,
    pub family_name: String,
    pub emails: Vec<String>,
    pub phones: Vec<String>,
    pub organizations: Vec<OrganizationEntry>,
}

impl From<&Person> for CreatedContact {
    fn from(person: &Person) -> Self {
        let names = name_parts(person.primary_name());
        Self {
            resource_name: person.resource_name.clone().unwrap_or_default(),
            display_name: names.display_name,
            given_name: names.given_name,
            family_name: names.family_name,
            emails: person.email_values(),
            phones: person.phone_values(),
            organizations: person
                .organizations
                .iter()
                .flatten()
                .map(|o| OrganizationEntry {
                    name: o.name.clone().unwrap_or_default(),
                    title: o.title.clone().unwrap_or_default(),
                })
                .collect(),
        }
    }
}

/// Case-insensitive substring match against the primary display name, email and phone.
/// `needle` must already be lowercase. Absent fields count as `""`, so an empty needle
/// matches every contact.
pub fn matches_query(person: &Person, needle: &str) -> bool {
    let display_name = person
        .primary_name()
        .and_then(|n| n.display_name.as_deref());
    [display_name, person.primary_email(), person.primary_phone()]
        .into_iter()
        .any(|field| field.unwrap_or_default().to_lowercase().contains(needle))
}
