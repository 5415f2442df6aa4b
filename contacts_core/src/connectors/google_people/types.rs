use serde::{Deserialize, Serialize};

/// Fields requested when listing or searching connections.
pub const LIST_PERSON_FIELDS: &str = "names,emailAddresses,phoneNumbers,organizations";

/// Fields requested for the single-contact view.
pub const GET_PERSON_FIELDS: &str =
    "names,emailAddresses,phoneNumbers,addresses,organizations,biographies";

/// A People API `Person` as far as this server reads or writes it.
///
/// Every field is optional on the wire; absent groups are skipped on
/// serialization so create requests never carry empty groups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub names: Option<Vec<Name>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_addresses: Option<Vec<EmailAddress>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_numbers: Option<Vec<PhoneNumber>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addresses: Option<Vec<Address>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizations: Option<Vec<Organization>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub biographies: Option<Vec<Biography>>,
}

impl Person {
    pub fn primary_name(&self) -> Option<&Name> {
        self.names.as_ref().and_then(|ns| ns.first())
    }

    pub fn email_values(&self) -> Vec<String> {
        values(self.email_addresses.as_deref(), |e| e.value.as_ref())
    }

    pub fn phone_values(&self) -> Vec<String> {
        values(self.phone_numbers.as_deref(), |p| p.value.as_ref())
    }

    pub fn primary_email(&self) -> Option<&str> {
        self.email_addresses
            .as_ref()
            .and_then(|es| es.first())
            .and_then(|e| e.value.as_deref())
    }

    pub fn primary_phone(&self) -> Option<&str> {
        self.phone_numbers
            .as_ref()
            .and_then(|ps| ps.first())
            .and_then(|p| p.value.as_deref())
    }
}

fn values<T>(items: Option<&[T]>, get: impl Fn(&T) -> Option<&String>) -> Vec<String> {
    items
        .unwrap_or_default()
        .iter()
        .filter_map(|item| get(item).cloned())
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Name {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmailAddress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhoneNumber {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Biography {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Response body of `people.connections.list`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListConnectionsResponse {
    #[serde(default)]
    pub connections: Option<Vec<Person>>,
}

/// Caller-supplied fields for a new contact. Empty strings count as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewContact {
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub organization: Option<String>,
    pub job_title: Option<String>,
}

fn present(v: &Option<String>) -> Option<&str> {
    v.as_deref().filter(|s| !s.is_empty())
}

impl NewContact {
    /// Request body for `people:createContact`; a group is only included when one of
    /// its inputs is populated.
    pub fn to_person(&self) -> Person {
        let given = present(&self.given_name);
        let family = present(&self.family_name);
        let names = (given.is_some() || family.is_some()).then(|| {
            vec![Name {
                display_name: None,
                given_name: Some(given.unwrap_or_default().to_string()),
                family_name: Some(family.unwrap_or_default().to_string()),
            }]
        });

        let email_addresses = present(&self.email).map(|e| {
            vec![EmailAddress {
                value: Some(e.to_string()),
            }]
        });
        let phone_numbers = present(&self.phone).map(|p| {
            vec![PhoneNumber {
                value: Some(p.to_string()),
            }]
        });

        let org = present(&self.organization);
        let title = present(&self.job_title);
        let organizations = (org.is_some() || title.is_some()).then(|| {
            vec![Organization {
                name: Some(org.unwrap_or_default().to_string()),
                title: Some(title.unwrap_or_default().to_string()),
            }]
        });

        Person {
            resource_name: None,
            names,
            email_addresses,
            phone_numbers,
            addresses: None,
            organizations,
            biographies: None,
        }
    }
}
