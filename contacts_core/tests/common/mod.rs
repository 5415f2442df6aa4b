#![allow(dead_code)]

use async_trait::async_trait;
use contacts_core::connectors::google_people::types::Name;
use contacts_core::{
    CallToolRequestParam, CallToolResult, ContactsError, NewContact, PeopleApi, Person,
};
use serde_json::Value;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List(u32),
    Get(String),
    Create(NewContact),
    Delete(String),
}

/// In-memory directory that records every call it receives.
#[derive(Default)]
pub struct FakePeople {
    contacts: Mutex<Vec<Person>>,
    calls: Mutex<Vec<Call>>,
    next_id: Mutex<u64>,
}

impl FakePeople {
    pub fn with_contacts(contacts: Vec<Person>) -> Self {
        let fake = Self::default();
        *fake.contacts.lock().unwrap() = contacts;
        *fake.next_id.lock().unwrap() = 1000;
        fake
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

fn not_found() -> ContactsError {
    ContactsError::NotFound("Requested entity was not found.".to_string())
}

#[async_trait]
impl PeopleApi for FakePeople {
    async fn list_connections(&self, page_size: u32) -> Result<Vec<Person>, ContactsError> {
        self.record(Call::List(page_size));
        Ok(self
            .contacts
            .lock()
            .unwrap()
            .iter()
            .take(page_size as usize)
            .cloned()
            .collect())
    }

    async fn get_person(&self, resource_name: &str) -> Result<Person, ContactsError> {
        self.record(Call::Get(resource_name.to_string()));
        self.contacts
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.resource_name.as_deref() == Some(resource_name))
            .cloned()
            .ok_or_else(not_found)
    }

    async fn create_person(&self, contact: &NewContact) -> Result<Person, ContactsError> {
        self.record(Call::Create(contact.clone()));
        let mut person = contact.to_person();
        let id = {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            *next
        };
        person.resource_name = Some(format!("people/c{}", id));
        if let Some(name) = person.names.as_mut().and_then(|ns| ns.first_mut()) {
            let display = format!(
                "{} {}",
                name.given_name.clone().unwrap_or_default(),
                name.family_name.clone().unwrap_or_default()
            );
            name.display_name = Some(display.trim().to_string());
        }
        self.contacts.lock().unwrap().push(person.clone());
        Ok(person)
    }

    async fn delete_person(&self, resource_name: &str) -> Result<(), ContactsError> {
        self.record(Call::Delete(resource_name.to_string()));
        let mut contacts = self.contacts.lock().unwrap();
        let before = contacts.len();
        contacts.retain(|p| p.resource_name.as_deref() != Some(resource_name));
        if contacts.len() == before {
            return Err(not_found());
        }
        Ok(())
    }
}

pub fn person(resource: &str, display: &str, emails: &[&str], phones: &[&str]) -> Person {
    let mut p: Person = serde_json::from_value(serde_json::json!({
        "resourceName": resource,
        "emailAddresses": emails.iter().map(|e| serde_json::json!({"value": e})).collect::<Vec<_>>(),
        "phoneNumbers": phones.iter().map(|n| serde_json::json!({"value": n})).collect::<Vec<_>>(),
    }))
    .unwrap();
    p.names = Some(vec![Name {
        display_name: Some(display.to_string()),
        given_name: display.split(' ').next().map(|s| s.to_string()),
        family_name: display.split(' ').nth(1).map(|s| s.to_string()),
    }]);
    p
}

pub fn call(name: &str, args: Value) -> CallToolRequestParam {
    CallToolRequestParam {
        name: name.to_string().into(),
        arguments: args.as_object().cloned(),
    }
}

pub fn text(result: &CallToolResult) -> String {
    assert_eq!(result.content.len(), 1);
    result.content[0]
        .as_text()
        .expect("text content")
        .text
        .clone()
}
