mod common;

use common::{call, person, text, Call, FakePeople};
use contacts_core::{ContactsError, McpServer, NewContact};
use serde_json::{json, Value};
use std::sync::Arc;

fn directory() -> Vec<contacts_core::Person> {
    vec![
        person("people/c1", "Ada Lovelace", &["ada@x.com"], &["+44 1"]),
        person("people/c2", "Alan Turing", &["alan@bletchley.uk", "ada-fan@x.com"], &[]),
        person("people/c3", "Grace Hopper", &["grace@navy.mil"], &["555-0100"]),
        person("people/c4", "Adam Smith", &[], &["555-0199"]),
        person("people/c5", "Linus Torvalds", &["linus@kernel.org"], &[]),
    ]
}

fn server_with(fake: &Arc<FakePeople>) -> McpServer {
    McpServer::new(fake.clone())
}

#[tokio::test]
async fn list_contacts_returns_summaries_bounded_by_max_results() {
    let fake = Arc::new(FakePeople::with_contacts(directory()));
    let server = server_with(&fake);

    let result = server
        .handle_call_tool(call("list_contacts", json!({"max_results": 2})))
        .await
        .unwrap();
    let records: Vec<Value> = serde_json::from_str(&text(&result)).unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["resourceName"], "people/c1");
    assert_eq!(records[0]["email"], "ada@x.com");
    assert_eq!(records[1]["email"], "alan@bletchley.uk, ada-fan@x.com");
    assert_eq!(records[1]["phone"], "No phone");
    assert_eq!(fake.calls(), vec![Call::List(2)]);
}

#[tokio::test]
async fn list_contacts_defaults_to_one_hundred() {
    let fake = Arc::new(FakePeople::with_contacts(directory()));
    let server = server_with(&fake);

    let result = server
        .handle_call_tool(call("list_contacts", json!({})))
        .await
        .unwrap();
    let records: Vec<Value> = serde_json::from_str(&text(&result)).unwrap();

    assert_eq!(records.len(), 5);
    assert_eq!(fake.calls(), vec![Call::List(100)]);
}

#[tokio::test]
async fn list_contacts_on_empty_directory_is_an_empty_array() {
    let fake = Arc::new(FakePeople::with_contacts(vec![]));
    let server = server_with(&fake);

    let result = server
        .handle_call_tool(call("list_contacts", json!({})))
        .await
        .unwrap();
    assert_eq!(text(&result), "[]");
}

#[tokio::test]
async fn search_scans_five_hundred_and_matches_primary_fields_only() {
    let fake = Arc::new(FakePeople::with_contacts(directory()));
    let server = server_with(&fake);

    let result = server
        .handle_call_tool(call("search_contacts", json!({"query": "ADA"})))
        .await
        .unwrap();
    let records: Vec<Value> = serde_json::from_str(&text(&result)).unwrap();

    // Alan Turing's secondary email mentions "ada" but is not searched.
    let names: Vec<&str> = records
        .iter()
        .map(|r| r["displayName"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Ada Lovelace", "Adam Smith"]);
    assert_eq!(fake.calls(), vec![Call::List(500)]);
}

#[tokio::test]
async fn search_results_all_contain_the_query() {
    let fake = Arc::new(FakePeople::with_contacts(directory()));
    let server = server_with(&fake);

    for query in ["555", "x.com", "an", "o"] {
        let result = server
            .handle_call_tool(call("search_contacts", json!({"query": query})))
            .await
            .unwrap();
        let body = text(&result);
        let Ok(records) = serde_json::from_str::<Vec<Value>>(&body) else {
            continue;
        };
        for r in records {
            // Only the first email and phone are searched.
            let first = |v: &Value| {
                v.as_str()
                    .and_then(|s| s.split(", ").next())
                    .unwrap_or_default()
                    .to_lowercase()
            };
            let hit = [first(&r["displayName"]), first(&r["email"]), first(&r["phone"])]
                .iter()
                .any(|s| s.contains(query));
            assert!(hit, "{} does not match {}", r, query);
        }
    }
}

#[tokio::test]
async fn empty_query_matches_contacts_without_searchable_fields() {
    let bare: contacts_core::Person =
        serde_json::from_value(json!({"resourceName": "people/c9"})).unwrap();
    let fake = Arc::new(FakePeople::with_contacts(vec![bare]));
    let server = server_with(&fake);

    let result = server
        .handle_call_tool(call("search_contacts", json!({"query": ""})))
        .await
        .unwrap();
    let records: Vec<Value> = serde_json::from_str(&text(&result)).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["resourceName"], "people/c9");
    assert_eq!(records[0]["displayName"], "Unknown");
}

#[tokio::test]
async fn list_contacts_treats_blank_email_and_phone_as_missing() {
    let fake = Arc::new(FakePeople::with_contacts(vec![person(
        "people/c8",
        "Blank Fields",
        &[""],
        &[""],
    )]));
    let server = server_with(&fake);

    let result = server
        .handle_call_tool(call("list_contacts", json!({})))
        .await
        .unwrap();
    let records: Vec<Value> = serde_json::from_str(&text(&result)).unwrap();
    assert_eq!(records[0]["email"], "No email");
    assert_eq!(records[0]["phone"], "No phone");
}

#[tokio::test]
async fn search_truncates_to_max_results_in_original_order() {
    let fake = Arc::new(FakePeople::with_contacts(directory()));
    let server = server_with(&fake);

    let result = server
        .handle_call_tool(call("search_contacts", json!({"query": "a", "max_results": 2})))
        .await
        .unwrap();
    let records: Vec<Value> = serde_json::from_str(&text(&result)).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["resourceName"], "people/c1");
    assert_eq!(records[1]["resourceName"], "people/c2");
    assert_eq!(fake.calls(), vec![Call::List(500)]);
}

#[tokio::test]
async fn search_without_matches_says_so() {
    let fake = Arc::new(FakePeople::with_contacts(directory()));
    let server = server_with(&fake);

    let result = server
        .handle_call_tool(call("search_contacts", json!({"query": "zz-nonexistent-zz"})))
        .await
        .unwrap();
    assert_eq!(
        text(&result),
        "No contacts found matching \"zz-nonexistent-zz\""
    );
}

#[tokio::test]
async fn search_without_query_fails_as_tool_execution() {
    let fake = Arc::new(FakePeople::with_contacts(directory()));
    let server = server_with(&fake);

    let err = server
        .handle_call_tool(call("search_contacts", json!({})))
        .await
        .unwrap_err();
    assert!(matches!(err, ContactsError::ToolExecution(_)));
    assert_eq!(
        err.to_string(),
        "Tool execution failed: Invalid params: query is required"
    );
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn get_contact_is_stable_across_calls() {
    let fake = Arc::new(FakePeople::with_contacts(directory()));
    let server = server_with(&fake);

    let args = json!({"resource_name": "people/c3"});
    let first = text(&server.handle_call_tool(call("get_contact", args.clone())).await.unwrap());
    let second = text(&server.handle_call_tool(call("get_contact", args)).await.unwrap());
    assert_eq!(first, second);

    let detail: Value = serde_json::from_str(&first).unwrap();
    assert_eq!(
        detail,
        json!({
            "resourceName": "people/c3",
            "displayName": "Grace Hopper",
            "givenName": "Grace",
            "familyName": "Hopper",
            "emails": ["grace@navy.mil"],
            "phones": ["555-0100"],
            "addresses": [],
            "organizations": [],
            "biography": ""
        })
    );
}

#[tokio::test]
async fn created_contact_can_be_read_back() {
    let fake = Arc::new(FakePeople::with_contacts(vec![]));
    let server = server_with(&fake);

    let created = text(
        &server
            .handle_call_tool(call(
                "create_contact",
                json!({"given_name": "Ada", "family_name": "Lovelace", "email": "ada@x.com"}),
            ))
            .await
            .unwrap(),
    );
    let body = created
        .strip_prefix("Contact created successfully:\n")
        .expect("success prefix");
    let record: Value = serde_json::from_str(body).unwrap();
    let resource_name = record["resourceName"].as_str().unwrap().to_string();
    assert!(resource_name.starts_with("people/c"));
    assert_eq!(record["organizations"], json!([]));

    let fetched = text(
        &server
            .handle_call_tool(call("get_contact", json!({"resource_name": resource_name})))
            .await
            .unwrap(),
    );
    let detail: Value = serde_json::from_str(&fetched).unwrap();
    assert_eq!(detail["givenName"], "Ada");
    assert_eq!(detail["familyName"], "Lovelace");
    assert_eq!(detail["emails"], json!(["ada@x.com"]));
}

#[tokio::test]
async fn create_with_given_name_only_omits_other_groups() {
    let fake = Arc::new(FakePeople::with_contacts(vec![]));
    let server = server_with(&fake);

    server
        .handle_call_tool(call("create_contact", json!({"given_name": "Bob"})))
        .await
        .unwrap();

    let calls = fake.calls();
    let Call::Create(contact) = &calls[0] else {
        panic!("expected a create call, got {:?}", calls);
    };
    assert_eq!(
        contact,
        &NewContact {
            given_name: Some("Bob".to_string()),
            ..Default::default()
        }
    );
    let body = serde_json::to_value(contact.to_person()).unwrap();
    assert_eq!(body, json!({"names": [{"givenName": "Bob", "familyName": ""}]}));
}

#[tokio::test]
async fn create_reports_organization_with_title() {
    let fake = Arc::new(FakePeople::with_contacts(vec![]));
    let server = server_with(&fake);

    let created = text(
        &server
            .handle_call_tool(call(
                "create_contact",
                json!({"given_name": "Tim", "organization": "CERN", "job_title": "Fellow"}),
            ))
            .await
            .unwrap(),
    );
    let record: Value =
        serde_json::from_str(created.trim_start_matches("Contact created successfully:\n"))
            .unwrap();
    assert_eq!(
        record["organizations"],
        json!([{"name": "CERN", "title": "Fellow"}])
    );
}

#[tokio::test]
async fn delete_contact_confirms_with_identifier() {
    let fake = Arc::new(FakePeople::with_contacts(directory()));
    let server = server_with(&fake);

    let result = server
        .handle_call_tool(call("delete_contact", json!({"resource_name": "people/c4"})))
        .await
        .unwrap();
    assert_eq!(text(&result), "Contact people/c4 deleted successfully");
    assert_eq!(fake.calls(), vec![Call::Delete("people/c4".to_string())]);
}

#[tokio::test]
async fn deleting_twice_surfaces_the_remote_error() {
    let fake = Arc::new(FakePeople::with_contacts(directory()));
    let server = server_with(&fake);
    let args = json!({"resource_name": "people/c5"});

    server
        .handle_call_tool(call("delete_contact", args.clone()))
        .await
        .unwrap();
    let err = server
        .handle_call_tool(call("delete_contact", args))
        .await
        .unwrap_err();

    let rpc = err.to_jsonrpc_error();
    assert_eq!(rpc["code"], -32603);
    assert_eq!(
        rpc["message"],
        "Tool execution failed: Requested entity was not found."
    );
}

#[tokio::test]
async fn unknown_tool_is_method_not_found_without_remote_calls() {
    let fake = Arc::new(FakePeople::with_contacts(directory()));
    let server = server_with(&fake);

    let err = server
        .handle_call_tool(call("frobnicate", json!({})))
        .await
        .unwrap_err();

    assert!(matches!(err, ContactsError::UnknownTool(ref name) if name == "frobnicate"));
    assert_eq!(err.to_jsonrpc_error()["code"], -32601);
    assert!(fake.calls().is_empty());
}
