//! End-to-end client tests over an in-memory fake transport.
//!
//! The fake records every request and serves canned response bodies, so
//! tests can assert both decoded results and the exact request sequence;
//! the reconciler's write bound is only observable that way.

use async_trait::async_trait;
use rt_rest::{
    HistoryEntry, HistoryOpts, Record, RelationMap, RelationType, Result, RtClient, RtError,
    SearchOpts, Transport,
};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Clone, Debug, PartialEq, Eq)]
struct Request {
    method: &'static str,
    path: String,
    params: Vec<(String, String)>,
}

/// Transport serving canned responses per (method, path).
///
/// Responses queue in stub order; the final stub for a key is sticky so
/// repeated fetches (reconciler re-reads, post-write show calls) keep
/// working.
#[derive(Default)]
struct FakeTransport {
    stubs: Mutex<HashMap<(&'static str, String), Vec<String>>>,
    log: Mutex<Vec<Request>>,
}

/// Wrap a body in the envelope RT puts on every response.
fn ok(body: &str) -> String {
    format!("RT/3.8.7 200 Ok\n\n{body}")
}

impl FakeTransport {
    fn new() -> Self {
        FakeTransport::default()
    }

    fn stub(&self, method: &'static str, path: &str, raw: String) {
        self.stubs
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push(raw);
    }

    fn take(&self, method: &'static str, path: &str) -> Result<String> {
        let mut stubs = self.stubs.lock().unwrap();
        let queue = stubs
            .get_mut(&(method, path.to_string()))
            .ok_or_else(|| RtError::Http(format!("no stub for {method} {path}")))?;
        if queue.len() > 1 {
            Ok(queue.remove(0))
        } else {
            Ok(queue[0].clone())
        }
    }

    fn record(&self, method: &'static str, path: &str, params: &[(&str, &str)]) {
        self.log.lock().unwrap().push(Request {
            method,
            path: path.to_string(),
            params: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });
    }

    fn requests(&self) -> Vec<Request> {
        self.log.lock().unwrap().clone()
    }

    fn posted_contents(&self, path: &str) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == "POST" && r.path == path)
            .filter_map(|r| {
                r.params
                    .into_iter()
                    .find(|(k, _)| k == "content")
                    .map(|(_, v)| v)
            })
            .collect()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<String> {
        self.record("GET", path, query);
        self.take("GET", path)
    }

    async fn post(&self, path: &str, form: &[(&str, &str)]) -> Result<String> {
        self.record("POST", path, form);
        self.take("POST", path)
    }

    async fn login(&self, _username: &str, _password: &str) -> Result<()> {
        Ok(())
    }
}

fn client_with(fake: FakeTransport) -> RtClient<FakeTransport> {
    RtClient::with_transport(fake)
}

const TICKET_1_SHOW: &str = "id: ticket/1\nQueue: sales\nOwner: dan\nCreator: dan\nSubject: rethink our API\nStatus: open\nRequestors: bob@example.org,\n            alice@example.org, mary@example.org\n\nCc: dan@example.org, sue@example.org\nAdminCc: boss@example.org\nCF.{Operating System}: BeOS\nCreated: Mon Apr 14 05:14:21 2014\n";

#[tokio::test]
async fn test_ticket_show_decodes_record() {
    let fake = FakeTransport::new();
    fake.stub("GET", "/ticket/1/show", ok(TICKET_1_SHOW));
    let client = client_with(fake);

    let ticket = client.ticket_show("1").await.unwrap().unwrap();
    assert_eq!(ticket.get_scalar("id"), Some("1"));
    assert_eq!(ticket.get_scalar("Subject"), Some("rethink our API"));
    assert_eq!(
        ticket.get_list("Requestors").unwrap(),
        ["bob@example.org", "alice@example.org", "mary@example.org"]
    );
    assert_eq!(ticket.get_list("Cc").unwrap().len(), 2);
    assert_eq!(ticket.get_list("AdminCc").unwrap(), ["boss@example.org"]);
    assert_eq!(ticket.get_scalar("CF.{Operating_System}"), Some("BeOS"));
}

#[tokio::test]
async fn test_ticket_show_absent_ticket_is_none() {
    let fake = FakeTransport::new();
    fake.stub("GET", "/ticket/5/show", ok("# Ticket 5 does not exist.\n"));
    let client = client_with(fake);

    assert_eq!(client.ticket_show("5").await.unwrap(), None);
}

#[tokio::test]
async fn test_credentials_marker_surfaces_as_unauthenticated() {
    let fake = FakeTransport::new();
    fake.stub("GET", "/ticket/1/show", ok("401 Credentials required\n"));
    let client = client_with(fake);

    let err = client.ticket_show("1").await.unwrap_err();
    assert!(matches!(err, RtError::Unauthenticated));
    assert_eq!(client.authenticated().await.unwrap(), false);
}

#[tokio::test]
async fn test_ticket_create_reports_missing_fields_before_any_request() {
    let fake = FakeTransport::new();
    let client = client_with(fake);

    let mut attrs = Record::new();
    attrs.insert("Subject", "no queue given");
    let err = client.ticket_create(&attrs).await.unwrap_err();
    match err {
        RtError::MissingAttributes { missing } => assert_eq!(missing, ["Queue"]),
        other => panic!("expected MissingAttributes, got {other:?}"),
    }

    let err = client.ticket_create(&Record::new()).await.unwrap_err();
    match err {
        RtError::MissingAttributes { missing } => assert_eq!(missing, ["Subject", "Queue"]),
        other => panic!("expected MissingAttributes, got {other:?}"),
    }

    assert!(client.transport().requests().is_empty());
}

#[tokio::test]
async fn test_ticket_create_defers_admincc_to_followup_update() {
    let fake = FakeTransport::new();
    fake.stub("POST", "/ticket/new", ok("# Ticket 77 created.\n"));
    fake.stub("POST", "/ticket/77/edit", ok("# Ticket 77 updated.\n"));
    fake.stub(
        "GET",
        "/ticket/77/show",
        ok("id: ticket/77\nQueue: sales\nSubject: help\nAdminCc: boss@example.org\n"),
    );
    let client = client_with(fake);

    let mut attrs = Record::new();
    attrs.insert("Subject", "help");
    attrs.insert("Queue", "sales");
    attrs.insert("Text", "first line\nsecond line");
    attrs.insert("AdminCc", vec!["boss@example.org".to_string()]);

    let ticket = client.ticket_create(&attrs).await.unwrap();
    assert_eq!(ticket.get_scalar("id"), Some("77"));

    let created = &client.transport().posted_contents("/ticket/new")[0];
    assert!(created.starts_with("id: ticket/new\n"));
    assert!(created.contains("Text: first line\n second line"));
    assert!(!created.contains("AdminCc"));

    let updated = &client.transport().posted_contents("/ticket/77/edit")[0];
    assert!(updated.contains("AdminCc: boss@example.org"));
}

#[tokio::test]
async fn test_ticket_update_unauthorized() {
    let fake = FakeTransport::new();
    fake.stub(
        "POST",
        "/ticket/1/edit",
        ok("# You are not allowed to modify ticket 1\n"),
    );
    let client = client_with(fake);

    let mut attrs = Record::new();
    attrs.insert("Status", "resolved");
    let err = client.ticket_update("1", &attrs).await.unwrap_err();
    assert!(matches!(err, RtError::Unauthorized(_)));
}

#[tokio::test]
async fn test_ticket_search_short_rows() {
    let fake = FakeTransport::new();
    fake.stub(
        "GET",
        "/search/ticket",
        ok("1: first ticket\n2: second ticket\n"),
    );
    let client = client_with(fake);

    let results = client
        .ticket_search("id = 1 or id = 2", &SearchOpts::default())
        .await
        .unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].get_scalar("id"), Some("1"));
    assert_eq!(results[1].get_scalar("Subject"), Some("second ticket"));

    let request = &client.transport().requests()[0];
    assert!(request
        .params
        .contains(&("format".to_string(), "s".to_string())));
    assert!(request
        .params
        .contains(&("orderby".to_string(), "+id".to_string())));
}

#[tokio::test]
async fn test_ticket_search_verbose_decodes_full_records() {
    let fake = FakeTransport::new();
    fake.stub(
        "GET",
        "/search/ticket",
        ok("id: ticket/1\nSubject: first\nStatus: open\n\n--\n\nid: ticket/2\nSubject: second\nStatus: new\n"),
    );
    let client = client_with(fake);

    let opts = SearchOpts {
        verbose: true,
        ..Default::default()
    };
    let results = client.ticket_search("Status != 'resolved'", &opts).await.unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].get_scalar("id"), Some("1"));
    assert_eq!(results[1].get_scalar("Status"), Some("new"));

    let request = &client.transport().requests()[0];
    assert!(request
        .params
        .contains(&("format".to_string(), "l".to_string())));
}

#[tokio::test]
async fn test_ticket_search_no_matches_is_empty() {
    let fake = FakeTransport::new();
    fake.stub("GET", "/search/ticket", ok("No matching results.\n"));
    let client = client_with(fake);

    let results = client
        .ticket_search("id = 999999", &SearchOpts::default())
        .await
        .unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_ticket_history_short_excludes_comments_by_default() {
    let fake = FakeTransport::new();
    fake.stub(
        "GET",
        "/ticket/1/history",
        ok("11: Ticket created by dan\n12: Comments added by dan\n13: Given to dan by admin\n"),
    );
    let client = client_with(fake);

    let entries = client
        .ticket_history("1", &HistoryOpts::default())
        .await
        .unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(
        entries[1],
        HistoryEntry::Short {
            id: "13".to_string(),
            description: "Given to dan by admin".to_string()
        }
    );
}

const TICKET_1_LINKS: &str = "id: ticket/1\nMembers: fsck.com-ca1a07a0e8f2ba8b3e3b34a4fc1687d9/ticket/20\nDependsOn: fsck.com-ca1a07a0e8f2ba8b3e3b34a4fc1687d9/ticket/6,\n           fsck.com-ca1a07a0e8f2ba8b3e3b34a4fc1687d9/ticket/9\nRefersTo: http://them.example/\n";

#[tokio::test]
async fn test_links_show_strips_internal_uris() {
    let fake = FakeTransport::new();
    fake.stub("GET", "/ticket/1/links/show", ok(TICKET_1_LINKS));
    let client = client_with(fake);

    let links = client.ticket_links_show("1").await.unwrap().unwrap();
    assert_eq!(links.id, "1");
    assert_eq!(links.targets(RelationType::Members), ["20"]);
    assert_eq!(links.targets(RelationType::DependsOn), ["6", "9"]);
    assert_eq!(
        links.targets(RelationType::RefersTo),
        ["http://them.example/"]
    );
}

#[tokio::test]
async fn test_links_add_writes_once_per_target_slot() {
    let fake = FakeTransport::new();
    // First three fetches see no links; the post-write fetch sees both.
    for _ in 0..3 {
        fake.stub("GET", "/ticket/1/links/show", ok("id: ticket/1\n"));
    }
    fake.stub(
        "GET",
        "/ticket/1/links/show",
        ok("id: ticket/1\nDependsOn: fsck.com-abc/ticket/10,\n           fsck.com-abc/ticket/11\n"),
    );
    fake.stub(
        "POST",
        "/ticket/1/links",
        ok("# Links for ticket 1 updated.\n"),
    );
    let client = client_with(fake);

    let mut additions = RelationMap::new();
    additions.insert(
        RelationType::DependsOn,
        vec!["10".to_string(), "11".to_string()],
    );

    let links = client
        .ticket_links_add("1", &additions)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(links.targets(RelationType::DependsOn), ["10", "11"]);

    // Two targets in the largest relation, so exactly two write requests.
    let posts = client.transport().posted_contents("/ticket/1/links");
    assert_eq!(posts.len(), 2);
    assert!(posts.iter().all(|c| c.contains("DependsOn: 10, 11")));
}

#[tokio::test]
async fn test_links_add_of_present_targets_is_idempotent() {
    let fake = FakeTransport::new();
    fake.stub("GET", "/ticket/1/links/show", ok(
        "id: ticket/1\nDependsOn: fsck.com-abc/ticket/10,\n           fsck.com-abc/ticket/11\n",
    ));
    fake.stub(
        "POST",
        "/ticket/1/links",
        ok("# Links for ticket 1 updated.\n"),
    );
    let client = client_with(fake);

    let mut additions = RelationMap::new();
    additions.insert(RelationType::DependsOn, vec!["10".to_string()]);

    let links = client
        .ticket_links_add("1", &additions)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(links.targets(RelationType::DependsOn), ["10", "11"]);

    // The clear pass writes twice (largest current relation has two
    // targets), then the rewrite pass writes twice more.
    let posts = client.transport().posted_contents("/ticket/1/links");
    assert_eq!(posts.len(), 4);
    assert!(posts[0].contains("DependsOn: \n") || posts[0].ends_with("DependsOn: "));
    assert!(posts[3].contains("DependsOn: 10, 11"));
}

#[tokio::test]
async fn test_links_remove_with_empty_request_writes_nothing() {
    let fake = FakeTransport::new();
    fake.stub("GET", "/ticket/1/links/show", ok(TICKET_1_LINKS));
    let client = client_with(fake);

    let links = client
        .ticket_links_remove("1", &RelationMap::new())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(links.targets(RelationType::DependsOn), ["6", "9"]);
    assert!(client.transport().posted_contents("/ticket/1/links").is_empty());
}

#[tokio::test]
async fn test_links_remove_absent_target_is_noop() {
    let fake = FakeTransport::new();
    fake.stub("GET", "/ticket/1/links/show", ok(TICKET_1_LINKS));
    fake.stub(
        "POST",
        "/ticket/1/links",
        ok("# Links for ticket 1 updated.\n"),
    );
    let client = client_with(fake);

    let mut removals = RelationMap::new();
    removals.insert(RelationType::DependsOn, vec!["404".to_string()]);

    let links = client
        .ticket_links_remove("1", &removals)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(links.targets(RelationType::DependsOn), ["6", "9"]);
    // One named target bounds the loop at one write.
    assert_eq!(client.transport().posted_contents("/ticket/1/links").len(), 1);
}

#[tokio::test]
async fn test_links_show_absent_ticket_is_none() {
    let fake = FakeTransport::new();
    fake.stub(
        "GET",
        "/ticket/9/links/show",
        ok("# Ticket 9 does not exist.\n"),
    );
    let client = client_with(fake);

    assert_eq!(client.ticket_links_show("9").await.unwrap(), None);
}

const USER_DAN: &str = "id: user/28\nName: dan\nEmailAddress: dan@us.example\nRealName: Dan Smith\nLang: en\n";

#[tokio::test]
async fn test_user_show_lowercases_keys() {
    let fake = FakeTransport::new();
    fake.stub("GET", "/user/dan", ok(USER_DAN));
    let client = client_with(fake);

    let user = client.user_show("dan").await.unwrap().unwrap();
    assert_eq!(user.get_scalar("id"), Some("28"));
    assert_eq!(user.get_scalar("name"), Some("dan"));
    assert_eq!(user.get_scalar("emailaddress"), Some("dan@us.example"));
    assert_eq!(user.get_scalar("EmailAddress"), None);
}

#[tokio::test]
async fn test_user_show_unknown_user_is_none() {
    let fake = FakeTransport::new();
    fake.stub("GET", "/user/ghost", ok("No user named ghost exists.\n"));
    let client = client_with(fake);

    assert_eq!(client.user_show("ghost").await.unwrap(), None);
}

#[tokio::test]
async fn test_user_create_returns_fetched_user() {
    let fake = FakeTransport::new();
    fake.stub("POST", "/user/new", ok("# User dan created.\n"));
    fake.stub("GET", "/user/dan", ok(USER_DAN));
    let client = client_with(fake);

    let mut attrs = Record::new();
    attrs.insert("Name", "dan");
    attrs.insert("EmailAddress", "dan@us.example");

    let user = client.user_create(&attrs).await.unwrap();
    assert_eq!(user.get_scalar("name"), Some("dan"));

    let posted = &client.transport().posted_contents("/user/new")[0];
    assert!(posted.starts_with("id: user/new\n"));
}

#[tokio::test]
async fn test_queue_show_round_trip() {
    let fake = FakeTransport::new();
    fake.stub(
        "GET",
        "/queue/sales",
        ok("id: queue/1\nName: sales\nDescription: The sales queue\n"),
    );
    fake.stub("GET", "/queue/fake", ok("No queue named fake exists.\n"));
    let client = client_with(fake);

    let queue = client.queue_show("sales").await.unwrap().unwrap();
    assert_eq!(queue.get_scalar("id"), Some("1"));
    assert_eq!(queue.get_scalar("Name"), Some("sales"));

    assert_eq!(client.queue_show("fake").await.unwrap(), None);
}

#[tokio::test]
async fn test_unrecognized_write_response_is_an_error() {
    let fake = FakeTransport::new();
    fake.stub("POST", "/ticket/1/edit", ok("# A brand new server message\n"));
    let client = client_with(fake);

    let mut attrs = Record::new();
    attrs.insert("Status", "open");
    let err = client.ticket_update("1", &attrs).await.unwrap_err();
    assert!(matches!(err, RtError::UnhandledResponse(_)));
}
