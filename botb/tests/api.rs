//! End-to-end tests of the API layer against a scripted transport.

use botb::{ApiClient, Botb, Condition, Error, HttpResponse, ListQuery, Result};
use serde_json::json;
use std::cell::RefCell;

#[derive(Debug, Clone)]
struct Request {
    method: &'static str,
    url: String,
    fields: Vec<(String, String)>,
}

impl Request {
    fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Transport that answers from a handler function and records every request
/// it sees.
struct FakeClient<H: Fn(&Request) -> HttpResponse> {
    handler: H,
    log: RefCell<Vec<Request>>,
}

impl<H: Fn(&Request) -> HttpResponse> FakeClient<H> {
    fn new(handler: H) -> FakeClient<H> {
        FakeClient {
            handler,
            log: RefCell::new(Vec::new()),
        }
    }

    fn requests(&self) -> Vec<Request> {
        self.log.borrow().clone()
    }

    fn respond(&self, request: Request) -> Result<HttpResponse> {
        let response = (self.handler)(&request);

        self.log.borrow_mut().push(request);

        Ok(response)
    }
}

impl<H: Fn(&Request) -> HttpResponse> ApiClient for FakeClient<H> {
    fn get(&self, url: &str) -> Result<HttpResponse> {
        self.respond(Request {
            method: "GET",
            url: url.to_string(),
            fields: Vec::new(),
        })
    }

    fn post_form(&self, url: &str, fields: &[(String, String)]) -> Result<HttpResponse> {
        self.respond(Request {
            method: "POST",
            url: url.to_string(),
            fields: fields.to_vec(),
        })
    }
}

fn ok(body: impl ToString) -> HttpResponse {
    HttpResponse {
        status: 200,
        body: body.to_string(),
    }
}

fn status(status: u16, body: impl ToString) -> HttpResponse {
    HttpResponse {
        status,
        body: body.to_string(),
    }
}

fn botbr_payload(id: u64, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "aura": format!("{:08}", id),
        "aura_color": "#7f9fbf",
        "avatar_url": format!("https://battleofthebits.com/disk/botbr_avatars/{}.png", id),
        "badge_levels": [],
        "boons": 1.25,
        "class": "mixist",
        "class_icon": "",
        "create_date": "2016-05-03",
        "laston_date": "2024-11-30",
        "level": 13,
        "palette_id": 2117,
        "points": 5430,
        "points_array": [],
        "profile_url": format!("https://battleofthebits.com/barracks/Profile/{}/", name)
    })
}

fn tag_payload(id: u64) -> serde_json::Value {
    json!({ "id": id, "entry_id": id * 10, "tag": "cool tag" })
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn load_decodes_the_object() {
    init_logging();

    let client = FakeClient::new(|request| {
        assert_eq!(
            request.url,
            "https://battleofthebits.com/api/v1/botbr/load/16333"
        );

        ok(botbr_payload(16333, "knurek"))
    });
    let api = Botb::new(client);

    let botbr = api.botbr_load(16333).unwrap().unwrap();

    assert_eq!(botbr.name, "knurek");
    assert_eq!(botbr.id, 16333);
}

#[test]
fn load_of_a_missing_object_is_none() {
    init_logging();

    let client = FakeClient::new(|_| status(404, "not found"));
    let api = Botb::new(client);

    assert!(api.botbr_load(1).unwrap().is_none());
}

#[test]
fn load_treats_unfounded_500s_as_none() {
    init_logging();

    let client = FakeClient::new(|_| {
        status(500, r#"{"response_message": "requested object is unfounded"}"#)
    });
    let api = Botb::new(client);

    assert!(api.battle_load(99999).unwrap().is_none());
}

#[test]
fn load_surfaces_other_failures() {
    init_logging();

    let client = FakeClient::new(|_| status(500, r#"{"response_message": "db exploded"}"#));
    let api = Botb::new(client);

    assert!(matches!(
        api.botbr_load(1),
        Err(Error::ConnectionFailure {
            status: Some(500),
            ..
        })
    ));
}

#[test]
fn list_walks_pages_until_a_short_one() {
    init_logging();

    let client = FakeClient::new(|request| {
        match request.url.as_str() {
            "https://battleofthebits.com/api/v1/tag/list/0/2" =>
                ok(json!([tag_payload(1), tag_payload(2)])),
            "https://battleofthebits.com/api/v1/tag/list/1/2" => ok(json!([tag_payload(3)])),
            other => panic!("unexpected request to {}", other),
        }
    });
    let api = Botb::new(client).with_max_page_length(2);

    let tags = api.tag_list(ListQuery::new()).try_collect().unwrap();

    assert_eq!(
        tags.iter().map(|tag| tag.id).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
    assert_eq!(api.client().requests().len(), 2);
}

#[test]
fn filters_travel_in_the_query_string() {
    init_logging();

    let client = FakeClient::new(|_| ok("[]"));
    let api = Botb::new(client);

    api.tag_list_page(
        0,
        25,
        &ListQuery::new().filter("entry_id", 123).filter("tag", "chip"),
    )
    .unwrap();

    let requests = api.client().requests();

    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(
        requests[0].url,
        "https://battleofthebits.com/api/v1/tag/list/0/25?filters=entry_id%7E123%5Etag%7Echip"
    );
}

#[test]
fn conditions_travel_in_a_post_form() {
    init_logging();

    let client = FakeClient::new(|_| ok("[]"));
    let api = Botb::new(client);

    api.entry_list_page(
        2,
        100,
        &ListQuery::new()
            .sort("id")
            .condition(Condition::new("botbr_id", "=", 16333)),
    )
    .unwrap();

    let requests = api.client().requests();

    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(
        requests[0].url,
        "https://battleofthebits.com/api/v1/entry/list/2/100"
    );
    assert_eq!(requests[0].field("conditions[0][property]"), Some("botbr_id"));
    assert_eq!(requests[0].field("conditions[0][operator]"), Some("="));
    assert_eq!(requests[0].field("conditions[0][operand]"), Some("16333"));
    assert_eq!(requests[0].field("sort"), Some("id"));
}

#[test]
fn rtfm_rejections_become_invalid_query() {
    init_logging();

    let client =
        FakeClient::new(|_| status(400, "Please RTFM: no such property<br>stack trace here"));
    let api = Botb::new(client);

    match api.tag_list_page(0, 25, &ListQuery::new()) {
        Err(Error::InvalidQuery(message)) => {
            assert_eq!(message, "Please RTFM: no such property");
        },
        other => panic!("expected InvalidQuery, got {:?}", other),
    }
}

#[test]
fn empty_list_body_is_an_empty_page() {
    init_logging();

    let client = FakeClient::new(|_| ok(""));
    let api = Botb::new(client);

    assert!(api.tag_list_page(0, 25, &ListQuery::new()).unwrap().is_empty());
}

#[test]
fn random_unwraps_the_single_element_list() {
    init_logging();

    let client = FakeClient::new(|request| {
        assert_eq!(
            request.url,
            "https://battleofthebits.com/api/v1/botbr/random"
        );

        ok(json!([botbr_payload(774, "someone")]))
    });
    let api = Botb::new(client);

    assert_eq!(api.botbr_random().unwrap().id, 774);
}

#[test]
fn search_query_is_percent_encoded_into_the_path() {
    init_logging();

    let client = FakeClient::new(|request| {
        assert_eq!(
            request.url,
            "https://battleofthebits.com/api/v1/botbr/search/cool%20guy/0/25"
        );

        ok("[]")
    });
    let api = Botb::new(client);

    assert!(api.botbr_search_page("cool guy", 0, 25).unwrap().is_empty());
}

#[test]
fn username_lookup_requires_an_exact_match() {
    init_logging();

    let client = FakeClient::new(|_| {
        // The name filter matches substrings, the API method must not
        ok(json!([
            botbr_payload(1, "knurek_fan"),
            botbr_payload(2, "knurek")
        ]))
    });
    let api = Botb::new(client);

    assert_eq!(api.botbr_id_for_username("knurek").unwrap(), Some(2));
    assert_eq!(api.botbr_id_for_username("nosuchuser_xyz").unwrap(), None);
}

#[test]
fn entry_playlists_short_circuits_on_no_memberships() {
    init_logging();

    let client = FakeClient::new(|request| {
        assert!(
            request.url.contains("/playlist_to_entry/list/"),
            "only the link table may be queried, got {}",
            request.url
        );

        ok("[]")
    });
    let api = Botb::new(client);

    // No playlist list request may be issued, an IN condition cannot carry
    // an empty operand list
    assert!(api.entry_playlists(401354).unwrap().is_empty());
}

#[test]
fn desc_without_sort_fails_before_any_request() {
    init_logging();

    let client = FakeClient::new(|_| ok("[]"));
    let api = Botb::new(client);

    assert!(matches!(
        api.tag_list_page(0, 25, &ListQuery::new().desc(true)),
        Err(Error::InvalidQuery(_))
    ));
    assert!(api.client().requests().is_empty());
}
