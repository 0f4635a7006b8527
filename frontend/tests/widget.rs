mod common;

use chrono::{TimeZone, Utc};
use common::{create_reading, harness, harness_with_actions};
use readit_frontend::actions::ADD_READING;
use readit_frontend::reading::iso8601;
use readit_frontend::{Action, ReadingFields};
use serde_json::json;

#[test]
fn test_update_uses_readings() {
    let h = harness();
    h.readit.update();
    assert!(h.readit.with_view(|v| v.ids()).is_empty());

    h.readit.set_readings(vec![create_reading("1"), create_reading("2")]);
    h.readit.update();
    assert_eq!(h.readit.with_view(|v| v.ids()), vec!["1", "2"]);
}

#[test]
fn test_update_identifies_elements_by_id() {
    let h = harness();
    let mut reading = create_reading("1");
    let another = create_reading("2");
    h.readit.push_reading(reading.clone());
    h.readit.update();
    let mutations = h.readit.with_view(|v| v.mutations());

    reading.title = another.title.clone();
    reading.when = reading.when + chrono::Duration::days(1);
    h.readit.set_readings(vec![reading.clone()]);
    h.readit.update();

    let fields = h.readit.with_view(|v| v.fields("1").cloned()).unwrap();
    assert_eq!(fields.title, another.title);
    assert_eq!(fields.when, reading.when_text());
    assert_eq!(h.readit.with_view(|v| v.mutations()), mutations);

    h.readit.push_reading(another);
    h.readit.update();
    assert_eq!(h.readit.readings().len(), 2);
    assert_eq!(h.readit.with_view(|v| v.ids()), vec!["1", "2"]);
}

#[test]
fn test_clicking_a_reading_shows_it() {
    let h = harness();
    let reading = create_reading("1");
    h.readit.push_reading(reading.clone());
    h.readit.update();

    let handler = h.readit.with_view(|v| v.handler("1")).unwrap();
    handler();

    assert_eq!(
        h.readit.with_panel(|p| p.shown.clone()),
        Some(ReadingFields::from(&reading))
    );
}

#[test]
fn test_show_reading_fills_the_panel() {
    let h = harness();
    let reading = create_reading("1");
    h.readit.show_reading(&reading);

    let shown = h.readit.with_panel(|p| p.shown.clone()).unwrap();
    assert_eq!(shown.title, reading.title);
    assert_eq!(shown.href, reading.link);
    assert_eq!(shown.url, reading.link);
    assert_eq!(shown.when, reading.when_text());
}

#[test]
fn test_add_reading_follows_hypermedia_action() {
    let h = harness();
    let reading = create_reading("1");
    h.readit.set_action(ADD_READING, Action::new("POST", "http://add/reading"));
    h.transport.respond(json!({ "new_reading": { "id": "1", "title": "t", "link": "l" } }));

    h.readit.add_reading(&reading);

    let request = h.transport.last_request().unwrap();
    assert_eq!(request.url, "http://add/reading");
    assert_eq!(request.method, "POST");
    assert_eq!(request.body, Some(reading.to_json().to_string()));
    assert_eq!(
        request.header("Content-Type").and_then(|v| v.split(';').next()),
        Some("application/json")
    );
    assert!(request
        .header("Accept")
        .unwrap()
        .split(',')
        .any(|accepted| accepted.trim() == "application/json"));
}

#[test]
fn test_add_reading_prepends_and_renders() {
    let h = harness_with_actions();
    h.readit.push_reading(create_reading("old"));
    let when = Utc.with_ymd_and_hms(2012, 2, 29, 23, 59, 59).unwrap();
    h.transport.respond(json!({
        "new_reading": {
            "title": "reading title",
            "id": "readingid",
            "link": "http://link.to.reading",
            "when": iso8601(&when)
        }
    }));

    h.readit.add_reading(&h.readit.create_reading(&json!({
        "title": "reading title",
        "link": "http://link.to.reading"
    })));

    let readings = h.readit.readings();
    assert_eq!(readings.len(), 2);
    assert_eq!(readings[0].id.as_deref(), Some("readingid"));
    assert_eq!(readings[0].title, "reading title");
    assert_eq!(readings[0].link, "http://link.to.reading");
    assert_eq!(readings[0].when, when);

    let fields = h.readit.with_view(|v| v.fields("readingid").cloned()).unwrap();
    assert_eq!(fields, ReadingFields::from(&readings[0]));
    assert_eq!(fields.rel, "external");
}

#[test]
fn test_redirect_is_followed() {
    let h = harness_with_actions();
    h.transport.respond(json!({ "redirect_to": "http://go/to/here" }));

    h.readit.add_reading(&create_reading("1"));

    assert!(h.transport.was_called());
    assert_eq!(h.navigated.borrow().as_deref(), Some("http://go/to/here"));
    assert!(h.readit.readings().is_empty());
}

#[test]
fn test_operations_without_actions_are_no_ops() {
    let h = harness();
    h.readit.push_reading(create_reading("1"));

    h.readit.add_reading(&create_reading("2"));
    h.readit.fetch_readings();

    assert!(!h.transport.was_called());
    assert_eq!(h.readit.readings().len(), 1);
    assert!(h.messages.last().is_none());
}

#[test]
fn test_fetch_readings_populates_readings() {
    let h = harness_with_actions();
    h.transport.respond(json!({
        "readings": [
            { "id": "1", "title": "title 1", "link": "http://link/1", "when": "2012-02-29T23:59:59.999Z" },
            { "id": "2", "title": "title 2", "link": "http://link/2", "when": { "__jsonclass__": ["Date", 1335298365827i64] } },
            { "id": "3", "title": "title 3", "link": "http://link/3", "when": "2012-02-29T23:59:59.999Z" }
        ]
    }));

    h.readit.fetch_readings();

    let request = h.transport.last_request().unwrap();
    assert_eq!(request.method, "GET");
    assert_eq!(request.url, "http://readings");
    assert_eq!(request.body, None);

    let readings = h.readit.readings();
    assert_eq!(readings.len(), 3);
    assert_eq!(iso8601(&readings[0].when), "2012-02-29T23:59:59.999Z");
    assert_eq!(readings[1].when.timestamp_millis(), 1335298365827);
    assert_eq!(h.readit.with_view(|v| v.ids()), vec!["1", "2", "3"]);
}

#[test]
fn test_fetch_keeps_object_id_hinted_ids() {
    let h = harness_with_actions();
    h.transport.respond(json!({
        "readings": [{
            "id": { "__jsonclass__": ["ObjectId", "4f78d1f94e02d89ba0000000"] },
            "title": "hinted",
            "link": "http://link/hinted"
        }]
    }));

    h.readit.fetch_readings();

    let readings = h.readit.readings();
    assert_eq!(readings[0].id.as_deref(), Some("4f78d1f94e02d89ba0000000"));
    assert_eq!(h.readit.with_view(|v| v.ids()), vec!["4f78d1f94e02d89ba0000000"]);
}

#[test]
fn test_fetch_replaces_and_prunes() {
    let h = harness_with_actions();
    h.readit.set_readings(vec![create_reading("1"), create_reading("2")]);
    h.readit.update();
    let kept = h.readit.with_view(|v| v.serial("2"));

    h.transport.respond(json!({ "readings": [{ "id": "2", "title": "still here", "link": "http://link/2" }] }));
    h.readit.fetch_readings();

    assert_eq!(h.readit.with_view(|v| v.ids()), vec!["2"]);
    assert_eq!(h.readit.with_view(|v| v.serial("2")), kept);
    assert_eq!(h.readit.with_view(|v| v.fields("2").unwrap().title.clone()), "still here");
}

#[test]
fn test_fetch_error_displays_a_message() {
    let h = harness_with_actions();
    let before = vec![create_reading("1")];
    h.readit.set_readings(before.clone());
    h.transport.fail(403, "Forbidden");

    h.readit.fetch_readings();

    assert_eq!(
        h.messages.last(),
        Some((403, "Forbidden".to_owned(), "Forbidden".to_owned()))
    );
    assert_eq!(h.readit.readings(), before);
}

#[test]
fn test_add_error_displays_a_message() {
    let h = harness_with_actions();
    h.transport.fail(599, "Induced Error");

    h.readit.add_reading(&create_reading("1"));

    assert_eq!(
        h.messages.last(),
        Some((599, "Induced Error".to_owned(), "Induced Error".to_owned()))
    );
    assert!(h.readit.readings().is_empty());
}

#[test]
fn test_create_reading() {
    let h = harness();
    let reading = h.readit.create_reading(&json!({
        "title": "reading title",
        "link": "http://link.to.title"
    }));

    assert_eq!(reading.title, "reading title");
    assert_eq!(reading.link, "http://link.to.title");
    assert_eq!(reading.id, None);
    assert!((Utc::now() - reading.when).num_seconds().abs() < 5);
}
