//! The users resource rendered through the shipped templates

mod common;

use common::http::{request, send_request};
use common::users;
use typed_route::ResponseFormat;
use users_app::SEED_USER_ID;

#[test]
fn test_home_renders_static_template() {
    let server = users::start(ResponseFormat::Html);
    let resp = send_request(&server.addr(), &request("GET", "/", None));
    assert_eq!(resp.status, 200);
    assert_eq!(resp.header("content-type"), Some("text/html; charset=utf-8"));
    assert!(resp.body.contains("<h1>Welcome</h1>"));
}

#[test]
fn test_index_renders_user_list() {
    let server = users::start(ResponseFormat::Html);
    let resp = send_request(&server.addr(), &request("GET", "/users", None));
    assert_eq!(resp.status, 200);
    assert!(resp.body.contains("<h1>Users</h1>"));
    assert!(resp.body.contains(&format!("/users/{SEED_USER_ID}")));
    assert!(resp.body.contains("Alice"));
}

#[test]
fn test_read_renders_detail_and_escapes() {
    let server = users::start(ResponseFormat::Html);
    let addr = server.addr();

    let body = r#"{"name":"<b>Eve</b>","email":"eve@example.com","password":"pw"}"#;
    let resp = send_request(&addr, &request("POST", "/users", Some(("application/json", body))));
    assert_eq!(resp.status, 200);
    assert!(resp.body.contains("&lt;b&gt;Eve&lt;/b&gt;"));
    assert!(!resp.body.contains("<b>Eve</b>"));

    let resp = send_request(&addr, &request("GET", &format!("/users/{SEED_USER_ID}"), None));
    assert_eq!(resp.status, 200);
    assert!(resp.body.contains("alice@example.com"));
    assert!(!resp.body.contains("secret"));
}

#[test]
fn test_errors_stay_json_in_html_mode() {
    let server = users::start(ResponseFormat::Html);
    let path = format!("/users/{}", uuid::Uuid::new_v4());
    let resp = send_request(&server.addr(), &request("DELETE", &path, None));
    assert_eq!(resp.status, 404);
    assert_eq!(resp.header("content-type"), Some("application/json"));
}
