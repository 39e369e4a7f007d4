//! Common test utilities for integration tests.
//!
//! This module provides a mock CAS deployment on a single `MockServer`:
//! - `/cas/v1/tickets` and `/cas/v1/tickets/{TGT}`: the REST ticket service
//! - `/cas/login`: the login page that lost sessions are redirected to
//! - any other path: the protected service, mounted per test
//!
//! # What this does NOT handle
//! - Per-test target-service behavior (mount it in the test)
//! - Test-specific assertions

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use secrecy::SecretString;

#[allow(unused_imports)]
pub use cas_client::{
    AuthObserver, CasClient, CasError, LoginOutcome, RequestOptions, UNAUTHORIZED_BODY,
};
#[allow(unused_imports)]
pub use wiremock::{Mock, MockServer, ResponseTemplate};

use wiremock::matchers::{body_string, body_string_contains, method, path};

#[allow(dead_code)]
pub const TGT_ID: &str = "TGT-1-abc";
#[allow(dead_code)]
pub const TICKETS_PATH: &str = "/cas/v1/tickets";
#[allow(dead_code)]
pub const LOGIN_PATH: &str = "/cas/login";

#[allow(dead_code)]
pub fn login_url(server: &MockServer) -> String {
    format!("{}{}", server.uri(), LOGIN_PATH)
}

#[allow(dead_code)]
pub fn tickets_url(server: &MockServer) -> String {
    format!("{}{}", server.uri(), TICKETS_PATH)
}

/// A gateway redirect to the login page, as a lost session produces.
#[allow(dead_code)]
pub fn redirect_to_login(server: &MockServer) -> ResponseTemplate {
    ResponseTemplate::new(302).insert_header(
        "Location",
        format!("{}?service=http%3A%2F%2Fsvc", login_url(server)).as_str(),
    )
}

/// Mount the login page the gateway redirects to.
#[allow(dead_code)]
pub async fn mount_login_page(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(LOGIN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<form>CAS login</form>"))
        .mount(server)
        .await;
}

/// Form body of the service-ticket request for `service_url`.
#[allow(dead_code)]
pub fn service_form(service_url: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(service_url.as_bytes()).collect();
    format!("service={encoded}")
}

/// Mount a working ticket service issuing `ticket` for `service_url` and
/// expecting exactly `exchanges` full exchanges.
#[allow(dead_code)]
pub async fn mount_ticket_service(
    server: &MockServer,
    service_url: &str,
    ticket: &str,
    exchanges: u64,
) {
    Mock::given(method("POST"))
        .and(path(TICKETS_PATH))
        .and(body_string_contains("username=alice"))
        .and(body_string_contains("password=secret"))
        .respond_with(ResponseTemplate::new(201).insert_header(
            "Location",
            format!("{}/{}", tickets_url(server), TGT_ID).as_str(),
        ))
        .expect(exchanges)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("{}/{}", TICKETS_PATH, TGT_ID)))
        .and(body_string(service_form(service_url)))
        .respond_with(ResponseTemplate::new(200).set_body_string(ticket))
        .expect(exchanges)
        .mount(server)
        .await;
}

/// Client wired to the mock ticket service and login page.
#[allow(dead_code)]
pub fn client_for(server: &MockServer, service_url: &str) -> CasClient {
    builder_for(server, service_url)
        .build()
        .expect("client should build")
}

#[allow(dead_code)]
pub fn builder_for(server: &MockServer, service_url: &str) -> cas_client::CasClientBuilder {
    CasClient::builder()
        .ticket_service_url(tickets_url(server))
        .service_url(service_url.to_string())
        .login_redirect_url(login_url(server))
        .credentials(
            "alice".to_string(),
            SecretString::new("secret".to_string().into()),
        )
}

/// Observer that records every authentication event.
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingObserver {
    succeeded: AtomicUsize,
    failures: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl RecordingObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn successes(&self) -> usize {
        self.succeeded.load(Ordering::SeqCst)
    }

    pub fn failures(&self) -> Vec<String> {
        self.failures.lock().unwrap().clone()
    }
}

impl AuthObserver for RecordingObserver {
    fn on_auth_succeeded(&self) {
        self.succeeded.fetch_add(1, Ordering::SeqCst);
    }

    fn on_auth_failed(&self, diagnostic: &str) {
        self.failures.lock().unwrap().push(diagnostic.to_string());
    }
}
