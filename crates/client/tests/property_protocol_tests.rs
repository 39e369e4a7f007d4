//! Property-based tests for URL handling.
//!
//! This module uses proptest to verify:
//! - Base URL normalization is idempotent and strips every trailing slash
//! - Login-redirect detection is plain substring matching
//! - An empty login pattern never matches

use cas_client::protocol::{is_login_redirect, normalize_url};
use proptest::prelude::*;
use url::Url;

fn host_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,12}(\\.[a-z]{2,6}){1,2}"
}

fn path_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-zA-Z0-9_-]{1,10}", 0..4).prop_map(|segments| segments.join("/"))
}

proptest! {
    #[test]
    fn normalize_url_is_idempotent(host in host_strategy(), path in path_strategy(), slashes in 0usize..4) {
        let raw = format!("https://{host}/{path}{}", "/".repeat(slashes));
        let once = normalize_url(&raw);

        prop_assert!(!once.ends_with('/'));
        prop_assert_eq!(normalize_url(&once), once.clone());
        prop_assert!(raw.starts_with(&once));
    }

    #[test]
    fn login_redirect_matches_any_url_containing_login_page(
        host in host_strategy(),
        service in "[a-z]{1,10}",
    ) {
        let login = format!("https://{host}/cas/login");
        let final_url = Url::parse(&format!("{login}?service=https%3A%2F%2F{service}")).unwrap();

        prop_assert!(is_login_redirect(&final_url, &login));
        prop_assert!(!is_login_redirect(&final_url, ""));
    }

    #[test]
    fn service_urls_are_not_login_redirects(host in host_strategy(), path in path_strategy()) {
        let final_url = Url::parse(&format!("https://svc.{host}/api/{path}")).unwrap();
        let login = format!("https://sso.{host}/cas/login");

        prop_assert!(!is_login_redirect(&final_url, &login));
    }
}
