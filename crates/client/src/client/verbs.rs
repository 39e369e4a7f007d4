//! Verb-oriented request surface built on the executor.
//!
//! Every verb turns its arguments into a request-construction closure so the
//! ticket fragment can be appended to the URL on the retry without the caller
//! knowing about CAS.
//!
//! Bodies are passed as factories so each attempt gets a fresh body.
//! Buffered bodies (`Body::from(bytes)` or `Body::from(string)`) are the
//! natural fit; a streaming body can only be produced once per factory call.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Body, Method, Request, RequestBuilder, Response};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::client::CasClient;
use crate::error::{CasError, Result};
use crate::protocol::TicketFragment;

/// Produces a fresh request body for each attempt.
pub type BodyFactory<'a> = &'a (dyn Fn() -> Body + Send + Sync);

/// Optional per-call settings.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Extra headers sent with every attempt.
    pub headers: HeaderMap,
    /// Aborts the call (including any pending re-authentication) when fired.
    pub cancel: Option<CancellationToken>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn cancel_with(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

fn parse_url(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|e| CasError::InvalidUrl(format!("{url}: {e}")))
}

/// Build one attempt of a request, or `None` for meaningless combinations.
fn request_builder(
    http: &reqwest::Client,
    method: &Method,
    url: Url,
    body: Option<BodyFactory<'_>>,
    headers: &HeaderMap,
) -> Option<RequestBuilder> {
    let allows_body = match *method {
        Method::GET | Method::HEAD | Method::OPTIONS => false,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE => true,
        _ => return None,
    };
    if body.is_some() && !allows_body {
        return None;
    }

    let mut builder = http.request(method.clone(), url).headers(headers.clone());
    if let Some(factory) = body {
        builder = builder.body(factory());
    }
    Some(builder)
}

impl CasClient {
    /// Send `method` to `url` through the executor.
    ///
    /// # Errors
    ///
    /// Returns [`CasError::InvalidUrl`] if `url` does not parse,
    /// [`CasError::UnsupportedOperation`] for GET/HEAD/OPTIONS with a body or for
    /// methods other than GET, HEAD, OPTIONS, POST, PUT, PATCH and DELETE.
    pub async fn request(
        &self,
        method: Method,
        url: impl AsRef<str>,
        body: Option<BodyFactory<'_>>,
        options: &RequestOptions,
    ) -> Result<Response> {
        let url = parse_url(url.as_ref())?;
        let http = &self.inner.http;

        let build = |fragment: Option<&TicketFragment>| {
            let target = match fragment {
                Some(fragment) => fragment.apply(&url),
                None => url.clone(),
            };
            request_builder(http, &method, target, body, &options.headers)
        };

        self.execute(build, options.cancel.as_ref()).await
    }

    pub async fn get(&self, url: impl AsRef<str>) -> Result<Response> {
        self.get_with(url, &RequestOptions::default()).await
    }

    pub async fn get_with(&self, url: impl AsRef<str>, options: &RequestOptions) -> Result<Response> {
        self.request(Method::GET, url, None, options).await
    }

    /// GET and read the body as text, whatever the status.
    pub async fn get_string(&self, url: impl AsRef<str>) -> Result<String> {
        Ok(self.get(url).await?.text().await?)
    }

    /// GET and read the body as bytes, whatever the status.
    pub async fn get_bytes(&self, url: impl AsRef<str>) -> Result<Vec<u8>> {
        Ok(self.get(url).await?.bytes().await?.to_vec())
    }

    pub async fn put(&self, url: impl AsRef<str>, body: BodyFactory<'_>) -> Result<Response> {
        self.put_with(url, body, &RequestOptions::default()).await
    }

    pub async fn put_with(
        &self,
        url: impl AsRef<str>,
        body: BodyFactory<'_>,
        options: &RequestOptions,
    ) -> Result<Response> {
        self.request(Method::PUT, url, Some(body), options).await
    }

    pub async fn post(&self, url: impl AsRef<str>, body: BodyFactory<'_>) -> Result<Response> {
        self.post_with(url, body, &RequestOptions::default()).await
    }

    pub async fn post_with(
        &self,
        url: impl AsRef<str>,
        body: BodyFactory<'_>,
        options: &RequestOptions,
    ) -> Result<Response> {
        self.request(Method::POST, url, Some(body), options).await
    }

    pub async fn delete(&self, url: impl AsRef<str>) -> Result<Response> {
        self.delete_with(url, &RequestOptions::default()).await
    }

    pub async fn delete_with(
        &self,
        url: impl AsRef<str>,
        options: &RequestOptions,
    ) -> Result<Response> {
        self.request(Method::DELETE, url, None, options).await
    }

    pub async fn delete_with_body(
        &self,
        url: impl AsRef<str>,
        body: BodyFactory<'_>,
        options: &RequestOptions,
    ) -> Result<Response> {
        self.request(Method::DELETE, url, Some(body), options).await
    }

    /// Send a fully custom request straight to the transport.
    ///
    /// No ticket is injected and a redirect to login is returned as-is; call
    /// [`login`](CasClient::login) first.
    pub async fn send(&self, request: Request) -> Result<Response> {
        Ok(self.inner.http.execute(request).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url() -> Url {
        Url::parse("http://svc.example.com/resource").unwrap()
    }

    #[test]
    fn test_body_not_allowed_for_get() {
        let http = reqwest::Client::new();
        let factory = || Body::from("x");

        assert!(request_builder(&http, &Method::GET, url(), Some(&factory), &HeaderMap::new()).is_none());
        assert!(request_builder(&http, &Method::HEAD, url(), Some(&factory), &HeaderMap::new()).is_none());
        assert!(request_builder(&http, &Method::GET, url(), None, &HeaderMap::new()).is_some());
    }

    #[test]
    fn test_connect_and_trace_unsupported() {
        let http = reqwest::Client::new();

        assert!(request_builder(&http, &Method::CONNECT, url(), None, &HeaderMap::new()).is_none());
        assert!(request_builder(&http, &Method::TRACE, url(), None, &HeaderMap::new()).is_none());
    }

    #[test]
    fn test_builder_carries_headers_and_body() {
        let http = reqwest::Client::new();
        let factory = || Body::from("payload");
        let mut headers = HeaderMap::new();
        headers.insert("x-trace", HeaderValue::from_static("abc"));

        let request = request_builder(&http, &Method::PUT, url(), Some(&factory), &headers)
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(request.method(), Method::PUT);
        assert_eq!(request.headers().get("x-trace").unwrap(), "abc");
        assert_eq!(
            request.body().and_then(|b| b.as_bytes()),
            Some("payload".as_bytes())
        );
    }

    #[test]
    fn test_parse_url_rejects_relative() {
        assert!(matches!(parse_url("/relative"), Err(CasError::InvalidUrl(_))));
    }
}
