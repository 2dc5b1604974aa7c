use std::sync::Mutex;

use reqwest::header::AUTHORIZATION;
use reqwest::{Body, Method, Request, Url};
use uwa_client::providers::{FixedClock, FixedNonce};
use uwa_client::services::authorize_request;
use uwa_client::{AuthorizationProvider, Credentials, Result, UwaAuth};

#[derive(Default)]
struct RecordingProvider {
    calls: Mutex<Vec<(String, String, Vec<u8>)>>,
}

impl AuthorizationProvider for RecordingProvider {
    fn authorization_header_for(&self, method: &str, url: &str, body: &[u8]) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((method.to_string(), url.to_string(), body.to_vec()));
        Ok("UWA key:sig:nonce:1".to_string())
    }
}

fn fixed_auth() -> UwaAuth {
    let credentials = Credentials::new("ABC", "c2VjcmV0").unwrap();
    UwaAuth::new(&credentials)
        .unwrap()
        .with_clock(FixedClock(1_000_000_000))
        .with_nonce_source(FixedNonce::new("n1"))
}

#[test]
fn test_authorize_request_passes_method_url_and_body() {
    let provider = RecordingProvider::default();
    let mut request = Request::new(Method::POST, Url::parse("https://api.urb-it.com/v2/order").unwrap());
    *request.body_mut() = Some(Body::from(br#"{"id":1}"#.to_vec()));

    authorize_request(&provider, &mut request).unwrap();

    let calls = provider.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "POST");
    assert_eq!(calls[0].1, "https://api.urb-it.com/v2/order");
    assert_eq!(calls[0].2, br#"{"id":1}"#.to_vec());
    assert_eq!(request.headers()[AUTHORIZATION], "UWA key:sig:nonce:1");
}

#[test]
fn test_authorize_request_without_body_signs_empty_digest() {
    let auth = fixed_auth();
    let mut request = Request::new(Method::GET, Url::parse("http://x/y").unwrap());

    authorize_request(&auth, &mut request).unwrap();

    assert_eq!(
        request.headers()[AUTHORIZATION],
        "UWA ABC:u2B6iJMJCCuB7vlmlFHHrimr2Wk3XhgJadpRR2YpCFw=:n1:1000000000"
    );
}

#[test]
fn test_authorize_request_replaces_existing_header() {
    let auth = fixed_auth();
    let mut request = Request::new(Method::GET, Url::parse("http://x/y").unwrap());
    request
        .headers_mut()
        .insert(AUTHORIZATION, "Bearer stale".parse().unwrap());

    authorize_request(&auth, &mut request).unwrap();

    assert_eq!(request.headers().get_all(AUTHORIZATION).iter().count(), 1);
    assert!(request.headers()[AUTHORIZATION].to_str().unwrap().starts_with("UWA ABC:"));
}

#[test]
fn test_authorize_request_signs_json_body_bytes() {
    let auth = fixed_auth();
    let body = br#"{"postal_code":"11356"}"#.to_vec();
    let mut request = Request::new(
        Method::POST,
        Url::parse("https://api.urb-it.com/v2/postalcode/validate").unwrap(),
    );
    *request.body_mut() = Some(Body::from(body));

    authorize_request(&auth, &mut request).unwrap();

    assert_eq!(
        request.headers()[AUTHORIZATION],
        "UWA ABC:e6S9mNnDPKSD/A6w4RSetf2fQFqoKY3D4DCB4uJ1m2Y=:n1:1000000000"
    );
}

#[test]
fn test_authorize_request_refreshes_previous_uwa_header() {
    let auth = fixed_auth();
    let mut request = Request::new(Method::GET, Url::parse("http://x/y").unwrap());
    request
        .headers_mut()
        .insert(AUTHORIZATION, "UWA ABC:old:n0:1".parse().unwrap());

    authorize_request(&auth, &mut request).unwrap();

    assert_eq!(request.headers().get_all(AUTHORIZATION).iter().count(), 1);
    assert_eq!(
        request.headers()[AUTHORIZATION],
        "UWA ABC:u2B6iJMJCCuB7vlmlFHHrimr2Wk3XhgJadpRR2YpCFw=:n1:1000000000"
    );
}
