use super::*;

fn test_client(origin: &str) -> ApiClient {
    ApiClient::new(origin, None, "preisradio-test").expect("client construction should not fail")
}

#[test]
fn base_url_appends_api_segment() {
    let client = test_client("https://api.preisradio.de/");
    let url = client.build_url("products/", &[]).unwrap();
    assert_eq!(url.as_str(), "https://api.preisradio.de/api/products/");
    assert_eq!(client.origin().as_str(), "https://api.preisradio.de/");
}

#[test]
fn build_url_appends_query_pairs() {
    let client = test_client("https://api.preisradio.de");
    let url = client
        .build_url(
            "products/",
            &[("search", "tv & audio".to_string()), ("page", "2".to_string())],
        )
        .unwrap();
    assert_eq!(
        url.as_str(),
        "https://api.preisradio.de/api/products/?search=tv+%26+audio&page=2"
    );
}

#[test]
fn build_url_without_pairs_has_no_question_mark() {
    let client = test_client("http://localhost:8000");
    let url = client.build_url("retailers/", &[]).unwrap();
    assert!(url.query().is_none());
}

#[test]
fn encode_segment_escapes_separators() {
    assert_eq!(encode_segment("abc-123"), "abc-123");
    assert_eq!(encode_segment("a/b?c"), "a%2Fb%3Fc");
    assert_eq!(encode_segment("x y#z"), "x%20y%23z");
}

#[test]
fn invalid_origin_is_rejected() {
    let result = ApiClient::new("not a url", None, "ua");
    assert!(matches!(result, Err(ClientError::InvalidUrl { .. })));
}

#[test]
fn error_status_accessor() {
    let err = ClientError::UnexpectedStatus {
        status: 502,
        url: "x".to_string(),
    };
    assert_eq!(err.status(), Some(502));
    assert!(ClientError::NotFound { url: "x".into() }.is_not_found());
}
