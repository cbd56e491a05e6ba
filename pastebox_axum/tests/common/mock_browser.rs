use axum::{
    Router,
    body::{Body, to_bytes},
    response::Response,
};
use http::{Request, header};
use tower::ServiceExt;

/// Mock browser client for integration testing
///
/// Simulates a web browser against the in-process router by carrying the
/// session cookie from response to request. Redirects are never followed
/// automatically; tests assert on them.
pub struct MockBrowser {
    app: Router,
    /// The `name=value` pair from the last `Set-Cookie` seen, if any.
    cookie: Option<String>,
}

impl MockBrowser {
    pub fn new(app: Router) -> Self {
        Self { app, cookie: None }
    }

    /// Make a GET request to the specified path
    pub async fn get(&mut self, path: &str) -> Response {
        let request = self
            .request_builder(Request::get(path))
            .body(Body::empty())
            .expect("Failed to build request");
        self.send(request).await
    }

    /// Make a POST request with form data
    pub async fn post_form(&mut self, path: &str, form_data: &[(&str, &str)]) -> Response {
        let body = serde_urlencoded::to_string(form_data).expect("Failed to encode form");
        let request = self
            .request_builder(Request::post(path))
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .expect("Failed to build request");
        self.send(request).await
    }

    /// Fetch a page and return the CSRF token its response carries.
    pub async fn csrf_token(&mut self, path: &str) -> String {
        let response = self.get(path).await;
        response
            .headers()
            .get("X-CSRF-Token")
            .expect("page should carry a CSRF token")
            .to_str()
            .expect("CSRF token should be ASCII")
            .to_string()
    }

    /// The session cookie currently carried, if any.
    pub fn cookie(&self) -> Option<String> {
        self.cookie.clone()
    }

    /// Replace the carried cookie, e.g. to replay an old session token.
    pub fn set_cookie(&mut self, cookie: Option<String>) {
        self.cookie = cookie;
    }

    fn request_builder(&self, mut builder: http::request::Builder) -> http::request::Builder {
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie.clone());
        }
        builder
    }

    async fn send(&mut self, request: Request<Body>) -> Response {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to route request");

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie
                .to_str()
                .expect("Set-Cookie should be ASCII")
                .split(';')
                .next()
                .expect("Set-Cookie should have a name=value pair")
                .to_string();
            self.cookie = Some(pair);
        }

        response
    }
}

/// Collect a response body into a string.
pub async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    String::from_utf8(bytes.to_vec()).expect("Response body should be UTF-8")
}
