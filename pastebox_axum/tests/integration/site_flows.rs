use http::{StatusCode, header};

use crate::common::{MockBrowser, TestUser, TestUsers, body_text, test_app};

/// End-to-end site flows
///
/// Each test walks the router the way a browser would: fetch a page, pick
/// up the session cookie and CSRF token, submit forms, follow the
/// redirects by hand and assert on what the next page shows.
fn location(response: &axum::response::Response) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .expect("redirect should have a Location header")
        .to_str()
        .expect("Location should be ASCII")
        .to_string()
}

async fn sign_up(browser: &mut MockBrowser, user: &TestUser) {
    let token = browser.csrf_token("/user/signup").await;
    let mut fields = user.signup_fields().to_vec();
    fields.push(("csrf_token", token.as_str()));

    let response = browser.post_form("/user/signup", &fields).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/user/login");
}

async fn sign_up_and_log_in(browser: &mut MockBrowser, user: &TestUser) {
    sign_up(browser, user).await;

    let token = browser.csrf_token("/user/login").await;
    let mut fields = user.login_fields().to_vec();
    fields.push(("csrf_token", token.as_str()));

    let response = browser.post_form("/user/login", &fields).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/snippet/create");
}

#[tokio::test]
async fn test_signup_redirects_to_login_and_flashes_once() {
    let (app, _state) = test_app().await;
    let mut browser = MockBrowser::new(app);

    sign_up(&mut browser, &TestUsers::alice()).await;

    // The login page shows the confirmation exactly once
    let body = body_text(browser.get("/user/login").await).await;
    assert!(body.contains("user successfully created, please sign in"));

    let body = body_text(browser.get("/user/login").await).await;
    assert!(!body.contains("user successfully created, please sign in"));
}

#[tokio::test]
async fn test_signup_validation_failures_rerender_the_form() {
    let (app, _state) = test_app().await;
    let mut browser = MockBrowser::new(app);
    let token = browser.csrf_token("/user/signup").await;

    let response = browser
        .post_form(
            "/user/signup",
            &[
                ("name", ""),
                ("email", "not-an-email"),
                ("password", "short"),
                ("csrf_token", token.as_str()),
            ],
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_text(response).await;
    assert!(body.contains("this field cannot be empty"));
    assert!(body.contains("invalid email"));
    assert!(body.contains("password must be at least 8 characters long"));
    // The submitted email is kept so the visitor can correct it
    assert!(body.contains(r#"value="not-an-email""#));
}

#[tokio::test]
async fn test_duplicate_signup_is_rejected() {
    let (app, _state) = test_app().await;
    let alice = TestUsers::alice();
    let mut browser = MockBrowser::new(app.clone());
    sign_up(&mut browser, &alice).await;

    // A second signup under the same email re-renders with the error
    let token = browser.csrf_token("/user/signup").await;
    let mut fields = alice.signup_fields().to_vec();
    fields.push(("csrf_token", token.as_str()));
    let response = browser.post_form("/user/signup", &fields).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_text(response).await;
    assert!(body.contains("email already in use"));

    // The original account is intact and can still sign in
    let mut second = MockBrowser::new(app);
    let token = second.csrf_token("/user/login").await;
    let mut fields = alice.login_fields().to_vec();
    fields.push(("csrf_token", token.as_str()));
    let response = second.post_form("/user/login", &fields).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let (app, _state) = test_app().await;
    let alice = TestUsers::alice();
    let mut browser = MockBrowser::new(app);
    sign_up(&mut browser, &alice).await;

    // Wrong password
    let token = browser.csrf_token("/user/login").await;
    let response = browser
        .post_form(
            "/user/login",
            &[
                ("email", alice.email.as_str()),
                ("password", "wrong-password"),
                ("csrf_token", token.as_str()),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_text(response).await;
    assert!(body.contains("Email or password is incorrect"));

    // Unknown email answers identically
    let token = browser.csrf_token("/user/login").await;
    let response = browser
        .post_form(
            "/user/login",
            &[
                ("email", "nobody@example.com"),
                ("password", alice.password.as_str()),
                ("csrf_token", token.as_str()),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_text(response).await;
    assert!(body.contains("Email or password is incorrect"));

    // Either way the visitor is still anonymous
    let response = browser.get("/snippet/create").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/user/login");
}

#[tokio::test]
async fn test_login_rotates_the_session_and_kills_the_old_token() {
    let (app, _state) = test_app().await;
    let alice = TestUsers::alice();
    let mut browser = MockBrowser::new(app.clone());
    sign_up(&mut browser, &alice).await;

    let anonymous_cookie = browser.cookie().expect("signup should have set a cookie");

    // Step 1: logging in swaps the session token
    let token = browser.csrf_token("/user/login").await;
    let mut fields = alice.login_fields().to_vec();
    fields.push(("csrf_token", token.as_str()));
    let response = browser.post_form("/user/login", &fields).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let signed_in_cookie = browser.cookie().expect("login should have set a cookie");
    assert_ne!(signed_in_cookie, anonymous_cookie);

    // Step 2: the new cookie opens the protected page, marked uncacheable
    let response = browser.get("/snippet/create").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CACHE_CONTROL)
            .expect("protected page should set Cache-Control"),
        "no-store"
    );

    // Step 3: the pre-login cookie is dead, not merely anonymous
    let mut replayer = MockBrowser::new(app);
    replayer.set_cookie(Some(anonymous_cookie));
    let response = replayer.get("/snippet/create").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/user/login");
}

#[tokio::test]
async fn test_snippet_create_requires_login() {
    let (app, _state) = test_app().await;
    let mut browser = MockBrowser::new(app);

    let response = browser.get("/snippet/create").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/user/login");

    // POST routes behind the gate redirect too, once the CSRF check passes
    let token = browser.csrf_token("/user/login").await;
    let response = browser
        .post_form("/user/logout", &[("csrf_token", token.as_str())])
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/user/login");
}

#[tokio::test]
async fn test_create_snippet_full_flow() {
    let (app, _state) = test_app().await;
    let mut browser = MockBrowser::new(app);
    sign_up_and_log_in(&mut browser, &TestUsers::alice()).await;

    // Step 1: the create form defaults to the one-year lifetime
    let response = browser.get("/snippet/create").await;
    assert_eq!(response.status(), StatusCode::OK);
    let token = browser.csrf_token("/snippet/create").await;
    let body = body_text(response).await;
    assert!(body.contains(r#"value="365" checked"#));

    // Step 2: publishing redirects to the new snippet
    let response = browser
        .post_form(
            "/snippet/create",
            &[
                ("title", "An old silent pond"),
                ("content", "A frog jumps into the pond."),
                ("expires", "7"),
                ("csrf_token", token.as_str()),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let view_path = location(&response);
    assert!(view_path.starts_with("/snippet/view/"));

    // Step 3: the view page shows the snippet and the flash, once
    let response = browser.get(&view_path).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("An old silent pond"));
    assert!(body.contains("A frog jumps into the pond."));
    assert!(body.contains("Snippet successfully created"));

    let body = body_text(browser.get(&view_path).await).await;
    assert!(body.contains("An old silent pond"));
    assert!(!body.contains("Snippet successfully created"));
}

#[tokio::test]
async fn test_create_rejects_invalid_submissions() {
    let (app, _state) = test_app().await;
    let mut browser = MockBrowser::new(app);
    sign_up_and_log_in(&mut browser, &TestUsers::alice()).await;
    let token = browser.csrf_token("/snippet/create").await;

    // An expiry not on the menu
    let response = browser
        .post_form(
            "/snippet/create",
            &[
                ("title", "t"),
                ("content", "c"),
                ("expires", "3"),
                ("csrf_token", token.as_str()),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_text(response).await;
    assert!(body.contains("This field must be one of 1, 7, 365"));

    // A blank title
    let response = browser
        .post_form(
            "/snippet/create",
            &[
                ("title", "   "),
                ("content", "c"),
                ("expires", "7"),
                ("csrf_token", token.as_str()),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_text(response).await;
    assert!(body.contains("This field cannot be blank"));

    // A title over a hundred characters
    let long = "x".repeat(101);
    let response = browser
        .post_form(
            "/snippet/create",
            &[
                ("title", long.as_str()),
                ("content", "c"),
                ("expires", "7"),
                ("csrf_token", token.as_str()),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_text(response).await;
    assert!(body.contains("This field cannot be more than 100 characters long"));
}

#[tokio::test]
async fn test_create_without_csrf_token_is_forbidden() {
    let (app, _state) = test_app().await;
    let mut browser = MockBrowser::new(app);
    sign_up_and_log_in(&mut browser, &TestUsers::alice()).await;

    // No token at all
    let response = browser
        .post_form(
            "/snippet/create",
            &[("title", "t"), ("content", "c"), ("expires", "7")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // A token from some other session
    let response = browser
        .post_form(
            "/snippet/create",
            &[
                ("title", "t"),
                ("content", "c"),
                ("expires", "7"),
                ("csrf_token", "0000000000000000000000000000000000000000000"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_post_without_a_session_is_forbidden() {
    let (app, _state) = test_app().await;
    let mut browser = MockBrowser::new(app);
    let alice = TestUsers::alice();

    // First contact is a POST, so no cookie and no token to echo
    let response = browser
        .post_form("/user/signup", &alice.signup_fields())
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_logout_clears_authentication() {
    let (app, _state) = test_app().await;
    let mut browser = MockBrowser::new(app);
    sign_up_and_log_in(&mut browser, &TestUsers::alice()).await;

    let token = browser.csrf_token("/").await;
    let response = browser
        .post_form("/user/logout", &[("csrf_token", token.as_str())])
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    // The home page confirms it, and the gate is closed again
    let body = body_text(browser.get("/").await).await;
    assert!(body.contains("been logged out successfully"));

    let response = browser.get("/snippet/create").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/user/login");
}

#[tokio::test]
async fn test_view_rejects_missing_and_malformed_ids() {
    let (app, _state) = test_app().await;
    let mut browser = MockBrowser::new(app);

    for path in [
        "/snippet/view/999",
        "/snippet/view/abc",
        "/snippet/view/0",
        "/snippet/view/-1",
    ] {
        let response = browser.get(path).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "GET {path}");
    }
}

#[tokio::test]
async fn test_expired_snippets_vanish_from_the_site() {
    let (app, state) = test_app().await;
    let mut browser = MockBrowser::new(app);

    let id = state
        .snippets
        .insert("Ephemeral", "Gone already", -1)
        .await
        .expect("Failed to seed snippet");

    let response = browser.get(&format!("/snippet/view/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_text(browser.get("/").await).await;
    assert!(!body.contains("Ephemeral"));
}

#[tokio::test]
async fn test_home_lists_snippets_newest_first() {
    let (app, state) = test_app().await;
    let mut browser = MockBrowser::new(app);

    // Empty at first
    let body = body_text(browser.get("/").await).await;
    assert!(body.contains("nothing to see here"));

    state
        .snippets
        .insert("First snippet", "one", 7)
        .await
        .expect("Failed to seed snippet");
    state
        .snippets
        .insert("Second snippet", "two", 7)
        .await
        .expect("Failed to seed snippet");

    let body = body_text(browser.get("/").await).await;
    let newest = body.find("Second snippet").expect("newest title missing");
    let older = body.find("First snippet").expect("older title missing");
    assert!(newest < older);
}

#[tokio::test]
async fn test_concurrent_duplicate_signups_yield_one_success() {
    let (app, _state) = test_app().await;
    let alice = TestUsers::alice();

    // Two browsers each mint their own session and token first
    let mut first = MockBrowser::new(app.clone());
    let first_token = first.csrf_token("/user/signup").await;
    let mut first_fields = alice.signup_fields().to_vec();
    first_fields.push(("csrf_token", first_token.as_str()));

    let mut second = MockBrowser::new(app.clone());
    let second_token = second.csrf_token("/user/signup").await;
    let mut second_fields = alice.signup_fields().to_vec();
    second_fields.push(("csrf_token", second_token.as_str()));

    // Both submit the same email at once
    let (first_response, second_response) = tokio::join!(
        first.post_form("/user/signup", &first_fields),
        second.post_form("/user/signup", &second_fields),
    );

    // Exactly one wins; the unique index decides, not the handlers
    let mut statuses = [first_response.status(), second_response.status()];
    statuses.sort_unstable();
    assert_eq!(statuses, [StatusCode::SEE_OTHER, StatusCode::BAD_REQUEST]);

    let loser = if first_response.status() == StatusCode::BAD_REQUEST {
        first_response
    } else {
        second_response
    };
    let body = body_text(loser).await;
    assert!(body.contains("email already in use"));

    // The surviving account signs in fine
    let mut third = MockBrowser::new(app);
    let token = third.csrf_token("/user/login").await;
    let mut fields = alice.login_fields().to_vec();
    fields.push(("csrf_token", token.as_str()));
    let response = third.post_form("/user/login", &fields).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_ping_stays_outside_the_session_chain() {
    let (app, _state) = test_app().await;
    let mut browser = MockBrowser::new(app);

    let response = browser.get("/ping").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    // The outer layers still apply
    assert_eq!(
        response.headers().get(header::SERVER).expect("Server header missing"),
        "pastebox"
    );
    assert_eq!(
        response
            .headers()
            .get(header::X_FRAME_OPTIONS)
            .expect("X-Frame-Options missing"),
        "deny"
    );

    let body = body_text(response).await;
    assert_eq!(body, "OK");
}
