use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A successful refresh-token response.
pub fn token_response(token: &str, expires_in: i64) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "access_token": token,
        "token_type": "bearer",
        "expires_in": expires_in,
    }))
}

/// Serve `token` from the token endpoint for every exchange.
#[allow(dead_code)]
pub async fn mount_token(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .respond_with(token_response(token, 14400))
        .mount(server)
        .await;
}

/// A file entry as `list_folder` returns it.
#[allow(dead_code)]
pub fn file_entry(name: &str) -> serde_json::Value {
    json!({
        ".tag": "file",
        "id": format!("id:{name}"),
        "name": name,
        "path_display": format!("/Shoot/{name}"),
        "path_lower": format!("/shoot/{}", name.to_lowercase()),
        "server_modified": "2024-03-01T12:30:00Z",
        "client_modified": "2024-03-01T12:00:00Z",
        "size": 2048,
        "is_downloadable": true,
    })
}
