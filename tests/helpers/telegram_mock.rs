//! Mock Telegram API Server for testing
//!
//! This module provides a mock HTTP server that simulates the Telegram Bot API
//! for testing purposes. It uses wiremock to create configurable mock responses.

use std::time::Duration;

use serde_json::{json, Value};
use teloxide::Bot;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

pub const TEST_TOKEN: &str = "12345:test_token";

/// Mock Telegram API server for testing
pub struct TelegramMockServer {
    pub server: MockServer,
}

impl TelegramMockServer {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Bot whose requests all go to this server
    pub fn bot(&self) -> Bot {
        let url = reqwest::Url::parse(&self.server.uri()).expect("mock server uri");
        Bot::new(TEST_TOKEN).set_api_url(url)
    }

    /// teloxide sends Bot API method names in PascalCase (e.g. `SendMessage`)
    fn endpoint(api_method: &str) -> String {
        let mut chars = api_method.chars();
        let method_name: String = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };
        format!("/bot{TEST_TOKEN}/{method_name}")
    }

    async fn mount(&self, api_method: &str, response: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path(Self::endpoint(api_method)))
            .respond_with(response)
            .mount(&self.server)
            .await;
    }

    /// getChatAdministrators answering with the given chat owner
    pub async fn mock_chat_administrators(&self, owner_id: i64, delay: Option<Duration>) {
        let body = json!({
            "ok": true,
            "result": [{
                "status": "creator",
                "is_anonymous": false,
                "user": {
                    "id": owner_id,
                    "is_bot": false,
                    "first_name": "Owner"
                }
            }]
        });
        let mut response = ResponseTemplate::new(200).set_body_json(body);
        if let Some(delay) = delay {
            response = response.set_delay(delay);
        }
        self.mount("getChatAdministrators", response).await;
    }

    /// sendMessage answering with a message carrying `message_id`
    pub async fn mock_send_message(&self, chat_id: i64, message_id: i64) {
        let body = json!({
            "ok": true,
            "result": {
                "message_id": message_id,
                "from": {
                    "id": 12345,
                    "is_bot": true,
                    "first_name": "ReportBot",
                    "username": "report_bot"
                },
                "chat": {
                    "id": chat_id,
                    "title": "Test Group",
                    "type": "supergroup"
                },
                "date": 1640995200,
                "text": "Test message"
            }
        });
        self.mount("sendMessage", ResponseTemplate::new(200).set_body_json(body))
            .await;
    }

    /// Methods answering with a plain `true`
    pub async fn mock_ok(&self, api_method: &str) {
        let body = json!({ "ok": true, "result": true });
        self.mount(api_method, ResponseTemplate::new(200).set_body_json(body))
            .await;
    }

    /// `api_method` failing with a Bot API error
    pub async fn mock_api_error(&self, api_method: &str, description: &str) {
        let body: Value = json!({
            "ok": false,
            "error_code": 400,
            "description": description
        });
        self.mount(api_method, ResponseTemplate::new(400).set_body_json(body))
            .await;
    }

    /// Bodies of every request received for `api_method`
    pub async fn requests_for(&self, api_method: &str) -> Vec<Value> {
        let endpoint = Self::endpoint(api_method);
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|request| request.url.path() == endpoint)
            .filter_map(|request| serde_json::from_slice(&request.body).ok())
            .collect()
    }
}
