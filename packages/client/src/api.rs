//! HTTP API client for the Roundtable server.

use reqwest::{Response, StatusCode};
use serde_json::json;

use roundtable_server::infrastructure::dto::http::{
    AddAgentRequest, CreatedDto, ErrorDto, RoomDetailDto, RoomSummaryDto, TypingSpeedDto,
};

use crate::error::ClientError;

/// Thin wrapper over `reqwest::Client` bound to one server
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    /// `base_url` is the server root, e.g. `http://127.0.0.1:8080`
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// WebSocket URL watching `room_id`
    pub fn watch_url(&self, room_id: &str) -> String {
        let ws_base = if let Some(rest) = self.base_url.strip_prefix("https://") {
            format!("wss://{}", rest)
        } else if let Some(rest) = self.base_url.strip_prefix("http://") {
            format!("ws://{}", rest)
        } else {
            self.base_url.clone()
        };
        format!("{}/ws?room_id={}", ws_base, room_id)
    }

    pub async fn list_rooms(&self) -> Result<Vec<RoomSummaryDto>, ClientError> {
        let response = self.http.get(self.url("/api/rooms")).send().await?;
        Ok(check(response).await?.json().await?)
    }

    pub async fn get_room(&self, room_id: &str) -> Result<RoomDetailDto, ClientError> {
        let response = self
            .http
            .get(self.url(&format!("/api/rooms/{}", room_id)))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ClientError::RoomNotFound(room_id.to_string()));
        }
        Ok(check(response).await?.json().await?)
    }

    pub async fn start_simulation(&self, room_id: &str) -> Result<(), ClientError> {
        self.post_simulation(room_id, "start").await
    }

    pub async fn pause_simulation(&self, room_id: &str) -> Result<(), ClientError> {
        self.post_simulation(room_id, "pause").await
    }

    async fn post_simulation(&self, room_id: &str, action: &str) -> Result<(), ClientError> {
        let response = self
            .http
            .post(self.url(&format!("/api/rooms/{}/simulation/{}", room_id, action)))
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    /// Returns the id of the new agent
    pub async fn add_agent(&self, room_id: &str, agent_type: &str) -> Result<String, ClientError> {
        let response = self
            .http
            .post(self.url(&format!("/api/rooms/{}/agents", room_id)))
            .json(&AddAgentRequest {
                agent_type: agent_type.to_string(),
            })
            .send()
            .await?;
        let created: CreatedDto = check(response).await?.json().await?;
        Ok(created.id)
    }

    pub async fn remove_agent(&self, room_id: &str, agent_id: &str) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(self.url(&format!("/api/rooms/{}/agents/{}", room_id, agent_id)))
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    pub async fn typing_speed(&self) -> Result<u32, ClientError> {
        let response = self
            .http
            .get(self.url("/api/simulation/typing-speed"))
            .send()
            .await?;
        let speed: TypingSpeedDto = check(response).await?.json().await?;
        Ok(speed.chars_per_second)
    }

    pub async fn set_typing_speed(&self, chars_per_second: u32) -> Result<u32, ClientError> {
        let response = self
            .http
            .put(self.url("/api/simulation/typing-speed"))
            .json(&json!({ "charsPerSecond": chars_per_second }))
            .send()
            .await?;
        let speed: TypingSpeedDto = check(response).await?.json().await?;
        Ok(speed.chars_per_second)
    }
}

/// Turn a non-2xx response into `ClientError::Api` carrying the server's message
async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = match response.json::<ErrorDto>().await {
        Ok(body) => body.error,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
    };
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_url_uses_ws_scheme() {
        // テスト項目: http / https のベース URL から ws / wss の URL が組み立てられる
        // given (前提条件):
        let plain = ApiClient::new("http://127.0.0.1:8080/");
        let tls = ApiClient::new("https://example.com");

        // when (操作):
        let plain_url = plain.watch_url("room-1");
        let tls_url = tls.watch_url("room-1");

        // then (期待する結果):
        assert_eq!(plain_url, "ws://127.0.0.1:8080/ws?room_id=room-1");
        assert_eq!(tls_url, "wss://example.com/ws?room_id=room-1");
        assert_eq!(plain.base_url(), "http://127.0.0.1:8080");
    }
}
