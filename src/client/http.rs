//! HTTP client for API requests

use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::ExchangeConfig;
use crate::errors::{CcxtError, CcxtResult};
use crate::types::SignedRequest;

/// HTTP 클라이언트
///
/// 서명이 끝난 [`SignedRequest`]를 그대로 전송하고 상태 코드와 본문을 돌려준다.
/// 상태 코드 해석은 거래소 쪽 `handle_errors`가 맡는다.
pub struct HttpClient {
    client: Client,
    base_url: String,
}

/// 원시 HTTP 응답
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub url: String,
    pub body: String,
}

impl HttpClient {
    /// 새로운 HTTP 클라이언트 생성
    ///
    /// `config.url_override()`가 있으면 `base_url` 대신 사용한다.
    pub fn new(base_url: impl Into<String>, config: &ExchangeConfig) -> CcxtResult<Self> {
        let base_url = match config.url_override() {
            Some(url) => url.to_string(),
            None => base_url.into(),
        };
        let mut builder = Client::builder();
        if config.timeout_ms() > 0 {
            builder = builder.timeout(Duration::from_millis(config.timeout_ms()));
        }
        let client = builder.build().map_err(|e| CcxtError::NetworkError {
            url: base_url.clone(),
            message: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    /// API 루트 URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 서명된 요청 전송
    pub async fn execute(&self, request: &SignedRequest) -> CcxtResult<HttpResponse> {
        let method = Method::from_bytes(request.method.as_bytes()).map_err(|_| {
            CcxtError::BadRequest {
                message: format!("unsupported HTTP method {}", request.method),
            }
        })?;

        tracing::debug!(method = %request.method, url = %request.url, "sending request");

        let mut builder = self.client.request(method, &request.url);
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        tracing::debug!(status, url = %request.url, "received response");

        Ok(HttpResponse {
            status,
            url: request.url.clone(),
            body,
        })
    }
}

impl HttpResponse {
    /// 2xx 여부
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 본문을 JSON으로 파싱
    pub fn json<T: DeserializeOwned>(&self) -> CcxtResult<T> {
        serde_json::from_str(&self.body).map_err(|e| CcxtError::ParseError {
            data_type: std::any::type_name::<T>().to_string(),
            message: e.to_string(),
        })
    }

    /// CCXT 공통 HTTP 상태 코드 매핑
    ///
    /// 거래소별 매핑이 먼저 적용되고, 남은 실패 응답만 여기로 온다.
    pub fn error_for_status(&self) -> CcxtResult<()> {
        if self.is_success() {
            return Ok(());
        }
        let message = format!("HTTP {} {}: {}", self.status, self.url, self.body);
        Err(match self.status {
            401 | 407 | 511 => CcxtError::AuthenticationError { message },
            418 => CcxtError::DDoSProtection { message },
            429 => CcxtError::RateLimitExceeded { message },
            408 | 504 => CcxtError::RequestTimeout {
                url: self.url.clone(),
            },
            400 | 403 | 404 | 405 | 409 | 410 | 451 | 500..=503 | 520..=522 | 525 | 526
            | 530 => CcxtError::ExchangeNotAvailable { message },
            _ => CcxtError::ExchangeError { message },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16) -> HttpResponse {
        HttpResponse {
            status,
            url: "https://api.bishino.com/ticker".into(),
            body: "{}".into(),
        }
    }

    #[test]
    fn test_success_passes() {
        assert!(response(200).error_for_status().is_ok());
        assert!(response(204).is_success());
    }

    #[test]
    fn test_status_table() {
        assert!(matches!(
            response(429).error_for_status(),
            Err(CcxtError::RateLimitExceeded { .. })
        ));
        assert!(matches!(
            response(418).error_for_status(),
            Err(CcxtError::DDoSProtection { .. })
        ));
        assert!(matches!(
            response(504).error_for_status(),
            Err(CcxtError::RequestTimeout { .. })
        ));
        assert!(matches!(
            response(503).error_for_status(),
            Err(CcxtError::ExchangeNotAvailable { .. })
        ));
        assert!(matches!(
            response(511).error_for_status(),
            Err(CcxtError::AuthenticationError { .. })
        ));
        assert!(matches!(
            response(422).error_for_status(),
            Err(CcxtError::ExchangeError { .. })
        ));
    }

    #[test]
    fn test_json_parse_error_names_type() {
        let resp = HttpResponse {
            status: 200,
            url: String::new(),
            body: "not json".into(),
        };
        let err = resp.json::<serde_json::Value>().unwrap_err();
        assert_eq!(err.code(), "PARSE_ERROR");
    }

    #[test]
    fn test_url_override_wins() {
        let config = ExchangeConfig::new().with_url_override("http://localhost:1234");
        let client = HttpClient::new("https://api.bishino.com", &config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:1234");
    }
}
