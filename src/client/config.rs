//! Exchange configuration

/// 거래소 설정
#[derive(Debug, Clone, Default)]
pub struct ExchangeConfig {
    api_key: Option<String>,
    api_secret: Option<String>,
    timeout_ms: u64,
    rate_limit_ms: u64,
    url_override: Option<String>,
}

impl ExchangeConfig {
    /// 새로운 빈 설정 생성
    pub fn new() -> Self {
        Self {
            api_key: None,
            api_secret: None,
            timeout_ms: 30000,
            rate_limit_ms: 500,
            url_override: None,
        }
    }

    /// API 키 설정
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// API 시크릿 설정
    pub fn with_api_secret(mut self, secret: impl Into<String>) -> Self {
        self.api_secret = Some(secret.into());
        self
    }

    /// 타임아웃 설정 (밀리초)
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// 레이트 리밋 설정 (밀리초)
    pub fn with_rate_limit_ms(mut self, rate_limit_ms: u64) -> Self {
        self.rate_limit_ms = rate_limit_ms;
        self
    }

    /// API 루트 URL 교체 (mock 서버, 프록시 등)
    pub fn with_url_override(mut self, url: impl Into<String>) -> Self {
        self.url_override = Some(url.into().trim_end_matches('/').to_string());
        self
    }

    /// 인증 정보로 설정
    pub fn with_credentials(
        mut self,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        self.api_key = Some(api_key.into());
        self.api_secret = Some(api_secret.into());
        self
    }

    // === Getters ===

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn api_secret(&self) -> Option<&str> {
        self.api_secret.as_deref()
    }

    /// secret 별칭 (CCXT 호환)
    pub fn secret(&self) -> Option<&str> {
        self.api_secret.as_deref()
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    pub fn rate_limit_ms(&self) -> u64 {
        self.rate_limit_ms
    }

    pub fn url_override(&self) -> Option<&str> {
        self.url_override.as_deref()
    }

    /// 인증 정보 유효성 확인
    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some() && self.api_secret.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ExchangeConfig::new()
            .with_api_key("test_key")
            .with_api_secret("test_secret")
            .with_timeout(5000);

        assert_eq!(config.api_key(), Some("test_key"));
        assert_eq!(config.secret(), Some("test_secret"));
        assert_eq!(config.timeout_ms(), 5000);
        assert!(config.has_credentials());
    }

    #[test]
    fn test_config_default() {
        let config = ExchangeConfig::default();
        assert!(config.api_key().is_none());
        assert!(!config.has_credentials());
        assert!(config.url_override().is_none());
    }

    #[test]
    fn test_url_override_strips_trailing_slash() {
        let config = ExchangeConfig::new().with_url_override("http://127.0.0.1:8080/");
        assert_eq!(config.url_override(), Some("http://127.0.0.1:8080"));
        assert_eq!(config.rate_limit_ms(), 500);
    }
}
