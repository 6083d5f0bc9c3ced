//! Exchange Implementation Macros
//!
//! Provides macros to reduce boilerplate code in exchange implementations.
//!
//! # Available Macros
//!
//! - [`timeframe_map!`] - Create timeframe HashMap with minimal syntax
//! - [`feature_flags!`] - Create ExchangeFeatures with enabled features listed
//! - [`exchange_urls!`] - Create ExchangeUrls struct
//! - [`map_exchange_error!`] - Map exchange error codes to CcxtError
//! - [`require_credentials!`] - Fetch API key and secret or fail

/// Creates a HashMap<Timeframe, String> with minimal syntax.
///
/// # Example
///
/// ```ignore
/// let timeframes = timeframe_map! {
///     Minute1 => "1m",
///     Minute5 => "5m",
///     Hour1 => "1h",
///     Day1 => "1d",
/// };
/// ```
#[macro_export]
macro_rules! timeframe_map {
    ($($variant:ident => $value:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut map = std::collections::HashMap::new();
        $(
            map.insert($crate::types::Timeframe::$variant, $value.into());
        )*
        map
    }};
}

/// Creates ExchangeFeatures with only enabled features listed.
///
/// All unlisted features default to `false`.
///
/// # Example
///
/// ```ignore
/// let features = feature_flags! {
///     spot,
///     margin,
///     fetch_markets,
///     fetch_ticker,
///     create_order,
///     ws,
///     watch_ticker,
/// };
/// ```
#[macro_export]
macro_rules! feature_flags {
    ($($feature:ident),* $(,)?) => {{
        #[allow(clippy::needless_update)]
        $crate::types::ExchangeFeatures {
            $(
                $feature: true,
            )*
            ..Default::default()
        }
    }};
}

/// Creates ExchangeUrls struct with builder-like syntax.
///
/// # Example
///
/// ```ignore
/// let urls = exchange_urls! {
///     logo: "https://example.com/logo.png",
///     www: "https://www.example.com",
///     api: {
///         "public" => "https://api.example.com",
///         "private" => "https://api.example.com",
///     },
///     doc: [
///         "https://docs.example.com",
///     ],
///     fees: "https://example.com/fees",
/// };
/// ```
#[macro_export]
macro_rules! exchange_urls {
    (
        $(logo: $logo:expr,)?
        $(www: $www:expr,)?
        api: {
            $($api_key:expr => $api_value:expr),* $(,)?
        },
        doc: [$($doc:expr),* $(,)?],
        $(fees: $fees:expr,)?
    ) => {{
        let mut api = std::collections::HashMap::new();
        $(
            api.insert($api_key.into(), $api_value.into());
        )*
        $crate::types::ExchangeUrls {
            logo: None $(.or(Some($logo.into())))?,
            www: None $(.or(Some($www.into())))?,
            api,
            doc: vec![$($doc.into()),*],
            fees: None $(.or(Some($fees.into())))?,
        }
    }};
}

/// Macro for common exchange error mapping.
///
/// Maps exchange-specific error codes to CcxtError variants that carry a
/// `message` field. Unlisted codes yield `None`.
///
/// # Example
///
/// ```ignore
/// let err = map_exchange_error! {
///     code, msg, Bishino,
///     2021 | 2027 => InsufficientFunds,
///     2033 => OrderNotFound,
///     4003 => DDoSProtection,
/// };
/// ```
#[macro_export]
macro_rules! map_exchange_error {
    ($code:expr, $msg:expr, $exchange:ident, $($($c:literal)|+ => $variant:ident),* $(,)?) => {{
        let code = $code;
        let message = format!("[{}] {}: {}", stringify!($exchange), code, $msg);
        match code {
            $(
                $($c)|+ => Some($crate::errors::CcxtError::$variant { message }),
            )*
            _ => None,
        }
    }};
}

/// Helper macro to validate required credentials.
///
/// Returns AuthenticationError if credentials are missing.
///
/// # Example
///
/// ```ignore
/// let (api_key, secret) = require_credentials!(self.config)?;
/// ```
#[macro_export]
macro_rules! require_credentials {
    ($config:expr) => {{
        let api_key = $config
            .api_key()
            .ok_or_else(|| $crate::errors::CcxtError::AuthenticationError {
                message: "API key required".into(),
            })?;
        let secret = $config
            .secret()
            .ok_or_else(|| $crate::errors::CcxtError::AuthenticationError {
                message: "Secret required".into(),
            })?;
        Ok::<_, $crate::errors::CcxtError>((api_key, secret))
    }};
}

#[cfg(test)]
mod tests {
    use crate::client::ExchangeConfig;
    use crate::errors::{CcxtError, CcxtResult};
    use crate::types::{ExchangeFeatures, ExchangeUrls, Timeframe};
    use std::collections::HashMap;

    #[test]
    fn test_timeframe_map() {
        let timeframes: HashMap<Timeframe, String> = timeframe_map! {
            Minute1 => "1m",
            Minute5 => "5m",
            Hour1 => "1h",
            Day1 => "1d",
        };

        assert_eq!(timeframes.get(&Timeframe::Minute1), Some(&"1m".to_string()));
        assert_eq!(timeframes.get(&Timeframe::Hour1), Some(&"1h".to_string()));
        assert_eq!(timeframes.len(), 4);
    }

    #[test]
    fn test_feature_flags() {
        let features: ExchangeFeatures = feature_flags! {
            spot,
            fetch_markets,
            fetch_ticker,
            create_order,
            fetch_funding_fees,
        };

        assert!(features.spot);
        assert!(features.fetch_markets);
        assert!(features.fetch_ticker);
        assert!(features.create_order);
        assert!(features.fetch_funding_fees);
        // Unlisted features should be false
        assert!(!features.margin);
        assert!(!features.swap);
        assert!(!features.ws);
    }

    #[test]
    fn test_exchange_urls() {
        let urls: ExchangeUrls = exchange_urls! {
            logo: "https://example.com/logo.png",
            www: "https://www.example.com",
            api: {
                "public" => "https://api.example.com",
                "private" => "https://api.example.com",
            },
            doc: [
                "https://docs.example.com",
                "https://docs.example.com/v2",
            ],
            fees: "https://example.com/fees",
        };

        assert_eq!(urls.logo, Some("https://example.com/logo.png".to_string()));
        assert_eq!(urls.www, Some("https://www.example.com".to_string()));
        assert_eq!(urls.doc.len(), 2);
        assert_eq!(urls.fees, Some("https://example.com/fees".to_string()));
    }

    #[test]
    fn test_map_exchange_error() {
        let err = map_exchange_error! {
            2027i64, "not enough balance", Bishino,
            2021 | 2027 => InsufficientFunds,
            2033 => OrderNotFound,
        };
        assert!(matches!(err, Some(CcxtError::InsufficientFunds { .. })));
        assert!(err.unwrap().to_string().contains("[Bishino] 2027"));

        let unknown = map_exchange_error! {
            9999i64, "", Bishino,
            2033 => OrderNotFound,
        };
        assert!(unknown.is_none());
    }

    #[test]
    fn test_require_credentials() {
        fn check(config: &ExchangeConfig) -> CcxtResult<(String, String)> {
            let (key, secret) = require_credentials!(config)?;
            Ok((key.to_string(), secret.to_string()))
        }

        let missing = ExchangeConfig::new().with_api_key("key");
        assert!(matches!(
            check(&missing),
            Err(CcxtError::AuthenticationError { .. })
        ));

        let full = ExchangeConfig::new().with_credentials("key", "secret");
        assert_eq!(check(&full).unwrap(), ("key".into(), "secret".into()));
    }
}
