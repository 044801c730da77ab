use std::{
    env,
    net::{IpAddr, Ipv4Addr, SocketAddr},
};

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_SEND_API_URL: &str = "https://graph.facebook.com/v2.6/me/messages";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("PORT must be a port number, got '{0}'")]
    InvalidPort(String),
    #[error("BYLL_BIND_ADDR must be an IP address, got '{0}'")]
    InvalidBindAddr(String),
}

/// Runtime configuration, read from the environment.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Shared secret used to sign webhook deliveries.
    pub app_secret: String,
    /// Token echoed back during the subscription handshake.
    pub validation_token: String,
    pub page_access_token: String,
    pub bind_addr: SocketAddr,
    pub send_api_url: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let app_secret = required("MESSENGER_APP_SECRET")?;
        let validation_token = required("MESSENGER_VALIDATION_TOKEN")?;
        let page_access_token = required("MESSENGER_PAGE_ACCESS_TOKEN")?;

        let port = match lookup("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };
        let ip = match lookup("BYLL_BIND_ADDR") {
            Some(raw) => raw
                .parse::<IpAddr>()
                .map_err(|_| ConfigError::InvalidBindAddr(raw))?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };
        let send_api_url =
            lookup("MESSENGER_SEND_API_URL").unwrap_or_else(|| DEFAULT_SEND_API_URL.to_string());

        Ok(Self {
            app_secret,
            validation_token,
            page_access_token,
            bind_addr: SocketAddr::new(ip, port),
            send_api_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        let vars: HashMap<&str, &str> = vars.iter().copied().collect();
        move |key| vars.get(key).map(|value| value.to_string())
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("MESSENGER_APP_SECRET", "secret"),
        ("MESSENGER_VALIDATION_TOKEN", "verify-me"),
        ("MESSENGER_PAGE_ACCESS_TOKEN", "page-token"),
    ];

    #[test]
    fn defaults_apply_when_optional_vars_are_absent() {
        let config = AppConfig::from_lookup(lookup(&REQUIRED)).unwrap();

        assert_eq!(config.app_secret, "secret");
        assert_eq!(config.validation_token, "verify-me");
        assert_eq!(config.page_access_token, "page-token");
        assert_eq!(config.bind_addr, "0.0.0.0:5000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.send_api_url, DEFAULT_SEND_API_URL);
    }

    #[test]
    fn optional_vars_override_defaults() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            ("PORT", "8080"),
            ("BYLL_BIND_ADDR", "127.0.0.1"),
            ("MESSENGER_SEND_API_URL", "http://localhost:9000/send"),
        ]);

        let config = AppConfig::from_lookup(lookup(&vars)).unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.send_api_url, "http://localhost:9000/send");
    }

    #[rstest]
    #[case::secret("MESSENGER_APP_SECRET")]
    #[case::validation_token("MESSENGER_VALIDATION_TOKEN")]
    #[case::page_token("MESSENGER_PAGE_ACCESS_TOKEN")]
    fn missing_required_var_is_reported(#[case] key: &'static str) {
        let vars: Vec<(&str, &str)> = REQUIRED
            .iter()
            .copied()
            .filter(|(name, _)| *name != key)
            .collect();

        assert_eq!(
            AppConfig::from_lookup(lookup(&vars)).unwrap_err(),
            ConfigError::Missing(key)
        );
    }

    #[rstest]
    #[case::port(("PORT", "http"), ConfigError::InvalidPort("http".to_string()))]
    #[case::port_out_of_range(("PORT", "70000"), ConfigError::InvalidPort("70000".to_string()))]
    #[case::bind_addr(("BYLL_BIND_ADDR", "localhost"), ConfigError::InvalidBindAddr("localhost".to_string()))]
    fn malformed_values_are_rejected(
        #[case] var: (&'static str, &'static str),
        #[case] expected: ConfigError,
    ) {
        let mut vars = REQUIRED.to_vec();
        vars.push(var);

        assert_eq!(AppConfig::from_lookup(lookup(&vars)).unwrap_err(), expected);
    }
}
