use std::env;

pub const DEFAULT_ROUTER_ENDPOINT: &str =
    "https://router.huggingface.co/together/v1/images/generations";
pub const DEFAULT_IMAGE_MODEL: &str = "black-forest-labs/FLUX.1-schnell";

#[derive(Debug, Clone)]
pub struct RouterConfig {
    pub endpoint: String,
    pub model: String,
    pub api_token: String,
}

impl Default for RouterConfig {
    fn default() -> Self {
        RouterConfig {
            endpoint: DEFAULT_ROUTER_ENDPOINT.to_string(),
            model: DEFAULT_IMAGE_MODEL.to_string(),
            api_token: String::new(),
        }
    }
}

impl RouterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    // Missing HF_TOKEN is deliberately not an error here; it surfaces as an
    // authentication failure on the first outbound call.
    pub fn from_env() -> Self {
        let api_token = env::var("HF_TOKEN").unwrap_or_default();
        let endpoint =
            env::var("HF_ROUTER_URL").unwrap_or_else(|_| DEFAULT_ROUTER_ENDPOINT.to_string());
        let model = env::var("HF_IMAGE_MODEL").unwrap_or_else(|_| DEFAULT_IMAGE_MODEL.to_string());

        RouterConfig {
            endpoint,
            model,
            api_token,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = token.into();
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn has_token(&self) -> bool {
        !self.api_token.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub router: RouterConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            router: RouterConfig::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|port| port.parse().ok())
            .unwrap_or(8080);

        Config {
            host,
            port,
            router: RouterConfig::from_env(),
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_router(mut self, router: RouterConfig) -> Self {
        self.router = router;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_the_router() {
        let config = RouterConfig::new();
        assert_eq!(config.endpoint, DEFAULT_ROUTER_ENDPOINT);
        assert_eq!(config.model, DEFAULT_IMAGE_MODEL);
        assert!(!config.has_token());
    }

    #[test]
    fn builders_chain() {
        let config = Config::new()
            .with_host("0.0.0.0")
            .with_port(3000)
            .with_router(RouterConfig::new().with_token("hf_test").with_model("my/model"));

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.router.model, "my/model");
        assert!(config.router.has_token());
    }
}
