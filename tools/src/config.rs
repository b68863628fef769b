use std::collections::HashMap;

use envconfig::Envconfig;

use crate::LoadError;

#[derive(Envconfig, Clone)]
pub struct LoadConfig {
    /// Kubernetes API server; unset runs the smoke profile without HTTP.
    #[envconfig(from = "API_URL")]
    pub api_url: Option<String>,

    /// Service-account bearer token.
    #[envconfig(from = "SA_TOKEN", default = "")]
    pub sa_token: String,

    #[envconfig(from = "LOAD_NAMESPACE", default = "default")]
    pub namespace: String,
}

impl std::fmt::Debug for LoadConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadConfig")
            .field("api_url", &self.api_url)
            .field("sa_token", &"<redacted>")
            .field("namespace", &self.namespace)
            .finish()
    }
}

impl LoadConfig {
    pub fn from_env() -> Result<Self, LoadError> {
        Ok(Self::init_from_env()?)
    }

    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, LoadError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let map: HashMap<String, String> = pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Ok(Self::init_from_hashmap(&map)?)
    }

    /// API server URL without trailing slash; `None` when unset or empty.
    pub fn api_url(&self) -> Option<&str> {
        self.api_url
            .as_deref()
            .map(|u| u.trim_end_matches('/'))
            .filter(|u| !u.is_empty())
    }
}
