use std::collections::HashMap;

use envconfig::Envconfig;

use crate::SelectionError;

/// Immutable configuration of one test run, resolved from the environment at
/// process start.
///
/// Values are passed through verbatim; only the tag list gets split (see
/// [`RunConfig::tags`]). Missing optional values read as empty strings.
#[derive(Envconfig, Debug, Clone)]
pub struct RunConfig {
    #[envconfig(from = "RANCHER_URL", default = "https://localhost:8005")]
    pub rancher_url: String,

    #[envconfig(from = "RANCHER_USER", default = "admin")]
    pub username: String,

    #[envconfig(from = "RANCHER_PASSWORD")]
    pub password: Option<String>,

    #[envconfig(from = "CACHE_SESSION")]
    pub cache_session: Option<String>,

    #[envconfig(from = "CYPRESS_TAGS")]
    pub cypress_tags: Option<String>,

    #[envconfig(from = "K8S_VERSION_TO_PROVISION")]
    pub k8s_version_to_provision: Option<String>,

    #[envconfig(from = "K8S_DOWNSTREAM_VERSION")]
    pub k8s_downstream_version: Option<String>,

    #[envconfig(from = "UI_ACCOUNT", default = "admin")]
    pub ui_account: String,

    #[envconfig(from = "ELEMENTAL_UI_VERSION")]
    pub elemental_ui_version: Option<String>,

    #[envconfig(from = "OPERATOR_REPO")]
    pub operator_repo: Option<String>,

    #[envconfig(from = "RANCHER_VERSION")]
    pub rancher_version: Option<String>,

    #[envconfig(from = "BOOT_TYPE")]
    pub boot_type: Option<String>,

    #[envconfig(from = "OPERATOR_INSTALL_TYPE")]
    pub operator_install_type: Option<String>,

    #[envconfig(from = "GIT_CHART_SOURCE")]
    pub git_chart_source: Option<String>,

    #[envconfig(from = "UPGRADE_OS_CHANNEL")]
    pub upgrade_os_channel: Option<String>,

    #[envconfig(from = "UPGRADE_IMAGE")]
    pub upgrade_image: Option<String>,

    #[envconfig(from = "CHARTMUSEUM_REPO")]
    pub chartmuseum_repo: Option<String>,

    #[envconfig(from = "CLUSTER_NAME", default = "mycluster")]
    pub cluster_name: String,

    #[envconfig(from = "PROXY")]
    pub proxy: Option<String>,

    #[envconfig(from = "PROXY_IP")]
    pub proxy_ip: Option<String>,

    #[envconfig(from = "ISO_TO_TEST")]
    pub iso_to_test: Option<String>,
}

impl RunConfig {
    /// Resolve the configuration from the process environment.
    pub fn from_env() -> Result<Self, SelectionError> {
        Ok(Self::init_from_env()?)
    }

    /// Resolve the configuration from explicit key/value pairs, using the same
    /// variable names and defaults as [`RunConfig::from_env`].
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, SelectionError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let map: HashMap<String, String> = pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Ok(Self::init_from_hashmap(&map)?)
    }

    /// Base URL of the Rancher manager without trailing slash.
    pub fn base_url(&self) -> &str {
        self.rancher_url.trim_end_matches('/')
    }

    /// Raw, unsplit tag list.
    pub fn raw_tags(&self) -> &str {
        self.cypress_tags.as_deref().unwrap_or("")
    }

    /// Active tags split on `,`; blank entries are dropped.
    pub fn tags(&self) -> Vec<&str> {
        self.raw_tags()
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    }

    /// Kubernetes version to provision, falling back to the downstream
    /// cluster version.
    pub fn k8s_version(&self) -> &str {
        self.k8s_version_to_provision
            .as_deref()
            .filter(|v| !v.is_empty())
            .or(self.k8s_downstream_version.as_deref())
            .unwrap_or("")
    }

    /// Whether login sessions are reused across cases. Only `true` enables
    /// it; any other value, malformed ones included, reads as disabled.
    pub fn caches_session(&self) -> bool {
        self.cache_session.as_deref() == Some("true")
    }

    /// Whether scenarios log in with the restricted elemental user.
    pub fn uses_standard_user(&self) -> bool {
        self.ui_account == "user"
    }
}
