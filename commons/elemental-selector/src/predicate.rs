use regex::Regex;
use serde::Serialize;

use crate::RunConfig;

/// One independently configured dimension of the test environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Raw, unsplit tag list.
    Tags,
    /// Operator chart repository, which encodes the channel (dev, staging,
    /// stable).
    OperatorVersion,
    K8sVersion,
    RancherManagerVersion,
    UiVersion,
    BootType,
    OperatorInstallType,
    GitChartSource,
    UpgradeOsChannel,
    /// OS image targeted by upgrades.
    OsVersionTarget,
}

impl Axis {
    pub const ALL: [Axis; 10] = [
        Axis::Tags,
        Axis::OperatorVersion,
        Axis::K8sVersion,
        Axis::RancherManagerVersion,
        Axis::UiVersion,
        Axis::BootType,
        Axis::OperatorInstallType,
        Axis::GitChartSource,
        Axis::UpgradeOsChannel,
        Axis::OsVersionTarget,
    ];

    /// Configured value of this axis; empty when unset.
    pub fn value<'a>(&self, config: &'a RunConfig) -> &'a str {
        fn opt(v: &Option<String>) -> &str {
            v.as_deref().unwrap_or("")
        }
        match self {
            Axis::Tags => config.raw_tags(),
            Axis::OperatorVersion => opt(&config.operator_repo),
            Axis::K8sVersion => config.k8s_version(),
            Axis::RancherManagerVersion => opt(&config.rancher_version),
            Axis::UiVersion => opt(&config.elemental_ui_version),
            Axis::BootType => opt(&config.boot_type),
            Axis::OperatorInstallType => opt(&config.operator_install_type),
            Axis::GitChartSource => opt(&config.git_chart_source),
            Axis::UpgradeOsChannel => opt(&config.upgrade_os_channel),
            Axis::OsVersionTarget => opt(&config.upgrade_image),
        }
    }

    // Distribution identifiers (k3s, rke2) are lowercase in version strings.
    fn normalize(&self, pattern: &str) -> String {
        match self {
            Axis::K8sVersion => pattern.to_lowercase(),
            _ => pattern.to_string(),
        }
    }
}

/// Whether the configured value of `axis` contains a match of `pattern`.
///
/// The pattern is an unanchored, case-sensitive regular expression, not a
/// version comparison: `"2.8"` also matches `"2.80"`. Anchors make it exact.
/// An invalid pattern never matches.
pub fn matches(config: &RunConfig, axis: Axis, pattern: &str) -> bool {
    let value = axis.value(config);
    match Regex::new(&axis.normalize(pattern)) {
        Ok(re) => re.is_match(value),
        Err(err) => {
            tracing::debug!(?axis, pattern, %err, "invalid predicate pattern");
            false
        }
    }
}

/// Named predicates over one run configuration.
///
/// Each call addresses exactly one axis; combine them with ordinary boolean
/// operators at the call site.
#[derive(Debug, Clone, Copy)]
pub struct Predicates<'a> {
    config: &'a RunConfig,
}

impl<'a> Predicates<'a> {
    pub fn new(config: &'a RunConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &'a RunConfig {
        self.config
    }

    pub fn is_cypress_tag(&self, tag: &str) -> bool {
        matches(self.config, Axis::Tags, tag)
    }

    pub fn is_operator_version(&self, pattern: &str) -> bool {
        matches(self.config, Axis::OperatorVersion, pattern)
    }

    pub fn is_k8s_version(&self, pattern: &str) -> bool {
        matches(self.config, Axis::K8sVersion, pattern)
    }

    pub fn is_rancher_manager_version(&self, pattern: &str) -> bool {
        matches(self.config, Axis::RancherManagerVersion, pattern)
    }

    pub fn is_ui_version(&self, pattern: &str) -> bool {
        matches(self.config, Axis::UiVersion, pattern)
    }

    pub fn is_boot_type(&self, pattern: &str) -> bool {
        matches(self.config, Axis::BootType, pattern)
    }

    pub fn is_operator_install_type(&self, pattern: &str) -> bool {
        matches(self.config, Axis::OperatorInstallType, pattern)
    }

    pub fn is_git_chart_source(&self, pattern: &str) -> bool {
        matches(self.config, Axis::GitChartSource, pattern)
    }

    pub fn is_upgrade_os_channel(&self, pattern: &str) -> bool {
        matches(self.config, Axis::UpgradeOsChannel, pattern)
    }

    pub fn is_os_version_target(&self, pattern: &str) -> bool {
        matches(self.config, Axis::OsVersionTarget, pattern)
    }
}
