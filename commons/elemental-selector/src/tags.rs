use serde::Serialize;

use crate::{RunConfig, SelectionError};

/// Ordered set of scenario categories active for the run (`main`,
/// `upgrade`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TagSet(Vec<String>);

impl TagSet {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Vec::new();
        for tag in tags {
            let tag = tag.into();
            if !set.contains(&tag) {
                set.push(tag);
            }
        }
        Self(set)
    }

    /// Tags of the run, split from `CYPRESS_TAGS`.
    pub fn from_config(config: &RunConfig) -> Self {
        Self::new(config.tags())
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t == tag)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Non-empty list of tags a test group runs under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequiredTags(Vec<String>);

impl RequiredTags {
    /// Build the tag list of `group`; a group without tags is rejected.
    pub fn new<I, S>(group: &str, tags: I) -> Result<Self, SelectionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tags: Vec<String> = tags.into_iter().map(Into::into).collect();
        if tags.is_empty() {
            return Err(SelectionError::NoRequiredTags(group.to_string()));
        }
        Ok(Self(tags))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Whether a group requiring `required` is registered for `active`.
///
/// Non-exclusive: one exact tag in common is enough. An empty active set
/// therefore skips everything.
pub fn should_run(required: &RequiredTags, active: &TagSet) -> bool {
    required.iter().any(|tag| active.contains(tag))
}

/// Call `register` only when [`should_run`] holds. Returns whether it ran.
pub fn filter_tests<F>(
    required: &RequiredTags,
    active: &TagSet,
    register: F,
) -> bool
where
    F: FnOnce(),
{
    if should_run(required, active) {
        register();
        true
    } else {
        tracing::debug!(
            required = ?required,
            active = ?active,
            "skipping test group, no active tag matches"
        );
        false
    }
}
