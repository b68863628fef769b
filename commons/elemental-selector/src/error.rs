/// Errors raised while building the selection inputs of a run.
///
/// Evaluating a predicate or a tag filter never fails; only constructing
/// invalid descriptors or reading malformed configuration does.
#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    #[error("test group '{0}' declares no required tags")]
    NoRequiredTags(String),

    #[error("invalid run configuration: {0}")]
    Config(#[from] envconfig::Error),
}
