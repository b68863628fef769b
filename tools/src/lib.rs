//! Load generator for the `MachineRegistration` custom resource.
//!
//! Each worker iteration creates a uniquely named registration, updates it a
//! few times and deletes it again, checking the status of every response.

pub mod api;
pub mod config;
pub mod lifecycle;

pub use api::*;
pub use config::*;
pub use lifecycle::*;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid resource body: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(#[from] envconfig::Error),
}

/// Workers of the default load profile.
pub const DEFAULT_CONCURRENCY: u32 = 10;
/// Length of the default load profile.
pub const DEFAULT_DURATION: &str = "30s";

/// Multi-threaded runtime for the bench workers, sized by `threads` when
/// given.
pub fn setup_runtime(
    threads: Option<usize>,
) -> std::io::Result<tokio::runtime::Runtime> {
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    if let Some(threads) = threads {
        builder.worker_threads(threads);
    }
    builder.enable_all().build()
}

fn has_flag(args: &[String], long: &str, short: &str) -> bool {
    args.iter().skip(1).any(|a| {
        a == long
            || a.starts_with(&format!("{long}="))
            || (a.starts_with(short) && !a.starts_with("--"))
    })
}

/// Command line with the default profile (10 workers for 30 s) filled in
/// where the user did not choose a concurrency or a stop condition.
pub fn with_default_profile<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut args: Vec<String> = args.into_iter().collect();
    if !has_flag(&args, "--concurrency", "-c") {
        args.push("--concurrency".into());
        args.push(DEFAULT_CONCURRENCY.to_string());
    }
    if !has_flag(&args, "--duration", "-d")
        && !has_flag(&args, "--iterations", "-n")
    {
        args.push("--duration".into());
        args.push(DEFAULT_DURATION.into());
    }
    args
}
