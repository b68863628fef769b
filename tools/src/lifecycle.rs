use std::time::Duration;

use reqwest::StatusCode;

use crate::{LoadError, MachineRegistration, MachineRegistrationApi, annotate};

/// Update rounds attempted after a successful create.
pub const UPDATE_ROUNDS: usize = 5;
pub const UPDATE_PAUSE: Duration = Duration::from_millis(100);
/// Length of a smoke iteration.
pub const SMOKE_PAUSE: Duration = Duration::from_secs(1);

pub const CHECK_CREATE: &str = "create status is 201";
pub const CHECK_UPDATE: &str = "update status is 200 or 409";
pub const CHECK_DELETE: &str = "delete status is 200 or 202 or 204";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Check {
    pub name: &'static str,
    pub passed: bool,
    /// `None` when the request never got a response.
    pub status: Option<u16>,
}

/// Result of one lifecycle iteration.
#[derive(Debug, Clone, Default)]
pub struct IterationOutcome {
    pub checks: Vec<Check>,
    pub requests: u64,
    pub bytes: u64,
    pub updates: u64,
}

impl IterationOutcome {
    pub fn success(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    pub fn failed_checks(&self) -> impl Iterator<Item = &Check> {
        self.checks.iter().filter(|c| !c.passed)
    }

    fn record(
        &mut self,
        name: &'static str,
        reply: &Result<crate::ApiReply, LoadError>,
        accept: &[StatusCode],
    ) -> bool {
        let check = match reply {
            Ok(r) => Check {
                name,
                passed: accept.contains(&r.status),
                status: Some(r.status.as_u16()),
            },
            Err(_) => Check {
                name,
                passed: false,
                status: None,
            },
        };
        if !check.passed {
            match reply {
                Ok(r) => tracing::warn!(
                    check = name,
                    status = r.status.as_u16(),
                    body = %String::from_utf8_lossy(&r.body),
                    "check failed"
                ),
                Err(err) => {
                    tracing::warn!(check = name, error = %err, "check failed")
                }
            }
        }
        let passed = check.passed;
        self.checks.push(check);
        passed
    }

    fn count(&mut self, reply: &Result<crate::ApiReply, LoadError>) {
        self.requests += 1;
        if let Ok(r) = reply {
            self.bytes += r.body.len() as u64;
        }
    }
}

/// Drives the create, update and delete lifecycle of one registration per
/// call, or idles when no API server is configured.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    api: Option<MachineRegistrationApi>,
}

impl Lifecycle {
    pub fn new(api: Option<MachineRegistrationApi>) -> Self {
        if api.is_none() {
            tracing::warn!("no API_URL provided, running smoke test only");
        }
        Self { api }
    }

    pub fn is_smoke(&self) -> bool {
        self.api.is_none()
    }

    pub async fn iterate(&self) -> IterationOutcome {
        match &self.api {
            Some(api) => run_lifecycle(api).await,
            None => {
                tokio::time::sleep(SMOKE_PAUSE).await;
                IterationOutcome::default()
            }
        }
    }
}

fn epoch_millis() -> String {
    chrono::Utc::now().timestamp_millis().to_string()
}

/// One create, up to [`UPDATE_ROUNDS`] get-then-put rounds and one delete.
/// A failed create ends the iteration; later failures are only recorded.
pub async fn run_lifecycle(api: &MachineRegistrationApi) -> IterationOutcome {
    let mut outcome = IterationOutcome::default();
    let registration = MachineRegistration::generate(api.namespace());
    let name = registration.metadata.name.as_str();

    let created = api.create(&registration).await;
    outcome.count(&created);
    if !outcome.record(CHECK_CREATE, &created, &[StatusCode::CREATED]) {
        tracing::info!(resource = name, "create failed, iteration aborted");
        return outcome;
    }

    for round in 0..UPDATE_ROUNDS {
        let fetched = api.get(name).await;
        outcome.count(&fetched);
        let mut object = match fetched.as_ref().map(|r| (r.status, r.json())) {
            Ok((StatusCode::OK, Ok(object))) => object,
            Ok((status, _)) => {
                tracing::debug!(
                    resource = name,
                    status = status.as_u16(),
                    "read failed, no more updates"
                );
                break;
            }
            Err(err) => {
                tracing::debug!(
                    resource = name,
                    error = %err,
                    "read failed, no more updates"
                );
                break;
            }
        };
        annotate(&mut object, &format!("k6-update-{round}"), &epoch_millis());

        let updated = api.update(name, &object).await;
        outcome.count(&updated);
        outcome.updates += 1;
        outcome.record(
            CHECK_UPDATE,
            &updated,
            &[StatusCode::OK, StatusCode::CONFLICT],
        );
        tokio::time::sleep(UPDATE_PAUSE).await;
    }

    let deleted = api.delete(name).await;
    outcome.count(&deleted);
    outcome.record(
        CHECK_DELETE,
        &deleted,
        &[StatusCode::OK, StatusCode::ACCEPTED, StatusCode::NO_CONTENT],
    );
    outcome
}
