pub mod checks;

use futures::future::BoxFuture;
use serde::Serialize;
use std::{collections::BTreeMap, fmt::Display, future::Future, sync::Arc};
use tokio::sync::RwLock;

/// A single health check.
pub trait Check: Send + Sync + 'static {
    type Error: Display;

    fn run(&self) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

trait DynCheck: Send + Sync {
    fn run_dyn(&self) -> BoxFuture<'_, Result<(), String>>;
}

impl<C: Check> DynCheck for C {
    fn run_dyn(&self) -> BoxFuture<'_, Result<(), String>> {
        Box::pin(async move { self.run().await.map_err(|err| err.to_string()) })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub up: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CheckResults {
    pub results: BTreeMap<String, CheckResult>,
}

impl CheckResults {
    pub fn all_up(&self) -> bool {
        self.results.values().all(|result| result.up)
    }
}

/// A named set of checks.
#[derive(Default)]
pub struct Checks {
    checks: RwLock<BTreeMap<String, Arc<dyn DynCheck>>>,
}

impl Checks {
    pub async fn register(&self, name: impl Into<String>, check: impl Check) {
        self.checks.write().await.insert(name.into(), Arc::new(check));
    }

    pub async fn run(&self) -> CheckResults {
        let checks = self
            .checks
            .read()
            .await
            .iter()
            .map(|(name, check)| (name.clone(), check.clone()))
            .collect::<Vec<_>>();

        let mut results = BTreeMap::new();
        for (name, check) in checks {
            let result = match check.run_dyn().await {
                Ok(()) => CheckResult {
                    up: true,
                    message: None,
                },
                Err(message) => CheckResult {
                    up: false,
                    message: Some(message),
                },
            };
            results.insert(name, result);
        }

        CheckResults { results }
    }
}

#[derive(Default)]
pub struct HealthChecks {
    pub startup: Checks,
    pub liveness: Checks,
    pub readiness: Checks,
}
