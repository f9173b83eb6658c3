//! The fixture orchestrator
//!
//! Owns the fixture cache and name registry for one host registration and
//! drives the load/teardown cycle over the model-registry and datasource
//! ports. All state is instance state; independent hosts in one process get
//! independent orchestrators.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinSet;

use crate::error::{FixtureError, SetupErrors};
use crate::ports::{DataSource, ModelRegistry};
use crate::source::FixtureSource;
use crate::Record;

/// Outcome of one setup pass.
///
/// Carries the per-fixture errors without applying any policy; whether a
/// non-empty error set fails the call is the caller's decision
/// (`error_on_setup_failure`).
#[derive(Debug, Default)]
pub struct SetupReport {
    pub errors: SetupErrors,
}

impl SetupReport {
    /// True when every submitted fixture loaded.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Orchestrates fixture loading and teardown for one host application.
pub struct FixtureOrchestrator {
    source: Arc<dyn FixtureSource>,
    models: Arc<dyn ModelRegistry>,
    datasources: Vec<Arc<dyn DataSource>>,
    /// Parsed fixture content; populated on first access, never re-read.
    cache: Mutex<HashMap<String, Arc<Vec<Record>>>>,
    /// Fixture base names from the first directory scan. `None` until a
    /// load has run; teardown falls back to drop-everything while vacant.
    names: Mutex<Option<Vec<String>>>,
}

impl FixtureOrchestrator {
    pub fn new(
        source: Arc<dyn FixtureSource>,
        models: Arc<dyn ModelRegistry>,
        datasources: Vec<Arc<dyn DataSource>>,
    ) -> Self {
        Self {
            source,
            models,
            datasources,
            cache: Mutex::new(HashMap::new()),
            names: Mutex::new(None),
        }
    }

    /// The fixture name registry, if a load has populated it.
    pub async fn fixture_names(&self) -> Option<Vec<String>> {
        self.names.lock().await.clone()
    }

    /// Clears the cache and name registry, forcing the next load to re-scan
    /// and re-read everything. Intended for test isolation.
    pub async fn reset(&self) {
        self.cache.lock().await.clear();
        *self.names.lock().await = None;
        tracing::debug!("fixture state reset");
    }

    /// Checks that the fixture source is reachable without touching the
    /// registry. Returns the number of fixtures currently visible.
    pub fn probe(&self) -> Result<usize, FixtureError> {
        self.source.discover().map(|names| names.len())
    }

    /// Loads every discovered fixture.
    pub async fn setup_all(&self) -> Result<SetupReport, FixtureError> {
        self.setup(None).await
    }

    /// Loads only the named fixtures. Discovery still runs first so the
    /// registry and cache are primed.
    pub async fn setup_selected(&self, names: &[String]) -> Result<SetupReport, FixtureError> {
        self.setup(Some(names)).await
    }

    /// Re-migrates every model in the registry on every datastore, or wipes
    /// each datastore wholesale if no load has ever run.
    pub async fn teardown_all(&self) {
        self.teardown(None).await;
    }

    /// Re-migrates only the named models. The subset is ignored when the
    /// registry was never populated; teardown then wipes everything.
    pub async fn teardown_selected(&self, names: &[String]) {
        self.teardown(Some(names)).await;
    }

    /// Ensures the name registry is populated and returns a copy of it.
    async fn ensure_discovered(&self) -> Result<Vec<String>, FixtureError> {
        let mut names = self.names.lock().await;
        if let Some(list) = names.as_ref() {
            return Ok(list.clone());
        }
        let list = self.source.discover()?;
        tracing::debug!(count = list.len(), "discovered fixtures");
        *names = Some(list.clone());
        Ok(list)
    }

    /// Returns the cached records for a fixture, reading and parsing it on
    /// the first access only.
    async fn cached(&self, name: &str) -> Result<Arc<Vec<Record>>, FixtureError> {
        let mut cache = self.cache.lock().await;
        if let Some(records) = cache.get(name) {
            return Ok(Arc::clone(records));
        }
        tracing::debug!(fixture = name, "fixture not cached, reading from source");
        let records = Arc::new(self.source.read(name)?);
        cache.insert(name.to_string(), Arc::clone(&records));
        Ok(records)
    }

    async fn setup(&self, targets: Option<&[String]>) -> Result<SetupReport, FixtureError> {
        let registry = self.ensure_discovered().await?;
        let wanted = match targets {
            Some(names) => names.to_vec(),
            None => registry,
        };

        // Filesystem and parse errors abort before anything is submitted;
        // only record-creation failures are collected per fixture.
        let mut primed = Vec::with_capacity(wanted.len());
        for name in wanted {
            let records = self.cached(&name).await?;
            primed.push((name, records));
        }

        let mut tasks = JoinSet::new();
        for (name, records) in primed {
            let models = Arc::clone(&self.models);
            tasks.spawn(async move {
                let result = models.create_records(&name, &records).await;
                (name, result)
            });
        }

        let mut report = SetupReport::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((name, Ok(()))) => {
                    tracing::debug!(fixture = %name, "fixture loaded");
                }
                Ok((name, Err(err))) => {
                    tracing::debug!(fixture = %name, error = %err, "fixture failed to load");
                    report.errors.insert(name, err.into());
                }
                Err(join_err) => {
                    tracing::error!(error = %join_err, "fixture load task aborted");
                }
            }
        }
        Ok(report)
    }

    async fn teardown(&self, targets: Option<&[String]>) {
        let registry = self.names.lock().await.clone();
        let mut tasks = JoinSet::new();

        match registry {
            None => {
                // No load ever ran in this process: the registry is vacant,
                // so name filtering is meaningless. Wipe each datastore.
                for datasource in &self.datasources {
                    let datasource = Arc::clone(datasource);
                    tracing::debug!(datasource = datasource.name(), "dropping all models");
                    tasks.spawn(async move {
                        if let Err(err) = datasource.automigrate_all().await {
                            tracing::debug!(error = %err, "automigrate ignored a failure");
                        }
                    });
                }
            }
            Some(registry) => {
                let wanted = match targets {
                    Some(names) => names.to_vec(),
                    None => registry,
                };
                // The connector cannot tell us which casing its table uses
                // and a wrong-case automigrate is a no-op failure, so every
                // name is submitted as given and lower-cased.
                let both_cases: Vec<String> = wanted
                    .iter()
                    .flat_map(|name| [name.clone(), name.to_lowercase()])
                    .collect();

                for datasource in &self.datasources {
                    for model in &both_cases {
                        let datasource = Arc::clone(datasource);
                        let model = model.clone();
                        tasks.spawn(async move {
                            match datasource.automigrate(&model).await {
                                Ok(()) => tracing::debug!(
                                    model = %model,
                                    datasource = datasource.name(),
                                    "model re-migrated"
                                ),
                                Err(err) => tracing::debug!(
                                    model = %model,
                                    datasource = datasource.name(),
                                    error = %err,
                                    "re-migration ignored a failure"
                                ),
                            }
                        });
                    }
                }
            }
        }

        while tasks.join_next().await.is_some() {}
        tracing::debug!("teardown complete");
    }
}
