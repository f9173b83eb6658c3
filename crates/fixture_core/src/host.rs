//! Host application integration
//!
//! [`register`] is the single entry point a host calls: it applies the
//! environment gate, builds the orchestrator, optionally runs the startup
//! load, and hands back a [`Fixtures`] handle carrying the four capability
//! methods. Registration returns `Ok(None)` when the environment does not
//! match; that is a silent skip, not an error.

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::FixtureError;
use crate::options::FixtureOptions;
use crate::orchestrator::{FixtureOrchestrator, SetupReport};
use crate::ports::{DataSource, ModelRegistry};
use crate::source::DirectorySource;

/// Process environment variable consulted when the host carries no
/// environment setting of its own.
pub const ENV_VAR: &str = "APP_ENV";

/// The pieces of the host application the orchestrator integrates with.
#[derive(Clone)]
pub struct HostApp {
    /// The host's model registry
    pub models: Arc<dyn ModelRegistry>,
    /// Every configured datastore connection
    pub datasources: Vec<Arc<dyn DataSource>>,
    /// Application root the fixtures path is resolved against
    pub app_root: PathBuf,
    /// The host's environment setting; falls back to `APP_ENV` when absent
    pub environment: Option<String>,
}

impl HostApp {
    pub fn new(models: Arc<dyn ModelRegistry>, datasources: Vec<Arc<dyn DataSource>>) -> Self {
        Self {
            models,
            datasources,
            app_root: PathBuf::from("."),
            environment: None,
        }
    }

    pub fn app_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.app_root = root.into();
        self
    }

    pub fn environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }
}

/// Capability handle produced by a successful registration.
///
/// Cheap to clone; all clones share one orchestrator and therefore one
/// cache and name registry.
#[derive(Clone)]
pub struct Fixtures {
    orchestrator: Arc<FixtureOrchestrator>,
    strict: bool,
}

impl std::fmt::Debug for Fixtures {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fixtures")
            .field("strict", &self.strict)
            .finish_non_exhaustive()
    }
}

impl Fixtures {
    /// Loads every discovered fixture, applying the configured failure
    /// policy: per-fixture errors fail the call only in strict mode.
    pub async fn setup_all(&self) -> Result<(), FixtureError> {
        let report = self.orchestrator.setup_all().await?;
        self.finish_setup(report)
    }

    /// Loads only the named fixtures under the same failure policy.
    pub async fn setup_selected(&self, names: &[String]) -> Result<(), FixtureError> {
        let report = self.orchestrator.setup_selected(names).await?;
        self.finish_setup(report)
    }

    /// Tears down every fixture model. Never fails.
    pub async fn teardown_all(&self) {
        self.orchestrator.teardown_all().await;
    }

    /// Tears down only the named fixture models. Never fails.
    pub async fn teardown_selected(&self, names: &[String]) {
        self.orchestrator.teardown_selected(names).await;
    }

    /// Clears the shared cache and name registry.
    pub async fn reset(&self) {
        self.orchestrator.reset().await;
    }

    /// Checks the fixture source is reachable; returns the fixture count.
    pub fn probe(&self) -> Result<usize, FixtureError> {
        self.orchestrator.probe()
    }

    /// The fixture name registry, if a load has populated it.
    pub async fn fixture_names(&self) -> Option<Vec<String>> {
        self.orchestrator.fixture_names().await
    }

    fn finish_setup(&self, report: SetupReport) -> Result<(), FixtureError> {
        if report.is_clean() {
            return Ok(());
        }
        tracing::warn!(errors = %report.errors, "fixtures failed to load");
        if self.strict {
            return Err(FixtureError::Setup(report.errors));
        }
        Ok(())
    }
}

/// Registers the fixture orchestrator against a host application.
///
/// Returns `Ok(None)` when the current environment is not one of
/// `options.environments`; nothing is constructed in that case. With
/// `load_on_startup` set, one full load runs before this returns:
/// filesystem and parse errors fail registration unconditionally,
/// per-fixture creation errors only in strict mode.
pub async fn register(
    app: &HostApp,
    options: &FixtureOptions,
) -> Result<Option<Fixtures>, FixtureError> {
    let environment = app
        .environment
        .clone()
        .or_else(|| std::env::var(ENV_VAR).ok());

    let matched = environment
        .as_deref()
        .map(|environment| options.environments.matches(environment))
        .unwrap_or(false);

    if !matched {
        tracing::debug!(
            environment = environment.as_deref().unwrap_or("<unset>"),
            "skipping fixtures, environment not enabled"
        );
        return Ok(None);
    }

    let source = Arc::new(DirectorySource::new(&app.app_root, &options.fixtures_path));
    let datasources: Vec<Arc<dyn DataSource>> = match &options.datasource {
        Some(name) => app
            .datasources
            .iter()
            .filter(|datasource| datasource.name() == name)
            .cloned()
            .collect(),
        None => app.datasources.clone(),
    };

    let fixtures = Fixtures {
        orchestrator: Arc::new(FixtureOrchestrator::new(
            source,
            Arc::clone(&app.models),
            datasources,
        )),
        strict: options.error_on_setup_failure,
    };

    if options.load_on_startup {
        if let Err(err) = fixtures.setup_all().await {
            tracing::warn!(error = %err, "startup fixture load failed");
            return Err(err);
        }
        tracing::debug!("startup fixture load complete");
    }

    Ok(Some(fixtures))
}
