//! CLI bootstrap - the composition root.
//!
//! This is the only place where adapters are instantiated:
//! - McM client (via fragcheck-mcm)
//! - Gridpack store and patch runner (via fragcheck-gridpack)
//!
//! Handlers receive the composed [`CliContext`] and only talk to core services.

use std::path::PathBuf;
use std::sync::Arc;

use fragcheck_core::ports::{GridpackPort, McmClientPort, PatchRunnerPort};
use fragcheck_core::settings::DEFAULT_PATCH_SCRIPT;
use fragcheck_core::{
    CoreError, RequestSelector, RequestValidator, Settings, resolve_work_dir, validate_settings,
};
use fragcheck_gridpack::{DEFAULT_PYTHON, LocalGridpackStore, ScriptPatchRunner};
use fragcheck_mcm::{DefaultMcmClient, McmClientConfig};

use crate::commands::CheckArgs;
use crate::error::CliError;
use crate::parser::Cli;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Use the DEV instance of McM.
    pub dev: bool,
    /// Explicit McM base URL, overrides `dev`.
    pub mcm_url: Option<String>,
    /// Run settings; `work_dir` is always resolved.
    pub settings: Settings,
    pub patch_script: PathBuf,
    pub python: String,
}

impl CliConfig {
    /// Config from global flags with default check settings.
    pub fn from_cli(cli: &Cli) -> Self {
        let settings = Settings {
            work_dir: Some(resolve_work_dir(cli.work_dir.as_deref())),
            ..Settings::default()
        };
        Self {
            dev: cli.dev,
            mcm_url: cli.mcm_url.clone(),
            settings,
            patch_script: PathBuf::from(DEFAULT_PATCH_SCRIPT),
            python: DEFAULT_PYTHON.to_string(),
        }
    }

    /// Apply the options of the `check` subcommand.
    #[must_use]
    pub fn with_check_args(mut self, args: &CheckArgs) -> Self {
        self.settings.require_defined_status = !args.bypass_status;
        self.settings.apply_many_threads_patch = args.apply_many_threads_patch;
        self.settings.keep_workspace = args.keep_workspace;
        self.patch_script.clone_from(&args.patch_script);
        self.python.clone_from(&args.python);
        self
    }

    fn mcm_client_config(&self) -> McmClientConfig {
        let config = McmClientConfig::new().with_dev(self.dev);
        match &self.mcm_url {
            Some(url) => config.with_base_url(url.clone()),
            None => config,
        }
    }
}

/// Fully composed context for CLI commands.
pub struct CliContext {
    pub selector: RequestSelector,
    pub validator: RequestValidator,
    /// Running against the DEV instance.
    pub dev: bool,
}

impl CliContext {
    /// Compose the context from already-built adapters.
    pub fn from_parts(
        mcm: Arc<dyn McmClientPort>,
        gridpacks: Arc<dyn GridpackPort>,
        patcher: Arc<dyn PatchRunnerPort>,
        settings: Settings,
        dev: bool,
    ) -> Self {
        Self {
            selector: RequestSelector::new(Arc::clone(&mcm)),
            validator: RequestValidator::new(mcm, gridpacks, patcher, settings),
            dev,
        }
    }
}

/// Bootstrap the CLI.
///
/// Validates the settings, builds the McM client, the gridpack store rooted
/// at the work directory and the patch runner.
pub fn bootstrap(config: CliConfig) -> Result<CliContext, CliError> {
    validate_settings(&config.settings).map_err(CoreError::from)?;

    let mcm = DefaultMcmClient::new(&config.mcm_client_config())
        .map_err(|e| CliError::Config(format!("Cannot create McM client: {e}")))?;
    tracing::debug!(base_url = %mcm.base_url(), "McM client ready");

    let work_dir = config
        .settings
        .work_dir
        .clone()
        .unwrap_or_else(|| resolve_work_dir(None));
    let gridpacks = LocalGridpackStore::new(work_dir);
    tracing::debug!(work_dir = %gridpacks.root().display(), "Gridpack store ready");

    let patcher = ScriptPatchRunner::new(config.patch_script).with_interpreter(config.python);

    Ok(CliContext::from_parts(
        Arc::new(mcm),
        Arc::new(gridpacks),
        Arc::new(patcher),
        config.settings,
        config.dev,
    ))
}
