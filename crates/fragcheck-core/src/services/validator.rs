//! Request validation - runs the rule battery against one request.
//!
//! The validator fetches the request, its fragment and its test script through
//! [`McmClientPort`], unpacks gridpacks through [`GridpackPort`] and hands every
//! artifact to the functions in [`crate::checks`]. Only infrastructure failures
//! (request cannot be fetched, work directory cannot be created) are returned as
//! errors; everything else becomes a finding.

use std::path::PathBuf;
use std::sync::Arc;

use crate::checks::madgraph::{self, ProcCard, RunCard};
use crate::checks::{
    FragmentParams, GridpackFacts, MatrixElement, SettingsUsage, fragment, generator, powheg,
    request, tune,
};
use crate::domain::{
    CmsswRelease, Fragment, GridpackContents, GridpackLocation, GridpackWorkspace, McmRequest,
};
use crate::ports::{CoreError, GridpackPort, McmClientPort, PatchRunnerPort, PatchTarget};
use crate::report::{Findings, RequestReport, SkipReason};
use crate::settings::Settings;

/// Scan gridpacks with this in their name are test runs, not production gridpacks.
const SCAN_TEST_GRIDPACK: &str = "runmode0_TEST";

/// Whether to keep checking the remaining generators of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

/// Everything learned while checking one request.
struct Context<'a> {
    request: &'a McmRequest,
    fragment: &'a Fragment,
    params: FragmentParams,
    workspace: &'a GridpackWorkspace,
}

/// Service validating requests against the rule battery.
pub struct RequestValidator {
    mcm: Arc<dyn McmClientPort>,
    gridpacks: Arc<dyn GridpackPort>,
    patcher: Arc<dyn PatchRunnerPort>,
    settings: Settings,
}

impl RequestValidator {
    pub fn new(
        mcm: Arc<dyn McmClientPort>,
        gridpacks: Arc<dyn GridpackPort>,
        patcher: Arc<dyn PatchRunnerPort>,
        settings: Settings,
    ) -> Self {
        Self {
            mcm,
            gridpacks,
            patcher,
            settings,
        }
    }

    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Check one request.
    pub async fn validate(&self, prepid: &str) -> Result<RequestReport, CoreError> {
        let request = self.mcm.get_request(prepid).await?;
        tracing::info!(
            prepid = %request.prepid,
            status = %request.status,
            dataset = %request.dataset_name,
            "Checking request"
        );

        if self.settings.require_defined_status && !request.is_defined() {
            tracing::info!(prepid = %request.prepid, "Skipping request that is not defined");
            return Ok(RequestReport::skipped(
                request.prepid.clone(),
                request.dataset_name.clone(),
                request.status.clone(),
                SkipReason::NotDefined {
                    status: request.status.clone(),
                },
            ));
        }

        let findings = self.check(&request).await?;
        tracing::info!(
            prepid = %request.prepid,
            warnings = findings.warnings(),
            errors = findings.errors(),
            "Request checked"
        );
        Ok(RequestReport::checked(
            request.prepid,
            request.dataset_name,
            request.status,
            findings,
        ))
    }

    async fn check(&self, request: &McmRequest) -> Result<Findings, CoreError> {
        let mut findings = Findings::new();

        if request::needs_manual_check(request) {
            findings.warning("herwig or comphep or calchep sample. Please check manually");
            return Ok(findings);
        }

        request::check_request_basics(request, &self.settings, &mut findings);

        let raw_fragment = self.mcm.get_fragment(&request.prepid).await?;
        let fragment = Fragment::parse(&raw_fragment);
        let test_script = self.mcm.get_test_script(&request.prepid).await?;

        if fragment.is_empty() {
            findings
                .warning("No fragment associated to this request")
                .detail(format!(
                    "if this is the hadronizer you intended to use?: {}",
                    request::hadronizer_hint(&test_script)
                ));
        }

        let threads = request::threads_from_test_script(&test_script);
        tracing::debug!(threads, memory = request.memory, "Resources");
        request::check_memory(request, threads, &mut findings);

        fragment::check_eos_reference(&fragment, &mut findings);

        let params = FragmentParams::scan(&fragment);
        tracing::debug!(?params, "Fragment parameters");

        let detected = MatrixElement::detect(request);
        let mut loop_induced = false;
        let mut amcatnlo_block = false;

        if !detected.is_empty() {
            let workspace = self.gridpacks.prepare_workspace(&request.prepid).await?;
            let ctx = Context {
                request,
                fragment: &fragment,
                params,
                workspace: &workspace,
            };

            for me in &detected {
                let usage = SettingsUsage::scan(&fragment, *me);
                if me.is_mg5_amc() && usage.has_block() {
                    amcatnlo_block = true;
                }

                let mut facts = GridpackFacts::default();
                let flow = self.check_gridpack(&ctx, *me, &mut facts, &mut findings).await;
                loop_induced |= facts.loop_induced;
                if flow == Flow::Stop {
                    break;
                }

                generator::check_consistency(*me, &usage, &facts, params.n_jet_max, &mut findings);
            }

            if self.settings.keep_workspace {
                tracing::info!(dir = %workspace.cvmfs_dir.display(), "Keeping unpacked gridpacks");
            } else if let Err(e) = self.gridpacks.cleanup(&workspace).await {
                tracing::warn!("Failed to clean up gridpack work directory: {e}");
            }
        }

        match detected.last() {
            Some(me) if me.is_mg5_amc() => {
                fragment::check_powheg_settings_in_madgraph(&fragment, &mut findings);
            }
            Some(_) => {}
            None => fragment::check_pure_pythia(&fragment, &mut findings),
        }

        fragment::check_loop_induced(loop_induced, amcatnlo_block, &params, &mut findings);
        tune::check_tune(&fragment, request, &mut findings);
        fragment::check_ps_weights(&fragment, request, &mut findings);
        fragment::check_filter_efficiency(&fragment, request, &mut findings);

        Ok(findings)
    }

    /// Unpack the gridpack of the fragment and run the generator-specific checks.
    async fn check_gridpack(
        &self,
        ctx: &Context<'_>,
        me: MatrixElement,
        facts: &mut GridpackFacts,
        findings: &mut Findings,
    ) -> Flow {
        let Some(location) = GridpackLocation::from_fragment(
            ctx.fragment,
            &self.settings.cvmfs_prefix,
            &self.settings.eos_prefix,
        ) else {
            findings.error(format!(
                "No cvmfs gridpack path found in the fragment although the dataset name says {me}"
            ));
            return Flow::Continue;
        };
        tracing::info!(cvmfs = %location.cvmfs_path, eos = %location.eos_path, "Gridpack");

        let archive = if location.scan {
            match self.gridpacks.resolve_first(&location.cvmfs_path).await {
                Ok(Some(path)) => {
                    findings
                        .info("SLHA request - checking single gridpack:")
                        .detail(path.display().to_string());
                    path
                }
                Ok(None) => {
                    findings.error(format!("No gridpack matches {}", location.cvmfs_path));
                    return Flow::Stop;
                }
                Err(e) => {
                    findings.error(format!("Cannot resolve gridpack: {e}"));
                    return Flow::Stop;
                }
            }
        } else {
            PathBuf::from(&location.cvmfs_path)
        };

        if let Err(e) = self
            .gridpacks
            .extract(&archive, &ctx.workspace.cvmfs_dir)
            .await
        {
            findings.error(format!("Cannot unpack gridpack: {e}"));
            return Flow::Stop;
        }
        let contents = GridpackContents::new(&ctx.workspace.cvmfs_dir);

        match me {
            MatrixElement::Powheg => {
                facts.has_checklimits =
                    powheg::check_final_state(&contents, ctx.params.n_final, findings);
                powheg::check_integration_grid(&contents, findings);
                Flow::Continue
            }
            MatrixElement::Madgraph | MatrixElement::McAtNlo => {
                self.check_mg5_amc(ctx, me, &location, &contents, facts, findings)
                    .await
            }
        }
    }

    async fn check_mg5_amc(
        &self,
        ctx: &Context<'_>,
        me: MatrixElement,
        location: &GridpackLocation,
        contents: &GridpackContents,
        facts: &mut GridpackFacts,
        findings: &mut Findings,
    ) -> Flow {
        if let Some(card) = ProcCard::find(contents) {
            tracing::debug!(path = card.path, jets = card.jets, "Proc card");
            facts.loop_induced = card.loop_induced;
            madgraph::check_jet_multiplicity(
                &card,
                ctx.params.n_jet_max,
                &ctx.request.dataset_lower(),
                findings,
            );
        }

        let Some(run_card) = RunCard::find(contents) else {
            findings.error(
                "Although the name of the dataset has ~Madgraph, the gridpack doesn't seem to be a MG5_aMC one. Please check.",
            );
            return Flow::Stop;
        };

        if let Some(matching) = madgraph::check_run_card(
            &run_card,
            self.settings.max_bwcutoff,
            ctx.request.match_efficiency(),
            findings,
        ) {
            facts.matching = matching;
        }

        if me == MatrixElement::Madgraph {
            let release = CmsswRelease::parse(&ctx.request.cmssw_release);
            madgraph::check_lo_patches(contents, &release, findings);
            self.check_many_threads(ctx, location, contents, findings)
                .await;
        }
        Flow::Continue
    }

    /// Compare the cvmfs gridpack with its EOS source(s) for the many-threads fix.
    async fn check_many_threads(
        &self,
        ctx: &Context<'_>,
        location: &GridpackLocation,
        cvmfs: &GridpackContents,
        findings: &mut Findings,
    ) {
        let sources = if location.scan {
            match self.gridpacks.list_dir(&location.eos_scan_dir()).await {
                Ok(entries) => entries
                    .into_iter()
                    .filter(|p| !p.to_string_lossy().contains(SCAN_TEST_GRIDPACK))
                    .collect(),
                Err(e) => {
                    findings.error(format!("Cannot list EOS gridpacks of the scan: {e}"));
                    return;
                }
            }
        } else {
            vec![PathBuf::from(&location.eos_path)]
        };

        let cvmfs_patched = madgraph::has_many_threads_patch(cvmfs);
        let eos_dir = &ctx.workspace.eos_dir;

        for source in sources {
            let eos_patched = match self.gridpacks.extract(&source, eos_dir).await {
                Ok(()) => madgraph::has_many_threads_patch(&GridpackContents::new(eos_dir)),
                Err(e) => {
                    tracing::warn!("Cannot unpack EOS gridpack {}: {e}", source.display());
                    findings
                        .info(format!("Cannot unpack EOS gridpack {}", source.display()))
                        .detail(e.to_string());
                    false
                }
            };

            if !madgraph::report_many_threads(cvmfs_patched, eos_patched, findings)
                && self.settings.apply_many_threads_patch
            {
                let target = if location.scan {
                    PatchTarget::Gridpack(source)
                } else {
                    PatchTarget::Prepid(ctx.request.prepid.clone())
                };
                self.apply_patch(&target, findings).await;
            }
        }
    }

    async fn apply_patch(&self, target: &PatchTarget, findings: &mut Findings) {
        tracing::info!(%target, "Patching for nthreads problem... please be patient.");
        match self.patcher.apply(target).await {
            Ok(()) => {
                findings.info(format!("Many-threads patch applied to {target}"));
            }
            Err(e) => {
                findings.error(format!("Many-threads patch failed for {target}: {e}"));
            }
        }
    }
}
