//! Checks on the generator fragment text.

use crate::domain::{CmsswRelease, Fragment, McmRequest};
use crate::report::Findings;

/// Value used when the fragment does not set a jet/particle multiplicity.
pub const UNSET_MULTIPLICITY: u32 = 100;

const PS_WEIGHTS_IMPORT: &str =
    "from Configuration.Generator.PSweightsPythia.PythiaPSweightsSettings_cfi import *";

/// First release with working parton-shower weights.
const PS_WEIGHTS_MIN_RELEASE: (u32, u32, u32) = (10, 2, 3);

/// Shower/matching parameters read from the fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FragmentParams {
    /// `TimeShower:nPartonsInBorn` is set.
    pub n_partons_in_born: bool,
    /// `JetMatching:nJetMax`
    pub n_jet_max: u32,
    /// `POWHEG:nFinal`
    pub n_final: u32,
}

impl FragmentParams {
    pub fn scan(fragment: &Fragment) -> Self {
        Self {
            n_partons_in_born: fragment.count_lines("nPartonsInBorn") > 0,
            n_jet_max: fragment
                .integer_after("nJetMax")
                .unwrap_or(UNSET_MULTIPLICITY),
            n_final: fragment.integer_after("nFinal").unwrap_or(UNSET_MULTIPLICITY),
        }
    }
}

/// Gridpacks must be read from cvmfs, never from EOS directly.
pub fn check_eos_reference(fragment: &Fragment, findings: &mut Findings) {
    if fragment.count_lines("eos") > 0 {
        findings.error("Gridpack should have used cvmfs path instead of eos path");
    }
}

/// MadGraph requests must not carry POWHEG emission-veto settings.
pub fn check_powheg_settings_in_madgraph(fragment: &Fragment, findings: &mut Findings) {
    if fragment.count_lines_ci("PowhegEmission") > 0 {
        findings.error("Please remove POWHEG settings for MG requests.");
    }
}

/// Requests whose dataset names no matrix-element generator should be pure Pythia.
pub fn check_pure_pythia(fragment: &Fragment, findings: &mut Findings) {
    if fragment.count_lines_ci("Pythia8aMCatNLOSettings") > 0
        || fragment.count_lines_ci("PowhegEmission") > 0
    {
        findings
            .warning("Please remove aMCatNLO or POWHEG settings if this is a pure Pythia request.")
            .detail("If it's not a pure request, in the future, please include madgraph/powheg or amcatnlo")
            .detail("in the name of the dataset");
    }
}

/// Loop-induced processes (`noborn=QCD`) must not use NLO shower settings.
pub fn check_loop_induced(
    loop_induced: bool,
    amcatnlo_block: bool,
    params: &FragmentParams,
    findings: &mut Findings,
) {
    if !loop_induced {
        return;
    }
    if amcatnlo_block {
        findings
            .error("You are using a loop induced process, [noborn=QCD].")
            .detail("Please remove all occurances of Pythia8aMCatNLOSettings from the fragment");
    }
    if params.n_partons_in_born {
        findings
            .error("You are using a loop induced process, [noborn=QCD].")
            .detail("Please remove all TimeShower:nPartonsInBorn from the fragment");
    }
}

/// Generator-level filters imply a filter efficiency below one.
pub fn check_filter_efficiency(fragment: &Fragment, request: &McmRequest, findings: &mut Findings) {
    #[allow(clippy::float_cmp)] // the service stores exactly 1 for "no filter"
    let unfiltered = request.filter_efficiency() == 1.0;
    if fragment.count_lines_ci("filter") > 3 && unfiltered {
        findings.warning("Filters in the fragment but filter efficiency = 1");
    }
}

/// Fall18 requests are expected to store parton-shower weights.
pub fn check_ps_weights(fragment: &Fragment, request: &McmRequest, findings: &mut Findings) {
    if !request.in_campaign("Fall18") || fragment.is_empty() {
        return;
    }

    let imports = fragment.count_lines(PS_WEIGHTS_IMPORT);
    if imports != 1 {
        findings.warning(
            "No parton shower weights configuration in the fragment. In the Fall18 campaign, we recommend to include Parton Shower weights",
        );
        return;
    }

    let release = CmsswRelease::parse(&request.cmssw_release);
    let (major, minor, patch) = PS_WEIGHTS_MIN_RELEASE;
    if release.is_older_than(major, minor, patch) {
        findings.error("PS weights in config but CMSSW version is < 10_2_3 - please check!");
    }

    let block = fragment.count_lines("pythia8PSweightsSettingsBlock,");
    let mentions = fragment.count_lines("pythia8PSweightsSettings");
    if block == 1 && mentions == 2 {
        findings.ok("Parton shower weight configuration probably OK in the fragment");
    } else {
        findings.error("Parton shower weight configuration not OK in the fragment");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GeneratorParameters;

    const PS_FRAGMENT: &str = "\
from Configuration.Generator.Pythia8CommonSettings_cfi import *
from Configuration.Generator.MCTunes2017.PythiaCP5Settings_cfi import *
from Configuration.Generator.PSweightsPythia.PythiaPSweightsSettings_cfi import *
generator = cms.EDFilter('Pythia8HadronizerFilter',
    PythiaParameters = cms.PSet(
        pythia8CommonSettingsBlock,
        pythia8CP5SettingsBlock,
        pythia8PSweightsSettingsBlock,
        parameterSets = cms.vstring('pythia8CommonSettings',
                                    'pythia8CP5Settings',
                                    'pythia8PSweightsSettings',
                                    )
    )
)
";

    fn request(prepid: &str, release: &str) -> McmRequest {
        McmRequest {
            prepid: prepid.to_string(),
            dataset_name: "DYJetsToLL_M-50_TuneCP5_13TeV-madgraphMLM-pythia8".to_string(),
            status: "defined".to_string(),
            time_event: vec![1.0],
            total_events: 1000,
            cmssw_release: release.to_string(),
            memory: 2300,
            generator_parameters: vec![GeneratorParameters::default()],
        }
    }

    #[test]
    fn test_params_defaults() {
        let params = FragmentParams::scan(&Fragment::parse("nothing here\n"));
        assert!(!params.n_partons_in_born);
        assert_eq!(params.n_jet_max, UNSET_MULTIPLICITY);
        assert_eq!(params.n_final, UNSET_MULTIPLICITY);
    }

    #[test]
    fn test_params_from_fragment() {
        let params = FragmentParams::scan(&Fragment::parse(
            "'JetMatching:nJetMax = 2',\n'POWHEG:nFinal = 3',\n'TimeShower:nPartonsInBorn = 2',\n",
        ));
        assert!(params.n_partons_in_born);
        assert_eq!(params.n_jet_max, 2);
        assert_eq!(params.n_final, 3);
    }

    #[test]
    fn test_eos_reference() {
        let mut findings = Findings::new();
        check_eos_reference(
            &Fragment::parse("args = cms.vstring('/eos/cms/store/group/phys_generator/x.tar.xz')\n"),
            &mut findings,
        );
        assert_eq!(findings.errors(), 1);
    }

    #[test]
    fn test_pure_pythia_with_nlo_settings() {
        let mut findings = Findings::new();
        check_pure_pythia(
            &Fragment::parse("from Configuration.Generator.Pythia8aMCatNLOSettings_cfi import *\n"),
            &mut findings,
        );
        assert_eq!(findings.warnings(), 1);
    }

    #[test]
    fn test_loop_induced_errors() {
        let params = FragmentParams {
            n_partons_in_born: true,
            n_jet_max: 0,
            n_final: 0,
        };
        let mut findings = Findings::new();
        check_loop_induced(true, true, &params, &mut findings);
        assert_eq!(findings.errors(), 2);

        let mut findings = Findings::new();
        check_loop_induced(false, true, &params, &mut findings);
        assert!(findings.is_empty());
    }

    #[test]
    fn test_filter_efficiency() {
        let fragment = Fragment::parse(
            "a = cms.EDFilter('MCParticlePairFilter')\nb = cms.EDFilter('X')\nc = filter\nProductionFilterSequence = cms.Sequence(generator*a*b)\n",
        );
        let mut req = request("X-RunIIFall17GS-1", "CMSSW_9_3_9_patch1");

        let mut findings = Findings::new();
        check_filter_efficiency(&fragment, &req, &mut findings);
        assert_eq!(findings.warnings(), 1);

        req.generator_parameters[0].filter_efficiency = 0.2;
        let mut findings = Findings::new();
        check_filter_efficiency(&fragment, &req, &mut findings);
        assert!(findings.is_empty());
    }

    #[test]
    fn test_ps_weights_ok() {
        let mut findings = Findings::new();
        check_ps_weights(
            &Fragment::parse(PS_FRAGMENT),
            &request("SMP-RunIIFall18GS-00001", "CMSSW_10_2_3"),
            &mut findings,
        );
        assert_eq!(findings.errors(), 0);
        assert_eq!(findings.iter().count(), 1);
    }

    #[test]
    fn test_ps_weights_old_release() {
        let mut findings = Findings::new();
        check_ps_weights(
            &Fragment::parse(PS_FRAGMENT),
            &request("SMP-RunIIFall18GS-00001", "CMSSW_10_2_0"),
            &mut findings,
        );
        assert_eq!(findings.errors(), 1);
    }

    #[test]
    fn test_ps_weights_missing_in_fall18() {
        let mut findings = Findings::new();
        check_ps_weights(
            &Fragment::parse("generator = cms.EDFilter('Pythia8HadronizerFilter')\n"),
            &request("SMP-RunIIFall18GS-00001", "CMSSW_10_2_3"),
            &mut findings,
        );
        assert_eq!(findings.warnings(), 1);
    }

    #[test]
    fn test_ps_weights_ignored_outside_fall18() {
        let mut findings = Findings::new();
        check_ps_weights(
            &Fragment::parse("x\n"),
            &request("SMP-RunIIFall17GS-00001", "CMSSW_9_3_9_patch1"),
            &mut findings,
        );
        assert!(findings.is_empty());
    }
}
