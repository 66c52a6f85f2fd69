//! Matrix-element generator detection and fragment/dataset consistency.

use std::fmt;

use crate::domain::{Fragment, McmRequest};
use crate::report::Findings;

/// `ickkw` value assumed when no run card was read.
pub const DEFAULT_MATCHING: u32 = 10;

/// Matrix-element generators recognised from the dataset name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatrixElement {
    Powheg,
    Madgraph,
    McAtNlo,
}

impl MatrixElement {
    /// Detection order.
    pub const ALL: [Self; 3] = [Self::Powheg, Self::Madgraph, Self::McAtNlo];

    /// Word looked for in the lowercased dataset name.
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Powheg => "powheg",
            Self::Madgraph => "madgraph",
            Self::McAtNlo => "mcatnlo",
        }
    }

    /// Name of the Pythia8 shower settings matching this generator.
    pub const fn settings_name(self) -> &'static str {
        match self {
            Self::Powheg => "PowhegEmissionVeto",
            Self::Madgraph | Self::McAtNlo => "aMCatNLO",
        }
    }

    /// Gridpack produced by MG5_aMC (LO or NLO).
    pub const fn is_mg5_amc(self) -> bool {
        matches!(self, Self::Madgraph | Self::McAtNlo)
    }

    /// Every generator named by the dataset, in detection order.
    pub fn detect(request: &McmRequest) -> Vec<Self> {
        let name = request.dataset_lower();
        Self::ALL
            .into_iter()
            .filter(|me| name.contains(me.keyword()))
            .collect()
    }
}

impl fmt::Display for MatrixElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// How the fragment uses the shower settings of one generator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsUsage {
    /// Lines mentioning `pythia8<X>Settings`.
    pub mentions: usize,
    /// Import lines for the settings module.
    pub imports: usize,
    /// Lines with `pythia8<X>SettingsBlock,`.
    pub blocks: usize,
}

impl SettingsUsage {
    pub fn scan(fragment: &Fragment, me: MatrixElement) -> Self {
        let name = me.settings_name();
        Self {
            mentions: fragment.count_lines(&format!("pythia8{name}Settings")),
            imports: fragment.count_lines(&format!(
                "from Configuration.Generator.Pythia8{name}Settings_cfi import *"
            )),
            blocks: fragment.count_lines(&format!("pythia8{name}SettingsBlock,")),
        }
    }

    /// Import, block and parameter-set entry all present exactly once.
    pub const fn is_complete(&self) -> bool {
        self.mentions == 2 && self.imports == 1 && self.blocks == 1
    }

    pub const fn is_absent(&self) -> bool {
        self.mentions == 0 && self.imports == 0 && self.blocks == 0
    }

    /// The settings block is wired into the shower parameters.
    pub const fn has_block(&self) -> bool {
        self.blocks == 1
    }
}

/// What the gridpack told us about the generator run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridpackFacts {
    /// `ickkw` from the run card, [`DEFAULT_MATCHING`] otherwise.
    pub matching: u32,
    /// Proc card declares `noborn=QCD`.
    pub loop_induced: bool,
    /// Gridpack ships `pwhg_checklimits`.
    pub has_checklimits: bool,
}

impl Default for GridpackFacts {
    fn default() -> Self {
        Self {
            matching: DEFAULT_MATCHING,
            loop_induced: false,
            has_checklimits: false,
        }
    }
}

/// Compare the shower settings in the fragment with the generator named by the dataset.
pub fn check_consistency(
    me: MatrixElement,
    usage: &SettingsUsage,
    facts: &GridpackFacts,
    n_jet_max: u32,
    findings: &mut Findings,
) {
    let consistent = format!("no known inconsistency in the fragment w.r.t. the name of the dataset {me}");
    let matching = facts.matching;

    if matching >= 2 && usage.is_complete() {
        findings.ok(consistent);
        if matching > 3 && !facts.has_checklimits {
            findings
                .warning("To check manually - This is a Powheg NLO sample. Please check 'nFinal' is")
                .detail("set correctly as number of final state particles (BEFORE THE DECAYS)")
                .detail("in the LHE other than emitted extra parton.");
        }
    } else if matching == 1 && usage.is_absent() {
        findings.ok(consistent);
        findings
            .warning(format!(
                "To check manually - This is a MadGraph LO sample. Please check 'JetMatching:nJetMax' ={n_jet_max} is OK and"
            ))
            .detail("correctly set as number of partons in born matrix element for highest multiplicity.");
    } else if matching == 0 && me == MatrixElement::Madgraph && usage.is_absent() {
        findings.ok(consistent);
    } else if matching == 0
        && me == MatrixElement::McAtNlo
        && usage.is_complete()
        && !facts.loop_induced
    {
        findings.ok(consistent);
        findings
            .warning("Is this a MadGraph NLO sample without matching. Please check 'TimeShower:nPartonsInBorn'")
            .detail("is set correctly as number of coloured particles")
            .detail("(before resonance decays) in born matrix element.");
    } else {
        let error = findings.error(format!(
            "Fragment may be wrong: check {me} settings in the fragment"
        ));
        if matching <= 1 && me == MatrixElement::Madgraph {
            error
                .detail("You run MG5_aMC@NLO at LO but you have  Pythia8aMCatNLOSettings_cfi in fragment")
                .detail("--> please remove it from the fragment");
        }
        if me == MatrixElement::Powheg {
            findings
                .warning(format!(
                    "if this is a {me} but loop induced process such as gg->ZH,"
                ))
                .detail("then fragment is OK (no need to have Pythia8PowhegEmissionVetoSettings)");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Severity;

    const NLO_FRAGMENT: &str = "\
from Configuration.Generator.Pythia8aMCatNLOSettings_cfi import *
generator = cms.EDFilter('Pythia8HadronizerFilter',
    PythiaParameters = cms.PSet(
        pythia8aMCatNLOSettingsBlock,
        parameterSets = cms.vstring('pythia8aMCatNLOSettings')
    )
)
";

    fn request(dataset: &str) -> McmRequest {
        McmRequest {
            prepid: "X-RunIIFall18wmLHEGS-00001".to_string(),
            dataset_name: dataset.to_string(),
            status: "defined".to_string(),
            time_event: Vec::new(),
            total_events: 0,
            cmssw_release: String::new(),
            memory: 2300,
            generator_parameters: Vec::new(),
        }
    }

    fn facts(matching: u32) -> GridpackFacts {
        GridpackFacts {
            matching,
            ..GridpackFacts::default()
        }
    }

    #[test]
    fn test_detect_order() {
        let detected = MatrixElement::detect(&request("ttH_amcatnlo_powheg_MadGraph"));
        assert_eq!(
            detected,
            vec![
                MatrixElement::Powheg,
                MatrixElement::Madgraph,
                MatrixElement::McAtNlo
            ]
        );
        assert!(MatrixElement::detect(&request("QCD_Pt_15to30_TuneCP5_pythia8")).is_empty());
    }

    #[test]
    fn test_usage_scan() {
        let usage = SettingsUsage::scan(&Fragment::parse(NLO_FRAGMENT), MatrixElement::McAtNlo);
        assert_eq!(
            usage,
            SettingsUsage {
                mentions: 2,
                imports: 1,
                blocks: 1
            }
        );
        assert!(usage.is_complete());

        let usage = SettingsUsage::scan(&Fragment::parse(NLO_FRAGMENT), MatrixElement::Powheg);
        assert!(usage.is_absent());
    }

    #[test]
    fn test_nlo_with_complete_settings() {
        let usage = SettingsUsage::scan(&Fragment::parse(NLO_FRAGMENT), MatrixElement::McAtNlo);
        let mut findings = Findings::new();
        check_consistency(MatrixElement::McAtNlo, &usage, &facts(3), 100, &mut findings);
        assert_eq!(findings.count(Severity::Ok), 1);
        assert!(findings.warnings() == 0 && findings.errors() == 0);
    }

    #[test]
    fn test_powheg_default_matching_without_checklimits() {
        let usage = SettingsUsage {
            mentions: 2,
            imports: 1,
            blocks: 1,
        };
        let mut findings = Findings::new();
        check_consistency(
            MatrixElement::Powheg,
            &usage,
            &GridpackFacts::default(),
            100,
            &mut findings,
        );
        assert_eq!(findings.count(Severity::Ok), 1);
        assert_eq!(findings.warnings(), 1);
    }

    #[test]
    fn test_lo_mlm_without_nlo_settings() {
        let mut findings = Findings::new();
        check_consistency(
            MatrixElement::Madgraph,
            &SettingsUsage::default(),
            &facts(1),
            4,
            &mut findings,
        );
        assert_eq!(findings.count(Severity::Ok), 1);
        assert_eq!(findings.warnings(), 1);
        assert!(findings.iter().nth(1).unwrap().message.contains("=4"));
    }

    #[test]
    fn test_lo_with_nlo_settings_gets_hint() {
        let usage = SettingsUsage::scan(&Fragment::parse(NLO_FRAGMENT), MatrixElement::Madgraph);
        let mut findings = Findings::new();
        check_consistency(MatrixElement::Madgraph, &usage, &facts(1), 4, &mut findings);
        assert_eq!(findings.errors(), 1);
        assert_eq!(findings.iter().next().unwrap().details.len(), 2);
    }

    #[test]
    fn test_nlo_without_matching_loop_induced_is_error() {
        let usage = SettingsUsage::scan(&Fragment::parse(NLO_FRAGMENT), MatrixElement::McAtNlo);
        let facts = GridpackFacts {
            matching: 0,
            loop_induced: true,
            has_checklimits: false,
        };
        let mut findings = Findings::new();
        check_consistency(MatrixElement::McAtNlo, &usage, &facts, 100, &mut findings);
        assert_eq!(findings.errors(), 1);
    }

    #[test]
    fn test_powheg_without_settings_warns_about_loop_induced() {
        let mut findings = Findings::new();
        check_consistency(
            MatrixElement::Powheg,
            &SettingsUsage::default(),
            &GridpackFacts::default(),
            100,
            &mut findings,
        );
        assert_eq!(findings.errors(), 1);
        assert_eq!(findings.warnings(), 1);
    }
}
