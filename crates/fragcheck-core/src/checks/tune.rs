//! Pythia tune configuration.

use crate::domain::{Fragment, McmRequest};
use crate::report::Findings;

/// Tunes recognised in fragments. CP5 variations come last.
pub const TUNES: [&str; 8] = [
    "CP5",
    "CUEP8M1",
    "CP1",
    "CP2",
    "CP3",
    "CP4",
    "CP5TuneUp",
    "CP5TuneDown",
];

/// A complete tune shows up on three lines: import, block and parameter set.
const COMPLETE_TUNE: usize = 3;

/// Per-tune count of mentioning lines, ignoring comments and annotations.
pub fn tune_counts(fragment: &Fragment) -> [usize; 8] {
    let lines: Vec<String> = fragment
        .text()
        .lines()
        .filter(|line| !line.contains('#') && !line.contains("annotation"))
        .map(str::to_ascii_lowercase)
        .collect();

    TUNES.map(|tune| {
        let tune = tune.to_ascii_lowercase();
        lines.iter().filter(|line| line.contains(&tune)).count()
    })
}

pub fn check_tune(fragment: &Fragment, request: &McmRequest, findings: &mut Findings) {
    let counts = tune_counts(fragment);
    let sherpa = request.dataset_lower().contains("sherpa");
    let complete = counts.contains(&COMPLETE_TUNE);

    if (counts[6] == COMPLETE_TUNE || counts[7] == COMPLETE_TUNE) && counts[0] != COMPLETE_TUNE {
        findings.warning("Check if there is some extra tune setting");
    }

    if sherpa {
        findings.warning("No automated check of Sherpa ps/tune parameters yet");
    }

    if !complete {
        if !sherpa {
            findings
                .error("Tune configuration may be wrong in the fragment")
                .detail("or pythia8CUEP8M1Settings are overwritten by some other parameters as in CUETP8M2T4");
        }
        return;
    }

    findings.ok("Tune configuration probably OK in the fragment");
    if counts[0] > 2 && !request.in_campaign("Fall18") && !request.in_campaign("Fall17") {
        findings.warning(format!(
            "Do you really want to have tune {} in this campaign?",
            TUNES[0]
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Severity;

    const CP5_FRAGMENT: &str = "\
from Configuration.Generator.MCTunes2017.PythiaCP5Settings_cfi import *
generator = cms.EDFilter('Pythia8HadronizerFilter',
    PythiaParameters = cms.PSet(
        pythia8CP5SettingsBlock,
        parameterSets = cms.vstring('pythia8CP5Settings')
    )
)
";

    fn request(prepid: &str, dataset: &str) -> McmRequest {
        McmRequest {
            prepid: prepid.to_string(),
            dataset_name: dataset.to_string(),
            status: "defined".to_string(),
            time_event: Vec::new(),
            total_events: 0,
            cmssw_release: String::new(),
            memory: 2300,
            generator_parameters: Vec::new(),
        }
    }

    #[test]
    fn test_counts_skip_annotations() {
        let fragment = Fragment::parse(
            "configurationMetadata = cms.untracked.PSet(annotation = cms.untracked.string('CP5'))\nx = 'CP5' # inline\n",
        );
        assert_eq!(tune_counts(&fragment)[0], 0);
    }

    #[test]
    fn test_cp5_in_fall17_is_ok() {
        let mut findings = Findings::new();
        check_tune(
            &Fragment::parse(CP5_FRAGMENT),
            &request("TOP-RunIIFall17wmLHEGS-00001", "TT_TuneCP5_13TeV-powheg-pythia8"),
            &mut findings,
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(findings.count(Severity::Ok), 1);
    }

    #[test]
    fn test_cp5_outside_fall_campaigns_warns() {
        let mut findings = Findings::new();
        check_tune(
            &Fragment::parse(CP5_FRAGMENT),
            &request("TOP-RunIISummer15wmLHEGS-00001", "TT_TuneCP5_13TeV-powheg-pythia8"),
            &mut findings,
        );
        assert_eq!(findings.warnings(), 1);
    }

    #[test]
    fn test_missing_tune_is_error() {
        let mut findings = Findings::new();
        check_tune(
            &Fragment::parse("generator = cms.EDFilter('Pythia8HadronizerFilter')\n"),
            &request("TOP-RunIIFall17wmLHEGS-00001", "TT_13TeV-powheg-pythia8"),
            &mut findings,
        );
        assert_eq!(findings.errors(), 1);
    }

    #[test]
    fn test_sherpa_warns_without_error() {
        let mut findings = Findings::new();
        check_tune(
            &Fragment::parse("generator = cms.EDFilter('SherpaGeneratorFilter')\n"),
            &request("SMP-RunIIFall17GS-00001", "ZJets_13TeV-sherpa"),
            &mut findings,
        );
        assert_eq!(findings.warnings(), 1);
        assert_eq!(findings.errors(), 0);
    }
}
