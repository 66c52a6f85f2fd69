//! Checks on unpacked MG5_aMC gridpacks.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{CmsswRelease, GridpackContents, TMPDIR_FIX_ANY};
use crate::report::Findings;

/// Proc card locations, most specific first.
pub const PROC_CARDS: [&str; 3] = [
    "process/Cards/proc_card_mg5.dat",
    "process/Cards/proc_card.dat",
    "process/madevent/Cards/proc_card_mg5.dat",
];

/// Run card locations, in lookup order.
pub const RUN_CARDS: [&str; 2] = [
    "process/madevent/Cards/run_card.dat",
    "process/Cards/run_card.dat",
];

pub const RUNCMSGRID_FILE: &str = "runcmsgrid.sh";
const TEMPLATE_REFINE: &str = "mgbasedir/Template/LO/SubProcesses/refine.sh";
const PROCESS_REFINE: &str = "process/madevent/SubProcesses/refine.sh";

const MULTI_RUN_MARKER: &str = "FORCE IT TO";
const TMPDIR_MARKER: &str = "_CONDOR_SCRATCH_DIR";

/// Line added to `runcmsgrid.sh` by the many-threads patch.
pub const MANY_THREADS_MARKER: &str = "To overcome problem of taking toomanythreads";

static SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" +").expect("space regex is valid"));

static FIRST_INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("integer regex is valid"));

/// What the proc card says about the hard process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcCard {
    /// Card path relative to the gridpack root.
    pub path: &'static str,
    /// `noborn=QCD` (loop-induced process).
    pub loop_induced: bool,
    /// Highest number of jet-like partons (`j`, `b`, `c`) in the process definition.
    pub jets: usize,
    /// The `generate` line carries an `@` process tag.
    pub tagged_generate: bool,
}

impl ProcCard {
    /// Locate and read the proc card of an unpacked gridpack.
    pub fn find(gridpack: &GridpackContents) -> Option<Self> {
        PROC_CARDS.iter().find_map(|path| {
            gridpack
                .read(path)
                .map(|text| Self::parse(path, &text))
        })
    }

    pub fn parse(path: &'static str, text: &str) -> Self {
        let generate = lines_with(text, "generate");
        let process = lines_with(text, "process");
        let generate_tags = generate.matches('@').count();
        let process_tags = process.matches('@').count();

        let jets = if generate_tags < process_tags {
            process
                .rsplit("add process")
                .next()
                .unwrap_or_default()
                .split(',')
                .map(count_partons)
                .max()
                .unwrap_or_default()
        } else {
            count_partons(&generate.replace("generate", ""))
        };

        Self {
            path,
            loop_induced: text.lines().any(|l| l.contains("noborn=QCD")),
            jets,
            tagged_generate: generate_tags > 0,
        }
    }
}

fn lines_with(text: &str, needle: &str) -> String {
    text.lines()
        .filter(|l| l.contains(needle))
        .collect::<Vec<_>>()
        .join("\n")
}

fn count_partons(piece: &str) -> usize {
    piece.matches(['j', 'b', 'c']).count()
}

/// `JetMatching:nJetMax` against the jet multiplicity of the proc card.
pub fn check_jet_multiplicity(
    card: &ProcCard,
    n_jet_max: u32,
    dataset_lower: &str,
    findings: &mut Findings,
) {
    let jets = card.jets;
    if usize::try_from(n_jet_max).is_ok_and(|n| n == jets) {
        findings.ok(format!(
            "nJetMax(={n_jet_max}) is equal to the number of jets in the process(={jets})"
        ));
        return;
    }

    if dataset_lower.contains(&format!("{jets}jet")) {
        findings
            .warning(format!(
                "nJetMax(={n_jet_max}) is not equal to the number of jets specified in the proc card(={jets})."
            ))
            .detail("Is it because this is an exclusive production with additional samples with higher multiplicity generated separately?");
    } else if card.tagged_generate {
        findings.warning(format!(
            "nJetMax(={n_jet_max}) is NOT equal to the number of jets specified in the proc card(={jets})"
        ));
    }
}

/// Values read from the run card.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunCard {
    /// `ickkw` (0 none, 1 MLM, 2 shower-kt, 3 FxFx, ...).
    pub ickkw: Option<u32>,
    pub bwcutoff: Option<f64>,
}

impl RunCard {
    /// Locate and read the run card; `None` means this is not an MG5_aMC gridpack.
    pub fn find(gridpack: &GridpackContents) -> Option<Self> {
        RUN_CARDS
            .iter()
            .find_map(|path| gridpack.read(path))
            .map(|text| Self::parse(&text))
    }

    pub fn parse(text: &str) -> Self {
        let mut card = Self::default();
        for line in text.lines() {
            let line = SPACES.replace_all(line, " ");
            if card.ickkw.is_none() && line.contains("= ickkw") {
                card.ickkw = FIRST_INTEGER
                    .find(&line)
                    .and_then(|m| m.as_str().parse().ok());
            }
            if card.bwcutoff.is_none() && line.contains("= bwcutoff") {
                card.bwcutoff = line
                    .split_whitespace()
                    .next()
                    .and_then(|v| v.parse().ok());
            }
        }
        card
    }
}

/// `bwcutoff` and matching efficiency checks. Returns the matching mode when set.
pub fn check_run_card(
    card: &RunCard,
    max_bwcutoff: f64,
    match_efficiency: f64,
    findings: &mut Findings,
) -> Option<u32> {
    if let Some(bw) = card.bwcutoff.filter(|bw| *bw > max_bwcutoff) {
        findings.warning(format!(
            "bwcutoff set to {bw}. Note that large bwcutoff values can cause problems in production."
        ));
    }

    let matching = card.ickkw?;
    #[allow(clippy::float_cmp)] // the service stores exactly 1 for unmatched samples
    let unit_efficiency = match_efficiency == 1.0;
    if matches!(matching, 1 | 2) && unit_efficiency {
        findings.warning("Matched sample but matching efficiency is 1!");
    }
    Some(matching)
}

/// Multi-run and tmpdir patches of leading-order gridpacks.
pub fn check_lo_patches(
    gridpack: &GridpackContents,
    release: &CmsswRelease,
    findings: &mut Findings,
) {
    let multi_run = gridpack.count_lines(RUNCMSGRID_FILE, MULTI_RUN_MARKER);
    let template_tmpdir = gridpack.count_lines(TEMPLATE_REFINE, TMPDIR_MARKER);
    let process_tmpdir = gridpack.count_lines(PROCESS_REFINE, TMPDIR_MARKER);

    if multi_run == 1 && template_tmpdir == 1 && process_tmpdir == 1 {
        findings.ok("MG5_aMC@NLO leading order patches OK in gridpack");
    }
    if multi_run != 1 {
        findings
            .error("MG5_aMC@NLO multi-run patch missing in gridpack - please re-create a gridpack")
            .detail("using updated genproductions area");
    }

    if template_tmpdir > 0 && process_tmpdir > 0 {
        return;
    }
    if let Some(minimum) = release.tmpdir_fix_missing() {
        let hint = if minimum == TMPDIR_FIX_ANY {
            format!("Please use {minimum}")
        } else {
            format!("In this release, please at least use {minimum}")
        };
        findings
            .error("At least one of the MG5_aMC@NLO tmpdir patches is missing.")
            .detail(format!(
                "And the request is using a version {release} that does not contain the patch."
            ))
            .detail(hint);
    }
}

/// Whether an unpacked gridpack carries the many-threads fix.
pub fn has_many_threads_patch(gridpack: &GridpackContents) -> bool {
    gridpack.count_lines(RUNCMSGRID_FILE, MANY_THREADS_MARKER) == 1
}

/// Report the many-threads fix state of the cvmfs copy and its EOS source.
///
/// Returns `false` when EOS lacks the patch.
pub fn report_many_threads(cvmfs_patched: bool, eos_patched: bool, findings: &mut Findings) -> bool {
    if eos_patched {
        findings.ok("MG5_aMC@NLO LO nthreads patch OK in EOS");
    }
    if cvmfs_patched {
        findings.ok("MG5_aMC@NLO LO nthreads patch OK in CVMFS");
    } else if eos_patched {
        findings.ok(
            "MG5_aMC@NLO LO nthreads patch not made in CVMFS but done in EOS waiting for CVMFS-EOS synch",
        );
    }
    if !eos_patched {
        findings.error("MG5_aMC@NLO LO nthreads patch not made in EOS");
    }
    eos_patched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Severity;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    const MLM_PROC_CARD: &str = "\
import model sm-no_b_mass
define p = g u c d s u~ c~ d~ s~ b b~
define j = p
generate p p > w+, w+ > l+ vl @0
add process p p > w+ j, w+ > l+ vl @1
add process p p > w+ j j, w+ > l+ vl @2
output WJetsToLNu -nojpeg
";

    const SINGLE_PROC_CARD: &str = "\
import model loop_sm
generate g g > z h [noborn=QCD]
output ggZH
";

    const RUN_CARD: &str = "\
#*********************************************************************
  1   =   ickkw            ! 0 no matching, 1 MLM
  15.0  = bwcutoff      ! (M+/-bwcutoff*Gamma)
";

    fn write(root: &Path, relative: &str, text: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }

    #[test]
    fn test_proc_card_with_add_process() {
        let card = ProcCard::parse(PROC_CARDS[0], MLM_PROC_CARD);
        assert!(!card.loop_induced);
        assert!(card.tagged_generate);
        assert_eq!(card.jets, 2);
    }

    #[test]
    fn test_proc_card_single_generate() {
        let card = ProcCard::parse(PROC_CARDS[0], SINGLE_PROC_CARD);
        assert!(card.loop_induced);
        assert!(!card.tagged_generate);
        assert_eq!(card.jets, 1);
    }

    #[test]
    fn test_proc_card_priority() {
        let dir = tempdir().unwrap();
        write(dir.path(), PROC_CARDS[2], SINGLE_PROC_CARD);
        write(dir.path(), PROC_CARDS[0], MLM_PROC_CARD);

        let card = ProcCard::find(&GridpackContents::new(dir.path())).unwrap();
        assert_eq!(card.path, PROC_CARDS[0]);
        assert_eq!(card.jets, 2);
    }

    #[test]
    fn test_jet_multiplicity_messages() {
        let card = ProcCard::parse(PROC_CARDS[0], MLM_PROC_CARD);

        let mut findings = Findings::new();
        check_jet_multiplicity(&card, 2, "wjetstolnu", &mut findings);
        assert_eq!(findings.count(Severity::Ok), 1);

        let mut findings = Findings::new();
        check_jet_multiplicity(&card, 4, "wjetstolnu", &mut findings);
        assert_eq!(findings.warnings(), 1);

        let mut findings = Findings::new();
        check_jet_multiplicity(&card, 4, "w2jetstolnu", &mut findings);
        assert_eq!(findings.iter().next().unwrap().details.len(), 1);
    }

    #[test]
    fn test_run_card_parse() {
        let card = RunCard::parse(RUN_CARD);
        assert_eq!(card.ickkw, Some(1));
        assert_eq!(card.bwcutoff, Some(15.0));
    }

    #[test]
    fn test_run_card_checks() {
        let card = RunCard {
            ickkw: Some(1),
            bwcutoff: Some(25.0),
        };
        let mut findings = Findings::new();
        assert_eq!(check_run_card(&card, 15.0, 1.0, &mut findings), Some(1));
        assert_eq!(findings.warnings(), 2);

        let mut findings = Findings::new();
        assert_eq!(check_run_card(&card, 30.0, 0.4, &mut findings), Some(1));
        assert!(findings.is_empty());
    }

    #[test]
    fn test_lo_patches_present() {
        let dir = tempdir().unwrap();
        write(dir.path(), RUNCMSGRID_FILE, "# FORCE IT TO 1 core\n");
        write(dir.path(), TEMPLATE_REFINE, "cd $_CONDOR_SCRATCH_DIR\n");
        write(dir.path(), PROCESS_REFINE, "cd $_CONDOR_SCRATCH_DIR\n");

        let mut findings = Findings::new();
        check_lo_patches(
            &GridpackContents::new(dir.path()),
            &CmsswRelease::parse("CMSSW_9_3_0"),
            &mut findings,
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(findings.count(Severity::Ok), 1);
    }

    #[test]
    fn test_lo_patches_missing_with_old_release() {
        let dir = tempdir().unwrap();
        let mut findings = Findings::new();
        check_lo_patches(
            &GridpackContents::new(dir.path()),
            &CmsswRelease::parse("CMSSW_7_1_30"),
            &mut findings,
        );
        assert_eq!(findings.errors(), 2);
        let tmpdir = findings.iter().nth(1).unwrap();
        assert!(tmpdir.details[1].contains("CMSSW_7_1_32_patch1"));
    }

    #[test]
    fn test_lo_tmpdir_patch_not_needed_for_new_release() {
        let dir = tempdir().unwrap();
        write(dir.path(), RUNCMSGRID_FILE, "FORCE IT TO\n");

        let mut findings = Findings::new();
        check_lo_patches(
            &GridpackContents::new(dir.path()),
            &CmsswRelease::parse("CMSSW_10_2_3"),
            &mut findings,
        );
        assert!(findings.is_empty());
    }

    #[test]
    fn test_many_threads_report() {
        let mut findings = Findings::new();
        assert!(report_many_threads(false, true, &mut findings));
        assert_eq!(findings.count(Severity::Ok), 2);

        let mut findings = Findings::new();
        assert!(!report_many_threads(true, false, &mut findings));
        assert_eq!(findings.errors(), 1);
    }

    #[test]
    fn test_many_threads_marker() {
        let dir = tempdir().unwrap();
        write(
            dir.path(),
            RUNCMSGRID_FILE,
            "# To overcome problem of taking toomanythreads\nexport OMP_NUM_THREADS=1\n",
        );
        assert!(has_many_threads_patch(&GridpackContents::new(dir.path())));
    }
}
