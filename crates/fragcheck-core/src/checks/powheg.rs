//! Checks on unpacked POWHEG gridpacks.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::GridpackContents;
use crate::report::Findings;

pub const CHECKLIMITS_FILE: &str = "pwhg_checklimits";
pub const RUNCMSGRID_FILE: &str = "runcmsgrid.sh";
pub const POWHEG_INPUT_FILE: &str = "powheg.input";

/// Process whose integration grid needs the high-mass settings.
const QUARK_MASS_EFFECTS: &str = "gg_H_quark-mass-effects";

/// Minimum integration settings for `gg_H_quark-mass-effects` above ~150 GeV.
const QUARK_MASS_EFFECTS_MINIMA: &[(&str, u64)] = &[
    ("ncall1", 550_000),
    ("itmx1", 7),
    ("ncall2", 75_000),
    ("itmx2", 5),
    ("foldcsi", 2),
    ("foldy", 5),
    ("foldphi", 2),
];

static PROCESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"process=["']?([^"'\s]*)"#).expect("process regex is valid")
});

/// Number of final-state particles (before decays) listed by `pwhg_checklimits`.
pub fn final_state_particles(checklimits: &str) -> Option<usize> {
    let line = checklimits.lines().find(|l| l.contains("emitter"))?;
    let line = line.replace("process", "");
    let field = line.split(',').nth(1)?;
    Some(
        field
            .split_whitespace()
            .skip(2)
            .filter(|token| *token != "0")
            .count(),
    )
}

/// Value of `process=` in `runcmsgrid.sh`.
pub fn powheg_process(runcmsgrid: &str) -> Option<String> {
    PROCESS
        .captures(runcmsgrid)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Compare `POWHEG:nFinal` with the particles in `pwhg_checklimits`, when shipped.
///
/// Returns whether the file was present.
pub fn check_final_state(gridpack: &GridpackContents, n_final: u32, findings: &mut Findings) -> bool {
    let Some(text) = gridpack.read(CHECKLIMITS_FILE) else {
        return false;
    };
    tracing::debug!("Reading powheg {CHECKLIMITS_FILE}");

    let Some(particles) = final_state_particles(&text) else {
        findings.warning(format!("No emitter line found in {CHECKLIMITS_FILE}"));
        return true;
    };

    if usize::try_from(n_final).is_ok_and(|n| n == particles) {
        findings.ok(format!(
            "nFinal(={n_final}) is equal to the number of final state particles before decays (={particles})"
        ));
    } else {
        findings.error(format!(
            "nFinal(={n_final}) is NOT equal to the number of final state particles before decays (={particles})"
        ));
    }
    true
}

/// Integration grid settings for processes known to need them.
pub fn check_integration_grid(gridpack: &GridpackContents, findings: &mut Findings) {
    let process = gridpack
        .read(RUNCMSGRID_FILE)
        .and_then(|text| powheg_process(&text));

    let Some(process) = process else {
        findings.warning(format!("Didn't find powheg process in {RUNCMSGRID_FILE}"));
        return;
    };
    tracing::debug!(%process, "POWHEG process");

    if process != QUARK_MASS_EFFECTS {
        return;
    }

    let input = gridpack.read(POWHEG_INPUT_FILE).unwrap_or_default();
    let mut bad = false;
    for (name, desired) in QUARK_MASS_EFFECTS_MINIMA {
        match input_value(&input, name) {
            Some(actual) if actual < *desired => {
                bad = true;
                findings.warning(format!(
                    "{name} = {actual}, should be at least {desired} (may be ok if hmass < 150 GeV, please check!)"
                ));
            }
            Some(_) => {}
            None => {
                bad = true;
                findings.error(format!("didn't find {name} in {POWHEG_INPUT_FILE}"));
            }
        }
    }

    if !bad {
        findings.ok(format!(
            "integration grid setup looks ok for {QUARK_MASS_EFFECTS}"
        ));
    }
}

/// Integer value of a `name value` line at the start of a line.
fn input_value(input: &str, name: &str) -> Option<u64> {
    let pattern = format!(r"(?m)^{} *([0-9]+)", regex::escape(name));
    let re = Regex::new(&pattern).ok()?;
    re.captures(input)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const CHECKLIMITS: &str = "\
 total number of points:    12345
 emitter  0 process    21  21  25   6  -6 , 0  0  25   6  -6
 emitter  1 process    21  21  25   6  -6   21, 0  0  25 6 -6 21
";

    #[test]
    fn test_final_state_particles() {
        assert_eq!(final_state_particles(CHECKLIMITS), Some(3));
        assert_eq!(final_state_particles("no emitters\n"), None);
    }

    #[test]
    fn test_final_state_counts_non_zero_after_two() {
        let text = " emitter 0 process 1 2 3 , 21 21 25 6 -6 0\n";
        assert_eq!(final_state_particles(text), Some(3));
    }

    #[test]
    fn test_powheg_process() {
        assert_eq!(
            powheg_process("#!/bin/bash\nprocess=\"gg_H_quark-mass-effects\"\n").as_deref(),
            Some("gg_H_quark-mass-effects")
        );
        assert_eq!(powheg_process("process=hvq\n").as_deref(), Some("hvq"));
        assert_eq!(powheg_process("echo nothing\n"), None);
    }

    #[test]
    fn test_check_final_state_mismatch() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CHECKLIMITS_FILE), CHECKLIMITS).unwrap();
        let gridpack = GridpackContents::new(dir.path());

        let mut findings = Findings::new();
        assert!(check_final_state(&gridpack, 3, &mut findings));
        assert_eq!(findings.errors(), 0);

        let mut findings = Findings::new();
        assert!(check_final_state(&gridpack, 1, &mut findings));
        assert_eq!(findings.errors(), 1);
    }

    #[test]
    fn test_check_final_state_absent() {
        let dir = tempdir().unwrap();
        let mut findings = Findings::new();
        assert!(!check_final_state(&GridpackContents::new(dir.path()), 1, &mut findings));
        assert!(findings.is_empty());
    }

    #[test]
    fn test_integration_grid_for_quark_mass_effects() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(RUNCMSGRID_FILE),
            "process=\"gg_H_quark-mass-effects\"\n",
        )
        .unwrap();
        fs::write(
            dir.path().join(POWHEG_INPUT_FILE),
            "ncall1 50000\nitmx1 7\nncall2 75000\nitmx2 5\nfoldcsi 2\nfoldy 5\n",
        )
        .unwrap();

        let mut findings = Findings::new();
        check_integration_grid(&GridpackContents::new(dir.path()), &mut findings);
        assert_eq!(findings.warnings(), 1);
        assert_eq!(findings.errors(), 1);
    }

    #[test]
    fn test_integration_grid_missing_process() {
        let dir = tempdir().unwrap();
        let mut findings = Findings::new();
        check_integration_grid(&GridpackContents::new(dir.path()), &mut findings);
        assert_eq!(findings.warnings(), 1);
    }
}
