//! Checks on the request document itself (timing, size, release, resources).

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{CmsswRelease, McmRequest};
use crate::report::Findings;
use crate::settings::Settings;

/// Generators the rule battery does not understand.
const MANUAL_GENERATORS: &[&str] = &["herwig", "comphep", "calchep"];

static THREADS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"nThreads(.*?) --").expect("threads regex is valid"));

/// Allowed memory (MB) per core count for regular campaigns.
const MEMORY_SINGLE_CORE: u64 = 2300;
const MEMORY_MULTI_CORE: u64 = 4000;

/// Memory (MB) / cores pairs for heavy-ion mixing campaigns.
const HIN_MEMORY_TABLE: &[(u64, u32)] = &[(14700, 8), (5900, 4), (4000, 2), (2300, 1)];

/// Whether the dataset uses a generator that must be checked by hand.
pub fn needs_manual_check(request: &McmRequest) -> bool {
    let name = request.dataset_lower();
    MANUAL_GENERATORS.iter().any(|g| name.contains(g))
}

/// Time per event, release and total events.
pub fn check_request_basics(request: &McmRequest, settings: &Settings, findings: &mut Findings) {
    let time_per_event = request.time_per_event();
    if time_per_event > settings.max_time_per_event {
        findings.warning(format!("Large time/event={time_per_event} - please check"));
    }

    let release = CmsswRelease::parse(&request.cmssw_release);
    if !release.is_standard() {
        findings
            .warning(format!(
                "Are you sure you want to use {release} release which is not standard"
            ))
            .detail("which may not have all the necessary GEN code.");
    }

    if request.total_events >= settings.max_total_events {
        findings.warning(format!(
            "Is {} events what you really wanted - please check!",
            request.total_events
        ));
    }
}

/// Number of threads requested by the cmsDriver command of the test script.
pub fn threads_from_test_script(script: &str) -> u32 {
    let Some(line) = script.lines().find(|l| l.contains("nThreads")) else {
        return 1;
    };
    THREADS
        .captures(line)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().trim().parse().ok())
        .unwrap_or(1)
}

/// Lines of the test script that fetch the hadronizer configuration.
pub fn hadronizer_hint(script: &str) -> String {
    script
        .lines()
        .filter(|l| l.contains("cff") && l.contains("curl"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Memory must match the number of cores requested.
pub fn check_memory(request: &McmRequest, threads: u32, findings: &mut Findings) {
    let memory = request.memory;

    if request.is_hin_mix_campaign() {
        match HIN_MEMORY_TABLE.iter().find(|(mem, _)| *mem == memory) {
            None => {
                findings.error(
                    "HIN-HINPbPbAutumn18GSHIMix or HINPbPbAutumn18wmLHEGSHIMix campaign but Memory is not 14700, 5900, 4000, or 2300 MB",
                );
            }
            Some((_, cores)) if *cores != threads => {
                findings.error(format!(
                    "Memory is {memory} MB while number of cores is {threads} but not = {cores}"
                ));
            }
            Some(_) => {}
        }
        return;
    }

    if memory != MEMORY_SINGLE_CORE && memory != MEMORY_MULTI_CORE {
        findings.error("Memory is not 2300 or 4000 MB");
    }
    if memory == MEMORY_SINGLE_CORE && threads != 1 {
        findings.error(format!(
            "Memory is {memory} MB while number of cores is {threads} but not = 1"
        ));
    }
    if memory == MEMORY_MULTI_CORE && threads == 1 {
        findings.error(format!(
            "Memory is {memory} MB while number of cores is {threads} but not = 2,4 or 8"
        ));
    }
}
