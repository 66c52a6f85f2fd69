//! Integration tests for the public report and request types.
//!
//! Exercises the types the CLI serializes and the documents the service returns.

use fragcheck_core::{
    CmsswRelease, Findings, McmRequest, RequestReport, Severity, SkipReason, Ticket, TicketEntry,
};

#[test]
fn test_request_document_from_service() {
    let json = r#"{
        "prepid": "HIG-RunIIFall18wmLHEGS-01234",
        "dataset_name": "GluGluHToZZTo4L_M125_13TeV_powheg2_JHUGenV7011_pythia8",
        "status": "defined",
        "time_event": [12.5, 20.0],
        "total_events": 500000,
        "cmssw_release": "CMSSW_10_2_3",
        "memory": 2300,
        "generator_parameters": [
            {"filter_efficiency": 1.0, "match_efficiency": 1.0, "cross_section": 1.0},
            {"filter_efficiency": 0.5, "match_efficiency": 1.0, "cross_section": 1.0}
        ],
        "approval": "define"
    }"#;

    let request: McmRequest = serde_json::from_str(json).unwrap();
    assert!(request.is_defined());
    assert!((request.time_per_event() - 20.0).abs() < f64::EPSILON);
    assert!((request.filter_efficiency() - 0.5).abs() < f64::EPSILON);
    assert!(CmsswRelease::parse(&request.cmssw_release).is_standard());
}

#[test]
fn test_ticket_document_from_service() {
    let json = r#"{
        "prepid": "HIG-2018Nov01-00001",
        "requests": [
            ["HIG-RunIIFall18wmLHEGS-00001", "HIG-RunIIFall18wmLHEGS-00010"],
            "HIG-RunIIFall18wmLHEGS-00042"
        ]
    }"#;

    let ticket: Ticket = serde_json::from_str(json).unwrap();
    assert!(matches!(ticket.requests[0], TicketEntry::Range(..)));
    assert_eq!(
        ticket.range_query(),
        "HIG-RunIIFall18wmLHEGS-00001 -> HIG-RunIIFall18wmLHEGS-00010\nHIG-RunIIFall18wmLHEGS-00042\n"
    );
}

#[test]
fn test_report_json_shape() {
    let mut findings = Findings::new();
    findings.ok("Tune configuration probably OK in the fragment");
    findings
        .error("MG5_aMC@NLO multi-run patch missing in gridpack - please re-create a gridpack")
        .detail("using updated genproductions area");

    let report = RequestReport::checked(
        "SMP-RunIIFall18wmLHEGS-00001",
        "WJetsToLNu_TuneCP5_13TeV-madgraphMLM-pythia8",
        "defined",
        findings,
    );
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["prepid"], "SMP-RunIIFall18wmLHEGS-00001");
    assert_eq!(json["outcome"], "checked");
    assert_eq!(json["findings"][1]["severity"], "error");
    assert_eq!(json["findings"][1]["details"][0], "using updated genproductions area");

    let back: RequestReport = serde_json::from_value(json).unwrap();
    assert_eq!(back.errors(), 1);
    assert_eq!(back.findings().unwrap().count(Severity::Ok), 1);
}

#[test]
fn test_skipped_report_json_shape() {
    let report = RequestReport::skipped(
        "SMP-RunIIFall18wmLHEGS-00001",
        "WJetsToLNu_TuneCP5_13TeV-madgraphMLM-pythia8",
        "approved",
        SkipReason::NotDefined {
            status: "approved".to_string(),
        },
    );
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["outcome"], "skipped");
    assert_eq!(json["skip"]["reason"], "not_defined");
    assert_eq!(report.exit_code(), 0);
}
