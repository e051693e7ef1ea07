mod common;

use common::cli::{Workspace, extract_json_payload, run};
use common::fixtures::{MALFORMED, MIXED, NO_SUITE, PASSING, SKIP_ONLY, write_file};
use serde_json::Value;
use std::fs;

fn seed_results(workspace: &Workspace) {
    let dir = workspace.path("results");
    write_file(&dir, "mixed.xml", MIXED);
    write_file(&dir, "passing.xml", PASSING);
    write_file(&dir, "skip.xml", SKIP_ONLY);
}

#[test]
fn e2e_report_single_page() {
    let _log = common::test_log("e2e_report_single_page");
    let workspace = Workspace::new();
    seed_results(&workspace);

    let out = run(
        &workspace,
        ["report", "results", "-p", "Demo", "-n", "Nightly", "-o", "site/report.html", "--by-suite"],
        "report",
    );
    assert!(out.status.success(), "report failed: {}", out.stderr);
    assert!(out.stdout.contains("Report generated at"));

    let html = fs::read_to_string(workspace.path("site/report.html")).expect("read report");
    assert!(html.contains("<title>Demo Nightly</title>"));
    assert!(html.contains("<tr><td>Total XML files</td><td>3</td></tr>"));
    assert!(html.contains("<tr><td>Total Tests</td><td>7</td></tr>"));
    assert!(html.contains("<tr><td>Earliest Timestamp</td><td>2024-04-30 08:30:00</td></tr>"));
    assert!(html.contains("Test Suite Summary"));
    assert!(html.contains("href=\"#detail_mixed_xml\""));
}

#[test]
fn e2e_report_json() {
    let _log = common::test_log("e2e_report_json");
    let workspace = Workspace::new();
    seed_results(&workspace);

    let out = run(
        &workspace,
        ["report", "results/mixed.xml", "-p", "Demo", "-o", "r.html", "--json"],
        "report_json",
    );
    assert!(out.status.success(), "report failed: {}", out.stderr);
    let json: Value = serde_json::from_str(&extract_json_payload(&out.stdout)).expect("json");
    assert_eq!(json["summary"]["total"], 4);
    assert_eq!(json["summary"]["skip_with_reason"], 1);
    assert!(json["output"].as_str().is_some_and(|p| p.ends_with("r.html")));
}

#[test]
fn e2e_report_bad_file_fails_whole_batch() {
    let _log = common::test_log("e2e_report_bad_file_fails_whole_batch");
    let workspace = Workspace::new();
    seed_results(&workspace);
    write_file(&workspace.path("results"), "zz_bad.xml", MALFORMED);

    let out = run(
        &workspace,
        ["report", "results", "-p", "Demo", "-o", "r.html", "--json"],
        "report_bad",
    );
    assert_eq!(out.status.code(), Some(2));
    assert!(!workspace.path("r.html").exists());
    let json: Value =
        serde_json::from_str(&extract_json_payload(&out.stderr)).expect("structured error");
    assert_eq!(json["error"]["code"], "XML_PARSE_ERROR");
    assert!(
        json["error"]["context"]["path"]
            .as_str()
            .is_some_and(|p| p.ends_with("zz_bad.xml"))
    );
}

#[test]
fn e2e_summary_text() {
    let _log = common::test_log("e2e_summary_text");
    let workspace = Workspace::new();
    seed_results(&workspace);

    let out = run(&workspace, ["summary", "results"], "summary_text");
    assert!(out.status.success(), "summary failed: {}", out.stderr);
    assert!(out.stdout.starts_with("Test Summary"));
    let line = |label: &str| {
        out.stdout
            .lines()
            .find(|l| l.trim_start().starts_with(label))
            .map(|l| l.split_whitespace().last().unwrap_or_default().to_string())
    };
    assert_eq!(line("Total tests").as_deref(), Some("7"));
    assert_eq!(line("Passed").as_deref(), Some("4"));
    assert_eq!(line("Pass rate (%)").as_deref(), Some("57.1"));
}

#[test]
fn e2e_summary_by_suite_verdict() {
    let _log = common::test_log("e2e_summary_by_suite_verdict");
    let workspace = Workspace::new();
    seed_results(&workspace);

    let out = run(&workspace, ["summary", "results", "--by-suite"], "summary_suites");
    assert!(out.status.success(), "summary failed: {}", out.stderr);
    assert!(out.stdout.contains("Suites: 4 total, 2 passed, 1 failed, 1 skipped"));
    assert!(out.stdout.contains("Verdict: failed"));

    let out = run(
        &workspace,
        ["summary", "results/passing.xml", "--by-suite"],
        "summary_suites_pass",
    );
    assert!(out.stdout.contains("Verdict: passed"));
}

#[test]
fn e2e_summary_json_rates() {
    let _log = common::test_log("e2e_summary_json_rates");
    let workspace = Workspace::new();
    seed_results(&workspace);

    let out = run(&workspace, ["summary", "results/mixed.xml", "--json"], "summary_json");
    assert!(out.status.success(), "summary failed: {}", out.stderr);
    let json: Value = serde_json::from_str(&extract_json_payload(&out.stdout)).expect("json");
    assert_eq!(json["total"], 4);
    assert_eq!(json["executed"], 3);
    assert_eq!(json["pass_rate"], 0.5);
    assert_eq!(json["execution_rate_without_skipped"], 0.75);
    assert_eq!(json["execution_rate"], 1.0);
    assert_eq!(json["earliest_timestamp"], "2024-05-01T10:00:00");
    assert!(json.get("suites").is_none());
}

#[test]
fn e2e_summary_csv_filtered() {
    let _log = common::test_log("e2e_summary_csv_filtered");
    let workspace = Workspace::new();
    seed_results(&workspace);

    let out = run(
        &workspace,
        ["summary", "results", "--csv", "--fields", "file,full_name,status", "--status", "failed"],
        "summary_csv",
    );
    assert!(out.status.success(), "summary failed: {}", out.stderr);
    let lines: Vec<_> = out.stdout.lines().collect();
    assert_eq!(lines, ["file,full_name,status", "mixed.xml,Net.Timeout,failed"]);

    let out = run(
        &workspace,
        ["summary", "results", "--csv", "--status", "bogus"],
        "summary_csv_bad_status",
    );
    assert_eq!(out.status.code(), Some(7));
}

#[test]
fn e2e_summary_input_errors() {
    let _log = common::test_log("e2e_summary_input_errors");
    let workspace = Workspace::new();
    fs::create_dir_all(workspace.path("empty")).expect("mkdir");
    write_file(&workspace.path("odd"), "other.xml", NO_SUITE);

    let out = run(&workspace, ["summary", "empty", "--json"], "summary_empty");
    assert_eq!(out.status.code(), Some(2));
    assert!(out.stderr.contains("NO_INPUTS"));

    let out = run(&workspace, ["summary", "odd", "--json"], "summary_odd");
    assert_eq!(out.status.code(), Some(2));
    assert!(out.stderr.contains("UNRECOGNIZED_STRUCTURE"));
}
