mod common;

use chrono::NaiveDate;
use common::fixtures::{MALFORMED, MIXED, NET_RETRY, NO_SUITE, PASSING, SKIP_ONLY, write_file};
use gtest_report::aggregate::{Rate, parse_many, suite_rollup};
use gtest_report::model::{CaseStatus, SuiteStatus};
use gtest_report::util::expand_inputs;
use gtest_report::{ReportError, parser};
use tempfile::TempDir;

#[test]
fn batch_over_three_files() {
    let _log = common::test_log("batch_over_three_files");
    let temp = TempDir::new().expect("tempdir");
    let paths = vec![
        write_file(temp.path(), "mixed.xml", MIXED),
        write_file(temp.path(), "passing.xml", PASSING),
        write_file(temp.path(), "skip.xml", SKIP_ONLY),
    ];

    let batch = parse_many(&paths).expect("parse batch");
    assert_eq!(batch.records.len(), 3);
    assert_eq!(batch.total, 7);
    assert_eq!(batch.failures, 1);
    assert_eq!(batch.skipped, 2);
    assert_eq!(batch.timestamps.len(), 2);

    let summary = batch.summary();
    assert_eq!(summary.executed, 5);
    assert_eq!(summary.passed, 4);
    assert_eq!(summary.skip_with_reason, 1);
    assert_eq!(summary.skip_without_reason, 1);
    assert_eq!(
        summary.earliest_timestamp,
        NaiveDate::from_ymd_opt(2024, 4, 30).and_then(|d| d.and_hms_opt(8, 30, 0))
    );
    assert_eq!(summary.pass_rate().display_or("N/A"), "57.1");
    assert_eq!(summary.execution_rate().display_or("N/A"), "71.4");
    assert_eq!(summary.accounted_execution_rate().display_or("N/A"), "85.7");
}

#[test]
fn mixed_file_case_details() {
    let _log = common::test_log("mixed_file_case_details");
    let temp = TempDir::new().expect("tempdir");
    let path = write_file(temp.path(), "mixed.xml", MIXED);

    let record = parser::parse_file(&path).expect("parse");
    assert_eq!(record.source_name, "mixed.xml");
    let names: Vec<_> = record.cases.iter().map(|c| c.full_name.as_str()).collect();
    assert_eq!(names, ["Net.Connect", "Net.Timeout", "Disk.Read", "Disk.Write"]);

    let failed: Vec<_> = record.failed().collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].failure_detail, "net.cpp:42\nExpected: 1\n  Actual: 2");
    assert_eq!(record.cases[3].status, CaseStatus::Skipped);
    assert_eq!(record.cases[3].failure_detail, "needs root");
    assert!((record.total_duration_seconds - 0.42).abs() < 1e-9);
}

#[test]
fn first_bad_file_aborts_batch() {
    let _log = common::test_log("first_bad_file_aborts_batch");
    let temp = TempDir::new().expect("tempdir");
    let paths = vec![
        write_file(temp.path(), "a.xml", PASSING),
        write_file(temp.path(), "b.xml", MALFORMED),
        write_file(temp.path(), "c.xml", NO_SUITE),
    ];

    let err = parse_many(&paths).unwrap_err();
    match err {
        ReportError::Parse { path, .. } => assert!(path.ends_with("b.xml")),
        other => panic!("expected parse error, got {other:?}"),
    }

    let err = parse_many(&paths[2..]).unwrap_err();
    assert!(matches!(err, ReportError::Structure { .. }));
}

#[test]
fn empty_batch_has_no_rates() {
    let batch = parse_many::<&str>(&[]).expect("empty batch");
    let summary = batch.summary();
    assert_eq!(summary.total, 0);
    assert_eq!(summary.pass_rate(), Rate::NotApplicable);
    assert_eq!(summary.earliest_timestamp, None);
}

#[test]
fn expand_inputs_sorts_directory_entries() {
    let temp = TempDir::new().expect("tempdir");
    let dir = temp.path().join("results");
    write_file(&dir, "b.xml", PASSING);
    write_file(&dir, "a.xml", PASSING);
    write_file(&dir, "notes.txt", "ignored");
    let single = write_file(temp.path(), "single.xml", MIXED);

    let files = expand_inputs(&[dir, single.clone()]).expect("expand");
    let names: Vec<_> = files
        .iter()
        .map(|p| p.file_name().and_then(|n| n.to_str()).unwrap_or_default())
        .collect();
    assert_eq!(names, ["a.xml", "b.xml", "single.xml"]);

    let err = expand_inputs(&[temp.path().join("missing")]).unwrap_err();
    assert!(matches!(err, ReportError::InputNotFound { .. }));
}

#[test]
fn rollup_across_files() {
    let temp = TempDir::new().expect("tempdir");
    let paths = vec![
        write_file(temp.path(), "mixed.xml", MIXED),
        write_file(temp.path(), "skip.xml", SKIP_ONLY),
        write_file(temp.path(), "net_retry.xml", NET_RETRY),
    ];
    let batch = parse_many(&paths).expect("parse");
    let rollup = suite_rollup(&batch.records);

    assert_eq!(rollup.suite_total, 3);
    assert_eq!(rollup.suite_failures, 1);
    assert_eq!(rollup.suite_skipped, 1);
    assert_eq!(rollup.suite_passed(), 1);
    let statuses: Vec<_> = rollup
        .suites
        .iter()
        .map(|s| (s.name.as_str(), s.status, s.case_count))
        .collect();
    assert_eq!(
        statuses,
        [
            ("Net", SuiteStatus::Failed, 3),
            ("Disk", SuiteStatus::Passed, 2),
            ("Gpu", SuiteStatus::Skipped, 1)
        ]
    );

    let retry = &rollup.suites_by_file[2];
    assert_eq!(retry.source_name, "net_retry.xml");
    assert_eq!(retry.suites[0].failed_count, 0);
    assert_eq!(retry.suites[0].status, SuiteStatus::Failed);
}
