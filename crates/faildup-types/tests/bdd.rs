//! BDD-style scenario tests for faildup-types.

use faildup_types::{
    FailureGroup, FailureRecord, FailureSet, GroupReport, GroupedFailure, Outcome, ReportFormat,
    SCHEMA_VERSION, ToolInfo,
};

fn sample_report() -> GroupReport {
    let record = FailureRecord::new(
        "AssertionError: assert False",
        "test_02",
        "failing_01_.xml",
        "tests.test_me",
    );
    GroupReport {
        threshold: 0.8,
        drain: true,
        total_failures: 1,
        duplicate_ratio: 0.0,
        groups: vec![FailureGroup {
            id: 1,
            members: vec![0],
            representative: 0,
            size: 1,
            max_similarity: 0.0,
            signature: "0123456789abcdef".to_string(),
        }],
        entries: vec![GroupedFailure {
            group: 1,
            index: 0,
            record,
        }],
    }
}

#[test]
fn schema_version_is_documented_value() {
    assert_eq!(SCHEMA_VERSION, 1);
}

#[test]
fn tool_info_names_the_tool() {
    let tool = ToolInfo::current();
    assert_eq!(tool.name, "faildup");
    assert!(!tool.version.is_empty());
}

#[test]
fn given_no_failures_outcome_when_serialized_then_tag_is_snake_case() {
    let json = serde_json::to_value(Outcome::NoFailures).unwrap();
    assert_eq!(json["outcome"], "no_failures");
}

#[test]
fn given_report_outcome_when_serialized_then_report_fields_sit_beside_tag() {
    let json = serde_json::to_value(Outcome::Report(sample_report())).unwrap();
    assert_eq!(json["outcome"], "report");
    assert_eq!(json["total_failures"], 1);
    assert_eq!(json["groups"][0]["signature"], "0123456789abcdef");
}

#[test]
fn given_grouped_failure_when_serialized_then_record_is_flattened() {
    let report = sample_report();
    let json = serde_json::to_value(&report.entries[0]).unwrap();
    assert_eq!(json["group"], 1);
    assert_eq!(json["test_name"], "test_02");
    assert_eq!(json["class_name"], "tests.test_me");
    assert!(json.get("record").is_none());
}

#[test]
fn given_report_when_looking_up_group_then_id_is_used() {
    let report = sample_report();
    assert_eq!(report.group_count(), 1);
    assert!(report.group(1).is_some());
    assert!(report.group(2).is_none());
}

#[test]
fn given_two_sets_when_extended_then_order_is_preserved() {
    let mut first = FailureSet::from_records(vec![FailureRecord::new("a", "t1", "f1", "c1")]);
    let second = FailureSet::from_records(vec![FailureRecord::new("b", "t2", "f2", "c2")]);
    first.extend(second);
    let names: Vec<_> = first.records().into_iter().map(|r| r.test_name).collect();
    assert_eq!(names, vec!["t1", "t2"]);
}

#[test]
fn report_format_uses_kebab_case_in_json() {
    let json = serde_json::to_string(&ReportFormat::Text).unwrap();
    assert_eq!(json, "\"text\"");
    let parsed: ReportFormat = serde_json::from_str("\"md\"").unwrap();
    assert_eq!(parsed, ReportFormat::Md);
}

#[test]
fn given_serialized_set_when_deserialized_then_columns_survive() {
    let set = FailureSet::from_records(vec![FailureRecord::new("boom", "t1", "r.xml", "c1")]);
    let json = serde_json::to_string(&set).unwrap();
    let back: FailureSet = serde_json::from_str(&json).unwrap();
    assert_eq!(back, set);
}

#[test]
fn given_ragged_columns_when_deserialized_then_it_is_rejected() {
    let json = r#"{
        "messages": ["a", "b"],
        "test_names": ["t1"],
        "file_names": ["f1", "f2"],
        "class_names": ["c1", "c2"]
    }"#;
    let err = serde_json::from_str::<FailureSet>(json).unwrap_err();
    assert!(err.to_string().contains("differ in length"));
}
