use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Overall outcome of a test suite
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SuiteStatus {
    Passed,
    Failed,
}

impl SuiteStatus {
    /// A suite fails when anything in it failed or errored
    pub fn from_counts(failures: i64, errors: i64) -> Self {
        if failures > 0 || errors > 0 {
            SuiteStatus::Failed
        } else {
            SuiteStatus::Passed
        }
    }
}

/// Outcome of a single test case
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CaseStatus {
    Passed,
    Failed,
    Error,
    Skipped,
}

/// One entry per `<testsuite>` element.
///
/// Field order is the key order of the persisted JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuiteRecord {
    pub timestamp: String,
    pub tests: i64,
    pub passed: i64,
    pub failures: i64,
    pub errors: i64,
    pub skipped: i64,
    pub time: f64,
    pub status: SuiteStatus,
    pub suite_name: String,
    #[serde(rename = "type")]
    pub test_type: String,
}

/// One entry per `<testcase>` element, stamped with its suite's name and time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaseRecord {
    pub timestamp: String,
    pub suite_name: String,
    pub test_name: Option<String>,
    pub classname: Option<String>,
    pub status: CaseStatus,
    pub time: f64,
    pub failure_type: String,
    pub failure_message: String,
    #[serde(rename = "type")]
    pub test_type: String,
}

/// The persisted history document.
///
/// Entries are kept as raw JSON so records written by older tools, with
/// extra keys or nulls, survive a rewrite untouched.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct HistoryStore {
    pub suites: Vec<Value>,
    pub cases: Vec<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suite_status_from_counts() {
        assert_eq!(SuiteStatus::from_counts(0, 0), SuiteStatus::Passed);
        assert_eq!(SuiteStatus::from_counts(1, 0), SuiteStatus::Failed);
        assert_eq!(SuiteStatus::from_counts(0, 2), SuiteStatus::Failed);
    }

    #[test]
    fn test_suite_record_key_order() {
        let suite = SuiteRecord {
            timestamp: "2024-01-01T10:00:00".to_string(),
            tests: 3,
            passed: 2,
            failures: 1,
            errors: 0,
            skipped: 0,
            time: 1.5,
            status: SuiteStatus::Failed,
            suite_name: "Foo".to_string(),
            test_type: "unit".to_string(),
        };

        let json = serde_json::to_string(&suite).unwrap();
        assert_eq!(
            json,
            r#"{"timestamp":"2024-01-01T10:00:00","tests":3,"passed":2,"failures":1,"errors":0,"skipped":0,"time":1.5,"status":"failed","suite_name":"Foo","type":"unit"}"#
        );
    }

    #[test]
    fn test_case_record_missing_names_are_null() {
        let case = CaseRecord {
            timestamp: "t".to_string(),
            suite_name: "Foo".to_string(),
            test_name: None,
            classname: None,
            status: CaseStatus::Error,
            time: 0.0,
            failure_type: String::new(),
            failure_message: String::new(),
            test_type: "unit".to_string(),
        };

        let value = serde_json::to_value(&case).unwrap();
        assert!(value["test_name"].is_null());
        assert_eq!(value["status"], "error");
        assert_eq!(value["type"], "unit");
    }
}
