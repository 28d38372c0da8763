use super::xml::Element;
use crate::report::types::{CaseRecord, CaseStatus, SuiteRecord, SuiteStatus};
use chrono::{DateTime, Local};
use thiserror::Error;

/// Why a `<testsuite>` element was dropped
#[derive(Debug, Error, PartialEq)]
pub enum SuiteError {
    #[error("invalid integer for attribute '{attribute}': {value:?}")]
    InvalidInteger { attribute: String, value: String },

    #[error("invalid number for attribute '{attribute}': {value:?}")]
    InvalidFloat { attribute: String, value: String },

    #[error("counts overflow computing passed tests (tests={tests}, failures={failures}, errors={errors}, skipped={skipped})")]
    CountOverflow {
        tests: i64,
        failures: i64,
        errors: i64,
        skipped: i64,
    },

    #[error("test case {case:?}: {source}")]
    Case {
        case: Option<String>,
        #[source]
        source: Box<SuiteError>,
    },
}

/// A successfully mapped suite and its cases
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSuite {
    pub suite: SuiteRecord,
    pub cases: Vec<CaseRecord>,
}

/// Format used when a suite carries no `timestamp` attribute
pub fn format_timestamp(now: &DateTime<Local>) -> String {
    now.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

/// Map one `<testsuite>` element into records.
///
/// Any malformed numeric attribute, on the suite or on one of its cases,
/// fails the whole suite.
pub fn parse_testsuite(
    testsuite: &Element,
    test_type: &str,
    now: &DateTime<Local>,
) -> Result<ParsedSuite, SuiteError> {
    let tests = int_attr(testsuite, "tests")?;
    let failures = int_attr(testsuite, "failures")?;
    let errors = int_attr(testsuite, "errors")?;
    let skipped = int_attr(testsuite, "skipped")?;
    let time = float_attr(testsuite, "time")?;
    let timestamp = testsuite
        .attr("timestamp")
        .map(str::to_string)
        .unwrap_or_else(|| format_timestamp(now));
    let suite_name = testsuite.attr("name").unwrap_or("Unknown").to_string();
    let passed = tests
        .checked_sub(failures)
        .and_then(|n| n.checked_sub(errors))
        .and_then(|n| n.checked_sub(skipped))
        .ok_or(SuiteError::CountOverflow {
            tests,
            failures,
            errors,
            skipped,
        })?;

    let suite = SuiteRecord {
        timestamp,
        tests,
        passed,
        failures,
        errors,
        skipped,
        time,
        status: SuiteStatus::from_counts(failures, errors),
        suite_name,
        test_type: test_type.to_string(),
    };

    let cases = testsuite
        .children_named("testcase")
        .map(|testcase| {
            parse_testcase(testcase, &suite).map_err(|e| SuiteError::Case {
                case: testcase.attr("name").map(str::to_string),
                source: Box::new(e),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ParsedSuite { suite, cases })
}

fn parse_testcase(testcase: &Element, suite: &SuiteRecord) -> Result<CaseRecord, SuiteError> {
    let time = float_attr(testcase, "time")?;

    let mut status = CaseStatus::Passed;
    let mut failure_type = String::new();
    let mut failure_message = String::new();

    if let Some(failure) = testcase.child("failure") {
        status = CaseStatus::Failed;
        (failure_type, failure_message) = capture_problem(failure);
    } else if let Some(error) = testcase.child("error") {
        status = CaseStatus::Error;
        (failure_type, failure_message) = capture_problem(error);
    } else if testcase.child("skipped").is_some() {
        status = CaseStatus::Skipped;
    }

    Ok(CaseRecord {
        timestamp: suite.timestamp.clone(),
        suite_name: suite.suite_name.clone(),
        test_name: testcase.attr("name").map(str::to_string),
        classname: testcase.attr("classname").map(str::to_string),
        status,
        time,
        failure_type,
        failure_message,
        test_type: suite.test_type.clone(),
    })
}

/// (type attribute, text content) of a `<failure>` or `<error>` element
fn capture_problem(element: &Element) -> (String, String) {
    (
        element.attr("type").unwrap_or_default().to_string(),
        element.text.clone().unwrap_or_default(),
    )
}

fn int_attr(element: &Element, attribute: &str) -> Result<i64, SuiteError> {
    match element.attr(attribute) {
        None => Ok(0),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| SuiteError::InvalidInteger {
                attribute: attribute.to_string(),
                value: raw.to_string(),
            }),
    }
}

/// JSON has no NaN or infinity, so those are as malformed as garbage
fn float_attr(element: &Element, attribute: &str) -> Result<f64, SuiteError> {
    let Some(raw) = element.attr(attribute) else {
        return Ok(0.0);
    };
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(SuiteError::InvalidFloat {
            attribute: attribute.to_string(),
            value: raw.to_string(),
        }),
    }
}
