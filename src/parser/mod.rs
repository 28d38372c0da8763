pub mod junit;
pub mod xml;

use crate::report::types::{CaseRecord, SuiteRecord};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

pub use junit::{parse_testsuite, ParsedSuite, SuiteError};

/// Everything pulled out of one results directory
#[derive(Debug, Default)]
pub struct Extraction {
    pub suites: Vec<SuiteRecord>,
    pub cases: Vec<CaseRecord>,
    /// Report files that were read and parsed
    pub files: usize,
    /// Suites dropped because they could not be mapped
    pub skipped_suites: usize,
}

impl Extraction {
    fn absorb(&mut self, outcome: Result<ParsedSuite, SuiteError>, path: &Path) {
        match outcome {
            Ok(parsed) => {
                self.suites.push(parsed.suite);
                self.cases.extend(parsed.cases);
            }
            Err(e) => {
                log::warn!(
                    "Error parsing testsuite in {}: {} (suite skipped)",
                    path.display(),
                    e
                );
                self.skipped_suites += 1;
            }
        }
    }
}

/// A report file is `TEST-*.xml`
pub fn is_report_file(file_name: &str) -> bool {
    file_name.starts_with("TEST-") && file_name.ends_with(".xml")
}

/// Collect report files under `dir`, sorted per directory so runs are repeatable
pub fn find_report_files(dir: &Path) -> Vec<PathBuf> {
    walkdir::WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_report_file(&e.file_name().to_string_lossy()))
        .map(|e| e.into_path())
        .collect()
}

/// Extract suite and case records from every report under `test_result_dir`
pub fn parse_xml_files(
    test_result_dir: &Path,
    test_type: &str,
    now: &DateTime<Local>,
) -> Extraction {
    let mut extraction = Extraction::default();

    if !test_result_dir.exists() {
        log::warn!(
            "Test result directory {} does not exist.",
            test_result_dir.display()
        );
        return extraction;
    }
    if !test_result_dir.is_dir() {
        log::warn!(
            "Test result path {} is not a directory.",
            test_result_dir.display()
        );
        return extraction;
    }

    for path in find_report_files(test_result_dir) {
        log::debug!("Reading {}", path.display());
        if let Err(e) = parse_report_file(&path, test_type, now, &mut extraction) {
            log::warn!("Skipping report {}: {:#}", path.display(), e);
        }
    }

    log::info!(
        "Extracted {} suites and {} cases from {} report files",
        extraction.suites.len(),
        extraction.cases.len(),
        extraction.files
    );

    extraction
}

fn parse_report_file(
    path: &Path,
    test_type: &str,
    now: &DateTime<Local>,
    extraction: &mut Extraction,
) -> anyhow::Result<()> {
    use anyhow::Context;

    let content = std::fs::read_to_string(path).context("failed to read report")?;
    let root = xml::parse_document(&content).context("failed to parse report")?;
    extraction.files += 1;

    match root.name.as_str() {
        "testsuite" => {
            extraction.absorb(parse_testsuite(&root, test_type, now), path);
        }
        "testsuites" => {
            for testsuite in root.children_named("testsuite") {
                extraction.absorb(parse_testsuite(testsuite, test_type, now), path);
            }
        }
        other => log::debug!("Ignoring {}: root element <{}>", path.display(), other),
    }

    Ok(())
}
