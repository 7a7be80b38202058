//! Integration tests using TOML fixtures.
//!
//! This test harness loads test cases from TOML files in the `fixtures/` directory
//! and runs them against the citedoc library.

mod common;

use std::fs;
use std::path::Path;

use serde::Deserialize;

/// A test fixture loaded from a TOML file.
#[derive(Debug, Deserialize)]
struct Fixture {
    /// Name of the test case
    name: String,
    /// Input document text
    input: String,
    /// Output format name for output tests
    #[serde(default = "default_format")]
    format: String,
    /// Expected rendering of all parsed records (for output tests)
    #[serde(default)]
    expected: Option<String>,
    /// Expected number of parsed records
    #[serde(default)]
    expected_count: Option<usize>,
    /// Expected record titles, in document order
    #[serde(default)]
    expected_titles: Option<Vec<String>>,
    /// Expected number of skipped blocks
    #[serde(default)]
    expected_skipped: Option<usize>,
    /// Expected error message fragment (for error tests)
    #[serde(default)]
    expected_error: Option<String>,
}

fn default_format() -> String {
    "text".to_string()
}

/// Load all fixtures from a directory.
fn load_fixtures(dir: &Path) -> Vec<(String, Fixture)> {
    let mut fixtures = Vec::new();

    if !dir.exists() {
        return fixtures;
    }

    for entry in fs::read_dir(dir).unwrap() {
        let entry = entry.unwrap();
        let path = entry.path();

        if path.extension().map_or(false, |e| e == "toml") {
            let content = fs::read_to_string(&path).unwrap();
            let fixture: Fixture = toml::from_str(&content)
                .unwrap_or_else(|e| panic!("invalid fixture {}: {}", path.display(), e));
            let name = path.file_stem().unwrap().to_string_lossy().to_string();
            fixtures.push((name, fixture));
        }
    }

    fixtures.sort_by(|a, b| a.0.cmp(&b.0));
    fixtures
}

fn process(fixture: &Fixture) -> citedoc::ProcessOutcome {
    let blocks = citedoc::extract_blocks(&fixture.input);
    citedoc::process_blocks(&blocks)
}

/// Run parsing tests - verify records extracted from a document.
fn run_parsing_test(name: &str, fixture: &Fixture) {
    let outcome = process(fixture);
    let records: Vec<_> = outcome.records().collect();

    println!("Parsing test '{}': {} records found", name, records.len());

    if let Some(expected_count) = fixture.expected_count {
        assert_eq!(
            records.len(),
            expected_count,
            "Test '{}' failed: expected {} records, got {}",
            name,
            expected_count,
            records.len()
        );
    }

    if let Some(expected_titles) = &fixture.expected_titles {
        let titles: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, *expected_titles, "Test '{}' title mismatch", name);
    }

    let expected_skipped = fixture.expected_skipped.unwrap_or(0);
    assert_eq!(
        outcome.skipped.len(),
        expected_skipped,
        "Test '{}' failed: unexpected skipped blocks: {:?}",
        name,
        outcome.skipped
    );
}

/// Run output tests - render all parsed records and compare.
fn run_output_test(name: &str, fixture: &Fixture) {
    let format = citedoc::builtin_format(&fixture.format)
        .unwrap_or_else(|| panic!("Test '{}' uses unknown format '{}'", name, fixture.format));

    let outcome = process(fixture);
    assert!(
        outcome.skipped.is_empty(),
        "Test '{}' failed: unexpected skipped blocks: {:?}",
        name,
        outcome.skipped
    );

    let records: Vec<_> = outcome.records().cloned().collect();
    let output = citedoc::render_records(&records, format).unwrap();

    if let Some(expected) = &fixture.expected {
        assert_eq!(output.trim(), expected.trim(), "Test '{}' output mismatch", name);
    }
}

/// Run error tests - verify that bad blocks are reported, not rendered.
fn run_error_test(name: &str, fixture: &Fixture) {
    let outcome = process(fixture);

    let Some(first) = outcome.skipped.first() else {
        panic!("Test '{}' expected a skipped block but none was", name);
    };

    if let Some(expected_error) = &fixture.expected_error {
        let error_msg = first.error.to_string();
        assert!(
            error_msg.contains(expected_error),
            "Test '{}' error mismatch: expected '{}', got '{}'",
            name,
            expected_error,
            error_msg
        );
    }

    if let Some(expected_count) = fixture.expected_count {
        assert_eq!(
            outcome.records().count(),
            expected_count,
            "Test '{}' failed: sibling blocks were not kept",
            name
        );
    }
}

#[test]
fn test_parsing_fixtures() {
    let fixtures_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/parsing");
    let fixtures = load_fixtures(&fixtures_dir);
    assert!(!fixtures.is_empty());

    for (name, fixture) in fixtures {
        println!("Running parsing test: {}", fixture.name);
        run_parsing_test(&name, &fixture);
    }
}

#[test]
fn test_output_fixtures() {
    let fixtures_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/output");
    let fixtures = load_fixtures(&fixtures_dir);
    assert!(!fixtures.is_empty());

    for (name, fixture) in fixtures {
        println!("Running output test: {}", fixture.name);
        run_output_test(&name, &fixture);
    }
}

#[test]
fn test_error_fixtures() {
    let fixtures_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/errors");
    let fixtures = load_fixtures(&fixtures_dir);
    assert!(!fixtures.is_empty());

    for (name, fixture) in fixtures {
        println!("Running error test: {}", fixture.name);
        run_error_test(&name, &fixture);
    }
}

// ---------------------------------------------------------------------------
// End-to-end scenarios on realistic javadoc input
// ---------------------------------------------------------------------------

#[test]
fn test_javadoc_page_to_bibliography() {
    // Given: a javadoc HTML page with a hyperlinked class annotation
    let text = citedoc::html_to_text(common::JAVADOC_PAGE);

    // When: we extract, process and group the blocks
    let outcome = citedoc::process_blocks(&citedoc::extract_blocks(&text));
    let mut bibliography = citedoc::Bibliography::new();
    for block in &outcome.processed {
        bibliography.add_block(citedoc::MASTER_GROUP, block);
    }

    // Then: one container holds both views of the Fisher vector paper
    assert!(outcome.skipped.is_empty(), "skipped: {:?}", outcome.skipped);
    assert_eq!(bibliography.ids(), vec!["master"]);
    let html = bibliography.to_html();
    assert!(html.contains("<span class='title'>Fisher Kernels on Visual Vocabularies for Image Categorization. </span>"));
    assert!(html.contains("@inproceedings{Perronnin2007"));
    assert!(html.contains(" pages = {1--8}"));
}

#[test]
fn test_fisher_reference_text() {
    let record = citedoc::parse_reference(common::FISHER_REFERENCE).unwrap();
    assert_eq!(
        citedoc::to_text(&record),
        "F. Perronnin and C. Dance. Fisher Kernels on Visual Vocabularies for Image Categorization. Computer Vision and Pattern Recognition, 2007. CVPR '07. IEEE Conference on. pp1-8. June, 2007. "
    );
}

#[test]
fn test_fisher_reference_bibtex() {
    let record = citedoc::parse_reference(common::FISHER_REFERENCE).unwrap();
    assert_eq!(
        citedoc::to_bibtex(&record),
        "@inproceedings{Perronnin2007\n author = {{Perronnin, F.} and {Dance, C.}}\n title = {Fisher Kernels on Visual Vocabularies for Image Categorization}\n year = {2007}\n booktitle = {Computer Vision and Pattern Recognition, 2007. CVPR '07. IEEE Conference on}\n pages = {1--8}\n month = {June}\n doi = {10.1109/CVPR.2007.383266}\n issn = {1063-6919}\n}\n"
    );
}

#[test]
fn test_annotation_rendering_reparses() {
    let record = citedoc::parse_reference(common::FISHER_REFERENCE).unwrap();
    let literal = citedoc::to_annotation(&record);
    assert_eq!(citedoc::parse_reference(&literal).unwrap(), record);
}

#[test]
fn test_inline_rewrite_keeps_surrounding_text() {
    // Given: a source file with a class-level annotation
    let source = format!("{}\npublic class FisherVector {{}}\n", common::FISHER_REFERENCE);
    let outcome = citedoc::process_blocks(&citedoc::extract_blocks(&source));

    // When: we replace the block by its BibTeX rendering
    let rendered: Vec<citedoc::RenderedBlock> = outcome
        .processed
        .iter()
        .map(|block| citedoc::RenderedBlock {
            original_span: block.span,
            formatted: citedoc::render_records(&block.records, citedoc::OutputFormat::Bibtex)
                .unwrap()
                .trim_end()
                .to_string(),
        })
        .collect();
    let result = citedoc::replace_blocks(&source, &rendered);

    // Then: the annotation is gone and the class declaration remains
    assert!(result.starts_with("@inproceedings{Perronnin2007\n"));
    assert!(result.ends_with("}\npublic class FisherVector {}\n"));
    assert!(!result.contains("@Reference"));
}
