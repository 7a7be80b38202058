//! Block processing.
//!
//! Parses every extracted annotation block into citation records. A block
//! that fails to parse is reported and skipped; its siblings are unaffected.

use crate::extract::{AnnotationBlock, BlockKind};
use crate::parser::{parse_reference, parse_references, CitationError};
use crate::record::CitationRecord;

/// A block that parsed into one or more records.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedBlock {
    /// The span in the original text where this block was found
    pub span: (usize, usize),
    /// The annotation literal as it appeared in the document
    pub raw: String,
    pub records: Vec<CitationRecord>,
}

/// A block that could not be parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedBlock {
    pub span: (usize, usize),
    pub error: CitationError,
}

/// The result of processing a document's blocks, both in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessOutcome {
    pub processed: Vec<ProcessedBlock>,
    pub skipped: Vec<SkippedBlock>,
}

impl ProcessOutcome {
    /// All parsed records, in document order.
    pub fn records(&self) -> impl Iterator<Item = &CitationRecord> {
        self.processed.iter().flat_map(|block| block.records.iter())
    }
}

/// Parses a single block according to its kind.
pub fn process_block(block: &AnnotationBlock) -> Result<Vec<CitationRecord>, CitationError> {
    match block.kind {
        BlockKind::Single => parse_reference(&block.raw).map(|record| vec![record]),
        BlockKind::List => parse_references(&block.raw),
    }
}

/// Parses every block, collecting successes and failures separately.
pub fn process_blocks(blocks: &[AnnotationBlock]) -> ProcessOutcome {
    let mut outcome = ProcessOutcome::default();

    for block in blocks {
        match process_block(block) {
            Ok(records) => {
                tracing::debug!(
                    start = block.span.0,
                    count = records.len(),
                    "parsed annotation block"
                );
                outcome.processed.push(ProcessedBlock {
                    span: block.span,
                    raw: block.raw.clone(),
                    records,
                });
            }
            Err(error) => {
                tracing::warn!(start = block.span.0, end = block.span.1, %error, "skipping annotation block");
                outcome.skipped.push(SkippedBlock {
                    span: block.span,
                    error,
                });
            }
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_blocks;
    use crate::record::ReferenceType;

    #[test]
    fn test_process_empty() {
        let outcome = process_blocks(&[]);
        assert!(outcome.processed.is_empty());
        assert!(outcome.skipped.is_empty());
    }

    #[test]
    fn test_process_single_and_list() {
        // Given: a document with one list block and one single block
        let text = r#"@References(references={@Reference(type=Misc, title="A", year="1"), @Reference(type=Book, title="B", year="2")})
class Foo
@Reference(type=Article, author="Smith, J.", title="C", year="3")"#;
        let blocks = extract_blocks(text);

        // When: we process them
        let outcome = process_blocks(&blocks);

        // Then: three records come out in document order
        assert!(outcome.skipped.is_empty());
        assert_eq!(outcome.processed.len(), 2);
        assert_eq!(outcome.processed[0].records.len(), 2);
        let titles: Vec<&str> = outcome.records().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B", "C"]);
        assert_eq!(outcome.processed[1].records[0].kind, ReferenceType::Article);
    }

    #[test]
    fn test_malformed_block_isolated() {
        // Given: a malformed block between two valid ones
        let text = r#"@Reference(type=Misc, title="A", year="1")
@Reference(type=Misc, year="2")
@Reference(type=Misc, title="C", year="3")"#;
        let blocks = extract_blocks(text);
        assert_eq!(blocks.len(), 3);

        // When: we process them
        let outcome = process_blocks(&blocks);

        // Then: the bad block is skipped and the others are kept
        assert_eq!(outcome.processed.len(), 2);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].span, blocks[1].span);
        assert_eq!(
            outcome.skipped[0].error,
            CitationError::MissingRequiredField("title")
        );
        let titles: Vec<&str> = outcome.records().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "C"]);
    }

    #[test]
    fn test_processed_block_keeps_raw() {
        let text = r#"x @Reference(type=Misc, title="T", year="1") y"#;
        let blocks = extract_blocks(text);
        let outcome = process_blocks(&blocks);
        assert_eq!(outcome.processed[0].raw, r#"@Reference(type=Misc, title="T", year="1")"#);
        assert_eq!(outcome.processed[0].span, (2, text.len() - 2));
    }
}
