//! citedoc: render `@Reference` citation annotations found in API documentation.
//!
//! This library provides functionality to:
//! - Extract `@Reference(...)` / `@References(...)` literals from documentation text
//! - Parse them into structured citation records
//! - Render records as citation text, HTML, BibTeX or annotation literals
//! - Assemble per-member bibliography containers

pub mod annotation;
pub mod bibtex;
pub mod extract;
pub mod format;
pub mod lexer;
pub mod output;
pub mod parser;
pub mod processor;
pub mod record;
pub mod text;

pub use annotation::to_annotation;
pub use bibtex::{format_bibtex, make_key, to_bibtex};
pub use extract::{extract_blocks, html_to_text, AnnotationBlock, BlockKind};
pub use format::{builtin_format, builtin_format_names, OutputFormat};
pub use output::{
    group_id, render_records, replace_blocks, Bibliography, RenderedBlock, MASTER_GROUP,
};
pub use parser::{parse_annotation, parse_reference, parse_references, CitationError};
pub use processor::{process_blocks, ProcessOutcome, ProcessedBlock, SkippedBlock};
pub use record::{CitationRecord, ReferenceType};
pub use text::{format_name, to_html, to_text};
