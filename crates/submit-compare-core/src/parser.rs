//! Question XML parser.
//!
//! A question is a `<submit_and_compare>` document with a `<body>`, an
//! `<explanation>` and an optional `<demandhint>` holding `<hint>` elements.
//! Sections are returned as their exact source markup, tags included, so
//! whatever an author saved is what the learner sees.

use roxmltree::{Document, Node, ParsingOptions};

use crate::error::ContentError;
use crate::model::QuestionDefinition;

/// Name of the root element.
pub const ROOT_ELEMENT: &str = "submit_and_compare";
pub const BODY_SECTION: &str = "body";
pub const EXPLANATION_SECTION: &str = "explanation";
const DEMANDHINT_SECTION: &str = "demandhint";
const HINT_ELEMENT: &str = "hint";

fn parse_document(xml: &str) -> Result<Document<'_>, ContentError> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    Document::parse_with_options(xml, options)
        .map_err(|e| ContentError::Malformed(e.to_string()))
}

fn question_root<'a, 'input>(
    doc: &'a Document<'input>,
) -> Result<Node<'a, 'input>, ContentError> {
    let root = doc.root_element();
    if root.tag_name().name() != ROOT_ELEMENT {
        return Err(ContentError::UnexpectedRoot(
            root.tag_name().name().to_string(),
        ));
    }
    Ok(root)
}

fn child_elements<'a, 'input: 'a>(
    parent: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    parent
        .children()
        .filter(move |n| n.is_element() && n.tag_name().name() == name)
}

/// Source markup of a node, byte-for-byte.
fn outer_markup<'x>(xml: &'x str, node: Node<'_, '_>) -> &'x str {
    &xml[node.range()]
}

fn unique_section<'x>(
    xml: &'x str,
    root: Node<'_, '_>,
    name: &str,
) -> Result<&'x str, ContentError> {
    let mut found = child_elements(root, name);
    let first = found
        .next()
        .ok_or_else(|| ContentError::SectionNotFound(name.to_string()))?;
    if found.next().is_some() {
        return Err(ContentError::DuplicateSection(name.to_string()));
    }
    Ok(outer_markup(xml, first))
}

fn collect_hints(xml: &str, root: Node<'_, '_>) -> Vec<String> {
    child_elements(root, DEMANDHINT_SECTION)
        .flat_map(|demandhint| child_elements(demandhint, HINT_ELEMENT))
        .map(|hint| outer_markup(xml, hint).to_string())
        .collect()
}

/// Check that `xml` is well-formed. Structure is not inspected.
pub fn check_well_formed(xml: &str) -> Result<(), ContentError> {
    parse_document(xml).map(|_| ())
}

/// Extract the outer markup of the section `name` directly under the root.
pub fn extract_section(xml: &str, name: &str) -> Result<String, ContentError> {
    let doc = parse_document(xml)?;
    let root = question_root(&doc)?;
    unique_section(xml, root, name).map(str::to_string)
}

/// Extract the `<body>` (prompt) markup.
pub fn extract_body(xml: &str) -> Result<String, ContentError> {
    extract_section(xml, BODY_SECTION)
}

/// Extract the `<explanation>` (our answer) markup.
pub fn extract_explanation(xml: &str) -> Result<String, ContentError> {
    extract_section(xml, EXPLANATION_SECTION)
}

/// Extract every `demandhint/hint` in document order.
///
/// Returns an empty list when the question has no hints.
pub fn extract_hints(xml: &str) -> Result<Vec<String>, ContentError> {
    let doc = parse_document(xml)?;
    let root = question_root(&doc)?;
    Ok(collect_hints(xml, root))
}

/// Prefix each hint with its 1-based position: `Hint (i of N): ...`.
pub fn decorate_hints(hints: &[String]) -> Vec<String> {
    let total = hints.len();
    hints
        .iter()
        .enumerate()
        .map(|(i, hint)| format!("Hint ({} of {}): {}", i + 1, total, hint))
        .collect()
}

/// Parse all sections of a question in one pass.
pub fn parse_question(xml: &str) -> Result<QuestionDefinition, ContentError> {
    let doc = parse_document(xml)?;
    let root = question_root(&doc)?;
    Ok(QuestionDefinition {
        body: unique_section(xml, root, BODY_SECTION)?.to_string(),
        explanation: unique_section(xml, root, EXPLANATION_SECTION)?.to_string(),
        hints: collect_hints(xml, root),
    })
}

/// A warning from question validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// Section the warning refers to (if applicable).
    pub section: Option<String>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn new(section: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            section: section.map(str::to_string),
            message: message.into(),
        }
    }
}

/// Lint a question for authoring mistakes.
///
/// Malformed XML yields a single warning; otherwise every structural problem
/// is reported.
pub fn validate_question(xml: &str) -> Vec<ValidationWarning> {
    let doc = match parse_document(xml) {
        Ok(doc) => doc,
        Err(e) => return vec![ValidationWarning::new(None, e.to_string())],
    };
    let root = match question_root(&doc) {
        Ok(root) => root,
        Err(e) => return vec![ValidationWarning::new(None, e.to_string())],
    };

    let mut warnings = Vec::new();

    for name in [BODY_SECTION, EXPLANATION_SECTION] {
        match child_elements(root, name).count() {
            0 => warnings.push(ValidationWarning::new(Some(name), "section is missing")),
            1 => {}
            n => warnings.push(ValidationWarning::new(
                Some(name),
                format!("section occurs {n} times, expected once"),
            )),
        }
    }

    // Empty prompt
    if let Some(body) = child_elements(root, BODY_SECTION).next() {
        let has_content = body
            .descendants()
            .skip(1)
            .any(|n| n.is_element() || n.text().is_some_and(|t| !t.trim().is_empty()));
        if !has_content {
            warnings.push(ValidationWarning::new(Some(BODY_SECTION), "body is empty"));
        }
    }

    for demandhint in child_elements(root, DEMANDHINT_SECTION) {
        if child_elements(demandhint, HINT_ELEMENT).next().is_none() {
            warnings.push(ValidationWarning::new(
                Some(DEMANDHINT_SECTION),
                "demandhint contains no hints",
            ));
        }
    }

    // Hints placed anywhere but demandhint are never shown
    let stray_hints = root
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == HINT_ELEMENT)
        .filter(|n| {
            !matches!(n.parent_element(), Some(p) if p.tag_name().name() == DEMANDHINT_SECTION)
        })
        .count();
    if stray_hints > 0 {
        warnings.push(ValidationWarning::new(
            Some(HINT_ELEMENT),
            format!("{stray_hints} hint(s) outside <demandhint> will be ignored"),
        ));
    }

    warnings
}
