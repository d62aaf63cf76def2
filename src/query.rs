//! # Query Compiler Module
//!
//! ## Purpose
//! Compiles user search strings (bare terms, quoted phrases, boolean
//! operators) into a structured query tree, sanitized against the text
//! index's native syntax.
//!
//! ## Input/Output Specification
//! - **Input**: Raw search string
//! - **Output**: `SearchQuery` tree, or `MalformedQuery` for blank input or
//!   input that sanitizes to nothing
//! - **Grammar**: quoted substrings are opaque phrases; standalone
//!   case-insensitive AND / OR / NOT are combinators; everything else is a
//!   term
//!
//! ## Key Features
//! - Flat left-associative chaining: `a AND b OR c` compiles to
//!   `Or(And(a, b), c)` - left-to-right boolean-chain semantics, no
//!   operator precedence or parentheses
//! - `NOT` is unary and binds to the next leaf only
//! - Implicit `And` between adjacent leaves with no written operator
//! - Index-reserved characters are stripped before tree construction so a
//!   query can never escape into the index's own query language
//! - Malformed trailing operators degrade gracefully instead of failing

use crate::errors::{Result, ScriptureError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One node of a compiled search query tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryNode {
    /// A single word, matched against the index's token stream
    Term(String),
    /// A quoted phrase, matched as contiguous text
    Phrase(String),
    /// All children must match
    And(Vec<QueryNode>),
    /// At least one child must match
    Or(Vec<QueryNode>),
    /// The child must not match
    Not(Box<QueryNode>),
}

impl fmt::Display for QueryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryNode::Term(t) => write!(f, "{}", t),
            QueryNode::Phrase(p) => write!(f, "\"{}\"", p),
            QueryNode::And(children) => {
                write!(f, "(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, " AND ")?;
                    }
                    write!(f, "{}", child)?;
                }
                write!(f, ")")
            }
            QueryNode::Or(children) => {
                write!(f, "(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, " OR ")?;
                    }
                    write!(f, "{}", child)?;
                }
                write!(f, ")")
            }
            QueryNode::Not(child) => write!(f, "NOT {}", child),
        }
    }
}

/// A compiled search query: the tree plus the raw input it came from.
/// Immutable once constructed, per-request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub root: QueryNode,
    pub raw: String,
}

impl SearchQuery {
    /// Phrases that every matching verse is required to contain: phrase
    /// leaves in conjunctive positions (the root, or nested under `And`).
    /// Phrases under `Or` or `Not` carry no such guarantee.
    pub fn required_phrases(&self) -> Vec<&str> {
        let mut phrases = Vec::new();
        collect_required_phrases(&self.root, &mut phrases);
        phrases
    }
}

fn collect_required_phrases<'a>(node: &'a QueryNode, out: &mut Vec<&'a str>) {
    match node {
        QueryNode::Phrase(p) => out.push(p.as_str()),
        QueryNode::And(children) => {
            for child in children {
                collect_required_phrases(child, out);
            }
        }
        QueryNode::Term(_) | QueryNode::Or(_) | QueryNode::Not(_) => {}
    }
}

/// Scanner token: a leaf or a combinator keyword.
enum Token {
    Leaf(QueryNode),
    And,
    Or,
    Not,
}

/// Pending binary combinator during the left-to-right fold.
#[derive(Clone, Copy)]
enum PendingOp {
    And,
    Or,
}

/// Compile a raw search string into a [`SearchQuery`].
///
/// Blank input, or input whose every token is stripped by sanitization, is
/// rejected with `MalformedQuery` before compilation.
pub fn compile(raw: &str) -> Result<SearchQuery> {
    if raw.trim().is_empty() {
        return Err(ScriptureError::MalformedQuery {
            query: raw.to_string(),
            reason: "query is empty".to_string(),
        });
    }

    let tokens = scan(raw);

    let mut root: Option<QueryNode> = None;
    let mut pending_op = PendingOp::And;
    let mut pending_not = false;

    for token in tokens {
        match token {
            Token::And => pending_op = PendingOp::And,
            Token::Or => pending_op = PendingOp::Or,
            Token::Not => pending_not = true,
            Token::Leaf(mut leaf) => {
                if pending_not {
                    leaf = QueryNode::Not(Box::new(leaf));
                    pending_not = false;
                }
                root = Some(match root.take() {
                    None => leaf,
                    Some(left) => combine(left, pending_op, leaf),
                });
                pending_op = PendingOp::And;
            }
        }
    }

    match root {
        Some(root) => Ok(SearchQuery {
            root,
            raw: raw.to_string(),
        }),
        // Operators or stripped syntax only - nothing searchable survived.
        None => Err(ScriptureError::MalformedQuery {
            query: raw.to_string(),
            reason: "no searchable terms after sanitization".to_string(),
        }),
    }
}

/// Extend a left-associative chain with one more leaf. Combining into an
/// existing node of the same operator keeps the chain flat.
fn combine(left: QueryNode, op: PendingOp, right: QueryNode) -> QueryNode {
    match (op, left) {
        (PendingOp::And, QueryNode::And(mut children)) => {
            children.push(right);
            QueryNode::And(children)
        }
        (PendingOp::Or, QueryNode::Or(mut children)) => {
            children.push(right);
            QueryNode::Or(children)
        }
        (PendingOp::And, left) => QueryNode::And(vec![left, right]),
        (PendingOp::Or, left) => QueryNode::Or(vec![left, right]),
    }
}

/// Single left-to-right scan over the raw input producing leaves and
/// combinators. Quoted regions become phrase leaves verbatim (no further
/// tokenization); an unterminated quote runs to the end of input.
fn scan(raw: &str) -> Vec<Token> {
    let mut tokens = Vec::new();

    for (i, segment) in raw.split('"').enumerate() {
        if i % 2 == 1 {
            // Inside quotes: one opaque phrase.
            let phrase = sanitize_fragment(segment);
            if !phrase.is_empty() {
                tokens.push(Token::Leaf(QueryNode::Phrase(phrase)));
            }
            continue;
        }
        for word in sanitize_fragment(segment).split_whitespace() {
            match word.to_ascii_uppercase().as_str() {
                "AND" => tokens.push(Token::And),
                "OR" => tokens.push(Token::Or),
                "NOT" => tokens.push(Token::Not),
                _ => tokens.push(Token::Leaf(QueryNode::Term(word.to_lowercase()))),
            }
        }
    }

    tokens
}

/// Strip characters that are syntactically meaningful to the text index
/// (globs, column filters, grouping, proximity operators) and collapse the
/// remaining whitespace. Letters, digits, apostrophes, and hyphens survive.
fn sanitize_fragment(fragment: &str) -> String {
    let cleaned: String = fragment
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '\'' || c == '-' {
                c
            } else {
                ' '
            }
        })
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_phrase() {
        let query = compile("\"love your enemies\"").unwrap();
        assert_eq!(query.root, QueryNode::Phrase("love your enemies".to_string()));
    }

    #[test]
    fn test_and_not_chain() {
        let query = compile("faith AND NOT works").unwrap();
        assert_eq!(
            query.root,
            QueryNode::And(vec![
                QueryNode::Term("faith".to_string()),
                QueryNode::Not(Box::new(QueryNode::Term("works".to_string()))),
            ])
        );
    }

    #[test]
    fn test_implicit_and_between_terms() {
        let query = compile("jesus wept").unwrap();
        assert_eq!(
            query.root,
            QueryNode::And(vec![
                QueryNode::Term("jesus".to_string()),
                QueryNode::Term("wept".to_string()),
            ])
        );
    }

    #[test]
    fn test_left_associative_chain_without_precedence() {
        // a AND b OR c => Or(And(a, b), c)
        let query = compile("grace AND mercy OR peace").unwrap();
        assert_eq!(
            query.root,
            QueryNode::Or(vec![
                QueryNode::And(vec![
                    QueryNode::Term("grace".to_string()),
                    QueryNode::Term("mercy".to_string()),
                ]),
                QueryNode::Term("peace".to_string()),
            ])
        );

        // a OR b AND c => And(Or(a, b), c) - strictly left to right.
        let query = compile("grace OR mercy AND peace").unwrap();
        assert_eq!(
            query.root,
            QueryNode::And(vec![
                QueryNode::Or(vec![
                    QueryNode::Term("grace".to_string()),
                    QueryNode::Term("mercy".to_string()),
                ]),
                QueryNode::Term("peace".to_string()),
            ])
        );
    }

    #[test]
    fn test_operators_are_case_insensitive() {
        let lower = compile("faith and not works").unwrap();
        let upper = compile("faith AND NOT works").unwrap();
        assert_eq!(lower.root, upper.root);
    }

    #[test]
    fn test_quoted_keyword_is_a_phrase() {
        let query = compile("\"AND\"").unwrap();
        assert_eq!(query.root, QueryNode::Phrase("AND".to_string()));
    }

    #[test]
    fn test_blank_query_rejected() {
        for input in ["", "   ", "\t"] {
            assert!(matches!(
                compile(input),
                Err(ScriptureError::MalformedQuery { .. })
            ));
        }
    }

    #[test]
    fn test_operator_only_query_rejected() {
        assert!(matches!(
            compile("AND OR NOT"),
            Err(ScriptureError::MalformedQuery { .. })
        ));
    }

    #[test]
    fn test_injection_syntax_is_stripped() {
        let query = compile("faith* ^love (mercy) NEAR/3").unwrap();
        assert_eq!(
            query.root,
            QueryNode::And(vec![
                QueryNode::Term("faith".to_string()),
                QueryNode::Term("love".to_string()),
                QueryNode::Term("mercy".to_string()),
                QueryNode::Term("near".to_string()),
                QueryNode::Term("3".to_string()),
            ])
        );

        // Syntax-only input sanitizes to nothing.
        assert!(matches!(
            compile("*^():~"),
            Err(ScriptureError::MalformedQuery { .. })
        ));
    }

    #[test]
    fn test_unterminated_quote_degrades_gracefully() {
        let query = compile("\"love your").unwrap();
        assert_eq!(query.root, QueryNode::Phrase("love your".to_string()));
    }

    #[test]
    fn test_trailing_operator_degrades_gracefully() {
        let query = compile("faith AND").unwrap();
        assert_eq!(query.root, QueryNode::Term("faith".to_string()));
    }

    #[test]
    fn test_required_phrases() {
        let query = compile("\"living water\" AND hope").unwrap();
        assert_eq!(query.required_phrases(), vec!["living water"]);

        // A phrase under OR is not required in every result.
        let query = compile("\"living water\" OR hope").unwrap();
        assert!(query.required_phrases().is_empty());

        // A negated phrase is not required either.
        let query = compile("hope AND NOT \"living water\"").unwrap();
        assert_eq!(query.required_phrases(), vec![] as Vec<&str>);
    }

    #[test]
    fn test_terms_are_lowercased() {
        let query = compile("Faith HOPE").unwrap();
        assert_eq!(
            query.root,
            QueryNode::And(vec![
                QueryNode::Term("faith".to_string()),
                QueryNode::Term("hope".to_string()),
            ])
        );
    }
}
