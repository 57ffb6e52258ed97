//! Query validation performed before a query is forwarded upstream.
//!
//! Validation is intentionally shallow by default: the query must start with
//! one of the SPARQL query or update keywords and a SELECT must carry a WHERE
//! clause. Deployments that want a real grammar check opt into
//! [`SyntaxCheck::Full`], which runs the query through `spargebra`.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use spargebra::{Query, Update};
use std::fmt;
use thiserror::Error;

/// Keywords a query may start with, in the order they are matched.
pub const ALLOWED_KEYWORDS: [&str; 6] = ["SELECT", "CONSTRUCT", "ASK", "DESCRIBE", "INSERT", "DELETE"];

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("query cannot be empty")]
    Empty,

    #[error(
        "query must start with a valid SPARQL keyword (SELECT, CONSTRUCT, ASK, DESCRIBE, INSERT, or DELETE)"
    )]
    UnknownKeyword,

    #[error("SELECT query must contain a WHERE clause")]
    MissingWhereClause,

    #[error("syntax error: {0}")]
    Syntax(String),
}

// ============================================================================
// Query forms
// ============================================================================

/// The leading keyword a query was accepted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryForm {
    Select,
    Construct,
    Ask,
    Describe,
    Insert,
    Delete,
}

impl QueryForm {
    fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "SELECT" => Some(QueryForm::Select),
            "CONSTRUCT" => Some(QueryForm::Construct),
            "ASK" => Some(QueryForm::Ask),
            "DESCRIBE" => Some(QueryForm::Describe),
            "INSERT" => Some(QueryForm::Insert),
            "DELETE" => Some(QueryForm::Delete),
            _ => None,
        }
    }

    /// Whether the form belongs to SPARQL Update rather than SPARQL Query.
    pub fn is_update(&self) -> bool {
        matches!(self, QueryForm::Insert | QueryForm::Delete)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QueryForm::Select => "SELECT",
            QueryForm::Construct => "CONSTRUCT",
            QueryForm::Ask => "ASK",
            QueryForm::Describe => "DESCRIBE",
            QueryForm::Insert => "INSERT",
            QueryForm::Delete => "DELETE",
        }
    }
}

impl fmt::Display for QueryForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Validator
// ============================================================================

/// How thoroughly queries are checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyntaxCheck {
    /// Leading keyword and SELECT/WHERE shape only.
    #[default]
    Keywords,
    /// Keyword rules followed by a full SPARQL 1.1 grammar parse.
    Full,
}

impl fmt::Display for SyntaxCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxCheck::Keywords => write!(f, "keywords"),
            SyntaxCheck::Full => write!(f, "full"),
        }
    }
}

/// Stateless query validator.
///
/// Identical input always yields the identical outcome. The original casing of
/// the query is never altered; uppercasing happens on a scratch copy used for
/// keyword matching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryValidator {
    syntax_check: SyntaxCheck,
}

impl QueryValidator {
    pub fn new(syntax_check: SyntaxCheck) -> Self {
        Self { syntax_check }
    }

    /// Validate `query`, returning the detected query form on success.
    pub fn validate(&self, query: &str) -> Result<QueryForm, ValidationError> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty);
        }

        let upper = trimmed.to_uppercase();
        let form = ALLOWED_KEYWORDS
            .iter()
            .find(|keyword| upper.starts_with(*keyword))
            .and_then(|keyword| QueryForm::from_keyword(keyword))
            .ok_or(ValidationError::UnknownKeyword)?;

        if form == QueryForm::Select && !upper.contains("WHERE") {
            return Err(ValidationError::MissingWhereClause);
        }

        if self.syntax_check == SyntaxCheck::Full {
            check_grammar(trimmed, form)?;
        }

        Ok(form)
    }
}

fn check_grammar(query: &str, form: QueryForm) -> Result<(), ValidationError> {
    let outcome = if form.is_update() {
        Update::parse(query, None).map(|_| ())
    } else {
        Query::parse(query, None).map(|_| ())
    };
    outcome.map_err(|e| ValidationError::Syntax(e.to_string()))
}

/// Validate with the default keyword rules.
pub fn validate(query: &str) -> Result<(), ValidationError> {
    QueryValidator::default().validate(query).map(|_| ())
}
