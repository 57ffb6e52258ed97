//! SPARQL-facing pieces: query validation, the results wire format and the
//! example catalogue.

pub mod examples;
pub mod results;
pub mod validator;

pub use examples::{EXAMPLE_QUERIES, ExampleQuery};
pub use results::{Binding, Head, Results, SparqlResults};
pub use validator::{
    ALLOWED_KEYWORDS, QueryForm, QueryValidator, SyntaxCheck, ValidationError, validate,
};
