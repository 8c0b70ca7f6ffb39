//! Query parsing for the vault note search engine.
//!
//! Turns a raw query string into a [`ParsedQuery`]: conjunctive terms,
//! literal phrases, excludes, OR-groups, field/tag/path/`in:` filters and an
//! optional regex clause, plus a commands-mode escape hatch. Parsing never
//! fails outright; the only recoverable failure (an invalid regex clause) is
//! carried in [`ParsedQuery::errors`].
//!
//! # Example
//!
//! ```
//! use vault_config::Settings;
//! use vault_query::parse;
//!
//! let settings = Settings::default();
//! let query = parse(r#"tag:work "exact phrase" -exclude test"#, &settings);
//! assert_eq!(query.terms, vec!["test".to_string()]);
//! assert_eq!(query.phrases, vec!["exact phrase".to_string()]);
//! ```

#![warn(missing_docs)]

mod error;
mod parser;
mod token;
mod types;

pub use error::{QueryError, QueryErrorKind};
pub use parser::{parse, parse_with_errors};
pub use types::{FieldRestriction, Filters, ParsedQuery, QueryMode, RegexClause};
