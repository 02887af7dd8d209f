//! Keyword mappings and placeholder substitution
//!
//! A keyword mapping ties a placeholder key to the literal value it stands
//! for in one environment. Exports replace literals with `{{.KEY}}` tokens;
//! imports replace the tokens with the target environment's literals.
//!
//! # Resolution
//!
//! The mapping used for a resource is the type's global mapping with the
//! resource's own overrides laid on top, key by key.

mod resolver;
mod template;

use std::collections::BTreeMap;

pub use resolver::KeywordResolver;
pub use template::{TemplateEngine, placeholder};

/// Placeholder key to literal value
///
/// Ordered so that resolution and substitution never depend on hash order.
pub type KeywordMapping = BTreeMap<String, String>;
