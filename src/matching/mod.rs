pub mod keyword;
pub mod text;

pub use keyword::{JobProfilePredicate, KeywordPredicate, RuleVariant};
pub use text::html_to_text;
