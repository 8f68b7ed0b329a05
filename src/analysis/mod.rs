//! Content analysis: sections, facts, keywords, matching

pub mod dates;
pub mod facts;
pub mod keywords;
pub mod matcher;
pub mod roles;
pub mod sections;
pub mod synonyms;
