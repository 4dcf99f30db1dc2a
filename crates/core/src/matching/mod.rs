//! Fuzzy title matching primitives.
//!
//! `similarity` scores two strings by normalized edit distance,
//! `normalize_title` produces the canonical comparison key. The resolver
//! combines the two to bind catalog works to searched titles.

mod normalize;
mod similarity;

pub use normalize::normalize_title;
pub use similarity::similarity;
