pub mod errors;
pub mod term;
pub mod source;
pub mod occurrences;
pub mod rank_list;
pub mod dictionary;
pub mod corpora;
