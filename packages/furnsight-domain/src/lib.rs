pub mod matching;
pub mod query_terms;
pub mod vocabulary;
