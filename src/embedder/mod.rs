//! TF-IDF weighted caption embeddings.
//!
//! `corpus` counts document frequencies, `idf` turns them into weights, `vectors` supplies
//! pretrained word vectors and `embedding` sums the weighted vectors of one caption.

pub mod corpus;
pub mod embedding;
pub mod idf;
pub mod token;
pub mod vectors;
