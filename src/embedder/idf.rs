use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::embedder::corpus::Corpus;

/// IDF weights of a corpus snapshot: `ln(N / (1 + df))`.
/// Tokens present in every document get a negative weight.
/// Rebuild from a new `Corpus` whenever the captions change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdfTable {
    weights: IndexMap<Box<str>, f64>,
    /// N, the number of documents the table was built from
    doc_num: u64,
}

impl IdfTable {
    /// IDF of one token given its document frequency
    #[inline]
    pub fn idf_calc(doc_num: u64, doc_freq: u64) -> f64 {
        (doc_num as f64 / (1.0 + doc_freq as f64)).ln()
    }

    pub fn from_corpus(corpus: &Corpus) -> Self {
        let doc_num = corpus.doc_num();
        let weights = corpus
            .iter()
            .map(|(token, df)| (Box::<str>::from(token), Self::idf_calc(doc_num, df)))
            .collect();
        Self { weights, doc_num }
    }

    pub fn from_documents<T>(documents: &[T]) -> Self
    where
        T: AsRef<str>,
    {
        Self::from_corpus(&Corpus::from_documents(documents))
    }

    /// Weight of `token`, `None` if the corpus never contained it
    #[inline]
    pub fn get(&self, token: &str) -> Option<f64> {
        self.weights.get(token).copied()
    }

    #[inline]
    pub fn doc_num(&self) -> u64 {
        self.doc_num
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(k, &v)| (k.as_ref(), v))
    }
}

/// token -> `ln(N / (1 + df))` where N is `documents.len()`
pub fn inverse_document_frequency<T>(documents: &[T]) -> IndexMap<String, f64>
where
    T: AsRef<str>,
{
    IdfTable::from_documents(documents)
        .iter()
        .map(|(token, w)| (token.to_string(), w))
        .collect()
}
