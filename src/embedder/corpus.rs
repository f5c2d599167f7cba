use indexmap::IndexMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::embedder::token::token_set;

/// Document frequencies of a caption corpus.
/// Keeps the number of documents and, per token, the number of documents containing it.
/// Counts only ever grow; a changed corpus is rebuilt, not patched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Corpus {
    /// documents added, including ones with no tokens
    doc_num: u64,
    /// token -> number of documents containing it, always >= 1
    token_counts: IndexMap<Box<str>, u64>,
}

impl Corpus {
    /// Create a new instance
    pub fn new() -> Self {
        Self {
            doc_num: 0,
            token_counts: IndexMap::new(),
        }
    }

    /// Build from documents, one pass in order
    pub fn from_documents<T>(documents: &[T]) -> Self
    where
        T: AsRef<str>,
    {
        let mut corpus = Self::new();
        for doc in documents {
            corpus.add_doc(doc.as_ref());
        }
        corpus
    }

    /// Build from documents on the rayon pool.
    /// Each worker fills its own corpus, shards are merged by summing counts.
    pub fn par_from_documents<T>(documents: &[T]) -> Self
    where
        T: AsRef<str> + Sync,
    {
        documents
            .par_iter()
            .fold(Self::new, |mut shard, doc| {
                shard.add_doc(doc.as_ref());
                shard
            })
            .reduce(Self::new, |mut a, b| {
                a.merge_corpus(&b);
                a
            })
    }

    /// Add one document; each distinct token counts once
    pub fn add_doc(&mut self, text: &str) {
        let set = token_set(text);
        self.add_set(set.iter());
    }

    /// Add one document given as an already deduplicated token set
    pub fn add_set<I, T>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        self.doc_num += 1;
        for token in tokens {
            match self.token_counts.get_mut(token.as_ref()) {
                Some(count) => *count += 1,
                None => {
                    self.token_counts.insert(token.as_ref().into(), 1);
                }
            }
        }
    }

    /// Merge another corpus into self
    pub fn merge_corpus(&mut self, other: &Corpus) {
        for (token, &count) in other.token_counts.iter() {
            self.token_counts
                .entry(token.clone())
                .and_modify(|c| *c += count)
                .or_insert(count);
        }
        self.doc_num += other.doc_num;
    }

    /// Get the number of documents in the corpus
    #[inline]
    pub fn doc_num(&self) -> u64 {
        self.doc_num
    }

    /// Number of documents containing `token`, 0 if never seen
    #[inline]
    pub fn token_count(&self, token: &str) -> u64 {
        self.token_counts.get(token).copied().unwrap_or(0)
    }

    /// Get the current vocabulary size (number of unique tokens)
    #[inline]
    pub fn vocab_size(&self) -> usize {
        self.token_counts.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.token_counts.iter().map(|(k, &v)| (k.as_ref(), v))
    }
}

/// token -> number of documents it appears in
pub fn document_frequency<T>(documents: &[T]) -> IndexMap<String, u64>
where
    T: AsRef<str>,
{
    Corpus::from_documents(documents)
        .iter()
        .map(|(token, count)| (token.to_string(), count))
        .collect()
}
