/// This crate looks up MS-COCO captions and embeds them as TF-IDF weighted sums of word vectors.
pub mod dataset;
pub mod embedder;
pub mod error;
pub mod utils;

/// Caption annotation accessor
/// Loads `captions_*.json` (`annotations` and `images` lists) and resolves
/// caption ids, image ids and image URLs through hash indexes.
///
/// Lookups that find nothing return `None` or an empty list.
pub use dataset::CocoCaptions;

/// Corpus for IDF calculation
/// Holds the number of documents and, per token, the number of documents
/// it appears in. A document's tokens are counted as a set.
///
/// Can be built sequentially or on the rayon pool; both give the same counts.
pub use embedder::corpus::{document_frequency, Corpus};

/// IDF table
/// Maps each corpus token to `ln(N / (1 + df))`.
/// Tokens found in every document receive a negative weight.
pub use embedder::idf::{inverse_document_frequency, IdfTable};

/// Word vector sources
/// `WordVectors` is the lookup seam used by the embedder; `KeyedVectors`
/// loads word2vec / GloVe text files into memory.
pub use embedder::vectors::{KeyedVectors, WordVectors};

/// Caption embedding
/// Sums the IDF-weighted vectors of a caption's tokens.
/// One out-of-vocabulary token makes the whole embedding zero;
/// a token without an IDF weight is an error.
pub use embedder::embedding::{embed_caption, CaptionEmbedder};

pub use error::{Error, Result};
