use std::marker::PhantomData;

use tracing::debug;

use crate::{
    embedder::{idf::IdfTable, token::tokenize, vectors::WordVectors},
    error::{Error, Result},
    utils::{vector::{add_scaled, zeros}, weight::Weight},
};

/// Embed one caption as the IDF-weighted sum of its word vectors.
///
/// Tokens are visited in order; for each one the IDF weight is looked up before the vector.
/// * a token missing from `idf` is an error (`Error::UnknownIdf`)
/// * a token missing from `vectors` turns the whole result into the zero vector
/// * an empty caption gives the zero vector
/// * a vector whose length differs from `vectors.dim()` is an error (`Error::DimensionMismatch`)
///
/// The result always has `vectors.dim()` elements.
pub fn embed_caption<N, V>(caption: &str, idf: &IdfTable, vectors: &V) -> Result<Vec<N>>
where
    N: Weight,
    V: WordVectors<N> + ?Sized,
{
    let dim = vectors.dim();
    let mut embedding = zeros(dim);
    for token in tokenize(caption) {
        let weight = idf
            .get(&token)
            .ok_or_else(|| Error::UnknownIdf { token: token.clone() })?;
        match vectors.get(&token) {
            Some(v) if v.len() != dim => {
                return Err(Error::DimensionMismatch { expected: dim, found: v.len() });
            }
            Some(v) => add_scaled(&mut embedding, v, N::from_weight(weight)),
            None => {
                debug!(token = %token, "out-of-vocabulary token, caption embedding zeroed");
                return Ok(zeros(dim));
            }
        }
    }
    Ok(embedding)
}

/// Borrowed IDF table and word vectors for embedding many captions
pub struct CaptionEmbedder<'a, N, V>
where
    N: Weight,
    V: WordVectors<N> + ?Sized,
{
    idf: &'a IdfTable,
    vectors: &'a V,
    _marker: PhantomData<N>,
}

impl<'a, N, V> CaptionEmbedder<'a, N, V>
where
    N: Weight,
    V: WordVectors<N> + ?Sized,
{
    pub fn new(idf: &'a IdfTable, vectors: &'a V) -> Self {
        Self {
            idf,
            vectors,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.vectors.dim()
    }

    #[inline]
    pub fn embed(&self, caption: &str) -> Result<Vec<N>> {
        embed_caption(caption, self.idf, self.vectors)
    }

    /// Embed every caption, stopping at the first error
    pub fn embed_many<T>(&self, captions: &[T]) -> Result<Vec<Vec<N>>>
    where
        T: AsRef<str>,
    {
        captions.iter().map(|c| self.embed(c.as_ref())).collect()
    }
}
