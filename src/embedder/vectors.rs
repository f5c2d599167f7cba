use std::{collections::HashMap, fs::File, hash::BuildHasher, io::{BufRead, BufReader}, path::Path};

use indexmap::IndexMap;
use tracing::{info, warn};

use crate::{error::{Error, Result}, utils::weight::Weight};

/// Read-only token -> vector lookup with a fixed dimension
pub trait WordVectors<N: Weight> {
    /// length of every vector this source returns
    fn dim(&self) -> usize;
    /// `None` when the token is out of vocabulary
    fn get(&self, token: &str) -> Option<&[N]>;
}

/// Pretrained word vectors held in memory.
/// Rows live back to back in one buffer; `index` maps a word to its row.
#[derive(Debug, Clone)]
pub struct KeyedVectors<N = f32>
where
    N: Weight,
{
    dim: usize,
    index: IndexMap<Box<str>, usize>,
    rows: Vec<N>,
}

impl<N> KeyedVectors<N>
where
    N: Weight,
{
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            index: IndexMap::new(),
            rows: Vec::new(),
        }
    }

    /// Insert or overwrite the vector of `word`
    pub fn insert(&mut self, word: &str, vector: &[N]) -> Result<()> {
        if vector.len() != self.dim {
            return Err(Error::DimensionMismatch { expected: self.dim, found: vector.len() });
        }
        match self.index.get(word) {
            Some(&row) => {
                let start = row * self.dim;
                self.rows[start..start + self.dim].copy_from_slice(vector);
            }
            None => {
                self.index.insert(word.into(), self.index.len());
                self.rows.extend_from_slice(vector);
            }
        }
        Ok(())
    }

    /// Load a word2vec text file (GloVe converted with a `"<count> <dim>"` header).
    /// Raw GloVe text without the header is accepted as well.
    pub fn load_word2vec_format<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let vectors = Self::from_reader(BufReader::new(file))?;
        info!(
            path = %path.as_ref().display(),
            words = vectors.len(),
            dim = vectors.dim,
            "loaded word vectors"
        );
        Ok(vectors)
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut vectors: Option<Self> = None;
        let mut declared: Option<usize> = None;
        let mut row = Vec::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = idx + 1;
            let mut fields = line.split_whitespace();
            let Some(word) = fields.next() else {
                continue;
            };

            if vectors.is_none() && declared.is_none() {
                if let Some((count, dim)) = parse_header(&line) {
                    declared = Some(count);
                    vectors = Some(Self::new(dim));
                    continue;
                }
            }

            row.clear();
            for field in fields {
                let value = N::parse_component(field).ok_or_else(|| Error::Format {
                    line: line_no,
                    message: format!("invalid number {field:?}"),
                })?;
                row.push(value);
            }
            let target = vectors.get_or_insert_with(|| Self::new(row.len()));
            if row.is_empty() || row.len() != target.dim {
                return Err(Error::Format {
                    line: line_no,
                    message: format!("expected {} components for {word:?}, found {}", target.dim, row.len()),
                });
            }
            target.insert(word, &row)?;
        }

        let vectors = vectors.unwrap_or_else(|| Self::new(0));
        if let Some(count) = declared {
            if count != vectors.len() {
                warn!(declared = count, read = vectors.len(), "word vector header count mismatch");
            }
        }
        Ok(vectors)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    #[inline]
    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }
}

/// `"<count> <dim>"`, both integers and nothing else
fn parse_header(line: &str) -> Option<(usize, usize)> {
    let mut fields = line.split_whitespace();
    let count = fields.next()?.parse().ok()?;
    let dim = fields.next()?.parse().ok()?;
    match fields.next() {
        None => Some((count, dim)),
        Some(_) => None,
    }
}

impl<N> WordVectors<N> for KeyedVectors<N>
where
    N: Weight,
{
    #[inline]
    fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    fn get(&self, token: &str) -> Option<&[N]> {
        let row = *self.index.get(token)?;
        let start = row * self.dim;
        Some(&self.rows[start..start + self.dim])
    }
}

/// Dimension is the length of any stored row, 0 for an empty map.
/// Only well defined when every row has the same length; the embedder rejects ragged rows.
impl<N, S> WordVectors<N> for HashMap<String, Vec<N>, S>
where
    N: Weight,
    S: BuildHasher,
{
    fn dim(&self) -> usize {
        self.values().next().map_or(0, Vec::len)
    }

    fn get(&self, token: &str) -> Option<&[N]> {
        HashMap::get(self, token).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn reads_word2vec_text_with_header() {
        let text = "3 2\nthe 0.5 -1\ncat 1 0\n\nsat 0 1e0\n";
        let kv = KeyedVectors::<f32>::from_reader(Cursor::new(text)).unwrap();
        assert_eq!(kv.dim(), 2);
        assert_eq!(kv.len(), 3);
        assert_eq!(kv.get("the"), Some(&[0.5f32, -1.0][..]));
        assert_eq!(kv.get("sat"), Some(&[0.0f32, 1.0][..]));
        assert_eq!(kv.get("dog"), None);
    }

    #[test]
    fn reads_raw_glove_without_header() {
        let text = "the 0.1 0.2 0.3\ncat 1 2 3\n";
        let kv = KeyedVectors::<f64>::from_reader(Cursor::new(text)).unwrap();
        assert_eq!(kv.dim(), 3);
        assert!(kv.contains("cat"));
        assert_eq!(kv.get("cat"), Some(&[1.0, 2.0, 3.0][..]));
    }

    #[test]
    fn header_count_mismatch_is_not_an_error() {
        let kv = KeyedVectors::<f32>::from_reader(Cursor::new("10 1\na 1\n")).unwrap();
        assert_eq!(kv.len(), 1);
    }

    #[test]
    fn empty_input_gives_empty_source() {
        let kv = KeyedVectors::<f32>::from_reader(Cursor::new("")).unwrap();
        assert!(kv.is_empty());
        assert_eq!(kv.dim(), 0);
    }

    #[test]
    fn wrong_arity_reports_line() {
        let err = KeyedVectors::<f32>::from_reader(Cursor::new("2 2\ncat 1 0\ndog 1\n")).unwrap_err();
        match err {
            Error::Format { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn bad_number_reports_line() {
        let err = KeyedVectors::<f32>::from_reader(Cursor::new("cat 1 x\n")).unwrap_err();
        assert!(matches!(err, Error::Format { line: 1, .. }));
    }

    #[test]
    fn insert_checks_dimension_and_overwrites() {
        let mut kv = KeyedVectors::<f32>::new(2);
        kv.insert("cat", &[1.0, 0.0]).unwrap();
        kv.insert("dog", &[0.0, 1.0]).unwrap();
        kv.insert("cat", &[2.0, 2.0]).unwrap();
        assert_eq!(kv.len(), 2);
        assert_eq!(kv.get("cat"), Some(&[2.0f32, 2.0][..]));
        assert_eq!(kv.get("dog"), Some(&[0.0f32, 1.0][..]));
        assert!(matches!(
            kv.insert("bird", &[1.0]),
            Err(Error::DimensionMismatch { expected: 2, found: 1 })
        ));
    }

    #[test]
    fn hashmap_source() {
        let mut map: HashMap<String, Vec<f64>> = HashMap::new();
        assert_eq!(WordVectors::dim(&map), 0);
        map.insert("cat".to_string(), vec![1.0, 0.0]);
        assert_eq!(WordVectors::dim(&map), 2);
        assert_eq!(WordVectors::get(&map, "cat"), Some(&[1.0, 0.0][..]));
        assert_eq!(WordVectors::get(&map, "dog"), None);
    }
}
