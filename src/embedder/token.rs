use indexmap::IndexSet;

/// Lowercase `text` and drop every ASCII punctuation character.
/// Punctuation is removed rather than replaced, so `"dog's"` becomes `"dogs"`.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect()
}

/// Normalized tokens of `text` in order, duplicates kept
///
/// # Examples
/// ```
/// use coco_caption_embed::embedder::token::tokenize;
/// assert_eq!(tokenize("A dog, a DOG!"), vec!["a", "dog", "a", "dog"]);
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    normalize(text)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Distinct normalized tokens of `text`, in first-seen order
pub fn token_set(text: &str) -> IndexSet<String> {
    normalize(text)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Token multiset of a whole corpus: every document joined by a space, then tokenized.
/// Repeated words are kept, so this is not a document frequency.
pub fn corpus_tokens<T>(documents: &[T]) -> Vec<String>
where
    T: AsRef<str>,
{
    let joined = documents
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join(" ");
    tokenize(&joined)
}
