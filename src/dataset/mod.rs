//! MS-COCO caption annotations.
//!
//! Reads `captions_*.json` and answers id lookups from hash indexes built at load time.
//! Duplicate ids resolve to their first occurrence.

use std::{fs::File, io::{BufReader, Read}, path::Path};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    embedder::{embedding::embed_caption, idf::IdfTable, vectors::WordVectors},
    error::{Error, Result},
    utils::weight::Weight,
};

/// One caption of an image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: u64,
    pub image_id: u64,
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub id: u64,
    pub coco_url: String,
}

/// Top level of the annotation file; every other key is ignored
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaptionFile {
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone)]
pub struct CocoCaptions {
    data: CaptionFile,
    /// caption id -> position in `annotations`
    caption_index: IndexMap<u64, usize>,
    /// image id -> position in `images`
    image_index: IndexMap<u64, usize>,
    /// image id -> positions in `annotations`, file order
    image_captions: IndexMap<u64, Vec<usize>>,
}

impl CocoCaptions {
    pub fn new(data: CaptionFile) -> Self {
        let mut caption_index = IndexMap::with_capacity(data.annotations.len());
        let mut image_captions: IndexMap<u64, Vec<usize>> = IndexMap::new();
        for (pos, ann) in data.annotations.iter().enumerate() {
            caption_index.entry(ann.id).or_insert(pos);
            image_captions.entry(ann.image_id).or_default().push(pos);
        }
        let mut image_index = IndexMap::with_capacity(data.images.len());
        for (pos, img) in data.images.iter().enumerate() {
            image_index.entry(img.id).or_insert(pos);
        }
        Self {
            data,
            caption_index,
            image_index,
            image_captions,
        }
    }

    /// Load an annotation file such as `captions_train2014.json`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let captions = Self::from_reader(BufReader::new(file))?;
        info!(
            path = %path.as_ref().display(),
            captions = captions.data.annotations.len(),
            images = captions.data.images.len(),
            "loaded caption annotations"
        );
        Ok(captions)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let data: CaptionFile = serde_json::from_reader(reader)?;
        Ok(Self::new(data))
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let data: CaptionFile = serde_json::from_str(json)?;
        Ok(Self::new(data))
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.data.annotations
    }

    pub fn images(&self) -> &[Image] {
        &self.data.images
    }

    /// Every caption id, file order
    pub fn all_caption_ids(&self) -> Vec<u64> {
        self.data.annotations.iter().map(|a| a.id).collect()
    }

    /// Every caption text, file order
    pub fn all_captions(&self) -> Vec<&str> {
        self.data.annotations.iter().map(|a| a.caption.as_str()).collect()
    }

    /// Every image id, file order
    pub fn all_image_ids(&self) -> Vec<u64> {
        self.data.images.iter().map(|i| i.id).collect()
    }

    pub fn caption(&self, caption_id: u64) -> Option<&str> {
        self.annotation(caption_id).map(|a| a.caption.as_str())
    }

    /// Image the caption belongs to
    pub fn image_id(&self, caption_id: u64) -> Option<u64> {
        self.annotation(caption_id).map(|a| a.image_id)
    }

    /// Caption ids of an image, empty if the image has none
    pub fn caption_ids(&self, image_id: u64) -> Vec<u64> {
        self.image_annotations(image_id).map(|a| a.id).collect()
    }

    /// Caption texts of an image, empty if the image has none
    pub fn captions(&self, image_id: u64) -> Vec<&str> {
        self.image_annotations(image_id).map(|a| a.caption.as_str()).collect()
    }

    pub fn image_url(&self, image_id: u64) -> Option<&str> {
        let pos = *self.image_index.get(&image_id)?;
        Some(self.data.images[pos].coco_url.as_str())
    }

    /// Embedding of the caption with id `caption_id`
    pub fn caption_vector<N, V>(&self, caption_id: u64, idf: &IdfTable, vectors: &V) -> Result<Vec<N>>
    where
        N: Weight,
        V: WordVectors<N> + ?Sized,
    {
        let caption = self
            .caption(caption_id)
            .ok_or(Error::UnknownCaption { id: caption_id })?;
        embed_caption(caption, idf, vectors)
    }

    fn annotation(&self, caption_id: u64) -> Option<&Annotation> {
        let pos = *self.caption_index.get(&caption_id)?;
        Some(&self.data.annotations[pos])
    }

    fn image_annotations(&self, image_id: u64) -> impl Iterator<Item = &Annotation> {
        self.image_captions
            .get(&image_id)
            .into_iter()
            .flatten()
            .map(|&pos| &self.data.annotations[pos])
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::embedder::vectors::KeyedVectors;

    fn fixture() -> CocoCaptions {
        let value = json!({
            "info": { "year": 2014 },
            "images": [
                { "id": 9, "coco_url": "http://images.cocodataset.org/train2014/000000000009.jpg", "width": 640 },
                { "id": 25, "coco_url": "http://images.cocodataset.org/train2014/000000000025.jpg" }
            ],
            "annotations": [
                { "id": 48, "image_id": 9, "caption": "A cat sat." },
                { "id": 67, "image_id": 25, "caption": "a dog sat" },
                { "id": 126, "image_id": 9, "caption": "A cat on a mat" },
                { "id": 48, "image_id": 25, "caption": "duplicate id" }
            ]
        });
        CocoCaptions::from_json_str(&value.to_string()).unwrap()
    }

    #[test]
    fn lists_ids_and_captions_in_file_order() {
        let coco = fixture();
        assert_eq!(coco.all_caption_ids(), vec![48, 67, 126, 48]);
        assert_eq!(coco.all_image_ids(), vec![9, 25]);
        assert_eq!(coco.all_captions()[1], "a dog sat");
    }

    #[test]
    fn caption_lookups_use_first_match() {
        let coco = fixture();
        assert_eq!(coco.caption(48), Some("A cat sat."));
        assert_eq!(coco.image_id(48), Some(9));
        assert_eq!(coco.caption(1), None);
        assert_eq!(coco.image_id(1), None);
    }

    #[test]
    fn image_lookups() {
        let coco = fixture();
        assert_eq!(coco.caption_ids(9), vec![48, 126]);
        assert_eq!(coco.captions(9), vec!["A cat sat.", "A cat on a mat"]);
        assert_eq!(coco.caption_ids(25), vec![67, 48]);
        assert!(coco.caption_ids(1).is_empty());
        assert!(coco.captions(1).is_empty());
        assert_eq!(
            coco.image_url(25),
            Some("http://images.cocodataset.org/train2014/000000000025.jpg")
        );
        assert_eq!(coco.image_url(1), None);
    }

    #[test]
    fn missing_sections_load_as_empty() {
        let coco = CocoCaptions::from_json_str("{}").unwrap();
        assert!(coco.annotations().is_empty());
        assert!(coco.images().is_empty());
        assert!(CocoCaptions::from_json_str("{\"annotations\": 3}").is_err());
    }

    #[test]
    fn caption_vector_embeds_by_id() {
        let coco = fixture();
        let idf = IdfTable::from_documents(&coco.all_captions());
        let mut kv = KeyedVectors::<f32>::new(2);
        kv.insert("a", &[1.0, 1.0]).unwrap();
        kv.insert("cat", &[1.0, 0.0]).unwrap();
        kv.insert("sat", &[0.0, 1.0]).unwrap();

        let v = coco.caption_vector(48, &idf, &kv).unwrap();
        assert_eq!(v, embed_caption("A cat sat.", &idf, &kv).unwrap());
        assert_eq!(v.len(), 2);
        // "on" and "mat" have no vectors
        assert_eq!(coco.caption_vector(126, &idf, &kv).unwrap(), vec![0.0, 0.0]);
        assert!(matches!(
            coco.caption_vector(7, &idf, &kv),
            Err(Error::UnknownCaption { id: 7 })
        ));
    }
}
