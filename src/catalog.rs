use include_dir::{include_dir, Dir};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

static CATALOG_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/catalogs");

const BUILTIN_CATALOG: &str = "default.json";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse catalog: {0}")]
    Json(#[from] serde_json::Error),

    #[error("built-in catalog {0} is missing or not valid utf-8")]
    MissingBuiltin(&'static str),
}

/// A playable character and the attribute tags that hold for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Character {
    name: String,
    tags: BTreeSet<String>,
}

impl Character {
    /// Tags are stored trimmed and lowercased.
    pub fn new<N, I, T>(name: N, tags: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        Self {
            name: name.into(),
            tags: tags.into_iter().map(|t| canonical_tag(t.as_ref())).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    /// Exact lookup against the canonical tag set.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

/// A yes/no question bound to one attribute tag
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Question {
    pub tag: String,
    pub prompt: String,
}

#[derive(Deserialize)]
struct RawCharacter {
    name: String,
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Deserialize)]
struct RawCatalog {
    name: String,
    #[serde(default)]
    characters: Vec<RawCharacter>,
    #[serde(default)]
    questions: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    pub name: String,
    pub characters: Vec<Character>,
    pub questions: Vec<Question>,
}

impl Catalog {
    pub fn new(name: impl Into<String>, characters: Vec<Character>, questions: Vec<Question>) -> Self {
        let questions = questions
            .into_iter()
            .map(|q| Question {
                tag: canonical_tag(&q.tag),
                prompt: q.prompt,
            })
            .collect();
        Self {
            name: name.into(),
            characters,
            questions,
        }
    }

    pub fn builtin() -> Result<Self, CatalogError> {
        let contents = CATALOG_DIR
            .get_file(BUILTIN_CATALOG)
            .and_then(|f| f.contents_utf8())
            .ok_or(CatalogError::MissingBuiltin(BUILTIN_CATALOG))?;
        Self::from_json_str(contents)
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let raw: RawCatalog = serde_json::from_str(json)?;
        let characters = raw
            .characters
            .into_iter()
            .map(|c| Character::new(c.name, c.tags))
            .collect();
        Ok(Self::new(raw.name, characters, raw.questions))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }
}

fn canonical_tag(tag: &str) -> String {
    tag.trim().to_lowercase()
}
