//! Request bodies for gist writes

use serde::Serialize;
use std::collections::BTreeMap;

/// File content for create/update
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FileContent {
    pub content: String,
}

/// Body of `POST /gists`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewGist {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub public: bool,
    pub files: BTreeMap<String, FileContent>,
}

impl NewGist {
    pub fn new(public: bool) -> Self {
        Self {
            description: None,
            public,
            files: BTreeMap::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn file(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.insert(
            name.into(),
            FileContent {
                content: content.into(),
            },
        );
        self
    }
}

/// One file change in `PATCH /gists/{id}`. `None` deletes the file.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

/// Body of `PATCH /gists/{id}`
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct GistUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub files: BTreeMap<String, Option<FileUpdate>>,
}

impl GistUpdate {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn set_content(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.insert(
            name.into(),
            Some(FileUpdate {
                content: Some(content.into()),
                filename: None,
            }),
        );
        self
    }

    pub fn rename(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.files.insert(
            from.into(),
            Some(FileUpdate {
                content: None,
                filename: Some(to.into()),
            }),
        );
        self
    }

    pub fn remove(mut self, name: impl Into<String>) -> Self {
        self.files.insert(name.into(), None);
        self
    }
}
