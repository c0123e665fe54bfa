use std::io::ErrorKind;

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{LoadedDocument, document_name, parse_record};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Source directory `{0}` does not exist")]
    SourceNotFound(Utf8PathBuf),
    #[error("Source path `{0}` is not a directory")]
    NotADirectory(Utf8PathBuf),
    #[error("Failed to parse `{file}`: {reason}")]
    Parse { file: Utf8PathBuf, reason: String },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// What to do with a file that does not parse.
#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ParseFailurePolicy {
    /// Fail the whole load.
    #[default]
    Abort,
    /// Log a warning and leave the file out.
    Skip,
}

#[derive(Debug, PartialEq)]
pub enum DocumentFormat {
    Yaml,
}

impl DocumentFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        if ext.eq_ignore_ascii_case("yml") || ext.eq_ignore_ascii_case("yaml") {
            Some(DocumentFormat::Yaml)
        } else {
            None
        }
    }
}

/// A directory of YAML documents. Every call reads the disk again.
#[derive(Debug, Clone)]
pub struct DocumentSource {
    dir: Utf8PathBuf,
    policy: ParseFailurePolicy,
}

impl DocumentSource {
    pub fn new(dir: impl Into<Utf8PathBuf>, policy: ParseFailurePolicy) -> Self {
        Self {
            dir: dir.into(),
            policy,
        }
    }

    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    pub fn policy(&self) -> ParseFailurePolicy {
        self.policy
    }

    /// Lists the document files in the directory, sorted by file name.
    pub fn scan(&self) -> Result<Vec<Utf8PathBuf>, LoadError> {
        match std::fs::metadata(&self.dir) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Err(LoadError::NotADirectory(self.dir.clone())),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(LoadError::SourceNotFound(self.dir.clone()));
            }
            Err(err) => return Err(err.into()),
        }

        let mut sources = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let Ok(path) = Utf8PathBuf::from_path_buf(path) else {
                warn!("Skipping non UTF-8 path in `{}`", self.dir);
                continue;
            };

            let recognised = path
                .extension()
                .and_then(DocumentFormat::from_extension)
                .is_some();

            if recognised && path.is_file() {
                sources.push(path);
            }
        }

        sources.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        debug!(dir = %self.dir, count = sources.len(), "scanned source directory");

        Ok(sources)
    }

    /// Loads every document in the directory.
    pub fn load_all(&self) -> Result<Vec<LoadedDocument>, LoadError> {
        let sources = self.scan()?;
        let mut documents = Vec::with_capacity(sources.len());

        for path in &sources {
            if let Some(document) = self.load_with_policy(path)? {
                documents.push(document);
            }
        }

        info!(
            dir = %self.dir,
            loaded = documents.len(),
            skipped = sources.len() - documents.len(),
            "loaded documents"
        );

        Ok(documents)
    }

    /// Loads the first document called `name`, if any.
    ///
    /// Only files whose name matches are read, so a malformed neighbour does
    /// not affect the lookup.
    pub fn load_named(&self, name: &str) -> Result<Option<LoadedDocument>, LoadError> {
        for path in self.scan()? {
            let matches = path
                .file_name()
                .is_some_and(|file_name| document_name(file_name) == name);

            if matches {
                if let Some(document) = self.load_with_policy(&path)? {
                    return Ok(Some(document));
                }
            }
        }

        Ok(None)
    }

    /// Names of the documents that load, in collection order.
    pub fn names(&self) -> Result<Vec<String>, LoadError> {
        Ok(self
            .load_all()?
            .into_iter()
            .map(|document| document.name)
            .collect())
    }

    fn load_with_policy(&self, path: &Utf8Path) -> Result<Option<LoadedDocument>, LoadError> {
        match load_document(path) {
            Ok(document) => Ok(Some(document)),
            Err(err @ LoadError::Parse { .. }) if self.policy == ParseFailurePolicy::Skip => {
                warn!("{err}. Skipping...");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}

/// Reads and parses a single document file.
pub fn load_document(path: &Utf8Path) -> Result<LoadedDocument, LoadError> {
    let contents = std::fs::read_to_string(path).map_err(|err| {
        if err.kind() == ErrorKind::InvalidData {
            LoadError::Parse {
                file: path.to_owned(),
                reason: "file is not valid UTF-8".to_owned(),
            }
        } else {
            LoadError::Io(err)
        }
    })?;

    let record = parse_record(&contents).map_err(|err| LoadError::Parse {
        file: path.to_owned(),
        reason: err.to_string(),
    })?;

    let name = path.file_name().map(document_name).unwrap_or_default();
    debug!(%path, document = name, "loaded document");

    Ok(LoadedDocument::new(name, record))
}
