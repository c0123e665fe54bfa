use std::fmt::{Display, Formatter};

use serde::Serialize;
use serde_json::Value;

/// One parsed YAML file. Keys keep the order in which they appear in the file.
pub type Record = serde_json::Map<String, Value>;

pub const METADATA_SECTION: &str = "metadata";
pub const DOCUMENT_CONTROL_SECTION: &str = "document_control";

const METADATA_POSITION: usize = 6;
const DOCUMENT_CONTROL_POSITION: usize = 10;

const METADATA_FIELDS: [&str; 5] = [
    "document_no",
    "effective_date",
    "document_rev",
    "title",
    "document_code",
];

const DOCUMENT_CONTROL_FIELDS: [&str; 3] =
    ["revision_history", "prepared_by", "reviewed_approved_by"];

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct LoadedDocument {
    pub name: String,
    pub record: Record,
}

impl LoadedDocument {
    pub fn new(name: impl Into<String>, record: Record) -> Self {
        Self {
            name: name.into(),
            record,
        }
    }

    pub fn section(&self, section: &str) -> Option<&Value> {
        self.record.get(section)
    }

    /// Top-level keys with the virtual `metadata` and `document_control`
    /// sections spliced in at their conventional positions.
    pub fn sections(&self) -> Vec<String> {
        let mut sections: Vec<String> = self.record.keys().cloned().collect();

        let at = METADATA_POSITION.min(sections.len());
        sections.insert(at, METADATA_SECTION.to_owned());

        let at = DOCUMENT_CONTROL_POSITION.min(sections.len());
        sections.insert(at, DOCUMENT_CONTROL_SECTION.to_owned());

        sections
    }

    /// Header and footer items. `document_type` is stored under `type` by the
    /// template format; `document_type` is accepted as well.
    ///
    /// # Errors
    /// Returns the name of the first missing key.
    pub fn metadata(&self) -> Result<Record, &'static str> {
        let document_type = self
            .section("type")
            .or_else(|| self.section("document_type"))
            .ok_or("type")?;

        let mut view = Record::new();
        view.insert("document_type".to_owned(), document_type.clone());
        view.extend(self.project(&METADATA_FIELDS)?);

        Ok(view)
    }

    /// Revision history, preparers and reviewers.
    ///
    /// # Errors
    /// Returns the name of the first missing key.
    pub fn document_control(&self) -> Result<Record, &'static str> {
        self.project(&DOCUMENT_CONTROL_FIELDS)
    }

    fn project(&self, fields: &[&'static str]) -> Result<Record, &'static str> {
        fields
            .iter()
            .map(|&field| {
                self.section(field)
                    .map(|value| (field.to_owned(), value.clone()))
                    .ok_or(field)
            })
            .collect()
    }
}

impl Display for LoadedDocument {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let sections = self.sections();
        write!(f, "{} ({} sections): {}", self.name, sections.len(), sections.join(", "))
    }
}
