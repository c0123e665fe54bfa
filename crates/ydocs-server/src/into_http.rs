use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Local;
use color_eyre::Report;
use serde_json::json;
use std::{fmt, io::Write};
use termcolor::{ColorChoice, StandardStream};
use tracing::{error, warn};
use ydocs_common::LoadError;

#[derive(Debug)]
pub enum HttpError {
    SourceNotFound { msg: String },
    SourceNotDirectory { msg: String },
    Parsing { file: String, msg: String },
    MissingDocument { msg: String },
    MissingSection { msg: String },
    Internal { err: String },
}

impl HttpError {
    pub fn from_report(err: Report) -> Self {
        error!("HTTP handler error: {}", err.root_cause());

        if let Some(bt) = err
            .handler()
            .downcast_ref::<color_eyre::Handler>()
            .and_then(|h| h.backtrace())
        {
            error!("Backtrace:");
            let mut stream = StandardStream::stderr(ColorChoice::Auto);
            let _ = writeln!(&mut stream, "{bt:?}");
        }

        HttpError::Internal {
            err: err.to_string(),
        }
    }

    pub fn missing_document(document: &str) -> Self {
        HttpError::MissingDocument {
            msg: format!("Document {document}.yml not found"),
        }
    }

    pub fn missing_section(document: &str, section: &str) -> Self {
        HttpError::MissingSection {
            msg: format!("Section '{section}' doesn't exist in {document}.yml"),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            HttpError::SourceNotFound { .. }
            | HttpError::MissingDocument { .. }
            | HttpError::MissingSection { .. } => StatusCode::NOT_FOUND,
            HttpError::SourceNotDirectory { .. }
            | HttpError::Parsing { .. }
            | HttpError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            HttpError::SourceNotFound { .. } => "source_not_found",
            HttpError::SourceNotDirectory { .. } => "source_not_directory",
            HttpError::Parsing { .. } => "parse_error",
            HttpError::MissingDocument { .. } => "missing_document",
            HttpError::MissingSection { .. } => "missing_section",
            HttpError::Internal { .. } => "internal",
        }
    }

    fn message(&self) -> &str {
        match self {
            HttpError::SourceNotFound { msg }
            | HttpError::SourceNotDirectory { msg }
            | HttpError::Parsing { msg, .. }
            | HttpError::MissingDocument { msg }
            | HttpError::MissingSection { msg } => msg,
            HttpError::Internal { err } => err,
        }
    }
}

macro_rules! impl_from {
    ($from:ty) => {
        impl From<$from> for HttpError {
            fn from(err: $from) -> Self {
                let report = color_eyre::Report::from(err);
                Self::from_report(report)
            }
        }
    };
}

impl_from!(std::io::Error);
impl_from!(tokio::task::JoinError);

impl From<LoadError> for HttpError {
    fn from(err: LoadError) -> Self {
        let msg = err.to_string();
        match err {
            LoadError::SourceNotFound(_) => {
                warn!("{msg}");
                HttpError::SourceNotFound { msg }
            }
            LoadError::NotADirectory(_) => {
                error!("{msg}");
                HttpError::SourceNotDirectory { msg }
            }
            LoadError::Parse { file, .. } => {
                error!("{msg}");
                HttpError::Parsing {
                    file: file.into_string(),
                    msg,
                }
            }
            LoadError::Io(err) => err.into(),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let date = Local::now().to_rfc3339();
        let status = self.status();

        let body = match &self {
            HttpError::Parsing { file, msg } => json!({
                "err": msg,
                "type": self.kind(),
                "file": file,
                "date": date
            }),
            _ => json!({
                "err": self.message(),
                "type": self.kind(),
                "date": date
            }),
        };

        (status, Json(body)).into_response()
    }
}

impl std::error::Error for HttpError {}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HttpError: {}", self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;

    #[test]
    fn load_errors_map_to_statuses() {
        let cases = [
            (
                LoadError::SourceNotFound(Utf8PathBuf::from("yml")),
                StatusCode::NOT_FOUND,
            ),
            (
                LoadError::NotADirectory(Utf8PathBuf::from("yml")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                LoadError::Parse {
                    file: Utf8PathBuf::from("yml/bad.yml"),
                    reason: "oops".into(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(HttpError::from(err).status(), status);
        }
    }

    #[test]
    fn missing_messages_name_the_file() {
        assert_eq!(
            HttpError::missing_document("sop").to_string(),
            "HttpError: Document sop.yml not found"
        );
        assert_eq!(
            HttpError::missing_section("sop", "scope").to_string(),
            "HttpError: Section 'scope' doesn't exist in sop.yml"
        );
    }
}
