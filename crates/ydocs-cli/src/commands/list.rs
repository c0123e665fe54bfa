use serde::Serialize;
use std::io::Write;
use ydocs_common::{DocumentSource, LoadedDocument};

use crate::{CliError, Format};

#[derive(Serialize, Debug)]
struct Listing<'a> {
    name: &'a str,
    sections: Vec<String>,
}

impl<'a> From<&'a LoadedDocument> for Listing<'a> {
    fn from(document: &'a LoadedDocument) -> Self {
        Self {
            name: &document.name,
            sections: document.sections(),
        }
    }
}

pub fn handle(source: &DocumentSource, format: &Format) -> Result<(), CliError> {
    let documents = source.load_all()?;
    let mut stdout = std::io::stdout().lock();
    render(&mut stdout, source, &documents, format)
}

fn render<W: Write>(
    out: &mut W,
    source: &DocumentSource,
    documents: &[LoadedDocument],
    format: &Format,
) -> Result<(), CliError> {
    match format {
        Format::Pretty => {
            writeln!(out, "Documents in `{}`:", source.dir())?;
            for doc in documents {
                writeln!(out, "  {doc}")?;
            }
        }
        Format::Json => {
            let listing: Vec<Listing<'_>> = documents.iter().map(Listing::from).collect();
            writeln!(out, "{}", serde_json::to_string_pretty(&listing)?)?;
        }
    }

    Ok(())
}
