mod document;
pub use document::*;

mod datasources;
pub use datasources::*;

mod yaml;
pub use yaml::*;

#[cfg(test)]
mod tests;

/// Returns the document name for a file name: everything before the first `.`.
#[inline]
pub fn document_name(file_name: &str) -> &str {
    file_name.split('.').next().unwrap_or(file_name)
}
