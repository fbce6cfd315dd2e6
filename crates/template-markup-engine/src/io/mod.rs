use crate::model::Document;
use crate::options::MarkupOptions;
use crate::parsing::parse_markup;
use crate::serialize::serialize_with;
use relative_path::{RelativePath, RelativePathBuf};
use std::fs;
use std::path::{Path, PathBuf};

/// Extension of template files in the templates directory.
pub const TEMPLATE_EXTENSION: &str = "md";

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid templates directory: {0}")]
    InvalidTemplatesDir(String),
}

/// A template file, addressed relative to the templates directory
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct TemplateFile {
    relative_path: RelativePathBuf,
}

impl TemplateFile {
    pub fn new(relative_path: RelativePathBuf) -> Self {
        Self { relative_path }
    }

    pub fn relative_path(&self) -> &RelativePath {
        &self.relative_path
    }

    /// File name without the template extension
    pub fn display_name(&self) -> &str {
        self.relative_path
            .file_stem()
            .unwrap_or(self.relative_path.as_str())
    }
}

impl From<&str> for TemplateFile {
    fn from(path: &str) -> Self {
        Self::new(RelativePathBuf::from(path))
    }
}

/// Read a template file and return its markup
pub fn read_template(relative_path: &RelativePath, templates_root: &Path) -> Result<String, IoError> {
    let absolute_path = relative_path.to_path(templates_root);
    if !absolute_path.exists() {
        return Err(IoError::NotFound(absolute_path));
    }
    fs::read_to_string(&absolute_path).map_err(IoError::Io)
}

/// Write markup to a template file, creating parent directories
pub fn write_template(
    relative_path: &RelativePath,
    templates_root: &Path,
    content: &str,
) -> Result<(), IoError> {
    let absolute_path = relative_path.to_path(templates_root);
    if let Some(parent) = absolute_path.parent() {
        fs::create_dir_all(parent).map_err(IoError::Io)?;
    }
    log::debug!("writing {} bytes to {}", content.len(), absolute_path.display());
    fs::write(&absolute_path, content).map_err(IoError::Io)
}

/// Read and parse a template
pub fn load_document(relative_path: &RelativePath, templates_root: &Path) -> Result<Document, IoError> {
    read_template(relative_path, templates_root).map(|text| parse_markup(&text))
}

/// Serialize a document in storage form and write it
pub fn save_document(
    relative_path: &RelativePath,
    templates_root: &Path,
    doc: &Document,
    options: &MarkupOptions,
) -> Result<(), IoError> {
    write_template(relative_path, templates_root, &serialize_with(doc, options))
}

/// Scan for template files, sorted by relative path
pub fn scan_templates(templates_root: &Path) -> Result<Vec<TemplateFile>, IoError> {
    validate_templates_dir(templates_root)?;
    let mut files = Vec::new();
    scan_directory_recursive(templates_root, templates_root, &mut files)?;
    files.sort();
    Ok(files)
}

fn scan_directory_recursive(
    root: &Path,
    dir: &Path,
    files: &mut Vec<TemplateFile>,
) -> Result<(), IoError> {
    for entry in fs::read_dir(dir).map_err(IoError::Io)? {
        let path = entry.map_err(IoError::Io)?.path();
        if path.is_dir() {
            scan_directory_recursive(root, &path, files)?;
        } else if let Some(ext) = path.extension()
            && ext == TEMPLATE_EXTENSION
            && let Ok(relative) = path.strip_prefix(root)
        {
            match RelativePathBuf::from_path(relative) {
                Ok(relative) => files.push(TemplateFile::new(relative)),
                Err(err) => log::warn!("skipping {}: {err}", path.display()),
            }
        }
    }
    Ok(())
}

pub fn validate_templates_dir(path: &Path) -> Result<(), IoError> {
    if !path.is_dir() {
        return Err(IoError::InvalidTemplatesDir(format!(
            "{} is not a directory",
            path.display()
        )));
    }
    Ok(())
}
