//! Downloadable delimited-file source
//!
//! The catalog is parsed from a file under the data root. When the file is
//! missing it is downloaded first, optionally extracted from a zip archive
//! and renamed to its processed name.
//!
//! # Paths
//! - raw download: `<data_root>/<filename or url basename>`
//! - catalog: `<data_root>/<processed>` when set, otherwise the extracted
//!   member (`<raw>.extracted`) for archives, otherwise the raw download
//! - non-http(s) urls are local paths (relative to the data root) and are
//!   never fetched
//!
//! Downloaded and extracted files are written to a temporary file next to
//! their target and moved into place only once complete.

use super::catalog::Catalog;
use crate::error::SourceError;
use crate::fetch::Fetcher;
use crate::types::{DownloadReport, SourceContext, SourceKind, SourceMetadata, SourceTerm, TermSource};
use csv::StringRecord;
use regex::Regex;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Per-line term extraction; one line may yield several terms
pub type LineExtractor = fn(&StringRecord) -> Vec<SourceTerm>;

const EXTRACTED_SUFFIX: &str = ".extracted";

/// Location and format of a source data file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSourceConfig {
    pub url: String,
    pub delimiter: u8,
    /// First line is a header and is skipped
    pub has_header: bool,
    /// Raw download filename, defaults to the url basename
    pub filename: Option<String>,
    /// Regex selecting the archive member to extract
    pub archive_member: Option<String>,
    /// Final filename after post-processing
    pub processed: Option<String>,
}

impl FileSourceConfig {
    /// Comma delimited, with header
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            delimiter: b',',
            has_header: true,
            filename: None,
            archive_member: None,
            processed: None,
        }
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn without_header(mut self) -> Self {
        self.has_header = false;
        self
    }

    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn archive_member(mut self, pattern: impl Into<String>) -> Self {
        self.archive_member = Some(pattern.into());
        self
    }

    pub fn processed(mut self, filename: impl Into<String>) -> Self {
        self.processed = Some(filename.into());
        self
    }

    /// Only http(s) urls are downloaded
    pub fn is_remote(&self) -> bool {
        let url = self.url.to_ascii_lowercase();
        url.starts_with("http://") || url.starts_with("https://")
    }

    fn raw_filename(&self) -> String {
        if let Some(filename) = &self.filename {
            return filename.clone();
        }

        let without_query = self.url.split(['?', '#']).next().unwrap_or_default();
        match without_query.rsplit('/').next() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => "download".to_string(),
        }
    }
}

/// Source backed by a downloaded delimited file
pub struct FileSource {
    metadata: SourceMetadata,
    config: FileSourceConfig,
    data_root: PathBuf,
    fetcher: Arc<dyn Fetcher>,
    extract: LineExtractor,
    catalog: Catalog,
}

impl FileSource {
    pub fn new(
        metadata: SourceMetadata,
        config: FileSourceConfig,
        context: &SourceContext,
        extract: LineExtractor,
    ) -> Self {
        Self {
            metadata,
            config,
            data_root: context.data_root.clone(),
            fetcher: Arc::clone(&context.fetcher),
            extract,
            catalog: Catalog::new(),
        }
    }

    pub fn config(&self) -> &FileSourceConfig {
        &self.config
    }

    /// Where the fetched bytes are written
    pub fn download_path(&self) -> PathBuf {
        self.data_root.join(self.config.raw_filename())
    }

    /// The file the catalog is parsed from
    pub fn catalog_path(&self) -> PathBuf {
        if !self.config.is_remote() {
            let path = Path::new(&self.config.url);
            return if path.is_absolute() {
                path.to_path_buf()
            } else {
                self.data_root.join(path)
            };
        }

        if let Some(processed) = &self.config.processed {
            return self.data_root.join(processed);
        }

        if self.config.archive_member.is_some() {
            return self
                .data_root
                .join(format!("{}{}", self.config.raw_filename(), EXTRACTED_SUFFIX));
        }

        self.download_path()
    }

    /// Download and post-process the data file
    ///
    /// Existing files are kept unless `overwrite` is set. A failed fetch is
    /// reported as `size == 0`, not as an error; archive and disk failures
    /// are errors.
    pub async fn fetch_file(&self, overwrite: bool) -> Result<DownloadReport, SourceError> {
        let url = self.config.url.clone();
        let path = self.catalog_path();

        if !self.config.is_remote() || (!overwrite && path.exists()) {
            let size = existing_size(&path).await;
            debug!(prefix = %self.metadata.prefix, path = %path.display(), size, "Vocabulary file already present");
            return Ok(DownloadReport {
                url,
                path,
                size,
                downloaded: false,
            });
        }

        info!(prefix = %self.metadata.prefix, url = %url, "Downloading vocabulary file");

        let content = match self.fetcher.fetch(&url).await {
            Ok(content) if !content.is_empty() => content,
            Ok(_) => {
                warn!(prefix = %self.metadata.prefix, url = %url, "Vocabulary download returned no content");
                return Ok(DownloadReport {
                    url,
                    path,
                    size: 0,
                    downloaded: false,
                });
            }
            Err(e) => {
                warn!(prefix = %self.metadata.prefix, url = %url, error = %e, "Vocabulary download failed");
                return Ok(DownloadReport {
                    url,
                    path,
                    size: 0,
                    downloaded: false,
                });
            }
        };

        tokio::fs::create_dir_all(&self.data_root).await?;

        let raw_path = self.download_path();
        let target = raw_path.clone();
        tokio::task::spawn_blocking(move || write_atomically(&target, |out| Ok(out.write_all(&content)?))).await??;
        self.post_process(&raw_path, &path).await?;

        let size = tokio::fs::metadata(&path).await?.len();
        info!(
            prefix = %self.metadata.prefix,
            path = %path.display(),
            size,
            "Vocabulary file ready"
        );

        Ok(DownloadReport {
            url,
            path,
            size,
            downloaded: true,
        })
    }

    async fn post_process(&self, raw_path: &Path, final_path: &Path) -> Result<(), SourceError> {
        if let Some(pattern) = &self.config.archive_member {
            let member = Regex::new(pattern)
                .map_err(|e| SourceError::Archive(format!("invalid member pattern '{}': {}", pattern, e)))?;
            let archive = raw_path.to_path_buf();
            let target = final_path.to_path_buf();

            let name = tokio::task::spawn_blocking(move || extract_member(&archive, &member, &target)).await??;
            debug!(prefix = %self.metadata.prefix, member = %name, "Extracted archive member");
        } else if raw_path != final_path {
            tokio::fs::rename(raw_path, final_path).await?;
        }

        Ok(())
    }

    async fn load_terms(&self) -> Result<Vec<SourceTerm>, SourceError> {
        let path = self.catalog_path();

        if !path.exists() {
            if !self.config.is_remote() {
                return Err(SourceError::MissingCatalog(path));
            }

            let report = self.fetch_file(false).await?;
            if report.size < 1 {
                return Err(SourceError::DownloadFailed { url: report.url });
            }
        }

        let delimiter = self.config.delimiter;
        let has_header = self.config.has_header;
        let extract = self.extract;
        let source_path = path.clone();

        let terms = tokio::task::spawn_blocking(move || read_terms(&source_path, delimiter, has_header, extract)).await??;

        info!(
            prefix = %self.metadata.prefix,
            path = %path.display(),
            terms = terms.len(),
            "Loaded vocabulary file"
        );

        Ok(terms)
    }
}

#[async_trait::async_trait]
impl TermSource for FileSource {
    fn metadata(&self) -> &SourceMetadata {
        &self.metadata
    }

    fn kind(&self) -> SourceKind {
        SourceKind::File
    }

    async fn search(&self, pattern: &str) -> Result<Vec<SourceTerm>, SourceError> {
        self.catalog.search(pattern, || self.load_terms()).await
    }

    async fn download(&self, overwrite: bool) -> Result<Option<DownloadReport>, SourceError> {
        let report = self.fetch_file(overwrite).await?;
        if report.downloaded {
            self.catalog.clear().await;
        }
        Ok(Some(report))
    }

    async fn clear_cache(&self) {
        self.catalog.clear().await;
    }
}

async fn existing_size(path: &Path) -> u64 {
    tokio::fs::metadata(path).await.map(|m| m.len()).unwrap_or(0)
}

/// Parse every line with more than one field through `extract`
fn read_terms(
    path: &Path,
    delimiter: u8,
    has_header: bool,
    extract: LineExtractor,
) -> Result<Vec<SourceTerm>, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(has_header)
        .flexible(true)
        .from_path(path)?;

    let mut terms = Vec::new();
    for record in reader.byte_records() {
        let record = StringRecord::from_byte_record_lossy(record?);
        if record.len() > 1 {
            terms.extend(extract(&record));
        }
    }

    Ok(terms)
}

/// Write `target` through a temporary file in the same directory
///
/// The temporary file is removed when `write` fails, so `target` is either
/// complete or untouched.
fn write_atomically<F>(target: &Path, write: F) -> Result<(), SourceError>
where
    F: FnOnce(&mut File) -> Result<(), SourceError>,
{
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir)?;
    write(temp.as_file_mut())?;
    temp.as_file_mut().flush()?;
    temp.persist(target).map_err(|e| e.error)?;

    Ok(())
}

/// Write the first archive member matching `member` to `target`
fn extract_member(archive_path: &Path, member: &Regex, target: &Path) -> Result<String, SourceError> {
    let mut archive = zip::ZipArchive::new(File::open(archive_path)?)?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if entry.is_dir() || !member.is_match(entry.name()) {
            continue;
        }

        let name = entry.name().to_string();
        // the member's CRC is only checked once it has been read to the end
        write_atomically(target, |out| {
            std::io::copy(&mut entry, out)?;
            Ok(())
        })?;
        return Ok(name);
    }

    Err(SourceError::ArchiveNoMatch(member.as_str().to_string()))
}
