use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Seek, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::errors::{FreqDictError, Result};
use crate::rank_list::RankList;

pub const FORMAT_VERSION: u32 = 3;
pub const FREQUENCY_MODE: &str = "rank-based";

const INDEX_FILE_NAME: &str = "index.json";

/// The `index.json` record of a package.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
struct Index {
  title: String,
  #[serde(default = "default_format")]
  format: u32,
  revision: String,
  #[serde(default)]
  sequenced: bool,
  #[serde(default = "default_frequency_mode")]
  frequency_mode: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  author: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  url: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  description: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  attribution: Option<String>,
}

fn default_format() -> u32 {
  FORMAT_VERSION
}

fn default_frequency_mode() -> String {
  FREQUENCY_MODE.to_owned()
}

/// A rank list with its title, revision and attribution.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrequencyDictionary {
  pub rank_list: RankList,
  pub title: String,
  pub revision: String,
  pub author: Option<String>,
  pub url: Option<String>,
  pub description: Option<String>,
  pub attribution: Option<String>,
}

impl FrequencyDictionary {
  pub fn new<T: Into<String>, R: Into<String>>(rank_list: RankList, title: T, revision: R) -> Self {
    FrequencyDictionary {
      rank_list,
      title: title.into(),
      revision: revision.into(),
      ..Default::default()
    }
  }

  fn index(&self) -> Index {
    let non_empty = |s: &Option<String>| s.clone().filter(|s| !s.is_empty());

    Index {
      title: self.title.clone(),
      format: FORMAT_VERSION,
      revision: self.revision.clone(),
      sequenced: false,
      frequency_mode: FREQUENCY_MODE.to_owned(),
      author: non_empty(&self.author),
      url: non_empty(&self.url),
      description: non_empty(&self.description),
      attribution: non_empty(&self.attribution),
    }
  }

  /// Writes the package to `path`.
  ///
  /// The zip is assembled in a temporary file next to `path` and moved into place
  /// only once complete.
  pub fn to_zip(&self, path: &Path) -> Result<()> {
    let parent_dir = match path.parent() {
      Some(dir) if !dir.as_os_str().is_empty() => dir,
      _ => Path::new(".")
    };

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    self.write_zip(BufWriter::new(temp_file.as_file()))?;

    // Temp files are created owner-only; packages are meant to be shared
    #[cfg(unix)]
    {
      use std::os::unix::fs::PermissionsExt;
      temp_file.as_file().set_permissions(fs::Permissions::from_mode(0o644))?;
    }

    temp_file.persist(path)?;

    log::debug!("wrote {} entries to {}", self.rank_list.len(), path.display());
    Ok(())
  }

  pub fn write_zip<W: Write + Seek>(&self, writer: W) -> Result<()> {
    let mut zip = ZipWriter::new(writer);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file(INDEX_FILE_NAME, options)?;
    serde_json::to_writer(&mut zip, &self.index())?;

    for (bank_index, bank) in self.rank_list.to_chunked_json().iter().enumerate() {
      zip.start_file(format!("term_meta_bank_{}.json", bank_index + 1), options)?;
      serde_json::to_writer(&mut zip, bank)?;
    }

    zip.finish()?.flush()?;
    Ok(())
  }

  /// Reads a package, keeping at most `max_entries` terms.
  pub fn from_zip(path: &Path, max_entries: Option<usize>) -> Result<Self> {
    Self::read_zip(BufReader::new(File::open(path)?), max_entries)
  }

  pub fn read_zip<R: Read + Seek>(reader: R, max_entries: Option<usize>) -> Result<Self> {
    let mut archive = ZipArchive::new(reader)?;

    let index: Index = {
      let file = archive.by_name(INDEX_FILE_NAME)?;
      serde_json::from_reader(file)
        .map_err(|e| FreqDictError::invalid_format(INDEX_FILE_NAME, e.to_string()))?
    };
    let rank_list = RankList::from_zip(&mut archive, max_entries)?;

    Ok(FrequencyDictionary {
      rank_list,
      title: index.title,
      revision: index.revision,
      author: index.author,
      url: index.url,
      description: index.description,
      attribution: index.attribution,
    })
  }
}
