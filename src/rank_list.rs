use std::collections::HashSet;
use std::io::{Read, Seek};
use std::path::Path;

use serde_json::{json, Value};
use zip::ZipArchive;

use crate::errors::{FreqDictError, Result};
use crate::source::{self, RankListLayout};
use crate::term::Term;

pub const MAX_TERM_BANK_SIZE: usize = 10000;

/// One ranked entry of a frequency dictionary. Rank 0 is the most frequent term.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TermMetadata {
  pub text: String,
  pub reading: Option<String>,
  pub rank: u64,
}

impl TermMetadata {
  /// An empty reading, or one identical to the text, carries no information and is dropped.
  pub fn new<T: Into<String>>(text: T, reading: Option<String>, rank: u64) -> Self {
    let text = text.into();
    let reading = reading.filter(|r| !r.is_empty() && *r != text);
    TermMetadata { text, reading, rank }
  }

  pub fn to_json(&self) -> Value {
    let payload = match &self.reading {
      Some(reading) => json!({ "reading": reading, "frequency": self.rank }),
      None => json!(self.rank)
    };

    json!([self.text, "freq", payload])
  }

  /// Parses `[text, "freq", payload]`.
  ///
  /// The payload is either a rank, `{"value": rank, ...}`, or an object with `reading`
  /// and `frequency`, the latter again a rank or `{"value": rank, ...}`.
  pub fn from_json(obj: &Value, location: &str) -> Result<Self> {
    let invalid = |msg: &str| FreqDictError::invalid_format(location, format!("{}: {}", msg, obj));

    let (text, payload) = match obj.as_array().map(Vec::as_slice) {
      Some([text, _mode, payload]) => (text, payload),
      _ => return Err(invalid("expected [text, mode, payload]"))
    };

    let text = match text.as_str() {
      Some(text) if !text.is_empty() => text,
      _ => return Err(invalid("missing text"))
    };

    let (reading, frequency) = match payload.get("reading") {
      Some(reading) => {
        let reading = match reading.as_str() {
          Some(reading) if !reading.is_empty() => reading.to_owned(),
          _ => return Err(invalid("missing reading"))
        };
        (Some(reading), payload.get("frequency").ok_or_else(|| invalid("missing frequency"))?)
      },
      None => (None, payload)
    };

    let rank = parse_rank(frequency).ok_or_else(|| invalid("rank is not a non-negative integer"))?;

    Ok(TermMetadata::new(text, reading, rank))
  }
}

fn parse_rank(frequency: &Value) -> Option<u64> {
  let value = match frequency {
    Value::Object(obj) => obj.get("value")?,
    other => other
  };

  value.as_u64().or_else(|| {
    let f = value.as_f64()?;
    if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 { Some(f as u64) } else { None }
  })
}

/// Terms ordered by ascending rank.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct RankList {
  pub entries: Vec<TermMetadata>,
}

impl RankList {
  pub fn new(entries: Vec<TermMetadata>) -> Self {
    RankList { entries }
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Reads a list whose lines are already ordered by rank, most common first.
  ///
  /// Each term keeps its one-based line number as rank, so lines that are skipped
  /// (non-Japanese text, repeated terms) leave gaps. The first line for a term wins.
  pub fn from_rank_list(path: &Path, layout: &RankListLayout) -> Result<Self> {
    let contents = source::read_to_string(path, layout.encoding)?;
    let rank_list = Self::from_text(&contents, layout, &path.display().to_string())?;
    log::debug!("{}: {} ranked terms", path.display(), rank_list.len());
    Ok(rank_list)
  }

  pub fn from_text(contents: &str, layout: &RankListLayout, location: &str) -> Result<Self> {
    let mut entries = Vec::new();
    let mut seen: HashSet<Term> = HashSet::new();

    for (line_index, line) in contents.lines().enumerate().skip(layout.skip_lines) {
      if layout.max_entries.map_or(false, |max| entries.len() >= max) {
        break;
      }
      if line.trim().is_empty() {
        continue;
      }

      let at = || format!("{}:{}", location, line_index + 1);
      let fields = source::split_fields(line, layout.separator);
      let text = source::field(&fields, layout.text_index, at)?;

      let term = match layout.reading_index {
        Some(reading_index) => Term::from_fields(text, || source::field(&fields, reading_index, at))?,
        // No reading column: kanji terms keep an empty reading, which is dropped below
        None => Term::from_fields(text, || Ok(""))?,
      };
      let term = match term {
        Some(term) => term,
        None => continue
      };

      if !seen.insert(term.clone()) {
        log::warn!("{}: repeated term {} [{}], keeping the earlier rank", at(), term.text, term.reading);
        continue;
      }

      entries.push(TermMetadata::new(term.text, Some(term.reading), line_index as u64 + 1));
    }

    Ok(RankList { entries })
  }

  /// Reads every `term_meta_bank` file of a package, in bank order.
  pub fn from_zip<R: Read + Seek>(archive: &mut ZipArchive<R>, max_entries: Option<usize>) -> Result<Self> {
    let mut bank_names: Vec<String> = archive.file_names()
      .filter(|name| name.contains("term_meta_bank"))
      .map(str::to_owned)
      .collect();
    bank_names.sort_by_key(|name| (bank_number(name), name.clone()));

    let mut entries = Vec::new();

    for name in &bank_names {
      let bank: Value = serde_json::from_reader(archive.by_name(name)?)?;
      let bank = bank.as_array()
        .ok_or_else(|| FreqDictError::invalid_format(name.as_str(), "term meta bank is not an array"))?;

      for obj in bank {
        if max_entries.map_or(false, |max| entries.len() >= max) {
          return Ok(RankList { entries });
        }
        entries.push(TermMetadata::from_json(obj, name)?);
      }
    }

    Ok(RankList { entries })
  }

  /// Splits the list into banks of at most [`MAX_TERM_BANK_SIZE`] entries.
  pub fn to_chunked_json(&self) -> Vec<Value> {
    self.entries.chunks(MAX_TERM_BANK_SIZE)
      .map(|chunk| Value::Array(chunk.iter().map(TermMetadata::to_json).collect()))
      .collect()
  }
}

fn bank_number(name: &str) -> u64 {
  let digits: String = name.chars()
    .skip_while(|c| !c.is_ascii_digit())
    .take_while(|c| c.is_ascii_digit())
    .collect();
  digits.parse().unwrap_or(u64::MAX)
}
