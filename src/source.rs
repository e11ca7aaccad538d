use std::fs;
use std::path::Path;

use crate::errors::{FreqDictError, Result};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Encoding {
  Utf8,
  /// Byte order taken from the BOM, little endian if there is none.
  Utf16,
}

/// Reads a whole source file into memory, decoding it and dropping a leading BOM.
pub fn read_to_string(path: &Path, encoding: Encoding) -> Result<String> {
  let bytes = fs::read(path)?;
  let location = path.display().to_string();

  match encoding {
    Encoding::Utf8 => {
      let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF][..]).unwrap_or(&bytes);
      String::from_utf8(bytes.to_vec())
        .map_err(|e| FreqDictError::invalid_format(location, format!("not valid UTF-8: {}", e)))
    },
    Encoding::Utf16 => decode_utf16(&bytes, &location)
  }
}

fn decode_utf16(bytes: &[u8], location: &str) -> Result<String> {
  let (big_endian, body) = match bytes {
    [0xFE, 0xFF, rest @ ..] => (true, rest),
    [0xFF, 0xFE, rest @ ..] => (false, rest),
    _ => (false, bytes)
  };

  if body.len() % 2 != 0 {
    return Err(FreqDictError::invalid_format(location, "odd number of bytes in UTF-16 input"));
  }

  let units: Vec<u16> = body.chunks_exact(2).map(|pair| {
    if big_endian { u16::from_be_bytes([pair[0], pair[1]]) }
    else { u16::from_le_bytes([pair[0], pair[1]]) }
  }).collect();

  String::from_utf16(&units)
    .map_err(|e| FreqDictError::invalid_format(location, format!("not valid UTF-16: {}", e)))
}

/// Column layout of a raw frequency list (one term occurrence count per line).
#[derive(Clone, Debug)]
pub struct SourceLayout {
  pub separator: &'static str,
  pub text_index: usize,
  pub reading_index: usize,
  pub frequency_index: usize,
  pub skip_lines: usize,
  pub encoding: Encoding,
}

/// Column layout of a list that is already ordered by rank.
#[derive(Clone, Debug)]
pub struct RankListLayout {
  pub separator: &'static str,
  pub text_index: usize,
  /// Without a reading column, kanji terms are exported without a reading.
  pub reading_index: Option<usize>,
  pub skip_lines: usize,
  pub max_entries: Option<usize>,
  pub encoding: Encoding,
}

/// Splits one line, stripping the line terminator first.
pub(crate) fn split_fields<'a>(line: &'a str, separator: &str) -> Vec<&'a str> {
  line.trim_end_matches(&['\r', '\n'][..]).split(separator).collect()
}

pub(crate) fn field<'a>(fields: &[&'a str], index: usize, location: impl FnOnce() -> String) -> Result<&'a str> {
  fields.get(index).copied().ok_or_else(|| {
    FreqDictError::invalid_format(location(), format!("expected at least {} fields, found {}", index + 1, fields.len()))
  })
}
