use lazy_static::lazy_static;
use regex::Regex;

use crate::errors::Result;

lazy_static! {
  static ref KANJI_RE: Regex = Regex::new(r"[一-龯ヶ々〆〻]").unwrap();
  static ref KANA_RE: Regex = Regex::new(r"[ぁ-ゟ゠-ヿ]").unwrap();
}

/// A lexical item: surface text plus phonetic reading.
///
/// Equality, hashing and ordering are structural over both fields, so the same text
/// read two different ways makes two distinct terms.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct Term {
  pub text: String,
  pub reading: String,
}

impl Term {
  pub fn new<T: Into<String>, R: Into<String>>(text: T, reading: R) -> Self {
    Term { text: text.into(), reading: reading.into() }
  }

  /// Builds a term from a text field and a lazily fetched reading field.
  ///
  /// Returns `Ok(None)` for text that is not worth indexing (no kanji, no kana).
  /// The reading field is only consulted when the text contains kanji.
  pub fn from_fields<'a, F>(text: &str, reading_field: F) -> Result<Option<Term>>
  where
    F: FnOnce() -> Result<&'a str>,
  {
    Ok(match Script::classify(text) {
      Script::Kanji => Some(Term::new(text, katakana_to_hiragana(reading_field()?))),
      Script::Kana => Some(Term::new(text, text)),
      Script::Other => None,
    })
  }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Script {
  /// Contains at least one ideograph or iteration mark; needs a separate reading.
  Kanji,
  /// No ideographs but some kana; the text is its own reading.
  Kana,
  /// Digits, Latin letters, punctuation.
  Other,
}

impl Script {
  pub fn classify(text: &str) -> Script {
    if KANJI_RE.is_match(text) {
      Script::Kanji
    }
    else if KANA_RE.is_match(text) {
      Script::Kana
    }
    else {
      Script::Other
    }
  }
}

pub fn katakana_to_hiragana(text: &str) -> String {
  text.chars().map(|c| {
    match c {
      'ァ' ..= 'ヶ' | 'ヽ' | 'ヾ' => char::from_u32(c as u32 - 0x60).unwrap_or(c),
      _ => c
    }
  }).collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::hash_map::DefaultHasher;
  use std::hash::{Hash, Hasher};

  fn hash_of(t: &Term) -> u64 {
    let mut h = DefaultHasher::new();
    t.hash(&mut h);
    h.finish()
  }

  #[test]
  fn test_term_identity() {
    let a = Term::new("生", "せい");
    let b = Term::new("生", "せい");
    let c = Term::new("生", "なま");

    assert_eq!(a, a);
    assert_eq!(a, b);
    assert_eq!(b, a);
    assert_eq!(hash_of(&a), hash_of(&b));
    assert_ne!(a, c);
  }

  #[test]
  fn test_classify() {
    assert_eq!(Script::classify("猫"), Script::Kanji);
    assert_eq!(Script::classify("人々"), Script::Kanji);
    assert_eq!(Script::classify("ねこ"), Script::Kana);
    assert_eq!(Script::classify("コーヒー"), Script::Kana);
    assert_eq!(Script::classify("123"), Script::Other);
    assert_eq!(Script::classify("Tom"), Script::Other);
    assert_eq!(Script::classify("、"), Script::Other);
  }

  #[test]
  fn test_katakana_to_hiragana() {
    assert_eq!(katakana_to_hiragana("ネコ"), "ねこ");
    assert_eq!(katakana_to_hiragana("スル"), "する");
    assert_eq!(katakana_to_hiragana("ヴァイオリン"), "ゔぁいおりん");
    assert_eq!(katakana_to_hiragana("コーヒー"), "こーひー");
    assert_eq!(katakana_to_hiragana("ヽヾ"), "ゝゞ");
    assert_eq!(katakana_to_hiragana("ねこ"), "ねこ");
  }

  #[test]
  fn test_from_fields() {
    let t = Term::from_fields("猫", || Ok("ネコ")).unwrap();
    assert_eq!(t, Some(Term::new("猫", "ねこ")));

    let t = Term::from_fields("ねこ", || panic!("reading not needed")).unwrap();
    assert_eq!(t, Some(Term::new("ねこ", "ねこ")));

    let t = Term::from_fields("Tom", || panic!("reading not needed")).unwrap();
    assert_eq!(t, None);
  }
}
