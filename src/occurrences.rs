use std::collections::{HashMap, HashSet};
use std::path::Path;

use itertools::Itertools;

use crate::errors::{FreqDictError, Result};
use crate::rank_list::{RankList, TermMetadata};
use crate::source::{self, SourceLayout};
use crate::term::Term;

/// Counter of how many times each term has occurred in one or more corpora.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TermOccurrences {
  pub counts: HashMap<Term, u64>,
}

impl From<HashMap<Term, u64>> for TermOccurrences {
  fn from(counts: HashMap<Term, u64>) -> Self {
    TermOccurrences { counts }
  }
}

impl TermOccurrences {
  pub fn new() -> Self {
    Self::default()
  }

  /// Counts term occurrences in a frequency list file.
  ///
  /// Lines are ordered by term, not by rank; the same term may show up on several
  /// lines (different part of speech, different sub-corpus) and those counts are summed.
  pub fn from_frequency_list(path: &Path, layout: &SourceLayout) -> Result<Self> {
    let contents = source::read_to_string(path, layout.encoding)?;
    let occurrences = Self::from_text(&contents, layout, &path.display().to_string())?;
    log::debug!("{}: {} distinct terms", path.display(), occurrences.len());
    Ok(occurrences)
  }

  /// Same as [`TermOccurrences::from_frequency_list`] over already decoded text.
  /// `location` only shows up in error messages.
  pub fn from_text(contents: &str, layout: &SourceLayout, location: &str) -> Result<Self> {
    let mut counts: HashMap<Term, u64> = HashMap::new();

    for (line_index, line) in contents.lines().enumerate().skip(layout.skip_lines) {
      if line.trim().is_empty() {
        continue;
      }

      let at = || format!("{}:{}", location, line_index + 1);
      let fields = source::split_fields(line, layout.separator);
      let text = source::field(&fields, layout.text_index, at)?;

      let term = match Term::from_fields(text, || source::field(&fields, layout.reading_index, at))? {
        Some(term) => term,
        None => continue
      };

      let frequency = source::field(&fields, layout.frequency_index, at)?.trim();
      let occurrences: u64 = frequency.parse().map_err(|_| {
        FreqDictError::invalid_format(at(), format!("frequency is not an integer: {:?}", frequency))
      })?;

      let total = counts.entry(term).or_insert(0);
      *total = total.checked_add(occurrences)
        .ok_or_else(|| FreqDictError::invalid_format(at(), "occurrence count overflows"))?;
    }

    Ok(TermOccurrences { counts })
  }

  pub fn len(&self) -> usize {
    self.counts.len()
  }

  pub fn is_empty(&self) -> bool {
    self.counts.is_empty()
  }

  pub fn get(&self, term: &Term) -> Option<u64> {
    self.counts.get(term).copied()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&Term, &u64)> {
    self.counts.iter()
  }

  /// Share of terms that occur in both counters, out of all terms in either.
  /// Occurrence counts are disregarded.
  pub fn overlap(&self, other: &TermOccurrences) -> f64 {
    let self_terms: HashSet<&Term> = self.counts.keys().collect();
    let other_terms: HashSet<&Term> = other.counts.keys().collect();

    let total = self_terms.union(&other_terms).count();
    if total == 0 {
      return 0.0;
    }

    self_terms.intersection(&other_terms).count() as f64 / total as f64
  }

  /// Terms present in both counters with different counts, with the absolute difference.
  pub fn count_differences(&self, other: &TermOccurrences) -> Vec<(Term, u64)> {
    other.counts.iter()
      .filter_map(|(term, &count)| {
        let own = *self.counts.get(term)?;
        let difference = own.abs_diff(count);
        if difference > 0 { Some((term.clone(), difference)) } else { None }
      })
      .sorted()
      .collect()
  }

  /// Adds the counts of another counter onto these.
  ///
  /// Assumes both counters saw distinct occurrences. If they overlap, the same
  /// occurrence gets counted twice.
  pub fn unify_distinct(&mut self, other: &TermOccurrences) {
    for (term, &count) in &other.counts {
      let total = self.counts.entry(term.clone()).or_insert(0);
      *total = total.saturating_add(count);
    }
  }

  /// Merges another counter taking `max(N, M)` per term instead of the sum.
  ///
  /// Assumes the numeric overlap `min(N, M)` consists of the same occurrences in both
  /// counters. Nothing is counted twice, but occurrences may be lost if that is wrong.
  pub fn unify_conservative_overlap(&mut self, other: &TermOccurrences) {
    for (term, &count) in &other.counts {
      let total = self.counts.entry(term.clone()).or_insert(0);
      *total = (*total).max(count);
    }
  }

  /// Ranks terms by descending count. Equal counts are ordered by text, then reading.
  pub fn to_rank_list(&self) -> RankList {
    let entries = self.counts.iter()
      .sorted_by(|(term_a, count_a), (term_b, count_b)| {
        count_b.cmp(count_a).then_with(|| term_a.cmp(term_b))
      })
      .enumerate()
      .map(|(rank, (term, _))| TermMetadata::new(term.text.clone(), Some(term.reading.clone()), rank as u64))
      .collect();

    RankList::new(entries)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::source::Encoding;
  use std::io::Write;

  fn chj_layout() -> SourceLayout {
    SourceLayout {
      separator: "\t",
      text_index: 1,
      reading_index: 0,
      frequency_index: 16,
      skip_lines: 1,
      encoding: Encoding::Utf8,
    }
  }

  fn chj_line(reading: &str, text: &str, freq: &str) -> String {
    let mut fields = vec![""; 17];
    fields[0] = reading;
    fields[1] = text;
    fields[16] = freq;
    fields.join("\t")
  }

  fn occurrences(items: &[(&str, &str, u64)]) -> TermOccurrences {
    items.iter().map(|(t, r, c)| (Term::new(*t, *r), *c)).collect::<HashMap<_, _>>().into()
  }

  #[test]
  fn test_accumulates_within_file() {
    let contents = [
      "語彙素読み\t語彙素".to_owned(),
      chj_line("ゴ", "語", "5"),
      chj_line("ゴ", "語", "3"),
    ].join("\n");

    let occ = TermOccurrences::from_text(&contents, &chj_layout(), "test").unwrap();
    assert_eq!(occ.len(), 1);
    assert_eq!(occ.get(&Term::new("語", "ご")), Some(8));
  }

  #[test]
  fn test_classification_during_ingestion() {
    let contents = [
      "header".to_owned(),
      chj_line("ネコ", "猫", "4"),
      chj_line("ネコ", "ねこ", "2\r"),
      chj_line("", "123", "9"),
      chj_line("", "Tom", "1"),
      String::new(),
    ].join("\n");

    let occ = TermOccurrences::from_text(&contents, &chj_layout(), "test").unwrap();
    assert_eq!(occ.len(), 2);
    assert_eq!(occ.get(&Term::new("猫", "ねこ")), Some(4));
    assert_eq!(occ.get(&Term::new("ねこ", "ねこ")), Some(2));
  }

  #[test]
  fn test_discarded_lines_need_no_frequency() {
    let contents = "header\nx\t123\n";
    let occ = TermOccurrences::from_text(contents, &chj_layout(), "test").unwrap();
    assert!(occ.is_empty());
  }

  #[test]
  fn test_too_few_fields_is_fatal() {
    let contents = "header\nネコ\t猫\t4\n";
    let err = TermOccurrences::from_text(contents, &chj_layout(), "test.tsv").unwrap_err();
    assert!(err.to_string().contains("test.tsv:2"), "{}", err);
  }

  #[test]
  fn test_non_integer_frequency_is_fatal() {
    let contents = ["header".to_owned(), chj_line("ネコ", "猫", "4.5")].join("\n");
    assert!(TermOccurrences::from_text(&contents, &chj_layout(), "test").is_err());
  }

  #[test]
  fn test_count_overflow_is_fatal() {
    let contents = [
      "header".to_owned(),
      chj_line("ゴ", "語", &u64::MAX.to_string()),
      chj_line("ゴ", "語", "1"),
    ].join("\n");

    let err = TermOccurrences::from_text(&contents, &chj_layout(), "test.tsv").unwrap_err();
    assert!(err.to_string().contains("test.tsv:3"), "{}", err);
  }

  #[test]
  fn test_unify_distinct_saturates() {
    let mut a = occurrences(&[("語", "ご", u64::MAX - 1)]);
    a.unify_distinct(&occurrences(&[("語", "ご", 5)]));
    assert_eq!(a.get(&Term::new("語", "ご")), Some(u64::MAX));
  }

  #[test]
  fn test_from_frequency_list_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "header").unwrap();
    writeln!(file, "{}", chj_line("ヒト", "人", "10")).unwrap();
    writeln!(file, "{}", chj_line("ジン", "人", "7")).unwrap();

    let occ = TermOccurrences::from_frequency_list(file.path(), &chj_layout()).unwrap();
    assert_eq!(occ.get(&Term::new("人", "ひと")), Some(10));
    assert_eq!(occ.get(&Term::new("人", "じん")), Some(7));
  }

  #[test]
  fn test_unify_distinct_commutes() {
    let a = occurrences(&[("猫", "ねこ", 3), ("犬", "いぬ", 1)]);
    let b = occurrences(&[("猫", "ねこ", 2), ("鳥", "とり", 5)]);

    let mut ab = a.clone();
    ab.unify_distinct(&b);
    let mut ba = b.clone();
    ba.unify_distinct(&a);

    assert_eq!(ab, ba);
    assert_eq!(ab.get(&Term::new("猫", "ねこ")), Some(5));
    assert_eq!(ab.get(&Term::new("鳥", "とり")), Some(5));
    assert_eq!(ab.len(), 3);
  }

  #[test]
  fn test_unify_distinct_associates() {
    let a = occurrences(&[("猫", "ねこ", 3)]);
    let b = occurrences(&[("猫", "ねこ", 2), ("犬", "いぬ", 1)]);
    let c = occurrences(&[("犬", "いぬ", 4)]);

    let mut left = a.clone();
    left.unify_distinct(&b);
    left.unify_distinct(&c);

    let mut bc = b.clone();
    bc.unify_distinct(&c);
    let mut right = a.clone();
    right.unify_distinct(&bc);

    assert_eq!(left, right);
  }

  #[test]
  fn test_unify_conservative_overlap() {
    let a = occurrences(&[("猫", "ねこ", 3), ("犬", "いぬ", 9)]);
    let b = occurrences(&[("猫", "ねこ", 7), ("犬", "いぬ", 2), ("鳥", "とり", 1)]);

    let mut merged = a.clone();
    merged.unify_conservative_overlap(&b);

    for (term, count) in merged.iter() {
      let max = a.get(term).unwrap_or(0).max(b.get(term).unwrap_or(0));
      assert!(*count >= max);
    }
    assert_eq!(merged.get(&Term::new("猫", "ねこ")), Some(7));
    assert_eq!(merged.get(&Term::new("犬", "いぬ")), Some(9));
    assert_eq!(merged.get(&Term::new("鳥", "とり")), Some(1));
  }

  #[test]
  fn test_overlap() {
    let a = occurrences(&[("猫", "ねこ", 3), ("犬", "いぬ", 9)]);
    let b = occurrences(&[("猫", "ねこ", 7), ("鳥", "とり", 1)]);

    assert!((a.overlap(&b) - 1.0 / 3.0).abs() < 1e-9);
    assert_eq!(a.overlap(&a), 1.0);
    assert_eq!(TermOccurrences::new().overlap(&TermOccurrences::new()), 0.0);
  }

  #[test]
  fn test_count_differences() {
    let a = occurrences(&[("猫", "ねこ", 3), ("犬", "いぬ", 9), ("鳥", "とり", 1)]);
    let b = occurrences(&[("猫", "ねこ", 7), ("犬", "いぬ", 9), ("魚", "さかな", 1)]);

    assert_eq!(a.count_differences(&b), vec![(Term::new("猫", "ねこ"), 4)]);
  }

  #[test]
  fn test_to_rank_list() {
    let occ = occurrences(&[
      ("猫", "ねこ", 3), ("犬", "いぬ", 9), ("鳥", "とり", 3), ("ねこ", "ねこ", 5), ("魚", "さかな", 3)
    ]);

    let ranked = occ.to_rank_list();
    let triples: Vec<(&str, Option<&str>, u64)> = ranked.entries.iter()
      .map(|e| (e.text.as_str(), e.reading.as_deref(), e.rank))
      .collect();

    assert_eq!(triples, vec![
      ("犬", Some("いぬ"), 0),
      ("ねこ", None, 1),
      ("猫", Some("ねこ"), 2),
      ("魚", Some("さかな"), 3),
      ("鳥", Some("とり"), 4),
    ]);
  }

  #[test]
  fn test_rank_list_counts_non_increasing() {
    let items: Vec<(String, u64)> = (0 .. 200).map(|i| (format!("字{}", i), (i * 7919 % 13) as u64)).collect();
    let occ: TermOccurrences = items.iter()
      .map(|(t, c)| (Term::new(t.as_str(), "じ"), *c))
      .collect::<HashMap<_, _>>()
      .into();

    let ranked = occ.to_rank_list();
    assert_eq!(ranked.len(), 200);

    let counts: Vec<u64> = ranked.entries.iter()
      .map(|e| occ.get(&Term::new(e.text.as_str(), "じ")).unwrap())
      .collect();
    assert!(counts.windows(2).all(|w| w[0] >= w[1]));

    let ranks: Vec<u64> = ranked.entries.iter().map(|e| e.rank).collect();
    assert_eq!(ranks, (0 .. 200).collect::<Vec<u64>>());

    assert_eq!(occ.to_rank_list(), ranked);
  }
}
