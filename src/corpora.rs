use std::path::{Path, PathBuf};

use crate::dictionary::FrequencyDictionary;
use crate::errors::{FreqDictError, Result};
use crate::occurrences::TermOccurrences;
use crate::rank_list::RankList;
use crate::source::{Encoding, RankListLayout, SourceLayout};

const AUTHOR: &str = "NINJAL, uncomputable";
const URL: &str = "https://github.com/uncomputable/frequency-dict";
const MAX_ENTRIES: usize = 80000;

const CC_BY: &str = "CC BY 4.0 https://creativecommons.org/licenses/by/4.0/deed.ja";
const CC_BY_NC_SA: &str = "CC BY-NC-SA 4.0 https://creativecommons.org/licenses/by-nc-sa/4.0/deed.ja";
const CC_BY_NC_ND: &str = "CC BY-NC-ND 3.0 https://creativecommons.org/licenses/by-nc-nd/3.0/deed.ja";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Corpus {
  /// Balanced Corpus of Contemporary Written Japanese
  Bccwj,
  /// Corpus of Spontaneous Japanese
  Csj,
  /// NINJAL Web Japanese Corpus
  Nwjc,
  /// Corpus of Historical Japanese, Nara to Edo period
  ChjPremodern,
  /// Corpus of Historical Japanese, Meiji and Taisho period
  ChjModern,
  /// Existing JPDB frequency dictionary, re-packaged
  Jpdb,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MergePolicy {
  /// The two files count disjoint occurrences: add.
  Distinct,
  /// The two files may count the same occurrences: take the maximum.
  ConservativeOverlap,
}

#[derive(Clone, Debug)]
pub enum Inputs {
  RankList(RankListLayout),
  Occurrences {
    first: SourceLayout,
    second: SourceLayout,
    merge: MergePolicy,
  },
  Package {
    max_entries: Option<usize>,
  },
}

impl Inputs {
  pub fn file_count(&self) -> usize {
    match self {
      Inputs::Occurrences { .. } => 2,
      _ => 1
    }
  }
}

#[derive(Clone, Debug)]
pub struct CorpusJob {
  pub output_file: &'static str,
  pub title: &'static str,
  pub revision: &'static str,
  pub author: Option<&'static str>,
  pub url: Option<&'static str>,
  pub description: Option<&'static str>,
  pub attribution: Option<&'static str>,
  pub inputs: Inputs,
}

/// How similar the two merged files were.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct MergeStats {
  pub overlap: f64,
  /// Shared terms whose counts differ between the two files.
  pub differing_counts: usize,
}

pub struct BuiltDictionary {
  pub dictionary: FrequencyDictionary,
  pub merge_stats: Option<MergeStats>,
}

fn suw_rank_list() -> Inputs {
  Inputs::RankList(RankListLayout {
    separator: "\t",
    text_index: 2,
    reading_index: Some(1),
    skip_lines: 1,
    max_entries: Some(MAX_ENTRIES),
    encoding: Encoding::Utf8,
  })
}

fn chj_lexicon(frequency_index: usize) -> SourceLayout {
  SourceLayout {
    separator: "\t",
    text_index: 1,
    reading_index: 0,
    frequency_index,
    skip_lines: 1,
    encoding: Encoding::Utf16,
  }
}

impl CorpusJob {
  pub fn for_corpus(corpus: Corpus) -> CorpusJob {
    match corpus {
      Corpus::Bccwj => CorpusJob {
        output_file: "BCCWJ.zip",
        title: "書き言葉",
        revision: "src v1.1 (2017-12) yomi v0",
        author: Some(AUTHOR),
        url: Some(URL),
        description: Some("『現代日本語書き言葉均衡コーパス（BCCWJ）』は、現代日本語の書き言葉の全体像を把握するために構築したコーパスであり、現在、日本語について入手可能な唯一の均衡コーパスです。\n\nhttps://clrd.ninjal.ac.jp/bccwj/index.html"),
        attribution: Some(CC_BY_NC_ND),
        inputs: suw_rank_list(),
      },
      Corpus::Csj => CorpusJob {
        output_file: "CSJ.zip",
        title: "話し言葉",
        revision: "src v2018-03 yomi v0",
        author: Some(AUTHOR),
        url: Some(URL),
        description: Some("『日本語話し言葉コーパス（CSJ）』は、日本語の自発音声を大量にあつめて多くの研究用情報を付加した話し言葉研究用のデータベースであり、国立国語研究所・ 情報通信研究機構（旧通信総合研究所）・ 東京工業大学 が共同開発した、質・量ともに世界最高水準の話し言葉データベースです。\n\nhttps://clrd.ninjal.ac.jp/csj/index.html"),
        attribution: Some(CC_BY_NC_ND),
        inputs: suw_rank_list(),
      },
      Corpus::Nwjc => CorpusJob {
        output_file: "NWJC.zip",
        title: "ウェブ",
        revision: "src v2022_02 yomi v0",
        author: Some(AUTHOR),
        url: Some(URL),
        description: Some("『国語研日本語ウェブコーパス（NWJC）』はウェブを母集団として100億語規模を目標として構築した日本語コーパスです。\n\nhttps://masayu-a.github.io/NWJC/"),
        attribution: Some(CC_BY),
        inputs: suw_rank_list(),
      },
      Corpus::ChjPremodern => CorpusJob {
        output_file: "CHJ_premodern.zip",
        title: "奈良〜江戸",
        revision: "src v2022_03 yomi v0",
        author: Some(AUTHOR),
        url: Some(URL),
        description: Some("『日本語歴史コーパス（CHJ）』は、デジタル時代における日本語史研究の基礎資料として開発を進めているコーパスです。\n\n奈良時代編：万葉集／宣命／祝詞\n平安時代編：仮名文学／訓点資料\n鎌倉時代編：説話・随筆／日記・紀行／軍記\n室町時代編：狂言／キリシタン資料\n江戸時代編：洒落本／人情本／近松浄瑠璃／随筆・紀行\n\nhttps://clrd.ninjal.ac.jp/chj/index.html"),
        attribution: Some(CC_BY_NC_SA),
        // Short and long unit words tokenize the same texts
        inputs: Inputs::Occurrences {
          first: chj_lexicon(16),
          second: chj_lexicon(13),
          merge: MergePolicy::ConservativeOverlap,
        },
      },
      Corpus::ChjModern => CorpusJob {
        output_file: "CHJ_modern.zip",
        title: "明治〜大正",
        revision: "src v2022_03 yomi v0",
        author: Some(AUTHOR),
        url: Some(URL),
        description: Some("『日本語歴史コーパス（CHJ）』は、デジタル時代における日本語史研究の基礎資料として開発を進めているコーパスです。\n\n明治・大正編：雑誌／教科書／明治初期口語資料／近代小説／新聞／落語SP盤\n\nhttps://clrd.ninjal.ac.jp/chj/index.html"),
        attribution: Some(CC_BY_NC_SA),
        // Magazine and non-magazine texts are disjoint
        inputs: Inputs::Occurrences {
          first: chj_lexicon(16),
          second: chj_lexicon(16),
          merge: MergePolicy::Distinct,
        },
      },
      Corpus::Jpdb => CorpusJob {
        output_file: "JPDB.zip",
        title: "",
        revision: "",
        author: None,
        url: None,
        description: None,
        attribution: None,
        inputs: Inputs::Package { max_entries: Some(MAX_ENTRIES) },
      },
    }
  }

  /// Reads the input files and assembles the dictionary, without writing anything.
  ///
  /// Package inputs keep the metadata stored in their own index.
  pub fn build(&self, files: &[PathBuf]) -> Result<BuiltDictionary> {
    if files.len() != self.inputs.file_count() {
      return Err(FreqDictError::invalid_argument(
        "files",
        format!("{} expects {} input file(s), got {}", self.output_file, self.inputs.file_count(), files.len())
      ));
    }

    let (rank_list, merge_stats) = match &self.inputs {
      Inputs::RankList(layout) => (RankList::from_rank_list(&files[0], layout)?, None),
      Inputs::Occurrences { first, second, merge } => {
        let mut occurrences = TermOccurrences::from_frequency_list(&files[0], first)?;
        let other = TermOccurrences::from_frequency_list(&files[1], second)?;

        let stats = MergeStats {
          overlap: occurrences.overlap(&other),
          differing_counts: occurrences.count_differences(&other).len(),
        };
        log::debug!("merging {} and {}: {:?}", files[0].display(), files[1].display(), stats);

        match merge {
          MergePolicy::Distinct => occurrences.unify_distinct(&other),
          MergePolicy::ConservativeOverlap => occurrences.unify_conservative_overlap(&other),
        }
        (occurrences.to_rank_list(), Some(stats))
      },
      Inputs::Package { max_entries } => {
        let dictionary = FrequencyDictionary::from_zip(&files[0], *max_entries)?;
        return Ok(BuiltDictionary { dictionary, merge_stats: None });
      },
    };

    let dictionary = FrequencyDictionary {
      rank_list,
      title: self.title.to_owned(),
      revision: self.revision.to_owned(),
      author: self.author.map(str::to_owned),
      url: self.url.map(str::to_owned),
      description: self.description.map(str::to_owned),
      attribution: self.attribution.map(str::to_owned),
    };

    Ok(BuiltDictionary { dictionary, merge_stats })
  }

  /// Builds the dictionary and writes it as `output_file` inside `out_dir`.
  pub fn run(&self, files: &[PathBuf], out_dir: &Path) -> Result<BuiltDictionary> {
    let built = self.build(files)?;
    built.dictionary.to_zip(&out_dir.join(self.output_file))?;
    Ok(built)
  }
}
