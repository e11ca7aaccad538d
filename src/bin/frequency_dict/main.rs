use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use console::style;
use frequency_dict::corpora::{Corpus, CorpusJob};
use frequency_dict::errors::Result;

/// Converts Japanese corpus frequency lists into rank-based frequency dictionaries.
#[derive(Parser, Debug)]
#[command(name = "frequency_dict", version)]
struct Args {
  #[command(subcommand)]
  corpus: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Balanced Corpus of Contemporary Written Japanese (短単位語彙表 TSV)
  Bccwj { list: PathBuf },

  /// Corpus of Spontaneous Japanese (語彙表 TSV)
  Csj { list: PathBuf },

  /// NINJAL Web Japanese Corpus (語彙表 TSV)
  Nwjc { list: PathBuf },

  /// Corpus of Historical Japanese, Nara to Edo (SUW and LUW lexicons)
  #[command(name = "chj_premodern", alias = "chj-premodern")]
  ChjPremodern { suw: PathBuf, luw: PathBuf },

  /// Corpus of Historical Japanese, Meiji and Taisho (non-magazine and magazine lexicons)
  #[command(name = "chj_modern", alias = "chj-modern")]
  ChjModern { nonmag: PathBuf, mag: PathBuf },

  /// Re-package an existing JPDB frequency dictionary
  Jpdb { package: PathBuf },
}

impl Command {
  fn into_job(self) -> (Corpus, Vec<PathBuf>) {
    match self {
      Command::Bccwj { list } => (Corpus::Bccwj, vec![list]),
      Command::Csj { list } => (Corpus::Csj, vec![list]),
      Command::Nwjc { list } => (Corpus::Nwjc, vec![list]),
      Command::ChjPremodern { suw, luw } => (Corpus::ChjPremodern, vec![suw, luw]),
      Command::ChjModern { nonmag, mag } => (Corpus::ChjModern, vec![nonmag, mag]),
      Command::Jpdb { package } => (Corpus::Jpdb, vec![package]),
    }
  }
}

fn run(args: Args) -> Result<()> {
  let (corpus, files) = args.corpus.into_job();
  let job = CorpusJob::for_corpus(corpus);

  for file in &files {
    println!("{} {}", style("Reading").bold(), style(file.display()).dim());
  }

  let built = job.run(&files, Path::new("."))?;

  if let Some(stats) = built.merge_stats {
    println!("{} {:.1}% shared terms, {} with differing counts",
      style("Merged").bold(), stats.overlap * 100.0, stats.differing_counts);
  }

  println!("{} {} ({} terms)",
    style("Wrote").green().bold(), job.output_file, built.dictionary.rank_list.len());

  Ok(())
}

/// Library diagnostics (repeated terms, per-file statistics) go to stderr.
/// Warnings show by default, `FREQUENCY_DICT_LOG=debug` shows everything.
fn logger() -> env_logger::Builder {
  env_logger::Builder::from_env(env_logger::Env::default().filter_or("FREQUENCY_DICT_LOG", "warn"))
}

fn main() -> ExitCode {
  logger().init();

  match run(Args::parse()) {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      eprintln!("{} {}", style("error:").red().bold(), e);
      ExitCode::FAILURE
    }
  }
}
