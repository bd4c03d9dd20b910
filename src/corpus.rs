use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::excerpt::count_occurrences;

/// A flat directory of plain-text books, addressed by file name.
#[derive(Clone, Debug)]
pub struct Corpus {
    dir: PathBuf,
}

impl Corpus {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File names of every regular, non-hidden file in the corpus, sorted lexicographically.
    pub async fn entries(&self) -> Result<Vec<String>> {
        let mut dir = tokio::fs::read_dir(&self.dir)
            .await
            .with_context(|| format!("failed to list corpus dir: {}", self.dir.display()))?;

        let mut names = Vec::new();
        while let Some(entry) = dir.next_entry().await? {
            let is_file = match tokio::fs::metadata(entry.path()).await {
                Ok(meta) => meta.is_file(),
                Err(err) if err.kind() == ErrorKind::NotFound => false,
                Err(err) => return Err(err.into()),
            };
            if !is_file {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                tracing::warn!("skipping non utf-8 corpus entry: {:?}", entry.file_name());
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            names.push(name);
        }

        names.sort();
        Ok(names)
    }

    /// Reads a corpus entry by name. Returns `None` when no such entry exists.
    pub async fn read(&self, name: &str) -> Result<Option<String>> {
        if !is_plain_name(name) {
            return Ok(None);
        }

        let path = self.dir.join(name);
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Ok(None),
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).with_context(|| format!("failed to stat {}", path.display()))
            }
        }

        let bytes = tokio::fs::read(&path)
            .await
            .with_context(|| format!("failed to read corpus file: {}", path.display()))?;
        Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
    }

    /// Picks the document a query should be answered from.
    ///
    /// An explicit source wins when it names an entry exactly; otherwise the first entry
    /// containing it is used, and failing that the explicit string comes back unchanged.
    /// Without an explicit source the entry mentioning `term` most often is chosen.
    pub async fn resolve(&self, term: &str, explicit: Option<&str>) -> Result<Option<String>> {
        let entries = self.entries().await?;

        if let Some(source) = explicit {
            if entries.iter().any(|name| name == source) {
                return Ok(Some(source.to_string()));
            }
            let matched = entries
                .into_iter()
                .find(|name| name.contains(source))
                .unwrap_or_else(|| source.to_string());
            return Ok(Some(matched));
        }

        let mut best: Option<(String, usize)> = None;
        for name in entries {
            let Some(contents) = self.read(&name).await? else {
                continue;
            };
            let count = count_occurrences(&contents, term);
            tracing::debug!("{} mentions {:?} {} times", name, term, count);

            let best_count = best.as_ref().map(|(_, c)| *c).unwrap_or(0);
            if count > best_count {
                best = Some((name, count));
            }
        }

        Ok(best.map(|(name, _)| name))
    }
}

fn is_plain_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus_with(files: &[(&str, &str)]) -> (tempfile::TempDir, Corpus) {
        let dir = tempfile::tempdir().unwrap();
        for (name, contents) in files {
            std::fs::write(dir.path().join(name), contents).unwrap();
        }
        let corpus = Corpus::new(dir.path());
        (dir, corpus)
    }

    #[tokio::test]
    async fn entries_are_sorted_and_skip_hidden_and_dirs() {
        let (dir, corpus) = corpus_with(&[("b.txt", ""), ("a.txt", ""), (".hidden", "")]);
        std::fs::create_dir(dir.path().join("nested")).unwrap();

        assert_eq!(corpus.entries().await.unwrap(), vec!["a.txt", "b.txt"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn symlinked_books_are_listed_and_detected() {
        let books = tempfile::tempdir().unwrap();
        std::fs::write(books.path().join("exodus.txt"), "Finn and Finn").unwrap();

        let (dir, corpus) = corpus_with(&[("other.txt", "Rey")]);
        std::os::unix::fs::symlink(
            books.path().join("exodus.txt"),
            dir.path().join("linked.txt"),
        )
        .unwrap();
        std::os::unix::fs::symlink(books.path().join("gone.txt"), dir.path().join("dangling.txt"))
            .unwrap();

        assert_eq!(corpus.entries().await.unwrap(), vec!["linked.txt", "other.txt"]);
        let resolved = corpus.resolve("Finn", None).await.unwrap();
        assert_eq!(resolved.as_deref(), Some("linked.txt"));
        let partial = corpus.resolve("Finn", Some("link")).await.unwrap();
        assert_eq!(partial.as_deref(), Some("linked.txt"));
    }

    #[tokio::test]
    async fn auto_detect_finds_only_document_with_term() {
        let (_dir, corpus) = corpus_with(&[
            ("exodus.txt", "Finn walked in. Later Finn left."),
            ("genesis.txt", "Nobody of note here."),
        ]);

        let resolved = corpus.resolve("Finn", None).await.unwrap();
        assert_eq!(resolved.as_deref(), Some("exodus.txt"));
    }

    #[tokio::test]
    async fn auto_detect_prefers_most_mentions() {
        let (_dir, corpus) = corpus_with(&[
            ("a.txt", "Rey"),
            ("b.txt", "Rey Rey Rey"),
            ("c.txt", "Rey Rey"),
        ]);

        let resolved = corpus.resolve("Rey", None).await.unwrap();
        assert_eq!(resolved.as_deref(), Some("b.txt"));
    }

    #[tokio::test]
    async fn auto_detect_ties_go_to_lexicographically_first() {
        let (_dir, corpus) = corpus_with(&[
            ("zeta.txt", "Poe and Poe"),
            ("alpha.txt", "Poe or Poe"),
            ("mid.txt", "Poe"),
        ]);

        let resolved = corpus.resolve("Poe", None).await.unwrap();
        assert_eq!(resolved.as_deref(), Some("alpha.txt"));
    }

    #[tokio::test]
    async fn auto_detect_returns_none_when_term_is_absent() {
        let (_dir, corpus) = corpus_with(&[("a.txt", "nothing"), ("b.txt", "still nothing")]);
        assert_eq!(corpus.resolve("Finn", None).await.unwrap(), None);
    }

    #[tokio::test]
    async fn explicit_source_exact_then_substring_then_literal() {
        let (_dir, corpus) = corpus_with(&[
            ("pfh-exodus.txt", "Finn"),
            ("pfh-exodus-notes.txt", "Finn"),
            ("exodus", "Finn"),
        ]);

        let exact = corpus.resolve("Finn", Some("exodus")).await.unwrap();
        assert_eq!(exact.as_deref(), Some("exodus"));

        let partial = corpus.resolve("Finn", Some("pfh-exo")).await.unwrap();
        assert_eq!(partial.as_deref(), Some("pfh-exodus-notes.txt"));

        let literal = corpus.resolve("Finn", Some("nonexistent.txt")).await.unwrap();
        assert_eq!(literal.as_deref(), Some("nonexistent.txt"));
    }

    #[tokio::test]
    async fn read_rejects_missing_and_escaping_names() {
        let (dir, corpus) = corpus_with(&[("book.txt", "text")]);
        std::fs::create_dir(dir.path().join("sub")).unwrap();

        assert_eq!(corpus.read("book.txt").await.unwrap().as_deref(), Some("text"));
        assert_eq!(corpus.read("missing.txt").await.unwrap(), None);
        assert_eq!(corpus.read("../book.txt").await.unwrap(), None);
        assert_eq!(corpus.read("sub").await.unwrap(), None);
        assert_eq!(corpus.read("").await.unwrap(), None);
    }

    #[tokio::test]
    async fn missing_corpus_dir_is_an_error() {
        let corpus = Corpus::new("/definitely/not/a/corpus/dir");
        assert!(corpus.entries().await.is_err());
    }
}
