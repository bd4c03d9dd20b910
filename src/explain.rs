use std::sync::Arc;
use std::time::Instant;

use crate::corpus::Corpus;
use crate::error::ApiError;
use crate::excerpt::extract;
use crate::gemini::TextGenerator;
use crate::models::{ExplainParams, Explanation, QueryKind};

#[derive(Clone)]
pub struct ExplainService {
    corpus: Corpus,
    generator: Arc<dyn TextGenerator>,
    max_occurrences: usize,
}

impl ExplainService {
    pub fn new(corpus: Corpus, generator: Arc<dyn TextGenerator>, max_occurrences: usize) -> Self {
        Self {
            corpus,
            generator,
            max_occurrences,
        }
    }

    pub async fn explain(&self, params: &ExplainParams) -> Result<Explanation, ApiError> {
        let term = params.term().ok_or_else(ApiError::missing_query)?;
        let started = Instant::now();
        let kind = QueryKind::classify(term);
        tracing::info!("explaining {:?} as {}", term, kind.as_str());

        let explanation = match kind {
            QueryKind::ProperName => self.explain_name(term, params.source()).await?,
            QueryKind::Definition => {
                let analysis = self.generate(&build_definition_prompt(term)).await?;
                Explanation {
                    book_source: None,
                    character_name: term.to_string(),
                    block_lengths: None,
                    analysis,
                }
            }
        };

        tracing::info!(
            "answered {:?} in {}ms",
            term,
            started.elapsed().as_millis()
        );
        Ok(explanation)
    }

    async fn explain_name(&self, term: &str, source: Option<&str>) -> Result<Explanation, ApiError> {
        let Some(book) = self.corpus.resolve(term, source).await? else {
            tracing::info!("no corpus document mentions {:?}", term);
            return Err(ApiError::file_not_found());
        };

        let Some(contents) = self.corpus.read(&book).await? else {
            tracing::info!("resolved source {:?} is not in the corpus", book);
            return Err(ApiError::file_not_found());
        };

        let excerpt = extract(&contents, term, self.max_occurrences);
        tracing::debug!(
            "source {} excerpt {} chars, blocks {:?}",
            book,
            excerpt.text.chars().count(),
            excerpt.block_lengths
        );

        let analysis = self
            .generate(&build_name_prompt(term, &excerpt.text))
            .await?;

        Ok(Explanation {
            book_source: Some(book),
            character_name: term.to_string(),
            block_lengths: Some(excerpt.block_lengths),
            analysis,
        })
    }

    async fn generate(&self, prompt: &str) -> Result<String, ApiError> {
        self.generator.generate(prompt).await.map_err(|err| {
            tracing::error!("generation failed: {err:#}");
            ApiError::Generation(format!("{err:#}"))
        })
    }
}

pub fn build_name_prompt(term: &str, excerpt: &str) -> String {
    format!(
        "Given the book excerpt below, provide a brief introduction to who or what '{term}' is? \
         Try to avoid spoilers.\n\nThe book excerpt follows:\n\n{excerpt}"
    )
}

pub fn build_definition_prompt(term: &str) -> String {
    format!("Provide a brief explanation of '{term}'.")
}
