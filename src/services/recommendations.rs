use std::path::Path;

use rand::{seq::SliceRandom, Rng};

use crate::{
    error::{AppError, AppResult},
    models::CatalogEntry,
    services::{
        catalog::Catalog,
        ranking::{FactorModel, RankingModel},
        similarity::SimilarityMatrix,
    },
};

/// Ranking strategy chosen once at startup
pub enum Backend {
    /// Pretrained model scoring every (user, item) pair
    Model(Box<dyn RankingModel>),
    /// TF-IDF content similarity over the catalog
    ContentSimilarity(SimilarityMatrix),
}

impl Backend {
    /// Loads the model at `model_path`, or builds the similarity matrix when that fails
    pub fn resolve(model_path: &Path, catalog: &Catalog) -> Self {
        match FactorModel::load(model_path) {
            Ok(model) => {
                tracing::info!(path = %model_path.display(), "Loaded ranking model");
                Backend::Model(Box::new(model))
            }
            Err(e) => {
                tracing::info!(
                    path = %model_path.display(),
                    error = %e,
                    "No usable ranking model, building TF-IDF fallback"
                );
                Self::content_similarity(catalog)
            }
        }
    }

    pub fn content_similarity(catalog: &Catalog) -> Self {
        let documents: Vec<&str> = catalog.entries().iter().map(|e| e.text.as_str()).collect();
        let matrix = SimilarityMatrix::from_documents(&documents);
        tracing::info!(size = matrix.size(), "Built TF-IDF fallback recommender");
        Backend::ContentSimilarity(matrix)
    }

    pub fn is_model(&self) -> bool {
        matches!(self, Backend::Model(_))
    }
}

/// How a selection was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Model scores; `random_scores` items failed and got a random score
    Model { random_scores: usize },
    /// Similarity to the seed entry at this catalog index
    Similarity { seed: usize },
    /// Uniform sample without replacement
    RandomSample,
}

#[derive(Debug)]
pub struct Selection<'a> {
    pub entries: Vec<&'a CatalogEntry>,
    pub strategy: Strategy,
}

/// Picks catalog entries for a user from the active backend
///
/// Holds no per-user state; every call is independent.
pub struct Recommender {
    catalog: Catalog,
    backend: Backend,
}

impl Recommender {
    pub fn new(catalog: Catalog, backend: Backend) -> Self {
        Self { catalog, backend }
    }

    /// Loads the catalog and resolves the backend from disk
    pub fn load(movies_path: &Path, model_path: &Path) -> Self {
        let catalog = Catalog::load(movies_path);
        let backend = Backend::resolve(model_path, &catalog);
        Self::new(catalog, backend)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn model_loaded(&self) -> bool {
        self.backend.is_model()
    }

    /// Returns up to `n` entries for `user_id`, best first
    pub fn select(&self, user_id: &str, n: usize) -> Selection<'_> {
        self.select_with_rng(user_id, n, &mut rand::thread_rng())
    }

    pub fn select_with_rng<R: Rng>(
        &self,
        user_id: &str,
        n: usize,
        rng: &mut R,
    ) -> Selection<'_> {
        match &self.backend {
            Backend::Model(model) => self.rank_by_model(model.as_ref(), user_id, n, rng),
            Backend::ContentSimilarity(matrix) => {
                let seed = rng.gen_range(0..self.catalog.len());
                match self.rank_by_similarity(matrix, seed, n) {
                    Ok(entries) => Selection {
                        entries,
                        strategy: Strategy::Similarity { seed },
                    },
                    Err(e) => {
                        tracing::warn!(seed, error = %e, "Similarity ranking failed, sampling at random");
                        self.random_sample(n, rng)
                    }
                }
            }
        }
    }

    fn rank_by_model<R: Rng>(
        &self,
        model: &dyn RankingModel,
        user_id: &str,
        n: usize,
        rng: &mut R,
    ) -> Selection<'_> {
        let mut random_scores = 0;
        let mut scored: Vec<(usize, f64)> = self
            .catalog
            .entries()
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let item_id = entry.id.to_string();
                let score = model
                    .predict(user_id, &item_id)
                    .and_then(|prediction| prediction.score());
                match score {
                    Ok(score) => (index, score),
                    Err(e) => {
                        tracing::debug!(user_id, item_id = %item_id, error = %e, "Scoring failed, using random score");
                        random_scores += 1;
                        (index, rng.gen::<f64>())
                    }
                }
            })
            .collect();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

        let entries = scored
            .into_iter()
            .take(n)
            .filter_map(|(index, _)| self.catalog.get(index))
            .collect();

        Selection {
            entries,
            strategy: Strategy::Model { random_scores },
        }
    }

    fn rank_by_similarity(
        &self,
        matrix: &SimilarityMatrix,
        seed: usize,
        n: usize,
    ) -> AppResult<Vec<&CatalogEntry>> {
        if matrix.size() != self.catalog.len() {
            return Err(AppError::Selection(format!(
                "similarity matrix has {} rows for {} catalog entries",
                matrix.size(),
                self.catalog.len()
            )));
        }

        Ok(matrix
            .most_similar(seed, n)?
            .into_iter()
            .filter_map(|index| self.catalog.get(index))
            .collect())
    }

    fn random_sample<R: Rng>(&self, n: usize, rng: &mut R) -> Selection<'_> {
        let amount = n.min(self.catalog.len());
        Selection {
            entries: self.catalog.entries().choose_multiple(rng, amount).collect(),
            strategy: Strategy::RandomSample,
        }
    }
}
