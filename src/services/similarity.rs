use ndarray::Array2;

use crate::{
    error::{AppError, AppResult},
    services::tfidf::{sparse_dot, TfidfVectorizer},
};

/// Dense pairwise cosine similarity between catalog entries
///
/// Indexed by catalog position. Built once in content-similarity mode and
/// only read afterwards.
#[derive(Debug, Clone)]
pub struct SimilarityMatrix {
    scores: Array2<f64>,
}

impl SimilarityMatrix {
    /// Vectorizes the documents with TF-IDF and takes the linear kernel of the rows
    pub fn from_documents<S: AsRef<str>>(documents: &[S]) -> Self {
        let (vectorizer, rows) = TfidfVectorizer::fit_transform(documents);
        let n = rows.len();
        let mut scores = Array2::<f64>::zeros((n, n));

        for i in 0..n {
            for j in i..n {
                let score = sparse_dot(&rows[i], &rows[j]);
                scores[[i, j]] = score;
                scores[[j, i]] = score;
            }
        }

        tracing::debug!(
            documents = n,
            vocabulary = vectorizer.vocabulary_size(),
            "Built TF-IDF similarity matrix"
        );

        Self { scores }
    }

    /// Number of rows, equal to the catalog size it was built from
    pub fn size(&self) -> usize {
        self.scores.nrows()
    }

    #[cfg(test)]
    fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.scores.get([i, j]).copied()
    }

    /// Indices of the entries most similar to `seed`, best first
    ///
    /// The seed itself is excluded. Equal scores keep catalog order.
    pub fn most_similar(&self, seed: usize, n: usize) -> AppResult<Vec<usize>> {
        if seed >= self.size() {
            return Err(AppError::Selection(format!(
                "seed {} outside similarity matrix of size {}",
                seed,
                self.size()
            )));
        }
        if self.size() < 2 {
            return Err(AppError::Selection(
                "no entries besides the seed to rank".to_string(),
            ));
        }

        let row = self.scores.row(seed);
        let mut ranked: Vec<(usize, f64)> = row
            .iter()
            .copied()
            .enumerate()
            .filter(|&(index, _)| index != seed)
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

        Ok(ranked.into_iter().take(n).map(|(index, _)| index).collect())
    }
}
