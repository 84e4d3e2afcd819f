use std::sync::Arc;

use tracing::{debug, warn};

use lexrag_core::config::RetrieverConfig;
use lexrag_core::error::Result;
use lexrag_core::traits::Vectorizer;
use lexrag_core::types::{Retrieval, RetrievalResult};
use lexrag_index::{Index, IndexStore};

/// Ranks indexed chunks against a query and gates the outcome on the best
/// score.
///
/// The index is shared read-only; a rebuilt index is installed by
/// constructing a new `Retriever`, never by mutating the current one.
#[derive(Debug, Clone)]
pub struct Retriever {
    index: Arc<Index>,
    top_k: usize,
    threshold: f64,
}

impl Retriever {
    pub fn new(index: impl Into<Arc<Index>>, config: &RetrieverConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { index: index.into(), top_k: config.top_k, threshold: config.threshold })
    }

    pub fn open(store: &dyn IndexStore, config: &RetrieverConfig) -> Result<Self> {
        config.validate()?;
        let index = store.load()?;
        Self::new(index, config)
    }

    pub fn index(&self) -> &Arc<Index> {
        &self.index
    }

    /// Cosine similarity of the query against every chunk, in chunk order.
    pub fn scores(&self, query: &str) -> Vec<f64> {
        let query_vec = self.index.model.transform(query);
        self.index.matrix.cosine_scores(&query_vec)
    }

    /// Top `k` chunks for `query`, or `NoMatch` when the best score is below
    /// the threshold. Once the best score passes, all `k` hits are returned
    /// even if some of them score below the threshold.
    pub fn retrieve(&self, query: &str) -> Retrieval {
        let ranked = rank(&self.scores(query), self.top_k);
        let top_score = ranked.first().map_or(0.0, |&(_, s)| s);
        if top_score < self.threshold {
            warn!(
                "No match for query (top score {:.3} < threshold {:.3})",
                top_score, self.threshold
            );
            return Retrieval::NoMatch { top_score };
        }
        debug!("Query matched {} chunks, top score {:.3}", ranked.len(), top_score);
        Retrieval::Matches(
            ranked
                .into_iter()
                .map(|(i, score)| RetrievalResult::new(self.index.chunks[i].clone(), score))
                .collect(),
        )
    }
}

/// Indices of the `k` highest scores, best first. Equal scores keep
/// ascending index order.
pub fn rank(scores: &[f64], k: usize) -> Vec<(usize, f64)> {
    let mut order: Vec<(usize, f64)> = scores.iter().copied().enumerate().collect();
    order.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    order.truncate(k);
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexrag_core::types::Chunk;
    use std::path::Path;

    fn index(texts: &[&str]) -> Index {
        let chunks = texts
            .iter()
            .enumerate()
            .map(|(i, t)| Chunk {
                file: format!("doc{i}.txt"),
                chunk_id: i,
                text: t.to_string(),
                start_word: 0,
                end_word: 0,
            })
            .collect();
        Index::build(chunks, Path::new(".")).unwrap()
    }

    fn config(top_k: usize, threshold: f64) -> RetrieverConfig {
        RetrieverConfig { top_k, threshold, ..RetrieverConfig::default() }
    }

    #[test]
    fn rank_breaks_ties_by_chunk_order() {
        assert_eq!(rank(&[0.9, 0.9, 0.1], 2), vec![(0, 0.9), (1, 0.9)]);
        assert_eq!(rank(&[0.1, 0.9, 0.9], 2), vec![(1, 0.9), (2, 0.9)]);
        assert_eq!(rank(&[0.2, 0.5], 10), vec![(1, 0.5), (0, 0.2)]);
        assert!(rank(&[], 3).is_empty());
    }

    #[test]
    fn threshold_gates_on_top_score_only() {
        let idx = index(&["solar panel battery", "rain barrel gutter", "compost heap worms"]);
        let strict = Retriever::new(idx.clone(), &config(3, 1.0)).unwrap();
        let top = strict.scores("solar panel battery").into_iter().fold(0.0, f64::max);
        assert!((top - 1.0).abs() < 1e-9);

        let lenient = Retriever::new(idx, &config(3, 0.42)).unwrap();
        let results = lenient.retrieve("solar panel battery").into_results().expect("match");
        assert_eq!(results.len(), 3, "all top-k hits are returned once the best passes");
        assert_eq!(results[0].chunk.chunk_id, 0);
        assert_eq!(results[1].score, 0.0);
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn score_equal_to_threshold_is_accepted() {
        let idx = index(&["alpha beta", "gamma delta"]);
        let baseline = Retriever::new(idx.clone(), &config(1, 0.0)).unwrap();
        let best = baseline.scores("alpha").into_iter().fold(0.0, f64::max);
        let at = Retriever::new(idx.clone(), &config(1, best)).unwrap();
        assert!(!at.retrieve("alpha").is_no_match());
        let above = Retriever::new(idx, &config(1, (best + 0.01).min(1.0))).unwrap();
        assert!(above.retrieve("alpha").is_no_match());
    }

    #[test]
    fn out_of_vocabulary_query_is_no_match() {
        let retriever =
            Retriever::new(index(&["alpha beta", "gamma delta"]), &config(3, 0.42)).unwrap();
        match retriever.retrieve("zeppelin ?!") {
            Retrieval::NoMatch { top_score } => assert_eq!(top_score, 0.0),
            other => panic!("expected NoMatch, got {other:?}"),
        }
    }

    #[test]
    fn results_carry_citations() {
        let retriever =
            Retriever::new(index(&["wood stove chimney", "garden hose"]), &config(1, 0.1)).unwrap();
        let results = retriever.retrieve("chimney").into_results().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].citation, "doc0.txt:words[0-0]");
    }

    #[test]
    fn invalid_config_is_rejected() {
        assert!(Retriever::new(index(&["alpha beta"]), &config(0, 0.42)).is_err());
    }

    #[test]
    fn concurrent_queries_share_one_index() {
        let idx = index(&["wool socks", "rubber boots", "wool hat"]);
        let retriever = Arc::new(Retriever::new(idx, &config(2, 0.1)).unwrap());
        let expected = retriever.retrieve("wool");
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let r = Arc::clone(&retriever);
                std::thread::spawn(move || r.retrieve("wool"))
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), expected);
        }
    }
}
