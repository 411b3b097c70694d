mod merge;
mod rank;
mod score;

pub use merge::merge_candidates;
pub use rank::{RankedResults, rank_candidates};
pub use score::{ScoreSignals, ScoredProduct, composite_score, score_candidates};
