use serde::{Deserialize, Serialize};
use swatboard_core::{Difficulty, LeaderboardSnapshot, RankedEntry, SubmitReceipt};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordResponse {
    /// Always `true`: the submission was accepted, even when it ranked below
    /// the capacity and was trimmed at once. `estimated_rank` tells the two
    /// apart.
    pub stored: bool,
    pub id: String,
    pub rank_preview: RankPreview,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankPreview {
    pub difficulty: Difficulty,
    pub score: i32,
    pub estimated_rank: usize,
}

impl From<SubmitReceipt> for RecordResponse {
    fn from(receipt: SubmitReceipt) -> Self {
        Self {
            stored: true,
            id: receipt.id,
            rank_preview: RankPreview {
                difficulty: receipt.difficulty,
                score: receipt.score,
                estimated_rank: receipt.estimated_rank,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    pub difficulty: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub difficulty: Difficulty,
    pub top: Vec<RankedEntry>,
}

impl From<LeaderboardSnapshot> for LeaderboardResponse {
    fn from(snapshot: LeaderboardSnapshot) -> Self {
        Self {
            difficulty: snapshot.difficulty,
            top: snapshot.top,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub ts: u64,
}
