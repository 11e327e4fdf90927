use serde::{Deserialize, Serialize};

/// A named group of drills repeated for a number of rounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub name: String,
    pub rounds: u32,
    /// Exercise ids, played in order each round.
    pub drills: Vec<String>,
    /// Work interval per drill, in seconds.
    pub work_sec: u32,
    /// Rest between drills, in seconds.
    pub rest_sec: u32,
    /// Extended rest after this block, in seconds. Ignored on the last block.
    #[serde(default)]
    pub block_rest: u32,
}

/// A workout as loaded from the catalog.
///
/// `id`, `week_key` and `day` are stamped on when the template is resolved
/// through a program schedule; they are carried into the history entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutTemplate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "weekKey")]
    pub week_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,
}

impl WorkoutTemplate {
    pub fn new(name: impl Into<String>, blocks: Vec<Block>) -> Self {
        Self {
            id: None,
            name: name.into(),
            blocks,
            week_key: None,
            day: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
