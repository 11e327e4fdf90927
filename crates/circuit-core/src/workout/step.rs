use serde::{Deserialize, Serialize};

/// Discriminant of a [`StepKind`], used for dispatch and in events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepType {
    BlockStart,
    Work,
    Rest,
    BlockRest,
    WorkoutComplete,
}

impl StepType {
    /// Whether steps of this type run a countdown.
    pub fn is_timed(self) -> bool {
        matches!(self, StepType::Work | StepType::Rest | StepType::BlockRest)
    }
}

/// Marker shown before a block begins. Waits for the user to continue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockStartStep {
    pub block_name: String,
    pub block_index: usize,
    pub total_blocks: usize,
    pub rounds: u32,
    pub drill_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkStep {
    pub exercise_id: String,
    pub exercise_name: String,
    pub instruction: String,
    pub visual_ref: Option<String>,
    pub duration: u32,
    pub block_name: String,
    pub block_index: usize,
    pub round: u32,
    pub total_rounds: u32,
    pub drill_index: usize,
    pub total_drills: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestStep {
    pub duration: u32,
    pub block_name: String,
    pub block_index: usize,
    pub round: u32,
    pub total_rounds: u32,
    pub next_exercise_id: String,
    pub next_exercise: String,
    pub next_visual_ref: Option<String>,
    /// Set when the upcoming drill starts a new round.
    pub is_round_transition: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRestStep {
    pub duration: u32,
    pub block_name: String,
    pub block_index: usize,
    /// First drill of the following block, if it has any.
    pub next_exercise_id: Option<String>,
    pub next_exercise: Option<String>,
    pub next_visual_ref: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutCompleteStep {
    pub workout_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepKind {
    BlockStart(BlockStartStep),
    Work(WorkStep),
    Rest(RestStep),
    BlockRest(BlockRestStep),
    WorkoutComplete(WorkoutCompleteStep),
}

/// One entry of the flattened timeline. `id` is the step's position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub id: usize,
    #[serde(flatten)]
    pub kind: StepKind,
}

impl Step {
    pub fn step_type(&self) -> StepType {
        match self.kind {
            StepKind::BlockStart(_) => StepType::BlockStart,
            StepKind::Work(_) => StepType::Work,
            StepKind::Rest(_) => StepType::Rest,
            StepKind::BlockRest(_) => StepType::BlockRest,
            StepKind::WorkoutComplete(_) => StepType::WorkoutComplete,
        }
    }

    /// Countdown length in seconds; zero for marker steps.
    pub fn duration_secs(&self) -> u32 {
        match &self.kind {
            StepKind::Work(s) => s.duration,
            StepKind::Rest(s) => s.duration,
            StepKind::BlockRest(s) => s.duration,
            StepKind::BlockStart(_) | StepKind::WorkoutComplete(_) => 0,
        }
    }

    pub fn is_timed(&self) -> bool {
        self.step_type().is_timed()
    }

    /// Short human-readable label for status lines.
    pub fn label(&self) -> String {
        match &self.kind {
            StepKind::BlockStart(s) => s.block_name.clone(),
            StepKind::Work(s) => s.exercise_name.clone(),
            StepKind::Rest(s) => format!("Rest (next: {})", s.next_exercise),
            StepKind::BlockRest(s) => match &s.next_exercise {
                Some(next) => format!("Block rest (next: {next})"),
                None => "Block rest".to_string(),
            },
            StepKind::WorkoutComplete(s) => format!("{} complete", s.workout_name),
        }
    }
}
