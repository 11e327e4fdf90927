mod linearizer;
mod step;
mod template;

pub use linearizer::{
    calculate_elapsed_time, calculate_total_duration, format_time, linearize, workout_summary,
    WorkoutSummary,
};
pub use step::{
    BlockRestStep, BlockStartStep, RestStep, Step, StepKind, StepType, WorkStep,
    WorkoutCompleteStep,
};
pub use template::{Block, WorkoutTemplate};
