mod answer;
mod config;
mod problem;
mod record;

pub use answer::{AnswerCheck, check_answer, normalize_remainder_input};
pub use config::{ConfigError, DrillConfig, DrillConfigDraft, OperationType};
pub use problem::{Answer, Operation, Problem};
pub use record::{
    LeaderboardFilter, Record, SessionResults, format_elapsed_label, format_record_date, round1,
};
