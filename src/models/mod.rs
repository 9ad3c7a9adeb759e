pub mod activity;
pub mod loaders;
pub mod results;
pub mod session;
pub mod submission;
pub mod task;
pub mod upload;

pub use activity::{ActivityAction, ActivityEntry, RecentActivityLog};
pub use loaders::{load_submission, parse_submission};
pub use results::{
    ChartKind, ChartPoint, QuizPayload, ResultsRecord, TaskOutput, Visualization,
    VisualizationPayload,
};
pub use session::UploadSession;
pub use submission::{SubmissionRequest, MAX_QUIZ_COUNT};
pub use task::{TaskKind, TaskSelection};
pub use upload::SelectedFile;
