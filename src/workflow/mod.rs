pub mod submission_ctx;
pub mod task_flow;
pub mod upload_form;

pub use submission_ctx::SubmissionCtx;
pub use task_flow::{
    validate, BusyFlag, FailurePolicy, FlowState, Settlement, SubmissionOutcome, TaskFlow,
};
pub use upload_form::UploadForm;
