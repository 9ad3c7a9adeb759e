pub mod account_service;
pub mod quiz_formatter;
pub mod result_renderer;
pub mod result_writer;

pub use account_service::{AccountService, CredentialStore, InMemoryCredentialStore};
pub use quiz_formatter::{format_quiz, format_quiz_text, QuizBlock, QuizChoice};
pub use result_renderer::render_results;
pub use result_writer::ResultWriter;
