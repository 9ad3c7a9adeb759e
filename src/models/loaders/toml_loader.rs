use crate::error::{AppResult, FileError};
use crate::models::submission::SubmissionRequest;
use std::path::Path;
use tokio::fs;

/// 从 TOML 文本解析提交描述
///
/// 文件路径相对于 TOML 文件所在目录解析
pub fn parse_submission(content: &str, base_dir: Option<&Path>) -> AppResult<SubmissionRequest> {
    let mut request: SubmissionRequest =
        toml::from_str(content).map_err(|source| FileError::TomlParseFailed {
            path: base_dir
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            source,
        })?;

    if let Some(base) = base_dir {
        request.files = request
            .files
            .into_iter()
            .map(|file| {
                if file.path.is_relative() {
                    crate::models::SelectedFile::new(base.join(&file.path))
                } else {
                    file
                }
            })
            .collect();
    }

    Ok(request)
}

/// 从 TOML 文件加载提交描述
pub async fn load_submission(toml_file_path: &Path) -> AppResult<SubmissionRequest> {
    if !toml_file_path.exists() {
        return Err(FileError::NotFound {
            path: toml_file_path.display().to_string(),
        }
        .into());
    }

    let content = fs::read_to_string(toml_file_path)
        .await
        .map_err(|source| FileError::ReadFailed {
            path: toml_file_path.display().to_string(),
            source,
        })?;

    let request = parse_submission(&content, toml_file_path.parent())?;

    tracing::info!(
        "成功加载提交描述: {} 个文件, 任务 {:?}",
        request.files.len(),
        request.tasks.enabled()
    );

    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskKind;

    #[test]
    fn test_parse_submission() {
        let content = r#"
files = ["docs/notes.pdf"]
prompt = "photosynthesis"
quiz_count = 5

[tasks]
summarize = true
quiz = true
voice = true
"#;
        let request = parse_submission(content, Some(Path::new("/data"))).unwrap();
        assert_eq!(request.files.len(), 1);
        assert_eq!(request.files[0].path, Path::new("/data/docs/notes.pdf"));
        assert_eq!(request.files[0].name, "notes.pdf");
        assert_eq!(request.quiz_count, Some(5));
        assert_eq!(
            request.tasks.enabled(),
            vec![TaskKind::Summarize, TaskKind::Quiz, TaskKind::CaseStudy]
        );
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = load_submission(Path::new("/no/such/submission.toml"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::AppError::File(FileError::NotFound { .. })
        ));
    }
}
