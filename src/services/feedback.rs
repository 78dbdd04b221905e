use std::path::{Path, PathBuf};

use serde_json::Value;
use tokio::{fs, io::AsyncWriteExt};

use crate::error::AppResult;

/// Append-only JSONL log of caller feedback
///
/// Every record opens the file in append mode, writes one line and closes it
/// again. Concurrent writers are not coordinated.
#[derive(Debug, Clone)]
pub struct FeedbackSink {
    path: PathBuf,
}

impl FeedbackSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends the payload verbatim as a single JSON line
    pub async fn record(&self, payload: &Value) -> AppResult<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).await?;
        }

        let mut line = serde_json::to_string(payload)?;
        line.push('\n');

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        tracing::debug!(path = %self.path.display(), bytes = line.len(), "Recorded feedback");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lines(path: &Path) -> Vec<Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_record_appends_one_line() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FeedbackSink::new(dir.path().join("feedback_log.jsonl"));
        let payload = json!({"user_id": "jane", "movie_id": 1, "rating": 5});

        sink.record(&payload).await.unwrap();

        assert_eq!(lines(sink.path()), vec![payload]);
    }

    #[tokio::test]
    async fn test_record_keeps_append_order() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FeedbackSink::new(dir.path().join("feedback_log.jsonl"));

        sink.record(&json!({"n": 1})).await.unwrap();
        sink.record(&json!(["any", "shape", null])).await.unwrap();
        sink.record(&json!("bare string")).await.unwrap();

        assert_eq!(
            lines(sink.path()),
            vec![json!({"n": 1}), json!(["any", "shape", null]), json!("bare string")]
        );
    }

    #[tokio::test]
    async fn test_record_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FeedbackSink::new(dir.path().join("model").join("nested").join("log.jsonl"));

        sink.record(&json!({"liked": true})).await.unwrap();

        assert_eq!(lines(sink.path()).len(), 1);
    }

    #[tokio::test]
    async fn test_record_multiline_string_stays_on_one_line() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FeedbackSink::new(dir.path().join("log.jsonl"));
        let payload = json!({"comment": "great\nmovie"});

        sink.record(&payload).await.unwrap();

        let contents = std::fs::read_to_string(sink.path()).unwrap();
        assert_eq!(contents.matches('\n').count(), 1);
        assert_eq!(lines(sink.path()), vec![payload]);
    }

    #[tokio::test]
    async fn test_record_fails_when_path_is_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FeedbackSink::new(dir.path());

        assert!(sink.record(&json!({})).await.is_err());
    }
}
