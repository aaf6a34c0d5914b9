use std::time::Duration;
use uuid::Uuid;

use crate::core::state::AppState;

pub(crate) fn sanitized_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '.' || *c == '_' || *c == '-')
        .collect();

    if sanitized.is_empty() {
        "upload".to_string()
    } else {
        sanitized
    }
}

pub(crate) fn answer_object_key(mark_id: &str, filename: &str) -> String {
    let object_id = Uuid::new_v4().to_string();
    format!("marks/{mark_id}/{object_id}_{}", sanitized_filename(filename))
}

/// Short-lived download URL for a stored answer file. `None` when the mark
/// has no answer or storage is not configured.
pub(crate) async fn presigned_answer_url(
    state: &AppState,
    answer_key: Option<&str>,
) -> Option<String> {
    let key = answer_key?;
    let storage = state.storage()?;
    let expires =
        Duration::from_secs(state.settings().storage().answer_url_expire_minutes * 60);

    match storage.presign_get(key, expires).await {
        Ok(url) => Some(url),
        Err(err) => {
            tracing::warn!(error = %err, key, "failed to presign answer url");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitized_filename_filters_disallowed_chars() {
        assert_eq!(sanitized_filename("report (final)!.pdf"), "reportfinal.pdf");
    }

    #[test]
    fn sanitized_filename_falls_back_on_empty() {
        assert_eq!(sanitized_filename("###"), "upload");
    }

    #[test]
    fn answer_key_scoped_to_mark() {
        let key = answer_object_key("mark-1", "essay.pdf");
        assert!(key.starts_with("marks/mark-1/"));
        assert!(key.ends_with("_essay.pdf"));
    }
}
