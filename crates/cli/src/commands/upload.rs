//! Authenticated multipart upload.

use std::io::Write;
use std::path::Path;

use reqwest::multipart::{Form, Part};
use shopfront_client::AppState;

/// Send `file` as the multipart field `field` and print the JSON reply.
///
/// # Errors
///
/// Returns an error if the file cannot be read, no token is available, or
/// the upload fails.
pub async fn send(
    state: &AppState,
    path: &str,
    file: &Path,
    field: &str,
) -> shopfront_client::Result<()> {
    let bytes = tokio::fs::read(file).await?;
    let file_name = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());

    let form = Form::new().part(field.to_string(), Part::bytes(bytes).file_name(file_name));
    let reply: serde_json::Value = state.api().upload(path, form).await?;

    let mut out = std::io::stdout().lock();
    writeln!(out, "{reply:#}")?;
    Ok(())
}
