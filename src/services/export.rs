use crate::core::io::Storage;
use anyhow::Result;
use std::path::Path;

const TITLE_PREFIX_CHARS: usize = 30;

/// File name offered for a script: `script-<title prefix>.txt`.
pub fn download_file_name(title: &str) -> String {
    let prefix: String = title.chars().take(TITLE_PREFIX_CHARS).collect();
    let slug: String = prefix
        .trim()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('-'),
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => None,
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect();
    let slug = slug.trim_matches(|c| c == '.' || c == '-');

    if slug.is_empty() {
        "script.txt".to_string()
    } else {
        format!("script-{}.txt", slug)
    }
}

/// Writes the script under `output_folder` and returns the path written.
pub async fn save_script(
    storage: &dyn Storage,
    output_folder: &str,
    title: &str,
    text: &str,
) -> Result<String> {
    let path = Path::new(output_folder).join(download_file_name(title));
    let path = path.to_string_lossy().to_string();

    if storage.exists(&path).await? {
        log::info!("Overwriting existing script {}", path);
    }
    storage.write(&path, text.as_bytes()).await?;
    Ok(path)
}
