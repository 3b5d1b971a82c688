use crate::survey::*;

use chrono::Local;

/// The current local time as a sortable string of 14 digits (`YYYYMMDDhhmmss`).
pub fn timestamp_now() -> String {
    Local::now().format("%Y%m%d%H%M%S").to_string()
}

pub fn simplify_file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Creates the parent directory of `path` when it does not exist yet.
pub fn ensure_parent_dir(path: &Path) -> SurveyResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("ensure_parent_dir: creating {:?}", parent);
            fs::create_dir_all(parent).context(WritingFileSnafu {
                path: parent.display().to_string(),
            })?;
        }
    }
    Ok(())
}

pub fn write_bytes(path: &str, bytes: &[u8]) -> SurveyResult<()> {
    let p = Path::new(path);
    ensure_parent_dir(p)?;
    fs::write(p, bytes).context(WritingFileSnafu { path })?;
    debug!("write_bytes: {} bytes to {:?}", bytes.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_shape() {
        let s = timestamp_now();
        assert_eq!(s.len(), 14);
        assert!(s.chars().all(|c| c.is_ascii_digit()));
        assert!(s.starts_with("20"));
    }

    #[test]
    fn file_names() {
        assert_eq!(
            simplify_file_name(Path::new("data/hasil_responden.csv")),
            "hasil_responden.csv"
        );
    }
}
