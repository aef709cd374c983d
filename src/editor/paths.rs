//! Turning what the user typed into canonical collection paths.

use super::EditorError;
use crate::domain::files::SOURCE_ROOT;

fn under_source_root(relative: &str) -> String {
    let prefix = format!("{SOURCE_ROOT}/");
    if relative.starts_with(&prefix) {
        format!("/{relative}")
    } else {
        format!("/{prefix}{relative}")
    }
}

/// `Button.js`, `/Button.js` and `src/Button.js` all become `/src/Button.js`.
pub fn canonical_file_path(input: &str) -> Result<String, EditorError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(EditorError::EmptyName);
    }
    let relative = trimmed.strip_prefix('/').unwrap_or(trimmed);
    let path = under_source_root(relative);
    if path.ends_with('/') {
        return Err(EditorError::FileNameIsFolder(path));
    }
    Ok(path)
}

/// `components`, `/components/` and `src/components` all become `/src/components/`.
pub fn canonical_folder_path(input: &str) -> Result<String, EditorError> {
    let trimmed = input.trim();
    let relative = trimmed.strip_prefix('/').unwrap_or(trimmed);
    let relative = relative.strip_suffix('/').unwrap_or(relative);
    if relative.is_empty() || relative == SOURCE_ROOT {
        return Err(EditorError::InvalidFolder);
    }
    Ok(format!("{}/", under_source_root(relative)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_paths() {
        assert_eq!(canonical_file_path("Button.js").unwrap(), "/src/Button.js");
        assert_eq!(canonical_file_path("/Button.js").unwrap(), "/src/Button.js");
        assert_eq!(canonical_file_path(" src/Button.js ").unwrap(), "/src/Button.js");
        assert_eq!(
            canonical_file_path("components/Btn.js").unwrap(),
            "/src/components/Btn.js"
        );
        assert_eq!(canonical_file_path("/src/a/b.css").unwrap(), "/src/a/b.css");
    }

    #[test]
    fn test_file_path_rejections() {
        assert_eq!(canonical_file_path("   "), Err(EditorError::EmptyName));
        assert_eq!(
            canonical_file_path("components/"),
            Err(EditorError::FileNameIsFolder("/src/components/".into()))
        );
    }

    #[test]
    fn test_folder_paths() {
        assert_eq!(canonical_folder_path("components").unwrap(), "/src/components/");
        assert_eq!(canonical_folder_path("/components/").unwrap(), "/src/components/");
        assert_eq!(canonical_folder_path("src/store/actions").unwrap(), "/src/store/actions/");
    }

    #[test]
    fn test_folder_path_rejections() {
        assert_eq!(canonical_folder_path(""), Err(EditorError::InvalidFolder));
        assert_eq!(canonical_folder_path("/"), Err(EditorError::InvalidFolder));
        assert_eq!(canonical_folder_path("src"), Err(EditorError::InvalidFolder));
        assert_eq!(canonical_folder_path("/src/"), Err(EditorError::InvalidFolder));
    }
}
