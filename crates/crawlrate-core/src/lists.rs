//! Newline-delimited keyword and proxy lists.

use std::path::Path;

use tracing::debug;

use crate::error::ConfigError;

/// Read non-blank lines, trimming surrounding whitespace and `\r`.
pub fn read_lines(path: &Path) -> Result<Vec<String>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let lines: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    debug!(path = %path.display(), count = lines.len(), "list loaded");
    Ok(lines)
}

/// Keywords are planned in lexicographic order.
pub fn load_keywords(path: &Path) -> Result<Vec<String>, ConfigError> {
    let mut keywords = read_lines(path)?;
    keywords.sort();
    Ok(keywords)
}

/// Proxies keep file order.
pub fn load_proxies(path: &Path) -> Result<Vec<String>, ConfigError> {
    read_lines(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn keywords_are_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keywords.txt");
        fs::write(&path, "poker\ncasino\r\n\nbingo\n").unwrap();

        assert_eq!(load_keywords(&path).unwrap(), vec!["bingo", "casino", "poker"]);
    }

    #[test]
    fn proxies_keep_file_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("proxies.txt");
        fs::write(&path, "10.0.0.2\n10.0.0.1\n  \n10.0.0.3").unwrap();

        assert_eq!(
            load_proxies(&path).unwrap(),
            vec!["10.0.0.2", "10.0.0.1", "10.0.0.3"]
        );
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_lines(&dir.path().join("absent.txt")).unwrap_err();
        assert!(err.to_string().contains("absent.txt"));
    }
}
