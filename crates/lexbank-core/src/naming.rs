use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

/// Derive a record name from a document path.
///
/// Legislation files tend to be named after the act itself
/// ("ADMINISTRATION OF ESTATES ACT 66 OF 1965.pdf"), so the file stem is the
/// record name. Underscores and runs of whitespace collapse to single spaces.
pub fn record_name_from_path(path: &Path) -> String {
    static SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s_]+").unwrap());

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    SEPARATORS.replace_all(&stem, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn uses_file_stem() {
        let path = PathBuf::from("/docs/ADMINISTRATION OF ESTATES ACT 66 OF 1965.pdf");
        assert_eq!(
            record_name_from_path(&path),
            "ADMINISTRATION OF ESTATES ACT 66 OF 1965"
        );
    }

    #[test]
    fn collapses_underscores_and_whitespace() {
        let path = PathBuf::from("FICA__act   38_of_2001.pdf");
        assert_eq!(record_name_from_path(&path), "FICA act 38 of 2001");
    }

    #[test]
    fn empty_for_pathless_input() {
        assert_eq!(record_name_from_path(&PathBuf::from("/")), "");
    }
}
