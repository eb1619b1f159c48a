use std::path::{Path, PathBuf};

/// Folder aliases the assistant may use instead of a real path.
const KNOWN_DIRS: &[(&str, &str)] = &[
    ("downloads", "Downloads"),
    ("documents", "Documents"),
    ("desktop", "Desktop"),
];

pub fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"))
}

/// Normalize a user- or model-supplied path string.
///
/// Expands a leading `~`, resolves well-known folder aliases relative
/// to `home`, and absolutizes everything else against the current
/// directory. The policy and the executor must both go through this
/// function so the path that gets authorized is the path that runs.
pub fn normalize_path_with_home(path: &str, home: &Path) -> PathBuf {
    let trimmed = path.trim();
    if trimmed == "~" {
        return home.to_path_buf();
    }
    if let Some(rest) = trimmed.strip_prefix("~/").or_else(|| trimmed.strip_prefix("~\\")) {
        return home.join(rest);
    }

    let candidate = Path::new(trimmed);
    if candidate.is_relative() {
        let key = trimmed.to_lowercase();
        for (alias, folder) in KNOWN_DIRS {
            if key == *alias {
                return home.join(folder);
            }
        }
        if let Ok(cwd) = std::env::current_dir() {
            return cwd.join(candidate);
        }
    }
    candidate.to_path_buf()
}

pub fn normalize_path(path: &str) -> PathBuf {
    normalize_path_with_home(path, &home_dir())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tilde_expands_to_home() {
        let home = PathBuf::from("/home/hana");
        assert_eq!(normalize_path_with_home("~", &home), home);
        assert_eq!(
            normalize_path_with_home("~/notes.txt", &home),
            home.join("notes.txt")
        );
    }

    #[test]
    fn known_aliases_resolve_under_home() {
        let home = PathBuf::from("/home/hana");
        assert_eq!(
            normalize_path_with_home("Downloads", &home),
            home.join("Downloads")
        );
        assert_eq!(
            normalize_path_with_home("  desktop  ", &home),
            home.join("Desktop")
        );
    }

    #[test]
    fn absolute_paths_untouched() {
        let home = PathBuf::from("/home/hana");
        assert_eq!(
            normalize_path_with_home("/tmp/report.txt", &home),
            PathBuf::from("/tmp/report.txt")
        );
    }

    #[test]
    fn relative_non_alias_absolutized() {
        let home = PathBuf::from("/home/hana");
        let normalized = normalize_path_with_home("some/file.txt", &home);
        assert!(normalized.is_absolute());
        assert!(normalized.ends_with("some/file.txt"));
    }
}
