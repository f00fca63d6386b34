//! Common utility functions shared across the codebase.

/// Joins a pod directory and a relative path with exactly one `/` between them.
///
/// # Examples
///
/// ```
/// use podcat::utils::join_pod_path;
///
/// assert_eq!(join_pod_path("/content/pages/", "/a.yaml"), "/content/pages/a.yaml");
/// assert_eq!(join_pod_path("/views", "base.html"), "/views/base.html");
/// ```
pub fn join_pod_path(dir: &str, path: &str) -> String {
    format!(
        "{}/{}",
        dir.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Returns the extension of a pod path including the leading dot, lowercased.
///
/// # Examples
///
/// ```
/// use podcat::utils::extension;
///
/// assert_eq!(extension("/content/pages/about.YAML"), Some(".yaml".to_string()));
/// assert_eq!(extension("/content/.hidden/README"), None);
/// ```
pub fn extension(path: &str) -> Option<String> {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    file_name
        .rfind('.')
        .filter(|&idx| idx > 0)
        .map(|idx| file_name[idx..].to_lowercase())
}

/// Picks the singular or plural form of a noun for a count.
pub fn plural<'a>(count: usize, singular: &'a str, plural: &'a str) -> &'a str {
    if count == 1 { singular } else { plural }
}

#[cfg(test)]
mod tests {
    use crate::utils::*;

    #[test]
    fn test_join_pod_path() {
        assert_eq!(join_pod_path("/", "views/a.html"), "/views/a.html");
        assert_eq!(join_pod_path("/translations", "/de"), "/translations/de");
        assert_eq!(join_pod_path("/a/", "b/"), "/a/b/");
    }

    #[test]
    fn test_extension() {
        assert_eq!(extension("/views/base.html"), Some(".html".to_string()));
        assert_eq!(extension("/content/data.tar.gz"), Some(".gz".to_string()));
        assert_eq!(extension("/views/.gitkeep"), None);
        assert_eq!(extension("/views/Makefile"), None);
        assert_eq!(extension("/views.d/Makefile"), None);
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural(1, "locale", "locales"), "locale");
        assert_eq!(plural(0, "locale", "locales"), "locales");
        assert_eq!(plural(3, "locale", "locales"), "locales");
    }
}
