//! Path-string helpers shared by the browser and the listing providers.
//!
//! Paths are treated as opaque host strings. The only operations performed
//! on them are the ones below. Each takes the [`PathStyle`] of the tree being
//! browsed, fixed once from the base path, so a POSIX tree never splits on
//! `\` (a legal filename character there).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStyle {
    Posix,
    Windows,
}

impl PathStyle {
    /// Infers the style from how a base path is spelled. Absolute POSIX paths
    /// stay POSIX even when a component contains `\`.
    pub fn detect(path: &str) -> Self {
        if path.starts_with('/') {
            return Self::Posix;
        }
        if is_windows_style_path(path) || path.contains('\\') {
            Self::Windows
        } else {
            Self::Posix
        }
    }

    pub fn separator(self) -> char {
        match self {
            Self::Posix => '/',
            Self::Windows => '\\',
        }
    }

    fn is_separator(self, c: char) -> bool {
        match self {
            Self::Posix => c == '/',
            Self::Windows => c == '\\' || c == '/',
        }
    }
}

pub fn normalize(path: &str, style: PathStyle) -> String {
    let mut normalized = match style {
        PathStyle::Posix => path.to_string(),
        PathStyle::Windows => path.replace('\\', "/"),
    };
    while normalized.ends_with('/') && normalized.len() > 1 {
        normalized.pop();
    }
    normalized
}

fn is_windows_style_path(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[1] == b':' && bytes[0].is_ascii_alphabetic()
}

/// Compares two paths after normalization; Windows paths compare
/// case-insensitively.
pub fn same_path(a: &str, b: &str, style: PathStyle) -> bool {
    let (a, b) = (normalize(a, style), normalize(b, style));
    match style {
        PathStyle::Posix => a == b,
        PathStyle::Windows => a.eq_ignore_ascii_case(&b),
    }
}

pub fn is_within_scope(path: &str, root: &str, style: PathStyle) -> bool {
    if same_path(path, root, style) {
        return true;
    }

    let path = normalize(path, style);
    let root = normalize(root, style);

    if root == "/" {
        return path.starts_with('/');
    }

    let prefix = root + "/";
    match style {
        PathStyle::Posix => path.starts_with(&prefix),
        PathStyle::Windows => path
            .to_ascii_lowercase()
            .starts_with(&prefix.to_ascii_lowercase()),
    }
}

/// Parent directory of `path`, or `None` when `path` is already a root
/// (`/`, `C:\`, `C:`) or has no separator at all.
pub fn parent(path: &str, style: PathStyle) -> Option<String> {
    let trimmed = trim_trailing_separators(path, style);

    let cut = trimmed.rfind(|c: char| style.is_separator(c))?;
    let head = &trimmed[..cut];

    if head.is_empty() {
        // "/name" -> "/"
        return (trimmed.len() > 1).then(|| trimmed[..=cut].to_string());
    }
    if style == PathStyle::Windows && is_windows_style_path(head) && head.len() == 2 {
        // "C:\name" -> "C:\", while "C:\" itself has no parent
        return (cut + 1 < trimmed.len()).then(|| trimmed[..=cut].to_string());
    }
    Some(head.to_string())
}

pub fn join(dir: &str, name: &str, style: PathStyle) -> String {
    if dir.ends_with(|c: char| style.is_separator(c)) {
        format!("{dir}{name}")
    } else {
        format!("{dir}{}{name}", style.separator())
    }
}

/// True when `child` sits directly inside `dir`.
pub fn is_direct_child(child: &str, dir: &str, style: PathStyle) -> bool {
    match parent(child, style) {
        Some(p) => same_path(&p, dir, style),
        None => false,
    }
}

/// The part of `current` below `base`, shown as `/` at the root itself.
///
/// Separators are left as the host wrote them.
pub fn relative_display(current: &str, base: &str, style: PathStyle) -> String {
    if same_path(current, base, style) {
        return "/".to_string();
    }

    let base_trimmed = trim_trailing_separators(base, style);
    let rest = strip_prefix_for_style(current, base_trimmed, style).unwrap_or(current);

    if rest.starts_with(|c: char| style.is_separator(c)) {
        rest.to_string()
    } else {
        format!("{}{rest}", style.separator())
    }
}

fn strip_prefix_for_style<'a>(path: &'a str, prefix: &str, style: PathStyle) -> Option<&'a str> {
    if let Some(rest) = path.strip_prefix(prefix) {
        return Some(rest);
    }
    if style == PathStyle::Windows {
        let head = path.get(..prefix.len())?;
        if head.eq_ignore_ascii_case(prefix) {
            return path.get(prefix.len()..);
        }
    }
    None
}

fn trim_trailing_separators(path: &str, style: PathStyle) -> &str {
    let mut trimmed = path;
    while trimmed.len() > 1 && trimmed.ends_with(|c: char| style.is_separator(c)) {
        let candidate = &trimmed[..trimmed.len() - 1];
        // Keep the separator of a drive root such as "C:\".
        if style == PathStyle::Windows && is_windows_style_path(candidate) && candidate.len() == 2
        {
            break;
        }
        trimmed = candidate;
    }
    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;

    const POSIX: PathStyle = PathStyle::Posix;
    const WINDOWS: PathStyle = PathStyle::Windows;

    #[test]
    fn test_normalize_strips_trailing_slashes() {
        assert_eq!(normalize("/foo/bar/", POSIX), "/foo/bar");
        assert_eq!(normalize("/foo/bar///", POSIX), "/foo/bar");
        assert_eq!(normalize("/", POSIX), "/");
    }

    #[test]
    fn test_normalize_converts_backslashes_only_for_windows() {
        assert_eq!(normalize("C:\\Users\\test", WINDOWS), "C:/Users/test");
        assert_eq!(normalize("/tmp/x\\y", POSIX), "/tmp/x\\y");
    }

    #[test]
    fn test_detects_style_from_spelling() {
        assert_eq!(PathStyle::detect("/home/me"), POSIX);
        assert_eq!(PathStyle::detect("/tmp/x\\y"), POSIX);
        assert_eq!(PathStyle::detect("C:\\test"), WINDOWS);
        assert_eq!(PathStyle::detect("D:"), WINDOWS);
        assert_eq!(PathStyle::detect("\\\\server\\share"), WINDOWS);
    }

    #[test]
    fn test_within_scope_exact_match() {
        assert!(is_within_scope("/foo/bar", "/foo/bar", POSIX));
        assert!(is_within_scope("/foo/bar/", "/foo/bar", POSIX));
    }

    #[test]
    fn test_within_scope_child_path() {
        assert!(is_within_scope("/foo/bar/baz", "/foo/bar", POSIX));
        assert!(!is_within_scope("/foo/barbaz", "/foo/bar", POSIX));
    }

    #[test]
    fn test_within_scope_root() {
        assert!(is_within_scope("/anything", "/", POSIX));
        assert!(!is_within_scope("/anything", "/other", POSIX));
    }

    #[test]
    fn test_within_scope_windows_is_case_insensitive() {
        assert!(is_within_scope("c:\\test\\folder1", "C:\\Test", WINDOWS));
        assert!(is_within_scope("C:\\folder", "C:\\", WINDOWS));
        assert!(!is_within_scope("C:\\testing", "C:\\test", WINDOWS));
    }

    #[test]
    fn test_not_within_scope_sibling() {
        assert!(!is_within_scope("/foo/other", "/foo/bar", POSIX));
    }

    #[test]
    fn test_parent_of_posix_paths() {
        assert_eq!(parent("/base/sub", POSIX).as_deref(), Some("/base"));
        assert_eq!(parent("/base/sub/", POSIX).as_deref(), Some("/base"));
        assert_eq!(parent("/base", POSIX).as_deref(), Some("/"));
        assert_eq!(parent("/", POSIX), None);
        assert_eq!(parent("relative", POSIX), None);
    }

    #[test]
    fn test_parent_keeps_backslash_names_whole_on_posix() {
        assert_eq!(parent("/tmp/x\\y", POSIX).as_deref(), Some("/tmp"));
        assert_eq!(parent("/tmp/x\\y/inner.txt", POSIX).as_deref(), Some("/tmp/x\\y"));
    }

    #[test]
    fn test_parent_of_windows_paths() {
        assert_eq!(parent("C:\\test\\folder1", WINDOWS).as_deref(), Some("C:\\test"));
        assert_eq!(parent("C:\\test", WINDOWS).as_deref(), Some("C:\\"));
        assert_eq!(parent("C:\\", WINDOWS), None);
        assert_eq!(parent("C:", WINDOWS), None);
    }

    #[test]
    fn test_join_uses_host_separator() {
        assert_eq!(join("/base", "sub", POSIX), "/base/sub");
        assert_eq!(join("/", "etc", POSIX), "/etc");
        assert_eq!(join("/tmp/x\\y", "inner.txt", POSIX), "/tmp/x\\y/inner.txt");
        assert_eq!(join("C:\\test", "file1.txt", WINDOWS), "C:\\test\\file1.txt");
        assert_eq!(join("C:\\", "test", WINDOWS), "C:\\test");
    }

    #[test]
    fn test_direct_child_rejects_grandchildren() {
        assert!(is_direct_child("/base/f.txt", "/base", POSIX));
        assert!(is_direct_child("/base/a\\b.txt", "/base", POSIX));
        assert!(is_direct_child("C:\\test\\folder1", "C:\\test", WINDOWS));
        assert!(!is_direct_child("/base/sub/deep.txt", "/base", POSIX));
        assert!(!is_direct_child("/other/f.txt", "/base", POSIX));
    }

    #[test]
    fn test_relative_display_at_root_is_slash() {
        assert_eq!(relative_display("/base", "/base", POSIX), "/");
        assert_eq!(
            relative_display("C:\\Users\\Test\\Documents", "C:\\Users\\Test\\Documents", WINDOWS),
            "/"
        );
        assert_eq!(relative_display("/base/", "/base", POSIX), "/");
    }

    #[test]
    fn test_relative_display_keeps_host_separators() {
        assert_eq!(relative_display("/base/sub/deeper", "/base", POSIX), "/sub/deeper");
        assert_eq!(relative_display("/base/x\\y", "/base", POSIX), "/x\\y");
        assert_eq!(relative_display("C:\\test\\folder1", "C:\\test", WINDOWS), "\\folder1");
        assert_eq!(relative_display("/etc", "/", POSIX), "/etc");
        assert_eq!(relative_display("C:\\test", "C:\\", WINDOWS), "\\test");
    }
}
