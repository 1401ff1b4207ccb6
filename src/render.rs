//! Plain-text rendering of the browser for terminal front-ends.

use crate::models::DirectoryEntry;
use crate::services::browser::{DirectoryBrowser, ListingView};

pub fn render(browser: &DirectoryBrowser) -> Vec<String> {
    render_lines(
        &browser.display_path(),
        browser.can_navigate_up(),
        browser.view(),
    )
}

pub fn render_lines(display_path: &str, can_navigate_up: bool, view: &ListingView) -> Vec<String> {
    let back = if can_navigate_up { "[up]" } else { "[--]" };
    let mut lines = vec![format!("{back} {display_path}")];

    match view {
        ListingView::Loading => lines.push("  (loading)".to_string()),
        ListingView::Failed(err) => lines.push(format!("  error: {err}")),
        ListingView::Loaded(entries) if entries.is_empty() => {
            lines.push("  (empty directory)".to_string())
        }
        ListingView::Loaded(entries) => {
            lines.extend(
                entries
                    .iter()
                    .enumerate()
                    .map(|(index, entry)| format_entry(index, entry)),
            );
        }
    }
    lines
}

fn format_entry(index: usize, entry: &DirectoryEntry) -> String {
    if entry.is_directory {
        format!("{index:>4}  {}/", entry.name)
    } else {
        format!("{index:>4}  {}  {}", entry.name, format_size(entry.size))
    }
}

pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ListingError;

    #[test]
    fn test_root_listing_disables_up_and_marks_directories() {
        let view = ListingView::Loaded(vec![
            DirectoryEntry::directory("folder1", "C:\\test\\folder1"),
            DirectoryEntry::file("file1.txt", "C:\\test\\file1.txt", 1024),
        ]);

        let lines = render_lines("/", false, &view);

        assert_eq!(
            lines,
            vec!["[--] /", "   0  folder1/", "   1  file1.txt  1.0 KB"]
        );
    }

    #[test]
    fn test_loading_and_failure_replace_the_list() {
        assert_eq!(
            render_lines("/sub", true, &ListingView::Loading),
            vec!["[up] /sub", "  (loading)"]
        );

        let failed = ListingView::Failed(ListingError::NotFound("/base/sub".to_string()));
        assert_eq!(
            render_lines("/sub", true, &failed)[1],
            "  error: not found: /base/sub"
        );

        assert_eq!(
            render_lines("/", false, &ListingView::Loaded(vec![]))[1],
            "  (empty directory)"
        );
    }

    #[test]
    fn test_sizes_scale_units() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
    }
}
