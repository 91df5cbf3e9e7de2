use std::path::{Path, PathBuf};

/// Expands a leading `~` and anchors relative paths at `base`.
pub fn resolve_user_path(path: &str, base: &Path) -> PathBuf {
    let home = std::env::var("HOME").ok().map(PathBuf::from);
    let expanded = match (path, home) {
        ("~", Some(home)) => home,
        (value, Some(home)) if value.starts_with("~/") => home.join(&value[2..]),
        (value, _) => PathBuf::from(value),
    };
    if expanded.is_relative() {
        base.join(expanded)
    } else {
        expanded
    }
}
