//! Path helpers producing the `/`-separated strings the platform expects.

use std::path::{Component, Path, PathBuf};

use path_clean::PathClean;

/// Make `path` absolute against the current directory and clean it.
pub fn absolute(path: &Path) -> std::io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.clean())
    } else {
        Ok(std::env::current_dir()?.join(path).clean())
    }
}

/// Render a relative path with `/` separators regardless of platform.
pub fn to_posix(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Relative path from directory `from` to `to`, `/`-separated.
///
/// Both paths are cleaned first. Returns an empty string when they are equal.
pub fn relative_posix(from: &Path, to: &Path) -> String {
    let from = from.clean();
    let to = to.clean();
    let from: Vec<Component<'_>> = from.components().collect();
    let to: Vec<Component<'_>> = to.components().collect();

    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let ups = std::iter::repeat_n("..".to_string(), from.len() - common);
    let downs = to[common..]
        .iter()
        .map(|component| component.as_os_str().to_string_lossy().into_owned());

    ups.chain(downs).collect::<Vec<_>>().join("/")
}
