//! Path classification for watch events.
//!
//! Decides whether a changed file lies inside the generated-output
//! directory or one of the watched input directories. All comparisons are
//! lexical: nothing here touches the filesystem, so paths that no longer
//! exist (deleted files) classify the same way as live ones.

use std::path::{Component, Path, PathBuf};

/// Resolve `value` against `cwd` unless it is already absolute, then
/// normalize the result.
pub fn to_absolute(cwd: &Path, value: impl AsRef<Path>) -> PathBuf {
    let value = value.as_ref();
    if value.is_absolute() {
        normalize(value)
    } else {
        normalize(&cwd.join(value))
    }
}

/// Lexically remove `.` and `..` components.
///
/// `..` directly under the root is dropped, matching how shells and most
/// path APIs treat `/..`. Leading `..` in a relative path is kept.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }

    out
}

/// Compute the path of `target` relative to `base`.
///
/// Returns `None` when no relative path exists, i.e. the two paths sit on
/// different roots (drive letters on Windows) or one is absolute and the
/// other is not.
pub fn relative_to(base: &Path, target: &Path) -> Option<PathBuf> {
    let base = normalize(base);
    let target = normalize(target);

    if base.is_absolute() != target.is_absolute() {
        return None;
    }

    let mut base_iter = base.components().peekable();
    let mut target_iter = target.components().peekable();

    while let (Some(b), Some(t)) = (base_iter.peek(), target_iter.peek()) {
        if b != t {
            break;
        }
        base_iter.next();
        target_iter.next();
    }

    let mut relative = PathBuf::new();

    for component in base_iter {
        match component {
            Component::Normal(_) => relative.push(".."),
            Component::CurDir => {}
            _ => return None,
        }
    }

    for component in target_iter {
        match component {
            Component::Prefix(_) | Component::RootDir => return None,
            Component::CurDir => {}
            other => relative.push(other.as_os_str()),
        }
    }

    Some(relative)
}

/// Check whether `candidate` lies strictly inside `dir`.
///
/// True iff the relative path from `dir` to `candidate` is non-empty, does
/// not start with a `..` segment, and is not absolute. The directory itself
/// is not inside itself. Both inputs should already be absolute.
pub fn is_path_inside(candidate: &Path, dir: &Path) -> bool {
    let Some(relative) = relative_to(dir, candidate) else {
        return false;
    };

    match relative.components().next() {
        None | Some(Component::ParentDir) => false,
        Some(_) => !relative.is_absolute(),
    }
}
