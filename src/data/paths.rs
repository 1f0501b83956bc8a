//! Path string helpers.
//!
//! Thin conveniences over [`std::path::Path`] for code that shuttles
//! paths around as strings. Components that are absent come back as empty
//! strings rather than options.

use std::path::{Component, Path, PathBuf};

/// The final component of `path`, or an empty string.
pub fn file_name(path: impl AsRef<Path>) -> String {
    path.as_ref()
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// The directory containing `path`, or an empty string.
pub fn directory(path: impl AsRef<Path>) -> String {
    path.as_ref()
        .parent()
        .map(|parent| parent.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// One level up from `path`, as an owned path for walking onward.
pub fn up_directory(path: impl AsRef<Path>) -> PathBuf {
    path.as_ref().parent().map(Path::to_path_buf).unwrap_or_default()
}

/// The extension of `path` including its dot, or an empty string.
pub fn extension(path: impl AsRef<Path>) -> String {
    path.as_ref()
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}

/// The final component of `path` without its extension, or an empty
/// string.
pub fn file_stem(path: impl AsRef<Path>) -> String {
    path.as_ref()
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// The drive prefix of `path` on Windows, `/` everywhere else.
pub fn drive(path: impl AsRef<Path>) -> String {
    match path.as_ref().components().next() {
        Some(Component::Prefix(prefix)) => prefix.as_os_str().to_string_lossy().into_owned(),
        _ => "/".to_string(),
    }
}

/// Marks a file or directory as hidden.
///
/// Returns `Ok(true)` when the hidden attribute was set, `Ok(false)` on
/// platforms where hiding is a naming convention rather than an
/// attribute.
#[cfg(windows)]
pub fn hide(path: impl AsRef<Path>) -> std::io::Result<bool> {
    use std::os::windows::ffi::OsStrExt;
    use windows_sys::Win32::Storage::FileSystem::{SetFileAttributesW, FILE_ATTRIBUTE_HIDDEN};

    let wide: Vec<u16> = path
        .as_ref()
        .as_os_str()
        .encode_wide()
        .chain(std::iter::once(0))
        .collect();
    let ret = unsafe { SetFileAttributesW(wide.as_ptr(), FILE_ATTRIBUTE_HIDDEN) };
    if ret == 0 {
        return Err(std::io::Error::last_os_error());
    }
    Ok(true)
}

/// Marks a file or directory as hidden.
///
/// Returns `Ok(true)` when the hidden attribute was set, `Ok(false)` on
/// platforms where hiding is a naming convention rather than an
/// attribute.
#[cfg(not(windows))]
pub fn hide(_path: impl AsRef<Path>) -> std::io::Result<bool> {
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_is_the_last_component() {
        assert_eq!(file_name("/var/log/app.log"), "app.log");
        assert_eq!(file_name("app.log"), "app.log");
    }

    #[test]
    fn directory_is_the_parent() {
        assert_eq!(directory("/var/log/app.log"), "/var/log");
        assert_eq!(directory("app.log"), "");
    }

    #[test]
    fn up_directory_walks_one_level() {
        assert_eq!(up_directory("/var/log/app.log"), PathBuf::from("/var/log"));
        assert_eq!(up_directory("/var/log"), PathBuf::from("/var"));
    }

    #[test]
    fn extension_includes_the_dot() {
        assert_eq!(extension("report.tar.gz"), ".gz");
        assert_eq!(extension("report"), "");
        assert_eq!(extension(".bashrc"), "");
    }

    #[test]
    fn file_stem_drops_the_extension() {
        assert_eq!(file_stem("/tmp/report.tar.gz"), "report.tar");
        assert_eq!(file_stem("notes.txt"), "notes");
    }

    #[cfg(not(windows))]
    #[test]
    fn drive_is_root_on_unix() {
        assert_eq!(drive("/var/log"), "/");
        assert_eq!(drive("relative/path"), "/");
    }

    #[cfg(not(windows))]
    #[test]
    fn hide_is_a_no_op_on_unix() {
        assert_eq!(hide("/tmp/anything").unwrap(), false);
    }
}
