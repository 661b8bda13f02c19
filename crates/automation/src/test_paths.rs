//! Detection of test files among a pull request's changed paths.

/// Returns `true` if `path` looks like a test file or lives in a test directory.
///
/// A path counts as a test when any directory component is `test` or `tests`,
/// when the file name starts with `test` (`test_basic.py`, `tests.py`), or when
/// the file name has a `.test.` or `.tests.` infix (`button.test.tsx`).
pub fn is_test_file_path(path: &str) -> bool {
    let mut components: Vec<&str> = path.split('/').collect();
    let file_name = components.pop().unwrap_or_default();

    if components
        .iter()
        .any(|dir| *dir == "test" || *dir == "tests")
    {
        return true;
    }

    file_name.starts_with("test") || file_name.contains(".test.") || file_name.contains(".tests.")
}

/// Returns `true` if any of `paths` is a test file.
pub fn touches_tests<'a>(paths: impl IntoIterator<Item = &'a str>) -> bool {
    paths.into_iter().any(is_test_file_path)
}

#[cfg(test)]
#[path = "test_paths_tests.rs"]
mod tests;
