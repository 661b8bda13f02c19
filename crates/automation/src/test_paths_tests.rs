use super::*;

#[test]
fn recognises_test_file_names() {
    assert!(is_test_file_path("/dasdasd.test.js"));
    assert!(is_test_file_path("bla.test.py"));
    assert!(is_test_file_path("some-dir/another/test.py"));
    assert!(is_test_file_path("bla.tests.py"));
    assert!(is_test_file_path("testk.py"));
    assert!(is_test_file_path("ahoj/test.mjs"));
    assert!(is_test_file_path("ahoj/zdar/tests.py"));
    assert!(is_test_file_path("my.tests.mjs"));
    assert!(is_test_file_path("ahoj/test_basic.py"));
}

#[test]
fn rejects_regular_file_names() {
    assert!(!is_test_file_path("asdasdlddd.ahoj.ss"));
    assert!(!is_test_file_path("inte"));
    assert!(!is_test_file_path("ahoj.mjs"));
    assert!(!is_test_file_path("simething/jknkjnkj/js"));
    assert!(!is_test_file_path(""));
}

#[test]
fn recognises_test_directories() {
    assert!(is_test_file_path("asds/test/test.js"));
    assert!(is_test_file_path("test/jknkjnkj/js"));
    assert!(is_test_file_path("/test/jknkjnkj/js"));
    assert!(is_test_file_path("something/test/something"));
    assert!(is_test_file_path("something/tests/something"));
    assert!(!is_test_file_path("something/non-test/something"));
}

#[test]
fn any_test_path_marks_the_change_set() {
    assert!(touches_tests(["src/main.rs", "tests/run.rs"]));
    assert!(!touches_tests(["src/main.rs", "README.md"]));
    assert!(!touches_tests(std::iter::empty::<&str>()));
}
