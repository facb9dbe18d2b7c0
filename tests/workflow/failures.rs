use ope::config::FileStore;
use ope::error::ResolveError;
use ope::security::ConfirmationResult;
use ope::{OpeError, Resolver, Workflow};

use super::desktop::{FakeDesktop, empty_store, sandbox, url_for};

#[test]
fn missing_path_is_reported() {
    let (tmp, resolver) = sandbox(&[]);
    let store = empty_store();
    let desktop = FakeDesktop::answering(ConfirmationResult::AllowOnce);

    let err = Workflow::new(&resolver, &store, &desktop)
        .handle(&url_for(&tmp.path().join("gone.txt")))
        .expect_err("missing path");

    assert!(matches!(err, OpeError::PathNotFound(ref p) if p.ends_with("gone.txt")));
    assert_eq!(desktop.notice_titles(), vec!["Not Found".to_string()]);
    assert!(desktop.asked().is_empty());
    assert_eq!(store.save_count(), 0);
}

#[test]
fn foreign_scheme_is_reported() {
    let (_tmp, resolver) = sandbox(&[]);
    let store = empty_store();
    let desktop = FakeDesktop::answering(ConfirmationResult::AllowOnce);

    let err = Workflow::new(&resolver, &store, &desktop)
        .handle("http://example.com/file.txt")
        .expect_err("wrong scheme");

    assert!(matches!(
        err,
        OpeError::Resolve(ResolveError::UnsupportedScheme(_))
    ));
    assert_eq!(desktop.notice_titles(), vec!["Invalid URL".to_string()]);
}

#[test]
fn glob_without_matches_is_reported() {
    let (_tmp, resolver) = sandbox(&["a.txt"]);
    let store = empty_store();
    let desktop = FakeDesktop::answering(ConfirmationResult::AllowOnce);

    let err = Workflow::new(&resolver, &store, &desktop)
        .handle("ope://~/*.nomatch")
        .expect_err("no match");

    assert!(matches!(err, OpeError::Resolve(ResolveError::NoMatch(_))));
    assert_eq!(desktop.notice_titles(), vec!["Path Error".to_string()]);
}

#[test]
fn unknown_home_fails_tilde_urls() {
    let resolver = Resolver::default().with_home(None);
    let store = empty_store();
    let desktop = FakeDesktop::answering(ConfirmationResult::AllowOnce);

    let err = Workflow::new(&resolver, &store, &desktop)
        .handle("ope://~/notes.txt")
        .expect_err("no home");

    assert!(matches!(err, OpeError::Resolve(ResolveError::HomeResolution)));
}

#[test]
fn malformed_config_is_reported() {
    let (tmp, resolver) = sandbox(&["a.txt"]);
    let config = tmp.path().join("ope.toml");
    std::fs::write(&config, "blocked = [\"*.exe\"").expect("write config");
    let store = FileStore::new(&config);
    let desktop = FakeDesktop::answering(ConfirmationResult::AllowOnce);

    let err = Workflow::new(&resolver, &store, &desktop)
        .handle(&url_for(&tmp.path().join("a.txt")))
        .expect_err("config error");

    assert!(matches!(err, OpeError::Config(_)));
    assert_eq!(desktop.notice_titles(), vec!["Config Error".to_string()]);
    assert!(desktop.asked().is_empty());
    assert!(desktop.opened().is_empty());
}

#[test]
fn open_failure_keeps_remembered_choice() {
    let (tmp, resolver) = sandbox(&["movie.mkv"]);
    let store = empty_store();
    let desktop = FakeDesktop::failing_open(ConfirmationResult::AlwaysAllow);

    let err = Workflow::new(&resolver, &store, &desktop)
        .handle(&url_for(&tmp.path().join("movie.mkv")))
        .expect_err("open fails");

    assert!(matches!(err, OpeError::OpenFailed { .. }));
    assert_eq!(desktop.notice_titles(), vec!["Open Failed".to_string()]);
    assert!(
        desktop.notices()[0].1.contains("launcher exited with status 3"),
        "notice carries the cause"
    );
    assert_eq!(
        store.snapshot().map(|p| p.allowed),
        Some(vec!["movie.mkv".to_string()])
    );
}

#[test]
fn file_store_persists_across_resolutions() {
    let (tmp, resolver) = sandbox(&["data.csv"]);
    let config = tmp.path().join("cfg").join("ope.toml");
    let url = url_for(&tmp.path().join("data.csv"));

    let desktop = FakeDesktop::answering(ConfirmationResult::AlwaysAllow);
    Workflow::new(&resolver, &FileStore::new(&config), &desktop)
        .handle(&url)
        .expect("first open");
    assert!(config.exists());

    let desktop = FakeDesktop::answering(ConfirmationResult::Cancel);
    Workflow::new(&resolver, &FileStore::new(&config), &desktop)
        .handle(&url)
        .expect("second open uses saved allow entry");
    assert!(desktop.asked().is_empty());
}
