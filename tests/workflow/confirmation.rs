use ope::config::{MemoryStore, Policy, PolicyStore};
use ope::security::{ConfirmationResult, Decision, FollowUp, apply_confirmation};
use ope::{OpeError, Workflow};

use super::desktop::{FakeDesktop, empty_store, sandbox, url_for};

#[test]
fn allow_once_opens_without_remembering() {
    let (tmp, resolver) = sandbox(&["photo.jpg"]);
    let store = empty_store();
    let desktop = FakeDesktop::answering(ConfirmationResult::AllowOnce);

    let opened = Workflow::new(&resolver, &store, &desktop)
        .handle(&url_for(&tmp.path().join("photo.jpg")))
        .expect("allow once opens");

    assert_eq!(opened.decision, Decision::Ask);
    assert_eq!(opened.confirmation, Some(ConfirmationResult::AllowOnce));
    assert_eq!(desktop.asked().len(), 1);
    assert_eq!(desktop.opened().len(), 1);
    assert_eq!(store.save_count(), 0);
    assert_eq!(store.snapshot(), Some(Policy::empty()));
}

#[test]
fn always_allow_is_remembered_for_the_next_resolution() {
    let (tmp, resolver) = sandbox(&["report.pdf"]);
    let url = url_for(&tmp.path().join("report.pdf"));
    let store = empty_store();

    let first = FakeDesktop::answering(ConfirmationResult::AlwaysAllow);
    Workflow::new(&resolver, &store, &first)
        .handle(&url)
        .expect("first resolution opens");
    assert_eq!(first.asked().len(), 1);
    assert_eq!(store.save_count(), 1);
    assert_eq!(
        store.snapshot().map(|p| p.allowed),
        Some(vec!["report.pdf".to_string()])
    );

    let second = FakeDesktop::answering(ConfirmationResult::Cancel);
    let opened = Workflow::new(&resolver, &store, &second)
        .handle(&url)
        .expect("second resolution opens");
    assert_eq!(opened.decision, Decision::Allow);
    assert!(second.asked().is_empty());
    assert_eq!(second.opened().len(), 1);
}

#[test]
fn always_block_is_remembered_and_nothing_opens() {
    let (tmp, resolver) = sandbox(&["tool.sh"]);
    let url = url_for(&tmp.path().join("tool.sh"));
    let store = empty_store();

    let desktop = FakeDesktop::answering(ConfirmationResult::AlwaysBlock);
    let err = Workflow::new(&resolver, &store, &desktop)
        .handle(&url)
        .expect_err("always block rejects");

    assert!(matches!(err, OpeError::PolicyBlocked { ref name } if name == "tool.sh"));
    assert!(desktop.opened().is_empty());
    assert!(desktop.notices().is_empty());
    assert_eq!(
        store.snapshot().map(|p| p.blocked),
        Some(vec!["tool.sh".to_string()])
    );

    let again = FakeDesktop::answering(ConfirmationResult::AllowOnce);
    let err = Workflow::new(&resolver, &store, &again)
        .handle(&url)
        .expect_err("remembered block");
    assert!(matches!(err, OpeError::PolicyBlocked { .. }));
    assert!(again.asked().is_empty());
}

#[test]
fn cancel_leaves_policy_untouched() {
    let (tmp, resolver) = sandbox(&["draft.md"]);
    let store = empty_store();
    let desktop = FakeDesktop::answering(ConfirmationResult::Cancel);

    let err = Workflow::new(&resolver, &store, &desktop)
        .handle(&url_for(&tmp.path().join("draft.md")))
        .expect_err("cancel aborts");

    assert!(matches!(err, OpeError::UserCancelled));
    assert!(desktop.opened().is_empty());
    assert_eq!(store.save_count(), 0);
}

#[test]
fn failed_save_still_opens() {
    let (tmp, resolver) = sandbox(&["slides.key"]);
    let store = MemoryStore::failing_saves(Policy::empty());
    let desktop = FakeDesktop::answering(ConfirmationResult::AlwaysAllow);

    let opened = Workflow::new(&resolver, &store, &desktop)
        .handle(&url_for(&tmp.path().join("slides.key")))
        .expect("open proceeds despite save failure");

    assert_eq!(opened.confirmation, Some(ConfirmationResult::AlwaysAllow));
    assert_eq!(desktop.opened().len(), 1);
    assert_eq!(store.snapshot(), Some(Policy::empty()));
}

#[test]
fn failed_save_still_rejects_always_block() {
    let (tmp, resolver) = sandbox(&["tool.sh"]);
    let store = MemoryStore::failing_saves(Policy::empty());
    let desktop = FakeDesktop::answering(ConfirmationResult::AlwaysBlock);

    let err = Workflow::new(&resolver, &store, &desktop)
        .handle(&url_for(&tmp.path().join("tool.sh")))
        .expect_err("block stands despite save failure");

    assert!(matches!(err, OpeError::PolicyBlocked { ref name } if name == "tool.sh"));
    assert!(desktop.opened().is_empty());
    assert!(desktop.notices().is_empty());
    assert_eq!(store.save_count(), 0);
    assert_eq!(store.snapshot(), Some(Policy::empty()));
}

#[test]
fn concurrent_resolutions_last_writer_wins() {
    let first = empty_store();
    let second = first.clone();

    // Both invocations load before either saves.
    let mut a = first.load().expect("load a");
    let mut b = second.load().expect("load b");

    assert_eq!(
        apply_confirmation(&mut a, "a.txt", ConfirmationResult::AlwaysAllow),
        FollowUp::Open { persist: true }
    );
    assert_eq!(
        apply_confirmation(&mut b, "b.txt", ConfirmationResult::AlwaysAllow),
        FollowUp::Open { persist: true }
    );
    first.save(&a).expect("save a");
    second.save(&b).expect("save b");

    let persisted = first.snapshot().expect("persisted");
    assert_eq!(persisted.allowed, vec!["b.txt".to_string()]);
}
