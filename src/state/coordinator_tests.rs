//! Tests for the view coordinator.

use super::*;
use crate::model::{FileLoadError, PageFetchError, SortOrder};
use crate::source::ExportFormat;
use crate::test_harness::{record, StubSource};
use serde_json::json;

fn opened(total: usize, page_size: usize) -> (ViewCoordinator, StubSource) {
    let mut source = StubSource::numbered(total, page_size);
    let mut coordinator = ViewCoordinator::new();
    coordinator
        .open_file_with(&mut source, "events.jsonl")
        .expect("stub open");
    (coordinator, source)
}

fn user_source() -> StubSource {
    StubSource::with_records(
        vec![
            record(json!({"Time": "10:00", "User": "alice"})),
            record(json!({"Time": "10:05", "User": "bob"})),
        ],
        10,
    )
}

fn displayed_users(snapshot: &Snapshot) -> Vec<String> {
    snapshot
        .displayed_records
        .iter()
        .map(|r| r.text("User").unwrap_or_default().into_owned())
        .collect()
}

// ===== initial state =====

#[test]
fn new_coordinator_publishes_empty_snapshot() {
    let coordinator = ViewCoordinator::new();
    let snapshot = coordinator.snapshot();

    assert_eq!(snapshot.current_page_index, 1);
    assert_eq!(snapshot.last_page, 1);
    assert!(!snapshot.has_data());
    assert!(snapshot.columns.is_empty());
    assert!(!coordinator.is_loading());
}

// ===== open file =====

#[test]
fn open_file_publishes_first_page_and_columns() {
    let (coordinator, _) = opened(25, 10);
    let snapshot = coordinator.snapshot();

    assert_eq!(snapshot.current_page_index, 1);
    assert_eq!(snapshot.last_page, 3);
    assert_eq!(snapshot.total_records, 25);
    assert_eq!(snapshot.displayed_records.len(), 10);
    assert_eq!(snapshot.visible_columns, vec!["EventRecordID", "User"]);
    assert_eq!(snapshot.file, Some(PathBuf::from("events.jsonl")));
}

#[test]
fn open_file_prefers_reported_column_list() {
    let mut source = user_source().reporting_columns(&["Time", "User", "Host"]);
    let mut coordinator = ViewCoordinator::new();

    let snapshot = coordinator.open_file_with(&mut source, "a.jsonl").unwrap();

    assert_eq!(snapshot.visible_columns, vec!["Time", "User", "Host"]);
}

#[test]
fn open_file_rebuilds_registry_without_merging() {
    let (mut coordinator, _) = opened(5, 10);
    coordinator.append_column_filter("User", "user").unwrap();

    let mut other = user_source();
    let snapshot = coordinator.open_file_with(&mut other, "b.jsonl").unwrap();

    assert_eq!(snapshot.visible_columns, vec!["Time", "User"]);
    assert!(snapshot.columns.iter().all(|c| c.filter.is_empty()));
}

#[test]
fn open_file_hides_configured_columns() {
    let mut source = user_source();
    let mut coordinator = ViewCoordinator::new().with_hidden_columns(["Time"]);

    let snapshot = coordinator.open_file_with(&mut source, "a.jsonl").unwrap();

    assert_eq!(snapshot.visible_columns, vec!["User"]);
    assert_eq!(snapshot.columns.len(), 2);
}

#[test]
fn open_empty_file_yields_no_columns() {
    let mut source = StubSource::with_records(Vec::new(), 10);
    let mut coordinator = ViewCoordinator::new();

    let snapshot = coordinator.open_file_with(&mut source, "empty.jsonl").unwrap();

    assert!(!snapshot.has_data());
    assert!(snapshot.columns.is_empty());
    assert_eq!(snapshot.current_page_index, 1);
    assert_eq!(snapshot.last_page, 1);
}

#[test]
fn failed_open_keeps_previous_snapshot() {
    let (mut coordinator, mut source) = opened(25, 10);
    coordinator.goto_page_with(&mut source, 2).unwrap();
    let before = coordinator.snapshot().clone();
    source.fail_next_load();

    let err = coordinator.open_file_with(&mut source, "broken.bin").unwrap_err();

    assert!(matches!(err, ViewError::FileLoad(FileLoadError::Malformed { .. })));
    assert_eq!(coordinator.snapshot(), &before);
    assert!(!coordinator.is_loading());
}

// ===== pages =====

#[test]
fn goto_last_page_shows_remainder() {
    let (mut coordinator, mut source) = opened(25, 10);

    let snapshot = coordinator.goto_page_with(&mut source, 3).unwrap();

    assert_eq!(snapshot.current_page_index, 3);
    assert_eq!(snapshot.displayed_records.len(), 5);
}

#[test]
fn goto_page_clamps_out_of_range() {
    let (mut coordinator, mut source) = opened(25, 10);

    assert_eq!(coordinator.goto_page_with(&mut source, 40).unwrap().current_page_index, 3);
    assert_eq!(coordinator.goto_page_with(&mut source, 0).unwrap().current_page_index, 1);
}

#[test]
fn request_current_page_is_noop() {
    let (mut coordinator, _) = opened(25, 10);
    assert!(coordinator.request_page(1).is_none());
    assert!(!coordinator.is_loading());
}

#[test]
fn navigation_previous_on_first_page_is_noop() {
    let (mut coordinator, _) = opened(25, 10);
    assert!(coordinator.request_navigation(PageNav::Previous).is_none());
}

#[test]
fn navigation_next_targets_following_page() {
    let (mut coordinator, _) = opened(25, 10);
    let request = coordinator.request_navigation(PageNav::Next).unwrap();
    assert_eq!(request.kind, FetchKind::Page { page: 2, sort: None });
}

#[test]
fn navigation_counts_from_pending_target() {
    let (mut coordinator, mut source) = opened(45, 10);

    let first = coordinator.request_navigation(PageNav::Next).unwrap();
    let second = coordinator.request_navigation(PageNav::Next).unwrap();
    assert_eq!(second.kind, FetchKind::Page { page: 3, sort: None });

    let first_response = first.execute(&mut source);
    let second_response = second.execute(&mut source);
    coordinator.complete(first_response).unwrap();
    coordinator.complete(second_response).unwrap();

    assert_eq!(coordinator.snapshot().current_page_index, 3);
}

#[test]
fn navigation_from_pending_target_clamps_at_last_page() {
    let (mut coordinator, _) = opened(25, 10);
    coordinator.request_navigation(PageNav::Last).unwrap();

    let next = coordinator.request_navigation(PageNav::Next).unwrap();

    assert_eq!(next.kind, FetchKind::Page { page: 3, sort: None });
}

#[test]
fn failed_page_fetch_keeps_last_good_page() {
    let (mut coordinator, mut source) = opened(25, 10);
    coordinator.goto_page_with(&mut source, 2).unwrap();
    let before = coordinator.snapshot().clone();
    source.fail_pages();

    let err = coordinator.goto_page_with(&mut source, 3).unwrap_err();

    assert!(matches!(err, ViewError::PageFetch(PageFetchError::Io { .. })));
    assert_eq!(coordinator.snapshot(), &before);
}

#[test]
fn filters_survive_page_change() {
    let (mut coordinator, mut source) = opened(25, 10);
    coordinator.append_column_filter("User", "user2").unwrap();

    let snapshot = coordinator.goto_page_with(&mut source, 3).unwrap();

    // Page 3 holds users 21..=25, all contain "user2".
    assert_eq!(snapshot.displayed_records.len(), 5);
    assert_eq!(coordinator.registry().get("User").unwrap().filter, "user2");
}

// ===== column edits =====

#[test]
fn append_filter_narrows_displayed_records() {
    let mut source = user_source();
    let mut coordinator = ViewCoordinator::new();
    coordinator.open_file_with(&mut source, "a.jsonl").unwrap();

    let snapshot = coordinator.append_column_filter("User", "ali").unwrap();

    assert_eq!(displayed_users(snapshot), vec!["alice"]);
}

#[test]
fn filter_with_no_matches_leaves_pagination_alone() {
    let (mut coordinator, _) = opened(25, 10);

    let snapshot = coordinator.append_column_filter("User", "z").unwrap();

    assert!(snapshot.displayed_records.is_empty());
    assert_eq!(snapshot.total_records, 25);
    assert_eq!(snapshot.last_page, 3);
    assert_eq!(snapshot.current_page_index, 1);
}

#[test]
fn column_edits_never_fetch() {
    let (mut coordinator, source) = opened(25, 10);
    let fetches = source.page_fetches();

    coordinator.append_column_filter("User", "1").unwrap();
    coordinator.set_column_selection(["User"]);
    coordinator.clear_column_filter("User").unwrap();

    assert_eq!(source.page_fetches(), fetches);
}

#[test]
fn unknown_column_filter_is_rejected_without_change() {
    let (mut coordinator, _) = opened(25, 10);
    let before = coordinator.snapshot().clone();

    let err = coordinator.append_column_filter("Host", "dc").unwrap_err();

    assert!(matches!(err, ViewError::UnknownColumn(UnknownColumn { ref name }) if name == "Host"));
    assert_eq!(coordinator.snapshot(), &before);
}

#[test]
fn deselecting_changes_visibility_not_membership() {
    let (mut coordinator, _) = opened(25, 10);
    coordinator.append_column_filter("User", "user1").unwrap();
    let before = coordinator.snapshot().displayed_records.clone();

    let snapshot = coordinator.set_column_selection(["EventRecordID"]);

    assert_eq!(snapshot.displayed_records, before);
    assert_eq!(snapshot.visible_columns, vec!["EventRecordID"]);
}

#[test]
fn set_filter_replaces_and_clear_removes() {
    let mut source = user_source();
    let mut coordinator = ViewCoordinator::new();
    coordinator.open_file_with(&mut source, "a.jsonl").unwrap();
    coordinator.append_column_filter("User", "ali").unwrap();

    let snapshot = coordinator.set_column_filter("User", "bo").unwrap();
    assert_eq!(displayed_users(snapshot), vec!["bob"]);

    let snapshot = coordinator.clear_column_filter("User").unwrap();
    assert_eq!(displayed_users(snapshot), vec!["alice", "bob"]);
}

#[test]
fn toggle_column_flips_visibility() {
    let (mut coordinator, _) = opened(3, 10);

    let snapshot = coordinator.toggle_column("User").unwrap();
    assert_eq!(snapshot.visible_columns, vec!["EventRecordID"]);

    let snapshot = coordinator.toggle_column("User").unwrap();
    assert_eq!(snapshot.visible_columns, vec!["EventRecordID", "User"]);
}

// ===== request sequencing =====

#[test]
fn later_page_wins_when_earlier_resolves_last() {
    let (mut coordinator, mut source) = opened(25, 10);

    let first = coordinator.request_page(2).unwrap();
    let second = coordinator.request_page(3).unwrap();
    let second_response = second.execute(&mut source);
    let first_response = first.execute(&mut source);

    assert_eq!(coordinator.complete(second_response).unwrap(), Completion::Applied);
    assert_eq!(coordinator.complete(first_response).unwrap(), Completion::Discarded);
    assert_eq!(coordinator.snapshot().current_page_index, 3);
}

#[test]
fn later_page_wins_when_earlier_resolves_first() {
    let (mut coordinator, mut source) = opened(25, 10);

    let first = coordinator.request_page(2).unwrap();
    let second = coordinator.request_page(3).unwrap();
    let first_response = first.execute(&mut source);
    let second_response = second.execute(&mut source);

    assert_eq!(coordinator.complete(first_response).unwrap(), Completion::Discarded);
    assert_eq!(coordinator.snapshot().current_page_index, 1);
    assert_eq!(coordinator.complete(second_response).unwrap(), Completion::Applied);
    assert_eq!(coordinator.snapshot().current_page_index, 3);
}

#[test]
fn stale_failure_is_discarded_silently() {
    let (mut coordinator, mut source) = opened(25, 10);
    let stale = coordinator.request_page(2).unwrap();
    let current = coordinator.request_page(3).unwrap();

    source.fail_pages();
    let stale_response = stale.execute(&mut source);

    assert_eq!(coordinator.complete(stale_response).unwrap(), Completion::Discarded);
    assert!(coordinator.is_loading(), "page 3 still pending");
    drop(current);
}

#[test]
fn requesting_current_page_supersedes_pending_fetch() {
    let (mut coordinator, mut source) = opened(25, 10);
    let pending = coordinator.request_page(3).unwrap();

    let back = coordinator.request_page(1).expect("supersedes the pending fetch");
    assert_eq!(back.kind, FetchKind::Page { page: 1, sort: None });

    let stale = pending.execute(&mut source);
    let current = back.execute(&mut source);
    assert_eq!(coordinator.complete(stale).unwrap(), Completion::Discarded);
    assert_eq!(coordinator.complete(current).unwrap(), Completion::Applied);
    assert_eq!(coordinator.snapshot().current_page_index, 1);
    assert!(!coordinator.is_loading());
}

#[test]
fn page_requests_wait_for_pending_open() {
    let (mut coordinator, _) = opened(25, 10);
    let _open = coordinator.request_open_file("next.jsonl");

    assert!(coordinator.request_page(2).is_none());
    assert!(coordinator.is_loading());
}

#[test]
fn open_file_supersedes_pending_page() {
    let (mut coordinator, mut source) = opened(25, 10);
    let page = coordinator.request_page(3).unwrap();
    let open = coordinator.request_open_file("again.jsonl");

    let page_response = page.execute(&mut source);
    let open_response = open.execute(&mut source);

    assert_eq!(coordinator.complete(page_response).unwrap(), Completion::Discarded);
    assert_eq!(coordinator.complete(open_response).unwrap(), Completion::Applied);
    assert_eq!(coordinator.snapshot().current_page_index, 1);
    assert_eq!(coordinator.snapshot().file, Some(PathBuf::from("again.jsonl")));
}

#[test]
fn response_after_completion_is_discarded() {
    let (mut coordinator, mut source) = opened(25, 10);
    let request = coordinator.request_page(2).unwrap();
    let duplicate = request.clone();

    coordinator.complete(request.execute(&mut source)).unwrap();

    assert_eq!(
        coordinator.complete(duplicate.execute(&mut source)).unwrap(),
        Completion::Discarded
    );
}

#[test]
fn column_edits_apply_while_fetch_in_flight() {
    let (mut coordinator, mut source) = opened(25, 10);
    let request = coordinator.request_page(3).unwrap();

    coordinator.append_column_filter("User", "user22").unwrap();
    coordinator.complete(request.execute(&mut source)).unwrap();

    let snapshot = coordinator.snapshot();
    assert_eq!(snapshot.current_page_index, 3);
    assert_eq!(snapshot.displayed_records.len(), 1);
}

#[test]
fn sequence_numbers_increase() {
    let (mut coordinator, _) = opened(25, 10);
    let a = coordinator.request_page(2).unwrap();
    let b = coordinator.request_page(3).unwrap();
    let c = coordinator.request_open_file("x.jsonl");
    assert!(a.seq < b.seq && b.seq < c.seq);
}

#[test]
fn failed_open_follows_source_to_superseded_file() {
    let (mut coordinator, mut source) = opened(25, 10);
    coordinator.goto_page_with(&mut source, 3).unwrap();

    let superseded = coordinator.request_open_file("a.jsonl");
    let latest = coordinator.request_open_file("missing.jsonl");
    // The worker runs both, in order.
    let superseded_response = superseded.execute(&mut source);
    source.fail_next_load();
    let latest_response = latest.execute(&mut source);

    assert_eq!(coordinator.complete(superseded_response).unwrap(), Completion::Discarded);
    let err = coordinator.complete(latest_response).unwrap_err();

    assert!(matches!(err, ViewError::FileLoad(_)));
    assert_eq!(source.loaded_path(), Some(Path::new("a.jsonl")));
    assert_eq!(coordinator.file(), source.loaded_path());
    let snapshot = coordinator.snapshot();
    assert_eq!(snapshot.file, Some(PathBuf::from("a.jsonl")));
    assert_eq!(snapshot.current_page_index, 1);
    assert!(!coordinator.is_loading());
}

#[test]
fn successful_open_forgets_superseded_file() {
    let (mut coordinator, mut source) = opened(25, 10);

    let superseded = coordinator.request_open_file("a.jsonl");
    let latest = coordinator.request_open_file("b.jsonl");
    let superseded_response = superseded.execute(&mut source);
    let latest_response = latest.execute(&mut source);
    coordinator.complete(superseded_response).unwrap();
    coordinator.complete(latest_response).unwrap();

    source.fail_next_load();
    assert!(coordinator.open_file_with(&mut source, "broken.bin").is_err());

    assert_eq!(coordinator.snapshot().file, Some(PathBuf::from("b.jsonl")));
}

// ===== sorting =====

#[test]
fn sort_request_starts_on_first_page() {
    let (mut coordinator, mut source) = opened(25, 10);
    coordinator.goto_page_with(&mut source, 2).unwrap();

    let request = coordinator.request_sort("EventRecordID").unwrap().unwrap();

    assert_eq!(
        request.kind,
        FetchKind::Page {
            page: 1,
            sort: Some(SortOrder::ascending("EventRecordID")),
        }
    );
}

#[test]
fn applied_sort_orders_every_later_page() {
    let (mut coordinator, mut source) = opened(25, 10);
    for _ in 0..2 {
        let request = coordinator.request_sort("EventRecordID").unwrap().unwrap();
        coordinator.complete(request.execute(&mut source)).unwrap();
    }
    assert_eq!(coordinator.sort(), Some(&SortOrder::descending("EventRecordID")));

    let snapshot = coordinator.goto_page_with(&mut source, 3).unwrap();

    assert_eq!(snapshot.sort, Some(SortOrder::descending("EventRecordID")));
    assert_eq!(snapshot.displayed_records[0].record_id(), Some(5));
}

#[test]
fn sort_waits_for_its_response() {
    let (mut coordinator, mut source) = opened(25, 10);
    let request = coordinator.request_sort("User").unwrap().unwrap();

    assert_eq!(coordinator.snapshot().sort, None);

    coordinator.complete(request.execute(&mut source)).unwrap();
    assert_eq!(coordinator.snapshot().sort, Some(SortOrder::ascending("User")));
}

#[test]
fn page_request_during_pending_sort_keeps_new_order() {
    let (mut coordinator, mut source) = opened(25, 10);
    let _sort = coordinator.request_sort("EventRecordID").unwrap().unwrap();

    let next = coordinator.request_navigation(PageNav::Next).unwrap();

    assert_eq!(
        next.kind,
        FetchKind::Page {
            page: 2,
            sort: Some(SortOrder::ascending("EventRecordID")),
        }
    );
    coordinator.complete(next.execute(&mut source)).unwrap();
    assert_eq!(coordinator.sort(), Some(&SortOrder::ascending("EventRecordID")));
}

#[test]
fn sort_on_unknown_column_is_rejected() {
    let (mut coordinator, _) = opened(25, 10);
    let err = coordinator.request_sort("Host").unwrap_err();
    assert!(matches!(err, ViewError::UnknownColumn(_)));
    assert!(!coordinator.is_loading());
}

#[test]
fn open_file_clears_sort() {
    let (mut coordinator, mut source) = opened(25, 10);
    let request = coordinator.request_sort("User").unwrap().unwrap();
    coordinator.complete(request.execute(&mut source)).unwrap();

    let snapshot = coordinator.open_file_with(&mut source, "next.jsonl").unwrap();

    assert_eq!(snapshot.sort, None);
}

// ===== flagging =====

#[test]
fn toggle_flag_refetches_current_page() {
    let (mut coordinator, mut source) = opened(25, 10);
    coordinator.goto_page_with(&mut source, 2).unwrap();

    let request = coordinator.request_toggle_flag(13).unwrap();
    assert_eq!(
        request.kind,
        FetchKind::ToggleFlag {
            record_id: 13,
            page: 2,
            sort: None,
        }
    );
    coordinator.complete(request.execute(&mut source)).unwrap();

    let snapshot = coordinator.snapshot();
    assert_eq!(snapshot.current_page_index, 2);
    assert!(snapshot.displayed_records[2].is_flagged());
}

#[test]
fn toggle_flag_without_file_is_ignored() {
    let mut coordinator = ViewCoordinator::new();
    assert!(coordinator.request_toggle_flag(1).is_none());
    assert!(!coordinator.is_loading());
}

#[test]
fn toggle_flag_waits_for_pending_open() {
    let (mut coordinator, _) = opened(25, 10);
    let _open = coordinator.request_open_file("next.jsonl");
    assert!(coordinator.request_toggle_flag(1).is_none());
}

#[test]
fn toggle_flag_on_unknown_record_keeps_snapshot() {
    let (mut coordinator, mut source) = opened(25, 10);
    let before = coordinator.snapshot().clone();

    let request = coordinator.request_toggle_flag(99).unwrap();
    let err = coordinator.complete(request.execute(&mut source)).unwrap_err();

    assert!(matches!(
        err,
        ViewError::PageFetch(PageFetchError::RecordNotFound { record_id: 99 })
    ));
    assert_eq!(coordinator.snapshot(), &before);
}

// ===== export =====

#[test]
fn export_completes_without_touching_pending_page() {
    let dir = tempfile::tempdir().unwrap();
    let (mut coordinator, mut source) = opened(25, 10);
    let page = coordinator.request_page(2).unwrap();

    let export = coordinator
        .request_export(dir.path().join("out.json"), ExportFormat::Json)
        .unwrap();
    let export_response = export.execute(&mut source);

    assert_eq!(
        coordinator.complete(export_response).unwrap(),
        Completion::Exported { records: 25 }
    );
    assert!(coordinator.is_loading());
    assert_eq!(coordinator.complete(page.execute(&mut source)).unwrap(), Completion::Applied);
    assert_eq!(coordinator.snapshot().current_page_index, 2);
}

#[test]
fn export_without_file_is_ignored() {
    let mut coordinator = ViewCoordinator::new();
    assert!(coordinator
        .request_export("out.csv", ExportFormat::Csv)
        .is_none());
}

#[test]
fn failed_export_is_reported() {
    let (mut coordinator, mut source) = opened(3, 10);
    let request = coordinator
        .request_export("/nonexistent/venture/out.csv", ExportFormat::Csv)
        .unwrap();

    let err = coordinator.complete(request.execute(&mut source)).unwrap_err();

    assert!(matches!(err, ViewError::Export(_)));
}
