use super::*;
use crate::net::transport::TransportError;
use crate::net::types::ArticleStatus;
use crate::test_helpers::{article, page_of};

/// Ten rows keeps the 25-item fixtures at three pages.
const PAGE_SIZE: u32 = 10;

fn ids(state: &ArticleListState) -> Vec<String> {
    state.items().iter().map(|a| a.article_id.clone()).collect()
}

fn network_error() -> ApiError {
    ApiError::Transport(TransportError::Network("connection reset".to_owned()))
}

/// A list that has loaded page 1 of a 25-item collection.
fn ready_list() -> ArticleListState {
    let mut state = ArticleListState::new(PAGE_SIZE);
    let ticket = state.set_filter(ArticleFilter::default()).unwrap();
    state.apply(&ticket, Ok(page_of(1, 10, 25)));
    state
}

// =============================================================================
// Filter changes
// =============================================================================

#[test]
fn new_list_is_idle() {
    let state = ArticleListState::new(10);
    assert_eq!(state.phase(), &ListPhase::Idle);
    assert_eq!(state.view(), ListView::Idle);
}

#[test]
fn set_filter_resets_before_any_response() {
    let mut state = ready_list();
    let ticket = state.sentinel_visible().unwrap();
    state.apply(&ticket, Ok(page_of(2, 10, 25)));
    assert_eq!(state.items().len(), 20);

    let drafts = ArticleFilter::from_toggles(true, false);
    let ticket = state.set_filter(drafts.clone()).unwrap();

    assert!(state.items().is_empty());
    assert_eq!(state.page(), 1);
    assert_eq!(state.total_count(), None);
    assert_eq!(state.phase(), &ListPhase::Loading);
    assert_eq!(state.view(), ListView::Loading);
    assert_eq!(ticket.query().page, 1);
    assert_eq!(ticket.query().filter, drafts);
}

#[test]
fn every_filter_change_resets_items_and_page() {
    let mut state = ArticleListState::new(10);
    let filters = [
        ArticleFilter::default(),
        ArticleFilter::from_toggles(true, false),
        ArticleFilter::from_toggles(false, true).with_keyword("rust"),
        ArticleFilter::default().with_tag("t1"),
    ];
    for filter in filters {
        if let Some(ticket) = state.sentinel_visible() {
            state.apply(&ticket, Ok(page_of(ticket.query().page, 10, 40)));
        }
        state.set_filter(filter).unwrap();
        assert!(state.items().is_empty());
        assert_eq!(state.page(), 1);

        let ticket = state.reload().unwrap();
        state.apply(&ticket, Ok(page_of(1, 10, 40)));
    }
}

#[test]
fn identical_filter_on_live_list_is_noop() {
    let mut state = ready_list();
    let epoch = state.epoch();

    assert_eq!(state.set_filter(ArticleFilter::default()), None);
    assert_eq!(state.epoch(), epoch);
    assert_eq!(state.items().len(), 10);
}

#[test]
fn reload_forces_new_epoch() {
    let mut state = ready_list();
    let epoch = state.epoch();

    let ticket = state.reload().unwrap();

    assert_eq!(ticket.epoch(), epoch + 1);
    assert!(state.items().is_empty());
}

// =============================================================================
// Pagination
// =============================================================================

#[test]
fn twenty_five_items_in_three_pages() {
    let mut state = ArticleListState::new(PAGE_SIZE);
    let first = state.set_filter(ArticleFilter::default()).unwrap();
    assert_eq!(first.query().query_pairs()[0], ("SortBy".to_owned(), "CreatedAtNewest".to_owned()));
    assert_eq!(state.apply(&first, Ok(page_of(1, 10, 25))), ApplyOutcome::Applied);
    assert_eq!(state.items().len(), 10);

    let second = state.sentinel_visible().unwrap();
    assert_eq!(second.query().page, 2);
    state.apply(&second, Ok(page_of(2, 10, 25)));
    assert_eq!(state.items().len(), 20);
    assert!(!state.is_last_page_reached());

    let third = state.sentinel_visible().unwrap();
    assert_eq!(third.query().page, 3);
    state.apply(&third, Ok(page_of(3, 10, 25)));
    assert_eq!(state.items().len(), 25);
    assert!(state.is_last_page_reached());

    let ListView::Items { show_sentinel, loading_more, .. } = state.view() else {
        panic!("expected items view");
    };
    assert!(!show_sentinel);
    assert!(!loading_more);
    assert_eq!(state.sentinel_visible(), None);
}

#[test]
fn pages_accumulate_without_duplicates() {
    let mut state = ready_list();
    let ticket = state.sentinel_visible().unwrap();
    state.apply(&ticket, Ok(page_of(2, 10, 25)));

    let expected: Vec<String> = (0..20).map(|n| format!("a{n}")).collect();
    assert_eq!(ids(&state), expected);
}

#[test]
fn overlapping_page_does_not_duplicate() {
    let mut state = ready_list();
    let ticket = state.sentinel_visible().unwrap();
    let mut shifted = page_of(2, 10, 25);
    shifted.results.insert(0, article(9));
    shifted.results.pop();

    state.apply(&ticket, Ok(shifted));

    assert_eq!(state.items().len(), 19);
    assert_eq!(state.items().iter().filter(|a| a.article_id == "a9").count(), 1);
}

#[test]
fn sentinel_ignored_while_loading_more() {
    let mut state = ready_list();
    assert!(state.sentinel_visible().is_some());
    assert_eq!(state.sentinel_visible(), None);

    let ListView::Items { loading_more, show_sentinel, .. } = state.view() else {
        panic!("expected items view");
    };
    assert!(loading_more);
    assert!(!show_sentinel);
}

#[test]
fn sentinel_ignored_during_first_load() {
    let mut state = ArticleListState::new(10);
    state.set_filter(ArticleFilter::default());
    assert_eq!(state.sentinel_visible(), None);
}

#[test]
fn empty_first_page_is_no_results() {
    let mut state = ArticleListState::new(10);
    let ticket = state.set_filter(ArticleFilter::from_toggles(false, true)).unwrap();
    state.apply(&ticket, Ok(page_of(1, 10, 0)));

    assert!(state.is_last_page_reached());
    assert_eq!(state.view(), ListView::NoResults);
    assert_eq!(state.sentinel_visible(), None);
}

#[test]
fn empty_continuation_page_ends_list() {
    let mut state = ready_list();
    let ticket = state.sentinel_visible().unwrap();
    let mut empty = page_of(2, 10, 25);
    empty.results.clear();

    state.apply(&ticket, Ok(empty));

    assert!(state.is_last_page_reached());
    assert_eq!(state.items().len(), 10);
}

// =============================================================================
// Staleness
// =============================================================================

#[test]
fn late_response_from_old_filter_is_discarded() {
    let mut state = ready_list();
    let old = state.sentinel_visible().unwrap();

    let drafts = ArticleFilter::from_toggles(true, false);
    let new = state.set_filter(drafts.clone()).unwrap();
    let mut draft_page = page_of(1, 10, 2);
    for a in &mut draft_page.results {
        a.status = ArticleStatus::Draft;
    }
    state.apply(&new, Ok(draft_page));
    let before = ids(&state);

    assert_eq!(state.apply(&old, Ok(page_of(2, 10, 25))), ApplyOutcome::Stale);
    assert_eq!(ids(&state), before);
    assert_eq!(state.filter(), &drafts);
}

#[test]
fn stale_response_does_not_clear_loading() {
    let mut state = ready_list();
    let old = state.sentinel_visible().unwrap();
    state.set_filter(ArticleFilter::from_toggles(true, false));

    assert_eq!(state.apply(&old, Err(network_error())), ApplyOutcome::Stale);
    assert_eq!(state.phase(), &ListPhase::Loading);
}

#[test]
fn duplicate_delivery_is_stale() {
    let mut state = ArticleListState::new(10);
    let ticket = state.set_filter(ArticleFilter::default()).unwrap();
    state.apply(&ticket, Ok(page_of(1, 10, 25)));

    assert_eq!(state.apply(&ticket, Ok(page_of(1, 10, 25))), ApplyOutcome::Stale);
    assert_eq!(state.items().len(), 10);
}

#[test]
fn disposed_list_ignores_everything() {
    let mut state = ready_list();
    let ticket = state.sentinel_visible().unwrap();
    state.dispose();

    assert_eq!(state.apply(&ticket, Ok(page_of(2, 10, 25))), ApplyOutcome::Stale);
    assert_eq!(state.items().len(), 10);
    assert_eq!(state.set_filter(ArticleFilter::from_toggles(true, false)), None);
    assert_eq!(state.reload(), None);
    assert!(state.is_disposed());
}

// =============================================================================
// Failure
// =============================================================================

#[test]
fn failed_continuation_keeps_items_and_retries_same_page() {
    let mut state = ready_list();
    let ticket = state.sentinel_visible().unwrap();
    state.apply(&ticket, Err(network_error()));

    let ListView::Failed { items, message } = state.view() else {
        panic!("expected failed view");
    };
    assert_eq!(items.len(), 10);
    assert_eq!(message, "Could not reach the server.");
    assert_eq!(state.sentinel_visible(), None);

    let retry = state.retry().unwrap();
    assert_eq!(retry.epoch(), ticket.epoch());
    assert_eq!(retry.query().page, 2);
    assert_eq!(state.phase(), &ListPhase::LoadingMore);

    state.apply(&retry, Ok(page_of(2, 10, 25)));
    assert_eq!(state.items().len(), 20);
    assert_eq!(state.phase(), &ListPhase::Ready);
}

#[test]
fn failed_first_page_retries_as_loading() {
    let mut state = ArticleListState::new(10);
    let ticket = state.set_filter(ArticleFilter::default()).unwrap();
    state.apply(&ticket, Err(ApiError::Status { status: 500, message: None }));

    assert!(matches!(state.phase(), ListPhase::Failed(FetchFailure { page: 1, .. })));
    state.retry().unwrap();
    assert_eq!(state.phase(), &ListPhase::Loading);
}

#[test]
fn retry_outside_failure_is_noop() {
    let mut state = ready_list();
    assert_eq!(state.retry(), None);
}
