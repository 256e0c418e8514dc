use super::*;
use serde_json::json;

fn derived(status: u16, token: Option<&str>) -> RefreshDerived {
    RefreshDerived { status, access_token: token.map(str::to_owned) }
}

fn session_with_token(token: &str) -> Session {
    let mut session = Session::new();
    session.apply(SessionEvent::RefreshStarted);
    session.apply(SessionEvent::RefreshCompleted(derived(200, Some(token))));
    session
}

fn profile(id: u64, name: &str) -> UserProfile {
    UserProfile(json!({ "id": id, "name": name }))
}

// =============================================================
// Initial state
// =============================================================

#[test]
fn new_session_is_empty_and_awaits_refresh() {
    let session = Session::new();
    assert_eq!(session.phase(), SessionPhase::Idle);
    assert!(session.access_token().is_none());
    assert!(session.user().is_none());
    assert!(session.refresh_pending());
    assert!(session.shows_loader());
    assert!(session.profile_key().is_none());
}

#[test]
fn usable_token_rejects_none_and_empty() {
    assert!(!is_usable_token(None));
    assert!(!is_usable_token(Some("")));
    assert!(is_usable_token(Some("T1")));
}

// =============================================================
// Refresh sequence
// =============================================================

#[test]
fn refresh_200_assigns_token() {
    let session = session_with_token("T1");
    assert_eq!(session.access_token(), Some("T1"));
    assert_eq!(session.phase(), SessionPhase::TokenReady);
    assert!(!session.refresh_pending());
    assert_eq!(session.profile_key(), Some("T1"));
}

#[test]
fn refresh_non_200_leaves_token_unchanged() {
    let mut session = Session::new();
    session.apply(SessionEvent::TokenAssigned(Some("T0".to_owned())));
    session.apply(SessionEvent::RefreshStarted);
    session.apply(SessionEvent::RefreshCompleted(derived(204, Some("T9"))));
    assert_eq!(session.access_token(), Some("T0"));
    assert_eq!(session.phase(), SessionPhase::RefreshFailed);
    assert!(!session.refresh_pending());
}

#[test]
fn refresh_non_200_from_empty_leaves_token_none() {
    let mut session = Session::new();
    session.apply(SessionEvent::RefreshStarted);
    session.apply(SessionEvent::RefreshCompleted(derived(201, Some("T1"))));
    assert!(session.access_token().is_none());
}

#[test]
fn refresh_failure_forces_token_none() {
    let mut session = session_with_token("T1");
    session.apply(SessionEvent::RefreshStarted);
    session.apply(SessionEvent::RefreshFailed);
    assert!(session.access_token().is_none());
    assert_eq!(session.phase(), SessionPhase::RefreshFailed);
}

#[test]
fn refresh_failure_is_idempotent_when_token_already_none() {
    let mut session = Session::new();
    session.apply(SessionEvent::RefreshStarted);
    session.apply(SessionEvent::RefreshFailed);
    session.apply(SessionEvent::RefreshFailed);
    assert!(session.access_token().is_none());
    assert!(!session.shows_loader());
}

#[test]
fn refresh_result_completing_the_cycle_is_published() {
    let mut session = session_with_token("T1");
    session.apply(SessionEvent::TokenAssigned(None));
    session.apply(SessionEvent::RefreshStarted);
    let applied = session.apply(SessionEvent::RefreshCompleted(derived(200, Some("T1"))));
    assert!(applied);
    assert!(!session.refresh_pending());
}

#[test]
fn new_refresh_cycle_reapplies_same_token() {
    let mut session = session_with_token("T1");
    session.apply(SessionEvent::TokenAssigned(None));
    session.apply(SessionEvent::RefreshStarted);
    let applied = session.apply(SessionEvent::RefreshCompleted(derived(200, Some("T1"))));
    assert!(applied);
    assert_eq!(session.access_token(), Some("T1"));
}

#[test]
fn refresh_200_without_token_is_a_failed_refresh() {
    let mut session = Session::new();
    session.apply(SessionEvent::RefreshStarted);
    session.apply(SessionEvent::RefreshCompleted(derived(200, None)));
    assert!(session.access_token().is_none());
    assert_eq!(session.phase(), SessionPhase::RefreshFailed);
}

#[test]
fn refresh_200_with_empty_token_keeps_profile_disabled() {
    let mut session = Session::new();
    session.apply(SessionEvent::RefreshStarted);
    session.apply(SessionEvent::RefreshCompleted(derived(200, Some(""))));
    assert_eq!(session.access_token(), Some(""));
    assert!(!session.has_token());
    assert!(session.profile_key().is_none());
}

#[test]
fn derived_from_response_reads_status_and_token() {
    let resp = ApiResponse::new(200, RefreshPayload { access_token: Some("T1".to_owned()) });
    assert_eq!(RefreshDerived::from_response(&resp), derived(200, Some("T1")));
    let empty: ApiResponse<RefreshPayload> = ApiResponse::empty(204);
    assert_eq!(RefreshDerived::from_response(&empty), derived(204, None));
}

// =============================================================
// Profile sequence
// =============================================================

#[test]
fn profile_200_sets_user() {
    let mut session = session_with_token("T1");
    session.apply(SessionEvent::ProfileStarted { token: "T1".to_owned() });
    assert_eq!(session.phase(), SessionPhase::FetchingProfile);
    session.apply(SessionEvent::ProfileCompleted {
        token: "T1".to_owned(),
        status: 200,
        user: Some(profile(1, "A")),
    });
    assert_eq!(session.user(), Some(&profile(1, "A")));
    assert_eq!(session.phase(), SessionPhase::Ready);
}

#[test]
fn profile_non_200_leaves_user_unchanged() {
    let mut session = session_with_token("T1");
    session.apply(SessionEvent::ProfileCompleted {
        token: "T1".to_owned(),
        status: 200,
        user: Some(profile(1, "A")),
    });
    session.apply(SessionEvent::ProfileCompleted {
        token: "T1".to_owned(),
        status: 206,
        user: Some(profile(2, "B")),
    });
    assert_eq!(session.user(), Some(&profile(1, "A")));
    assert_eq!(session.phase(), SessionPhase::ProfileFetchFailed);
}

#[test]
fn profile_failure_keeps_token() {
    let mut session = session_with_token("T1");
    session.apply(SessionEvent::ProfileFailed { token: "T1".to_owned() });
    assert_eq!(session.access_token(), Some("T1"));
    assert_eq!(session.phase(), SessionPhase::ProfileFetchFailed);
}

#[test]
fn stale_profile_result_is_ignored() {
    let mut session = session_with_token("T1");
    session.apply(SessionEvent::TokenAssigned(Some("T2".to_owned())));
    let applied = session.apply(SessionEvent::ProfileCompleted {
        token: "T1".to_owned(),
        status: 200,
        user: Some(profile(1, "A")),
    });
    assert!(!applied);
    assert!(session.user().is_none());
    assert_eq!(session.phase(), SessionPhase::TokenReady);
}

#[test]
fn token_change_keeps_previous_user_until_new_profile() {
    let mut session = session_with_token("T1");
    session.apply(SessionEvent::ProfileCompleted {
        token: "T1".to_owned(),
        status: 200,
        user: Some(profile(1, "A")),
    });
    session.apply(SessionEvent::TokenAssigned(Some("T2".to_owned())));
    assert_eq!(session.user(), Some(&profile(1, "A")));
    assert_eq!(session.profile_key(), Some("T2"));
}

// =============================================================
// Loading gate
// =============================================================

#[test]
fn loader_follows_refresh_pending_only() {
    let mut session = session_with_token("T1");
    assert!(!session.shows_loader());
    session.apply(SessionEvent::ProfileStarted { token: "T1".to_owned() });
    assert!(!session.shows_loader());
}

#[test]
fn later_refresh_cycles_do_not_gate_rendering() {
    let mut session = session_with_token("T1");
    session.apply(SessionEvent::TokenAssigned(None));
    session.apply(SessionEvent::RefreshStarted);
    assert_eq!(session.phase(), SessionPhase::RefreshingToken);
    assert!(!session.refresh_pending());
    assert!(!session.shows_loader());
}

#[test]
fn refresh_after_failed_first_cycle_does_not_gate_rendering() {
    let mut session = Session::new();
    session.apply(SessionEvent::RefreshStarted);
    assert!(session.shows_loader());
    session.apply(SessionEvent::RefreshFailed);
    session.apply(SessionEvent::RefreshStarted);
    assert!(!session.shows_loader());
}

#[test]
fn first_refresh_gates_rendering_even_over_assigned_token() {
    let mut session = Session::new();
    session.apply(SessionEvent::TokenAssigned(Some("T0".to_owned())));
    session.apply(SessionEvent::RefreshStarted);
    assert!(session.shows_loader());
}

#[test]
fn clearing_token_returns_to_idle() {
    let mut session = session_with_token("T1");
    session.apply(SessionEvent::TokenAssigned(None));
    assert_eq!(session.phase(), SessionPhase::Idle);
    assert!(!session.has_token());
}
