//! End-to-end acquisition flow tests
//!
//! Drives the controller (and the App on top of it) through real HTTP
//! round trips against mockito, executing effects with the runtime.
//! Effects are executed one at a time so interleavings are explicit.

use mockito::{Matcher, Server};
use serde_json::json;

use seriestui::acquisition::{
    AcquisitionController, ActionState, Effect, FetchCause, Intent, LockPolicy, Phase, QueryEdit,
    Tab,
};
use seriestui::api::BackendClient;
use seriestui::app::{App, AppEffect, AppEvent, Route};
use seriestui::runtime;

fn show_body(id: u64, search_term: Option<&str>, hits: &[&str]) -> String {
    let hits: Vec<_> = hits
        .iter()
        .map(|pk| {
            json!({
                "pk": pk,
                "title": format!("Breaking Bad {}", pk),
                "age": 1,
                "grabs": 0,
                "seeders": 20,
                "leechers": 3,
                "info_url": "",
                "size": 734003200u64,
                "indexer": "nnmclub"
            })
        })
        .collect();

    json!({
        "id": id,
        "tvdb_data": {"title": "Breaking Bad", "year": 2008, "genres": []},
        "sonarr_data": {"seasons": [{"season_number": 1, "total_episodes_count": 7}]},
        "releases": [],
        "prowlarr_data": hits,
        "prowlarr_search": search_term
    })
    .to_string()
}

/// Execute one effect and feed its completion back
async fn step(
    controller: &mut AcquisitionController,
    client: &BackendClient,
    effect: Effect,
) -> Vec<Effect> {
    match runtime::execute(client, AppEffect::Acquisition(effect)).await {
        AppEvent::Acquisition(completion) => controller.complete(completion),
        other => panic!("unexpected event: {:?}", other),
    }
}

/// Execute effects until the controller stops asking for more
async fn settle(controller: &mut AcquisitionController, client: &BackendClient, effects: Vec<Effect>) {
    let mut queue = effects;
    while let Some(effect) = queue.pop() {
        let next = step(controller, client, effect).await;
        queue.extend(next);
    }
}

fn single(effects: Vec<Effect>) -> Effect {
    assert_eq!(effects.len(), 1, "expected one effect, got {:?}", effects);
    effects.into_iter().next().unwrap()
}

// =============================================================================
// Search Flow
// =============================================================================

#[tokio::test]
async fn test_search_round_trip_refreshes_results() {
    let mut server = Server::new_async().await;
    let client = BackendClient::new(server.url());
    let mut controller = AcquisitionController::default();

    let initial = server
        .mock("GET", "/api/shows/42")
        .with_status(200)
        .with_body(show_body(42, None, &[]))
        .expect(1)
        .create_async()
        .await;

    let effects = controller.handle(Intent::Enter("42".into()));
    settle(&mut controller, &client, effects).await;
    initial.assert_async().await;
    initial.remove_async().await;

    let view = controller.view().unwrap();
    assert!(view.snapshot().unwrap().search_results.is_empty());
    assert_eq!(view.effective_query(), "Breaking Bad");

    let search = server
        .mock("POST", "/api/shows/42/search_release")
        .match_body(Matcher::Json(json!({"query": "Breaking Bad S01"})))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;
    let refreshed = server
        .mock("GET", "/api/shows/42")
        .with_status(200)
        .with_body(show_body(42, Some("Breaking Bad S01"), &["abc", "xyz"]))
        .expect(1)
        .create_async()
        .await;

    controller.handle(Intent::SelectTab(Tab::Search));
    for c in " S01".chars() {
        controller.handle(Intent::EditQuery(QueryEdit::Insert(c)));
    }

    let dispatch = single(controller.handle(Intent::SubmitSearch));
    assert!(matches!(
        &dispatch,
        Effect::SearchRelease { query, .. } if query == "Breaking Bad S01"
    ));
    assert_eq!(
        controller.view().unwrap().search_phase(),
        Some(Phase::Dispatching)
    );

    // A second submit while in flight does nothing
    assert!(controller.handle(Intent::SubmitSearch).is_empty());

    let refresh = single(step(&mut controller, &client, dispatch).await);
    assert!(matches!(
        refresh,
        Effect::FetchShow {
            cause: FetchCause::AfterSearch,
            ..
        }
    ));
    assert_eq!(
        controller.view().unwrap().search_phase(),
        Some(Phase::Refreshing)
    );

    assert!(step(&mut controller, &client, refresh).await.is_empty());

    let view = controller.view().unwrap();
    assert!(!view.search_in_flight());
    assert_eq!(view.snapshot().unwrap().search_results.len(), 2);
    assert_eq!(view.active_tab(), Tab::Search);

    search.assert_async().await;
    refreshed.assert_async().await;
}

#[tokio::test]
async fn test_failed_search_still_refreshes_and_unlocks() {
    let mut server = Server::new_async().await;
    let client = BackendClient::new(server.url());
    let mut controller = AcquisitionController::default();

    let show = server
        .mock("GET", "/api/shows/42")
        .with_status(200)
        .with_body(show_body(42, Some("Breaking Bad"), &["abc"]))
        .expect(2)
        .create_async()
        .await;
    let search = server
        .mock("POST", "/api/shows/42/search_release")
        .with_status(502)
        .expect(1)
        .create_async()
        .await;

    let effects = controller.handle(Intent::Enter("42".into()));
    settle(&mut controller, &client, effects).await;

    let effects = controller.handle(Intent::SubmitSearch);
    settle(&mut controller, &client, effects).await;

    let view = controller.view().unwrap();
    assert_eq!(view.action_state(), ActionState::Idle);
    assert_eq!(view.snapshot().unwrap().search_results.len(), 1);
    assert!(controller.can_search());

    show.assert_async().await;
    search.assert_async().await;
}

// =============================================================================
// Grab Flow
// =============================================================================

#[tokio::test]
async fn test_single_grab_in_flight_per_show() {
    let mut server = Server::new_async().await;
    let client = BackendClient::new(server.url());
    let mut controller = AcquisitionController::default();

    let show = server
        .mock("GET", "/api/shows/42")
        .with_status(200)
        .with_body(show_body(42, Some("Breaking Bad"), &["abc", "xyz"]))
        .expect(3)
        .create_async()
        .await;
    let grab_abc = server
        .mock("POST", "/api/shows/42/grab")
        .match_body(Matcher::Json(json!({"release_pk": "abc"})))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;
    let grab_xyz = server
        .mock("POST", "/api/shows/42/grab")
        .match_body(Matcher::Json(json!({"release_pk": "xyz"})))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let effects = controller.handle(Intent::Enter("42".into()));
    settle(&mut controller, &client, effects).await;

    let dispatch = single(controller.handle(Intent::Grab("abc".into())));
    assert_eq!(
        controller.view().unwrap().action_state(),
        ActionState::GrabInFlight("abc".into())
    );

    // Ignored while abc is dispatching
    assert!(controller.handle(Intent::Grab("xyz".into())).is_empty());

    let refresh = single(step(&mut controller, &client, dispatch).await);

    // Still ignored while the follow-up fetch is outstanding
    assert!(controller.handle(Intent::Grab("xyz".into())).is_empty());
    assert_eq!(controller.view().unwrap().grab_in_flight(), Some("abc"));

    assert!(step(&mut controller, &client, refresh).await.is_empty());
    assert_eq!(controller.view().unwrap().grab_in_flight(), None);

    // Now xyz goes through
    let effects = controller.handle(Intent::Grab("xyz".into()));
    assert!(matches!(
        effects.as_slice(),
        [Effect::GrabRelease { release_pk, .. }] if release_pk == "xyz"
    ));
    settle(&mut controller, &client, effects).await;

    show.assert_async().await;
    grab_abc.assert_async().await;
    grab_xyz.assert_async().await;
}

#[tokio::test]
async fn test_shared_policy_blocks_search_during_grab() {
    let mut server = Server::new_async().await;
    let client = BackendClient::new(server.url());
    let mut controller = AcquisitionController::new(LockPolicy::Shared);

    let _show = server
        .mock("GET", "/api/shows/42")
        .with_status(200)
        .with_body(show_body(42, None, &["abc"]))
        .create_async()
        .await;
    let search = server
        .mock("POST", "/api/shows/42/search_release")
        .expect(0)
        .create_async()
        .await;

    let effects = controller.handle(Intent::Enter("42".into()));
    settle(&mut controller, &client, effects).await;

    let _grab = single(controller.handle(Intent::Grab("abc".into())));
    assert!(!controller.can_search());
    assert!(controller.handle(Intent::SubmitSearch).is_empty());

    search.assert_async().await;
}

// =============================================================================
// Failure and Lifecycle
// =============================================================================

#[tokio::test]
async fn test_initial_network_error_keeps_loading() {
    let client = BackendClient::new("http://127.0.0.1:1");
    let mut controller = AcquisitionController::default();

    let effects = controller.handle(Intent::Enter("42".into()));
    settle(&mut controller, &client, effects).await;

    let view = controller.view().unwrap();
    assert!(view.snapshot().is_none());
    assert_eq!(view.action_state(), ActionState::Idle);
    assert!(controller.handle(Intent::SubmitSearch).is_empty());
    assert!(controller.handle(Intent::Grab("abc".into())).is_empty());
}

#[tokio::test]
async fn test_late_response_after_switching_show_is_dropped() {
    let mut server = Server::new_async().await;
    let client = BackendClient::new(server.url());
    let mut controller = AcquisitionController::default();

    let _show_42 = server
        .mock("GET", "/api/shows/42")
        .with_status(200)
        .with_body(show_body(42, None, &["abc"]))
        .create_async()
        .await;
    let _show_43 = server
        .mock("GET", "/api/shows/43")
        .with_status(500)
        .create_async()
        .await;

    let stale = single(controller.handle(Intent::Enter("42".into())));
    controller.handle(Intent::Leave);
    let current = single(controller.handle(Intent::Enter("43".into())));

    // 42's answer arrives after the user moved on
    assert!(step(&mut controller, &client, stale).await.is_empty());
    assert!(controller.view().unwrap().snapshot().is_none());
    assert_eq!(controller.view().unwrap().show_id(), "43");

    assert!(step(&mut controller, &client, current).await.is_empty());
    assert!(controller.view().unwrap().snapshot().is_none());
}

// =============================================================================
// App-level Flow
// =============================================================================

/// Execute every queued app effect until the queue drains
async fn pump(app: &mut App, client: &BackendClient) {
    loop {
        let effects = app.take_effects();
        if effects.is_empty() {
            break;
        }
        for effect in effects {
            let event = runtime::execute(client, effect).await;
            app.apply(event);
        }
    }
}

#[tokio::test]
async fn test_app_series_to_grab() {
    let mut server = Server::new_async().await;
    let client = BackendClient::new(server.url());

    let list = server
        .mock("GET", "/api/shows/")
        .match_query(Matcher::UrlEncoded("only_missing".into(), "1".into()))
        .with_status(200)
        .with_body(r#"[{"id": 42, "tvdb_data": {"title": "Breaking Bad", "year": 2008}, "missing_seasons": [2]}]"#)
        .expect(2)
        .create_async()
        .await;
    let show = server
        .mock("GET", "/api/shows/42")
        .with_status(200)
        .with_body(show_body(42, Some("Breaking Bad S02"), &["abc"]))
        .expect(2)
        .create_async()
        .await;
    let grab = server
        .mock("POST", "/api/shows/42/grab")
        .match_body(Matcher::Json(json!({"release_pk": "abc"})))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let mut app = App::new(LockPolicy::Independent, true);
    app.start(Route::Series);
    pump(&mut app, &client).await;
    assert_eq!(app.series.shows.len(), 1);

    app.navigate(Route::Show("42".into()));
    pump(&mut app, &client).await;
    assert_eq!(
        app.show_view().unwrap().effective_query(),
        "Breaking Bad S02"
    );

    app.intent(Intent::Grab("abc".into()));
    pump(&mut app, &client).await;
    assert_eq!(app.show_view().unwrap().action_state(), ActionState::Idle);

    assert!(app.back());
    pump(&mut app, &client).await;
    assert!(app.show_view().is_none());

    list.assert_async().await;
    show.assert_async().await;
    grab.assert_async().await;
}
