//! Acquisition controller
//!
//! State machine behind the show detail view. It never performs I/O:
//! intents and completions go in, effects come out, and the runtime
//! executes the effects against the backend.
//!
//! ```text
//!            SubmitSearch                 SearchAccepted            ShowFetched
//!   Idle ───────────────▶ Search(Dispatching) ───────▶ Search(Refreshing) ───▶ Idle
//!            Grab(pk)                     GrabAccepted              ShowFetched
//!   Idle ───────────────▶ Grab(pk, Dispatching) ─────▶ Grab(pk, Refreshing) ──▶ Idle
//! ```
//!
//! Every completion carries the generation it was issued under. Entering or
//! leaving a show bumps the generation, so late responses from an abandoned
//! view are dropped instead of landing on the wrong snapshot.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::acquisition::store::{QueryEdit, QueryInput, ShowStore, Tab};
use crate::api::GatewayError;
use crate::models::Show;

// =============================================================================
// Inputs and Outputs
// =============================================================================

/// User intents coming from the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Route entry for `/show/{id}`
    Enter(String),
    /// View teardown
    Leave,
    SelectTab(Tab),
    EditQuery(QueryEdit),
    SubmitSearch,
    Grab(String),
}

/// Why a show fetch was issued
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchCause {
    Initial,
    AfterSearch,
    AfterGrab,
}

/// Backend work requested by the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchShow {
        generation: u64,
        show_id: String,
        cause: FetchCause,
    },
    SearchRelease {
        generation: u64,
        show_id: String,
        query: String,
    },
    GrabRelease {
        generation: u64,
        show_id: String,
        release_pk: String,
    },
}

/// Results of executed effects
#[derive(Debug)]
pub enum Completion {
    ShowFetched {
        generation: u64,
        cause: FetchCause,
        result: Result<Show, GatewayError>,
    },
    SearchAccepted {
        generation: u64,
        result: Result<(), GatewayError>,
    },
    GrabAccepted {
        generation: u64,
        release_pk: String,
        result: Result<(), GatewayError>,
    },
}

impl Completion {
    pub fn generation(&self) -> u64 {
        match self {
            Completion::ShowFetched { generation, .. }
            | Completion::SearchAccepted { generation, .. }
            | Completion::GrabAccepted { generation, .. } => *generation,
        }
    }
}

// =============================================================================
// Lock State
// =============================================================================

/// How search and grab exclude each other
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockPolicy {
    /// Each action class only blocks itself
    #[default]
    Independent,
    /// Any in-flight action blocks both classes
    Shared,
}

/// Phase of an in-flight action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Search or grab request outstanding
    Dispatching,
    /// Follow-up show fetch outstanding
    Refreshing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct GrabLock {
    release_pk: String,
    phase: Phase,
}

/// Derived view of the locks, for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionState {
    Idle,
    SearchInFlight,
    GrabInFlight(String),
}

// =============================================================================
// Show View
// =============================================================================

/// Per-mount state. Dropped whole when the user navigates away.
#[derive(Debug, Clone)]
pub struct ShowView {
    show_id: String,
    store: ShowStore,
    query: QueryInput,
    search: Option<Phase>,
    grab: Option<GrabLock>,
}

impl ShowView {
    fn new(show_id: String) -> Self {
        Self {
            show_id,
            store: ShowStore::new(),
            query: QueryInput::new(),
            search: None,
            grab: None,
        }
    }

    pub fn show_id(&self) -> &str {
        &self.show_id
    }

    pub fn store(&self) -> &ShowStore {
        &self.store
    }

    pub fn snapshot(&self) -> Option<&Show> {
        self.store.snapshot()
    }

    pub fn active_tab(&self) -> Tab {
        self.store.active_tab()
    }

    pub fn query(&self) -> &QueryInput {
        &self.query
    }

    /// Default text for the search box
    pub fn default_query(&self) -> &str {
        self.snapshot().map(Show::default_query).unwrap_or("")
    }

    /// Query that a submit would send right now
    pub fn effective_query(&self) -> &str {
        self.query.effective(self.default_query())
    }

    pub fn search_phase(&self) -> Option<Phase> {
        self.search
    }

    pub fn search_in_flight(&self) -> bool {
        self.search.is_some()
    }

    pub fn grab_phase(&self) -> Option<Phase> {
        self.grab.as_ref().map(|g| g.phase)
    }

    /// Release currently being grabbed
    pub fn grab_in_flight(&self) -> Option<&str> {
        self.grab.as_ref().map(|g| g.release_pk.as_str())
    }

    pub fn action_state(&self) -> ActionState {
        match (&self.grab, self.search) {
            (Some(grab), _) => ActionState::GrabInFlight(grab.release_pk.clone()),
            (None, Some(_)) => ActionState::SearchInFlight,
            (None, None) => ActionState::Idle,
        }
    }
}

// =============================================================================
// Controller
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct AcquisitionController {
    policy: LockPolicy,
    generation: u64,
    view: Option<ShowView>,
}

impl AcquisitionController {
    pub fn new(policy: LockPolicy) -> Self {
        Self {
            policy,
            generation: 0,
            view: None,
        }
    }

    pub fn policy(&self) -> LockPolicy {
        self.policy
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Mounted view, if any
    pub fn view(&self) -> Option<&ShowView> {
        self.view.as_ref()
    }

    /// Can a search be submitted right now
    pub fn can_search(&self) -> bool {
        self.view.as_ref().is_some_and(|v| {
            v.store.is_loaded()
                && v.search.is_none()
                && (self.policy == LockPolicy::Independent || v.grab.is_none())
        })
    }

    /// Can a grab be dispatched right now
    pub fn can_grab(&self) -> bool {
        self.view.as_ref().is_some_and(|v| {
            v.store.is_loaded()
                && v.grab.is_none()
                && (self.policy == LockPolicy::Independent || v.search.is_none())
        })
    }

    /// Apply a user intent
    pub fn handle(&mut self, intent: Intent) -> Vec<Effect> {
        match intent {
            Intent::Enter(show_id) => {
                self.generation += 1;
                info!(show_id = %show_id, generation = self.generation, "entering show view");
                self.view = Some(ShowView::new(show_id.clone()));
                vec![Effect::FetchShow {
                    generation: self.generation,
                    show_id,
                    cause: FetchCause::Initial,
                }]
            }
            Intent::Leave => {
                if let Some(view) = self.view.take() {
                    self.generation += 1;
                    debug!(show_id = %view.show_id, "left show view");
                }
                Vec::new()
            }
            Intent::SelectTab(tab) => {
                if let Some(view) = self.view.as_mut() {
                    view.store.set_active_tab(tab);
                }
                Vec::new()
            }
            Intent::EditQuery(edit) => {
                if let Some(view) = self.view.as_mut() {
                    let default = view
                        .store
                        .snapshot()
                        .map(|s| s.default_query().to_string())
                        .unwrap_or_default();
                    view.query.apply(edit, &default);
                }
                Vec::new()
            }
            Intent::SubmitSearch => self.submit_search(),
            Intent::Grab(release_pk) => self.grab(release_pk),
        }
    }

    fn submit_search(&mut self) -> Vec<Effect> {
        if !self.can_search() {
            debug!("search ignored: not loaded or already in flight");
            return Vec::new();
        }
        let Some(view) = self.view.as_mut() else {
            return Vec::new();
        };

        let query = view.effective_query().to_string();
        view.search = Some(Phase::Dispatching);
        info!(show_id = %view.show_id, query = %query, "submitting release search");

        vec![Effect::SearchRelease {
            generation: self.generation,
            show_id: view.show_id.clone(),
            query,
        }]
    }

    fn grab(&mut self, release_pk: String) -> Vec<Effect> {
        if !self.can_grab() {
            debug!(release_pk = %release_pk, "grab ignored: not loaded or already in flight");
            return Vec::new();
        }
        let Some(view) = self.view.as_mut() else {
            return Vec::new();
        };

        view.grab = Some(GrabLock {
            release_pk: release_pk.clone(),
            phase: Phase::Dispatching,
        });
        info!(show_id = %view.show_id, release_pk = %release_pk, "grabbing release");

        vec![Effect::GrabRelease {
            generation: self.generation,
            show_id: view.show_id.clone(),
            release_pk,
        }]
    }

    /// Apply the result of an executed effect
    pub fn complete(&mut self, completion: Completion) -> Vec<Effect> {
        if completion.generation() != self.generation {
            debug!(
                stale = completion.generation(),
                current = self.generation,
                "dropping stale completion"
            );
            return Vec::new();
        }
        let generation = self.generation;
        let Some(view) = self.view.as_mut() else {
            return Vec::new();
        };

        match completion {
            Completion::SearchAccepted { result, .. } => {
                if let Err(e) = result {
                    warn!(show_id = %view.show_id, kind = e.kind(), error = %e, "release search failed");
                }
                view.search = Some(Phase::Refreshing);
                vec![Effect::FetchShow {
                    generation,
                    show_id: view.show_id.clone(),
                    cause: FetchCause::AfterSearch,
                }]
            }
            Completion::GrabAccepted {
                release_pk, result, ..
            } => {
                if let Err(e) = result {
                    warn!(
                        show_id = %view.show_id,
                        release_pk = %release_pk,
                        kind = e.kind(),
                        error = %e,
                        "grab failed"
                    );
                }
                if let Some(grab) = view.grab.as_mut() {
                    grab.phase = Phase::Refreshing;
                }
                vec![Effect::FetchShow {
                    generation,
                    show_id: view.show_id.clone(),
                    cause: FetchCause::AfterGrab,
                }]
            }
            Completion::ShowFetched { cause, result, .. } => {
                match result {
                    Ok(show) => {
                        debug!(show_id = %view.show_id, ?cause, hits = show.search_results.len(), "snapshot replaced");
                        view.store.replace(show);
                    }
                    Err(e) => {
                        warn!(show_id = %view.show_id, ?cause, kind = e.kind(), error = %e, "show fetch failed");
                    }
                }
                match cause {
                    FetchCause::Initial => {}
                    FetchCause::AfterSearch => view.search = None,
                    FetchCause::AfterGrab => view.grab = None,
                }
                Vec::new()
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
