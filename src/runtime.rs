//! Effect execution
//!
//! Runs `AppEffect`s against the backend on the tokio runtime and sends the
//! resulting `AppEvent`s back to the UI loop over an unbounded channel.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::acquisition::{Completion, Effect};
use crate::api::BackendClient;
use crate::app::{AppEffect, AppEvent};

/// Execute one effect to completion
pub async fn execute(client: &BackendClient, effect: AppEffect) -> AppEvent {
    match effect {
        AppEffect::Acquisition(effect) => AppEvent::Acquisition(execute_acquisition(client, effect).await),
        AppEffect::LoadShows {
            request,
            only_missing,
        } => AppEvent::ShowsLoaded {
            request,
            result: client.list_shows(only_missing).await,
        },
        AppEffect::LoadLogs { request } => AppEvent::LogsLoaded {
            request,
            result: client.list_logs().await,
        },
        AppEffect::SyncAll => AppEvent::SyncFinished(client.sync_all().await),
    }
}

async fn execute_acquisition(client: &BackendClient, effect: Effect) -> Completion {
    match effect {
        Effect::FetchShow {
            generation,
            show_id,
            cause,
        } => Completion::ShowFetched {
            generation,
            cause,
            result: client.fetch_show(&show_id).await,
        },
        Effect::SearchRelease {
            generation,
            show_id,
            query,
        } => Completion::SearchAccepted {
            generation,
            result: client.search_release(&show_id, &query).await,
        },
        Effect::GrabRelease {
            generation,
            show_id,
            release_pk,
        } => {
            let result = client.grab_release(&show_id, &release_pk).await;
            Completion::GrabAccepted {
                generation,
                release_pk,
                result,
            }
        }
    }
}

/// Spawns effects as background tasks
#[derive(Debug, Clone)]
pub struct Dispatcher {
    client: Arc<BackendClient>,
    tx: mpsc::UnboundedSender<AppEvent>,
}

impl Dispatcher {
    /// Create a dispatcher and the receiver its events arrive on
    pub fn new(client: BackendClient) -> (Self, mpsc::UnboundedReceiver<AppEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let dispatcher = Self {
            client: Arc::new(client),
            tx,
        };
        (dispatcher, rx)
    }

    pub fn dispatch(&self, effect: AppEffect) {
        debug!(?effect, "dispatching effect");
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let event = execute(&client, effect).await;
            // Receiver is gone once the UI loop exits
            let _ = tx.send(event);
        });
    }

    pub fn dispatch_all(&self, effects: impl IntoIterator<Item = AppEffect>) {
        for effect in effects {
            self.dispatch(effect);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::GatewayError;

    #[tokio::test]
    async fn test_dispatch_delivers_event() {
        // Nothing listens on port 1
        let (dispatcher, mut rx) = Dispatcher::new(BackendClient::new("http://127.0.0.1:1"));
        dispatcher.dispatch(AppEffect::SyncAll);

        let event = rx.recv().await.expect("event delivered");
        assert!(matches!(
            event,
            AppEvent::SyncFinished(Err(GatewayError::Network(_)))
        ));
    }

    #[tokio::test]
    async fn test_list_load_echoes_request_tag() {
        let client = BackendClient::new("http://127.0.0.1:1");
        let event = execute(
            &client,
            AppEffect::LoadShows {
                request: 7,
                only_missing: false,
            },
        )
        .await;

        assert!(matches!(
            event,
            AppEvent::ShowsLoaded {
                request: 7,
                result: Err(GatewayError::Network(_))
            }
        ));
    }

    #[tokio::test]
    async fn test_grab_completion_keeps_release_pk() {
        let client = BackendClient::new("http://127.0.0.1:1");
        let event = execute(
            &client,
            AppEffect::Acquisition(Effect::GrabRelease {
                generation: 3,
                show_id: "42".into(),
                release_pk: "abc".into(),
            }),
        )
        .await;

        match event {
            AppEvent::Acquisition(Completion::GrabAccepted {
                generation,
                release_pk,
                result,
            }) => {
                assert_eq!(generation, 3);
                assert_eq!(release_pk, "abc");
                assert!(result.is_err());
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
