//! Runs provider calls off the event loop and reports back as actions.
//!
//! Each request gets its own task. The provider never fails (it falls back
//! to demo data), so every task ends with exactly one response action.
//! Tasks stop early if the app is shutting down.

use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use alarmsense_core::{Provider, SearchTicket};

use crate::action::Action;

/// Owns what every fetch task needs.
#[derive(Clone)]
pub struct DataBridge {
    provider: Provider,
    action_tx: UnboundedSender<Action>,
    cancel: CancellationToken,
}

impl DataBridge {
    pub fn new(provider: Provider, action_tx: UnboundedSender<Action>) -> Self {
        Self {
            provider,
            action_tx,
            cancel: CancellationToken::new(),
        }
    }

    pub fn is_offline(&self) -> bool {
        self.provider.is_offline()
    }

    /// Abort outstanding fetches. Their responses are never sent.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    pub fn fetch_sites(&self) {
        let bridge = self.clone();
        let provider = self.provider.clone();
        tokio::spawn(async move {
            debug!("fetching sites");
            bridge
                .forward(async move { Action::SitesLoaded(provider.list_sites().await) })
                .await;
        });
    }

    pub fn fetch_turbines(&self, site_id: String) {
        let bridge = self.clone();
        let provider = self.provider.clone();
        tokio::spawn(async move {
            debug!(site_id, "fetching turbines");
            bridge
                .forward(async move {
                    let response = provider.list_turbines(&site_id).await;
                    Action::TurbinesLoaded { site_id, response }
                })
                .await;
        });
    }

    pub fn search(&self, ticket: SearchTicket) {
        let bridge = self.clone();
        let provider = self.provider.clone();
        tokio::spawn(async move {
            debug!(generation = ticket.generation, "running root-cause search");
            bridge
                .forward(async move {
                    let response = provider.find_root_cause(&ticket.filter).await;
                    Action::SearchCompleted {
                        generation: ticket.generation,
                        response,
                    }
                })
                .await;
        });
    }

    async fn forward(&self, work: impl Future<Output = Action>) {
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => {}
            action = work => {
                let _ = self.action_tx.send(action);
            }
        }
    }
}
