//! Executes [`FetchRequest`]s as tasks on the runtime.
//!
//! Results come back through an unbounded channel that the event loop polls
//! next to terminal input. A new posts request aborts the previous posts
//! task, so at most one posts request is ever in flight.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::api::DirectoryClient;

use super::dashboard::{FetchOutcome, FetchRequest};
use super::loader::RequestTicket;

pub struct Fetcher {
    client: Arc<dyn DirectoryClient>,
    outcomes: mpsc::UnboundedSender<FetchOutcome>,
    users_task: Option<JoinHandle<()>>,
    posts_task: Option<(RequestTicket, JoinHandle<()>)>,
}

impl Fetcher {
    /// Create a fetcher together with the receiving end of its result channel.
    pub fn channel(client: Arc<dyn DirectoryClient>) -> (Self, mpsc::UnboundedReceiver<FetchOutcome>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let fetcher = Self {
            client,
            outcomes: tx,
            users_task: None,
            posts_task: None,
        };
        (fetcher, rx)
    }

    /// Spawn the request. Must be called from within a tokio runtime.
    pub fn execute(&mut self, request: FetchRequest) {
        match request {
            FetchRequest::Users { ticket } => {
                let client = Arc::clone(&self.client);
                let tx = self.outcomes.clone();
                let handle = tokio::spawn(async move {
                    let result = client.fetch_users().await;
                    if tx.send(FetchOutcome::Users { ticket, result }).is_err() {
                        tracing::debug!(%ticket, "event loop gone; users result discarded");
                    }
                });
                if let Some(previous) = self.users_task.replace(handle) {
                    previous.abort();
                }
            }
            FetchRequest::Posts { ticket, user_id } => {
                if let Some((stale, previous)) = self.posts_task.take() {
                    if !previous.is_finished() {
                        tracing::debug!(ticket = %stale, "cancelling superseded posts request");
                    }
                    previous.abort();
                }
                let client = Arc::clone(&self.client);
                let tx = self.outcomes.clone();
                let handle = tokio::spawn(async move {
                    let result = client.fetch_posts(user_id.clone()).await;
                    let outcome = FetchOutcome::Posts {
                        ticket,
                        user_id,
                        result,
                    };
                    if tx.send(outcome).is_err() {
                        tracing::debug!(%ticket, "event loop gone; posts result discarded");
                    }
                });
                self.posts_task = Some((ticket, handle));
            }
        }
    }

    /// Abort everything still running.
    pub fn shutdown(&mut self) {
        if let Some(handle) = self.users_task.take() {
            handle.abort();
        }
        if let Some((_, handle)) = self.posts_task.take() {
            handle.abort();
        }
    }
}

impl Drop for Fetcher {
    fn drop(&mut self) {
        self.shutdown();
    }
}
