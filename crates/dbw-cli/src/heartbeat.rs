// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// STATUS HEARTBEAT
//
// Every interval: take the prompt lock, read wallet and chain heights, show
// them as `<local>/<remote> > `, release. The lock is held across both queries
// (each bounded by the query timeout), so a confirmation dialog that holds the
// lock is never repainted underneath the operator.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use crate::prompt::PromptLock;
use dbw_core::{LedgerClient, LedgerError};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub fn status_prompt(local: u64, remote: u64) -> String {
    format!("{}/{} > ", local, remote)
}

pub struct Heartbeat {
    ledger: Arc<dyn LedgerClient>,
    prompt: Arc<PromptLock>,
    interval: Duration,
    query_timeout: Duration,
}

impl Heartbeat {
    pub fn new(
        ledger: Arc<dyn LedgerClient>,
        prompt: Arc<PromptLock>,
        interval: Duration,
        query_timeout: Duration,
    ) -> Self {
        Self {
            ledger,
            prompt,
            interval,
            query_timeout,
        }
    }

    async fn bounded<F>(&self, query: F) -> Result<u64, LedgerError>
    where
        F: std::future::Future<Output = Result<u64, LedgerError>>,
    {
        match tokio::time::timeout(self.query_timeout, query).await {
            Ok(result) => result,
            Err(_) => Err(LedgerError::Timeout(self.query_timeout.as_millis() as u64)),
        }
    }

    /// One query + format + render cycle under the prompt lock.
    pub async fn tick(&self) -> Result<(), LedgerError> {
        let mut session = self.prompt.lock().await;
        let local = self.bounded(self.ledger.local_sync_height()).await?;
        let remote = self.bounded(self.ledger.remote_chain_height()).await?;
        session.set(&status_prompt(local, remote));
        Ok(())
    }

    /// Run until `shutdown` flips to true (or its sender is dropped).
    pub fn spawn(self, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut failing = false;
            loop {
                if *shutdown.borrow() {
                    break;
                }

                match self.tick().await {
                    Ok(()) => {
                        if failing {
                            log::info!("heartbeat recovered");
                        }
                        failing = false;
                    }
                    // Prompt keeps its last value; retry next cycle.
                    Err(e) => {
                        if !failing {
                            log::warn!("heartbeat query failed: {}", e);
                        }
                        failing = true;
                    }
                }

                tokio::select! {
                    _ = tokio::time::sleep(self.interval) => {}
                    changed = shutdown.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                }
            }
            log::debug!("heartbeat stopped");
        })
    }
}
