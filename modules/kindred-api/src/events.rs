//! Push-based status updates. One `watch` channel per in-flight
//! profile; the pipeline publishes a snapshot after every status
//! write and the SSE handler awaits changes instead of polling the
//! store. Channels for terminal profiles are dropped — late
//! subscribers fall back to the stored snapshot, which already
//! carries the terminal status.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{watch, Mutex};
use uuid::Uuid;

use kindred_common::types::Profile;
use kindred_pipeline::ProfileNotifier;

#[derive(Default)]
pub struct ProfileEvents {
    channels: Mutex<HashMap<Uuid, watch::Sender<Profile>>>,
}

impl ProfileEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open (or refresh) the channel for a profile with its current
    /// snapshot. Called on submission, before the pipeline is spawned,
    /// so a subscriber can never miss the run entirely.
    pub async fn register(&self, profile: &Profile) {
        let mut channels = self.channels.lock().await;
        match channels.get(&profile.id) {
            Some(tx) => {
                tx.send_replace(profile.clone());
            }
            None => {
                let (tx, _) = watch::channel(profile.clone());
                channels.insert(profile.id, tx);
            }
        }
    }

    /// Subscribe to a profile's updates. `None` when no run is in
    /// flight (never submitted here, or already terminal and pruned).
    pub async fn subscribe(&self, id: Uuid) -> Option<watch::Receiver<Profile>> {
        self.channels.lock().await.get(&id).map(|tx| tx.subscribe())
    }
}

#[async_trait]
impl ProfileNotifier for ProfileEvents {
    async fn notify(&self, profile: &Profile) {
        let mut channels = self.channels.lock().await;
        if let Some(tx) = channels.get(&profile.id) {
            tx.send_replace(profile.clone());
            // Terminal status closes the stream; existing receivers
            // keep the final value after the sender drops.
            if profile.processing_status.is_terminal() {
                channels.remove(&profile.id);
            }
        }
    }
}
