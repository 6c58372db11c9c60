//! In-memory duel queue.

use std::sync::{Mutex, PoisonError};

use anyhow::bail;
use log::info;

use crate::cluster::matches::MatchQueue;

/// Queue of sessions waiting for a duel, one entry per session.
///
/// Two sessions queued for the same type are paired and leave the queue.
pub struct LocalMatchQueue {
    duel_types: Vec<String>,
    waiting: Mutex<Vec<(u32, String)>>,
}

impl LocalMatchQueue {
    /// Creates a queue accepting `duel_types`, the first one being the default.
    pub fn new(duel_types: Vec<String>) -> Self {
        LocalMatchQueue {
            duel_types,
            waiting: Mutex::new(vec![]),
        }
    }

    /// Returns the duel type `session_id` is waiting for.
    #[cfg(test)]
    fn queued_for(&self, session_id: u32) -> Option<String> {
        self.waiting
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|(id, _)| *id == session_id)
            .map(|(_, duel_type)| duel_type.clone())
    }
}

impl MatchQueue for LocalMatchQueue {
    fn queue(&self, session_id: u32, duel_type: &str) -> anyhow::Result<()> {
        let duel_type = match duel_type {
            "" => self.duel_types.first(),
            name => self.duel_types.iter().find(|known| *known == name),
        };
        let Some(duel_type) = duel_type else {
            bail!("unknown duel type");
        };

        let mut waiting = self.waiting.lock().unwrap_or_else(PoisonError::into_inner);
        waiting.retain(|(id, _)| *id != session_id);

        match waiting.iter().position(|(_, queued)| queued == duel_type) {
            Some(index) => {
                let (opponent, _) = waiting.remove(index);
                info!(
                    "{} duel: session {} against session {}",
                    duel_type, session_id, opponent
                );
            }
            None => {
                info!("session {} queued for {} duel", session_id, duel_type);
                waiting.push((session_id, duel_type.clone()));
            }
        }

        Ok(())
    }

    fn dequeue(&self, session_id: u32) {
        self.waiting
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(id, _)| *id != session_id);
    }
}
