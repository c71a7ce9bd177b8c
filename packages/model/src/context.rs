//! # Batch Context
//!
//! The context owns every entity known while one batch is handled, plus the
//! operations produced against them. Entities refer to each other by id only;
//! all navigation goes through the id-indexed maps here.
//!
//! ## Lifecycle
//!
//! ```text
//! Snapshot → Context → handlers mutate → drain_operations() → dropped
//! ```

use crate::blip::Blip;
use crate::identity::{BlipId, EntityKind, IdAllocator, PendingId};
use crate::operation::Operation;
use crate::queue::OperationQueue;
use crate::user::User;
use crate::wave::Wave;
use crate::wavelet::Wavelet;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Decoded entity state delivered with a batch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub users: Vec<User>,

    #[serde(default)]
    pub waves: Vec<Wave>,

    #[serde(default)]
    pub wavelets: Vec<Wavelet>,

    #[serde(default)]
    pub blips: Vec<Blip>,
}

/// Per-batch entity graph and operation queue
#[derive(Debug, Default)]
pub struct Context {
    users: HashMap<String, User>,
    waves: HashMap<String, Wave>,
    wavelets: HashMap<String, Wavelet>,
    blips: HashMap<BlipId, Blip>,
    queue: OperationQueue,
    ids: IdAllocator,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph for one batch.
    ///
    /// Parent links are authoritative: a blip whose parent is present but
    /// does not list it as a child is appended to that parent's child list.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let mut ctx = Self::new();

        for user in snapshot.users {
            ctx.users.insert(user.id.clone(), user);
        }
        for wave in snapshot.waves {
            ctx.waves.insert(wave.id.clone(), wave);
        }
        for wavelet in snapshot.wavelets {
            ctx.insert_wavelet(wavelet);
        }

        let mut order = Vec::with_capacity(snapshot.blips.len());
        for mut blip in snapshot.blips {
            if blip.parent_blip_id.as_ref() == Some(&blip.id) {
                warn!(blip = %blip.id, "Blip names itself as parent, treating it as a root");
                blip.parent_blip_id = None;
            }
            let own_id = blip.id.clone();
            blip.child_blip_ids.retain(|child| *child != own_id);

            order.push(blip.id.clone());
            ctx.blips.insert(blip.id.clone(), blip);
        }
        for id in &order {
            let parent_id = match ctx.blips.get(id).and_then(|b| b.parent_blip_id.clone()) {
                Some(parent_id) => parent_id,
                None => continue,
            };
            if let Some(parent) = ctx.blips.get_mut(&parent_id) {
                if !parent.child_blip_ids.contains(id) {
                    parent.child_blip_ids.push(id.clone());
                }
            }
        }

        debug!(
            users = ctx.users.len(),
            waves = ctx.waves.len(),
            wavelets = ctx.wavelets.len(),
            blips = ctx.blips.len(),
            "Built context from snapshot"
        );

        ctx
    }

    // ---- entity registration -------------------------------------------

    /// Insert a user unless one with the same id exists; return the stored one
    pub fn add_user(&mut self, user: User) -> &User {
        self.users.entry(user.id.clone()).or_insert(user)
    }

    pub fn insert_wave(&mut self, wave: Wave) {
        self.waves.insert(wave.id.clone(), wave);
    }

    /// Insert a wavelet, registering it with its wave and its participants as users
    pub fn insert_wavelet(&mut self, wavelet: Wavelet) {
        if let Some(wave) = self.waves.get_mut(&wavelet.wave_id) {
            wave.add_wavelet_id(&wavelet.id);
        }
        for participant in &wavelet.participant_ids {
            self.users
                .entry(participant.clone())
                .or_insert_with(|| User::new(participant.clone()));
        }
        self.wavelets.insert(wavelet.id.clone(), wavelet);
    }

    /// Insert a blip as-is, without touching any parent's child list
    pub fn insert_blip(&mut self, blip: Blip) {
        self.blips.insert(blip.id.clone(), blip);
    }

    /// Attach `child` under `parent_id` and insert it into the graph.
    ///
    /// Returns `None`, leaving the graph untouched, when the parent is absent.
    pub fn add_child_blip(&mut self, parent_id: &BlipId, mut child: Blip) -> Option<BlipId> {
        let parent = self.blips.get_mut(parent_id)?;
        let child_id = child.id.clone();

        parent.child_blip_ids.push(child_id.clone());
        child.parent_blip_id = Some(parent_id.clone());
        self.blips.insert(child_id.clone(), child);

        Some(child_id)
    }

    /// Remove a blip and its descendants, unlinking it from its parent
    pub fn remove_blip(&mut self, id: &BlipId) -> Option<Blip> {
        let blip = self.blips.remove(id)?;

        if let Some(parent) = blip
            .parent_blip_id
            .as_ref()
            .and_then(|parent_id| self.blips.get_mut(parent_id))
        {
            parent.child_blip_ids.retain(|child| child != id);
        }

        let mut orphans = blip.child_blip_ids.clone();
        while let Some(orphan_id) = orphans.pop() {
            if let Some(orphan) = self.blips.remove(&orphan_id) {
                orphans.extend(orphan.child_blip_ids);
            }
        }

        Some(blip)
    }

    // ---- operations ----------------------------------------------------

    pub fn add_operation(&mut self, operation: Operation) {
        self.queue.push(operation);
    }

    pub fn operations(&self) -> &[Operation] {
        self.queue.as_slice()
    }

    /// Hand every queued operation to the caller, in order
    pub fn drain_operations(&mut self) -> Vec<Operation> {
        self.queue.drain()
    }

    pub fn allocate_id(&mut self, kind: EntityKind) -> PendingId {
        self.ids.allocate(kind)
    }

    // ---- lookups -------------------------------------------------------

    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.get(id)
    }

    pub fn wave(&self, id: &str) -> Option<&Wave> {
        self.waves.get(id)
    }

    pub fn wavelet(&self, id: &str) -> Option<&Wavelet> {
        self.wavelets.get(id)
    }

    pub fn wavelet_mut(&mut self, id: &str) -> Option<&mut Wavelet> {
        self.wavelets.get_mut(id)
    }

    pub fn blip(&self, id: &BlipId) -> Option<&Blip> {
        self.blips.get(id)
    }

    pub fn blip_mut(&mut self, id: &BlipId) -> Option<&mut Blip> {
        self.blips.get_mut(id)
    }

    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    pub fn waves(&self) -> impl Iterator<Item = &Wave> {
        self.waves.values()
    }

    pub fn wavelets(&self) -> impl Iterator<Item = &Wavelet> {
        self.wavelets.values()
    }

    pub fn blips(&self) -> impl Iterator<Item = &Blip> {
        self.blips.values()
    }

    pub fn blip_count(&self) -> usize {
        self.blips.len()
    }

    // ---- navigation ----------------------------------------------------

    pub fn parent_blip(&self, id: &BlipId) -> Option<&Blip> {
        let parent_id = self.blip(id)?.parent_blip_id.as_ref()?;
        self.blip(parent_id)
    }

    /// Children present in this context, in creation order
    pub fn child_blips(&self, id: &BlipId) -> Vec<&Blip> {
        self.blip(id)
            .map(|blip| {
                blip.child_blip_ids
                    .iter()
                    .filter_map(|child| self.blip(child))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn blip_wavelet(&self, id: &BlipId) -> Option<&Wavelet> {
        self.wavelet(&self.blip(id)?.wavelet_id)
    }

    pub fn blip_wave(&self, id: &BlipId) -> Option<&Wave> {
        self.wave(&self.blip(id)?.wave_id)
    }

    pub fn wavelet_participants(&self, wavelet_id: &str) -> Vec<&User> {
        self.wavelet(wavelet_id)
            .map(|w| w.participant_ids.iter().filter_map(|p| self.user(p)).collect())
            .unwrap_or_default()
    }

    pub fn root_blip(&self, wavelet_id: &str) -> Option<&Blip> {
        let root_id = self.wavelet(wavelet_id)?.root_blip_id.as_ref()?;
        self.blip(root_id)
    }

    /// Last blip of the main thread: follow first children down from the root
    pub fn final_blip(&self, wavelet_id: &str) -> Option<&Blip> {
        let mut blip = self.root_blip(wavelet_id)?;
        // A thread never holds more blips than the context, so a longer walk is a cycle
        for _ in 0..self.blips.len() {
            match blip.child_blip_ids.first().and_then(|id| self.blip(id)) {
                Some(next) => blip = next,
                None => return Some(blip),
            }
        }
        warn!(wavelet = wavelet_id, blip = %blip.id, "Blip thread loops, stopping walk");
        Some(blip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::OperationKind;

    fn blip(id: &str) -> Blip {
        Blip::new(BlipId::confirmed(id), "w+wave", "w+wavelet")
    }

    #[test]
    fn test_add_user_is_idempotent() {
        let mut ctx = Context::new();

        ctx.add_user(User::new("fred@example.com").with_name("Fred"));
        let stored = ctx.add_user(User::new("fred@example.com").with_name("Other"));

        assert_eq!(stored.name(), "Fred");
        assert_eq!(ctx.users().count(), 1);
    }

    #[test]
    fn test_absent_lookups_are_none() {
        let ctx = Context::new();

        assert!(ctx.user("nobody").is_none());
        assert!(ctx.wavelet("nowhere").is_none());
        assert!(ctx.blip(&BlipId::confirmed("b+missing")).is_none());
        assert!(ctx.final_blip("nowhere").is_none());
        assert!(ctx.child_blips(&BlipId::confirmed("b+missing")).is_empty());
    }

    #[test]
    fn test_add_child_blip_links_both_ways() {
        let parent_id = BlipId::confirmed("b+parent");
        let mut ctx = Context::new();
        ctx.insert_blip(blip("b+parent"));

        let child_id = ctx.add_child_blip(&parent_id, blip("TBD+b+child")).unwrap();

        assert_eq!(ctx.blip(&parent_id).unwrap().child_blip_ids, vec![child_id.clone()]);
        assert_eq!(ctx.parent_blip(&child_id).unwrap().id, parent_id);
        assert_eq!(ctx.blip_count(), 2);
    }

    #[test]
    fn test_add_child_blip_requires_parent() {
        let mut ctx = Context::new();
        assert!(ctx
            .add_child_blip(&BlipId::confirmed("b+missing"), blip("b+child"))
            .is_none());
        assert_eq!(ctx.blip_count(), 0);
    }

    #[test]
    fn test_remove_blip_drops_descendants() {
        let root = BlipId::confirmed("b+root");
        let mut ctx = Context::new();
        ctx.insert_blip(blip("b+root"));
        let a = ctx.add_child_blip(&root, blip("b+a")).unwrap();
        let b = ctx.add_child_blip(&a, blip("b+b")).unwrap();
        let c = ctx.add_child_blip(&root, blip("b+c")).unwrap();

        ctx.remove_blip(&a).unwrap();

        assert!(ctx.blip(&a).is_none());
        assert!(ctx.blip(&b).is_none());
        assert_eq!(ctx.blip(&root).unwrap().child_blip_ids, vec![c]);
    }

    #[test]
    fn test_from_snapshot_repairs_child_links() {
        let snapshot = Snapshot {
            wavelets: vec![Wavelet::new("w+wavelet", "w+wave")
                .with_root_blip(BlipId::confirmed("b+root"))
                .with_participants(["fred@example.com"])],
            waves: vec![Wave::new("w+wave")],
            blips: vec![
                blip("b+root"),
                blip("b+first").with_parent(BlipId::confirmed("b+root")),
                blip("b+second").with_parent(BlipId::confirmed("b+first")),
            ],
            ..Default::default()
        };

        let ctx = Context::from_snapshot(snapshot);

        assert_eq!(ctx.final_blip("w+wavelet").unwrap().id, BlipId::confirmed("b+second"));
        assert_eq!(ctx.wave("w+wave").unwrap().wavelet_ids, vec!["w+wavelet"]);
        assert_eq!(ctx.wavelet_participants("w+wavelet").len(), 1);
    }

    #[test]
    fn test_final_blip_of_lone_root_is_root() {
        let mut ctx = Context::new();
        ctx.insert_wavelet(Wavelet::new("w+wavelet", "w+wave").with_root_blip(BlipId::confirmed("b+root")));
        ctx.insert_blip(blip("b+root"));

        assert_eq!(ctx.final_blip("w+wavelet").unwrap().id, BlipId::confirmed("b+root"));
    }

    #[test]
    fn test_drain_operations() {
        let mut ctx = Context::new();
        ctx.add_operation(Operation::new(OperationKind::BlipDelete, "w", "w"));

        assert_eq!(ctx.operations().len(), 1);
        assert_eq!(ctx.drain_operations().len(), 1);
        assert!(ctx.operations().is_empty());
    }
}
