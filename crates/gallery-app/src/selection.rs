// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::HashSet;

use crate::ids::ArtworkId;

/// Insertion-ordered set of selected artworks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    order: Vec<ArtworkId>,
    members: HashSet<ArtworkId>,
}

impl Selection {
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: ArtworkId) -> bool {
        self.members.contains(&id)
    }

    pub fn as_slice(&self) -> &[ArtworkId] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = ArtworkId> + '_ {
        self.order.iter().copied()
    }

    pub fn insert(&mut self, id: ArtworkId) -> bool {
        if !self.members.insert(id) {
            return false;
        }
        self.order.push(id);
        true
    }

    pub fn remove(&mut self, id: ArtworkId) -> bool {
        if !self.members.remove(&id) {
            return false;
        }
        self.order.retain(|existing| *existing != id);
        true
    }

    /// Flips membership and reports whether `id` is selected afterwards.
    pub fn toggle(&mut self, id: ArtworkId) -> bool {
        if self.remove(id) {
            return false;
        }
        self.insert(id)
    }

    pub fn contains_all(&self, ids: &[ArtworkId]) -> bool {
        ids.iter().all(|id| self.contains(*id))
    }

    pub fn extend(&mut self, ids: &[ArtworkId]) -> usize {
        self.take_unselected(ids, usize::MAX)
    }

    /// Appends at most `limit` ids from `ids` that are not yet selected,
    /// keeping their order. Returns how many were added.
    pub fn take_unselected(&mut self, ids: &[ArtworkId], limit: usize) -> usize {
        let mut added = 0;
        for id in ids {
            if added == limit {
                break;
            }
            if self.insert(*id) {
                added += 1;
            }
        }
        added
    }

    pub fn remove_all(&mut self, ids: &[ArtworkId]) -> usize {
        let doomed: HashSet<ArtworkId> = ids
            .iter()
            .copied()
            .filter(|id| self.members.contains(id))
            .collect();
        if doomed.is_empty() {
            return 0;
        }
        self.members.retain(|id| !doomed.contains(id));
        self.order.retain(|id| !doomed.contains(id));
        doomed.len()
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }
}
