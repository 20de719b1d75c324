//! The abstract machine Γ and its resource bookkeeping.

use std::collections::{HashMap, HashSet};

use gdslv_opcodes::{Domain, Phase};

pub type ResourceId = u32;
pub type LabelId = u32;
pub type FenceId = u32;

/// Per-resource state tracked by Γ, exactly the record named in the data
/// model: a domain, an optional pending domain transition, whether the
/// resource is currently allocated, its persistence flag, and the heap id
/// it was allocated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceRecord {
    pub domain: Domain,
    pub pending_transition: Option<(Domain, Domain)>,
    pub allocated: bool,
    pub persist_flag: bool,
    pub heap_id: Option<u32>,
}

/// A checkpoint recorded by `CHECKPOINT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    pub label_id: LabelId,
    pub heap_merkle_root: [u8; 32],
    pub pipeline_table_merkle_root: [u8; 32],
    pub stream_ptr: u64,
}

/// The per-invocation abstract machine state. Constructed fresh by
/// [`crate::verify`] on entry and discarded on return — nothing here
/// survives between calls, which is what makes the verifier a pure
/// function of `(stream, config)`.
#[derive(Debug, Clone)]
pub struct Machine {
    pub phase: Phase,
    pub fences: Vec<FenceId>,
    pub resources: HashMap<ResourceId, ResourceRecord>,
    pub labels: HashSet<LabelId>,
    pub checkpoints: Vec<Checkpoint>,
    /// True between a successful `SNAPSHOT_BEGIN` and its `SNAPSHOT_END`.
    pub snapshot_active: bool,
}

impl Machine {
    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: Phase::Build,
            fences: Vec::new(),
            resources: HashMap::new(),
            labels: HashSet::new(),
            checkpoints: Vec::new(),
            snapshot_active: false,
        }
    }

    /// Whether `id` has ever been allocated, allocated or not — used to
    /// enforce I5 (an id freed once is never re-allocated), since a freed
    /// `ResourceRecord` is retained with `allocated = false` rather than
    /// removed from the map.
    #[must_use]
    pub fn resource_ever_seen(&self, id: ResourceId) -> bool {
        self.resources.contains_key(&id)
    }

    #[must_use]
    pub fn resource(&self, id: ResourceId) -> Option<&ResourceRecord> {
        self.resources.get(&id)
    }

    /// Applies every outstanding pending transition across all resources
    /// and clears them. Called once, by `FENCE_WAIT`.
    pub fn commit_pending_transitions(&mut self) {
        for record in self.resources.values_mut() {
            if let Some((_, dst)) = record.pending_transition.take() {
                record.domain = dst;
            }
        }
    }

    /// Every resource with `persist_flag` set, paired with whether it
    /// currently satisfies the snapshot-safety precondition (Host domain,
    /// no pending transition). Used by `SNAPSHOT_BEGIN`.
    pub fn persistent_resource_violations(&self) -> Vec<ResourceId> {
        let mut offenders: Vec<ResourceId> = self
            .resources
            .iter()
            .filter(|(_, record)| {
                record.persist_flag
                    && record.allocated
                    && (record.domain != Domain::Host || record.pending_transition.is_some())
            })
            .map(|(id, _)| *id)
            .collect();
        offenders.sort_unstable();
        offenders
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_machine_starts_in_build_with_no_state() {
        let machine = Machine::new();
        assert_eq!(machine.phase, Phase::Build);
        assert!(machine.fences.is_empty());
        assert!(machine.resources.is_empty());
        assert!(!machine.snapshot_active);
    }

    #[test]
    fn commit_pending_transitions_clears_and_applies() {
        let mut machine = Machine::new();
        machine.resources.insert(
            1,
            ResourceRecord {
                domain: Domain::Device,
                pending_transition: Some((Domain::Device, Domain::Host)),
                allocated: true,
                persist_flag: false,
                heap_id: None,
            },
        );
        machine.commit_pending_transitions();
        let record = machine.resource(1).unwrap();
        assert_eq!(record.domain, Domain::Host);
        assert!(record.pending_transition.is_none());
    }

    #[test]
    fn persistent_resource_violations_flags_wrong_domain_and_pending() {
        let mut machine = Machine::new();
        machine.resources.insert(
            1,
            ResourceRecord {
                domain: Domain::Device,
                pending_transition: None,
                allocated: true,
                persist_flag: true,
                heap_id: None,
            },
        );
        machine.resources.insert(
            2,
            ResourceRecord {
                domain: Domain::Host,
                pending_transition: None,
                allocated: true,
                persist_flag: true,
                heap_id: None,
            },
        );
        assert_eq!(machine.persistent_resource_violations(), vec![1]);
    }
}
