//! `RollingStock` registration and sequence operations.
//!
//! Every chain rewire in the crate funnels through these methods. Each
//! mutating operation either completes and leaves reciprocal links on all
//! wagons it touched, or (for [`RollingStock::attach_tail`]) fails before
//! touching anything.
//!
//! Ids passed to chain operations must come from this registry;
//! unregistered ids are a caller bug and panic on arena indexing. The
//! train protocol in `crate::train` screens ids before delegating here.

use super::types::*;

impl RollingStock {
    // -------------------------------------------------------------------------
    // Registration
    // -------------------------------------------------------------------------

    /// Register a new passenger wagon with the given seat capacity.
    /// The wagon starts unlinked. Returns its id.
    pub fn add_passenger_wagon(&mut self, seats: u32) -> WagonId {
        self.register(WagonType::Passenger { seats })
    }

    /// Register a new freight wagon with the given maximum load.
    /// The wagon starts unlinked. Returns its id.
    pub fn add_freight_wagon(&mut self, max_weight_kg: u32) -> WagonId {
        self.register(WagonType::Freight { max_weight_kg })
    }

    fn register(&mut self, wagon_type: WagonType) -> WagonId {
        let id = self.wagons.len() as WagonId;
        self.wagons.push(Wagon {
            id,
            wagon_type,
            next: None,
            prev: None,
        });
        id
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Wagon by id, or `None` for an id this registry never issued.
    pub fn get(&self, id: WagonId) -> Option<&Wagon> {
        self.wagons.get(id as usize)
    }

    /// True when `id` was issued by this registry.
    pub fn contains(&self, id: WagonId) -> bool {
        (id as usize) < self.wagons.len()
    }

    /// All registered wagons in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Wagon> {
        self.wagons.iter()
    }

    /// Number of registered wagons.
    pub fn len(&self) -> usize {
        self.wagons.len()
    }

    /// True when no wagon has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.wagons.is_empty()
    }

    // -------------------------------------------------------------------------
    // Chain walks
    // -------------------------------------------------------------------------

    /// Last wagon of the chain starting at `id`; the wagon itself when it
    /// has no successor. O(chain length).
    pub fn last_in_chain(&self, id: WagonId) -> WagonId {
        let mut cur = id;
        while let Some(next) = self.wagons[cur as usize].next {
            cur = next;
        }
        cur
    }

    /// Number of wagons from `id` to the end of its chain, inclusive.
    pub fn chain_length(&self, id: WagonId) -> u32 {
        self.chain_iter(id).count() as u32
    }

    /// Iterate over `id` and all its successors, head to tail.
    pub fn chain_iter(&self, id: WagonId) -> ChainIter<'_> {
        debug_assert!(self.contains(id), "chain walk from unregistered wagon {id}");
        ChainIter {
            wagons: &self.wagons,
            cur: Some(id),
        }
    }

    // -------------------------------------------------------------------------
    // Coupling
    // -------------------------------------------------------------------------

    /// Couple `tail` directly behind `front`.
    ///
    /// Fails without touching either chain when `front` already pulls a
    /// successor or `tail` already hangs behind a predecessor; the error
    /// names the wagons that are in the way.
    pub fn attach_tail(&mut self, front: WagonId, tail: WagonId) -> Result<(), ChainConflict> {
        debug_assert_ne!(front, tail, "cannot couple wagon {front} to itself");
        if let Some(next) = self.wagons[front as usize].next {
            return Err(ChainConflict::AlreadyPulling { front, next });
        }
        if let Some(prev) = self.wagons[tail as usize].prev {
            return Err(ChainConflict::AlreadyCoupled { tail, prev });
        }
        self.link(front, tail);
        Ok(())
    }

    /// Uncouple the successor chain behind `front` and return its head.
    /// `None` when `front` pulls nothing.
    pub fn detach_tail(&mut self, front: WagonId) -> Option<WagonId> {
        let next = self.wagons[front as usize].next.take()?;
        self.wagons[next as usize].prev = None;
        Some(next)
    }

    /// Uncouple `id` from its predecessor and return that predecessor,
    /// which is left pulling nothing. `None` when `id` has no predecessor.
    pub fn detach_front(&mut self, id: WagonId) -> Option<WagonId> {
        let prev = self.wagons[id as usize].prev.take()?;
        self.wagons[prev as usize].next = None;
        Some(prev)
    }

    /// Extract exactly this wagon from its chain, coupling its former
    /// neighbors to each other. Works at the head, tail, or middle of a
    /// chain; a no-op for an unlinked wagon.
    pub fn remove_from_sequence(&mut self, id: WagonId) {
        let prev = self.wagons[id as usize].prev.take();
        let next = self.wagons[id as usize].next.take();
        if let Some(prev) = prev {
            self.wagons[prev as usize].next = next;
        }
        if let Some(next) = next {
            self.wagons[next as usize].prev = prev;
        }
    }

    /// Re-hang `id` (with its successor chain) directly behind `front`:
    /// `id` leaves its predecessor, `front` drops its old successor chain,
    /// and the two are coupled. `id`'s own successors come along.
    ///
    /// `front` must not be `id` itself or any wagon of `id`'s chain.
    pub fn reattach_to(&mut self, id: WagonId, front: WagonId) {
        debug_assert!(
            !self.chain_iter(id).any(|w| w == front),
            "wagon {front} is part of wagon {id}'s own chain"
        );
        let _ = self.detach_front(id);
        let _ = self.detach_tail(front);
        self.link(front, id);
    }

    /// Reverse the order of `id` and all its successors in place.
    ///
    /// The reversed run is re-coupled behind whatever preceded `id`, and
    /// the former last wagon becomes the run's head. Returns the new head,
    /// or `id` itself when there was nothing to reverse.
    pub fn reverse_sequence(&mut self, id: WagonId) -> WagonId {
        if self.wagons[id as usize].next.is_none() {
            return id;
        }

        let predecessor = self.wagons[id as usize].prev;
        let run: Vec<WagonId> = self.chain_iter(id).collect();

        for pair in run.windows(2) {
            let (ahead, behind) = (pair[0], pair[1]);
            self.wagons[behind as usize].next = Some(ahead);
            self.wagons[ahead as usize].prev = Some(behind);
        }

        let new_head = run[run.len() - 1];
        self.wagons[id as usize].next = None;
        self.wagons[new_head as usize].prev = predecessor;
        if let Some(prev) = predecessor {
            self.wagons[prev as usize].next = Some(new_head);
        }
        new_head
    }

    /// Write a fresh link between two wagons whose facing ends are free.
    /// Callers must have cleared or validated both ends.
    pub(crate) fn link(&mut self, front: WagonId, tail: WagonId) {
        debug_assert!(
            self.wagons[front as usize].next.is_none(),
            "wagon {front} still pulls a successor"
        );
        debug_assert!(
            self.wagons[tail as usize].prev.is_none(),
            "wagon {tail} still hangs behind a predecessor"
        );
        self.wagons[front as usize].next = Some(tail);
        self.wagons[tail as usize].prev = Some(front);
    }
}

// =============================================================================
// Chain iterator
// =============================================================================

/// Iterator over a wagon and its successors, following `next` links.
#[derive(Debug, Clone)]
pub struct ChainIter<'a> {
    wagons: &'a [Wagon],
    cur: Option<WagonId>,
}

impl Iterator for ChainIter<'_> {
    type Item = WagonId;

    fn next(&mut self) -> Option<WagonId> {
        let id = self.cur?;
        self.cur = self.wagons[id as usize].next;
        Some(id)
    }
}
