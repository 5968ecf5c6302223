//! `Train` queries and the `YardState` composition protocol.
//!
//! Reads are pure and take `&RollingStock`. Mutations take `&mut
//! RollingStock` and check every precondition before the first link is
//! rewired, so a `false` return guarantees both resources are exactly as
//! they were. Expected refusals (wrong kind, full engine, duplicate or
//! unknown ids, bad positions) are `false`/`None`, never errors.

use crate::wagon::{RollingStock, Wagon, WagonId, WagonType};

use super::types::*;

impl Train {
    // -------------------------------------------------------------------------
    // Read queries
    // -------------------------------------------------------------------------

    /// Head wagon id, if the train pulls anything.
    pub fn head(&self) -> Option<WagonId> {
        self.head
    }

    /// True when at least one wagon is attached.
    pub fn has_wagons(&self) -> bool {
        self.head.is_some()
    }

    /// Number of wagons attached. O(chain length).
    pub fn wagon_count(&self, stock: &RollingStock) -> u32 {
        self.head.map_or(0, |head| stock.chain_length(head))
    }

    /// True when the train pulls passenger wagons. An empty train is
    /// neither a passenger nor a freight train.
    pub fn is_passenger_train(&self, stock: &RollingStock) -> bool {
        self.head_wagon(stock)
            .is_some_and(|w| w.wagon_type.is_passenger())
    }

    /// True when the train pulls freight wagons.
    pub fn is_freight_train(&self, stock: &RollingStock) -> bool {
        self.head_wagon(stock)
            .is_some_and(|w| w.wagon_type.is_freight())
    }

    fn head_wagon<'a>(&self, stock: &'a RollingStock) -> Option<&'a Wagon> {
        self.head.and_then(|head| stock.get(head))
    }

    /// Total seats over the attached passenger wagons. Wagons of the other
    /// kind contribute nothing and do not interrupt the sum.
    pub fn total_seats(&self, stock: &RollingStock) -> u32 {
        let Some(head) = self.head else {
            return 0;
        };
        stock
            .chain_iter(head)
            .filter_map(|id| stock.get(id))
            .map(|w| match w.wagon_type {
                WagonType::Passenger { seats } => seats,
                WagonType::Freight { .. } => 0,
            })
            .sum()
    }

    /// Total maximum load in kilograms over the attached freight wagons.
    /// Same skip rule for wagons of the other kind as [`total_seats`].
    ///
    /// [`total_seats`]: Train::total_seats
    pub fn total_max_weight(&self, stock: &RollingStock) -> u32 {
        let Some(head) = self.head else {
            return 0;
        };
        stock
            .chain_iter(head)
            .filter_map(|id| stock.get(id))
            .map(|w| match w.wagon_type {
                WagonType::Passenger { .. } => 0,
                WagonType::Freight { max_weight_kg } => max_weight_kg,
            })
            .sum()
    }

    /// Last attached wagon, if any. O(chain length).
    pub fn last_wagon(&self, stock: &RollingStock) -> Option<WagonId> {
        self.head.map(|head| stock.last_in_chain(head))
    }

    /// Wagon at zero-based `position` in the chain, or `None` past the end.
    pub fn wagon_at<'a>(&self, stock: &'a RollingStock, position: usize) -> Option<&'a Wagon> {
        let head = self.head?;
        let id = stock.chain_iter(head).nth(position)?;
        stock.get(id)
    }

    /// First attached wagon with the given id, or `None` when it does not
    /// ride in this train.
    pub fn wagon_by_id<'a>(&self, stock: &'a RollingStock, id: WagonId) -> Option<&'a Wagon> {
        let head = self.head?;
        stock
            .chain_iter(head)
            .filter_map(|w| stock.get(w))
            .find(|w| w.id == id)
    }

    /// Decide whether the chain starting at `head` could be attached to
    /// this train: the kinds must agree (an empty train accepts either
    /// kind), the engine capacity must hold the combined count, and no
    /// wagon of the incoming chain may already ride here. Predecessors in
    /// front of `head` are ignored; an id the registry does not know is
    /// refused.
    ///
    /// This answers compatibility only. The [`YardState`] operations add
    /// ownership rules on top, so a `true` here does not guarantee a later
    /// attach succeeds.
    ///
    /// Pure; safe to call speculatively any number of times.
    pub fn can_attach(&self, stock: &RollingStock, head: WagonId) -> bool {
        if !stock.contains(head) {
            return false;
        }
        self.accepts_chain(stock, head, stock.chain_length(head))
    }

    /// Validation shared by [`can_attach`] and the yard mutators: kind,
    /// capacity for `incoming_len` more wagons, and the per-id duplicate
    /// check over the first `incoming_len` wagons of `head`'s chain.
    ///
    /// [`can_attach`]: Train::can_attach
    pub(crate) fn accepts_chain(
        &self,
        stock: &RollingStock,
        head: WagonId,
        incoming_len: u32,
    ) -> bool {
        let Some(first) = stock.get(head) else {
            return false;
        };
        let kind_ok = match self.head_wagon(stock) {
            None => true,
            Some(own) => own.wagon_type.same_kind(&first.wagon_type),
        };
        if !kind_ok {
            return false;
        }
        if self.wagon_count(stock) + incoming_len > self.engine.max_wagons {
            return false;
        }
        stock
            .chain_iter(head)
            .take(incoming_len as usize)
            .all(|id| self.wagon_by_id(stock, id).is_none())
    }
}

impl YardState {
    // -------------------------------------------------------------------------
    // Train management
    // -------------------------------------------------------------------------

    /// Create a new empty train pulled by `engine`. Returns its id.
    pub fn add_train(&mut self, engine: Locomotive, origin: String, destination: String) -> TrainId {
        let id = self.next_train_id;
        self.next_train_id += 1;

        self.trains.push(Train {
            id,
            origin,
            destination,
            engine,
            head: None,
        });

        id
    }

    /// Remove a train by id. Its wagons stay registered and keep their
    /// couplings, surviving as a free chain.
    pub fn remove_train(&mut self, id: TrainId) -> bool {
        let before = self.trains.len();
        self.trains.retain(|t| t.id != id);
        self.trains.len() < before
    }

    /// Find a train by id.
    pub fn train(&self, id: TrainId) -> Option<&Train> {
        self.trains.iter().find(|t| t.id == id)
    }

    /// Find a train by id, mutably.
    pub fn train_mut(&mut self, id: TrainId) -> Option<&mut Train> {
        self.trains.iter_mut().find(|t| t.id == id)
    }

    // -------------------------------------------------------------------------
    // Composition protocol
    // -------------------------------------------------------------------------

    /// Attach the sequence headed by `wagon` to the rear of `train`.
    ///
    /// A head that still hangs behind a predecessor is promoted first: it
    /// is cut out of its chain alone and arrives as a single wagon, its old
    /// neighbors coupled to each other. Validation runs on exactly what
    /// would arrive, before any cut. False on unknown ids or a failed
    /// check, with no state change.
    pub fn attach_to_rear(
        &mut self,
        stock: &mut RollingStock,
        train: TrainId,
        wagon: WagonId,
    ) -> bool {
        let Some(promote) = self.validate_attach(stock, train, wagon) else {
            return false;
        };
        if promote {
            stock.remove_from_sequence(wagon);
        }
        self.couple_to_rear(stock, train, wagon);
        true
    }

    /// Insert the sequence headed by `wagon` before the train's current
    /// head. Same promotion and validation rules as [`attach_to_rear`].
    ///
    /// [`attach_to_rear`]: YardState::attach_to_rear
    pub fn insert_at_front(
        &mut self,
        stock: &mut RollingStock,
        train: TrainId,
        wagon: WagonId,
    ) -> bool {
        let Some(promote) = self.validate_attach(stock, train, wagon) else {
            return false;
        };
        if promote {
            stock.remove_from_sequence(wagon);
        }
        if let Some(t) = self.train_mut(train) {
            match t.head {
                None => t.head = Some(wagon),
                Some(old_head) => {
                    let tail = stock.last_in_chain(wagon);
                    stock.link(tail, old_head);
                    t.head = Some(wagon);
                }
            }
        }
        true
    }

    /// Insert the sequence headed by `wagon` so that its first wagon ends
    /// up at zero-based `position`.
    ///
    /// `position == 0` inserts at the front, `position == wagon_count()`
    /// attaches at the rear, anything past that fails. Same promotion and
    /// validation rules as [`attach_to_rear`], checked before any cut.
    ///
    /// [`attach_to_rear`]: YardState::attach_to_rear
    pub fn insert_at_position(
        &mut self,
        stock: &mut RollingStock,
        train: TrainId,
        position: usize,
        wagon: WagonId,
    ) -> bool {
        let count = match self.train(train) {
            Some(t) => t.wagon_count(stock) as usize,
            None => return false,
        };
        if position > count {
            return false;
        }
        if position == 0 {
            return self.insert_at_front(stock, train, wagon);
        }
        if position == count {
            return self.attach_to_rear(stock, train, wagon);
        }

        let Some(promote) = self.validate_attach(stock, train, wagon) else {
            return false;
        };
        let anchor = match self.train(train).and_then(|t| t.wagon_at(stock, position - 1)) {
            Some(w) => w.id,
            None => return false,
        };
        if promote {
            stock.remove_from_sequence(wagon);
        }

        let displaced = stock.detach_tail(anchor);
        stock.link(anchor, wagon);
        if let Some(displaced) = displaced {
            let tail = stock.last_in_chain(wagon);
            stock.link(tail, displaced);
        }
        true
    }

    /// Move exactly one wagon from one train to the rear of another.
    ///
    /// The wagon must currently ride in `from`; its successors stay
    /// behind, coupled to its former predecessor. The destination's attach
    /// rules are applied to the single wagon, not its tail. False with no
    /// change when `to` equals `from`, the wagon does not ride in `from`,
    /// or the destination refuses it.
    pub fn move_one_wagon(
        &mut self,
        stock: &mut RollingStock,
        from: TrainId,
        wagon: WagonId,
        to: TrainId,
    ) -> bool {
        if from == to {
            return false;
        }
        let Some(src) = self.train(from) else {
            return false;
        };
        let Some(dst) = self.train(to) else {
            return false;
        };
        if src.wagon_by_id(stock, wagon).is_none() {
            return false;
        }
        if !dst.accepts_chain(stock, wagon, 1) {
            return false;
        }

        // The source head moves on to the successor when the head leaves.
        let new_src_head = if src.head == Some(wagon) {
            stock.get(wagon).and_then(|w| w.next())
        } else {
            src.head
        };

        stock.remove_from_sequence(wagon);
        if let Some(t) = self.train_mut(from) {
            t.head = new_src_head;
        }
        self.couple_to_rear(stock, to, wagon);
        true
    }

    /// Split a train at `position`: the wagon there and its entire tail
    /// leave as one sequence and couple to the rear of `to`.
    ///
    /// `position` must name an attached wagon, and the whole departing
    /// sequence must pass the destination's attach rules. False with no
    /// change otherwise, or when `to` equals `from`.
    pub fn split_at_position(
        &mut self,
        stock: &mut RollingStock,
        from: TrainId,
        position: usize,
        to: TrainId,
    ) -> bool {
        if from == to {
            return false;
        }
        let Some(src) = self.train(from) else {
            return false;
        };
        let Some(dst) = self.train(to) else {
            return false;
        };
        let Some(split_head) = src.wagon_at(stock, position).map(|w| w.id) else {
            return false;
        };
        if !dst.accepts_chain(stock, split_head, stock.chain_length(split_head)) {
            return false;
        }

        if position == 0 {
            if let Some(t) = self.train_mut(from) {
                t.head = None;
            }
        } else {
            let _ = stock.detach_front(split_head);
        }
        self.couple_to_rear(stock, to, split_head);
        true
    }

    /// Reverse the order of the train's chain in place. Trains with zero
    /// or one wagon are left as they are. False only when no such train
    /// exists.
    pub fn reverse(&mut self, stock: &mut RollingStock, train: TrainId) -> bool {
        let Some(t) = self.train(train) else {
            return false;
        };
        let Some(head) = t.head else {
            return true;
        };
        let Some(w) = stock.get(head) else {
            return false;
        };
        if !w.has_next() {
            return true;
        }

        let new_head = stock.reverse_sequence(head);
        if let Some(t) = self.train_mut(train) {
            t.head = Some(new_head);
        }
        true
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    /// Shared precondition check for the attach-style operations. Returns
    /// whether the head needs promotion (it hangs behind a predecessor),
    /// or `None` when the operation must be refused. Read-only.
    ///
    /// A wagon that leads some train's consist is refused outright: whole
    /// consists change hands through [`move_one_wagon`] and
    /// [`split_at_position`], never through an attach.
    ///
    /// [`move_one_wagon`]: YardState::move_one_wagon
    /// [`split_at_position`]: YardState::split_at_position
    fn validate_attach(
        &self,
        stock: &RollingStock,
        train: TrainId,
        wagon: WagonId,
    ) -> Option<bool> {
        let t = self.train(train)?;
        let w = stock.get(wagon)?;
        if self.trains.iter().any(|held| held.head == Some(wagon)) {
            return None;
        }
        let promote = w.has_prev();
        let incoming_len = if promote {
            1
        } else {
            stock.chain_length(wagon)
        };
        if !t.accepts_chain(stock, wagon, incoming_len) {
            return None;
        }
        Some(promote)
    }

    /// Couple an already validated free-standing sequence to the rear of
    /// `train`.
    fn couple_to_rear(&mut self, stock: &mut RollingStock, train: TrainId, wagon: WagonId) {
        let Some(t) = self.train_mut(train) else {
            return;
        };
        match t.head {
            None => t.head = Some(wagon),
            Some(head) => {
                let last = stock.last_in_chain(head);
                stock.link(last, wagon);
            }
        }
    }
}
