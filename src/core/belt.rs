use super::errors::SimulationError;
use super::types::{Component, Slot};
use log::trace;
use std::collections::VecDeque;

/// Fixed-length conveyor belt
///
/// Position 0 is the entry, position `len - 1` the exit. Odd positions are
/// pickup positions where workers take raw components; even positions are
/// delivery positions where finished products are deposited.
#[derive(Debug, Clone)]
pub struct Belt {
    slots: VecDeque<Slot>,
    unused_a: u64,
    unused_b: u64,
    products_c: u64,
}

impl Belt {
    /// Create an empty belt with `length` positions
    pub fn new(length: usize) -> Result<Self, SimulationError> {
        if length == 0 {
            return Err(SimulationError::InvalidConfiguration(
                "belt length must be positive".to_string(),
            ));
        }
        Ok(Self {
            slots: VecDeque::from(vec![Slot::Empty; length]),
            unused_a: 0,
            unused_b: 0,
            products_c: 0,
        })
    }

    /// Shift every item one position toward the exit and insert `new_item`
    /// at the entry. Returns whatever fell off the exit.
    ///
    /// An evicted component bumps the matching unused counter. An evicted
    /// product was already counted when placed and is not counted again.
    pub fn advance(&mut self, new_item: Slot) -> Slot {
        let evicted = self.slots.pop_back().unwrap_or_default();
        self.slots.push_front(new_item);

        match evicted {
            Slot::ComponentA => self.unused_a += 1,
            Slot::ComponentB => self.unused_b += 1,
            Slot::Product => trace!("Uncollected product left the belt"),
            Slot::Empty => {}
        }
        evicted
    }

    /// Odd positions, scanned from the entry
    pub fn pickup_positions(&self) -> impl Iterator<Item = usize> {
        (1..self.slots.len()).step_by(2)
    }

    /// Even positions, scanned from the entry
    pub fn delivery_positions(&self) -> impl Iterator<Item = usize> {
        (0..self.slots.len()).step_by(2)
    }

    pub fn is_pickup_position(index: usize) -> bool {
        index % 2 == 1
    }

    /// Raw component at a pickup position, without removing it
    pub fn peek_component(&self, index: usize) -> Option<Component> {
        if !Self::is_pickup_position(index) {
            return None;
        }
        self.slots.get(index).and_then(Slot::component)
    }

    /// Remove the raw component at a pickup position
    ///
    /// Delivery positions and non-component slots are left untouched.
    pub fn take_component(&mut self, index: usize) -> Option<Component> {
        let component = self.peek_component(index)?;
        self.slots[index] = Slot::Empty;
        Some(component)
    }

    /// Deposit a product into the first empty delivery position from the
    /// entry. Returns the position used, or `None` if every delivery
    /// position is occupied.
    pub fn place_product(&mut self) -> Option<usize> {
        let position = self
            .delivery_positions()
            .find(|&index| self.slots[index].is_empty())?;
        self.slots[position] = Slot::Product;
        self.products_c += 1;
        Some(position)
    }

    pub fn has_free_delivery_position(&self) -> bool {
        self.delivery_positions().any(|index| self.slots[index].is_empty())
    }

    /// Overwrite one position directly, bypassing the step cycle
    pub fn set_slot(&mut self, index: usize, slot: Slot) -> Result<(), SimulationError> {
        let target = self
            .slots
            .get_mut(index)
            .ok_or(SimulationError::SlotOutOfRange(index))?;
        *target = slot;
        Ok(())
    }

    /// Clear every position and zero every counter
    pub fn reset(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = Slot::Empty);
        self.unused_a = 0;
        self.unused_b = 0;
        self.products_c = 0;
    }

    /// Positions from entry to exit
    pub fn slots(&self) -> &VecDeque<Slot> {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when no position holds anything
    pub fn is_clear(&self) -> bool {
        self.slots.iter().all(Slot::is_empty)
    }

    pub fn unused_a(&self) -> u64 {
        self.unused_a
    }

    pub fn unused_b(&self) -> u64 {
        self.unused_b
    }

    pub fn products_c(&self) -> u64 {
        self.products_c
    }
}
