use std::collections::BTreeMap;

use crate::catalog::ResourceKind;

/// Integer stock per resource kind. Amounts never drop below zero and never
/// exceed a capacity when one is set.
#[derive(Debug, Clone, Default)]
pub struct ResourceLedger {
    amounts: BTreeMap<ResourceKind, i64>,
    lifetime: BTreeMap<ResourceKind, i64>,
    capacities: BTreeMap<ResourceKind, i64>,
}

impl ResourceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces every stock with `starting`. Lifetime totals and capacities
    /// are cleared; starting stock does not count as gained.
    pub fn reset(&mut self, starting: &BTreeMap<ResourceKind, i64>) {
        self.amounts.clear();
        self.lifetime.clear();
        self.capacities.clear();
        for (kind, amount) in starting {
            self.amounts.insert(*kind, (*amount).max(0));
        }
    }

    pub fn get(&self, kind: ResourceKind) -> i64 {
        self.amounts.get(&kind).copied().unwrap_or(0)
    }

    pub fn lifetime_total(&self, kind: ResourceKind) -> i64 {
        self.lifetime.get(&kind).copied().unwrap_or(0)
    }

    pub fn capacity(&self, kind: ResourceKind) -> Option<i64> {
        self.capacities.get(&kind).copied()
    }

    pub fn set(&mut self, kind: ResourceKind, amount: i64) {
        let mut clamped = amount.max(0);
        if let Some(capacity) = self.capacity(kind) {
            clamped = clamped.min(capacity);
        }
        let previous = self.get(kind);
        if clamped > previous {
            *self.lifetime.entry(kind).or_insert(0) += clamped - previous;
        }
        self.amounts.insert(kind, clamped);
    }

    pub fn update(&mut self, kind: ResourceKind, delta: i64) {
        self.set(kind, self.get(kind).saturating_add(delta));
    }

    /// Sets the upper bound for `kind` and re-clamps the current stock.
    pub fn set_capacity(&mut self, kind: ResourceKind, capacity: i64) {
        self.capacities.insert(kind, capacity.max(0));
        self.set(kind, self.get(kind));
    }

    /// First cost entry the ledger cannot cover, in cost order.
    pub fn first_shortfall(&self, cost: &[(ResourceKind, i64)]) -> Option<ResourceKind> {
        cost.iter()
            .find(|(kind, amount)| self.get(*kind) < *amount)
            .map(|(kind, _)| *kind)
    }

    pub fn can_afford(&self, cost: &[(ResourceKind, i64)]) -> bool {
        self.first_shortfall(cost).is_none()
    }

    /// Deducts every entry of `cost`, or nothing at all.
    pub fn pay(&mut self, cost: &[(ResourceKind, i64)]) -> Result<(), ResourceKind> {
        if let Some(kind) = self.first_shortfall(cost) {
            return Err(kind);
        }
        for (kind, amount) in cost {
            self.update(*kind, -amount);
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, i64)> + '_ {
        self.amounts.iter().map(|(kind, amount)| (*kind, *amount))
    }
}
