//! Minimal host types for unit tests.

use std::cell::Cell;

use revenant_shared::Placement;

use crate::host::{EntityTemplate, PooledInstance};

/// Instance that records what the pool did to it.
#[derive(Debug, Clone)]
pub(crate) struct Dummy {
    pub kind: &'static str,
    pub active: bool,
    pub placement: Placement,
    pub activations: u32,
}

impl Dummy {
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            active: false,
            placement: Placement::IDENTITY,
            activations: 0,
        }
    }
}

impl PooledInstance for Dummy {
    fn set_active(&mut self, active: bool) {
        if active {
            self.activations += 1;
        }
        self.active = active;
    }

    fn set_placement(&mut self, placement: Placement) {
        self.placement = placement;
    }
}

/// Template counting how many instances it has produced.
#[derive(Debug)]
pub(crate) struct DummyTemplate {
    kind: &'static str,
    manufactured: Cell<u32>,
}

impl DummyTemplate {
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            manufactured: Cell::new(0),
        }
    }

    pub fn manufactured(&self) -> u32 {
        self.manufactured.get()
    }
}

impl EntityTemplate for DummyTemplate {
    type Instance = Dummy;

    fn manufacture(&self) -> Dummy {
        self.manufactured.set(self.manufactured.get() + 1);
        Dummy::new(self.kind)
    }
}
