// src/component/host.rs

use core::fmt;

use super::config::{HasIdentifier, HasUnit, IsLifecycleComponent, IsTransportDevice};
use super::error::RegistrationError;

/// Declaration of a generated class: where it lives and which host base
/// classes it derives from.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ClassDecl {
    pub namespace: &'static str,
    pub name: &'static str,
    pub parents: &'static [&'static str],
}

impl ClassDecl {
    pub fn inherits(&self, parent: &str) -> bool {
        self.parents.contains(&parent)
    }
}

impl fmt::Display for ClassDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.namespace, self.name)
    }
}

/// The registration primitives a host build framework offers a component.
///
/// Each call is one build-time side effect; the handle returned by
/// [`BuildHost::new_sensor`] refers to the instance the host generates.
pub trait BuildHost {
    type Handle;

    /// Creates a sensor instance of `class` from its identifier and unit metadata.
    fn new_sensor<C>(&mut self, class: &ClassDecl, config: &C) -> Result<Self::Handle, RegistrationError>
    where
        C: HasIdentifier + HasUnit;

    /// Schedules the instance's lifecycle hooks (setup, loop).
    fn register_component<C>(&mut self, handle: &Self::Handle, config: &C) -> Result<(), RegistrationError>
    where
        C: IsLifecycleComponent;

    /// Wires the configured UART bus into the instance.
    fn register_uart_device<C>(&mut self, handle: &Self::Handle, config: &C) -> Result<(), RegistrationError>
    where
        C: IsTransportDevice;
}
