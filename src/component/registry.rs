// src/component/registry.rs

//! An in-memory [`BuildHost`].
//!
//! Runs the whole build pass for desk height instances: dependency check,
//! schema validation, global ID uniqueness, then [`to_code`] per instance.
//! Every registration call is kept as a [`Registration`] record, in call
//! order, which is what a code generator would turn into setup code.

use alloc::collections::BTreeSet;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use log::{debug, info};
use serde::Serialize;

use super::config::{DeskHeightConfig, HasIdentifier, HasUnit, IsLifecycleComponent, IsTransportDevice};
use super::error::RegistrationError;
use super::host::{BuildHost, ClassDecl};
use super::value::RawConfig;
use super::{to_code, COMPONENT_NAME, DEPENDENCIES};
use crate::common::id::ComponentId;
use crate::sensor::setup_priority;

/// Handle of a generated sensor instance.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SensorHandle {
    pub id: ComponentId,
    /// Distinct for every `new_sensor` call, even with the same ID.
    pub instance: usize,
}

/// One registration side effect.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Registration {
    NewSensor {
        instance: usize,
        id: String,
        class: String,
        name: Option<String>,
        unit_of_measurement: Option<String>,
        accuracy_decimals: Option<u8>,
    },
    RegisterComponent {
        instance: usize,
        setup_priority: f32,
    },
    RegisterUartDevice {
        instance: usize,
        uart_id: String,
    },
}

impl Registration {
    pub fn instance(&self) -> usize {
        match self {
            Registration::NewSensor { instance, .. }
            | Registration::RegisterComponent { instance, .. }
            | Registration::RegisterUartDevice { instance, .. } => *instance,
        }
    }
}

#[derive(Debug, Default)]
pub struct BuildRegistry {
    /// Component domains present in the build, e.g. `uart`.
    domains: BTreeSet<&'static str>,
    /// Every ID taken so far, across all components.
    ids: BTreeSet<ComponentId>,
    uarts: BTreeSet<ComponentId>,
    records: Vec<Registration>,
    next_instance: usize,
}

impl BuildRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a UART bus to the build.
    pub fn declare_uart(&mut self, id: &str) -> Result<ComponentId, RegistrationError> {
        let id = ComponentId::new(id)
            .map_err(|source| RegistrationError::InvalidId { id: id.to_string(), source })?;
        if !self.ids.insert(id) {
            return Err(RegistrationError::DuplicateId(id));
        }
        self.uarts.insert(id);
        self.domains.insert("uart");
        Ok(id)
    }

    /// Validation pass: checks dependencies, every instance against the
    /// schema, that each `uart_id` names a declared UART and that no ID is
    /// used twice. Registers nothing.
    pub fn load(&self, instances: &[RawConfig]) -> Result<Vec<DeskHeightConfig>, RegistrationError> {
        if instances.is_empty() {
            return Ok(Vec::new());
        }

        for &dependency in DEPENDENCIES {
            if !self.domains.contains(dependency) {
                return Err(RegistrationError::MissingDependency { component: COMPONENT_NAME, dependency });
            }
        }

        let mut seen = BTreeSet::new();
        let mut configs = Vec::with_capacity(instances.len());
        for (index, raw) in instances.iter().enumerate() {
            let config = DeskHeightConfig::from_raw(raw)
                .map_err(|source| RegistrationError::Config { index, source })?;
            let id = *config.id();
            if self.ids.contains(&id) || !seen.insert(id) {
                return Err(RegistrationError::DuplicateId(id));
            }
            let uart_id = *config.uart_id();
            if !self.uarts.contains(&uart_id) {
                return Err(RegistrationError::UnknownUart { id, uart_id });
            }
            configs.push(config);
        }
        Ok(configs)
    }

    /// Full build pass: [`load`](Self::load), then [`to_code`] for every instance.
    ///
    /// All or nothing: on error, records and IDs of this pass are dropped again.
    pub fn build(&mut self, instances: &[RawConfig]) -> Result<Vec<SensorHandle>, RegistrationError> {
        let configs = self.load(instances)?;
        let records_before = self.records.len();

        let mut handles = Vec::with_capacity(configs.len());
        for config in &configs {
            match to_code(config, self) {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    self.records.truncate(records_before);
                    return Err(e);
                }
            }
        }

        self.ids.extend(configs.iter().map(|c| *c.id()));
        info!(target: COMPONENT_NAME, "Registered {} desk height sensor(s)", handles.len());
        Ok(handles)
    }

    pub fn records(&self) -> &[Registration] {
        &self.records
    }

    pub fn records_for(&self, handle: &SensorHandle) -> impl Iterator<Item = &Registration> + '_ {
        let instance = handle.instance;
        self.records.iter().filter(move |r| r.instance() == instance)
    }
}

impl BuildHost for BuildRegistry {
    type Handle = SensorHandle;

    fn new_sensor<C>(&mut self, class: &ClassDecl, config: &C) -> Result<SensorHandle, RegistrationError>
    where
        C: HasIdentifier + HasUnit,
    {
        let handle = SensorHandle { id: *config.id(), instance: self.next_instance };
        self.next_instance += 1;
        debug!(target: COMPONENT_NAME, "new_sensor {} -> {:?}", class, handle);
        self.records.push(Registration::NewSensor {
            instance: handle.instance,
            id: handle.id.to_string(),
            class: class.to_string(),
            name: config.name().map(String::from),
            unit_of_measurement: config.unit_of_measurement().map(String::from),
            accuracy_decimals: config.accuracy_decimals(),
        });
        Ok(handle)
    }

    fn register_component<C>(&mut self, handle: &SensorHandle, config: &C) -> Result<(), RegistrationError>
    where
        C: IsLifecycleComponent,
    {
        self.records.push(Registration::RegisterComponent {
            instance: handle.instance,
            setup_priority: config.setup_priority().unwrap_or(setup_priority::DATA),
        });
        Ok(())
    }

    fn register_uart_device<C>(&mut self, handle: &SensorHandle, config: &C) -> Result<(), RegistrationError>
    where
        C: IsTransportDevice,
    {
        let uart_id = *config.uart_id();
        if !self.uarts.contains(&uart_id) {
            return Err(RegistrationError::UnknownUart { id: handle.id, uart_id });
        }
        self.records.push(Registration::RegisterUartDevice {
            instance: handle.instance,
            uart_id: uart_id.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::error::ConfigError;

    fn raw(json: &str) -> RawConfig {
        serde_json::from_str(json).unwrap()
    }

    fn registry() -> BuildRegistry {
        let mut r = BuildRegistry::new();
        r.declare_uart("uart_bus").unwrap();
        r
    }

    #[test]
    fn builds_minimal_instance() {
        let mut r = registry();
        let handles = r.build(&[raw(r#"{"id": "desk", "uart_id": "uart_bus"}"#)]).unwrap();
        assert_eq!(handles.len(), 1);
        assert_eq!(
            r.records(),
            [
                Registration::NewSensor {
                    instance: 0,
                    id: "desk".into(),
                    class: "desk_height::DeskHeightSensor".into(),
                    name: None,
                    unit_of_measurement: None,
                    accuracy_decimals: None,
                },
                Registration::RegisterComponent { instance: 0, setup_priority: 600.0 },
                Registration::RegisterUartDevice { instance: 0, uart_id: "uart_bus".into() },
            ]
        );
    }

    #[test]
    fn setup_priority_override() {
        let mut r = registry();
        r.build(&[raw(r#"{"id": "desk", "uart_id": "uart_bus", "setup_priority": -100}"#)]).unwrap();
        assert_eq!(r.records()[1], Registration::RegisterComponent { instance: 0, setup_priority: -100.0 });
    }

    #[test]
    fn requires_uart_component() {
        let mut r = BuildRegistry::new();
        let err = r.build(&[raw(r#"{"id": "desk", "uart_id": "uart_bus"}"#)]).unwrap_err();
        assert_eq!(err, RegistrationError::MissingDependency { component: "desk_height", dependency: "uart" });
        assert!(r.records().is_empty());

        // Nothing to configure, nothing required.
        assert!(r.build(&[]).unwrap().is_empty());
    }

    #[test]
    fn unknown_uart_fails_registration() {
        let mut r = registry();
        let err = r.build(&[raw(r#"{"id": "desk", "uart_id": "other_bus"}"#)]).unwrap_err();
        assert!(matches!(err, RegistrationError::UnknownUart { id, uart_id }
            if id.as_str() == "desk" && uart_id.as_str() == "other_bus"));
    }

    #[test]
    fn failed_build_leaves_no_trace() {
        let mut r = registry();
        let err = r.build(&[raw(r#"{"id": "desk", "uart_id": "typo_bus"}"#)]).unwrap_err();
        assert_eq!(err.to_string(), "desk: couldn't find UART typo_bus");
        assert!(r.records().is_empty());

        // The ID is still free.
        let handles = r.build(&[raw(r#"{"id": "desk", "uart_id": "uart_bus"}"#)]).unwrap();
        assert_eq!(handles[0].id.as_str(), "desk");
        assert_eq!(r.records().len(), 3);
    }

    #[test]
    fn later_unknown_uart_rejects_whole_build() {
        let mut r = registry();
        let err = r
            .build(&[
                raw(r#"{"id": "desk_a", "uart_id": "uart_bus"}"#),
                raw(r#"{"id": "desk_b", "uart_id": "typo_bus"}"#),
            ])
            .unwrap_err();
        assert!(matches!(err, RegistrationError::UnknownUart { id, .. } if id.as_str() == "desk_b"));
        assert!(r.records().is_empty());
        assert!(r.build(&[raw(r#"{"id": "desk_a", "uart_id": "uart_bus"}"#)]).is_ok());
    }

    #[test]
    fn validation_runs_before_instantiation() {
        let mut r = registry();
        let err = r
            .build(&[
                raw(r#"{"id": "desk_a", "uart_id": "uart_bus"}"#),
                raw(r#"{"id": "desk_b"}"#),
            ])
            .unwrap_err();
        assert_eq!(
            err,
            RegistrationError::Config { index: 1, source: ConfigError::MissingField { key: "uart_id" } }
        );
        // The valid first instance was not generated either.
        assert!(r.records().is_empty());
    }

    #[test]
    fn ids_are_globally_unique() {
        let mut r = registry();
        let err = r
            .build(&[
                raw(r#"{"id": "desk", "uart_id": "uart_bus"}"#),
                raw(r#"{"id": "desk", "uart_id": "uart_bus"}"#),
            ])
            .unwrap_err();
        assert!(matches!(err, RegistrationError::DuplicateId(id) if id.as_str() == "desk"));

        // Clashing with another component's ID counts too.
        let err = r.build(&[raw(r#"{"id": "uart_bus", "uart_id": "uart_bus"}"#)]).unwrap_err();
        assert!(matches!(err, RegistrationError::DuplicateId(id) if id.as_str() == "uart_bus"));

        assert!(matches!(r.declare_uart("uart_bus"), Err(RegistrationError::DuplicateId(_))));
        assert!(matches!(r.declare_uart("uart-2"), Err(RegistrationError::InvalidId { .. })));
    }

    #[test]
    fn separate_builds_share_the_id_space() {
        let mut r = registry();
        r.build(&[raw(r#"{"id": "desk", "uart_id": "uart_bus"}"#)]).unwrap();
        assert!(matches!(
            r.build(&[raw(r#"{"id": "desk", "uart_id": "uart_bus"}"#)]),
            Err(RegistrationError::DuplicateId(_))
        ));
    }

    #[test]
    fn records_per_handle() {
        let mut r = registry();
        let handles = r
            .build(&[
                raw(r#"{"id": "desk_a", "uart_id": "uart_bus"}"#),
                raw(r#"{"id": "desk_b", "uart_id": "uart_bus", "name": "Standing desk", "unit_of_measurement": "cm", "accuracy_decimals": 1}"#),
            ])
            .unwrap();
        let b: Vec<_> = r.records_for(&handles[1]).collect();
        assert_eq!(b.len(), 3);
        assert!(matches!(b[0], Registration::NewSensor { id, name: Some(name), accuracy_decimals: Some(1), .. }
            if id == "desk_b" && name == "Standing desk"));
    }

    #[test]
    fn records_serialize() {
        let mut r = registry();
        r.build(&[raw(r#"{"id": "desk", "uart_id": "uart_bus"}"#)]).unwrap();
        let json = serde_json::to_string(&r.records()[2]).unwrap();
        assert_eq!(json, r#"{"op":"register_uart_device","instance":0,"uart_id":"uart_bus"}"#);
    }
}
