// src/component/mod.rs

//! Registration of the desk height sensor with a host build framework.
//!
//! The host validates each user instance against [`config_schema`], makes
//! sure every component named in [`DEPENDENCIES`] is configured, then calls
//! [`to_code`] once per instance.

pub mod config;
pub mod error;
pub mod host;
pub mod registry;
pub mod schema;
pub mod value;

pub use config::{
    CapabilityConfig, ComponentConfig, DeskHeightConfig, HasIdentifier, HasUnit, IsLifecycleComponent,
    IsTransportDevice, SensorConfig, UartDeviceConfig,
};
pub use error::{ConfigError, RegistrationError};
pub use host::{BuildHost, ClassDecl};
pub use registry::{BuildRegistry, Registration, SensorHandle};
pub use schema::{Field, FieldKind, Schema, Validated};
pub use value::{ConfigValue, RawConfig};

use log::debug;

/// Name under which users configure this component.
pub const COMPONENT_NAME: &str = "desk_height";

/// Components that must be present in the same build.
pub const DEPENDENCIES: &[&str] = &["uart"];

/// The generated sensor type.
pub const DESK_HEIGHT_SENSOR_CLASS: ClassDecl = ClassDecl {
    namespace: "desk_height",
    name: "DeskHeightSensor",
    parents: &["sensor::Sensor", "Component", "uart::UARTDevice"],
};

/// Sensor schema, extended by the UART device and component schemas.
/// Nothing is added on top.
pub fn config_schema() -> Schema {
    DeskHeightConfig::schema()
}

/// Instantiates one configured desk height sensor: create it, register it as
/// a component, attach it to its UART. Strictly in that order; the first
/// failure aborts and is returned as is.
pub fn to_code<H: BuildHost>(config: &DeskHeightConfig, host: &mut H) -> Result<H::Handle, RegistrationError> {
    debug!(target: COMPONENT_NAME, "Generating {} '{}'", DESK_HEIGHT_SENSOR_CLASS, config.id());
    let var = host.new_sensor(&DESK_HEIGHT_SENSOR_CLASS, &config.sensor)?;
    host.register_component(&var, &config.component)?;
    host.register_uart_device(&var, &config.uart)?;
    Ok(var)
}
