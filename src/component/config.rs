// src/component/config.rs

// Typed configuration for each capability the desk height component has,
// and the merged configuration `to_code` consumes.

use alloc::string::String;
use alloc::vec::Vec;

use super::error::ConfigError;
use super::schema::{Field, FieldKind, Schema, Validated};
use super::value::{ConfigValue, RawConfig};
use crate::common::id::ComponentId;

/// A capability with its own slice of the configuration.
pub trait CapabilityConfig: Sized {
    /// Fields this capability accepts.
    fn schema() -> Schema;

    /// Extracts the capability's fields from an already validated configuration.
    fn from_validated(config: &Validated<'_>) -> Result<Self, ConfigError>;
}

// --- Capabilities, as seen by the host ---

pub trait HasIdentifier {
    fn id(&self) -> &ComponentId;
    fn name(&self) -> Option<&str>;
}

pub trait HasUnit {
    fn unit_of_measurement(&self) -> Option<&str>;
    fn accuracy_decimals(&self) -> Option<u8>;
}

pub trait IsTransportDevice {
    /// The UART bus this device talks over.
    fn uart_id(&self) -> &ComponentId;
}

pub trait IsLifecycleComponent {
    /// Overrides the component's own setup priority when set.
    fn setup_priority(&self) -> Option<f32>;
}

// --- Sensor ---

pub const DEVICE_CLASSES: &[&str] = &[
    "apparent_power",
    "aqi",
    "atmospheric_pressure",
    "battery",
    "carbon_dioxide",
    "carbon_monoxide",
    "current",
    "distance",
    "duration",
    "energy",
    "frequency",
    "gas",
    "humidity",
    "illuminance",
    "moisture",
    "power",
    "power_factor",
    "pressure",
    "signal_strength",
    "speed",
    "temperature",
    "voltage",
    "volume",
    "weight",
];

const STATE_CLASSES: &[&str] = &["measurement", "total", "total_increasing"];
const ENTITY_CATEGORIES: &[&str] = &["config", "diagnostic"];

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum StateClass {
    Measurement,
    Total,
    TotalIncreasing,
}

impl StateClass {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "measurement" => Some(StateClass::Measurement),
            "total" => Some(StateClass::Total),
            "total_increasing" => Some(StateClass::TotalIncreasing),
            _ => None,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum EntityCategory {
    Config,
    Diagnostic,
}

impl EntityCategory {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "config" => Some(EntityCategory::Config),
            "diagnostic" => Some(EntityCategory::Diagnostic),
            _ => None,
        }
    }
}

/// Fields of the generic sensor capability.
///
/// `filters` is carried through as written; the host applies it to the
/// published state.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorConfig {
    pub id: ComponentId,
    pub name: Option<String>,
    pub internal: bool,
    pub disabled_by_default: bool,
    pub force_update: bool,
    pub unit_of_measurement: Option<String>,
    pub accuracy_decimals: Option<u8>,
    pub icon: Option<String>,
    pub device_class: Option<String>,
    pub state_class: Option<StateClass>,
    pub entity_category: Option<EntityCategory>,
    pub filters: Vec<ConfigValue>,
}

impl CapabilityConfig for SensorConfig {
    fn schema() -> Schema {
        Schema::new(&[
            Field::required("id", FieldKind::Id),
            Field::optional("name", FieldKind::String),
            Field::optional("internal", FieldKind::Bool),
            Field::optional("disabled_by_default", FieldKind::Bool),
            Field::optional("force_update", FieldKind::Bool),
            Field::optional("unit_of_measurement", FieldKind::String),
            Field::optional("accuracy_decimals", FieldKind::Int { min: 0, max: 10 }),
            Field::optional("icon", FieldKind::Icon),
            Field::optional("device_class", FieldKind::OneOf(DEVICE_CLASSES)),
            Field::optional("state_class", FieldKind::OneOf(STATE_CLASSES)),
            Field::optional("entity_category", FieldKind::OneOf(ENTITY_CATEGORIES)),
            Field::optional("filters", FieldKind::List),
        ])
    }

    fn from_validated(config: &Validated<'_>) -> Result<Self, ConfigError> {
        let accuracy_decimals = config
            .int("accuracy_decimals")
            .map(|v| {
                u8::try_from(v).map_err(|_| ConfigError::OutOfRange {
                    key: "accuracy_decimals",
                    value: v,
                    min: 0,
                    max: 10,
                })
            })
            .transpose()?;

        Ok(SensorConfig {
            id: config.require_id("id")?,
            name: config.string("name"),
            internal: config.bool("internal").unwrap_or(false),
            disabled_by_default: config.bool("disabled_by_default").unwrap_or(false),
            force_update: config.bool("force_update").unwrap_or(false),
            unit_of_measurement: config.string("unit_of_measurement"),
            accuracy_decimals,
            icon: config.string("icon"),
            device_class: config.string("device_class"),
            state_class: config.str("state_class").and_then(StateClass::parse),
            entity_category: config.str("entity_category").and_then(EntityCategory::parse),
            filters: config.list("filters").map(<[ConfigValue]>::to_vec).unwrap_or_default(),
        })
    }
}

impl HasIdentifier for SensorConfig {
    fn id(&self) -> &ComponentId {
        &self.id
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl HasUnit for SensorConfig {
    fn unit_of_measurement(&self) -> Option<&str> {
        self.unit_of_measurement.as_deref()
    }

    fn accuracy_decimals(&self) -> Option<u8> {
        self.accuracy_decimals
    }
}

// --- UART device ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UartDeviceConfig {
    pub uart_id: ComponentId,
}

impl CapabilityConfig for UartDeviceConfig {
    fn schema() -> Schema {
        Schema::new(&[Field::required("uart_id", FieldKind::Id)])
    }

    fn from_validated(config: &Validated<'_>) -> Result<Self, ConfigError> {
        Ok(UartDeviceConfig { uart_id: config.require_id("uart_id")? })
    }
}

impl IsTransportDevice for UartDeviceConfig {
    fn uart_id(&self) -> &ComponentId {
        &self.uart_id
    }
}

// --- Lifecycle component ---

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComponentConfig {
    pub setup_priority: Option<f32>,
}

impl CapabilityConfig for ComponentConfig {
    fn schema() -> Schema {
        Schema::new(&[Field::optional("setup_priority", FieldKind::Float)])
    }

    fn from_validated(config: &Validated<'_>) -> Result<Self, ConfigError> {
        Ok(ComponentConfig { setup_priority: config.float("setup_priority").map(|p| p as f32) })
    }
}

impl IsLifecycleComponent for ComponentConfig {
    fn setup_priority(&self) -> Option<f32> {
        self.setup_priority
    }
}

// --- Desk height ---

/// Complete configuration of one desk height sensor instance.
#[derive(Debug, Clone, PartialEq)]
pub struct DeskHeightConfig {
    pub sensor: SensorConfig,
    pub uart: UartDeviceConfig,
    pub component: ComponentConfig,
}

impl DeskHeightConfig {
    /// Validates `raw` against the composed schema, then splits it per capability.
    pub fn from_raw(raw: &RawConfig) -> Result<Self, ConfigError> {
        let validated = Self::schema().validate(raw)?;
        Self::from_validated(&validated)
    }
}

impl CapabilityConfig for DeskHeightConfig {
    fn schema() -> Schema {
        SensorConfig::schema()
            .extend(UartDeviceConfig::schema())
            .extend(ComponentConfig::schema())
    }

    fn from_validated(config: &Validated<'_>) -> Result<Self, ConfigError> {
        Ok(DeskHeightConfig {
            sensor: SensorConfig::from_validated(config)?,
            uart: UartDeviceConfig::from_validated(config)?,
            component: ComponentConfig::from_validated(config)?,
        })
    }
}

impl HasIdentifier for DeskHeightConfig {
    fn id(&self) -> &ComponentId {
        self.sensor.id()
    }

    fn name(&self) -> Option<&str> {
        self.sensor.name()
    }
}

impl HasUnit for DeskHeightConfig {
    fn unit_of_measurement(&self) -> Option<&str> {
        self.sensor.unit_of_measurement()
    }

    fn accuracy_decimals(&self) -> Option<u8> {
        self.sensor.accuracy_decimals()
    }
}

impl IsTransportDevice for DeskHeightConfig {
    fn uart_id(&self) -> &ComponentId {
        self.uart.uart_id()
    }
}

impl IsLifecycleComponent for DeskHeightConfig {
    fn setup_priority(&self) -> Option<f32> {
        self.component.setup_priority()
    }
}
