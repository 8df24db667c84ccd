//! End-to-end build passes through the in-memory registry.

use desk_height::component::{
    config_schema, to_code, BuildRegistry, ConfigError, DeskHeightConfig, RawConfig, Registration, RegistrationError,
    DESK_HEIGHT_SENSOR_CLASS,
};
use desk_height::sensor::setup_priority;

fn instances(json: &str) -> Vec<RawConfig> {
    serde_json::from_str(json).unwrap()
}

fn with_uart() -> BuildRegistry {
    let mut registry = BuildRegistry::new();
    registry.declare_uart("uart_bus").unwrap();
    registry
}

#[test]
fn minimal_instance_registers_in_order() {
    let mut registry = with_uart();
    let handles = registry.build(&instances(r#"[{"id": "desk", "uart_id": "uart_bus"}]"#)).unwrap();

    assert_eq!(handles.len(), 1);
    assert_eq!(handles[0].id.as_str(), "desk");

    let ops: Vec<_> = registry
        .records()
        .iter()
        .map(|r| match r {
            Registration::NewSensor { class, .. } => class.as_str(),
            Registration::RegisterComponent { .. } => "component",
            Registration::RegisterUartDevice { .. } => "uart",
        })
        .collect();
    assert_eq!(ops, ["desk_height::DeskHeightSensor", "component", "uart"]);
    assert!(registry.records().iter().all(|r| r.instance() == handles[0].instance));
    assert_eq!(
        registry.records()[1],
        Registration::RegisterComponent { instance: handles[0].instance, setup_priority: setup_priority::DATA }
    );
}

#[test]
fn invalid_instances_never_reach_to_code() {
    let cases = [
        (r#"[{"id": "desk"}]"#, ConfigError::MissingField { key: "uart_id" }),
        (r#"[{"uart_id": "uart_bus"}]"#, ConfigError::MissingField { key: "id" }),
        (
            r#"[{"id": "desk", "uart_id": "uart_bus", "update_interval": "1s"}]"#,
            ConfigError::UnknownField { key: "update_interval".into() },
        ),
        (
            r#"[{"id": "desk", "uart_id": "uart_bus", "accuracy_decimals": -1}]"#,
            ConfigError::OutOfRange { key: "accuracy_decimals", value: -1, min: 0, max: 10 },
        ),
        (
            r#"[{"id": "desk", "uart_id": "uart_bus", "device_class": "height"}]"#,
            ConfigError::InvalidChoice { key: "device_class", value: "height".into() },
        ),
    ];

    for (json, expected) in cases {
        let mut registry = with_uart();
        let err = registry.build(&instances(json)).unwrap_err();
        assert_eq!(err, RegistrationError::Config { index: 0, source: expected }, "{json}");
        assert!(registry.records().is_empty(), "{json}");
    }
}

#[test]
fn uart_component_is_required() {
    let mut registry = BuildRegistry::new();
    let err = registry.build(&instances(r#"[{"id": "desk", "uart_id": "uart_bus"}]"#)).unwrap_err();
    assert_eq!(err.to_string(), "component desk_height requires component uart");
    assert!(registry.records().is_empty());
}

#[test]
fn duplicate_ids_are_rejected() {
    let mut registry = with_uart();
    let err = registry
        .build(&instances(
            r#"[{"id": "desk", "uart_id": "uart_bus"}, {"id": "desk", "uart_id": "uart_bus"}]"#,
        ))
        .unwrap_err();
    assert_eq!(err.to_string(), "ID desk redefined");
    assert!(registry.records().is_empty());
}

#[test]
fn two_desks_on_two_buses() {
    let mut registry = with_uart();
    registry.declare_uart("uart_b").unwrap();
    let handles = registry
        .build(&instances(
            r#"[{"id": "desk_a", "uart_id": "uart_bus"},
                {"id": "desk_b", "uart_id": "uart_b", "setup_priority": 250.5}]"#,
        ))
        .unwrap();

    assert_eq!(registry.records().len(), 6);
    assert_ne!(handles[0].instance, handles[1].instance);
    let b: Vec<_> = registry.records_for(&handles[1]).cloned().collect();
    assert_eq!(b[1], Registration::RegisterComponent { instance: handles[1].instance, setup_priority: 250.5 });
    assert_eq!(b[2], Registration::RegisterUartDevice { instance: handles[1].instance, uart_id: "uart_b".into() });
}

#[test]
fn rerunning_to_code_yields_independent_instances() {
    let mut registry = with_uart();
    let raw = instances(r#"[{"id": "desk", "uart_id": "uart_bus"}]"#);
    let config = DeskHeightConfig::from_raw(&raw[0]).unwrap();

    let first = to_code(&config, &mut registry).unwrap();
    let second = to_code(&config, &mut registry).unwrap();

    assert_eq!(first.id, second.id);
    assert_ne!(first.instance, second.instance);
    assert_eq!(registry.records().len(), 6);
    assert_eq!(registry.records_for(&first).count(), 3);
    assert_eq!(registry.records_for(&second).count(), 3);
}

#[test]
fn schema_and_class() {
    let keys: Vec<_> = config_schema().fields().iter().map(|f| f.key).collect();
    assert_eq!(keys.first(), Some(&"id"));
    assert!(keys.contains(&"uart_id"));
    assert!(keys.contains(&"setup_priority"));
    assert!(config_schema().field("uart_id").unwrap().required);

    assert_eq!(DESK_HEIGHT_SENSOR_CLASS.namespace, "desk_height");
    assert!(DESK_HEIGHT_SENSOR_CLASS.inherits("uart::UARTDevice"));
}

#[test]
fn records_serialize_to_json() {
    let mut registry = with_uart();
    registry
        .build(&instances(
            r#"[{"id": "desk", "uart_id": "uart_bus", "name": "Desk", "unit_of_measurement": "cm"}]"#,
        ))
        .unwrap();

    let json = serde_json::to_value(registry.records()).unwrap();
    assert_eq!(json[0]["op"], "new_sensor");
    assert_eq!(json[0]["id"], "desk");
    assert_eq!(json[0]["name"], "Desk");
    assert_eq!(json[0]["unit_of_measurement"], "cm");
    assert_eq!(json[0]["accuracy_decimals"], serde_json::Value::Null);
    assert_eq!(json[1]["op"], "register_component");
    assert_eq!(json[1]["setup_priority"], 600.0);
    assert_eq!(json[2]["op"], "register_uart_device");
}
