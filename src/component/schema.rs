// src/component/schema.rs

//! Declarative configuration schemas.
//!
//! A [`Schema`] is an ordered list of [`Field`]s. Capability schemas are
//! combined with [`Schema::extend`], and the result validates a [`RawConfig`]
//! as a whole: unknown keys, missing required keys and badly typed values are
//! all rejected before anything gets instantiated.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use super::error::ConfigError;
use super::value::{ConfigValue, RawConfig};
use crate::common::id::ComponentId;

/// Shape of the value accepted for a field.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// A component identifier, see [`ComponentId`].
    Id,
    String,
    Bool,
    Int { min: i64, max: i64 },
    /// A number; integers are accepted.
    Float,
    /// `prefix:name`, e.g. `mdi:desk`.
    Icon,
    /// One string out of a fixed list.
    OneOf(&'static [&'static str]),
    /// A list, items are not inspected.
    List,
}

impl FieldKind {
    fn expected(&self) -> &'static str {
        match self {
            FieldKind::Id | FieldKind::String | FieldKind::Icon | FieldKind::OneOf(_) => "string",
            FieldKind::Bool => "boolean",
            FieldKind::Int { .. } => "integer",
            FieldKind::Float => "float",
            FieldKind::List => "list",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Field {
    pub key: &'static str,
    pub required: bool,
    pub kind: FieldKind,
}

impl Field {
    pub const fn required(key: &'static str, kind: FieldKind) -> Self {
        Field { key, required: true, kind }
    }

    pub const fn optional(key: &'static str, kind: FieldKind) -> Self {
        Field { key, required: false, kind }
    }

    fn check(&self, value: &ConfigValue) -> Result<(), ConfigError> {
        let key = self.key;
        let type_error = || ConfigError::InvalidType {
            key,
            expected: self.kind.expected(),
            found: value.type_name(),
        };

        match self.kind {
            FieldKind::Id => {
                let s = value.as_str().ok_or_else(type_error)?;
                ComponentId::new(s).map_err(|source| ConfigError::InvalidId { key, source })?;
            }
            FieldKind::String => {
                value.as_str().ok_or_else(type_error)?;
            }
            FieldKind::Bool => {
                value.as_bool().ok_or_else(type_error)?;
            }
            FieldKind::Int { min, max } => {
                let v = value.as_int().ok_or_else(type_error)?;
                if v < min || v > max {
                    return Err(ConfigError::OutOfRange { key, value: v, min, max });
                }
            }
            FieldKind::Float => {
                value.as_float().ok_or_else(type_error)?;
            }
            FieldKind::Icon => {
                let s = value.as_str().ok_or_else(type_error)?;
                if !is_valid_icon(s) {
                    return Err(ConfigError::InvalidIcon { key, value: s.to_string() });
                }
            }
            FieldKind::List => {
                value.as_list().ok_or_else(type_error)?;
            }
            FieldKind::OneOf(choices) => {
                let s = value.as_str().ok_or_else(type_error)?;
                if !choices.contains(&s) {
                    return Err(ConfigError::InvalidChoice { key, value: s.to_string() });
                }
            }
        }
        Ok(())
    }
}

fn is_valid_icon(s: &str) -> bool {
    match s.split_once(':') {
        Some((prefix, name)) => !prefix.is_empty() && !name.is_empty() && !name.contains(':'),
        None => false,
    }
}

/// An ordered set of fields, keyed by name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    pub fn new(fields: &[Field]) -> Self {
        Schema::default().extend_fields(fields)
    }

    /// Adds every field of `other`. A field whose key already exists replaces
    /// the earlier definition in place.
    pub fn extend(self, other: Schema) -> Self {
        self.extend_fields(&other.fields)
    }

    fn extend_fields(mut self, fields: &[Field]) -> Self {
        for field in fields {
            match self.fields.iter_mut().find(|f| f.key == field.key) {
                Some(existing) => *existing = *field,
                None => self.fields.push(*field),
            }
        }
        self
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, key: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.field(key).is_some()
    }

    /// Validates `raw` against every field.
    ///
    /// Unknown keys are reported first, then fields in declaration order.
    pub fn validate<'a>(&self, raw: &'a RawConfig) -> Result<Validated<'a>, ConfigError> {
        if let Some(key) = raw.keys().find(|k| !self.contains(k)) {
            return Err(ConfigError::UnknownField { key: key.clone() });
        }

        for field in &self.fields {
            match raw.get(field.key) {
                Some(value) => field.check(value)?,
                None if field.required => return Err(ConfigError::MissingField { key: field.key }),
                None => {}
            }
        }

        Ok(Validated { raw })
    }
}

/// A raw configuration that passed [`Schema::validate`].
///
/// The typed getters return `None` for absent keys; values of the wrong type
/// cannot occur since validation already rejected them.
#[derive(Debug, Copy, Clone)]
pub struct Validated<'a> {
    raw: &'a RawConfig,
}

impl<'a> Validated<'a> {
    pub fn raw(&self) -> &'a RawConfig {
        self.raw
    }

    pub fn str(&self, key: &str) -> Option<&'a str> {
        self.raw.get(key).and_then(ConfigValue::as_str)
    }

    pub fn string(&self, key: &str) -> Option<String> {
        self.str(key).map(String::from)
    }

    pub fn bool(&self, key: &str) -> Option<bool> {
        self.raw.get(key).and_then(ConfigValue::as_bool)
    }

    pub fn int(&self, key: &str) -> Option<i64> {
        self.raw.get(key).and_then(ConfigValue::as_int)
    }

    pub fn float(&self, key: &str) -> Option<f64> {
        self.raw.get(key).and_then(ConfigValue::as_float)
    }

    pub fn list(&self, key: &str) -> Option<&'a [ConfigValue]> {
        self.raw.get(key).and_then(ConfigValue::as_list)
    }

    pub fn id(&self, key: &'static str) -> Result<Option<ComponentId>, ConfigError> {
        self.str(key)
            .map(|s| ComponentId::new(s).map_err(|source| ConfigError::InvalidId { key, source }))
            .transpose()
    }

    pub fn require_id(&self, key: &'static str) -> Result<ComponentId, ConfigError> {
        self.id(key)?.ok_or(ConfigError::MissingField { key })
    }
}
