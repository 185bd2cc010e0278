// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # reflex-serd - TOML serialization for reflected values
//!
//! Walks the runtime type graph of a [`reflex::Any`] and converts between
//! the value and a `toml` document tree. The concrete type is never named
//! at the call site: dispatch goes through the value's
//! [`ValueKind`](reflex::ValueKind).
//!
//! | Value kind | TOML |
//! |------------|------|
//! | Boolean | boolean |
//! | Numeric | integer or float ([`NumberMode`]) |
//! | String | string (`&'static str` is written but never read back) |
//! | Enum | integer or item name ([`EnumMode`]) |
//! | Class | table of properties |
//! | Array, Set | array |
//! | Map | table (keys in their display form) |
//! | Optional | the contained value, omitted when empty |
//! | Pointer | not serialized |
//!
//! A key missing from the document leaves the field at its current value
//! (see [`MissingFieldPolicy`]). TOML has no null, so an empty optional or a
//! pointer inside an array, set or map fails with [`SerdError::Unsupported`].
//!
//! ```rust
//! use reflex::{Any, Reflect, Registry};
//!
//! #[derive(Clone, Default, PartialEq, Debug, Reflect)]
//! struct Settings {
//!     volume: u8,
//!     title: String,
//! }
//!
//! Registry::global().register::<Settings>();
//!
//! let settings = Settings { volume: 7, title: "main".into() };
//! let text = reflex_serd::to_string(&Any::make_constref(&settings), "Settings").expect("serialize");
//!
//! let mut restored = Settings::default();
//! reflex_serd::from_str(&mut Any::make_ref(&mut restored), &text, "Settings").expect("deserialize");
//! assert_eq!(restored, settings);
//! ```

mod config;
mod de;
mod error;
mod methods;
mod ser;

pub use config::{ConfigError, EnumMode, MissingFieldPolicy, NumberMode, SerdConfig};
pub use error::{Result, SerdError};
pub use methods::SerdMethods;

use reflex::Any;
use toml::{Table, Value};

use crate::de::Reader;
use crate::ser::Writer;

/// Serializer bound to a [`SerdConfig`].
#[derive(Debug, Clone, Default)]
pub struct Serd {
    config: SerdConfig,
}

impl Serd {
    pub fn new(config: SerdConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SerdConfig {
        &self.config
    }

    /// TOML form of `value`; `None` for an empty optional or a pointer.
    pub fn to_value(&self, value: &Any<'_>) -> Result<Option<Value>> {
        Writer::new(&self.config).write(value, 0)
    }

    /// Write `value` into `table` under `name`.
    pub fn serialize(&self, table: &mut Table, value: &Any<'_>, name: &str) -> Result<()> {
        match self.to_value(value)? {
            Some(written) => {
                table.insert(name.to_owned(), written);
            }
            None => log::debug!("[Serd] nothing to write for '{}'", name),
        }
        Ok(())
    }

    /// `value` as a TOML document with a single top-level key `name`.
    pub fn to_string(&self, value: &Any<'_>, name: &str) -> Result<String> {
        let mut table = Table::new();
        self.serialize(&mut table, value, name)?;
        Ok(toml::to_string(&table)?)
    }

    /// Overwrite `value` with `node`.
    pub fn deserialize(&self, value: &mut Any<'_>, node: &Value) -> Result<()> {
        Reader::new(&self.config).read(value, node, 0)
    }

    /// Overwrite `value` with the entry `name` of `table`.
    pub fn deserialize_named(&self, value: &mut Any<'_>, table: &Table, name: &str) -> Result<()> {
        match table.get(name) {
            Some(node) => self.deserialize(value, node),
            None => match self.config.missing_field {
                MissingFieldPolicy::Ignore => {
                    log::warn!("[Serd] document has no '{}', keeping current value", name);
                    Ok(())
                }
                MissingFieldPolicy::Error => Err(SerdError::MissingField {
                    class: "<document>".into(),
                    field: name.to_owned(),
                }),
            },
        }
    }

    /// Parse `text` and overwrite `value` with its entry `name`.
    pub fn from_str(&self, value: &mut Any<'_>, text: &str, name: &str) -> Result<()> {
        let table: Table = toml::from_str(text)?;
        self.deserialize_named(value, &table, name)
    }
}

/// [`Serd::serialize`] with the default configuration.
pub fn serialize(table: &mut Table, value: &Any<'_>, name: &str) -> Result<()> {
    Serd::default().serialize(table, value, name)
}

/// [`Serd::to_value`] with the default configuration.
pub fn to_value(value: &Any<'_>) -> Result<Option<Value>> {
    Serd::default().to_value(value)
}

/// [`Serd::to_string`] with the default configuration.
pub fn to_string(value: &Any<'_>, name: &str) -> Result<String> {
    Serd::default().to_string(value, name)
}

/// [`Serd::deserialize`] with the default configuration.
pub fn deserialize(value: &mut Any<'_>, node: &Value) -> Result<()> {
    Serd::default().deserialize(value, node)
}

/// [`Serd::deserialize_named`] with the default configuration.
pub fn deserialize_named(value: &mut Any<'_>, table: &Table, name: &str) -> Result<()> {
    Serd::default().deserialize_named(value, table, name)
}

/// [`Serd::from_str`] with the default configuration.
pub fn from_str(value: &mut Any<'_>, text: &str, name: &str) -> Result<()> {
    Serd::default().from_str(value, text, name)
}

#[cfg(test)]
mod tests;
