//! Lookup table from formats to drivers.

use super::{Format, NativeJson, Serializer, Unserializer};
use crate::error::{FormatErrorKind, Result, SbomGraphError};
use crate::model::Document;
use std::collections::HashMap;
use std::io::{Read, Write};
use tracing::debug;

/// Serializers and unserializers keyed by format.
///
/// Registering a driver for a format that already has one replaces it.
#[derive(Default)]
pub struct FormatRegistry {
    serializers: HashMap<Format, Box<dyn Serializer>>,
    unserializers: HashMap<Format, Box<dyn Unserializer>>,
}

impl std::fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatRegistry")
            .field("serializers", &self.serializers.keys().collect::<Vec<_>>())
            .field("unserializers", &self.unserializers.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn check_format(format: &Format, context: &str) -> Result<()> {
    if format.is_empty() {
        return Err(SbomGraphError::format(context, FormatErrorKind::NoFormat));
    }
    Ok(())
}

impl FormatRegistry {
    /// An empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the [`NativeJson`] driver registered both ways.
    #[must_use]
    pub fn with_native() -> Self {
        let mut registry = Self::new();
        registry.register_serializer(Format::NATIVE_JSON, Box::new(NativeJson));
        registry.register_unserializer(Format::NATIVE_JSON, Box::new(NativeJson));
        registry
    }

    // ========================================================================
    // Serializers
    // ========================================================================

    /// Register `serializer` for `format`, returning the driver it replaced.
    pub fn register_serializer(
        &mut self,
        format: Format,
        serializer: Box<dyn Serializer>,
    ) -> Option<Box<dyn Serializer>> {
        let previous = self.serializers.insert(format.clone(), serializer);
        if previous.is_some() {
            debug!(%format, "replaced registered serializer");
        }
        previous
    }

    pub fn unregister_serializer(&mut self, format: &Format) -> Option<Box<dyn Serializer>> {
        self.serializers.remove(format)
    }

    /// Serializer registered for `format`.
    ///
    /// # Errors
    ///
    /// `NoFormat` for an empty format, `NotRegistered` when no driver is known.
    pub fn serializer(&self, format: &Format) -> Result<&dyn Serializer> {
        check_format(format, "looking up serializer")?;
        self.serializers.get(format).map(AsRef::as_ref).ok_or_else(|| {
            SbomGraphError::format(
                "looking up serializer",
                FormatErrorKind::NotRegistered(format.to_string()),
            )
        })
    }

    // ========================================================================
    // Unserializers
    // ========================================================================

    /// Register `unserializer` for `format`, returning the driver it replaced.
    pub fn register_unserializer(
        &mut self,
        format: Format,
        unserializer: Box<dyn Unserializer>,
    ) -> Option<Box<dyn Unserializer>> {
        let previous = self.unserializers.insert(format.clone(), unserializer);
        if previous.is_some() {
            debug!(%format, "replaced registered unserializer");
        }
        previous
    }

    pub fn unregister_unserializer(&mut self, format: &Format) -> Option<Box<dyn Unserializer>> {
        self.unserializers.remove(format)
    }

    /// Unserializer registered for `format`.
    ///
    /// # Errors
    ///
    /// `NoFormat` for an empty format, `NotRegistered` when no driver is known.
    pub fn unserializer(&self, format: &Format) -> Result<&dyn Unserializer> {
        check_format(format, "looking up unserializer")?;
        self.unserializers.get(format).map(AsRef::as_ref).ok_or_else(|| {
            SbomGraphError::format(
                "looking up unserializer",
                FormatErrorKind::NotRegistered(format.to_string()),
            )
        })
    }

    // ========================================================================
    // Convenience
    // ========================================================================

    /// Formats with at least one registered driver, sorted
    #[must_use]
    pub fn formats(&self) -> Vec<&Format> {
        let mut formats: Vec<&Format> = self
            .serializers
            .keys()
            .chain(self.unserializers.keys())
            .collect();
        formats.sort();
        formats.dedup();
        formats
    }

    /// Encode `document` as `format`.
    ///
    /// # Errors
    ///
    /// Lookup errors from [`serializer`](Self::serializer) or the driver's own.
    pub fn write(&self, format: &Format, document: &Document, writer: &mut dyn Write) -> Result<()> {
        self.serializer(format)?.serialize(document, writer)
    }

    /// Decode a document encoded as `format`.
    ///
    /// # Errors
    ///
    /// Lookup errors from [`unserializer`](Self::unserializer) or the driver's own.
    pub fn read(&self, format: &Format, reader: &mut dyn Read) -> Result<Document> {
        self.unserializer(format)?.unserialize(reader)
    }
}
