//! Serializable objects and the process-wide conversion registry.
//!
//! An object on the wire is its type name (null-terminated), a one-byte
//! version tag, then a payload only the matching [`SerialConversion`]
//! understands. Conversions are looked up by the key `"Type:V"`; the key
//! `"Type:current"` aliases the highest version registered for that type
//! (the first one registered wins a tie).
//!
//! The registry is built on first use with conversions for every mesh and
//! field type in this crate. Further conversions may be added with
//! [`register`]; lookups take a shared lock only.

use super::codecs;
use super::error::{ResultExt, SerialError, SerialErrorKind};
use super::serial_buffer::SerialBuffer;
use hashbrown::HashMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::any::Any;
use std::fmt::Debug;
use std::marker::PhantomData;
use std::sync::Arc;

/// Upcast helper implemented for every `'static` type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// An object that can travel through a [`SerialBuffer`].
pub trait Serializable: AsAny + Debug + Send + Sync {
    /// Name the type is registered under.
    fn type_name(&self) -> &'static str;

    /// Version tag this object is written with.
    fn version(&self) -> u8;
}

impl dyn Serializable {
    pub fn downcast_ref<T: Serializable>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn is<T: Serializable>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

/// Encoder/decoder pair for one version of one type.
pub trait SerialConversion: Send + Sync {
    fn type_name(&self) -> &'static str;

    fn version(&self) -> u8;

    /// Blank instance for [`deserialize`](Self::deserialize) to fill in.
    fn create(&self) -> Box<dyn Serializable>;

    fn serialize(&self, obj: &dyn Serializable, buf: &mut SerialBuffer)
    -> Result<(), SerialError>;

    fn deserialize(
        &self,
        obj: &mut dyn Serializable,
        buf: &mut SerialBuffer,
    ) -> Result<(), SerialError>;

    /// Registry key, `"Type:V"`.
    fn key(&self) -> String {
        version_key(self.type_name(), self.version())
    }
}

pub fn version_key(type_name: &str, version: u8) -> String {
    format!("{type_name}:{}", version as char)
}

pub fn current_key(type_name: &str) -> String {
    format!("{type_name}:current")
}

/// [`SerialConversion`] built from a pair of typed functions.
pub struct Conversion<T> {
    type_name: &'static str,
    version: u8,
    write: fn(&T, &mut SerialBuffer) -> Result<(), SerialError>,
    read: fn(&mut SerialBuffer) -> Result<T, SerialError>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Conversion<T> {
    pub const fn new(
        type_name: &'static str,
        version: u8,
        write: fn(&T, &mut SerialBuffer) -> Result<(), SerialError>,
        read: fn(&mut SerialBuffer) -> Result<T, SerialError>,
    ) -> Self {
        Self {
            type_name,
            version,
            write,
            read,
            _marker: PhantomData,
        }
    }
}

impl<T: Serializable + Default> Conversion<T> {
    fn mismatch(&self, found: &dyn Serializable) -> SerialError {
        SerialError::invalid(format!(
            "conversion {} cannot handle an object of type {}",
            self.key(),
            found.type_name()
        ))
    }
}

impl<T: Serializable + Default> SerialConversion for Conversion<T> {
    fn type_name(&self) -> &'static str {
        self.type_name
    }

    fn version(&self) -> u8 {
        self.version
    }

    fn create(&self) -> Box<dyn Serializable> {
        Box::new(T::default())
    }

    fn serialize(
        &self,
        obj: &dyn Serializable,
        buf: &mut SerialBuffer,
    ) -> Result<(), SerialError> {
        let obj = obj.downcast_ref::<T>().ok_or_else(|| self.mismatch(obj))?;
        (self.write)(obj, buf)
    }

    fn deserialize(
        &self,
        obj: &mut dyn Serializable,
        buf: &mut SerialBuffer,
    ) -> Result<(), SerialError> {
        if !obj.is::<T>() {
            return Err(self.mismatch(obj));
        }
        let value = (self.read)(buf)?;
        if let Some(slot) = obj.as_any_mut().downcast_mut::<T>() {
            *slot = value;
        }
        Ok(())
    }
}

/// Table of conversions keyed by `"Type:V"` and `"Type:current"`.
#[derive(Default)]
pub struct ConversionRegistry {
    by_key: HashMap<String, Arc<dyn SerialConversion>>,
}

impl ConversionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the crate's mesh and field conversions.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for conversion in codecs::builtin_conversions() {
            // built-in keys are distinct
            let _ = registry.insert(conversion);
        }
        registry
    }

    /// Add `conversion`, updating the `:current` alias if it is newer.
    pub fn insert(&mut self, conversion: Arc<dyn SerialConversion>) -> Result<(), SerialError> {
        let key = conversion.key();
        if self.by_key.contains_key(&key) {
            return Err(SerialErrorKind::DuplicateRegistration(key).into());
        }
        let current = current_key(conversion.type_name());
        let newer = self
            .by_key
            .get(&current)
            .is_none_or(|c| conversion.version() > c.version());
        if newer {
            log::debug!("serial conversion {key} is now {current}");
            self.by_key.insert(current, Arc::clone(&conversion));
        }
        log::debug!("registered serial conversion {key}");
        self.by_key.insert(key, conversion);
        Ok(())
    }

    pub fn lookup(&self, type_name: &str, version: u8) -> Option<Arc<dyn SerialConversion>> {
        self.get(&version_key(type_name, version))
    }

    pub fn lookup_current(&self, type_name: &str) -> Option<Arc<dyn SerialConversion>> {
        self.get(&current_key(type_name))
    }

    /// Conversion under a raw key such as `"Mesh1D:A"` or `"Mesh1D:current"`.
    pub fn get(&self, key: &str) -> Option<Arc<dyn SerialConversion>> {
        self.by_key.get(key).cloned()
    }

    /// Number of keys, aliases included.
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// Write `obj` with its header through the matching conversion.
    pub fn serialize(&self, obj: &dyn Serializable, buf: &mut SerialBuffer) -> Result<(), SerialError> {
        let key = version_key(obj.type_name(), obj.version());
        let conversion = self
            .get(&key)
            .ok_or_else(|| SerialErrorKind::UnrecognizedType(key.clone()))?;
        log::trace!("serializing {key}");
        buf.write_string(obj.type_name())?.write_char(obj.version());
        conversion.serialize(obj, buf)
    }

    /// Read one object header and payload.
    pub fn deserialize(&self, buf: &mut SerialBuffer) -> Result<Box<dyn Serializable>, SerialError> {
        let type_name = buf.read_string().context("while reading object type")?;
        let version = buf.read_char().context("while reading object version")?;
        let key = version_key(&type_name, version);
        let conversion = self
            .get(&key)
            .ok_or_else(|| SerialErrorKind::UnrecognizedType(key.clone()))?;
        log::trace!("deserializing {key}");
        let mut obj = conversion.create();
        conversion
            .deserialize(obj.as_mut(), buf)
            .with_context(|| format!("while reading {key} payload"))?;
        Ok(obj)
    }
}

static REGISTRY: Lazy<RwLock<ConversionRegistry>> =
    Lazy::new(|| RwLock::new(ConversionRegistry::with_builtins()));

/// Add a conversion to the process-wide registry.
pub fn register(conversion: Arc<dyn SerialConversion>) -> Result<(), SerialError> {
    REGISTRY.write().insert(conversion)
}

pub fn lookup(type_name: &str, version: u8) -> Option<Arc<dyn SerialConversion>> {
    REGISTRY.read().lookup(type_name, version)
}

pub fn lookup_current(type_name: &str) -> Option<Arc<dyn SerialConversion>> {
    REGISTRY.read().lookup_current(type_name)
}

/// Write `obj` through the process-wide registry.
pub fn serialize(obj: &dyn Serializable, buf: &mut SerialBuffer) -> Result<(), SerialError> {
    REGISTRY.read().serialize(obj, buf)
}

/// Read one object through the process-wide registry.
pub fn deserialize(buf: &mut SerialBuffer) -> Result<Box<dyn Serializable>, SerialError> {
    REGISTRY.read().deserialize(buf)
}
