//! Binary persistence for meshes and fields.
//!
//! [`SerialBuffer`] holds the bytes, [`Serializable`] objects write
//! themselves into it through conversions held in a process-wide registry,
//! and a [`Serializer`] groups several objects into one stream.

pub mod codecs;
pub mod error;
pub mod serial_buffer;
pub mod serializable;
pub mod serializer;

pub use error::{ResultExt, SerialError, SerialErrorKind};
pub use serial_buffer::{ReadPolicy, SerialBuffer};
pub use serializable::{
    Conversion, ConversionRegistry, SerialConversion, Serializable, deserialize, lookup,
    lookup_current, register, serialize,
};
pub use serializer::{OBJECT_MARKER, STREAM_MARKER, Serializer};
