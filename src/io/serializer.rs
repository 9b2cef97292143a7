//! Serializer: an ordered group of objects written as one stream.
//!
//! Stream layout:
//!
//! ```text
//! "RpSerial:A\0"  int count
//! count x { "RpObj:\0"  id\0  type\0  version  payload }
//! ```
//!
//! Ids are handles issued by the serializer on [`Serializer::add`]. Adding
//! the same `Arc` again returns its existing handle.

use super::error::{ResultExt, SerialError, SerialErrorKind};
use super::serial_buffer::{SerialBuffer, checked_len};
use super::serializable::{self, Serializable};
use hashbrown::HashMap;
use std::sync::Arc;

pub const STREAM_MARKER: &str = "RpSerial:A";
pub const OBJECT_MARKER: &str = "RpObj:";

#[derive(Clone, Debug, Default)]
pub struct Serializer {
    order: Vec<String>,
    objects: HashMap<String, Arc<dyn Serializable>>,
    /// Allocation address of each held object to its id.
    by_addr: HashMap<usize, String>,
    next_handle: u64,
}

impl Serializer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `obj` and return its stream id.
    pub fn add(&mut self, obj: Arc<dyn Serializable>) -> String {
        if let Some(id) = self.by_addr.get(&addr_of(&obj)) {
            return id.clone();
        }
        let id = self.issue_handle();
        self.order.push(id.clone());
        self.insert(id.clone(), obj);
        id
    }

    /// Wrap `value` in an `Arc` and add it.
    pub fn add_value<T: Serializable>(&mut self, value: T) -> String {
        self.add(Arc::new(value))
    }

    /// Object at insertion position `pos`.
    pub fn get(&self, pos: usize) -> Option<&Arc<dyn Serializable>> {
        self.order.get(pos).and_then(|id| self.objects.get(id))
    }

    /// Object at `pos`, if it is a `T`.
    pub fn get_as<T: Serializable>(&self, pos: usize) -> Option<&T> {
        self.get(pos).and_then(|obj| (**obj).downcast_ref::<T>())
    }

    pub fn by_id(&self, id: &str) -> Option<&Arc<dyn Serializable>> {
        self.objects.get(id)
    }

    /// Stream id of the object at `pos`.
    pub fn id(&self, pos: usize) -> Option<&str> {
        self.order.get(pos).map(String::as_str)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.objects.clear();
        self.by_addr.clear();
        self.next_handle = 0;
    }

    /// `(id, object)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn Serializable>)> + '_ {
        self.order
            .iter()
            .filter_map(|id| self.objects.get(id).map(|obj| (id.as_str(), obj)))
    }

    /// Write every object, in insertion order, into a new buffer.
    pub fn serialize(&self) -> Result<SerialBuffer, SerialError> {
        let mut buf = SerialBuffer::new();
        buf.write_string(STREAM_MARKER)?
            .write_int(checked_len(self.size(), "object count")?);
        for (i, (id, obj)) in self.iter().enumerate() {
            write_object(&mut buf, id, &**obj)
                .with_context(|| format!("while serializing object #{} ({id})", i + 1))?;
        }
        Ok(buf)
    }

    /// Replace the contents with the objects in `bytes`.
    ///
    /// Every declared object must be present and nothing may follow the
    /// last one. On failure the serializer is left empty.
    pub fn deserialize(&mut self, bytes: &[u8]) -> Result<(), SerialError> {
        self.clear();
        let mut buf = SerialBuffer::from_bytes(bytes);
        let result = self.read_stream(&mut buf);
        if result.is_err() {
            self.clear();
        }
        result
    }

    fn read_stream(&mut self, buf: &mut SerialBuffer) -> Result<(), SerialError> {
        expect_marker(buf, STREAM_MARKER)?;
        let count = buf.read_int().context("while reading object count")?;
        if count < 0 {
            return Err(SerialErrorKind::NegativeCount(count).into());
        }

        for i in 0..count {
            self.read_object(buf)
                .with_context(|| format!("while deserializing object #{} of {count}", i + 1))?;
        }
        if !buf.at_end() {
            return Err(SerialError::invalid(format!(
                "{} bytes left after {count} objects",
                buf.remaining()
            )));
        }
        self.next_handle = self.order.len() as u64;
        Ok(())
    }

    fn read_object(&mut self, buf: &mut SerialBuffer) -> Result<(), SerialError> {
        expect_marker(buf, OBJECT_MARKER)?;
        let id = buf.read_string().context("while reading object id")?;
        let obj: Arc<dyn Serializable> = Arc::from(serializable::deserialize(buf)?);
        if self.insert(id.clone(), obj) {
            log::warn!("stream repeats object id {id:?}; keeping the later copy");
        } else {
            self.order.push(id);
        }
        Ok(())
    }

    /// Store `obj` under `id`; true if it replaced an earlier object.
    fn insert(&mut self, id: String, obj: Arc<dyn Serializable>) -> bool {
        let addr = addr_of(&obj);
        let replaced = self.objects.insert(id.clone(), obj);
        if let Some(old) = &replaced {
            self.by_addr.remove(&addr_of(old));
        }
        self.by_addr.insert(addr, id);
        replaced.is_some()
    }

    fn issue_handle(&mut self) -> String {
        loop {
            let id = format!("obj{}", self.next_handle);
            self.next_handle += 1;
            if !self.objects.contains_key(&id) {
                return id;
            }
        }
    }
}

fn addr_of(obj: &Arc<dyn Serializable>) -> usize {
    Arc::as_ptr(obj).cast::<()>() as usize
}

fn write_object(
    buf: &mut SerialBuffer,
    id: &str,
    obj: &dyn Serializable,
) -> Result<(), SerialError> {
    buf.write_string(OBJECT_MARKER)?.write_string(id)?;
    serializable::serialize(obj, buf)
}

fn expect_marker(buf: &mut SerialBuffer, expected: &'static str) -> Result<(), SerialError> {
    let found = buf.read_string()?;
    if found != expected {
        return Err(SerialErrorKind::BadMarker { expected, found }.into());
    }
    Ok(())
}
