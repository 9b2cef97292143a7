//! Version `A` payload codecs for the crate's meshes and fields.
//!
//! Payload layouts (all counts are 4-byte ints):
//!
//! | type          | payload                                                        |
//! |---------------|----------------------------------------------------------------|
//! | `Mesh1D`      | `n`, then `n` x (`id`, `x`), then `counter`                    |
//! | `MeshTri2D`   | `n`, `n` x (`id`, `x`, `y`), `m`, `m` x (3 node ids), `counter`|
//! | `MeshRect3D`  | three `Mesh1D` payloads, x then y then z                       |
//! | `MeshPrism3D` | a `MeshTri2D` payload then a `Mesh1D` payload                  |
//! | `Field*`      | the mesh payload, `n`, `n` doubles, then `vmin`, `vmax`        |
//!
//! Nested meshes are written without their own type header.

use super::error::{ResultExt, SerialError};
use super::serial_buffer::{SerialBuffer, checked_len};
use super::serializable::{Conversion, SerialConversion, Serializable};
use crate::data::{Field1D, FieldPrism3D, FieldRect3D, FieldTri2D, NodeValues};
use crate::topology::{Axis, Mesh1D, MeshPrism3D, MeshRect3D, MeshTri2D, Node1D, Node2D};
use std::sync::Arc;

pub const VERSION_A: u8 = b'A';

macro_rules! impl_serializable {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl Serializable for $ty {
                fn type_name(&self) -> &'static str {
                    $name
                }
                fn version(&self) -> u8 {
                    VERSION_A
                }
            }
        )*
    };
}

impl_serializable! {
    Mesh1D => "Mesh1D",
    MeshTri2D => "MeshTri2D",
    MeshRect3D => "MeshRect3D",
    MeshPrism3D => "MeshPrism3D",
    Field1D => "Field1D",
    FieldTri2D => "FieldTri2D",
    FieldRect3D => "FieldRect3D",
    FieldPrism3D => "FieldPrism3D",
}

/// Conversions the registry starts out with.
pub fn builtin_conversions() -> Vec<Arc<dyn SerialConversion>> {
    vec![
        version_a("Mesh1D", write_mesh1d, read_mesh1d),
        version_a("MeshTri2D", write_tri2d, read_tri2d),
        version_a("MeshRect3D", write_rect3d, read_rect3d),
        version_a("MeshPrism3D", write_prism3d, read_prism3d),
        version_a("Field1D", write_field1d, read_field1d),
        version_a("FieldTri2D", write_field_tri2d, read_field_tri2d),
        version_a("FieldRect3D", write_field_rect3d, read_field_rect3d),
        version_a("FieldPrism3D", write_field_prism3d, read_field_prism3d),
    ]
}

fn version_a<T: Serializable + Default>(
    type_name: &'static str,
    write: fn(&T, &mut SerialBuffer) -> Result<(), SerialError>,
    read: fn(&mut SerialBuffer) -> Result<T, SerialError>,
) -> Arc<dyn SerialConversion> {
    Arc::new(Conversion::new(type_name, VERSION_A, write, read))
}

fn write_count(buf: &mut SerialBuffer, n: usize, what: &str) -> Result<(), SerialError> {
    buf.write_int(checked_len(n, what)?);
    Ok(())
}

/// Read a record count, refusing negatives. `record_bytes` bounds the
/// preallocation hint by what the buffer could actually hold.
fn read_count(
    buf: &mut SerialBuffer,
    what: &str,
    record_bytes: usize,
) -> Result<(usize, usize), SerialError> {
    let n = buf.read_int()?;
    let n = usize::try_from(n)
        .map_err(|_| SerialError::invalid(format!("negative {what} count {n}")))?;
    Ok((n, n.min(buf.remaining() / record_bytes.max(1))))
}

pub fn write_mesh1d(mesh: &Mesh1D, buf: &mut SerialBuffer) -> Result<(), SerialError> {
    write_count(buf, mesh.size(), "node")?;
    for node in mesh.iter() {
        buf.write_int(node.id()).write_double(node.x());
    }
    buf.write_int(mesh.counter());
    Ok(())
}

pub fn read_mesh1d(buf: &mut SerialBuffer) -> Result<Mesh1D, SerialError> {
    let (n, hint) = read_count(buf, "node", 12)?;
    let mut nodes = Vec::with_capacity(hint);
    for _ in 0..n {
        let id = buf.read_int()?;
        let x = buf.read_double()?;
        nodes.push(Node1D::with_id(id, x));
    }
    let counter = buf.read_int()?;
    Ok(Mesh1D::from_parts(nodes, counter)?)
}

pub fn write_tri2d(mesh: &MeshTri2D, buf: &mut SerialBuffer) -> Result<(), SerialError> {
    write_count(buf, mesh.size_nodes(), "node")?;
    for node in mesh.nodes() {
        buf.write_int(node.id())
            .write_double(node.x())
            .write_double(node.y());
    }
    write_count(buf, mesh.size_cells(), "triangle")?;
    for tri in mesh.cells() {
        for id in tri.nodes {
            buf.write_int(id);
        }
    }
    buf.write_int(mesh.counter());
    Ok(())
}

pub fn read_tri2d(buf: &mut SerialBuffer) -> Result<MeshTri2D, SerialError> {
    let mut mesh = MeshTri2D::new();
    let (n, _) = read_count(buf, "node", 20)?;
    for i in 0..n {
        let id = buf.read_int()?;
        let x = buf.read_double()?;
        let y = buf.read_double()?;
        let before = mesh.size_nodes();
        mesh.add_node(Node2D::with_id(id, x, y))
            .with_context(|| format!("while reading node #{}", i + 1))?;
        if mesh.size_nodes() == before {
            return Err(SerialError::invalid(format!("duplicate node id {id}")));
        }
    }
    let (m, _) = read_count(buf, "triangle", 12)?;
    for i in 0..m {
        let a = buf.read_int()?;
        let b = buf.read_int()?;
        let c = buf.read_int()?;
        mesh.add_cell(a, b, c)
            .with_context(|| format!("while reading triangle #{}", i + 1))?;
    }
    mesh.restore_counter(buf.read_int()?);
    Ok(mesh)
}

pub fn write_rect3d(mesh: &MeshRect3D, buf: &mut SerialBuffer) -> Result<(), SerialError> {
    for axis in Axis::ALL {
        write_mesh1d(mesh.axis(axis), buf)?;
    }
    Ok(())
}

pub fn read_rect3d(buf: &mut SerialBuffer) -> Result<MeshRect3D, SerialError> {
    let x = read_mesh1d(buf).context("while reading x axis")?;
    let y = read_mesh1d(buf).context("while reading y axis")?;
    let z = read_mesh1d(buf).context("while reading z axis")?;
    Ok(MeshRect3D::new(x, y, z))
}

pub fn write_prism3d(mesh: &MeshPrism3D, buf: &mut SerialBuffer) -> Result<(), SerialError> {
    write_tri2d(mesh.xy(), buf)?;
    write_mesh1d(mesh.z(), buf)
}

pub fn read_prism3d(buf: &mut SerialBuffer) -> Result<MeshPrism3D, SerialError> {
    let xy = read_tri2d(buf).context("while reading xy triangulation")?;
    let z = read_mesh1d(buf).context("while reading z axis")?;
    Ok(MeshPrism3D::new(xy, z))
}

fn write_values(values: &NodeValues, buf: &mut SerialBuffer) -> Result<(), SerialError> {
    write_count(buf, values.len(), "value")?;
    for &v in values.as_slice() {
        buf.write_double(v);
    }
    buf.write_double(values.min()).write_double(values.max());
    Ok(())
}

fn read_values(buf: &mut SerialBuffer) -> Result<NodeValues, SerialError> {
    let (n, hint) = read_count(buf, "value", 8)?;
    let mut values = Vec::with_capacity(hint);
    for _ in 0..n {
        values.push(buf.read_double()?);
    }
    let vmin = buf.read_double()?;
    let vmax = buf.read_double()?;
    Ok(NodeValues::from_parts(values, vmin, vmax))
}

pub fn write_field1d(field: &Field1D, buf: &mut SerialBuffer) -> Result<(), SerialError> {
    write_mesh1d(field.mesh(), buf)?;
    write_values(field.values(), buf)
}

pub fn read_field1d(buf: &mut SerialBuffer) -> Result<Field1D, SerialError> {
    let mesh = read_mesh1d(buf).context("while reading field mesh")?;
    let values = read_values(buf).context("while reading field values")?;
    Ok(Field1D::from_parts(Arc::new(mesh), values))
}

pub fn write_field_tri2d(field: &FieldTri2D, buf: &mut SerialBuffer) -> Result<(), SerialError> {
    write_tri2d(field.mesh(), buf)?;
    write_values(field.values(), buf)
}

pub fn read_field_tri2d(buf: &mut SerialBuffer) -> Result<FieldTri2D, SerialError> {
    let mesh = read_tri2d(buf).context("while reading field mesh")?;
    let values = read_values(buf).context("while reading field values")?;
    Ok(FieldTri2D::from_parts(Arc::new(mesh), values))
}

pub fn write_field_rect3d(field: &FieldRect3D, buf: &mut SerialBuffer) -> Result<(), SerialError> {
    write_rect3d(field.mesh(), buf)?;
    write_values(field.values(), buf)
}

pub fn read_field_rect3d(buf: &mut SerialBuffer) -> Result<FieldRect3D, SerialError> {
    let mesh = read_rect3d(buf).context("while reading field mesh")?;
    let values = read_values(buf).context("while reading field values")?;
    Ok(FieldRect3D::from_parts(Arc::new(mesh), values))
}

pub fn write_field_prism3d(
    field: &FieldPrism3D,
    buf: &mut SerialBuffer,
) -> Result<(), SerialError> {
    write_prism3d(field.mesh(), buf)?;
    write_values(field.values(), buf)
}

pub fn read_field_prism3d(buf: &mut SerialBuffer) -> Result<FieldPrism3D, SerialError> {
    let mesh = read_prism3d(buf).context("while reading field mesh")?;
    let values = read_values(buf).context("while reading field values")?;
    Ok(FieldPrism3D::from_parts(Arc::new(mesh), values))
}
