//! Primitive encoding of the kn5 node stream. Everything is little-endian.

use std::io::{self, Write};

use glam::{Mat4, Vec2, Vec3};

use crate::model::Vertex;

#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeClass {
    Node = 1,
    Mesh = 2,
    #[allow(dead_code)]
    SkinnedMesh = 3,
}

pub trait Kn5WriteExt: Write {
    fn write_u16(&mut self, value: u16) -> io::Result<()> {
        self.write_all(&value.to_le_bytes())
    }

    fn write_u32(&mut self, value: u32) -> io::Result<()> {
        self.write_all(&value.to_le_bytes())
    }

    fn write_f32(&mut self, value: f32) -> io::Result<()> {
        self.write_all(&value.to_le_bytes())
    }

    fn write_bool(&mut self, value: bool) -> io::Result<()> {
        self.write_all(&[value as u8])
    }

    /// UTF-8 bytes prefixed with their length as u32, no terminator.
    fn write_string(&mut self, value: &str) -> io::Result<()> {
        let len = u32::try_from(value.len())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "string too long"))?;
        self.write_u32(len)?;
        self.write_all(value.as_bytes())
    }

    fn write_vec2(&mut self, value: Vec2) -> io::Result<()> {
        self.write_f32(value.x)?;
        self.write_f32(value.y)
    }

    fn write_vec3(&mut self, value: Vec3) -> io::Result<()> {
        self.write_f32(value.x)?;
        self.write_f32(value.y)?;
        self.write_f32(value.z)
    }

    /// 16 floats, column by column.
    fn write_mat4(&mut self, value: &Mat4) -> io::Result<()> {
        for component in value.to_cols_array() {
            self.write_f32(component)?;
        }
        Ok(())
    }

    fn write_node_class(&mut self, class: NodeClass) -> io::Result<()> {
        self.write_u32(class as u32)
    }

    fn write_vertex(&mut self, vertex: &Vertex) -> io::Result<()> {
        self.write_vec3(vertex.position)?;
        self.write_vec3(vertex.normal)?;
        self.write_vec2(vertex.tex_coords)?;
        self.write_vec3(vertex.tangent)
    }
}

impl<W: Write + ?Sized> Kn5WriteExt for W {}
