//! Frame builder for the tagged binary format.
//!
//! The inverse of [`crate::protocol::decoder`], used to produce fixture traffic
//! and to re-frame captured bodies.

use std::io::Write;

use bytes::BufMut;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::protocol::decoder::{COMPRESSED_FLAG, MARKER_PLAIN};
use crate::protocol::value::TypeTag;

#[derive(Debug, Clone, Default)]
pub struct FrameBuilder {
    count: u16,
    fields: Vec<u8>,
}

impl FrameBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn field(mut self, name: &str, tag: TypeTag) -> Self {
        self.count += 1;
        put_str(&mut self.fields, name);
        self.fields.put_u8(tag.as_u8());
        self
    }

    pub fn null(self, name: &str) -> Self {
        self.field(name, TypeTag::Null)
    }

    pub fn bool(self, name: &str, v: bool) -> Self {
        let mut s = self.field(name, TypeTag::Bool);
        s.fields.put_u8(u8::from(v));
        s
    }

    pub fn byte(self, name: &str, v: i8) -> Self {
        let mut s = self.field(name, TypeTag::Byte);
        s.fields.put_i8(v);
        s
    }

    pub fn short(self, name: &str, v: i16) -> Self {
        let mut s = self.field(name, TypeTag::Short);
        s.fields.put_i16(v);
        s
    }

    pub fn int(self, name: &str, v: i32) -> Self {
        let mut s = self.field(name, TypeTag::Int);
        s.fields.put_i32(v);
        s
    }

    pub fn long(self, name: &str, v: i64) -> Self {
        let mut s = self.field(name, TypeTag::Long);
        s.fields.put_i64(v);
        s
    }

    pub fn float(self, name: &str, v: f32) -> Self {
        let mut s = self.field(name, TypeTag::Float);
        s.fields.put_f32(v);
        s
    }

    pub fn double(self, name: &str, v: f64) -> Self {
        let mut s = self.field(name, TypeTag::Double);
        s.fields.put_f64(v);
        s
    }

    pub fn string(self, name: &str, v: &str) -> Self {
        let mut s = self.field(name, TypeTag::Str);
        put_str(&mut s.fields, v);
        s
    }

    pub fn string_array(self, name: &str, items: &[&str]) -> Self {
        let mut s = self.field(name, TypeTag::StrArray);
        s.fields.put_u16(items.len() as u16);
        for item in items {
            put_str(&mut s.fields, item);
        }
        s
    }

    pub fn int_array(self, name: &str, items: &[i32]) -> Self {
        let mut s = self.field(name, TypeTag::IntArray);
        s.fields.put_u16(items.len() as u16);
        for &v in items {
            s.fields.put_i32(v);
        }
        s
    }

    pub fn short_array(self, name: &str, items: &[i16]) -> Self {
        let mut s = self.field(name, TypeTag::ShortArray);
        s.fields.put_u16(items.len() as u16);
        for &v in items {
            s.fields.put_i16(v);
        }
        s
    }

    pub fn bytes(self, name: &str, items: &[u8]) -> Self {
        let mut s = self.field(name, TypeTag::ByteArray);
        s.fields.put_i32(items.len() as i32);
        s.fields.put_slice(items);
        s
    }

    pub fn object(self, name: &str, inner: FrameBuilder) -> Self {
        let mut s = self.field(name, TypeTag::Object);
        inner.put_object(&mut s.fields);
        s
    }

    /// Heterogeneous array of objects.
    pub fn object_array(self, name: &str, items: Vec<FrameBuilder>) -> Self {
        let mut s = self.field(name, TypeTag::Array);
        s.fields.put_u16(items.len() as u16);
        for item in items {
            s.fields.put_u8(TypeTag::Object.as_u8());
            item.put_object(&mut s.fields);
        }
        s
    }

    /// A field whose value bytes are written verbatim after the tag.
    pub fn raw_field(self, name: &str, tag: TypeTag, value: &[u8]) -> Self {
        let mut s = self.field(name, tag);
        s.fields.put_slice(value);
        s
    }

    /// A field carrying an arbitrary (possibly unknown) tag byte and no value.
    pub fn raw_tag(mut self, name: &str, tag: u8) -> Self {
        self.count += 1;
        put_str(&mut self.fields, name);
        self.fields.put_u8(tag);
        self
    }

    fn put_object(self, out: &mut Vec<u8>) {
        out.put_u16(self.count);
        out.put_slice(&self.fields);
    }

    /// Root-typed object body, as carried inside a frame.
    pub fn body(self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.fields.len() + 3);
        out.put_u8(TypeTag::Object.as_u8());
        self.put_object(&mut out);
        out
    }

    pub fn frame(self) -> Vec<u8> {
        wrap(MARKER_PLAIN, &self.body())
    }

    pub fn compressed_frame(self) -> Vec<u8> {
        let body = self.body();
        let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
        // Writing into a Vec cannot fail.
        let packed = enc
            .write_all(&body)
            .and_then(|_| enc.finish())
            .unwrap_or(body);
        wrap(MARKER_PLAIN | COMPRESSED_FLAG, &packed)
    }
}

fn put_str(out: &mut Vec<u8>, s: &str) {
    out.put_u16(s.len() as u16);
    out.put_slice(s.as_bytes());
}

fn wrap(marker: u8, body: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(body.len() + 3);
    out.put_u8(marker);
    out.put_u16(body.len() as u16);
    out.put_slice(body);
    out
}
