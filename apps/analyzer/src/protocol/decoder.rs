//! Tagged binary value decoder.
//!
//! Frame layout (all numerics big-endian):
//!
//! ```text
//! [1B marker][2B body length][1B root type = object][2B field count]
//!     {[2B name length][UTF-8 name][1B type][value]}*
//! ```
//!
//! Marker bit `0x20` flags a zlib-compressed body, bit `0x08` widens the body
//! length to 4 bytes. Every length prefix is bounded by [`DecoderLimits`]; a
//! value over its ceiling becomes a placeholder and a recorded error instead of
//! failing the whole frame. Only truncation and a non-object root fail a decode.

use std::io::Read;

use bytes::Buf;
use flate2::read::ZlibDecoder;
use thiserror::Error;

use crate::protocol::value::{DecodedValue, TypeTag};

pub const MARKER_PLAIN: u8 = 0x80;
pub const COMPRESSED_FLAG: u8 = 0x20;
pub const BIG_SIZE_FLAG: u8 = 0x08;

/// Sanity ceilings for every length-prefixed read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderLimits {
    pub max_string_len: usize,
    pub max_object_fields: usize,
    pub max_array_len: usize,
    pub max_byte_array_len: usize,
    /// Upper bound on the inflated size of a compressed envelope.
    pub max_inflated_len: usize,
}

impl Default for DecoderLimits {
    fn default() -> Self {
        Self {
            max_string_len: 100_000,
            max_object_fields: 10_000,
            max_array_len: 50_000,
            max_byte_array_len: 1_048_576,
            max_inflated_len: 16 * 1_048_576,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("truncated at offset {offset}: needed {needed} bytes, {remaining} remaining")]
    Truncated {
        offset: usize,
        needed: usize,
        remaining: usize,
    },
    #[error("root type must be object, found tag {tag}")]
    InvalidRoot { tag: u8 },
    #[error("{what} length {len} exceeds limit {limit} at offset {offset}")]
    LimitExceeded {
        what: &'static str,
        len: usize,
        limit: usize,
        offset: usize,
    },
    #[error("{what} length {len} is negative at offset {offset}")]
    NegativeLength {
        what: &'static str,
        len: i64,
        offset: usize,
    },
    #[error("unknown type tag 0x{tag:02x} at offset {offset}")]
    UnknownType { tag: u8, offset: usize },
    #[error("compressed envelope could not be inflated: {0}")]
    Decompress(String),
    #[error("invalid utf-8 in string at offset {offset}")]
    InvalidUtf8 { offset: usize },
}

impl DecodeError {
    /// Failures that abort the whole decode, as opposed to per-value issues.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            DecodeError::Truncated { .. } | DecodeError::InvalidRoot { .. }
        )
    }
}

/// Result of a successful decode: the root object plus every recoverable issue.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub fields: DecodedValue,
    pub errors: Vec<DecodeError>,
    pub bytes_consumed: usize,
    pub bytes_total: usize,
    pub compressed: bool,
}

/// Decode one frame (`raw_body == false`) or a bare object body (`raw_body == true`).
pub fn decode(
    buffer: &[u8],
    raw_body: bool,
    limits: &DecoderLimits,
) -> Result<Decoded, DecodeError> {
    let bytes_total = buffer.len();
    if raw_body {
        let mut reader = Reader::new(buffer, limits);
        let fields = reader.read_root()?;
        return Ok(Decoded {
            fields,
            bytes_consumed: reader.offset(),
            errors: reader.errors,
            bytes_total,
            compressed: false,
        });
    }

    let mut header = buffer;
    require(header, 1, 0)?;
    let marker = header.get_u8();
    let compressed = marker & COMPRESSED_FLAG != 0;
    let len_width = if marker & BIG_SIZE_FLAG != 0 { 4 } else { 2 };
    require(header, len_width, 1)?;
    let body_len = if len_width == 4 {
        header.get_u32() as usize
    } else {
        header.get_u16() as usize
    };
    let header_len = 1 + len_width;
    require(header, body_len, header_len)?;
    let body = &header[..body_len];

    let mut errors = Vec::new();
    let inflated;
    let body: &[u8] = if compressed {
        match inflate(body, limits.max_inflated_len, header_len) {
            Ok(bytes) => {
                inflated = bytes;
                &inflated
            }
            Err(e @ DecodeError::LimitExceeded { .. }) => {
                // Nothing past the ceiling was inflated; keep the frame as an empty root.
                errors.push(e);
                return Ok(Decoded {
                    fields: DecodedValue::Object(Vec::new()),
                    errors,
                    bytes_consumed: header_len + body_len,
                    bytes_total,
                    compressed,
                });
            }
            Err(e) => {
                // Some servers set the flag on plain bodies.
                errors.push(e);
                body
            }
        }
    } else {
        body
    };

    let mut reader = Reader::new(body, limits);
    let fields = reader.read_root()?;
    let bytes_consumed = if compressed {
        header_len + body_len
    } else {
        header_len + reader.offset()
    };
    errors.append(&mut reader.errors);

    Ok(Decoded {
        fields,
        errors,
        bytes_consumed,
        bytes_total,
        compressed,
    })
}

fn require(buf: &[u8], needed: usize, offset: usize) -> Result<(), DecodeError> {
    if buf.remaining() < needed {
        return Err(DecodeError::Truncated {
            offset,
            needed,
            remaining: buf.remaining(),
        });
    }
    Ok(())
}

fn inflate(body: &[u8], max_len: usize, offset: usize) -> Result<Vec<u8>, DecodeError> {
    let mut out = Vec::new();
    // One byte past the ceiling tells an oversize body apart from one that fits exactly.
    ZlibDecoder::new(body)
        .take(max_len as u64 + 1)
        .read_to_end(&mut out)
        .map_err(|e| DecodeError::Decompress(e.to_string()))?;
    if out.len() > max_len {
        return Err(DecodeError::LimitExceeded {
            what: "inflated body",
            len: out.len(),
            limit: max_len,
            offset,
        });
    }
    Ok(out)
}

struct Reader<'a> {
    buf: &'a [u8],
    len: usize,
    limits: &'a DecoderLimits,
    errors: Vec<DecodeError>,
    /// Set once a value could not be skipped; enclosing containers stop reading.
    desynced: bool,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8], limits: &'a DecoderLimits) -> Self {
        Self {
            buf,
            len: buf.len(),
            limits,
            errors: Vec::new(),
            desynced: false,
        }
    }

    fn offset(&self) -> usize {
        self.len - self.buf.remaining()
    }

    fn need(&self, needed: usize) -> Result<(), DecodeError> {
        require(self.buf, needed, self.offset())
    }

    fn read_root(&mut self) -> Result<DecodedValue, DecodeError> {
        self.need(1)?;
        let tag = self.buf.get_u8();
        if tag != TypeTag::Object.as_u8() {
            return Err(DecodeError::InvalidRoot { tag });
        }
        self.read_object()
    }

    fn read_value(&mut self) -> Result<DecodedValue, DecodeError> {
        self.need(1)?;
        let offset = self.offset();
        let raw = self.buf.get_u8();
        let Some(tag) = TypeTag::from_u8(raw) else {
            self.errors.push(DecodeError::UnknownType { tag: raw, offset });
            self.desynced = true;
            return Ok(DecodedValue::Str(format!("<unknown type 0x{raw:02x}>")));
        };
        self.read_typed(tag)
    }

    fn read_typed(&mut self, tag: TypeTag) -> Result<DecodedValue, DecodeError> {
        let value = match tag {
            TypeTag::Null => DecodedValue::Null,
            TypeTag::Bool => {
                self.need(1)?;
                DecodedValue::Bool(self.buf.get_u8() != 0)
            }
            TypeTag::Byte => {
                self.need(1)?;
                DecodedValue::Byte(self.buf.get_i8())
            }
            TypeTag::Short => {
                self.need(2)?;
                DecodedValue::Short(self.buf.get_i16())
            }
            TypeTag::Int => {
                self.need(4)?;
                DecodedValue::Int(self.buf.get_i32())
            }
            TypeTag::Long => {
                self.need(8)?;
                DecodedValue::Long(self.buf.get_i64())
            }
            TypeTag::Float => {
                self.need(4)?;
                DecodedValue::Float(self.buf.get_f32())
            }
            TypeTag::Double => {
                self.need(8)?;
                DecodedValue::Double(self.buf.get_f64())
            }
            TypeTag::Str => {
                self.need(2)?;
                let len = self.buf.get_u16() as usize;
                self.read_string(len)?
            }
            TypeTag::Text => {
                self.need(4)?;
                let offset = self.offset();
                let len = self.buf.get_i32();
                if len < 0 {
                    return Ok(self.abort_negative("text", i64::from(len), offset));
                }
                self.read_string(len as usize)?
            }
            TypeTag::BoolArray => match self.read_count("bool array")? {
                Some(n) => {
                    self.need(n)?;
                    DecodedValue::BoolArray((0..n).map(|_| self.buf.get_u8() != 0).collect())
                }
                None => placeholder("bool array"),
            },
            TypeTag::ByteArray => self.read_byte_array()?,
            TypeTag::ShortArray => match self.read_count("short array")? {
                Some(n) => {
                    self.need(n * 2)?;
                    DecodedValue::ShortArray((0..n).map(|_| self.buf.get_i16()).collect())
                }
                None => placeholder("short array"),
            },
            TypeTag::IntArray => match self.read_count("int array")? {
                Some(n) => {
                    self.need(n * 4)?;
                    DecodedValue::IntArray((0..n).map(|_| self.buf.get_i32()).collect())
                }
                None => placeholder("int array"),
            },
            TypeTag::LongArray => match self.read_count("long array")? {
                Some(n) => {
                    self.need(n * 8)?;
                    DecodedValue::LongArray((0..n).map(|_| self.buf.get_i64()).collect())
                }
                None => placeholder("long array"),
            },
            TypeTag::FloatArray => match self.read_count("float array")? {
                Some(n) => {
                    self.need(n * 4)?;
                    DecodedValue::FloatArray((0..n).map(|_| self.buf.get_f32()).collect())
                }
                None => placeholder("float array"),
            },
            TypeTag::DoubleArray => match self.read_count("double array")? {
                Some(n) => {
                    self.need(n * 8)?;
                    DecodedValue::DoubleArray((0..n).map(|_| self.buf.get_f64()).collect())
                }
                None => placeholder("double array"),
            },
            TypeTag::StrArray => match self.read_count("string array")? {
                Some(n) => {
                    let mut items = Vec::with_capacity(n.min(256));
                    for _ in 0..n {
                        if self.desynced {
                            break;
                        }
                        self.need(2)?;
                        let len = self.buf.get_u16() as usize;
                        match self.read_string(len)? {
                            DecodedValue::Str(s) => items.push(s),
                            _ => break,
                        }
                    }
                    DecodedValue::StrArray(items)
                }
                None => placeholder("string array"),
            },
            TypeTag::Array => match self.read_count("array")? {
                Some(n) => {
                    let mut items = Vec::with_capacity(n.min(256));
                    for _ in 0..n {
                        if self.desynced {
                            break;
                        }
                        items.push(self.read_value()?);
                    }
                    DecodedValue::Array(items)
                }
                None => placeholder("array"),
            },
            TypeTag::Object | TypeTag::Class => self.read_object()?,
        };
        Ok(value)
    }

    fn read_object(&mut self) -> Result<DecodedValue, DecodeError> {
        self.need(2)?;
        let offset = self.offset();
        let count = self.buf.get_u16() as usize;
        if count > self.limits.max_object_fields {
            self.errors.push(DecodeError::LimitExceeded {
                what: "object",
                len: count,
                limit: self.limits.max_object_fields,
                offset,
            });
            self.desynced = true;
            return Ok(placeholder("object"));
        }
        let mut fields = Vec::with_capacity(count.min(256));
        for _ in 0..count {
            if self.desynced {
                break;
            }
            self.need(2)?;
            let name_len = self.buf.get_u16() as usize;
            let name = match self.read_string(name_len)? {
                DecodedValue::Str(s) => s,
                other => {
                    fields.push((String::new(), other));
                    break;
                }
            };
            let value = self.read_value()?;
            fields.push((name, value));
        }
        Ok(DecodedValue::Object(fields))
    }

    /// Reads a 2-byte element count; `None` when the count is over the ceiling.
    fn read_count(&mut self, what: &'static str) -> Result<Option<usize>, DecodeError> {
        self.need(2)?;
        let offset = self.offset();
        let count = self.buf.get_u16() as usize;
        if count > self.limits.max_array_len {
            self.errors.push(DecodeError::LimitExceeded {
                what,
                len: count,
                limit: self.limits.max_array_len,
                offset,
            });
            self.desynced = true;
            return Ok(None);
        }
        Ok(Some(count))
    }

    fn read_byte_array(&mut self) -> Result<DecodedValue, DecodeError> {
        self.need(4)?;
        let offset = self.offset();
        let len = self.buf.get_i32();
        if len < 0 {
            return Ok(self.abort_negative("byte array", i64::from(len), offset));
        }
        let len = len as usize;
        if len > self.limits.max_byte_array_len {
            self.errors.push(DecodeError::LimitExceeded {
                what: "byte array",
                len,
                limit: self.limits.max_byte_array_len,
                offset,
            });
            self.desynced = true;
            return Ok(placeholder("byte array"));
        }
        self.need(len)?;
        Ok(DecodedValue::ByteArray(self.buf.copy_to_bytes(len).to_vec()))
    }

    fn read_string(&mut self, len: usize) -> Result<DecodedValue, DecodeError> {
        let offset = self.offset();
        if len > self.limits.max_string_len {
            self.errors.push(DecodeError::LimitExceeded {
                what: "string",
                len,
                limit: self.limits.max_string_len,
                offset,
            });
            if self.buf.remaining() >= len {
                self.buf.advance(len);
            } else {
                self.desynced = true;
            }
            return Ok(DecodedValue::Str(format!("<string too long: {len} bytes>")));
        }
        self.need(len)?;
        let bytes = &self.buf[..len];
        let s = match std::str::from_utf8(bytes) {
            Ok(s) => s.to_owned(),
            Err(_) => {
                self.errors.push(DecodeError::InvalidUtf8 { offset });
                String::from_utf8_lossy(bytes).into_owned()
            }
        };
        self.buf.advance(len);
        Ok(DecodedValue::Str(s))
    }

    fn abort_negative(&mut self, what: &'static str, len: i64, offset: usize) -> DecodedValue {
        self.errors
            .push(DecodeError::NegativeLength { what, len, offset });
        self.desynced = true;
        placeholder(what)
    }
}

fn placeholder(what: &str) -> DecodedValue {
    DecodedValue::Str(format!("<{what} rejected>"))
}
