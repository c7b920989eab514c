//! Push-style JSON writer and type-tag hooks.
//!
//! [`JsonWriter`] emits compact JSON into an in-memory buffer. Structure
//! (objects, arrays, field names, separators) is tracked here; scalar
//! formatting and string escaping are delegated to `serde_json`.

use serde::Serialize;

use crate::error::EncodeError;

// =============================================================================
// WRITER
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Object { members: usize, awaiting_value: bool },
    Array { items: usize },
}

/// Writer for encoding JSON text.
///
/// Output written before a failure stays in the buffer; callers that need
/// all-or-nothing output should only commit [`JsonWriter::into_string`].
#[derive(Debug, Clone, Default)]
pub struct JsonWriter {
    buf: Vec<u8>,
    frames: Vec<Frame>,
    root_written: bool,
}

impl JsonWriter {
    /// Creates a new writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new writer with capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Returns a reference to the written bytes, complete or not.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Returns the number of bytes written.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true if no bytes have been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Returns true once exactly one root value has been fully written.
    pub fn is_complete(&self) -> bool {
        self.root_written && self.frames.is_empty()
    }

    /// Returns the finished document.
    pub fn into_string(self) -> Result<String, EncodeError> {
        if !self.is_complete() {
            return Err(EncodeError::WriterState {
                context: "document is incomplete",
            });
        }
        String::from_utf8(self.buf).map_err(|e| EncodeError::Json(e.to_string()))
    }

    /// Accounts for a value about to be written at the current position.
    fn before_value(&mut self) -> Result<(), EncodeError> {
        match self.frames.last_mut() {
            None => {
                if self.root_written {
                    return Err(EncodeError::WriterState {
                        context: "more than one root value",
                    });
                }
                self.root_written = true;
            }
            Some(Frame::Object { awaiting_value, .. }) => {
                if !*awaiting_value {
                    return Err(EncodeError::WriterState {
                        context: "object value written without a field name",
                    });
                }
                *awaiting_value = false;
            }
            Some(Frame::Array { items }) => {
                if *items > 0 {
                    self.buf.push(b',');
                }
                *items += 1;
            }
        }
        Ok(())
    }

    /// Opens an object.
    pub fn begin_object(&mut self) -> Result<(), EncodeError> {
        self.before_value()?;
        self.buf.push(b'{');
        self.frames.push(Frame::Object {
            members: 0,
            awaiting_value: false,
        });
        Ok(())
    }

    /// Closes the innermost object.
    pub fn end_object(&mut self) -> Result<(), EncodeError> {
        match self.frames.pop() {
            Some(Frame::Object {
                awaiting_value: false,
                ..
            }) => {
                self.buf.push(b'}');
                Ok(())
            }
            Some(Frame::Object { .. }) => Err(EncodeError::WriterState {
                context: "object closed after a field name without a value",
            }),
            _ => Err(EncodeError::WriterState {
                context: "end_object without a matching begin_object",
            }),
        }
    }

    /// Opens an array.
    pub fn begin_array(&mut self) -> Result<(), EncodeError> {
        self.before_value()?;
        self.buf.push(b'[');
        self.frames.push(Frame::Array { items: 0 });
        Ok(())
    }

    /// Closes the innermost array.
    pub fn end_array(&mut self) -> Result<(), EncodeError> {
        match self.frames.pop() {
            Some(Frame::Array { .. }) => {
                self.buf.push(b']');
                Ok(())
            }
            _ => Err(EncodeError::WriterState {
                context: "end_array without a matching begin_array",
            }),
        }
    }

    /// Writes a field name inside the innermost object.
    pub fn field_name(&mut self, name: &str) -> Result<(), EncodeError> {
        match self.frames.last_mut() {
            Some(Frame::Object {
                members,
                awaiting_value,
            }) if !*awaiting_value => {
                if *members > 0 {
                    self.buf.push(b',');
                }
                *members += 1;
                *awaiting_value = true;
            }
            _ => {
                return Err(EncodeError::WriterState {
                    context: "field name outside an object or before the previous value",
                });
            }
        }
        serde_json::to_writer(&mut self.buf, name)?;
        self.buf.push(b':');
        Ok(())
    }

    /// Writes an escaped string.
    pub fn write_str(&mut self, value: &str) -> Result<(), EncodeError> {
        self.before_value()?;
        serde_json::to_writer(&mut self.buf, value)?;
        Ok(())
    }

    /// Writes an integer.
    pub fn write_i64(&mut self, value: i64) -> Result<(), EncodeError> {
        self.before_value()?;
        serde_json::to_writer(&mut self.buf, &value)?;
        Ok(())
    }

    /// Writes a double. Non-finite values have no JSON form and are rejected.
    pub fn write_f64(&mut self, value: f64) -> Result<(), EncodeError> {
        if !value.is_finite() {
            return Err(EncodeError::NonFiniteFloat { value });
        }
        self.before_value()?;
        serde_json::to_writer(&mut self.buf, &value)?;
        Ok(())
    }

    /// Writes a float using its shortest f32 representation.
    pub fn write_f32(&mut self, value: f32) -> Result<(), EncodeError> {
        if !value.is_finite() {
            return Err(EncodeError::NonFiniteFloat {
                value: f64::from(value),
            });
        }
        self.before_value()?;
        serde_json::to_writer(&mut self.buf, &value)?;
        Ok(())
    }

    pub fn write_bool(&mut self, value: bool) -> Result<(), EncodeError> {
        self.before_value()?;
        self.buf.extend_from_slice(if value { b"true" } else { b"false" });
        Ok(())
    }

    pub fn write_null(&mut self) -> Result<(), EncodeError> {
        self.before_value()?;
        self.buf.extend_from_slice(b"null");
        Ok(())
    }

    /// Writes any serde value with the generic JSON encoder.
    pub fn write_serialize<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), EncodeError> {
        self.before_value()?;
        serde_json::to_writer(&mut self.buf, value)?;
        Ok(())
    }

    /// Writes `"name":"value"`.
    pub fn string_field(&mut self, name: &str, value: &str) -> Result<(), EncodeError> {
        self.field_name(name)?;
        self.write_str(value)
    }
}

// =============================================================================
// TYPE TAGS
// =============================================================================

/// Hook that surrounds a scalar with a type discriminator.
///
/// The codec calls `write_type_prefix`, writes the plain scalar, then calls
/// `write_type_suffix`. What the tag looks like is up to the implementation.
pub trait TypeTagger {
    fn write_type_prefix(&self, w: &mut JsonWriter, type_id: &str) -> Result<(), EncodeError>;
    fn write_type_suffix(&self, w: &mut JsonWriter, type_id: &str) -> Result<(), EncodeError>;
}

/// Built-in type tag layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TypeTagStyle {
    /// `["numeric", 42]`
    #[default]
    WrapperArray,
    /// `{"numeric": 42}`
    WrapperObject,
}

impl TypeTagger for TypeTagStyle {
    fn write_type_prefix(&self, w: &mut JsonWriter, type_id: &str) -> Result<(), EncodeError> {
        match self {
            TypeTagStyle::WrapperArray => {
                w.begin_array()?;
                w.write_str(type_id)
            }
            TypeTagStyle::WrapperObject => {
                w.begin_object()?;
                w.field_name(type_id)
            }
        }
    }

    fn write_type_suffix(&self, w: &mut JsonWriter, _type_id: &str) -> Result<(), EncodeError> {
        match self {
            TypeTagStyle::WrapperArray => w.end_array(),
            TypeTagStyle::WrapperObject => w.end_object(),
        }
    }
}
