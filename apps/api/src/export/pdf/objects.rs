//! PDF object model and serializer.

use std::collections::BTreeMap;
use std::io::{self, Write};

#[derive(Debug, Clone)]
pub enum PdfObject {
    Integer(i64),
    Real(f64),
    /// Literal string; bytes are already in the target encoding.
    String(Vec<u8>),
    Name(String),
    Array(Vec<PdfObject>),
    Dictionary(PdfDictionary),
    /// Indirect reference by object number (generation is always 0).
    Reference(u32),
}

impl PdfObject {
    pub fn name(s: impl Into<String>) -> Self {
        PdfObject::Name(s.into())
    }
}

/// Dictionary with deterministic key order.
#[derive(Debug, Clone, Default)]
pub struct PdfDictionary {
    entries: BTreeMap<String, PdfObject>,
}

impl PdfDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(type_name: &str) -> Self {
        let mut dict = Self::new();
        dict.insert("Type", PdfObject::name(type_name));
        dict
    }

    pub fn insert(&mut self, key: impl Into<String>, value: PdfObject) {
        self.entries.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&PdfObject> {
        self.entries.get(key)
    }
}

#[derive(Debug, Clone)]
pub struct PdfStream {
    pub dict: PdfDictionary,
    pub data: Vec<u8>,
    /// Set when `data` already carries a filter and must not be recompressed.
    pub encoded: bool,
}

impl PdfStream {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            dict: PdfDictionary::new(),
            data,
            encoded: false,
        }
    }
}

pub struct PdfSerializer<W: Write> {
    writer: W,
}

impl<W: Write> PdfSerializer<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    pub fn write_object(&mut self, obj: &PdfObject) -> io::Result<()> {
        match obj {
            PdfObject::Integer(n) => write!(self.writer, "{n}"),
            PdfObject::Real(n) => write!(self.writer, "{}", format_real(*n)),
            PdfObject::String(bytes) => self.write_string(bytes),
            PdfObject::Name(name) => self.write_name(name),
            PdfObject::Array(items) => {
                write!(self.writer, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(self.writer, " ")?;
                    }
                    self.write_object(item)?;
                }
                write!(self.writer, "]")
            }
            PdfObject::Dictionary(dict) => self.write_dictionary(dict),
            PdfObject::Reference(num) => write!(self.writer, "{num} 0 R"),
        }
    }

    pub fn write_stream(&mut self, stream: &PdfStream) -> io::Result<()> {
        self.write_dictionary(&stream.dict)?;
        write!(self.writer, "\nstream\n")?;
        self.writer.write_all(&stream.data)?;
        write!(self.writer, "\nendstream")
    }

    fn write_dictionary(&mut self, dict: &PdfDictionary) -> io::Result<()> {
        write!(self.writer, "<<")?;
        for (key, value) in &dict.entries {
            write!(self.writer, " ")?;
            self.write_name(key)?;
            write!(self.writer, " ")?;
            self.write_object(value)?;
        }
        write!(self.writer, " >>")
    }

    fn write_string(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.writer.write_all(&escape_string(bytes))
    }

    fn write_name(&mut self, name: &str) -> io::Result<()> {
        write!(self.writer, "/")?;
        for byte in name.bytes() {
            match byte {
                b'#' | b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%' => {
                    write!(self.writer, "#{byte:02X}")?
                }
                0x21..=0x7E => self.writer.write_all(&[byte])?,
                _ => write!(self.writer, "#{byte:02X}")?,
            }
        }
        Ok(())
    }
}

/// Shortest decimal form: integers without a fraction, others to four places.
pub fn format_real(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{n:.0}")
    } else {
        let s = format!("{n:.4}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Wraps bytes as a PDF literal string, escaping delimiters and non-printables.
pub fn escape_string(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len() + 2);
    out.push(b'(');
    for &byte in bytes {
        match byte {
            b'(' | b')' | b'\\' => {
                out.push(b'\\');
                out.push(byte);
            }
            b'\n' => out.extend_from_slice(b"\\n"),
            b'\r' => out.extend_from_slice(b"\\r"),
            b'\t' => out.extend_from_slice(b"\\t"),
            0x20..=0x7E | 0x80..=0xFF => out.push(byte),
            _ => out.extend_from_slice(format!("\\{byte:03o}").as_bytes()),
        }
    }
    out.push(b')');
    out
}
