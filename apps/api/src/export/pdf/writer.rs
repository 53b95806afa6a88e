//! Low-level file writer: header, numbered objects, cross-reference table and trailer.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::export::pdf::objects::{PdfDictionary, PdfObject, PdfSerializer, PdfStream};
use crate::export::pdf::PdfError;

pub struct PdfWriter<W: Write> {
    writer: W,
    position: u64,
    /// (object number, byte offset) for every object written so far.
    offsets: Vec<(u32, u64)>,
    next_obj_num: u32,
    compress: bool,
}

impl<W: Write> PdfWriter<W> {
    pub fn new(writer: W, compress: bool) -> Self {
        Self {
            writer,
            position: 0,
            offsets: Vec::new(),
            next_obj_num: 1,
            compress,
        }
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<(), PdfError> {
        self.writer.write_all(data)?;
        self.position += data.len() as u64;
        Ok(())
    }

    pub fn allocate_object(&mut self) -> u32 {
        let num = self.next_obj_num;
        self.next_obj_num += 1;
        num
    }

    pub fn write_header(&mut self) -> Result<(), PdfError> {
        self.write_bytes(b"%PDF-1.4\n")?;
        // Binary marker so transfer tools treat the file as binary.
        self.write_bytes(&[b'%', 0xE2, 0xE3, 0xCF, 0xD3, b'\n'])
    }

    fn begin_object(&mut self, obj_num: u32) -> Result<(), PdfError> {
        self.offsets.push((obj_num, self.position));
        self.write_bytes(format!("{obj_num} 0 obj\n").as_bytes())
    }

    pub fn write_object(&mut self, obj_num: u32, object: &PdfObject) -> Result<(), PdfError> {
        self.begin_object(obj_num)?;
        let mut serializer = PdfSerializer::new(Vec::new());
        serializer.write_object(object)?;
        self.write_bytes(&serializer.into_inner())?;
        self.write_bytes(b"\nendobj\n")
    }

    pub fn write_stream_object(
        &mut self,
        obj_num: u32,
        mut stream: PdfStream,
    ) -> Result<(), PdfError> {
        if self.compress && !stream.encoded {
            let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(&stream.data)?;
            stream.data = encoder.finish()?;
            stream.encoded = true;
            stream.dict.insert("Filter", PdfObject::name("FlateDecode"));
        }
        stream
            .dict
            .insert("Length", PdfObject::Integer(stream.data.len() as i64));

        self.begin_object(obj_num)?;
        let mut serializer = PdfSerializer::new(Vec::new());
        serializer.write_stream(&stream)?;
        self.write_bytes(&serializer.into_inner())?;
        self.write_bytes(b"\nendobj\n")
    }

    pub fn write_xref_and_trailer(
        &mut self,
        catalog_ref: u32,
        info_ref: Option<u32>,
    ) -> Result<(), PdfError> {
        let xref_offset = self.position;
        let mut offsets = std::mem::take(&mut self.offsets);
        offsets.sort_by_key(|(num, _)| *num);

        let mut table = format!("xref\n0 {}\n0000000000 65535 f \n", self.next_obj_num);
        let mut expected = 1u32;
        for (num, offset) in &offsets {
            while expected < *num {
                table.push_str("0000000000 65535 f \n");
                expected += 1;
            }
            table.push_str(&format!("{offset:010} 00000 n \n"));
            expected = num + 1;
        }
        while expected < self.next_obj_num {
            table.push_str("0000000000 65535 f \n");
            expected += 1;
        }
        self.write_bytes(table.as_bytes())?;

        let mut trailer = PdfDictionary::new();
        trailer.insert("Size", PdfObject::Integer(i64::from(self.next_obj_num)));
        trailer.insert("Root", PdfObject::Reference(catalog_ref));
        if let Some(info) = info_ref {
            trailer.insert("Info", PdfObject::Reference(info));
        }
        let mut serializer = PdfSerializer::new(Vec::new());
        serializer.write_object(&PdfObject::Dictionary(trailer))?;

        self.write_bytes(b"trailer\n")?;
        self.write_bytes(&serializer.into_inner())?;
        self.write_bytes(format!("\nstartxref\n{xref_offset}\n%%EOF\n").as_bytes())
    }

    pub fn finish(mut self) -> Result<W, PdfError> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let mut pdf = PdfWriter::new(Vec::new(), false);
        let a = pdf.allocate_object();
        let b = pdf.allocate_object();
        pdf.write_object(b, &PdfObject::Integer(7)).unwrap();
        pdf.write_object(a, &PdfObject::name("Catalog")).unwrap();
        pdf.write_xref_and_trailer(a, None).unwrap();
        let bytes = pdf.finish().unwrap();
        let text = String::from_utf8_lossy(&bytes);

        let xref_at = text.find("xref\n").unwrap();
        let rows: Vec<&str> = text[xref_at..].lines().skip(3).take(2).collect();
        for (i, row) in rows.iter().enumerate() {
            let offset: usize = row[..10].parse().unwrap();
            assert!(bytes[offset..].starts_with(format!("{} 0 obj", i + 1).as_bytes()));
        }
        assert!(text.ends_with(&format!("startxref\n{xref_at}\n%%EOF\n")));
    }

    #[test]
    fn test_stream_compression_sets_filter_and_length() {
        let mut pdf = PdfWriter::new(Vec::new(), true);
        let n = pdf.allocate_object();
        pdf.write_stream_object(n, PdfStream::new(b"0 0 10 10 re f\n".repeat(50)))
            .unwrap();
        let text = String::from_utf8_lossy(&pdf.finish().unwrap()).into_owned();
        assert!(text.contains("/Filter /FlateDecode"));
        assert!(!text.contains("re f"));
    }
}
