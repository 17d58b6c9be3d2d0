use std::collections::HashMap;
use std::io::{self, Write};

use crate::objects::{ObjId, PdfObject};

/// Low-level PDF binary writer. Serializes PDF objects to any
/// `Write` target while tracking byte offsets for the xref table.
pub struct PdfWriter<W: Write> {
    writer: W,
    offset: usize,
    xref_entries: Vec<(u32, usize)>,
}

impl<W: Write> PdfWriter<W> {
    pub fn new(writer: W) -> Self {
        PdfWriter {
            writer,
            offset: 0,
            xref_entries: Vec::new(),
        }
    }

    /// Write raw bytes, tracking the byte offset.
    fn write_bytes(&mut self, data: &[u8]) -> io::Result<()> {
        self.writer.write_all(data)?;
        self.offset += data.len();
        Ok(())
    }

    fn write_str(&mut self, s: &str) -> io::Result<()> {
        self.write_bytes(s.as_bytes())
    }

    /// Write the PDF 1.7 header and binary comment.
    pub fn write_header(&mut self) -> io::Result<()> {
        self.write_str("%PDF-1.7\n")?;
        // Binary comment: 4 bytes >= 128 for binary detection.
        self.write_bytes(b"%\xe2\xe3\xcf\xd3\n")
    }

    /// Write an indirect object, recording its byte offset for xref.
    pub fn write_object(&mut self, id: ObjId, obj: &PdfObject) -> io::Result<()> {
        self.xref_entries.push((id.0, self.offset));
        self.write_str(&format!("{} {} obj\n", id.0, id.1))?;
        self.write_pdf_object(obj)?;
        self.write_str("\nendobj\n")
    }

    fn write_entries(&mut self, entries: &[(String, PdfObject)]) -> io::Result<()> {
        for (key, val) in entries {
            self.write_str(" /")?;
            self.write_str(key)?;
            self.write_str(" ")?;
            self.write_pdf_object(val)?;
        }
        Ok(())
    }

    /// Serialize a PdfObject to its PDF text representation.
    fn write_pdf_object(&mut self, obj: &PdfObject) -> io::Result<()> {
        match obj {
            PdfObject::Integer(n) => self.write_str(&n.to_string()),
            PdfObject::Real(f) => self.write_str(&format_real(*f)),
            PdfObject::Name(name) => {
                self.write_str("/")?;
                self.write_str(name)
            }
            PdfObject::LiteralString(s) => {
                self.write_str("(")?;
                self.write_bytes(&encode_text(s))?;
                self.write_str(")")
            }
            PdfObject::Array(items) => {
                self.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.write_str(" ")?;
                    }
                    self.write_pdf_object(item)?;
                }
                self.write_str("]")
            }
            PdfObject::Dictionary(entries) => {
                self.write_str("<<")?;
                self.write_entries(entries)?;
                self.write_str(" >>")
            }
            PdfObject::Stream { dict, data } => {
                self.write_str("<<")?;
                self.write_entries(dict)?;
                self.write_str(&format!(" /Length {} >>\nstream\n", data.len()))?;
                self.write_bytes(data)?;
                self.write_str("\nendstream")
            }
            PdfObject::Reference(id) => self.write_str(&format!("{} {} R", id.0, id.1)),
        }
    }

    /// Write xref table, trailer, startxref, and %%EOF.
    pub fn write_xref_and_trailer(
        &mut self,
        root_id: ObjId,
        info_id: Option<ObjId>,
    ) -> io::Result<()> {
        let xref_offset = self.offset;

        let offsets: HashMap<u32, usize> = self.xref_entries.iter().copied().collect();
        let size = offsets.keys().max().copied().unwrap_or(0) + 1;

        self.write_str(&format!("xref\n0 {}\n", size))?;
        // Object 0: free entry head (exactly 20 bytes).
        self.write_bytes(b"0000000000 65535 f\r\n")?;
        for obj_num in 1..size {
            match offsets.get(&obj_num) {
                Some(&off) => {
                    self.write_str(&format!("{:010} 00000 n\r\n", off))?;
                }
                // Free entry for gaps.
                None => self.write_bytes(b"0000000000 00000 f\r\n")?,
            }
        }

        self.write_str(&format!(
            "trailer\n<< /Size {} /Root {} {} R",
            size, root_id.0, root_id.1,
        ))?;
        if let Some(info) = info_id {
            self.write_str(&format!(" /Info {} {} R", info.0, info.1))?;
        }
        self.write_str(" >>\n")?;
        self.write_str(&format!("startxref\n{}\n%%EOF\n", xref_offset))
    }

    /// Return the inner writer, consuming this PdfWriter.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Map a char to its WinAnsiEncoding byte, if it has one.
fn win_ansi_byte(c: char) -> Option<u8> {
    let code = c as u32;
    match code {
        0x20..=0x7E | 0xA0..=0xFF => Some(code as u8),
        _ => {
            let b = match c {
                '€' => 0x80,
                '‚' => 0x82,
                '„' => 0x84,
                '…' => 0x85,
                '‰' => 0x89,
                '‘' => 0x91,
                '’' => 0x92,
                '“' => 0x93,
                '”' => 0x94,
                '•' => 0x95,
                '–' => 0x96,
                '—' => 0x97,
                '™' => 0x99,
                _ => return None,
            };
            Some(b)
        }
    }
}

/// Encode text for a PDF literal string: WinAnsi bytes with `\`,
/// `(` and `)` escaped. Characters outside WinAnsi become `?`.
pub fn encode_text(s: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.extend_from_slice(b"\\\\"),
            '(' => out.extend_from_slice(b"\\("),
            ')' => out.extend_from_slice(b"\\)"),
            '\n' => out.extend_from_slice(b"\\n"),
            '\r' => out.extend_from_slice(b"\\r"),
            '\t' => out.push(b' '),
            _ => out.push(win_ansi_byte(c).unwrap_or(b'?')),
        }
    }
    out
}

/// Format a float for PDF output: no trailing zeros,
/// no scientific notation.
fn format_real(f: f64) -> String {
    if f == f.floor() && f.abs() < 1e15 {
        format!("{:.1}", f)
    } else {
        let s = format!("{:.6}", f);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written(obj: &PdfObject) -> Vec<u8> {
        let mut buf = Vec::new();
        let mut w = PdfWriter::new(&mut buf);
        w.write_object(ObjId(1, 0), obj).unwrap();
        buf
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn header_has_binary_comment() {
        let mut buf = Vec::new();
        PdfWriter::new(&mut buf).write_header().unwrap();
        assert!(buf.starts_with(b"%PDF-1.7\n%"));
        assert!(buf[10..14].iter().all(|&b| b >= 128));
    }

    #[test]
    fn dictionary_with_reference() {
        let obj = PdfObject::dict(vec![
            ("Type", PdfObject::name("Catalog")),
            ("Pages", PdfObject::Reference(ObjId(2, 0))),
        ]);
        let out = written(&obj);
        assert!(contains(&out, b"1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj"));
    }

    #[test]
    fn stream_length_counts_data_bytes() {
        let obj = PdfObject::stream(vec![], b"BT /F1 10 Tf ET".to_vec());
        let out = written(&obj);
        assert!(contains(&out, b"/Length 15 >>\nstream\nBT /F1 10 Tf ET\nendstream"));
    }

    #[test]
    fn literal_string_is_win_ansi() {
        let out = written(&PdfObject::literal_string("Cotización (ARS)"));
        assert!(contains(&out, b"(Cotizaci\xf3n \\(ARS\\))"));
    }

    #[test]
    fn encode_text_maps_symbols() {
        assert_eq!(encode_text("N° 7"), b"N\xb0 7".to_vec());
        assert_eq!(encode_text("€"), vec![0x80]);
        assert_eq!(encode_text("a\\b"), b"a\\\\b".to_vec());
        assert_eq!(encode_text("漢"), b"?".to_vec());
    }

    #[test]
    fn xref_entries_are_20_bytes_and_gaps_are_free() {
        let mut buf = Vec::new();
        let mut w = PdfWriter::new(&mut buf);
        w.write_header().unwrap();
        w.write_object(ObjId(1, 0), &PdfObject::name("Catalog")).unwrap();
        w.write_object(ObjId(3, 0), &PdfObject::name("Other")).unwrap();
        w.write_xref_and_trailer(ObjId(1, 0), None).unwrap();

        let marker = b"xref\n0 4\n";
        let pos = buf.windows(marker.len()).position(|w| w == marker).unwrap();
        let entries = &buf[pos + marker.len()..];
        for i in 0..4 {
            assert_eq!(&entries[i * 20 + 18..i * 20 + 20], b"\r\n");
        }
        assert_eq!(&entries[40..60], b"0000000000 00000 f\r\n");
    }

    #[test]
    fn trailer_names_root_and_info() {
        let mut buf = Vec::new();
        let mut w = PdfWriter::new(&mut buf);
        w.write_header().unwrap();
        w.write_object(ObjId(1, 0), &PdfObject::name("Catalog")).unwrap();
        w.write_object(ObjId(2, 0), &PdfObject::dict(vec![])).unwrap();
        w.write_xref_and_trailer(ObjId(1, 0), Some(ObjId(2, 0))).unwrap();
        let output = String::from_utf8_lossy(&buf);
        assert!(output.contains("<< /Size 3 /Root 1 0 R /Info 2 0 R >>"));
        assert!(output.ends_with("%%EOF\n"));
    }

    #[test]
    fn format_real_values() {
        assert_eq!(format_real(595.0), "595.0");
        assert_eq!(format_real(12.5), "12.5");
        assert_eq!(format_real(0.333333333), "0.333333");
    }
}
