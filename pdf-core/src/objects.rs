/// Object identifier: (object_number, generation_number).
/// Generation is always 0 for new documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjId(pub u32, pub u16);

/// PDF object types needed to describe a generated document
/// (PDF 32000-1:2008 Section 7.3).
#[derive(Debug, Clone)]
pub enum PdfObject {
    Integer(i64),
    Real(f64),
    /// PDF name object (stored without the leading `/`).
    Name(String),
    /// Text string; encoded to WinAnsi bytes when written.
    LiteralString(String),
    Array(Vec<PdfObject>),
    /// Key-value pairs. Uses Vec for deterministic output order.
    Dictionary(Vec<(String, PdfObject)>),
    Stream {
        dict: Vec<(String, PdfObject)>,
        data: Vec<u8>,
    },
    Reference(ObjId),
}

impl PdfObject {
    pub fn name(s: &str) -> Self {
        PdfObject::Name(s.to_string())
    }

    pub fn literal_string(s: &str) -> Self {
        PdfObject::LiteralString(s.to_string())
    }

    pub fn array(items: Vec<PdfObject>) -> Self {
        PdfObject::Array(items)
    }

    pub fn dict(entries: Vec<(&str, PdfObject)>) -> Self {
        PdfObject::Dictionary(owned_entries(entries))
    }

    pub fn stream(dict_entries: Vec<(&str, PdfObject)>, data: Vec<u8>) -> Self {
        PdfObject::Stream {
            dict: owned_entries(dict_entries),
            data,
        }
    }

    /// A `[0 0 w h]` rectangle such as a MediaBox.
    pub fn rect(width: f64, height: f64) -> Self {
        PdfObject::array(vec![
            PdfObject::Integer(0),
            PdfObject::Integer(0),
            PdfObject::Real(width),
            PdfObject::Real(height),
        ])
    }
}

fn owned_entries(entries: Vec<(&str, PdfObject)>) -> Vec<(String, PdfObject)> {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dict_keeps_insertion_order() {
        let obj = PdfObject::dict(vec![
            ("Type", PdfObject::name("Font")),
            ("Subtype", PdfObject::name("Type1")),
            ("BaseFont", PdfObject::name("Helvetica")),
        ]);
        match obj {
            PdfObject::Dictionary(entries) => {
                let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
                assert_eq!(keys, ["Type", "Subtype", "BaseFont"]);
            }
            _ => panic!("expected Dictionary"),
        }
    }

    #[test]
    fn rect_is_four_numbers() {
        match PdfObject::rect(595.0, 842.0) {
            PdfObject::Array(items) => {
                assert_eq!(items.len(), 4);
                assert!(matches!(items[2], PdfObject::Real(w) if w == 595.0));
            }
            _ => panic!("expected Array"),
        }
    }

    #[test]
    fn stream_carries_dict_and_data() {
        let obj = PdfObject::stream(
            vec![("Filter", PdfObject::name("FlateDecode"))],
            vec![1, 2, 3],
        );
        match obj {
            PdfObject::Stream { dict, data } => {
                assert_eq!(dict[0].0, "Filter");
                assert_eq!(data, vec![1, 2, 3]);
            }
            _ => panic!("expected Stream"),
        }
    }
}
