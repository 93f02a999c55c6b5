use crate::{FieldSchema, Header, DEFAULT_MAGIC};

/// Six-column schema whose encoded header is exactly 70 bytes.
pub fn contractor_header() -> Header {
    Header::new(
        DEFAULT_MAGIC,
        vec![
            FieldSchema::new("name", 32),
            FieldSchema::new("location", 64),
            FieldSchema::new("specialties", 64),
            FieldSchema::new("size", 6),
            FieldSchema::new("rate", 8),
            FieldSchema::new("owner", 8),
        ],
    )
}

pub fn small_header() -> Header {
    Header::new(
        DEFAULT_MAGIC,
        vec![FieldSchema::new("name", 8), FieldSchema::new("city", 8)],
    )
}
