//! Reader and writer for the compiled binary lookup form (GNU gettext MO).
//!
//! Only the little-endian layout without a hash table is written; both byte
//! orders are accepted when reading.

use crate::core::error::{CatalogError, Result};

pub const MO_MAGIC: u32 = 0x9504_12de;

const HEADER_LEN: usize = 28;

/// Separator between context and id in compiled keys.
pub const CONTEXT_SEPARATOR: char = '\u{4}';

/// Builds the compiled lookup key for a message.
pub fn encode_key(context: Option<&str>, id: &str) -> String {
    match context {
        Some(context) => format!("{}{}{}", context, CONTEXT_SEPARATOR, id),
        None => id.to_string(),
    }
}

/// Serializes `(key, translation)` pairs. Entries are sorted by key, which
/// places the header entry (empty key) first.
pub fn write_mo(entries: &[(String, String)]) -> Vec<u8> {
    let mut sorted: Vec<&(String, String)> = entries.iter().collect();
    sorted.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

    let count = sorted.len();
    let originals_offset = HEADER_LEN;
    let translations_offset = originals_offset + count * 8;
    let data_offset = translations_offset + count * 8;

    let mut originals_table = Vec::with_capacity(count * 8);
    let mut translations_table = Vec::with_capacity(count * 8);
    let mut data = Vec::new();

    for (key, _) in &sorted {
        push_u32(&mut originals_table, key.len());
        push_u32(&mut originals_table, data_offset + data.len());
        data.extend_from_slice(key.as_bytes());
        data.push(0);
    }
    for (_, translation) in &sorted {
        push_u32(&mut translations_table, translation.len());
        push_u32(&mut translations_table, data_offset + data.len());
        data.extend_from_slice(translation.as_bytes());
        data.push(0);
    }

    let mut out = Vec::with_capacity(data_offset + data.len());
    out.extend_from_slice(&MO_MAGIC.to_le_bytes());
    push_u32(&mut out, 0); // revision
    push_u32(&mut out, count);
    push_u32(&mut out, originals_offset);
    push_u32(&mut out, translations_offset);
    push_u32(&mut out, 0); // hash table size
    push_u32(&mut out, data_offset);
    out.extend_from_slice(&originals_table);
    out.extend_from_slice(&translations_table);
    out.extend_from_slice(&data);
    out
}

fn push_u32(out: &mut Vec<u8>, value: usize) {
    out.extend_from_slice(&(value as u32).to_le_bytes());
}

/// Parses compiled bytes back into `(key, translation)` pairs.
pub fn read_mo(bytes: &[u8]) -> Result<Vec<(String, String)>> {
    let magic = read_u32(bytes, 0, false)?;
    let big_endian = match magic {
        MO_MAGIC => false,
        m if m.swap_bytes() == MO_MAGIC => true,
        other => {
            return Err(CatalogError::InvalidMo {
                message: format!("unknown magic number {:#010x}", other),
            });
        }
    };

    let count = read_u32(bytes, 8, big_endian)? as usize;
    let originals_offset = read_u32(bytes, 12, big_endian)? as usize;
    let translations_offset = read_u32(bytes, 16, big_endian)? as usize;

    // Each entry needs two 8-byte descriptors.
    if count > bytes.len() / 16 {
        return Err(CatalogError::InvalidMo {
            message: format!("entry count {} exceeds file size {}", count, bytes.len()),
        });
    }

    let mut entries = Vec::with_capacity(count);
    for i in 0..count {
        let key = read_string(bytes, originals_offset + i * 8, big_endian)?;
        let translation = read_string(bytes, translations_offset + i * 8, big_endian)?;
        entries.push((key, translation));
    }
    Ok(entries)
}

fn read_u32(bytes: &[u8], offset: usize, big_endian: bool) -> Result<u32> {
    let raw: [u8; 4] = bytes
        .get(offset..offset + 4)
        .and_then(|slice| slice.try_into().ok())
        .ok_or_else(|| CatalogError::InvalidMo {
            message: format!("truncated at offset {}", offset),
        })?;
    Ok(if big_endian {
        u32::from_be_bytes(raw)
    } else {
        u32::from_le_bytes(raw)
    })
}

fn read_string(bytes: &[u8], descriptor: usize, big_endian: bool) -> Result<String> {
    let len = read_u32(bytes, descriptor, big_endian)? as usize;
    let offset = read_u32(bytes, descriptor + 4, big_endian)? as usize;
    let raw = bytes
        .get(offset..offset + len)
        .ok_or_else(|| CatalogError::InvalidMo {
            message: format!("string at offset {} runs past the end of the file", offset),
        })?;
    String::from_utf8(raw.to_vec()).map_err(|_| CatalogError::InvalidMo {
        message: format!("string at offset {} is not valid UTF-8", offset),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_layout_header() {
        let bytes = write_mo(&pairs(&[("b", "B"), ("a", "A")]));
        assert_eq!(&bytes[0..4], &MO_MAGIC.to_le_bytes());
        assert_eq!(read_u32(&bytes, 8, false).unwrap(), 2);
        assert_eq!(read_u32(&bytes, 12, false).unwrap(), 28);
        assert_eq!(read_u32(&bytes, 16, false).unwrap(), 44);
    }

    #[test]
    fn test_entries_come_back_sorted() {
        let bytes = write_mo(&pairs(&[
            ("Hello", "Hallo"),
            ("", "Language: de\n"),
            (&encode_key(Some("menu"), "Home"), "Start"),
        ]));
        let entries = read_mo(&bytes).unwrap();
        assert_eq!(
            entries,
            pairs(&[
                ("", "Language: de\n"),
                ("Hello", "Hallo"),
                ("menu\u{4}Home", "Start"),
            ])
        );
    }

    #[test]
    fn test_reads_big_endian() {
        // Single entry "a" -> "b", big-endian layout.
        let mut bytes = Vec::new();
        for value in [MO_MAGIC, 0, 1, 28, 36, 0, 44] {
            bytes.extend_from_slice(&value.to_be_bytes());
        }
        for value in [1u32, 44, 1, 46] {
            bytes.extend_from_slice(&value.to_be_bytes());
        }
        bytes.extend_from_slice(b"a\0b\0");
        assert_eq!(read_mo(&bytes).unwrap(), pairs(&[("a", "b")]));
    }

    #[test]
    fn test_rejects_bad_magic() {
        let err = read_mo(&[0u8; 28]).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidMo { .. }));
    }

    #[test]
    fn test_rejects_truncated_file() {
        let bytes = write_mo(&pairs(&[("Hello", "Hallo")]));
        let err = read_mo(&bytes[..30]).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidMo { .. }));
    }

    #[test]
    fn test_rejects_oversized_count() {
        let mut bytes = write_mo(&pairs(&[("", "Language: de\n"), ("Hi", "Hallo")]));
        bytes[8..12].copy_from_slice(&u32::MAX.to_le_bytes());
        let err = read_mo(&bytes).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidMo { .. }), "{err}");
        assert!(err.to_string().contains("entry count"));
    }
}
