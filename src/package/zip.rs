//! Minimal single-level ZIP writer and reader.
//!
//! Entries are written in insertion order with a fixed 1980-01-01 00:00 timestamp, so equal inputs
//! always produce equal archives. No ZIP64, encryption or extra fields. The reader only accepts
//! what the writer produces (plus stored/deflate entries with extra fields or comments).

use crate::foundation::error::{SlideError, SlideResult};

const LOCAL_HEADER_SIG: u32 = 0x0403_4b50;
const CENTRAL_HEADER_SIG: u32 = 0x0201_4b50;
const END_OF_CENTRAL_DIR_SIG: u32 = 0x0605_4b50;
const VERSION: u16 = 20;
/// MS-DOS date for 1980-01-01 (year offset 0, month 1, day 1).
pub const DOS_EPOCH_DATE: u16 = (1 << 5) | 1;
pub const DOS_EPOCH_TIME: u16 = 0;
const DEFLATE_LEVEL: u8 = 6;

/// Per-entry storage method.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Compression {
    /// No compression. PNG payloads are already compressed.
    #[default]
    Stored,
    Deflate,
}

impl Compression {
    fn method(self) -> u16 {
        match self {
            Compression::Stored => 0,
            Compression::Deflate => 8,
        }
    }
}

struct CentralRecord {
    name: String,
    method: u16,
    crc: u32,
    compressed_size: u32,
    uncompressed_size: u32,
    offset: u32,
}

/// Streams entries into an in-memory ZIP container.
pub struct ZipWriter {
    buf: Vec<u8>,
    records: Vec<CentralRecord>,
}

impl Default for ZipWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ZipWriter {
    pub fn new() -> Self {
        Self {
            buf: Vec::new(),
            records: Vec::new(),
        }
    }

    pub fn add_entry(
        &mut self,
        name: &str,
        data: &[u8],
        compression: Compression,
    ) -> SlideResult<()> {
        if name.is_empty() || name.contains('/') || name.contains('\\') {
            return Err(SlideError::archive(format!(
                "entry name '{name}' must be a plain file name"
            )));
        }
        if self.records.iter().any(|r| r.name == name) {
            return Err(SlideError::archive(format!("duplicate entry name '{name}'")));
        }
        if self.records.len() >= usize::from(u16::MAX) {
            return Err(SlideError::archive("too many zip entries"));
        }

        let crc = crc32fast::hash(data);
        let payload = match compression {
            Compression::Stored => std::borrow::Cow::Borrowed(data),
            Compression::Deflate => std::borrow::Cow::Owned(
                miniz_oxide::deflate::compress_to_vec(data, DEFLATE_LEVEL),
            ),
        };

        let offset = to_u32(self.buf.len(), "archive offset")?;
        let name_len = u16::try_from(name.len())
            .map_err(|_| SlideError::archive("entry name too long"))?;
        let record = CentralRecord {
            name: name.to_owned(),
            method: compression.method(),
            crc,
            compressed_size: to_u32(payload.len(), "compressed size")?,
            uncompressed_size: to_u32(data.len(), "uncompressed size")?,
            offset,
        };

        put_u32(&mut self.buf, LOCAL_HEADER_SIG);
        put_u16(&mut self.buf, VERSION);
        put_u16(&mut self.buf, 0);
        put_u16(&mut self.buf, record.method);
        put_u16(&mut self.buf, DOS_EPOCH_TIME);
        put_u16(&mut self.buf, DOS_EPOCH_DATE);
        put_u32(&mut self.buf, record.crc);
        put_u32(&mut self.buf, record.compressed_size);
        put_u32(&mut self.buf, record.uncompressed_size);
        put_u16(&mut self.buf, name_len);
        put_u16(&mut self.buf, 0);
        self.buf.extend_from_slice(name.as_bytes());
        self.buf.extend_from_slice(&payload);

        self.records.push(record);
        Ok(())
    }

    /// Append the central directory and end record, returning the container bytes.
    pub fn finish(mut self) -> SlideResult<Vec<u8>> {
        let cd_offset = to_u32(self.buf.len(), "central directory offset")?;
        for r in &self.records {
            put_u32(&mut self.buf, CENTRAL_HEADER_SIG);
            put_u16(&mut self.buf, VERSION);
            put_u16(&mut self.buf, VERSION);
            put_u16(&mut self.buf, 0);
            put_u16(&mut self.buf, r.method);
            put_u16(&mut self.buf, DOS_EPOCH_TIME);
            put_u16(&mut self.buf, DOS_EPOCH_DATE);
            put_u32(&mut self.buf, r.crc);
            put_u32(&mut self.buf, r.compressed_size);
            put_u32(&mut self.buf, r.uncompressed_size);
            // Lengths were range-checked in add_entry.
            put_u16(&mut self.buf, r.name.len() as u16);
            put_u16(&mut self.buf, 0);
            put_u16(&mut self.buf, 0);
            put_u16(&mut self.buf, 0);
            put_u16(&mut self.buf, 0);
            put_u32(&mut self.buf, 0);
            put_u32(&mut self.buf, r.offset);
            self.buf.extend_from_slice(r.name.as_bytes());
        }
        let cd_size = to_u32(self.buf.len() - cd_offset as usize, "central directory size")?;
        let count = self.records.len() as u16;

        put_u32(&mut self.buf, END_OF_CENTRAL_DIR_SIG);
        put_u16(&mut self.buf, 0);
        put_u16(&mut self.buf, 0);
        put_u16(&mut self.buf, count);
        put_u16(&mut self.buf, count);
        put_u32(&mut self.buf, cd_size);
        put_u32(&mut self.buf, cd_offset);
        put_u16(&mut self.buf, 0);
        Ok(self.buf)
    }
}

/// One decoded archive member.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZipEntry {
    pub name: String,
    pub compression: Compression,
    pub data: Vec<u8>,
}

/// Parse a container via its central directory, inflating and CRC-checking every entry.
pub fn read_entries(bytes: &[u8]) -> SlideResult<Vec<ZipEntry>> {
    const EOCD_LEN: usize = 22;
    if bytes.len() < EOCD_LEN {
        return Err(SlideError::archive("zip too short"));
    }
    let eocd = (0..=bytes.len() - EOCD_LEN)
        .rev()
        .find(|&i| get_u32(bytes, i) == Some(END_OF_CENTRAL_DIR_SIG))
        .ok_or_else(|| SlideError::archive("end of central directory not found"))?;

    let count = usize::from(field_u16(bytes, eocd + 10)?);
    let mut pos = field_u32(bytes, eocd + 16)? as usize;

    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        if field_u32(bytes, pos)? != CENTRAL_HEADER_SIG {
            return Err(SlideError::archive("bad central directory signature"));
        }
        let method = field_u16(bytes, pos + 10)?;
        let crc = field_u32(bytes, pos + 16)?;
        let compressed_size = field_u32(bytes, pos + 20)? as usize;
        let uncompressed_size = field_u32(bytes, pos + 24)? as usize;
        let name_len = usize::from(field_u16(bytes, pos + 28)?);
        let extra_len = usize::from(field_u16(bytes, pos + 30)?);
        let comment_len = usize::from(field_u16(bytes, pos + 32)?);
        let local = field_u32(bytes, pos + 42)? as usize;
        let name = slice(bytes, pos + 46, name_len)?;
        let name = String::from_utf8(name.to_vec())
            .map_err(|_| SlideError::archive("entry name is not utf-8"))?;
        pos += 46 + name_len + extra_len + comment_len;

        if field_u32(bytes, local)? != LOCAL_HEADER_SIG {
            return Err(SlideError::archive(format!("bad local header for '{name}'")));
        }
        let local_name_len = usize::from(field_u16(bytes, local + 26)?);
        let local_extra_len = usize::from(field_u16(bytes, local + 28)?);
        let raw = slice(
            bytes,
            local + 30 + local_name_len + local_extra_len,
            compressed_size,
        )?;

        let (compression, data) = match method {
            0 => (Compression::Stored, raw.to_vec()),
            8 => (
                Compression::Deflate,
                miniz_oxide::inflate::decompress_to_vec(raw)
                    .map_err(|e| SlideError::archive(format!("inflate '{name}': {e:?}")))?,
            ),
            other => {
                return Err(SlideError::archive(format!(
                    "unsupported compression method {other} for '{name}'"
                )));
            }
        };
        if data.len() != uncompressed_size || crc32fast::hash(&data) != crc {
            return Err(SlideError::archive(format!("checksum mismatch for '{name}'")));
        }
        out.push(ZipEntry {
            name,
            compression,
            data,
        });
    }
    Ok(out)
}

fn slice(bytes: &[u8], at: usize, len: usize) -> SlideResult<&[u8]> {
    at.checked_add(len)
        .and_then(|end| bytes.get(at..end))
        .ok_or_else(|| SlideError::archive("zip truncated"))
}

fn get_u32(bytes: &[u8], at: usize) -> Option<u32> {
    let b = bytes.get(at..at.checked_add(4)?)?;
    Some(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

fn field_u32(bytes: &[u8], at: usize) -> SlideResult<u32> {
    get_u32(bytes, at).ok_or_else(|| SlideError::archive("zip truncated"))
}

fn field_u16(bytes: &[u8], at: usize) -> SlideResult<u16> {
    let b = slice(bytes, at, 2)?;
    Ok(u16::from_le_bytes([b[0], b[1]]))
}

fn to_u32(v: usize, what: &str) -> SlideResult<u32> {
    u32::try_from(v).map_err(|_| SlideError::archive(format!("{what} exceeds 4 GiB")))
}

fn put_u16(buf: &mut Vec<u8>, v: u16) {
    buf.extend_from_slice(&v.to_le_bytes());
}

fn put_u32(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_le_bytes());
}

#[cfg(test)]
#[path = "../../tests/unit/package/zip.rs"]
mod tests;
