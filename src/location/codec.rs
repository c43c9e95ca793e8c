use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read};

use crate::error::{LocationError, Result};
use crate::location::uri::{self, URI_PREFIX};
use crate::location::PathStyle;

/// Bit-exact codec for the workspace layer's `.location` record.
///
/// Wire layout:
/// ```text
/// BEGIN_CHUNK            # fixed marker bytes (ChunkMarkers.begin)
/// location_uri           # u16 BE byte length + modified UTF-8 payload
/// reference_count        # i32 BE
/// reference_names[..]    # reference_count strings, same encoding
/// END_CHUNK              # fixed marker bytes (ChunkMarkers.end)
/// ```
///
/// Strings use the host's `writeUTF` encoding: the length prefix counts
/// bytes (not characters), NUL is stored as `C0 80`, and characters outside
/// the BMP are stored as a surrogate pair, three bytes per half. Any other
/// encoding desynchronizes the reference loop and corrupts the file.
pub struct RecordCodec {
    markers: ChunkMarkers,
    style: PathStyle,
}

/// Decoded contents of one `.location` file.
///
/// `reference_names` is opaque payload owned by the host IDE. The codec
/// preserves count, order, and exact text across a rewrite and never
/// interprets the entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationRecord {
    pub location_uri: String,
    pub reference_names: Vec<String>,
}

/// The marker byte sequences bracketing a record.
///
/// These are internal constants of the host workspace layer, carried here
/// as configuration so an integration against a different host build can
/// supply its own values. `Default` holds the observed host constants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkMarkers {
    pub begin: Vec<u8>,
    pub end: Vec<u8>,
}

impl Default for ChunkMarkers {
    fn default() -> Self {
        ChunkMarkers {
            begin: vec![
                0x40, 0xB1, 0x8B, 0x81, 0x23, 0xBC, 0x00, 0x14, 0x1A, 0x25, 0x96, 0xE7, 0xA3,
                0x93, 0xBE, 0x1E,
            ],
            end: vec![
                0xC0, 0x58, 0xFB, 0xF3, 0x23, 0xBC, 0x00, 0x14, 0x1A, 0x51, 0xF3, 0x43, 0x23,
                0x86, 0x05, 0x6E,
            ],
        }
    }
}

impl RecordCodec {
    pub fn new(style: PathStyle) -> Self {
        Self::with_markers(ChunkMarkers::default(), style)
    }

    pub fn with_markers(markers: ChunkMarkers, style: PathStyle) -> Self {
        RecordCodec { markers, style }
    }

    pub fn style(&self) -> PathStyle {
        self.style
    }

    /// Parse a full record. Pure read, no side effects.
    ///
    /// Both chunk markers are validated byte-for-byte; a mismatch fails
    /// fast with `MalformedRecord` rather than silently accepting a
    /// corrupt file.
    pub fn decode(&self, mut input: impl Read) -> Result<LocationRecord> {
        expect_chunk(&mut input, &self.markers.begin, "begin chunk")?;

        let location_uri = read_utf(&mut input)?;
        if !location_uri.starts_with(URI_PREFIX) {
            return Err(LocationError::malformed(format!(
                "location is not marker-prefixed: {location_uri:?}"
            )));
        }

        let count = input
            .read_i32::<BigEndian>()
            .map_err(|e| map_read_err(e, "reference count"))?;
        if count < 0 {
            return Err(LocationError::malformed(format!(
                "negative reference count: {count}"
            )));
        }

        // Capacity comes from untrusted input, so let it grow instead.
        let mut reference_names = Vec::new();
        for _ in 0..count {
            reference_names.push(read_utf(&mut input)?);
        }

        expect_chunk(&mut input, &self.markers.end, "end chunk")?;

        Ok(LocationRecord {
            location_uri,
            reference_names,
        })
    }

    /// Serialize a record to the wire layout.
    ///
    /// Fails with `InvalidRecord` if `location_uri` lacks the `URI//`
    /// marker. Callers must build the URI through
    /// [`uri::build_location_uri`]; this check guards that contract.
    pub fn encode(&self, record: &LocationRecord) -> Result<Vec<u8>> {
        if !record.location_uri.starts_with(URI_PREFIX) {
            return Err(LocationError::invalid(format!(
                "location URI lacks the {URI_PREFIX:?} marker: {:?}",
                record.location_uri
            )));
        }

        let mut out = Vec::new();
        out.extend_from_slice(&self.markers.begin);
        write_utf(&mut out, &record.location_uri)?;
        out.write_i32::<BigEndian>(record.reference_names.len() as i32)?;
        for name in &record.reference_names {
            write_utf(&mut out, name)?;
        }
        out.extend_from_slice(&self.markers.end);
        Ok(out)
    }

    /// Decoded filesystem path for the record's location.
    pub fn extract_filesystem_path(&self, record: &LocationRecord) -> String {
        uri::extract_filesystem_path(&record.location_uri, self.style)
    }

    /// Marker-prefixed URI for a filesystem path.
    pub fn build_location_uri(&self, path: &str) -> String {
        uri::build_location_uri(path, self.style)
    }
}

fn expect_chunk(input: &mut impl Read, expected: &[u8], what: &str) -> Result<()> {
    let mut buf = vec![0u8; expected.len()];
    input
        .read_exact(&mut buf)
        .map_err(|e| map_read_err(e, what))?;
    if buf != expected {
        return Err(LocationError::malformed(format!("{what} marker mismatch")));
    }
    Ok(())
}

fn read_utf(input: &mut impl Read) -> Result<String> {
    let len = input
        .read_u16::<BigEndian>()
        .map_err(|e| map_read_err(e, "string length"))?;
    let mut buf = vec![0u8; len as usize];
    input
        .read_exact(&mut buf)
        .map_err(|e| map_read_err(e, "string payload"))?;
    decode_modified_utf8(&buf)
}

fn write_utf(out: &mut Vec<u8>, s: &str) -> Result<()> {
    let bytes = encode_modified_utf8(s);
    if bytes.len() > u16::MAX as usize {
        return Err(LocationError::invalid(format!(
            "string exceeds {} encoded bytes",
            u16::MAX
        )));
    }
    out.write_u16::<BigEndian>(bytes.len() as u16)?;
    out.extend_from_slice(&bytes);
    Ok(())
}

/// A truncated stream is a format error, not an I/O failure.
fn map_read_err(e: io::Error, what: &str) -> LocationError {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        LocationError::malformed(format!("truncated while reading {what}"))
    } else {
        LocationError::Io(e)
    }
}

fn encode_modified_utf8(s: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(s.len());
    for ch in s.chars() {
        let cp = ch as u32;
        if cp == 0 {
            out.extend_from_slice(&[0xC0, 0x80]);
        } else if cp < 0x80 {
            out.push(cp as u8);
        } else if cp < 0x800 {
            out.push(0xC0 | (cp >> 6) as u8);
            out.push(0x80 | (cp & 0x3F) as u8);
        } else if cp < 0x10000 {
            push_three(&mut out, cp);
        } else {
            // surrogate pair, three bytes per half
            let v = cp - 0x10000;
            push_three(&mut out, 0xD800 + (v >> 10));
            push_three(&mut out, 0xDC00 + (v & 0x3FF));
        }
    }
    out
}

fn push_three(out: &mut Vec<u8>, unit: u32) {
    out.push(0xE0 | (unit >> 12) as u8);
    out.push(0x80 | ((unit >> 6) & 0x3F) as u8);
    out.push(0x80 | (unit & 0x3F) as u8);
}

fn decode_modified_utf8(bytes: &[u8]) -> Result<String> {
    let mut units: Vec<u16> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let b0 = bytes[i];
        match b0 >> 4 {
            0x0..=0x7 => {
                units.push(b0 as u16);
                i += 1;
            }
            0xC | 0xD => {
                let b1 = *bytes
                    .get(i + 1)
                    .ok_or_else(|| LocationError::malformed("truncated UTF sequence"))?;
                if b1 & 0xC0 != 0x80 {
                    return Err(LocationError::malformed("bad UTF continuation byte"));
                }
                units.push(((b0 as u16 & 0x1F) << 6) | (b1 as u16 & 0x3F));
                i += 2;
            }
            0xE => {
                if i + 2 >= bytes.len() {
                    return Err(LocationError::malformed("truncated UTF sequence"));
                }
                let (b1, b2) = (bytes[i + 1], bytes[i + 2]);
                if b1 & 0xC0 != 0x80 || b2 & 0xC0 != 0x80 {
                    return Err(LocationError::malformed("bad UTF continuation byte"));
                }
                units.push(
                    ((b0 as u16 & 0x0F) << 12) | ((b1 as u16 & 0x3F) << 6) | (b2 as u16 & 0x3F),
                );
                i += 3;
            }
            _ => return Err(LocationError::malformed("bad UTF lead byte")),
        }
    }
    String::from_utf16(&units)
        .map_err(|_| LocationError::malformed("unpaired surrogate in string"))
}
