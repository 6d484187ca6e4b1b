//! Record layouts and big-endian primitives.
//!
//! # Records
//!
//! ```text
//! node     : id i32 | x f32 | y f32                                  12 bytes
//! edge     : type i32 | name str | length f32 | drive_time f32
//!            | one_way i32 | count i32 | ids i32[count]
//! polygon  : count i32 | ids i32[count]
//! str      : byte length u16 | UTF-8 bytes
//! ```
//!
//! Strings are read as modified UTF-8, the encoding of Java's
//! `DataOutput::writeUTF`: `C0 80` decodes to NUL and a pair of 3-byte
//! surrogates decodes to one supplementary character.  Plain UTF-8 is a
//! subset and is what the writer produces.
//!
//! Records are read raw, exactly as stored; validation and id resolution
//! happen in [`loader`](crate::loader).  A record cut short by end of file
//! surfaces as an `UnexpectedEof` I/O error.

use std::io::{self, BufRead, Read, Write};

use map_core::{Edge, Node, NodeId, RoadType};

use crate::{LoadError, LoadResult};

/// Upper bound on ids pre-allocated for one record; a corrupt count must not
/// trigger a huge allocation before the reader hits end of file.
const MAX_PREALLOC_IDS: usize = 4096;

// ── Primitives ────────────────────────────────────────────────────────────────

pub fn read_i32<R: Read>(reader: &mut R) -> io::Result<i32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(i32::from_be_bytes(buf))
}

pub fn read_f32<R: Read>(reader: &mut R) -> io::Result<f32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(f32::from_be_bytes(buf))
}

pub fn read_f64<R: Read>(reader: &mut R) -> io::Result<f64> {
    let mut buf = [0u8; 8];
    reader.read_exact(&mut buf)?;
    Ok(f64::from_be_bytes(buf))
}

/// Length-prefixed string.  Invalid sequences are replaced, not rejected.
pub fn read_str<R: Read>(reader: &mut R) -> io::Result<String> {
    let mut len_buf = [0u8; 2];
    reader.read_exact(&mut len_buf)?;
    let len = u16::from_be_bytes(len_buf) as usize;
    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf)?;
    Ok(decode_modified_utf8(&buf))
}

/// Decode modified UTF-8, replacing anything undecodable with U+FFFD.
pub fn decode_modified_utf8(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    let mut rest = bytes;
    while !rest.is_empty() {
        let err = match std::str::from_utf8(rest) {
            Ok(s) => {
                out.push_str(s);
                break;
            }
            Err(err) => err,
        };
        let (valid, bad) = rest.split_at(err.valid_up_to());
        out.push_str(&String::from_utf8_lossy(valid));

        let used = match bad {
            [0xC0, 0x80, ..] => {
                out.push('\0');
                2
            }
            [0xED, h1 @ 0xA0..=0xAF, h2, 0xED, l1 @ 0xB0..=0xBF, l2, ..]
                if is_continuation(*h2) && is_continuation(*l2) =>
            {
                let high = surrogate(*h1, *h2);
                let low = surrogate(*l1, *l2);
                let c = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                out.push(char::from_u32(c).unwrap_or(char::REPLACEMENT_CHARACTER));
                6
            }
            _ => {
                out.push(char::REPLACEMENT_CHARACTER);
                err.error_len().unwrap_or(bad.len())
            }
        };
        rest = &bad[used..];
    }
    out
}

fn is_continuation(b: u8) -> bool {
    b & 0xC0 == 0x80
}

/// UTF-16 code unit of a 3-byte `ED xx yy` sequence.
fn surrogate(b1: u8, b2: u8) -> u32 {
    0xD000 | (u32::from(b1 & 0x3F) << 6) | u32::from(b2 & 0x3F)
}

fn read_ids<R: Read>(reader: &mut R) -> io::Result<Vec<i32>> {
    let count = read_i32(reader)?;
    let count = usize::try_from(count).unwrap_or(0);
    let mut ids = Vec::with_capacity(count.min(MAX_PREALLOC_IDS));
    for _ in 0..count {
        ids.push(read_i32(reader)?);
    }
    Ok(ids)
}

/// `true` once the reader has no bytes left, i.e. the next record would
/// start at end of file.
pub fn at_end<R: BufRead>(reader: &mut R) -> io::Result<bool> {
    Ok(reader.fill_buf()?.is_empty())
}

pub fn write_i32<W: Write>(writer: &mut W, value: i32) -> io::Result<()> {
    writer.write_all(&value.to_be_bytes())
}

pub fn write_f32<W: Write>(writer: &mut W, value: f32) -> io::Result<()> {
    writer.write_all(&value.to_be_bytes())
}

pub fn write_f64<W: Write>(writer: &mut W, value: f64) -> io::Result<()> {
    writer.write_all(&value.to_be_bytes())
}

pub fn write_str<W: Write>(writer: &mut W, value: &str) -> LoadResult<()> {
    let bytes = value.as_bytes();
    let len = u16::try_from(bytes.len()).map_err(|_| LoadError::NameTooLong {
        len: bytes.len(),
        max: u16::MAX as usize,
    })?;
    writer.write_all(&len.to_be_bytes())?;
    writer.write_all(bytes)?;
    Ok(())
}

fn write_ids<W: Write>(writer: &mut W, ids: &[i32]) -> io::Result<()> {
    write_i32(writer, ids.len() as i32)?;
    for &id in ids {
        write_i32(writer, id)?;
    }
    Ok(())
}

fn raw_ids(nodes: &[NodeId]) -> Vec<i32> {
    nodes.iter().map(|n| n.0 as i32).collect()
}

// ── NodeRecord ────────────────────────────────────────────────────────────────

/// One `nodes.bin` record as stored.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NodeRecord {
    pub id: i32,
    pub x:  f32,
    pub y:  f32,
}

impl NodeRecord {
    pub const SIZE: usize = 12;

    pub fn read<R: Read>(reader: &mut R) -> io::Result<Self> {
        Ok(NodeRecord {
            id: read_i32(reader)?,
            x:  read_f32(reader)?,
            y:  read_f32(reader)?,
        })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        write_i32(writer, self.id)?;
        write_f32(writer, self.x)?;
        write_f32(writer, self.y)
    }
}

impl From<Node> for NodeRecord {
    fn from(node: Node) -> Self {
        NodeRecord { id: node.id.0 as i32, x: node.x, y: node.y }
    }
}

// ── EdgeRecord ────────────────────────────────────────────────────────────────

/// One `edges<code>.bin` record as stored.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeRecord {
    pub type_code:  i32,
    /// Empty for unnamed roads.
    pub name:       String,
    pub length:     f32,
    pub drive_time: f32,
    pub one_way:    i32,
    pub nodes:      Vec<i32>,
}

impl EdgeRecord {
    pub fn read<R: Read>(reader: &mut R) -> io::Result<Self> {
        Ok(EdgeRecord {
            type_code:  read_i32(reader)?,
            name:       read_str(reader)?,
            length:     read_f32(reader)?,
            drive_time: read_f32(reader)?,
            one_way:    read_i32(reader)?,
            nodes:      read_ids(reader)?,
        })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> LoadResult<()> {
        write_i32(writer, self.type_code)?;
        write_str(writer, &self.name)?;
        write_f32(writer, self.length)?;
        write_f32(writer, self.drive_time)?;
        write_i32(writer, self.one_way)?;
        write_ids(writer, &self.nodes)?;
        Ok(())
    }

    /// A well-formed record of `road_type` over `nodes`.
    pub fn new(
        road_type:  RoadType,
        name:       &str,
        length:     f32,
        drive_time: f32,
        one_way:    map_core::OneWay,
        nodes:      &[NodeId],
    ) -> Self {
        EdgeRecord {
            type_code: road_type.code(),
            name: name.to_owned(),
            length,
            drive_time,
            one_way: one_way.code(),
            nodes: raw_ids(nodes),
        }
    }
}

impl From<&Edge> for EdgeRecord {
    fn from(edge: &Edge) -> Self {
        EdgeRecord::new(
            edge.road_type,
            edge.name_str(),
            edge.length,
            edge.drive_time,
            edge.one_way,
            edge.nodes(),
        )
    }
}

// ── PolygonRecord ─────────────────────────────────────────────────────────────

/// One coastline `edges.bin` record: an implicitly closed ring of node ids.
#[derive(Clone, Debug, PartialEq)]
pub struct PolygonRecord {
    pub nodes: Vec<i32>,
}

impl PolygonRecord {
    pub fn read<R: Read>(reader: &mut R) -> io::Result<Self> {
        Ok(PolygonRecord { nodes: read_ids(reader)? })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        write_ids(writer, &self.nodes)
    }
}

impl From<&[NodeId]> for PolygonRecord {
    fn from(nodes: &[NodeId]) -> Self {
        PolygonRecord { nodes: raw_ids(nodes) }
    }
}
