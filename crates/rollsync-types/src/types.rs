//! Shared data structures for checksum exchange and diff application

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Checksum descriptor for one fixed-size block of the reference file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockChecksum {
    /// Ordinal position of the block in the reference file
    pub index: u32,
    /// Rolling weak checksum over the block bytes
    pub weak: u32,
    /// Content digest of the block bytes, 32 lowercase hex characters
    pub strong: String,
}

impl BlockChecksum {
    /// Create a new block checksum descriptor
    pub fn new(index: u32, weak: u32, strong: String) -> Self {
        Self {
            index,
            weak,
            strong,
        }
    }
}

/// One unit of the reconstruction recipe emitted by the match scanner
///
/// The external representation is an object with optional `data` and
/// optional `index` fields; at least one must be present. `{index}` is a
/// pure block reference, `{data}` a literal run, `{data, index}` literal
/// bytes immediately followed by a matched block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSegment", into = "RawSegment")]
pub enum DiffSegment {
    /// Unmatched bytes with no block reference
    Literal {
        /// Raw literal bytes
        data: Vec<u8>,
    },
    /// A matched, unmodified block of the reference file
    Reference {
        /// Index of the matched block
        index: u32,
    },
    /// Changed bytes immediately followed by a matched block
    LiteralThenReference {
        /// Raw literal bytes preceding the match
        data: Vec<u8>,
        /// Index of the matched block
        index: u32,
    },
}

impl DiffSegment {
    /// Literal bytes carried by this segment, if any
    pub fn data(&self) -> Option<&[u8]> {
        match self {
            Self::Literal { data } | Self::LiteralThenReference { data, .. } => Some(data),
            Self::Reference { .. } => None,
        }
    }

    /// Referenced block index, if any
    pub fn index(&self) -> Option<u32> {
        match self {
            Self::Reference { index } | Self::LiteralThenReference { index, .. } => Some(*index),
            Self::Literal { .. } => None,
        }
    }
}

/// External representation of a diff segment: optional `data`, optional
/// `index`, at least one present
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawSegment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    index: Option<u32>,
}

impl TryFrom<RawSegment> for DiffSegment {
    type Error = Error;

    fn try_from(raw: RawSegment) -> Result<Self> {
        match (raw.data, raw.index) {
            (Some(data), Some(index)) => Ok(Self::LiteralThenReference { data, index }),
            (Some(data), None) => Ok(Self::Literal { data }),
            (None, Some(index)) => Ok(Self::Reference { index }),
            (None, None) => Err(Error::protocol(
                "diff segment carries neither data nor index",
            )),
        }
    }
}

impl From<DiffSegment> for RawSegment {
    fn from(segment: DiffSegment) -> Self {
        match segment {
            DiffSegment::Literal { data } => Self {
                data: Some(data),
                index: None,
            },
            DiffSegment::Reference { index } => Self {
                data: None,
                index: Some(index),
            },
            DiffSegment::LiteralThenReference { data, index } => Self {
                data: Some(data),
                index: Some(index),
            },
        }
    }
}

/// Outcome of a diff computation: either an ordered reconstruction recipe
/// or a sentinel reporting that the counterpart file no longer exists
///
/// The sentinel serializes as the distinct non-array value
/// `{"remove": true}` rather than a segment sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DiffRepr", into = "DiffRepr")]
pub enum Diff {
    /// Ordered diff segments describing reconstruction
    Segments(Vec<DiffSegment>),
    /// The file was deleted on the scanning side
    Removed,
}

impl Diff {
    /// Whether this diff is the deletion sentinel
    pub fn is_removed(&self) -> bool {
        matches!(self, Self::Removed)
    }

    /// Serialize the diff to an opaque binary envelope
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(&WireDiff::from(self)).map_err(|e| Error::Protocol {
            message: format!("Failed to serialize diff: {}", e),
        })
    }

    /// Deserialize a diff from its binary envelope
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let wire: WireDiff = bincode::deserialize(data).map_err(|e| Error::Protocol {
            message: format!("Failed to deserialize diff: {}", e),
        })?;
        Ok(wire.into())
    }
}

/// External representation of a diff: a segment array or the removal object
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum DiffRepr {
    Removed(RemoveSentinel),
    Segments(Vec<DiffSegment>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RemoveSentinel {
    remove: bool,
}

impl TryFrom<DiffRepr> for Diff {
    type Error = Error;

    fn try_from(repr: DiffRepr) -> Result<Self> {
        match repr {
            DiffRepr::Removed(RemoveSentinel { remove: true }) => Ok(Self::Removed),
            DiffRepr::Removed(RemoveSentinel { remove: false }) => Err(Error::protocol(
                "removal sentinel must carry remove: true",
            )),
            DiffRepr::Segments(segments) => Ok(Self::Segments(segments)),
        }
    }
}

impl From<Diff> for DiffRepr {
    fn from(diff: Diff) -> Self {
        match diff {
            Diff::Removed => Self::Removed(RemoveSentinel { remove: true }),
            Diff::Segments(segments) => Self::Segments(segments),
        }
    }
}

// Tagged mirror of `Diff` for the bincode envelope. The public serde shape
// above is untagged for self-describing transports; bincode cannot
// deserialize untagged enums, so the binary envelope carries an explicit
// variant tag.
#[derive(Serialize, Deserialize)]
enum WireDiff {
    Segments(Vec<WireSegment>),
    Removed,
}

#[derive(Serialize, Deserialize)]
enum WireSegment {
    Literal { data: Vec<u8> },
    Reference { index: u32 },
    LiteralThenReference { data: Vec<u8>, index: u32 },
}

impl From<&Diff> for WireDiff {
    fn from(diff: &Diff) -> Self {
        match diff {
            Diff::Removed => Self::Removed,
            Diff::Segments(segments) => Self::Segments(
                segments
                    .iter()
                    .map(|segment| match segment {
                        DiffSegment::Literal { data } => WireSegment::Literal { data: data.clone() },
                        DiffSegment::Reference { index } => {
                            WireSegment::Reference { index: *index }
                        }
                        DiffSegment::LiteralThenReference { data, index } => {
                            WireSegment::LiteralThenReference {
                                data: data.clone(),
                                index: *index,
                            }
                        }
                    })
                    .collect(),
            ),
        }
    }
}

impl From<WireDiff> for Diff {
    fn from(wire: WireDiff) -> Self {
        match wire {
            WireDiff::Removed => Self::Removed,
            WireDiff::Segments(segments) => Self::Segments(
                segments
                    .into_iter()
                    .map(|segment| match segment {
                        WireSegment::Literal { data } => DiffSegment::Literal { data },
                        WireSegment::Reference { index } => DiffSegment::Reference { index },
                        WireSegment::LiteralThenReference { data, index } => {
                            DiffSegment::LiteralThenReference { data, index }
                        }
                    })
                    .collect(),
            ),
        }
    }
}
