//! Serialized artifact storage.
//!
//! The three pre-trained artifacts (imputer, scaler, classifier) are stored
//! as binary files: a 24-byte header followed by a Postcard-encoded payload.
//!
//! # Format Structure
//!
//! ```text
//! Offset  Size  Field
//! ------  ----  -----
//! 0       4     Magic ("FLOD")
//! 4       1     Version major
//! 5       1     Version minor
//! 6       1     Artifact kind
//! 7       1     Reserved
//! 8       4     Payload size (bytes)
//! 12      4     CRC32 checksum of payload
//! 16      4     Number of features
//! 20      4     Reserved
//! ```
//!
//! All multi-byte fields are little-endian.

mod payload;

pub use payload::{
    ArtifactData, ArtifactMetadata, ClassifierPayload, ImputerPayload, Payload, PayloadV1,
    ScalerPayload,
};

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use ndarray::Array1;
use thiserror::Error;

use crate::classify::Classifier;
use crate::transform::{Imputer, Scaler};

// ============================================================================
// Constants
// ============================================================================

/// Magic bytes identifying a floodcast artifact file.
pub const MAGIC: &[u8; 4] = b"FLOD";

/// Current format version (major).
pub const CURRENT_VERSION_MAJOR: u8 = 1;

/// Current format version (minor).
pub const CURRENT_VERSION_MINOR: u8 = 0;

/// Size of the format header in bytes.
pub const HEADER_SIZE: usize = 24;

// ============================================================================
// Artifact Kind
// ============================================================================

/// Artifact kind identifier stored in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ArtifactKind {
    /// Missing-value imputer.
    Imputer = 0,
    /// Feature scaler.
    Scaler = 1,
    /// Binary classifier.
    Classifier = 2,
}

impl ArtifactKind {
    /// Convert from u8, returning None for unknown values.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Imputer),
            1 => Some(Self::Scaler),
            2 => Some(Self::Classifier),
            _ => None,
        }
    }
}

// ============================================================================
// Format Header
// ============================================================================

/// 24-byte header for the artifact storage format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatHeader {
    /// Format version (major).
    pub version_major: u8,
    /// Format version (minor).
    pub version_minor: u8,
    /// Artifact kind.
    pub kind: ArtifactKind,
    /// Size of the payload in bytes.
    pub payload_size: u32,
    /// CRC32 checksum of the payload.
    pub checksum: u32,
    /// Number of input features.
    pub n_features: u32,
}

impl FormatHeader {
    /// Create a new header with the current version.
    pub fn new(kind: ArtifactKind, n_features: u32) -> Self {
        Self {
            version_major: CURRENT_VERSION_MAJOR,
            version_minor: CURRENT_VERSION_MINOR,
            kind,
            payload_size: 0,
            checksum: 0,
            n_features,
        }
    }

    /// Serialize the header to 24 bytes.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        buf[0..4].copy_from_slice(MAGIC);
        buf[4] = self.version_major;
        buf[5] = self.version_minor;
        buf[6] = self.kind as u8;
        buf[7] = 0;
        buf[8..12].copy_from_slice(&self.payload_size.to_le_bytes());
        buf[12..16].copy_from_slice(&self.checksum.to_le_bytes());
        buf[16..20].copy_from_slice(&self.n_features.to_le_bytes());
        buf[20..24].copy_from_slice(&[0, 0, 0, 0]);
        buf
    }

    /// Parse a header from 24 bytes.
    pub fn from_bytes(buf: &[u8; HEADER_SIZE]) -> Result<Self, ArtifactError> {
        if &buf[0..4] != MAGIC {
            return Err(ArtifactError::NotAnArtifact);
        }

        let version_major = buf[4];
        let version_minor = buf[5];
        if version_major > CURRENT_VERSION_MAJOR {
            return Err(ArtifactError::UnsupportedVersion {
                major: version_major,
                minor: version_minor,
            });
        }

        let kind = ArtifactKind::from_u8(buf[6])
            .ok_or_else(|| ArtifactError::CorruptPayload("invalid artifact kind".into()))?;
        let payload_size = u32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]);
        let checksum = u32::from_le_bytes([buf[12], buf[13], buf[14], buf[15]]);
        let n_features = u32::from_le_bytes([buf[16], buf[17], buf[18], buf[19]]);

        Ok(Self {
            version_major,
            version_minor,
            kind,
            payload_size,
            checksum,
            n_features,
        })
    }
}

// ============================================================================
// Error Type
// ============================================================================

/// Errors raised while loading or saving an artifact file.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// File does not start with the artifact magic.
    #[error("not a floodcast artifact file")]
    NotAnArtifact,

    /// Artifact requires a newer reader.
    #[error("artifact requires format version {major}.{minor} or later")]
    UnsupportedVersion { major: u8, minor: u8 },

    /// Header kind does not match what the caller asked for.
    #[error("artifact kind mismatch: expected {expected:?}, got {actual:?}")]
    KindMismatch {
        expected: ArtifactKind,
        actual: ArtifactKind,
    },

    /// Payload checksum doesn't match.
    #[error("checksum mismatch: expected {expected:#010x}, got {actual:#010x}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    /// File was truncated or incomplete.
    #[error("file truncated: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    /// Payload is structurally invalid.
    #[error("corrupt payload: {0}")]
    CorruptPayload(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Postcard encoding/decoding error.
    #[error("codec error: {0}")]
    Codec(#[from] postcard::Error),
}

// ============================================================================
// Runtime Artifact
// ============================================================================

/// A deserialized artifact, ready for use in the pipeline.
#[derive(Debug, Clone)]
pub enum Artifact {
    /// Missing-value imputer.
    Imputer(Imputer),
    /// Feature scaler.
    Scaler(Scaler),
    /// Binary classifier.
    Classifier(Classifier),
}

impl Artifact {
    /// Kind tag for this artifact.
    pub fn kind(&self) -> ArtifactKind {
        match self {
            Artifact::Imputer(_) => ArtifactKind::Imputer,
            Artifact::Scaler(_) => ArtifactKind::Scaler,
            Artifact::Classifier(_) => ArtifactKind::Classifier,
        }
    }

    /// Number of input features the artifact was fitted on.
    pub fn n_features(&self) -> usize {
        match self {
            Artifact::Imputer(imputer) => imputer.n_features(),
            Artifact::Scaler(scaler) => scaler.n_features(),
            Artifact::Classifier(classifier) => classifier.n_features(),
        }
    }

    fn to_data(&self) -> ArtifactData {
        match self {
            Artifact::Imputer(imputer) => ArtifactData::Imputer(ImputerPayload {
                fill_values: (0..imputer.n_features())
                    .map(|j| imputer.fill_value(j))
                    .collect(),
            }),
            Artifact::Scaler(scaler) => ArtifactData::Scaler(ScalerPayload {
                centers: (0..scaler.n_features()).map(|j| scaler.center(j)).collect(),
                scales: (0..scaler.n_features()).map(|j| scaler.scale(j)).collect(),
            }),
            Artifact::Classifier(classifier) => ArtifactData::Classifier(ClassifierPayload {
                weights: (0..classifier.n_features())
                    .map(|j| classifier.weight(j))
                    .collect(),
                bias: classifier.bias(),
            }),
        }
    }

    fn from_data(data: ArtifactData) -> Result<Self, ArtifactError> {
        match data {
            ArtifactData::Imputer(payload) => Ok(Artifact::Imputer(Imputer::new(
                Array1::from_vec(payload.fill_values),
            ))),
            ArtifactData::Scaler(payload) => {
                if payload.centers.len() != payload.scales.len() {
                    return Err(ArtifactError::CorruptPayload(format!(
                        "scaler has {} centers but {} scales",
                        payload.centers.len(),
                        payload.scales.len()
                    )));
                }
                Ok(Artifact::Scaler(Scaler::new(
                    Array1::from_vec(payload.centers),
                    Array1::from_vec(payload.scales),
                )))
            }
            ArtifactData::Classifier(payload) => Ok(Artifact::Classifier(Classifier::new(
                Array1::from_vec(payload.weights),
                payload.bias,
            ))),
        }
    }
}

// ============================================================================
// Save / Load
// ============================================================================

/// Serialize an artifact to bytes (header + payload).
pub fn to_bytes(artifact: &Artifact) -> Result<Vec<u8>, ArtifactError> {
    to_bytes_with_metadata(artifact, ArtifactMetadata::default())
}

/// Serialize an artifact with explicit metadata.
pub fn to_bytes_with_metadata(
    artifact: &Artifact,
    mut metadata: ArtifactMetadata,
) -> Result<Vec<u8>, ArtifactError> {
    metadata.n_features = artifact.n_features() as u32;
    let payload = Payload::V1(PayloadV1 {
        metadata,
        artifact: artifact.to_data(),
    });
    let payload_bytes = postcard::to_allocvec(&payload)?;

    let mut header = FormatHeader::new(artifact.kind(), artifact.n_features() as u32);
    header.payload_size = payload_bytes.len() as u32;
    header.checksum = crc32fast::hash(&payload_bytes);

    let mut bytes = Vec::with_capacity(HEADER_SIZE + payload_bytes.len());
    bytes.extend_from_slice(&header.to_bytes());
    bytes.extend_from_slice(&payload_bytes);
    Ok(bytes)
}

/// Deserialize an artifact from bytes.
pub fn from_bytes(bytes: &[u8]) -> Result<Artifact, ArtifactError> {
    let (_, artifact) = decode(bytes)?;
    Ok(artifact)
}

/// Deserialize an artifact and its header from bytes.
pub fn decode(bytes: &[u8]) -> Result<(FormatHeader, Artifact), ArtifactError> {
    if bytes.len() < HEADER_SIZE {
        return Err(ArtifactError::Truncated {
            expected: HEADER_SIZE,
            actual: bytes.len(),
        });
    }
    let mut header_buf = [0u8; HEADER_SIZE];
    header_buf.copy_from_slice(&bytes[..HEADER_SIZE]);
    let header = FormatHeader::from_bytes(&header_buf)?;

    let expected_len = HEADER_SIZE + header.payload_size as usize;
    if bytes.len() < expected_len {
        return Err(ArtifactError::Truncated {
            expected: expected_len,
            actual: bytes.len(),
        });
    }
    let payload_bytes = &bytes[HEADER_SIZE..expected_len];

    let actual_checksum = crc32fast::hash(payload_bytes);
    if actual_checksum != header.checksum {
        return Err(ArtifactError::ChecksumMismatch {
            expected: header.checksum,
            actual: actual_checksum,
        });
    }

    let Payload::V1(v1) = postcard::from_bytes(payload_bytes)?;
    let artifact = Artifact::from_data(v1.artifact)?;
    if artifact.kind() != header.kind {
        return Err(ArtifactError::CorruptPayload(format!(
            "header says {:?} but payload holds {:?}",
            header.kind,
            artifact.kind()
        )));
    }
    Ok((header, artifact))
}

/// Write an artifact to a file.
pub fn save(artifact: &Artifact, path: &Path) -> Result<(), ArtifactError> {
    let bytes = to_bytes(artifact)?;
    let mut file = File::create(path)?;
    file.write_all(&bytes)?;
    Ok(())
}

/// Load an artifact of any kind from a file.
pub fn load(path: &Path) -> Result<Artifact, ArtifactError> {
    let mut bytes = Vec::new();
    File::open(path)?.read_to_end(&mut bytes)?;
    from_bytes(&bytes)
}

/// Load an imputer, rejecting files of any other kind.
pub fn load_imputer(path: &Path) -> Result<Imputer, ArtifactError> {
    match load(path)? {
        Artifact::Imputer(imputer) => Ok(imputer),
        other => Err(ArtifactError::KindMismatch {
            expected: ArtifactKind::Imputer,
            actual: other.kind(),
        }),
    }
}

/// Load a scaler, rejecting files of any other kind.
pub fn load_scaler(path: &Path) -> Result<Scaler, ArtifactError> {
    match load(path)? {
        Artifact::Scaler(scaler) => Ok(scaler),
        other => Err(ArtifactError::KindMismatch {
            expected: ArtifactKind::Scaler,
            actual: other.kind(),
        }),
    }
}

/// Load a classifier, rejecting files of any other kind.
pub fn load_classifier(path: &Path) -> Result<Classifier, ArtifactError> {
    match load(path)? {
        Artifact::Classifier(classifier) => Ok(classifier),
        other => Err(ArtifactError::KindMismatch {
            expected: ArtifactKind::Classifier,
            actual: other.kind(),
        }),
    }
}
