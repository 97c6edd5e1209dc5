//! File-size admission gate.
//!
//! The host only creates a visualizer for attachments whose declared size is
//! within the limit. Sizes arrive as display strings such as `"11.2 MB"`.
//! Anything that cannot be understood is admitted.

use crate::constants::DEFAULT_FILE_SIZE_LIMIT_BYTES;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FileSize {
    Bytes(f64),
    Unbounded,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Admission {
    Admitted,
    Rejected { size_bytes: f64 },
}

impl Admission {
    #[inline]
    pub fn is_admitted(self) -> bool {
        matches!(self, Admission::Admitted)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AdmissionPolicy {
    pub limit_bytes: f64,
    pub bypass: bool,
}

impl Default for AdmissionPolicy {
    fn default() -> Self {
        Self {
            limit_bytes: DEFAULT_FILE_SIZE_LIMIT_BYTES,
            bypass: false,
        }
    }
}

impl AdmissionPolicy {
    pub fn admit(&self, declared: &str) -> Admission {
        if self.bypass {
            return Admission::Admitted;
        }
        match parse_file_size(declared) {
            FileSize::Bytes(size) if size > self.limit_bytes => {
                log::debug!(
                    "[admission] rejecting {:?} ({} > {} bytes)",
                    declared,
                    size,
                    self.limit_bytes
                );
                Admission::Rejected { size_bytes: size }
            }
            _ => Admission::Admitted,
        }
    }
}

#[inline]
fn unit_magnitude(unit: &str) -> Option<f64> {
    match unit {
        "bytes" => Some(1.0),
        "KB" => Some(1e3),
        "MB" => Some(1e6),
        "GB" => Some(1e9),
        _ => None,
    }
}

/// Parse `"<number> <unit>"` with units `bytes|KB|MB|GB`.
pub fn parse_file_size(s: &str) -> FileSize {
    let mut parts = s.trim().splitn(2, ' ');
    let number = parts.next().and_then(|n| n.parse::<f64>().ok());
    let magnitude = parts.next().and_then(|u| unit_magnitude(u.trim()));
    match (number, magnitude) {
        (Some(n), Some(m)) if n.is_finite() => FileSize::Bytes(n * m),
        _ => FileSize::Unbounded,
    }
}
