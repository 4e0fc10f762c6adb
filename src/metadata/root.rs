//! The metadata root (ECMA-335 II.24.2.1).
//!
//! Both the metadata of a module and a standalone Portable PDB start with this header: the
//! `BSJB` signature, a version string and the directory of streams that follow it.

use crate::{
    file::io::{read_le, read_le_at},
    metadata::streams::StreamHeader,
    Result,
};

/// The magic signature (`BSJB`) at the start of every metadata root
pub const CIL_HEADER_MAGIC: u32 = 0x424A_5342;

/// Highest number of streams a metadata root may declare
const MAX_STREAM_COUNT: u16 = 8;

/// The parsed metadata root
pub struct Root {
    /// Magic signature, always [`CIL_HEADER_MAGIC`]
    pub signature: u32,
    /// Major version, 1
    pub major_version: u16,
    /// Minor version, 1
    pub minor_version: u16,
    /// Length of the padded version string
    pub length: u32,
    /// Runtime version string, e.g. `v4.0.30319` or `PDB v1.0`
    pub version: String,
    /// Reserved flags
    pub flags: u16,
    /// The directory of streams, in file order
    pub stream_headers: Vec<StreamHeader>,
}

impl Root {
    /// Read the metadata root from the start of `data`.
    ///
    /// Stream offsets are validated against the length of `data`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the signature or stream directory is invalid, and
    /// [`crate::Error::OutOfBounds`] if a stream lies outside of `data`.
    pub fn read(data: &[u8]) -> Result<Root> {
        if data.len() < 20 {
            return Err(out_of_bounds_error!());
        }

        let signature = read_le::<u32>(data)?;
        if signature != CIL_HEADER_MAGIC {
            return Err(malformed_error!(
                "CIL_HEADER_MAGIC does not match - {}",
                signature
            ));
        }

        let version_string_length = read_le_at::<u32>(data, &mut 12)? as usize;
        let Some(version_end) = version_string_length.checked_add(16) else {
            return Err(malformed_error!(
                "Version string length causing integer overflow - {}",
                version_string_length
            ));
        };
        if version_end + 4 > data.len() {
            return Err(out_of_bounds_error!());
        }

        let version_bytes = &data[16..version_end];
        let version_len = version_bytes
            .iter()
            .position(|byte| *byte == 0)
            .unwrap_or(version_bytes.len());
        let version = String::from_utf8_lossy(&version_bytes[..version_len]).into_owned();

        let flags = read_le_at::<u16>(data, &mut { version_end })?;
        let stream_count = read_le_at::<u16>(data, &mut (version_end + 2))?;
        if stream_count == 0 || stream_count > MAX_STREAM_COUNT {
            return Err(malformed_error!("Invalid stream count - {}", stream_count));
        }

        let mut streams: Vec<StreamHeader> = Vec::with_capacity(stream_count as usize);
        let mut stream_offset = version_end + 4;
        for _ in 0..stream_count {
            if stream_offset > data.len() {
                return Err(out_of_bounds_error!());
            }

            let new_stream = StreamHeader::from(&data[stream_offset..])?;
            match new_stream.offset.checked_add(new_stream.size) {
                Some(range) => {
                    if range as usize > data.len() {
                        return Err(out_of_bounds_error!());
                    }
                }
                None => {
                    return Err(malformed_error!(
                        "Stream offset and size cause integer overflow - {} + {}",
                        new_stream.offset,
                        new_stream.size
                    ))
                }
            }

            if streams.iter().any(|stream| stream.name == new_stream.name) {
                return Err(malformed_error!("Duplicate stream - {}", new_stream.name));
            }

            stream_offset += new_stream.header_size();
            streams.push(new_stream);
        }

        Ok(Root {
            signature,
            major_version: read_le::<u16>(&data[4..])?,
            minor_version: read_le::<u16>(&data[6..])?,
            length: u32::try_from(version_string_length)
                .map_err(|_| malformed_error!("Version string length too large"))?,
            version,
            flags,
            stream_headers: streams,
        })
    }

    /// Look up a stream header by its name
    #[must_use]
    pub fn stream(&self, name: &str) -> Option<&StreamHeader> {
        self.stream_headers.iter().find(|stream| stream.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crafted() {
        #[rustfmt::skip]
        let header_bytes = [
            0x42, 0x53, 0x4A, 0x42,
            0x01, 0x00,
            0x01, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x08, 0x00, 0x00, 0x00,
            b'P', b'D', b'B', b' ', b'v', b'1', 0x00, 0x00,
            0x00, 0x00,
            0x02, 0x00,

            0x28, 0x00, 0x00, 0x00, // StreamHeader #~
            0x04, 0x00, 0x00, 0x00,
            0x23, 0x7E, 0x00, 0x00,

            0x2C, 0x00, 0x00, 0x00, // StreamHeader #Blob
            0x01, 0x00, 0x00, 0x00,
            b'#', b'B', b'l', b'o', b'b', 0x00, 0x00, 0x00,

            0xAA, 0xAA, 0xAA, 0xAA,
            0x00,
        ];

        let root = Root::read(&header_bytes).unwrap();

        assert_eq!(root.signature, CIL_HEADER_MAGIC);
        assert_eq!(root.major_version, 1);
        assert_eq!(root.minor_version, 1);
        assert_eq!(root.length, 8);
        assert_eq!(root.version, "PDB v1");
        assert_eq!(root.stream_headers.len(), 2);
        assert_eq!(root.stream("#~").unwrap().offset, 0x28);
        assert_eq!(root.stream("#Blob").unwrap().size, 1);
        assert!(root.stream("#Strings").is_none());
    }

    #[test]
    fn invalid_signature() {
        let mut data = [0u8; 40];
        data[0] = 0x42;
        assert!(matches!(
            Root::read(&data),
            Err(crate::Error::Malformed { .. })
        ));
    }

    #[test]
    fn stream_out_of_bounds() {
        #[rustfmt::skip]
        let header_bytes = [
            0x42, 0x53, 0x4A, 0x42,
            0x01, 0x00,
            0x01, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x04, 0x00, 0x00, 0x00,
            b'v', b'4', 0x00, 0x00,
            0x00, 0x00,
            0x01, 0x00,

            0x20, 0x00, 0x00, 0x00,
            0xFF, 0x00, 0x00, 0x00,
            0x23, 0x7E, 0x00, 0x00,
        ];

        assert!(matches!(
            Root::read(&header_bytes),
            Err(crate::Error::OutOfBounds { .. })
        ));
    }
}
