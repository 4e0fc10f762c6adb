//! Method body headers (ECMA-335 II.25.4).
//!
//! A method body starts with either a one byte tiny header or a twelve byte fat header. Only the
//! header is decoded here; it locates the IL code that follows. Extra data sections (exception
//! clauses) after the code are not needed to find instruction boundaries and are skipped.

use crate::{
    file::io::{read_le, read_le_at},
    metadata::method::MethodBodyFlags,
    Result,
};

/// Decoded method body header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodBody {
    /// Size of the IL code in bytes
    pub size_code: usize,
    /// Size of the header in bytes
    pub size_header: usize,
    /// `StandAloneSig` token of the local variable signature, 0 if there are no locals
    pub local_var_sig_token: u32,
    /// Maximum evaluation stack depth, 8 for tiny headers
    pub max_stack: usize,
    /// True for the fat header format
    pub is_fat: bool,
    /// True if locals are zero initialized
    pub is_init_local: bool,
    /// True if extra data sections follow the code
    pub has_more_sections: bool,
}

impl MethodBody {
    /// Decode the method header at the start of `data`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the header or the code it announces does not fit
    /// into `data`, [`crate::Error::Malformed`] for an unknown header format.
    pub fn from(data: &[u8]) -> Result<MethodBody> {
        if data.is_empty() {
            return Err(malformed_error!("Provided data for body parsing is empty"));
        }

        let first_byte = read_le::<u8>(data)?;
        match MethodBodyFlags::from_bits_truncate(u16::from(first_byte & 0b_0000_0011_u8)) {
            MethodBodyFlags::TINY_FORMAT => {
                let size_code = (first_byte >> 2) as usize;
                if size_code + 1 > data.len() {
                    return Err(out_of_bounds_error!());
                }

                Ok(MethodBody {
                    size_code,
                    size_header: 1,
                    local_var_sig_token: 0,
                    max_stack: 8,
                    is_fat: false,
                    is_init_local: false,
                    has_more_sections: false,
                })
            }
            MethodBodyFlags::FAT_FORMAT => {
                if data.len() < 12 {
                    return Err(out_of_bounds_error!());
                }

                let mut offset = 0;
                let first_duo = read_le_at::<u16>(data, &mut offset)?;
                let max_stack = read_le_at::<u16>(data, &mut offset)? as usize;
                let size_code = read_le_at::<u32>(data, &mut offset)? as usize;
                let local_var_sig_token = read_le_at::<u32>(data, &mut offset)?;

                let size_header = ((first_duo >> 12) * 4) as usize;
                if size_header < 12 {
                    return Err(malformed_error!(
                        "Fat method header announces {} header bytes",
                        size_header
                    ));
                }

                match size_header.checked_add(size_code) {
                    Some(end) if end <= data.len() => {}
                    _ => return Err(out_of_bounds_error!()),
                }

                let flags_header =
                    MethodBodyFlags::from_bits_truncate(first_duo & 0b_0000_1111_1111_1111_u16);

                Ok(MethodBody {
                    size_code,
                    size_header,
                    local_var_sig_token,
                    max_stack,
                    is_fat: true,
                    is_init_local: flags_header.contains(MethodBodyFlags::INIT_LOCALS),
                    has_more_sections: flags_header.contains(MethodBodyFlags::MORE_SECTS),
                })
            }
            _ => Err(malformed_error!(
                "MethodHeader is neither FAT nor TINY - {}",
                first_byte
            )),
        }
    }

    /// Header plus code size in bytes
    #[must_use]
    pub fn size(&self) -> usize {
        self.size_code + self.size_header
    }

    /// The IL code of this body, given the same `data` it was decoded from
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if `data` is shorter than the body.
    pub fn code<'a>(&self, data: &'a [u8]) -> Result<&'a [u8]> {
        data.get(self.size_header..self.size())
            .ok_or(out_of_bounds_error!())
    }
}
