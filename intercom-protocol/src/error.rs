//! Error codes carried in the frame's error byte
//!
//! A board reports problems it saw on the link by writing a code into its
//! next outbound frame; the counterparty (normally the host) reads it back.

/// Error code byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorCode {
    /// No error
    #[default]
    None,
    /// The last frame addressed to this board failed its checksum
    BadChecksum,
    /// Code not known to this firmware, carried through unchanged
    Unknown(u8),
}

impl ErrorCode {
    pub const NONE: u8 = 0x00;
    pub const BAD_CHECKSUM: u8 = 0x01;

    /// Wire value
    pub const fn to_u8(self) -> u8 {
        match self {
            ErrorCode::None => Self::NONE,
            ErrorCode::BadChecksum => Self::BAD_CHECKSUM,
            ErrorCode::Unknown(code) => code,
        }
    }

    /// Parse a wire value
    pub const fn from_u8(code: u8) -> Self {
        match code {
            Self::NONE => ErrorCode::None,
            Self::BAD_CHECKSUM => ErrorCode::BadChecksum,
            other => ErrorCode::Unknown(other),
        }
    }

    /// True for anything but [`ErrorCode::None`]
    pub const fn is_error(self) -> bool {
        !matches!(self, ErrorCode::None)
    }
}

impl From<u8> for ErrorCode {
    fn from(code: u8) -> Self {
        Self::from_u8(code)
    }
}

impl From<ErrorCode> for u8 {
    fn from(code: ErrorCode) -> Self {
        code.to_u8()
    }
}
