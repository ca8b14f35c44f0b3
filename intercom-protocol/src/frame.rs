//! Frame encoding and decoding
//!
//! Frame format:
//! - START (1 byte): 0x55 synchronization byte
//! - DIO (1 byte): digital line states
//! - CONTROLLER ID (1 byte): addressed peripheral, or the replying one
//! - TELEMETRY (2 bytes × [`TELEMETRY_SLOTS`]): little-endian u16 readings
//! - ERROR (1 byte): [`ErrorCode`]
//! - CHECKSUM (1 byte): XOR of all preceding bytes, START included

use crate::dio::Dio;
use crate::error::ErrorCode;

/// Frame synchronization byte
pub const FRAME_START: u8 = 0x55;

/// Number of telemetry readings per frame
pub const TELEMETRY_SLOTS: usize = 3;

/// Complete frame size (START + DIO + ID + TELEMETRY + ERROR + CHECKSUM)
pub const FRAME_LEN: usize = 1 + 1 + 1 + 2 * TELEMETRY_SLOTS + 1 + 1;

const OFFSET_DIO: usize = 1;
const OFFSET_ID: usize = 2;
const OFFSET_TELEMETRY: usize = 3;
const OFFSET_ERROR: usize = OFFSET_TELEMETRY + 2 * TELEMETRY_SLOTS;
const OFFSET_CHECKSUM: usize = FRAME_LEN - 1;

/// Errors that can occur during frame decoding, encoding or field access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Buffer too small for encoding
    BufferTooSmall,
    /// Input is not exactly one frame long
    InvalidLength,
    /// First byte is not [`FRAME_START`]
    MissingStart,
    /// Checksum mismatch
    InvalidChecksum,
    /// Telemetry slot or DIO line does not exist
    IndexOutOfRange,
}

/// XOR of all bytes
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0, |acc, &b| acc ^ b)
}

/// Check a received frame's trailing checksum byte
///
/// Only the length and checksum are checked; the start marker is covered
/// by the checksum like every other byte.
pub fn validate(bytes: &[u8]) -> bool {
    if bytes.len() != FRAME_LEN {
        return false;
    }
    checksum(&bytes[..OFFSET_CHECKSUM]) == bytes[OFFSET_CHECKSUM]
}

/// One frame's worth of fields
///
/// The start marker and checksum are not stored; they are produced by
/// [`Frame::encode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    /// Digital I/O line states
    pub dio: Dio,
    /// Target (host → peripheral) or origin (peripheral → host)
    pub controller_id: u8,
    /// Telemetry readings (temperatures etc.), units are board specific
    pub telemetry: [u16; TELEMETRY_SLOTS],
    /// Error reported by the sender
    pub error: ErrorCode,
}

impl Frame {
    /// Create an empty frame addressed to `controller_id`
    pub const fn new(controller_id: u8) -> Self {
        Self {
            dio: Dio::new(),
            controller_id,
            telemetry: [0; TELEMETRY_SLOTS],
            error: ErrorCode::None,
        }
    }

    /// Read one telemetry slot
    pub fn telemetry(&self, index: usize) -> Result<u16, FrameError> {
        self.telemetry
            .get(index)
            .copied()
            .ok_or(FrameError::IndexOutOfRange)
    }

    /// Write one telemetry slot
    pub fn set_telemetry(&mut self, index: usize, value: u16) -> Result<(), FrameError> {
        let slot = self
            .telemetry
            .get_mut(index)
            .ok_or(FrameError::IndexOutOfRange)?;
        *slot = value;
        Ok(())
    }

    /// Encode this frame, filling in the start marker and checksum
    pub fn encode(&self) -> [u8; FRAME_LEN] {
        let mut buffer = [0u8; FRAME_LEN];

        buffer[0] = FRAME_START;
        buffer[OFFSET_DIO] = self.dio.bits();
        buffer[OFFSET_ID] = self.controller_id;
        for (i, value) in self.telemetry.iter().enumerate() {
            let at = OFFSET_TELEMETRY + 2 * i;
            buffer[at..at + 2].copy_from_slice(&value.to_le_bytes());
        }
        buffer[OFFSET_ERROR] = self.error.to_u8();
        buffer[OFFSET_CHECKSUM] = checksum(&buffer[..OFFSET_CHECKSUM]);

        buffer
    }

    /// Encode this frame into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode_into(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let out = buffer
            .get_mut(..FRAME_LEN)
            .ok_or(FrameError::BufferTooSmall)?;
        out.copy_from_slice(&self.encode());
        Ok(FRAME_LEN)
    }

    /// Extract fields without checking the start marker or checksum
    pub fn from_bytes(bytes: &[u8; FRAME_LEN]) -> Self {
        let mut telemetry = [0u16; TELEMETRY_SLOTS];
        for (i, value) in telemetry.iter_mut().enumerate() {
            let at = OFFSET_TELEMETRY + 2 * i;
            *value = u16::from_le_bytes([bytes[at], bytes[at + 1]]);
        }

        Self {
            dio: Dio::from_bits(bytes[OFFSET_DIO]),
            controller_id: bytes[OFFSET_ID],
            telemetry,
            error: ErrorCode::from_u8(bytes[OFFSET_ERROR]),
        }
    }

    /// Decode a complete frame, rejecting anything malformed
    pub fn decode(bytes: &[u8]) -> Result<Self, FrameError> {
        let bytes: &[u8; FRAME_LEN] = bytes.try_into().map_err(|_| FrameError::InvalidLength)?;
        if bytes[0] != FRAME_START {
            return Err(FrameError::MissingStart);
        }
        if !validate(bytes) {
            return Err(FrameError::InvalidChecksum);
        }
        Ok(Self::from_bytes(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample() -> Frame {
        let mut frame = Frame::new(2);
        frame.dio = Dio::from_bits(0b0000_0101);
        frame.telemetry = [0x00C8, 0x1234, 0xFFFF];
        frame
    }

    #[test]
    fn test_frame_len() {
        assert_eq!(FRAME_LEN, 11);
    }

    #[test]
    fn test_frame_encode_layout() {
        let bytes = sample().encode();

        assert_eq!(bytes[0], FRAME_START);
        assert_eq!(bytes[1], 0b0000_0101); // dio
        assert_eq!(bytes[2], 2); // controller id
        assert_eq!(&bytes[3..9], &[0xC8, 0x00, 0x34, 0x12, 0xFF, 0xFF]);
        assert_eq!(bytes[9], 0); // no error
        assert_eq!(bytes[10], checksum(&bytes[..10]));
    }

    #[test]
    fn test_empty_frame_checksum() {
        let bytes = Frame::new(0).encode();
        // Only the start byte is non-zero
        assert_eq!(bytes[FRAME_LEN - 1], FRAME_START);
    }

    #[test]
    fn test_frame_roundtrip() {
        let mut original = sample();
        original.error = ErrorCode::BadChecksum;
        let decoded = Frame::decode(&original.encode()).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_encode_into_buffer_too_small() {
        let mut buffer = [0u8; FRAME_LEN - 1];
        assert_eq!(
            sample().encode_into(&mut buffer),
            Err(FrameError::BufferTooSmall)
        );

        let mut buffer = [0u8; 16];
        assert_eq!(sample().encode_into(&mut buffer), Ok(FRAME_LEN));
        assert_eq!(&buffer[..FRAME_LEN], &sample().encode());
    }

    #[test]
    fn test_decode_rejects_bad_input() {
        let bytes = sample().encode();

        assert_eq!(
            Frame::decode(&bytes[..FRAME_LEN - 1]),
            Err(FrameError::InvalidLength)
        );

        let mut corrupted = bytes;
        corrupted[FRAME_LEN - 1] ^= 0xFF;
        assert_eq!(Frame::decode(&corrupted), Err(FrameError::InvalidChecksum));

        let mut no_start = bytes;
        no_start[0] = 0xAA;
        assert_eq!(Frame::decode(&no_start), Err(FrameError::MissingStart));
    }

    #[test]
    fn test_from_bytes_ignores_checksum() {
        let mut bytes = sample().encode();
        bytes[FRAME_LEN - 1] ^= 0x01;
        assert!(!validate(&bytes));
        assert_eq!(Frame::from_bytes(&bytes), sample());
    }

    #[test]
    fn test_validate_wrong_length() {
        let bytes = sample().encode();
        assert!(!validate(&bytes[..5]));
        assert!(!validate(&[]));
    }

    #[test]
    fn test_telemetry_index_out_of_range() {
        let mut frame = Frame::new(1);
        assert_eq!(
            frame.set_telemetry(TELEMETRY_SLOTS, 1),
            Err(FrameError::IndexOutOfRange)
        );
        assert_eq!(frame.telemetry(TELEMETRY_SLOTS), Err(FrameError::IndexOutOfRange));
        frame.set_telemetry(1, 250).unwrap();
        assert_eq!(frame.telemetry(1), Ok(250));
    }

    // XOR is blind to two flips in the same bit column
    #[test]
    fn test_checksum_misses_paired_bit_flips() {
        let mut bytes = sample().encode();
        bytes[3] ^= 0x10;
        bytes[5] ^= 0x10;
        assert!(validate(&bytes));
        assert_ne!(Frame::from_bytes(&bytes), sample());
    }

    // ...and to reordering
    #[test]
    fn test_checksum_misses_swapped_bytes() {
        let mut bytes = sample().encode();
        bytes.swap(3, 4);
        assert!(validate(&bytes));
        assert_ne!(Frame::from_bytes(&bytes), sample());
    }

    fn any_frame() -> impl Strategy<Value = Frame> {
        (any::<u8>(), any::<u8>(), any::<[u16; TELEMETRY_SLOTS]>(), any::<u8>()).prop_map(
            |(dio, controller_id, telemetry, error)| Frame {
                dio: Dio::from_bits(dio),
                controller_id,
                telemetry,
                error: ErrorCode::from_u8(error),
            },
        )
    }

    proptest! {
        #[test]
        fn prop_encoded_frames_validate(frame in any_frame()) {
            let bytes = frame.encode();
            prop_assert!(validate(&bytes));
            prop_assert_eq!(Frame::decode(&bytes), Ok(frame));
        }

        #[test]
        fn prop_single_bit_flip_is_detected(
            frame in any_frame(),
            byte in 0..FRAME_LEN,
            bit in 0u8..8,
        ) {
            let mut bytes = frame.encode();
            bytes[byte] ^= 1 << bit;
            prop_assert!(!validate(&bytes));
        }
    }
}
