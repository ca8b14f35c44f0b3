//! Persisting link configuration as postcard binary data

use super::types::LinkConfig;

/// Largest encoded [`LinkConfig`] (role tag + id + two varint u32)
pub const MAX_ENCODED_LEN: usize = 16;

/// Errors that can occur while storing or loading a configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Serialization failed (buffer too small)
    Encode,
    /// Stored bytes are not a valid configuration
    Decode,
}

/// Serialize a configuration into `buf`, returning the used part
pub fn encode<'a>(config: &LinkConfig, buf: &'a mut [u8]) -> Result<&'a mut [u8], ConfigError> {
    postcard::to_slice(config, buf).map_err(|_| ConfigError::Encode)
}

/// Deserialize a configuration
pub fn decode(bytes: &[u8]) -> Result<LinkConfig, ConfigError> {
    postcard::from_bytes(bytes).map_err(|_| ConfigError::Decode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_and_load() {
        let config = LinkConfig::peripheral(7).with_settle_us(20);
        let mut buf = [0u8; MAX_ENCODED_LEN];
        let used = encode(&config, &mut buf).unwrap().len();
        assert_eq!(decode(&buf[..used]), Ok(config));
    }

    #[test]
    fn test_buffer_too_small() {
        let mut buf = [0u8; 2];
        assert_eq!(
            encode(&LinkConfig::peripheral(7), &mut buf).map(|b| b.len()),
            Err(ConfigError::Encode)
        );
    }

    #[test]
    fn test_garbage_rejected() {
        assert_eq!(decode(&[0x09]), Err(ConfigError::Decode));
        assert_eq!(decode(&[]), Err(ConfigError::Decode));
    }
}
