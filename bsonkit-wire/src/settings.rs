use bsonkit::codec_config::CodecConfig;

/// Largest message accepted by default.
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 48_000_000;

/// Settings for building and parsing messages.
///
/// Documents embedded in a message are encoded and decoded with `codec`.
#[derive(Clone)]
pub struct MessageSettings {
    max_message_size: usize,
    codec: CodecConfig,
}

impl MessageSettings {
    pub fn new(codec: CodecConfig) -> Self {
        MessageSettings {
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            codec,
        }
    }

    pub fn with_max_message_size(mut self, max_message_size: usize) -> Self {
        self.max_message_size = max_message_size;
        self
    }

    pub fn max_message_size(&self) -> usize {
        self.max_message_size
    }

    pub fn codec(&self) -> &CodecConfig {
        &self.codec
    }
}

impl Default for MessageSettings {
    fn default() -> Self {
        MessageSettings::new(CodecConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = MessageSettings::default();
        assert_eq!(settings.max_message_size(), DEFAULT_MAX_MESSAGE_SIZE);
        assert!(!settings.codec().serialize_id_first());
    }

    #[test]
    fn test_with_max_message_size() {
        let settings = MessageSettings::default().with_max_message_size(1024);
        assert_eq!(settings.max_message_size(), 1024);
    }
}
