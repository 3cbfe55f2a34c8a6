//! Playback tuning.

/// Fixed prosody settings for synthesized speech. Not user-configurable;
/// the console always speaks at neutral rate, pitch, and volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackOptions {
    /// Speaking rate multiplier
    pub rate: f32,
    /// Pitch multiplier
    pub pitch: f32,
    /// Output volume, 0.0 to 1.0
    pub volume: f32,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            rate: 1.0,
            pitch: 1.0,
            volume: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_neutral() {
        let opts = PlaybackOptions::default();
        assert_eq!(opts.rate, 1.0);
        assert_eq!(opts.pitch, 1.0);
        assert_eq!(opts.volume, 1.0);
    }
}
