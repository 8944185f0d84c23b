use serde::{Deserialize, Serialize};

/// Configuration for a playback overlay.
///
/// The control flags describe which interactive controls the host UI should
/// expose for the overlay; the overlay itself only records them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackOptions {
    pub play_control: bool,
    pub date_control: bool,
    pub slider_control: bool,
    /// Smallest step the playback cursor advances by, in milliseconds of
    /// track time.
    pub tick_len_ms: u64,
    /// Multiplier applied to wall-clock time when advancing the cursor.
    pub speed: f64,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            play_control: false,
            date_control: false,
            slider_control: false,
            tick_len_ms: 250,
            speed: 1.0,
        }
    }
}

impl PlaybackOptions {
    /// Options with every UI control enabled.
    pub fn all_controls() -> Self {
        Self {
            play_control: true,
            date_control: true,
            slider_control: true,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_disable_controls() {
        let opts = PlaybackOptions::default();
        assert!(!opts.play_control);
        assert!(!opts.date_control);
        assert!(!opts.slider_control);
        assert_eq!(opts.tick_len_ms, 250);
        assert_eq!(opts.speed, 1.0);
    }

    #[test]
    fn test_all_controls() {
        let opts = PlaybackOptions::all_controls();
        assert!(opts.play_control && opts.date_control && opts.slider_control);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let opts: PlaybackOptions = serde_json::from_str(r#"{"play_control": true}"#).unwrap();
        assert!(opts.play_control);
        assert!(!opts.slider_control);
        assert_eq!(opts.tick_len_ms, 250);
    }
}
