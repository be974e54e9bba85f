//! Session configuration.
//!
//! Board dimensions and the starting arrangement are configuration rather
//! than constants, so the same engine runs the classic 8x8 game and the
//! oversized formation board.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tilechess_core::{BoardSize, Result, Square};

use crate::{Layout, LayoutKind};

/// Game session configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Board dimensions.
    pub board: BoardSize,

    /// Starting arrangement placed on reset.
    pub layout: LayoutKind,

    /// Bottom-left corner of the arrangement (column, row).
    pub offset: (u8, u8),

    /// Only let the side to move select and move pieces.
    /// When false, turn order is left to the caller.
    pub enforce_turns: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::classic()
    }
}

impl SessionConfig {
    /// Classic set on an 8x8 board.
    pub fn classic() -> Self {
        Self {
            board: BoardSize::CLASSIC,
            layout: LayoutKind::Classic,
            offset: (0, 0),
            enforce_turns: true,
        }
    }

    /// Formation on a 30x30 board.
    pub fn formation() -> Self {
        let anchor = Layout::formation().anchor;
        Self {
            board: BoardSize { width: 30, height: 30 },
            layout: LayoutKind::Formation,
            offset: (anchor.col, anchor.row),
            enforce_turns: true,
        }
    }

    /// Defaults for the given arrangement.
    pub fn for_layout(kind: LayoutKind) -> Self {
        match kind {
            LayoutKind::Classic => Self::classic(),
            LayoutKind::Formation => Self::formation(),
        }
    }

    /// Same config with a different board size.
    pub fn with_board(self, board: BoardSize) -> Self {
        Self { board, ..self }
    }

    /// Same config with the arrangement anchored elsewhere.
    pub fn with_offset(self, col: u8, row: u8) -> Self {
        Self {
            offset: (col, row),
            ..self
        }
    }

    /// Same config with turn enforcement switched on or off.
    pub fn with_enforce_turns(self, enforce_turns: bool) -> Self {
        Self {
            enforce_turns,
            ..self
        }
    }

    /// The arrangement this config places.
    pub fn layout(&self) -> Layout {
        Layout::new(self.layout, Square::new(self.offset.0, self.offset.1))
    }

    /// Check the board is non-empty and the arrangement fits on it.
    pub fn validate(&self) -> Result<()> {
        BoardSize::new(self.board.width, self.board.height)?;
        self.layout().check_fits(self.board)
    }

    /// Read a JSON config file; missing fields take their defaults.
    ///
    /// # Errors
    /// `GameError::Io` if the file cannot be read, `GameError::Parse` if it
    /// is not a config, `GameError::InvalidConfig` if the layout does not fit.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilechess_core::GameError;

    #[test]
    fn test_default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.board, BoardSize::CLASSIC);
        assert_eq!(config.layout, LayoutKind::Classic);
        assert_eq!(config.offset, (0, 0));
        assert!(config.enforce_turns);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_formation_config_fits() {
        let config = SessionConfig::formation();
        assert_eq!(config.board.width, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_with_offset_must_still_fit() {
        assert!(SessionConfig::classic().with_offset(1, 0).validate().is_err());
        let bigger = SessionConfig::classic()
            .with_board(BoardSize::square(10).unwrap())
            .with_offset(2, 2);
        assert!(bigger.validate().is_ok());
        assert_eq!(bigger.layout().anchor, Square::new(2, 2));
    }

    #[test]
    fn test_zero_board_rejected() {
        let config = SessionConfig::classic().with_board(BoardSize { width: 0, height: 8 });
        assert!(matches!(config.validate(), Err(GameError::InvalidConfig(_))));
    }

    #[test]
    fn test_from_json_partial() {
        let config = SessionConfig::from_json(r#"{ "enforce_turns": false }"#).unwrap();
        assert!(!config.enforce_turns);
        assert_eq!(config.layout, LayoutKind::Classic);

        let config = SessionConfig::from_json(
            r#"{ "board": { "width": 30, "height": 30 }, "layout": "formation", "offset": [3, 8] }"#,
        )
        .unwrap();
        assert_eq!(config, SessionConfig::formation());
    }

    #[test]
    fn test_from_json_rejects_bad_input() {
        assert!(matches!(
            SessionConfig::from_json("not json"),
            Err(GameError::Parse(_))
        ));
        assert!(matches!(
            SessionConfig::from_json(r#"{ "enforce_turns": "yes" }"#),
            Err(GameError::Parse(_))
        ));
        // well-formed, but the formation does not fit the default 8x8 board
        assert!(matches!(
            SessionConfig::from_json(r#"{ "layout": "formation" }"#),
            Err(GameError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("tilechess-no-such-config.json");
        let err = SessionConfig::load(&path).unwrap_err();
        match err {
            GameError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            other => panic!("expected an I/O error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_reads_file() {
        let path = std::env::temp_dir().join(format!(
            "tilechess-config-{}.json",
            std::process::id()
        ));
        fs::write(&path, r#"{ "layout": "formation", "board": { "width": 30, "height": 30 } }"#)
            .unwrap();
        let loaded = SessionConfig::load(&path);
        fs::remove_file(&path).unwrap();
        assert_eq!(loaded.unwrap().layout, LayoutKind::Formation);
    }

    #[test]
    fn test_round_trip_through_json() {
        let config = SessionConfig::formation().with_enforce_turns(false);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(SessionConfig::from_json(&json).unwrap(), config);
    }
}
