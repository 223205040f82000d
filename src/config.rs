//! Board configuration for the supported game variants

use serde::{Deserialize, Serialize};

/// Configuration of a square N-in-a-row board.
///
/// Only a small fixed set of variants is supported: 3x3 with three in a row,
/// and 5x5 / 7x7 with four in a row. Arbitrary sizes are rejected at
/// construction so the search layers never see an unsupported board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardConfig {
    size: usize,
    win_length: usize,
}

/// The supported (size, win_length) pairs
pub const SUPPORTED_CONFIGURATIONS: [(usize, usize); 3] = [(3, 3), (5, 4), (7, 4)];

impl BoardConfig {
    /// Look up the configuration for a board side length.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UnsupportedBoardSize`] if the size is not one
    /// of the supported variants.
    pub fn for_size(size: usize) -> Result<Self, crate::Error> {
        SUPPORTED_CONFIGURATIONS
            .iter()
            .find(|&&(s, _)| s == size)
            .map(|&(size, win_length)| BoardConfig { size, win_length })
            .ok_or(crate::Error::UnsupportedBoardSize { size })
    }

    /// Grid side length
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of consecutive symbols needed to win
    pub fn win_length(&self) -> usize {
        self.win_length
    }

    /// Total number of cells on the board
    pub fn squares(&self) -> usize {
        self.size * self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_sizes() {
        let small = BoardConfig::for_size(3).unwrap();
        assert_eq!(small.win_length(), 3);
        assert_eq!(small.squares(), 9);

        let medium = BoardConfig::for_size(5).unwrap();
        assert_eq!(medium.win_length(), 4);
        assert_eq!(medium.squares(), 25);

        let large = BoardConfig::for_size(7).unwrap();
        assert_eq!(large.win_length(), 4);
        assert_eq!(large.squares(), 49);
    }

    #[test]
    fn test_unsupported_sizes_rejected() {
        assert!(BoardConfig::for_size(0).is_err());
        assert!(BoardConfig::for_size(4).is_err());
        assert!(BoardConfig::for_size(9).is_err());
    }
}
