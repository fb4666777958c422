use std::ops::Range;
use std::str::FromStr;

/// Invalid user input for a selection or range
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid input: {0:?}")]
    Malformed(String),

    #[error("Choice {choice} is out of range 1-{max}")]
    InvalidChoice { choice: usize, max: usize },

    #[error("Range {start}-{end} is out of range 1-{total}")]
    OutOfRange {
        start: usize,
        end: usize,
        total: usize,
    },
}

/// Episodes to import, 1-based and inclusive as typed by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeRange {
    All,
    Single(usize),
    Span(usize, usize),
}

impl EpisodeRange {
    /// Convert to a 0-based half-open slice over `total` episodes
    pub fn to_slice(self, total: usize) -> Result<Range<usize>, ValidationError> {
        let (start, end) = match self {
            Self::All => return Ok(0..total),
            Self::Single(n) => (n, n),
            Self::Span(start, end) => (start, end),
        };

        if start == 0 || start > end || end > total {
            return Err(ValidationError::OutOfRange { start, end, total });
        }

        Ok(start - 1..end)
    }
}

impl FromStr for EpisodeRange {
    type Err = ValidationError;

    /// Accepts `all`, `N` or `A-B`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let malformed = || ValidationError::Malformed(input.to_string());

        if input.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }

        if let Some((start, end)) = input.split_once('-') {
            let start = start.trim().parse::<usize>().map_err(|_| malformed())?;
            let end = end.trim().parse::<usize>().map_err(|_| malformed())?;
            return Ok(Self::Span(start, end));
        }

        input.parse::<usize>().map(Self::Single).map_err(|_| malformed())
    }
}

/// Check a 1-based menu choice against `max` entries and return the 0-based index
pub fn validate_choice(choice: usize, max: usize) -> Result<usize, ValidationError> {
    if choice == 0 || choice > max {
        return Err(ValidationError::InvalidChoice { choice, max });
    }
    Ok(choice - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_forms() {
        assert_eq!("all".parse(), Ok(EpisodeRange::All));
        assert_eq!(" ALL ".parse(), Ok(EpisodeRange::All));
        assert_eq!("3".parse(), Ok(EpisodeRange::Single(3)));
        assert_eq!("2-10".parse(), Ok(EpisodeRange::Span(2, 10)));
        assert_eq!(" 2 - 10 ".parse(), Ok(EpisodeRange::Span(2, 10)));
    }

    #[test]
    fn test_parse_malformed() {
        for input in ["", "abc", "1-", "-3", "1-2-3", "1.5"] {
            assert!(
                matches!(input.parse::<EpisodeRange>(), Err(ValidationError::Malformed(_))),
                "{input:?} should be malformed"
            );
        }
    }

    #[test]
    fn test_slice_bounds() {
        assert_eq!(EpisodeRange::All.to_slice(12), Ok(0..12));
        assert_eq!(EpisodeRange::Single(1).to_slice(12), Ok(0..1));
        assert_eq!(EpisodeRange::Single(12).to_slice(12), Ok(11..12));
        assert_eq!(EpisodeRange::Span(3, 5).to_slice(12), Ok(2..5));
    }

    #[test]
    fn test_slice_out_of_range() {
        assert!(EpisodeRange::Single(0).to_slice(12).is_err());
        assert!(EpisodeRange::Single(13).to_slice(12).is_err());
        assert!(EpisodeRange::Span(5, 3).to_slice(12).is_err());
        assert_eq!(
            EpisodeRange::Span(10, 20).to_slice(12),
            Err(ValidationError::OutOfRange {
                start: 10,
                end: 20,
                total: 12
            })
        );
    }

    #[test]
    fn test_validate_choice() {
        assert_eq!(validate_choice(1, 3), Ok(0));
        assert_eq!(validate_choice(3, 3), Ok(2));
        assert!(validate_choice(0, 3).is_err());
        assert!(validate_choice(4, 3).is_err());
    }
}
