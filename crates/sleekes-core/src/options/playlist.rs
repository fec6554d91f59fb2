//! Playlist item selection (`"1-5,10"`).

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::InvalidOptions;

/// Inclusive 1-based index span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    start: u32,
    end: u32,
}

/// Validated playlist item selection: comma-separated `N`, `N-M` or `N:M`
/// items with `1 <= N <= M`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistItems {
    spans: Vec<Span>,
}

impl PlaylistItems {
    pub fn parse(input: &str) -> Result<Self, InvalidOptions> {
        let fail = |reason: String| InvalidOptions::PlaylistRange {
            input: input.to_string(),
            reason,
        };

        if input.trim().is_empty() {
            return Err(fail("empty selection".to_string()));
        }

        let mut spans = Vec::new();
        for raw in input.split(',') {
            let item = raw.trim();
            if item.is_empty() {
                return Err(fail("empty item between commas".to_string()));
            }
            let span = match item.split_once(['-', ':']) {
                Some((a, b)) => {
                    let start = parse_index(a).map_err(&fail)?;
                    let end = parse_index(b).map_err(&fail)?;
                    if start > end {
                        return Err(fail(format!("range {item} runs backwards")));
                    }
                    Span { start, end }
                }
                None => {
                    let n = parse_index(item).map_err(&fail)?;
                    Span { start: n, end: n }
                }
            };
            spans.push(span);
        }
        Ok(Self { spans })
    }

    /// Every selected index, deduplicated and sorted.
    pub fn indices(&self) -> BTreeSet<u32> {
        self.spans.iter().flat_map(|s| s.start..=s.end).collect()
    }

    pub fn contains(&self, index: u32) -> bool {
        self.spans.iter().any(|s| (s.start..=s.end).contains(&index))
    }
}

fn parse_index(s: &str) -> Result<u32, String> {
    let s = s.trim();
    match s.parse::<u32>() {
        Ok(0) => Err("playlist indices start at 1".to_string()),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("{s:?} is not a positive index")),
    }
}

/// Canonical form handed to the extraction engine, e.g. `1-5,10`.
impl fmt::Display for PlaylistItems {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, span) in self.spans.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            if span.start == span.end {
                write!(f, "{}", span.start)?;
            } else {
                write!(f, "{}-{}", span.start, span.end)?;
            }
        }
        Ok(())
    }
}

impl FromStr for PlaylistItems {
    type Err = InvalidOptions;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_and_single() {
        let items = PlaylistItems::parse("1-5,10").unwrap();
        let expected: BTreeSet<u32> = [1, 2, 3, 4, 5, 10].into_iter().collect();
        assert_eq!(items.indices(), expected);
        assert_eq!(items.to_string(), "1-5,10");
    }

    #[test]
    fn whitespace_and_colon_separator() {
        let items = PlaylistItems::parse(" 2:4 , 7 ").unwrap();
        let expected: BTreeSet<u32> = [2, 3, 4, 7].into_iter().collect();
        assert_eq!(items.indices(), expected);
        assert_eq!(items.to_string(), "2-4,7");
        assert!(items.contains(3));
        assert!(!items.contains(5));
    }

    #[test]
    fn overlapping_spans_are_deduplicated() {
        let items = PlaylistItems::parse("1-3,2-4,3").unwrap();
        assert_eq!(items.indices().len(), 4);
    }

    #[test]
    fn rejects_garbage() {
        for bad in ["abc", "x-y", "", "1,,2", "0", "5-2", "1-", "-3", "1-2-3"] {
            assert!(
                matches!(
                    PlaylistItems::parse(bad),
                    Err(InvalidOptions::PlaylistRange { .. })
                ),
                "{bad:?} should be rejected"
            );
        }
    }
}
