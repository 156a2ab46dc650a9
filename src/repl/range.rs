//! Line ranges typed at the prompt
//!
//! `hist --replay`, `hist --show`, `amend-line` and `play --lines` all take a
//! line selection of the form `N`, `N..M` (inclusive), `N...M` (exclusive) or
//! `N..` (through the last line). Negative numbers count from the end, so
//! `-1` is always the last line regardless of the index base.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use super::error::ReplError;

/// Whether user-typed line numbers start at 0 or 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexBase {
    /// `0` is the first line
    Zero,
    /// `1` is the first line
    #[default]
    One,
}

impl IndexBase {
    /// Pick the base from the `base_one` setting
    pub fn from_base_one(base_one: bool) -> Self {
        if base_one {
            IndexBase::One
        } else {
            IndexBase::Zero
        }
    }

    /// Number of the first line in this base
    pub fn first(self) -> usize {
        match self {
            IndexBase::Zero => 0,
            IndexBase::One => 1,
        }
    }
}

/// A selection of lines, not yet resolved against a list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    start: isize,
    end: Option<isize>,
    exclusive: bool,
}

impl LineRange {
    /// A single line
    pub fn single(index: isize) -> Self {
        Self {
            start: index,
            end: None,
            exclusive: false,
        }
    }

    /// `start..end`, both ends included
    pub fn inclusive(
        start: isize,
        end: isize,
    ) -> Self {
        Self {
            start,
            end: Some(end),
            exclusive: false,
        }
    }

    /// The last line
    pub fn last() -> Self {
        Self::single(-1)
    }

    /// First index as typed
    pub fn start(&self) -> isize {
        self.start
    }

    /// Last index as typed, `None` for a single line
    pub fn end(&self) -> Option<isize> {
        self.end
    }

    fn position(
        index: isize,
        len: usize,
        base: IndexBase,
    ) -> isize {
        if index < 0 {
            signed(len).saturating_add(index)
        } else {
            index - base.first() as isize
        }
    }

    /// Both ends as zero-based positions, the end exclusive
    fn bounds(
        &self,
        len: usize,
        base: IndexBase,
    ) -> Option<(isize, isize)> {
        let start = Self::position(self.start, len, base);
        if start < 0 || start >= signed(len) {
            return None;
        }
        // an end past isize::MAX stays past the last line
        let end = match self.end {
            None => start + 1,
            Some(end) if self.exclusive => Self::position(end, len, base),
            Some(end) => Self::position(end, len, base).saturating_add(1),
        };
        Some((start, end))
    }

    /// Resolve against a list of `len` lines.
    ///
    /// Returns `None` when either bound falls outside the list or the
    /// selection is empty.
    pub fn resolve(
        &self,
        len: usize,
        base: IndexBase,
    ) -> Option<Range<usize>> {
        let (start, end) = self.bounds(len, base)?;
        if end <= start || end > signed(len) {
            return None;
        }
        Some(start as usize..end as usize)
    }

    /// Like [`LineRange::resolve`], but an end past the last line is
    /// clamped instead of rejected.
    pub fn clamp(
        &self,
        len: usize,
        base: IndexBase,
    ) -> Option<Range<usize>> {
        let (start, end) = self.bounds(len, base)?;
        let end = end.min(signed(len));
        if end <= start {
            return None;
        }
        Some(start as usize..end as usize)
    }
}

fn signed(len: usize) -> isize {
    isize::try_from(len).unwrap_or(isize::MAX)
}

fn parse_bound(
    text: &str,
    whole: &str,
) -> Result<isize, ReplError> {
    text.trim()
        .parse::<isize>()
        .map_err(|_| ReplError::malformed(format!("Invalid line range: {}", whole)))
}

impl FromStr for LineRange {
    type Err = ReplError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let (start, end, exclusive) = match text.split_once("..") {
            None => (text, None, false),
            Some((start, rest)) => match rest.strip_prefix('.') {
                Some(rest) => (start, Some(rest), true),
                None => (start, Some(rest), false),
            },
        };

        let start = parse_bound(start, s)?;
        let range = match end {
            None => LineRange::single(start),
            // `N..` runs through the last line
            Some(end) if end.trim().is_empty() => LineRange::inclusive(start, -1),
            Some(end) => LineRange {
                start,
                end: Some(parse_bound(end, s)?),
                exclusive,
            },
        };
        Ok(range)
    }
}

impl fmt::Display for LineRange {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self.end {
            None => write!(f, "{}", self.start),
            Some(end) if self.exclusive => write!(f, "{}...{}", self.start, end),
            Some(end) => write!(f, "{}..{}", self.start, end),
        }
    }
}
