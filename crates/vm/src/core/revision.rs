use std::{fmt, str::FromStr};

/// The number of supported revisions.
pub const REVISION_COUNT: usize = 11;

/// Ethereum protocol revisions in chronological order.
///
/// Each revision may activate new opcodes or reprice existing ones. The discriminants match the
/// `evmc_revision` values used by the generated runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum Revision {
    /// Initial Ethereum release (July 2015)
    Frontier = 0,
    /// First planned hard fork (March 2016)
    Homestead = 1,
    /// Gas repricing of IO-heavy opcodes (October 2016)
    TangerineWhistle = 2,
    /// State clearing (November 2016) - no opcode changes
    SpuriousDragon = 3,
    /// First of Metropolis series (October 2017)
    Byzantium = 4,
    /// Second of Metropolis series (February 2019)
    Constantinople = 5,
    /// Constantinople bug fix (February 2019) - no opcode changes
    Petersburg = 6,
    /// December 2019 fork
    Istanbul = 7,
    /// April 2021 fork
    Berlin = 8,
    /// August 2021 fork
    London = 9,
    /// April 2023 fork
    #[default]
    Shanghai = 10,
}

impl Revision {
    /// All revisions, oldest first.
    pub const ALL: [Revision; REVISION_COUNT] = [
        Self::Frontier,
        Self::Homestead,
        Self::TangerineWhistle,
        Self::SpuriousDragon,
        Self::Byzantium,
        Self::Constantinople,
        Self::Petersburg,
        Self::Istanbul,
        Self::Berlin,
        Self::London,
        Self::Shanghai,
    ];

    /// Returns the latest supported revision.
    #[inline]
    pub const fn latest() -> Self {
        Self::Shanghai
    }

    /// Returns true if `self` is at or after `other`.
    #[inline]
    pub const fn is_active(self, other: Self) -> bool {
        self as u8 >= other as u8
    }

    /// Returns the kebab-case name of the revision, as accepted on the command line.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Frontier => "frontier",
            Self::Homestead => "homestead",
            Self::TangerineWhistle => "tangerine-whistle",
            Self::SpuriousDragon => "spurious-dragon",
            Self::Byzantium => "byzantium",
            Self::Constantinople => "constantinople",
            Self::Petersburg => "petersburg",
            Self::Istanbul => "istanbul",
            Self::Berlin => "berlin",
            Self::London => "london",
            Self::Shanghai => "shanghai",
        }
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a revision name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown revision '{0}', expected one of: frontier, homestead, tangerine-whistle, spurious-dragon, byzantium, constantinople, petersburg, istanbul, berlin, london, shanghai")]
pub struct ParseRevisionError(pub String);

impl FromStr for Revision {
    type Err = ParseRevisionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "latest" => Ok(Self::latest()),
            "tangerinewhistle" => Ok(Self::TangerineWhistle),
            "spuriousdragon" => Ok(Self::SpuriousDragon),
            name => Self::ALL
                .into_iter()
                .find(|rev| rev.name() == name)
                .ok_or_else(|| ParseRevisionError(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revisions_are_ordered() {
        for (i, rev) in Revision::ALL.iter().enumerate() {
            assert_eq!(*rev as usize, i);
        }
        assert!(Revision::Shanghai.is_active(Revision::London));
        assert!(!Revision::Frontier.is_active(Revision::Homestead));
    }

    #[test]
    fn test_revision_names_round_trip() {
        for rev in Revision::ALL {
            assert_eq!(rev.to_string().parse::<Revision>(), Ok(rev));
        }
    }

    #[test]
    fn test_revision_parse_aliases() {
        assert_eq!("Tangerine_Whistle".parse::<Revision>(), Ok(Revision::TangerineWhistle));
        assert_eq!("spuriousdragon".parse::<Revision>(), Ok(Revision::SpuriousDragon));
        assert_eq!("latest".parse::<Revision>(), Ok(Revision::Shanghai));
        assert!("cancun".parse::<Revision>().is_err());
    }

    #[test]
    fn test_default_is_latest() {
        assert_eq!(Revision::default(), Revision::latest());
    }
}
