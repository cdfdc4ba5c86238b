//! Platform identifiers.
//!
//! Discord snowflakes are plain `u64`s on the wire; wrapping each kind keeps a
//! user id from ever being passed where a channel id is expected.

use {
    serde::{Deserialize, Serialize},
    std::{fmt, str::FromStr},
};

use crate::error::Error;

macro_rules! snowflake {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            #[must_use]
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse::<u64>()
                    .map(Self)
                    .map_err(|_| Error::InvalidId(s.to_string()))
            }
        }
    };
}

snowflake!(
    /// A guild member / user.
    UserId
);
snowflake!(
    /// A guild channel (voice, text or category).
    ChannelId
);
snowflake!(
    /// A guild (community).
    GuildId
);
snowflake!(
    /// A chat message.
    MessageId
);

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_decimal_snowflake() {
        let id: UserId = "80351110224678912".parse().unwrap();
        assert_eq!(id, UserId(80351110224678912));
        assert_eq!(id.to_string(), "80351110224678912");
    }

    #[test]
    fn rejects_overflowing_snowflake() {
        assert!("99999999999999999999999".parse::<ChannelId>().is_err());
        assert!("abc".parse::<GuildId>().is_err());
    }

    #[test]
    fn serializes_transparently() {
        let json = serde_json::to_string(&ChannelId(42)).unwrap();
        assert_eq!(json, "42");
    }
}
