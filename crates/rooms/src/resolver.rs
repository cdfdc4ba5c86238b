//! Turn a command argument into a guild member.

use tracing::debug;

use tempvoice_common::{GuildId, UserId};

use crate::{
    error::Result,
    platform::{MemberInfo, VoicePlatform},
};

/// How a command argument identifies its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetQuery<'a> {
    /// `<@123>`, `<@!123>` or a bare `123`.
    Id(UserId),
    /// Anything else; matched against usernames and display names.
    Name(&'a str),
    /// Looked like an id but does not fit one, or is the zero id no
    /// account can have.
    Invalid,
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Digit run of a user mention (`<@123>` or the legacy nickname form
/// `<@!123>`).
fn mention_digits(token: &str) -> Option<&str> {
    let inner = token.strip_prefix("<@")?.strip_suffix('>')?;
    let inner = inner.strip_prefix('!').unwrap_or(inner);
    is_digits(inner).then_some(inner)
}

#[must_use]
pub fn parse_target(token: &str) -> TargetQuery<'_> {
    let digits = mention_digits(token).or_else(|| is_digits(token).then_some(token));

    match digits {
        Some(digits) => digits
            .parse::<UserId>()
            .ok()
            .filter(|id| id.get() != 0)
            .map_or(TargetQuery::Invalid, TargetQuery::Id),
        None => TargetQuery::Name(token),
    }
}

/// Resolve `token` to a member of `guild_id`.
///
/// Id lookups that fail for any reason count as not found. The name
/// fallback fetches the whole member list; a failure there is returned.
pub async fn resolve_member(
    platform: &dyn VoicePlatform,
    guild_id: GuildId,
    token: &str,
) -> Result<Option<MemberInfo>> {
    match parse_target(token) {
        TargetQuery::Id(user_id) => match platform.fetch_member(guild_id, user_id).await {
            Ok(member) => Ok(Some(member)),
            Err(e) => {
                debug!(%guild_id, %user_id, error = %e, "member lookup by id failed");
                Ok(None)
            },
        },
        TargetQuery::Name(name) => {
            let members = platform.fetch_members(guild_id).await?;
            Ok(members.into_iter().find(|m| m.answers_to(name)))
        },
        TargetQuery::Invalid => Ok(None),
    }
}
