//! Admission checks for members arriving in a room.

use tracing::{debug, info};

use tempvoice_common::{ChannelId, GuildId, UserId};

#[cfg(feature = "metrics")]
use tempvoice_metrics::{access as access_metrics, counter, labels};

use crate::{
    error::Result,
    messages,
    platform::{MemberInfo, VoicePlatform},
    registry::TempChannelRecord,
    service::RoomService,
};

/// Outcome of checking a member against a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Admit,
    Deny(DenyReason),
}

/// Why a member is bounced out of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// The room is locked and the member is neither owner nor permitted.
    Locked,
    /// The owner rejected this member.
    Rejected,
}

impl DenyReason {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Locked => "locked",
            Self::Rejected => "rejected",
        }
    }

    /// Audit-log reason attached to the disconnect.
    #[must_use]
    pub fn audit_reason(self) -> &'static str {
        match self {
            Self::Locked => "Channel is locked",
            Self::Rejected => "You have been rejected from this channel",
        }
    }

    /// Direct message sent to the bounced member.
    #[must_use]
    pub fn notice(self) -> &'static str {
        match self {
            Self::Locked => messages::LOCKED_NOTICE,
            Self::Rejected => messages::REJECTED_NOTICE,
        }
    }
}

impl std::fmt::Display for DenyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decide whether `user_id` may stay in the room described by `record`.
///
/// The lock is checked first: a locked room admits only its owner and
/// permitted members. Rejection applies whether or not the room is locked.
#[must_use]
pub fn evaluate(record: &TempChannelRecord, user_id: UserId) -> Admission {
    if record.locked && !record.is_owner(user_id) && !record.permitted_users.contains(&user_id) {
        return Admission::Deny(DenyReason::Locked);
    }
    if record.rejected_users.contains(&user_id) {
        return Admission::Deny(DenyReason::Rejected);
    }
    Admission::Admit
}

impl RoomService {
    /// Evaluate a member who just arrived in a room and disconnect them if
    /// denied. The notice is best-effort; a failed disconnect is returned.
    pub(crate) async fn enforce_access(
        &self,
        platform: &dyn VoicePlatform,
        guild_id: GuildId,
        member: &MemberInfo,
        channel_id: ChannelId,
        record: &TempChannelRecord,
    ) -> Result<Admission> {
        let admission = evaluate(record, member.id);
        let Admission::Deny(reason) = admission else {
            debug!(%channel_id, user_id = %member.id, "member admitted to room");
            return Ok(admission);
        };

        platform
            .disconnect_member(guild_id, member.id, reason.audit_reason())
            .await?;
        platform.notify(member.id, reason.notice()).await;

        #[cfg(feature = "metrics")]
        counter!(access_metrics::DENIALS_TOTAL, labels::REASON => reason.as_str()).increment(1);

        info!(
            %channel_id,
            user_id = %member.id,
            %reason,
            "member denied entry to room"
        );
        Ok(admission)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use {super::*, crate::testing::*, std::sync::Arc};

    const OWNER: UserId = UserId(1);
    const GUEST: UserId = UserId(2);

    fn record() -> TempChannelRecord {
        TempChannelRecord::new(GuildId(9), OWNER)
    }

    #[test]
    fn unlocked_room_admits_anyone() {
        assert_eq!(evaluate(&record(), GUEST), Admission::Admit);
    }

    #[test]
    fn locked_room_denies_strangers() {
        let mut r = record();
        r.locked = true;
        assert_eq!(evaluate(&r, GUEST), Admission::Deny(DenyReason::Locked));
        assert_eq!(evaluate(&r, OWNER), Admission::Admit);
    }

    #[test]
    fn locked_room_admits_permitted() {
        let mut r = record();
        r.locked = true;
        r.permit(GUEST);
        assert_eq!(evaluate(&r, GUEST), Admission::Admit);
    }

    #[test]
    fn rejection_applies_when_unlocked() {
        let mut r = record();
        r.reject(GUEST);
        assert_eq!(evaluate(&r, GUEST), Admission::Deny(DenyReason::Rejected));
    }

    #[test]
    fn lock_is_reported_before_rejection() {
        let mut r = record();
        r.reject(GUEST);
        r.locked = true;
        assert_eq!(evaluate(&r, GUEST), Admission::Deny(DenyReason::Locked));
    }

    #[tokio::test]
    async fn denied_member_is_disconnected_and_notified() {
        let platform = MockPlatform::default();
        let service = RoomService::new(Default::default(), Arc::default());
        let mut r = record();
        r.locked = true;

        let guest = member(GUEST.get(), "guest", Some(50));
        let outcome = service
            .enforce_access(&platform, GuildId(9), &guest, ChannelId(50), &r)
            .await
            .unwrap();

        assert_eq!(outcome, Admission::Deny(DenyReason::Locked));
        assert_eq!(platform.calls(), vec![
            Call::Disconnect {
                user_id: GUEST,
                reason: "Channel is locked".into(),
            },
            Call::Notify {
                user_id: GUEST,
                text: messages::LOCKED_NOTICE.into(),
            },
        ]);
    }

    #[tokio::test]
    async fn failed_disconnect_skips_notice() {
        let platform = MockPlatform::default();
        platform.fail_on(Op::Disconnect);
        let service = RoomService::new(Default::default(), Arc::default());
        let mut r = record();
        r.reject(GUEST);

        let guest = member(GUEST.get(), "guest", Some(50));
        let result = service
            .enforce_access(&platform, GuildId(9), &guest, ChannelId(50), &r)
            .await;

        assert!(result.is_err());
        assert_eq!(platform.calls(), vec![Call::Disconnect {
            user_id: GUEST,
            reason: "You have been rejected from this channel".into(),
        }]);
    }

    #[tokio::test]
    async fn admitted_member_triggers_no_calls() {
        let platform = MockPlatform::default();
        let service = RoomService::new(Default::default(), Arc::default());
        let owner = member(OWNER.get(), "owner", Some(50));
        let outcome = service
            .enforce_access(&platform, GuildId(9), &owner, ChannelId(50), &record())
            .await
            .unwrap();
        assert_eq!(outcome, Admission::Admit);
        assert!(platform.calls().is_empty());
    }
}
