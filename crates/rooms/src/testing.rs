//! Recording [`VoicePlatform`] for unit tests.

use std::{
    collections::HashSet,
    sync::{
        Mutex,
        atomic::{AtomicU64, AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;

use tempvoice_common::{ChannelId, GuildId, UserId};

use crate::{
    error::{Error, Result},
    platform::{MemberInfo, MessageRef, NewVoiceChannel, VoiceChannelInfo, VoicePlatform},
};

/// A side-effecting platform request, recorded whether or not it succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Create {
        guild_id: GuildId,
        name: String,
        parent_id: Option<ChannelId>,
        owner: UserId,
    },
    Delete {
        channel_id: ChannelId,
        reason: String,
    },
    Move {
        user_id: UserId,
        channel_id: ChannelId,
    },
    Disconnect {
        user_id: UserId,
        reason: String,
    },
    Notify {
        user_id: UserId,
        text: String,
    },
    Grant {
        channel_id: ChannelId,
        user_id: UserId,
    },
    Revoke {
        channel_id: ChannelId,
        user_id: UserId,
    },
    Rename {
        channel_id: ChannelId,
        name: String,
    },
    Reply {
        text: String,
    },
}

/// Operations that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Create,
    Delete,
    Move,
    Disconnect,
    Grant,
    Revoke,
    Rename,
    FetchMembers,
    Reply,
}

pub struct MockPlatform {
    calls: Mutex<Vec<Call>>,
    members: Mutex<Vec<MemberInfo>>,
    failing: Mutex<HashSet<Op>>,
    next_channel_id: AtomicU64,
    member_list_fetches: AtomicUsize,
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            members: Mutex::new(Vec::new()),
            failing: Mutex::new(HashSet::new()),
            next_channel_id: AtomicU64::new(1000),
            member_list_fetches: AtomicUsize::new(0),
        }
    }
}

impl MockPlatform {
    pub fn with_members(members: impl IntoIterator<Item = MemberInfo>) -> Self {
        let platform = Self::default();
        platform.members.lock().unwrap().extend(members);
        platform
    }

    pub fn fail_on(&self, op: Op) {
        self.failing.lock().unwrap().insert(op);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn replies(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Reply { text } => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn last_reply(&self) -> Option<String> {
        self.replies().pop()
    }

    pub fn member_list_fetches(&self) -> usize {
        self.member_list_fetches.load(Ordering::SeqCst)
    }

    /// Current voice channel of a mock member.
    pub fn voice_of(&self, user_id: UserId) -> Option<ChannelId> {
        self.members
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.id == user_id)
            .and_then(|m| m.voice_channel)
    }

    pub fn set_voice(&self, user_id: UserId, channel: Option<ChannelId>) {
        if let Some(m) = self
            .members
            .lock()
            .unwrap()
            .iter_mut()
            .find(|m| m.id == user_id)
        {
            m.voice_channel = channel;
        }
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, op: Op) -> Result<()> {
        if self.failing.lock().unwrap().contains(&op) {
            return Err(Error::message(format!("mock {op:?} failure")));
        }
        Ok(())
    }
}

pub fn member(id: u64, name: &str, voice: Option<u64>) -> MemberInfo {
    MemberInfo {
        id: UserId(id),
        username: name.to_lowercase(),
        display_name: name.to_string(),
        voice_channel: voice.map(ChannelId),
    }
}

#[async_trait]
impl VoicePlatform for MockPlatform {
    async fn create_voice_channel(
        &self,
        guild_id: GuildId,
        request: NewVoiceChannel,
    ) -> Result<VoiceChannelInfo> {
        self.record(Call::Create {
            guild_id,
            name: request.name.clone(),
            parent_id: request.parent_id,
            owner: request.owner,
        });
        self.check(Op::Create)?;
        Ok(VoiceChannelInfo {
            id: ChannelId(self.next_channel_id.fetch_add(1, Ordering::SeqCst)),
            name: request.name,
            parent_id: request.parent_id,
        })
    }

    async fn delete_channel(&self, channel_id: ChannelId, reason: &str) -> Result<()> {
        self.record(Call::Delete {
            channel_id,
            reason: reason.into(),
        });
        self.check(Op::Delete)
    }

    async fn move_member(
        &self,
        _guild_id: GuildId,
        user_id: UserId,
        channel_id: ChannelId,
    ) -> Result<()> {
        self.record(Call::Move {
            user_id,
            channel_id,
        });
        self.check(Op::Move)?;
        self.set_voice(user_id, Some(channel_id));
        Ok(())
    }

    async fn disconnect_member(
        &self,
        _guild_id: GuildId,
        user_id: UserId,
        reason: &str,
    ) -> Result<()> {
        self.record(Call::Disconnect {
            user_id,
            reason: reason.into(),
        });
        self.check(Op::Disconnect)?;
        self.set_voice(user_id, None);
        Ok(())
    }

    async fn notify(&self, user_id: UserId, text: &str) {
        self.record(Call::Notify {
            user_id,
            text: text.into(),
        });
    }

    async fn grant_owner_permissions(&self, channel_id: ChannelId, user_id: UserId) -> Result<()> {
        self.record(Call::Grant {
            channel_id,
            user_id,
        });
        self.check(Op::Grant)
    }

    async fn revoke_owner_permissions(
        &self,
        channel_id: ChannelId,
        user_id: UserId,
    ) -> Result<()> {
        self.record(Call::Revoke {
            channel_id,
            user_id,
        });
        self.check(Op::Revoke)
    }

    async fn rename_channel(&self, channel_id: ChannelId, name: &str) -> Result<()> {
        self.record(Call::Rename {
            channel_id,
            name: name.into(),
        });
        self.check(Op::Rename)
    }

    async fn fetch_member(&self, _guild_id: GuildId, user_id: UserId) -> Result<MemberInfo> {
        self.members
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.id == user_id)
            .cloned()
            .ok_or_else(|| Error::message(format!("unknown member {user_id}")))
    }

    async fn fetch_members(&self, _guild_id: GuildId) -> Result<Vec<MemberInfo>> {
        self.member_list_fetches.fetch_add(1, Ordering::SeqCst);
        self.check(Op::FetchMembers)?;
        Ok(self.members.lock().unwrap().clone())
    }

    async fn reply(&self, _to: MessageRef, text: &str) -> Result<()> {
        self.record(Call::Reply { text: text.into() });
        self.check(Op::Reply)
    }
}
