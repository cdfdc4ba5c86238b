use std::{
    collections::{HashMap, HashSet},
    sync::{Mutex, MutexGuard, PoisonError},
    time::Instant,
};

use tempvoice_common::{ChannelId, GuildId, UserId};

#[cfg(feature = "metrics")]
use tempvoice_metrics::{gauge, rooms as room_metrics};

/// Ownership and access state of one live room.
#[derive(Debug, Clone)]
pub struct TempChannelRecord {
    pub guild_id: GuildId,
    pub owner_id: UserId,
    pub locked: bool,
    /// Barred from joining regardless of the lock.
    pub rejected_users: HashSet<UserId>,
    /// Allowed in while the room is locked.
    pub permitted_users: HashSet<UserId>,
    pub created_at: Instant,
}

impl TempChannelRecord {
    #[must_use]
    pub fn new(guild_id: GuildId, owner_id: UserId) -> Self {
        Self {
            guild_id,
            owner_id,
            locked: false,
            rejected_users: HashSet::new(),
            permitted_users: HashSet::new(),
            created_at: Instant::now(),
        }
    }

    #[must_use]
    pub fn is_owner(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }

    /// Bar `user_id`. Drops any earlier permit.
    pub fn reject(&mut self, user_id: UserId) {
        self.permitted_users.remove(&user_id);
        self.rejected_users.insert(user_id);
    }

    /// Let `user_id` in while locked. Lifts any earlier rejection.
    pub fn permit(&mut self, user_id: UserId) {
        self.rejected_users.remove(&user_id);
        self.permitted_users.insert(user_id);
    }

    /// Flip the lock and return the new state.
    pub fn toggle_lock(&mut self) -> bool {
        self.locked = !self.locked;
        self.locked
    }
}

/// Live rooms keyed by channel.
///
/// The lock is only ever held inside synchronous sections; callers get
/// snapshots or pass a closure to [`ChannelRegistry::update`].
#[derive(Debug, Default)]
pub struct ChannelRegistry {
    channels: Mutex<HashMap<ChannelId, TempChannelRecord>>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<ChannelId, TempChannelRecord>> {
        // No invariant spans more than one map operation, so a poisoned map is
        // still consistent.
        self.channels.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn insert(&self, channel_id: ChannelId, record: TempChannelRecord) {
        let mut channels = self.lock();
        channels.insert(channel_id, record);
        #[cfg(feature = "metrics")]
        gauge!(room_metrics::TRACKED).set(channels.len() as f64);
    }

    pub fn remove(&self, channel_id: ChannelId) -> Option<TempChannelRecord> {
        let mut channels = self.lock();
        let removed = channels.remove(&channel_id);
        #[cfg(feature = "metrics")]
        gauge!(room_metrics::TRACKED).set(channels.len() as f64);
        removed
    }

    #[must_use]
    pub fn contains(&self, channel_id: ChannelId) -> bool {
        self.lock().contains_key(&channel_id)
    }

    /// Snapshot of a record.
    #[must_use]
    pub fn get(&self, channel_id: ChannelId) -> Option<TempChannelRecord> {
        self.lock().get(&channel_id).cloned()
    }

    /// Mutate a record in place. Returns `None` if the room is not tracked.
    pub fn update<R>(
        &self,
        channel_id: ChannelId,
        f: impl FnOnce(&mut TempChannelRecord) -> R,
    ) -> Option<R> {
        self.lock().get_mut(&channel_id).map(f)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    #[must_use]
    pub fn channel_ids(&self) -> Vec<ChannelId> {
        self.lock().keys().copied().collect()
    }
}
