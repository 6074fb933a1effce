//! Chat message flags
//!
//! A chat line travels with a 32-bit flags word: eight boolean facets in the
//! low byte and the channel number in the next byte. Everything above is
//! dropped on decode.

use super::constants::{CHANNEL_MASK, CHANNEL_SHIFT, FACET_MASK};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

bitflags::bitflags! {
    /// Boolean facets carried in the low byte of the wire flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FacetBits: u8 {
        const PRIVATE = 1 << 0;
        const ADMIN = 1 << 1;
        const CCR_BROADCAST = 1 << 2;
        const INTER_AGE = 1 << 3;
        const STATUS = 1 << 4;
        const NEIGHBORS = 1 << 5;
        const AUDIO_SUBTITLE = 1 << 6;
        const LOC_KEY = 1 << 7;
    }
}

/// Semantic flags of one chat line
///
/// `broadcast` is not stored: it is always the negation of `private`, so the
/// two can never disagree. `to_self` marks the local echo of an outgoing line
/// and never leaves the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ChatFlags {
    facets: FacetBits,
    channel: u8,
    to_self: bool,
}

impl ChatFlags {
    /// Plain broadcast on the default channel
    pub const fn broadcast() -> Self {
        Self {
            facets: FacetBits::empty(),
            channel: 0,
            to_self: false,
        }
    }

    /// Private line on the default channel
    pub const fn private() -> Self {
        Self {
            facets: FacetBits::PRIVATE,
            channel: 0,
            to_self: false,
        }
    }

    /// Local-only informational line
    pub const fn status() -> Self {
        Self {
            facets: FacetBits::STATUS,
            channel: 0,
            to_self: false,
        }
    }

    /// Decode flags received from the wire
    pub fn decode(wire: u32) -> Self {
        Self {
            facets: FacetBits::from_bits_truncate((wire & FACET_MASK) as u8),
            channel: ((wire & CHANNEL_MASK) >> CHANNEL_SHIFT) as u8,
            to_self: false,
        }
    }

    /// Encode flags for the wire
    pub fn encode(&self) -> u32 {
        u32::from(self.facets.bits()) | (u32::from(self.channel) << CHANNEL_SHIFT)
    }

    /// Raw facet bits
    #[inline]
    pub fn facets(&self) -> FacetBits {
        self.facets
    }

    fn with_facet(mut self, facet: FacetBits, on: bool) -> Self {
        self.facets.set(facet, on);
        self
    }

    pub fn is_private(&self) -> bool {
        self.facets.contains(FacetBits::PRIVATE)
    }

    pub fn is_broadcast(&self) -> bool {
        !self.is_private()
    }

    pub fn is_admin(&self) -> bool {
        self.facets.contains(FacetBits::ADMIN)
    }

    pub fn is_ccr_broadcast(&self) -> bool {
        self.facets.contains(FacetBits::CCR_BROADCAST)
    }

    pub fn is_inter_age(&self) -> bool {
        self.facets.contains(FacetBits::INTER_AGE)
    }

    pub fn is_status(&self) -> bool {
        self.facets.contains(FacetBits::STATUS)
    }

    pub fn is_neighbors(&self) -> bool {
        self.facets.contains(FacetBits::NEIGHBORS)
    }

    pub fn is_audio_subtitle(&self) -> bool {
        self.facets.contains(FacetBits::AUDIO_SUBTITLE)
    }

    pub fn is_loc_key(&self) -> bool {
        self.facets.contains(FacetBits::LOC_KEY)
    }

    pub fn is_to_self(&self) -> bool {
        self.to_self
    }

    #[inline]
    pub fn channel(&self) -> u8 {
        self.channel
    }

    pub fn with_private(self, on: bool) -> Self {
        self.with_facet(FacetBits::PRIVATE, on)
    }

    /// Setting broadcast clears private, and clearing it sets private
    pub fn with_broadcast(self, on: bool) -> Self {
        self.with_facet(FacetBits::PRIVATE, !on)
    }

    pub fn with_admin(self, on: bool) -> Self {
        self.with_facet(FacetBits::ADMIN, on)
    }

    pub fn with_ccr_broadcast(self, on: bool) -> Self {
        self.with_facet(FacetBits::CCR_BROADCAST, on)
    }

    pub fn with_inter_age(self, on: bool) -> Self {
        self.with_facet(FacetBits::INTER_AGE, on)
    }

    pub fn with_status(self, on: bool) -> Self {
        self.with_facet(FacetBits::STATUS, on)
    }

    pub fn with_neighbors(self, on: bool) -> Self {
        self.with_facet(FacetBits::NEIGHBORS, on)
    }

    pub fn with_audio_subtitle(self, on: bool) -> Self {
        self.with_facet(FacetBits::AUDIO_SUBTITLE, on)
    }

    pub fn with_loc_key(self, on: bool) -> Self {
        self.with_facet(FacetBits::LOC_KEY, on)
    }

    pub fn with_channel(mut self, channel: u8) -> Self {
        self.channel = channel;
        self
    }

    pub fn with_to_self(mut self, on: bool) -> Self {
        self.to_self = on;
        self
    }
}

impl From<u32> for ChatFlags {
    fn from(wire: u32) -> Self {
        Self::decode(wire)
    }
}

impl From<ChatFlags> for u32 {
    fn from(flags: ChatFlags) -> Self {
        flags.encode()
    }
}

// Serialized as the wire integer
impl Serialize for ChatFlags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u32(self.encode())
    }
}

impl<'de> Deserialize<'de> for ChatFlags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let wire = u32::deserialize(deserializer)?;
        Ok(ChatFlags::decode(wire))
    }
}
