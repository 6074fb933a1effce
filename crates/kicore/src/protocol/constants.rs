//! Protocol constants

/// Bit offset of the channel byte inside the wire flags
pub const CHANNEL_SHIFT: u32 = 8;

/// Mask selecting the channel byte inside the wire flags
pub const CHANNEL_MASK: u32 = 0xFF << CHANNEL_SHIFT;

/// Mask selecting the boolean facets inside the wire flags
pub const FACET_MASK: u32 = 0xFF;

/// Default channel stamped on outgoing chat
pub const DEFAULT_CHANNEL: u8 = 0;

/// Opening delimiter of an origin tag (`<<Area>>`)
pub const ORIGIN_TAG_OPEN: &str = "<<";

/// Closing delimiter of an origin tag (`<<Area>>`)
pub const ORIGIN_TAG_CLOSE: &str = ">>";

/// Marker that introduces a chat command
pub const COMMAND_MARKER: char = '/';

/// Default size of the sent-message recall ring
pub const DEFAULT_HISTORY_CAPACITY: usize = 20;

/// Default size of the recently-contacted players ring
pub const DEFAULT_RECENTS_CAPACITY: usize = 15;

/// Default number of full-visibility ticks before fading starts
pub const DEFAULT_FULL_TICKS: u32 = 30;

/// Default number of ticks a fade takes
pub const DEFAULT_FADE_TICKS: u32 = 10;

/// Default length of a full-visibility tick in milliseconds
pub const DEFAULT_FULL_TICK_MS: u64 = 1000;

/// Default length of a fade tick in milliseconds
pub const DEFAULT_FADE_TICK_MS: u64 = 100;
