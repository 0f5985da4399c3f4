//! # Sandbox Primitives
//!
//! Hardcoded runtime constants for the NetworkSV core.
//!
//! The configuration layer may override the delay and placement values; the
//! sentinel identity is fixed.

/// Id of the always-present Internet node.
pub const SENTINEL_ID: &str = "Internet-0";

/// Label shown on the sentinel node.
pub const SENTINEL_LABEL: &str = "Internet";

/// Default sentinel position on the canvas.
pub const SENTINEL_X: i32 = 400;

/// Default sentinel position on the canvas.
pub const SENTINEL_Y: i32 = 50;

/// Sequence number of the first placed device of each type.
///
/// The sentinel is the only node numbered 0.
pub const FIRST_SEQUENCE: u64 = 1;

/// How long a clicked node shows its description, in milliseconds.
pub const REVEAL_DELAY_MS: u64 = 3000;

/// Width of the area new devices are scattered over.
pub const PLACEMENT_WIDTH: i32 = 400;

/// Height of the area new devices are scattered over.
pub const PLACEMENT_HEIGHT: i32 = 400;

/// Separator inside label table keys (`"Router-Modem"`).
pub const LABEL_KEY_SEPARATOR: char = '-';

/// Arrow used by fallback link labels (`"PC → Tablet"`).
pub const FALLBACK_ARROW: &str = "→";

/// Maximum number of steps in a single gesture script.
pub const MAX_SCRIPT_STEPS: usize = 10_000;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NodeId;

    #[test]
    fn sentinel_id_encodes_internet() {
        let id = NodeId::new(SENTINEL_ID);
        assert_eq!(id.type_prefix(), SENTINEL_LABEL);
    }

    #[test]
    fn sentinel_sits_outside_the_first_sequence() {
        assert!(FIRST_SEQUENCE > 0);
        assert!(SENTINEL_ID.ends_with("-0"));
    }
}
