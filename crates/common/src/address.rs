//! Chat-network address helpers.
//!
//! Destination ids arrive bare (`"628111"`, `"1234-56789"`); the network
//! wants them fully qualified. Group ids carry a hyphen-delimited marker.

/// Domain suffix for direct (one-to-one) chats.
pub const DIRECT_SUFFIX: &str = "@s.whatsapp.net";

/// Domain suffix for group chats.
pub const GROUP_SUFFIX: &str = "@g.us";

/// Legacy direct-chat suffix still seen on inbound traffic.
pub const LEGACY_SUFFIX: &str = "@c.us";

/// Qualify a bare destination id with the right domain suffix.
pub fn resolve_destination(id: &str) -> String {
    if id.contains('-') {
        format!("{id}{GROUP_SUFFIX}")
    } else {
        format!("{id}{DIRECT_SUFFIX}")
    }
}

/// Strip any known domain suffix from an inbound address.
pub fn clear_address(id: &str) -> String {
    for suffix in [DIRECT_SUFFIX, GROUP_SUFFIX, LEGACY_SUFFIX] {
        if let Some(bare) = id.strip_suffix(suffix) {
            return bare.to_string();
        }
    }
    id.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hyphenated_id_resolves_to_group_suffix() {
        assert_eq!(resolve_destination("1234-56789"), "1234-56789@g.us");
    }

    #[test]
    fn plain_id_resolves_to_direct_suffix() {
        assert_eq!(resolve_destination("628333"), "628333@s.whatsapp.net");
    }

    #[test]
    fn clear_address_strips_known_suffixes() {
        assert_eq!(clear_address("628111@s.whatsapp.net"), "628111");
        assert_eq!(clear_address("1234-56789@g.us"), "1234-56789");
        assert_eq!(clear_address("628111@c.us"), "628111");
        assert_eq!(clear_address("628111"), "628111");
    }
}
