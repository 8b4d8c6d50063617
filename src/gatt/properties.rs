use crate::error::ErrorType;
use bitflags::bitflags;
use once_cell::sync::Lazy;
use std::{collections::HashMap, fmt};

bitflags! {
    /// Characteristic capabilities as advertised by BlueZ in the `Flags` property.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[repr(transparent)]
    pub struct CharacteristicFlags: u16 {
        const BROADCAST = 0x01;
        const READ = 0x02;
        const WRITE_WITHOUT_RESPONSE = 0x04;
        const WRITE = 0x08;
        const NOTIFY = 0x10;
        const INDICATE = 0x20;
        const AUTHENTICATED_SIGNED_WRITES = 0x40;
        const RELIABLE_WRITE = 0x80;
        const WRITABLE_AUXILIARIES = 0x100;
        const ENCRYPT_READ = 0x200;
        const ENCRYPT_WRITE = 0x400;
        const ENCRYPT_AUTHENTICATED_READ = 0x800;
        const ENCRYPT_AUTHENTICATED_WRITE = 0x1000;
        /// Server only.
        const SECURE_READ = 0x2000;
        /// Server only.
        const SECURE_WRITE = 0x4000;
    }
}

const FLAG_TOKENS: [(&str, CharacteristicFlags); 15] = [
    ("broadcast", CharacteristicFlags::BROADCAST),
    ("read", CharacteristicFlags::READ),
    ("write-without-response", CharacteristicFlags::WRITE_WITHOUT_RESPONSE),
    ("write", CharacteristicFlags::WRITE),
    ("notify", CharacteristicFlags::NOTIFY),
    ("indicate", CharacteristicFlags::INDICATE),
    ("authenticated-signed-writes", CharacteristicFlags::AUTHENTICATED_SIGNED_WRITES),
    ("reliable-write", CharacteristicFlags::RELIABLE_WRITE),
    ("writable-auxiliaries", CharacteristicFlags::WRITABLE_AUXILIARIES),
    ("encrypt-read", CharacteristicFlags::ENCRYPT_READ),
    ("encrypt-write", CharacteristicFlags::ENCRYPT_WRITE),
    ("encrypt-authenticated-read", CharacteristicFlags::ENCRYPT_AUTHENTICATED_READ),
    ("encrypt-authenticated-write", CharacteristicFlags::ENCRYPT_AUTHENTICATED_WRITE),
    ("secure-read", CharacteristicFlags::SECURE_READ),
    ("secure-write", CharacteristicFlags::SECURE_WRITE),
];

static TOKEN_MAP: Lazy<HashMap<&'static str, CharacteristicFlags>> =
    Lazy::new(|| FLAG_TOKENS.iter().copied().collect());

/// Maps BlueZ capability tokens onto a flag set.
///
/// Each recognized token sets exactly one bit. Unknown tokens are logged and
/// skipped, so the result depends only on the set of recognized tokens and
/// not on their order or repetition.
pub fn parse_property_flags<I, S>(tokens: I) -> CharacteristicFlags
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut flags = CharacteristicFlags::empty();
    for token in tokens {
        let token = token.as_ref();
        match TOKEN_MAP.get(token) {
            Some(flag) => flags |= *flag,
            None => log::warn!(
                "{}: ignoring {:?}",
                ErrorType::UnrecognizedCapabilityToken,
                token
            ),
        }
    }
    flags
}

impl CharacteristicFlags {
    /// BlueZ tokens for the set bits, in bit order.
    pub fn tokens(&self) -> Vec<&'static str> {
        FLAG_TOKENS
            .iter()
            .filter(|(_, flag)| self.contains(*flag))
            .map(|(token, _)| *token)
            .collect()
    }

    pub fn can_read(&self) -> bool {
        self.intersects(Self::READ | Self::ENCRYPT_READ | Self::ENCRYPT_AUTHENTICATED_READ)
    }

    pub fn can_write(&self) -> bool {
        self.intersects(
            Self::WRITE
                | Self::WRITE_WITHOUT_RESPONSE
                | Self::AUTHENTICATED_SIGNED_WRITES
                | Self::RELIABLE_WRITE
                | Self::ENCRYPT_WRITE
                | Self::ENCRYPT_AUTHENTICATED_WRITE,
        )
    }

    pub fn can_subscribe(&self) -> bool {
        self.intersects(Self::NOTIFY | Self::INDICATE)
    }
}

impl fmt::Display for CharacteristicFlags {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "unknown");
        }
        write!(f, "{}", self.tokens().join("|"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_token_sets_its_own_bit() {
        for (token, flag) in FLAG_TOKENS {
            assert_eq!(parse_property_flags([token]), flag, "token {token}");
        }
        let all = parse_property_flags(FLAG_TOKENS.iter().map(|(t, _)| *t));
        assert_eq!(all, CharacteristicFlags::all());
    }

    #[test]
    fn order_and_repetition_do_not_matter() {
        let expected = CharacteristicFlags::READ
            | CharacteristicFlags::NOTIFY
            | CharacteristicFlags::ENCRYPT_WRITE;
        let permutations: [&[&str]; 4] = [
            &["read", "notify", "encrypt-write"],
            &["encrypt-write", "read", "notify"],
            &["notify", "notify", "encrypt-write", "read", "read"],
            &["read", "encrypt-write", "notify", "encrypt-write"],
        ];
        for tokens in permutations {
            assert_eq!(parse_property_flags(tokens), expected, "{tokens:?}");
        }
    }

    #[test]
    fn unknown_token_does_not_abort_parsing() {
        let flags = parse_property_flags(["read", "foobar", "write", "indicate"]);
        assert_eq!(
            flags,
            CharacteristicFlags::READ | CharacteristicFlags::WRITE | CharacteristicFlags::INDICATE
        );
    }

    #[test]
    fn tokens_are_case_sensitive() {
        assert!(parse_property_flags(["READ", "Notify"]).is_empty());
    }

    #[test]
    fn empty_list_is_unknown() {
        let flags = parse_property_flags(Vec::<String>::new());
        assert!(flags.is_empty());
        assert_eq!(flags.to_string(), "unknown");
    }

    #[test]
    fn display_lists_tokens_in_bit_order() {
        let flags = parse_property_flags(["notify", "read"]);
        assert_eq!(flags.to_string(), "read|notify");
        assert_eq!(parse_property_flags(flags.tokens()), flags);
    }

    #[test]
    fn capability_helpers() {
        let flags = parse_property_flags(["write-without-response", "indicate"]);
        assert!(!flags.can_read());
        assert!(flags.can_write());
        assert!(flags.can_subscribe());
    }
}
