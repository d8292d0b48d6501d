//! Session key-exchange key (XNKEY)

use serde::{Deserialize, Serialize};

use crate::ids::RandomSource;

pub const EXCHANGE_KEY_SIZE: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ExchangeKey([u8; EXCHANGE_KEY_SIZE]);

impl ExchangeKey {
    pub const fn new(bytes: [u8; EXCHANGE_KEY_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn generate(source: &dyn RandomSource) -> Self {
        let mut bytes = [0u8; EXCHANGE_KEY_SIZE];
        bytes[..8].copy_from_slice(&source.next_u64().to_be_bytes());
        bytes[8..].copy_from_slice(&source.next_u64().to_be_bytes());
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; EXCHANGE_KEY_SIZE] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::MockRandomSource;

    #[test]
    fn generate_fills_both_halves() {
        let mut source = MockRandomSource::new();
        let mut seq = mockall::Sequence::new();
        source
            .expect_next_u64()
            .times(1)
            .in_sequence(&mut seq)
            .return_const(0x0102_0304_0506_0708u64);
        source
            .expect_next_u64()
            .times(1)
            .in_sequence(&mut seq)
            .return_const(0x090A_0B0C_0D0E_0F10u64);

        let key = ExchangeKey::generate(&source);
        assert_eq!(
            key.as_bytes(),
            &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16]
        );
    }
}
