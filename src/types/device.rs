use std::fmt;

use serde::{Deserialize, Serialize};

/// Android device identity registered with the store.
///
/// Its string form, the lowercase hexadecimal Android ID, is what the store
/// expects in `X-DFE-Device-ID`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Device {
    pub android_id: u64,
}

impl Device {
    pub fn new(android_id: u64) -> Self {
        Self { android_id }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self.android_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_identifier() {
        assert_eq!(Device::new(0x3a5c_0f1e_9b2d_4c77).to_string(), "3a5c0f1e9b2d4c77");
        assert_eq!(Device::new(255).to_string(), "ff");
    }
}
