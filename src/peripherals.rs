use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::constants::KEY_COUNT;

/// # Keypad
/// The 16 keys 0..F of the Chip-8 hexadecimal keypad.
///
/// Only the embedder's input layer writes to it; operations just read it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Keypad {
    keys: [bool; KEY_COUNT],
}

impl Keypad {
    pub fn new() -> Self {
        Keypad {
            keys: [false; KEY_COUNT],
        }
    }

    /// Sets the pressed status of key; keys above 0xF don't exist and are ignored
    pub fn set(&mut self, key: u8, pressed: bool) {
        if let Some(slot) = self.keys.get_mut(key as usize) {
            *slot = pressed;
        }
    }

    /// Whether a key is down. Only the low nibble is significant.
    pub fn is_pressed(&self, key: u8) -> bool {
        self.keys[(key & 0xF) as usize]
    }

    pub fn keys(&self) -> &[bool; KEY_COUNT] {
        &self.keys
    }
}

/// Everything an operation may consult besides the machine state
pub struct Peripherals {
    pub keypad: Keypad,
    rng: StdRng,
}

impl Peripherals {
    /// # Arguments
    /// * `seed` fixes the random sequence seen by `CXNN`; entropy is used when absent
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Peripherals {
            keypad: Keypad::new(),
            rng,
        }
    }

    pub fn random_byte(&mut self) -> u8 {
        self.rng.gen()
    }
}
