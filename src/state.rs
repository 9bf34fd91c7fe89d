use crate::constants::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, KEY_COUNT, MEMORY_SIZE, PROGRAM_START, SPRITE_SHEET,
    SPRITE_SHEET_START, STACK_SIZE,
};

/// The FrameBuffer is indexed as [y][x]; every cell is either 0 or 1
pub type FrameBuffer = [[u8; DISPLAY_WIDTH]; DISPLAY_HEIGHT];

/// A snapshot of the Chip8 internal state
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) is the carry, borrow and collision flag
/// - (i) a 16-bit memory address register
///
/// Counter
/// - (pc) a 16-bit program counter
///
/// Pointer
/// - (sp) the number of return addresses on the stack, 0..=16
///
/// Timers
/// - 2 8-bit timers (delay & sound), decremented at 60Hz by whoever drives the machine
///
/// ## Memory
/// - 16 entry stack of return addresses
/// - 4096 bytes of addressable memory
///     - 0x050..0x0A0 holds the hexadecimal sprite sheet
///     - 0x200.. is where ROMs are loaded
/// - 32x64 byte frame buffer
///     - stores the contents of the next frame to be drawn
///     - `draw_flag` is raised whenever it changes and only lowered by the renderer
///     - `frame_written` records whether anything has cleared or drawn to it since reset
///
/// ## Input
/// - `key_wait` is set while an `FX0A` is blocking on a keypress
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct State {
    pub v: [u8; 16],
    pub i: u16,
    pub pc: u16,
    pub sp: u8,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub stack: [u16; STACK_SIZE],
    pub memory: [u8; MEMORY_SIZE],
    pub frame_buffer: FrameBuffer,
    pub draw_flag: bool,
    pub frame_written: bool,
    pub key_wait: Option<KeyWait>,
}

/// Bookkeeping for a pending `FX0A`.
///
/// `held` is the set of keys that were already down when the wait began and haven't been
/// released since; only a key outside of it can end the wait. `latched` remembers a fresh
/// press that may have been released again before the next step.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct KeyWait {
    pub held: [bool; KEY_COUNT],
    pub latched: Option<u8>,
}

impl State {
    pub fn new() -> Self {
        let mut memory = [0; MEMORY_SIZE];
        let sheet = SPRITE_SHEET_START as usize;
        memory[sheet..sheet + SPRITE_SHEET.len()].copy_from_slice(&SPRITE_SHEET);

        State {
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START,
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            stack: [0; STACK_SIZE],
            memory,
            frame_buffer: [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
            draw_flag: false,
            frame_written: false,
            key_wait: None,
        }
    }

    /// Decrements both timers toward zero
    pub fn tick_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }

    /// The pc of the next instruction in sequence
    pub fn next_pc(&self) -> u16 {
        self.pc.wrapping_add(0x2)
    }

    /// The pc after conditionally skipping the next instruction
    pub fn skip_pc_if(&self, condition: bool) -> u16 {
        if condition {
            self.pc.wrapping_add(0x4)
        } else {
            self.next_pc()
        }
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}
