/// Total addressable memory in bytes (0x000..=0xFFF)
pub const MEMORY_SIZE: usize = 4096;

/// ROMs are loaded here; everything below is reserved for the interpreter
pub const PROGRAM_START: u16 = 0x200;

/// Largest ROM that fits between PROGRAM_START and the end of memory
pub const MAX_ROM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;

/// Where the hexadecimal font sprites live in reserved memory
pub const SPRITE_SHEET_START: u16 = 0x050;

/// Each font sprite is 5 rows tall
pub const SPRITE_HEIGHT: u16 = 5;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// Maximum depth of nested subroutine calls
pub const STACK_SIZE: usize = 16;

pub const KEY_COUNT: usize = 16;

/// Default CPU frequency in Hz
pub const CLOCK_SPEED: u32 = 500;

/// Timers always decrement at 60Hz regardless of the CPU frequency
pub const TIMER_SPEED: u32 = 60;

/// Roughly a second of history at the default clock speed
pub const MAX_SAVED_STATES: usize = 600;

/// # Sprite sheet
/// Sprites for the hexadecimal digits 0..F, 5 bytes each.
///
/// The 4 most significant bits of every byte are the pixels of one row, e.g. `0`:
/// ```text
/// 0xF0 1111
/// 0x90 1..1
/// 0x90 1..1
/// 0x90 1..1
/// 0xF0 1111
/// ```
pub const SPRITE_SHEET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
