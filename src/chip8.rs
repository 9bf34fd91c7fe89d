use std::collections::VecDeque;
use std::io::Read;

use crate::config::Config;
use crate::constants::{KEY_COUNT, MAX_ROM_SIZE, MEMORY_SIZE, PROGRAM_START};
use crate::error::{Chip8Error, Status};
use crate::instruction::from_op;
use crate::opcode;
use crate::peripherals::Peripherals;
use crate::state::{FrameBuffer, State};

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - `previous_states` for rewinding
///  - the keypad and random source, with public interfaces for pressing keys
///
/// Supplies interfaces for:
/// - loading roms
/// - pressing and releasing keys
/// - stepping and reversing the CPU
/// - advancing its timers, at whatever rate the embedder drives them
/// - inspecting and consuming its frame buffer for rendering by some display
pub struct Chip8 {
    state: State,
    previous_states: VecDeque<State>,
    max_saved_states: usize,
    io: Peripherals,
}

impl Chip8 {
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    pub fn with_config(config: &Config) -> Self {
        Chip8 {
            state: State::new(),
            previous_states: VecDeque::new(),
            max_saved_states: config.max_saved_states,
            io: Peripherals::new(config.seed),
        }
    }

    /// Restarts execution from a clean state with the sprite sheet loaded.
    /// Rewind history goes with it; the keypad belongs to the embedder and is kept.
    pub fn reset(&mut self) {
        self.state = State::new();
        self.previous_states.clear();
        log::info!("machine reset");
    }

    /// Copies a rom into memory at 0x200
    ///
    /// # Arguments
    /// * `rom` the raw program; Chip-8 roms have no header
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<(), Chip8Error> {
        if rom.len() > MAX_ROM_SIZE {
            return Err(Chip8Error::OutOfSpace {
                size: rom.len(),
                max: MAX_ROM_SIZE,
            });
        }
        let start = PROGRAM_START as usize;
        self.state.memory[start..start + rom.len()].copy_from_slice(rom);
        log::info!("loaded {} byte ROM", rom.len());
        Ok(())
    }

    /// Load a rom from a source file
    ///
    /// # Arguments
    /// * `reader` a file reader that contains a ROM
    pub fn read_rom(&mut self, reader: &mut dyn Read) -> Result<(), Chip8Error> {
        let mut rom = Vec::with_capacity(MAX_ROM_SIZE);
        reader.read_to_end(&mut rom)?;
        self.load_rom(&rom)
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.state.frame_buffer
    }

    /// Whether the frame buffer changed since it was last taken
    pub fn is_dirty(&self) -> bool {
        self.state.draw_flag
    }

    /// Returns the FrameBuffer if the display should be redrawn, lowering the draw flag
    pub fn take_frame(&mut self) -> Option<FrameBuffer> {
        if self.state.draw_flag {
            self.state.draw_flag = false;
            Some(self.state.frame_buffer)
        } else {
            None
        }
    }

    /// Whether an audio device should currently be beeping
    pub fn sound_active(&self) -> bool {
        self.state.sound_timer > 0
    }

    /// Set the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 8-bit representation of the key that was pressed
    pub fn key_press(&mut self, key: u8) {
        if key as usize >= KEY_COUNT {
            log::warn!("ignoring press of unknown key {:#04X}", key);
            return;
        }
        self.io.keypad.set(key, true);
        if let Some(wait) = self.state.key_wait.as_mut() {
            if wait.latched.is_none() && !wait.held[key as usize] {
                wait.latched = Some(key);
            }
        }
    }

    /// Unset the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 8-bit representation of the key that was released
    pub fn key_release(&mut self, key: u8) {
        if key as usize >= KEY_COUNT {
            log::warn!("ignoring release of unknown key {:#04X}", key);
            return;
        }
        self.io.keypad.set(key, false);
        if let Some(wait) = self.state.key_wait.as_mut() {
            wait.held[key as usize] = false;
        }
    }

    pub fn is_key_pressed(&self, key: u8) -> bool {
        (key as usize) < KEY_COUNT && self.io.keypad.is_pressed(key)
    }

    /// Advances the CPU by a single instruction
    /// - fetches and decodes the opcode at the pc
    /// - skips it if it isn't a known instruction
    /// - otherwise executes it, keeping the previous state for rewinding
    ///
    /// On error nothing has changed and the machine should be considered halted.
    pub fn step(&mut self) -> Result<Status, Chip8Error> {
        let op = self.get_op().map_err(|e| {
            log::error!("{}", e);
            e
        })?;
        log::trace!(
            "{:04X} v{:02X?} i{:04X} pc{:04X}",
            op,
            self.state.v,
            self.state.i,
            self.state.pc
        );

        let operation = match from_op(&op) {
            Some(operation) => operation,
            None => {
                log::warn!("skipping unknown opcode {:04X} at {:04X}", op, self.state.pc);
                self.save_state();
                self.state.pc = self.state.next_pc();
                return Ok(Status::UnknownOpcode(op));
            }
        };

        let next = operation(&op, &self.state, &mut self.io).map_err(|e| {
            log::error!("halted on {:04X}: {}", op, e);
            e
        })?;
        // Repeated visits to a pending FX0A aren't worth rewinding through
        if self.state.key_wait.is_none() || next.key_wait.is_none() {
            self.save_state();
        }
        self.state = next;

        if self.state.key_wait.is_some() {
            Ok(Status::AwaitingInput)
        } else {
            Ok(Status::Ok)
        }
    }

    /// Decrements the delay and sound timers once
    pub fn tick_timers(&mut self) {
        self.state.tick_timers();
    }

    /// Reverses the CPU by a single step if possible
    /// - if there are previous_states, pops the last one and restores it
    pub fn reverse_cpu(&mut self) -> bool {
        match self.previous_states.pop_front() {
            Some(state) => {
                self.state = state;
                true
            }
            None => false,
        }
    }

    /// Puts the current state in previous_states
    /// - if there are already `max_saved_states` saved then the oldest is dropped
    fn save_state(&mut self) {
        if self.max_saved_states == 0 {
            return;
        }
        if self.previous_states.len() == self.max_saved_states {
            self.previous_states.pop_back();
        }
        self.previous_states.push_front(self.state);
    }

    /// Gets the opcode currently pointed at by the pc.
    /// Memory is stored as bytes, but opcodes are 16 bits so we combine two subsequent bytes.
    fn get_op(&self) -> Result<u16, Chip8Error> {
        let pc = self.state.pc as usize;
        if pc + 1 >= MEMORY_SIZE {
            return Err(Chip8Error::InvalidFetch { pc: self.state.pc });
        }
        Ok(opcode::from_bytes(
            self.state.memory[pc],
            self.state.memory[pc + 1],
        ))
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}
