use crate::constants::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, MEMORY_SIZE, SPRITE_HEIGHT, SPRITE_SHEET_START, STACK_SIZE,
};
use crate::error::Chip8Error;
use crate::opcode::Opcode;
use crate::peripherals::Peripherals;
use crate::state::{KeyWait, State};

/// Every operation maps the current state to the next one, or fails leaving it untouched.
/// Each one is responsible for moving the pc exactly once.
pub type Operation =
    fn(op: &dyn Opcode, state: &State, io: &mut Peripherals) -> Result<State, Chip8Error>;

/// Checks that `len` bytes starting at `start` are addressable and returns the start as an index
fn mem_range(start: u16, len: usize) -> Result<usize, Chip8Error> {
    let start = start as usize;
    if start >= MEMORY_SIZE {
        return Err(Chip8Error::MemoryOutOfBounds { address: start });
    }
    if start + len > MEMORY_SIZE {
        return Err(Chip8Error::MemoryOutOfBounds {
            address: start + len - 1,
        });
    }
    Ok(start)
}

/// VF = flag, stored after the result so the flag wins when x is 0xF
fn with_flag(state: &State, x: usize, res: u8, flag: bool) -> State {
    let mut v = state.v;
    v[x] = res;
    v[0xF] = flag as u8;
    State {
        pc: state.next_pc(),
        v,
        ..*state
    }
}

/// Vx = res
fn with_register(state: &State, x: usize, res: u8) -> State {
    let mut v = state.v;
    v[x] = res;
    State {
        pc: state.next_pc(),
        v,
        ..*state
    }
}

/// clear
///
/// Only the first clear since reset, or one that erases lit pixels, marks the frame dirty.
pub fn clr(_op: &dyn Opcode, state: &State, _io: &mut Peripherals) -> Result<State, Chip8Error> {
    let lit = state.frame_buffer.iter().flatten().any(|p| *p != 0);
    Ok(State {
        pc: state.next_pc(),
        frame_buffer: [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
        draw_flag: state.draw_flag || lit || !state.frame_written,
        frame_written: true,
        ..*state
    })
}

/// PC = STACK.pop()
pub fn rts(_op: &dyn Opcode, state: &State, _io: &mut Peripherals) -> Result<State, Chip8Error> {
    if state.sp == 0 {
        return Err(Chip8Error::StackUnderflow { pc: state.pc });
    }
    let sp = state.sp - 0x1;
    Ok(State {
        pc: state.stack[sp as usize],
        sp,
        ..*state
    })
}

/// PC = addr
pub fn jump(op: &dyn Opcode, state: &State, _io: &mut Peripherals) -> Result<State, Chip8Error> {
    Ok(State {
        pc: op.nnn(),
        ..*state
    })
}

/// STACK.push(PC + 2); PC = addr
pub fn call(op: &dyn Opcode, state: &State, _io: &mut Peripherals) -> Result<State, Chip8Error> {
    if state.sp as usize >= STACK_SIZE {
        return Err(Chip8Error::StackOverflow { pc: state.pc });
    }
    let mut stack = state.stack;
    stack[state.sp as usize] = state.next_pc();
    Ok(State {
        pc: op.nnn(),
        sp: state.sp + 0x1,
        stack,
        ..*state
    })
}

/// if Vx == nn then pc += 2
pub fn ske(op: &dyn Opcode, state: &State, _io: &mut Peripherals) -> Result<State, Chip8Error> {
    Ok(State {
        pc: state.skip_pc_if(state.v[op.x()] == op.nn()),
        ..*state
    })
}

/// if Vx != nn then pc += 2
pub fn skne(op: &dyn Opcode, state: &State, _io: &mut Peripherals) -> Result<State, Chip8Error> {
    Ok(State {
        pc: state.skip_pc_if(state.v[op.x()] != op.nn()),
        ..*state
    })
}

/// if Vx == Vy then pc += 2
pub fn skre(op: &dyn Opcode, state: &State, _io: &mut Peripherals) -> Result<State, Chip8Error> {
    Ok(State {
        pc: state.skip_pc_if(state.v[op.x()] == state.v[op.y()]),
        ..*state
    })
}

/// Vx = nn
pub fn load(op: &dyn Opcode, state: &State, _io: &mut Peripherals) -> Result<State, Chip8Error> {
    Ok(with_register(state, op.x(), op.nn()))
}

/// Vx += nn
/// Add nn to Vx; allow for overflow but drop it without touching VF
pub fn add(op: &dyn Opcode, state: &State, _io: &mut Peripherals) -> Result<State, Chip8Error> {
    Ok(with_register(
        state,
        op.x(),
        state.v[op.x()].wrapping_add(op.nn()),
    ))
}

/// Vx = Vy
pub fn mv(op: &dyn Opcode, state: &State, _io: &mut Peripherals) -> Result<State, Chip8Error> {
    Ok(with_register(state, op.x(), state.v[op.y()]))
}

/// Vx |= Vy
pub fn or(op: &dyn Opcode, state: &State, _io: &mut Peripherals) -> Result<State, Chip8Error> {
    Ok(with_register(
        state,
        op.x(),
        state.v[op.x()] | state.v[op.y()],
    ))
}

/// Vx &= Vy
pub fn and(op: &dyn Opcode, state: &State, _io: &mut Peripherals) -> Result<State, Chip8Error> {
    Ok(with_register(
        state,
        op.x(),
        state.v[op.x()] & state.v[op.y()],
    ))
}

/// Vx ^= Vy
pub fn xor(op: &dyn Opcode, state: &State, _io: &mut Peripherals) -> Result<State, Chip8Error> {
    Ok(with_register(
        state,
        op.x(),
        state.v[op.x()] ^ state.v[op.y()],
    ))
}

/// Vx += Vy; VF = overflow
pub fn addr(op: &dyn Opcode, state: &State, _io: &mut Peripherals) -> Result<State, Chip8Error> {
    let (res, over) = state.v[op.x()].overflowing_add(state.v[op.y()]);
    Ok(with_flag(state, op.x(), res, over))
}

/// Vx -= Vy; VF = !underflow
pub fn sub(op: &dyn Opcode, state: &State, _io: &mut Peripherals) -> Result<State, Chip8Error> {
    let (res, under) = state.v[op.x()].overflowing_sub(state.v[op.y()]);
    Ok(with_flag(state, op.x(), res, !under))
}

/// Vx >>= 1; VF = shifted out bit
pub fn shr(op: &dyn Opcode, state: &State, _io: &mut Peripherals) -> Result<State, Chip8Error> {
    let vx = state.v[op.x()];
    Ok(with_flag(state, op.x(), vx >> 1, vx & 0x1 == 0x1))
}

/// Vx = Vy - Vx; VF = !underflow
pub fn subn(op: &dyn Opcode, state: &State, _io: &mut Peripherals) -> Result<State, Chip8Error> {
    let (res, under) = state.v[op.y()].overflowing_sub(state.v[op.x()]);
    Ok(with_flag(state, op.x(), res, !under))
}

/// Vx <<= 1; VF = shifted out bit
pub fn shl(op: &dyn Opcode, state: &State, _io: &mut Peripherals) -> Result<State, Chip8Error> {
    let vx = state.v[op.x()];
    Ok(with_flag(state, op.x(), vx << 1, vx & 0x80 == 0x80))
}

/// if Vx != Vy then pc += 2
pub fn skrne(op: &dyn Opcode, state: &State, _io: &mut Peripherals) -> Result<State, Chip8Error> {
    Ok(State {
        pc: state.skip_pc_if(state.v[op.x()] != state.v[op.y()]),
        ..*state
    })
}

/// I = addr
pub fn loadi(op: &dyn Opcode, state: &State, _io: &mut Peripherals) -> Result<State, Chip8Error> {
    Ok(State {
        pc: state.next_pc(),
        i: op.nnn(),
        ..*state
    })
}

/// PC = V0 + addr
pub fn jumpi(op: &dyn Opcode, state: &State, _io: &mut Peripherals) -> Result<State, Chip8Error> {
    Ok(State {
        pc: u16::from(state.v[0x0]) + op.nnn(),
        ..*state
    })
}

/// Vx = rand_byte & nn
pub fn rand(op: &dyn Opcode, state: &State, io: &mut Peripherals) -> Result<State, Chip8Error> {
    Ok(with_register(state, op.x(), io.random_byte() & op.nn()))
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs a sprite from memory i..i+n at position x, y on the FrameBuffer with wrapping.
/// Sets VF if any pixel anywhere in the sprite was erased
pub fn draw(op: &dyn Opcode, state: &State, _io: &mut Peripherals) -> Result<State, Chip8Error> {
    let height = op.n() as usize;
    if height == 0 {
        // an empty sprite touches neither memory nor the frame buffer
        let mut v = state.v;
        v[0xF] = 0;
        return Ok(State {
            pc: state.next_pc(),
            v,
            ..*state
        });
    }
    let start = mem_range(state.i, height)?;
    let origin_x = state.v[op.x()] as usize;
    let origin_y = state.v[op.y()] as usize;

    let mut frame_buffer = state.frame_buffer;
    let mut collision = 0x0;
    for (row, byte) in state.memory[start..start + height].iter().enumerate() {
        let y = (origin_y + row) % DISPLAY_HEIGHT;
        for bit in 0..8 {
            let x = (origin_x + bit) % DISPLAY_WIDTH;
            let pixel = (byte >> (7 - bit)) & 0x1;
            collision |= pixel & frame_buffer[y][x];
            frame_buffer[y][x] ^= pixel;
        }
    }

    let mut v = state.v;
    v[0xF] = collision;
    Ok(State {
        pc: state.next_pc(),
        draw_flag: true,
        frame_written: true,
        v,
        frame_buffer,
        ..*state
    })
}

/// if Vx.pressed then pc += 2
pub fn skpr(op: &dyn Opcode, state: &State, io: &mut Peripherals) -> Result<State, Chip8Error> {
    Ok(State {
        pc: state.skip_pc_if(io.keypad.is_pressed(state.v[op.x()])),
        ..*state
    })
}

/// if !Vx.pressed then pc += 2
pub fn skup(op: &dyn Opcode, state: &State, io: &mut Peripherals) -> Result<State, Chip8Error> {
    Ok(State {
        pc: state.skip_pc_if(!io.keypad.is_pressed(state.v[op.x()])),
        ..*state
    })
}

/// Vx = DT
pub fn moved(op: &dyn Opcode, state: &State, _io: &mut Peripherals) -> Result<State, Chip8Error> {
    Ok(with_register(state, op.x(), state.delay_timer))
}

/// await keypress for Vx
///
/// The first visit records which keys are already down and leaves the pc in place. Later
/// visits finish once a key has been pressed that wasn't held at that point, either latched
/// by `Chip8::key_press` or found down on the keypad.
pub fn keyd(op: &dyn Opcode, state: &State, io: &mut Peripherals) -> Result<State, Chip8Error> {
    let keys = io.keypad.keys();
    let wait = match state.key_wait {
        Some(wait) => wait,
        None => {
            return Ok(State {
                key_wait: Some(KeyWait {
                    held: *keys,
                    latched: None,
                }),
                ..*state
            })
        }
    };

    let fresh = (0..keys.len()).find(|&k| keys[k] && !wait.held[k]);
    match wait.latched.map(usize::from).or(fresh) {
        Some(key) => {
            let next = with_register(state, op.x(), key as u8);
            Ok(State {
                key_wait: None,
                ..next
            })
        }
        None => {
            let mut held = wait.held;
            for (still_held, down) in held.iter_mut().zip(keys.iter()) {
                *still_held &= *down;
            }
            Ok(State {
                key_wait: Some(KeyWait { held, ..wait }),
                ..*state
            })
        }
    }
}

/// DT = Vx
pub fn loads(op: &dyn Opcode, state: &State, _io: &mut Peripherals) -> Result<State, Chip8Error> {
    Ok(State {
        pc: state.next_pc(),
        delay_timer: state.v[op.x()],
        ..*state
    })
}

/// ST = Vx
pub fn ld(op: &dyn Opcode, state: &State, _io: &mut Peripherals) -> Result<State, Chip8Error> {
    Ok(State {
        pc: state.next_pc(),
        sound_timer: state.v[op.x()],
        ..*state
    })
}

/// I += Vx
pub fn addi(op: &dyn Opcode, state: &State, _io: &mut Peripherals) -> Result<State, Chip8Error> {
    Ok(State {
        pc: state.next_pc(),
        i: state.i.wrapping_add(u16::from(state.v[op.x()])),
        ..*state
    })
}

/// I = sprite_addr(Vx)
/// Set I to the memory address of the sprite for the low nibble of Vx
/// See constants::SPRITE_SHEET for more details
pub fn ldspr(op: &dyn Opcode, state: &State, _io: &mut Peripherals) -> Result<State, Chip8Error> {
    let digit = u16::from(state.v[op.x()] & 0xF);
    Ok(State {
        pc: state.next_pc(),
        i: SPRITE_SHEET_START + digit * SPRITE_HEIGHT,
        ..*state
    })
}

/// mem[I..I+3] = bcd(Vx)
/// Store BCD repr of Vx in memory starting at address i
pub fn bcd(op: &dyn Opcode, state: &State, _io: &mut Peripherals) -> Result<State, Chip8Error> {
    let start = mem_range(state.i, 3)?;
    let vx = state.v[op.x()];
    let mut memory = state.memory;
    memory[start..start + 3].copy_from_slice(&[vx / 100, vx / 10 % 10, vx % 10]);
    Ok(State {
        pc: state.next_pc(),
        memory,
        ..*state
    })
}

/// mem[I..=I+x] = V0..=Vx
pub fn stor(op: &dyn Opcode, state: &State, _io: &mut Peripherals) -> Result<State, Chip8Error> {
    let start = mem_range(state.i, op.x() + 1)?;
    let mut memory = state.memory;
    memory[start..=start + op.x()].copy_from_slice(&state.v[..=op.x()]);
    Ok(State {
        pc: state.next_pc(),
        memory,
        ..*state
    })
}

/// V0..=Vx = mem[I..=I+x]
pub fn read(op: &dyn Opcode, state: &State, _io: &mut Peripherals) -> Result<State, Chip8Error> {
    let start = mem_range(state.i, op.x() + 1)?;
    let mut v = state.v;
    v[..=op.x()].copy_from_slice(&state.memory[start..=start + op.x()]);
    Ok(State {
        pc: state.next_pc(),
        v,
        ..*state
    })
}
