use std::time::Duration;

use emu8::{Chip8, Config, Scheduler, Status};

fn boot(rom: &[u8]) -> Chip8 {
    let mut chip8 = Chip8::with_config(&Config {
        seed: Some(0),
        ..Config::default()
    });
    chip8.load_rom(rom).expect("rom fits");
    chip8
}

#[test]
fn clear_then_spin_runs_forever() {
    // 0x200 CLS; 0x202 JP 0x202
    let mut chip8 = boot(&[0x00, 0xE0, 0x12, 0x02]);
    let mut dirty_frames = 0;
    for _ in 0..10_000 {
        assert_eq!(chip8.step().unwrap(), Status::Ok);
        if let Some(frame) = chip8.take_frame() {
            dirty_frames += 1;
            assert!(frame.iter().flatten().all(|p| *p == 0));
        }
    }
    assert_eq!(dirty_frames, 1);
    assert!(chip8.frame().iter().flatten().all(|p| *p == 0));
}

#[test]
fn clear_and_jump_to_start_redraws_once() {
    // 0x200 CLS; 0x202 JP 0x200
    let mut chip8 = boot(&[0x00, 0xE0, 0x12, 0x00]);
    let mut dirty_frames = 0;
    for _ in 0..10_000 {
        assert_eq!(chip8.step().unwrap(), Status::Ok);
        if let Some(frame) = chip8.take_frame() {
            dirty_frames += 1;
            assert!(frame.iter().flatten().all(|p| *p == 0));
        }
    }
    assert_eq!(dirty_frames, 1);
    assert_eq!(chip8.state().pc, 0x200);
}

#[test]
fn clear_after_drawing_redraws() {
    let mut chip8 = boot(&[
        0xA0, 0x50, // I = sprite 0
        0xD0, 0x05, // draw
        0x00, 0xE0, // CLS
        0x00, 0xE0, // CLS again
    ]);
    for _ in 0..2 {
        assert_eq!(chip8.step().unwrap(), Status::Ok);
    }
    assert!(chip8.take_frame().is_some());
    assert_eq!(chip8.step().unwrap(), Status::Ok);
    assert!(chip8.take_frame().is_some());
    assert_eq!(chip8.step().unwrap(), Status::Ok);
    assert_eq!(chip8.take_frame(), None);
}

#[test]
fn empty_sprite_past_memory_is_harmless() {
    let mut chip8 = boot(&[
        0xAF, 0xFF, // I = 0xFFF
        0x60, 0xFF, // V0 = 0xFF
        0xF0, 0x1E, // I += V0
        0xD0, 0x00, // draw 0 rows
    ]);
    for _ in 0..4 {
        assert_eq!(chip8.step().unwrap(), Status::Ok);
    }
    assert_eq!(chip8.state().i, 0x10FE);
    assert_eq!(chip8.state().pc, 0x208);
    assert_eq!(chip8.take_frame(), None);
}

#[test]
fn sprite_wraps_around_right_edge() {
    let mut chip8 = boot(&[
        0x60, 0x3C, // V0 = 60
        0x61, 0x05, // V1 = 5
        0xA2, 0x08, // I = 0x208
        0xD0, 0x11, // draw 1 row at (V0, V1)
        0xA5, // sprite row 10100101
    ]);
    for _ in 0..4 {
        assert_eq!(chip8.step().unwrap(), Status::Ok);
    }

    let row = chip8.frame()[5];
    let sprite = [1, 0, 1, 0, 0, 1, 0, 1];
    for (col, pixel) in sprite.iter().enumerate() {
        assert_eq!(row[(60 + col) % 64], *pixel, "column {}", col);
    }
    assert_eq!(row[4..60], [0; 56][..]);
    assert_eq!(chip8.state().v[0xF], 0);
}

#[test]
fn key_wait_blocks_until_fresh_press() {
    let mut chip8 = boot(&[
        0xF3, 0x0A, // V3 = wait for key
        0x12, 0x02, // spin
    ]);
    chip8.key_press(0x1);
    for _ in 0..5 {
        assert_eq!(chip8.step().unwrap(), Status::AwaitingInput);
        assert_eq!(chip8.state().pc, 0x200);
    }

    chip8.key_press(0xC);
    assert_eq!(chip8.step().unwrap(), Status::Ok);
    assert_eq!(chip8.state().pc, 0x202);
    assert_eq!(chip8.state().v[0x3], 0xC);
}

#[test]
fn bcd_round_trips_through_memory() {
    let mut chip8 = boot(&[
        0x6A, 0xFE, // VA = 254
        0xA3, 0x00, // I = 0x300
        0xFA, 0x33, // mem[I..I+3] = bcd(VA)
        0xF2, 0x65, // V0..=V2 = mem[I..=I+2]
    ]);
    for _ in 0..4 {
        assert_eq!(chip8.step().unwrap(), Status::Ok);
    }
    assert_eq!(chip8.state().v[0..3], [2, 5, 4]);
    assert_eq!(chip8.state().i, 0x300);
}

#[test]
fn unknown_words_are_skipped() {
    let mut chip8 = boot(&[
        0xFF, 0xFF, // not an instruction
        0x61, 0x07, // V1 = 7
    ]);
    assert_eq!(chip8.step().unwrap(), Status::UnknownOpcode(0xFFFF));
    assert_eq!(chip8.step().unwrap(), Status::Ok);
    assert_eq!(chip8.state().v[0x1], 7);
}

#[test]
fn delay_timer_counts_down_in_wall_clock_time() {
    let mut chip8 = boot(&[
        0x60, 0x3C, // V0 = 60
        0xF0, 0x15, // DT = V0
        0xF1, 0x07, // V1 = DT
        0x31, 0x00, // skip if V1 == 0
        0x12, 0x04, // JP 0x204
        0x12, 0x0A, // spin
    ]);
    let mut scheduler = Scheduler::new(&Config::default());
    let frame = Duration::from_micros(16_667);
    let mut frames = 0;
    while chip8.state().pc != 0x20A {
        scheduler.run(&mut chip8, frame).unwrap();
        frames += 1;
        assert!(frames < 120, "delay timer never expired");
    }
    assert!((60..=62).contains(&frames), "took {} frames", frames);
}
