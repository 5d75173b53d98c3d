mod common;

use common::{cpu_with_program, install_vector, steps};
use xt_cpu::{Flags, SegReg, StepOutcome, Width};

#[test]
fn mov_then_add_immediate() {
    // mov ax, 5 ; add ax, 3
    let mut cpu = cpu_with_program(&[0xB8, 0x05, 0x00, 0x05, 0x03, 0x00]);
    steps(&mut cpu, 2);

    assert_eq!(cpu.state.ax(), 8);
    assert_eq!(cpu.state.ip, 0x106);
    assert!(!cpu.state.flag(Flags::ZF));
    assert!(!cpu.state.flag(Flags::CF));
}

#[test]
fn and_register_forms_write_back() {
    // mov ax, 0x1234 ; mov bx, 0x0FF0 ; and ax, bx ; and bl, ah
    let mut cpu = cpu_with_program(&[
        0xB8, 0x34, 0x12, 0xBB, 0xF0, 0x0F, 0x21, 0xD8, 0x22, 0xDC,
    ]);
    steps(&mut cpu, 3);
    assert_eq!(cpu.state.ax(), 0x0230);

    cpu.step();
    // bl = 0xF0 & 0x02
    assert_eq!(cpu.state.bx(), 0x0F00);
}

#[test]
fn loop_counts_down_to_zero() {
    // mov cx, 3 ; loop $
    let program = [0xB9, 0x03, 0x00, 0xE2, 0xFE];

    let mut cpu = cpu_with_program(&program);
    steps(&mut cpu, 2);
    assert_eq!(cpu.state.cx(), 2);
    assert_eq!(cpu.state.ip, 0x103);

    let mut cpu = cpu_with_program(&program);
    steps(&mut cpu, 4);
    assert_eq!(cpu.state.cx(), 0);
    assert_eq!(cpu.state.ip, 0x105);
}

#[test]
fn conditional_jumps_follow_flags() {
    // xor ax, ax ; jz +2
    let mut cpu = cpu_with_program(&[0x31, 0xC0, 0x74, 0x02]);
    steps(&mut cpu, 2);
    assert_eq!(cpu.state.ip, 0x106);

    // xor ax, ax ; jnz +2
    let mut cpu = cpu_with_program(&[0x31, 0xC0, 0x75, 0x02]);
    steps(&mut cpu, 2);
    assert_eq!(cpu.state.ip, 0x104);

    // jmp short backwards
    let mut cpu = cpu_with_program(&[0x90, 0xEB, 0xFD]);
    steps(&mut cpu, 2);
    assert_eq!(cpu.state.ip, 0x100);
}

#[test]
fn rep_movsb_runs_one_iteration_per_step() {
    let mut cpu = cpu_with_program(&[0xF3, 0xA4]);
    cpu.mem.load(0x200, &[1, 2, 3]).unwrap();
    cpu.state.set_si(0x200);
    cpu.state.set_di(0x300);
    cpu.state.set_cx(3);

    cpu.step();
    assert_eq!(cpu.state.cx(), 2);
    assert_eq!(cpu.state.ip, 0x100);

    steps(&mut cpu, 2);
    assert_eq!(cpu.state.cx(), 0);
    assert_eq!(cpu.state.ip, 0x102);
    assert_eq!(cpu.mem.slice(0x300, 3).unwrap(), &[1, 2, 3]);
    assert_eq!(cpu.state.si(), 0x203);
    assert_eq!(cpu.state.di(), 0x303);
}

#[test]
fn rep_with_zero_count_skips_the_instruction() {
    let mut cpu = cpu_with_program(&[0xF3, 0xA4]);
    cpu.mem.load(0x200, &[7]).unwrap();
    cpu.state.set_si(0x200);
    cpu.state.set_di(0x300);
    cpu.state.set_cx(0);

    cpu.step();
    assert_eq!(cpu.state.ip, 0x102);
    assert_eq!(cpu.mem.read_u8(0x300), 0);
    assert_eq!(cpu.state.si(), 0x200);
}

#[test]
fn repe_cmpsb_stops_on_first_mismatch() {
    let mut cpu = cpu_with_program(&[0xF3, 0xA6]);
    cpu.mem.load(0x200, &[1, 2, 3]).unwrap();
    cpu.mem.load(0x300, &[1, 9, 3]).unwrap();
    cpu.state.set_si(0x200);
    cpu.state.set_di(0x300);
    cpu.state.set_cx(3);

    steps(&mut cpu, 2);
    assert_eq!(cpu.state.ip, 0x102);
    assert_eq!(cpu.state.cx(), 1);
    assert_eq!(cpu.state.si(), 0x202);
    assert!(!cpu.state.flag(Flags::ZF));
}

#[test]
fn repne_scasb_stops_on_match() {
    let mut cpu = cpu_with_program(&[0xF2, 0xAE]);
    cpu.mem.load(0x300, &[1, 2, 3, 4]).unwrap();
    cpu.state.set_al(3);
    cpu.state.set_di(0x300);
    cpu.state.set_cx(4);

    steps(&mut cpu, 3);
    assert_eq!(cpu.state.ip, 0x102);
    assert_eq!(cpu.state.cx(), 1);
    assert_eq!(cpu.state.di(), 0x303);
    assert!(cpu.state.flag(Flags::ZF));
}

#[test]
fn string_ops_honour_direction_flag() {
    // std ; stosw ; lodsb
    let mut cpu = cpu_with_program(&[0xFD, 0xAB, 0xAC]);
    cpu.state.set_ax(0xBEEF);
    cpu.state.set_di(0x400);
    cpu.state.set_si(0x400);

    steps(&mut cpu, 2);
    assert_eq!(cpu.mem.read_u16(0x400), 0xBEEF);
    assert_eq!(cpu.state.di(), 0x3FE);

    cpu.step();
    assert_eq!(cpu.state.al(), 0xEF);
    assert_eq!(cpu.state.si(), 0x3FF);
}

#[test]
fn push_pop_round_trip() {
    // push ax ; pop bx ; push sp
    let mut cpu = cpu_with_program(&[0x50, 0x5B, 0x54]);
    cpu.state.set_ax(0x1234);

    cpu.step();
    assert_eq!(cpu.state.sp(), 0x0FFE);
    assert_eq!(cpu.mem.read_u16(0x0FFE), 0x1234);

    cpu.step();
    assert_eq!(cpu.state.bx(), 0x1234);
    assert_eq!(cpu.state.sp(), 0x1000);

    cpu.step();
    assert_eq!(cpu.mem.read_u16(0x0FFE), 0x0FFE);
}

#[test]
fn near_call_and_return() {
    // call +3 ; nop ; nop ; nop ; ret
    let mut cpu = cpu_with_program(&[0xE8, 0x03, 0x00, 0x90, 0x90, 0x90, 0xC3]);

    cpu.step();
    assert_eq!(cpu.state.ip, 0x106);
    assert_eq!(cpu.state.sp(), 0x0FFE);
    assert_eq!(cpu.mem.read_u16(0x0FFE), 0x103);

    cpu.step();
    assert_eq!(cpu.state.ip, 0x103);
    assert_eq!(cpu.state.sp(), 0x1000);
}

#[test]
fn far_jump_loads_cs_and_ip() {
    let mut cpu = cpu_with_program(&[0xEA, 0x5B, 0xE0, 0x00, 0xF0]);
    cpu.step();
    assert_eq!(cpu.state.cs(), 0xF000);
    assert_eq!(cpu.state.ip, 0xE05B);
}

#[test]
fn software_interrupt_and_iret() {
    let mut cpu = cpu_with_program(&[0xCD, 0x21]);
    install_vector(&mut cpu, 0x21, 0x0200);
    cpu.mem.write_u8(0x200, 0xCF);
    cpu.state.flags = Flags::IF | Flags::CF;

    cpu.step();
    assert_eq!(cpu.state.ip, 0x200);
    assert!(!cpu.state.flag(Flags::IF));
    assert_eq!(cpu.state.sp(), 0x1000 - 6);
    assert_eq!(cpu.mem.read_u16(0x1000 - 6), 0x102);
    assert_eq!(cpu.mem.read_u16(0x1000 - 2), (Flags::IF | Flags::CF).bits());

    cpu.step();
    assert_eq!(cpu.state.ip, 0x102);
    assert_eq!(cpu.state.flags, Flags::IF | Flags::CF);
    assert_eq!(cpu.state.sp(), 0x1000);
}

#[test]
fn divide_by_zero_vectors_without_touching_registers() {
    // div bl
    let mut cpu = cpu_with_program(&[0xF6, 0xF3]);
    install_vector(&mut cpu, 0, 0x0300);
    cpu.state.set_ax(0x1234);
    cpu.state.set_bx(0);

    cpu.step();
    assert_eq!(cpu.state.ip, 0x300);
    assert_eq!(cpu.state.ax(), 0x1234);
    assert_eq!(cpu.mem.read_u16(u32::from(cpu.state.sp())), 0x102);
}

#[test]
fn divide_overflow_vectors() {
    let mut cpu = cpu_with_program(&[0xF6, 0xF3]);
    install_vector(&mut cpu, 0, 0x0300);
    cpu.state.set_ax(0x1000);
    cpu.state.set_bx(0x10);

    cpu.step();
    assert_eq!(cpu.state.ip, 0x300);
    assert_eq!(cpu.state.ax(), 0x1000);
}

#[test]
fn unsigned_divide() {
    let mut cpu = cpu_with_program(&[0xF6, 0xF3]);
    cpu.state.set_ax(100);
    cpu.state.set_bx(7);
    cpu.step();
    assert_eq!(cpu.state.ax(), 0x020E);

    // div cx
    let mut cpu = cpu_with_program(&[0xF7, 0xF1]);
    cpu.state.set_dx(0x0001);
    cpu.state.set_ax(0x0000);
    cpu.state.set_cx(0x0100);
    cpu.step();
    assert_eq!(cpu.state.ax(), 0x0100);
    assert_eq!(cpu.state.dx(), 0);
}

#[test]
fn signed_divide() {
    // idiv bl: -7 / 2 = -3 rem -1
    let mut cpu = cpu_with_program(&[0xF6, 0xFB]);
    cpu.state.set_ax(0xFFF9);
    cpu.state.set_bx(2);
    cpu.step();
    assert_eq!(cpu.state.ax(), 0xFFFD);

    // idiv cx: -100000 / 1000 = -100
    let mut cpu = cpu_with_program(&[0xF7, 0xF9]);
    cpu.state.set_dx(0xFFFE);
    cpu.state.set_ax(0x7960);
    cpu.state.set_cx(1000);
    cpu.step();
    assert_eq!(cpu.state.ax(), 0xFF9C);
    assert_eq!(cpu.state.dx(), 0);

    // idiv cx: 100 / 7 = 14 rem 2
    let mut cpu = cpu_with_program(&[0xF7, 0xF9]);
    cpu.state.set_dx(0);
    cpu.state.set_ax(100);
    cpu.state.set_cx(7);
    cpu.step();
    assert_eq!(cpu.state.ax(), 14);
    assert_eq!(cpu.state.dx(), 2);
}

#[test]
fn signed_divide_overflow_vectors() {
    // 0x0100 / 1 = 256 does not fit in AL
    let mut cpu = cpu_with_program(&[0xF6, 0xFB]);
    install_vector(&mut cpu, 0, 0x0300);
    cpu.state.set_ax(0x0100);
    cpu.state.set_bx(1);
    cpu.step();
    assert_eq!(cpu.state.ip, 0x300);
    assert_eq!(cpu.state.ax(), 0x0100);
}

#[test]
fn multiply_sets_carry_on_wide_result() {
    // mul bl
    let mut cpu = cpu_with_program(&[0xF6, 0xE3]);
    cpu.state.set_al(0x80);
    cpu.state.set_bx(2);
    cpu.step();
    assert_eq!(cpu.state.ax(), 0x0100);
    assert!(cpu.state.flag(Flags::CF) && cpu.state.flag(Flags::OF));

    // imul bl: -1 * 2 fits in AL
    let mut cpu = cpu_with_program(&[0xF6, 0xEB]);
    cpu.state.set_al(0xFF);
    cpu.state.set_bx(2);
    cpu.step();
    assert_eq!(cpu.state.ax(), 0xFFFE);
    assert!(!cpu.state.flag(Flags::CF) && !cpu.state.flag(Flags::OF));

    // imul bl: 64 * 4 does not
    let mut cpu = cpu_with_program(&[0xF6, 0xEB]);
    cpu.state.set_al(0x40);
    cpu.state.set_bx(4);
    cpu.step();
    assert_eq!(cpu.state.ax(), 0x0100);
    assert!(cpu.state.flag(Flags::CF) && cpu.state.flag(Flags::OF));

    // mul cx
    let mut cpu = cpu_with_program(&[0xF7, 0xE1]);
    cpu.state.set_ax(0x1000);
    cpu.state.set_cx(0x0010);
    cpu.step();
    assert_eq!((cpu.state.dx(), cpu.state.ax()), (0x0001, 0x0000));
    assert!(cpu.state.flag(Flags::CF));
}

#[test]
fn negate_sets_carry_for_nonzero() {
    // neg ax
    let mut cpu = cpu_with_program(&[0xF7, 0xD8, 0xF7, 0xD8]);
    cpu.state.set_ax(1);
    cpu.step();
    assert_eq!(cpu.state.ax(), 0xFFFF);
    assert!(cpu.state.flag(Flags::CF));

    cpu.state.set_ax(0);
    cpu.step();
    assert_eq!(cpu.state.ax(), 0);
    assert!(!cpu.state.flag(Flags::CF));
}

#[test]
fn group_immediates_sign_extend_byte_form() {
    // sub ax, 1 ; add ax, -1 ; and ax, 0xFFF0
    let mut cpu = cpu_with_program(&[0x83, 0xE8, 0x01, 0x83, 0xC0, 0xFF, 0x83, 0xE0, 0xF0]);
    cpu.state.set_ax(5);
    cpu.step();
    assert_eq!(cpu.state.ax(), 4);
    cpu.step();
    assert_eq!(cpu.state.ax(), 3);
    assert!(cpu.state.flag(Flags::CF));

    cpu.state.set_ax(0x1234);
    cpu.step();
    assert_eq!(cpu.state.ax(), 0x1230);
}

#[test]
fn cmp_leaves_destination_alone() {
    // cmp ax, bx
    let mut cpu = cpu_with_program(&[0x39, 0xD8]);
    cpu.state.set_ax(3);
    cpu.state.set_bx(5);
    cpu.step();
    assert_eq!(cpu.state.ax(), 3);
    assert!(cpu.state.flag(Flags::CF));
    assert!(cpu.state.flag(Flags::SF));
}

#[test]
fn bp_addressing_uses_stack_segment_unless_overridden() {
    // mov al, [bp+0] ; ds: mov ah, [bp+0]
    let mut cpu = cpu_with_program(&[0x8A, 0x46, 0x00, 0x3E, 0x8A, 0x66, 0x00]);
    cpu.state.set_seg(SegReg::Ss, 0x2000);
    cpu.state.set_seg(SegReg::Ds, 0x3000);
    cpu.state.set_bp(0x10);
    cpu.mem.write_u8(0x20010, 0xAB);
    cpu.mem.write_u8(0x30010, 0xCD);

    steps(&mut cpu, 2);
    assert_eq!(cpu.state.ax(), 0xCDAB);
}

#[test]
fn les_and_lea() {
    // les bx, [0x400] ; lea si, [bx+di+4]
    let mut cpu = cpu_with_program(&[0xC4, 0x1E, 0x00, 0x04, 0x8D, 0x71, 0x04]);
    cpu.mem.load(0x400, &[0x34, 0x12, 0x00, 0x50]).unwrap();
    cpu.state.set_di(0x10);

    cpu.step();
    assert_eq!(cpu.state.bx(), 0x1234);
    assert_eq!(cpu.state.es(), 0x5000);

    cpu.step();
    assert_eq!(cpu.state.si(), 0x1234 + 0x10 + 4);
}

#[test]
fn shifts_and_rotates() {
    // shl al, 1 ; shr ax, cl
    let mut cpu = cpu_with_program(&[0xD0, 0xE0, 0xD3, 0xE8]);
    cpu.state.set_al(0x81);
    cpu.step();
    assert_eq!(cpu.state.al(), 0x02);
    assert!(cpu.state.flag(Flags::CF));
    assert!(cpu.state.flag(Flags::OF));

    cpu.state.set_ax(0x1234);
    cpu.state.set_cx(4);
    cpu.step();
    assert_eq!(cpu.state.ax(), 0x0123);
}

#[test]
fn sign_extension_helpers() {
    // cbw ; cwd
    let mut cpu = cpu_with_program(&[0x98, 0x99]);
    cpu.state.set_al(0x80);
    steps(&mut cpu, 2);
    assert_eq!(cpu.state.ax(), 0xFF80);
    assert_eq!(cpu.state.dx(), 0xFFFF);
}

#[test]
fn port_io_goes_through_the_bus() {
    // in al, 0x60 ; mov dx, 0x21 ; mov al, 0xFF ; out dx, al ; in ax, dx
    let mut cpu = cpu_with_program(&[0xE4, 0x60, 0xBA, 0x21, 0x00, 0xB0, 0xFF, 0xEE, 0xED]);
    cpu.bus_mut().ports.insert(0x60, 0x2C);

    cpu.step();
    assert_eq!(cpu.state.al(), 0x2C);

    steps(&mut cpu, 3);
    assert_eq!(cpu.bus().writes, vec![(0x21, Width::Byte, 0xFF)]);

    cpu.step();
    assert_eq!(cpu.state.ax(), 0x00FF);
}

#[test]
fn xlat_translates_through_table() {
    let mut cpu = cpu_with_program(&[0xD7]);
    cpu.mem.load(0x500, &[10, 20, 30, 40]).unwrap();
    cpu.state.set_bx(0x500);
    cpu.state.set_al(2);
    cpu.step();
    assert_eq!(cpu.state.al(), 30);
}

#[test]
fn word_access_wraps_within_segment() {
    // mov ax, [0xFFFF]
    let mut cpu = cpu_with_program(&[0xA1, 0xFF, 0xFF]);
    cpu.mem.write_u8(0xFFFF, 0x34);
    cpu.mem.write_u8(0x0000, 0x12);
    cpu.step();
    assert_eq!(cpu.state.ax(), 0x1234);
}

#[test]
fn guest_writes_to_firmware_are_dropped() {
    // mov byte [0], 0x55 with DS pointing at the firmware region
    let mut cpu = cpu_with_program(&[0xC6, 0x06, 0x00, 0x00, 0x55]);
    cpu.state.set_seg(SegReg::Ds, 0xF600);
    cpu.step();
    assert_eq!(cpu.mem.read_u8(0xF6000), 0);
    assert_eq!(cpu.state.ip, 0x105);
}

#[test]
fn undefined_opcode_is_a_one_byte_no_op() {
    let mut cpu = cpu_with_program(&[0x60, 0x90]);
    let before = cpu.state;
    cpu.step();
    assert_eq!(cpu.state.ip, 0x101);
    assert_eq!(cpu.state.ax(), before.ax());
    assert_eq!(cpu.state.flags, before.flags);
}

#[test]
fn halt_stops_run() {
    // nop ; hlt ; nop
    let mut cpu = cpu_with_program(&[0x90, 0xF4, 0x90]);
    let exit = cpu.run(10, false);
    assert_eq!(exit, xt_cpu::RunExit::Halted { executed: 1 });
    assert!(cpu.is_halted());
    assert_eq!(cpu.state.ip, 0x102);

    assert_eq!(cpu.step(), StepOutcome::Halted);
    assert_eq!(cpu.state.ip, 0x102);
}

#[test]
fn run_with_budget_completes() {
    let mut cpu = cpu_with_program(&[0x90; 8]);
    let exit = cpu.run(5, true);
    assert_eq!(exit, xt_cpu::RunExit::Completed { executed: 5 });
    assert_eq!(exit.executed(), 5);
    assert_eq!(cpu.state.ip, 0x105);
}

#[test]
fn reset_restores_entry_point_only() {
    let mut cpu = cpu_with_program(&[0xB8, 0x34, 0x12, 0xF9]);
    steps(&mut cpu, 2);
    assert!(cpu.total_cycles() > 0);
    cpu.reset();

    assert_eq!(cpu.state.ax(), 0x1234);
    assert_eq!(cpu.state.cs(), 0xFFFF);
    assert_eq!(cpu.state.ip, 0);
    assert!(cpu.state.flags.is_empty());
    assert_eq!(cpu.clocks(), 0);
    assert_eq!(cpu.total_cycles(), 0);
    assert_eq!(cpu.queue(), &[0; 6]);
    assert_eq!(cpu.mem.read_u8(0x100), 0xB8);
}

#[test]
fn every_divide_by_zero_form_vectors_and_preserves_registers() {
    let cases: [(&str, [u8; 2]); 4] = [
        ("div bl", [0xF6, 0xF3]),
        ("idiv bl", [0xF6, 0xFB]),
        ("div cx", [0xF7, 0xF1]),
        ("idiv cx", [0xF7, 0xF9]),
    ];
    for (name, code) in cases {
        let mut cpu = cpu_with_program(&code);
        install_vector(&mut cpu, 0, 0x0300);
        cpu.state.set_ax(0x2222);
        cpu.state.set_dx(0x1111);
        cpu.state.set_bx(0);
        cpu.state.set_cx(0);

        cpu.step();
        assert_eq!(cpu.state.ip, 0x300, "{name}");
        assert_eq!(cpu.state.ax(), 0x2222, "{name}");
        assert_eq!(cpu.state.dx(), 0x1111, "{name}");
        assert_eq!(cpu.mem.read_u16(u32::from(cpu.state.sp())), 0x102, "{name}");
    }
}

#[test]
fn aam_and_aad_convert_between_binary_and_unpacked_bcd() {
    // aam ; aad
    let mut cpu = cpu_with_program(&[0xD4, 0x0A, 0xD5, 0x0A]);
    cpu.state.set_ax(0x003F);

    cpu.step();
    assert_eq!(cpu.state.ax(), 0x0603);
    assert!(!cpu.state.flag(Flags::ZF));

    cpu.step();
    assert_eq!(cpu.state.ax(), 0x003F);
}

#[test]
fn aam_with_zero_base_raises_divide_error() {
    let mut cpu = cpu_with_program(&[0xD4, 0x00]);
    install_vector(&mut cpu, 0, 0x0300);
    cpu.state.set_ax(0x1234);

    cpu.step();
    assert_eq!(cpu.state.ip, 0x300);
    assert_eq!(cpu.state.ax(), 0x1234);
    assert_eq!(cpu.mem.read_u16(u32::from(cpu.state.sp())), 0x102);
}

#[test]
fn into_traps_only_when_overflow_is_set() {
    let mut cpu = cpu_with_program(&[0xCE]);
    install_vector(&mut cpu, 4, 0x0300);
    cpu.step();
    assert_eq!(cpu.state.ip, 0x101);
    assert_eq!(cpu.state.sp(), 0x1000);

    let mut cpu = cpu_with_program(&[0xCE]);
    install_vector(&mut cpu, 4, 0x0300);
    cpu.state.flags = Flags::OF;
    cpu.step();
    assert_eq!(cpu.state.ip, 0x300);
    assert_eq!(cpu.mem.read_u16(u32::from(cpu.state.sp())), 0x101);
}

#[test]
fn lahf_and_sahf_move_the_low_flag_byte() {
    // lahf ; sahf
    let mut cpu = cpu_with_program(&[0x9F, 0x9E]);
    cpu.state.flags = Flags::IF | Flags::ZF | Flags::CF;

    cpu.step();
    assert_eq!(cpu.state.ah(), 0x41);

    cpu.state.set_ah(0x84);
    cpu.step();
    assert_eq!(cpu.state.flags, Flags::IF | Flags::SF | Flags::PF);
}

#[test]
fn far_call_and_return_with_pop_count() {
    // call 0000:0200 ; ... ; 0200: retf 4
    let mut cpu = cpu_with_program(&[0x9A, 0x00, 0x02, 0x00, 0x00]);
    cpu.mem.load(0x200, &[0xCA, 0x04, 0x00]).unwrap();

    cpu.step();
    assert_eq!((cpu.state.cs(), cpu.state.ip), (0, 0x200));
    assert_eq!(cpu.state.sp(), 0x0FFC);
    assert_eq!(cpu.mem.read_u16(0x0FFC), 0x105);
    assert_eq!(cpu.mem.read_u16(0x0FFE), 0);

    cpu.step();
    assert_eq!(cpu.state.ip, 0x105);
    assert_eq!(cpu.state.sp(), 0x1004);
}

#[test]
fn near_return_with_pop_count() {
    // call +0 ; ret 6
    let mut cpu = cpu_with_program(&[0xE8, 0x00, 0x00, 0xC2, 0x06, 0x00]);
    steps(&mut cpu, 2);
    assert_eq!(cpu.state.ip, 0x103);
    assert_eq!(cpu.state.sp(), 0x1006);
}

#[test]
fn lds_loads_pointer_and_data_segment() {
    // lds si, [0x400]
    let mut cpu = cpu_with_program(&[0xC5, 0x36, 0x00, 0x04]);
    cpu.mem.load(0x400, &[0x78, 0x56, 0x00, 0x30]).unwrap();

    cpu.step();
    assert_eq!(cpu.state.si(), 0x5678);
    assert_eq!(cpu.state.ds(), 0x3000);
}

#[test]
fn decimal_and_ascii_adjusts() {
    // (program, expected AX, expected CF)
    let cases: [(&[u8], u16, bool); 4] = [
        // mov al, 15h ; add al, 27h ; daa
        (&[0xB0, 0x15, 0x04, 0x27, 0x27], 0x0042, false),
        // mov al, 42h ; sub al, 27h ; das
        (&[0xB0, 0x42, 0x2C, 0x27, 0x2F], 0x0015, false),
        // mov ax, 9 ; add al, 3 ; aaa
        (&[0xB8, 0x09, 0x00, 0x04, 0x03, 0x37], 0x0102, true),
        // mov ax, 0102h ; sub al, 3 ; aas
        (&[0xB8, 0x02, 0x01, 0x2C, 0x03, 0x3F], 0x0009, true),
    ];
    for (program, ax, cf) in cases {
        let mut cpu = cpu_with_program(program);
        steps(&mut cpu, 3);
        assert_eq!(cpu.state.ax(), ax, "{program:02X?}");
        assert_eq!(cpu.state.flag(Flags::CF), cf, "{program:02X?}");
    }
}

#[test]
fn xchg_register_and_memory_forms() {
    // xchg ax, bx ; xchg cx, ax ; xchg al, [0x400]
    let mut cpu = cpu_with_program(&[0x87, 0xD8, 0x91, 0x86, 0x06, 0x00, 0x04]);
    cpu.state.set_ax(0x1111);
    cpu.state.set_bx(0x2222);
    cpu.state.set_cx(0x3333);
    cpu.mem.write_u8(0x400, 0x99);

    cpu.step();
    assert_eq!((cpu.state.ax(), cpu.state.bx()), (0x2222, 0x1111));

    cpu.step();
    assert_eq!((cpu.state.ax(), cpu.state.cx()), (0x3333, 0x2222));

    cpu.step();
    assert_eq!(cpu.state.al(), 0x99);
    assert_eq!(cpu.mem.read_u8(0x400), 0x33);
}

#[test]
fn rotate_through_carry_by_cl() {
    // rcl ax, cl ; rcr ax, cl
    let mut cpu = cpu_with_program(&[0xD3, 0xD0, 0xD3, 0xD8]);
    cpu.state.set_ax(0x8001);
    cpu.state.set_cx(2);
    cpu.state.flags = Flags::CF;

    cpu.step();
    assert_eq!(cpu.state.ax(), 0x0007);
    assert!(!cpu.state.flag(Flags::CF));

    cpu.step();
    assert_eq!(cpu.state.ax(), 0x8001);
    assert!(cpu.state.flag(Flags::CF));
}
