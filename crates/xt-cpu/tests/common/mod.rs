#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};

use xt_cpu::{Cpu, IoBus, SegReg, Width};

/// Load address of test programs (`0000:0100`).
pub const CODE: u32 = 0x0100;

/// Port-recording bus with a scripted interrupt queue.
#[derive(Debug, Default)]
pub struct TestBus {
    pub ports: HashMap<u16, u16>,
    pub writes: Vec<(u16, Width, u16)>,
    pub ticks: u64,
    pub pending: VecDeque<u8>,
}

impl IoBus for TestBus {
    fn io_read(&mut self, port: u16, width: Width) -> u16 {
        self.ports.get(&port).copied().unwrap_or(0) & width.mask()
    }

    fn io_write(&mut self, port: u16, width: Width, value: u16) {
        self.writes.push((port, width, value));
        self.ports.insert(port, value);
    }

    fn tick(&mut self) {
        self.ticks += 1;
    }

    fn interrupt_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    fn acknowledge_interrupt(&mut self) -> Option<u8> {
        self.pending.pop_front()
    }
}

/// Core with `code` at `0000:0100`, all data segments at 0 and the stack
/// at `0000:1000`.
pub fn cpu_with_program(code: &[u8]) -> Cpu<TestBus> {
    let mut cpu = Cpu::new(TestBus::default());
    cpu.mem.load(CODE, code).unwrap();
    cpu.state.set_seg(SegReg::Cs, 0);
    cpu.state.ip = CODE as u16;
    cpu.state.set_sp(0x1000);
    cpu
}

/// Point interrupt vector `vector` at `0000:handler`.
pub fn install_vector<B: IoBus>(cpu: &mut Cpu<B>, vector: u8, handler: u16) {
    let entry = u32::from(vector) * 4;
    cpu.mem.write_u16(entry, handler);
    cpu.mem.write_u16(entry + 2, 0);
}

pub fn steps<B: IoBus>(cpu: &mut Cpu<B>, n: usize) {
    for _ in 0..n {
        cpu.step();
    }
}
