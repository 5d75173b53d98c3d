use tracing::trace;

use crate::bus::IoBus;
use crate::decode::{decode, Instruction, Operand, Prefixes, RepPrefix, QUEUE_LEN};
use crate::mem::Memory;
use crate::mnemonic::mnemonic;
use crate::state::{seg_off, CpuState, Flags, SegReg, Width};

/// Clock cycles consumed per idle step while halted.
pub const HALT_IDLE_CLOCKS: u32 = 4;

const MAX_PREFIXES: u16 = 16;

/// Clock cycles per timer input tick.
const CLOCKS_PER_TICK: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Executed,
    /// The core is halted and waiting for an interrupt.
    Halted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunExit {
    /// The instruction budget was exhausted.
    Completed { executed: u64 },
    /// The core executed `HLT` (or was already halted).
    Halted { executed: u64 },
}

impl RunExit {
    pub fn executed(&self) -> u64 {
        match *self {
            RunExit::Completed { executed } | RunExit::Halted { executed } => executed,
        }
    }
}

/// The 16-bit core. Owns physical memory and drives the chipset through `B`.
pub struct Cpu<B> {
    pub state: CpuState,
    pub mem: Memory,
    bus: B,
    queue: [u8; QUEUE_LEN],
    /// Cycles not yet converted into timer ticks.
    clocks: u32,
    total_cycles: u64,
    halted: bool,
    /// Set while a repeated string instruction has iterations left; the
    /// next step re-enters it without charging the prefixes again.
    rep_resume: bool,
}

impl<B: IoBus> Cpu<B> {
    pub fn new(bus: B) -> Self {
        Self::with_memory(bus, Memory::new())
    }

    pub fn with_memory(bus: B, mem: Memory) -> Self {
        Self {
            state: CpuState::new(),
            mem,
            bus,
            queue: [0; QUEUE_LEN],
            clocks: 0,
            total_cycles: 0,
            halted: false,
            rep_resume: false,
        }
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    pub fn into_parts(self) -> (CpuState, Memory, B) {
        (self.state, self.mem, self.bus)
    }

    /// Cycles charged but not yet turned into timer ticks (always below 4
    /// between steps).
    pub fn clocks(&self) -> u32 {
        self.clocks
    }

    /// Cycles consumed since construction or the last [`Cpu::reset`].
    pub fn total_cycles(&self) -> u64 {
        self.total_cycles
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn queue(&self) -> &[u8; QUEUE_LEN] {
        &self.queue
    }

    /// Processor reset. General registers and memory keep their contents.
    pub fn reset(&mut self) {
        self.state.reset();
        self.queue = [0; QUEUE_LEN];
        self.clocks = 0;
        self.total_cycles = 0;
        self.halted = false;
        self.rep_resume = false;
    }

    /// Execute up to `max` steps (`0` means no limit), stopping early on halt.
    pub fn run(&mut self, max: u64, trace: bool) -> RunExit {
        let mut executed = 0u64;
        while max == 0 || executed < max {
            match self.step_traced(trace) {
                StepOutcome::Executed => executed += 1,
                StepOutcome::Halted => return RunExit::Halted { executed },
            }
        }
        RunExit::Completed { executed }
    }

    /// Decode and execute one instruction, or one iteration of a repeated
    /// string instruction.
    pub fn step(&mut self) -> StepOutcome {
        self.step_traced(false)
    }

    fn step_traced(&mut self, trace: bool) -> StepOutcome {
        if self.halted {
            if !(self.state.flag(Flags::IF) && self.bus.interrupt_pending()) {
                self.charge(HALT_IDLE_CLOCKS);
                self.drain_clocks();
                return StepOutcome::Halted;
            }
            self.halted = false;
        }

        if self.state.flag(Flags::TF) {
            self.interrupt(1);
            self.charge(50);
        }
        if self.state.flag(Flags::IF) && self.bus.interrupt_pending() {
            if let Some(vector) = self.bus.acknowledge_interrupt() {
                self.interrupt(vector);
                self.charge(61);
            }
        }

        let start_ip = self.state.ip;
        let prefixes = self.scan_prefixes();
        self.fill_queue();
        let insn = decode(&self.queue, &self.state, prefixes);
        if trace {
            let reg = insn.modrm.map_or(0, |m| m.reg);
            trace!(
                "{:04X}:{:04X} {:02X} {}",
                self.state.cs(),
                self.state.ip,
                insn.opcode,
                mnemonic(insn.opcode, reg)
            );
        }
        self.state.ip = self.state.ip.wrapping_add(insn.len);

        let outcome = if prefixes.rep != RepPrefix::None && is_string_op(insn.opcode) {
            self.execute_repeated(&insn, start_ip)
        } else {
            self.execute(&insn)
        };
        self.drain_clocks();
        outcome
    }

    fn scan_prefixes(&mut self) -> Prefixes {
        let mut prefixes = Prefixes::default();
        let mut cost = 0;
        while prefixes.len < MAX_PREFIXES {
            let byte = self.mem.read_u8(self.state.phys_ip());
            let Some(c) = prefixes.absorb(byte) else {
                break;
            };
            cost += c;
            self.state.ip = self.state.ip.wrapping_add(1);
        }
        if !self.rep_resume {
            self.charge(cost);
        }
        self.rep_resume = false;
        prefixes
    }

    fn fill_queue(&mut self) {
        let cs = self.state.cs();
        for (i, slot) in self.queue.iter_mut().enumerate() {
            *slot = self
                .mem
                .read_u8(seg_off(cs, self.state.ip.wrapping_add(i as u16)));
        }
    }

    fn execute_repeated(&mut self, insn: &Instruction, restart_ip: u16) -> StepOutcome {
        let cx = self.state.cx();
        if cx == 0 {
            return StepOutcome::Executed;
        }
        self.state.set_cx(cx - 1);
        self.execute(insn);

        let zf = self.state.flag(Flags::ZF);
        let terminated = matches!(insn.opcode, 0xA6 | 0xA7 | 0xAE | 0xAF)
            && match insn.prefixes.rep {
                RepPrefix::RepE => !zf,
                RepPrefix::RepNe => zf,
                RepPrefix::None => true,
            };
        if self.state.cx() != 0 && !terminated {
            self.state.ip = restart_ip;
            self.rep_resume = true;
        }
        StepOutcome::Executed
    }

    pub(crate) fn halt(&mut self) {
        self.halted = true;
    }

    pub(crate) fn charge(&mut self, cycles: u32) {
        self.clocks += cycles;
        self.total_cycles += u64::from(cycles);
    }

    fn drain_clocks(&mut self) {
        while self.clocks >= CLOCKS_PER_TICK {
            self.clocks -= CLOCKS_PER_TICK;
            self.bus.tick();
        }
    }

    pub(crate) fn io_read(&mut self, port: u16, width: Width) -> u16 {
        self.bus.io_read(port, width)
    }

    pub(crate) fn io_write(&mut self, port: u16, width: Width, value: u16) {
        self.bus.io_write(port, width, value)
    }

    /// Save FLAGS/CS/IP and vector through the table at physical address 0.
    pub fn interrupt(&mut self, vector: u8) {
        self.push16(self.state.flags.bits());
        self.state.flags.remove(Flags::IF | Flags::TF);
        self.push16(self.state.cs());
        self.push16(self.state.ip);

        let entry = u32::from(vector) * 4;
        self.state.ip = self.mem.read_u16(entry);
        let cs = self.mem.read_u16(entry + 2);
        self.state.set_seg(SegReg::Cs, cs);
        self.rep_resume = false;
    }

    fn load16(&self, seg: u16, off: u16) -> u16 {
        let lo = self.mem.read_u8(seg_off(seg, off));
        let hi = self.mem.read_u8(seg_off(seg, off.wrapping_add(1)));
        u16::from_le_bytes([lo, hi])
    }

    fn store16(&mut self, seg: u16, off: u16, val: u16) {
        let [lo, hi] = val.to_le_bytes();
        self.mem.write_u8(seg_off(seg, off), lo);
        self.mem.write_u8(seg_off(seg, off.wrapping_add(1)), hi);
    }

    pub fn push16(&mut self, val: u16) {
        let sp = self.state.sp().wrapping_sub(2);
        self.state.set_sp(sp);
        self.store16(self.state.ss(), sp, val);
    }

    pub fn pop16(&mut self) -> u16 {
        let sp = self.state.sp();
        let val = self.load16(self.state.ss(), sp);
        self.state.set_sp(sp.wrapping_add(2));
        val
    }

    /// Guest data read. Word accesses at odd offsets cost four extra cycles;
    /// the high byte wraps within the segment.
    pub fn read_mem(&mut self, seg: SegReg, off: u16, width: Width) -> u16 {
        let base = self.state.seg(seg);
        match width {
            Width::Byte => u16::from(self.mem.read_u8(seg_off(base, off))),
            Width::Word => {
                if off & 1 != 0 {
                    self.charge(4);
                }
                self.load16(base, off)
            }
        }
    }

    pub fn write_mem(&mut self, seg: SegReg, off: u16, width: Width, val: u16) {
        let base = self.state.seg(seg);
        match width {
            Width::Byte => self.mem.write_u8(seg_off(base, off), val as u8),
            Width::Word => {
                if off & 1 != 0 {
                    self.charge(4);
                }
                self.store16(base, off, val);
            }
        }
    }

    pub(crate) fn read_operand(&mut self, op: Operand, width: Width) -> u16 {
        match op {
            Operand::Reg(index) => self.state.reg(index, width),
            Operand::Mem { seg, offset } => self.read_mem(seg, offset, width),
        }
    }

    pub(crate) fn write_operand(&mut self, op: Operand, width: Width, val: u16) {
        match op {
            Operand::Reg(index) => self.state.set_reg(index, width, val),
            Operand::Mem { seg, offset } => self.write_mem(seg, offset, width, val),
        }
    }
}

pub fn is_string_op(opcode: u8) -> bool {
    matches!(opcode, 0xA4..=0xA7 | 0xAA..=0xAF)
}
