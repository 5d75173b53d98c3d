//! Flag-producing arithmetic primitives shared by the executor.

use crate::state::{Flags, Width};

pub fn parity(byte: u8) -> bool {
    byte.count_ones() % 2 == 0
}

/// Set SF, ZF and PF from `result`. PF only looks at the low byte.
pub fn update_szp(flags: &mut Flags, result: u16, width: Width) {
    let result = result & width.mask();
    flags.set(Flags::ZF, result == 0);
    flags.set(Flags::SF, result & width.sign_bit() != 0);
    flags.set(Flags::PF, parity(result as u8));
}

pub fn add_with_flags(flags: &mut Flags, dest: u16, src: u16, carry_in: bool, width: Width) -> u16 {
    let mask = width.mask();
    let dest = dest & mask;
    let src = src & mask;
    let full = u32::from(dest) + u32::from(src) + u32::from(carry_in);
    let result = full as u16 & mask;

    let sb = width.sign_bit();
    flags.set(Flags::CF, full > u32::from(mask));
    flags.set(Flags::OF, (dest ^ result) & (src ^ result) & sb != 0);
    flags.set(Flags::AF, (dest ^ src ^ result) & 0x10 != 0);
    update_szp(flags, result, width);

    result
}

pub fn sub_with_flags(flags: &mut Flags, dest: u16, src: u16, borrow_in: bool, width: Width) -> u16 {
    let mask = width.mask();
    let dest = dest & mask;
    let src = src & mask;
    let subtrahend = u32::from(src) + u32::from(borrow_in);
    let result = u32::from(dest).wrapping_sub(subtrahend) as u16 & mask;

    let sb = width.sign_bit();
    flags.set(Flags::CF, u32::from(dest) < subtrahend);
    flags.set(Flags::OF, (dest ^ src) & (dest ^ result) & sb != 0);
    flags.set(Flags::AF, (dest ^ src ^ result) & 0x10 != 0);
    update_szp(flags, result, width);

    result
}

/// Increment by one. CF is preserved.
pub fn inc_with_flags(flags: &mut Flags, dest: u16, width: Width) -> u16 {
    let dest = dest & width.mask();
    let result = dest.wrapping_add(1) & width.mask();

    flags.set(Flags::OF, result == width.sign_bit());
    flags.set(Flags::AF, (dest ^ result ^ 1) & 0x10 != 0);
    update_szp(flags, result, width);

    result
}

/// Decrement by one. CF is preserved.
pub fn dec_with_flags(flags: &mut Flags, dest: u16, width: Width) -> u16 {
    let dest = dest & width.mask();
    let result = dest.wrapping_sub(1) & width.mask();

    flags.set(Flags::OF, result == width.sign_bit() - 1);
    flags.set(Flags::AF, (dest ^ result ^ 1) & 0x10 != 0);
    update_szp(flags, result, width);

    result
}

pub fn logic_with_flags(flags: &mut Flags, result: u16, width: Width) -> u16 {
    let result = result & width.mask();

    flags.remove(Flags::CF | Flags::OF);
    update_szp(flags, result, width);

    result
}

/// The eight two-operand ALU operations selected by bits 3..=5 of the
/// opcode (or the `reg` field of the 0x80..=0x83 group).
///
/// Returns `None` for CMP, which only updates flags.
pub fn binary_op(flags: &mut Flags, op: u8, dest: u16, src: u16, width: Width) -> Option<u16> {
    let carry = flags.contains(Flags::CF);
    let result = match op & 7 {
        0 => add_with_flags(flags, dest, src, false, width),
        1 => logic_with_flags(flags, dest | src, width),
        2 => add_with_flags(flags, dest, src, carry, width),
        3 => sub_with_flags(flags, dest, src, carry, width),
        4 => logic_with_flags(flags, dest & src, width),
        5 => sub_with_flags(flags, dest, src, false, width),
        6 => logic_with_flags(flags, dest ^ src, width),
        _ => {
            sub_with_flags(flags, dest, src, false, width);
            return None;
        }
    };
    Some(result)
}

/// Rotate/shift group (`0xD0..=0xD3`) selected by the `reg` field.
///
/// OF is only defined for single-bit counts; a zero count leaves both the
/// operand and the flags untouched. Sub-op 6 has no defined behavior and is
/// ignored.
pub fn shift_with_flags(flags: &mut Flags, op: u8, dest: u16, count: u8, width: Width) -> u16 {
    let mask = width.mask();
    let sb = width.sign_bit();
    let msb = |v: u16| v & sb != 0;
    let mut res = dest & mask;
    if count == 0 {
        return res;
    }

    match op & 7 {
        // ROL
        0 => {
            for _ in 0..count {
                let out = msb(res);
                res = ((res << 1) | u16::from(out)) & mask;
            }
            let cf = res & 1 != 0;
            flags.set(Flags::CF, cf);
            if count == 1 {
                flags.set(Flags::OF, msb(res) ^ cf);
            }
        }
        // ROR
        1 => {
            for _ in 0..count {
                let out = res & 1 != 0;
                res = (res >> 1) | if out { sb } else { 0 };
            }
            flags.set(Flags::CF, msb(res));
            if count == 1 {
                flags.set(Flags::OF, msb(res) ^ msb(res << 1));
            }
        }
        // RCL
        2 => {
            for _ in 0..count {
                let out = msb(res);
                res = ((res << 1) | u16::from(flags.contains(Flags::CF))) & mask;
                flags.set(Flags::CF, out);
            }
            if count == 1 {
                flags.set(Flags::OF, msb(res) ^ flags.contains(Flags::CF));
            }
        }
        // RCR
        3 => {
            if count == 1 {
                flags.set(Flags::OF, msb(res) ^ flags.contains(Flags::CF));
            }
            for _ in 0..count {
                let out = res & 1 != 0;
                res = (res >> 1) | if flags.contains(Flags::CF) { sb } else { 0 };
                flags.set(Flags::CF, out);
            }
        }
        // SHL/SAL
        4 => {
            for _ in 0..count {
                flags.set(Flags::CF, msb(res));
                res = (res << 1) & mask;
            }
            if count == 1 {
                flags.set(Flags::OF, msb(res) ^ flags.contains(Flags::CF));
            }
            update_szp(flags, res, width);
        }
        // SHR
        5 => {
            if count == 1 {
                flags.set(Flags::OF, msb(res));
            }
            for _ in 0..count {
                flags.set(Flags::CF, res & 1 != 0);
                res >>= 1;
            }
            update_szp(flags, res, width);
        }
        // SAR
        7 => {
            if count == 1 {
                flags.remove(Flags::OF);
            }
            let sign = res & sb;
            for _ in 0..count {
                flags.set(Flags::CF, res & 1 != 0);
                res = (res >> 1) | sign;
            }
            update_szp(flags, res, width);
        }
        _ => {}
    }

    res
}

/// Decimal adjust AL after addition.
pub fn daa(flags: &mut Flags, al: u8) -> u8 {
    let old_al = al;
    let old_cf = flags.contains(Flags::CF);
    let mut al = al;

    if al & 0x0F > 9 || flags.contains(Flags::AF) {
        let (sum, carry) = al.overflowing_add(6);
        al = sum;
        flags.set(Flags::CF, old_cf || carry);
        flags.insert(Flags::AF);
    } else {
        flags.remove(Flags::AF);
    }

    if old_al > 0x99 || old_cf {
        al = al.wrapping_add(0x60);
        flags.insert(Flags::CF);
    } else {
        flags.remove(Flags::CF);
    }

    update_szp(flags, u16::from(al), Width::Byte);
    al
}

/// Decimal adjust AL after subtraction.
pub fn das(flags: &mut Flags, al: u8) -> u8 {
    let old_al = al;
    let old_cf = flags.contains(Flags::CF);
    let mut al = al;

    if al & 0x0F > 9 || flags.contains(Flags::AF) {
        let (diff, borrow) = al.overflowing_sub(6);
        al = diff;
        flags.set(Flags::CF, old_cf || borrow);
        flags.insert(Flags::AF);
    } else {
        flags.remove(Flags::AF);
    }

    if old_al > 0x99 || old_cf {
        al = al.wrapping_sub(0x60);
        flags.insert(Flags::CF);
    } else {
        flags.remove(Flags::CF);
    }

    update_szp(flags, u16::from(al), Width::Byte);
    al
}

/// ASCII adjust after addition; operates on the whole of AX.
pub fn aaa(flags: &mut Flags, ax: u16) -> u16 {
    let [mut al, mut ah] = ax.to_le_bytes();
    if al & 0x0F > 9 || flags.contains(Flags::AF) {
        al = al.wrapping_add(6);
        ah = ah.wrapping_add(1);
        flags.insert(Flags::CF | Flags::AF);
    } else {
        flags.remove(Flags::CF | Flags::AF);
    }
    u16::from_le_bytes([al & 0x0F, ah])
}

/// ASCII adjust after subtraction; operates on the whole of AX.
pub fn aas(flags: &mut Flags, ax: u16) -> u16 {
    let [mut al, mut ah] = ax.to_le_bytes();
    if al & 0x0F > 9 || flags.contains(Flags::AF) {
        al = al.wrapping_sub(6);
        ah = ah.wrapping_sub(1);
        flags.insert(Flags::CF | Flags::AF);
    } else {
        flags.remove(Flags::CF | Flags::AF);
    }
    u16::from_le_bytes([al & 0x0F, ah])
}
