// SPDX-License-Identifier: MPL-2.0

//! Encoding and decoding of the AArch64 unconditional branch (`B imm26`).
//!
//! The instruction is a little-endian 32-bit word. Bits [26, 32) hold the
//! opcode `0b000101` and bits [0, 26) hold a signed offset counted in
//! instructions (4 bytes each), relative to the branch itself.

use crate::error::{PatchError, Result};

/// The opcode of `B imm26`, i.e., bits [26, 32) of the instruction.
pub const BRANCH_OPCODE: u32 = 0b000101;

/// The top byte of a forward `B imm26` whose offset is below `1 << 24`.
///
/// Images are classified by looking for this byte in the last byte of an
/// instruction slot.
pub const BRANCH_OPCODE_BYTE: u8 = 0x14;

const OPCODE_SHIFT: u32 = 26;
const OFFSET_MASK: u32 = (1 << OPCODE_SHIFT) - 1;
const OFFSET_MIN: i32 = -(1 << (OPCODE_SHIFT - 1));
const OFFSET_MAX: i32 = (1 << (OPCODE_SHIFT - 1)) - 1;

/// Splits an instruction word into its opcode and its sign-extended offset.
pub fn decode_branch(word: u32) -> (u32, i32) {
    let opcode = word >> OPCODE_SHIFT;
    // Move the 26-bit field to the top and shift it back arithmetically.
    let offset = ((word << (32 - OPCODE_SHIFT)) as i32) >> (32 - OPCODE_SHIFT);
    (opcode, offset)
}

/// Builds `B offset`, or returns `None` if `offset` does not fit in 26 bits.
pub fn encode_branch(offset: i32) -> Option<u32> {
    if !(OFFSET_MIN..=OFFSET_MAX).contains(&offset) {
        return None;
    }
    Some((BRANCH_OPCODE << OPCODE_SHIFT) | (offset as u32 & OFFSET_MASK))
}

/// Returns whether the instruction slot holds a branch opcode byte.
pub fn is_branch(slot: &[u8]) -> bool {
    slot.get(3) == Some(&BRANCH_OPCODE_BYTE)
}

/// Re-targets a branch that is moved by `delta` instructions so that it
/// still lands on the same address.
///
/// Moving a branch one slot forward means its offset shrinks by one, so the
/// caller passes `-1`; moving it back passes `1`.
pub fn relocate_branch(word: u32, delta: i32) -> Result<u32> {
    let (_, offset) = decode_branch(word);
    offset
        .checked_add(delta)
        .and_then(encode_branch)
        .ok_or_else(|| {
            PatchError::Format(format!(
                "branch offset {} cannot be moved by {} instruction(s)",
                offset, delta
            ))
        })
}
