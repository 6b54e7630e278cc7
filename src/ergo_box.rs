//! The box/register binary container (spec.md §3, §4.D): the deterministic
//! object whose digest is the message fed into the Fiat-Shamir transcript
//! when signing a transaction input rather than an arbitrary message.
//!
//! Wire layout grounded on [`crate::linear_relation`]'s `label()`: a
//! self-delimiting sequence of manually assembled little-endian fields, no
//! external serde framework.

use crate::errors::Error;
use crate::hash;
use crate::varint;

/// Maximum serialized size of a box (spec.md §4.D "OversizeBox").
pub const MAX_BOX_SIZE: usize = 4 * 1024;

/// A 32-byte token identifier.
pub type TokenId = [u8; 32];

/// A closed set of register slots (spec.md §9 "Polymorphism": `RegisterId`
/// is a closed sum type). R0..R3 are mandatory and derived from the other
/// box fields; R4..R9 hold up to six user-supplied constants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegisterId {
    /// Monetary value.
    R0,
    /// Guarding script bytes.
    R1,
    /// Token list.
    R2,
    /// Creation-info tuple (height, transactionId ‖ index).
    R3,
    /// First non-mandatory slot.
    R4,
    /// Second non-mandatory slot.
    R5,
    /// Third non-mandatory slot.
    R6,
    /// Fourth non-mandatory slot.
    R7,
    /// Fifth non-mandatory slot.
    R8,
    /// Sixth non-mandatory slot.
    R9,
}

impl RegisterId {
    /// The non-mandatory slots, in ascending order — the only ones a box
    /// may carry a user constant in.
    pub const NON_MANDATORY: [RegisterId; 6] = [
        RegisterId::R4,
        RegisterId::R5,
        RegisterId::R6,
        RegisterId::R7,
        RegisterId::R8,
        RegisterId::R9,
    ];

    /// This register's position (0..=9) in the R0..R9 sequence.
    pub fn index(self) -> u8 {
        match self {
            RegisterId::R0 => 0,
            RegisterId::R1 => 1,
            RegisterId::R2 => 2,
            RegisterId::R3 => 3,
            RegisterId::R4 => 4,
            RegisterId::R5 => 5,
            RegisterId::R6 => 6,
            RegisterId::R7 => 7,
            RegisterId::R8 => 8,
            RegisterId::R9 => 9,
        }
    }

    /// Whether this is one of the six user-definable non-mandatory slots.
    pub fn is_non_mandatory(self) -> bool {
        self.index() >= 4
    }
}

impl TryFrom<u8> for RegisterId {
    type Error = Error;

    /// Fails with [`Error::RegisterOverflow`] outside `0..=9`.
    fn try_from(value: u8) -> Result<Self, Error> {
        match value {
            0 => Ok(RegisterId::R0),
            1 => Ok(RegisterId::R1),
            2 => Ok(RegisterId::R2),
            3 => Ok(RegisterId::R3),
            4 => Ok(RegisterId::R4),
            5 => Ok(RegisterId::R5),
            6 => Ok(RegisterId::R6),
            7 => Ok(RegisterId::R7),
            8 => Ok(RegisterId::R8),
            9 => Ok(RegisterId::R9),
            _ => Err(Error::RegisterOverflow),
        }
    }
}

/// A typed constant stored in a non-mandatory register, standing in for
/// "the script collaborator's value serializer" (spec.md §4.D item 6) with
/// the primitive shapes that collaborator actually supports.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegisterValue {
    /// A boolean constant.
    Boolean(bool),
    /// A 32-bit signed integer constant.
    Int(i32),
    /// A 64-bit signed integer constant.
    Long(i64),
    /// An opaque byte-array constant.
    ByteArray(Vec<u8>),
}

impl RegisterValue {
    fn write_bytes(&self, out: &mut Vec<u8>) {
        match self {
            RegisterValue::Boolean(b) => {
                out.push(0);
                out.push(u8::from(*b));
            }
            RegisterValue::Int(v) => {
                out.push(1);
                varint::write_u64(zigzag_encode(i64::from(*v)), out);
            }
            RegisterValue::Long(v) => {
                out.push(2);
                varint::write_u64(zigzag_encode(*v), out);
            }
            RegisterValue::ByteArray(bytes) => {
                out.push(3);
                varint::write_u64(bytes.len() as u64, out);
                out.extend_from_slice(bytes);
            }
        }
    }

    fn read_bytes(data: &[u8]) -> Result<(RegisterValue, &[u8]), Error> {
        let (tag, rest) = data.split_first().ok_or(Error::MalformedProof)?;
        match tag {
            0 => {
                let (b, rest) = rest.split_first().ok_or(Error::MalformedProof)?;
                Ok((RegisterValue::Boolean(*b != 0), rest))
            }
            1 => {
                let (raw, rest) = varint::read_u64(rest)?;
                Ok((RegisterValue::Int(zigzag_decode(raw) as i32), rest))
            }
            2 => {
                let (raw, rest) = varint::read_u64(rest)?;
                Ok((RegisterValue::Long(zigzag_decode(raw)), rest))
            }
            3 => {
                let (len, rest) = varint::read_u64(rest)?;
                let len = len as usize;
                if rest.len() < len {
                    return Err(Error::MalformedProof);
                }
                Ok((RegisterValue::ByteArray(rest[..len].to_vec()), &rest[len..]))
            }
            _ => Err(Error::MalformedProof),
        }
    }
}

/// Sorts `registers` by slot and checks they form a dense run starting at
/// `R4`, returning the values in ascending-slot order. Rejects duplicate
/// slots, mandatory-slot entries, and gaps (spec.md §4.D "Missing
/// intermediate slots are an error").
fn pack_registers(mut registers: Vec<(RegisterId, RegisterValue)>) -> Result<Vec<RegisterValue>, Error> {
    registers.sort_by_key(|(id, _)| id.index());
    let mut out = Vec::with_capacity(registers.len());
    let mut expected = RegisterId::R4.index();
    for (id, value) in registers {
        if !id.is_non_mandatory() {
            return Err(Error::PackingViolation);
        }
        if id.index() != expected {
            return Err(Error::PackingViolation);
        }
        out.push(value);
        expected += 1;
    }
    Ok(out)
}

fn zigzag_encode(v: i64) -> u64 {
    ((v << 1) ^ (v >> 63)) as u64
}

fn zigzag_decode(v: u64) -> i64 {
    ((v >> 1) as i64) ^ -((v & 1) as i64)
}

/// An immutable UTXO box (spec.md §3 "ErgoBox"): amount, guarding script,
/// creation height, colocated tokens, and up to six non-mandatory typed
/// registers.
#[derive(Clone, Debug, PartialEq)]
pub struct ErgoBox {
    value: u64,
    script_bytes: Vec<u8>,
    creation_height: u32,
    tokens: Vec<(TokenId, u64)>,
    /// Non-mandatory registers, in ascending `RegisterId` order, densely
    /// packed from `R4`.
    registers: Vec<RegisterValue>,
    transaction_id: [u8; 32],
    index: u16,
}

impl ErgoBox {
    /// Builds a box from a possibly sparse set of non-mandatory registers,
    /// checking the invariants spec.md §3/§4.D place on construction: at
    /// most 255 tokens, at most six non-mandatory registers, and those
    /// registers densely packed from `R4` upward (spec.md §8 scenario 6:
    /// `R4` absent while `R5` is present is a [`PackingViolation`](Error::PackingViolation)).
    pub fn new(
        value: u64,
        script_bytes: Vec<u8>,
        creation_height: u32,
        tokens: Vec<(TokenId, u64)>,
        registers: Vec<(RegisterId, RegisterValue)>,
        transaction_id: [u8; 32],
        index: u16,
    ) -> Result<Self, Error> {
        if tokens.len() > 255 {
            return Err(Error::TooManyTokens);
        }
        if registers.len() > RegisterId::NON_MANDATORY.len() {
            return Err(Error::RegisterOverflow);
        }
        let dense = pack_registers(registers)?;
        let boxed = ErgoBox {
            value,
            script_bytes,
            creation_height,
            tokens,
            registers: dense,
            transaction_id,
            index,
        };
        boxed.serialize()?;
        Ok(boxed)
    }

    /// Reads register `id` (spec.md §4.D "Non-mandatory registers are
    /// exposed read-side through `get(regId)`").
    pub fn get(&self, id: RegisterId) -> Option<RegisterValue> {
        match id {
            RegisterId::R0 => Some(RegisterValue::Long(self.value as i64)),
            RegisterId::R1 => Some(RegisterValue::ByteArray(self.script_bytes.clone())),
            RegisterId::R2 => {
                let mut out = Vec::new();
                varint::write_u64(self.tokens.len() as u64, &mut out);
                for (id, amount) in &self.tokens {
                    out.extend_from_slice(id);
                    varint::write_u64(*amount, &mut out);
                }
                Some(RegisterValue::ByteArray(out))
            }
            RegisterId::R3 => {
                let mut out = Vec::new();
                out.extend_from_slice(&self.creation_height.to_le_bytes());
                out.extend_from_slice(&self.transaction_id);
                out.extend_from_slice(&self.index.to_le_bytes());
                Some(RegisterValue::ByteArray(out))
            }
            non_mandatory => {
                let slot = (non_mandatory.index() - RegisterId::R4.index()) as usize;
                self.registers.get(slot).cloned()
            }
        }
    }

    /// Serializes this box per spec.md §4.D, failing with
    /// [`Error::OversizeBox`] if the result exceeds [`MAX_BOX_SIZE`].
    pub fn serialize(&self) -> Result<Vec<u8>, Error> {
        let mut out = Vec::new();
        varint::write_u64(self.value, &mut out);
        varint::write_u64(self.script_bytes.len() as u64, &mut out);
        out.extend_from_slice(&self.script_bytes);
        varint::write_u32(self.creation_height, &mut out);

        if self.tokens.len() > 255 {
            return Err(Error::TooManyTokens);
        }
        out.push(self.tokens.len() as u8);
        for (id, amount) in &self.tokens {
            out.extend_from_slice(id);
            varint::write_u64(*amount, &mut out);
        }

        if self.registers.len() > RegisterId::NON_MANDATORY.len() {
            return Err(Error::RegisterOverflow);
        }
        out.push(self.registers.len() as u8);
        for reg in &self.registers {
            reg.write_bytes(&mut out);
        }

        out.extend_from_slice(&self.transaction_id);
        out.extend_from_slice(&self.index.to_le_bytes());

        if out.len() > MAX_BOX_SIZE {
            return Err(Error::OversizeBox(out.len()));
        }
        Ok(out)
    }

    /// Parses a box serialized by [`ErgoBox::serialize`]. Unlike the proof
    /// parser, `scriptBytes` here is self-delimiting (length-prefixed):
    /// spec.md §4.D treats its true length as determined by an external
    /// ErgoTree header this core never sees, so a self-contained round trip
    /// needs its own delimiter.
    pub fn parse(data: &[u8]) -> Result<ErgoBox, Error> {
        if data.len() > MAX_BOX_SIZE {
            return Err(Error::OversizeBox(data.len()));
        }
        let (value, data) = varint::read_u64(data)?;
        let (script_len, data) = varint::read_u64(data)?;
        let script_len = script_len as usize;
        if data.len() < script_len {
            return Err(Error::MalformedProof);
        }
        let script_bytes = data[..script_len].to_vec();
        let data = &data[script_len..];
        let (creation_height, data) = varint::read_u32(data)?;

        let (&token_count, data) = data.split_first().ok_or(Error::MalformedProof)?;
        let mut tokens = Vec::with_capacity(token_count as usize);
        let mut data = data;
        for _ in 0..token_count {
            if data.len() < 32 {
                return Err(Error::MalformedProof);
            }
            let mut id = [0u8; 32];
            id.copy_from_slice(&data[..32]);
            data = &data[32..];
            let (amount, rest) = varint::read_u64(data)?;
            data = rest;
            tokens.push((id, amount));
        }

        let (&reg_count, data) = data.split_first().ok_or(Error::MalformedProof)?;
        if reg_count as usize > RegisterId::NON_MANDATORY.len() {
            return Err(Error::RegisterOverflow);
        }
        let mut registers = Vec::with_capacity(reg_count as usize);
        let mut data = data;
        for slot in 0..reg_count {
            let (value, rest) = RegisterValue::read_bytes(data)?;
            let id = RegisterId::try_from(RegisterId::R4.index() + slot)?;
            registers.push((id, value));
            data = rest;
        }

        if data.len() < 32 + 2 {
            return Err(Error::MalformedProof);
        }
        let mut transaction_id = [0u8; 32];
        transaction_id.copy_from_slice(&data[..32]);
        let index = u16::from_le_bytes([data[32], data[33]]);

        ErgoBox::new(
            value,
            script_bytes,
            creation_height,
            tokens,
            registers,
            transaction_id,
            index,
        )
    }

    /// The box's identity: the hash of its full serialized image, including
    /// the transactionId ‖ index suffix (spec.md §4.D, §6).
    pub fn id(&self) -> Result<[u8; 32], Error> {
        Ok(hash::hash(&self.serialize()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_box(registers: Vec<(RegisterId, RegisterValue)>) -> ErgoBox {
        ErgoBox::new(
            100,
            Vec::new(),
            0,
            vec![([7u8; 32], 500)],
            registers,
            [9u8; 32],
            0,
        )
        .unwrap()
    }

    #[test]
    fn round_trips_through_serialize_and_parse() {
        let b = sample_box(vec![(RegisterId::R4, RegisterValue::Int(7))]);
        let bytes = b.serialize().unwrap();
        let parsed = ErgoBox::parse(&bytes).unwrap();
        assert_eq!(b, parsed);
    }

    #[test]
    fn id_matches_hash_of_serialized_bytes() {
        let b = sample_box(vec![(RegisterId::R4, RegisterValue::Int(7))]);
        let bytes = b.serialize().unwrap();
        assert_eq!(b.id().unwrap(), hash::hash(&bytes));
    }

    #[test]
    fn id_depends_on_every_byte() {
        let a = sample_box(vec![(RegisterId::R4, RegisterValue::Int(7))]);
        let b = sample_box(vec![(RegisterId::R4, RegisterValue::Int(8))]);
        assert_ne!(a.id().unwrap(), b.id().unwrap());
    }

    #[test]
    fn r4_register_reads_back() {
        let b = sample_box(vec![(RegisterId::R4, RegisterValue::Int(7))]);
        assert_eq!(b.get(RegisterId::R4), Some(RegisterValue::Int(7)));
        assert_eq!(b.get(RegisterId::R5), None);
    }

    #[test]
    fn gap_in_registers_is_packing_violation() {
        let result = ErgoBox::new(
            100,
            Vec::new(),
            0,
            Vec::new(),
            vec![(RegisterId::R5, RegisterValue::Int(8))],
            [9u8; 32],
            0,
        );
        assert!(matches!(result, Err(Error::PackingViolation)));
    }

    #[test]
    fn too_many_tokens_is_rejected() {
        let tokens = vec![([1u8; 32], 1); 256];
        let result = ErgoBox::new(1, Vec::new(), 0, tokens, Vec::new(), [0u8; 32], 0);
        assert!(matches!(result, Err(Error::TooManyTokens)));
    }

    #[test]
    fn too_many_registers_is_rejected() {
        let registers: Vec<_> = RegisterId::NON_MANDATORY
            .iter()
            .chain(std::iter::once(&RegisterId::R4))
            .map(|&id| (id, RegisterValue::Boolean(true)))
            .collect();
        let result = ErgoBox::new(1, Vec::new(), 0, Vec::new(), registers, [0u8; 32], 0);
        assert!(matches!(result, Err(Error::RegisterOverflow)));
    }

    #[test]
    fn register_id_rejects_out_of_range() {
        assert!(RegisterId::try_from(10).is_err());
        assert_eq!(RegisterId::try_from(4), Ok(RegisterId::R4));
    }
}
