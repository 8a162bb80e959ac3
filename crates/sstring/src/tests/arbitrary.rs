use alloc::vec::Vec;

use quickcheck::{Arbitrary, Gen};

use crate::{GrowthPolicy, NPOS};

/// Bytes drawn from a tiny alphabet so that searches actually hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Bytes(pub(crate) Vec<u8>);

const ALPHABET: &[u8] = b"ab\0\\ ";

impl Arbitrary for Bytes {
    fn arbitrary(g: &mut Gen) -> Self {
        let len = usize::arbitrary(g) % 12;
        Self(
            (0..len)
                .map(|_| *g.choose(ALPHABET).unwrap_or(&b'a'))
                .collect(),
        )
    }

    fn shrink(&self) -> alloc::boxed::Box<dyn Iterator<Item = Self>> {
        alloc::boxed::Box::new(self.0.shrink().map(Bytes))
    }
}

/// Short needles from the same alphabet, empty included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Needle(pub(crate) Vec<u8>);

impl Arbitrary for Needle {
    fn arbitrary(g: &mut Gen) -> Self {
        let len = usize::arbitrary(g) % 4;
        Self(
            (0..len)
                .map(|_| *g.choose(ALPHABET).unwrap_or(&b'a'))
                .collect(),
        )
    }
}

/// Small indices with the occasional out-of-range value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Index(pub(crate) usize);

impl Arbitrary for Index {
    fn arbitrary(g: &mut Gen) -> Self {
        match usize::arbitrary(g) % 8 {
            0 => Self(NPOS),
            _ => Self(usize::arbitrary(g) % 24),
        }
    }
}

impl Arbitrary for GrowthPolicy {
    fn arbitrary(g: &mut Gen) -> Self {
        *g.choose(&GrowthPolicy::ALL).unwrap_or(&GrowthPolicy::Fit)
    }
}

/// One mutation, applied both to a buffer and to a `Vec<u8>` model.
#[derive(Debug, Clone)]
pub(crate) enum Op {
    Copy(Bytes),
    Concat(Bytes),
    LeftConcat(Bytes),
    Insert(Index, Bytes),
    Overlay(Index, Bytes),
    Remove(Index, Needle),
    RemoveRange(Index, Index),
    Replace(Index, Needle, Needle),
    ReplaceRange(Index, Index, Bytes),
    Trim(Needle),
    TrimRange(Index, Index, Needle),
    Reverse,
    Truncate(Index),
    Clear,
    ShrinkToFit,
    ResizeExact(Index),
    SetGrowth(GrowthPolicy),
    EscapeUnescape,
}

impl Arbitrary for Op {
    fn arbitrary(g: &mut Gen) -> Self {
        match usize::arbitrary(g) % 18 {
            0 => Op::Copy(Bytes::arbitrary(g)),
            1 => Op::Concat(Bytes::arbitrary(g)),
            2 => Op::LeftConcat(Bytes::arbitrary(g)),
            3 => Op::Insert(Index::arbitrary(g), Bytes::arbitrary(g)),
            4 => Op::Overlay(Index::arbitrary(g), Bytes::arbitrary(g)),
            5 => Op::Remove(Index::arbitrary(g), Needle::arbitrary(g)),
            6 => Op::RemoveRange(Index::arbitrary(g), Index::arbitrary(g)),
            7 => Op::Replace(Index::arbitrary(g), Needle::arbitrary(g), Needle::arbitrary(g)),
            8 => Op::ReplaceRange(Index::arbitrary(g), Index::arbitrary(g), Bytes::arbitrary(g)),
            9 => Op::Trim(Needle::arbitrary(g)),
            10 => Op::TrimRange(Index::arbitrary(g), Index::arbitrary(g), Needle::arbitrary(g)),
            11 => Op::Reverse,
            12 => Op::Truncate(Index::arbitrary(g)),
            13 => Op::Clear,
            14 => Op::ShrinkToFit,
            15 => Op::ResizeExact(Index::arbitrary(g)),
            16 => Op::SetGrowth(GrowthPolicy::arbitrary(g)),
            _ => Op::EscapeUnescape,
        }
    }
}
