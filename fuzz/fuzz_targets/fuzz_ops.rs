#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use sstring::{GrowthPolicy, NPOS, SString};

/// Index argument; `u8::MAX` stands for "past the end".
#[derive(Debug, Clone, Copy, Arbitrary)]
struct Index(u8);

impl Index {
    fn get(self) -> usize {
        if self.0 == u8::MAX { NPOS } else { usize::from(self.0) }
    }
}

#[derive(Debug, Clone, Copy, Arbitrary)]
enum Growth {
    Fit,
    Grow25,
    Grow50,
    Grow100,
}

impl From<Growth> for GrowthPolicy {
    fn from(g: Growth) -> Self {
        match g {
            Growth::Fit => GrowthPolicy::Fit,
            Growth::Grow25 => GrowthPolicy::Grow25,
            Growth::Grow50 => GrowthPolicy::Grow50,
            Growth::Grow100 => GrowthPolicy::Grow100,
        }
    }
}

#[derive(Debug, Arbitrary)]
enum Op {
    Copy(Vec<u8>),
    Concat(Vec<u8>),
    LeftConcat(Vec<u8>),
    Insert(Index, Vec<u8>),
    Overlay(Index, Vec<u8>),
    Remove(Index, Vec<u8>),
    RemoveRange(Index, Index),
    Replace(Index, Vec<u8>, Vec<u8>),
    ReplaceRange(Index, Index, Vec<u8>),
    TrimRange(Index, Index, Vec<u8>),
    Reverse,
    Truncate(Index),
    ShrinkToFit,
    ResizeExact(u8),
    SetGrowth(Growth),
    Escape,
    Unescape,
    Find(Index, Vec<u8>),
    RFind(Index, Vec<u8>),
}

#[derive(Debug, Arbitrary)]
struct Input {
    stack_capacity: u8,
    initial: Vec<u8>,
    ops: Vec<Op>,
}

fn replaced(v: &[u8], start: usize, needle: &[u8], with: &[u8]) -> Vec<u8> {
    if needle.is_empty() || start >= v.len() {
        return v.to_vec();
    }
    let mut out = v[..start].to_vec();
    let mut i = start;
    while i < v.len() {
        if v[i..].starts_with(needle) {
            out.extend_from_slice(with);
            i += needle.len();
        } else {
            out.push(v[i]);
            i += 1;
        }
    }
    out
}

fn apply(s: &mut SString<'_>, model: &mut Vec<u8>, op: &Op) {
    match op {
        Op::Copy(b) => {
            s.copy(b).unwrap();
            model.clone_from(b);
        }
        Op::Concat(b) => {
            s.concat(b).unwrap();
            model.extend_from_slice(b);
        }
        Op::LeftConcat(b) => {
            s.left_concat(b).unwrap();
            model.splice(0..0, b.iter().copied());
        }
        Op::Insert(i, b) => {
            s.insert(i.get(), b).unwrap();
            let at = i.get().min(model.len());
            model.splice(at..at, b.iter().copied());
        }
        Op::Overlay(i, b) => {
            s.overlay(i.get(), b).unwrap();
            let at = i.get().min(model.len());
            let end = (at + b.len()).min(model.len());
            model.splice(at..end, b.iter().copied());
        }
        Op::Remove(i, n) => {
            s.remove(i.get(), n);
            *model = replaced(model, i.get(), n, b"");
        }
        Op::RemoveRange(a, b) => {
            s.remove_range(a.get(), b.get());
            let end = b.get().min(model.len());
            if a.get() < end {
                model.drain(a.get()..end);
            }
        }
        Op::Replace(i, n, w) => {
            s.replace(i.get(), n, w).unwrap();
            *model = replaced(model, i.get(), n, w);
        }
        Op::ReplaceRange(a, b, bytes) => {
            s.replace_range(a.get(), b.get(), bytes).unwrap();
            let end = b.get().min(model.len());
            let start = a.get().min(end);
            model.splice(start..end, bytes.iter().copied());
        }
        Op::TrimRange(a, b, charset) => {
            s.trim_range(a.get(), b.get(), charset);
            if !charset.is_empty() {
                let end = b.get().min(model.len());
                let start = a.get().min(end);
                let mut lo = start;
                let mut hi = end;
                while lo < hi && charset.contains(&model[lo]) {
                    lo += 1;
                }
                while lo < hi && charset.contains(&model[hi - 1]) {
                    hi -= 1;
                }
                let kept = model[lo..hi].to_vec();
                model.splice(start..end, kept);
            }
        }
        Op::Reverse => {
            s.reverse();
            model.reverse();
        }
        Op::Truncate(i) => {
            s.truncate(i.get());
            model.truncate(i.get());
        }
        Op::ShrinkToFit => {
            s.shrink_to_fit().unwrap();
        }
        Op::ResizeExact(capacity) => {
            let capacity = usize::from(*capacity);
            let resized = s.is_heap_type() || s.capacity() < capacity;
            s.resize_exact(capacity).unwrap();
            if resized {
                assert_eq!(s.capacity(), capacity);
                model.truncate(capacity);
            }
        }
        Op::SetGrowth(g) => s.set_growth_policy((*g).into()),
        Op::Escape => {
            s.escape().unwrap();
            assert!(!s.contains(&0));
            let mut back = s.dup();
            back.unescape();
            assert_eq!(back.as_bytes(), model.as_slice());
            model.clear();
            model.extend_from_slice(s.as_bytes());
        }
        Op::Unescape => {
            let before = s.len();
            s.unescape();
            assert!(s.len() <= before);
            model.clear();
            model.extend_from_slice(s.as_bytes());
        }
        Op::Find(i, n) => {
            let expected = if n.is_empty() {
                None
            } else {
                (i.get()..model.len()).find(|&at| model[at..].starts_with(n))
            };
            assert_eq!(s.find(i.get(), n), expected);
        }
        Op::RFind(i, n) => {
            let expected = if n.is_empty() || model.is_empty() {
                None
            } else {
                let last = i.get().min(model.len() - 1);
                (0..model.len())
                    .rev()
                    .find(|&at| at + n.len() <= last + 1 && model[at..].starts_with(n))
            };
            assert_eq!(s.rfind(i.get(), n), expected);
        }
    }
}

fuzz_target!(|input: Input| {
    let mut backing = vec![0u8; usize::from(input.stack_capacity) + 1];
    let mut s = if input.stack_capacity == 0 {
        SString::empty()
    } else {
        SString::on_stack(&mut backing)
    };
    s.copy(&input.initial).unwrap();
    let mut model = input.initial;

    for op in &input.ops {
        apply(&mut s, &mut model, op);
        s.check_invariants();
        assert_eq!(s.as_bytes(), model.as_slice());
    }
});
