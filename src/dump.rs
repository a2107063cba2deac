//! Diagnostic dump formatting. Not a wire format: one line per
//! segment in address order, `[base, end] (kind)` with an `(imported)`
//! suffix for imported spans, followed by a listing of the allocated hash
//! index. Builds and returns a `String` rather than writing straight to a
//! serial port or stdout, leaving it to the caller to print, log via the
//! `log` crate, or assert on in tests.

use std::fmt::Write as _;

use crate::segment::SegmentKind;

pub(crate) struct DumpSegment {
    pub base: usize,
    pub end: usize,
    pub kind: SegmentKind,
    pub imported: bool,
}

pub(crate) fn format(name: &str, quantum: usize, segments: &[DumpSegment], allocated_bases: &[usize]) -> String {
    let mut out = String::new();
    writeln!(out, "arena {name:?} (quantum {quantum:#x}):").unwrap();
    for seg in segments {
        let kind = match seg.kind {
            SegmentKind::Span => "SPAN",
            SegmentKind::Allocated => "ALLOCATED",
            SegmentKind::Free => "FREE",
        };
        if seg.imported {
            writeln!(out, "  [{:#x}, {:#x}] ({kind}) (imported)", seg.base, seg.end).unwrap();
        } else {
            writeln!(out, "  [{:#x}, {:#x}] ({kind})", seg.base, seg.end).unwrap();
        }
    }
    writeln!(out, "  allocated index ({} entries):", allocated_bases.len()).unwrap();
    for base in allocated_bases {
        writeln!(out, "    {base:#x}").unwrap();
    }
    out
}
