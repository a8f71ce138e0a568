//! Allocator log parsing
//!
//! This module turns the raw text of `heap_frag.log` into structured data:
//! - [`record`]: single-record parsing (chunk lines and directives) plus the
//!   helpers that split a full log read into records and extract the
//!   producing process id.
//!
//! # Log grammar
//!
//! ```text
//! File     := (DirectiveLine NEWLINE)* Record (BLANKLINE Record)*
//! Record   := (DirectiveLine NEWLINE)* (ChunkLine NEWLINE)+
//! Directive:= '&' KEY ['=' VALUE]        // e.g. &PID=1234, &coalesced
//! ChunkLine:= ADDRESS WS SIZE WS ALLOCFLAG
//! ```
//!
//! `SIZE` is a non-negative base-10 integer; `ALLOCFLAG` is `1` for
//! allocated, any other token for free. The log is written by an allocator
//! hook and may be read mid-append, so malformed chunk lines are tolerated:
//! each bad line is skipped with a warning while the rest of the record
//! still parses.

pub mod record;
