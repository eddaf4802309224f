//! Submission orchestration over a `RecordStore`.
//!
//! Each submission performs, in order: lead upsert, child insert, activity
//! insert. There is no transaction across them.

pub mod contact;
pub mod evaluation;
pub mod leads;
