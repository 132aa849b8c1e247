//! The verification checklist

mod checklist;

pub use checklist::run;
