pub mod figure;

pub use figure::{Figure, Line, Marker, Trace, TraceMode};
