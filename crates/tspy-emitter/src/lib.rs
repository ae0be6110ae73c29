//! Python type-declaration emitter for the tspy transpiler.
//!
//! The emitter walks the canonical AST produced by `tspy-parser` and
//! lowers it to Python source built from `TypedDict`, `Enum`/`IntEnum`,
//! `Literal`, `Union`/`Optional`/`NotRequired`, `List`/`Dict`/`Tuple`,
//! `Callable` and `TypeVar`/`Generic`, honoring the configured emission
//! policies.
//!
//! `pipeline::transpile` chains preprocessing, parsing, transformation
//! and emission into the single entry point the driver calls.

pub mod emitter;
pub use emitter::{EmitResult, Emitter};

pub mod pipeline;
pub use pipeline::{TranspileResult, transpile};
