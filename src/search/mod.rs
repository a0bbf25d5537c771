//! Heuristic filesystem search for native libraries.
//!
//! The search path of the pipeline: expand a logical name into file-name
//! patterns, walk priority-ordered directories for the first acceptable
//! library file, and reduce that file to a linker name.

pub mod linker_name;
pub mod names;
pub mod probe;

pub use linker_name::{linker_reference, normalize};
pub use names::expand;
pub use probe::{candidates, is_library, search, search_existing, SearchCandidate};
