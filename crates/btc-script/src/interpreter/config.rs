//! Evaluation limits.
//!
//! Nested script-hash and witness expansions splice new commands into the
//! running program, so an evaluation has no intrinsic bound. These limits
//! supply one.

/// Largest data push the evaluator will place on the stack.
pub const MAX_SCRIPT_ELEMENT_SIZE: usize = 520;
/// Default ceiling on executed commands, pushes included.
pub const DEFAULT_MAX_OPS: usize = 10_000;
/// Default ceiling on combined data and alt stack depth.
pub const DEFAULT_MAX_STACK_SIZE: usize = 1000;
/// Default ceiling on P2SH and witness expansions in one evaluation.
pub const DEFAULT_MAX_EXPANSION_DEPTH: usize = 4;

/// Script configuration limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    max_ops: usize,
    max_stack_size: usize,
    max_expansion_depth: usize,
}

impl Config {
    pub fn with_max_ops(mut self, max_ops: usize) -> Self {
        self.max_ops = max_ops;
        self
    }

    pub fn with_max_stack_size(mut self, max_stack_size: usize) -> Self {
        self.max_stack_size = max_stack_size;
        self
    }

    pub fn with_max_expansion_depth(mut self, depth: usize) -> Self {
        self.max_expansion_depth = depth;
        self
    }

    pub fn max_ops(&self) -> usize {
        self.max_ops
    }

    pub fn max_stack_size(&self) -> usize {
        self.max_stack_size
    }

    pub fn max_expansion_depth(&self) -> usize {
        self.max_expansion_depth
    }

    pub fn max_script_element_size(&self) -> usize {
        MAX_SCRIPT_ELEMENT_SIZE
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_ops: DEFAULT_MAX_OPS,
            max_stack_size: DEFAULT_MAX_STACK_SIZE,
            max_expansion_depth: DEFAULT_MAX_EXPANSION_DEPTH,
        }
    }
}
