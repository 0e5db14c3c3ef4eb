//! Scope flags for open `#if` blocks
//!
//! Every open `#if` pushes one [Scope] on the engine's stack, and `#endif` pops it.
//!
//! PASSING and ERASING are mutually exclusive and say whether the content of the current
//! branch reaches the output. ELSE and ELSE_IF record which directive last rewrote the entry,
//! so a second `#else` (or an `#elif` after `#else`) can be rejected. DEEP marks a scope whose
//! remaining branches are all dead: nothing inside it is evaluated, only nesting is tracked.

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    pub struct Scope: u8 {
        const PASSING = 1 << 0;
        const ERASING = 1 << 1;
        const ELSE = 1 << 2;
        const ELSE_IF = 1 << 3;
        const DEEP = 1 << 4;
    }
}

impl Scope {
    /// Scope for a branch whose condition was evaluated.
    pub fn branch(passed: bool) -> Self {
        if passed {
            Scope::PASSING
        } else {
            Scope::ERASING
        }
    }

    /// Scope for an `#if` opened inside an erased branch.
    pub fn dead() -> Self {
        Scope::ERASING | Scope::DEEP
    }

    pub fn is_erasing(self) -> bool {
        self.contains(Scope::ERASING)
    }

    pub fn is_deep(self) -> bool {
        self.contains(Scope::DEEP)
    }

    /// The scope after an `#else`: the branch policy flips.
    pub fn flipped_for_else(self) -> Self {
        if self.contains(Scope::PASSING) {
            Scope::ERASING | Scope::ELSE
        } else if self.contains(Scope::ERASING) {
            Scope::PASSING | Scope::ELSE
        } else {
            self
        }
    }
}
