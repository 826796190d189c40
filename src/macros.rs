//! Thin wrappers over the `log` crate, in the shape radeco-lib's
//! `radeco_trace!`/`radeco_warn!` macros use: a call site reads like a
//! plain statement instead of repeating `log::trace!(target: "...", ...)`.

macro_rules! cfg_trace {
    ($($t:tt)*) => {
        log::trace!(target: "cfg_assembler", $($t)*)
    };
}

macro_rules! cfg_warn {
    ($($t:tt)*) => {
        log::warn!(target: "cfg_assembler", $($t)*)
    };
}

pub(crate) use cfg_trace;
pub(crate) use cfg_warn;
