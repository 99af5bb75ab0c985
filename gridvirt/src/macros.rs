// Logging shims. With `feature = "tracing"` these forward to `tracing` under the `gridvirt`
// target; without it the whole statement (arguments included) is compiled out.

macro_rules! vtrace {
    ($($tt:tt)*) => {
        #[cfg(feature = "tracing")]
        tracing::trace!(target: "gridvirt", $($tt)*);
    };
}

macro_rules! vdebug {
    ($($tt:tt)*) => {
        #[cfg(feature = "tracing")]
        tracing::debug!(target: "gridvirt", $($tt)*);
    };
}

macro_rules! vwarn {
    ($($tt:tt)*) => {
        #[cfg(feature = "tracing")]
        tracing::warn!(target: "gridvirt", $($tt)*);
    };
}
