// Same shims as the core crate, under the `gridvirt_adapter` target.

macro_rules! vtrace {
    ($($tt:tt)*) => {
        #[cfg(feature = "tracing")]
        tracing::trace!(target: "gridvirt_adapter", $($tt)*);
    };
}

macro_rules! vdebug {
    ($($tt:tt)*) => {
        #[cfg(feature = "tracing")]
        tracing::debug!(target: "gridvirt_adapter", $($tt)*);
    };
}
