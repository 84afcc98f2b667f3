#[cfg(feature = "log")]
#[macro_use]
mod log {
    macro_rules! net_log {
        (trace, $($arg:tt)*) => { ::log::trace!($($arg)*); };
        (debug, $($arg:tt)*) => { ::log::debug!($($arg)*); };
        (info, $($arg:tt)*) => { ::log::info!($($arg)*); };
        (warn, $($arg:tt)*) => { ::log::warn!($($arg)*); };
    }
}

#[cfg(not(feature = "log"))]
#[macro_use]
mod log {
    macro_rules! net_log {
        ($level:ident, $fmt:literal $(, $arg:expr)* $(,)?) => { $( let _ = &$arg; )* };
    }
}

macro_rules! net_trace {
    ($($arg:tt)*) => (net_log!(trace, $($arg)*));
}

macro_rules! net_debug {
    ($($arg:tt)*) => (net_log!(debug, $($arg)*));
}

macro_rules! net_info {
    ($($arg:tt)*) => (net_log!(info, $($arg)*));
}

macro_rules! net_warn {
    ($($arg:tt)*) => (net_log!(warn, $($arg)*));
}
