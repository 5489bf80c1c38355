use std::{
    panic::{self, PanicHookInfo},
    thread,
};

/// Installs a panic hook that logs the panic message through `tracing` and
/// then delegates to the previously installed hook, which prints the
/// backtrace.
pub fn install() {
    let default_hook = panic::take_hook();
    let hook = move |info: &PanicHookInfo| {
        let thread = thread::current();
        let thread_name = thread.name().unwrap_or("<unnamed>");
        tracing::error!("thread '{}' {}:", thread_name, info);
        default_hook(info);
    };
    panic::set_hook(Box::new(hook));
}
