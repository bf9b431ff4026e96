#[macro_use]
pub mod tracked_plugin;
pub mod coords;

/// Get the current function name.
#[macro_export]
macro_rules! fname {
    () => {{
        fn f_() {}
        fn type_name_of<T>(_: T) -> &'static str {
            std::any::type_name::<T>()
        }
        let name = type_name_of(f_);
        name.strip_suffix("::f_").unwrap()
    }}
}
