#![allow(unused_imports)]

#[doc(hidden)]
pub use crate::{core::app_states::*, logger::{self, LogSev, LogAbout}};

#[doc(hidden)]
pub use crate::{fname, impl_tracked_plugin, util_lib::tracked_plugin::*};

#[doc(hidden)]
pub use crate::util_lib::coords::*;
