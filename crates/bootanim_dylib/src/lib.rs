//! Forces dynamic linking of `bootanim_internal` when the `dynamic_linking` feature is enabled.

#[allow(unused_imports)]
use bootanim_internal;
