//! Thin facade functions over a handle's default layout tag and a
//! registry's size.

use esio_layout::LayoutRegistry;
use esio_substrate::{Handle, Substrate};

/// Number of layout strategies a registry knows about.
pub fn layout_count(registry: &LayoutRegistry) -> u32 {
    registry.len()
}

/// The layout tag a handle will stamp new datasets with.
pub fn layout_get<S: Substrate>(handle: &Handle<S>) -> u32 {
    handle.default_layout_tag()
}

/// Changes the layout tag a handle stamps new datasets with. Has no effect
/// on datasets that already exist — their stored `layout_tag` attribute
/// wins on every subsequent write or read.
pub fn layout_set<S: Substrate>(handle: &mut Handle<S>, tag: u32) {
    handle.set_default_layout_tag(tag);
}
