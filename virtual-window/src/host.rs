/// The binding between the engine and a host scroll container.
///
/// This is the only coupling to a rendering surface: the engine reads the current scroll
/// offset and viewport extent, and asks the host to scroll for `scroll_to_index`. It never
/// subscribes to host events; the host calls `Virtualizer::on_scroll`/`on_resize` (or
/// `sync_from_host`) itself.
pub trait ScrollHost {
    fn scroll_offset(&self) -> f64;

    fn viewport_extent(&self) -> f64;

    fn set_scroll_offset(&mut self, offset: f64);
}

impl<H: ScrollHost + ?Sized> ScrollHost for &mut H {
    fn scroll_offset(&self) -> f64 {
        (**self).scroll_offset()
    }

    fn viewport_extent(&self) -> f64 {
        (**self).viewport_extent()
    }

    fn set_scroll_offset(&mut self, offset: f64) {
        (**self).set_scroll_offset(offset);
    }
}
