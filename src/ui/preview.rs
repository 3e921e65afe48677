use iced::widget::image::Handle;
use std::collections::HashMap;

/// Decoded-on-demand preview images, keyed by processed payload name
///
/// Handles are created once per download so the renderer can keep the
/// uploaded texture between frames.
#[derive(Debug, Default)]
pub struct PreviewCache {
    handles: HashMap<String, Handle>,
}

impl PreviewCache {
    pub fn insert(&mut self, processed: impl Into<String>, bytes: Vec<u8>) {
        self.handles.insert(processed.into(), Handle::from_bytes(bytes));
    }

    pub fn get(&self, processed: &str) -> Option<&Handle> {
        self.handles.get(processed)
    }

    /// Drop previews of photos no longer in any slot
    pub fn retain_live<'a>(&mut self, live: impl IntoIterator<Item = &'a str>) {
        let live: Vec<&str> = live.into_iter().collect();
        self.handles.retain(|key, _| live.contains(&key.as_str()));
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }
}
