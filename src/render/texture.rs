use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_TEXTURE_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct TextureId(u64);

impl TextureId {
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Engine-facing view over the raster buffer. Created once per session; the version moves
/// forward after every committed pass so a presenter can tell when to re-upload.
#[derive(Debug)]
pub struct TextureHandle {
    id: TextureId,
    version: u64,
    released: bool,
}

impl TextureHandle {
    pub(crate) fn allocate() -> Self {
        Self {
            id: TextureId(NEXT_TEXTURE_ID.fetch_add(1, Ordering::Relaxed)),
            version: 0,
            released: false,
        }
    }

    pub fn id(&self) -> TextureId {
        self.id
    }

    /// Number of committed passes so far. `0` means nothing has been painted yet.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// True when `seen` (the last version a consumer uploaded) is behind.
    pub fn needs_update(&self, seen: Option<u64>) -> bool {
        !self.released && self.version > 0 && seen != Some(self.version)
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    pub(crate) fn mark_updated(&mut self) {
        self.version += 1;
    }

    pub(crate) fn release(&mut self) {
        if !self.released {
            tracing::debug!(texture = self.id.0, version = self.version, "texture released");
            self.released = true;
        }
    }
}
