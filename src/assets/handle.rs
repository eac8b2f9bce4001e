use std::{
    cell::RefCell,
    collections::HashMap,
    rc::{Rc, Weak},
    sync::Arc,
};

/// Identifier of a registered design blob. Stays meaningful after release: lookups just miss.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub struct HandleId(u64);

impl HandleId {
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DesignFormat {
    Png,
    Jpeg,
    Svg,
}

impl DesignFormat {
    pub fn mime(self) -> &'static str {
        match self {
            DesignFormat::Png => crate::config::limits::MIME_PNG,
            DesignFormat::Jpeg => crate::config::limits::MIME_JPEG,
            DesignFormat::Svg => crate::config::limits::MIME_SVG,
        }
    }
}

/// Validated, renderable artwork bytes plus the natural size measured at validation time.
///
/// For SVG the bytes are the sanitized markup, never the original upload.
#[derive(Clone)]
pub struct DesignBlob {
    pub format: DesignFormat,
    pub bytes: Arc<[u8]>,
    pub width: u32,
    pub height: u32,
}

impl std::fmt::Debug for DesignBlob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DesignBlob")
            .field("format", &self.format)
            .field("bytes_len", &self.bytes.len())
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// Resolves a handle to its bytes at draw time.
///
/// The compositor only ever sees this seam, so a released handle and an undecodable blob
/// look the same to it: nothing to draw.
pub trait DesignSource {
    fn fetch(&self, id: HandleId) -> Option<DesignBlob>;
}

#[derive(Debug, Default)]
struct RegistryInner {
    next_id: u64,
    live: HashMap<HandleId, DesignBlob>,
    created: u64,
    released: u64,
}

/// Session-local arena of design blobs with explicit create/release semantics.
///
/// Cloning shares the same arena.
#[derive(Clone, Debug, Default)]
pub struct HandleRegistry {
    inner: Rc<RefCell<RegistryInner>>,
}

impl HandleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `blob` and return its owning handle. Dropping the handle releases the blob.
    pub fn create(&self, blob: DesignBlob) -> DesignHandle {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        let id = HandleId(inner.next_id);
        inner.live.insert(id, blob);
        inner.created += 1;
        tracing::trace!(handle = id.0, live = inner.live.len(), "design handle created");
        DesignHandle {
            id,
            registry: Rc::downgrade(&self.inner),
        }
    }

    pub fn is_live(&self, id: HandleId) -> bool {
        self.inner.borrow().live.contains_key(&id)
    }

    pub fn live_count(&self) -> usize {
        self.inner.borrow().live.len()
    }

    pub fn created_count(&self) -> u64 {
        self.inner.borrow().created
    }

    pub fn released_count(&self) -> u64 {
        self.inner.borrow().released
    }
}

impl DesignSource for HandleRegistry {
    fn fetch(&self, id: HandleId) -> Option<DesignBlob> {
        self.inner.borrow().live.get(&id).cloned()
    }
}

impl RegistryInner {
    fn release(&mut self, id: HandleId) {
        if self.live.remove(&id).is_some() {
            self.released += 1;
            tracing::trace!(handle = id.0, live = self.live.len(), "design handle released");
        }
    }
}

/// Sole owner of one registered blob. Not `Clone`: exactly one live owner per blob.
pub struct DesignHandle {
    id: HandleId,
    registry: Weak<RefCell<RegistryInner>>,
}

impl DesignHandle {
    pub fn id(&self) -> HandleId {
        self.id
    }

    /// Release now rather than at end of scope.
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for DesignHandle {
    fn drop(&mut self) {
        if let Some(inner) = self.registry.upgrade() {
            inner.borrow_mut().release(self.id);
        }
    }
}

impl std::fmt::Debug for DesignHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DesignHandle")
            .field("id", &self.id.0)
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/handle.rs"]
mod tests;
