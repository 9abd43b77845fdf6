//! changeset-scan - streaming decoder for OpenStreetMap changeset dumps
//!
//! Layers:
//! - core: scanner, tag grammar, entity unescaping over the raw buffer
//! - changeset: record type, element decoder, editor-name canonicalization
//! - strategy: date seek and listener dispatch
//! - listener: the listener trait and bundled collectors
//! - reader: pull iterator for callers that drive the loop themselves

pub mod changeset;
pub mod core;
pub mod error;
pub mod listener;
pub mod reader;
pub mod strategy;

pub use changeset::{canonical_editor, Changeset, Decoder, Step};
pub use error::DecodeError;
pub use listener::ChangesetListener;
pub use reader::Changesets;
pub use strategy::{decode, seek_date, DecodeOptions, DecodeSummary, Dispatcher};

// ============================================================================
// Allocator Configuration
// ============================================================================

#[cfg(feature = "memory_tracking")]
mod tracking {
    use std::alloc::{GlobalAlloc, Layout};
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub static ALLOCATED: AtomicUsize = AtomicUsize::new(0);
    pub static PEAK_ALLOCATED: AtomicUsize = AtomicUsize::new(0);

    pub struct TrackingAllocator;

    #[cfg(feature = "mimalloc")]
    static UNDERLYING: mimalloc::MiMalloc = mimalloc::MiMalloc;

    #[cfg(not(feature = "mimalloc"))]
    static UNDERLYING: std::alloc::System = std::alloc::System;

    unsafe impl GlobalAlloc for TrackingAllocator {
        unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
            let ptr = UNDERLYING.alloc(layout);
            if !ptr.is_null() {
                let current = ALLOCATED.fetch_add(layout.size(), Ordering::Relaxed) + layout.size();
                PEAK_ALLOCATED.fetch_max(current, Ordering::Relaxed);
            }
            ptr
        }

        unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
            ALLOCATED.fetch_sub(layout.size(), Ordering::Relaxed);
            UNDERLYING.dealloc(ptr, layout)
        }
    }
}

#[cfg(feature = "memory_tracking")]
#[global_allocator]
static GLOBAL: tracking::TrackingAllocator = tracking::TrackingAllocator;

#[cfg(all(feature = "mimalloc", not(feature = "memory_tracking")))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Bytes currently allocated, when built with `memory_tracking`
#[cfg(feature = "memory_tracking")]
pub fn allocated_bytes() -> Option<usize> {
    Some(tracking::ALLOCATED.load(std::sync::atomic::Ordering::SeqCst))
}

/// Peak allocation, when built with `memory_tracking`
#[cfg(feature = "memory_tracking")]
pub fn peak_allocated_bytes() -> Option<usize> {
    Some(tracking::PEAK_ALLOCATED.load(std::sync::atomic::Ordering::SeqCst))
}

#[cfg(not(feature = "memory_tracking"))]
pub fn allocated_bytes() -> Option<usize> {
    None
}

#[cfg(not(feature = "memory_tracking"))]
pub fn peak_allocated_bytes() -> Option<usize> {
    None
}
