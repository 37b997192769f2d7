//! Publish-once binding of documentation providers.
//!
//! The binder has two states, unbound and bound, and only ever moves from the first to the
//! second. The candidate provider is built outside of any lock; publishing it is a single
//! publish-if-still-unbound step on a [`OnceLock`]. A caller that loses the race drops its
//! candidate and returns the value that won. Reads after binding take no lock.

use std::sync::{Arc, OnceLock};

use tracing::trace;

use crate::documentation::{DocumentationProviderRc, NoDocumentation};

/// Lazily bound, publish-once documentation provider slot.
#[derive(Debug, Default)]
pub struct DocumentationBinder {
    provider: OnceLock<DocumentationProviderRc>,
}

impl DocumentationBinder {
    /// Creates an unbound binder.
    #[must_use]
    pub fn new() -> Self {
        DocumentationBinder {
            provider: OnceLock::new(),
        }
    }

    /// Creates a binder that is already bound to `provider`.
    #[must_use]
    pub fn bound(provider: DocumentationProviderRc) -> Self {
        DocumentationBinder {
            provider: OnceLock::from(provider),
        }
    }

    /// The bound provider, without binding one.
    pub fn get(&self) -> Option<&DocumentationProviderRc> {
        self.provider.get()
    }

    /// Returns `true` once a provider has been published.
    pub fn is_bound(&self) -> bool {
        self.provider.get().is_some()
    }

    /// Returns the bound provider, building and publishing one first if necessary.
    ///
    /// `factory` is only called while the binder looks unbound. It may run on several threads
    /// at once; exactly one result is published and every caller gets that one. `None` binds
    /// [`NoDocumentation`], which is never retried.
    pub fn get_or_bind<F>(&self, factory: F) -> &DocumentationProviderRc
    where
        F: FnOnce() -> Option<DocumentationProviderRc>,
    {
        if let Some(provider) = self.provider.get() {
            return provider;
        }

        let candidate = factory().unwrap_or_else(NoDocumentation::shared);
        let published = self.provider.get_or_init(|| Arc::clone(&candidate));
        if Arc::ptr_eq(published, &candidate) {
            trace!(empty = published.is_empty(), "documentation provider bound");
        } else {
            trace!("documentation provider already bound, discarding candidate");
        }

        published
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{
            atomic::{AtomicUsize, Ordering},
            Barrier,
        },
        thread,
    };

    use super::*;
    use crate::documentation::{DocumentationProvider, XmlDocumentationProvider};

    fn provider(id: &str) -> DocumentationProviderRc {
        let text = format!(r#"<doc><members><member name="{id}">text</member></members></doc>"#);
        Arc::new(XmlDocumentationProvider::parse(&text).unwrap())
    }

    #[test]
    fn test_binds_once() {
        let binder = DocumentationBinder::new();
        assert!(!binder.is_bound());
        assert!(binder.get().is_none());

        let first = Arc::clone(binder.get_or_bind(|| Some(provider("T:A"))));
        assert!(binder.is_bound());

        let second = binder.get_or_bind(|| panic!("factory must not run once bound"));
        assert!(Arc::ptr_eq(&first, second));
        assert_eq!(second.documentation("T:A"), Some("text"));
    }

    #[test]
    fn test_missing_provider_binds_marker() {
        let binder = DocumentationBinder::new();
        let calls = AtomicUsize::new(0);

        let bound = binder.get_or_bind(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            None
        });
        assert!(bound.is_empty());

        binder.get_or_bind(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            Some(provider("T:B"))
        });
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(binder.get().unwrap().is_empty());
    }

    #[test]
    fn test_prebound() {
        let original = provider("T:C");
        let binder = DocumentationBinder::bound(Arc::clone(&original));
        assert!(binder.is_bound());
        assert!(Arc::ptr_eq(binder.get_or_bind(|| None), &original));
    }

    #[test]
    fn test_concurrent_first_access_converges() {
        const THREADS: usize = 16;

        let binder = DocumentationBinder::new();
        let barrier = Barrier::new(THREADS);
        let calls = AtomicUsize::new(0);

        let observed: Vec<DocumentationProviderRc> = thread::scope(|scope| {
            let handles: Vec<_> = (0..THREADS)
                .map(|index| {
                    let binder = &binder;
                    let barrier = &barrier;
                    let calls = &calls;
                    scope.spawn(move || {
                        barrier.wait();
                        Arc::clone(binder.get_or_bind(|| {
                            calls.fetch_add(1, Ordering::SeqCst);
                            Some(provider(&format!("T:Thread{index}")))
                        }))
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| handle.join().unwrap())
                .collect()
        });

        let winner = binder.get().unwrap();
        assert!(observed.iter().all(|seen| Arc::ptr_eq(seen, winner)));
        let invocations = calls.load(Ordering::SeqCst);
        assert!((1..=THREADS).contains(&invocations));
    }
}
