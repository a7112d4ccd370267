//! Named response caches.
//!
//! A [`CacheStorage`] holds any number of named [`Cache`]s in creation
//! order. Entries are keyed by [`Request::cache_key`], so only the method
//! and the fragment-less URL take part in matching. Response bodies are
//! `bytes::Bytes`, so handing out a cached response is a cheap clone.

use std::sync::Arc;

use danis_net::{Method, Network, Request, Response};
use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::error::WorkerError;

/// One named cache of GET responses.
#[derive(Debug)]
pub struct Cache {
    name: String,
    entries: RwLock<IndexMap<String, Response>>,
}

impl Cache {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            entries: RwLock::new(IndexMap::new()),
        }
    }

    /// Cache name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of stored responses.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Cache keys in insertion order.
    pub fn keys(&self) -> Vec<String> {
        self.entries.read().keys().cloned().collect()
    }

    /// The stored response for `request`, if any.
    pub fn match_request(&self, request: &Request) -> Option<Response> {
        self.entries.read().get(&request.cache_key()).cloned()
    }

    /// Stores `response` for `request`, replacing any previous entry.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::MethodNotCacheable`] for anything but GET.
    pub fn put(&self, request: &Request, response: Response) -> Result<(), WorkerError> {
        if request.method != Method::Get {
            return Err(WorkerError::MethodNotCacheable {
                method: request.method,
            });
        }
        self.entries.write().insert(request.cache_key(), response);
        Ok(())
    }

    /// Fetches every request and stores all responses, or none.
    ///
    /// Every response is fetched before anything is written; the write
    /// itself happens under one lock, so readers never see a partial set.
    /// Returns the number of entries written.
    ///
    /// # Errors
    ///
    /// Returns the first failure: [`WorkerError::MethodNotCacheable`] for a
    /// non-GET request, [`WorkerError::Network`] when the origin cannot be
    /// reached and [`WorkerError::Status`] for a non-2xx answer.
    pub async fn add_all<N: Network + ?Sized>(
        &self,
        network: &N,
        requests: &[Request],
    ) -> Result<usize, WorkerError> {
        let mut fetched = Vec::with_capacity(requests.len());
        for request in requests {
            if request.method != Method::Get {
                return Err(WorkerError::MethodNotCacheable {
                    method: request.method,
                });
            }
            let response = network.fetch(request).await?;
            if !response.is_ok() {
                return Err(WorkerError::Status {
                    url: request.url.to_string(),
                    status: response.status,
                });
            }
            fetched.push((request.cache_key(), response));
        }

        let count = fetched.len();
        self.entries.write().extend(fetched);
        Ok(count)
    }
}

/// Every cache the worker can see, by name.
#[derive(Debug, Default)]
pub struct CacheStorage {
    caches: RwLock<IndexMap<String, Arc<Cache>>>,
}

impl CacheStorage {
    /// Empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens `name`, creating an empty cache if it does not exist yet.
    pub fn open(&self, name: &str) -> Arc<Cache> {
        if let Some(cache) = self.caches.read().get(name) {
            return Arc::clone(cache);
        }
        let mut caches = self.caches.write();
        Arc::clone(
            caches
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(Cache::new(name))),
        )
    }

    /// True when a cache called `name` exists.
    pub fn has(&self, name: &str) -> bool {
        self.caches.read().contains_key(name)
    }

    /// Cache names in creation order.
    pub fn keys(&self) -> Vec<String> {
        self.caches.read().keys().cloned().collect()
    }

    /// Deletes the cache called `name`. Returns false if there was none.
    pub fn delete(&self, name: &str) -> bool {
        self.caches.write().shift_remove(name).is_some()
    }

    /// Looks `request` up in every cache, oldest cache first.
    pub fn match_request(&self, request: &Request) -> Option<Response> {
        let caches: Vec<Arc<Cache>> = self.caches.read().values().cloned().collect();
        caches.iter().find_map(|cache| cache.match_request(request))
    }
}
