//! Category source that persists the last fetch in the SQLite cache.
//!
//! # Invariants
//! - A non-empty, well-formed cache is served without touching the remote
//!   source.
//! - Only lists that pass `CategoryTree::validate` are written to the cache.
//! - A failed cache write never hides a successful remote fetch.

use super::{CategorySource, SourceError};
use crate::model::category::Category;
use crate::repo::category_repo::CategoryRepository;
use crate::tree::CategoryTree;
use log::{info, warn};

/// Remote source fronted by a local category cache.
pub struct CachedCategorySource<S: CategorySource, R: CategoryRepository> {
    remote: S,
    cache: R,
}

impl<S: CategorySource, R: CategoryRepository> CachedCategorySource<S, R> {
    pub fn new(remote: S, cache: R) -> Self {
        Self { remote, cache }
    }

    /// Fetches from the remote source and overwrites the cache.
    ///
    /// A malformed list is still returned so the caller can report it, but
    /// it is not cached and the previous cache content is dropped.
    pub fn refresh(&self) -> Result<Vec<Category>, SourceError> {
        let categories = self.remote.fetch_all()?;
        if let Err(err) = CategoryTree::new(categories.clone()).validate() {
            warn!(
                "event=category_cache_write module=source status=skipped reason=malformed error={}",
                err
            );
            if let Err(err) = self.cache.clear() {
                warn!(
                    "event=category_cache_invalidate module=source status=error error={}",
                    err
                );
            }
            return Ok(categories);
        }

        match self.cache.replace_all(&categories) {
            Ok(()) => info!(
                "event=category_cache_write module=source status=ok count={}",
                categories.len()
            ),
            Err(err) => warn!(
                "event=category_cache_write module=source status=error error={}",
                err
            ),
        }
        Ok(categories)
    }

    /// Drops cached categories so the next fetch goes remote.
    pub fn invalidate(&self) -> Result<(), SourceError> {
        self.cache.clear()?;
        info!("event=category_cache_invalidate module=source status=ok");
        Ok(())
    }

    pub fn cache(&self) -> &R {
        &self.cache
    }
}

impl<S: CategorySource, R: CategoryRepository> CategorySource for CachedCategorySource<S, R> {
    fn fetch_all(&self) -> Result<Vec<Category>, SourceError> {
        if self.cache.count()? > 0 {
            let categories = self.cache.list_all()?;
            match CategoryTree::new(categories.clone()).validate() {
                Ok(()) => {
                    info!(
                        "event=category_fetch module=source status=ok mode=cache count={}",
                        categories.len()
                    );
                    return Ok(categories);
                }
                Err(err) => warn!(
                    "event=category_fetch module=source status=fallback mode=cache reason=malformed error={}",
                    err
                ),
            }
        }
        self.refresh()
    }
}
