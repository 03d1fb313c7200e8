use std::{env, fmt, sync::Arc};

use crate::{
    error::{RingError, RingResult},
    hash::{HashFn, SliceNameFn, default_slice_name, md5_hash},
    models::Op,
    watcher::{FilterFn, route_by_node},
};

pub const BASE_V_FACTOR_VAR: &str = "RING_BASE_V_FACTOR";

/// Construction-time options of a [`Ring`](crate::Ring).
pub struct RingConfig<T> {
    pub hash: HashFn,
    pub base_v_factor: usize,
    pub slice_name: SliceNameFn,
    pub filter: FilterFn<T>,
}

impl<T: 'static> Default for RingConfig<T> {
    fn default() -> Self {
        Self {
            hash: Arc::new(md5_hash),
            base_v_factor: 1,
            slice_name: Arc::new(default_slice_name),
            filter: Arc::new(route_by_node::<T>),
        }
    }
}

impl<T> Clone for RingConfig<T> {
    fn clone(&self) -> Self {
        Self {
            hash: self.hash.clone(),
            base_v_factor: self.base_v_factor,
            slice_name: self.slice_name.clone(),
            filter: self.filter.clone(),
        }
    }
}

impl<T> fmt::Debug for RingConfig<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingConfig")
            .field("base_v_factor", &self.base_v_factor)
            .finish_non_exhaustive()
    }
}

impl<T: 'static> RingConfig<T> {
    pub fn with_hash<F>(mut self, hash: F) -> Self
    where
        F: Fn(&str) -> u64 + Send + Sync + 'static,
    {
        self.hash = Arc::new(hash);
        self
    }

    pub fn with_base_v_factor(mut self, base_v_factor: usize) -> Self {
        self.base_v_factor = base_v_factor;
        self
    }

    pub fn with_slice_name<F>(mut self, slice_name: F) -> Self
    where
        F: Fn(&str, usize) -> String + Send + Sync + 'static,
    {
        self.slice_name = Arc::new(slice_name);
        self
    }

    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&Op<T>) -> String + Send + Sync + 'static,
    {
        self.filter = Arc::new(filter);
        self
    }

    /// Defaults overridden by the process environment (and a `.env` file,
    /// when present).
    pub fn from_env() -> RingResult<Self> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> RingResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(BASE_V_FACTOR_VAR) {
            config.base_v_factor = raw.trim().parse::<usize>().map_err(|e| {
                RingError::Config(format!("{BASE_V_FACTOR_VAR}={raw:?}: {e}"))
            })?;
        }

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> RingResult<()> {
        if self.base_v_factor < 1 {
            return Err(RingError::InvalidBaseVFactor);
        }

        Ok(())
    }
}
