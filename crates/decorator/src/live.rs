//! Reloadable registry with atomic publication.
//!
//! # Role
//!
//! Development environments re-run declarations when code reloads. [`LiveRegistry`] rebuilds
//! a new [`DecoratorRegistry`] from the current one plus the re-run declarations and swaps it
//! in atomically. Readers keep whatever snapshot they loaded.
//!
//! # Invariants
//!
//! - Concurrent reloads are linearizable; none is lost.
//!   - Enforced in: [`LiveRegistry::reload`] (compare-and-swap loop).
//!   - Tested by: `tests::test_concurrent_reloads_are_not_lost`
//!   - Failure symptom: a reload's declarations vanish under contention.
//!
//! - A failed reload publishes nothing.
//!   - Enforced in: [`LiveRegistry::reload`] returns before the swap.
//!   - Tested by: `tests::test_failed_reload_keeps_snapshot`

use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::{debug, trace};

use crate::error::RegistrationError;
use crate::registration::RegistryBuilder;
use crate::resolve::DecoratorRegistry;

pub struct LiveRegistry {
	snap: ArcSwap<DecoratorRegistry>,
}

impl LiveRegistry {
	pub fn new(registry: DecoratorRegistry) -> Self {
		Self {
			snap: ArcSwap::from_pointee(registry),
		}
	}

	/// The current snapshot. Wait-free; the snapshot stays valid across later reloads.
	#[inline]
	pub fn load(&self) -> Arc<DecoratorRegistry> {
		self.snap.load_full()
	}

	/// Publishes `registry` unconditionally.
	pub fn replace(&self, registry: DecoratorRegistry) {
		self.snap.store(Arc::new(registry));
	}

	/// Re-runs declarations against a builder seeded with the current snapshot and publishes
	/// the result.
	///
	/// `redeclare` may run more than once when reloads race, so it must only declare.
	pub fn reload<F>(&self, mut redeclare: F) -> Result<Arc<DecoratorRegistry>, RegistrationError>
	where
		F: FnMut(&mut RegistryBuilder) -> Result<(), RegistrationError>,
	{
		loop {
			let current = self.snap.load_full();
			let mut builder = current.to_builder();
			redeclare(&mut builder)?;
			let next = Arc::new(builder.build());

			let prev = self.snap.compare_and_swap(&current, Arc::clone(&next));
			if Arc::ptr_eq(&*prev, &current) {
				debug!(
					wrappers = next.wrappers().count(),
					collisions = next.collisions().len(),
					"registry reloaded"
				);
				return Ok(next);
			}
			trace!("registry reload raced, retrying");
		}
	}
}

impl std::fmt::Debug for LiveRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("LiveRegistry")
			.field("snapshot", &self.snap.load_full())
			.finish()
	}
}
