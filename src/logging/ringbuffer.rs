// SPDX-License-Identifier: Apache-2.0 OR MIT
// Fixed-capacity ring buffer of log slots
//
// Producers are serialized by one mutex around the write cursor; the single
// consumer owns the read cursor. Each slot's `occupied` flag is the only
// synchronization point between the two sides.

use super::backoff::Backoff;
use super::Severity;
use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Cache-aligned wrapper to prevent false sharing
#[repr(align(64))]
struct CacheAligned<T>(T);

/// Source of ring identities, used to pair a `ReadCursor` with its ring
static NEXT_RING_ID: AtomicUsize = AtomicUsize::new(0);

/// One element of the ring.
///
/// `level` and `message` are written only by the producer that observed
/// `occupied == false` while holding the write lock, and read only by the
/// consumer after it observed `occupied == true`.
struct Slot {
    occupied: AtomicBool,
    level: UnsafeCell<Severity>,
    message: UnsafeCell<Option<String>>,
}

impl Slot {
    fn empty() -> Self {
        Self {
            occupied: AtomicBool::new(false),
            level: UnsafeCell::new(Severity::Info),
            message: UnsafeCell::new(None),
        }
    }
}

/// Bounded multi-producer single-consumer ring of log messages.
///
/// Overflow policy is backpressure: a producer that finds its slot still
/// occupied waits (while holding the write lock) until the consumer frees
/// it. Nothing is ever dropped and the ring never grows.
pub struct RingBuffer {
    id: usize,
    slots: Box<[CacheAligned<Slot>]>,
    /// Write cursor; holding this lock is what makes a `Producer`
    write_index: Mutex<usize>,
    /// Set under the write lock, read without it
    closed: AtomicBool,
    occupied: CacheAligned<AtomicUsize>,
    backpressure_waits: AtomicU64,
}

// SAFETY: RingBuffer is Sync because:
// - Slot contents are written only under the write lock, and only while the
//   slot's `occupied` flag is false (Acquire load pairs with the consumer's
//   Release store)
// - Slot contents are read only by the holder of the unique `ReadCursor`,
//   and only after observing `occupied == true` (Acquire load pairs with the
//   producer's Release store)
unsafe impl Sync for RingBuffer {}

/// Exclusive read position of the single consumer.
///
/// Only `RingBuffer::new` creates one, so there is exactly one per ring.
#[derive(Debug)]
pub struct ReadCursor {
    ring_id: usize,
    index: usize,
}

impl ReadCursor {
    /// Index of the next slot the consumer will look at
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Holder of the write lock. All slot acquisition goes through this.
///
/// While a thread holds a `Producer`, it must not call `push` or `close` on
/// the same ring: both take the write lock and would deadlock.
pub struct Producer<'a> {
    ring: &'a RingBuffer,
    index: MutexGuard<'a, usize>,
}

/// A free slot claimed by a producer, not yet visible to the consumer.
///
/// Publishing consumes the handle. Dropping it unpublished leaves the write
/// cursor where it was.
pub struct SlotHandle<'p, 'a> {
    producer: &'p mut Producer<'a>,
    index: usize,
}

impl RingBuffer {
    /// Create a ring with `capacity` slots and its single read cursor
    ///
    /// # Panics
    /// Panics if capacity is zero
    pub fn new(capacity: usize) -> (Self, ReadCursor) {
        assert!(capacity > 0, "Capacity must be at least 1");

        let id = NEXT_RING_ID.fetch_add(1, Ordering::Relaxed);
        let slots: Vec<CacheAligned<Slot>> =
            (0..capacity).map(|_| CacheAligned(Slot::empty())).collect();

        let ring = Self {
            id,
            slots: slots.into_boxed_slice(),
            write_index: Mutex::new(0),
            closed: AtomicBool::new(false),
            occupied: CacheAligned(AtomicUsize::new(0)),
            backpressure_waits: AtomicU64::new(0),
        };
        (ring, ReadCursor { ring_id: id, index: 0 })
    }

    /// Take the write lock
    ///
    /// Blocks while another producer holds it. Not re-entrant.
    pub fn producer(&self) -> Producer<'_> {
        Producer {
            ring: self,
            index: self
                .write_index
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        }
    }

    /// Acquire a slot and publish `message` into it in one critical section
    ///
    /// May block under backpressure. Returns false if the ring was closed.
    pub fn push(&self, level: Severity, message: String) -> bool {
        let mut producer = self.producer();
        match producer.acquire_slot() {
            Some(handle) => {
                handle.publish(level, message);
                true
            }
            None => false,
        }
    }

    /// Stop accepting producers
    ///
    /// Taken under the write lock, so every push that completed before this
    /// call is already visible to the consumer.
    pub fn close(&self) {
        let _producer = self.producer();
        self.closed.store(true, Ordering::Release);
    }

    /// Whether `close` has been called
    ///
    /// Does not take the write lock, so it is safe to call while holding a
    /// `Producer`.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Consume the slot under the cursor if it has been published
    ///
    /// Returns None when the next slot is still free (ring empty).
    ///
    /// # Panics
    /// Panics if the cursor belongs to another ring
    pub fn try_consume_next(&self, cursor: &mut ReadCursor) -> Option<(Severity, String)> {
        assert_eq!(
            cursor.ring_id, self.id,
            "read cursor belongs to a different ring buffer"
        );

        let slot = &self.slots[cursor.index].0;
        if !slot.occupied.load(Ordering::Acquire) {
            return None;
        }

        // SAFETY: occupied == true, so the producer finished writing and no
        // producer touches this slot until we clear the flag. The cursor is
        // unique, so no other consumer reads it.
        let (level, message) = unsafe { (*slot.level.get(), (*slot.message.get()).take()) };

        slot.occupied.store(false, Ordering::Release);
        self.occupied.0.fetch_sub(1, Ordering::Relaxed);
        cursor.index = (cursor.index + 1) % self.slots.len();

        Some((level, message.unwrap_or_default()))
    }

    /// Hand the next published message to `emit`, then free its slot
    ///
    /// Unlike `try_consume_next`, the slot stays occupied while `emit` runs,
    /// so producers cannot lap a message that is still being written out.
    ///
    /// # Panics
    /// Panics if the cursor belongs to another ring
    pub fn consume_next_with<R>(
        &self,
        cursor: &mut ReadCursor,
        emit: impl FnOnce(Severity, &str) -> R,
    ) -> Option<R> {
        assert_eq!(
            cursor.ring_id, self.id,
            "read cursor belongs to a different ring buffer"
        );

        let slot = &self.slots[cursor.index].0;
        if !slot.occupied.load(Ordering::Acquire) {
            return None;
        }

        // SAFETY: same argument as `try_consume_next`; the shared borrow of
        // the message ends before the slot is released.
        let result = unsafe {
            let message = (*slot.message.get()).as_deref().unwrap_or_default();
            emit(*slot.level.get(), message)
        };
        // SAFETY: still occupied, still exclusively ours
        drop(unsafe { (*slot.message.get()).take() });

        slot.occupied.store(false, Ordering::Release);
        self.occupied.0.fetch_sub(1, Ordering::Relaxed);
        cursor.index = (cursor.index + 1) % self.slots.len();

        Some(result)
    }

    /// Number of slots
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of published, not yet consumed slots
    pub fn len(&self) -> usize {
        self.occupied.0.load(Ordering::Relaxed).min(self.capacity())
    }

    /// Check if the consumer has caught up
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// How many times a producer found its slot still occupied
    pub fn backpressure_waits(&self) -> u64 {
        self.backpressure_waits.load(Ordering::Relaxed)
    }
}

impl<'a> Producer<'a> {
    /// Whether the ring stopped accepting messages
    pub fn is_closed(&self) -> bool {
        self.ring.is_closed()
    }

    /// Claim the slot under the write cursor, waiting until it is free
    ///
    /// Returns None once the ring is closed. The wait only happens when the
    /// consumer is `capacity` messages behind. The write lock stays held, so
    /// other producers queue up behind us and acquisition order is preserved.
    pub fn acquire_slot(&mut self) -> Option<SlotHandle<'_, 'a>> {
        // `close` flips the flag under this same lock, so the check is stable
        // for as long as we hold it
        if self.is_closed() {
            return None;
        }

        let index = *self.index;
        let slot = &self.ring.slots[index].0;

        if slot.occupied.load(Ordering::Acquire) {
            self.ring.backpressure_waits.fetch_add(1, Ordering::Relaxed);
            let mut backoff = Backoff::for_producer();
            while slot.occupied.load(Ordering::Acquire) {
                backoff.snooze();
            }
        }

        Some(SlotHandle {
            producer: self,
            index,
        })
    }
}

impl SlotHandle<'_, '_> {
    /// Index of the claimed slot
    pub fn index(&self) -> usize {
        self.index
    }

    /// Fill the slot and make it visible to the consumer
    ///
    /// The occupied flag is set last with Release ordering, so a consumer
    /// that sees it set also sees the level and message.
    pub fn publish(self, level: Severity, message: String) {
        let SlotHandle { producer, index } = self;
        let ring = producer.ring;
        let slot = &ring.slots[index].0;

        // SAFETY: we hold the write lock and observed occupied == false, so
        // neither another producer nor the consumer is touching this slot.
        unsafe {
            *slot.level.get() = level;
            *slot.message.get() = Some(message);
        }
        ring.occupied.0.fetch_add(1, Ordering::Relaxed);
        slot.occupied.store(true, Ordering::Release);

        *producer.index = (index + 1) % ring.slots.len();
    }
}
