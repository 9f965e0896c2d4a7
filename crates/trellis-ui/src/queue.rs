//! Lock-free FIFO used to hand canvas object updates to the paint thread.
//!
//! Any number of threads may [`push`](ObjectQueue::push) concurrently. Values
//! are removed by the paint loop through [`pop`](ObjectQueue::pop); the
//! consumer side is serialised by an uncontended mutex so a stray second
//! consumer is safe, just not concurrent.
//!
//! Nodes live in a segmented arena and are addressed by `u32` index. Slots are
//! never returned to the allocator while the queue is alive: a dequeued node
//! goes onto a tagged free-list and is reused by the next producer, so a
//! steady stream of refresh requests allocates nothing.
//!
//! The link step follows the intrusive MPSC design: a producer claims the
//! tail with a single atomic swap and then publishes the link from the
//! previous tail. Between those two steps the consumer may briefly report the
//! queue as empty; the value becomes visible as soon as the link lands and
//! FIFO order is never violated.

use std::cell::UnsafeCell;
use std::fmt;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU32, AtomicU64, AtomicUsize, Ordering};

use parking_lot::Mutex;

const NIL: u32 = u32::MAX;
const SEGMENT_BASE: usize = 32;
const SEGMENT_COUNT: usize = 26;
const CAPACITY: usize = SEGMENT_BASE * ((1 << SEGMENT_COUNT) - 1);
const INDEX_MASK: u64 = 0xFFFF_FFFF;

struct Slot<T> {
    /// Index of the next node in queue order.
    next: AtomicU32,
    /// Index of the next node on the free-list.
    free_next: AtomicU32,
    value: UnsafeCell<Option<T>>,
}

impl<T> Slot<T> {
    fn new() -> Self {
        Slot {
            next: AtomicU32::new(NIL),
            free_next: AtomicU32::new(NIL),
            value: UnsafeCell::new(None),
        }
    }
}

/// Multi-producer FIFO queue with node recycling.
pub struct ObjectQueue<T> {
    segments: [OnceLock<Box<[Slot<T>]>>; SEGMENT_COUNT],
    /// Next never-used slot index.
    fresh: AtomicU32,
    /// Free-list head packed as `(tag << 32) | index`.
    free: AtomicU64,
    tail: AtomicU32,
    /// Index of the current sentinel node, owned by the consumer.
    head: Mutex<u32>,
    len: AtomicUsize,
}

// SAFETY: slot values are only touched by the producer that allocated the slot
// (before it is linked) and by the consumer holding `head` (after the link is
// observed with Acquire ordering). Everything else is atomics.
unsafe impl<T: Send> Send for ObjectQueue<T> {}
unsafe impl<T: Send> Sync for ObjectQueue<T> {}

impl<T> ObjectQueue<T> {
    /// Create an empty queue.
    pub fn new() -> Self {
        let queue = ObjectQueue {
            segments: std::array::from_fn(|_| OnceLock::new()),
            fresh: AtomicU32::new(0),
            free: AtomicU64::new(NIL as u64),
            tail: AtomicU32::new(0),
            head: Mutex::new(0),
            len: AtomicUsize::new(0),
        };
        // Slot 0 is the initial sentinel.
        let sentinel = queue.alloc();
        debug_assert_eq!(sentinel, 0);
        queue
    }

    /// Append `value` at the tail.
    pub fn push(&self, value: T) {
        let index = self.alloc();
        let slot = self.slot(index);
        // SAFETY: `index` was just taken from the free-list or the fresh
        // counter, so no other thread can reach this slot until it is linked.
        unsafe {
            *slot.value.get() = Some(value);
        }
        slot.next.store(NIL, Ordering::Relaxed);

        // Counted before the link is published so the consumer can never
        // decrement below zero.
        self.len.fetch_add(1, Ordering::Relaxed);

        let prev = self.tail.swap(index, Ordering::AcqRel);
        self.slot(prev).next.store(index, Ordering::Release);
    }

    /// Remove and return the value at the head, or `None` if the queue is
    /// empty.
    pub fn pop(&self) -> Option<T> {
        let mut head = self.head.lock();
        let next = self.slot(*head).next.load(Ordering::Acquire);
        if next == NIL {
            return None;
        }

        // SAFETY: the Acquire load above pairs with the producer's Release
        // link; the producer is done with the slot and only the holder of
        // `head` reads values.
        let value = unsafe { (*self.slot(next).value.get()).take() };
        let retired = std::mem::replace(&mut *head, next);
        drop(head);

        self.release(retired);
        self.len.fetch_sub(1, Ordering::Relaxed);
        value
    }

    /// Approximate number of queued values.
    ///
    /// Includes values whose push is still in flight.
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Relaxed)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pop values until the queue reports empty.
    pub fn drain(&self) -> impl Iterator<Item = T> + '_ {
        std::iter::from_fn(move || self.pop())
    }

    /// Number of arena slots ever handed out, including the sentinel.
    pub fn allocated_slots(&self) -> usize {
        self.fresh.load(Ordering::Relaxed) as usize
    }

    fn slot(&self, index: u32) -> &Slot<T> {
        let (segment, offset) = locate(index);
        let slots = self.segments[segment]
            .get_or_init(|| (0..segment_len(segment)).map(|_| Slot::new()).collect());
        &slots[offset]
    }

    fn alloc(&self) -> u32 {
        let mut head = self.free.load(Ordering::Acquire);
        loop {
            let index = (head & INDEX_MASK) as u32;
            if index == NIL {
                break;
            }
            let next = self.slot(index).free_next.load(Ordering::Relaxed);
            let tag = ((head >> 32) + 1) & INDEX_MASK;
            let new = (tag << 32) | next as u64;
            match self
                .free
                .compare_exchange_weak(head, new, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return index,
                Err(actual) => head = actual,
            }
        }

        let index = self.fresh.fetch_add(1, Ordering::Relaxed);
        assert!(
            (index as usize) < CAPACITY,
            "object queue exhausted its slot arena ({} live nodes)",
            CAPACITY
        );
        index
    }

    fn release(&self, index: u32) {
        let slot = self.slot(index);
        let mut head = self.free.load(Ordering::Relaxed);
        loop {
            slot.free_next.store((head & INDEX_MASK) as u32, Ordering::Relaxed);
            let tag = ((head >> 32) + 1) & INDEX_MASK;
            let new = (tag << 32) | index as u64;
            match self
                .free
                .compare_exchange_weak(head, new, Ordering::Release, Ordering::Relaxed)
            {
                Ok(_) => return,
                Err(actual) => head = actual,
            }
        }
    }
}

impl<T> Default for ObjectQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for ObjectQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectQueue")
            .field("len", &self.len())
            .field("allocated_slots", &self.allocated_slots())
            .finish()
    }
}

/// Map a slot index to `(segment, offset)`. Segment `k` holds
/// `SEGMENT_BASE << k` slots.
fn locate(index: u32) -> (usize, usize) {
    let bucket = index as usize / SEGMENT_BASE + 1;
    let segment = (usize::BITS - 1 - bucket.leading_zeros()) as usize;
    let offset = index as usize - SEGMENT_BASE * ((1 << segment) - 1);
    (segment, offset)
}

fn segment_len(segment: usize) -> usize {
    SEGMENT_BASE << segment
}
