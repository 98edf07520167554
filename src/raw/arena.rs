use alloc::vec::Vec;

use super::handle::Handle;

/// Slot storage for tree nodes and values.
///
/// Freed slots go on a free list and are handed out again by the next `alloc`, so a
/// handle stays valid exactly as long as the element it was returned for.
#[derive(Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    free: Vec<Handle>,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Number of live elements.
    pub(crate) const fn len(&self) -> usize {
        self.slots.len().saturating_sub(self.free.len())
    }

    pub(crate) fn alloc(&mut self, element: T) -> Handle {
        if let Some(handle) = self.free.pop() {
            self.slots[handle.to_index()] = Some(element);
            return handle;
        }

        // The new slot's index is `slots.len()`, which must not exceed `Handle::MAX`.
        assert!(
            self.slots.len() <= Handle::MAX,
            "`Arena::alloc()` - arena is at maximum capacity ({})",
            Handle::MAX + 1
        );
        self.slots.push(Some(element));
        Handle::from_index(self.slots.len() - 1)
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        self.slots[handle.to_index()].as_ref().expect("`Arena::get()` - `handle` is invalid!")
    }

    /// Returns a reference to an element by handle from a raw pointer.
    ///
    /// # Safety
    /// - `ptr` must point to a valid, allocated `Arena<T>` that is not being mutated.
    #[inline]
    pub(crate) unsafe fn get_ptr<'a>(ptr: *const Self, handle: Handle) -> &'a T {
        // SAFETY: Caller guarantees `ptr` is valid; only the `slots` field is read.
        unsafe { (&(*ptr).slots)[handle.to_index()].as_ref().expect("`Arena::get_ptr()` - `handle` is invalid!") }
    }

    /// Returns a mutable reference to an element by handle from a raw pointer.
    ///
    /// Only the addressed slot is borrowed, so references previously returned for other
    /// handles stay valid.
    ///
    /// # Safety
    /// - `ptr` must point to a valid, allocated `Arena<T>` whose slot vector is not resized
    ///   while the returned reference is alive.
    /// - No other reference to the element of `handle` may exist.
    #[inline]
    pub(crate) unsafe fn get_mut_ptr<'a>(ptr: *mut Self, handle: Handle) -> &'a mut T {
        let index = handle.to_index();
        // SAFETY: Caller guarantees `ptr` is valid. The slot is reached through the buffer
        // pointer, never through a slice covering the other slots.
        unsafe {
            let slots = &raw mut (*ptr).slots;
            assert!(index < (*slots).len(), "`Arena::get_mut_ptr()` - `handle` is invalid!");
            (*(*slots).as_mut_ptr().add(index)).as_mut().expect("`Arena::get_mut_ptr()` - `handle` is invalid!")
        }
    }

    /// Returns `true` if the next `alloc` will not panic.
    pub(crate) fn has_vacancy(&self) -> bool {
        !self.free.is_empty() || self.slots.len() <= Handle::MAX
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        self.slots[handle.to_index()].as_mut().expect("`Arena::get_mut()` - `handle` is invalid!")
    }

    pub(crate) fn take(&mut self, handle: Handle) -> T {
        let element = self.slots[handle.to_index()].take().expect("`Arena::take()` - `handle` is invalid!");
        self.free.push(handle);
        element
    }

    pub(crate) fn free(&mut self, handle: Handle) {
        drop(self.take(handle));
    }
}
