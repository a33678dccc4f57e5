use std::marker::PhantomData;

/// A resource that must be given back exactly once.
pub trait Release {
    fn release(self);
}

/// Owned GPU object acquired during a lesson's load.
pub enum GpuResource {
    Buffer(wgpu::Buffer),
    BindGroupLayout(wgpu::BindGroupLayout),
    BindGroup(wgpu::BindGroup),
    Pipeline(wgpu::RenderPipeline),
}

impl Release for GpuResource {
    fn release(self) {
        match self {
            // Buffers free their memory eagerly; the rest are reference
            // counted inside wgpu and go away on drop.
            GpuResource::Buffer(b) => b.destroy(),
            GpuResource::BindGroupLayout(_)
            | GpuResource::BindGroup(_)
            | GpuResource::Pipeline(_) => {}
        }
    }
}

/// Types that can live in a [`GpuResources`] stack.
pub trait Resource: Sized {
    fn wrap(self) -> GpuResource;
    fn peek(resource: &GpuResource) -> Option<&Self>;
}

macro_rules! impl_resource {
    ($ty:ty, $variant:ident) => {
        impl Resource for $ty {
            fn wrap(self) -> GpuResource {
                GpuResource::$variant(self)
            }

            fn peek(resource: &GpuResource) -> Option<&Self> {
                match resource {
                    GpuResource::$variant(r) => Some(r),
                    _ => None,
                }
            }
        }
    };
}

impl_resource!(wgpu::Buffer, Buffer);
impl_resource!(wgpu::BindGroupLayout, BindGroupLayout);
impl_resource!(wgpu::BindGroup, BindGroup);
impl_resource!(wgpu::RenderPipeline, Pipeline);

struct Slot<R> {
    label: &'static str,
    resource: Option<R>,
    deferred: bool,
}

/// Stack of owned resources released in reverse acquisition order.
///
/// Resources pushed with [`push_deferred`](Self::push_deferred) sit outside
/// that walk and are released after everything else (the shader program).
///
/// Slots are never reused, so a handle keeps pointing at the same slot and
/// simply resolves to nothing once the stack has been released. Anything
/// still held when the stack is dropped is released then.
pub struct ResourceStack<R: Release> {
    slots: Vec<Slot<R>>,
}

impl<R: Release> Default for ResourceStack<R> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<R: Release> ResourceStack<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes ownership of `resource`; returns its slot index.
    pub fn push(&mut self, label: &'static str, resource: R) -> usize {
        self.insert(label, resource, false)
    }

    /// Like [`push`](Self::push), but the resource is released only after
    /// every non-deferred one.
    pub fn push_deferred(&mut self, label: &'static str, resource: R) -> usize {
        self.insert(label, resource, true)
    }

    fn insert(&mut self, label: &'static str, resource: R, deferred: bool) -> usize {
        self.slots.push(Slot {
            label,
            resource: Some(resource),
            deferred,
        });
        self.slots.len() - 1
    }

    pub fn slot(&self, index: usize) -> Option<&R> {
        self.slots.get(index).and_then(|s| s.resource.as_ref())
    }

    /// Number of resources not yet released.
    pub fn live(&self) -> usize {
        self.slots.iter().filter(|s| s.resource.is_some()).count()
    }

    /// Releases every live resource, newest first, then the deferred ones
    /// (also newest first). Returns how many were released.
    ///
    /// Calling this again is a no-op.
    pub fn release_all(&mut self) -> usize {
        self.release_where(false) + self.release_where(true)
    }

    fn release_where(&mut self, deferred: bool) -> usize {
        let mut released = 0;
        for slot in self.slots.iter_mut().rev().filter(|s| s.deferred == deferred) {
            if let Some(resource) = slot.resource.take() {
                log::trace!("releasing {}", slot.label);
                resource.release();
                released += 1;
            }
        }
        released
    }
}

impl<R: Release> Drop for ResourceStack<R> {
    fn drop(&mut self) {
        let n = self.release_all();
        if n > 0 {
            log::debug!("released {n} resources on drop");
        }
    }
}

/// Typed index into a [`GpuResources`] stack.
pub struct Handle<T> {
    index: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> std::fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Handle({})", self.index)
    }
}

/// Resource stack holding wgpu objects.
pub type GpuResources = ResourceStack<GpuResource>;

impl ResourceStack<GpuResource> {
    /// Takes ownership of a wgpu object and returns a typed handle to it.
    pub fn acquire<T: Resource>(&mut self, label: &'static str, resource: T) -> Handle<T> {
        Handle {
            index: self.push(label, resource.wrap()),
            _marker: PhantomData,
        }
    }

    /// Acquires the shader program; it outlives every other resource on unload.
    pub fn acquire_program(
        &mut self,
        label: &'static str,
        pipeline: wgpu::RenderPipeline,
    ) -> Handle<wgpu::RenderPipeline> {
        Handle {
            index: self.push_deferred(label, pipeline.wrap()),
            _marker: PhantomData,
        }
    }

    /// Resolves a handle. `None` once the stack has been released.
    pub fn get<T: Resource>(&self, handle: Handle<T>) -> Option<&T> {
        self.slot(handle.index).and_then(T::peek)
    }
}
