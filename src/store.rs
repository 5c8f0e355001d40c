//! Destination for generated ribbon buffers.

use slotmap::SlotMap;

use crate::error::StoreError;
use crate::tessellation::RibbonMesh;

slotmap::new_key_type! {
    /// Unique identifier for a mesh in the mesh store.
    pub struct MeshId;
}

/// Receives generated meshes.
///
/// Every submission hands over ownership of a complete mesh and replaces
/// whatever the sink held from an earlier submission.
pub trait MeshSink {
    /// Takes ownership of `mesh`.
    fn submit(&mut self, mesh: RibbonMesh);
}

impl MeshSink for Option<RibbonMesh> {
    fn submit(&mut self, mesh: RibbonMesh) {
        *self = Some(mesh);
    }
}

/// Arena owning the meshes of many ribbons.
#[derive(Debug, Default)]
pub struct MeshStore {
    meshes: SlotMap<MeshId, RibbonMesh>,
}

impl MeshStore {
    /// Creates a new, empty mesh store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a mesh and returns its ID.
    pub fn insert(&mut self, mesh: RibbonMesh) -> MeshId {
        self.meshes.insert(mesh)
    }

    /// Returns a reference to the mesh, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MeshNotFound`] if `id` is not in the store.
    pub fn mesh(&self, id: MeshId) -> Result<&RibbonMesh, StoreError> {
        self.meshes.get(id).ok_or(StoreError::MeshNotFound)
    }

    /// Replaces the mesh stored under `id`, returning the previous one.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MeshNotFound`] if `id` is not in the store.
    pub fn replace(&mut self, id: MeshId, mesh: RibbonMesh) -> Result<RibbonMesh, StoreError> {
        self.meshes
            .get_mut(id)
            .map(|slot| std::mem::replace(slot, mesh))
            .ok_or(StoreError::MeshNotFound)
    }

    /// Removes the mesh stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MeshNotFound`] if `id` is not in the store.
    pub fn remove(&mut self, id: MeshId) -> Result<RibbonMesh, StoreError> {
        self.meshes.remove(id).ok_or(StoreError::MeshNotFound)
    }

    /// Returns a sink that overwrites the mesh stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MeshNotFound`] if `id` is not in the store.
    pub fn slot(&mut self, id: MeshId) -> Result<MeshSlot<'_>, StoreError> {
        if self.meshes.contains_key(id) {
            Ok(MeshSlot { store: self, id })
        } else {
            Err(StoreError::MeshNotFound)
        }
    }

    /// Returns the number of stored meshes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    /// Returns whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}

/// A [`MeshSink`] bound to one entry of a [`MeshStore`].
#[derive(Debug)]
pub struct MeshSlot<'a> {
    store: &'a mut MeshStore,
    id: MeshId,
}

impl MeshSlot<'_> {
    /// Returns the ID this slot writes to.
    #[must_use]
    pub fn id(&self) -> MeshId {
        self.id
    }
}

impl MeshSink for MeshSlot<'_> {
    fn submit(&mut self, mesh: RibbonMesh) {
        if let Some(slot) = self.store.meshes.get_mut(self.id) {
            *slot = mesh;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;

    fn mesh_with(n: usize) -> RibbonMesh {
        RibbonMesh {
            vertices: vec![Point3::origin(); n],
            ..RibbonMesh::default()
        }
    }

    #[test]
    fn slot_overwrites_entry() {
        let mut store = MeshStore::new();
        let id = store.insert(RibbonMesh::default());
        let mut slot = store.slot(id).unwrap();
        assert_eq!(slot.id(), id);
        slot.submit(mesh_with(8));
        assert_eq!(store.mesh(id).unwrap().vertices.len(), 8);
        store.slot(id).unwrap().submit(mesh_with(4));
        assert_eq!(store.mesh(id).unwrap().vertices.len(), 4);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn removed_id_is_rejected() {
        let mut store = MeshStore::new();
        let id = store.insert(mesh_with(4));
        let removed = store.remove(id).unwrap();
        assert_eq!(removed.vertices.len(), 4);
        assert!(store.is_empty());
        assert!(store.mesh(id).is_err());
        assert!(store.slot(id).is_err());
        assert!(store.replace(id, mesh_with(1)).is_err());
    }

    #[test]
    fn replace_returns_previous() {
        let mut store = MeshStore::new();
        let id = store.insert(mesh_with(2));
        let old = store.replace(id, mesh_with(6)).unwrap();
        assert_eq!(old.vertices.len(), 2);
        assert_eq!(store.mesh(id).unwrap().vertices.len(), 6);
    }

    #[test]
    fn option_sink_holds_latest() {
        let mut sink: Option<RibbonMesh> = None;
        sink.submit(mesh_with(4));
        sink.submit(mesh_with(12));
        assert_eq!(sink.unwrap().vertices.len(), 12);
    }
}
