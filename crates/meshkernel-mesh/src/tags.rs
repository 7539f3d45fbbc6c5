use crate::error::{MeshError, MeshResult};
use meshkernel_base::Handle;
use meshkernel_topology::EntityKind;
use rustc_hash::FxHashMap as HashMap;

/// The payload kind a tag stores. Opaque-pointer tags (used in the source
/// system for solution-transfer bookkeeping) are out of scope here; every
/// tag this core needs is integer- or double-valued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Int,
    Double,
}

/// A tag's value read back from the store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TagValue {
    Int(i64),
    Double(f64),
}

enum TagData {
    Int(HashMap<Handle<EntityKind>, i64>),
    Double(HashMap<Handle<EntityKind>, f64>),
}

impl TagData {
    fn kind(&self) -> TagKind {
        match self {
            TagData::Int(_) => TagKind::Int,
            TagData::Double(_) => TagKind::Double,
        }
    }
}

/// Named, typed side-tables attaching small payloads to entities. Tag
/// names are global to one mesh; see `meshkernel-refine` for the reserved
/// names this core's own passes use.
#[derive(Default)]
pub struct TagStore {
    tags: HashMap<String, TagData>,
}

impl TagStore {
    pub fn new() -> Self {
        TagStore { tags: HashMap::default() }
    }

    pub fn create_tag(&mut self, name: &str, kind: TagKind) -> MeshResult<()> {
        if self.tags.contains_key(name) {
            return Err(MeshError::TagExists(name.to_string()));
        }
        let data = match kind {
            TagKind::Int => TagData::Int(HashMap::default()),
            TagKind::Double => TagData::Double(HashMap::default()),
        };
        self.tags.insert(name.to_string(), data);
        Ok(())
    }

    pub fn destroy_tag(&mut self, name: &str) -> MeshResult<()> {
        self.tags.remove(name).map(|_| ()).ok_or_else(|| MeshError::MissingTag(name.to_string()))
    }

    pub fn kind_of(&self, name: &str) -> MeshResult<TagKind> {
        self.tags.get(name).map(TagData::kind).ok_or_else(|| MeshError::MissingTag(name.to_string()))
    }

    pub fn has_tag(&self, name: &str, handle: Handle<EntityKind>) -> bool {
        match self.tags.get(name) {
            Some(TagData::Int(m)) => m.contains_key(&handle),
            Some(TagData::Double(m)) => m.contains_key(&handle),
            None => false,
        }
    }

    pub fn set_int(&mut self, name: &str, handle: Handle<EntityKind>, value: i64) -> MeshResult<()> {
        match self.tags.get_mut(name) {
            Some(TagData::Int(m)) => {
                m.insert(handle, value);
                Ok(())
            }
            Some(TagData::Double(_)) => Err(MeshError::MissingTag(name.to_string())),
            None => Err(MeshError::MissingTag(name.to_string())),
        }
    }

    pub fn set_double(&mut self, name: &str, handle: Handle<EntityKind>, value: f64) -> MeshResult<()> {
        match self.tags.get_mut(name) {
            Some(TagData::Double(m)) => {
                m.insert(handle, value);
                Ok(())
            }
            Some(TagData::Int(_)) => Err(MeshError::MissingTag(name.to_string())),
            None => Err(MeshError::MissingTag(name.to_string())),
        }
    }

    pub fn get(&self, name: &str, handle: Handle<EntityKind>) -> MeshResult<TagValue> {
        match self.tags.get(name) {
            Some(TagData::Int(m)) => {
                m.get(&handle).copied().map(TagValue::Int).ok_or_else(|| MeshError::MissingTag(name.to_string()))
            }
            Some(TagData::Double(m)) => {
                m.get(&handle).copied().map(TagValue::Double).ok_or_else(|| MeshError::MissingTag(name.to_string()))
            }
            None => Err(MeshError::MissingTag(name.to_string())),
        }
    }

    pub fn remove_tag(&mut self, name: &str, handle: Handle<EntityKind>) -> MeshResult<()> {
        match self.tags.get_mut(name) {
            Some(TagData::Int(m)) => {
                m.remove(&handle);
                Ok(())
            }
            Some(TagData::Double(m)) => {
                m.remove(&handle);
                Ok(())
            }
            None => Err(MeshError::MissingTag(name.to_string())),
        }
    }

    /// Strips every tag attachment for `handle`, called when an entity is
    /// destroyed.
    pub fn strip_all(&mut self, handle: Handle<EntityKind>) {
        for data in self.tags.values_mut() {
            match data {
                TagData::Int(m) => {
                    m.remove(&handle);
                }
                TagData::Double(m) => {
                    m.remove(&handle);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshkernel_base::Handle;

    fn h(i: u32) -> Handle<EntityKind> {
        Handle::new(EntityKind::Vertex, i, 0)
    }

    #[test]
    fn lifecycle() {
        let mut tags = TagStore::new();
        tags.create_tag("ma_geom_dim", TagKind::Int).unwrap();
        assert!(matches!(tags.create_tag("ma_geom_dim", TagKind::Int), Err(MeshError::TagExists(_))));

        assert!(!tags.has_tag("ma_geom_dim", h(1)));
        tags.set_int("ma_geom_dim", h(1), 2).unwrap();
        assert!(tags.has_tag("ma_geom_dim", h(1)));
        assert_eq!(tags.get("ma_geom_dim", h(1)).unwrap(), TagValue::Int(2));

        tags.remove_tag("ma_geom_dim", h(1)).unwrap();
        assert!(!tags.has_tag("ma_geom_dim", h(1)));

        tags.destroy_tag("ma_geom_dim").unwrap();
        assert!(matches!(tags.get("ma_geom_dim", h(1)), Err(MeshError::MissingTag(_))));
    }

    #[test]
    fn strip_all_removes_every_tag() {
        let mut tags = TagStore::new();
        tags.create_tag("a", TagKind::Int).unwrap();
        tags.create_tag("b", TagKind::Double).unwrap();
        tags.set_int("a", h(1), 1).unwrap();
        tags.set_double("b", h(1), 2.0).unwrap();
        tags.strip_all(h(1));
        assert!(!tags.has_tag("a", h(1)));
        assert!(!tags.has_tag("b", h(1)));
    }
}
