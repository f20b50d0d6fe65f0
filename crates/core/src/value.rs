use std::ops::{Index, IndexMut};

use id_arena::{Arena, Id};

use crate::{dim::Dimensions, dtype::ElemTag};

pub type ValueId = Id<Value>;

/// A named tensor in the graph. Graph inputs and outputs carry the element
/// type and (when declared) the static shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Value {
    pub name: Option<String>,
    pub elem_ty: Option<ElemTag>,
    pub dims: Option<Dimensions>,
}

#[derive(Debug, Default, Clone)]
pub struct ValueArena(Arena<Value>);

impl ValueArena {
    pub fn new_val_named(&mut self, name: impl Into<String>) -> ValueId {
        self.0.alloc(Value {
            name: Some(name.into()),
            elem_ty: None,
            dims: None,
        })
    }

    pub fn new_val_named_and_typed(
        &mut self,
        name: impl Into<String>,
        elem_ty: ElemTag,
        dims: Option<Dimensions>,
    ) -> ValueId {
        self.0.alloc(Value {
            name: Some(name.into()),
            elem_ty: Some(elem_ty),
            dims,
        })
    }
}

impl Index<ValueId> for ValueArena {
    type Output = Value;

    fn index(&self, index: ValueId) -> &Self::Output {
        &self.0[index]
    }
}

impl IndexMut<ValueId> for ValueArena {
    fn index_mut(&mut self, index: ValueId) -> &mut Self::Output {
        &mut self.0[index]
    }
}
