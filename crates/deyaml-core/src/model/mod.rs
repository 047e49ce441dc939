pub mod types;
pub mod value;
pub mod view;

pub use types::{last_segment, Builtin, Field, ScalarClass, TypeDesc, TypeId, TypeKind, TypeTable};
pub use value::{Dynamic, Graph, Slot, SlotId, Value};
pub use view::{Kind, ValueRef};
