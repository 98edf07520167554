mod arena;
mod handle;
mod node;
mod priority;
mod raw_treap_map;

pub(crate) use handle::Handle;
pub(crate) use node::Side;
pub(crate) use priority::XorShift32;
pub(crate) use raw_treap_map::RawTreapMap;
