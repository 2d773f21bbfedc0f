//! Model loading.
//!
//! - `obj`: a Wavefront OBJ reader for positions and faces
//! - `loader`: a single-shot background load polled from the UI thread
//! - `error`: the failure cases both of them report

mod error;
mod loader;
mod obj;

pub use error::AssetError;
pub use loader::ModelLoad;
pub use obj::{parse_obj, read_obj, ObjMesh, ObjModel};
