mod codec;
mod error;
mod gate;
mod lttb;
mod point;
mod reporters;
mod summary;

pub use codec::*;
pub use error::*;
pub use gate::*;
pub use lttb::*;
pub use point::*;
pub use reporters::*;
pub use summary::*;
