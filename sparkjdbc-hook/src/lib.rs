// Resolves stored jdbc connections and serialises spark jdbc jobs into
// the argument list consumed by the spark jdbc application, along with
// the spark-submit command line used to launch it

mod store;
pub use store::*;
mod descriptor;
pub use descriptor::*;
mod arguments;
pub use arguments::*;
mod spark;
pub use spark::*;
mod proc;
pub use proc::*;
mod hook;
pub use hook::*;
