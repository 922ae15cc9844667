pub mod favorite;
pub mod response;
pub mod stock;

pub use favorite::*;
pub use response::*;
pub use stock::*;
